// Smart constructors over the expression IR. Every constructor here reduces
// fully concrete arguments to the smallest representation (`Lit`, `LitByte`,
// `ConcreteBuf`) and otherwise builds the raw symbolic node unchanged, so
// downstream consumers can rebuild terms without re-checking.

use crate::modules::types::{internal_error, maybe_lit_word, to_512, word256, word256_bytes, Expr, Prop, W256};

/// Concrete writes beyond this offset are kept symbolic instead of
/// materializing absurdly large buffers.
pub const MAX_BYTES: u64 = (u32::MAX as u64) / 8;

fn from_bool(b: bool) -> W256 {
  if b {
    W256::one()
  } else {
    W256::zero()
  }
}

fn sign_abs(w: W256) -> (bool, W256) {
  if w.is_negative() {
    (true, -w)
  } else {
    (false, w)
  }
}

fn norm2<F, G>(l: Box<Expr>, r: Box<Expr>, f: F, g: G) -> Expr
where
  F: FnOnce(W256, W256) -> W256,
  G: FnOnce(Box<Expr>, Box<Expr>) -> Expr,
{
  match (maybe_lit_word(&l), maybe_lit_word(&r)) {
    (Some(a), Some(b)) => Expr::Lit(f(a, b)),
    _ => g(l, r),
  }
}

fn norm3<F, G>(x: Box<Expr>, y: Box<Expr>, z: Box<Expr>, f: F, g: G) -> Expr
where
  F: FnOnce(W256, W256, W256) -> W256,
  G: FnOnce(Box<Expr>, Box<Expr>, Box<Expr>) -> Expr,
{
  match (maybe_lit_word(&x), maybe_lit_word(&y), maybe_lit_word(&z)) {
    (Some(a), Some(b), Some(c)) => Expr::Lit(f(a, b, c)),
    _ => g(x, y, z),
  }
}

// 256-bit arithmetic ------------------------------------------------------------------------------

pub fn add(l: Box<Expr>, r: Box<Expr>) -> Expr {
  norm2(l, r, |a, b| a + b, Expr::Add)
}

pub fn sub(l: Box<Expr>, r: Box<Expr>) -> Expr {
  norm2(l, r, |a, b| a - b, Expr::Sub)
}

pub fn mul(l: Box<Expr>, r: Box<Expr>) -> Expr {
  norm2(l, r, |a, b| a * b, Expr::Mul)
}

pub fn div(l: Box<Expr>, r: Box<Expr>) -> Expr {
  norm2(l, r, |a, b| if b.is_zero() { W256::zero() } else { a / b }, Expr::Div)
}

pub fn sdiv(l: Box<Expr>, r: Box<Expr>) -> Expr {
  norm2(
    l,
    r,
    |a, b| {
      if b.is_zero() {
        W256::zero()
      } else {
        let (sa, va) = sign_abs(a);
        let (sb, vb) = sign_abs(b);
        let q = va / vb;
        if sa ^ sb {
          -q
        } else {
          q
        }
      }
    },
    Expr::SDiv,
  )
}

pub fn emod(l: Box<Expr>, r: Box<Expr>) -> Expr {
  norm2(l, r, |a, b| if b.is_zero() { W256::zero() } else { a % b }, Expr::Mod)
}

pub fn smod(l: Box<Expr>, r: Box<Expr>) -> Expr {
  norm2(
    l,
    r,
    |a, b| {
      if b.is_zero() {
        W256::zero()
      } else {
        let (sa, va) = sign_abs(a);
        let (_, vb) = sign_abs(b);
        let m = va % vb;
        if sa {
          -m
        } else {
          m
        }
      }
    },
    Expr::SMod,
  )
}

pub fn addmod(x: Box<Expr>, y: Box<Expr>, z: Box<Expr>) -> Expr {
  norm3(
    x,
    y,
    z,
    |a, b, c| if c.is_zero() { W256::zero() } else { (to_512(a) + to_512(b)) % c },
    Expr::AddMod,
  )
}

pub fn mulmod(x: Box<Expr>, y: Box<Expr>, z: Box<Expr>) -> Expr {
  norm3(x, y, z, |a, b, c| if c.is_zero() { W256::zero() } else { a.full_mul(b) % c }, Expr::MulMod)
}

pub fn exp(l: Box<Expr>, r: Box<Expr>) -> Expr {
  norm2(l, r, |a, b| a.pow(b), Expr::Exp)
}

/// SIGNEXTEND: extend the two's-complement sign of the byte at position
/// `bytes` (counted from the least significant end).
pub fn sex(bytes: Box<Expr>, x: Box<Expr>) -> Expr {
  norm2(
    bytes,
    x,
    |b, w| {
      if b >= W256(31, 0) {
        w
      } else {
        let bit = (b.0 as usize) * 8 + 7;
        let mask = (W256::one() << (bit + 1)) - W256::one();
        if w.bit(bit) {
          w | !mask
        } else {
          w & mask
        }
      }
    },
    Expr::SEx,
  )
}

pub fn emin(l: Box<Expr>, r: Box<Expr>) -> Expr {
  norm2(l, r, |a, b| if a < b { a } else { b }, Expr::Min)
}

pub fn emax(l: Box<Expr>, r: Box<Expr>) -> Expr {
  norm2(l, r, |a, b| if a > b { a } else { b }, Expr::Max)
}

// Comparisons (0/1 words) -------------------------------------------------------------------------

pub fn lt(l: Box<Expr>, r: Box<Expr>) -> Expr {
  norm2(l, r, |a, b| from_bool(a < b), Expr::LT)
}

pub fn gt(l: Box<Expr>, r: Box<Expr>) -> Expr {
  norm2(l, r, |a, b| from_bool(a > b), Expr::GT)
}

pub fn leq(l: Box<Expr>, r: Box<Expr>) -> Expr {
  norm2(l, r, |a, b| from_bool(a <= b), Expr::LEq)
}

pub fn geq(l: Box<Expr>, r: Box<Expr>) -> Expr {
  norm2(l, r, |a, b| from_bool(a >= b), Expr::GEq)
}

fn signed_lt(a: W256, b: W256) -> bool {
  match (a.is_negative(), b.is_negative()) {
    (true, false) => true,
    (false, true) => false,
    _ => a < b,
  }
}

pub fn slt(l: Box<Expr>, r: Box<Expr>) -> Expr {
  norm2(l, r, |a, b| from_bool(signed_lt(a, b)), Expr::SLT)
}

pub fn sgt(l: Box<Expr>, r: Box<Expr>) -> Expr {
  norm2(l, r, |a, b| from_bool(signed_lt(b, a)), Expr::SGT)
}

pub fn eq(l: Box<Expr>, r: Box<Expr>) -> Expr {
  norm2(l, r, |a, b| from_bool(a == b), Expr::Eq)
}

pub fn iszero(e: Box<Expr>) -> Expr {
  match maybe_lit_word(&e) {
    Some(a) => Expr::Lit(from_bool(a.is_zero())),
    None => Expr::IsZero(e),
  }
}

// Bit operations ----------------------------------------------------------------------------------

pub fn and(l: Box<Expr>, r: Box<Expr>) -> Expr {
  norm2(l, r, |a, b| a & b, Expr::And)
}

pub fn or(l: Box<Expr>, r: Box<Expr>) -> Expr {
  norm2(l, r, |a, b| a | b, Expr::Or)
}

pub fn xor(l: Box<Expr>, r: Box<Expr>) -> Expr {
  norm2(l, r, |a, b| a ^ b, Expr::Xor)
}

pub fn not(e: Box<Expr>) -> Expr {
  match maybe_lit_word(&e) {
    Some(a) => Expr::Lit(!a),
    None => Expr::Not(e),
  }
}

/// SHL: `value << shift`; first operand is the shift amount.
pub fn shl(shift: Box<Expr>, value: Box<Expr>) -> Expr {
  norm2(
    shift,
    value,
    |s, v| if s >= W256(256, 0) { W256::zero() } else { v << (s.0 as usize) },
    Expr::SHL,
  )
}

pub fn shr(shift: Box<Expr>, value: Box<Expr>) -> Expr {
  norm2(
    shift,
    value,
    |s, v| if s >= W256(256, 0) { W256::zero() } else { v >> (s.0 as usize) },
    Expr::SHR,
  )
}

/// Arithmetic right shift: fills with the sign bit.
pub fn sar(shift: Box<Expr>, value: Box<Expr>) -> Expr {
  norm2(
    shift,
    value,
    |s, v| {
      if !v.is_negative() {
        if s >= W256(256, 0) {
          W256::zero()
        } else {
          v >> (s.0 as usize)
        }
      } else if s >= W256(256, 0) {
        W256::max_value()
      } else if s.is_zero() {
        v
      } else {
        (v >> (s.0 as usize)) | (W256::max_value() << (256 - s.0 as usize))
      }
    },
    Expr::SAR,
  )
}

// Bit-pattern helpers -----------------------------------------------------------------------------

pub fn is_power_of_two(w: W256) -> bool {
  !w.is_zero() && (w & (w - W256::one())).is_zero()
}

pub fn count_leading_zeros(w: W256) -> u32 {
  w.leading_zeros()
}

/// True when the set bits of `w` span whole bytes.
pub fn is_byte_aligned(w: W256) -> bool {
  if w.is_zero() {
    return false;
  }
  let tz = w.trailing_zeros();
  tz % 8 == 0 && (w.bits() - tz) % 8 == 0
}

// Byte operations ---------------------------------------------------------------------------------

pub fn eq_byte(l: Box<Expr>, r: Box<Expr>) -> Expr {
  match (l.as_ref(), r.as_ref()) {
    (Expr::LitByte(a), Expr::LitByte(b)) => Expr::Lit(from_bool(a == b)),
    _ => Expr::EqByte(l, r),
  }
}

/// Big-endian composition of exactly 32 bytes into a word.
pub fn join_bytes(bytes: Vec<Expr>) -> Expr {
  if bytes.len() != 32 {
    internal_error("join_bytes: expected exactly 32 bytes");
  }
  let lits: Option<Vec<u8>> = bytes
    .iter()
    .map(|b| if let Expr::LitByte(x) = b { Some(*x) } else { None })
    .collect();
  match lits {
    Some(bs) => Expr::Lit(word256(&bs)),
    None => Expr::JoinBytes(bytes),
  }
}

/// The byte of `w` at index `i`, counted from the least significant end;
/// indices past 31 read zero. Sees through full and byte-aligned masks.
pub fn index_word(i: Box<Expr>, w: Box<Expr>) -> Expr {
  match (i.as_ref(), w.as_ref()) {
    (Expr::Lit(idx), Expr::And(mask, inner)) => match maybe_lit_word(mask) {
      Some(m) if m == W256::max_value() => index_word(i.clone(), inner.clone()),
      Some(m) if is_power_of_two(m + W256::one()) && is_byte_aligned(m) => {
        let covered = W256::from(m.bits() / 8);
        if *idx < covered {
          index_word(i.clone(), inner.clone())
        } else {
          Expr::LitByte(0)
        }
      }
      _ => Expr::IndexWord(i, w),
    },
    (Expr::Lit(idx), Expr::Lit(word)) => {
      if *idx < W256(32, 0) {
        Expr::LitByte(((*word >> (idx.0 as usize * 8)).0 & 0xff) as u8)
      } else {
        Expr::LitByte(0)
      }
    }
    (Expr::Lit(idx), Expr::JoinBytes(bytes)) => {
      if *idx < W256(32, 0) {
        bytes[31 - idx.0 as usize].clone()
      } else {
        Expr::LitByte(0)
      }
    }
    _ => Expr::IndexWord(i, w),
  }
}

/// A single byte lifted to a word (zero-extended).
pub fn pad_byte(b: Box<Expr>) -> Expr {
  match b.as_ref() {
    Expr::LitByte(x) => Expr::Lit(W256::from(*x)),
    _ => {
      let mut bytes = vec![Expr::LitByte(0); 31];
      bytes.push(*b);
      join_bytes(bytes)
    }
  }
}

// Buffers -----------------------------------------------------------------------------------------

/// Forces a buffer term to concrete bytes when it is built entirely from
/// concrete parts. Reads past a concrete buffer's end are zero.
pub fn to_concrete_buf(e: &Expr) -> Option<Vec<u8>> {
  match e {
    Expr::ConcreteBuf(bs) => Some(bs.clone()),
    Expr::WriteByte(off, byte, prev) => match (maybe_lit_word(off), byte.as_ref()) {
      (Some(o), Expr::LitByte(b)) if o < W256(MAX_BYTES as u128, 0) => {
        let mut buf = to_concrete_buf(prev)?;
        let o = o.to_usize()?;
        if buf.len() <= o {
          buf.resize(o + 1, 0);
        }
        buf[o] = *b;
        Some(buf)
      }
      _ => None,
    },
    Expr::WriteWord(off, val, prev) => match (maybe_lit_word(off), maybe_lit_word(val)) {
      (Some(o), Some(v)) if o < W256(MAX_BYTES as u128, 0) => {
        let mut buf = to_concrete_buf(prev)?;
        let o = o.to_usize()?;
        if buf.len() < o + 32 {
          buf.resize(o + 32, 0);
        }
        buf[o..o + 32].copy_from_slice(&word256_bytes(v));
        Some(buf)
      }
      _ => None,
    },
    Expr::CopySlice(s_off, d_off, size, src, dst) => {
      match (maybe_lit_word(s_off), maybe_lit_word(d_off), maybe_lit_word(size)) {
        (Some(s), Some(d), Some(n)) if d + n < W256(MAX_BYTES as u128, 0) => {
          let sbs = to_concrete_buf(src)?;
          let mut out = to_concrete_buf(dst)?;
          let (s, d, n) = (s.to_usize()?, d.to_usize()?, n.to_usize()?);
          if n == 0 {
            return Some(out);
          }
          if out.len() < d + n {
            out.resize(d + n, 0);
          }
          for k in 0..n {
            out[d + k] = sbs.get(s + k).copied().unwrap_or(0);
          }
          Some(out)
        }
        _ => None,
      }
    }
    _ => None,
  }
}

pub fn read_byte(i: Box<Expr>, buf: Box<Expr>) -> Expr {
  if let (Some(idx), Some(bs)) = (maybe_lit_word(&i), to_concrete_buf(&buf)) {
    let b = idx.to_usize().and_then(|n| bs.get(n).copied()).unwrap_or(0);
    return Expr::LitByte(b);
  }
  match (i.as_ref(), buf.as_ref()) {
    (Expr::Lit(idx), Expr::WriteByte(off, byte, prev)) => match maybe_lit_word(off) {
      Some(o) if o == *idx => *byte.clone(),
      Some(_) => read_byte(i.clone(), prev.clone()),
      None => Expr::ReadByte(i, buf),
    },
    (Expr::Lit(idx), Expr::WriteWord(off, _, prev)) => match maybe_lit_word(off) {
      // only read around the write when they provably do not overlap
      Some(o) if *idx < o || *idx >= o + W256(32, 0) => read_byte(i.clone(), prev.clone()),
      _ => Expr::ReadByte(i, buf),
    },
    (Expr::Lit(idx), Expr::CopySlice(s_off, d_off, size, src, dst)) => {
      match (maybe_lit_word(s_off), maybe_lit_word(d_off), maybe_lit_word(size)) {
        (Some(s), Some(d), Some(n)) => {
          if *idx >= d && *idx < d + n {
            read_byte(Box::new(Expr::Lit(*idx - d + s)), src.clone())
          } else {
            read_byte(i.clone(), dst.clone())
          }
        }
        _ => Expr::ReadByte(i, buf),
      }
    }
    _ => Expr::ReadByte(i, buf),
  }
}

/// The 32-byte big-endian word at offset `i`.
pub fn read_word(i: Box<Expr>, buf: Box<Expr>) -> Expr {
  if let (Some(idx), Some(bs)) = (maybe_lit_word(&i), to_concrete_buf(&buf)) {
    if let Some(n) = idx.to_usize() {
      let word: Vec<u8> = (n..n + 32).map(|k| bs.get(k).copied().unwrap_or(0)).collect();
      return Expr::Lit(word256(&word));
    }
  }
  if let Expr::WriteWord(off, val, prev) = buf.as_ref() {
    if *off == i {
      return *val.clone();
    }
    if let (Some(idx), Some(o)) = (maybe_lit_word(&i), maybe_lit_word(off)) {
      if idx + W256(32, 0) <= o || idx >= o + W256(32, 0) {
        return read_word(i, prev.clone());
      }
    }
  }
  Expr::ReadWord(i, buf)
}

pub fn write_byte(offset: Box<Expr>, byte: Box<Expr>, src: Box<Expr>) -> Expr {
  let candidate = Expr::WriteByte(offset, byte, src);
  match to_concrete_buf(&candidate) {
    Some(bs) => Expr::ConcreteBuf(bs),
    None => candidate,
  }
}

pub fn write_word(offset: Box<Expr>, value: Box<Expr>, buf: Box<Expr>) -> Expr {
  let candidate = Expr::WriteWord(offset, value, buf);
  match to_concrete_buf(&candidate) {
    Some(bs) => Expr::ConcreteBuf(bs),
    None => candidate,
  }
}

/// Copy `size` bytes of `src` starting at `src_offset` over `dst` starting at
/// `dst_offset`. Bytes of `dst` outside the written window are preserved.
pub fn copy_slice(src_offset: Box<Expr>, dst_offset: Box<Expr>, size: Box<Expr>, src: Box<Expr>, dst: Box<Expr>) -> Expr {
  if let Some(n) = maybe_lit_word(&size) {
    if n.is_zero() {
      return *dst;
    }
  }
  let candidate = Expr::CopySlice(src_offset, dst_offset, size, src, dst);
  match to_concrete_buf(&candidate) {
    Some(bs) => Expr::ConcreteBuf(bs),
    None => candidate,
  }
}

/// The logical length of a buffer: one past the highest written index.
pub fn buf_length(buf: Box<Expr>) -> Expr {
  match to_concrete_buf(&buf) {
    Some(bs) => Expr::Lit(W256::from(bs.len())),
    None => Expr::BufLength(buf),
  }
}

/// Build a buffer from an indexed byte sequence; fully concrete sequences
/// collapse to a `ConcreteBuf`.
pub fn from_list(bytes: Vec<Expr>) -> Expr {
  let lits: Option<Vec<u8>> = bytes
    .iter()
    .map(|b| if let Expr::LitByte(x) = b { Some(*x) } else { None })
    .collect();
  match lits {
    Some(bs) => Expr::ConcreteBuf(bs),
    None => bytes
      .into_iter()
      .enumerate()
      .fold(Expr::ConcreteBuf(Vec::new()), |acc, (i, b)| {
        write_byte(Box::new(Expr::Lit(W256::from(i))), Box::new(b), Box::new(acc))
      }),
  }
}

// Storage -----------------------------------------------------------------------------------------

pub fn read_storage(key: Box<Expr>, store: Box<Expr>) -> Expr {
  match (key.as_ref(), store.as_ref()) {
    (Expr::Lit(k), Expr::ConcreteStore(m)) => Expr::Lit(m.get(k).copied().unwrap_or_else(W256::zero)),
    (_, Expr::SStore(k2, v, prev)) => {
      if **k2 == *key {
        *v.clone()
      } else if let (Some(a), Some(b)) = (maybe_lit_word(&key), maybe_lit_word(k2)) {
        if a != b {
          read_storage(key, prev.clone())
        } else {
          Expr::SLoad(key, store)
        }
      } else {
        Expr::SLoad(key, store)
      }
    }
    _ => Expr::SLoad(key, store),
  }
}

pub fn write_storage(key: Box<Expr>, value: Box<Expr>, store: Box<Expr>) -> Expr {
  match (key.as_ref(), value.as_ref(), store.as_ref()) {
    (Expr::Lit(k), Expr::Lit(v), Expr::ConcreteStore(m)) => {
      let mut m = m.clone();
      m.insert(*k, *v);
      Expr::ConcreteStore(m)
    }
    _ => Expr::SStore(key, value, store),
  }
}

// Range constraints -------------------------------------------------------------------------------

/// `0 <= e <= 2^sz - 1` as a proposition.
pub fn in_range(sz: u32, e: Expr) -> Prop {
  let top = (W256::one() << sz as usize) - W256::one();
  Prop::PAnd(
    Box::new(Prop::PGEq(e.clone(), Expr::Lit(W256::zero()))),
    Box::new(Prop::PLEq(e, Expr::Lit(top))),
  )
}
