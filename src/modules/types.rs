use byteorder::{BigEndian, ByteOrder};
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt;
use std::fmt::Debug;
use std::str::FromStr;
use thiserror::Error;

use crate::modules::feeschedule::FeeSchedule;

pub type Word64 = u64;
pub type ByteString = Vec<u8>;
pub type FunctionSelector = u32;
pub type Nibble = u8;

// Fixed-width numerics ----------------------------------------------------------------------------

/// Unsigned 256-bit word as a little-endian pair of 128-bit limbs: `W256(lo, hi)`.
/// All arithmetic wraps modulo 2^256.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct W256(pub u128, pub u128);

/// Unsigned 64-bit word with hex JSON form. Used for account nonces.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct W64(pub u64);

/// 160-bit account address as a little-endian limb pair: `Addr(lo, hi)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Addr(pub u128, pub u32);

/// Unsigned 512-bit word, `Word512(lo, hi)`. Only used for the full-width
/// intermediates of ADDMOD and MULMOD.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Word512(pub W256, pub W256);

impl W256 {
  pub fn zero() -> Self {
    W256(0, 0)
  }

  pub fn one() -> Self {
    W256(1, 0)
  }

  pub fn max_value() -> Self {
    W256(u128::MAX, u128::MAX)
  }

  pub fn is_zero(&self) -> bool {
    self.0 == 0 && self.1 == 0
  }

  fn to_limbs(self) -> [u64; 4] {
    [self.0 as u64, (self.0 >> 64) as u64, self.1 as u64, (self.1 >> 64) as u64]
  }

  fn from_limbs(l: [u64; 4]) -> Self {
    W256((l[0] as u128) | ((l[1] as u128) << 64), (l[2] as u128) | ((l[3] as u128) << 64))
  }

  /// Big-endian parse of up to 32 bytes, left-padded with zeros. Longer
  /// inputs keep their low-order 32 bytes.
  pub fn from_bytes(bs: Vec<u8>) -> Self {
    let tail = if bs.len() > 32 { bs[bs.len() - 32..].to_vec() } else { bs };
    let padded = pad_left(32, tail);
    W256(BigEndian::read_u128(&padded[16..32]), BigEndian::read_u128(&padded[0..16]))
  }

  pub fn to_bytes(self) -> [u8; 32] {
    let mut out = [0u8; 32];
    BigEndian::write_u128(&mut out[0..16], self.1);
    BigEndian::write_u128(&mut out[16..32], self.0);
    out
  }

  /// Minimal lowercase hex, no `0x` prefix.
  pub fn to_hex(self) -> String {
    if self.1 == 0 {
      format!("{:x}", self.0)
    } else {
      format!("{:x}{:032x}", self.1, self.0)
    }
  }

  pub fn to_decimal(self) -> String {
    if self.is_zero() {
      return "0".to_string();
    }
    let ten = W256(10, 0);
    let mut digits = Vec::new();
    let mut n = self;
    while !n.is_zero() {
      let (q, r) = n.div_rem(ten);
      digits.push(std::char::from_digit(r.0 as u32, 10).unwrap_or('0'));
      n = q;
    }
    digits.iter().rev().collect()
  }

  /// Hex parse with optional `0x` prefix; a bare `"0x"` denotes zero.
  pub fn from_hex(s: &str) -> Option<Self> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.is_empty() {
      return Some(W256::zero());
    }
    if s.len() > 64 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
      return None;
    }
    if s.len() <= 32 {
      u128::from_str_radix(s, 16).ok().map(|lo| W256(lo, 0))
    } else {
      let split = s.len() - 32;
      let hi = u128::from_str_radix(&s[..split], 16).ok()?;
      let lo = u128::from_str_radix(&s[split..], 16).ok()?;
      Some(W256(lo, hi))
    }
  }

  pub fn to_u64(self) -> Option<u64> {
    if self.1 == 0 && self.0 <= u64::MAX as u128 {
      Some(self.0 as u64)
    } else {
      None
    }
  }

  pub fn to_usize(self) -> Option<usize> {
    self.to_u64().and_then(|n| usize::try_from(n).ok())
  }

  pub fn bit(&self, i: usize) -> bool {
    if i < 128 {
      (self.0 >> i) & 1 == 1
    } else if i < 256 {
      (self.1 >> (i - 128)) & 1 == 1
    } else {
      false
    }
  }

  /// Number of significant bits.
  pub fn bits(&self) -> u32 {
    256 - self.leading_zeros()
  }

  pub fn leading_zeros(&self) -> u32 {
    if self.1 != 0 {
      self.1.leading_zeros()
    } else {
      128 + self.0.leading_zeros()
    }
  }

  pub fn trailing_zeros(&self) -> u32 {
    if self.0 != 0 {
      self.0.trailing_zeros()
    } else if self.1 != 0 {
      128 + self.1.trailing_zeros()
    } else {
      256
    }
  }

  /// Bytes needed for the minimal big-endian representation.
  pub fn byte_len(&self) -> u64 {
    ((self.bits() + 7) / 8) as u64
  }

  pub fn is_negative(&self) -> bool {
    self.bit(255)
  }

  pub fn full_mul(self, rhs: W256) -> Word512 {
    let a = self.to_limbs();
    let b = rhs.to_limbs();
    let mut out = [0u64; 8];
    for i in 0..4 {
      let mut carry: u128 = 0;
      for j in 0..4 {
        let cur = out[i + j] as u128 + (a[i] as u128) * (b[j] as u128) + carry;
        out[i + j] = cur as u64;
        carry = cur >> 64;
      }
      out[i + 4] = carry as u64;
    }
    Word512(
      W256::from_limbs([out[0], out[1], out[2], out[3]]),
      W256::from_limbs([out[4], out[5], out[6], out[7]]),
    )
  }

  pub fn div_rem(self, rhs: W256) -> (W256, W256) {
    if rhs.is_zero() {
      internal_error("W256 division by zero");
    }
    if self < rhs {
      return (W256::zero(), self);
    }
    let mut q = W256::zero();
    let mut r = W256::zero();
    for i in (0..self.bits() as usize).rev() {
      r = r << 1;
      if self.bit(i) {
        r = r | W256::one();
      }
      if r >= rhs {
        r = r - rhs;
        q = q | (W256::one() << i);
      }
    }
    (q, r)
  }

  /// Wrapping exponentiation by squaring.
  pub fn pow(self, exp: W256) -> W256 {
    let mut base = self;
    let mut acc = W256::one();
    for i in 0..exp.bits() as usize {
      if exp.bit(i) {
        acc = acc * base;
      }
      base = base * base;
    }
    acc
  }
}

impl PartialOrd for W256 {
  fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for W256 {
  fn cmp(&self, other: &Self) -> std::cmp::Ordering {
    (self.1, self.0).cmp(&(other.1, other.0))
  }
}

impl std::ops::Add for W256 {
  type Output = W256;
  fn add(self, rhs: W256) -> W256 {
    let (lo, carry) = self.0.overflowing_add(rhs.0);
    W256(lo, self.1.wrapping_add(rhs.1).wrapping_add(carry as u128))
  }
}

impl std::ops::Sub for W256 {
  type Output = W256;
  fn sub(self, rhs: W256) -> W256 {
    let (lo, borrow) = self.0.overflowing_sub(rhs.0);
    W256(lo, self.1.wrapping_sub(rhs.1).wrapping_sub(borrow as u128))
  }
}

impl std::ops::Mul for W256 {
  type Output = W256;
  fn mul(self, rhs: W256) -> W256 {
    self.full_mul(rhs).0
  }
}

impl std::ops::Div for W256 {
  type Output = W256;
  fn div(self, rhs: W256) -> W256 {
    self.div_rem(rhs).0
  }
}

impl std::ops::Rem for W256 {
  type Output = W256;
  fn rem(self, rhs: W256) -> W256 {
    self.div_rem(rhs).1
  }
}

impl std::ops::Neg for W256 {
  type Output = W256;
  fn neg(self) -> W256 {
    (!self) + W256::one()
  }
}

impl std::ops::BitAnd for W256 {
  type Output = W256;
  fn bitand(self, rhs: W256) -> W256 {
    W256(self.0 & rhs.0, self.1 & rhs.1)
  }
}

impl std::ops::BitOr for W256 {
  type Output = W256;
  fn bitor(self, rhs: W256) -> W256 {
    W256(self.0 | rhs.0, self.1 | rhs.1)
  }
}

impl std::ops::BitXor for W256 {
  type Output = W256;
  fn bitxor(self, rhs: W256) -> W256 {
    W256(self.0 ^ rhs.0, self.1 ^ rhs.1)
  }
}

impl std::ops::Not for W256 {
  type Output = W256;
  fn not(self) -> W256 {
    W256(!self.0, !self.1)
  }
}

impl std::ops::Shl<usize> for W256 {
  type Output = W256;
  fn shl(self, n: usize) -> W256 {
    if n == 0 {
      self
    } else if n >= 256 {
      W256::zero()
    } else if n >= 128 {
      W256(0, self.0 << (n - 128))
    } else {
      W256(self.0 << n, (self.1 << n) | (self.0 >> (128 - n)))
    }
  }
}

impl std::ops::Shr<usize> for W256 {
  type Output = W256;
  fn shr(self, n: usize) -> W256 {
    if n == 0 {
      self
    } else if n >= 256 {
      W256::zero()
    } else if n >= 128 {
      W256(self.1 >> (n - 128), 0)
    } else {
      W256((self.0 >> n) | (self.1 << (128 - n)), self.1 >> n)
    }
  }
}

impl Zero for W256 {
  fn zero() -> Self {
    W256::zero()
  }
  fn is_zero(&self) -> bool {
    W256::is_zero(self)
  }
}

impl One for W256 {
  fn one() -> Self {
    W256::one()
  }
}

impl From<u8> for W256 {
  fn from(x: u8) -> Self {
    W256(x as u128, 0)
  }
}

impl From<u32> for W256 {
  fn from(x: u32) -> Self {
    W256(x as u128, 0)
  }
}

impl From<u64> for W256 {
  fn from(x: u64) -> Self {
    W256(x as u128, 0)
  }
}

impl From<u128> for W256 {
  fn from(x: u128) -> Self {
    W256(x, 0)
  }
}

impl From<usize> for W256 {
  fn from(x: usize) -> Self {
    W256(x as u128, 0)
  }
}

impl From<W64> for W256 {
  fn from(x: W64) -> Self {
    W256(x.0 as u128, 0)
  }
}

impl From<Addr> for W256 {
  fn from(a: Addr) -> Self {
    W256(a.0, a.1 as u128)
  }
}

impl fmt::Display for W256 {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "0x{}", self.to_hex())
  }
}

impl fmt::Debug for W256 {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "0x{}", self.to_hex())
  }
}

impl FromStr for W256 {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    W256::from_hex(s).ok_or_else(|| format!("invalid hex word: {}", s))
  }
}

impl Serialize for W256 {
  fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format!("0x{:032x}{:032x}", self.1, self.0))
  }
}

impl<'de> Deserialize<'de> for W256 {
  fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    let s = String::deserialize(d)?;
    W256::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid hex word: {}", s)))
  }
}

impl W64 {
  pub fn to_hex(self) -> String {
    format!("{:x}", self.0)
  }
}

impl From<u64> for W64 {
  fn from(x: u64) -> Self {
    W64(x)
  }
}

impl TryFrom<W256> for W64 {
  type Error = EvmError;
  fn try_from(w: W256) -> Result<Self, Self::Error> {
    w.to_u64().map(W64).ok_or(EvmError::IllegalOverflow)
  }
}

impl fmt::Display for W64 {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "0x{:x}", self.0)
  }
}

impl fmt::Debug for W64 {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "0x{:x}", self.0)
  }
}

impl Serialize for W64 {
  fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format!("0x{:x}", self.0))
  }
}

impl<'de> Deserialize<'de> for W64 {
  fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    let s = String::deserialize(d)?;
    let t = s.strip_prefix("0x").unwrap_or(&s);
    if t.is_empty() {
      return Ok(W64(0));
    }
    u64::from_str_radix(t, 16).map(W64).map_err(|_| serde::de::Error::custom(format!("invalid hex word: {}", s)))
  }
}

impl Addr {
  pub fn zero() -> Self {
    Addr(0, 0)
  }

  /// Lowercase hex, zero-padded to 40 nibbles, no prefix.
  pub fn to_hex(self) -> String {
    format!("{:08x}{:032x}", self.1, self.0)
  }

  pub fn from_hex(s: &str) -> Option<Self> {
    let w = W256::from_hex(s)?;
    Addr::try_from(w).ok()
  }
}

impl PartialOrd for Addr {
  fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Addr {
  fn cmp(&self, other: &Self) -> std::cmp::Ordering {
    (self.1, self.0).cmp(&(other.1, other.0))
  }
}

impl From<u64> for Addr {
  fn from(x: u64) -> Self {
    Addr(x as u128, 0)
  }
}

impl TryFrom<W256> for Addr {
  type Error = EvmError;
  fn try_from(w: W256) -> Result<Self, Self::Error> {
    if w.1 >> 32 == 0 {
      Ok(Addr(w.0, w.1 as u32))
    } else {
      Err(EvmError::IllegalOverflow)
    }
  }
}

impl FromStr for Addr {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Addr::from_hex(s).ok_or_else(|| format!("invalid address: {}", s))
  }
}

impl Serialize for Addr {
  fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format!("0x{}", self.to_hex()))
  }
}

impl<'de> Deserialize<'de> for Addr {
  fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    let s = String::deserialize(d)?;
    Addr::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid address: {}", s)))
  }
}

/// Wrapping truncation of a word to its low 160 bits.
pub fn truncate_to_addr(w: W256) -> Addr {
  Addr(w.0, (w.1 & 0xffffffff) as u32)
}

impl Word512 {
  pub fn zero() -> Self {
    Word512(W256::zero(), W256::zero())
  }

  pub fn bit(&self, i: usize) -> bool {
    if i < 256 {
      self.0.bit(i)
    } else {
      self.1.bit(i - 256)
    }
  }

  pub fn bits(&self) -> u32 {
    if self.1.is_zero() {
      self.0.bits()
    } else {
      256 + self.1.bits()
    }
  }
}

impl std::ops::Add for Word512 {
  type Output = Word512;
  fn add(self, rhs: Word512) -> Word512 {
    let lo = self.0 + rhs.0;
    let carry = if lo < self.0 { W256::one() } else { W256::zero() };
    Word512(lo, self.1 + rhs.1 + carry)
  }
}

impl std::ops::Rem<W256> for Word512 {
  type Output = W256;
  fn rem(self, rhs: W256) -> W256 {
    if rhs.is_zero() {
      internal_error("Word512 remainder by zero");
    }
    let mut r = W256::zero();
    for i in (0..self.bits() as usize).rev() {
      let carry = r.bit(255);
      r = r << 1;
      if self.bit(i) {
        r = r | W256::one();
      }
      if carry || r >= rhs {
        r = r - rhs;
      }
    }
    r
  }
}

impl fmt::Debug for Word512 {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.1.is_zero() {
      write!(f, "0x{}", self.0.to_hex())
    } else {
      write!(f, "0x{}{:0>64}", self.1.to_hex(), self.0.to_hex())
    }
  }
}

/// Zero-extension into the ADDMOD/MULMOD intermediate width.
pub fn to_512(w: W256) -> Word512 {
  Word512(w, W256::zero())
}

/// Truncation back to the low 256 bits.
pub fn from_512(w: Word512) -> W256 {
  w.0
}

// Byte utilities ----------------------------------------------------------------------------------

pub fn pad_left(size: usize, mut bs: Vec<u8>) -> Vec<u8> {
  if bs.len() >= size {
    return bs;
  }
  let mut out = vec![0; size - bs.len()];
  out.append(&mut bs);
  out
}

pub fn pad_right(size: usize, mut bs: Vec<u8>) -> Vec<u8> {
  if bs.len() < size {
    bs.resize(size, 0);
  }
  bs
}

/// Big-endian word parse; the single-byte case is the hot path.
pub fn word256(bs: &[u8]) -> W256 {
  match bs {
    [b] => W256(*b as u128, 0),
    _ => W256::from_bytes(bs.to_vec()),
  }
}

pub fn word256_bytes(w: W256) -> Vec<u8> {
  w.to_bytes().to_vec()
}

pub fn word160_bytes(a: Addr) -> Vec<u8> {
  let mut out = vec![0u8; 20];
  BigEndian::write_u32(&mut out[0..4], a.1);
  BigEndian::write_u128(&mut out[4..20], a.0);
  out
}

/// Minimal big-endian representation; `as_be(0) = []`.
pub fn as_be(w: W256) -> Vec<u8> {
  let skip = 32 - w.byte_len() as usize;
  w.to_bytes()[skip..].to_vec()
}

pub fn from_be(bs: &[u8]) -> W256 {
  word256(bs)
}

/// Big-endian packing of up to four bytes into a 32-bit word.
pub fn word32(xs: &[u8]) -> u32 {
  xs.iter().fold(0u32, |acc, &x| (acc << 8) | x as u32)
}

pub fn hi(b: u8) -> Nibble {
  b >> 4
}

pub fn lo(b: u8) -> Nibble {
  b & 0x0f
}

pub fn to_byte(h: Nibble, l: Nibble) -> u8 {
  (h << 4) | (l & 0x0f)
}

pub fn unpack_nibbles(bs: &[u8]) -> Vec<Nibble> {
  bs.iter().flat_map(|&b| [hi(b), lo(b)]).collect()
}

/// Inverse of `unpack_nibbles`; the input length must be even.
pub fn pack_nibbles(ns: &[Nibble]) -> Vec<u8> {
  if ns.len() % 2 != 0 {
    internal_error("pack_nibbles: odd length");
  }
  ns.chunks(2).map(|p| to_byte(p[0], p[1])).collect()
}

/// Byte string with a `0x`-hex JSON form.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ByteStringS(pub Vec<u8>);

impl fmt::Display for ByteStringS {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "0x{}", hex::encode(&self.0))
  }
}

impl Serialize for ByteStringS {
  fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format!("0x{}", hex::encode(&self.0)))
  }
}

impl<'de> Deserialize<'de> for ByteStringS {
  fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    let s = String::deserialize(d)?;
    let t = s.strip_prefix("0x").unwrap_or(&s);
    hex::decode(t).map(ByteStringS).map_err(|_| serde::de::Error::custom(format!("invalid hex bytes: {}", s)))
  }
}

/// Fatal invariant violation; never represents an EVM-level failure.
pub fn internal_error(msg: &str) -> ! {
  log::error!("internal error: {}", msg);
  panic!("internal error: {}", msg);
}

// Serde helpers for expression-keyed maps (JSON object keys must be strings) ----------------------

pub mod pair_seq {
  use serde::{Deserialize, Deserializer, Serialize, Serializer};
  use std::collections::BTreeMap;

  pub fn serialize<K: Serialize + Ord, V: Serialize, S: Serializer>(
    m: &BTreeMap<K, V>,
    s: S,
  ) -> Result<S::Ok, S::Error> {
    s.collect_seq(m.iter())
  }

  pub fn deserialize<'de, K, V, D>(d: D) -> Result<BTreeMap<K, V>, D::Error>
  where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
    D: Deserializer<'de>,
  {
    let pairs: Vec<(K, V)> = Vec::deserialize(d)?;
    Ok(pairs.into_iter().collect())
  }
}

pub mod hash_pair_seq {
  use serde::{Deserialize, Deserializer, Serialize, Serializer};
  use std::collections::HashMap;
  use std::hash::Hash;

  pub fn serialize<K: Serialize, V: Serialize, S: Serializer>(m: &HashMap<K, V>, s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(m.iter())
  }

  pub fn deserialize<'de, K, V, D>(d: D) -> Result<HashMap<K, V>, D::Error>
  where
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
    D: Deserializer<'de>,
  {
    let pairs: Vec<(K, V)> = Vec::deserialize(d)?;
    Ok(pairs.into_iter().collect())
  }
}

// Symbolic IR -------------------------------------------------------------------------------------

/// Variables referring to a global environment, introduced by
/// common-subexpression elimination.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GVar {
  BufVar(i32),
  StoreVar(i32),
}

impl fmt::Display for GVar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GVar::BufVar(n) => write!(f, "BufVar({})", n),
      GVar::StoreVar(n) => write!(f, "StoreVar({})", n),
    }
  }
}

pub type StorageMap = BTreeMap<W256, W256>;
pub type ExprExprMap = BTreeMap<Expr, Expr>;
pub type ExprContractMap = BTreeMap<Expr, Contract>;

/// The symbolic expression language. Every constructor belongs to exactly one
/// sort (see `etypes::sort_of`); smart constructors in `expr` keep concrete
/// results in the smallest constructor (`Lit`, `LitByte`, `ConcreteBuf`,
/// `ConcreteStore`). A buffer is logically 2^256 bytes: a `ConcreteBuf` reads
/// zero past its end, an `AbstractBuf` reads symbolic bytes everywhere.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Expr {
  // literals & variables
  Lit(W256),
  Var(String),
  GVar(GVar),

  // bytes
  LitByte(u8),
  IndexWord(Box<Expr>, Box<Expr>),
  EqByte(Box<Expr>, Box<Expr>),
  JoinBytes(Vec<Expr>),

  // terminal execution states
  Partial(Vec<Prop>, TraceContext, PartialExec),
  Failure(Vec<Prop>, TraceContext, EvmError),
  Success(Vec<Prop>, TraceContext, Box<Expr>, #[serde(with = "pair_seq")] ExprExprMap),
  ITE(Box<Expr>, Box<Expr>, Box<Expr>),

  // integers
  Add(Box<Expr>, Box<Expr>),
  Sub(Box<Expr>, Box<Expr>),
  Mul(Box<Expr>, Box<Expr>),
  Div(Box<Expr>, Box<Expr>),
  SDiv(Box<Expr>, Box<Expr>),
  Mod(Box<Expr>, Box<Expr>),
  SMod(Box<Expr>, Box<Expr>),
  AddMod(Box<Expr>, Box<Expr>, Box<Expr>),
  MulMod(Box<Expr>, Box<Expr>, Box<Expr>),
  Exp(Box<Expr>, Box<Expr>),
  SEx(Box<Expr>, Box<Expr>),
  Min(Box<Expr>, Box<Expr>),
  Max(Box<Expr>, Box<Expr>),

  // booleans
  LT(Box<Expr>, Box<Expr>),
  GT(Box<Expr>, Box<Expr>),
  LEq(Box<Expr>, Box<Expr>),
  GEq(Box<Expr>, Box<Expr>),
  SLT(Box<Expr>, Box<Expr>),
  SGT(Box<Expr>, Box<Expr>),
  Eq(Box<Expr>, Box<Expr>),
  IsZero(Box<Expr>),

  // bits
  And(Box<Expr>, Box<Expr>),
  Or(Box<Expr>, Box<Expr>),
  Xor(Box<Expr>, Box<Expr>),
  Not(Box<Expr>),
  SHL(Box<Expr>, Box<Expr>),
  SHR(Box<Expr>, Box<Expr>),
  SAR(Box<Expr>, Box<Expr>),

  // hashes
  Keccak(Box<Expr>),
  SHA256(Box<Expr>),

  // block context
  Origin,
  Coinbase,
  Timestamp,
  BlockNumber,
  PrevRandao,
  GasLimit,
  ChainId,
  BaseFee,
  BlockHash(Box<Expr>),
  TxValue,

  // frame context
  Balance(Box<Expr>),
  Gas(i32),
  CodeSize(Box<Expr>),
  CodeHash(Box<Expr>),

  // addresses
  SymAddr(String),
  LitAddr(Addr),
  WAddr(Box<Expr>),

  // buffers
  ConcreteBuf(Vec<u8>),
  AbstractBuf(String),
  ReadWord(Box<Expr>, Box<Expr>),
  ReadByte(Box<Expr>, Box<Expr>),
  WriteWord(Box<Expr>, Box<Expr>, Box<Expr>),
  WriteByte(Box<Expr>, Box<Expr>, Box<Expr>),
  CopySlice(Box<Expr>, Box<Expr>, Box<Expr>, Box<Expr>, Box<Expr>),
  BufLength(Box<Expr>),

  // storage
  ConcreteStore(StorageMap),
  AbstractStore(Box<Expr>, Option<W256>),
  SLoad(Box<Expr>, Box<Expr>),
  SStore(Box<Expr>, Box<Expr>, Box<Expr>),

  // logs
  LogEntry(Box<Expr>, Box<Expr>, Vec<Expr>),

  // reduced contract view
  C {
    code: ContractCode,
    storage: Box<Expr>,
    t_storage: Box<Expr>,
    balance: Box<Expr>,
    nonce: Option<W64>,
  },
}

impl fmt::Display for Expr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?}", self)
  }
}

// Pattern extraction helpers. All total: `None` simply means "not concrete".

pub fn maybe_lit_byte(b: &Expr) -> Option<u8> {
  if let Expr::LitByte(x) = b {
    Some(*x)
  } else {
    None
  }
}

pub fn maybe_lit_word(w: &Expr) -> Option<W256> {
  match w {
    Expr::Lit(x) => Some(*x),
    Expr::WAddr(a) => match a.as_ref() {
      Expr::LitAddr(x) => Some(W256::from(*x)),
      _ => None,
    },
    _ => None,
  }
}

pub fn maybe_lit_addr(a: &Expr) -> Option<Addr> {
  if let Expr::LitAddr(x) = a {
    Some(*x)
  } else {
    None
  }
}

pub fn maybe_concrete_store(s: &Expr) -> Option<StorageMap> {
  if let Expr::ConcreteStore(m) = s {
    Some(m.clone())
  } else {
    None
  }
}

// Propositions ------------------------------------------------------------------------------------

/// The path-constraint language: a boolean algebra over `Expr` with
/// sort-preserving equality.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Prop {
  PEq(Expr, Expr),
  PLT(Expr, Expr),
  PGT(Expr, Expr),
  PGEq(Expr, Expr),
  PLEq(Expr, Expr),
  PNeg(Box<Prop>),
  PAnd(Box<Prop>, Box<Prop>),
  POr(Box<Prop>, Box<Prop>),
  PImpl(Box<Prop>, Box<Prop>),
  PBool(bool),
}

pub fn pand(ps: Vec<Prop>) -> Prop {
  ps.into_iter().fold(Prop::PBool(true), |acc, p| Prop::PAnd(Box::new(acc), Box::new(p)))
}

pub fn por(ps: Vec<Prop>) -> Prop {
  ps.into_iter().fold(Prop::PBool(false), |acc, p| Prop::POr(Box::new(acc), Box::new(p)))
}

// Errors ------------------------------------------------------------------------------------------

/// EVM-level failures. These are values: they surface as
/// `VMResult::VMFailure` and unwind the current frame, never as panics.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Error, Serialize, Deserialize)]
pub enum EvmError {
  #[error("balance too low: have {0}, need {1}")]
  BalanceTooLow(Box<Expr>, Box<Expr>),
  #[error("unrecognized opcode: {0:#04x}")]
  UnrecognizedOpcode(u8),
  #[error("self destruction")]
  SelfDestruction,
  #[error("stack underrun")]
  StackUnderrun,
  #[error("bad jump destination")]
  BadJumpDestination,
  #[error("revert: {0}")]
  Revert(Box<Expr>),
  #[error("out of gas: have {0}, need {1}")]
  OutOfGas(u64, u64),
  #[error("stack limit exceeded")]
  StackLimitExceeded,
  #[error("illegal overflow")]
  IllegalOverflow,
  #[error("state change while static")]
  StateChangeWhileStatic,
  #[error("invalid memory access")]
  InvalidMemoryAccess,
  #[error("call depth limit reached")]
  CallDepthLimitReached,
  #[error("max code size exceeded: limit {0}, got {1}")]
  MaxCodeSizeExceeded(W256, W256),
  #[error("max init code size exceeded: limit {0}, got {1}")]
  MaxInitCodeSizeExceeded(W256, Box<Expr>),
  #[error("invalid format")]
  InvalidFormat,
  #[error("precompile failure")]
  PrecompileFailure,
  #[error("return data out of bounds")]
  ReturnDataOutOfBounds,
  #[error("nonce overflow")]
  NonceOverflow,
  #[error("bad cheat code: {0:#010x}")]
  BadCheatCode(FunctionSelector),
  #[error("nonexistent fork: {0}")]
  NonexistentFork(i32),
}

/// Reasons symbolic execution may halt before reaching an end state.
/// Constraints gathered so far stay attached to the resulting `Partial` node.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Error, Serialize, Deserialize)]
pub enum PartialExec {
  #[error("unexpected symbolic argument at pc {pc}: {msg}")]
  UnexpectedSymbolicArg { pc: usize, msg: String, args: Vec<Expr> },
  #[error("max iterations reached at pc {pc}")]
  MaxIterationsReached { pc: usize, addr: Box<Expr> },
  #[error("jump into symbolic code at pc {pc}")]
  JumpIntoSymbolicCode { pc: usize, jump_dst: usize },
}

// Bytecode ----------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContractCode {
  /// Nothing is known about the code at this address.
  UnknownCode(Box<Expr>),
  /// Constructor code plus an abstract data section for ABI-encoded
  /// constructor arguments.
  InitCode(Vec<u8>, Box<Expr>),
  RuntimeCode(RuntimeCodeStruct),
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuntimeCodeStruct {
  ConcreteRuntimeCode(Vec<u8>),
  /// Concrete opcodes interleaved with symbolic pushdata (e.g. Solidity
  /// immutables before deployment writes them).
  SymbolicRuntimeCode(Vec<Expr>),
}

// Traces ------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TraceData {
  EventTrace(Expr, Expr, Vec<Expr>),
  FrameTrace(FrameContext),
  ErrorTrace(EvmError),
  EntryTrace(String),
  ReturnTrace(Expr, FrameContext),
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Trace {
  pub op_ix: usize,
  pub contract: Contract,
  pub tracedata: TraceData,
}

/// Snapshot of the trace state embedded in terminal expressions.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TraceContext {
  pub traces: Vec<Tree<Trace>>,
  #[serde(with = "pair_seq")]
  pub contracts: ExprContractMap,
  pub labels: BTreeMap<Addr, String>,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tree<T> {
  pub value: T,
  pub children: Vec<Tree<T>>,
}

/// Rose-tree zipper with a hole-shaped cursor: `level` holds the completed
/// siblings at the cursor's depth, `parents` the stack of open nodes above it
/// together with the siblings laid down before each of them. All operations
/// are O(1) except snapshotting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeZipper<T> {
  level: Vec<Tree<T>>,
  parents: Vec<(T, Vec<Tree<T>>)>,
}

impl<T: Clone> TreeZipper<T> {
  pub fn new() -> Self {
    TreeZipper { level: Vec::new(), parents: Vec::new() }
  }

  /// Append a leaf at the cursor; the cursor stays after it.
  pub fn insert_leaf(&mut self, value: T) {
    self.level.push(Tree { value, children: Vec::new() });
  }

  /// Append a node at the cursor and descend into its (empty) children.
  pub fn push_child(&mut self, value: T) {
    let before = std::mem::take(&mut self.level);
    self.parents.push((value, before));
  }

  /// Close the innermost open node and move the cursor after it. Returns
  /// false at the root.
  pub fn ascend(&mut self) -> bool {
    match self.parents.pop() {
      Some((value, mut before)) => {
        let children = std::mem::take(&mut self.level);
        before.push(Tree { value, children });
        self.level = before;
        true
      }
      None => false,
    }
  }

  /// The innermost open node's value, if the cursor is below the root.
  pub fn focus(&self) -> Option<&T> {
    self.parents.last().map(|(v, _)| v)
  }

  pub fn depth(&self) -> usize {
    self.parents.len()
  }

  /// Pure snapshot of the forest built so far.
  pub fn to_forest(&self) -> Vec<Tree<T>> {
    let mut level = self.level.clone();
    for (value, before) in self.parents.iter().rev() {
      let node = Tree { value: value.clone(), children: level };
      level = before.clone();
      level.push(node);
    }
    level
  }
}

// Contracts ---------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Contract {
  pub code: ContractCode,
  pub storage: Expr,
  /// EIP-1153 transient storage, cleared at transaction boundaries.
  pub t_storage: Expr,
  /// Storage as of transaction entry, reinstated on revert.
  pub orig_storage: Expr,
  pub balance: Expr,
  pub nonce: Option<W64>,
  pub codehash: Expr,
  /// `op_idx_map[i]` is the index of the op containing code byte `i`.
  pub op_idx_map: Vec<usize>,
  pub code_ops: Vec<(usize, crate::modules::op::Op)>,
  pub external: bool,
}

pub fn update_balance(mut c: Contract, b: Expr) -> Contract {
  c.balance = b;
  c
}

// VM state ----------------------------------------------------------------------------------------

pub type MutableMemory = Vec<u8>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Memory {
  ConcreteMemory(MutableMemory),
  SymbolicMemory(Expr),
}

/// The "registers" of one call frame along with memory and the data stack.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameState<T: VMOps> {
  pub contract: Expr,
  pub code_contract: Expr,
  pub code: ContractCode,
  pub pc: usize,
  pub stack: Vec<Expr>,
  pub memory: Memory,
  pub memory_size: u64,
  pub calldata: Expr,
  pub callvalue: Expr,
  pub caller: Expr,
  pub gas: T::Gas,
  pub returndata: Expr,
  pub static_flag: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame<T: VMOps> {
  pub context: FrameContext,
  pub state: FrameState<T>,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FrameContext {
  CreationContext {
    address: Expr,
    codehash: Expr,
    #[serde(with = "pair_seq")]
    createreversion: ExprContractMap,
    substate: SubState,
  },
  CallContext {
    target: Expr,
    context: Expr,
    offset: Expr,
    size: Expr,
    codehash: Expr,
    abi: Option<W256>,
    calldata: Expr,
    #[serde(with = "pair_seq")]
    callreversion: ExprContractMap,
    substate: SubState,
  },
}

/// The accrued substate across a transaction. Survives frame boundaries on
/// success, rolled back on failure.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubState {
  pub selfdestructs: Vec<Expr>,
  pub touched_accounts: Vec<Expr>,
  pub accessed_addresses: BTreeSet<Expr>,
  pub accessed_storage_keys: BTreeSet<(Expr, W256)>,
  pub refunds: Vec<(Expr, Word64)>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BaseState {
  EmptyBase,
  #[default]
  AbstractBase,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
  pub allow_ffi: bool,
  pub override_caller: Option<Expr>,
  pub reset_caller: bool,
  pub base_state: BaseState,
}

impl Default for RuntimeConfig {
  fn default() -> Self {
    RuntimeConfig { allow_ffi: false, override_caller: None, reset_caller: true, base_state: BaseState::AbstractBase }
  }
}

/// An address paired with a program counter; identifies a branch point.
pub type CodeLocation = (Expr, usize);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Env {
  #[serde(with = "pair_seq")]
  pub contracts: ExprContractMap,
  pub chain_id: W256,
  pub fresh_address: i32,
  pub fresh_gas_vals: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
  pub coinbase: Expr,
  pub time_stamp: Expr,
  pub number: W256,
  pub prev_randao: W256,
  pub gaslimit: Word64,
  pub base_fee: W256,
  pub max_code_size: W256,
  pub schedule: FeeSchedule<Word64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxState {
  pub gasprice: W256,
  pub gaslimit: Word64,
  pub priority_fee: W256,
  pub origin: Expr,
  pub to_addr: Expr,
  pub value: Expr,
  pub substate: SubState,
  pub is_create: bool,
  #[serde(with = "pair_seq")]
  pub tx_reversion: ExprContractMap,
}

/// Fetch and path-choice memoization. A commutative monoid under `merge`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cache {
  pub fetched: HashMap<Addr, Contract>,
  #[serde(with = "hash_pair_seq")]
  pub path: HashMap<(CodeLocation, u32), bool>,
}

impl Cache {
  pub fn merge(mut self, other: Cache) -> Cache {
    for (addr, b) in other.fetched {
      match self.fetched.remove(&addr) {
        Some(a) => {
          self.fetched.insert(addr, unify_cached_contract(a, b));
        }
        None => {
          self.fetched.insert(addr, b);
        }
      }
    }
    // collisions imply agreement, so insertion bias is immaterial
    for (k, v) in other.path {
      self.path.insert(k, v);
    }
    self
  }
}

/// Keeps `a`, except that concrete storage maps are unioned when both sides
/// are concrete.
pub fn unify_cached_contract(mut a: Contract, b: Contract) -> Contract {
  if let (Some(sa), Some(sb)) = (maybe_concrete_store(&a.storage), maybe_concrete_store(&b.storage)) {
    let mut merged = sb;
    merged.extend(sa);
    a.storage = Expr::ConcreteStore(merged);
  }
  a
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForkState {
  pub env: Env,
  pub block: Block,
  pub cache: Cache,
  pub url_or_alias: String,
}

// Effects -----------------------------------------------------------------------------------------

/// Continuation tokens. Each carries just enough state for the orchestrator
/// to re-enter the VM once the requested fact is in place; no closures cross
/// the suspension boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchContractResume {
  pub next_pc: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchSlotResume {
  pub next_pc: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FfiResume {
  pub next_pc: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchResume {
  pub loc: CodeLocation,
  pub iteration: u32,
  pub pc_true: usize,
  pub pc_false: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchCondition {
  Case(bool),
  Unknown,
}

/// Suspensions a running frame may emit when it needs outside information.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Query {
  PleaseFetchContract(Addr, BaseState, FetchContractResume),
  PleaseFetchSlot(Addr, W256, FetchSlotResume),
  PleaseAskSmt(Box<Expr>, Vec<Prop>, BranchResume),
  PleaseDoFfi(Vec<String>, FfiResume),
}

/// Path selection, symbolic mode only; emitted when the solver answered
/// `Unknown`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Choose {
  PleaseChoosePath(Box<Expr>, BranchResume),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
  Query(Query),
  Choose(Choose),
}

/// The possible result states of a VM. `Unfinished` is only ever produced by
/// the symbolic flavor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VMResult {
  Unfinished(PartialExec),
  VMFailure(EvmError),
  VMSuccess(Expr),
  HandleEffect(Effect),
}

// Flavor polymorphism -----------------------------------------------------------------------------

mod sealed {
  pub trait Sealed {}
  impl Sealed for super::Concrete {}
  impl Sealed for super::Symbolic {}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Concrete;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Symbolic;

/// The cost/gas contract between the interpreter and the two execution
/// flavors. Gas accounting is the principal source of concrete-vs-symbolic
/// divergence; everything the interpreter needs to differ on goes through
/// these operations, so interpreter code stays flavor-generic.
pub trait VMOps: sealed::Sealed + Clone + Copy + Debug + PartialEq + Sized + 'static {
  type Gas: Clone + Copy + Debug + PartialEq + Default;

  fn initial_gas(gaslimit: Word64) -> Self::Gas;

  /// Deduct `n` gas from the current frame, `OutOfGas` on underflow.
  fn burn(vm: &mut VM<Self>, n: Word64) -> Result<(), EvmError>;

  /// EXP cost: `g_exp` plus `g_expbyte` per byte of the exponent.
  fn burn_exp(vm: &mut VM<Self>, exponent: &Expr) -> Result<(), EvmError>;

  /// SHA3 cost: `g_sha3` plus `g_sha3word` per word hashed.
  fn burn_sha3(vm: &mut VM<Self>, x_size: &Expr) -> Result<(), EvmError>;

  /// True iff at least `n` gas remains in the current frame.
  fn ensure_gas(vm: &mut VM<Self>, n: Word64) -> bool;

  fn gas_try_from(w: &Expr) -> Result<Self::Gas, EvmError>;

  /// Expand memory to cover `[offset, offset+size)`, burning the expansion
  /// cost difference.
  fn access_memory_range(vm: &mut VM<Self>, offset: &Expr, size: &Expr) -> Result<(), EvmError>;

  /// Returns `(cost charged to the caller, gas handed to the callee)` per
  /// EIP-150 and EIP-2929.
  fn cost_of_call(
    schedule: &FeeSchedule<Word64>,
    recipient_exists: bool,
    transfers_value: bool,
    available_gas: Word64,
    requested_gas: Word64,
    warm: bool,
  ) -> (Word64, Word64);

  /// Returns `(creation cost, gas handed to the init frame)` per EIP-3860.
  fn cost_of_create(
    schedule: &FeeSchedule<Word64>,
    create2: bool,
    init_code_len: Word64,
    available_gas: Word64,
  ) -> (Word64, Word64);

  /// Resolve a branch condition. Concretely this just picks a successor pc;
  /// symbolically it suspends on the solver.
  fn branch(vm: &mut VM<Self>, cond: &Expr, k: BranchResume) -> Result<(), EvmError>;

  /// Hand a popped frame's unused gas back to its parent.
  fn reclaim_gas(vm: &mut VM<Self>, unused: Self::Gas);

  /// The current frame's remaining gas as a word (a fresh variable in the
  /// symbolic flavor).
  fn remaining_gas_expr(vm: &mut VM<Self>) -> Expr;
}

/// The state of a stepwise EVM execution, parametric in the concreteness
/// flavor. Exclusively owned by its driver; a step either mutates the state
/// or parks an `Effect` in `result` for the orchestrator to handle.
#[derive(Clone, Debug)]
pub struct VM<T: VMOps> {
  pub result: Option<VMResult>,
  pub state: FrameState<T>,
  pub frames: Vec<Frame<T>>,
  pub env: Env,
  pub block: Block,
  pub tx: TxState,
  pub logs: Vec<Expr>,
  pub traces: TreeZipper<Trace>,
  pub cache: Cache,
  pub burned: T::Gas,
  /// Visit count per location plus the stack contents as of the last visit;
  /// drives the loop-unroll bound.
  pub iterations: HashMap<CodeLocation, (i32, Vec<Expr>)>,
  pub constraints: Vec<Prop>,
  pub config: RuntimeConfig,
  pub forks: VecDeque<ForkState>,
  pub current_fork: i32,
  pub labels: HashMap<Addr, String>,
}

/// Construction-time parameters for `make_vm`.
#[derive(Clone, Debug)]
pub struct VMOpts<T: VMOps> {
  pub contract: Contract,
  pub other_contracts: Vec<(Expr, Contract)>,
  pub calldata: (Expr, Vec<Prop>),
  pub base_state: BaseState,
  pub value: Expr,
  pub priority_fee: W256,
  pub address: Expr,
  pub caller: Expr,
  pub origin: Expr,
  pub gas: T::Gas,
  pub gaslimit: Word64,
  pub number: W256,
  pub time_stamp: Expr,
  pub coinbase: Expr,
  pub prev_randao: W256,
  pub max_code_size: W256,
  pub block_gaslimit: Word64,
  pub gasprice: W256,
  pub base_fee: W256,
  pub schedule: FeeSchedule<Word64>,
  pub chain_id: W256,
  pub create: bool,
  pub tx_access_list: HashMap<Expr, Vec<W256>>,
  pub allow_ffi: bool,
}
