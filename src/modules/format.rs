use hex::decode as hex_decode;
use std::fmt;

use crate::modules::keccak::keccak_bytes;
use crate::modules::types::{unpack_nibbles, Addr, Expr, Prop, W256};

pub fn strip_0x(bs: &[u8]) -> Vec<u8> {
  if bs.starts_with(b"0x") {
    bs[2..].to_vec()
  } else {
    bs.to_vec()
  }
}

pub fn strip_0x_str(s: &str) -> String {
  s.strip_prefix("0x").unwrap_or(s).to_string()
}

pub fn hex_byte_string(msg: &str, bs: &[u8]) -> Vec<u8> {
  match hex_decode(bs) {
    Ok(x) => x,
    Err(_) => panic!("invalid hex bytestring for {}", msg),
  }
}

pub fn hex_text(t: &str) -> Vec<u8> {
  match hex_decode(strip_0x_str(t)) {
    Ok(x) => x,
    Err(_) => panic!("invalid hex bytestring {}", t),
  }
}

/// Lowercase hex of `n`, left-padded with zeros to `width` nibbles.
pub fn padded_show_hex(width: usize, n: W256) -> String {
  let hex = n.to_hex();
  if hex.len() >= width {
    hex
  } else {
    format!("{}{}", "0".repeat(width - hex.len()), hex)
  }
}

/// EIP-55 mixed-case checksum of a 40-nibble lowercase hex address string.
/// Idempotent: casing of the input is ignored.
pub fn to_checksum_address(addr: &str) -> String {
  let lower = addr.to_ascii_lowercase();
  let hash = keccak_bytes(lower.as_bytes());
  let nibbles = unpack_nibbles(&hash[..20]);
  lower
    .chars()
    .zip(nibbles)
    .map(|(c, n)| if n >= 8 { c.to_ascii_uppercase() } else { c })
    .collect()
}

impl fmt::Display for Addr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "0x{}", to_checksum_address(&self.to_hex()))
  }
}

impl fmt::Debug for Addr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "0x{}", to_checksum_address(&self.to_hex()))
  }
}

pub fn format_expr(expr: &Expr) -> String {
  expr.to_string()
}

fn indent(spaces: usize, text: &str) -> String {
  let padding = " ".repeat(spaces);
  text.lines().map(|line| format!("{}{}", padding, line)).collect::<Vec<String>>().join("\n")
}

pub fn format_prop(prop: &Prop) -> String {
  fn fmt(name: &str, args: &[&Expr]) -> String {
    let formatted_args = args.iter().map(|arg| format_expr(arg)).collect::<Vec<String>>().join("\n");
    format!("({}\n{})", name, indent(2, &formatted_args))
  }

  fn fmt_prime(name: &str, args: &[&Prop]) -> String {
    let formatted_args = args.iter().map(|arg| format_prop(arg)).collect::<Vec<String>>().join("\n");
    format!("({}\n{})", name, indent(2, &formatted_args))
  }

  match prop {
    Prop::PEq(a, b) => fmt("PEq", &[a, b]),
    Prop::PLT(a, b) => fmt("PLT", &[a, b]),
    Prop::PGT(a, b) => fmt("PGT", &[a, b]),
    Prop::PGEq(a, b) => fmt("PGEq", &[a, b]),
    Prop::PLEq(a, b) => fmt("PLEq", &[a, b]),
    Prop::PNeg(a) => fmt_prime("PNeg", &[a]),
    Prop::PAnd(a, b) => fmt_prime("PAnd", &[a, b]),
    Prop::POr(a, b) => fmt_prime("POr", &[a, b]),
    Prop::PImpl(a, b) => fmt_prime("PImpl", &[a, b]),
    Prop::PBool(a) => format!("{}", a),
  }
  .trim_end()
  .to_string()
}
