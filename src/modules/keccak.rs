// Keccak-256 hashing and the hash smart constructors.

use tiny_keccak::{Hasher, Keccak};

use crate::modules::expr::to_concrete_buf;
use crate::modules::types::{word256, word32, Expr, FunctionSelector, W256};

pub fn keccak_bytes(input: &[u8]) -> Vec<u8> {
  let mut hasher = Keccak::v256();
  hasher.update(input);
  let mut out = vec![0u8; 32];
  hasher.finalize(&mut out);
  out
}

/// The 32-byte digest interpreted as a big-endian word.
pub fn keccak_prime(input: &[u8]) -> W256 {
  word256(&keccak_bytes(input))
}

/// Hash smart constructor: concrete buffers reduce to a literal digest,
/// anything else stays symbolic.
pub fn keccak(buf: Expr) -> Expr {
  match to_concrete_buf(&buf) {
    Some(bs) => Expr::Lit(keccak_prime(&bs)),
    None => Expr::Keccak(Box::new(buf)),
  }
}

pub fn sha256(buf: Expr) -> Expr {
  Expr::SHA256(Box::new(buf))
}

/// First four digest bytes of the signature, packed big-endian.
pub fn abi_keccak(input: &[u8]) -> FunctionSelector {
  word32(&keccak_bytes(input)[..4])
}
