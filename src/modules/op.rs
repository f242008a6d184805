// The opcode table. Only parameter shapes live here; dispatch is the
// interpreter's business.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::modules::expr::{buf_length, copy_slice, from_list, join_bytes};
use crate::modules::types::{internal_error, maybe_lit_byte, word256, ContractCode, Expr, RuntimeCodeStruct, W256};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GenericOp<A> {
  OpStop,
  OpAdd,
  OpMul,
  OpSub,
  OpDiv,
  OpSdiv,
  OpMod,
  OpSmod,
  OpAddmod,
  OpMulmod,
  OpExp,
  OpSignextend,
  OpLt,
  OpGt,
  OpSlt,
  OpSgt,
  OpEq,
  OpIszero,
  OpAnd,
  OpOr,
  OpXor,
  OpNot,
  OpByte,
  OpShl,
  OpShr,
  OpSar,
  OpSha3,
  OpAddress,
  OpBalance,
  OpOrigin,
  OpCaller,
  OpCallvalue,
  OpCalldataload,
  OpCalldatasize,
  OpCalldatacopy,
  OpCodesize,
  OpCodecopy,
  OpGasprice,
  OpExtcodesize,
  OpExtcodecopy,
  OpReturndatasize,
  OpReturndatacopy,
  OpExtcodehash,
  OpBlockhash,
  OpCoinbase,
  OpTimestamp,
  OpNumber,
  OpPrevRandao,
  OpGaslimit,
  OpChainid,
  OpSelfbalance,
  OpBaseFee,
  OpPop,
  OpMload,
  OpMstore,
  OpMstore8,
  OpSload,
  OpSstore,
  OpTload,
  OpTstore,
  OpJump,
  OpJumpi,
  OpPc,
  OpMsize,
  OpGas,
  OpJumpdest,
  OpMcopy,
  OpCreate,
  OpCall,
  OpCallcode,
  OpReturn,
  OpDelegatecall,
  OpCreate2,
  OpStaticcall,
  OpSelfdestruct,
  OpRevert,
  OpPush0,
  /// Push with its immediate.
  OpPush(A),
  /// Arity 1-16.
  OpDup(u8),
  /// Arity 1-16.
  OpSwap(u8),
  /// Arity 0-4.
  OpLog(u8),
  OpUnknown(u8),
}

pub type Op = GenericOp<Expr>;

impl<A: fmt::Debug> fmt::Display for GenericOp<A> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GenericOp::OpPush(x) => write!(f, "PUSH {:?}", x),
      GenericOp::OpDup(n) => write!(f, "DUP{}", n),
      GenericOp::OpSwap(n) => write!(f, "SWAP{}", n),
      GenericOp::OpLog(n) => write!(f, "LOG{}", n),
      GenericOp::OpUnknown(b) => write!(f, "UNKNOWN 0x{:02x}", b),
      other => {
        let name = format!("{:?}", other);
        write!(f, "{}", name.trim_start_matches("Op").to_uppercase())
      }
    }
  }
}

/// Total byte width of the instruction starting with this opcode byte.
pub fn op_size(b: u8) -> usize {
  match b {
    0x60..=0x7f => (b as usize) - 0x60 + 2,
    _ => 1,
  }
}

/// Decode one opcode byte; `arg` is consumed by the push range only.
pub fn read_op(b: u8, arg: Expr) -> Op {
  match b {
    0x00 => GenericOp::OpStop,
    0x01 => GenericOp::OpAdd,
    0x02 => GenericOp::OpMul,
    0x03 => GenericOp::OpSub,
    0x04 => GenericOp::OpDiv,
    0x05 => GenericOp::OpSdiv,
    0x06 => GenericOp::OpMod,
    0x07 => GenericOp::OpSmod,
    0x08 => GenericOp::OpAddmod,
    0x09 => GenericOp::OpMulmod,
    0x0a => GenericOp::OpExp,
    0x0b => GenericOp::OpSignextend,
    0x10 => GenericOp::OpLt,
    0x11 => GenericOp::OpGt,
    0x12 => GenericOp::OpSlt,
    0x13 => GenericOp::OpSgt,
    0x14 => GenericOp::OpEq,
    0x15 => GenericOp::OpIszero,
    0x16 => GenericOp::OpAnd,
    0x17 => GenericOp::OpOr,
    0x18 => GenericOp::OpXor,
    0x19 => GenericOp::OpNot,
    0x1a => GenericOp::OpByte,
    0x1b => GenericOp::OpShl,
    0x1c => GenericOp::OpShr,
    0x1d => GenericOp::OpSar,
    0x20 => GenericOp::OpSha3,
    0x30 => GenericOp::OpAddress,
    0x31 => GenericOp::OpBalance,
    0x32 => GenericOp::OpOrigin,
    0x33 => GenericOp::OpCaller,
    0x34 => GenericOp::OpCallvalue,
    0x35 => GenericOp::OpCalldataload,
    0x36 => GenericOp::OpCalldatasize,
    0x37 => GenericOp::OpCalldatacopy,
    0x38 => GenericOp::OpCodesize,
    0x39 => GenericOp::OpCodecopy,
    0x3a => GenericOp::OpGasprice,
    0x3b => GenericOp::OpExtcodesize,
    0x3c => GenericOp::OpExtcodecopy,
    0x3d => GenericOp::OpReturndatasize,
    0x3e => GenericOp::OpReturndatacopy,
    0x3f => GenericOp::OpExtcodehash,
    0x40 => GenericOp::OpBlockhash,
    0x41 => GenericOp::OpCoinbase,
    0x42 => GenericOp::OpTimestamp,
    0x43 => GenericOp::OpNumber,
    0x44 => GenericOp::OpPrevRandao,
    0x45 => GenericOp::OpGaslimit,
    0x46 => GenericOp::OpChainid,
    0x47 => GenericOp::OpSelfbalance,
    0x48 => GenericOp::OpBaseFee,
    0x50 => GenericOp::OpPop,
    0x51 => GenericOp::OpMload,
    0x52 => GenericOp::OpMstore,
    0x53 => GenericOp::OpMstore8,
    0x54 => GenericOp::OpSload,
    0x55 => GenericOp::OpSstore,
    0x56 => GenericOp::OpJump,
    0x57 => GenericOp::OpJumpi,
    0x58 => GenericOp::OpPc,
    0x59 => GenericOp::OpMsize,
    0x5a => GenericOp::OpGas,
    0x5b => GenericOp::OpJumpdest,
    0x5c => GenericOp::OpTload,
    0x5d => GenericOp::OpTstore,
    0x5e => GenericOp::OpMcopy,
    0x5f => GenericOp::OpPush0,
    0x60..=0x7f => GenericOp::OpPush(arg),
    0x80..=0x8f => GenericOp::OpDup(b - 0x7f),
    0x90..=0x9f => GenericOp::OpSwap(b - 0x8f),
    0xa0..=0xa4 => GenericOp::OpLog(b - 0xa0),
    0xf0 => GenericOp::OpCreate,
    0xf1 => GenericOp::OpCall,
    0xf2 => GenericOp::OpCallcode,
    0xf3 => GenericOp::OpReturn,
    0xf4 => GenericOp::OpDelegatecall,
    0xf5 => GenericOp::OpCreate2,
    0xfa => GenericOp::OpStaticcall,
    0xfd => GenericOp::OpRevert,
    0xff => GenericOp::OpSelfdestruct,
    _ => GenericOp::OpUnknown(b),
  }
}

fn code_bytes(code: &ContractCode) -> CodeView<'_> {
  match code {
    ContractCode::UnknownCode(_) => internal_error("cannot disassemble unknown code"),
    ContractCode::InitCode(conc, _) => CodeView::Concrete(conc),
    ContractCode::RuntimeCode(RuntimeCodeStruct::ConcreteRuntimeCode(conc)) => CodeView::Concrete(conc),
    ContractCode::RuntimeCode(RuntimeCodeStruct::SymbolicRuntimeCode(bytes)) => CodeView::Symbolic(bytes),
  }
}

enum CodeView<'a> {
  Concrete(&'a [u8]),
  Symbolic(&'a [Expr]),
}

impl CodeView<'_> {
  fn len(&self) -> usize {
    match self {
      CodeView::Concrete(bs) => bs.len(),
      CodeView::Symbolic(es) => es.len(),
    }
  }

  /// Opcode positions must hold concrete bytes even in symbolic code; only
  /// pushdata may stay symbolic.
  fn opcode_at(&self, i: usize) -> u8 {
    match self {
      CodeView::Concrete(bs) => bs[i],
      CodeView::Symbolic(es) => match maybe_lit_byte(&es[i]) {
        Some(b) => b,
        None => internal_error("symbolic opcode byte"),
      },
    }
  }

  fn push_arg(&self, i: usize, n: usize) -> Expr {
    match self {
      CodeView::Concrete(bs) => {
        let hi = std::cmp::min(i + 1 + n, bs.len());
        Expr::Lit(word256(&bs[i + 1..hi]))
      }
      CodeView::Symbolic(es) => {
        let hi = std::cmp::min(i + 1 + n, es.len());
        let bytes: Vec<Expr> = es[i + 1..hi].to_vec();
        push_arg_word(bytes)
      }
    }
  }
}

/// Immediate bytes as a word, left-padded to 32 bytes.
fn push_arg_word(bytes: Vec<Expr>) -> Expr {
  let mut padded = vec![Expr::LitByte(0); 32 - bytes.len()];
  padded.extend(bytes);
  join_bytes(padded)
}

/// The disassembled op stream: pairs of byte offset and decoded op.
pub fn mk_code_ops(code: &ContractCode) -> Vec<(usize, Op)> {
  let view = code_bytes(code);
  let mut out = Vec::new();
  let mut i = 0;
  while i < view.len() {
    let b = view.opcode_at(i);
    let op = match b {
      0x60..=0x7f => GenericOp::OpPush(view.push_arg(i, (b as usize) - 0x5f)),
      _ => read_op(b, Expr::Lit(W256::zero())),
    };
    out.push((i, op));
    i += op_size(b);
  }
  out
}

/// For each code byte, the index of the op containing it; pushdata bytes map
/// to their push. Enables O(1) pc-to-op lookup.
pub fn mk_op_ix_map(code: &ContractCode) -> Vec<usize> {
  let view = code_bytes(code);
  let mut out = vec![0; view.len()];
  let mut i = 0;
  let mut op_ix = 0;
  while i < view.len() {
    let size = std::cmp::min(op_size(view.opcode_at(i)), view.len() - i);
    for slot in &mut out[i..i + size] {
      *slot = op_ix;
    }
    i += size;
    op_ix += 1;
  }
  out
}

/// A buffer view of the code, when one exists. Init code is its concrete
/// constructor bytes followed by the (possibly abstract) data section.
pub fn to_buf(code: &ContractCode) -> Option<Expr> {
  match code {
    ContractCode::InitCode(conc, data) => Some(copy_slice(
      Box::new(Expr::Lit(W256::zero())),
      Box::new(Expr::Lit(W256::from(conc.len()))),
      Box::new(buf_length(data.clone())),
      data.clone(),
      Box::new(Expr::ConcreteBuf(conc.clone())),
    )),
    ContractCode::RuntimeCode(RuntimeCodeStruct::ConcreteRuntimeCode(bs)) => Some(Expr::ConcreteBuf(bs.clone())),
    ContractCode::RuntimeCode(RuntimeCodeStruct::SymbolicRuntimeCode(bytes)) => Some(from_list(bytes.clone())),
    ContractCode::UnknownCode(_) => None,
  }
}
