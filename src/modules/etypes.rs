// The sorts of the expression language, and heterogeneous comparison.

use crate::modules::types::{Expr, GVar};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ESort {
  Buf,
  Storage,
  Log,
  EWord,
  Byte,
  EAddr,
  EContract,
  End,
}

impl ESort {
  /// Fixed comparison code. Sorts beyond the five primary ones share a
  /// single bucket; ties fall through to structural comparison.
  pub fn code(self) -> u8 {
    match self {
      ESort::Buf => 1,
      ESort::Storage => 2,
      ESort::Log => 3,
      ESort::EWord => 4,
      ESort::Byte => 5,
      ESort::EAddr | ESort::EContract | ESort::End => 6,
    }
  }
}

/// The sort of a term. Total: every constructor belongs to exactly one sort.
pub fn sort_of(e: &Expr) -> ESort {
  match e {
    Expr::GVar(GVar::BufVar(_)) => ESort::Buf,
    Expr::GVar(GVar::StoreVar(_)) => ESort::Storage,

    Expr::ConcreteBuf(_)
    | Expr::AbstractBuf(_)
    | Expr::WriteWord(_, _, _)
    | Expr::WriteByte(_, _, _)
    | Expr::CopySlice(_, _, _, _, _) => ESort::Buf,

    Expr::ConcreteStore(_) | Expr::AbstractStore(_, _) | Expr::SStore(_, _, _) => ESort::Storage,

    Expr::LogEntry(_, _, _) => ESort::Log,

    Expr::LitByte(_) | Expr::IndexWord(_, _) | Expr::ReadByte(_, _) => ESort::Byte,

    Expr::SymAddr(_) | Expr::LitAddr(_) => ESort::EAddr,

    Expr::C { .. } => ESort::EContract,

    Expr::Partial(_, _, _) | Expr::Failure(_, _, _) | Expr::Success(_, _, _, _) | Expr::ITE(_, _, _) => ESort::End,

    _ => ESort::EWord,
  }
}

/// Heterogeneous wrapper with total, deterministic ordering: terms compare
/// by sort code first, then structurally. Equality is structural (equal terms
/// necessarily share a sort). Usable as a map key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SomeExpr(pub Expr);

impl PartialOrd for SomeExpr {
  fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for SomeExpr {
  fn cmp(&self, other: &Self) -> std::cmp::Ordering {
    sort_of(&self.0).code().cmp(&sort_of(&other.0).code()).then_with(|| self.0.cmp(&other.0))
  }
}
