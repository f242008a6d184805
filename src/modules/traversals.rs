// Generic traversals over the expression and proposition languages. `map_*`
// rebuilds bottom-up, applying the function at every node; `fold_*`
// accumulates a monoidal summary.

use std::ops::Add;

use crate::modules::types::{ContractCode, Expr, Prop, RuntimeCodeStruct};

fn fold_code<B, F>(f: &mut F, code: &ContractCode) -> B
where
  F: FnMut(&Expr) -> B,
  B: Add<Output = B> + Default + Clone,
{
  match code {
    ContractCode::UnknownCode(addr) => go_expr(f, addr),
    ContractCode::InitCode(_, data) => go_expr(f, data),
    ContractCode::RuntimeCode(RuntimeCodeStruct::ConcreteRuntimeCode(_)) => B::default(),
    ContractCode::RuntimeCode(RuntimeCodeStruct::SymbolicRuntimeCode(bytes)) => {
      bytes.iter().fold(B::default(), |acc, b| acc + go_expr(f, b))
    }
  }
}

fn go_expr<B, F>(f: &mut F, e: &Expr) -> B
where
  F: FnMut(&Expr) -> B,
  B: Add<Output = B> + Default + Clone,
{
  let own = f(e);
  let kids = match e {
    // leaves
    Expr::Lit(_)
    | Expr::Var(_)
    | Expr::GVar(_)
    | Expr::LitByte(_)
    | Expr::ConcreteBuf(_)
    | Expr::AbstractBuf(_)
    | Expr::ConcreteStore(_)
    | Expr::SymAddr(_)
    | Expr::LitAddr(_)
    | Expr::Origin
    | Expr::Coinbase
    | Expr::Timestamp
    | Expr::BlockNumber
    | Expr::PrevRandao
    | Expr::GasLimit
    | Expr::ChainId
    | Expr::BaseFee
    | Expr::TxValue
    | Expr::Gas(_) => B::default(),

    // unary
    Expr::IsZero(a)
    | Expr::Not(a)
    | Expr::Keccak(a)
    | Expr::SHA256(a)
    | Expr::BlockHash(a)
    | Expr::Balance(a)
    | Expr::CodeSize(a)
    | Expr::CodeHash(a)
    | Expr::WAddr(a)
    | Expr::BufLength(a)
    | Expr::AbstractStore(a, _) => go_expr(f, a),

    // binary
    Expr::IndexWord(a, b)
    | Expr::EqByte(a, b)
    | Expr::Add(a, b)
    | Expr::Sub(a, b)
    | Expr::Mul(a, b)
    | Expr::Div(a, b)
    | Expr::SDiv(a, b)
    | Expr::Mod(a, b)
    | Expr::SMod(a, b)
    | Expr::Exp(a, b)
    | Expr::SEx(a, b)
    | Expr::Min(a, b)
    | Expr::Max(a, b)
    | Expr::LT(a, b)
    | Expr::GT(a, b)
    | Expr::LEq(a, b)
    | Expr::GEq(a, b)
    | Expr::SLT(a, b)
    | Expr::SGT(a, b)
    | Expr::Eq(a, b)
    | Expr::And(a, b)
    | Expr::Or(a, b)
    | Expr::Xor(a, b)
    | Expr::SHL(a, b)
    | Expr::SHR(a, b)
    | Expr::SAR(a, b)
    | Expr::ReadWord(a, b)
    | Expr::ReadByte(a, b)
    | Expr::SLoad(a, b) => go_expr::<B, F>(f, a) + go_expr(f, b),

    // ternary
    Expr::AddMod(a, b, c) | Expr::MulMod(a, b, c) | Expr::ITE(a, b, c) => {
      go_expr::<B, F>(f, a) + go_expr(f, b) + go_expr(f, c)
    }
    Expr::WriteWord(a, b, c) | Expr::WriteByte(a, b, c) | Expr::SStore(a, b, c) => {
      go_expr::<B, F>(f, a) + go_expr(f, b) + go_expr(f, c)
    }

    Expr::CopySlice(a, b, c, d, g) => {
      go_expr::<B, F>(f, a) + go_expr(f, b) + go_expr(f, c) + go_expr(f, d) + go_expr(f, g)
    }

    Expr::JoinBytes(bytes) => bytes.iter().fold(B::default(), |acc, b| acc + go_expr(f, b)),

    Expr::LogEntry(addr, data, topics) => {
      topics.iter().fold(go_expr::<B, F>(f, addr) + go_expr(f, data), |acc, t| acc + go_expr(f, t))
    }

    Expr::C { code, storage, t_storage, balance, .. } => {
      fold_code::<B, F>(f, code) + go_expr(f, storage) + go_expr(f, t_storage) + go_expr(f, balance)
    }

    Expr::Partial(props, _, _) => props.iter().fold(B::default(), |acc, p| acc + go_prop(f, p)),
    Expr::Failure(props, _, _) => props.iter().fold(B::default(), |acc, p| acc + go_prop(f, p)),
    Expr::Success(props, _, buf, contracts) => {
      let base = props.iter().fold(go_expr::<B, F>(f, buf), |acc, p| acc + go_prop(f, p));
      contracts.iter().fold(base, |acc, (k, v)| acc + go_expr(f, k) + go_expr(f, v))
    }
  };
  own + kids
}

fn go_prop<B, F>(f: &mut F, p: &Prop) -> B
where
  F: FnMut(&Expr) -> B,
  B: Add<Output = B> + Default + Clone,
{
  match p {
    Prop::PBool(_) => B::default(),
    Prop::PEq(a, b) | Prop::PLT(a, b) | Prop::PGT(a, b) | Prop::PGEq(a, b) | Prop::PLEq(a, b) => {
      go_expr::<B, F>(f, a) + go_expr(f, b)
    }
    Prop::PNeg(a) => go_prop(f, a),
    Prop::PAnd(a, b) | Prop::POr(a, b) | Prop::PImpl(a, b) => go_prop::<B, F>(f, a) + go_prop(f, b),
  }
}

/// Fold `f` over every subterm of `e`, including those under propositions in
/// end states.
pub fn fold_expr<B, F>(f: &mut F, acc: B, e: &Expr) -> B
where
  F: FnMut(&Expr) -> B,
  B: Add<Output = B> + Default + Clone,
{
  acc + go_expr(f, e)
}

/// Fold `f` over every expression mentioned in `p`.
pub fn fold_prop<B, F>(f: &mut F, acc: B, p: &Prop) -> B
where
  F: FnMut(&Expr) -> B,
  B: Add<Output = B> + Default + Clone,
{
  acc + go_prop(f, p)
}

fn map_code<F: FnMut(&Expr) -> Expr>(f: &mut F, code: &ContractCode) -> ContractCode {
  match code {
    ContractCode::UnknownCode(addr) => ContractCode::UnknownCode(Box::new(map_expr(f, addr))),
    ContractCode::InitCode(conc, data) => ContractCode::InitCode(conc.clone(), Box::new(map_expr(f, data))),
    ContractCode::RuntimeCode(RuntimeCodeStruct::ConcreteRuntimeCode(bs)) => {
      ContractCode::RuntimeCode(RuntimeCodeStruct::ConcreteRuntimeCode(bs.clone()))
    }
    ContractCode::RuntimeCode(RuntimeCodeStruct::SymbolicRuntimeCode(bytes)) => ContractCode::RuntimeCode(
      RuntimeCodeStruct::SymbolicRuntimeCode(bytes.iter().map(|b| map_expr(f, b)).collect()),
    ),
  }
}

/// Rebuild `e` bottom-up, applying `f` at every node.
pub fn map_expr<F: FnMut(&Expr) -> Expr>(f: &mut F, e: &Expr) -> Expr {
  macro_rules! go {
    ($x:expr) => {
      Box::new(map_expr(f, $x))
    };
  }
  let rebuilt = match e {
    Expr::Lit(_)
    | Expr::Var(_)
    | Expr::GVar(_)
    | Expr::LitByte(_)
    | Expr::ConcreteBuf(_)
    | Expr::AbstractBuf(_)
    | Expr::ConcreteStore(_)
    | Expr::SymAddr(_)
    | Expr::LitAddr(_)
    | Expr::Origin
    | Expr::Coinbase
    | Expr::Timestamp
    | Expr::BlockNumber
    | Expr::PrevRandao
    | Expr::GasLimit
    | Expr::ChainId
    | Expr::BaseFee
    | Expr::TxValue
    | Expr::Gas(_) => e.clone(),

    Expr::IsZero(a) => Expr::IsZero(go!(a)),
    Expr::Not(a) => Expr::Not(go!(a)),
    Expr::Keccak(a) => Expr::Keccak(go!(a)),
    Expr::SHA256(a) => Expr::SHA256(go!(a)),
    Expr::BlockHash(a) => Expr::BlockHash(go!(a)),
    Expr::Balance(a) => Expr::Balance(go!(a)),
    Expr::CodeSize(a) => Expr::CodeSize(go!(a)),
    Expr::CodeHash(a) => Expr::CodeHash(go!(a)),
    Expr::WAddr(a) => Expr::WAddr(go!(a)),
    Expr::BufLength(a) => Expr::BufLength(go!(a)),
    Expr::AbstractStore(a, id) => Expr::AbstractStore(go!(a), *id),

    Expr::IndexWord(a, b) => Expr::IndexWord(go!(a), go!(b)),
    Expr::EqByte(a, b) => Expr::EqByte(go!(a), go!(b)),
    Expr::Add(a, b) => Expr::Add(go!(a), go!(b)),
    Expr::Sub(a, b) => Expr::Sub(go!(a), go!(b)),
    Expr::Mul(a, b) => Expr::Mul(go!(a), go!(b)),
    Expr::Div(a, b) => Expr::Div(go!(a), go!(b)),
    Expr::SDiv(a, b) => Expr::SDiv(go!(a), go!(b)),
    Expr::Mod(a, b) => Expr::Mod(go!(a), go!(b)),
    Expr::SMod(a, b) => Expr::SMod(go!(a), go!(b)),
    Expr::Exp(a, b) => Expr::Exp(go!(a), go!(b)),
    Expr::SEx(a, b) => Expr::SEx(go!(a), go!(b)),
    Expr::Min(a, b) => Expr::Min(go!(a), go!(b)),
    Expr::Max(a, b) => Expr::Max(go!(a), go!(b)),
    Expr::LT(a, b) => Expr::LT(go!(a), go!(b)),
    Expr::GT(a, b) => Expr::GT(go!(a), go!(b)),
    Expr::LEq(a, b) => Expr::LEq(go!(a), go!(b)),
    Expr::GEq(a, b) => Expr::GEq(go!(a), go!(b)),
    Expr::SLT(a, b) => Expr::SLT(go!(a), go!(b)),
    Expr::SGT(a, b) => Expr::SGT(go!(a), go!(b)),
    Expr::Eq(a, b) => Expr::Eq(go!(a), go!(b)),
    Expr::And(a, b) => Expr::And(go!(a), go!(b)),
    Expr::Or(a, b) => Expr::Or(go!(a), go!(b)),
    Expr::Xor(a, b) => Expr::Xor(go!(a), go!(b)),
    Expr::SHL(a, b) => Expr::SHL(go!(a), go!(b)),
    Expr::SHR(a, b) => Expr::SHR(go!(a), go!(b)),
    Expr::SAR(a, b) => Expr::SAR(go!(a), go!(b)),
    Expr::ReadWord(a, b) => Expr::ReadWord(go!(a), go!(b)),
    Expr::ReadByte(a, b) => Expr::ReadByte(go!(a), go!(b)),
    Expr::SLoad(a, b) => Expr::SLoad(go!(a), go!(b)),

    Expr::AddMod(a, b, c) => Expr::AddMod(go!(a), go!(b), go!(c)),
    Expr::MulMod(a, b, c) => Expr::MulMod(go!(a), go!(b), go!(c)),
    Expr::ITE(a, b, c) => Expr::ITE(go!(a), go!(b), go!(c)),
    Expr::WriteWord(a, b, c) => Expr::WriteWord(go!(a), go!(b), go!(c)),
    Expr::WriteByte(a, b, c) => Expr::WriteByte(go!(a), go!(b), go!(c)),
    Expr::SStore(a, b, c) => Expr::SStore(go!(a), go!(b), go!(c)),

    Expr::CopySlice(a, b, c, d, g) => Expr::CopySlice(go!(a), go!(b), go!(c), go!(d), go!(g)),

    Expr::JoinBytes(bytes) => Expr::JoinBytes(bytes.iter().map(|b| map_expr(f, b)).collect()),

    Expr::LogEntry(addr, data, topics) => {
      Expr::LogEntry(go!(addr), go!(data), topics.iter().map(|t| map_expr(f, t)).collect())
    }

    Expr::C { code, storage, t_storage, balance, nonce } => Expr::C {
      code: map_code(f, code),
      storage: go!(storage),
      t_storage: go!(t_storage),
      balance: go!(balance),
      nonce: *nonce,
    },

    Expr::Partial(props, ctx, reason) => {
      Expr::Partial(props.iter().map(|p| map_prop(f, p)).collect(), ctx.clone(), reason.clone())
    }
    Expr::Failure(props, ctx, err) => {
      Expr::Failure(props.iter().map(|p| map_prop(f, p)).collect(), ctx.clone(), err.clone())
    }
    Expr::Success(props, ctx, buf, contracts) => Expr::Success(
      props.iter().map(|p| map_prop(f, p)).collect(),
      ctx.clone(),
      go!(buf),
      contracts.iter().map(|(k, v)| (map_expr(f, k), map_expr(f, v))).collect(),
    ),
  };
  f(&rebuilt)
}

/// Rebuild `p`, applying `f` to every expression under it.
pub fn map_prop<F: FnMut(&Expr) -> Expr>(f: &mut F, p: &Prop) -> Prop {
  match p {
    Prop::PBool(b) => Prop::PBool(*b),
    Prop::PEq(a, b) => Prop::PEq(map_expr(f, a), map_expr(f, b)),
    Prop::PLT(a, b) => Prop::PLT(map_expr(f, a), map_expr(f, b)),
    Prop::PGT(a, b) => Prop::PGT(map_expr(f, a), map_expr(f, b)),
    Prop::PGEq(a, b) => Prop::PGEq(map_expr(f, a), map_expr(f, b)),
    Prop::PLEq(a, b) => Prop::PLEq(map_expr(f, a), map_expr(f, b)),
    Prop::PNeg(a) => Prop::PNeg(Box::new(map_prop(f, a))),
    Prop::PAnd(a, b) => Prop::PAnd(Box::new(map_prop(f, a)), Box::new(map_prop(f, b))),
    Prop::POr(a, b) => Prop::POr(Box::new(map_prop(f, a)), Box::new(map_prop(f, b))),
    Prop::PImpl(a, b) => Prop::PImpl(Box::new(map_prop(f, a)), Box::new(map_prop(f, b))),
  }
}
