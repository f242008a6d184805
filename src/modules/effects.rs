// Entry points of the suspension protocol. Emitters park an `Effect` in
// `vm.result`; once the orchestrator has the answer it re-enters through the
// matching `resume_*` function, which applies the answer and clears the
// result. Effects carry bounded resume tokens, so a VM discarded at an
// effect boundary holds no external resources.

use crate::modules::evm::unknown_contract;
use crate::modules::expr::write_storage;
use crate::modules::types::{
  internal_error, maybe_concrete_store, Addr, BranchCondition, BranchResume, Choose, Contract, Effect, EvmError, Expr,
  FetchContractResume, FetchSlotResume, FfiResume, Prop, Query, Symbolic, VMOps, VMResult, VM, W256,
};

impl<T: VMOps> VM<T> {
  /// Make the account at `addr` resident. Returns true when it already is
  /// (or could be conjured locally); false when a fetch effect was parked.
  pub fn fetch_account(&mut self, addr: &Expr, k: FetchContractResume) -> bool {
    if self.env.contracts.contains_key(addr) {
      return true;
    }
    match addr {
      Expr::SymAddr(_) => {
        self.env.contracts.insert(addr.clone(), unknown_contract(addr.clone()));
        true
      }
      Expr::LitAddr(a) => match self.cache.fetched.get(a) {
        Some(c) => {
          self.env.contracts.insert(addr.clone(), c.clone());
          true
        }
        None => {
          self.result = Some(VMResult::HandleEffect(Effect::Query(Query::PleaseFetchContract(
            *a,
            self.config.base_state,
            k,
          ))));
          false
        }
      },
      _ => internal_error("fetch_account: not an address"),
    }
  }

  /// Install a fetched contract and resume.
  pub fn resume_contract(&mut self, addr: Addr, contract: Contract, k: &FetchContractResume) {
    self.cache.fetched.insert(addr, contract.clone());
    self.env.contracts.insert(Expr::LitAddr(addr), contract);
    self.state.pc = k.next_pc;
    self.result = None;
  }

  /// Make a concrete storage slot resident. Returns true when the value is
  /// already known locally.
  pub fn fetch_slot(&mut self, addr: Addr, slot: W256, k: FetchSlotResume) -> bool {
    let known = self
      .env
      .contracts
      .get(&Expr::LitAddr(addr))
      .and_then(|c| maybe_concrete_store(&c.storage))
      .map_or(false, |m| m.contains_key(&slot));
    if known {
      return true;
    }
    self.result = Some(VMResult::HandleEffect(Effect::Query(Query::PleaseFetchSlot(addr, slot, k))));
    false
  }

  /// Install a fetched storage slot and resume.
  pub fn resume_slot(&mut self, addr: Addr, slot: W256, val: W256, k: &FetchSlotResume) {
    let key = Expr::LitAddr(addr);
    if let Some(c) = self.env.contracts.get_mut(&key) {
      c.storage = write_storage(Box::new(Expr::Lit(slot)), Box::new(Expr::Lit(val)), Box::new(c.storage.clone()));
    }
    if let Some(c) = self.cache.fetched.get_mut(&addr) {
      c.storage = write_storage(Box::new(Expr::Lit(slot)), Box::new(Expr::Lit(val)), Box::new(c.storage.clone()));
    }
    self.state.pc = k.next_pc;
    self.result = None;
  }

  /// Request an external command run. Refused as a revert unless the driver
  /// opted in to FFI.
  pub fn do_ffi(&mut self, cmd: Vec<String>, k: FfiResume) -> Result<(), EvmError> {
    if !self.config.allow_ffi {
      return Err(EvmError::Revert(Box::new(Expr::ConcreteBuf(b"ffi disabled".to_vec()))));
    }
    self.result = Some(VMResult::HandleEffect(Effect::Query(Query::PleaseDoFfi(cmd, k))));
    Ok(())
  }

  /// Install the command's stdout as returndata and resume.
  pub fn resume_ffi(&mut self, stdout: Vec<u8>, k: &FfiResume) {
    self.state.returndata = Expr::ConcreteBuf(stdout);
    self.state.pc = k.next_pc;
    self.result = None;
  }
}

impl VM<Symbolic> {
  /// Commit to one side of a branch: record the path constraint and the
  /// choice, then continue at the chosen successor.
  pub fn take_branch(&mut self, cond: &Expr, choice: bool, k: &BranchResume) {
    let zero = Prop::PEq(cond.clone(), Expr::Lit(W256::zero()));
    let constraint = if choice { Prop::PNeg(Box::new(zero)) } else { zero };
    self.constraints.push(constraint);
    self.cache.path.insert((k.loc.clone(), k.iteration), choice);
    self.state.pc = if choice { k.pc_true } else { k.pc_false };
    self.result = None;
  }

  /// Apply the solver's verdict on a branch condition. `Unknown` escalates
  /// to a path choice by the driver.
  pub fn resume_ask_smt(&mut self, cond: &Expr, answer: BranchCondition, k: &BranchResume) {
    match answer {
      BranchCondition::Case(choice) => self.take_branch(cond, choice, k),
      BranchCondition::Unknown => {
        log::warn!("solver could not decide branch at pc {}", k.loc.1);
        self.result = Some(VMResult::HandleEffect(Effect::Choose(Choose::PleaseChoosePath(
          Box::new(cond.clone()),
          k.clone(),
        ))));
      }
    }
  }

  /// Apply the driver's path choice.
  pub fn resume_choose_path(&mut self, cond: &Expr, choice: bool, k: &BranchResume) {
    self.take_branch(cond, choice, k);
  }
}
