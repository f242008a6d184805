// Transaction entry and exit: fee deduction, nonce bump, value transfer,
// storage snapshots and transient-storage reset.

use crate::modules::evm::initial_contract;
use crate::modules::expr::{add, sub};
use crate::modules::types::{
  update_balance, Contract, ContractCode, Expr, ExprContractMap, RuntimeCodeStruct, SubState, VMOps, Word64, VM, W256,
  W64,
};

fn new_account() -> Contract {
  initial_contract(ContractCode::RuntimeCode(RuntimeCodeStruct::ConcreteRuntimeCode(Vec::new())))
}

fn touch_account(pre_state: &mut ExprContractMap, addr: &Expr) {
  pre_state.entry(addr.clone()).or_insert_with(new_account);
}

fn setup_tx(origin: &Expr, coinbase: &Expr, gasprice: W256, gas_limit: Word64, pre_state: &mut ExprContractMap) {
  let gas_cost = gasprice * W256::from(gas_limit);
  if let Some(account) = pre_state.get_mut(origin) {
    if let Some(n) = account.nonce {
      account.nonce = Some(W64(n.0.wrapping_add(1)));
    }
    account.balance = sub(Box::new(account.balance.clone()), Box::new(Expr::Lit(gas_cost)));
  }
  touch_account(pre_state, origin);
  touch_account(pre_state, coinbase);
}

/// Set up the world for transaction execution: charge the up-front fee,
/// move the call value, snapshot every account's storage into
/// `orig_storage`, zero transient storage, and stash the pre-state for
/// revert.
pub fn init_tx<T: VMOps>(vm: &mut VM<T>) -> &mut VM<T> {
  let to_addr = vm.state.contract.clone();
  let origin = vm.tx.origin.clone();
  let gasprice = vm.tx.gasprice;
  let gas_limit = vm.tx.gaslimit;
  let coinbase = vm.block.coinbase.clone();
  let value = vm.state.callvalue.clone();
  let to_contract = initial_contract(vm.state.code.clone());

  let mut pre_state = vm.env.contracts.clone();
  setup_tx(&origin, &coinbase, gasprice, gas_limit, &mut pre_state);

  let old_balance = pre_state.get(&to_addr).map_or(Expr::Lit(W256::zero()), |a| a.balance.clone());
  let creation = vm.tx.is_create;

  let mut init_state = pre_state.clone();
  if creation {
    init_state.insert(to_addr.clone(), update_balance(to_contract, old_balance));
  } else {
    touch_account(&mut init_state, &to_addr);
  }

  if let Some(account) = init_state.get_mut(&origin) {
    account.balance = sub(Box::new(account.balance.clone()), Box::new(value.clone()));
  }
  if let Some(account) = init_state.get_mut(&to_addr) {
    account.balance = add(Box::new(account.balance.clone()), Box::new(value));
  }

  for account in init_state.values_mut() {
    account.orig_storage = account.storage.clone();
    account.t_storage = Expr::ConcreteStore(Default::default());
  }

  vm.env.contracts = init_state;
  vm.tx.tx_reversion = pre_state;
  vm
}

/// Close out the transaction: apply accumulated selfdestructs, clear
/// transient storage (EIP-1153) and reset the substate.
pub fn finalize_tx<T: VMOps>(vm: &mut VM<T>) {
  let destroyed = std::mem::take(&mut vm.tx.substate.selfdestructs);
  for addr in destroyed {
    vm.env.contracts.remove(&addr);
  }
  for account in vm.env.contracts.values_mut() {
    account.t_storage = Expr::ConcreteStore(Default::default());
  }
  vm.tx.substate = SubState::default();
}
