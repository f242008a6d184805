use std::collections::HashMap;

use sevm::modules::evm::{empty_contract, initial_contract, make_vm};
use sevm::modules::expr::read_storage;
use sevm::modules::feeschedule::fee_schedule;
use sevm::modules::types::{
  maybe_concrete_store, Addr, BaseState, BranchCondition, BranchResume, Choose, Concrete, ContractCode, Effect,
  EvmError, Expr, FetchContractResume, FetchSlotResume, FfiResume, Prop, Query, RuntimeCodeStruct, Symbolic, VMOps,
  VMOpts, VMResult, VM, W256,
};

const ADDRESS: u64 = 0xacab;

fn dummy_vm<T: VMOps>(gas: T::Gas) -> VM<T> {
  let contract = initial_contract(ContractCode::RuntimeCode(RuntimeCodeStruct::ConcreteRuntimeCode(vec![0x00])));
  let opts: VMOpts<T> = VMOpts {
    contract,
    other_contracts: Vec::new(),
    calldata: (Expr::AbstractBuf("calldata".to_string()), Vec::new()),
    base_state: BaseState::AbstractBase,
    value: Expr::Lit(W256::zero()),
    priority_fee: W256::zero(),
    address: Expr::LitAddr(Addr::from(ADDRESS)),
    caller: Expr::SymAddr("caller".to_string()),
    origin: Expr::SymAddr("origin".to_string()),
    gas,
    gaslimit: 100_000,
    number: W256::zero(),
    time_stamp: Expr::Timestamp,
    coinbase: Expr::SymAddr("miner".to_string()),
    prev_randao: W256::zero(),
    max_code_size: W256::from(24576u64),
    block_gaslimit: 30_000_000,
    gasprice: W256::zero(),
    base_fee: W256::zero(),
    schedule: fee_schedule(),
    chain_id: W256::one(),
    create: false,
    tx_access_list: HashMap::new(),
    allow_ffi: false,
  };
  make_vm(opts)
}

#[test]
fn test_fetch_account_symbolic_address() {
  let mut vm = dummy_vm::<Concrete>(100_000);
  let alice = Expr::SymAddr("alice".to_string());
  assert!(vm.fetch_account(&alice, FetchContractResume { next_pc: 0 }));
  let c = &vm.env.contracts[&alice];
  assert!(matches!(c.code, ContractCode::UnknownCode(_)));
  assert_eq!(c.storage, Expr::AbstractStore(Box::new(alice.clone()), None));
  assert!(vm.result.is_none());
}

#[test]
fn test_fetch_account_suspends_and_resumes() {
  let mut vm = dummy_vm::<Concrete>(100_000);
  let missing = Addr::from(0x999);
  let k = FetchContractResume { next_pc: 7 };

  assert!(!vm.fetch_account(&Expr::LitAddr(missing), k.clone()));
  assert_eq!(
    vm.result,
    Some(VMResult::HandleEffect(Effect::Query(Query::PleaseFetchContract(
      missing,
      BaseState::AbstractBase,
      k.clone(),
    ))))
  );

  vm.resume_contract(missing, empty_contract(), &k);
  assert!(vm.result.is_none());
  assert_eq!(vm.state.pc, 7);
  assert!(vm.env.contracts.contains_key(&Expr::LitAddr(missing)));
  assert!(vm.cache.fetched.contains_key(&missing));
}

#[test]
fn test_fetch_account_cache_hit() {
  let mut vm = dummy_vm::<Concrete>(100_000);
  let missing = Addr::from(0x999);
  vm.cache.fetched.insert(missing, empty_contract());
  assert!(vm.fetch_account(&Expr::LitAddr(missing), FetchContractResume { next_pc: 0 }));
  assert!(vm.result.is_none());
  assert!(vm.env.contracts.contains_key(&Expr::LitAddr(missing)));
}

#[test]
fn test_fetch_slot_suspends_and_resumes() {
  let mut vm = dummy_vm::<Concrete>(100_000);
  let addr = Addr::from(ADDRESS);
  let k = FetchSlotResume { next_pc: 3 };

  // the target has empty concrete storage: the slot is unknown
  assert!(!vm.fetch_slot(addr, W256::one(), k.clone()));
  assert_eq!(
    vm.result,
    Some(VMResult::HandleEffect(Effect::Query(Query::PleaseFetchSlot(addr, W256::one(), k.clone()))))
  );

  vm.resume_slot(addr, W256::one(), W256(42, 0), &k);
  assert!(vm.result.is_none());
  assert_eq!(vm.state.pc, 3);
  let store = vm.env.contracts[&Expr::LitAddr(addr)].storage.clone();
  assert_eq!(maybe_concrete_store(&store).unwrap()[&W256::one()], W256(42, 0));
  assert_eq!(read_storage(Box::new(Expr::Lit(W256::one())), Box::new(store)), Expr::Lit(W256(42, 0)));

  // now resident, no new effect
  assert!(vm.fetch_slot(addr, W256::one(), k));
}

#[test]
fn test_ffi_guarded() {
  let mut vm = dummy_vm::<Concrete>(100_000);
  let k = FfiResume { next_pc: 1 };
  let err = vm.do_ffi(vec!["date".to_string()], k.clone()).unwrap_err();
  assert!(matches!(err, EvmError::Revert(_)));
  assert!(vm.result.is_none());

  vm.config.allow_ffi = true;
  vm.do_ffi(vec!["date".to_string()], k.clone()).unwrap();
  assert_eq!(
    vm.result,
    Some(VMResult::HandleEffect(Effect::Query(Query::PleaseDoFfi(vec!["date".to_string()], k.clone()))))
  );

  vm.resume_ffi(vec![0x01, 0x02], &k);
  assert_eq!(vm.state.returndata, Expr::ConcreteBuf(vec![0x01, 0x02]));
  assert_eq!(vm.state.pc, 1);
  assert!(vm.result.is_none());
}

fn branch_resume(vm: &VM<Symbolic>) -> BranchResume {
  BranchResume { loc: (vm.state.contract.clone(), 5), iteration: 0, pc_true: 10, pc_false: 20 }
}

#[test]
fn test_symbolic_branch_asks_solver() {
  let mut vm = dummy_vm::<Symbolic>(());
  let cond = Expr::Var("c".to_string());
  let k = branch_resume(&vm);
  vm.constraints.push(Prop::PBool(true));

  Symbolic::branch(&mut vm, &cond, k.clone()).unwrap();
  match vm.result.clone() {
    Some(VMResult::HandleEffect(Effect::Query(Query::PleaseAskSmt(c, cs, kk)))) => {
      assert_eq!(*c, cond);
      assert_eq!(cs, vm.constraints);
      assert_eq!(kk, k);
    }
    other => panic!("expected an smt query, got {:?}", other),
  }

  vm.resume_ask_smt(&cond, BranchCondition::Case(true), &k);
  assert!(vm.result.is_none());
  assert_eq!(vm.state.pc, 10);
  assert_eq!(
    vm.constraints.last(),
    Some(&Prop::PNeg(Box::new(Prop::PEq(cond.clone(), Expr::Lit(W256::zero())))))
  );
  assert_eq!(vm.cache.path[&((k.loc.clone(), 0))], true);
}

#[test]
fn test_symbolic_branch_unknown_escalates_to_choice() {
  let mut vm = dummy_vm::<Symbolic>(());
  let cond = Expr::Var("c".to_string());
  let k = branch_resume(&vm);

  Symbolic::branch(&mut vm, &cond, k.clone()).unwrap();
  vm.resume_ask_smt(&cond, BranchCondition::Unknown, &k);
  assert_eq!(
    vm.result,
    Some(VMResult::HandleEffect(Effect::Choose(Choose::PleaseChoosePath(Box::new(cond.clone()), k.clone()))))
  );

  vm.resume_choose_path(&cond, false, &k);
  assert!(vm.result.is_none());
  assert_eq!(vm.state.pc, 20);
  assert_eq!(vm.constraints.last(), Some(&Prop::PEq(cond, Expr::Lit(W256::zero()))));
}

#[test]
fn test_symbolic_branch_replays_cached_path() {
  let mut vm = dummy_vm::<Symbolic>(());
  let cond = Expr::Var("c".to_string());
  let k = branch_resume(&vm);
  vm.cache.path.insert((k.loc.clone(), k.iteration), false);

  Symbolic::branch(&mut vm, &cond, k).unwrap();
  // no effect: the cached choice is taken directly
  assert!(vm.result.is_none());
  assert_eq!(vm.state.pc, 20);
}
