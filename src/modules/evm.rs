// VM and contract construction, the concrete/symbolic realizations of the
// gas contract, frame push/pop with reversion semantics, memory access and
// trace bookkeeping.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use crate::modules::expr::{buf_length, copy_slice, emin, to_concrete_buf, MAX_BYTES};
use crate::modules::feeschedule::FeeSchedule;
use crate::modules::keccak::keccak;
use crate::modules::op::{mk_code_ops, mk_op_ix_map, to_buf};
use crate::modules::types::{
  internal_error, maybe_lit_word, Addr, Block, BranchResume, Cache, Concrete, Contract, ContractCode, Effect, Env,
  EvmError, Expr, ExprContractMap, ForkState, Frame, FrameContext, FrameState, Memory, MutableMemory, PartialExec,
  Query, RuntimeCodeStruct, RuntimeConfig, SubState, Symbolic, Trace, TraceContext, TraceData, TreeZipper, TxState,
  VMOps, VMOpts, VMResult, Word64, VM, W256, W64,
};

pub const STACK_LIMIT: usize = 1024;
pub const CALL_DEPTH_LIMIT: usize = 1024;

// Contract construction ---------------------------------------------------------------------------

pub fn is_creation(code: &ContractCode) -> bool {
  matches!(code, ContractCode::InitCode(_, _))
}

/// The code hash as a word; concrete code reduces to a literal digest.
pub fn hashcode(code: &ContractCode) -> Expr {
  match code {
    ContractCode::UnknownCode(addr) => Expr::CodeHash(addr.clone()),
    _ => match to_buf(code) {
      Some(buf) => keccak(buf),
      None => internal_error("no buffer view for code"),
    },
  }
}

fn disassemble(code: &ContractCode) -> (Vec<usize>, Vec<(usize, crate::modules::op::Op)>) {
  match code {
    ContractCode::UnknownCode(_) => (Vec::new(), Vec::new()),
    _ => (mk_op_ix_map(code), mk_code_ops(code)),
  }
}

/// A contract with empty concrete storage, as created by deployment.
pub fn initial_contract(code: ContractCode) -> Contract {
  let (op_idx_map, code_ops) = disassemble(&code);
  let nonce = if is_creation(&code) { Some(W64(1)) } else { Some(W64(0)) };
  let codehash = hashcode(&code);
  Contract {
    code,
    storage: Expr::ConcreteStore(BTreeMap::new()),
    t_storage: Expr::ConcreteStore(BTreeMap::new()),
    orig_storage: Expr::ConcreteStore(BTreeMap::new()),
    balance: Expr::Lit(W256::zero()),
    nonce,
    codehash,
    op_idx_map,
    code_ops,
    external: false,
  }
}

/// Known code at an address whose storage and balance stay abstract.
pub fn abstract_contract(code: ContractCode, addr: Expr) -> Contract {
  let (op_idx_map, code_ops) = disassemble(&code);
  let nonce = if is_creation(&code) { Some(W64(1)) } else { Some(W64(0)) };
  let codehash = hashcode(&code);
  Contract {
    code,
    storage: Expr::AbstractStore(Box::new(addr.clone()), None),
    // transient storage starts zeroed every transaction, even here
    t_storage: Expr::ConcreteStore(BTreeMap::new()),
    orig_storage: Expr::AbstractStore(Box::new(addr.clone()), None),
    balance: Expr::Balance(Box::new(addr)),
    nonce,
    codehash,
    op_idx_map,
    code_ops,
    external: false,
  }
}

/// An address about which nothing is known, not even its code.
pub fn unknown_contract(addr: Expr) -> Contract {
  let code = ContractCode::UnknownCode(Box::new(addr.clone()));
  Contract {
    codehash: hashcode(&code),
    code,
    storage: Expr::AbstractStore(Box::new(addr.clone()), None),
    t_storage: Expr::ConcreteStore(BTreeMap::new()),
    orig_storage: Expr::AbstractStore(Box::new(addr.clone()), None),
    balance: Expr::Balance(Box::new(addr)),
    nonce: None,
    op_idx_map: Vec::new(),
    code_ops: Vec::new(),
    external: false,
  }
}

pub fn empty_contract() -> Contract {
  initial_contract(ContractCode::RuntimeCode(RuntimeCodeStruct::ConcreteRuntimeCode(Vec::new())))
}

pub fn bytecode(contract: &Contract) -> Option<Expr> {
  match &contract.code {
    ContractCode::InitCode(_, _) => Some(Expr::ConcreteBuf(Vec::new())),
    code => to_buf(code),
  }
}

/// Byte length of the executable code region.
pub fn opslen(code: &ContractCode) -> usize {
  match code {
    ContractCode::UnknownCode(_) => 0,
    ContractCode::InitCode(conc, _) => conc.len(),
    ContractCode::RuntimeCode(RuntimeCodeStruct::ConcreteRuntimeCode(data)) => data.len(),
    ContractCode::RuntimeCode(RuntimeCodeStruct::SymbolicRuntimeCode(data)) => data.len(),
  }
}

// VM construction ---------------------------------------------------------------------------------

pub fn blank_state<T: VMOps>() -> FrameState<T> {
  FrameState {
    contract: Expr::LitAddr(Addr::zero()),
    code_contract: Expr::LitAddr(Addr::zero()),
    code: ContractCode::RuntimeCode(RuntimeCodeStruct::ConcreteRuntimeCode(Vec::new())),
    pc: 0,
    stack: Vec::new(),
    memory: Memory::ConcreteMemory(Vec::new()),
    memory_size: 0,
    calldata: Expr::ConcreteBuf(Vec::new()),
    callvalue: Expr::Lit(W256::zero()),
    caller: Expr::LitAddr(Addr::zero()),
    gas: T::Gas::default(),
    returndata: Expr::ConcreteBuf(Vec::new()),
    static_flag: false,
  }
}

pub fn make_vm<T: VMOps>(opts: VMOpts<T>) -> VM<T> {
  let tx_origin = opts.origin.clone();
  let tx_to_addr = opts.address.clone();
  let mut initial_accessed_addrs: BTreeSet<Expr> =
    [tx_origin.clone(), tx_to_addr.clone(), opts.coinbase.clone()].into_iter().collect();
  for i in 1..=9u64 {
    initial_accessed_addrs.insert(Expr::LitAddr(Addr::from(i)));
  }
  for addr in opts.tx_access_list.keys() {
    initial_accessed_addrs.insert(addr.clone());
  }
  let initial_accessed_storage_keys: BTreeSet<(Expr, W256)> =
    opts.tx_access_list.iter().flat_map(|(k, vs)| vs.iter().map(move |v| (k.clone(), *v))).collect();
  let touched =
    if opts.create { vec![tx_origin.clone()] } else { vec![tx_origin.clone(), tx_to_addr.clone()] };

  let mut contracts: ExprContractMap = opts.other_contracts.iter().cloned().collect();
  contracts.insert(opts.address.clone(), opts.contract.clone());

  let env = Env {
    contracts: contracts.clone(),
    chain_id: opts.chain_id,
    fresh_address: 0,
    fresh_gas_vals: 0,
  };
  let block = Block {
    coinbase: opts.coinbase.clone(),
    time_stamp: opts.time_stamp.clone(),
    number: opts.number,
    prev_randao: opts.prev_randao,
    gaslimit: opts.block_gaslimit,
    base_fee: opts.base_fee,
    max_code_size: opts.max_code_size,
    schedule: opts.schedule.clone(),
  };

  VM {
    result: None,
    frames: Vec::new(),
    tx: TxState {
      gasprice: opts.gasprice,
      gaslimit: opts.gaslimit,
      priority_fee: opts.priority_fee,
      origin: tx_origin,
      to_addr: tx_to_addr,
      value: opts.value.clone(),
      substate: SubState {
        selfdestructs: Vec::new(),
        touched_accounts: touched,
        accessed_addresses: initial_accessed_addrs,
        accessed_storage_keys: initial_accessed_storage_keys,
        refunds: Vec::new(),
      },
      is_create: opts.create,
      tx_reversion: contracts.clone(),
    },
    logs: Vec::new(),
    traces: TreeZipper::new(),
    block: block.clone(),
    state: FrameState {
      pc: 0,
      stack: Vec::new(),
      memory: Memory::ConcreteMemory(Vec::new()),
      memory_size: 0,
      code: opts.contract.code.clone(),
      contract: opts.address.clone(),
      code_contract: opts.address.clone(),
      calldata: opts.calldata.0.clone(),
      callvalue: opts.value,
      caller: opts.caller,
      gas: opts.gas,
      returndata: Expr::ConcreteBuf(Vec::new()),
      static_flag: false,
    },
    env: env.clone(),
    cache: Cache::default(),
    burned: T::Gas::default(),
    constraints: opts.calldata.1,
    iterations: HashMap::new(),
    config: RuntimeConfig {
      allow_ffi: opts.allow_ffi,
      reset_caller: true,
      override_caller: None,
      base_state: opts.base_state,
    },
    forks: VecDeque::from([ForkState { env, block, cache: Cache::default(), url_or_alias: String::new() }]),
    current_fork: 0,
    labels: HashMap::new(),
  }
}

pub fn current_contract<T: VMOps>(vm: &VM<T>) -> Option<Contract> {
  vm.env.contracts.get(&vm.state.code_contract).cloned()
}

/// A fresh, named symbolic address.
pub fn fresh_sym_addr<T: VMOps>(vm: &mut VM<T>) -> Expr {
  vm.env.fresh_address += 1;
  Expr::SymAddr(format!("freshSymAddr{}", vm.env.fresh_address))
}

// Stack -------------------------------------------------------------------------------------------

pub fn push_sym<T: VMOps>(vm: &mut VM<T>, expr: Expr) -> Result<(), EvmError> {
  if vm.state.stack.len() >= STACK_LIMIT {
    return Err(EvmError::StackLimitExceeded);
  }
  vm.state.stack.push(expr);
  Ok(())
}

pub fn push_addr<T: VMOps>(vm: &mut VM<T>, addr: Expr) -> Result<(), EvmError> {
  push_sym(vm, Expr::WAddr(Box::new(addr)))
}

// Memory ------------------------------------------------------------------------------------------

pub fn expand_memory(memory: &mut MutableMemory, target: usize) {
  if target > memory.len() {
    memory.resize(target, 0);
  }
}

pub fn write_memory(memory: &mut MutableMemory, offset: usize, buf: &[u8]) {
  expand_memory(memory, offset + buf.len());
  memory[offset..offset + buf.len()].copy_from_slice(buf);
}

/// The current memory contents as an immutable buffer term.
pub fn freeze_memory(memory: &Memory) -> Expr {
  match memory {
    Memory::ConcreteMemory(mem) => Expr::ConcreteBuf(mem.clone()),
    Memory::SymbolicMemory(expr) => expr.clone(),
  }
}

pub fn read_memory<T: VMOps>(vm: &VM<T>, offset: &Expr, size: &Expr) -> Expr {
  if let (Memory::ConcreteMemory(mem), Some(off), Some(sz)) =
    (&vm.state.memory, maybe_lit_word(offset), maybe_lit_word(size))
  {
    if sz.is_zero() {
      return Expr::ConcreteBuf(Vec::new());
    }
    if sz < W256(MAX_BYTES as u128, 0) {
      if let (Some(off), Some(sz)) = (off.to_usize(), sz.to_usize()) {
        if off.checked_add(sz).is_some() {
          let bytes: Vec<u8> = (off..off + sz).map(|i| mem.get(i).copied().unwrap_or(0)).collect();
          return Expr::ConcreteBuf(bytes);
        }
      }
    }
  }
  copy_slice(
    Box::new(offset.clone()),
    Box::new(Expr::Lit(W256::zero())),
    Box::new(size.clone()),
    Box::new(freeze_memory(&vm.state.memory)),
    Box::new(Expr::ConcreteBuf(Vec::new())),
  )
}

/// Copy a buffer slice into frame memory; falls over to symbolic memory as
/// soon as any coordinate stays symbolic.
pub fn copy_bytes_to_memory<T: VMOps>(vm: &mut VM<T>, bs: Expr, size: Expr, src_offset: Expr, mem_offset: Expr) {
  if let Some(n) = maybe_lit_word(&size) {
    if n.is_zero() {
      return;
    }
  }
  let concrete_args = (
    to_concrete_buf(&bs),
    maybe_lit_word(&size).and_then(|w| w.to_usize()),
    maybe_lit_word(&src_offset).and_then(|w| w.to_usize()),
    maybe_lit_word(&mem_offset).and_then(|w| w.to_usize()),
  );
  match &mut vm.state.memory {
    Memory::ConcreteMemory(mem) => match concrete_args {
      (Some(b), Some(sz), Some(so), Some(mo))
        if (mo as u64).saturating_add(sz as u64) < MAX_BYTES && so.checked_add(sz).is_some() =>
      {
        let src: Vec<u8> = (so..so + sz).map(|i| b.get(i).copied().unwrap_or(0)).collect();
        write_memory(mem, mo, &src);
      }
      _ => {
        let frozen = Expr::ConcreteBuf(mem.clone());
        vm.state.memory = Memory::SymbolicMemory(copy_slice(
          Box::new(src_offset),
          Box::new(mem_offset),
          Box::new(size),
          Box::new(bs),
          Box::new(frozen),
        ));
      }
    },
    Memory::SymbolicMemory(mem_expr) => {
      let mem = mem_expr.clone();
      vm.state.memory = Memory::SymbolicMemory(copy_slice(
        Box::new(src_offset),
        Box::new(mem_offset),
        Box::new(size),
        Box::new(bs),
        Box::new(mem),
      ));
    }
  }
}

// Traces ------------------------------------------------------------------------------------------

fn mk_trace<T: VMOps>(vm: &VM<T>, data: TraceData) -> Trace {
  let contract = current_contract(vm).unwrap_or_else(empty_contract);
  let op_ix = contract.op_idx_map.get(vm.state.pc).copied().unwrap_or(vm.state.pc);
  Trace { op_ix, contract, tracedata: data }
}

/// Open a trace subtree; paired with `pop_trace` on frame exit.
pub fn push_trace<T: VMOps>(vm: &mut VM<T>, data: TraceData) {
  let trace = mk_trace(vm, data);
  vm.traces.push_child(trace);
}

/// Record a leaf at the current position.
pub fn insert_trace<T: VMOps>(vm: &mut VM<T>, data: TraceData) {
  let trace = mk_trace(vm, data);
  vm.traces.insert_leaf(trace);
}

pub fn pop_trace<T: VMOps>(vm: &mut VM<T>) {
  vm.traces.ascend();
}

/// The snapshot embedded into terminal expressions.
pub fn trace_context<T: VMOps>(vm: &VM<T>) -> TraceContext {
  TraceContext {
    traces: vm.traces.to_forest(),
    contracts: vm.env.contracts.clone(),
    labels: vm.labels.iter().map(|(k, v)| (*k, v.clone())).collect(),
  }
}

// Substate ----------------------------------------------------------------------------------------

pub fn touch_account<T: VMOps>(vm: &mut VM<T>, addr: &Expr) {
  vm.tx.substate.touched_accounts.push(addr.clone());
}

/// Marks an address warm; returns whether it was already warm (EIP-2929).
pub fn access_account<T: VMOps>(vm: &mut VM<T>, addr: &Expr) -> bool {
  !vm.tx.substate.accessed_addresses.insert(addr.clone())
}

/// Marks a storage key warm; returns whether it was already warm.
pub fn access_storage_key<T: VMOps>(vm: &mut VM<T>, addr: &Expr, key: W256) -> bool {
  !vm.tx.substate.accessed_storage_keys.insert((addr.clone(), key))
}

/// Move value between accounts. Fully concrete balances are checked and
/// updated in place; symbolic balances become arithmetic terms.
pub fn transfer<T: VMOps>(vm: &mut VM<T>, from: &Expr, to: &Expr, value: Expr) -> Result<(), EvmError> {
  if maybe_lit_word(&value).map_or(false, |v| v.is_zero()) {
    return Ok(());
  }
  let from_balance = match vm.env.contracts.get(from) {
    Some(c) => c.balance.clone(),
    None => return Err(EvmError::BalanceTooLow(Box::new(Expr::Lit(W256::zero())), Box::new(value))),
  };
  match (maybe_lit_word(&from_balance), maybe_lit_word(&value)) {
    (Some(have), Some(need)) if have < need => {
      return Err(EvmError::BalanceTooLow(Box::new(from_balance), Box::new(value)))
    }
    _ => {}
  }
  let debited = crate::modules::expr::sub(Box::new(from_balance), Box::new(value.clone()));
  if let Some(c) = vm.env.contracts.get_mut(from) {
    c.balance = debited;
  }
  let to_balance = match vm.env.contracts.get(to) {
    Some(c) => c.balance.clone(),
    None => {
      vm.env.contracts.insert(to.clone(), unknown_contract(to.clone()));
      vm.env.contracts[to].balance.clone()
    }
  };
  let credited = crate::modules::expr::add(Box::new(to_balance), Box::new(value));
  if let Some(c) = vm.env.contracts.get_mut(to) {
    c.balance = credited;
  }
  Ok(())
}

// Frames ------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameResult {
  FrameReturned(Expr),
  FrameReverted(Expr),
  FrameErrored(EvmError),
}

/// Suspend the current frame and enter a new one. The context must carry the
/// reversion snapshot and substate copied at entry.
pub fn push_frame<T: VMOps>(vm: &mut VM<T>, context: FrameContext, state: FrameState<T>) -> Result<(), EvmError> {
  if vm.frames.len() >= CALL_DEPTH_LIMIT {
    return Err(EvmError::CallDepthLimitReached);
  }
  push_trace(vm, TraceData::FrameTrace(context.clone()));
  let suspended = std::mem::replace(&mut vm.state, state);
  vm.frames.push(Frame { context, state: suspended });
  Ok(())
}

fn install_runtime_code<T: VMOps>(vm: &mut VM<T>, target: &Expr, bytes: Vec<u8>) {
  if let Some(now) = vm.env.contracts.get_mut(target) {
    if !matches!(now.code, ContractCode::InitCode(_, _)) {
      internal_error("can't replace code of an already deployed contract");
    }
    let fresh = initial_contract(ContractCode::RuntimeCode(RuntimeCodeStruct::ConcreteRuntimeCode(bytes)));
    now.code = fresh.code;
    now.codehash = fresh.codehash;
    now.op_idx_map = fresh.op_idx_map;
    now.code_ops = fresh.code_ops;
  }
}

/// Pop the current frame. Reversion state is reinstated on revert and error;
/// revert alone preserves returndata. With no parent frame the VM result is
/// final.
pub fn finish_frame<T: VMOps>(vm: &mut VM<T>, result: FrameResult) {
  // a deployment larger than the code size cap fails the create
  let result = match (&result, vm.frames.last()) {
    (FrameResult::FrameReturned(out), Some(Frame { context: FrameContext::CreationContext { .. }, .. })) => {
      match to_concrete_buf(out) {
        Some(bytes) if W256::from(bytes.len()) > vm.block.max_code_size => FrameResult::FrameErrored(
          EvmError::MaxCodeSizeExceeded(vm.block.max_code_size, W256::from(bytes.len())),
        ),
        _ => result,
      }
    }
    _ => result,
  };

  match (&result, vm.frames.last()) {
    (FrameResult::FrameErrored(e), _) => insert_trace(vm, TraceData::ErrorTrace(e.clone())),
    (FrameResult::FrameReturned(out), Some(frame)) => {
      insert_trace(vm, TraceData::ReturnTrace(out.clone(), frame.context.clone()))
    }
    (FrameResult::FrameReverted(out), Some(frame)) => {
      insert_trace(vm, TraceData::ReturnTrace(out.clone(), frame.context.clone()))
    }
    _ => {}
  }
  pop_trace(vm);

  let frame = match vm.frames.pop() {
    None => {
      vm.result = Some(match result {
        FrameResult::FrameReturned(buf) => VMResult::VMSuccess(buf),
        FrameResult::FrameReverted(buf) => VMResult::VMFailure(EvmError::Revert(Box::new(buf))),
        FrameResult::FrameErrored(e) => VMResult::VMFailure(e),
      });
      return;
    }
    Some(frame) => frame,
  };

  let child_gas = vm.state.gas;
  vm.state = frame.state;
  if !matches!(result, FrameResult::FrameErrored(_)) {
    T::reclaim_gas(vm, child_gas);
  }

  match frame.context {
    FrameContext::CallContext { offset, size, callreversion, substate, .. } => match result {
      FrameResult::FrameReturned(output) => {
        let n = emin(Box::new(size), Box::new(buf_length(Box::new(output.clone()))));
        copy_bytes_to_memory(vm, output.clone(), n, Expr::Lit(W256::zero()), offset);
        vm.state.returndata = output;
        vm.state.stack.push(Expr::Lit(W256::one()));
      }
      FrameResult::FrameReverted(output) => {
        vm.env.contracts = callreversion;
        vm.tx.substate = substate;
        let n = emin(Box::new(size), Box::new(buf_length(Box::new(output.clone()))));
        copy_bytes_to_memory(vm, output.clone(), n, Expr::Lit(W256::zero()), offset);
        vm.state.returndata = output;
        vm.state.stack.push(Expr::Lit(W256::zero()));
      }
      FrameResult::FrameErrored(_) => {
        vm.env.contracts = callreversion;
        vm.tx.substate = substate;
        vm.state.returndata = Expr::ConcreteBuf(Vec::new());
        vm.state.stack.push(Expr::Lit(W256::zero()));
      }
    },
    FrameContext::CreationContext { address, createreversion, substate, .. } => match result {
      FrameResult::FrameReturned(output) => match to_concrete_buf(&output) {
        Some(bytes) => {
          install_runtime_code(vm, &address, bytes);
          vm.state.returndata = Expr::ConcreteBuf(Vec::new());
          vm.state.stack.push(Expr::WAddr(Box::new(address)));
        }
        // symbolic deployments leave the init code in place for the driver
        None => {
          vm.state.returndata = Expr::ConcreteBuf(Vec::new());
          vm.state.stack.push(Expr::WAddr(Box::new(address)));
        }
      },
      FrameResult::FrameReverted(output) => {
        vm.env.contracts = createreversion;
        vm.tx.substate = substate;
        vm.state.returndata = output;
        vm.state.stack.push(Expr::Lit(W256::zero()));
      }
      FrameResult::FrameErrored(_) => {
        vm.env.contracts = createreversion;
        vm.tx.substate = substate;
        vm.state.returndata = Expr::ConcreteBuf(Vec::new());
        vm.state.stack.push(Expr::Lit(W256::zero()));
      }
    },
  }
}

/// Record an EVM-level failure; unwinds the current frame.
pub fn vm_error<T: VMOps>(vm: &mut VM<T>, e: EvmError) {
  finish_frame(vm, FrameResult::FrameErrored(e));
}

/// Halt with a partial-execution marker, keeping gathered constraints.
pub fn partial<T: VMOps>(vm: &mut VM<T>, p: PartialExec) {
  vm.result = Some(VMResult::Unfinished(p));
}

/// The current end state as a terminal expression.
pub fn end_state<T: VMOps>(vm: &VM<T>) -> Option<Expr> {
  match &vm.result {
    Some(VMResult::VMSuccess(buf)) => {
      let contracts = vm
        .env
        .contracts
        .iter()
        .map(|(a, c)| {
          (
            a.clone(),
            Expr::C {
              code: c.code.clone(),
              storage: Box::new(c.storage.clone()),
              t_storage: Box::new(c.t_storage.clone()),
              balance: Box::new(c.balance.clone()),
              nonce: c.nonce,
            },
          )
        })
        .collect();
      Some(Expr::Success(vm.constraints.clone(), trace_context(vm), Box::new(buf.clone()), contracts))
    }
    Some(VMResult::VMFailure(e)) => Some(Expr::Failure(vm.constraints.clone(), trace_context(vm), e.clone())),
    Some(VMResult::Unfinished(p)) => Some(Expr::Partial(vm.constraints.clone(), trace_context(vm), p.clone())),
    _ => None,
  }
}

// Forks -------------------------------------------------------------------------------------------

pub fn select_fork<T: VMOps>(vm: &mut VM<T>, fork_id: i32) -> Result<(), EvmError> {
  let idx = usize::try_from(fork_id).map_err(|_| EvmError::NonexistentFork(fork_id))?;
  if idx >= vm.forks.len() {
    return Err(EvmError::NonexistentFork(fork_id));
  }
  let current = usize::try_from(vm.current_fork).unwrap_or(0);
  if let Some(slot) = vm.forks.get_mut(current) {
    slot.env = vm.env.clone();
    slot.block = vm.block.clone();
    slot.cache = vm.cache.clone();
  }
  let chosen = vm.forks[idx].clone();
  vm.env = chosen.env;
  vm.block = chosen.block;
  vm.cache = chosen.cache;
  vm.current_fork = fork_id;
  Ok(())
}

// Gas and cost math -------------------------------------------------------------------------------

/// EIP-150: the most a call may forward.
pub fn all_but_one_64th(g: Word64) -> Word64 {
  g - g / 64
}

fn ceil32_div(n: Word64) -> Word64 {
  n / 32 + (n % 32 != 0) as Word64
}

/// Total cost of `byte_count` bytes of memory: linear plus quadratic term.
pub fn memory_cost(schedule: &FeeSchedule<Word64>, byte_count: Word64) -> Word64 {
  let words = ceil32_div(byte_count);
  let linear = words.saturating_mul(schedule.g_memory);
  let quadratic = words.saturating_mul(words) / 512;
  linear.saturating_add(quadratic)
}

fn concrete_cost_of_call(
  schedule: &FeeSchedule<Word64>,
  recipient_exists: bool,
  transfers_value: bool,
  available_gas: Word64,
  requested_gas: Word64,
  warm: bool,
) -> (Word64, Word64) {
  let c_access = if warm { schedule.g_warm_storage_read } else { schedule.g_cold_account_access };
  let c_xfer = if transfers_value { schedule.g_callvalue } else { 0 };
  let c_new = if !recipient_exists && transfers_value { schedule.g_newaccount } else { 0 };
  let c_extra = c_access + c_xfer + c_new;
  let c_gascap = if available_gas >= c_extra {
    std::cmp::min(requested_gas, all_but_one_64th(available_gas - c_extra))
  } else {
    requested_gas
  };
  let c_callgas = if transfers_value { c_gascap + schedule.g_callstipend } else { c_gascap };
  (c_gascap + c_extra, c_callgas)
}

fn concrete_cost_of_create(
  schedule: &FeeSchedule<Word64>,
  create2: bool,
  init_code_len: Word64,
  available_gas: Word64,
) -> (Word64, Word64) {
  let init_words = ceil32_div(init_code_len);
  let hash_cost = if create2 { schedule.g_sha3word * init_words } else { 0 };
  let init_code_cost = schedule.g_initcodeword * init_words;
  let create_cost = schedule.g_create + hash_cost + init_code_cost;
  let init_gas = all_but_one_64th(available_gas.saturating_sub(create_cost));
  (create_cost, init_gas)
}

// The concrete flavor -----------------------------------------------------------------------------

impl VMOps for Concrete {
  type Gas = Word64;

  fn initial_gas(gaslimit: Word64) -> Word64 {
    gaslimit
  }

  fn burn(vm: &mut VM<Self>, n: Word64) -> Result<(), EvmError> {
    if vm.state.gas < n {
      return Err(EvmError::OutOfGas(vm.state.gas, n));
    }
    vm.state.gas -= n;
    vm.burned += n;
    Ok(())
  }

  fn burn_exp(vm: &mut VM<Self>, exponent: &Expr) -> Result<(), EvmError> {
    let e = match maybe_lit_word(exponent) {
      Some(e) => e,
      None => internal_error("symbolic exponent in concrete execution"),
    };
    let fees = &vm.block.schedule;
    let cost = fees.g_exp + fees.g_expbyte * e.byte_len();
    Self::burn(vm, cost)
  }

  fn burn_sha3(vm: &mut VM<Self>, x_size: &Expr) -> Result<(), EvmError> {
    let size = match maybe_lit_word(x_size) {
      Some(s) => s,
      None => internal_error("symbolic hash width in concrete execution"),
    };
    let fees = &vm.block.schedule;
    let words = match size.to_u64() {
      Some(n) => ceil32_div(n),
      None => return Err(EvmError::IllegalOverflow),
    };
    let cost = fees.g_sha3 + fees.g_sha3word * words;
    Self::burn(vm, cost)
  }

  fn ensure_gas(vm: &mut VM<Self>, n: Word64) -> bool {
    vm.state.gas >= n
  }

  fn gas_try_from(w: &Expr) -> Result<Word64, EvmError> {
    maybe_lit_word(w).and_then(|x| x.to_u64()).ok_or(EvmError::IllegalOverflow)
  }

  fn access_memory_range(vm: &mut VM<Self>, offset: &Expr, size: &Expr) -> Result<(), EvmError> {
    let (offset, size) = match (maybe_lit_word(offset), maybe_lit_word(size)) {
      (Some(o), Some(s)) => (o, s),
      _ => internal_error("symbolic memory range in concrete execution"),
    };
    if size.is_zero() {
      return Ok(());
    }
    let (o, s) = match (offset.to_u64(), size.to_u64()) {
      (Some(o), Some(s)) => (o, s),
      _ => return Err(EvmError::IllegalOverflow),
    };
    let end = o.checked_add(s).ok_or(EvmError::IllegalOverflow)?;
    let new_size = ceil32_div(end).saturating_mul(32);
    if new_size > vm.state.memory_size {
      let fees = vm.block.schedule.clone();
      let delta = memory_cost(&fees, new_size) - memory_cost(&fees, vm.state.memory_size);
      Self::burn(vm, delta)?;
      vm.state.memory_size = new_size;
    }
    Ok(())
  }

  fn cost_of_call(
    schedule: &FeeSchedule<Word64>,
    recipient_exists: bool,
    transfers_value: bool,
    available_gas: Word64,
    requested_gas: Word64,
    warm: bool,
  ) -> (Word64, Word64) {
    concrete_cost_of_call(schedule, recipient_exists, transfers_value, available_gas, requested_gas, warm)
  }

  fn cost_of_create(
    schedule: &FeeSchedule<Word64>,
    create2: bool,
    init_code_len: Word64,
    available_gas: Word64,
  ) -> (Word64, Word64) {
    concrete_cost_of_create(schedule, create2, init_code_len, available_gas)
  }

  fn branch(vm: &mut VM<Self>, cond: &Expr, k: BranchResume) -> Result<(), EvmError> {
    let c = match maybe_lit_word(cond) {
      Some(c) => c,
      None => internal_error("symbolic branch condition in concrete execution"),
    };
    vm.state.pc = if c.is_zero() { k.pc_false } else { k.pc_true };
    Ok(())
  }

  fn reclaim_gas(vm: &mut VM<Self>, unused: Word64) {
    vm.state.gas += unused;
    vm.burned -= unused;
  }

  fn remaining_gas_expr(vm: &mut VM<Self>) -> Expr {
    Expr::Lit(W256::from(vm.state.gas))
  }
}

// The symbolic flavor -----------------------------------------------------------------------------

impl VMOps for Symbolic {
  type Gas = ();

  fn initial_gas(_gaslimit: Word64) -> () {}

  fn burn(_vm: &mut VM<Self>, _n: Word64) -> Result<(), EvmError> {
    Ok(())
  }

  fn burn_exp(_vm: &mut VM<Self>, _exponent: &Expr) -> Result<(), EvmError> {
    Ok(())
  }

  fn burn_sha3(_vm: &mut VM<Self>, _x_size: &Expr) -> Result<(), EvmError> {
    Ok(())
  }

  fn ensure_gas(_vm: &mut VM<Self>, _n: Word64) -> bool {
    true
  }

  fn gas_try_from(_w: &Expr) -> Result<(), EvmError> {
    Ok(())
  }

  fn access_memory_range(vm: &mut VM<Self>, offset: &Expr, size: &Expr) -> Result<(), EvmError> {
    // no gas, but msize still tracks fully concrete ranges
    if let (Some(o), Some(s)) = (
      maybe_lit_word(offset).and_then(|w| w.to_u64()),
      maybe_lit_word(size).and_then(|w| w.to_u64()),
    ) {
      if s > 0 {
        if let Some(end) = o.checked_add(s) {
          vm.state.memory_size = std::cmp::max(vm.state.memory_size, ceil32_div(end).saturating_mul(32));
        }
      }
    }
    Ok(())
  }

  fn cost_of_call(
    _schedule: &FeeSchedule<Word64>,
    _recipient_exists: bool,
    _transfers_value: bool,
    _available_gas: Word64,
    _requested_gas: Word64,
    _warm: bool,
  ) -> (Word64, Word64) {
    (0, 0)
  }

  fn cost_of_create(
    _schedule: &FeeSchedule<Word64>,
    _create2: bool,
    _init_code_len: Word64,
    _available_gas: Word64,
  ) -> (Word64, Word64) {
    (0, 0)
  }

  /// Path split: a cached choice is replayed, otherwise the solver is asked
  /// whether the condition is forced under the current constraints.
  fn branch(vm: &mut VM<Self>, cond: &Expr, k: BranchResume) -> Result<(), EvmError> {
    if let Some(&choice) = vm.cache.path.get(&((k.loc.clone()), k.iteration)) {
      vm.take_branch(cond, choice, &k);
      return Ok(());
    }
    vm.result = Some(VMResult::HandleEffect(Effect::Query(Query::PleaseAskSmt(
      Box::new(cond.clone()),
      vm.constraints.clone(),
      k,
    ))));
    Ok(())
  }

  fn reclaim_gas(_vm: &mut VM<Self>, _unused: ()) {}

  fn remaining_gas_expr(vm: &mut VM<Self>) -> Expr {
    vm.env.fresh_gas_vals += 1;
    Expr::Gas(vm.env.fresh_gas_vals)
  }
}
