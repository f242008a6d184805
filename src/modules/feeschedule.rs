use serde::{Deserialize, Serialize};

/// The gas cost table, polymorphic in the number representation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule<T> {
  pub g_zero: T,
  pub g_base: T,
  pub g_verylow: T,
  pub g_low: T,
  pub g_mid: T,
  pub g_high: T,
  pub g_extcode: T,
  pub g_balance: T,
  pub g_sload: T,
  pub g_jumpdest: T,
  pub g_sset: T,
  pub g_sreset: T,
  pub r_sclear: T,
  pub g_selfdestruct: T,
  pub g_selfdestruct_newaccount: T,
  pub r_selfdestruct: T,
  pub g_create: T,
  pub g_codedeposit: T,
  pub g_call: T,
  pub g_callvalue: T,
  pub g_callstipend: T,
  pub g_newaccount: T,
  pub g_exp: T,
  pub g_expbyte: T,
  pub g_memory: T,
  pub g_txcreate: T,
  pub g_txdatazero: T,
  pub g_txdatanonzero: T,
  pub g_transaction: T,
  pub g_log: T,
  pub g_logdata: T,
  pub g_logtopic: T,
  pub g_sha3: T,
  pub g_sha3word: T,
  pub g_initcodeword: T,
  pub g_copy: T,
  pub g_blockhash: T,
  pub g_extcodehash: T,
  pub g_quaddivisor: T,
  pub g_ecadd: T,
  pub g_ecmul: T,
  pub g_pairing_point: T,
  pub g_pairing_base: T,
  pub g_fround: T,
  pub r_block: T,
  pub g_cold_sload: T,
  pub g_cold_account_access: T,
  pub g_warm_storage_read: T,
  pub g_access_list_address: T,
  pub g_access_list_storage_key: T,
}

/// Mainnet costs as of Cancun.
pub fn fee_schedule() -> FeeSchedule<u64> {
  FeeSchedule {
    g_zero: 0,
    g_base: 2,
    g_verylow: 3,
    g_low: 5,
    g_mid: 8,
    g_high: 10,
    g_extcode: 2600,
    g_balance: 2600,
    g_sload: 100,
    g_jumpdest: 1,
    g_sset: 20000,
    g_sreset: 2900,
    r_sclear: 4800,
    g_selfdestruct: 5000,
    g_selfdestruct_newaccount: 25000,
    r_selfdestruct: 24000,
    g_create: 32000,
    g_codedeposit: 200,
    g_call: 2600,
    g_callvalue: 9000,
    g_callstipend: 2300,
    g_newaccount: 25000,
    g_exp: 10,
    g_expbyte: 50,
    g_memory: 3,
    g_txcreate: 32000,
    g_txdatazero: 4,
    g_txdatanonzero: 16,
    g_transaction: 21000,
    g_log: 375,
    g_logdata: 8,
    g_logtopic: 375,
    g_sha3: 30,
    g_sha3word: 6,
    g_initcodeword: 2,
    g_copy: 3,
    g_blockhash: 20,
    g_extcodehash: 2600,
    g_quaddivisor: 3,
    g_ecadd: 150,
    g_ecmul: 6000,
    g_pairing_point: 34000,
    g_pairing_base: 45000,
    g_fround: 1,
    r_block: 2000000000000000000,
    g_cold_sload: 2100,
    g_cold_account_access: 2600,
    g_warm_storage_read: 100,
    g_access_list_address: 2400,
    g_access_list_storage_key: 1900,
  }
}
