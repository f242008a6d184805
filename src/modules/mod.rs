pub mod effects;
pub mod etypes;
pub mod evm;
pub mod expr;
pub mod feeschedule;
pub mod format;
pub mod keccak;
pub mod op;
pub mod transactions;
pub mod traversals;
pub mod types;
