pub mod memory;
pub mod sqlite;
pub mod trait_def;

pub use memory::MemoryGateStore;
pub use sqlite::{SqliteGateStore, GATE_KEY};
pub use trait_def::{GateStore, StoreError, StoreResult};
