pub mod initialize;
pub mod log;
pub mod maintenance;
pub mod memory;
pub mod migrate;
pub mod pool;
pub mod queries;
pub mod sqlite_store;
pub mod stats;
pub mod store;

pub use memory::{MemoryActivityStore, UnavailableStore};
pub use sqlite_store::SqliteActivityStore;
pub use store::ActivityStore;
