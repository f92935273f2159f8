pub mod filesystem;
pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use filesystem::FilesystemStore;
pub use memory::{MemoryInsightStore, MemoryObjectStore};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteInsightStore;
