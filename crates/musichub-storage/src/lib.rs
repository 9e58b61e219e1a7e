pub mod config;
pub mod error;
pub mod memory;
mod merge;
pub mod models;
pub mod schema;
pub mod sqlite;

pub use config::StorageConfig;
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use sqlite::{MIGRATIONS, SqliteStore};
