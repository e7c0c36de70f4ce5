//! Database implementations for tests and simple use cases.

mod emptydb;
mod in_memory_db;

pub use emptydb::EmptyDB;
pub use in_memory_db::{CacheDB, DbAccount, InMemoryDB};

pub use primitives::db::{Database, DatabaseRef};
