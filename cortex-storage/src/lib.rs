//! C1: the persistent entity/link store. SQLite via `rusqlite` (bundled,
//! so no system library dependency), one writer connection guarded by a
//! mutex and a small pool of read-only connections, WAL journal mode, and
//! a 5s busy timeout per spec §5/§6.

pub mod convert;
pub mod migrations;
pub mod pool;
pub mod queries;
pub mod store;

pub use store::SqliteStore;
