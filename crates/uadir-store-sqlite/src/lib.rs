//! SQLite backend for the uadir expert directory.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Each store call is one closure on that
//! thread; multi-statement writes run inside a single transaction.

mod encode;
mod read;
mod schema;
mod stats;
mod store;
mod write;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
