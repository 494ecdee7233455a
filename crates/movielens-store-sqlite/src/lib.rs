//! SQLite backend for the MovieLens catalog.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. That thread executes one call
//! at a time, which is the whole concurrency model: operations are
//! serialised and each runs to completion before the next begins.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
