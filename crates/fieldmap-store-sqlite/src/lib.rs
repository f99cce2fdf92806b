//! SQLite backend for the fieldmap snapshot store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread pool without blocking the async runtime. One row per entity
//! kind: the store persists whole-collection JSON blobs, so the schema is
//! a plain key/value table.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteSnapshotStore;
