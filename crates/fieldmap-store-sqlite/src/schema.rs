//! SQL schema for the snapshot table.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One whole-collection JSON blob per entity kind.
CREATE TABLE IF NOT EXISTS snapshots (
    key        TEXT PRIMARY KEY,   -- e.g. 'saved_customers'
    value      BLOB NOT NULL,      -- JSON-encoded list of records
    updated_at TEXT NOT NULL       -- ISO 8601 UTC; diagnostic only
);

PRAGMA user_version = 1;
";
