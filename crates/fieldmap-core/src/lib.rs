//! Core types and trait definitions for the fieldmap sales data layer.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod context;
pub mod customer;
pub mod delivery;
pub mod error;
pub mod follow_up;
pub mod geo;
pub mod proximity;
pub mod scheduler;
pub mod seed;
pub mod service_call;
pub mod storage;
pub mod store;
pub mod visit;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;
