//! The [`SnapshotStore`] persistence trait and the in-memory backend.
//!
//! Durable state is five independently-keyed blobs, one per entity kind,
//! each a JSON-encoded list of that kind's records. The keys reproduce the
//! original application's storage keys so previously persisted data stays
//! readable.

use std::{
  collections::HashMap,
  convert::Infallible,
  future::Future,
  sync::{Arc, Mutex},
};

use serde::{Deserialize, Serialize};

// ─── Entity kinds ────────────────────────────────────────────────────────────

/// The five collections the store owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
  Customer,
  Visit,
  ServiceCall,
  Delivery,
  FollowUp,
}

impl EntityKind {
  pub const ALL: [EntityKind; 5] = [
    EntityKind::Customer,
    EntityKind::Visit,
    EntityKind::ServiceCall,
    EntityKind::Delivery,
    EntityKind::FollowUp,
  ];

  /// The blob key this kind's collection is persisted under.
  pub fn snapshot_key(self) -> &'static str {
    match self {
      Self::Customer => "saved_customers",
      Self::Visit => "saved_visits",
      Self::ServiceCall => "saved_service_calls",
      Self::Delivery => "saved_deliveries",
      Self::FollowUp => "saved_follow_ups",
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over durable blob storage.
///
/// Implemented by storage backends (e.g. `fieldmap-store-sqlite`). The
/// store reads each key once at startup and overwrites whole blobs on every
/// mutation; backends need no notion of partial updates.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait SnapshotStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The blob stored under `key`, or `None` if never written.
  fn read(
    &self,
    key: &'static str,
  ) -> impl Future<Output = Result<Option<Vec<u8>>, Self::Error>> + Send + '_;

  /// Durably store `bytes` under `key`, replacing any prior value.
  fn write(
    &self,
    key: &'static str,
    bytes: Vec<u8>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── In-memory backend ───────────────────────────────────────────────────────

/// A non-durable backend: blobs live in a map. Used by tests and ephemeral
/// runs. Cloning is cheap — clones share the same map.
#[derive(Clone, Default)]
pub struct MemorySnapshotStore {
  blobs: Arc<Mutex<HashMap<&'static str, Vec<u8>>>>,
}

impl MemorySnapshotStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl SnapshotStore for MemorySnapshotStore {
  type Error = Infallible;

  async fn read(&self, key: &'static str) -> Result<Option<Vec<u8>>, Infallible> {
    Ok(self.blobs.lock().expect("snapshot map lock").get(key).cloned())
  }

  async fn write(&self, key: &'static str, bytes: Vec<u8>) -> Result<(), Infallible> {
    self.blobs.lock().expect("snapshot map lock").insert(key, bytes);
    Ok(())
  }
}
