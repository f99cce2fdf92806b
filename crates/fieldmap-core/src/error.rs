//! Error types for `fieldmap-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("customer not found: {0}")]
  CustomerNotFound(String),

  #[error("visit not found: {0}")]
  VisitNotFound(String),

  #[error("service call not found: {0}")]
  ServiceCallNotFound(String),

  #[error("delivery not found: {0}")]
  DeliveryNotFound(String),

  #[error("follow-up not found: {0}")]
  FollowUpNotFound(String),

  #[error("follow-up {0} is already completed")]
  AlreadyCompleted(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  /// The in-memory mutation succeeded but the snapshot never reached the
  /// backend. Callers that care about durability must treat the operation
  /// as not persisted.
  #[error("persistence error: {0}")]
  Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
