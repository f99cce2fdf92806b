//! JSON REST API for the fieldmap data layer.
//!
//! Exposes an axum [`Router`] backed by any
//! [`fieldmap_core::storage::SnapshotStore`] backend. Transport, TLS, and
//! real authentication are the caller's responsibility — the handlers only
//! stamp the configured user id onto records they create.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", fieldmap_api::api_router(state.clone()))
//! ```

pub mod customers;
pub mod deliveries;
pub mod error;
pub mod follow_ups;
pub mod service_calls;
pub mod visits;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use fieldmap_core::{
  context::{AuthenticationContext, LocationProvider},
  storage::SnapshotStore,
  store::EntityStore,
};
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// Opaque id stamped onto visits and follow-ups created via the API.
  pub user_id:    String,
  /// Fixed device coordinate used by `/customers/nearby` when the request
  /// doesn't carry one. Leave both unset to disable radius filtering.
  pub latitude:   Option<f64>,
  pub longitude:  Option<f64>,
  /// Populate empty collections with sample data at startup.
  #[serde(default)]
  pub seed:       bool,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<B> {
  pub store:    Arc<EntityStore<B>>,
  pub auth:     Arc<dyn AuthenticationContext>,
  pub location: Arc<dyn LocationProvider>,
}

impl<B> Clone for AppState<B> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      auth:     Arc::clone(&self.auth),
      location: Arc::clone(&self.location),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<B>(state: AppState<B>) -> Router<()>
where
  B: SnapshotStore + 'static,
{
  Router::new()
    // Customers
    .route(
      "/customers",
      get(customers::list::<B>).post(customers::create::<B>),
    )
    .route("/customers/nearby", get(customers::nearby::<B>))
    .route("/customers/{id}", get(customers::get_one::<B>))
    .route("/customers/{id}/visits", get(customers::visits::<B>))
    .route("/customers/{id}/visits/last", get(customers::last_visit::<B>))
    .route(
      "/customers/{id}/service-calls",
      get(customers::service_calls::<B>),
    )
    .route("/customers/{id}/deliveries", get(customers::deliveries::<B>))
    .route("/customers/{id}/follow-ups", get(customers::follow_ups::<B>))
    // Commands
    .route("/visits", post(visits::create::<B>))
    .route("/service-calls", post(service_calls::create::<B>))
    .route("/deliveries", post(deliveries::create::<B>))
    // Follow-up scheduling
    .route("/follow-ups", post(follow_ups::create::<B>))
    .route("/follow-ups/pending", get(follow_ups::pending::<B>))
    .route("/follow-ups/overdue", get(follow_ups::overdue::<B>))
    .route("/follow-ups/urgent", get(follow_ups::urgent::<B>))
    .route("/follow-ups/{id}/complete", post(follow_ups::complete::<B>))
    .route(
      "/follow-ups/{id}/complete-and-chain",
      post(follow_ups::complete_and_chain::<B>),
    )
    .with_state(state)
}
