//! Handlers for `/service-calls` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/service-calls` | Body: [`CreateBody`]; 404 if the customer is unknown |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use fieldmap_core::{
  service_call::{ServiceCall, ServiceCallCategory, ServiceCallPriority},
  storage::SnapshotStore,
};
use serde::Deserialize;

use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub customer_id:         String,
  pub category:            ServiceCallCategory,
  pub priority:            ServiceCallPriority,
  pub problem_description: String,
}

/// `POST /service-calls` — submit a problem report.
///
/// The customer must exist: its name and company are snapshotted onto the
/// record at creation.
pub async fn create<B>(
  State(state): State<AppState<B>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  B: SnapshotStore + 'static,
{
  let customer = state.store.customer(&body.customer_id).await.ok_or_else(|| {
    ApiError::NotFound(format!("customer {} not found", body.customer_id))
  })?;

  let call = ServiceCall::open(
    &customer,
    body.category,
    body.priority,
    body.problem_description,
  );

  state.store.create_service_call(call.clone()).await?;
  Ok((StatusCode::CREATED, Json(call)))
}
