//! Handlers for `/visits` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/visits` | Body: [`CheckInBody`]; returns 201 + stored visit |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use fieldmap_core::{
  geo::Coordinate,
  storage::SnapshotStore,
  visit::{Visit, VisitPurpose},
};
use serde::Deserialize;

use crate::{ApiError, AppState};

/// JSON body accepted by `POST /visits`. The user id is never accepted
/// from callers; it is stamped from the authentication context.
#[derive(Debug, Deserialize)]
pub struct CheckInBody {
  pub customer_id: String,
  pub purpose:     VisitPurpose,
  pub notes:       Option<String>,
  pub location:    Coordinate,
  pub photos:      Option<Vec<String>>,
}

/// `POST /visits` — check in at a customer site.
pub async fn create<B>(
  State(state): State<AppState<B>>,
  Json(body): Json<CheckInBody>,
) -> Result<impl IntoResponse, ApiError>
where
  B: SnapshotStore + 'static,
{
  if !body.location.is_valid() {
    return Err(ApiError::BadRequest(format!(
      "invalid coordinate: {}, {}",
      body.location.latitude, body.location.longitude
    )));
  }

  let visit = Visit::check_in(
    body.customer_id,
    state.auth.current_user_id(),
    body.purpose,
    body.notes,
    body.location,
    body.photos,
  );

  state.store.create_visit(visit.clone()).await?;
  Ok((StatusCode::CREATED, Json(visit)))
}
