//! Handlers for `/customers` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/customers` | All customers |
//! | `POST` | `/customers` | Body: [`CreateBody`] |
//! | `GET`  | `/customers/nearby` | `?radius_miles=R[&latitude=..&longitude=..]` |
//! | `GET`  | `/customers/:id` | 404 if not found |
//! | `GET`  | `/customers/:id/visits` | All visits for the customer |
//! | `GET`  | `/customers/:id/visits/last` | Most recent check-in; 404 if none |
//! | `GET`  | `/customers/:id/service-calls` | |
//! | `GET`  | `/customers/:id/deliveries` | |
//! | `GET`  | `/customers/:id/follow-ups` | All follow-ups, completed included |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use fieldmap_core::{
  customer::Customer,
  delivery::Delivery,
  follow_up::FollowUp,
  geo::Coordinate,
  proximity::ProximityIndex,
  service_call::ServiceCall,
  storage::SnapshotStore,
  visit::Visit,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiError, AppState};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /customers`
pub async fn list<B>(State(state): State<AppState<B>>) -> Json<Vec<Customer>>
where
  B: SnapshotStore + 'static,
{
  Json(state.store.customers().await)
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:         String,
  pub company:      String,
  pub address:      String,
  pub phone:        String,
  pub email:        String,
  pub tier:         String,
  pub territory_id: String,
  pub latitude:     f64,
  pub longitude:    f64,
}

/// `POST /customers` — a new account starts with no revenue or contact
/// history.
pub async fn create<B>(
  State(state): State<AppState<B>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  B: SnapshotStore + 'static,
{
  let coordinate = Coordinate::new(body.latitude, body.longitude);
  if !coordinate.is_valid() {
    return Err(ApiError::BadRequest(format!(
      "invalid coordinate: {}, {}",
      body.latitude, body.longitude
    )));
  }

  let customer = Customer {
    id: Uuid::new_v4().to_string(),
    name: body.name,
    company: body.company,
    address: body.address,
    phone: body.phone,
    email: body.email,
    tier: body.tier,
    territory_id: body.territory_id,
    last_contact: None,
    latitude: body.latitude,
    longitude: body.longitude,
    total_revenue: 0.0,
    last_purchase: None,
  };

  state.store.create_customer(customer.clone()).await?;
  Ok((StatusCode::CREATED, Json(customer)))
}

// ─── Nearby ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
  pub radius_miles: f64,
  pub latitude:     Option<f64>,
  pub longitude:    Option<f64>,
}

/// `GET /customers/nearby?radius_miles=R[&latitude=..&longitude=..]`
///
/// Coordinates omitted from the query fall back to the configured location
/// provider; with no location at all, every customer is returned.
pub async fn nearby<B>(
  State(state): State<AppState<B>>,
  Query(params): Query<NearbyParams>,
) -> Result<Json<Vec<Customer>>, ApiError>
where
  B: SnapshotStore + 'static,
{
  if params.radius_miles < 0.0 || !params.radius_miles.is_finite() {
    return Err(ApiError::BadRequest(
      "radius_miles must be a non-negative number".into(),
    ));
  }

  let point = match (params.latitude, params.longitude) {
    (Some(latitude), Some(longitude)) => {
      let point = Coordinate::new(latitude, longitude);
      if !point.is_valid() {
        return Err(ApiError::BadRequest(format!(
          "invalid coordinate: {latitude}, {longitude}"
        )));
      }
      Some(point)
    }
    (None, None) => state.location.current_location(),
    _ => {
      return Err(ApiError::BadRequest(
        "latitude and longitude must be supplied together".into(),
      ));
    }
  };

  let index = ProximityIndex::new(Arc::clone(&state.store));
  Ok(Json(index.near(point, params.radius_miles).await))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /customers/:id`
pub async fn get_one<B>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
) -> Result<Json<Customer>, ApiError>
where
  B: SnapshotStore + 'static,
{
  let customer = state
    .store
    .customer(&id)
    .await
    .ok_or_else(|| ApiError::NotFound(format!("customer {id} not found")))?;
  Ok(Json(customer))
}

// ─── Per-customer collections ─────────────────────────────────────────────────

/// `GET /customers/:id/visits`
pub async fn visits<B>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
) -> Json<Vec<Visit>>
where
  B: SnapshotStore + 'static,
{
  Json(state.store.visits_for_customer(&id).await)
}

/// `GET /customers/:id/visits/last`
pub async fn last_visit<B>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
) -> Result<Json<Visit>, ApiError>
where
  B: SnapshotStore + 'static,
{
  let visit = state
    .store
    .last_visit(&id)
    .await
    .ok_or_else(|| ApiError::NotFound(format!("no visits for customer {id}")))?;
  Ok(Json(visit))
}

/// `GET /customers/:id/service-calls`
pub async fn service_calls<B>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
) -> Json<Vec<ServiceCall>>
where
  B: SnapshotStore + 'static,
{
  Json(state.store.service_calls_for_customer(&id).await)
}

/// `GET /customers/:id/deliveries`
pub async fn deliveries<B>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
) -> Json<Vec<Delivery>>
where
  B: SnapshotStore + 'static,
{
  Json(state.store.deliveries_for_customer(&id).await)
}

/// `GET /customers/:id/follow-ups` — every follow-up referencing the
/// customer, completed ones included. The pending-only views live under
/// `/follow-ups`.
pub async fn follow_ups<B>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
) -> Json<Vec<FollowUp>>
where
  B: SnapshotStore + 'static,
{
  Json(state.store.follow_ups_for_customer(&id).await)
}
