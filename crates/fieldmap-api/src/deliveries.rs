//! Handlers for `/deliveries` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/deliveries` | Body: [`CreateBody`]; line totals are computed server-side |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use fieldmap_core::{
  delivery::{Delivery, DeliveryStatus, OrderItem},
  storage::SnapshotStore,
};
use serde::Deserialize;

use crate::{ApiError, AppState};

/// One requested invoice line. The line total is derived, never accepted.
#[derive(Debug, Deserialize)]
pub struct OrderItemBody {
  pub product_name: String,
  pub product_code: String,
  pub quantity:     u32,
  pub unit_price:   f64,
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub customer_id:  String,
  pub order_number: String,
  pub total:        f64,
  pub status:       Option<DeliveryStatus>,
  #[serde(default)]
  pub items:        Vec<OrderItemBody>,
  pub notes:        Option<String>,
}

/// `POST /deliveries` — record a delivery. Status defaults to pending.
pub async fn create<B>(
  State(state): State<AppState<B>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  B: SnapshotStore + 'static,
{
  let items = body
    .items
    .into_iter()
    .map(|i| OrderItem::new(i.product_name, i.product_code, i.quantity, i.unit_price))
    .collect();

  let delivery = Delivery::new(
    body.customer_id,
    body.order_number,
    body.total,
    body.status.unwrap_or(DeliveryStatus::Pending),
    items,
    body.notes,
  );

  state.store.create_delivery(delivery.clone()).await?;
  Ok((StatusCode::CREATED, Json(delivery)))
}
