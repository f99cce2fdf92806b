//! Delivery — a fulfilled (or pending) order with its line items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
  Delivered,
  Pending,
  Cancelled,
}

/// One invoice line. `line_total` is always `quantity × unit_price`; it is
/// computed by [`OrderItem::new`] and never accepted independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
  pub product_name: String,
  pub product_code: String,
  pub quantity:     u32,
  pub unit_price:   f64,
  pub line_total:   f64,
}

impl OrderItem {
  pub fn new(
    product_name: String,
    product_code: String,
    quantity: u32,
    unit_price: f64,
  ) -> Self {
    Self {
      product_name,
      product_code,
      quantity,
      unit_price,
      line_total: f64::from(quantity) * unit_price,
    }
  }
}

/// A delivery against an order. Items keep their original order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
  pub id:           String,
  pub customer_id:  String,
  pub date:         DateTime<Utc>,
  pub total:        f64,
  pub order_number: String,
  pub status:       DeliveryStatus,
  pub items:        Vec<OrderItem>,
  pub notes:        Option<String>,
}

impl Delivery {
  pub fn new(
    customer_id: String,
    order_number: String,
    total: f64,
    status: DeliveryStatus,
    items: Vec<OrderItem>,
    notes: Option<String>,
  ) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      customer_id,
      date: Utc::now(),
      total,
      order_number,
      status,
      items,
      notes,
    }
  }
}
