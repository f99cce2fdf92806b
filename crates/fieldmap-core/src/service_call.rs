//! Service call — a reported problem at a customer site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::customer::Customer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceCallCategory {
  #[serde(rename = "Technical")]
  Technical,
  #[serde(rename = "Billing")]
  Billing,
  #[serde(rename = "Delivery")]
  Delivery,
  #[serde(rename = "Product")]
  Product,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceCallPriority {
  #[serde(rename = "Low")]
  Low,
  #[serde(rename = "Medium")]
  Medium,
  #[serde(rename = "High")]
  High,
  #[serde(rename = "Urgent")]
  Urgent,
}

/// Lifecycle runs one way, open → in progress → resolved → closed.
/// Regression is not enforced anywhere in this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceCallStatus {
  #[serde(rename = "Open")]
  Open,
  #[serde(rename = "In Progress")]
  InProgress,
  #[serde(rename = "Resolved")]
  Resolved,
  #[serde(rename = "Closed")]
  Closed,
}

/// A service call. Customer name and company are denormalized at creation
/// so the record stays readable if the customer list changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCall {
  pub id:                  String,
  pub customer_id:         String,
  pub customer_name:       String,
  pub customer_company:    String,
  pub category:            ServiceCallCategory,
  pub priority:            ServiceCallPriority,
  pub problem_description: String,
  pub status:              ServiceCallStatus,
  pub created_at:          DateTime<Utc>,
  pub assigned_to:         Option<String>,
  pub resolved_at:         Option<DateTime<Utc>>,
}

impl ServiceCall {
  /// Open a new call against `customer`, snapshotting its name and company.
  pub fn open(
    customer: &Customer,
    category: ServiceCallCategory,
    priority: ServiceCallPriority,
    problem_description: String,
  ) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      customer_id: customer.id.clone(),
      customer_name: customer.name.clone(),
      customer_company: customer.company.clone(),
      category,
      priority,
      problem_description,
      status: ServiceCallStatus::Open,
      created_at: Utc::now(),
      assigned_to: None,
      resolved_at: None,
    }
  }
}
