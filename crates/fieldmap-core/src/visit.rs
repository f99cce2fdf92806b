//! Visit — a check-in at a customer site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Coordinate;

/// Why the rep was on site. Wire values are the human-readable strings the
/// original data was stored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitPurpose {
  #[serde(rename = "Sales call")]
  SalesCall,
  #[serde(rename = "Service visit")]
  ServiceVisit,
  #[serde(rename = "Product demonstration")]
  ProductDemo,
  #[serde(rename = "Contract negotiation")]
  ContractNegotiation,
  #[serde(rename = "Follow-up meeting")]
  FollowUpMeeting,
  #[serde(rename = "Other")]
  Other,
}

/// A logged visit. The coordinate is captured at check-in.
///
/// Invariant: `check_out_time`, when present, is not before
/// `check_in_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
  pub id:             String,
  pub customer_id:    String,
  pub user_id:        String,
  pub purpose:        VisitPurpose,
  pub notes:          Option<String>,
  pub check_in_time:  DateTime<Utc>,
  pub check_out_time: Option<DateTime<Utc>>,
  /// Nested object on the wire, unlike the flat customer coordinate.
  pub location:       Coordinate,
  /// Opaque photo references; binary data never lives in the store.
  pub photos:         Option<Vec<String>>,
}

impl Visit {
  /// Start a visit now at `location`. The id is a fresh v4 UUID; checkout
  /// is open until recorded.
  pub fn check_in(
    customer_id: String,
    user_id: String,
    purpose: VisitPurpose,
    notes: Option<String>,
    location: Coordinate,
    photos: Option<Vec<String>>,
  ) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      customer_id,
      user_id,
      purpose,
      notes,
      check_in_time: Utc::now(),
      check_out_time: None,
      location,
      photos,
    }
  }
}
