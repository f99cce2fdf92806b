//! Customer — the account record every other entity references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// A customer account in the rep's territory.
///
/// The coordinate is stored flat (`latitude`/`longitude`) rather than
/// nested, matching the persisted wire format. Invariant: the coordinate is
/// always present and valid ([`Coordinate::is_valid`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
  pub id:            String,
  pub name:          String,
  pub company:       String,
  pub address:       String,
  pub phone:         String,
  pub email:         String,
  /// Free-text classification (e.g. "Gold"). Display only, never logic.
  pub tier:          String,
  pub territory_id:  String,
  pub last_contact:  Option<DateTime<Utc>>,
  pub latitude:      f64,
  pub longitude:     f64,
  pub total_revenue: f64,
  pub last_purchase: Option<DateTime<Utc>>,
}

impl Customer {
  pub fn coordinate(&self) -> Coordinate {
    Coordinate::new(self.latitude, self.longitude)
  }
}
