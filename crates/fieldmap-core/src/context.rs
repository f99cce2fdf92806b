//! Collaborator seams for the surrounding application.
//!
//! The data layer neither authenticates users nor reads device sensors; it
//! consumes both through these traits so the owning process decides where
//! the values come from.

use crate::geo::Coordinate;

/// Supplies the opaque id of the currently signed-in user. The store never
/// validates or interprets it — it is only stamped onto newly created
/// visits and follow-ups.
pub trait AuthenticationContext: Send + Sync {
  fn current_user_id(&self) -> String;
}

/// A fixed user id, e.g. from server configuration.
pub struct StaticAuth {
  user_id: String,
}

impl StaticAuth {
  pub fn new(user_id: String) -> Self {
    Self { user_id }
  }
}

impl AuthenticationContext for StaticAuth {
  fn current_user_id(&self) -> String {
    self.user_id.clone()
  }
}

/// Supplies the device's current coordinate, or `None` when unavailable.
/// Proximity callers treat "no location" as "skip radius filtering".
pub trait LocationProvider: Send + Sync {
  fn current_location(&self) -> Option<Coordinate>;
}

/// A fixed (or absent) coordinate, e.g. from server configuration.
pub struct FixedLocation(pub Option<Coordinate>);

impl LocationProvider for FixedLocation {
  fn current_location(&self) -> Option<Coordinate> {
    self.0
  }
}
