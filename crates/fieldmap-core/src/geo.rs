//! Coordinates and great-circle distance.
//!
//! Distance is haversine on a sphere approximating Earth — accurate to a
//! few metres over the distances a sales territory spans, which is all the
//! proximity queries need.

use serde::{Deserialize, Serialize};

/// Mean Earth radius, metres.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Radius queries are phrased in miles; storage and distance math in metres.
pub const METERS_PER_MILE: f64 = 1609.34;

/// A WGS-84 latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
  pub latitude:  f64,
  pub longitude: f64,
}

impl Coordinate {
  pub fn new(latitude: f64, longitude: f64) -> Self {
    Self { latitude, longitude }
  }

  /// Both components finite, latitude in [-90, 90], longitude in
  /// [-180, 180].
  pub fn is_valid(&self) -> bool {
    self.latitude.is_finite()
      && self.longitude.is_finite()
      && (-90.0..=90.0).contains(&self.latitude)
      && (-180.0..=180.0).contains(&self.longitude)
  }
}

/// Great-circle distance between two coordinates, in metres.
///
/// Pure, no failure modes: finite and non-negative for valid inputs.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
  let lat_a = a.latitude.to_radians();
  let lat_b = b.latitude.to_radians();
  let d_lat = (b.latitude - a.latitude).to_radians();
  let d_lon = (b.longitude - a.longitude).to_radians();

  let h = (d_lat / 2.0).sin().powi(2)
    + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

  // Rounding can push h a hair past 1.0 for near-antipodal points, which
  // would turn asin into NaN.
  2.0 * EARTH_RADIUS_METERS * h.min(1.0).sqrt().asin()
}
