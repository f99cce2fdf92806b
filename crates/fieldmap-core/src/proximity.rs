//! [`ProximityIndex`] — "which customers are near this point" queries.
//!
//! A linear scan over the customer collection. Territories hold tens to
//! low hundreds of customers, so there is no spatial index; callers at
//! planet scale want a different component.

use std::sync::Arc;

use crate::{
  customer::Customer,
  geo::{Coordinate, METERS_PER_MILE, distance_meters},
  storage::SnapshotStore,
  store::EntityStore,
};

pub struct ProximityIndex<B> {
  store: Arc<EntityStore<B>>,
}

impl<B> Clone for ProximityIndex<B> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store) }
  }
}

impl<B: SnapshotStore> ProximityIndex<B> {
  pub fn new(store: Arc<EntityStore<B>>) -> Self {
    Self { store }
  }

  /// Customers within `radius_miles` of `point`, boundary inclusive: a
  /// customer at exactly the radius is returned. Radius 0 selects only
  /// customers co-located with `point`. Result order is unspecified.
  pub async fn within_radius(
    &self,
    point: Coordinate,
    radius_miles: f64,
  ) -> Vec<Customer> {
    let radius_meters = radius_miles * METERS_PER_MILE;

    self
      .store
      .customers()
      .await
      .into_iter()
      .filter(|c| distance_meters(point, c.coordinate()) <= radius_meters)
      .collect()
  }

  /// Radius query against an optional device location: with no location
  /// there is nothing to filter by, so every customer is returned.
  pub async fn near(
    &self,
    location: Option<Coordinate>,
    radius_miles: f64,
  ) -> Vec<Customer> {
    match location {
      Some(point) => self.within_radius(point, radius_miles).await,
      None => self.store.customers().await,
    }
  }
}
