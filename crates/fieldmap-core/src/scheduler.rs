//! [`FollowUpScheduler`] — actionable views over the follow-up collection
//! and the public surface for its lifecycle transitions.
//!
//! Views are pure reads over the store's current snapshot, recomputed on
//! every call and never cached. They cannot fail; an empty store yields
//! empty views.

use std::sync::Arc;

use chrono::{DateTime, Days, NaiveTime, Utc};

use crate::{
  Result,
  follow_up::{FollowUp, FollowUpPriority},
  storage::SnapshotStore,
  store::EntityStore,
};

pub struct FollowUpScheduler<B> {
  store: Arc<EntityStore<B>>,
}

impl<B> Clone for FollowUpScheduler<B> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store) }
  }
}

impl<B: SnapshotStore> FollowUpScheduler<B> {
  pub fn new(store: Arc<EntityStore<B>>) -> Self {
    Self { store }
  }

  /// All pending follow-ups, most pressing first: priority rank ascending
  /// (urgent before high before medium before low), due date ascending as
  /// the tie-break.
  pub async fn pending(&self) -> Vec<FollowUp> {
    let mut pending: Vec<FollowUp> = self
      .store
      .follow_ups()
      .await
      .into_iter()
      .filter(|f| !f.is_completed)
      .collect();

    pending.sort_by(|a, b| {
      a.priority
        .rank()
        .cmp(&b.priority.rank())
        .then(a.follow_up_date.cmp(&b.follow_up_date))
    });
    pending
  }

  /// Pending follow-ups due strictly before `now`, earliest first.
  pub async fn overdue(&self, now: DateTime<Utc>) -> Vec<FollowUp> {
    let mut overdue: Vec<FollowUp> = self
      .store
      .follow_ups()
      .await
      .into_iter()
      .filter(|f| !f.is_completed && f.follow_up_date < now)
      .collect();

    overdue.sort_by_key(|f| f.follow_up_date);
    overdue
  }

  /// Pending follow-ups due today or earlier, earliest first: everything
  /// with a due date on or before the end of the UTC calendar day
  /// containing `now`. A superset of [`overdue`](Self::overdue) — it also
  /// includes items due later today.
  pub async fn urgent(&self, now: DateTime<Utc>) -> Vec<FollowUp> {
    let end_of_today = end_of_utc_day(now);

    let mut urgent: Vec<FollowUp> = self
      .store
      .follow_ups()
      .await
      .into_iter()
      .filter(|f| !f.is_completed && f.follow_up_date <= end_of_today)
      .collect();

    urgent.sort_by_key(|f| f.follow_up_date);
    urgent
  }

  /// Pending follow-ups referencing `customer_id`, unordered.
  pub async fn for_customer(&self, customer_id: &str) -> Vec<FollowUp> {
    self
      .store
      .follow_ups()
      .await
      .into_iter()
      .filter(|f| !f.is_completed && f.customer_id == customer_id)
      .collect()
  }

  /// Transition a pending follow-up to completed. See
  /// [`EntityStore::complete_follow_up`].
  pub async fn complete(
    &self,
    id: &str,
    completion_notes: Option<String>,
  ) -> Result<FollowUp> {
    self.store.complete_follow_up(id, completion_notes).await
  }

  /// Complete one follow-up and atomically chain a fresh one. See
  /// [`EntityStore::complete_and_chain`].
  pub async fn complete_and_chain(
    &self,
    id: &str,
    completion_notes: Option<String>,
    new_follow_up_date: DateTime<Utc>,
    new_notes: Option<String>,
    new_priority: FollowUpPriority,
  ) -> Result<(FollowUp, FollowUp)> {
    self
      .store
      .complete_and_chain(
        id,
        completion_notes,
        new_follow_up_date,
        new_notes,
        new_priority,
      )
      .await
  }
}

/// The first instant of the next UTC day — "due today" means due before
/// (or exactly at) this boundary.
fn end_of_utc_day(now: DateTime<Utc>) -> DateTime<Utc> {
  (now.date_naive() + Days::new(1))
    .and_time(NaiveTime::MIN)
    .and_utc()
}
