//! [`EntityStore`] — single source of truth for the five entity
//! collections, with durable persistence through a [`SnapshotStore`]
//! backend.
//!
//! One writer at a time: every mutation runs under an async write gate held
//! across the in-memory change *and* the snapshot write, so blobs reach the
//! backend in mutation order. Readers clone a consistent snapshot from the
//! shared state and never observe a half-applied mutation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock, broadcast};

use crate::{
  Error, Result,
  customer::Customer,
  delivery::Delivery,
  follow_up::{FollowUp, FollowUpPriority},
  seed::SeedSource,
  service_call::ServiceCall,
  storage::{EntityKind, SnapshotStore},
  visit::Visit,
};

// ─── Change feed ─────────────────────────────────────────────────────────────

/// Published after every successful in-memory mutation. Consumers that
/// mirror the store (a UI, a sync layer) re-query the collections they care
/// about when they see one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
  pub kind: EntityKind,
}

// ─── Collections ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct Collections {
  customers:     Vec<Customer>,
  visits:        Vec<Visit>,
  service_calls: Vec<ServiceCall>,
  deliveries:    Vec<Delivery>,
  follow_ups:    Vec<FollowUp>,
}

/// Internal seam that lets create/update be written once for all five
/// kinds. Not exposed; the public surface stays typed.
trait Record: Serialize + Send + Sized {
  const KIND: EntityKind;

  fn id(&self) -> &str;
  fn slot(collections: &mut Collections) -> &mut Vec<Self>;
  fn not_found(id: &str) -> Error;
}

impl Record for Customer {
  const KIND: EntityKind = EntityKind::Customer;

  fn id(&self) -> &str {
    &self.id
  }

  fn slot(collections: &mut Collections) -> &mut Vec<Self> {
    &mut collections.customers
  }

  fn not_found(id: &str) -> Error {
    Error::CustomerNotFound(id.to_owned())
  }
}

impl Record for Visit {
  const KIND: EntityKind = EntityKind::Visit;

  fn id(&self) -> &str {
    &self.id
  }

  fn slot(collections: &mut Collections) -> &mut Vec<Self> {
    &mut collections.visits
  }

  fn not_found(id: &str) -> Error {
    Error::VisitNotFound(id.to_owned())
  }
}

impl Record for ServiceCall {
  const KIND: EntityKind = EntityKind::ServiceCall;

  fn id(&self) -> &str {
    &self.id
  }

  fn slot(collections: &mut Collections) -> &mut Vec<Self> {
    &mut collections.service_calls
  }

  fn not_found(id: &str) -> Error {
    Error::ServiceCallNotFound(id.to_owned())
  }
}

impl Record for Delivery {
  const KIND: EntityKind = EntityKind::Delivery;

  fn id(&self) -> &str {
    &self.id
  }

  fn slot(collections: &mut Collections) -> &mut Vec<Self> {
    &mut collections.deliveries
  }

  fn not_found(id: &str) -> Error {
    Error::DeliveryNotFound(id.to_owned())
  }
}

impl Record for FollowUp {
  const KIND: EntityKind = EntityKind::FollowUp;

  fn id(&self) -> &str {
    &self.id
  }

  fn slot(collections: &mut Collections) -> &mut Vec<Self> {
    &mut collections.follow_ups
  }

  fn not_found(id: &str) -> Error {
    Error::FollowUpNotFound(id.to_owned())
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Owner of all five entity collections. No other component mutates them.
pub struct EntityStore<B> {
  backend:    B,
  state:      RwLock<Collections>,
  /// Serializes mutations end-to-end (in-memory change + snapshot write).
  write_gate: Mutex<()>,
  events:     broadcast::Sender<ChangeEvent>,
}

impl<B: SnapshotStore> EntityStore<B> {
  pub fn new(backend: B) -> Self {
    let (events, _) = broadcast::channel(64);
    Self {
      backend,
      state: RwLock::new(Collections::default()),
      write_gate: Mutex::new(()),
      events,
    }
  }

  /// Subscribe to the change feed. Events published before the call are
  /// not replayed.
  pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
    self.events.subscribe()
  }

  fn notify(&self, kind: EntityKind) {
    // Send fails only when nobody is subscribed, which is fine.
    let _ = self.events.send(ChangeEvent { kind });
  }

  // ── Startup ───────────────────────────────────────────────────────────────

  /// Restore all five collections from the backend. A missing, unreadable,
  /// or undecodable blob degrades to an empty collection with a warning —
  /// startup never fails on bad storage.
  pub async fn load(&self) {
    let _gate = self.write_gate.lock().await;

    let customers = self.load_kind::<Customer>(EntityKind::Customer).await;
    let visits = self.load_kind::<Visit>(EntityKind::Visit).await;
    let service_calls =
      self.load_kind::<ServiceCall>(EntityKind::ServiceCall).await;
    let deliveries = self.load_kind::<Delivery>(EntityKind::Delivery).await;
    let follow_ups = self.load_kind::<FollowUp>(EntityKind::FollowUp).await;

    let mut state = self.state.write().await;
    *state = Collections {
      customers,
      visits,
      service_calls,
      deliveries,
      follow_ups,
    };
  }

  async fn load_kind<T: serde::de::DeserializeOwned>(
    &self,
    kind: EntityKind,
  ) -> Vec<T> {
    let key = kind.snapshot_key();
    let bytes = match self.backend.read(key).await {
      Ok(Some(bytes)) => bytes,
      Ok(None) => return Vec::new(),
      Err(error) => {
        tracing::warn!(key, %error, "snapshot read failed, starting empty");
        return Vec::new();
      }
    };

    match serde_json::from_slice(&bytes) {
      Ok(records) => records,
      Err(error) => {
        tracing::warn!(key, %error, "snapshot undecodable, starting empty");
        Vec::new()
      }
    }
  }

  /// Populate `kind` from `source` if its collection is empty, and persist.
  /// Returns whether seeding happened.
  ///
  /// This stands in for a first-run remote fetch; substituting a real
  /// backend means implementing [`SeedSource`] over it.
  pub async fn seed_if_empty<S: SeedSource>(
    &self,
    kind: EntityKind,
    source: &S,
  ) -> Result<bool> {
    let _gate = self.write_gate.lock().await;

    {
      let state = self.state.read().await;
      let populated = match kind {
        EntityKind::Customer => !state.customers.is_empty(),
        EntityKind::Visit => !state.visits.is_empty(),
        EntityKind::ServiceCall => !state.service_calls.is_empty(),
        EntityKind::Delivery => !state.deliveries.is_empty(),
        EntityKind::FollowUp => !state.follow_ups.is_empty(),
      };
      if populated {
        return Ok(false);
      }
    }

    let bytes = match kind {
      EntityKind::Customer => {
        let records = source.customers().await;
        let mut state = self.state.write().await;
        state.customers = records;
        serde_json::to_vec(&state.customers)?
      }
      EntityKind::Visit => {
        let records = source.visits().await;
        let mut state = self.state.write().await;
        state.visits = records;
        serde_json::to_vec(&state.visits)?
      }
      EntityKind::ServiceCall => {
        let records = source.service_calls().await;
        let mut state = self.state.write().await;
        state.service_calls = records;
        serde_json::to_vec(&state.service_calls)?
      }
      EntityKind::Delivery => {
        let records = source.deliveries().await;
        let mut state = self.state.write().await;
        state.deliveries = records;
        serde_json::to_vec(&state.deliveries)?
      }
      EntityKind::FollowUp => {
        let records = source.follow_ups().await;
        let mut state = self.state.write().await;
        state.follow_ups = records;
        serde_json::to_vec(&state.follow_ups)?
      }
    };

    self.notify(kind);
    self.persist(kind, bytes).await?;
    Ok(true)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub async fn customers(&self) -> Vec<Customer> {
    self.state.read().await.customers.clone()
  }

  /// Exact lookup by id.
  pub async fn customer(&self, id: &str) -> Option<Customer> {
    self
      .state
      .read()
      .await
      .customers
      .iter()
      .find(|c| c.id == id)
      .cloned()
  }

  /// All visits referencing `customer_id`, unordered.
  pub async fn visits_for_customer(&self, customer_id: &str) -> Vec<Visit> {
    self
      .state
      .read()
      .await
      .visits
      .iter()
      .filter(|v| v.customer_id == customer_id)
      .cloned()
      .collect()
  }

  /// The customer's most recent visit by check-in time.
  pub async fn last_visit(&self, customer_id: &str) -> Option<Visit> {
    self
      .state
      .read()
      .await
      .visits
      .iter()
      .filter(|v| v.customer_id == customer_id)
      .max_by_key(|v| v.check_in_time)
      .cloned()
  }

  pub async fn service_calls_for_customer(
    &self,
    customer_id: &str,
  ) -> Vec<ServiceCall> {
    self
      .state
      .read()
      .await
      .service_calls
      .iter()
      .filter(|s| s.customer_id == customer_id)
      .cloned()
      .collect()
  }

  pub async fn deliveries_for_customer(
    &self,
    customer_id: &str,
  ) -> Vec<Delivery> {
    self
      .state
      .read()
      .await
      .deliveries
      .iter()
      .filter(|d| d.customer_id == customer_id)
      .cloned()
      .collect()
  }

  /// All follow-ups referencing `customer_id`, completed or not.
  pub async fn follow_ups_for_customer(
    &self,
    customer_id: &str,
  ) -> Vec<FollowUp> {
    self
      .state
      .read()
      .await
      .follow_ups
      .iter()
      .filter(|f| f.customer_id == customer_id)
      .cloned()
      .collect()
  }

  pub async fn follow_ups(&self) -> Vec<FollowUp> {
    self.state.read().await.follow_ups.clone()
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  pub async fn create_customer(&self, customer: Customer) -> Result<()> {
    self.create(customer).await
  }

  pub async fn create_visit(&self, visit: Visit) -> Result<()> {
    self.create(visit).await
  }

  pub async fn create_service_call(&self, call: ServiceCall) -> Result<()> {
    self.create(call).await
  }

  pub async fn create_delivery(&self, delivery: Delivery) -> Result<()> {
    self.create(delivery).await
  }

  pub async fn create_follow_up(&self, follow_up: FollowUp) -> Result<()> {
    self.create(follow_up).await
  }

  pub async fn update_customer(&self, customer: Customer) -> Result<()> {
    self.update(customer).await
  }

  pub async fn update_visit(&self, visit: Visit) -> Result<()> {
    self.update(visit).await
  }

  pub async fn update_service_call(&self, call: ServiceCall) -> Result<()> {
    self.update(call).await
  }

  pub async fn update_delivery(&self, delivery: Delivery) -> Result<()> {
    self.update(delivery).await
  }

  pub async fn update_follow_up(&self, follow_up: FollowUp) -> Result<()> {
    self.update(follow_up).await
  }

  /// Append one record and persist its collection before returning.
  ///
  /// On `Ok` the new state is both in memory and durable. On a persistence
  /// error the in-memory mutation is retained and the error surfaced.
  async fn create<R: Record>(&self, record: R) -> Result<()> {
    let _gate = self.write_gate.lock().await;

    let bytes = {
      let mut state = self.state.write().await;
      let slot = R::slot(&mut state);
      slot.push(record);
      serde_json::to_vec(&*slot)?
    };

    self.notify(R::KIND);
    self.persist(R::KIND, bytes).await
  }

  /// Replace the record with a matching id. Unknown ids are an explicit
  /// error, not a silent no-op.
  async fn update<R: Record>(&self, record: R) -> Result<()> {
    let _gate = self.write_gate.lock().await;

    let bytes = {
      let mut state = self.state.write().await;
      let slot = R::slot(&mut state);
      let existing = slot
        .iter_mut()
        .find(|r| r.id() == record.id())
        .ok_or_else(|| R::not_found(record.id()))?;
      *existing = record;
      serde_json::to_vec(&*slot)?
    };

    self.notify(R::KIND);
    self.persist(R::KIND, bytes).await
  }

  // ── Follow-up transitions ─────────────────────────────────────────────────

  /// Transition a pending follow-up to completed, stamping the completion
  /// time. Completing an unknown id or an already-completed follow-up is
  /// rejected, and the two cases are distinguished.
  pub async fn complete_follow_up(
    &self,
    id: &str,
    completion_notes: Option<String>,
  ) -> Result<FollowUp> {
    let _gate = self.write_gate.lock().await;

    let (bytes, completed) = {
      let mut state = self.state.write().await;
      let follow_up = state
        .follow_ups
        .iter_mut()
        .find(|f| f.id == id)
        .ok_or_else(|| Error::FollowUpNotFound(id.to_owned()))?;
      if follow_up.is_completed {
        return Err(Error::AlreadyCompleted(id.to_owned()));
      }

      follow_up.is_completed = true;
      follow_up.completed_at = Some(Utc::now());
      follow_up.completion_notes = completion_notes;
      let completed = follow_up.clone();

      (serde_json::to_vec(&state.follow_ups)?, completed)
    };

    self.notify(EntityKind::FollowUp);
    self.persist(EntityKind::FollowUp, bytes).await?;
    Ok(completed)
  }

  /// Complete `id` and create one fresh pending follow-up for the same
  /// customer and user in a single step.
  ///
  /// Both changes land in the same collection snapshot, so durability is
  /// all-or-nothing: a failed write can never leave the old follow-up
  /// completed without its successor existing, or vice versa. The new
  /// follow-up carries no `related_visit_id`.
  pub async fn complete_and_chain(
    &self,
    id: &str,
    completion_notes: Option<String>,
    new_follow_up_date: DateTime<Utc>,
    new_notes: Option<String>,
    new_priority: FollowUpPriority,
  ) -> Result<(FollowUp, FollowUp)> {
    let _gate = self.write_gate.lock().await;

    let (bytes, completed, created) = {
      let mut state = self.state.write().await;
      let follow_up = state
        .follow_ups
        .iter_mut()
        .find(|f| f.id == id)
        .ok_or_else(|| Error::FollowUpNotFound(id.to_owned()))?;
      if follow_up.is_completed {
        return Err(Error::AlreadyCompleted(id.to_owned()));
      }

      follow_up.is_completed = true;
      follow_up.completed_at = Some(Utc::now());
      follow_up.completion_notes = completion_notes;
      let completed = follow_up.clone();

      let created = FollowUp::new(
        completed.customer_id.clone(),
        completed.user_id.clone(),
        new_follow_up_date,
        new_notes,
        new_priority,
        None,
      );
      state.follow_ups.push(created.clone());

      (serde_json::to_vec(&state.follow_ups)?, completed, created)
    };

    self.notify(EntityKind::FollowUp);
    self.persist(EntityKind::FollowUp, bytes).await?;
    Ok((completed, created))
  }

  // ── Persistence ───────────────────────────────────────────────────────────

  async fn persist(&self, kind: EntityKind, bytes: Vec<u8>) -> Result<()> {
    match self.backend.write(kind.snapshot_key(), bytes).await {
      Ok(()) => Ok(()),
      Err(error) => {
        tracing::warn!(
          key = kind.snapshot_key(),
          %error,
          "snapshot write failed; in-memory state retained"
        );
        Err(Error::Persistence(Box::new(error)))
      }
    }
  }
}
