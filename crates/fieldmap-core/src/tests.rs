//! Integration tests for the entity store, proximity index, and follow-up
//! scheduler, run against the in-memory snapshot backend.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::{
  Error,
  customer::Customer,
  delivery::{Delivery, DeliveryStatus, OrderItem},
  follow_up::{FollowUp, FollowUpPriority},
  geo::Coordinate,
  proximity::ProximityIndex,
  scheduler::FollowUpScheduler,
  seed::{SAMPLE_USER_ID, SampleSeed, SeedSource},
  service_call::{ServiceCall, ServiceCallCategory, ServiceCallPriority},
  storage::{EntityKind, MemorySnapshotStore, SnapshotStore},
  store::EntityStore,
  visit::{Visit, VisitPurpose},
};

fn store() -> EntityStore<MemorySnapshotStore> {
  EntityStore::new(MemorySnapshotStore::new())
}

fn customer(id: &str, latitude: f64, longitude: f64) -> Customer {
  Customer {
    id: id.into(),
    name: format!("Customer {id}"),
    company: "Acme Supply".into(),
    address: "1 Main St, Cupertino, CA".into(),
    phone: "+1-555-0100".into(),
    email: format!("{id}@example.com"),
    tier: "Gold".into(),
    territory_id: "CA-SOUTH".into(),
    last_contact: None,
    latitude,
    longitude,
    total_revenue: 10_000.0,
    last_purchase: None,
  }
}

fn follow_up(
  id: &str,
  customer_id: &str,
  priority: FollowUpPriority,
  due: DateTime<Utc>,
) -> FollowUp {
  FollowUp {
    id: id.into(),
    customer_id: customer_id.into(),
    user_id: SAMPLE_USER_ID.into(),
    follow_up_date: due,
    notes: None,
    priority,
    is_completed: false,
    created_at: due - Duration::days(3),
    completed_at: None,
    completion_notes: None,
    related_visit_id: None,
  }
}

fn visit(id: &str, customer_id: &str, check_in: DateTime<Utc>) -> Visit {
  Visit {
    id: id.into(),
    customer_id: customer_id.into(),
    user_id: SAMPLE_USER_ID.into(),
    purpose: VisitPurpose::SalesCall,
    notes: None,
    check_in_time: check_in,
    check_out_time: None,
    location: Coordinate::new(37.3348, -122.0090),
    photos: None,
  }
}

/// A fixed "now" so day-boundary assertions cannot flake near midnight.
fn fixed_now() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap()
}

// ─── Store basics ────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_is_immediately_visible() {
  let s = store();
  s.create_customer(customer("c1", 37.0, -122.0)).await.unwrap();

  let found = s.customer("c1").await;
  assert!(found.is_some());
  assert_eq!(found.unwrap().id, "c1");
}

#[tokio::test]
async fn customer_lookup_missing_returns_none() {
  let s = store();
  assert!(s.customer("nope").await.is_none());
}

#[tokio::test]
async fn round_trip_all_five_kinds() {
  let backend = MemorySnapshotStore::new();
  let s = EntityStore::new(backend.clone());

  let c = customer("c1", 37.3348, -122.0090);
  let v = visit("v1", "c1", Utc::now());
  let call = ServiceCall::open(
    &c,
    ServiceCallCategory::Technical,
    ServiceCallPriority::High,
    "Conveyor jammed".into(),
  );
  let d = Delivery::new(
    "c1".into(),
    "ORD-1001".into(),
    1_250.0,
    DeliveryStatus::Pending,
    vec![OrderItem::new("Bearing kit".into(), "BK-200".into(), 5, 250.0)],
    None,
  );
  let f = follow_up("f1", "c1", FollowUpPriority::High, Utc::now());

  s.create_customer(c.clone()).await.unwrap();
  s.create_visit(v.clone()).await.unwrap();
  s.create_service_call(call.clone()).await.unwrap();
  s.create_delivery(d.clone()).await.unwrap();
  s.create_follow_up(f.clone()).await.unwrap();

  // A fresh store over the same backend must reconstruct everything.
  let reloaded = EntityStore::new(backend);
  reloaded.load().await;

  assert_eq!(reloaded.customers().await, vec![c]);
  assert_eq!(reloaded.visits_for_customer("c1").await, vec![v]);
  assert_eq!(reloaded.service_calls_for_customer("c1").await, vec![call]);
  assert_eq!(reloaded.deliveries_for_customer("c1").await, vec![d]);
  assert_eq!(reloaded.follow_ups_for_customer("c1").await, vec![f]);
}

#[tokio::test]
async fn load_with_nothing_persisted_is_empty() {
  let s = store();
  s.load().await;
  assert!(s.customers().await.is_empty());
  assert!(s.follow_ups().await.is_empty());
}

#[tokio::test]
async fn corrupt_blob_degrades_to_empty() {
  let backend = MemorySnapshotStore::new();
  backend
    .write(EntityKind::Customer.snapshot_key(), b"not json".to_vec())
    .await
    .unwrap();

  let s = EntityStore::new(backend);
  s.load().await;
  assert!(s.customers().await.is_empty());
}

#[tokio::test]
async fn update_replaces_matching_record() {
  let s = store();
  s.create_customer(customer("c1", 37.0, -122.0)).await.unwrap();

  let mut changed = customer("c1", 37.0, -122.0);
  changed.tier = "Silver".into();
  s.update_customer(changed).await.unwrap();

  assert_eq!(s.customer("c1").await.unwrap().tier, "Silver");
  assert_eq!(s.customers().await.len(), 1);
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
  let s = store();
  let err = s.update_customer(customer("ghost", 37.0, -122.0)).await;
  assert!(matches!(err, Err(Error::CustomerNotFound(id)) if id == "ghost"));
}

#[tokio::test]
async fn change_event_published_on_create() {
  let s = store();
  let mut events = s.subscribe();

  s.create_visit(visit("v1", "c1", Utc::now())).await.unwrap();

  let event = events.try_recv().unwrap();
  assert_eq!(event.kind, EntityKind::Visit);
}

#[tokio::test]
async fn last_visit_picks_latest_check_in() {
  let s = store();
  let now = Utc::now();
  s.create_visit(visit("old", "c1", now - Duration::days(3))).await.unwrap();
  s.create_visit(visit("new", "c1", now - Duration::hours(1))).await.unwrap();
  s.create_visit(visit("other", "c2", now)).await.unwrap();

  assert_eq!(s.last_visit("c1").await.unwrap().id, "new");
  assert!(s.last_visit("c3").await.is_none());
}

// ─── Persistence failure ─────────────────────────────────────────────────────

/// A backend whose writes always fail, for exercising the error path.
#[derive(Clone, Default)]
struct BrokenBackend;

impl SnapshotStore for BrokenBackend {
  type Error = std::io::Error;

  async fn read(&self, _key: &'static str) -> std::io::Result<Option<Vec<u8>>> {
    Ok(None)
  }

  async fn write(&self, _key: &'static str, _bytes: Vec<u8>) -> std::io::Result<()> {
    Err(std::io::Error::other("disk full"))
  }
}

#[tokio::test]
async fn failed_persist_surfaces_error_but_keeps_memory() {
  let s = EntityStore::new(BrokenBackend);

  let err = s.create_customer(customer("c1", 37.0, -122.0)).await;
  assert!(matches!(err, Err(Error::Persistence(_))));

  // The mutation is still visible; only durability was lost.
  assert!(s.customer("c1").await.is_some());
}

// ─── Seeding ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn seed_if_empty_populates_once() {
  let s = store();
  s.load().await;

  assert!(s.seed_if_empty(EntityKind::Customer, &SampleSeed).await.unwrap());
  assert_eq!(s.customers().await.len(), 6);

  // Already populated: second call is a no-op.
  assert!(!s.seed_if_empty(EntityKind::Customer, &SampleSeed).await.unwrap());
  assert_eq!(s.customers().await.len(), 6);
}

#[tokio::test]
async fn seed_skips_non_empty_collection() {
  let s = store();
  s.create_customer(customer("mine", 37.0, -122.0)).await.unwrap();

  assert!(!s.seed_if_empty(EntityKind::Customer, &SampleSeed).await.unwrap());
  assert_eq!(s.customers().await.len(), 1);
}

#[tokio::test]
async fn sample_seed_shapes() {
  let seed = SampleSeed;
  assert_eq!(seed.customers().await.len(), 6);
  assert_eq!(seed.visits().await.len(), 4);
  assert!(seed.service_calls().await.is_empty());
  assert_eq!(seed.deliveries().await.len(), 14);

  let follow_ups = seed.follow_ups().await;
  assert_eq!(follow_ups.len(), 5);
  assert_eq!(follow_ups.iter().filter(|f| f.is_completed).count(), 1);
}

// ─── Proximity ───────────────────────────────────────────────────────────────

async fn proximity_fixture() -> ProximityIndex<MemorySnapshotStore> {
  let s = Arc::new(store());
  // C1 at the reference point, C2 roughly 500 m north, C3 a few km away.
  s.create_customer(customer("c1", 37.3348, -122.0090)).await.unwrap();
  s.create_customer(customer("c2", 37.3393, -122.0090)).await.unwrap();
  s.create_customer(customer("c3", 37.3230, -122.0322)).await.unwrap();
  ProximityIndex::new(s)
}

fn ids(mut customers: Vec<Customer>) -> Vec<String> {
  customers.sort_by(|a, b| a.id.cmp(&b.id));
  customers.into_iter().map(|c| c.id).collect()
}

#[tokio::test]
async fn radius_zero_returns_colocated_customer_only() {
  let index = proximity_fixture().await;
  let point = Coordinate::new(37.3348, -122.0090);

  assert_eq!(ids(index.within_radius(point, 0.0).await), ["c1"]);
}

#[tokio::test]
async fn one_mile_radius_includes_customer_half_a_kilometer_away() {
  let index = proximity_fixture().await;
  let point = Coordinate::new(37.3348, -122.0090);

  assert_eq!(ids(index.within_radius(point, 1.0).await), ["c1", "c2"]);
}

#[tokio::test]
async fn radius_results_grow_monotonically() {
  let index = proximity_fixture().await;
  let point = Coordinate::new(37.3348, -122.0090);

  let radii = [0.0, 0.5, 1.0, 5.0];
  let mut previous: Vec<String> = Vec::new();
  for radius in radii {
    let current = ids(index.within_radius(point, radius).await);
    assert!(
      previous.iter().all(|id| current.contains(id)),
      "radius {radius} lost customers present at a smaller radius"
    );
    previous = current;
  }
  assert_eq!(previous, ["c1", "c2", "c3"]);
}

#[tokio::test]
async fn missing_location_returns_all_customers() {
  let index = proximity_fixture().await;

  let all = index.near(None, 0.001).await;
  assert_eq!(all.len(), 3);
}

// ─── Scheduler views ─────────────────────────────────────────────────────────

async fn scheduler_over(
  follow_ups: Vec<FollowUp>,
) -> FollowUpScheduler<MemorySnapshotStore> {
  let s = Arc::new(store());
  for f in follow_ups {
    s.create_follow_up(f).await.unwrap();
  }
  FollowUpScheduler::new(s)
}

#[tokio::test]
async fn pending_orders_by_priority_rank_then_due_date() {
  let now = fixed_now();
  let scheduler = scheduler_over(vec![
    follow_up("low-early", "c1", FollowUpPriority::Low, now - Duration::days(9)),
    follow_up("med-late", "c1", FollowUpPriority::Medium, now + Duration::days(6)),
    follow_up("med-early", "c2", FollowUpPriority::Medium, now + Duration::days(1)),
    follow_up("urgent", "c3", FollowUpPriority::Urgent, now + Duration::days(8)),
  ])
  .await;

  let pending = scheduler.pending().await;
  let order: Vec<&str> = pending.iter().map(|f| f.id.as_str()).collect();
  assert_eq!(order, ["urgent", "med-early", "med-late", "low-early"]);

  // The invariant behind the fixed expectation: ranks never decrease, and
  // due dates never decrease within a rank.
  for pair in pending.windows(2) {
    let (a, b) = (&pair[0], &pair[1]);
    assert!(a.priority.rank() <= b.priority.rank());
    if a.priority.rank() == b.priority.rank() {
      assert!(a.follow_up_date <= b.follow_up_date);
    }
  }
}

#[tokio::test]
async fn urgent_rank_beats_earlier_due_date() {
  // F1 high priority, due yesterday; F2 urgent, due tomorrow.
  let now = fixed_now();
  let scheduler = scheduler_over(vec![
    follow_up("f1", "c1", FollowUpPriority::High, now - Duration::days(1)),
    follow_up("f2", "c2", FollowUpPriority::Urgent, now + Duration::days(1)),
  ])
  .await;

  let order: Vec<String> =
    scheduler.pending().await.into_iter().map(|f| f.id).collect();
  assert_eq!(order, ["f2", "f1"]);

  let overdue: Vec<String> =
    scheduler.overdue(now).await.into_iter().map(|f| f.id).collect();
  assert_eq!(overdue, ["f1"]);

  // F2 is due tomorrow, past the end of today, so it is not urgent yet.
  let urgent: Vec<String> =
    scheduler.urgent(now).await.into_iter().map(|f| f.id).collect();
  assert_eq!(urgent, ["f1"]);
}

#[tokio::test]
async fn urgent_includes_items_due_later_today() {
  let now = fixed_now();
  let scheduler = scheduler_over(vec![
    follow_up("later-today", "c1", FollowUpPriority::Low, now + Duration::hours(3)),
    follow_up("tomorrow", "c2", FollowUpPriority::Urgent, now + Duration::days(2)),
  ])
  .await;

  let urgent: Vec<String> =
    scheduler.urgent(now).await.into_iter().map(|f| f.id).collect();
  assert_eq!(urgent, ["later-today"]);

  // Due later today is urgent but not yet overdue.
  assert!(scheduler.overdue(now).await.is_empty());
}

#[tokio::test]
async fn overdue_is_subset_of_urgent() {
  let now = fixed_now();
  let scheduler = scheduler_over(vec![
    follow_up("a", "c1", FollowUpPriority::High, now - Duration::days(4)),
    follow_up("b", "c1", FollowUpPriority::Low, now - Duration::minutes(5)),
    follow_up("c", "c2", FollowUpPriority::Medium, now + Duration::hours(2)),
    follow_up("d", "c2", FollowUpPriority::Urgent, now + Duration::days(3)),
  ])
  .await;

  let urgent: Vec<String> =
    scheduler.urgent(now).await.into_iter().map(|f| f.id).collect();
  for f in scheduler.overdue(now).await {
    assert!(urgent.contains(&f.id), "overdue {} missing from urgent", f.id);
  }
}

#[tokio::test]
async fn completed_follow_ups_are_excluded_from_views() {
  let now = fixed_now();
  let mut done = follow_up("done", "c1", FollowUpPriority::Urgent, now - Duration::days(2));
  done.is_completed = true;
  done.completed_at = Some(now - Duration::days(1));

  let scheduler = scheduler_over(vec![
    done,
    follow_up("open", "c1", FollowUpPriority::Low, now - Duration::days(1)),
  ])
  .await;

  let pending: Vec<String> =
    scheduler.pending().await.into_iter().map(|f| f.id).collect();
  assert_eq!(pending, ["open"]);
  assert_eq!(scheduler.overdue(now).await.len(), 1);
  assert_eq!(scheduler.for_customer("c1").await.len(), 1);
}

#[tokio::test]
async fn for_customer_filters_by_reference() {
  let now = fixed_now();
  let scheduler = scheduler_over(vec![
    follow_up("mine", "c1", FollowUpPriority::Medium, now),
    follow_up("theirs", "c2", FollowUpPriority::Medium, now),
  ])
  .await;

  let mine = scheduler.for_customer("c1").await;
  assert_eq!(mine.len(), 1);
  assert_eq!(mine[0].id, "mine");
}

// ─── Follow-up transitions ───────────────────────────────────────────────────

#[tokio::test]
async fn complete_stamps_completion_fields() {
  let s = store();
  s.create_follow_up(follow_up("f1", "c1", FollowUpPriority::High, Utc::now()))
    .await
    .unwrap();

  let completed = s
    .complete_follow_up("f1", Some("Spoke with purchasing".into()))
    .await
    .unwrap();

  assert!(completed.is_completed);
  assert!(completed.completed_at.is_some());
  assert_eq!(completed.completion_notes.as_deref(), Some("Spoke with purchasing"));
}

#[tokio::test]
async fn complete_twice_is_rejected() {
  let s = store();
  s.create_follow_up(follow_up("f1", "c1", FollowUpPriority::High, Utc::now()))
    .await
    .unwrap();

  s.complete_follow_up("f1", None).await.unwrap();
  let err = s.complete_follow_up("f1", Some("again".into())).await;
  assert!(matches!(err, Err(Error::AlreadyCompleted(id)) if id == "f1"));

  // The first completion's fields were not overwritten.
  let kept = &s.follow_ups_for_customer("c1").await[0];
  assert!(kept.completion_notes.is_none());
}

#[tokio::test]
async fn complete_unknown_id_is_not_found() {
  let s = store();
  let err = s.complete_follow_up("ghost", None).await;
  assert!(matches!(err, Err(Error::FollowUpNotFound(_))));
}

#[tokio::test]
async fn complete_and_chain_completes_and_creates_exactly_one() {
  let backend = MemorySnapshotStore::new();
  let s = EntityStore::new(backend.clone());
  let mut original =
    follow_up("f1", "c1", FollowUpPriority::High, fixed_now());
  original.related_visit_id = Some("visit_9".into());
  s.create_follow_up(original).await.unwrap();

  let new_due = fixed_now() + Duration::days(7);
  let (completed, created) = s
    .complete_and_chain(
      "f1",
      Some("Delivered the quote".into()),
      new_due,
      Some("Check on the quote".into()),
      FollowUpPriority::Medium,
    )
    .await
    .unwrap();

  assert!(completed.is_completed);
  assert_eq!(completed.id, "f1");

  assert!(!created.is_completed);
  assert_eq!(created.customer_id, "c1");
  assert_eq!(created.user_id, completed.user_id);
  assert_eq!(created.follow_up_date, new_due);
  assert_eq!(created.priority, FollowUpPriority::Medium);
  assert_eq!(created.notes.as_deref(), Some("Check on the quote"));
  // A chained follow-up is a fresh reminder, not tied to the old visit.
  assert!(created.related_visit_id.is_none());

  let all = s.follow_ups().await;
  assert_eq!(all.len(), 2);
  assert_eq!(all.iter().filter(|f| !f.is_completed).count(), 1);

  // Both halves of the transition went down in one snapshot.
  let reloaded = EntityStore::new(backend);
  reloaded.load().await;
  let persisted = reloaded.follow_ups().await;
  assert_eq!(persisted.len(), 2);
  assert!(persisted.iter().any(|f| f.id == "f1" && f.is_completed));
  assert!(persisted.iter().any(|f| f.id == created.id && !f.is_completed));
}

#[tokio::test]
async fn complete_and_chain_on_completed_changes_nothing() {
  let s = store();
  s.create_follow_up(follow_up("f1", "c1", FollowUpPriority::High, Utc::now()))
    .await
    .unwrap();
  s.complete_follow_up("f1", None).await.unwrap();

  let err = s
    .complete_and_chain("f1", None, Utc::now(), None, FollowUpPriority::Low)
    .await;
  assert!(matches!(err, Err(Error::AlreadyCompleted(_))));
  assert_eq!(s.follow_ups().await.len(), 1);
}

// ─── Entity helpers ──────────────────────────────────────────────────────────

#[test]
fn order_item_computes_line_total() {
  let item = OrderItem::new("Bearing kit".into(), "BK-200".into(), 12, 325.5);
  assert_eq!(item.line_total, 12.0 * 325.5);
}

#[test]
fn service_call_snapshots_customer_identity() {
  let c = customer("c1", 37.0, -122.0);
  let call = ServiceCall::open(
    &c,
    ServiceCallCategory::Billing,
    ServiceCallPriority::Medium,
    "Duplicate invoice".into(),
  );

  assert_eq!(call.customer_id, "c1");
  assert_eq!(call.customer_name, c.name);
  assert_eq!(call.customer_company, c.company);
  assert_eq!(call.status, crate::service_call::ServiceCallStatus::Open);
}
