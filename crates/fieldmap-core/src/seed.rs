//! First-run seeding.
//!
//! [`SeedSource`] is the pluggable "fetch the initial records" collaborator:
//! in production it would front a remote backend; [`SampleSeed`] implements
//! it with the canonical sample territory so a fresh install has something
//! to show.

use std::future::Future;

use chrono::{DateTime, Duration, Utc};

use crate::{
  customer::Customer,
  delivery::{Delivery, DeliveryStatus},
  follow_up::{FollowUp, FollowUpPriority},
  geo::Coordinate,
  service_call::ServiceCall,
  visit::{Visit, VisitPurpose},
};

/// The sample rep every seeded visit and follow-up belongs to.
pub const SAMPLE_USER_ID: &str = "rep_456";

/// Supplies initial records per entity kind. Each method is consulted at
/// most once per kind, and only when that collection is empty.
pub trait SeedSource: Send + Sync {
  fn customers(&self) -> impl Future<Output = Vec<Customer>> + Send + '_;
  fn visits(&self) -> impl Future<Output = Vec<Visit>> + Send + '_;
  fn service_calls(&self) -> impl Future<Output = Vec<ServiceCall>> + Send + '_;
  fn deliveries(&self) -> impl Future<Output = Vec<Delivery>> + Send + '_;
  fn follow_ups(&self) -> impl Future<Output = Vec<FollowUp>> + Send + '_;
}

fn days_ago(n: i64) -> DateTime<Utc> {
  Utc::now() - Duration::days(n)
}

fn days_from_now(n: i64) -> DateTime<Utc> {
  Utc::now() + Duration::days(n)
}

fn hours_ago(n: i64) -> DateTime<Utc> {
  Utc::now() - Duration::hours(n)
}

/// The canonical sample territory: six Cupertino customers, a handful of
/// recent visits and follow-ups, a delivery history, and no service calls.
/// Timestamps are relative to now so the data always looks current.
pub struct SampleSeed;

impl SeedSource for SampleSeed {
  async fn customers(&self) -> Vec<Customer> {
    vec![
      Customer {
        id: "12345".into(),
        name: "John Smith".into(),
        company: "ABC Manufacturing".into(),
        address: "1 Apple Park Way, Cupertino, CA 95014".into(),
        phone: "+1-408-555-0123".into(),
        email: "john.smith@abcmfg.com".into(),
        tier: "Gold".into(),
        territory_id: "CA-SOUTH".into(),
        last_contact: Some(days_ago(5)),
        latitude: 37.3348,
        longitude: -122.0090,
        total_revenue: 125_000.0,
        last_purchase: Some(days_ago(20)),
      },
      Customer {
        id: "12346".into(),
        name: "Sarah Johnson".into(),
        company: "Tech Solutions Inc".into(),
        address: "10600 N De Anza Blvd, Cupertino, CA 95014".into(),
        phone: "+1-408-555-0124".into(),
        email: "sarah.johnson@techsolutions.com".into(),
        tier: "Silver".into(),
        territory_id: "CA-SOUTH".into(),
        last_contact: Some(days_ago(10)),
        latitude: 37.3230,
        longitude: -122.0322,
        total_revenue: 85_000.0,
        last_purchase: Some(days_ago(35)),
      },
      Customer {
        id: "12347".into(),
        name: "Mike Davis".into(),
        company: "Davis Enterprises".into(),
        address: "19501 Stevens Creek Blvd, Cupertino, CA 95014".into(),
        phone: "+1-408-555-0125".into(),
        email: "mike.davis@davisenterprise.com".into(),
        tier: "Bronze".into(),
        territory_id: "CA-SOUTH".into(),
        last_contact: Some(days_ago(15)),
        latitude: 37.3161,
        longitude: -122.0194,
        total_revenue: 45_000.0,
        last_purchase: Some(days_ago(60)),
      },
      Customer {
        id: "12348".into(),
        name: "Lisa Chen".into(),
        company: "Innovation Labs".into(),
        address: "20525 Mariani Ave, Cupertino, CA 95014".into(),
        phone: "+1-408-555-0126".into(),
        email: "lisa.chen@innovationlabs.com".into(),
        tier: "Gold".into(),
        territory_id: "CA-SOUTH".into(),
        last_contact: Some(days_ago(3)),
        latitude: 37.3387,
        longitude: -122.0081,
        total_revenue: 180_000.0,
        last_purchase: Some(days_ago(10)),
      },
      Customer {
        id: "12349".into(),
        name: "Robert Wilson".into(),
        company: "Silicon Valley Dynamics".into(),
        address: "10123 N Wolfe Rd, Cupertino, CA 95014".into(),
        phone: "+1-408-555-0127".into(),
        email: "robert.wilson@svdynamics.com".into(),
        tier: "Silver".into(),
        territory_id: "CA-SOUTH".into(),
        last_contact: Some(days_ago(7)),
        latitude: 37.3302,
        longitude: -122.0143,
        total_revenue: 95_000.0,
        last_purchase: Some(days_ago(25)),
      },
      Customer {
        id: "12350".into(),
        name: "Amanda Rodriguez".into(),
        company: "Future Tech Corp".into(),
        address: "21275 Stevens Creek Blvd, Cupertino, CA 95014".into(),
        phone: "+1-408-555-0128".into(),
        email: "amanda.rodriguez@futuretech.com".into(),
        tier: "Bronze".into(),
        territory_id: "CA-SOUTH".into(),
        last_contact: Some(days_ago(12)),
        latitude: 37.3234,
        longitude: -122.0278,
        total_revenue: 62_000.0,
        last_purchase: Some(days_ago(45)),
      },
    ]
  }

  async fn visits(&self) -> Vec<Visit> {
    vec![
      Visit {
        id: "visit_001".into(),
        customer_id: "12345".into(),
        user_id: SAMPLE_USER_ID.into(),
        purpose: VisitPurpose::SalesCall,
        notes: Some(
          "Discussed Q4 inventory needs. Customer interested in bulk pricing."
            .into(),
        ),
        check_in_time: hours_ago(2),
        check_out_time: Some(hours_ago(1)),
        location: Coordinate::new(37.3348, -122.0090),
        photos: None,
      },
      Visit {
        id: "visit_002".into(),
        customer_id: "12346".into(),
        user_id: SAMPLE_USER_ID.into(),
        purpose: VisitPurpose::ProductDemo,
        notes: Some(
          "Demonstrated new software features. Very positive response.".into(),
        ),
        check_in_time: days_ago(1),
        check_out_time: Some(days_ago(1) + Duration::hours(1)),
        location: Coordinate::new(37.3230, -122.0322),
        photos: None,
      },
      Visit {
        id: "visit_003".into(),
        customer_id: "12348".into(),
        user_id: SAMPLE_USER_ID.into(),
        purpose: VisitPurpose::ContractNegotiation,
        notes: Some(
          "Finalized terms for annual contract. Signed deal worth $50k.".into(),
        ),
        check_in_time: days_ago(2),
        check_out_time: Some(days_ago(2) + Duration::hours(2)),
        location: Coordinate::new(37.3387, -122.0081),
        photos: None,
      },
      Visit {
        id: "visit_004".into(),
        customer_id: "12349".into(),
        user_id: SAMPLE_USER_ID.into(),
        purpose: VisitPurpose::FollowUpMeeting,
        notes: Some(
          "Checked on implementation progress. Customer very satisfied.".into(),
        ),
        check_in_time: days_ago(3),
        check_out_time: Some(days_ago(3) + Duration::minutes(45)),
        location: Coordinate::new(37.3302, -122.0143),
        photos: None,
      },
    ]
  }

  async fn service_calls(&self) -> Vec<ServiceCall> {
    // Service calls only exist once a customer reports a problem.
    Vec::new()
  }

  async fn deliveries(&self) -> Vec<Delivery> {
    let delivered = |id: &str,
                     customer_id: &str,
                     days: i64,
                     total: f64,
                     order_number: &str| Delivery {
      id: id.into(),
      customer_id: customer_id.into(),
      date: days_ago(days),
      total,
      order_number: order_number.into(),
      status: DeliveryStatus::Delivered,
      items: Vec::new(),
      notes: None,
    };

    vec![
      delivered("del_001", "12345", 5, 15_750.0, "ORD-2024-101"),
      delivered("del_002", "12345", 20, 22_300.0, "ORD-2024-102"),
      delivered("del_003", "12345", 35, 18_950.0, "ORD-2024-103"),
      delivered("del_004", "12345", 50, 12_400.0, "ORD-2024-104"),
      delivered("del_005", "12345", 65, 19_800.0, "ORD-2024-105"),
      delivered("del_006", "12346", 15, 8_750.0, "ORD-2024-201"),
      delivered("del_007", "12346", 40, 11_200.0, "ORD-2024-202"),
      delivered("del_008", "12346", 70, 6_500.0, "ORD-2024-203"),
      delivered("del_009", "12348", 8, 28_500.0, "ORD-2024-301"),
      delivered("del_010", "12348", 25, 31_200.0, "ORD-2024-302"),
      delivered("del_011", "12348", 45, 24_800.0, "ORD-2024-303"),
      delivered("del_012", "12348", 60, 33_750.0, "ORD-2024-304"),
      delivered("del_013", "12349", 18, 14_300.0, "ORD-2024-401"),
      delivered("del_014", "12349", 55, 16_750.0, "ORD-2024-402"),
    ]
  }

  async fn follow_ups(&self) -> Vec<FollowUp> {
    vec![
      FollowUp {
        id: "followup_001".into(),
        customer_id: "12345".into(),
        user_id: SAMPLE_USER_ID.into(),
        follow_up_date: days_from_now(2),
        notes: Some("Follow up on Q4 inventory pricing discussion".into()),
        priority: FollowUpPriority::High,
        is_completed: false,
        created_at: hours_ago(2),
        completed_at: None,
        completion_notes: None,
        related_visit_id: Some("visit_001".into()),
      },
      FollowUp {
        id: "followup_002".into(),
        customer_id: "12346".into(),
        user_id: SAMPLE_USER_ID.into(),
        follow_up_date: days_from_now(1),
        notes: Some("Send product demo video and pricing sheet".into()),
        priority: FollowUpPriority::Medium,
        is_completed: false,
        created_at: days_ago(1),
        completed_at: None,
        completion_notes: None,
        related_visit_id: Some("visit_002".into()),
      },
      FollowUp {
        id: "followup_003".into(),
        customer_id: "12347".into(),
        user_id: SAMPLE_USER_ID.into(),
        follow_up_date: days_ago(1),
        notes: Some("Check if they received the contract documents".into()),
        priority: FollowUpPriority::Urgent,
        is_completed: false,
        created_at: days_ago(3),
        completed_at: None,
        completion_notes: None,
        related_visit_id: None,
      },
      FollowUp {
        id: "followup_004".into(),
        customer_id: "12348".into(),
        user_id: SAMPLE_USER_ID.into(),
        follow_up_date: days_from_now(5),
        notes: Some("Schedule implementation kickoff meeting".into()),
        priority: FollowUpPriority::Medium,
        is_completed: false,
        created_at: days_ago(2),
        completed_at: None,
        completion_notes: None,
        related_visit_id: Some("visit_003".into()),
      },
      FollowUp {
        id: "followup_005".into(),
        customer_id: "12349".into(),
        user_id: SAMPLE_USER_ID.into(),
        follow_up_date: days_ago(5),
        notes: Some("Thank you call for successful implementation".into()),
        priority: FollowUpPriority::Low,
        is_completed: true,
        created_at: days_ago(7),
        completed_at: Some(days_ago(5)),
        completion_notes: Some(
          "Called customer, they were very satisfied with the implementation. \
           Mentioned they may need additional training in Q1."
            .into(),
        ),
        related_visit_id: Some("visit_004".into()),
      },
    ]
  }
}
