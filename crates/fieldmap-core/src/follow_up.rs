//! Follow-up — a reminder to get back to a customer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Priority with a fixed total order. Ordering logic lives here; display
/// names and colors belong to the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FollowUpPriority {
  #[serde(rename = "Low")]
  Low,
  #[serde(rename = "Medium")]
  Medium,
  #[serde(rename = "High")]
  High,
  #[serde(rename = "Urgent")]
  Urgent,
}

impl FollowUpPriority {
  /// Sort rank: urgent sorts first.
  pub fn rank(self) -> u8 {
    match self {
      Self::Urgent => 0,
      Self::High => 1,
      Self::Medium => 2,
      Self::Low => 3,
    }
  }
}

/// A follow-up reminder. States are pending (`is_completed = false`) and
/// completed; completion happens at most once and is driven through the
/// store's transitions, never by mutating records directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUp {
  pub id:               String,
  pub customer_id:      String,
  pub user_id:          String,
  pub follow_up_date:   DateTime<Utc>,
  pub notes:            Option<String>,
  pub priority:         FollowUpPriority,
  pub is_completed:     bool,
  pub created_at:       DateTime<Utc>,
  pub completed_at:     Option<DateTime<Utc>>,
  pub completion_notes: Option<String>,
  /// The visit that spawned this reminder, if any. Chained follow-ups
  /// deliberately leave this empty — they are fresh reminders, not
  /// children of the previous visit.
  pub related_visit_id: Option<String>,
}

impl FollowUp {
  /// Create a pending follow-up due at `follow_up_date`.
  pub fn new(
    customer_id: String,
    user_id: String,
    follow_up_date: DateTime<Utc>,
    notes: Option<String>,
    priority: FollowUpPriority,
    related_visit_id: Option<String>,
  ) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      customer_id,
      user_id,
      follow_up_date,
      notes,
      priority,
      is_completed: false,
      created_at: Utc::now(),
      completed_at: None,
      completion_notes: None,
      related_visit_id,
    }
  }
}
