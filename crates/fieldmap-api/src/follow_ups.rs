//! Handlers for `/follow-ups` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/follow-ups` | Body: [`CreateBody`]; returns 201 + stored follow-up |
//! | `GET`  | `/follow-ups/pending` | Priority rank, then due date |
//! | `GET`  | `/follow-ups/overdue` | Due before now, earliest first |
//! | `GET`  | `/follow-ups/urgent` | Due today or earlier, earliest first |
//! | `POST` | `/follow-ups/:id/complete` | 404 unknown id, 409 already completed |
//! | `POST` | `/follow-ups/:id/complete-and-chain` | Completes and creates the successor |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use fieldmap_core::{
  follow_up::{FollowUp, FollowUpPriority},
  scheduler::FollowUpScheduler,
  storage::SnapshotStore,
};
use serde::{Deserialize, Serialize};

use crate::{ApiError, AppState};

fn scheduler<B: SnapshotStore>(state: &AppState<B>) -> FollowUpScheduler<B> {
  FollowUpScheduler::new(Arc::clone(&state.store))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /follow-ups`. The user id is stamped from
/// the authentication context, never accepted from callers.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub customer_id:      String,
  pub follow_up_date:   DateTime<Utc>,
  pub notes:            Option<String>,
  pub priority:         FollowUpPriority,
  pub related_visit_id: Option<String>,
}

/// `POST /follow-ups`
pub async fn create<B>(
  State(state): State<AppState<B>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  B: SnapshotStore + 'static,
{
  let follow_up = FollowUp::new(
    body.customer_id,
    state.auth.current_user_id(),
    body.follow_up_date,
    body.notes,
    body.priority,
    body.related_visit_id,
  );

  state.store.create_follow_up(follow_up.clone()).await?;
  Ok((StatusCode::CREATED, Json(follow_up)))
}

// ─── Views ────────────────────────────────────────────────────────────────────

/// `GET /follow-ups/pending`
pub async fn pending<B>(State(state): State<AppState<B>>) -> Json<Vec<FollowUp>>
where
  B: SnapshotStore + 'static,
{
  Json(scheduler(&state).pending().await)
}

/// `GET /follow-ups/overdue`
pub async fn overdue<B>(State(state): State<AppState<B>>) -> Json<Vec<FollowUp>>
where
  B: SnapshotStore + 'static,
{
  Json(scheduler(&state).overdue(Utc::now()).await)
}

/// `GET /follow-ups/urgent`
pub async fn urgent<B>(State(state): State<AppState<B>>) -> Json<Vec<FollowUp>>
where
  B: SnapshotStore + 'static,
{
  Json(scheduler(&state).urgent(Utc::now()).await)
}

// ─── Transitions ──────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CompleteBody {
  pub completion_notes: Option<String>,
}

/// `POST /follow-ups/:id/complete`
pub async fn complete<B>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
  Json(body): Json<CompleteBody>,
) -> Result<Json<FollowUp>, ApiError>
where
  B: SnapshotStore + 'static,
{
  let completed = scheduler(&state).complete(&id, body.completion_notes).await?;
  Ok(Json(completed))
}

#[derive(Debug, Deserialize)]
pub struct CompleteAndChainBody {
  pub completion_notes: Option<String>,
  /// Due date for the successor follow-up.
  pub follow_up_date:   DateTime<Utc>,
  pub notes:            Option<String>,
  pub priority:         FollowUpPriority,
}

/// Response for `POST /follow-ups/:id/complete-and-chain`.
#[derive(Debug, Serialize)]
pub struct ChainedFollowUps {
  pub completed: FollowUp,
  pub created:   FollowUp,
}

/// `POST /follow-ups/:id/complete-and-chain` — complete one reminder and
/// atomically schedule its successor.
pub async fn complete_and_chain<B>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
  Json(body): Json<CompleteAndChainBody>,
) -> Result<Json<ChainedFollowUps>, ApiError>
where
  B: SnapshotStore + 'static,
{
  let (completed, created) = scheduler(&state)
    .complete_and_chain(
      &id,
      body.completion_notes,
      body.follow_up_date,
      body.notes,
      body.priority,
    )
    .await?;
  Ok(Json(ChainedFollowUps { completed, created }))
}
