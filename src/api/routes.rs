//! REST handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use super::SharedState;
use crate::models::{DailyEntry, LockWeekRequest, User, WeeklyAction};
use crate::rollover;

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    "OK"
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub team: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: User,
}

/// POST /api/login - find-or-create the (name, team) user. Idempotent.
pub async fn api_login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Json<LoginResponse> {
    let user = state
        .store
        .write()
        .await
        .find_or_create_user(&req.name, &req.team);

    Json(LoginResponse {
        success: true,
        user,
    })
}

/// GET /api/wash-entries - full dump, no pagination
pub async fn api_wash_entries(State(state): State<SharedState>) -> Json<Vec<DailyEntry>> {
    Json(state.store.read().await.wash_entries())
}

/// GET /api/weekly-actions - full dump
pub async fn api_weekly_actions(State(state): State<SharedState>) -> Json<Vec<WeeklyAction>> {
    Json(state.store.read().await.weekly_actions())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockWeekResponse {
    pub success: bool,
    pub carried_over: usize,
    pub message: String,
}

/// POST /api/lock-week - carry incomplete actions forward and send the week
/// summary. Failure to notify is reported to the initiating caller only.
pub async fn api_lock_week(
    State(state): State<SharedState>,
    Json(req): Json<LockWeekRequest>,
) -> Result<Json<LockWeekResponse>, (StatusCode, Json<LockWeekResponse>)> {
    let outcome = rollover::lock_week(&state, &req).await;

    match outcome.notified {
        Ok(()) => {
            let message = if outcome.carried_over > 0 {
                format!(
                    "Week locked! {} incomplete action(s) carried to next week.",
                    outcome.carried_over
                )
            } else {
                "Week locked and summary sent to Slack!".to_string()
            };
            Ok(Json(LockWeekResponse {
                success: true,
                carried_over: outcome.carried_over,
                message,
            }))
        }
        Err(e) => {
            error!(
                team = %req.team,
                week_start = %req.week_start,
                error = %e,
                "Failed to send weekly summary"
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(LockWeekResponse {
                    success: false,
                    carried_over: outcome.carried_over,
                    message: "Week locked locally, but failed to send Slack notification."
                        .to_string(),
                }),
            ))
        }
    }
}
