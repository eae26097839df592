//! Lock/rollover workflow
//!
//! Locking a week carries every non-Closed action for that team and week
//! into the next week's bucket, then dispatches a week summary to the
//! webhook. A single carry-over failure is logged and does not block the
//! rest; only the initiating actor learns the outcome.

use chrono::{Days, NaiveDate};
use tracing::warn;

use crate::api::SharedState;
use crate::models::{ActionStatus, LockWeekRequest, WeeklyAction};
use crate::notify::NotifyError;
use crate::service;

/// Outcome reported to the actor that requested the lock
pub struct LockWeekOutcome {
    pub carried_over: usize,
    pub notified: Result<(), NotifyError>,
}

/// The Sunday one week after `week_start`, or None when the input does not
/// parse as a calendar date
pub fn next_week_start(week_start: &str) -> Option<String> {
    NaiveDate::parse_from_str(week_start, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.checked_add_days(Days::new(7)))
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Build the carry-over copy of an unclosed action: fresh identity, next
/// week's bucket, push counter incremented, original week pinned to the
/// earliest value. The store restamps createdAt on insert.
pub fn carry_over(action: &WeeklyAction, next_week_start: &str) -> WeeklyAction {
    WeeklyAction {
        id: None,
        week_start: next_week_start.to_string(),
        weeks_pushed: action.weeks_pushed + 1,
        original_week_start: Some(
            action
                .original_week_start
                .clone()
                .unwrap_or_else(|| action.week_start.clone()),
        ),
        created_at: String::new(),
        ..action.clone()
    }
}

/// Execute the week lock: carry incomplete actions forward through the
/// normal upsert path, then send the week summary.
pub async fn lock_week(state: &SharedState, req: &LockWeekRequest) -> LockWeekOutcome {
    // The store is authoritative for the week's action list; the request
    // body's copy may be stale.
    let incomplete: Vec<WeeklyAction> = state
        .store
        .read()
        .await
        .actions_for_week(&req.team, &req.week_start)
        .into_iter()
        .filter(|a| a.status != ActionStatus::Closed)
        .collect();

    let mut carried_over = 0;
    match next_week_start(&req.week_start) {
        Some(next) => {
            for action in &incomplete {
                let copy = carry_over(action, &next);
                match service::save_weekly_action(state, copy).await {
                    Some(_) => carried_over += 1,
                    None => warn!(
                        action = %action.action,
                        team = %req.team,
                        "Failed to carry over action"
                    ),
                }
            }
        }
        None => {
            warn!(week_start = %req.week_start, "Unparseable week start, skipping carry-over");
        }
    }

    let notified = state.notifier.send_weekly(req).await;

    LockWeekOutcome {
        carried_over,
        notified,
    }
}
