//! Domain records and wire shapes
//!
//! Everything serializes with camelCase field names to match the snapshot
//! document and the browser clients.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A user, created on first login. Never updated or deleted;
/// uniqueness key is (name, team).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub team: String,
}

/// Achieved/goal pair for one VRET metric. Both fields are free-form
/// numeric-as-text exactly as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValue {
    #[serde(default)]
    pub achieved: String,
    #[serde(default)]
    pub goal: String,
}

/// A work-related-injury incident attached to a daily entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
}

/// A team's daily shift report (WASH entry). Natural key is (date, team);
/// the store assigns `id` on first insert and keeps it stable across updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Calendar day, YYYY-MM-DD
    pub date: String,
    pub team: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub vret_metrics: BTreeMap<String, MetricValue>,
    #[serde(default)]
    pub vret_bridges: BTreeMap<String, String>,
    #[serde(default)]
    pub wri_incidents: Vec<Incident>,
    #[serde(default)]
    pub handoff_notes: String,
    #[serde(default)]
    pub station_readiness: String,
    #[serde(default)]
    pub leadership_callouts: String,
    #[serde(default)]
    pub locked: bool,
}

/// Weekly action item status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Closed,
}

impl Default for ActionStatus {
    fn default() -> Self {
        ActionStatus::Open
    }
}

/// Weekly action item priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl Default for ActionPriority {
    fn default() -> Self {
        ActionPriority::Medium
    }
}

/// A tracked follow-up item scoped to a calendar week and team.
/// Carry-over copies get a fresh id, an incremented `weeks_pushed`,
/// and `original_week_start` pinned to the first week they appeared in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub action: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub status: ActionStatus,
    #[serde(default)]
    pub priority: ActionPriority,
    /// Sunday anchoring the week, YYYY-MM-DD
    pub week_start: String,
    pub team: String,
    #[serde(default)]
    pub created_by: String,
    /// RFC3339 timestamp, stamped by the store on insert
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub weeks_pushed: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_week_start: Option<String>,
}

/// Next-id counters, one per entity type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextId {
    pub wash: u64,
    pub action: u64,
}

impl Default for NextId {
    fn default() -> Self {
        Self { wash: 1, action: 1 }
    }
}

/// The whole persisted document, rewritten wholesale on every mutation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub wash_entries: Vec<DailyEntry>,
    #[serde(default)]
    pub weekly_actions: Vec<WeeklyAction>,
    #[serde(default)]
    pub next_id: NextId,
}

/// Body of POST /api/lock-week
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockWeekRequest {
    pub team: String,
    pub week_start: String,
    pub week_end: String,
    #[serde(default)]
    pub entries: Vec<DailyEntry>,
    #[serde(default)]
    pub actions: Vec<WeeklyAction>,
    #[serde(default)]
    pub locked_by: String,
}
