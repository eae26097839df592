//! Record store - in-memory object graph mirrored to one JSON snapshot
//!
//! Every mutation rewrites the whole snapshot file. There is no partial
//! write and no rollback: if the disk write fails, memory and disk diverge
//! until the next successful save. On startup an unreadable snapshot is
//! discarded and the store starts empty.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::models::{DailyEntry, Snapshot, User, WeeklyAction};

pub struct Store {
    path: PathBuf,
    snapshot: Snapshot,
}

/// Result of a daily-entry upsert. `was_locked` is the previous lock state,
/// used to edge-trigger the notification on the false→true transition.
#[derive(Debug, Clone)]
pub struct WashUpsert {
    pub entry: DailyEntry,
    pub was_locked: bool,
}

impl Store {
    /// Load the snapshot at `path`, or start empty if it is missing or
    /// unparseable.
    pub fn load(path: PathBuf) -> Self {
        let snapshot = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Snapshot>(&content) {
                Ok(snapshot) => {
                    info!(
                        path = %path.display(),
                        entries = snapshot.wash_entries.len(),
                        actions = snapshot.weekly_actions.len(),
                        "Loaded snapshot"
                    );
                    snapshot
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Unreadable snapshot, starting empty");
                    Snapshot::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "No snapshot found, starting empty");
                Snapshot::default()
            }
        };

        Self { path, snapshot }
    }

    /// Rewrite the whole snapshot to disk
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&self.snapshot)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn persist(&self) {
        // A failed write leaves memory ahead of disk; logged, not rolled back
        if let Err(e) = self.save() {
            warn!(path = %self.path.display(), error = %e, "Failed to persist snapshot");
        }
    }

    /// Find a user by (name, team), creating it on first sight. Idempotent.
    pub fn find_or_create_user(&mut self, name: &str, team: &str) -> User {
        if let Some(user) = self
            .snapshot
            .users
            .iter()
            .find(|u| u.name == name && u.team == team)
        {
            return user.clone();
        }

        let user = User {
            name: name.to_string(),
            team: team.to_string(),
        };
        self.snapshot.users.push(user.clone());
        self.persist();
        info!(name, team, "Created user");
        user
    }

    /// Upsert a daily entry by its natural key (date, team). An existing
    /// record keeps its id and has every other field replaced; a new record
    /// gets the next wash id. Persists before returning.
    pub fn upsert_wash_entry(&mut self, mut entry: DailyEntry) -> WashUpsert {
        let existing = self
            .snapshot
            .wash_entries
            .iter_mut()
            .find(|e| e.date == entry.date && e.team == entry.team);

        let was_locked = match existing {
            Some(stored) => {
                let was_locked = stored.locked;
                entry.id = stored.id;
                *stored = entry.clone();
                was_locked
            }
            None => {
                entry.id = Some(self.snapshot.next_id.wash);
                self.snapshot.next_id.wash += 1;
                self.snapshot.wash_entries.push(entry.clone());
                false
            }
        };

        self.persist();
        WashUpsert { entry, was_locked }
    }

    /// Upsert a weekly action. With an id, replace the record with that id
    /// (returns None when no such record exists; the miss is not an error).
    /// Without an id, assign the next action id and stamp createdAt.
    pub fn upsert_weekly_action(&mut self, mut action: WeeklyAction) -> Option<WeeklyAction> {
        match action.id {
            Some(id) => {
                let stored = self
                    .snapshot
                    .weekly_actions
                    .iter_mut()
                    .find(|a| a.id == Some(id));
                match stored {
                    Some(stored) => {
                        *stored = action.clone();
                    }
                    None => {
                        debug!(id, "Update for unknown weekly action, ignoring");
                        return None;
                    }
                }
            }
            None => {
                action.id = Some(self.snapshot.next_id.action);
                self.snapshot.next_id.action += 1;
                action.created_at = Utc::now().to_rfc3339();
                self.snapshot.weekly_actions.push(action.clone());
            }
        }

        self.persist();
        Some(action)
    }

    /// All actions bucketed under (team, week_start)
    pub fn actions_for_week(&self, team: &str, week_start: &str) -> Vec<WeeklyAction> {
        self.snapshot
            .weekly_actions
            .iter()
            .filter(|a| a.team == team && a.week_start == week_start)
            .cloned()
            .collect()
    }

    /// Full dump of daily entries
    pub fn wash_entries(&self) -> Vec<DailyEntry> {
        self.snapshot.wash_entries.clone()
    }

    /// Full dump of weekly actions
    pub fn weekly_actions(&self) -> Vec<WeeklyAction> {
        self.snapshot.weekly_actions.clone()
    }
}
