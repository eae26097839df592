//! Entry/Action upsert service
//!
//! Every accepted mutation follows the same sequence: upsert + persist
//! under the store's write lock, then broadcast the stored record to all
//! connected viewers (including the originator). A daily entry whose
//! `locked` flag transitions false→true additionally dispatches one
//! notification, fire-and-forget.

use tracing::warn;

use crate::api::ws::ServerEvent;
use crate::api::SharedState;
use crate::models::{DailyEntry, WeeklyAction};

/// Upsert a daily entry, fan it out, and edge-trigger the lock notification.
/// Returns the stored record with its assigned id.
pub async fn save_wash_entry(state: &SharedState, entry: DailyEntry) -> DailyEntry {
    let upsert = state.store.write().await.upsert_wash_entry(entry);

    state.hub.broadcast(ServerEvent::WashEntryUpdated {
        entry: upsert.entry.clone(),
    });

    // Only the false→true transition notifies; re-saving a locked entry
    // does not, and unlock-then-relock notifies exactly once more.
    if !upsert.was_locked && upsert.entry.locked {
        let state = state.clone();
        let entry = upsert.entry.clone();
        tokio::spawn(async move {
            if let Err(e) = state.notifier.send_daily(&entry).await {
                warn!(
                    team = %entry.team,
                    date = %entry.date,
                    error = %e,
                    "Daily lock notification failed"
                );
            }
        });
    }

    upsert.entry
}

/// Upsert a weekly action and fan it out. An update carrying an unknown id
/// is a silent no-op: nothing is stored and nothing is broadcast.
pub async fn save_weekly_action(
    state: &SharedState,
    action: WeeklyAction,
) -> Option<WeeklyAction> {
    let stored = state.store.write().await.upsert_weekly_action(action)?;

    state.hub.broadcast(ServerEvent::WeeklyActionUpdated {
        action: stored.clone(),
    });

    Some(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ws::FanoutHub;
    use crate::api::AppState;
    use crate::config::NotifyConfig;
    use crate::notify::Notifier;
    use crate::store::Store;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::sync::RwLock;

    fn test_state(dir: &TempDir) -> SharedState {
        Arc::new(AppState {
            store: RwLock::new(Store::load(dir.path().join("snapshot.json"))),
            hub: FanoutHub::new(),
            notifier: Notifier::new(&NotifyConfig { webhook_url: None }),
        })
    }

    #[tokio::test]
    async fn test_save_wash_entry_assigns_id_and_fans_out() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        let mut rx = state.hub.subscribe();

        let entry = DailyEntry {
            date: "2025-03-02".to_string(),
            team: "A".to_string(),
            author: "Jordan".to_string(),
            ..Default::default()
        };
        let stored = save_wash_entry(&state, entry).await;
        assert_eq!(stored.id, Some(1));

        match rx.recv().await.unwrap() {
            ServerEvent::WashEntryUpdated { entry } => {
                assert_eq!(entry.id, Some(1));
                assert_eq!(entry.author, "Jordan");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_action_update_broadcasts_nothing() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        let mut rx = state.hub.subscribe();

        let ghost = WeeklyAction {
            id: Some(42),
            action: "never stored".to_string(),
            week_start: "2025-03-02".to_string(),
            team: "A".to_string(),
            ..Default::default()
        };
        assert!(save_weekly_action(&state, ghost).await.is_none());
        assert!(rx.try_recv().is_err());
    }
}
