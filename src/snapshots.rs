use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use tokio::sync::{broadcast, RwLock};

use crate::config::Config;
use crate::dto::{StatsChangedEvent, StatsView};
use crate::error::{AppError, AppResult};
use crate::models::entry::Entry;
use crate::models::mood::MoodDefinition;
use crate::services::day_aggregator::group_by_utc_day;
use crate::services::trends::{build_stats, StatsOptions};
use crate::services::vocabulary::{Vocabulary, VocabularyError};

/// Latest inputs delivered for one user. Derived views are never cached
/// here; every read recomputes from these.
#[derive(Debug, Clone, Default)]
pub struct UserSnapshot {
    pub revision: u64,
    pub entries: Arc<Vec<Entry>>,
    /// `None` = user never configured moods, defaults apply
    pub moods: Option<Arc<Vec<MoodDefinition>>>,
}

impl UserSnapshot {
    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::effective(self.moods.as_deref().map(Vec::as_slice))
    }

    pub fn uses_default_moods(&self) -> bool {
        self.moods.as_ref().map_or(true, |m| m.is_empty())
    }
}

/// In-memory holder of per-user snapshots (single-instance deployments).
///
/// Every replacement bumps the user's revision and pushes a freshly
/// recomputed stats view to live subscribers; clients drop anything older
/// than the newest revision they have seen.
#[derive(Clone)]
pub struct SnapshotHub {
    users: Arc<RwLock<HashMap<String, UserSnapshot>>>,
    tx: broadcast::Sender<String>,
    max_entries: usize,
    stats_defaults: StatsDefaults,
}

#[derive(Debug, Clone, Copy)]
struct StatsDefaults {
    window_days: usize,
    streak_scan_limit_days: u32,
}

impl SnapshotHub {
    pub fn new(config: &Config) -> Self {
        let (tx, _) = broadcast::channel(config.snapshot_channel_capacity);
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            tx,
            max_entries: config.max_entries_per_snapshot,
            stats_defaults: StatsDefaults {
                window_days: config.trend_window_days,
                streak_scan_limit_days: config.streak_scan_limit_days,
            },
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Unknown users read as an empty snapshot at revision 0.
    pub async fn current(&self, user_id: &str) -> UserSnapshot {
        self.users
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn replace_entries(
        &self,
        user_id: &str,
        entries: Vec<Entry>,
    ) -> AppResult<UserSnapshot> {
        if entries.len() > self.max_entries {
            return Err(AppError::Validation(format!(
                "Snapshot has {} entries, limit is {}",
                entries.len(),
                self.max_entries
            )));
        }

        let unbucketed = group_by_utc_day(&entries).unbucketed();
        let snapshot = {
            let mut users = self.users.write().await;
            let slot = users.entry(user_id.to_string()).or_default();
            slot.revision += 1;
            slot.entries = Arc::new(entries);
            slot.clone()
        };

        tracing::info!(
            user_id = %user_id,
            revision = snapshot.revision,
            entries = snapshot.entries.len(),
            unbucketed,
            "Entry snapshot replaced"
        );
        self.publish(user_id, &snapshot);
        Ok(snapshot)
    }

    /// Replaces the whole vocabulary. An empty list restores the defaults.
    pub async fn replace_moods(
        &self,
        user_id: &str,
        moods: Vec<MoodDefinition>,
    ) -> AppResult<UserSnapshot> {
        Vocabulary::validate_override(&moods)?;
        let snapshot = {
            let mut users = self.users.write().await;
            let slot = users.entry(user_id.to_string()).or_default();
            slot.revision += 1;
            slot.moods = (!moods.is_empty()).then(|| Arc::new(moods));
            slot.clone()
        };

        tracing::info!(
            user_id = %user_id,
            revision = snapshot.revision,
            moods = snapshot.vocabulary().definitions().len(),
            "Mood vocabulary replaced"
        );
        self.publish(user_id, &snapshot);
        Ok(snapshot)
    }

    /// Applies one edit to the user's effective vocabulary and stores the
    /// result as their override. Nothing changes when the edit fails.
    pub async fn edit_moods<F, R>(&self, user_id: &str, edit: F) -> AppResult<(UserSnapshot, R)>
    where
        F: FnOnce(&mut Vocabulary) -> Result<R, VocabularyError>,
    {
        let (snapshot, out) = {
            let mut users = self.users.write().await;
            let mut vocabulary = users
                .get(user_id)
                .map(UserSnapshot::vocabulary)
                .unwrap_or_default();
            let out = edit(&mut vocabulary)?;
            let slot = users.entry(user_id.to_string()).or_default();
            slot.revision += 1;
            slot.moods = Some(Arc::new(vocabulary.into_definitions()));
            (slot.clone(), out)
        };

        tracing::info!(
            user_id = %user_id,
            revision = snapshot.revision,
            "Mood vocabulary edited"
        );
        self.publish(user_id, &snapshot);
        Ok((snapshot, out))
    }

    pub fn stats_options(&self, today: chrono::NaiveDate, window_days: usize) -> StatsOptions {
        StatsOptions {
            today,
            window_days,
            streak_scan_limit_days: self.stats_defaults.streak_scan_limit_days,
        }
    }

    pub fn default_window_days(&self) -> usize {
        self.stats_defaults.window_days
    }

    fn publish(&self, user_id: &str, snapshot: &UserSnapshot) {
        let options = self.stats_options(Utc::now().date_naive(), self.stats_defaults.window_days);
        let view = StatsView::from(build_stats(
            &snapshot.entries,
            &snapshot.vocabulary(),
            options,
        ));
        let event = StatsChangedEvent {
            kind: "stats_changed",
            user_id,
            revision: snapshot.revision,
            stats: &view,
        };
        match serde_json::to_string(&event) {
            // No subscribers is not an error
            Ok(msg) => {
                let _ = self.tx.send(msg);
            }
            Err(e) => tracing::error!(error = %e, user_id = %user_id, "Failed to encode stats event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::parse_timestamp;
    use crate::models::mood::{MoodPatch, MoodScore};

    fn hub() -> SnapshotHub {
        SnapshotHub::new(&Config::default())
    }

    fn today_entry(id: &str, mood: &str) -> Entry {
        let ts = Utc::now().format("%Y-%m-%dT12:00:00Z").to_string();
        Entry::new(id, parse_timestamp(&ts)).with_mood(mood)
    }

    #[tokio::test]
    async fn test_unknown_user_is_empty() {
        let snapshot = hub().current("nobody").await;
        assert_eq!(snapshot.revision, 0);
        assert!(snapshot.entries.is_empty());
        assert!(snapshot.uses_default_moods());
    }

    #[tokio::test]
    async fn test_replace_bumps_revision_per_user() {
        let hub = hub();
        hub.replace_entries("u1", vec![today_entry("a", "😄")])
            .await
            .unwrap();
        let second = hub
            .replace_entries("u1", vec![today_entry("b", "😢")])
            .await
            .unwrap();
        assert_eq!(second.revision, 2);
        assert_eq!(second.entries[0].id, "b");
        assert_eq!(hub.current("u2").await.revision, 0);
    }

    #[tokio::test]
    async fn test_replace_rejects_oversized_snapshot() {
        let config = Config {
            max_entries_per_snapshot: 1,
            ..Config::default()
        };
        let hub = SnapshotHub::new(&config);
        let result = hub
            .replace_entries("u1", vec![today_entry("a", "😄"), today_entry("b", "😄")])
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(hub.current("u1").await.revision, 0);
    }

    #[tokio::test]
    async fn test_replace_publishes_stats_event() {
        let hub = hub();
        let mut rx = hub.subscribe();
        hub.replace_entries("u1", vec![today_entry("a", "😄")])
            .await
            .unwrap();

        let msg: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(msg["type"], "stats_changed");
        assert_eq!(msg["user_id"], "u1");
        assert_eq!(msg["revision"], 1);
        assert_eq!(msg["stats"]["status"], "ready");
        assert_eq!(msg["stats"]["insights"]["streak_length_days"], 1);
    }

    #[tokio::test]
    async fn test_empty_mood_list_restores_defaults() {
        let hub = hub();
        let custom = vec![MoodDefinition::new("🌞", MoodScore::new(5).unwrap(), "Sunny")];
        let snapshot = hub.replace_moods("u1", custom).await.unwrap();
        assert!(!snapshot.uses_default_moods());
        assert_eq!(snapshot.vocabulary().definitions().len(), 1);

        let snapshot = hub.replace_moods("u1", Vec::new()).await.unwrap();
        assert!(snapshot.uses_default_moods());
        assert_eq!(snapshot.vocabulary(), Vocabulary::default());
    }

    #[tokio::test]
    async fn test_failed_edit_leaves_snapshot_untouched() {
        let hub = hub();
        let result = hub
            .edit_moods("u1", |v| v.update("🦄", &MoodPatch::default()).map(|d| d.clone()))
            .await;
        assert!(matches!(
            result,
            Err(AppError::Vocabulary(VocabularyError::UnknownSymbol(_)))
        ));
        assert_eq!(hub.current("u1").await.revision, 0);
        assert!(hub.users.read().await.is_empty());

        let (snapshot, removed) = hub.edit_moods("u1", |v| v.remove("😡")).await.unwrap();
        assert_eq!(removed.symbol, "😡");
        assert_eq!(snapshot.vocabulary().definitions().len(), 4);
    }
}
