//! Read / hidden state for result alerts.
//!
//! The backend reissues the full alert list on every fetch, so read and
//! hidden state lives client-side, keyed by a stable alert id and persisted
//! through a [`ScopedStorage`] namespace that survives cache clears.

use informar_core::{CoreError, ScopedStorage, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

/// An alert as shown on the alerts page, with client-side state attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Alert {
    /// Stable id, assigned by the backend.
    pub id: String,
    /// Module that raised the alert.
    pub module_id: String,
    /// Human-readable message.
    pub message: String,
    #[serde(default)]
    pub severity: Severity,
    /// ISO-8601 creation timestamp.
    #[serde(default)]
    pub created_at: String,
}

const READ_KEY: &str = "read";
const HIDDEN_KEY: &str = "hidden";

/// Persists which alert ids have been read or hidden.
pub struct AlertStore {
    storage: ScopedStorage,
}

impl AlertStore {
    /// Create a store over its own storage namespace.
    #[must_use]
    pub fn new(storage: ScopedStorage) -> Self {
        Self { storage }
    }

    fn load_set(&self, key: &str) -> BTreeSet<String> {
        match self.storage.get_json::<BTreeSet<String>>(key) {
            Ok(Some(set)) => set,
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                warn!(key, error = %e, "alert state unreadable, resetting");
                let _ = self.storage.remove(key);
                BTreeSet::new()
            }
        }
    }

    fn store_set(&self, key: &str, set: &BTreeSet<String>) -> Result<(), CoreError> {
        self.storage.set_json(key, set)
    }

    /// Mark one alert as read. Idempotent.
    pub fn mark_read(&self, alert_id: &str) -> Result<(), CoreError> {
        let mut read = self.load_set(READ_KEY);
        if read.insert(alert_id.to_string()) {
            self.store_set(READ_KEY, &read)?;
        }
        Ok(())
    }

    /// Mark every listed alert as read in one write.
    pub fn mark_all_read<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), CoreError> {
        let mut read = self.load_set(READ_KEY);
        let before = read.len();
        read.extend(ids.into_iter().map(String::from));
        if read.len() != before {
            self.store_set(READ_KEY, &read)?;
        }
        Ok(())
    }

    /// Whether an alert has been read.
    #[must_use]
    pub fn is_read(&self, alert_id: &str) -> bool {
        self.load_set(READ_KEY).contains(alert_id)
    }

    /// Hide an alert from the list without deleting it server-side.
    pub fn hide(&self, alert_id: &str) -> Result<(), CoreError> {
        let mut hidden = self.load_set(HIDDEN_KEY);
        if hidden.insert(alert_id.to_string()) {
            self.store_set(HIDDEN_KEY, &hidden)?;
        }
        Ok(())
    }

    /// Whether an alert is hidden.
    #[must_use]
    pub fn is_hidden(&self, alert_id: &str) -> bool {
        self.load_set(HIDDEN_KEY).contains(alert_id)
    }

    /// Count of unread, non-hidden alerts for the navigation badge.
    #[must_use]
    pub fn unread_count(&self, alerts: &[Alert]) -> usize {
        let read = self.load_set(READ_KEY);
        let hidden = self.load_set(HIDDEN_KEY);
        alerts
            .iter()
            .filter(|a| !read.contains(&a.id) && !hidden.contains(&a.id))
            .count()
    }

    /// The alerts worth showing, hidden ones removed, sorted most urgent
    /// first and newest first within a severity.
    #[must_use]
    pub fn visible<'a>(&self, alerts: &'a [Alert]) -> Vec<&'a Alert> {
        let hidden = self.load_set(HIDDEN_KEY);
        let mut visible: Vec<&Alert> = alerts
            .iter()
            .filter(|a| !hidden.contains(&a.id))
            .collect();
        visible.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        visible
    }

    /// Drop read/hidden markers for ids the backend no longer reports, so
    /// the sets do not grow without bound.
    pub fn prune(&self, live_ids: &BTreeSet<String>) -> Result<(), CoreError> {
        for key in [READ_KEY, HIDDEN_KEY] {
            let set = self.load_set(key);
            let kept: BTreeSet<String> = set.intersection(live_ids).cloned().collect();
            if kept.len() != set.len() {
                self.store_set(key, &kept)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use informar_core::Storage;
    use std::sync::Arc;

    fn store() -> AlertStore {
        AlertStore::new(ScopedStorage::new(Arc::new(Storage::new()), "alerts"))
    }

    fn alert(id: &str, severity: Severity, created_at: &str) -> Alert {
        Alert {
            id: id.to_string(),
            module_id: "zombie_campaign_detector".to_string(),
            message: "campaign X is burning budget".to_string(),
            severity,
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn test_mark_read_is_idempotent() {
        let store = store();
        store.mark_read("a1").unwrap();
        store.mark_read("a1").unwrap();
        assert!(store.is_read("a1"));
        assert!(!store.is_read("a2"));
    }

    #[test]
    fn test_unread_count_skips_read_and_hidden() {
        let store = store();
        let alerts = vec![
            alert("a1", Severity::High, "2026-08-01T00:00:00Z"),
            alert("a2", Severity::Low, "2026-08-02T00:00:00Z"),
            alert("a3", Severity::Medium, "2026-08-03T00:00:00Z"),
        ];
        assert_eq!(store.unread_count(&alerts), 3);
        store.mark_read("a1").unwrap();
        store.hide("a2").unwrap();
        assert_eq!(store.unread_count(&alerts), 1);
    }

    #[test]
    fn test_mark_all_read() {
        let store = store();
        let alerts = vec![
            alert("a1", Severity::Low, ""),
            alert("a2", Severity::Low, ""),
        ];
        store
            .mark_all_read(alerts.iter().map(|a| a.id.as_str()))
            .unwrap();
        assert_eq!(store.unread_count(&alerts), 0);
    }

    #[test]
    fn test_visible_sorts_urgent_first() {
        let store = store();
        let alerts = vec![
            alert("a1", Severity::Low, "2026-08-01T00:00:00Z"),
            alert("a2", Severity::Critical, "2026-08-02T00:00:00Z"),
            alert("a3", Severity::Critical, "2026-08-03T00:00:00Z"),
        ];
        let visible = store.visible(&alerts);
        let ids: Vec<&str> = visible.iter().map(|a| a.id.as_str()).collect();
        // critical before low, newest critical first
        assert_eq!(ids, vec!["a3", "a2", "a1"]);
    }

    #[test]
    fn test_hidden_alerts_stay_out_of_visible() {
        let store = store();
        let alerts = vec![
            alert("a1", Severity::High, ""),
            alert("a2", Severity::High, ""),
        ];
        store.hide("a1").unwrap();
        let visible = store.visible(&alerts);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "a2");
    }

    #[test]
    fn test_prune_drops_stale_ids() {
        let store = store();
        store.mark_read("gone").unwrap();
        store.mark_read("kept").unwrap();
        let live: BTreeSet<String> = ["kept".to_string()].into_iter().collect();
        store.prune(&live).unwrap();
        assert!(store.is_read("kept"));
        assert!(!store.is_read("gone"));
    }

    #[test]
    fn test_corrupt_state_resets_to_empty() {
        let storage = Arc::new(Storage::new());
        let scoped = ScopedStorage::new(Arc::clone(&storage), "alerts");
        scoped.set("read", "not json").unwrap();
        let store = AlertStore::new(scoped);
        assert!(!store.is_read("a1"));
        store.mark_read("a1").unwrap();
        assert!(store.is_read("a1"));
    }
}
