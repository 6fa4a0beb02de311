//! User preferences: theme, favorite modules, one-time confirmations.
//!
//! Preferences live outside the cache namespace so a cache clear never
//! resets them.

use informar_core::{CoreError, ScopedStorage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

/// Display theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

const THEME_KEY: &str = "theme";
const FAVORITES_KEY: &str = "favorites";
const CONFIRMED_KEY: &str = "confirmed";

/// Persisted user preferences.
pub struct PreferenceStore {
    storage: ScopedStorage,
}

impl PreferenceStore {
    /// Create a store over its own storage namespace.
    #[must_use]
    pub fn new(storage: ScopedStorage) -> Self {
        Self { storage }
    }

    /// The saved theme, defaulting to light.
    #[must_use]
    pub fn theme(&self) -> Theme {
        match self.storage.get_json::<Theme>(THEME_KEY) {
            Ok(Some(theme)) => theme,
            Ok(None) => Theme::default(),
            Err(e) => {
                warn!(error = %e, "saved theme unreadable, using default");
                Theme::default()
            }
        }
    }

    /// Persist a theme choice.
    pub fn set_theme(&self, theme: Theme) -> Result<(), CoreError> {
        self.storage.set_json(THEME_KEY, &theme)
    }

    /// Flip the theme and return the new value.
    pub fn toggle_theme(&self) -> Result<Theme, CoreError> {
        let next = self.theme().toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    fn load_set(&self, key: &str) -> BTreeSet<String> {
        match self.storage.get_json::<BTreeSet<String>>(key) {
            Ok(Some(set)) => set,
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                warn!(key, error = %e, "preference set unreadable, resetting");
                BTreeSet::new()
            }
        }
    }

    /// Module ids pinned to the top of the modules page.
    #[must_use]
    pub fn favorites(&self) -> BTreeSet<String> {
        self.load_set(FAVORITES_KEY)
    }

    /// Whether a module is a favorite.
    #[must_use]
    pub fn is_favorite(&self, module_id: &str) -> bool {
        self.favorites().contains(module_id)
    }

    /// Toggle favorite status, returning the new state.
    pub fn toggle_favorite(&self, module_id: &str) -> Result<bool, CoreError> {
        let mut favorites = self.favorites();
        let now_favorite = favorites.insert(module_id.to_string());
        if !now_favorite {
            favorites.remove(module_id);
        }
        self.storage.set_json(FAVORITES_KEY, &favorites)?;
        Ok(now_favorite)
    }

    /// Whether a destructive action (bulk refresh, cache clear) has already
    /// been confirmed once, so the dialog is skipped next time.
    #[must_use]
    pub fn is_confirmed(&self, action: &str) -> bool {
        self.load_set(CONFIRMED_KEY).contains(action)
    }

    /// Remember that an action was confirmed.
    pub fn confirm(&self, action: &str) -> Result<(), CoreError> {
        let mut confirmed = self.load_set(CONFIRMED_KEY);
        if confirmed.insert(action.to_string()) {
            self.storage.set_json(CONFIRMED_KEY, &confirmed)?;
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

    fn store() -> PreferenceStore {
        PreferenceStore::new(ScopedStorage::new(Arc::new(Storage::new()), "prefs"))
    }

    #[test]
    fn test_theme_defaults_to_light() {
        assert_eq!(store().theme(), Theme::Light);
    }

    #[test]
    fn test_toggle_theme_round_trip() {
        let store = store();
        assert_eq!(store.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(store.theme(), Theme::Dark);
        assert_eq!(store.toggle_theme().unwrap(), Theme::Light);
    }

    #[test]
    fn test_toggle_favorite() {
        let store = store();
        assert!(store.toggle_favorite("roi_forecast").unwrap());
        assert!(store.is_favorite("roi_forecast"));
        assert!(!store.toggle_favorite("roi_forecast").unwrap());
        assert!(!store.is_favorite("roi_forecast"));
    }

    #[test]
    fn test_confirmations_persist() {
        let store = store();
        assert!(!store.is_confirmed("bulk_refresh"));
        store.confirm("bulk_refresh").unwrap();
        assert!(store.is_confirmed("bulk_refresh"));
        assert!(!store.is_confirmed("clear_cache"));
    }
}
