//! Filtering the module catalog on the modules page.

use serde::{Deserialize, Serialize};

/// Run status of a module as reported by the catalog endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleStatus {
    /// Never run, no stored results.
    Pending,
    /// Currently computing.
    Running,
    /// Results available.
    Completed,
    /// Last run failed.
    Error,
}

/// One entry in the module catalog, combining registry metadata with the
/// backend's run status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleEntry {
    pub id: String,
    pub label: String,
    pub category: String,
    pub status: ModuleStatus,
    pub favorite: bool,
}

/// Current filter selections. All criteria are conjunctive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleFilter {
    /// Case-insensitive substring match over id and label.
    pub search: String,
    /// Exact category, or `None` for all.
    pub category: Option<String>,
    /// Exact status, or `None` for all.
    pub status: Option<ModuleStatus>,
}

impl ModuleFilter {
    /// Whether one entry passes the filter.
    #[must_use]
    pub fn matches(&self, entry: &ModuleEntry) -> bool {
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            if !entry.id.to_lowercase().contains(&needle)
                && !entry.label.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if entry.category != *category {
                return false;
            }
        }
        if let Some(status) = self.status {
            if entry.status != status {
                return false;
            }
        }
        true
    }

    /// Apply the filter, favorites first, then alphabetical by label.
    #[must_use]
    pub fn apply<'a>(&self, entries: &'a [ModuleEntry]) -> Vec<&'a ModuleEntry> {
        let mut matched: Vec<&ModuleEntry> =
            entries.iter().filter(|e| self.matches(e)).collect();
        matched.sort_by(|a, b| {
            b.favorite
                .cmp(&a.favorite)
                .then_with(|| a.label.cmp(&b.label))
        });
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(id: &str, label: &str, category: &str, status: ModuleStatus) -> ModuleEntry {
        ModuleEntry {
            id: id.to_string(),
            label: label.to_string(),
            category: category.to_string(),
            status,
            favorite: false,
        }
    }

    fn catalog() -> Vec<ModuleEntry> {
        vec![
            entry(
                "zombie_campaign_detector",
                "Zombie Campaigns",
                "diagnostics",
                ModuleStatus::Completed,
            ),
            entry(
                "roi_forecast",
                "ROI Forecast",
                "forecasting",
                ModuleStatus::Pending,
            ),
            entry(
                "anomaly_detector",
                "Anomaly Detection",
                "diagnostics",
                ModuleStatus::Error,
            ),
        ]
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let catalog = catalog();
        assert_eq!(ModuleFilter::default().apply(&catalog).len(), 3);
    }

    #[test]
    fn test_search_is_case_insensitive_over_id_and_label() {
        let catalog = catalog();
        let filter = ModuleFilter {
            search: "ZOMBIE".to_string(),
            ..ModuleFilter::default()
        };
        let matched = filter.apply(&catalog);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "zombie_campaign_detector");

        let by_label = ModuleFilter {
            search: "forecast".to_string(),
            ..ModuleFilter::default()
        };
        assert_eq!(by_label.apply(&catalog).len(), 1);
    }

    #[test]
    fn test_criteria_are_conjunctive() {
        let catalog = catalog();
        let filter = ModuleFilter {
            search: "detect".to_string(),
            category: Some("diagnostics".to_string()),
            status: Some(ModuleStatus::Error),
        };
        let matched = filter.apply(&catalog);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "anomaly_detector");
    }

    #[test]
    fn test_favorites_sort_first() {
        let mut catalog = catalog();
        catalog[1].favorite = true;
        let matched = ModuleFilter::default().apply(&catalog);
        assert_eq!(matched[0].id, "roi_forecast");
        // the rest stay alphabetical by label
        assert_eq!(matched[1].id, "anomaly_detector");
        assert_eq!(matched[2].id, "zombie_campaign_detector");
    }

    proptest! {
        #[test]
        fn prop_search_matching_ignores_case(search in "[a-zA-Z ]{0,12}") {
            let lower = ModuleFilter {
                search: search.to_lowercase(),
                ..ModuleFilter::default()
            };
            let upper = ModuleFilter {
                search: search.to_uppercase(),
                ..ModuleFilter::default()
            };
            for entry in &catalog() {
                prop_assert_eq!(lower.matches(entry), upper.matches(entry));
            }
        }

        #[test]
        fn prop_apply_yields_an_ordered_matching_subset(search in "[a-z_]{0,6}") {
            let filter = ModuleFilter {
                search,
                ..ModuleFilter::default()
            };
            let catalog = catalog();
            let matched = filter.apply(&catalog);
            prop_assert!(matched.len() <= catalog.len());
            for entry in &matched {
                prop_assert!(filter.matches(entry));
            }
            // no favorites in the fixture, so order is alphabetical by label
            for pair in matched.windows(2) {
                prop_assert!(pair[0].label <= pair[1].label);
            }
        }
    }
}
