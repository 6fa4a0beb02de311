//! The analytics module contract.
//!
//! Each of the ~25 server-side analyses is represented client-side by one
//! implementation of [`AnalyticsModule`]: metadata (labels, parameter
//! names, a prose description of the algorithm) plus a rendering capability
//! over that module's own result shape. The contract is deliberately
//! minimal (one required entry point taking opaque results and an output
//! target) because the result shapes differ too much (cluster lists, flat
//! campaign lists, matrix cells, forecast series) for a shared generic
//! renderer to pay off.

use crate::container::Container;
use crate::results::ResultsPayload;

/// One pluggable campaign-analysis module.
///
/// # Contract
///
/// `render_table` must:
/// - handle absent or empty `results.data` by writing a user-visible
///   placeholder, never panicking;
/// - fully replace the container's previous contents, so a repeated render
///   with identical input yields byte-identical output;
/// - treat missing numeric fields as 0 and missing strings as placeholders.
///
/// `render_charts` and `render_stats` follow the same contract
/// independently for modules with separate chart or summary regions; the
/// `has_*` probes tell the page controller whether those regions exist.
pub trait AnalyticsModule: Send + Sync {
    /// Stable module identifier, as embedded in API results and URLs.
    fn id(&self) -> &str;

    /// Human-readable module name.
    fn label(&self) -> &str;

    /// Grouping category shown in the modules list.
    fn category(&self) -> &str {
        "general"
    }

    /// Result-field-key to display-label mapping.
    fn translations(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }

    /// Configuration-parameter-key to display-label mapping.
    fn param_translations(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }

    /// Prose description of the server-side computation.
    fn algorithm(&self) -> &str;

    /// Prose description of the output fields.
    fn metrics(&self) -> &str;

    /// Render the tabular result view into the container.
    fn render_table(&self, results: &ResultsPayload, out: &mut Container);

    /// Re-render the table under an explicit sort state.
    ///
    /// The controller calls this after a sort-header click; the whole
    /// container is replaced, which is how handler re-binding stays correct.
    /// Modules without sortable tables ignore the state.
    fn render_table_sorted(
        &self,
        results: &ResultsPayload,
        out: &mut Container,
        _state: &crate::table::SortState,
    ) {
        self.render_table(results, out);
    }

    /// Whether the module has a separate chart region.
    fn has_charts(&self) -> bool {
        false
    }

    /// Render the chart region.
    fn render_charts(&self, _results: &ResultsPayload, _out: &mut Container) {}

    /// Whether the module has a separate summary-stats region.
    fn has_stats(&self) -> bool {
        false
    }

    /// Render the summary-stats region.
    fn render_stats(&self, _results: &ResultsPayload, _out: &mut Container) {}
}

/// Display label for a result field key on a trait object.
#[must_use]
pub fn translate<'a>(module: &dyn AnalyticsModule, key: &'a str) -> &'a str {
    module
        .translations()
        .iter()
        .find(|(k, _)| *k == key)
        .map_or(key, |(_, label)| label)
}

/// Display label for a parameter key on a trait object.
#[must_use]
pub fn translate_param<'a>(module: &dyn AnalyticsModule, key: &'a str) -> &'a str {
    module
        .param_translations()
        .iter()
        .find(|(k, _)| *k == key)
        .map_or(key, |(_, label)| label)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture;

    impl AnalyticsModule for Fixture {
        fn id(&self) -> &str {
            "fixture"
        }
        fn label(&self) -> &str {
            "Fixture"
        }
        fn translations(&self) -> &'static [(&'static str, &'static str)] {
            &[("roi", "ROI %"), ("cost", "Cost")]
        }
        fn algorithm(&self) -> &str {
            "none"
        }
        fn metrics(&self) -> &str {
            "none"
        }
        fn render_table(&self, _results: &ResultsPayload, out: &mut Container) {
            out.placeholder("nothing here");
        }
    }

    #[test]
    fn test_translate_known_key() {
        assert_eq!(translate(&Fixture, "roi"), "ROI %");
    }

    #[test]
    fn test_translate_unknown_key_falls_back() {
        assert_eq!(translate(&Fixture, "ctr"), "ctr");
    }

    #[test]
    fn test_default_capabilities() {
        let m = Fixture;
        assert!(!m.has_charts());
        assert!(!m.has_stats());
        let mut out = Container::new();
        m.render_charts(&ResultsPayload::default(), &mut out);
        assert!(out.is_empty());
    }
}
