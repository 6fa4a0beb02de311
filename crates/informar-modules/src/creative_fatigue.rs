//! Creative fatigue.
//!
//! Tracks how fast each ad creative's click-through rate decays with
//! accumulated impressions, so creatives can be rotated before they burn
//! out an audience.

use informar_core::format::format_count;
use informar_core::table::{
    render_table_html, sort_rows, ColumnKind, SortState, TableColumn, TableRow,
};
use informar_core::{AnalyticsModule, Container, HtmlBuilder, ResultsPayload};
use serde::Deserialize;

const ALGORITHM: &str = "Per creative, daily click-through rate is \
regressed against cumulative impressions. The fatigue score (0-100) maps \
the decay rate of that fit: 0 means flat performance, 100 means the \
creative has effectively stopped earning clicks. Creatives above the \
rotation threshold are listed first.";

const METRICS: &str = "Per creative: impressions to date, current CTR, \
CTR change over the window, and the fatigue score. The stats region \
reports how many creatives crossed the rotation threshold.";

#[derive(Debug, Clone, Deserialize)]
pub struct Creative {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub ctr: Option<f64>,
    #[serde(default)]
    pub ctr_change: Option<f64>,
    #[serde(default)]
    pub fatigue_score: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct FatigueData {
    #[serde(default)]
    creatives: Vec<Creative>,
    #[serde(default)]
    rotation_threshold: Option<f64>,
}

/// Module descriptor for creative fatigue tracking.
pub struct CreativeFatigue;

fn columns() -> Vec<TableColumn> {
    vec![
        TableColumn::new("name", "Creative").sortable(),
        TableColumn::new("impressions", "Impressions").kind(ColumnKind::Number).sortable(),
        TableColumn::new("ctr", "CTR").kind(ColumnKind::Number).sortable(),
        TableColumn::new("change", "CTR change").kind(ColumnKind::Number).sortable(),
        TableColumn::new("fatigue", "Fatigue").kind(ColumnKind::Number).sortable(),
    ]
}

fn fmt_pct(v: Option<f64>) -> String {
    match v {
        Some(v) if v.is_finite() => format!("{v:.2}%"),
        _ => "N/A".to_string(),
    }
}

fn fmt_score(v: Option<f64>) -> String {
    match v {
        Some(v) if v.is_finite() => format!("{v:.0}"),
        _ => "-".to_string(),
    }
}

fn to_row(c: &Creative) -> TableRow {
    let name = if c.name.is_empty() { "N/A" } else { &c.name };
    TableRow::new()
        .display_cell("name", name)
        .display_cell("impressions", format_count(Some(c.impressions)))
        .display_cell("ctr", fmt_pct(c.ctr))
        .display_cell("change", fmt_pct(c.ctr_change))
        .display_cell("fatigue", fmt_score(c.fatigue_score))
}

impl AnalyticsModule for CreativeFatigue {
    fn id(&self) -> &str {
        "creative_fatigue"
    }

    fn label(&self) -> &str {
        "Creative Fatigue"
    }

    fn category(&self) -> &str {
        "lifecycle"
    }

    fn translations(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("fatigued_count", "Creatives to rotate"),
            ("avg_fatigue", "Average fatigue"),
        ]
    }

    fn param_translations(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("window_days", "Window (days)"),
            ("rotation_threshold", "Rotation threshold"),
        ]
    }

    fn algorithm(&self) -> &str {
        ALGORITHM
    }

    fn metrics(&self) -> &str {
        METRICS
    }

    fn render_table(&self, results: &ResultsPayload, out: &mut Container) {
        self.render_table_sorted(results, out, &SortState::default());
    }

    fn render_table_sorted(
        &self,
        results: &ResultsPayload,
        out: &mut Container,
        state: &SortState,
    ) {
        let creatives = results
            .typed_data::<FatigueData>()
            .map(|d| d.creatives)
            .unwrap_or_default();
        if creatives.is_empty() {
            out.placeholder("No creatives with enough impressions");
            return;
        }

        let columns = columns();
        let mut rows: Vec<TableRow> = creatives.iter().map(to_row).collect();
        if let Some(column) = state.column.as_deref() {
            if let Some(col) = columns.iter().find(|c| c.key == column) {
                sort_rows(&mut rows, column, col.kind, state.direction);
            }
        }
        out.replace(render_table_html(&columns, &rows, state));
    }

    fn has_stats(&self) -> bool {
        true
    }

    fn render_stats(&self, results: &ResultsPayload, out: &mut Container) {
        let Some(data) = results.typed_data::<FatigueData>() else {
            out.placeholder("No fatigue data");
            return;
        };
        let scores: Vec<f64> = data
            .creatives
            .iter()
            .filter_map(|c| c.fatigue_score)
            .filter(|s| s.is_finite())
            .collect();
        if scores.is_empty() {
            out.placeholder("No fatigue data");
            return;
        }

        let threshold = data.rotation_threshold.unwrap_or(70.0);
        let fatigued = scores.iter().filter(|s| **s >= threshold).count();
        let avg = scores.iter().sum::<f64>() / scores.len() as f64;

        let mut b = HtmlBuilder::new();
        b.raw("<div class=\"stat-cards\">")
            .element("div", "stat-card", &format!("Creatives to rotate: {fatigued}"))
            .element("div", "stat-card", &format!("Average fatigue: {avg:.0}"))
            .raw("</div>");
        b.commit(out);
    }
}
