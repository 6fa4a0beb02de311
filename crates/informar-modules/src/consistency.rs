//! Consistency scorer.
//!
//! Scores how dependable each campaign's day-to-day performance is, so
//! budget can favor steady earners over volatile ones.

use informar_core::format::format_percent;
use informar_core::table::{
    render_table_html, sort_rows, ColumnKind, SortState, TableColumn, TableRow,
};
use informar_core::{AnalyticsModule, Container, HtmlBuilder, ResultsPayload};
use serde::Deserialize;

const ALGORITHM: &str = "Daily ROI per campaign is collected over the \
scoring window and its coefficient of variation computed. The consistency \
score blends three components: stability (inverse of ROI variance), volume \
reliability (fraction of days with traffic above the activity floor), and \
margin persistence (fraction of days with positive margin). Components are \
normalized to 0-100 and combined with the configured weights.";

const METRICS: &str = "Per campaign: blended consistency score (0-100) and \
the three components: stability, volume reliability, margin persistence. \
The stats region reports the portfolio average and the count of campaigns \
below the attention threshold.";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreComponents {
    #[serde(default)]
    pub stability: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub margin: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoredCampaign {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub components: ScoreComponents,
}

#[derive(Debug, Default, Deserialize)]
struct ConsistencyData {
    #[serde(default)]
    campaigns: Vec<ScoredCampaign>,
    #[serde(default)]
    attention_threshold: Option<f64>,
}

/// Module descriptor for the consistency scorer.
pub struct ConsistencyScorer;

fn columns() -> Vec<TableColumn> {
    vec![
        TableColumn::new("name", "Campaign").sortable(),
        TableColumn::new("score", "Score").kind(ColumnKind::Number).sortable(),
        TableColumn::new("stability", "Stability").kind(ColumnKind::Number).sortable(),
        TableColumn::new("volume", "Volume").kind(ColumnKind::Number).sortable(),
        TableColumn::new("margin", "Margin").kind(ColumnKind::Number).sortable(),
    ]
}

fn fmt_score(v: Option<f64>) -> String {
    match v {
        Some(v) if v.is_finite() => format!("{v:.0}"),
        _ => "-".to_string(),
    }
}

fn to_row(c: &ScoredCampaign) -> TableRow {
    let name = if c.name.is_empty() { "N/A" } else { &c.name };
    TableRow::new()
        .display_cell("name", name)
        .display_cell("score", fmt_score(c.score))
        .display_cell("stability", fmt_score(c.components.stability))
        .display_cell("volume", fmt_score(c.components.volume))
        .display_cell("margin", fmt_score(c.components.margin))
}

impl AnalyticsModule for ConsistencyScorer {
    fn id(&self) -> &str {
        "consistency_scorer"
    }

    fn label(&self) -> &str {
        "Consistency Scorer"
    }

    fn category(&self) -> &str {
        "quality"
    }

    fn translations(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("avg_score", "Average score"),
            ("below_threshold", "Needing attention"),
        ]
    }

    fn param_translations(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("window_days", "Scoring window (days)"),
            ("weights", "Component weights"),
            ("attention_threshold", "Attention threshold"),
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
        let campaigns = results
            .typed_data::<ConsistencyData>()
            .map(|d| d.campaigns)
            .unwrap_or_default();
        if campaigns.is_empty() {
            out.placeholder("No campaigns scored in this window");
            return;
        }

        let columns = columns();
        let mut rows: Vec<TableRow> = campaigns.iter().map(to_row).collect();
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
        let Some(data) = results.typed_data::<ConsistencyData>() else {
            out.placeholder("No score data");
            return;
        };
        let scores: Vec<f64> = data
            .campaigns
            .iter()
            .filter_map(|c| c.score)
            .filter(|s| s.is_finite())
            .collect();
        if scores.is_empty() {
            out.placeholder("No score data");
            return;
        }

        let avg = scores.iter().sum::<f64>() / scores.len() as f64;
        let threshold = data.attention_threshold.unwrap_or(50.0);
        let below = scores.iter().filter(|s| **s < threshold).count();

        let mut b = HtmlBuilder::new();
        b.raw("<div class=\"stat-cards\">")
            .element("div", "stat-card", &format!("Average score: {avg:.0}"))
            .element(
                "div",
                "stat-card",
                &format!("Needing attention: {below}"),
            )
            .element(
                "div",
                "stat-card",
                &format!("Threshold: {}", format_percent(Some(threshold))),
            )
            .raw("</div>");
        b.commit(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ResultsPayload {
        ResultsPayload::from_value(json!({
            "data": {
                "campaigns": [
                    {"name": "Steady", "score": 88.0,
                     "components": {"stability": 90.0, "volume": 85.0, "margin": 89.0}},
                    {"name": "Choppy", "score": 31.0,
                     "components": {"stability": 20.0, "volume": 55.0, "margin": 18.0}}
                ],
                "attention_threshold": 40.0
            }
        }))
    }

    #[test]
    fn test_table_renders_components() {
        let mut out = Container::new();
        ConsistencyScorer.render_table(&sample(), &mut out);
        let html = out.html();
        assert!(html.contains("<td>Steady</td>"));
        assert!(html.contains("<td>88</td>"));
        assert!(html.contains("<td>20</td>"));
    }

    #[test]
    fn test_stats_average_and_threshold() {
        let mut out = Container::new();
        ConsistencyScorer.render_stats(&sample(), &mut out);
        let html = out.html();
        // (88 + 31) / 2 = 59.5 -> "60"
        assert!(html.contains("Average score: 60"));
        assert!(html.contains("Needing attention: 1"));
    }

    #[test]
    fn test_missing_components_dash() {
        let results = ResultsPayload::from_value(json!({
            "data": {"campaigns": [{"name": "Bare", "score": 10.0}]}
        }));
        let mut out = Container::new();
        ConsistencyScorer.render_table(&results, &mut out);
        assert!(out.html().contains("<td>-</td>"));
    }

    #[test]
    fn test_empty_placeholder_everywhere() {
        let mut table = Container::new();
        let mut stats = Container::new();
        ConsistencyScorer.render_table(&ResultsPayload::default(), &mut table);
        ConsistencyScorer.render_stats(&ResultsPayload::default(), &mut stats);
        assert!(table.html().contains("no-data"));
        assert!(stats.html().contains("no-data"));
    }
}
