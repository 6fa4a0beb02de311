//! Anomaly detector.
//!
//! Surfaces metric readings that left their usual range, with enough
//! context (observed vs expected) to judge whether to care.

use informar_core::table::{
    render_table_html, sort_rows, ColumnKind, SortState, TableColumn, TableRow,
};
use informar_core::{AnalyticsModule, Container, ResultsPayload, Severity};
use serde::Deserialize;

const ALGORITHM: &str = "For each campaign and tracked metric the backend \
maintains a rolling mean and standard deviation over the baseline window. \
A reading whose z-score exceeds the alert threshold is emitted as an \
anomaly; severity scales with the z-score and the money at stake. Readings \
during the campaign's first days are suppressed while the baseline forms.";

const METRICS: &str = "Per anomaly: campaign, metric, observed value, \
expected value from the baseline, severity band, and detection time.";

#[derive(Debug, Clone, Deserialize)]
pub struct Anomaly {
    #[serde(default)]
    pub campaign: String,
    #[serde(default)]
    pub metric: String,
    #[serde(default)]
    pub observed: Option<f64>,
    #[serde(default)]
    pub expected: Option<f64>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub detected_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AnomalyData {
    #[serde(default)]
    anomalies: Vec<Anomaly>,
}

/// Module descriptor for the anomaly detector.
pub struct AnomalyDetector;

fn columns() -> Vec<TableColumn> {
    vec![
        TableColumn::new("campaign", "Campaign").sortable(),
        TableColumn::new("metric", "Metric").sortable(),
        TableColumn::new("observed", "Observed").kind(ColumnKind::Number).sortable(),
        TableColumn::new("expected", "Expected").kind(ColumnKind::Number).sortable(),
        TableColumn::new("severity", "Severity").sortable(),
        TableColumn::new("detected", "Detected").kind(ColumnKind::Date).sortable(),
    ]
}

fn fmt_value(v: Option<f64>) -> String {
    match v {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => "N/A".to_string(),
    }
}

fn to_row(a: &Anomaly) -> TableRow {
    let campaign = if a.campaign.is_empty() { "N/A" } else { &a.campaign };
    let metric = if a.metric.is_empty() { "-" } else { &a.metric };
    TableRow::new()
        .display_cell("campaign", campaign)
        .display_cell("metric", metric)
        .display_cell("observed", fmt_value(a.observed))
        .display_cell("expected", fmt_value(a.expected))
        .display_cell("severity", a.severity.label())
        .cell(
            "detected",
            informar_core::table::CellValue::Date(
                a.detected_at.clone().unwrap_or_else(|| "-".into()),
            ),
        )
}

impl AnalyticsModule for AnomalyDetector {
    fn id(&self) -> &str {
        "anomaly_detector"
    }

    fn label(&self) -> &str {
        "Anomaly Detector"
    }

    fn category(&self) -> &str {
        "monitoring"
    }

    fn translations(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("anomaly_count", "Anomalies"),
            ("critical_count", "Critical anomalies"),
        ]
    }

    fn param_translations(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("baseline_days", "Baseline window (days)"),
            ("z_threshold", "Z-score threshold"),
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
        let anomalies = results
            .typed_data::<AnomalyData>()
            .map(|d| d.anomalies)
            .unwrap_or_default();
        if anomalies.is_empty() {
            out.placeholder("No anomalies in the baseline window");
            return;
        }

        let columns = columns();
        let mut rows: Vec<TableRow> = anomalies.iter().map(to_row).collect();
        if let Some(column) = state.column.as_deref() {
            if let Some(col) = columns.iter().find(|c| c.key == column) {
                sort_rows(&mut rows, column, col.kind, state.direction);
            }
        }
        out.replace(render_table_html(&columns, &rows, state));
    }
}
