//! Offer lifecycle tracker.
//!
//! Places every offer on a launch → growth → plateau → decline curve and
//! surfaces offers whose revenue trend says the stage label is stale.

use informar_core::chart::{ChartSpec, ChartType, Dataset};
use informar_core::format::{format_currency, format_percent};
use informar_core::table::{
    render_table_html, sort_rows, ColumnKind, SortState, TableColumn, TableRow,
};
use informar_core::{AnalyticsModule, Container, ResultsPayload};
use serde::Deserialize;

const ALGORITHM: &str = "Each offer's daily revenue over the lookback \
window is smoothed and segmented. The slope of the most recent segment \
assigns a lifecycle stage: launch (short history, rising), growth \
(sustained positive slope), plateau (slope near zero), decline (sustained \
negative slope). An offer whose stage regressed since the previous run is \
marked as transitioning.";

const METRICS: &str = "Per offer: current lifecycle stage, days since \
first traffic, revenue over the window, week-over-week revenue change, and \
the smoothed revenue series used for the trend chart.";

#[derive(Debug, Clone, Deserialize)]
pub struct Offer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub age_days: u64,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub wow_change: Option<f64>,
    #[serde(default)]
    pub revenue_series: Vec<f64>,
    #[serde(default)]
    pub started_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LifecycleData {
    #[serde(default)]
    offers: Vec<Offer>,
}

/// Module descriptor for the offer lifecycle tracker.
pub struct OfferLifecycleTracker;

fn columns() -> Vec<TableColumn> {
    vec![
        TableColumn::new("name", "Offer").sortable(),
        TableColumn::new("stage", "Stage").sortable(),
        TableColumn::new("age", "Age (days)").kind(ColumnKind::Number).sortable(),
        TableColumn::new("revenue", "Revenue").kind(ColumnKind::Number).sortable(),
        TableColumn::new("wow", "WoW change").kind(ColumnKind::Number).sortable(),
        TableColumn::new("started", "Started").kind(ColumnKind::Date).sortable(),
    ]
}

fn to_row(o: &Offer) -> TableRow {
    let name = if o.name.is_empty() { "N/A" } else { &o.name };
    let stage = if o.stage.is_empty() { "-" } else { &o.stage };
    TableRow::new()
        .display_cell("name", name)
        .display_cell("stage", stage)
        .cell("age", o.age_days)
        .display_cell("revenue", format_currency(o.revenue))
        .display_cell("wow", format_percent(o.wow_change))
        .display_cell("started", o.started_at.clone().unwrap_or_else(|| "-".into()))
}

impl AnalyticsModule for OfferLifecycleTracker {
    fn id(&self) -> &str {
        "offer_lifecycle_tracker"
    }

    fn label(&self) -> &str {
        "Offer Lifecycle Tracker"
    }

    fn category(&self) -> &str {
        "lifecycle"
    }

    fn translations(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("offer_count", "Offers tracked"),
            ("declining", "Declining offers"),
            ("transitioning", "Stage transitions"),
        ]
    }

    fn param_translations(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("lookback_days", "Lookback window (days)"),
            ("smoothing", "Smoothing factor"),
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
        let offers = results
            .typed_data::<LifecycleData>()
            .map(|d| d.offers)
            .unwrap_or_default();
        if offers.is_empty() {
            out.placeholder("No offers in the lookback window");
            return;
        }

        let columns = columns();
        let mut rows: Vec<TableRow> = offers.iter().map(to_row).collect();
        if let Some(column) = state.column.as_deref() {
            if let Some(col) = columns.iter().find(|c| c.key == column) {
                sort_rows(&mut rows, column, col.kind, state.direction);
            }
        }
        out.replace(render_table_html(&columns, &rows, state));
    }

    fn has_charts(&self) -> bool {
        true
    }

    fn render_charts(&self, results: &ResultsPayload, out: &mut Container) {
        let offers = results
            .typed_data::<LifecycleData>()
            .map(|d| d.offers)
            .unwrap_or_default();
        let with_series: Vec<&Offer> = offers
            .iter()
            .filter(|o| !o.revenue_series.is_empty())
            .collect();
        if with_series.is_empty() {
            out.placeholder("No revenue series available");
            return;
        }

        let days = with_series
            .iter()
            .map(|o| o.revenue_series.len())
            .max()
            .unwrap_or(0);
        let mut spec = ChartSpec::new("offer-lifecycle-trend", ChartType::Line)
            .labels((1..=days).map(|d| format!("Day {d}")).collect());
        for offer in with_series {
            spec = spec.dataset(Dataset::new(offer.name.clone(), offer.revenue_series.clone()));
        }
        match serde_json::to_string(&spec) {
            Ok(config) => out.replace(format!(
                "<canvas id=\"offer-lifecycle-trend\"></canvas>\
                 <script type=\"application/json\" class=\"chart-config\">{config}</script>"
            )),
            Err(_) => out.placeholder("No revenue series available"),
        }
    }
}
