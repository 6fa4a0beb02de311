//! ROI forecast.
//!
//! Projects portfolio ROI forward so budget decisions can react before a
//! decline shows up in the monthly totals.

use informar_core::chart::{ChartSpec, ChartType, Dataset};
use informar_core::format::format_percent;
use informar_core::table::{
    render_table_html, sort_rows, ColumnKind, SortState, TableColumn, TableRow,
};
use informar_core::{AnalyticsModule, Container, ResultsPayload};
use serde::Deserialize;

const ALGORITHM: &str = "Daily portfolio ROI is fit with a linear \
regression over the training window; the fit is extended forecast-horizon \
days forward with a widening confidence band derived from the residual \
standard error. Days inside the training window report both actual and \
fitted values; future days report only the projection.";

const METRICS: &str = "Per day: date, actual ROI where observed, projected \
ROI, and the lower/upper confidence bounds. The chart overlays actuals on \
the projection band.";

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPoint {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub actual: Option<f64>,
    #[serde(default)]
    pub predicted: Option<f64>,
    #[serde(default)]
    pub lower: Option<f64>,
    #[serde(default)]
    pub upper: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ForecastData {
    #[serde(default)]
    series: Vec<ForecastPoint>,
}

/// Module descriptor for the ROI forecast.
pub struct RoiForecast;

fn columns() -> Vec<TableColumn> {
    vec![
        TableColumn::new("date", "Date").kind(ColumnKind::Date).sortable(),
        TableColumn::new("actual", "Actual ROI").kind(ColumnKind::Number).sortable(),
        TableColumn::new("predicted", "Projected ROI").kind(ColumnKind::Number).sortable(),
        TableColumn::new("band", "Confidence band"),
    ]
}

fn to_row(p: &ForecastPoint) -> TableRow {
    let band = match (p.lower, p.upper) {
        (Some(lo), Some(hi)) => format!(
            "{} \u{2013} {}",
            format_percent(Some(lo)),
            format_percent(Some(hi))
        ),
        _ => "-".to_string(),
    };
    TableRow::new()
        .cell("date", informar_core::table::CellValue::Date(p.date.clone()))
        .display_cell("actual", format_percent(p.actual))
        .display_cell("predicted", format_percent(p.predicted))
        .display_cell("band", band)
}

impl AnalyticsModule for RoiForecast {
    fn id(&self) -> &str {
        "roi_forecast"
    }

    fn label(&self) -> &str {
        "ROI Forecast"
    }

    fn category(&self) -> &str {
        "forecasting"
    }

    fn translations(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("horizon_days", "Forecast horizon"),
            ("trend_slope", "Daily trend"),
        ]
    }

    fn param_translations(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("training_days", "Training window (days)"),
            ("horizon_days", "Forecast horizon (days)"),
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
        let series = results
            .typed_data::<ForecastData>()
            .map(|d| d.series)
            .unwrap_or_default();
        if series.is_empty() {
            out.placeholder("No forecast available");
            return;
        }

        let columns = columns();
        let mut rows: Vec<TableRow> = series.iter().map(to_row).collect();
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
        let series = results
            .typed_data::<ForecastData>()
            .map(|d| d.series)
            .unwrap_or_default();
        if series.is_empty() {
            out.placeholder("No forecast available");
            return;
        }

        let labels: Vec<String> = series.iter().map(|p| p.date.clone()).collect();
        let pick = |f: fn(&ForecastPoint) -> Option<f64>| -> Vec<f64> {
            series.iter().map(|p| f(p).unwrap_or(f64::NAN)).collect()
        };
        let spec = ChartSpec::new("roi-forecast", ChartType::Line)
            .labels(labels)
            .dataset(Dataset::new("Actual", pick(|p| p.actual)))
            .dataset(Dataset::new("Projected", pick(|p| p.predicted)))
            .dataset(Dataset::new("Lower", pick(|p| p.lower)))
            .dataset(Dataset::new("Upper", pick(|p| p.upper)));
        match serde_json::to_string(&spec) {
            Ok(config) => out.replace(format!(
                "<canvas id=\"roi-forecast\"></canvas>\
                 <script type=\"application/json\" class=\"chart-config\">{config}</script>"
            )),
            Err(_) => out.placeholder("No forecast available"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ResultsPayload {
        ResultsPayload::from_value(json!({
            "data": {"series": [
                {"date": "2026-08-27", "actual": 10.0, "predicted": 9.8,
                 "lower": 8.0, "upper": 11.5},
                {"date": "2026-08-28", "predicted": 9.5, "lower": 7.1, "upper": 12.0}
            ]}
        }))
    }

    #[test]
    fn test_table_mixes_actual_and_projection() {
        let mut out = Container::new();
        RoiForecast.render_table(&sample(), &mut out);
        let html = out.html();
        assert!(html.contains("<td>10.0%</td>"));
        // Future day has no actual.
        assert!(html.contains("<td>N/A</td>"));
        assert!(html.contains("7.1% \u{2013} 12.0%"));
    }

    #[test]
    fn test_chart_has_four_series() {
        let mut out = Container::new();
        RoiForecast.render_charts(&sample(), &mut out);
        let html = out.html();
        for series in ["Actual", "Projected", "Lower", "Upper"] {
            assert!(html.contains(series), "missing series {series}");
        }
    }

    #[test]
    fn test_empty_placeholder() {
        let mut table = Container::new();
        let mut chart = Container::new();
        RoiForecast.render_table(&ResultsPayload::default(), &mut table);
        RoiForecast.render_charts(&ResultsPayload::default(), &mut chart);
        assert!(table.html().contains("no-data"));
        assert!(chart.html().contains("no-data"));
    }
}
