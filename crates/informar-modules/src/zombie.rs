//! Zombie campaign detector.
//!
//! Flags campaigns that keep spending without producing revenue movement:
//! "zombies" that survived past their useful life on inertia alone.

use informar_core::format::{conversion_rate, format_count, format_currency, format_percent};
use informar_core::table::{
    render_table_html, sort_rows, ColumnKind, SortState, TableColumn, TableRow,
};
use informar_core::{AnalyticsModule, Container, ResultsPayload};
use serde::Deserialize;

const ALGORITHM: &str = "For every active campaign the backend compares \
spend against revenue over the detection window. A campaign is flagged as a \
zombie when its spend exceeds the configured floor while ROI stays below \
the zombie threshold and click volume shows no upward trend (least-squares \
slope over the window at or below zero). Flagged campaigns are ranked by \
accumulated loss.";

const METRICS: &str = "Per flagged campaign: name, ROI over the window, \
total cost, total revenue, click and lead counts, and conversion rate. ROI \
is (revenue - cost) / cost x 100; conversion rate is leads / clicks x 100.";

/// One flagged campaign as reported in `results.data.campaigns`.
#[derive(Debug, Clone, Deserialize)]
pub struct ZombieCampaign {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub roi: Option<f64>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub leads: u64,
}

#[derive(Debug, Default, Deserialize)]
struct ZombieData {
    #[serde(default)]
    campaigns: Vec<ZombieCampaign>,
}

/// Module descriptor for the zombie campaign detector.
pub struct ZombieCampaignDetector;

fn columns() -> Vec<TableColumn> {
    vec![
        TableColumn::new("name", "Campaign").sortable(),
        TableColumn::new("roi", "ROI").kind(ColumnKind::Number).sortable(),
        TableColumn::new("cost", "Cost").kind(ColumnKind::Number).sortable(),
        TableColumn::new("revenue", "Revenue").kind(ColumnKind::Number).sortable(),
        TableColumn::new("clicks", "Clicks").kind(ColumnKind::Number).sortable(),
        TableColumn::new("leads", "Leads").kind(ColumnKind::Number).sortable(),
        TableColumn::new("cr", "CR").kind(ColumnKind::Number),
    ]
}

fn to_row(c: &ZombieCampaign) -> TableRow {
    let name = if c.name.is_empty() { "N/A" } else { &c.name };
    TableRow::new()
        .display_cell("name", name)
        .display_cell("roi", format_percent(c.roi))
        .display_cell("cost", format_currency(c.cost))
        .display_cell("revenue", format_currency(c.revenue))
        .display_cell("clicks", format_count(Some(c.clicks)))
        .display_cell("leads", format_count(Some(c.leads)))
        .display_cell("cr", format_percent(conversion_rate(c.clicks, c.leads)))
}

impl AnalyticsModule for ZombieCampaignDetector {
    fn id(&self) -> &str {
        "zombie_campaign_detector"
    }

    fn label(&self) -> &str {
        "Zombie Campaign Detector"
    }

    fn category(&self) -> &str {
        "waste"
    }

    fn translations(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("zombie_count", "Zombie campaigns"),
            ("total_waste", "Accumulated loss"),
            ("avg_roi", "Average ROI"),
        ]
    }

    fn param_translations(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("window_days", "Detection window (days)"),
            ("min_spend", "Minimum spend"),
            ("roi_threshold", "Zombie ROI threshold"),
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
        let Some(data) = results.typed_data::<ZombieData>() else {
            out.placeholder("No zombie campaigns detected");
            return;
        };
        if data.campaigns.is_empty() {
            out.placeholder("No zombie campaigns detected");
            return;
        }

        let columns = columns();
        let mut rows: Vec<TableRow> = data.campaigns.iter().map(to_row).collect();
        if let Some(column) = state.column.as_deref() {
            if let Some(col) = columns.iter().find(|c| c.key == column) {
                sort_rows(&mut rows, column, col.kind, state.direction);
            }
        }
        out.replace(render_table_html(&columns, &rows, state));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use informar_core::table::SortDirection;
    use serde_json::json;

    fn sample() -> ResultsPayload {
        ResultsPayload::from_value(json!({
            "data": {"campaigns": [
                {"name": "A", "roi": 12.5, "cost": 10, "revenue": 11.25, "clicks": 100, "leads": 5},
                {"name": "B", "roi": -40.0, "cost": 50, "revenue": 30.0, "clicks": 400, "leads": 2}
            ]}
        }))
    }

    #[test]
    fn test_render_formats_metrics() {
        let mut out = Container::new();
        ZombieCampaignDetector.render_table(&sample(), &mut out);
        let html = out.html();
        assert!(html.contains("<td>A</td>"));
        assert!(html.contains("<td>12.5%</td>"));
        assert!(html.contains("<td>$10.00</td>"));
        assert!(html.contains("<td>$11.25</td>"));
        assert!(html.contains("<td>5.0%</td>")); // CR: 5 leads / 100 clicks
    }

    #[test]
    fn test_render_no_data_placeholder() {
        let mut out = Container::new();
        ZombieCampaignDetector.render_table(&ResultsPayload::default(), &mut out);
        assert!(out.html().contains("No zombie campaigns detected"));
    }

    #[test]
    fn test_render_empty_campaign_list() {
        let results = ResultsPayload::from_value(json!({"data": {"campaigns": []}}));
        let mut out = Container::new();
        ZombieCampaignDetector.render_table(&results, &mut out);
        assert!(out.html().contains("no-data"));
    }

    #[test]
    fn test_missing_fields_become_placeholders() {
        let results = ResultsPayload::from_value(json!({"data": {"campaigns": [{}]}}));
        let mut out = Container::new();
        ZombieCampaignDetector.render_table(&results, &mut out);
        let html = out.html();
        assert!(html.contains("<td>N/A</td>"));
        assert!(!html.contains("panic"));
    }

    #[test]
    fn test_sorted_render_orders_by_cost_desc() {
        let state = SortState {
            column: Some("cost".to_string()),
            direction: SortDirection::Desc,
        };
        let mut out = Container::new();
        ZombieCampaignDetector.render_table_sorted(&sample(), &mut out, &state);
        let html = out.html();
        let pos_b = html.find("<td>B</td>").unwrap();
        let pos_a = html.find("<td>A</td>").unwrap();
        assert!(pos_b < pos_a, "B ($50.00) should sort before A ($10.00)");
    }

    #[test]
    fn test_render_idempotent() {
        let results = sample();
        let mut first = Container::new();
        let mut second = Container::new();
        ZombieCampaignDetector.render_table(&results, &mut first);
        ZombieCampaignDetector.render_table(&results, &mut second);
        assert_eq!(first.html(), second.html());
    }
}
