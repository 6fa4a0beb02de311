//! Performance matrix.
//!
//! Cross-tabulates ROI by two dimensions (typically geo x device) so weak
//! combinations stand out as a colored grid rather than a long list.

use informar_core::container::escape_html;
use informar_core::format::format_percent;
use informar_core::severity::Severity;
use informar_core::{AnalyticsModule, Container, ResultsPayload};
use serde::Deserialize;
use std::fmt::Write as _;

const ALGORITHM: &str = "Traffic is bucketed by the two configured \
dimensions and ROI computed per cell. Cells with volume below the \
significance floor are left blank rather than shown as misleading \
extremes. Each remaining cell is banded by ROI into a severity color.";

const METRICS: &str = "A grid of ROI percentages keyed by row and column \
dimension values, each cell carrying the volume that produced it.";

#[derive(Debug, Clone, Deserialize)]
pub struct MatrixCell {
    #[serde(default)]
    pub row: String,
    #[serde(default)]
    pub col: String,
    #[serde(default)]
    pub roi: Option<f64>,
    #[serde(default)]
    pub clicks: u64,
}

#[derive(Debug, Default, Deserialize)]
struct MatrixData {
    #[serde(default)]
    rows: Vec<String>,
    #[serde(default)]
    cols: Vec<String>,
    #[serde(default)]
    cells: Vec<MatrixCell>,
}

/// Module descriptor for the performance matrix.
pub struct PerformanceMatrix;

fn cell_severity(roi: f64) -> Severity {
    if roi < -25.0 {
        Severity::Critical
    } else if roi < 0.0 {
        Severity::High
    } else if roi < 15.0 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

impl AnalyticsModule for PerformanceMatrix {
    fn id(&self) -> &str {
        "performance_matrix"
    }

    fn label(&self) -> &str {
        "Performance Matrix"
    }

    fn category(&self) -> &str {
        "structure"
    }

    fn translations(&self) -> &'static [(&'static str, &'static str)] {
        &[("cell_count", "Populated cells"), ("worst_cell", "Worst cell")]
    }

    fn param_translations(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("row_dimension", "Row dimension"),
            ("col_dimension", "Column dimension"),
            ("min_clicks", "Significance floor (clicks)"),
        ]
    }

    fn algorithm(&self) -> &str {
        ALGORITHM
    }

    fn metrics(&self) -> &str {
        METRICS
    }

    fn render_table(&self, results: &ResultsPayload, out: &mut Container) {
        let Some(data) = results.typed_data::<MatrixData>() else {
            out.placeholder("No matrix data");
            return;
        };
        if data.rows.is_empty() || data.cols.is_empty() {
            out.placeholder("No matrix data");
            return;
        }

        let mut html = String::from("<table class=\"matrix\"><thead><tr><th></th>");
        for col in &data.cols {
            let _ = write!(html, "<th>{}</th>", escape_html(col));
        }
        html.push_str("</tr></thead><tbody>");
        for row in &data.rows {
            let _ = write!(html, "<tr><th>{}</th>", escape_html(row));
            for col in &data.cols {
                let cell = data
                    .cells
                    .iter()
                    .find(|c| &c.row == row && &c.col == col)
                    .and_then(|c| c.roi.map(|roi| (roi, c.clicks)));
                match cell {
                    Some((roi, clicks)) => {
                        let _ = write!(
                            html,
                            "<td class=\"{}\" title=\"{clicks} clicks\">{}</td>",
                            cell_severity(roi).css_class(),
                            format_percent(Some(roi)),
                        );
                    }
                    None => html.push_str("<td class=\"empty\">-</td>"),
                }
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody></table>");
        out.replace(html);
    }
}
