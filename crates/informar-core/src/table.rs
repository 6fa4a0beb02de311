//! Sortable table model shared by every module's tabular rendering.
//!
//! Modules build [`TableRow`]s under [`TableColumn`] definitions; the
//! controller owns a [`SortState`] per rendered table, toggles it with
//! [`toggle_sort`] when a header is clicked, sorts with [`sort_rows`] and
//! re-renders the whole container. Sorting is stable, so equal keys keep
//! insertion order and repeated identical renders are visually
//! deterministic.

use crate::container::escape_html;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;

/// How a column's values compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Case-insensitive string comparison.
    #[default]
    Text,
    /// Numeric comparison; missing/NaN sorts lowest.
    Number,
    /// Comparison by parsed timestamp.
    Date,
}

/// Column definition for a module table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableColumn {
    /// Column key (field name in row data).
    pub key: String,
    /// Display header.
    pub header: String,
    /// Comparison kind.
    pub kind: ColumnKind,
    /// Whether clicking the header sorts the table.
    pub sortable: bool,
}

impl TableColumn {
    /// Create a text column.
    #[must_use]
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            kind: ColumnKind::Text,
            sortable: false,
        }
    }

    /// Set the comparison kind.
    #[must_use]
    pub const fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    /// Make the column sortable.
    #[must_use]
    pub const fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }
}

/// A cell value in a table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Text value.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Date value, kept as the raw string the backend reported.
    Date(String),
    /// Empty cell.
    Empty,
}

impl CellValue {
    /// Display text for the cell; empty cells show a dash.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) | Self::Date(s) => s.clone(),
            Self::Number(n) if n.is_finite() => format!("{n}"),
            Self::Number(_) | Self::Empty => "-".to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<u64> for CellValue {
    fn from(n: u64) -> Self {
        Self::Number(n as f64)
    }
}

/// A row of cell values keyed by column key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cell values by column key.
    pub cells: HashMap<String, CellValue>,
}

impl TableRow {
    /// Create an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell value.
    #[must_use]
    pub fn cell(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.cells.insert(key.into(), value.into());
        self
    }

    /// Add a pre-formatted display cell (sorting treats it as text).
    #[must_use]
    pub fn display_cell(self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.cell(key, CellValue::Text(text.into()))
    }

    /// Get a cell value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.get(key)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Per-table sort state, created fresh for each rendered table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    /// Currently sorted column key, if any.
    pub column: Option<String>,
    /// Current direction.
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: None,
            direction: SortDirection::Asc,
        }
    }
}

/// Apply a header click: same column toggles direction, a new column starts
/// ascending.
pub fn toggle_sort(state: &mut SortState, column: &str) {
    if state.column.as_deref() == Some(column) {
        state.direction = state.direction.toggled();
    } else {
        state.column = Some(column.to_string());
        state.direction = SortDirection::Asc;
    }
}

/// Sort key for a date string.
///
/// Accepts `YYYY-MM-DD` with an optional `THH:MM:SS` / ` HH:MM:SS` suffix;
/// unparseable dates sort lowest.
fn date_key(raw: &str) -> Option<(u32, u32, u32, u32, u32, u32)> {
    let raw = raw.trim();
    let (date, time) = match raw.split_once(['T', ' ']) {
        Some((d, t)) => (d, Some(t)),
        None => (raw, None),
    };
    let mut parts = date.splitn(3, '-');
    let year: u32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    let (mut h, mut m, mut s) = (0, 0, 0);
    if let Some(t) = time {
        let t = t.trim_end_matches('Z');
        let mut tp = t.splitn(3, ':');
        h = tp.next().and_then(|v| v.parse().ok()).unwrap_or(0);
        m = tp.next().and_then(|v| v.parse().ok()).unwrap_or(0);
        s = tp
            .next()
            .and_then(|v| v.split('.').next())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
    }
    Some((year, month, day, h, m, s))
}

fn compare_cells(a: Option<&CellValue>, b: Option<&CellValue>, kind: ColumnKind) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    match kind {
        ColumnKind::Number => {
            // Formatted cells ("$10.00", "12.5%", "1,204") sort by their
            // numeric value, mirroring sort-on-cell-text behavior.
            let to_num = |c: Option<&CellValue>| match c {
                Some(CellValue::Number(n)) if n.is_finite() => Some(*n),
                Some(CellValue::Text(s)) => s
                    .trim()
                    .trim_start_matches('$')
                    .trim_end_matches('%')
                    .replace(',', "")
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite()),
                _ => None,
            };
            match (to_num(a), to_num(b)) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => Ordering::Equal,
            }
        }
        ColumnKind::Date => {
            let to_key = |c: Option<&CellValue>| match c {
                Some(CellValue::Date(s) | CellValue::Text(s)) => date_key(s),
                _ => None,
            };
            match (to_key(a), to_key(b)) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => Ordering::Equal,
            }
        }
        ColumnKind::Text => {
            let to_text = |c: Option<&CellValue>| match c {
                Some(cell) => cell.display().to_lowercase(),
                None => String::new(),
            };
            to_text(a).cmp(&to_text(b))
        }
    }
}

/// Sort rows by a column, in place.
///
/// Uses a stable sort so equal keys keep insertion order; asc then desc then
/// asc on the same column restores the original order.
pub fn sort_rows(rows: &mut [TableRow], column: &str, kind: ColumnKind, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ord = compare_cells(a.get(column), b.get(column), kind);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

/// Render a generic sortable table as HTML.
///
/// Sortable headers carry `data-sort-key` attributes; the active column
/// shows a direction indicator. Cell text is escaped.
#[must_use]
pub fn render_table_html(
    columns: &[TableColumn],
    rows: &[TableRow],
    state: &SortState,
) -> String {
    let mut html = String::from("<table class=\"module-table\"><thead><tr>");
    for col in columns {
        let indicator = if state.column.as_deref() == Some(col.key.as_str()) {
            match state.direction {
                SortDirection::Asc => " \u{25b2}",
                SortDirection::Desc => " \u{25bc}",
            }
        } else {
            ""
        };
        if col.sortable {
            let _ = write!(
                html,
                "<th class=\"sortable\" data-sort-key=\"{}\">{}{indicator}</th>",
                escape_html(&col.key),
                escape_html(&col.header)
            );
        } else {
            let _ = write!(html, "<th>{}</th>", escape_html(&col.header));
        }
    }
    html.push_str("</tr></thead><tbody>");
    for row in rows {
        html.push_str("<tr>");
        for col in columns {
            let text = row.get(&col.key).map_or_else(|| "-".to_string(), CellValue::display);
            let _ = write!(html, "<td>{}</td>", escape_html(&text));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}
