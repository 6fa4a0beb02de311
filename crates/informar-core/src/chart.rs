//! Chart configuration and canvas mount tracking.
//!
//! The charting front-end consumes a `{type, data, options}` triple per
//! canvas. The one obligation on this side is resource hygiene: a canvas
//! must have its previous chart instance destroyed before a new one is
//! created, or re-renders leak instances and ghost-draw. [`ChartMounts`]
//! enforces that by construction: mounting onto an occupied canvas id
//! returns (and thereby drops) the previous spec.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Chart type variants understood by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    /// Line chart.
    #[default]
    Line,
    /// Bar chart.
    Bar,
    /// Pie chart.
    Pie,
    /// Doughnut chart.
    Doughnut,
    /// Scatter plot.
    Scatter,
}

/// One data series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Series label.
    pub label: String,
    /// Series values, aligned with the chart's labels.
    #[serde(default)]
    pub data: Vec<f64>,
    /// Series color, if the backend chose one.
    #[serde(default)]
    pub color: Option<String>,
}

impl Dataset {
    /// Create a series with values.
    #[must_use]
    pub fn new(label: impl Into<String>, data: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            data,
            color: None,
        }
    }

    /// Set the series color.
    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// A complete chart configuration for one canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Canvas element id the chart binds to.
    #[serde(default)]
    pub canvas_id: String,
    /// Chart type.
    #[serde(default, rename = "type")]
    pub chart_type: ChartType,
    /// X-axis labels.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Data series.
    #[serde(default)]
    pub datasets: Vec<Dataset>,
    /// Passthrough options for the charting front-end.
    #[serde(default)]
    pub options: Map<String, Value>,
}

impl ChartSpec {
    /// Create a chart bound to a canvas id.
    #[must_use]
    pub fn new(canvas_id: impl Into<String>, chart_type: ChartType) -> Self {
        Self {
            canvas_id: canvas_id.into(),
            chart_type,
            ..Self::default()
        }
    }

    /// Set the labels.
    #[must_use]
    pub fn labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    /// Add a dataset.
    #[must_use]
    pub fn dataset(mut self, dataset: Dataset) -> Self {
        self.datasets.push(dataset);
        self
    }
}

/// Tracks which chart is mounted on which canvas.
#[derive(Debug, Default)]
pub struct ChartMounts {
    mounted: HashMap<String, ChartSpec>,
}

impl ChartMounts {
    /// Create an empty mount table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a chart on its canvas, destroying any previous instance there.
    ///
    /// Returns the replaced spec, if one was mounted.
    pub fn mount(&mut self, spec: ChartSpec) -> Option<ChartSpec> {
        self.mounted.insert(spec.canvas_id.clone(), spec)
    }

    /// Unmount whatever is on the canvas.
    pub fn unmount(&mut self, canvas_id: &str) -> Option<ChartSpec> {
        self.mounted.remove(canvas_id)
    }

    /// The chart currently mounted on a canvas.
    #[must_use]
    pub fn get(&self, canvas_id: &str) -> Option<&ChartSpec> {
        self.mounted.get(canvas_id)
    }

    /// Canvas ids with a mounted chart.
    #[must_use]
    pub fn canvas_ids(&self) -> Vec<String> {
        self.mounted.keys().cloned().collect()
    }

    /// Number of mounted charts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    /// Whether anything is mounted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }

    /// Serialize every mounted chart as the front-end's init configuration,
    /// keyed by canvas id.
    #[must_use]
    pub fn init_config(&self) -> Value {
        let mut out = Map::new();
        for (canvas_id, spec) in &self.mounted {
            if let Ok(v) = serde_json::to_value(spec) {
                out.insert(canvas_id.clone(), v);
            }
        }
        Value::Object(out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mount_replaces_previous() {
        let mut mounts = ChartMounts::new();
        let first = ChartSpec::new("roi-canvas", ChartType::Line)
            .dataset(Dataset::new("ROI", vec![1.0, 2.0]));
        let second = ChartSpec::new("roi-canvas", ChartType::Bar);

        assert!(mounts.mount(first.clone()).is_none());
        let destroyed = mounts.mount(second).expect("previous instance returned");
        assert_eq!(destroyed, first);
        assert_eq!(mounts.len(), 1);
        assert_eq!(mounts.canvas_ids(), vec!["roi-canvas".to_string()]);
        assert_eq!(
            mounts.get("roi-canvas").unwrap().chart_type,
            ChartType::Bar
        );
    }

    #[test]
    fn test_unmount() {
        let mut mounts = ChartMounts::new();
        mounts.mount(ChartSpec::new("c1", ChartType::Pie));
        assert!(mounts.unmount("c1").is_some());
        assert!(mounts.is_empty());
        assert!(mounts.unmount("c1").is_none());
    }

    #[test]
    fn test_spec_deserializes_wire_shape() {
        let spec: ChartSpec = serde_json::from_value(json!({
            "canvas_id": "trend",
            "type": "bar",
            "labels": ["Mon", "Tue"],
            "datasets": [{"label": "Cost", "data": [10.0, 12.0]}]
        }))
        .unwrap();
        assert_eq!(spec.chart_type, ChartType::Bar);
        assert_eq!(spec.datasets[0].data, vec![10.0, 12.0]);
    }

    #[test]
    fn test_init_config_keyed_by_canvas() {
        let mut mounts = ChartMounts::new();
        mounts.mount(ChartSpec::new("a", ChartType::Line));
        mounts.mount(ChartSpec::new("b", ChartType::Pie));
        let config = mounts.init_config();
        assert!(config.get("a").is_some());
        assert!(config.get("b").is_some());
        assert_eq!(config["b"]["type"], json!("pie"));
    }
}
