//! The results payload produced by a server-side analysis run.
//!
//! Only the conventionally-named top-level fields are typed here; `data` is
//! module-specific and stays opaque until the owning module deserializes it
//! into its own shape.

use crate::chart::ChartSpec;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Severity-tagged message attached to a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultAlert {
    /// Human-readable message.
    pub message: String,
    /// Alert severity, defaulting to the lowest level when absent.
    #[serde(default)]
    pub severity: Severity,
}

/// A completed analysis run as returned by the results endpoint.
///
/// Every field tolerates absence so a partial or legacy payload still
/// renders; render paths substitute placeholders rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsPayload {
    /// Module-specific computed fields. `Value::Null` when the run produced
    /// nothing.
    #[serde(default)]
    pub data: Value,
    /// Chart configurations accompanying the run.
    #[serde(default)]
    pub charts: Vec<ChartSpec>,
    /// Severity-tagged messages raised during the run.
    #[serde(default)]
    pub alerts: Vec<ResultAlert>,
    /// Configuration parameters the run was executed with.
    #[serde(default)]
    pub params: Map<String, Value>,
    /// When the run started, as reported by the backend.
    #[serde(default)]
    pub started_at: Option<String>,
}

impl ResultsPayload {
    /// Build a payload from a raw JSON document.
    ///
    /// Unknown shapes degrade to an empty payload rather than erroring, per
    /// the render contract's no-data handling.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Whether the run produced any module data at all.
    #[must_use]
    pub fn has_data(&self) -> bool {
        match &self.data {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            Value::Array(items) => !items.is_empty(),
            _ => true,
        }
    }

    /// Deserialize `data` into a module's own typed shape.
    ///
    /// Returns `None` on absent or mismatched data; modules render their
    /// placeholder in that case.
    #[must_use]
    pub fn typed_data<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        if !self.has_data() {
            return None;
        }
        serde_json::from_value(self.data.clone()).ok()
    }
}
