//! Alert and problem-row severity levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered severity attached to alerts and problem rows.
///
/// Ordering is by urgency: `Critical > High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational / lowest urgency.
    #[default]
    Low,
    /// Worth a look.
    Medium,
    /// Needs attention soon.
    High,
    /// Actively losing money.
    Critical,
}

impl Severity {
    /// CSS class used for color-coding rows and badges.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Critical => "severity-critical",
            Self::High => "severity-high",
            Self::Medium => "severity-medium",
            Self::Low => "severity-low",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
