//! Display formatting for campaign metrics.
//!
//! Every render path in the dashboard defaults missing numeric fields to
//! placeholders rather than failing, so the formatters here all accept
//! `Option` and emit `"N/A"` / `"-"` for absent values.

/// Format a monetary amount as dollars with two decimals.
#[must_use]
pub fn format_currency(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("${v:.2}"),
        _ => "N/A".to_string(),
    }
}

/// Format a ratio as a percentage with one decimal.
#[must_use]
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.1}%"),
        _ => "N/A".to_string(),
    }
}

/// Format a count, with `-` for absent values.
#[must_use]
pub fn format_count(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Return on investment: `(revenue - cost) / cost * 100`.
///
/// Zero cost has no meaningful ROI and yields `None`.
#[must_use]
pub fn roi(cost: f64, revenue: f64) -> Option<f64> {
    if cost <= 0.0 || !cost.is_finite() || !revenue.is_finite() {
        return None;
    }
    Some((revenue - cost) / cost * 100.0)
}

/// Conversion rate: `leads / clicks * 100`.
#[must_use]
pub fn conversion_rate(clicks: u64, leads: u64) -> Option<f64> {
    if clicks == 0 {
        return None;
    }
    Some(leads as f64 / clicks as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(Some(10.0)), "$10.00");
        assert_eq!(format_currency(Some(11.255)), "$11.26");
        assert_eq!(format_currency(None), "N/A");
        assert_eq!(format_currency(Some(f64::NAN)), "N/A");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_percent(Some(12.5)), "12.5%");
        assert_eq!(format_percent(Some(-3.0)), "-3.0%");
        assert_eq!(format_percent(None), "N/A");
    }

    #[test]
    fn test_count() {
        assert_eq!(format_count(Some(100)), "100");
        assert_eq!(format_count(None), "-");
    }

    #[test]
    fn test_roi_formula() {
        // (11.25 - 10) / 10 * 100 = 12.5
        let r = roi(10.0, 11.25).expect("valid roi");
        assert!((r - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_roi_zero_cost() {
        assert_eq!(roi(0.0, 100.0), None);
        assert_eq!(roi(-5.0, 100.0), None);
    }

    #[test]
    fn test_conversion_rate() {
        let cr = conversion_rate(100, 5).expect("valid cr");
        assert!((cr - 5.0).abs() < 1e-9);
        assert_eq!(conversion_rate(0, 5), None);
    }
}
