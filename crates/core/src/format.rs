//! Number and date formatting helpers shared by the views.

use crate::types::Timestamp;

/// Fixed-point rendering of a sensor value, e.g. `format_number(7.456, 2)`
/// is `"7.46"`.
pub fn format_number(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// A value with its unit, e.g. `"23.5 °C"`. Unit-less values render bare.
pub fn format_value(value: f64, unit: &str) -> String {
    if unit.is_empty() {
        format_number(value, 2)
    } else {
        format!("{} {unit}", format_number(value, 2))
    }
}

/// Full date + time in the dashboard's display convention.
pub fn format_datetime(ts: Timestamp) -> String {
    ts.format("%d/%m/%Y %H:%M:%S").to_string()
}

/// Time-of-day only, for "last update" lines.
pub fn format_time(ts: Timestamp) -> String {
    ts.format("%H:%M:%S").to_string()
}

/// Calendar date in ISO form, used in export filenames.
pub fn iso_date(ts: Timestamp) -> String {
    ts.format("%Y-%m-%d").to_string()
}
