//! Alert types pushed by the monitoring server.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{AlertId, Timestamp};

/// Severity of a sensor alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

// Unrecognized severities degrade to the mildest styling rather than
// rejecting the whole alert.
impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "medium" => Severity::Medium,
            "high" => Severity::High,
            "critical" => Severity::Critical,
            _ => Severity::Low,
        })
    }
}

impl Severity {
    /// Badge style class used when rendering the alert.
    pub fn css_class(self) -> &'static str {
        match self {
            Severity::Low => "info",
            Severity::Medium => "warning",
            Severity::High => "danger",
            Severity::Critical => "dark",
        }
    }
}

/// An active alert as displayed in the alert lists.
///
/// Alerts are never mutated client-side: resolving one removes it from
/// the active list by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    #[serde(rename = "sensor_name")]
    pub sensor_id: String,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub timestamp: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parses_lowercase() {
        let s: Severity = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(s, Severity::Critical);
    }

    #[test]
    fn unknown_severity_degrades_to_low() {
        let s: Severity = serde_json::from_str("\"apocalyptic\"").unwrap();
        assert_eq!(s, Severity::Low);
    }

    #[test]
    fn severity_css_classes() {
        assert_eq!(Severity::Low.css_class(), "info");
        assert_eq!(Severity::Medium.css_class(), "warning");
        assert_eq!(Severity::High.css_class(), "danger");
        assert_eq!(Severity::Critical.css_class(), "dark");
    }

    #[test]
    fn alert_parses_wire_field_names() {
        let alert: Alert = serde_json::from_str(
            r#"{
                "id": 42,
                "sensor_name": "nitrogen",
                "type": "threshold",
                "severity": "medium",
                "message": "Seuil dépassé",
                "timestamp": "2026-08-28T10:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(alert.id, 42);
        assert_eq!(alert.sensor_id, "nitrogen");
        assert_eq!(alert.kind, "threshold");
        assert_eq!(alert.severity, Severity::Medium);
    }
}
