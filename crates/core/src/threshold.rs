//! Per-sensor min/max thresholds and status banding.
//!
//! Thresholds are loaded once at startup from embedded JSON
//! configuration and are read-only for the lifetime of the console.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::CoreError;

/// Acceptable range for one sensor.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Threshold {
    pub min: f64,
    pub max: f64,
}

/// Colour band for a value relative to its sensor's threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdStatus {
    /// Comfortably inside the range.
    Ok,
    /// Inside the range but within 10% of either bound.
    Warning,
    /// Outside the range.
    Danger,
}

impl Threshold {
    /// Band a value against this threshold.
    pub fn status(&self, value: f64) -> ThresholdStatus {
        if value < self.min || value > self.max {
            ThresholdStatus::Danger
        } else if value < self.min * 1.1 || value > self.max * 0.9 {
            ThresholdStatus::Warning
        } else {
            ThresholdStatus::Ok
        }
    }
}

/// Read-only threshold configuration keyed by sensor id.
#[derive(Debug, Clone, Default)]
pub struct ThresholdMap {
    thresholds: HashMap<String, Threshold>,
}

impl ThresholdMap {
    /// Parse the embedded JSON configuration block, e.g.
    /// `{"nitrogen": {"min": 200.0, "max": 600.0}, ...}`.
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        let thresholds: HashMap<String, Threshold> =
            serde_json::from_str(raw).map_err(|e| CoreError::Config(e.to_string()))?;
        Ok(Self { thresholds })
    }

    pub fn get(&self, sensor_id: &str) -> Option<Threshold> {
        self.thresholds.get(sensor_id).copied()
    }

    /// Band a value for a sensor, or `None` if no threshold is configured.
    pub fn status(&self, sensor_id: &str, value: f64) -> Option<ThresholdStatus> {
        self.get(sensor_id).map(|t| t.status(value))
    }
}
