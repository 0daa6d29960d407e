//! Server event envelope and payload types.
//!
//! The server sends JSON messages of the shape
//! `{"event": "<channel>", "data": {...}}`. This module deserializes
//! them into a strongly-typed [`ServerEvent`] enum.

use serde::Deserialize;

use fieldsense_core::alert::Alert;
use fieldsense_core::series::Reading;
use fieldsense_core::types::{AlertId, Timestamp};

/// All known server-pushed event channels.
///
/// Deserialized via the internally-tagged `"event"` field with
/// associated `"data"` content.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A fresh sensor reading.
    SensorData(SensorData),

    /// A newly raised alert.
    NewAlert(Alert),

    /// An alert was resolved (possibly by another client).
    AlertResolved(AlertResolved),

    /// Periodic system health broadcast.
    SystemStatus(SystemStatus),

    /// A server-side log line for the configuration page panel.
    SystemLog(SystemLog),

    /// Connectivity state of the server's MQTT ingest.
    MqttStatus(MqttStatus),
}

impl ServerEvent {
    /// Wire name of the channel this event arrived on.
    pub fn channel(&self) -> &'static str {
        match self {
            ServerEvent::SensorData(_) => "sensor_data",
            ServerEvent::NewAlert(_) => "new_alert",
            ServerEvent::AlertResolved(_) => "alert_resolved",
            ServerEvent::SystemStatus(_) => "system_status",
            ServerEvent::SystemLog(_) => "system_log",
            ServerEvent::MqttStatus(_) => "mqtt_status",
        }
    }
}

/// Payload for `sensor_data` events.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorData {
    pub sensor_name: String,
    pub value: f64,
    pub unit: String,
    pub timestamp: Timestamp,
    /// Anomalies currently open for this sensor.
    #[serde(default)]
    pub anomalies_count: u32,
}

impl SensorData {
    /// Convert into the series store's reading type.
    pub fn to_reading(&self) -> Reading {
        Reading {
            sensor_id: self.sensor_name.clone(),
            timestamp: self.timestamp,
            value: self.value,
            unit: self.unit.clone(),
        }
    }
}

/// Payload for `alert_resolved` events.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AlertResolved {
    pub alert_id: AlertId,
}

/// Payload for `system_status` events.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemStatus {
    /// Server uptime in seconds.
    #[serde(default)]
    pub uptime: u64,
    /// Recent server-side error messages, newest last.
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Payload for `system_log` events.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemLog {
    pub level: String,
    pub message: String,
}

/// Payload for `mqtt_status` events.
#[derive(Debug, Clone, Deserialize)]
pub struct MqttStatus {
    pub connected: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Parse one inbound text frame.
///
/// Unknown channels and malformed payloads surface as errors; the
/// session loop logs and drops them (at-most-once, best-effort).
pub fn parse_event(text: &str) -> Result<ServerEvent, serde_json::Error> {
    serde_json::from_str(text)
}
