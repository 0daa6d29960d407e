//! Application state: every widget the console renders, in one place.
//!
//! The context is owned by the single UI task; handlers receive it by
//! mutable reference, so there are no globals and no locks.

use std::collections::HashMap;

use chrono::Utc;

use fieldsense_client::live::ConnectionState;
use fieldsense_core::series::{Reading, SeriesStore};
use fieldsense_core::threshold::{ThresholdMap, ThresholdStatus};
use fieldsense_core::types::Timestamp;
use fieldsense_core::{format, sensor};
use fieldsense_events::messages::SensorData;
use fieldsense_ui::chart::ChartAdapter;
use fieldsense_ui::logs::LogPanel;
use fieldsense_ui::notify::NotificationCenter;
use fieldsense_ui::status::{ConnectionIndicator, MqttIndicator, SystemStatusView};
use fieldsense_ui::table::{AlertList, BoundedList};

/// Readings kept per sensor chart.
pub const CHART_WINDOW: usize = 100;
/// Rows kept in the live data table.
pub const TABLE_ROWS: usize = 50;
/// Alerts kept in the active-alerts list.
pub const ALERT_ROWS: usize = 100;

/// One rendered row of the live data table.
#[derive(Debug, Clone)]
pub struct TableRow {
    pub timestamp: Timestamp,
    pub sensor_id: String,
    pub value: f64,
    pub unit: String,
    pub status: Option<ThresholdStatus>,
}

impl TableRow {
    pub fn from_data(data: &SensorData, thresholds: &ThresholdMap) -> Self {
        Self {
            timestamp: data.timestamp,
            sensor_id: data.sensor_name.clone(),
            value: data.value,
            unit: data.unit.clone(),
            status: thresholds.status(&data.sensor_name, data.value),
        }
    }

    /// Display cells: time, sensor, value, unit, status badge.
    pub fn columns(&self) -> [String; 5] {
        let badge = match self.status {
            Some(ThresholdStatus::Ok) => "OK",
            Some(ThresholdStatus::Warning) => "Attention",
            Some(ThresholdStatus::Danger) => "Alerte",
            None => "-",
        };
        [
            format::format_time(self.timestamp),
            sensor::label(&self.sensor_id).to_string(),
            format::format_number(self.value, 2),
            self.unit.clone(),
            badge.to_string(),
        ]
    }
}

/// Everything the console displays.
pub struct AppContext {
    pub store: SeriesStore,
    pub thresholds: ThresholdMap,
    pub charts: ChartAdapter,
    pub table: BoundedList<TableRow>,
    pub alerts: AlertList,
    pub notifications: NotificationCenter,
    pub connection: ConnectionIndicator,
    pub system: SystemStatusView,
    pub mqtt: MqttIndicator,
    pub logs: LogPanel,
    anomalies: HashMap<String, u32>,
    paused: bool,
}

impl AppContext {
    pub fn new(thresholds: ThresholdMap) -> Self {
        Self {
            store: SeriesStore::new(CHART_WINDOW),
            charts: ChartAdapter::new(thresholds.clone()),
            thresholds,
            table: BoundedList::with_placeholder(TABLE_ROWS, "Aucune donnée reçue"),
            alerts: AlertList::new(ALERT_ROWS),
            notifications: NotificationCenter::new(),
            connection: ConnectionIndicator::new(),
            system: SystemStatusView::new(),
            mqtt: MqttIndicator::new(),
            logs: LogPanel::new(),
            anomalies: HashMap::new(),
            paused: false,
        }
    }

    /// While paused, incoming readings are dropped rather than queued;
    /// charts and the table simply freeze.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Toggle the real-time pause. Returns the new paused state.
    pub fn toggle_paused(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Anomalies reported for a sensor on its last reading.
    pub fn anomaly_count(&self, sensor_id: &str) -> u32 {
        self.anomalies.get(sensor_id).copied().unwrap_or(0)
    }

    /// Whether the sensor's header icon shows the warning state.
    pub fn sensor_warning(&self, sensor_id: &str) -> bool {
        self.anomaly_count(sensor_id) > 0
    }

    /// Apply one incoming reading: series window, chart redraw, table row.
    pub fn apply_sensor_data(&mut self, data: &SensorData) {
        // The per-sensor warning icon tracks every reading, even while
        // the stream display is paused.
        self.anomalies
            .insert(data.sensor_name.clone(), data.anomalies_count);
        if self.paused {
            return;
        }
        self.store.append(&data.sensor_name, data.to_reading());
        self.charts.refresh(&data.sensor_name, &self.store);
        self.table.prepend(TableRow::from_data(data, &self.thresholds));
    }

    /// Replace a sensor's window with bulk-loaded history and redraw.
    pub fn load_history(&mut self, sensor_id: &str, readings: Vec<Reading>) {
        self.store.replace(sensor_id, readings);
        self.charts.refresh(sensor_id, &self.store);
    }

    /// Reflect a connection state change on the header indicator.
    pub fn apply_connection_state(&mut self, state: ConnectionState) {
        match state {
            ConnectionState::Connected => {
                self.connection.set_connected();
            }
            ConnectionState::Reconnecting { attempt } => {
                self.connection
                    .set_disconnected(Some(format!("Reconnexion... (tentative {attempt})")));
            }
            ConnectionState::Lost => {
                self.connection
                    .set_disconnected(Some("Connexion perdue".to_string()));
                self.notifications.error(
                    "Connexion perdue",
                    "Impossible de rétablir la connexion temps réel",
                );
                self.logs
                    .append(Utc::now(), "ERROR", "Connexion temps réel perdue");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn thresholds() -> ThresholdMap {
        ThresholdMap::from_json(r#"{"ph": {"min": 5.5, "max": 8.5}}"#).unwrap()
    }

    fn data(value: f64) -> SensorData {
        serde_json::from_value(serde_json::json!({
            "sensor_name": "ph",
            "value": value,
            "unit": "pH",
            "timestamp": Utc.with_ymd_and_hms(2026, 8, 28, 10, 0, 0).unwrap().to_rfc3339(),
        }))
        .unwrap()
    }

    #[test]
    fn sensor_data_feeds_series_and_table() {
        let mut ctx = AppContext::new(thresholds());
        ctx.apply_sensor_data(&data(7.0));

        assert_eq!(ctx.store.get("ph").unwrap().len(), 1);
        assert_eq!(ctx.table.len(), 1);
        assert_eq!(ctx.table.rows().next().unwrap().status, Some(ThresholdStatus::Ok));
    }

    #[test]
    fn pause_freezes_series_and_table() {
        let mut ctx = AppContext::new(thresholds());
        ctx.apply_sensor_data(&data(7.0));

        assert!(ctx.toggle_paused());
        ctx.apply_sensor_data(&data(7.1));
        assert_eq!(ctx.store.get("ph").unwrap().len(), 1);
        assert_eq!(ctx.table.len(), 1);

        // Resuming does not replay dropped readings.
        assert!(!ctx.toggle_paused());
        ctx.apply_sensor_data(&data(7.2));
        assert_eq!(ctx.store.get("ph").unwrap().len(), 2);
    }

    fn data_with_anomalies(value: f64, anomalies_count: u32) -> SensorData {
        serde_json::from_value(serde_json::json!({
            "sensor_name": "ph",
            "value": value,
            "unit": "pH",
            "timestamp": Utc.with_ymd_and_hms(2026, 8, 28, 10, 0, 0).unwrap().to_rfc3339(),
            "anomalies_count": anomalies_count,
        }))
        .unwrap()
    }

    #[test]
    fn anomaly_counts_drive_the_sensor_warning_icon() {
        let mut ctx = AppContext::new(thresholds());
        assert!(!ctx.sensor_warning("ph"));

        ctx.apply_sensor_data(&data_with_anomalies(7.0, 2));
        assert_eq!(ctx.anomaly_count("ph"), 2);
        assert!(ctx.sensor_warning("ph"));

        // A clean reading clears the icon again.
        ctx.apply_sensor_data(&data_with_anomalies(7.1, 0));
        assert!(!ctx.sensor_warning("ph"));
    }

    #[test]
    fn warning_icon_keeps_tracking_while_paused() {
        let mut ctx = AppContext::new(thresholds());
        assert!(ctx.toggle_paused());

        ctx.apply_sensor_data(&data_with_anomalies(7.0, 3));
        assert_eq!(ctx.table.len(), 0);
        assert!(ctx.sensor_warning("ph"));
    }

    #[test]
    fn table_row_renders_display_columns() {
        let row = TableRow::from_data(&data(9.0), &thresholds());
        let cols = row.columns();
        assert_eq!(cols[1], "pH");
        assert_eq!(cols[2], "9.00");
        assert_eq!(cols[4], "Alerte");
    }

    #[test]
    fn terminal_loss_updates_indicator_and_notifies() {
        let mut ctx = AppContext::new(thresholds());
        ctx.apply_connection_state(ConnectionState::Connected);
        assert_eq!(ctx.connection.text(), "Temps réel actif");

        ctx.apply_connection_state(ConnectionState::Reconnecting { attempt: 2 });
        assert_eq!(ctx.connection.text(), "Reconnexion... (tentative 2)");

        ctx.apply_connection_state(ConnectionState::Lost);
        assert_eq!(ctx.connection.text(), "Connexion perdue");
        assert_eq!(ctx.notifications.len(), 1);
        assert_eq!(ctx.logs.len(), 1);
    }
}
