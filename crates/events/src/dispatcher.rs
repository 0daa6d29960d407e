//! Per-channel event dispatch.
//!
//! [`Dispatcher`] holds the handlers registered for each event channel
//! and invokes them synchronously, in registration order. Handlers
//! receive a mutable application context `C` alongside the payload —
//! the context is owned by the single UI task, so no locking exists or
//! is needed. There is no acknowledgement or back-pressure protocol:
//! an event is dispatched once, best-effort, and forgotten.

use fieldsense_core::alert::Alert;

use crate::messages::{AlertResolved, MqttStatus, SensorData, ServerEvent, SystemLog, SystemStatus};

type Handlers<C, T> = Vec<Box<dyn FnMut(&mut C, &T)>>;

/// Registry of per-channel event handlers over a context type `C`.
///
/// Events on channels with no registered handler are dropped silently —
/// a view only wires the channels it displays.
pub struct Dispatcher<C> {
    sensor_data: Handlers<C, SensorData>,
    new_alert: Handlers<C, Alert>,
    alert_resolved: Handlers<C, AlertResolved>,
    system_status: Handlers<C, SystemStatus>,
    system_log: Handlers<C, SystemLog>,
    mqtt_status: Handlers<C, MqttStatus>,
}

impl<C> Default for Dispatcher<C> {
    fn default() -> Self {
        Self {
            sensor_data: Vec::new(),
            new_alert: Vec::new(),
            alert_resolved: Vec::new(),
            system_status: Vec::new(),
            system_log: Vec::new(),
            mqtt_status: Vec::new(),
        }
    }
}

impl<C> Dispatcher<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_sensor_data(&mut self, handler: impl FnMut(&mut C, &SensorData) + 'static) {
        self.sensor_data.push(Box::new(handler));
    }

    pub fn on_new_alert(&mut self, handler: impl FnMut(&mut C, &Alert) + 'static) {
        self.new_alert.push(Box::new(handler));
    }

    pub fn on_alert_resolved(&mut self, handler: impl FnMut(&mut C, &AlertResolved) + 'static) {
        self.alert_resolved.push(Box::new(handler));
    }

    pub fn on_system_status(&mut self, handler: impl FnMut(&mut C, &SystemStatus) + 'static) {
        self.system_status.push(Box::new(handler));
    }

    pub fn on_system_log(&mut self, handler: impl FnMut(&mut C, &SystemLog) + 'static) {
        self.system_log.push(Box::new(handler));
    }

    pub fn on_mqtt_status(&mut self, handler: impl FnMut(&mut C, &MqttStatus) + 'static) {
        self.mqtt_status.push(Box::new(handler));
    }

    /// Run every handler registered for the event's channel.
    ///
    /// Handlers run to completion before the next event is processed;
    /// the caller drives events from a single task.
    pub fn dispatch(&mut self, ctx: &mut C, event: &ServerEvent) {
        match event {
            ServerEvent::SensorData(data) => Self::fire(&mut self.sensor_data, ctx, data),
            ServerEvent::NewAlert(alert) => Self::fire(&mut self.new_alert, ctx, alert),
            ServerEvent::AlertResolved(data) => Self::fire(&mut self.alert_resolved, ctx, data),
            ServerEvent::SystemStatus(status) => Self::fire(&mut self.system_status, ctx, status),
            ServerEvent::SystemLog(log) => Self::fire(&mut self.system_log, ctx, log),
            ServerEvent::MqttStatus(status) => Self::fire(&mut self.mqtt_status, ctx, status),
        }
    }

    fn fire<T>(handlers: &mut Handlers<C, T>, ctx: &mut C, payload: &T) {
        for handler in handlers.iter_mut() {
            handler(ctx, payload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::parse_event;

    #[test]
    fn dispatches_to_the_matching_channel_only() {
        let mut dispatcher: Dispatcher<Vec<String>> = Dispatcher::new();
        dispatcher.on_sensor_data(|seen, data| {
            seen.push(format!("sensor:{}", data.sensor_name));
        });
        dispatcher.on_alert_resolved(|seen, data| {
            seen.push(format!("resolved:{}", data.alert_id));
        });

        let event = parse_event(
            r#"{"event": "sensor_data", "data": {
                "sensor_name": "humidity", "value": 55.0, "unit": "%",
                "timestamp": "2026-08-28T10:00:00Z"
            }}"#,
        )
        .unwrap();

        let mut seen = Vec::new();
        dispatcher.dispatch(&mut seen, &event);
        assert_eq!(seen, ["sensor:humidity"]);
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let mut dispatcher: Dispatcher<Vec<u32>> = Dispatcher::new();
        for n in 0..3 {
            dispatcher.on_system_status(move |seen, _| seen.push(n));
        }

        let event = parse_event(r#"{"event": "system_status", "data": {"uptime": 1}}"#).unwrap();
        let mut seen = Vec::new();
        dispatcher.dispatch(&mut seen, &event);
        assert_eq!(seen, [0, 1, 2]);
    }

    #[test]
    fn channel_without_handlers_is_dropped_silently() {
        let mut dispatcher: Dispatcher<()> = Dispatcher::new();
        let event = parse_event(r#"{"event": "alert_resolved", "data": {"alert_id": 9}}"#).unwrap();
        // Must not panic.
        dispatcher.dispatch(&mut (), &event);
    }
}
