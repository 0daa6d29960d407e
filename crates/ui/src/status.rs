//! Connection and system status indicators.

/// The real-time connection badge in the header.
///
/// Shows "Temps réel actif" while connected; a disconnect renders the
/// supplied message (the terminal "Connexion perdue" once reconnection
/// has been abandoned).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionIndicator {
    connected: bool,
    message: Option<String>,
}

impl Default for ConnectionIndicator {
    fn default() -> Self {
        Self {
            connected: false,
            message: None,
        }
    }
}

impl ConnectionIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_connected(&mut self) {
        self.connected = true;
        self.message = None;
    }

    pub fn set_disconnected(&mut self, message: Option<String>) {
        self.connected = false;
        self.message = message;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Text for the badge.
    pub fn text(&self) -> &str {
        if self.connected {
            "Temps réel actif"
        } else {
            self.message.as_deref().unwrap_or("Connexion perdue")
        }
    }
}

/// The "Système actif - Ns" line fed by `system_status` events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemStatusView {
    uptime_secs: u64,
    errors: Vec<String>,
}

impl SystemStatusView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, uptime_secs: u64, errors: &[String]) {
        self.uptime_secs = uptime_secs;
        self.errors = errors.to_vec();
    }

    pub fn text(&self) -> String {
        format!("Système actif - {}s", self.uptime_secs)
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

/// MQTT ingest status shown on the configuration page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MqttIndicator {
    connected: bool,
    message: Option<String>,
}

impl MqttIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, connected: bool, message: Option<String>) {
        self.connected = connected;
        self.message = message;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn text(&self) -> &str {
        match &self.message {
            Some(message) => message,
            None if self.connected => "Communication active",
            None => "Communication interrompue",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_starts_disconnected_with_default_text() {
        let indicator = ConnectionIndicator::new();
        assert!(!indicator.is_connected());
        assert_eq!(indicator.text(), "Connexion perdue");
    }

    #[test]
    fn connect_then_terminal_disconnect() {
        let mut indicator = ConnectionIndicator::new();
        indicator.set_connected();
        assert_eq!(indicator.text(), "Temps réel actif");

        indicator.set_disconnected(Some("Connexion perdue".into()));
        assert!(!indicator.is_connected());
        assert_eq!(indicator.text(), "Connexion perdue");
    }

    #[test]
    fn system_status_line() {
        let mut view = SystemStatusView::new();
        view.update(3600, &["capteur ph muet".to_string()]);
        assert_eq!(view.text(), "Système actif - 3600s");
        assert_eq!(view.errors().len(), 1);
    }

    #[test]
    fn mqtt_indicator_prefers_server_message() {
        let mut mqtt = MqttIndicator::new();
        mqtt.update(true, None);
        assert_eq!(mqtt.text(), "Communication active");

        mqtt.update(false, Some("Broker injoignable".into()));
        assert_eq!(mqtt.text(), "Broker injoignable");
    }
}
