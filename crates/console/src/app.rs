//! Event loop: dispatch server events to the application context.

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use fieldsense_client::api::DashboardApi;
use fieldsense_client::live::ConnectionState;
use fieldsense_core::alert::Severity;
use fieldsense_core::csv::CsvExport;
use fieldsense_core::forms::ForceAnomalyForm;
use fieldsense_core::sensor;
use fieldsense_core::types::AlertId;
use fieldsense_events::dispatcher::Dispatcher;
use fieldsense_events::messages::ServerEvent;
use fieldsense_ui::actions::ActionButton;
use fieldsense_ui::notify::Level;

use crate::context::AppContext;
use crate::ops;

fn notify_level(severity: Severity) -> Level {
    match severity {
        Severity::Low => Level::Info,
        Severity::Medium => Level::Warning,
        Severity::High | Severity::Critical => Level::Danger,
    }
}

/// Wire every event channel to its widget updates.
pub fn dispatcher() -> Dispatcher<AppContext> {
    let mut dispatcher = Dispatcher::new();

    dispatcher.on_sensor_data(|ctx: &mut AppContext, data| {
        ctx.apply_sensor_data(data);
    });

    dispatcher.on_new_alert(|ctx: &mut AppContext, alert| {
        ctx.notifications.push(
            "Nouvelle alerte",
            alert.message.clone(),
            notify_level(alert.severity),
        );
        ctx.alerts.push(alert.clone());
    });

    dispatcher.on_alert_resolved(|ctx: &mut AppContext, resolved| {
        // Possibly resolved by another client, or already gone locally.
        if !ctx.alerts.resolve(resolved.alert_id) {
            tracing::debug!(alert_id = resolved.alert_id, "Resolved alert was not displayed");
        }
    });

    dispatcher.on_system_status(|ctx: &mut AppContext, status| {
        ctx.system.update(status.uptime, &status.errors);
    });

    dispatcher.on_system_log(|ctx: &mut AppContext, log| {
        ctx.logs.append(Utc::now(), &log.level, &log.message);
    });

    dispatcher.on_mqtt_status(|ctx: &mut AppContext, status| {
        ctx.mqtt.update(status.connected, status.message.clone());
    });

    dispatcher
}

/// Seed every chart with recent history from the REST API.
///
/// A sensor whose history request fails starts empty; live events fill
/// it back up.
pub async fn load_initial_history(ctx: &mut AppContext, api: &DashboardApi, hours: u32) {
    for info in sensor::SENSORS {
        match api.sensor_history(info.id, hours).await {
            Ok(readings) => {
                tracing::debug!(sensor = info.id, points = readings.len(), "History loaded");
                ctx.load_history(info.id, readings);
            }
            Err(e) => {
                tracing::warn!(sensor = info.id, error = %e, "History load failed");
            }
        }
    }
}

/// One console command, parsed from a line of input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Pause,
    Resolve(AlertId),
    ResolveAll,
    Analysis { force: bool },
    ExportAlerts,
    ExportData,
    ClearLogs,
    Backup,
    Reset,
    ClearOld,
    Restart,
    SaveWeibull,
    TestReading(f64),
    Anomaly { sensor: String, kind: String },
}

impl Command {
    /// Parse one input line. `None` for anything unrecognized,
    /// including trailing junk after a complete command.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let word = parts.next()?;
        match (word, parts.next(), parts.next()) {
            ("pause", None, _) => Some(Command::Pause),
            ("resolve", Some("all"), None) => Some(Command::ResolveAll),
            ("resolve", Some(id), None) => id.parse().ok().map(Command::Resolve),
            ("analysis", None, _) => Some(Command::Analysis { force: false }),
            ("analysis", Some("force"), None) => Some(Command::Analysis { force: true }),
            ("export", Some("alerts"), None) => Some(Command::ExportAlerts),
            ("export", Some("data"), None) => Some(Command::ExportData),
            ("clear", Some("logs"), None) => Some(Command::ClearLogs),
            ("clear", Some("old"), None) => Some(Command::ClearOld),
            ("backup", None, _) => Some(Command::Backup),
            ("reset", None, _) => Some(Command::Reset),
            ("restart", None, _) => Some(Command::Restart),
            ("weibull", None, _) => Some(Command::SaveWeibull),
            ("test", Some(value), None) => value.parse().ok().map(Command::TestReading),
            ("anomaly", Some(sensor), Some(kind)) => Some(Command::Anomaly {
                sensor: sensor.to_string(),
                kind: kind.to_string(),
            }),
            _ => None,
        }
    }
}

/// The console's action buttons. Each command family owns one busy
/// state, so e.g. a backup in flight rejects a second `backup`.
pub struct ActionButtons {
    pub resolve: ActionButton,
    pub analysis: ActionButton,
    pub anomaly: ActionButton,
    pub test: ActionButton,
    pub backup: ActionButton,
    pub reset: ActionButton,
    pub clear_old: ActionButton,
    pub restart: ActionButton,
}

impl ActionButtons {
    pub fn new() -> Self {
        Self {
            resolve: ActionButton::new("Résoudre", "Résolution..."),
            analysis: ActionButton::new("Lancer l'analyse", "Analyse en cours..."),
            anomaly: ActionButton::new("Injecter", "Injection..."),
            test: ActionButton::new("Tester", "Test..."),
            backup: ActionButton::new("Sauvegarder", "Sauvegarde..."),
            reset: ActionButton::new("Réinitialiser", "Réinitialisation..."),
            clear_old: ActionButton::new("Nettoyer", "Nettoyage..."),
            restart: ActionButton::new("Redémarrer", "Redémarrage..."),
        }
    }
}

impl Default for ActionButtons {
    fn default() -> Self {
        Self::new()
    }
}

/// Execute one parsed command. Exports are handed back to the caller,
/// which owns file output.
pub async fn handle_command(
    ctx: &mut AppContext,
    api: &DashboardApi,
    buttons: &mut ActionButtons,
    command: Command,
) -> Option<CsvExport> {
    match command {
        Command::Pause => {
            let label = ops::toggle_realtime(ctx);
            tracing::info!(label, "Realtime toggled");
        }
        Command::Resolve(id) => {
            ops::resolve_alert(ctx, api, &mut buttons.resolve, id).await;
        }
        Command::ResolveAll => {
            ops::resolve_all_alerts(ctx, api, &mut buttons.resolve).await;
        }
        Command::Analysis { force } => {
            ops::run_analysis(ctx, api, &mut buttons.analysis, force).await;
        }
        Command::ExportAlerts => return ops::export_alerts(ctx, Utc::now()),
        Command::ExportData => return ops::export_readings(ctx, Utc::now()),
        Command::ClearLogs => ops::clear_logs(ctx),
        Command::Backup => {
            ops::backup_database(ctx, &mut buttons.backup, Utc::now()).await;
        }
        Command::Reset => ops::reset_system(ctx, &mut buttons.reset).await,
        Command::ClearOld => ops::clear_old_data(ctx, &mut buttons.clear_old).await,
        Command::Restart => ops::restart_simulator(ctx, &mut buttons.restart).await,
        Command::SaveWeibull => ops::save_weibull_parameters(ctx),
        Command::TestReading(value) => {
            ops::send_test_reading(ctx, api, &mut buttons.test, value).await;
        }
        Command::Anomaly { sensor, kind } => {
            let form = ForceAnomalyForm {
                sensor_name: sensor,
                anomaly_type: kind,
            };
            ops::force_anomaly(ctx, api, &mut buttons.anomaly, &form).await;
        }
    }
    None
}

/// Consume server events, connection state changes, and typed commands
/// until the live task ends or the console is cancelled.
pub async fn run(
    ctx: &mut AppContext,
    mut dispatcher: Dispatcher<AppContext>,
    api: &DashboardApi,
    mut events: mpsc::Receiver<ServerEvent>,
    mut state: watch::Receiver<ConnectionState>,
    mut commands: mpsc::Receiver<String>,
    cancel: CancellationToken,
) {
    let mut buttons = ActionButtons::new();
    // Input closing (stdin EOF) stops command handling without ending
    // the event loop.
    let mut commands_open = true;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            line = commands.recv(), if commands_open => {
                match line {
                    Some(line) => match Command::parse(&line) {
                        Some(command) => {
                            if let Some(export) =
                                handle_command(ctx, api, &mut buttons, command).await
                            {
                                match tokio::fs::write(&export.filename, &export.content).await {
                                    Ok(()) => {
                                        tracing::info!(file = %export.filename, "Export written");
                                    }
                                    Err(e) => {
                                        tracing::warn!(error = %e, file = %export.filename, "Export write failed");
                                    }
                                }
                            }
                        }
                        None => tracing::warn!(line = %line, "Unknown command"),
                    },
                    None => commands_open = false,
                }
            }
            changed = state.changed() => {
                if changed.is_ok() {
                    let current = *state.borrow_and_update();
                    ctx.apply_connection_state(current);
                    if current == ConnectionState::Lost {
                        return;
                    }
                }
            }
            event = events.recv() => {
                match event {
                    Some(event) => dispatcher.dispatch(ctx, &event),
                    None => {
                        // Live task is gone; pick up its final state.
                        let current = *state.borrow();
                        ctx.apply_connection_state(current);
                        return;
                    }
                }
            }
        }
    }
}
