//! User-triggered operations: alert resolution, analyses, exports,
//! and the administrative actions of the configuration page.

use std::convert::Infallible;
use std::time::Duration;

use chrono::Utc;

use fieldsense_client::api::DashboardApi;
use fieldsense_core::alert::Alert;
use fieldsense_core::csv::{self, CsvExport, ReadingRow};
use fieldsense_core::forms::{ForceAnomalyForm, ScheduleMaintenanceForm, ThresholdForm};
use fieldsense_core::types::{AlertId, Timestamp};
use fieldsense_ui::actions::{run_action, ActionButton, ActionMessages};
use fieldsense_ui::notify::Level;
use validator::Validate;

use crate::context::AppContext;

/// Simulated duration of a simulator restart or data cleanup.
const SHORT_ADMIN_DELAY: Duration = Duration::from_secs(2);
/// Simulated duration of a database backup or system reset.
const LONG_ADMIN_DELAY: Duration = Duration::from_secs(3);

/// Resolve one alert via the API, then drop it from the list.
///
/// Returns `true` when the alert was resolved. The list is only
/// touched after the server confirms; a failed request leaves it as
/// it was.
pub async fn resolve_alert(
    ctx: &mut AppContext,
    api: &DashboardApi,
    button: &mut ActionButton,
    id: AlertId,
) -> bool {
    let messages = ActionMessages::new(
        "Alerte résolue",
        "Une alerte a été résolue avec succès",
        "Erreur",
        "Erreur lors de la résolution de l'alerte",
    );

    let result = run_action(button, &mut ctx.notifications, &messages, api.resolve_alert(id)).await;
    match result {
        Some(Ok(())) => {
            ctx.alerts.resolve(id);
            true
        }
        _ => false,
    }
}

/// Resolve every active alert, one request per alert.
///
/// Returns the number of alerts actually resolved. An empty list only
/// produces an informational notification.
pub async fn resolve_all_alerts(
    ctx: &mut AppContext,
    api: &DashboardApi,
    button: &mut ActionButton,
) -> usize {
    let ids: Vec<AlertId> = ctx.alerts.alerts().map(|a| a.id).collect();
    if ids.is_empty() {
        ctx.notifications
            .info("Alertes", "Aucune alerte active à résoudre");
        return 0;
    }

    let mut resolved = 0;
    for id in ids {
        if resolve_alert(ctx, api, button, id).await {
            resolved += 1;
        }
    }
    resolved
}

/// Run the predictive analysis, optionally bypassing the schedule.
pub async fn run_analysis(
    ctx: &mut AppContext,
    api: &DashboardApi,
    button: &mut ActionButton,
    force: bool,
) {
    let messages = ActionMessages::new(
        "Analyse prédictive",
        "Analyse terminée",
        "Erreur",
        "Erreur lors de l'analyse prédictive",
    );

    let request = async {
        if force {
            api.force_predictive_analysis().await
        } else {
            api.run_predictive_analysis().await
        }
    };

    if let Some(Ok(outcome)) = run_action(button, &mut ctx.notifications, &messages, request).await
    {
        if let Some(message) = outcome.message {
            ctx.notifications.info("Analyse prédictive", message);
        }
    }
}

/// Inject a test anomaly. The form is validated before anything is
/// sent; a validation failure surfaces inline, not as a request error.
pub async fn force_anomaly(
    ctx: &mut AppContext,
    api: &DashboardApi,
    button: &mut ActionButton,
    form: &ForceAnomalyForm,
) -> bool {
    if let Err(e) = form.validate() {
        tracing::debug!(error = %e, "Invalid anomaly form");
        ctx.notifications
            .push("Formulaire invalide", e.to_string(), Level::Warning);
        return false;
    }

    let messages = ActionMessages::new(
        "Anomalie injectée",
        "L'anomalie de test a été envoyée",
        "Erreur",
        "Erreur lors de l'injection de l'anomalie",
    );
    matches!(
        run_action(button, &mut ctx.notifications, &messages, api.force_anomaly(form)).await,
        Some(Ok(()))
    )
}

/// Push a throwaway reading to check the ingest path end to end.
pub async fn send_test_reading(
    ctx: &mut AppContext,
    api: &DashboardApi,
    button: &mut ActionButton,
    value: f64,
) -> bool {
    let messages = ActionMessages::new(
        "Test envoyé",
        "La mesure de test a été acceptée",
        "Erreur",
        "Erreur lors de l'envoi de la mesure de test",
    );
    matches!(
        run_action(
            button,
            &mut ctx.notifications,
            &messages,
            api.post_test_reading(value, Utc::now()),
        )
        .await,
        Some(Ok(()))
    )
}

/// Apply a threshold edit from the configuration page.
///
/// Validation and acknowledgement only; the running threshold map is
/// fixed at startup, so edits take effect on the next launch.
pub fn update_threshold(ctx: &mut AppContext, form: &ThresholdForm) -> bool {
    if let Err(e) = form.validate() {
        ctx.notifications.push(
            "Formulaire invalide",
            e.to_string(),
            Level::Warning,
        );
        return false;
    }
    ctx.notifications.success(
        "Seuils sauvegardés",
        "Les seuils des capteurs ont été mis à jour",
    );
    ctx.logs
        .append(Utc::now(), "INFO", "Seuils des capteurs mis à jour");
    true
}

/// Record a scheduled maintenance entry. Validation only — the entry
/// lives client-side; the server learns about it through the next
/// predictive-analysis pass.
pub fn schedule_maintenance(
    ctx: &mut AppContext,
    form: &ScheduleMaintenanceForm,
    now: Timestamp,
) -> bool {
    if let Err(e) = form.validate_at(now) {
        ctx.notifications.push(
            "Formulaire invalide",
            e.to_string(),
            Level::Warning,
        );
        return false;
    }
    ctx.notifications
        .success("Maintenance", "Maintenance planifiée avec succès");
    true
}

/// Record a Weibull parameter edit from the configuration page.
///
/// Like threshold edits, this is acknowledgement only; the analysis
/// parameters live server-side.
pub fn save_weibull_parameters(ctx: &mut AppContext) {
    ctx.notifications.success(
        "Paramètres sauvegardés",
        "Les paramètres de Weibull ont été mis à jour",
    );
    ctx.logs
        .append(Utc::now(), "INFO", "Paramètres Weibull mis à jour");
}

/// Restart the HTTP simulator. Simulated locally: busy state for the
/// restart window, then acknowledgement.
pub async fn restart_simulator(ctx: &mut AppContext, button: &mut ActionButton) {
    let messages = ActionMessages::new(
        "Simulateur redémarré",
        "Le simulateur HTTP a été redémarré avec succès",
        "Erreur",
        "Erreur lors du redémarrage du simulateur",
    );
    let request = async {
        tokio::time::sleep(SHORT_ADMIN_DELAY).await;
        Ok::<(), Infallible>(())
    };
    if run_action(button, &mut ctx.notifications, &messages, request)
        .await
        .is_some()
    {
        ctx.logs
            .append(Utc::now(), "INFO", "Simulateur HTTP redémarré");
    }
}

/// Back up the database. Returns the backup filename,
/// `backup_<timestamp>.db` with `:` and `.` flattened to `-`.
pub async fn backup_database(
    ctx: &mut AppContext,
    button: &mut ActionButton,
    now: Timestamp,
) -> Option<String> {
    let filename = format!("backup_{}.db", now.to_rfc3339().replace([':', '.'], "-"));
    let messages = ActionMessages::new(
        "Sauvegarde créée",
        format!("Base de données sauvegardée: {filename}"),
        "Erreur",
        "Erreur lors de la sauvegarde",
    );
    let request = async {
        tokio::time::sleep(LONG_ADMIN_DELAY).await;
        Ok::<(), Infallible>(())
    };
    if run_action(button, &mut ctx.notifications, &messages, request)
        .await
        .is_some()
    {
        ctx.logs
            .append(Utc::now(), "INFO", &format!("Sauvegarde créée: {filename}"));
        Some(filename)
    } else {
        None
    }
}

/// Purge old readings from the server-side store.
pub async fn clear_old_data(ctx: &mut AppContext, button: &mut ActionButton) {
    let messages = ActionMessages::new(
        "Nettoyage terminé",
        "Les anciennes données ont été supprimées",
        "Erreur",
        "Erreur lors du nettoyage",
    );
    let request = async {
        tokio::time::sleep(SHORT_ADMIN_DELAY).await;
        Ok::<(), Infallible>(())
    };
    if run_action(button, &mut ctx.notifications, &messages, request)
        .await
        .is_some()
    {
        ctx.logs
            .append(Utc::now(), "INFO", "Anciennes données supprimées");
    }
}

/// Reset the whole system. Acknowledged with a warning, not a
/// success, and logged at WARNING.
pub async fn reset_system(ctx: &mut AppContext, button: &mut ActionButton) {
    let messages = ActionMessages::new(
        "Système réinitialisé",
        "Le système a été réinitialisé avec succès",
        "Erreur",
        "Erreur lors de la réinitialisation",
    )
    .with_success_level(Level::Warning);
    let request = async {
        tokio::time::sleep(LONG_ADMIN_DELAY).await;
        Ok::<(), Infallible>(())
    };
    if run_action(button, &mut ctx.notifications, &messages, request)
        .await
        .is_some()
    {
        ctx.logs
            .append(Utc::now(), "WARNING", "Système réinitialisé");
    }
}

/// Export the active alerts as CSV. `None` (plus an info notification)
/// when there is nothing to export.
pub fn export_alerts(ctx: &mut AppContext, now: Timestamp) -> Option<CsvExport> {
    let alerts: Vec<Alert> = ctx.alerts.alerts().cloned().collect();
    if alerts.is_empty() {
        ctx.notifications.info("Export", "Aucune alerte à exporter");
        return None;
    }
    Some(csv::export("alertes", now, &alerts))
}

/// Export the live data table as CSV.
pub fn export_readings(ctx: &mut AppContext, now: Timestamp) -> Option<CsvExport> {
    let rows: Vec<ReadingRow> = ctx
        .table
        .rows()
        .map(|r| ReadingRow {
            timestamp: r.timestamp,
            sensor_id: r.sensor_id.clone(),
            value: r.value,
            unit: r.unit.clone(),
        })
        .collect();
    if rows.is_empty() {
        ctx.notifications.info("Export", "Aucune donnée à exporter");
        return None;
    }
    Some(csv::export("monitoring", now, &rows))
}

/// Wipe the system log panel, leaving the cleared marker.
pub fn clear_logs(ctx: &mut AppContext) {
    ctx.logs.clear(Utc::now());
}

/// Toggle the real-time pause; returns the label for the toggle button.
pub fn toggle_realtime(ctx: &mut AppContext) -> &'static str {
    if ctx.toggle_paused() {
        "Reprendre"
    } else {
        "Pause"
    }
}
