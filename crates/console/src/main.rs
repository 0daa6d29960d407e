//! `fieldsense-console` -- terminal monitoring console.
//!
//! Connects to the FieldSense server, loads recent sensor history over
//! REST, then follows the live WebSocket event stream until Ctrl-C or
//! until the connection is lost for good. Lines typed on stdin run
//! operations: `pause`, `resolve <id>`, `resolve all`, `analysis
//! [force]`, `export alerts`, `export data`, `clear logs`, `clear old`,
//! `backup`, `reset`, `restart`, `weibull`, `test <value>`, and
//! `anomaly <sensor> <type>`.
//!
//! # Environment variables
//!
//! | Variable                   | Required | Default | Description                                  |
//! |----------------------------|----------|---------|----------------------------------------------|
//! | `FIELDSENSE_WS_URL`        | yes      | --      | WebSocket endpoint, e.g. `ws://host:5000/ws` |
//! | `FIELDSENSE_API_URL`       | yes      | --      | REST base URL, e.g. `http://host:5000`       |
//! | `FIELDSENSE_HISTORY_HOURS` | no       | `24`    | Hours of history loaded at startup           |
//! | `FIELDSENSE_THRESHOLDS`    | no       | --      | Path to a thresholds JSON file               |

use anyhow::Context;
use tokio::io::AsyncBufReadExt;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use fieldsense_client::api::DashboardApi;
use fieldsense_client::live::{run as run_live, ConnectionState, LiveClient};
use fieldsense_client::reconnect::ReconnectPolicy;
use fieldsense_console::{app, context::AppContext, render::TraceChart};
use fieldsense_core::sensor;
use fieldsense_core::threshold::ThresholdMap;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Hours of history loaded per sensor at startup.
const DEFAULT_HISTORY_HOURS: u32 = 24;

/// Built-in thresholds, used unless `FIELDSENSE_THRESHOLDS` points at
/// a file.
const DEFAULT_THRESHOLDS: &str = include_str!("../thresholds.json");

fn load_thresholds() -> anyhow::Result<ThresholdMap> {
    let raw = match std::env::var("FIELDSENSE_THRESHOLDS") {
        Ok(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read thresholds file {path}"))?,
        Err(_) => DEFAULT_THRESHOLDS.to_string(),
    };
    Ok(ThresholdMap::from_json(&raw)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fieldsense=info,fieldsense_console=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let ws_url = std::env::var("FIELDSENSE_WS_URL").unwrap_or_else(|_| {
        tracing::error!("FIELDSENSE_WS_URL environment variable is required");
        std::process::exit(1);
    });

    let api_url = std::env::var("FIELDSENSE_API_URL").unwrap_or_else(|_| {
        tracing::error!("FIELDSENSE_API_URL environment variable is required");
        std::process::exit(1);
    });

    let history_hours: u32 = std::env::var("FIELDSENSE_HISTORY_HOURS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_HISTORY_HOURS);

    let thresholds = load_thresholds()?;

    tracing::info!(
        ws_url = %ws_url,
        api_url = %api_url,
        history_hours,
        "Starting fieldsense-console",
    );

    let mut ctx = AppContext::new(thresholds);
    for info in sensor::SENSORS {
        ctx.charts.bind(info.id, Box::new(TraceChart::new()), &ctx.store);
    }

    let api = DashboardApi::new(api_url);
    app::load_initial_history(&mut ctx, &api, history_hours).await;

    match api.alerts_count().await {
        Ok(count) => tracing::info!(active_alerts = count.active_count, "Alert count loaded"),
        Err(e) => tracing::warn!(error = %e, "Alert count unavailable"),
    }

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown requested");
                cancel.cancel();
            }
        });
    }

    let (events_tx, events_rx) = mpsc::channel(256);
    let (state_tx, state_rx) = watch::channel(ConnectionState::Reconnecting { attempt: 0 });

    // Commands typed on stdin, one per line (e.g. `pause`,
    // `resolve all`, `backup`). EOF just stops command input.
    let (commands_tx, commands_rx) = mpsc::channel(16);
    tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if commands_tx.send(line).await.is_err() {
                return;
            }
        }
    });

    let live = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let client = LiveClient::new(ws_url);
            let policy = ReconnectPolicy::default();
            run_live(&client, &policy, events_tx, state_tx, cancel).await;
        })
    };

    app::run(
        &mut ctx,
        app::dispatcher(),
        &api,
        events_rx,
        state_rx,
        commands_rx,
        cancel.clone(),
    )
    .await;
    cancel.cancel();
    let _ = live.await;

    for notification in ctx.notifications.drain() {
        tracing::info!(
            level = notification.level.css_class(),
            title = %notification.title,
            message = %notification.message,
            "Pending notification",
        );
    }

    tracing::info!("fieldsense-console stopped");
    Ok(())
}
