use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use campaign_insights::activity::{ActivityLevel, ActivitySource};
use campaign_insights::config::{CliArgs, InsightsConfig};
use campaign_insights::server;
use campaign_insights::settings::{load_settings, save_settings, PersistentSettings};
use campaign_insights::state::{AppState, SharedState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // Held until exit so buffered file output is flushed
    let _log_guard = init_tracing(args.log_dir.as_deref())?;

    info!("Starting campaign-insights v{}", env!("CARGO_PKG_VERSION"));

    let settings_path = args
        .settings_file
        .clone()
        .unwrap_or_else(campaign_insights::config::default_settings_path);
    let settings = load_settings(&settings_path);

    let config = InsightsConfig::from_args(args, &settings);
    if !settings_path.exists() {
        save_settings(&settings_path, &effective_settings(&config));
        info!("Wrote default settings to {:?}", settings_path);
    }

    info!("Model: {}", config.gateway.model);
    info!("Refresh interval: {}s", config.refresh_interval.as_secs());
    if config.gateway.api_key.is_empty() {
        warn!("No API key configured (INSIGHTS_API_KEY); insights will fall back");
    }

    let port = config.port;
    let state: SharedState = Arc::new(AppState::new(config)?);

    state
        .activity
        .emit(
            ActivitySource::Server,
            ActivityLevel::Info,
            format!("Engine starting on port {}", port),
        )
        .await;

    state.scheduler.start();

    let router = server::build_router(state.clone());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Listening on http://0.0.0.0:{}", port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(state.clone()))
        .await?;

    info!("Shutting down");
    state.scheduler.stop();

    Ok(())
}

fn init_tracing(log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "campaign_insights=info,tower_http=info".into())
    };

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, "campaign-insights.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter()).init();
            Ok(None)
        }
    }
}

fn effective_settings(config: &InsightsConfig) -> PersistentSettings {
    PersistentSettings {
        model: Some(config.gateway.model.clone()),
        refresh_interval_secs: Some(config.refresh_interval.as_secs()),
        business_hours_start: Some(config.business_hours.start_hour),
        business_hours_end: Some(config.business_hours.end_hour),
    }
}

async fn shutdown_signal(state: SharedState) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler the server runs until the process is killed
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }

    info!("Received shutdown signal");
    let _ = state.shutdown_tx.send(());
    state
        .activity
        .emit(
            ActivitySource::Server,
            ActivityLevel::Info,
            "Shutdown signal received",
        )
        .await;
}
