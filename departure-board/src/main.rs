use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use departure_board::config::{AppConfig, Settings};
use departure_board::display::{DisplaySink, TerminalSink, WatchSink};
use departure_board::resrobot::{MockResRobotClient, ResRobotClient};
use departure_board::scheduler::{Scheduler, TripProvider};
use departure_board::web::{AppState, create_router};

/// Config file used when neither an argument nor the environment names one.
const DEFAULT_CONFIG_PATH: &str = "config.json";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("DEPARTURE_BOARD_CONFIG").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let settings = match AppConfig::load(&path)
        .map(|config| config.with_api_key(std::env::var("RESROBOT_API_KEY").ok()))
        .and_then(AppConfig::validate)
    {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    info!(
        config = %path.display(),
        routes = settings.routes.len(),
        interval_secs = settings.scheduler.update_interval.as_secs(),
        "Configuration loaded"
    );

    let (watch_sink, board) = WatchSink::new();
    let sink = (TerminalSink::new(settings.display.clone()), watch_sink);

    if let Some(addr) = settings.listen {
        let state = AppState::new(board, settings.display.clone(), settings.language.as_str());
        tokio::spawn(serve(addr, state));
    }

    // Fixture mode for running without an API key
    if let Some(dir) = std::env::var_os("DEPARTURE_BOARD_MOCK_DIR") {
        match MockResRobotClient::new(&dir) {
            Ok(client) => {
                info!(routes = client.available_routes().len(), "Using mock trip data");
                run(client, sink, settings).await
            }
            Err(e) => {
                error!(error = %e, "Failed to load mock trip data");
                ExitCode::FAILURE
            }
        }
    } else {
        if settings.client.api_key.is_empty() {
            warn!("No API key set (apiKey or RESROBOT_API_KEY); requests will be rejected");
        }
        match ResRobotClient::new(settings.client.clone()) {
            Ok(client) => run(client, sink, settings).await,
            Err(e) => {
                error!(error = %e, "Failed to create ResRobot client");
                ExitCode::FAILURE
            }
        }
    }
}

async fn run<P: TripProvider, D: DisplaySink>(provider: P, sink: D, settings: Settings) -> ExitCode {
    let mut scheduler = Scheduler::new(provider, sink, settings.routes, settings.scheduler);
    scheduler.run().await;

    // Only reached when there is nothing to poll; keep serving the hint.
    if settings.listen.is_some() {
        std::future::pending::<()>().await;
    }
    ExitCode::SUCCESS
}

async fn serve(addr: SocketAddr, state: AppState) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "Failed to bind");
            return;
        }
    };

    info!("Departure board listening on http://{addr}");
    info!("  GET  /health          - Health check");
    info!("  GET  /departures      - Rows to draw");
    info!("  GET  /departures/raw  - Full published list");

    if let Err(e) = axum::serve(listener, create_router(state)).await {
        error!(error = %e, "Server stopped");
    }
}
