mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use chrono_tz::Tz;
use clap::Parser;
use routes::{health, run_pipeline};
use scoreviz_core::{ParseOptions, PipelineOptions, TimelinePolicy};
use state::PipelineState;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub(crate) const DEFAULT_BODY_LIMIT: usize = 16 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(author, version, about = "Basketball score history pipeline service", long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:3000")]
    bind: SocketAddr,

    /// IANA zone the Date and Start (ET) columns are written in
    #[arg(long, default_value = "America/New_York")]
    timezone: String,

    /// Which sides of a game appear in timeline snapshots (home-only, both-sides)
    #[arg(long, default_value = "both-sides")]
    timeline: TimelinePolicy,

    /// Requests that may wait for the worker before callers are held back
    #[arg(long, default_value_t = 16)]
    queue_depth: usize,

    /// Largest accepted request body, in bytes
    #[arg(long, default_value_t = DEFAULT_BODY_LIMIT)]
    max_body_bytes: usize,
}

pub struct AppState {
    pipeline_state: Arc<PipelineState>,
}

pub(crate) fn router(app_state: Arc<AppState>, body_limit: usize) -> Router {
    Router::new()
        .route("/pipeline", post(run_pipeline))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();
    let timezone: Tz = cli
        .timezone
        .parse()
        .map_err(|err| anyhow!("unknown timezone {}: {err}", cli.timezone))?;

    let options = PipelineOptions {
        parse: ParseOptions { timezone },
        timeline: cli.timeline,
    };
    let pipeline_state = PipelineState::start(options, cli.queue_depth);
    let app_state = Arc::new(AppState {
        pipeline_state: pipeline_state.clone(),
    });

    let listener = TcpListener::bind(cli.bind).await?;
    info!(
        address = %listener.local_addr()?,
        timezone = %timezone,
        timeline = ?cli.timeline,
        "listening"
    );
    axum::serve(listener, router(app_state, cli.max_body_bytes).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pipeline_state.shutdown().await?;
    info!("pipeline worker stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
