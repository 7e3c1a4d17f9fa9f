use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;

mod config;
mod dashboard;
mod data;
mod model;
mod pitch;

use config::Config;
use dashboard::AppState;
use model::{ShotModel, ThreatGrid};
use pitch::Pitch;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let pitch = Pitch {
        length: config.pitch_length,
        width: config.pitch_width,
    };
    let model = ShotModel {
        cap: config.score_cap,
        ..ShotModel::default()
    };
    let grid = ThreatGrid::default();
    info!(
        "Threat grid ready: {}x{} zones over a {:.0}x{:.0}yd pitch",
        grid.rows(),
        grid.cols(),
        pitch.length,
        pitch.width
    );

    let demo = data::synthetic::generate(
        &pitch,
        &model,
        &grid,
        config.demo_shots,
        config.demo_actions,
        config.demo_seed,
    )?;
    info!(
        "Synthetic dataset ready: {} shots, {} actions (seed {})",
        demo.shots.len(),
        demo.actions.len(),
        demo.seed
    );

    let app = dashboard::router(AppState {
        pitch,
        model,
        grid,
        demo,
    });
    let addr: SocketAddr = config.dashboard_addr.parse()?;
    info!("Demo dashboard listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve until shutdown; everything behind the router is immutable
    // shared state, so there is nothing else to drive
    axum::serve(listener, app).await?;

    Ok(())
}
