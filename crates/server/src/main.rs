//! Booking agent entry point

use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use booking_agent_config::load_settings;
use booking_agent_server::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config_path = std::env::args().nth(1).map(PathBuf::from).or_else(|| {
        std::env::var("BOOKING_AGENT_CONFIG").ok().map(PathBuf::from)
    });

    let settings = load_settings(config_path.as_deref())?;
    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    let state = AppState::new(settings);
    let _cleanup_shutdown = state.sessions.start_cleanup_task();

    let router = create_router(state);

    tracing::info!("Booking agent listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,booking_agent=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
