//! Bearwatch - turns text messages carrying a coordinate into bear sightings.
//!
//! # API Endpoints
//!
//! - `POST /messages` - Ingest a decoded message
//! - `GET /markers` - All recorded markers
//! - `GET /markers/stream` - Live feed of new sighting locations
//! - `GET /health` - Health check

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use bearwatch::alert::{AlertDispatcher, LogSurface, WebhookSurface};
use bearwatch::api::{AppState, router};
use bearwatch::config::Config;
use bearwatch::map::MapFeed;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("bearwatch=info".parse()?))
        .init();

    let config = Config::from_env()?;
    info!(
        port = config.port,
        webhook = config.webhook_url.is_some(),
        feed_capacity = config.feed_capacity,
        "Starting bearwatch"
    );

    let mut dispatcher = AlertDispatcher::new().with_surface(Arc::new(LogSurface));
    if let Some(url) = &config.webhook_url {
        dispatcher = dispatcher.with_surface(Arc::new(WebhookSurface::new(url)));
        info!(url = %url, "Webhook notifications enabled");
    }

    let state = AppState::new(dispatcher, MapFeed::new(config.feed_capacity));
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "Bearwatch is listening");

    axum::serve(listener, app).await?;

    Ok(())
}
