//! HTTP surface for bearwatch.
//!
//! - **POST /messages**: hand a decoded message to the ingestor.
//! - **GET /markers**: snapshot of every marker plus where a map should centre.
//! - **GET /markers/stream**: server-sent events, one per new sighting.
//! - **GET /health**: liveness probe.
//!
//! The handlers are thin: all decisions live in the pipeline types.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use tokio_stream::{Stream, StreamExt, wrappers::BroadcastStream};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use crate::alert::AlertDispatcher;
use crate::bus::SightingBus;
use crate::ingest::{IngestOutcome, MessageIngestor};
use crate::map::{MapFeed, NEW_BEAR_LOCATION_TOPIC};
use crate::markers::MarkerStore;
use crate::model::{DEFAULT_MAP_CENTER, IngestResponse, MarkersResponse, MessageRequest};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub ingestor: MessageIngestor,
    pub markers: Arc<MarkerStore>,
    pub map_feed: MapFeed,
}

impl AppState {
    /// Wire a full pipeline.
    ///
    /// Subscription order is alert dispatcher, marker store, map feed, so an
    /// alert is raised before the marker lands and observers hear last.
    pub fn new(dispatcher: AlertDispatcher, map_feed: MapFeed) -> Self {
        let bus = Arc::new(SightingBus::new());
        let markers = Arc::new(MarkerStore::new());

        bus.subscribe(Arc::new(dispatcher));
        bus.subscribe(markers.clone());
        bus.subscribe(Arc::new(map_feed.clone()));

        Self {
            ingestor: MessageIngestor::new(bus),
            markers,
            map_feed,
        }
    }
}

/// Build the router with all routes and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/messages", post(post_message))
        .route("/markers", get(get_markers))
        .route("/markers/stream", get(stream_markers))
        .route("/health", get(health_check))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// POST /messages - Ingest one message.
///
/// # Request Body
///
/// ```json
/// { "text": "Location: 45.602275, 25.549736" }
/// ```
///
/// # Response
///
/// `201 Created` with `{"status": "sighting", "event": {...}}` when a
/// coordinate was found, otherwise `200 OK` with `{"status": "dropped"}`.
///
/// Ingestion fans out synchronously to every bus handler, so it runs on the
/// blocking pool rather than on a runtime worker.
#[instrument(skip_all)]
pub async fn post_message(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> Result<(StatusCode, Json<IngestResponse>), StatusCode> {
    let ingestor = state.ingestor.clone();
    let outcome = tokio::task::spawn_blocking(move || ingestor.ingest(&request.text))
        .await
        .map_err(|e| {
            warn!(error = %e, "Ingest task failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(match outcome {
        IngestOutcome::Sighting(event) => {
            (StatusCode::CREATED, Json(IngestResponse::Sighting { event }))
        }
        IngestOutcome::Dropped => (StatusCode::OK, Json(IngestResponse::Dropped)),
    })
}

/// GET /markers - All markers in detection order.
///
/// # Response
///
/// ```json
/// {
///     "center": { "latitude": 45.602275, "longitude": 25.549736 },
///     "markers": [
///         {
///             "coordinate": { "latitude": 45.602275, "longitude": 25.549736 },
///             "label": "Bear alert!",
///             "created_at": "2024-01-15T10:30:00Z"
///         }
///     ]
/// }
/// ```
#[instrument(skip_all)]
pub async fn get_markers(State(state): State<AppState>) -> Json<MarkersResponse> {
    let markers = state.markers.all();
    let center = markers
        .last()
        .map_or(DEFAULT_MAP_CENTER, |marker| marker.coordinate);

    info!(marker_count = markers.len(), "Markers queried");
    Json(MarkersResponse { center, markers })
}

/// GET /markers/stream - Server-sent events for new sightings.
///
/// Each event is named `NEW_BEAR_LOCATION` and carries
/// `{"latitude": .., "longitude": ..}`. Observers that fall too far behind
/// skip the missed updates and keep streaming.
#[instrument(skip_all)]
pub async fn stream_markers(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("Map observer connected");

    let stream = BroadcastStream::new(state.map_feed.subscribe()).filter_map(|update| {
        match update {
            Ok(update) => Event::default()
                .event(NEW_BEAR_LOCATION_TOPIC)
                .json_data(update)
                .ok()
                .map(Ok),
            Err(e) => {
                warn!(error = %e, "Map observer lagged");
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// GET /health - Simple health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}
