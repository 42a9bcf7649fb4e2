//! Data models for bearwatch.
//!
//! A [`Coordinate`] is what the parser extracts, a [`SightingEvent`] is what
//! the ingestor publishes, and a [`Marker`] is what the store keeps. The
//! remaining types are request and response bodies for the HTTP surface.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label given to every marker placed on the map.
pub const MARKER_LABEL: &str = "Bear alert!";

/// Where the map centres itself before any sighting has been recorded.
pub const DEFAULT_MAP_CENTER: Coordinate = Coordinate {
    latitude: 45.602275,
    longitude: 25.549736,
};

/// A latitude/longitude pair in decimal degrees.
///
/// Values are carried exactly as parsed. Nothing clamps or rejects
/// out-of-range numbers; see [`Coordinate::is_in_range`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether latitude is within [-90, 90] and longitude within [-180, 180].
    pub fn is_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Formats as `lat,lng` with six decimals, the same shape field detectors send.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// Text a field detector sends when it spots a bear at `coordinate`.
pub fn report_text(coordinate: Coordinate) -> String {
    format!("Warning! Bear detected at coordinates: {coordinate}")
}

/// One detected sighting.
///
/// Built once per successful parse and never mutated afterwards; fields are
/// read through accessors only.
#[derive(Debug, Clone, Serialize)]
pub struct SightingEvent {
    coordinate: Coordinate,
    detected_at: DateTime<Utc>,
    source_text: String,
}

impl SightingEvent {
    pub fn new(coordinate: Coordinate, detected_at: DateTime<Utc>, source_text: String) -> Self {
        Self {
            coordinate,
            detected_at,
            source_text,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn detected_at(&self) -> DateTime<Utc> {
        self.detected_at
    }

    /// The message the coordinate was extracted from, kept for diagnostics.
    pub fn source_text(&self) -> &str {
        &self.source_text
    }
}

/// A renderable record of one sighting. Never removed once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub coordinate: Coordinate,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

impl Marker {
    pub fn from_event(event: &SightingEvent, created_at: DateTime<Utc>) -> Self {
        Self {
            coordinate: event.coordinate(),
            label: MARKER_LABEL.to_string(),
            created_at,
        }
    }
}

/// Payload handed to map observers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapUpdate {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinate> for MapUpdate {
    fn from(coordinate: Coordinate) -> Self {
        Self {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
        }
    }
}

/// Request body for POST /messages.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageRequest {
    /// Plain message text, already decoded from the transport envelope.
    pub text: String,
}

/// Response body for POST /messages.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum IngestResponse {
    /// A coordinate was found and the sighting was published.
    Sighting { event: SightingEvent },
    /// No coordinate in the message.
    Dropped,
}

/// Response body for GET /markers.
#[derive(Debug, Clone, Serialize)]
pub struct MarkersResponse {
    /// Where a map should centre: the newest marker, or the default centre.
    pub center: Coordinate,
    /// Every marker in detection order.
    pub markers: Vec<Marker>,
}
