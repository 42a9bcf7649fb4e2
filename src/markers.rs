//! Append-only store of sighting markers.
//!
//! The store lives for the lifetime of the process and only ever grows.
//! There is no deduplication: two reports of the same spot are two markers.

use chrono::Utc;
use parking_lot::RwLock;
use tracing::info;

use crate::bus::SightingHandler;
use crate::error::SightingError;
use crate::model::{Marker, SightingEvent};

/// Ordered collection of every marker created since startup.
#[derive(Debug, Default)]
pub struct MarkerStore {
    markers: RwLock<Vec<Marker>>,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a marker for `event` and append it. Always succeeds.
    pub fn append(&self, event: &SightingEvent) -> Marker {
        let marker = Marker::from_event(event, Utc::now());
        let mut markers = self.markers.write();
        markers.push(marker.clone());

        info!(
            latitude = marker.coordinate.latitude,
            longitude = marker.coordinate.longitude,
            total = markers.len(),
            "Marker recorded"
        );
        marker
    }

    /// Snapshot of all markers in insertion order.
    pub fn all(&self) -> Vec<Marker> {
        self.markers.read().clone()
    }

    /// The most recently appended marker.
    pub fn latest(&self) -> Option<Marker> {
        self.markers.read().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.markers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.read().is_empty()
    }
}

impl SightingHandler for MarkerStore {
    fn name(&self) -> &str {
        "marker_store"
    }

    fn on_sighting(&self, event: &SightingEvent) -> Result<(), SightingError> {
        self.append(event);
        Ok(())
    }
}
