//! Entry point for inbound messages.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::bus::SightingBus;
use crate::model::SightingEvent;
use crate::parser;

/// Result of ingesting one message.
#[derive(Debug, Clone)]
pub enum IngestOutcome {
    /// A coordinate was found and the event was published.
    Sighting(SightingEvent),
    /// The message carried no coordinate. Not an error.
    Dropped,
}

impl IngestOutcome {
    pub fn is_dropped(&self) -> bool {
        matches!(self, IngestOutcome::Dropped)
    }
}

/// Runs parse, event construction and publish for each message.
///
/// Holds no state of its own beyond the bus, so one ingestor can be shared
/// across threads and tasks.
#[derive(Clone)]
pub struct MessageIngestor {
    bus: Arc<SightingBus>,
}

impl MessageIngestor {
    pub fn new(bus: Arc<SightingBus>) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &SightingBus {
        &self.bus
    }

    /// Ingest one plain-text message.
    pub fn ingest(&self, raw_text: &str) -> IngestOutcome {
        let Some(coordinate) = parser::parse(raw_text) else {
            debug!(length = raw_text.len(), "Message has no coordinate, dropped");
            return IngestOutcome::Dropped;
        };

        let event = SightingEvent::new(coordinate, Utc::now(), raw_text.to_string());
        info!(
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            "Sighting detected"
        );

        let report = self.bus.publish(&event);
        debug!(
            delivered = report.delivered,
            failed = report.failed,
            "Sighting fanned out"
        );
        IngestOutcome::Sighting(event)
    }
}
