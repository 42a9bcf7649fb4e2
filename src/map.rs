//! Feed of new sighting locations for map observers.
//!
//! Observers never touch the marker store directly. They subscribe here and
//! receive a [`MapUpdate`] per sighting; rendering and camera movement are
//! theirs to handle.

use tokio::sync::broadcast;
use tracing::debug;

use crate::bus::SightingHandler;
use crate::error::SightingError;
use crate::model::{MapUpdate, SightingEvent};

/// Topic name map updates are published under.
pub const NEW_BEAR_LOCATION_TOPIC: &str = "NEW_BEAR_LOCATION";

/// Default number of updates a slow observer may lag behind.
pub const DEFAULT_FEED_CAPACITY: usize = 256;

/// Bus handler that forwards each sighting's location to map observers.
#[derive(Clone)]
pub struct MapFeed {
    sender: broadcast::Sender<MapUpdate>,
}

impl Default for MapFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

impl MapFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to location updates published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<MapUpdate> {
        self.sender.subscribe()
    }

    pub fn observer_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl SightingHandler for MapFeed {
    fn name(&self) -> &str {
        "map_feed"
    }

    fn on_sighting(&self, event: &SightingEvent) -> Result<(), SightingError> {
        let update = MapUpdate::from(event.coordinate());
        // No observers is normal when no map is open.
        match self.sender.send(update) {
            Ok(observers) => debug!(
                topic = NEW_BEAR_LOCATION_TOPIC,
                observers, "Map update published"
            ),
            Err(_) => debug!(topic = NEW_BEAR_LOCATION_TOPIC, "No map observers"),
        }
        Ok(())
    }
}
