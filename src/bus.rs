//! In-process publish/subscribe for sighting events.
//!
//! The bus connects the ingestor to every consumer of a sighting: the alert
//! dispatcher, the marker store and the map feed. Delivery is synchronous and
//! serialized, so each handler sees one sighting fully before the next.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::error::SightingError;
use crate::model::SightingEvent;

/// A subscriber to the sighting bus.
pub trait SightingHandler: Send + Sync {
    /// Handler name, used in logs.
    fn name(&self) -> &str;

    /// Handle one sighting. Must not publish back onto the same bus.
    fn on_sighting(&self, event: &SightingEvent) -> Result<(), SightingError>;
}

/// Outcome of a single publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeliveryReport {
    /// Handlers that returned `Ok`.
    pub delivered: usize,
    /// Handlers that returned an error or panicked.
    pub failed: usize,
}

/// Fan-out point between message intake and sighting consumers.
#[derive(Default)]
pub struct SightingBus {
    handlers: RwLock<Vec<Arc<dyn SightingHandler>>>,
    // Held for the whole fan-out so two sightings never interleave.
    delivery: Mutex<()>,
}

impl SightingBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. It receives only events published from now on.
    pub fn subscribe(&self, handler: Arc<dyn SightingHandler>) {
        debug!(handler = %handler.name(), "Handler subscribed");
        self.handlers.write().push(handler);
    }

    /// Number of registered handlers.
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Deliver `event` to every handler in subscription order.
    ///
    /// A failing or panicking handler is logged and skipped; the rest still
    /// run and nothing is propagated to the caller.
    pub fn publish(&self, event: &SightingEvent) -> DeliveryReport {
        let _guard = self.delivery.lock();
        let handlers = self.handlers.read().clone();

        let mut report = DeliveryReport::default();
        for handler in &handlers {
            match catch_unwind(AssertUnwindSafe(|| handler.on_sighting(event))) {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(e)) => {
                    report.failed += 1;
                    warn!(
                        handler = %handler.name(),
                        error = %e,
                        "Handler failed to process sighting"
                    );
                }
                Err(_) => {
                    report.failed += 1;
                    warn!(handler = %handler.name(), "Handler panicked while processing sighting");
                }
            }
        }

        debug!(
            delivered = report.delivered,
            failed = report.failed,
            "Sighting published"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinate;
    use chrono::Utc;

    struct Recorder {
        name: String,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl SightingHandler for Recorder {
        fn name(&self) -> &str {
            &self.name
        }

        fn on_sighting(&self, _event: &SightingEvent) -> Result<(), SightingError> {
            self.log.lock().push(self.name.clone());
            Ok(())
        }
    }

    struct Failing;

    impl SightingHandler for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn on_sighting(&self, _event: &SightingEvent) -> Result<(), SightingError> {
            Err(SightingError::handler("failing", "boom"))
        }
    }

    struct Panicking;

    impl SightingHandler for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        fn on_sighting(&self, _event: &SightingEvent) -> Result<(), SightingError> {
            panic!("handler blew up");
        }
    }

    fn recorder(name: &str, log: &Arc<Mutex<Vec<String>>>) -> Arc<dyn SightingHandler> {
        Arc::new(Recorder {
            name: name.to_string(),
            log: Arc::clone(log),
        })
    }

    fn test_event() -> SightingEvent {
        SightingEvent::new(Coordinate::new(45.0, 25.0), Utc::now(), "45.0,25.0".to_string())
    }

    #[test]
    fn test_publish_in_subscription_order() {
        let bus = SightingBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(recorder("a", &log));
        bus.subscribe(recorder("b", &log));
        bus.subscribe(recorder("c", &log));

        let report = bus.publish(&test_event());

        assert_eq!(report, DeliveryReport { delivered: 3, failed: 0 });
        assert_eq!(*log.lock(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_failure_does_not_stop_delivery() {
        let bus = SightingBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(Arc::new(Failing));
        bus.subscribe(recorder("second", &log));
        bus.subscribe(Arc::new(Panicking));
        bus.subscribe(recorder("fourth", &log));

        let report = bus.publish(&test_event());

        assert_eq!(report, DeliveryReport { delivered: 2, failed: 2 });
        assert_eq!(*log.lock(), vec!["second", "fourth"]);
    }

    #[test]
    fn test_late_subscriber_gets_no_replay() {
        let bus = SightingBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        bus.publish(&test_event());
        bus.subscribe(recorder("late", &log));
        assert!(log.lock().is_empty());

        bus.publish(&test_event());
        assert_eq!(*log.lock(), vec!["late"]);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = SightingBus::new();
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.publish(&test_event()), DeliveryReport::default());
    }
}
