//! Alert dispatching for detected sightings.
//!
//! Every sighting produces two user-facing effects: a persistent push-style
//! [`Notification`] and a short-lived [`Toast`]. Both are handed to one or
//! more [`NotificationSurface`]s. Display is best effort: surface failures
//! are logged and dropped, never retried, and never stop the sighting from
//! reaching the other bus handlers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};

use crate::bus::SightingHandler;
use crate::error::SightingError;
use crate::model::{Coordinate, SightingEvent};

/// Stable channel identity shared by all bear alerts.
pub const ALERT_CHANNEL_ID: &str = "bear_alert_channel";

/// Display name of the alert channel.
pub const ALERT_CHANNEL_NAME: &str = "Bear Alerts";

/// Description shown in the host's channel settings.
pub const ALERT_CHANNEL_DESCRIPTION: &str = "Notifications for bear sighting alerts";

/// Title of every sighting notification.
pub const ALERT_TITLE: &str = "Bear alert!";

/// Notification priority as understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Default,
    High,
}

/// What happens when the user taps a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Bring the map view to the foreground, replacing any existing task.
    FocusMapView,
}

/// A persistent push-style notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub channel_id: String,
    pub title: String,
    pub body: String,
    /// Distinguishes this notification from others on the same channel.
    pub identity: i32,
    pub importance: Importance,
    /// Dismiss the notification once tapped.
    pub auto_cancel: bool,
    pub on_tap: Activation,
}

/// A transient, non-blocking acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub text: String,
}

/// Body text shared by the notification and the toast.
///
/// Whole numbers keep their `.0`, so `45.0` reads as `45.0` and not `45`.
pub fn alert_body(coordinate: Coordinate) -> String {
    format!(
        "Bear detected at: {:?}, {:?}",
        coordinate.latitude, coordinate.longitude
    )
}

/// Host-side display of notifications and toasts.
///
/// Calls happen inside the bus fan-out, which holds the delivery lock, so
/// implementations should return quickly and push slow I/O onto a task the
/// way [`WebhookSurface`] does. The HTTP intake runs ingestion on the
/// blocking pool, so a slow surface delays other sightings but never stalls
/// the async runtime.
pub trait NotificationSurface: Send + Sync {
    /// Surface name, used in logs.
    fn name(&self) -> &str;

    /// Display a persistent notification.
    fn notify(&self, notification: &Notification) -> Result<(), SightingError>;

    /// Display a transient toast. Surfaces without one ignore it.
    fn toast(&self, _toast: &Toast) -> Result<(), SightingError> {
        Ok(())
    }
}

/// Surface that writes notifications to the log.
pub struct LogSurface;

impl NotificationSurface for LogSurface {
    fn name(&self) -> &str {
        "log"
    }

    fn notify(&self, notification: &Notification) -> Result<(), SightingError> {
        info!(
            channel = %notification.channel_id,
            identity = notification.identity,
            title = %notification.title,
            body = %notification.body,
            "Notification posted"
        );
        Ok(())
    }

    fn toast(&self, toast: &Toast) -> Result<(), SightingError> {
        info!(text = %toast.text, "Toast shown");
        Ok(())
    }
}

/// Surface that POSTs each notification as JSON to a webhook.
///
/// Delivery runs on a detached tokio task. A failed request is logged and
/// forgotten.
#[derive(Clone)]
pub struct WebhookSurface {
    client: reqwest::Client,
    url: String,
}

impl WebhookSurface {
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
        }
    }
}

impl NotificationSurface for WebhookSurface {
    fn name(&self) -> &str {
        "webhook"
    }

    fn notify(&self, notification: &Notification) -> Result<(), SightingError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| SightingError::surface("webhook", e.to_string()))?;

        let request = self.client.post(&self.url).json(notification);
        let identity = notification.identity;
        runtime.spawn(async move {
            let result = request
                .send()
                .await
                .and_then(reqwest::Response::error_for_status);
            if let Err(e) = result {
                warn!(identity, error = %SightingError::from(e), "Webhook notification not delivered");
            }
        });
        Ok(())
    }
}

/// Turns sightings into notifications and toasts.
pub struct AlertDispatcher {
    surfaces: Vec<Arc<dyn NotificationSurface>>,
    // Last issued identity as full, untruncated milliseconds.
    last_issued_millis: Mutex<Option<i64>>,
}

impl Default for AlertDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertDispatcher {
    /// Create a dispatcher with no surfaces.
    pub fn new() -> Self {
        Self {
            surfaces: Vec::new(),
            last_issued_millis: Mutex::new(None),
        }
    }

    /// Add a surface that receives every notification and toast.
    pub fn with_surface(mut self, surface: Arc<dyn NotificationSurface>) -> Self {
        self.surfaces.push(surface);
        self
    }

    /// Build the alert for `event` and show it on every surface.
    ///
    /// Returns the notification that was built, whether or not any surface
    /// managed to display it.
    pub fn dispatch(&self, event: &SightingEvent) -> Notification {
        let body = alert_body(event.coordinate());
        let toast = Toast { text: body.clone() };
        let notification = Notification {
            channel_id: ALERT_CHANNEL_ID.to_string(),
            title: ALERT_TITLE.to_string(),
            body,
            identity: self.next_identity(Utc::now()),
            importance: Importance::High,
            auto_cancel: true,
            on_tap: Activation::FocusMapView,
        };

        for surface in &self.surfaces {
            if let Err(e) = surface.toast(&toast) {
                warn!(surface = %surface.name(), error = %e, "Toast not shown");
            }
            if let Err(e) = surface.notify(&notification) {
                warn!(surface = %surface.name(), error = %e, "Notification not shown");
            }
        }

        info!(
            identity = notification.identity,
            latitude = event.coordinate().latitude,
            longitude = event.coordinate().longitude,
            "Sighting alert dispatched"
        );
        notification
    }

    /// Identity derived from the dispatch time in milliseconds, truncated to
    /// `i32`. The clock is compared in full `i64` milliseconds before
    /// truncation, so any forward jump is followed. When the clock has not
    /// moved past the last issued value (same millisecond or a step back),
    /// the last value plus one is used instead, so bursts never collapse
    /// into a single displayed notification.
    fn next_identity(&self, now: DateTime<Utc>) -> i32 {
        let now_millis = now.timestamp_millis();
        let mut last = self.last_issued_millis.lock();
        let issued = match *last {
            Some(previous) if now_millis <= previous => previous + 1,
            _ => now_millis,
        };
        *last = Some(issued);
        issued as i32
    }
}

impl SightingHandler for AlertDispatcher {
    fn name(&self) -> &str {
        "alert_dispatcher"
    }

    fn on_sighting(&self, event: &SightingEvent) -> Result<(), SightingError> {
        self.dispatch(event);
        Ok(())
    }
}
