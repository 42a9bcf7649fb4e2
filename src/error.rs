//! Error types for the sighting pipeline.
//!
//! None of these ever reach the sender of a message. They exist so handlers
//! and notification surfaces can report what went wrong, and the bus or the
//! dispatcher can log it and keep consuming.

use thiserror::Error;

/// Failure raised by a bus handler or one of its collaborators.
#[derive(Debug, Error)]
pub enum SightingError {
    /// A subscriber could not process the event.
    #[error("handler '{handler}' failed: {reason}")]
    Handler { handler: String, reason: String },

    /// The host refused or could not display a notification.
    #[error("notification surface '{surface}' rejected delivery: {reason}")]
    Surface { surface: String, reason: String },

    /// The webhook endpoint could not be reached.
    #[error("webhook delivery failed: {0}")]
    Webhook(#[from] reqwest::Error),
}

impl SightingError {
    /// Shorthand for a handler failure.
    pub fn handler(handler: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Handler {
            handler: handler.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a surface failure.
    pub fn surface(surface: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Surface {
            surface: surface.into(),
            reason: reason.into(),
        }
    }
}
