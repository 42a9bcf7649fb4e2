//! Bearwatch - turns text messages carrying a coordinate into bear sightings.
//!
//! # Overview
//!
//! A field detector that spots a bear sends a short message such as
//! `"Warning! Bear detected at coordinates: 45.602275,25.549736"`. Bearwatch
//! pulls the coordinate out of the text and, for every message that has one,
//! raises an alert, records a marker and tells any open map about it.
//! Messages without a coordinate are dropped silently.
//!
//! ```text
//! text -> MessageIngestor -> parser -> SightingEvent -> SightingBus
//!                                                        |-> AlertDispatcher
//!                                                        |-> MarkerStore
//!                                                        `-> MapFeed
//! ```
//!
//! # Modules
//!
//! - [`parser`]: Coordinate extraction from free-form text
//! - [`model`]: Coordinates, sighting events, markers and HTTP bodies
//! - [`bus`]: Synchronous publish/subscribe with per-handler failure isolation
//! - [`alert`]: Notifications, toasts and the surfaces that show them
//! - [`markers`]: Append-only marker store
//! - [`map`]: Location feed for map observers
//! - [`ingest`]: Per-message entry point
//! - [`api`]: HTTP handlers
//! - [`config`]: Environment configuration

pub mod alert;
pub mod api;
pub mod bus;
pub mod config;
pub mod error;
pub mod ingest;
pub mod map;
pub mod markers;
pub mod model;
pub mod parser;
