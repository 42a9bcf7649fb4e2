//! Runtime configuration loaded from the environment.

use std::env;

use anyhow::Context;

use crate::map::DEFAULT_FEED_CAPACITY;

/// Default port if not specified via environment variable.
pub const DEFAULT_PORT: u16 = 3000;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Port the HTTP surface listens on (`BEARWATCH_PORT`).
    pub port: u16,

    /// Optional endpoint that receives every notification as JSON
    /// (`BEARWATCH_WEBHOOK_URL`).
    pub webhook_url: Option<String>,

    /// How many map updates a slow observer may lag behind
    /// (`BEARWATCH_FEED_CAPACITY`).
    pub feed_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            webhook_url: None,
            feed_capacity: DEFAULT_FEED_CAPACITY,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Unset or blank keys fall back to defaults; values that are set but
    /// unparseable are an error.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("BEARWATCH_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid BEARWATCH_PORT: {raw}"))?,
            None => defaults.port,
        };

        let feed_capacity = match get("BEARWATCH_FEED_CAPACITY") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid BEARWATCH_FEED_CAPACITY: {raw}"))?,
            None => defaults.feed_capacity,
        };

        Ok(Self {
            port,
            webhook_url: get("BEARWATCH_WEBHOOK_URL").map(|v| v.trim().to_string()),
            feed_capacity,
        })
    }
}
