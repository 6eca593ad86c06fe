//! Event configuration loading from config.toml
//!
//! The event section of config.toml carries the few per-event settings the
//! core needs: the event name, the institutional email domain RSVPs are
//! restricted to (optional), and the fixed meal category stamped on every
//! guest record.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// The `[event]` table
    pub event: EventConfig,
}

/// Per-event settings
#[derive(Debug, Deserialize, Clone)]
pub struct EventConfig {
    /// Display name of the event
    pub event_name: String,
    /// When set, RSVP emails must end with `@<domain>`
    #[serde(default)]
    pub required_email_domain: Option<String>,
    /// Fixed meal category written to every guest record
    #[serde(default = "default_meal")]
    pub meal: String,
}

fn default_meal() -> String {
    "Buffet Dinner".to_string()
}

/// Loads event configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML syntax is invalid,
/// or required fields are missing.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads event configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}
