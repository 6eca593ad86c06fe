//! Configuration management: database connection, event settings, and the
//! assembled application configuration used at startup.

/// Database connection and schema creation
pub mod database;
/// Event settings loaded from config.toml
pub mod event;

pub use event::EventConfig;

use crate::errors::Result;
use tracing::info;

/// Fully-assembled application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Event settings from config.toml
    pub event: EventConfig,
    /// Database URL (`DATABASE_URL` or the default local `SQLite` file)
    pub database_url: String,
    /// Address the HTTP server binds to (`BIND_ADDR`, default 127.0.0.1:8080)
    pub bind_addr: String,
    /// Administrator password (`ADMIN_PASSWORD`)
    pub admin_password: String,
}

/// Loads the complete application configuration from config.toml and the
/// environment. Secrets stay in the environment; only event settings live in
/// the TOML file.
pub fn load_app_configuration() -> Result<AppConfig> {
    let event = event::load_default_config()?.event;
    info!(event_name = %event.event_name, "Loaded event configuration.");

    let database_url = database::get_database_url();
    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let admin_password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());

    Ok(AppConfig {
        event,
        database_url,
        bind_addr,
        admin_password,
    })
}
