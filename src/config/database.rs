//! Database configuration module.
//!
//! Handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions via
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! struct definitions, including the unique constraints on
//! `reservations.code`, `reservations.email`, and `reservations.access_token`.

use crate::entities::{Guest, Reservation, SeatingPreference};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the environment or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/rsvp_desk.sqlite".to_string())
}

/// Establishes a connection to the database at the given URL.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates any missing database tables from the entity definitions.
///
/// Runs at every startup, so table creation is `IF NOT EXISTS`.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut reservation_table = schema.create_table_from_entity(Reservation);
    let mut guest_table = schema.create_table_from_entity(Guest);
    let mut seating_preference_table = schema.create_table_from_entity(SeatingPreference);

    db.execute(builder.build(reservation_table.if_not_exists()))
        .await?;
    db.execute(builder.build(guest_table.if_not_exists())).await?;
    db.execute(builder.build(seating_preference_table.if_not_exists()))
        .await?;

    Ok(())
}
