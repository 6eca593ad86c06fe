//! Shared test utilities for `RsvpDesk`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test reservations and guests with sensible defaults.

use crate::{
    config::EventConfig,
    core::reservation::{self, CreateOutcome},
    entities::{guest, reservation as reservation_entity},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, Set, prelude::ActiveModelTrait};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Event configuration with test defaults: no email-domain restriction and
/// the standard meal category.
#[must_use]
pub fn test_event_config() -> EventConfig {
    EventConfig {
        event_name: "Test Event".to_string(),
        required_email_domain: None,
        meal: "Buffet Dinner".to_string(),
    }
}

/// Creates a test reservation with a party of 1.
pub async fn create_test_reservation(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
) -> Result<reservation_entity::Model> {
    create_test_reservation_with_party(db, name, email, 1).await
}

/// Creates a test reservation with the given party size.
pub async fn create_test_reservation_with_party(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    party_size: i32,
) -> Result<reservation_entity::Model> {
    let event = test_event_config();
    match reservation::create_reservation(db, &event, name, email, party_size).await? {
        CreateOutcome::Created(model) => Ok(model),
        CreateOutcome::DuplicateEmail { .. } => Err(Error::invariant(
            "test fixture reused an email already present in the test database",
        )),
    }
}

/// Inserts a guest row directly, bypassing roster gating, for fixtures that
/// need a specific starting roster shape.
pub async fn create_test_guest(
    db: &DatabaseConnection,
    reservation_id: i64,
    slot: i32,
    first_name: &str,
    last_name: &str,
) -> Result<guest::Model> {
    let now = chrono::Utc::now();
    let model = guest::ActiveModel {
        reservation_id: Set(reservation_id),
        slot: Set(slot),
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        title: Set(None),
        meal: Set("Buffet Dinner".to_string()),
        allergy_notes: Set(None),
        fun_fact: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Sets up a complete test environment with one party-of-1 reservation.
/// Returns (db, reservation) for common test scenarios.
pub async fn setup_with_reservation()
-> Result<(DatabaseConnection, reservation_entity::Model)> {
    let db = setup_test_db().await?;
    let reservation = create_test_reservation(&db, "Test Guest", "test.guest@example.edu").await?;
    Ok((db, reservation))
}
