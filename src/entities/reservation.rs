//! Reservation entity - one party's RSVP record.
//!
//! Each reservation carries a human-facing 6-character code, a unique
//! (lowercased) email, a party size of 1 or 2, a payment status label, and a
//! lazily-issued opaque access token for cookie-based resumption.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reservation database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    /// Unique identifier for the reservation
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-facing reservation code: 2 uppercase initials + 4 digits
    #[sea_orm(unique)]
    pub code: String,
    /// Display name as submitted on the RSVP form
    pub name: String,
    /// Contact email, always stored lowercase; unique across reservations
    #[sea_orm(unique)]
    pub email: String,
    /// Number of guests in the party, always 1 or 2
    pub party_size: i32,
    /// Payment status label, see `core::payment::PaymentStatus`
    pub payment_status: String,
    /// Opaque bearer token for cookie resumption; issued lazily, never rotated
    #[sea_orm(unique)]
    #[serde(skip_serializing, default)]
    pub access_token: Option<String>,
    /// When the reservation was first created
    pub created_at: DateTimeUtc,
    /// When the reservation was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Reservation and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One reservation owns up to two guest records
    #[sea_orm(has_many = "super::guest::Entity")]
    Guests,
    /// One reservation has at most one seating-preference record
    #[sea_orm(has_one = "super::seating_preference::Entity")]
    SeatingPreference,
}

impl Related<super::guest::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Guests.def()
    }
}

impl Related<super::seating_preference::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SeatingPreference.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
