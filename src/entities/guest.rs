//! Guest entity - one named individual under a reservation.
//!
//! Guests occupy slot 1 or slot 2 of their owning reservation. Slot 1 is never
//! vacant while slot 2 is occupied; the roster manager renumbers on removal.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Guest database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guests")]
pub struct Model {
    /// Unique identifier for the guest record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the reservation this guest belongs to
    pub reservation_id: i64,
    /// Slot number within the reservation, 1 or 2
    pub slot: i32,
    /// Guest first name
    pub first_name: String,
    /// Guest last name
    pub last_name: String,
    /// Optional title or rank
    pub title: Option<String>,
    /// Fixed meal category from the event configuration
    pub meal: String,
    /// Free-text allergy notes
    pub allergy_notes: Option<String>,
    /// Free-text fun fact
    pub fun_fact: Option<String>,
    /// When the guest record was created
    pub created_at: DateTimeUtc,
    /// When the guest record was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Guest and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each guest belongs to exactly one reservation
    #[sea_orm(
        belongs_to = "super::reservation::Entity",
        from = "Column::ReservationId",
        to = "super::reservation::Column::Id"
    )]
    Reservation,
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
