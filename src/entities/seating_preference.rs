//! Seating-preference entity - a ranked ordering over other reservations.
//!
//! One row per ranking reservation. `ranked_ids` is a comma-delimited ordered
//! sequence of other reservations' ids; ids of since-deleted reservations are
//! tolerated and survive until the owner's next save.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Seating-preference database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "seating_preferences")]
pub struct Model {
    /// Unique identifier for the preference record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the reservation that owns this ranking; one row per reservation
    #[sea_orm(unique)]
    pub reservation_id: i64,
    /// Comma-delimited ordered sequence of other reservations' ids
    pub ranked_ids: String,
    /// When the preference record was created
    pub created_at: DateTimeUtc,
    /// When the preference record was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between SeatingPreference and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each preference record belongs to exactly one reservation
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
