//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod guest;
pub mod reservation;
pub mod seating_preference;

// Re-export specific types to avoid conflicts
pub use guest::{Column as GuestColumn, Entity as Guest, Model as GuestModel};
pub use reservation::{
    Column as ReservationColumn, Entity as Reservation, Model as ReservationModel,
};
pub use seating_preference::{
    Column as SeatingPreferenceColumn, Entity as SeatingPreference, Model as SeatingPreferenceModel,
};
