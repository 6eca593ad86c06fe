//! Core business logic - framework-agnostic reservation operations.
//!
//! Each submodule owns one concern of the reservation lifecycle. All
//! functions are async, take a `DatabaseConnection`, and return the crate
//! [`Result`](crate::errors::Result); nothing in here renders output or
//! touches HTTP types.

/// Resolving requests to reservations: tokens, ids, explicit lookup
pub mod identity;
/// Payment status labels and transitions
pub mod payment;
/// Reservation lifecycle: create, merge decision, modify, delete
pub mod reservation;
/// Guest roster: slot upserts, removal with renumbering, slot addition
pub mod roster;
/// Seating preferences: ranked-list persistence and the display board
pub mod seating;
