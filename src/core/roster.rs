//! Guest roster management - the 1-or-2 guest records under a reservation.
//!
//! The roster invariants: slot numbers come only from {1, 2}, slot 1 is never
//! vacant while slot 2 is occupied, and slot 2 exists only while the party
//! size is 2. Removal renumbers and forces the party size back to 1 in the
//! same transaction, so the invariants hold even under partial failure.

use crate::{
    config::EventConfig,
    core::payment::PaymentStatus,
    entities::{Guest, Reservation, guest, reservation},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};

/// Submitted details for one guest slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuestDetails {
    /// Guest first name
    pub first_name: String,
    /// Guest last name
    pub last_name: String,
    /// Optional title or rank
    #[serde(default)]
    pub title: Option<String>,
    /// Free-text allergy notes
    #[serde(default)]
    pub allergy_notes: Option<String>,
    /// Free-text fun fact
    #[serde(default)]
    pub fun_fact: Option<String>,
}

/// Result of an add-guest-slot request.
#[derive(Debug)]
pub enum AddSlotOutcome {
    /// Party size was raised to 2
    Added(reservation::Model),
    /// The reservation already had 2 guests; informational no-op
    AlreadyFull,
}

/// A reservation's guests, ordered by slot ascending.
pub async fn get_roster(
    db: &DatabaseConnection,
    reservation_id: i64,
) -> Result<Vec<guest::Model>> {
    Guest::find()
        .filter(guest::Column::ReservationId.eq(reservation_id))
        .order_by_asc(guest::Column::Slot)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds the guest occupying a slot, if any.
pub async fn get_guest_by_slot(
    db: &DatabaseConnection,
    reservation_id: i64,
    slot: i32,
) -> Result<Option<guest::Model>> {
    Guest::find()
        .filter(guest::Column::ReservationId.eq(reservation_id))
        .filter(guest::Column::Slot.eq(slot))
        .one(db)
        .await
        .map_err(Into::into)
}

/// All guests across all reservations, ordered by (reservation, slot).
/// Backs the aggregate guest-list view.
pub async fn get_guest_list(db: &DatabaseConnection) -> Result<Vec<guest::Model>> {
    Guest::find()
        .order_by_asc(guest::Column::ReservationId)
        .order_by_asc(guest::Column::Slot)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates or overwrites the slot-1 guest. Always allowed.
pub async fn upsert_guest_one(
    db: &DatabaseConnection,
    event: &EventConfig,
    reservation_id: i64,
    details: &GuestDetails,
) -> Result<guest::Model> {
    if details.first_name.trim().is_empty() || details.last_name.trim().is_empty() {
        return Err(Error::validation(
            "Guest 1 needs both a first and last name",
        ));
    }
    require_reservation(db, reservation_id).await?;
    upsert_slot(db, event, reservation_id, 1, details).await
}

/// Creates or overwrites the slot-2 guest.
///
/// Allowed only while the party size is 2. A submission missing either name
/// is a silent no-op that does NOT clear an existing slot 2.
pub async fn upsert_guest_two(
    db: &DatabaseConnection,
    event: &EventConfig,
    reservation_id: i64,
    details: &GuestDetails,
) -> Result<Option<guest::Model>> {
    let reservation = require_reservation(db, reservation_id).await?;
    if reservation.party_size != 2 {
        return Err(Error::invariant(
            "Your reservation is for 1 guest; add a guest slot first",
        ));
    }
    if details.first_name.trim().is_empty() || details.last_name.trim().is_empty() {
        return Ok(None);
    }
    upsert_slot(db, event, reservation_id, 2, details)
        .await
        .map(Some)
}

/// Removes the guest at `slot` and restores the roster invariants.
///
/// One transaction: delete the slot's record if present; if slot 1 was
/// removed while slot 2 exists, renumber slot 2 to slot 1; force the
/// reservation's party size to 1. Returns the updated reservation.
pub async fn remove_guest(
    db: &DatabaseConnection,
    reservation_id: i64,
    slot: i32,
) -> Result<reservation::Model> {
    if !(1..=2).contains(&slot) {
        return Err(Error::validation("Invalid guest selection"));
    }

    let txn = db.begin().await?;

    let reservation = Reservation::find_by_id(reservation_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("reservation"))?;

    let target = Guest::find()
        .filter(guest::Column::ReservationId.eq(reservation_id))
        .filter(guest::Column::Slot.eq(slot))
        .one(&txn)
        .await?;
    if let Some(target) = target {
        target.delete(&txn).await?;
    }

    // Slot 1 must never be vacant while slot 2 is occupied
    if slot == 1 {
        let slot_two = Guest::find()
            .filter(guest::Column::ReservationId.eq(reservation_id))
            .filter(guest::Column::Slot.eq(2))
            .one(&txn)
            .await?;
        if let Some(slot_two) = slot_two {
            let mut active: guest::ActiveModel = slot_two.into();
            active.slot = Set(1);
            active.updated_at = Set(chrono::Utc::now());
            active.update(&txn).await?;
        }
    }

    let mut active: reservation::ActiveModel = reservation.into();
    active.party_size = Set(1);
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Raises the party size from 1 to 2.
///
/// When the payment status is anything but the default, it is forced to the
/// needs-review flag in the same transaction so the admin sees that the paid
/// amount may now be wrong. Informational no-op when the party is already 2.
pub async fn add_guest_slot(
    db: &DatabaseConnection,
    reservation_id: i64,
) -> Result<AddSlotOutcome> {
    let txn = db.begin().await?;

    let reservation = Reservation::find_by_id(reservation_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("reservation"))?;

    if reservation.party_size >= 2 {
        return Ok(AddSlotOutcome::AlreadyFull);
    }

    let status = PaymentStatus::parse_label(&reservation.payment_status)?;
    let mut active: reservation::ActiveModel = reservation.into();
    active.party_size = Set(2);
    active.payment_status = Set(status.on_roster_grow().as_str().to_string());
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(AddSlotOutcome::Added(updated))
}

/// Splits a reservation's display name into a best-guess (first, last) pair
/// for prefilling the guest-1 form.
#[must_use]
pub fn split_display_name(name: &str) -> (String, String) {
    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.as_slice() {
        [] => (String::new(), String::new()),
        [only] => ((*only).to_string(), String::new()),
        [first, .., last] => ((*first).to_string(), (*last).to_string()),
    }
}

async fn require_reservation(
    db: &DatabaseConnection,
    reservation_id: i64,
) -> Result<reservation::Model> {
    Reservation::find_by_id(reservation_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("reservation"))
}

async fn upsert_slot(
    db: &DatabaseConnection,
    event: &EventConfig,
    reservation_id: i64,
    slot: i32,
    details: &GuestDetails,
) -> Result<guest::Model> {
    let now = chrono::Utc::now();
    let existing = get_guest_by_slot(db, reservation_id, slot).await?;

    match existing {
        Some(current) => {
            let mut active: guest::ActiveModel = current.into();
            active.first_name = Set(details.first_name.trim().to_string());
            active.last_name = Set(details.last_name.trim().to_string());
            active.title = Set(details.title.clone());
            active.meal = Set(event.meal.clone());
            active.allergy_notes = Set(details.allergy_notes.clone());
            active.fun_fact = Set(details.fun_fact.clone());
            active.updated_at = Set(now);
            active.update(db).await.map_err(Into::into)
        }
        None => {
            let model = guest::ActiveModel {
                reservation_id: Set(reservation_id),
                slot: Set(slot),
                first_name: Set(details.first_name.trim().to_string()),
                last_name: Set(details.last_name.trim().to_string()),
                title: Set(details.title.clone()),
                meal: Set(event.meal.clone()),
                allergy_notes: Set(details.allergy_notes.clone()),
                fun_fact: Set(details.fun_fact.clone()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            model.insert(db).await.map_err(Into::into)
        }
    }
}
