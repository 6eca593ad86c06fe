//! Guest roster handlers: view, upsert by slot, remove, add slot, guest list.

use crate::{
    core::roster::{self, AddSlotOutcome, GuestDetails},
    errors::{Error, Result},
    web::{AppState, ReservationView, extract::CurrentReservation},
};
use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::info;

/// `GET /api/guests` - the current reservation's roster.
///
/// While slot 1 is empty the response carries a name-split prefill suggestion
/// for the guest-1 form, derived from the reservation's display name.
pub async fn roster_view(
    State(state): State<AppState>,
    CurrentReservation(current): CurrentReservation,
) -> Result<Response> {
    let guests = roster::get_roster(&state.db, current.id).await?;

    let prefill = if guests.iter().any(|g| g.slot == 1) {
        None
    } else {
        let (first_name, last_name) = roster::split_display_name(&current.name);
        Some(json!({ "first_name": first_name, "last_name": last_name }))
    };

    Ok(Json(json!({
        "party_size": current.party_size,
        "guests": guests,
        "prefill": prefill,
    }))
    .into_response())
}

/// `PUT /api/guests/{slot}` - create or overwrite one guest slot.
pub async fn upsert(
    State(state): State<AppState>,
    CurrentReservation(current): CurrentReservation,
    Path(slot): Path<i32>,
    Json(details): Json<GuestDetails>,
) -> Result<Response> {
    let event = &state.config.event;
    match slot {
        1 => {
            let guest = roster::upsert_guest_one(&state.db, event, current.id, &details).await?;
            Ok(Json(json!({ "status": "saved", "guest": guest })).into_response())
        }
        2 => match roster::upsert_guest_two(&state.db, event, current.id, &details).await? {
            Some(guest) => {
                Ok(Json(json!({ "status": "saved", "guest": guest })).into_response())
            }
            None => Ok(Json(json!({
                "status": "unchanged",
                "message": "Guest 2 needs both a first and last name; existing details were kept.",
            }))
            .into_response()),
        },
        _ => Err(Error::validation("Invalid guest selection")),
    }
}

/// `DELETE /api/guests/{slot}` - remove a guest and shrink the party to 1.
///
/// Also serves as the continuation of a merge or modify that reduced the
/// party size.
pub async fn remove(
    State(state): State<AppState>,
    CurrentReservation(current): CurrentReservation,
    Path(slot): Path<i32>,
) -> Result<Response> {
    let updated = roster::remove_guest(&state.db, current.id, slot).await?;
    info!(code = %updated.code, slot, "guest removed");
    Ok(Json(json!({
        "status": "removed",
        "message": format!("Guest {slot} removed. Reservation is now for 1 guest."),
        "reservation": ReservationView::from(updated),
    }))
    .into_response())
}

/// `POST /api/guests/add-slot` - raise the party size from 1 to 2.
pub async fn add_slot(
    State(state): State<AppState>,
    CurrentReservation(current): CurrentReservation,
) -> Result<Response> {
    match roster::add_guest_slot(&state.db, current.id).await? {
        AddSlotOutcome::Added(updated) => Ok(Json(json!({
            "status": "added",
            "message": "Guest added! Please provide their information.",
            "reservation": ReservationView::from(updated),
        }))
        .into_response()),
        AddSlotOutcome::AlreadyFull => Ok(Json(json!({
            "status": "already_full",
            "message": "Your reservation already has 2 guests.",
        }))
        .into_response()),
    }
}

/// `GET /api/guest-list` - all guests across all reservations.
pub async fn guest_list(State(state): State<AppState>) -> Result<Response> {
    let guests = roster::get_guest_list(&state.db).await?;
    Ok(Json(json!({ "guests": guests })).into_response())
}
