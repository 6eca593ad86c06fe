//! Reservation lifecycle handlers: create, lookup, merge, modify, delete.

use crate::{
    core::{
        identity,
        reservation::{self, CreateOutcome, MergeDecision, MergeOutcome, PendingReservation},
        roster,
    },
    errors::{Error, Result},
    web::{
        AppState, ReservationView,
        extract::{self, CurrentReservation},
    },
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

/// An RSVP form submission.
#[derive(Debug, Deserialize)]
pub struct RsvpSubmission {
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Number of guests, 1 or 2
    pub party_size: i32,
}

/// An explicit lookup request.
#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    /// Reservation code or email address
    pub value: String,
}

/// The merge-decision follow-up to a duplicate-email response.
#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    /// The pending draft returned by the create call
    pub pending: PendingReservation,
    /// Update the existing reservation, or cancel the submission
    pub decision: MergeDecision,
}

/// `POST /api/rsvp` - submit a new RSVP.
///
/// A duplicate email comes back as 409 with the existing reservation and the
/// pending draft; the client resolves it via `POST /api/rsvp/merge`.
pub async fn create(
    State(state): State<AppState>,
    Json(submission): Json<RsvpSubmission>,
) -> Result<Response> {
    let outcome = reservation::create_reservation(
        &state.db,
        &state.config.event,
        &submission.name,
        &submission.email,
        submission.party_size,
    )
    .await?;

    match outcome {
        CreateOutcome::Created(model) => {
            let (model, token) = identity::ensure_access_token(&state.db, model).await?;
            info!(code = %model.code, "reservation created");
            Ok((
                StatusCode::CREATED,
                extract::set_rsvp_cookie(&token),
                Json(json!({
                    "status": "created",
                    "reservation": ReservationView::from(model),
                })),
            )
                .into_response())
        }
        CreateOutcome::DuplicateEmail { existing, pending } => Ok((
            StatusCode::CONFLICT,
            Json(json!({
                "status": "duplicate_email",
                "message": "This email already has a reservation. Update it, or cancel this submission.",
                "existing": ReservationView::from(existing),
                "pending": pending,
            })),
        )
            .into_response()),
    }
}

/// `POST /api/rsvp/merge` - resolve a pending duplicate-email draft.
pub async fn merge(
    State(state): State<AppState>,
    Json(request): Json<MergeRequest>,
) -> Result<Response> {
    match reservation::resolve_merge(&state.db, &request.pending, request.decision).await? {
        MergeOutcome::Updated {
            reservation: model,
            needs_guest_removal,
        } => {
            let (model, token) = identity::ensure_access_token(&state.db, model).await?;
            info!(code = %model.code, needs_guest_removal, "reservation merged");
            Ok((
                extract::set_rsvp_cookie(&token),
                Json(json!({
                    "status": "updated",
                    "needs_guest_removal": needs_guest_removal,
                    "reservation": ReservationView::from(model),
                })),
            )
                .into_response())
        }
        MergeOutcome::Cancelled => {
            Ok(Json(json!({ "status": "cancelled" })).into_response())
        }
    }
}

/// `GET /api/rsvp` - the caller's current reservation with its roster.
///
/// Resolving via the token re-establishes the cookie for another year.
pub async fn show(
    State(state): State<AppState>,
    CurrentReservation(model): CurrentReservation,
) -> Result<Response> {
    let guests = roster::get_roster(&state.db, model.id).await?;
    let (model, token) = identity::ensure_access_token(&state.db, model).await?;
    Ok((
        extract::set_rsvp_cookie(&token),
        Json(json!({
            "reservation": ReservationView::from(model),
            "guests": guests,
        })),
    )
        .into_response())
}

/// `POST /api/rsvp/lookup` - explicit lookup by reservation code or email.
///
/// A successful lookup establishes the bearer-token cookie for subsequent
/// requests.
pub async fn lookup(
    State(state): State<AppState>,
    Json(request): Json<LookupRequest>,
) -> Result<Response> {
    let model = identity::lookup(&state.db, &request.value)
        .await?
        .ok_or_else(|| Error::not_found("reservation"))?;

    let (model, token) = identity::ensure_access_token(&state.db, model).await?;
    Ok((
        extract::set_rsvp_cookie(&token),
        Json(json!({ "reservation": ReservationView::from(model) })),
    )
        .into_response())
}

/// `PUT /api/rsvp` - modify the current reservation in place.
pub async fn modify(
    State(state): State<AppState>,
    CurrentReservation(current): CurrentReservation,
    Json(submission): Json<RsvpSubmission>,
) -> Result<Response> {
    let outcome = reservation::modify_reservation(
        &state.db,
        &state.config.event,
        current.id,
        &submission.name,
        &submission.email,
        submission.party_size,
    )
    .await?;

    let (model, token) = identity::ensure_access_token(&state.db, outcome.reservation).await?;
    Ok((
        extract::set_rsvp_cookie(&token),
        Json(json!({
            "status": "updated",
            "needs_guest_removal": outcome.needs_guest_removal,
            "reservation": ReservationView::from(model),
        })),
    )
        .into_response())
}

/// `DELETE /api/rsvp` - delete the current reservation and clear the cookie.
pub async fn destroy(
    State(state): State<AppState>,
    CurrentReservation(current): CurrentReservation,
) -> Result<Response> {
    reservation::delete_reservation(&state.db, current.id).await?;
    info!(code = %current.code, "reservation deleted");
    Ok((
        extract::clear_rsvp_cookie(),
        Json(json!({ "status": "deleted" })),
    )
        .into_response())
}
