//! Admin-gated handlers: the aggregate responses view and payment tracking.
//!
//! Both handlers take the [`AdminAuth`] extractor; the gate is a stateless
//! credential check, not part of the reservation state machine.

use crate::{
    core::{payment, payment::PaymentStatus, reservation},
    errors::Result,
    web::{AppState, ReservationView, extract::AdminAuth},
};
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

/// An admin payment-status update.
#[derive(Debug, Deserialize)]
pub struct SetPaymentRequest {
    /// Target reservation id
    pub reservation_id: i64,
    /// Any payment status label; the manual override bypasses transition order
    pub status: String,
}

/// `GET /api/admin/responses` - all reservations, newest first.
pub async fn responses(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> Result<Response> {
    let reservations = reservation::list_recent_first(&state.db).await?;
    let views: Vec<ReservationView> = reservations.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "responses": views })).into_response())
}

/// `PUT /api/admin/payment` - set any reservation's payment status directly.
pub async fn set_payment(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Json(request): Json<SetPaymentRequest>,
) -> Result<Response> {
    let status = PaymentStatus::parse_label(&request.status)?;
    let updated = payment::set_status(&state.db, request.reservation_id, status).await?;
    info!(code = %updated.code, status = %updated.payment_status, "payment status set by admin");
    Ok(Json(json!({
        "status": "updated",
        "reservation": ReservationView::from(updated),
    }))
    .into_response())
}
