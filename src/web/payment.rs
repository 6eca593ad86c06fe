//! Payment self-report handler.

use crate::{
    core::{
        identity,
        payment::{self, PaymentMethod},
    },
    errors::{Error, Result},
    web::{AppState, extract::CurrentReservation},
};
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

/// A guest's self-reported payment method.
#[derive(Debug, Deserialize)]
pub struct SelfReportRequest {
    /// "cash" or "venmo"
    pub method: String,
    /// Fallback target when no cookie is presented; the id a prior lookup
    /// or create response handed to the client
    #[serde(default)]
    pub reservation_id: Option<i64>,
}

/// `POST /api/payment` - mark a reservation's payment as pending
/// confirmation for the reported method.
///
/// Resolution prefers the bearer-token cookie; without one, the explicit
/// `reservation_id` carried in the request is used.
pub async fn self_report(
    State(state): State<AppState>,
    current: Option<CurrentReservation>,
    Json(request): Json<SelfReportRequest>,
) -> Result<Response> {
    let model = match current {
        Some(CurrentReservation(model)) => model,
        None => {
            let id = request
                .reservation_id
                .ok_or_else(|| Error::not_found("reservation"))?;
            identity::find_by_id(&state.db, id)
                .await?
                .ok_or_else(|| Error::not_found("reservation"))?
        }
    };

    let method = PaymentMethod::parse(&request.method)?;
    let updated = payment::self_report(&state.db, model.id, method).await?;
    info!(code = %updated.code, status = %updated.payment_status, "payment self-reported");
    Ok(Json(json!({
        "status": "recorded",
        "message": "Thank you! Your payment has been marked as pending confirmation.",
        "payment_status": updated.payment_status,
    }))
    .into_response())
}
