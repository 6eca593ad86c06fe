//! Seating preference handlers: the ranked/unranked board and wholesale save.

use crate::{
    core::seating,
    errors::Result,
    web::{AppState, extract::CurrentReservation},
};
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

/// A wholesale replacement of the caller's ranked list.
#[derive(Debug, Deserialize)]
pub struct SaveSeatingRequest {
    /// Other reservations' ids in preference order; may be partial or empty
    pub ranked_ids: Vec<i64>,
}

/// `GET /api/seating` - every other reservation, partitioned into ranked
/// (in stored order, 1-based ranks) and unranked.
pub async fn board(
    State(state): State<AppState>,
    CurrentReservation(current): CurrentReservation,
) -> Result<Response> {
    let board = seating::build_seating_board(&state.db, current.id).await?;
    Ok(Json(board).into_response())
}

/// `PUT /api/seating` - replace the stored ranking wholesale.
pub async fn save(
    State(state): State<AppState>,
    CurrentReservation(current): CurrentReservation,
    Json(request): Json<SaveSeatingRequest>,
) -> Result<Response> {
    let saved = seating::save_preferences(&state.db, current.id, &request.ranked_ids).await?;
    Ok(Json(json!({
        "status": "saved",
        "ranked_ids": seating::decode_ranked_ids(&saved.ranked_ids),
    }))
    .into_response())
}
