//! HTTP layer - axum routes, shared state, and error-to-response mapping.
//!
//! This layer is deliberately thin: it resolves the current reservation from
//! the bearer-token cookie, maps request bodies onto core operations, and
//! serializes resolved domain objects back out. It renders nothing and holds
//! no session state; multi-step flows carry their context in the payloads.

/// Admin-gated handlers: responses list and payment tracking
pub mod admin;
/// Request extractors: current reservation, admin gate, cookie helpers
pub mod extract;
/// Guest roster handlers
pub mod guests;
/// Payment self-report handler
pub mod payment;
/// Reservation lifecycle handlers
pub mod rsvp;
/// Seating preference handlers
pub mod seating;

use crate::{
    config::AppConfig,
    entities::reservation,
    errors::{Error, Result},
};
use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Shared state available to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all operations
    pub db: DatabaseConnection,
    /// Assembled application configuration
    pub config: Arc<AppConfig>,
}

/// A reservation as exposed over the API.
///
/// The access token never leaves the server in a body; it travels only in
/// the cookie.
#[derive(Debug, Serialize)]
pub struct ReservationView {
    /// Numeric id, referenced by seating rankings
    pub id: i64,
    /// Human-facing reservation code
    pub code: String,
    /// Display name
    pub name: String,
    /// Contact email (lowercase)
    pub email: String,
    /// Party size, 1 or 2
    pub party_size: i32,
    /// Current payment status label
    pub payment_status: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<reservation::Model> for ReservationView {
    fn from(model: reservation::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            name: model.name,
            email: model.email,
            party_size: model.party_size,
            payment_status: model.payment_status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            Self::Invariant { .. } => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::Database(err) => {
                error!(error = %err, "database error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            Self::Config { .. } | Self::Io(_) => {
                error!(error = %self, "internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/rsvp",
            post(rsvp::create)
                .get(rsvp::show)
                .put(rsvp::modify)
                .delete(rsvp::destroy),
        )
        .route("/api/rsvp/lookup", post(rsvp::lookup))
        .route("/api/rsvp/merge", post(rsvp::merge))
        .route("/api/guests", get(guests::roster_view))
        .route(
            "/api/guests/{slot}",
            axum::routing::put(guests::upsert).delete(guests::remove),
        )
        .route("/api/guests/add-slot", post(guests::add_slot))
        .route("/api/guest-list", get(guests::guest_list))
        .route("/api/seating", get(seating::board).put(seating::save))
        .route("/api/payment", post(payment::self_report))
        .route("/api/admin/responses", get(admin::responses))
        .route("/api/admin/payment", axum::routing::put(admin::set_payment))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves the router until shutdown.
pub async fn serve(state: AppState) -> Result<()> {
    let addr = state.config.bind_addr.clone();
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "HTTP server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
