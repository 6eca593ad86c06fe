//! Request extractors and cookie plumbing.
//!
//! The bearer-token cookie is the primary identity path: presenting a valid
//! token resolves the request to its reservation with no further lookup. The
//! admin gate is a stateless credential check injected into the two
//! admin-only handlers.

use crate::{
    core::identity,
    entities::reservation,
    errors::Error,
    web::AppState,
};
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{HeaderMap, HeaderName, header, request::Parts},
};

/// Name of the long-lived cookie carrying the reservation access token.
pub const RSVP_COOKIE: &str = "rsvp_token";

/// One year, the cookie lifetime.
const COOKIE_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 365;

/// Header name of the admin credential.
const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// The reservation resolved from the request's bearer-token cookie.
///
/// Handlers that operate on "my reservation" take this extractor; a missing
/// or stale token rejects with a benign not-found so the client falls back
/// to the explicit lookup flow.
pub struct CurrentReservation(pub reservation::Model);

impl FromRequestParts<AppState> for CurrentReservation {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = cookie_value(&parts.headers, RSVP_COOKIE)
            .ok_or_else(|| Error::not_found("reservation"))?;
        let reservation = identity::find_by_token(&state.db, &token)
            .await?
            .ok_or_else(|| Error::not_found("reservation"))?;
        Ok(Self(reservation))
    }
}

impl OptionalFromRequestParts<AppState> for CurrentReservation {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        let Some(token) = cookie_value(&parts.headers, RSVP_COOKIE) else {
            return Ok(None);
        };
        Ok(identity::find_by_token(&state.db, &token).await?.map(Self))
    }
}

/// Proof that the caller presented the administrator credential.
pub struct AdminAuth;

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let supplied = parts
            .headers
            .get(ADMIN_PASSWORD_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(Error::Unauthorized)?;
        if supplied != state.config.admin_password {
            return Err(Error::Unauthorized);
        }
        Ok(Self)
    }
}

/// Reads one cookie's value from the request headers.
#[must_use]
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

/// Response headers establishing the bearer-token cookie.
#[must_use]
pub fn set_rsvp_cookie(token: &str) -> [(HeaderName, String); 1] {
    [(
        header::SET_COOKIE,
        format!(
            "{RSVP_COOKIE}={token}; Max-Age={COOKIE_MAX_AGE_SECS}; Path=/; HttpOnly; SameSite=Lax"
        ),
    )]
}

/// Response headers clearing the bearer-token cookie.
#[must_use]
pub fn clear_rsvp_cookie() -> [(HeaderName, String); 1] {
    [(
        header::SET_COOKIE,
        format!("{RSVP_COOKIE}=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax"),
    )]
}
