//! Identity & lookup - resolving "which reservation is this request about".
//!
//! Three resolution paths, in the priority the transport layer applies them:
//! an unguessable bearer token from a cookie, a numeric id carried by an
//! explicit workflow context, or a user-supplied lookup value matched against
//! the reservation code (uppercased) or email (lowercased). Matches are exact,
//! never fuzzy.

use crate::{
    entities::{Reservation, reservation},
    errors::Result,
};
use rand::{Rng, distributions::Alphanumeric};
use sea_orm::{Condition, Set, prelude::*};

/// Length of the opaque access token stored on the reservation.
const ACCESS_TOKEN_LEN: usize = 32;

/// Finds a reservation by its bearer access token, exact match only.
pub async fn find_by_token(
    db: &DatabaseConnection,
    token: &str,
) -> Result<Option<reservation::Model>> {
    Reservation::find()
        .filter(reservation::Column::AccessToken.eq(token))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a reservation by its numeric id.
pub async fn find_by_id(
    db: &DatabaseConnection,
    reservation_id: i64,
) -> Result<Option<reservation::Model>> {
    Reservation::find_by_id(reservation_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Resolves a user-supplied lookup value to a reservation.
///
/// The value is matched case-normalized to uppercase against the reservation
/// code OR lowercased against the email, in one query; the first matching row
/// wins. Returns `None` when nothing matches so the caller can fall back to
/// prompting again.
pub async fn lookup(db: &DatabaseConnection, value: &str) -> Result<Option<reservation::Model>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    Reservation::find()
        .filter(
            Condition::any()
                .add(reservation::Column::Code.eq(value.to_uppercase()))
                .add(reservation::Column::Email.eq(value.to_lowercase())),
        )
        .one(db)
        .await
        .map_err(Into::into)
}

/// Ensures the reservation has an access token, generating one lazily.
///
/// The token is issued once, the first time it is needed, and is permanently
/// fixed thereafter. Returns the (possibly updated) reservation together with
/// the token value for the transport layer to set as a cookie.
pub async fn ensure_access_token(
    db: &DatabaseConnection,
    reservation: reservation::Model,
) -> Result<(reservation::Model, String)> {
    if let Some(token) = reservation.access_token.clone() {
        return Ok((reservation, token));
    }

    let token = generate_access_token();
    let mut active: reservation::ActiveModel = reservation.into();
    active.access_token = Set(Some(token.clone()));
    let updated = active.update(db).await?;
    Ok((updated, token))
}

/// Generates an unguessable opaque token for cookie-based resumption.
fn generate_access_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ACCESS_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_token_issued_lazily_and_stable() -> Result<()> {
        let (db, reservation) = setup_with_reservation().await?;
        assert!(reservation.access_token.is_none());

        let (reservation, token) = ensure_access_token(&db, reservation).await?;
        assert_eq!(token.len(), ACCESS_TOKEN_LEN);
        assert_eq!(reservation.access_token.as_deref(), Some(token.as_str()));

        // A second call returns the same token, never a rotation
        let (_, token_again) = ensure_access_token(&db, reservation).await?;
        assert_eq!(token_again, token);

        Ok(())
    }

    #[tokio::test]
    async fn test_find_by_token() -> Result<()> {
        let (db, reservation) = setup_with_reservation().await?;
        let (reservation, token) = ensure_access_token(&db, reservation).await?;

        let found = find_by_token(&db, &token).await?;
        assert_eq!(found.unwrap().id, reservation.id);

        let missing = find_by_token(&db, "no-such-token").await?;
        assert!(missing.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_find_by_id() -> Result<()> {
        let (db, reservation) = setup_with_reservation().await?;

        let found = find_by_id(&db, reservation.id).await?;
        assert_eq!(found.unwrap().id, reservation.id);
        assert!(find_by_id(&db, reservation.id + 1).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_lookup_by_code_case_insensitive() -> Result<()> {
        let (db, reservation) = setup_with_reservation().await?;

        let found = lookup(&db, &reservation.code.to_lowercase()).await?;
        assert_eq!(found.unwrap().id, reservation.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_lookup_by_email_case_insensitive() -> Result<()> {
        let db = setup_test_db().await?;
        let reservation =
            create_test_reservation(&db, "Jane Smith", "jane.smith@example.edu").await?;

        let found = lookup(&db, "Jane.Smith@Example.EDU").await?;
        assert_eq!(found.unwrap().id, reservation.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_lookup_no_match() -> Result<()> {
        let (db, _) = setup_with_reservation().await?;

        assert!(lookup(&db, "ZZ0000").await?.is_none());
        assert!(lookup(&db, "").await?.is_none());
        assert!(lookup(&db, "   ").await?.is_none());

        Ok(())
    }
}
