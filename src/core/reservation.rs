//! Reservation state machine - creation, duplicate-email merge, modify, delete.
//!
//! A reservation moves through {no-reservation, draft-pending-merge-decision,
//! active, deleted}. Submitting an email that already belongs to an active
//! reservation never creates a second row: the caller gets the existing record
//! plus a [`PendingReservation`] draft and must resolve the merge decision
//! explicitly. All multi-row writes happen inside one database transaction.

use crate::{
    config::EventConfig,
    core::payment::PaymentStatus,
    entities::{Guest, Reservation, SeatingPreference, guest, reservation, seating_preference},
    errors::{Error, Result},
};
use rand::Rng;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};

/// Attempts at drawing a non-colliding reservation code before giving up.
const CODE_ATTEMPTS: usize = 8;

/// A submitted RSVP held while the duplicate-email merge decision is pending.
///
/// This is the explicit workflow context for the two-step merge flow: the
/// create operation hands it back to the caller, and the caller returns it
/// with a [`MergeDecision`]. No server-side scratch state is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReservation {
    /// Submitted display name
    pub name: String,
    /// Submitted email, normalized to lowercase
    pub email: String,
    /// Submitted party size
    pub party_size: i32,
}

/// Result of a create attempt.
#[derive(Debug)]
pub enum CreateOutcome {
    /// A fresh reservation row was inserted
    Created(reservation::Model),
    /// The email already belongs to a reservation; nothing was written
    DuplicateEmail {
        /// The reservation that owns the email
        existing: reservation::Model,
        /// The submission, preserved for the merge decision
        pending: PendingReservation,
    },
}

/// The caller's answer to a duplicate-email draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeDecision {
    /// Apply the pending name and party size to the existing reservation
    UpdateExisting,
    /// Discard the pending submission with no state change
    Cancel,
}

/// Result of resolving a merge decision.
#[derive(Debug)]
pub enum MergeOutcome {
    /// The existing reservation was updated in place
    Updated {
        /// The reservation after the update
        reservation: reservation::Model,
        /// True when the update shrank the party size; the operation is
        /// complete only after the guest-removal flow runs
        needs_guest_removal: bool,
    },
    /// The pending submission was discarded
    Cancelled,
}

/// Result of an in-place modify.
#[derive(Debug)]
pub struct ModifyOutcome {
    /// The reservation after the update
    pub reservation: reservation::Model,
    /// True when the party size shrank while slot 2 was occupied
    pub needs_guest_removal: bool,
}

/// Normalizes an email for comparison and storage: trimmed and lowercased.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates an RSVP submission. The email is expected pre-normalized.
pub fn validate_submission(
    event: &EventConfig,
    name: &str,
    email: &str,
    party_size: i32,
) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("Please enter your name"));
    }
    if email.is_empty() {
        return Err(Error::validation("Please enter your email address"));
    }
    if !email.contains('@') {
        return Err(Error::validation("Please enter a valid email address"));
    }
    if let Some(domain) = &event.required_email_domain {
        if !email.ends_with(&format!("@{domain}")) {
            return Err(Error::validation(format!(
                "Email must be a @{domain} address"
            )));
        }
    }
    if !(1..=2).contains(&party_size) {
        return Err(Error::validation("Party size must be 1 or 2"));
    }
    Ok(())
}

/// Generates a 6-character reservation code from name initials + 4 random digits.
#[must_use]
pub fn generate_reservation_code(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    let initials = match parts.as_slice() {
        [first, second, ..] => first
            .chars()
            .take(1)
            .chain(second.chars().take(1))
            .collect::<String>()
            .to_uppercase(),
        [only] if only.chars().count() >= 2 => {
            only.chars().take(2).collect::<String>().to_uppercase()
        }
        _ => "XX".to_string(),
    };

    let digits: u16 = rand::thread_rng().gen_range(0..10_000);
    format!("{initials}{digits:04}")
}

/// Draws a reservation code not currently in use.
///
/// The code column is unique; collisions are regenerated a bounded number of
/// times before surfacing as a retryable validation failure.
async fn allocate_code(db: &DatabaseConnection, name: &str) -> Result<String> {
    for _ in 0..CODE_ATTEMPTS {
        let code = generate_reservation_code(name);
        let taken = Reservation::find()
            .filter(reservation::Column::Code.eq(code.as_str()))
            .one(db)
            .await?
            .is_some();
        if !taken {
            return Ok(code);
        }
    }
    Err(Error::validation(
        "Could not allocate a reservation code, please try again",
    ))
}

/// Finds a reservation by (normalized) email.
pub async fn find_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<reservation::Model>> {
    Reservation::find()
        .filter(reservation::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a reservation, or detects a duplicate email.
///
/// Email uniqueness is never violated: when the (case-insensitively matched)
/// email already has a reservation, no row is written and the submission comes
/// back as a [`PendingReservation`] draft for the merge decision.
pub async fn create_reservation(
    db: &DatabaseConnection,
    event: &EventConfig,
    name: &str,
    email: &str,
    party_size: i32,
) -> Result<CreateOutcome> {
    let email = normalize_email(email);
    validate_submission(event, name, &email, party_size)?;

    if let Some(existing) = find_by_email(db, &email).await? {
        return Ok(CreateOutcome::DuplicateEmail {
            existing,
            pending: PendingReservation {
                name: name.trim().to_string(),
                email,
                party_size,
            },
        });
    }

    let code = allocate_code(db, name).await?;
    let now = chrono::Utc::now();
    let model = reservation::ActiveModel {
        code: Set(code),
        name: Set(name.trim().to_string()),
        email: Set(email),
        party_size: Set(party_size),
        payment_status: Set(PaymentStatus::NotPaid.as_str().to_string()),
        access_token: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    Ok(CreateOutcome::Created(created))
}

/// Resolves a pending duplicate-email draft.
///
/// `UpdateExisting` applies the pending name and party size to the existing
/// reservation (the email matched, so it stays). A party-size decrease flags
/// `needs_guest_removal`; the guest-removal flow completes the operation.
/// `Cancel` discards the draft with no state change.
pub async fn resolve_merge(
    db: &DatabaseConnection,
    pending: &PendingReservation,
    decision: MergeDecision,
) -> Result<MergeOutcome> {
    if decision == MergeDecision::Cancel {
        return Ok(MergeOutcome::Cancelled);
    }

    let existing = find_by_email(db, &pending.email)
        .await?
        .ok_or_else(|| Error::not_found("reservation"))?;
    let old_party_size = existing.party_size;

    let mut active: reservation::ActiveModel = existing.into();
    active.name = Set(pending.name.clone());
    active.party_size = Set(pending.party_size);
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(db).await?;

    Ok(MergeOutcome::Updated {
        reservation: updated,
        needs_guest_removal: pending.party_size < old_party_size,
    })
}

/// Updates name, email, and party size of one known reservation in place.
///
/// Modify is unconditional write access to a single record and never routes
/// into the merge flow: an edited email colliding with a *different*
/// reservation is rejected as a validation failure, leaving both rows
/// untouched.
pub async fn modify_reservation(
    db: &DatabaseConnection,
    event: &EventConfig,
    reservation_id: i64,
    name: &str,
    email: &str,
    party_size: i32,
) -> Result<ModifyOutcome> {
    let email = normalize_email(email);
    validate_submission(event, name, &email, party_size)?;

    let existing = Reservation::find_by_id(reservation_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("reservation"))?;

    let collision = Reservation::find()
        .filter(reservation::Column::Email.eq(email.as_str()))
        .filter(reservation::Column::Id.ne(reservation_id))
        .one(db)
        .await?;
    if collision.is_some() {
        return Err(Error::validation(
            "That email already belongs to another reservation",
        ));
    }

    let old_party_size = existing.party_size;
    let mut active: reservation::ActiveModel = existing.into();
    active.name = Set(name.trim().to_string());
    active.email = Set(email);
    active.party_size = Set(party_size);
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(db).await?;

    let slot_two_occupied = Guest::find()
        .filter(guest::Column::ReservationId.eq(reservation_id))
        .filter(guest::Column::Slot.eq(2))
        .one(db)
        .await?
        .is_some();

    Ok(ModifyOutcome {
        reservation: updated,
        needs_guest_removal: party_size < old_party_size && slot_two_occupied,
    })
}

/// Deletes a reservation and everything it owns, in one transaction.
///
/// The cascade covers the reservation's guests and its seating-preference
/// row. Rankings stored by *other* reservations are not pruned; stale ids are
/// tolerated on read.
pub async fn delete_reservation(db: &DatabaseConnection, reservation_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let reservation = Reservation::find_by_id(reservation_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("reservation"))?;

    Guest::delete_many()
        .filter(guest::Column::ReservationId.eq(reservation_id))
        .exec(&txn)
        .await?;
    SeatingPreference::delete_many()
        .filter(seating_preference::Column::ReservationId.eq(reservation_id))
        .exec(&txn)
        .await?;
    reservation.delete(&txn).await?;

    txn.commit().await?;
    Ok(())
}

/// All reservations, newest first. Backs the admin responses view.
pub async fn list_recent_first(db: &DatabaseConnection) -> Result<Vec<reservation::Model>> {
    Reservation::find()
        .order_by_desc(reservation::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// All reservations ordered by name. Backs payment tracking and the seating
/// candidate order.
pub async fn list_by_name(db: &DatabaseConnection) -> Result<Vec<reservation::Model>> {
    Reservation::find()
        .order_by_asc(reservation::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::roster;
    use crate::test_utils::*;

    fn assert_code_format(code: &str) {
        assert_eq!(code.len(), 6, "code {code} should be 6 characters");
        let (initials, digits) = code.split_at(2);
        assert!(
            initials.chars().all(|c| c.is_uppercase()),
            "initials of {code} should be uppercase"
        );
        assert!(
            digits.chars().all(|c| c.is_ascii_digit()),
            "suffix of {code} should be 4 digits"
        );
    }

    #[test]
    fn test_code_from_two_word_name() {
        for _ in 0..20 {
            let code = generate_reservation_code("Jane Smith");
            assert_code_format(&code);
            assert!(code.starts_with("JS"));
        }
    }

    #[test]
    fn test_code_from_single_word_name() {
        let code = generate_reservation_code("Madonna");
        assert_code_format(&code);
        assert!(code.starts_with("MA"));
    }

    #[test]
    fn test_code_fallback_initials() {
        assert!(generate_reservation_code("X").starts_with("XX"));
        assert!(generate_reservation_code("").starts_with("XX"));
        assert!(generate_reservation_code("   ").starts_with("XX"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  Jane.Smith@Example.EDU "),
            "jane.smith@example.edu"
        );
    }

    #[test]
    fn test_validate_submission() {
        let event = test_event_config();
        assert!(validate_submission(&event, "Jane", "jane@example.edu", 1).is_ok());
        assert!(validate_submission(&event, "", "jane@example.edu", 1).is_err());
        assert!(validate_submission(&event, "Jane", "", 1).is_err());
        assert!(validate_submission(&event, "Jane", "not-an-email", 1).is_err());
        assert!(validate_submission(&event, "Jane", "jane@example.edu", 0).is_err());
        assert!(validate_submission(&event, "Jane", "jane@example.edu", 3).is_err());
    }

    #[test]
    fn test_validate_required_domain() {
        let mut event = test_event_config();
        event.required_email_domain = Some("example.edu".to_string());

        assert!(validate_submission(&event, "Jane", "jane@example.edu", 1).is_ok());
        let result = validate_submission(&event, "Jane", "jane@elsewhere.com", 1);
        assert!(matches!(result, Err(Error::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_reservation() -> Result<()> {
        let db = setup_test_db().await?;
        let event = test_event_config();

        let outcome =
            create_reservation(&db, &event, "Jane Smith", "Jane.Smith@Example.EDU", 2).await?;
        let CreateOutcome::Created(reservation) = outcome else {
            return Err(Error::invariant("expected a created reservation"));
        };

        assert_code_format(&reservation.code);
        assert!(reservation.code.starts_with("JS"));
        assert_eq!(reservation.email, "jane.smith@example.edu");
        assert_eq!(reservation.party_size, 2);
        assert_eq!(reservation.payment_status, "not paid");
        assert!(reservation.access_token.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_email_never_creates_second_row() -> Result<()> {
        let db = setup_test_db().await?;
        let event = test_event_config();

        create_test_reservation(&db, "Jane Smith", "jane.smith@example.edu").await?;

        // Case differs; the match is still a duplicate
        let outcome =
            create_reservation(&db, &event, "Janet Smythe", "JANE.SMITH@EXAMPLE.EDU", 2).await?;
        let CreateOutcome::DuplicateEmail { existing, pending } = outcome else {
            return Err(Error::invariant("expected a duplicate-email outcome"));
        };

        assert_eq!(existing.name, "Jane Smith");
        assert_eq!(pending.name, "Janet Smythe");
        assert_eq!(pending.email, "jane.smith@example.edu");
        assert_eq!(pending.party_size, 2);

        let all = Reservation::find().all(&db).await?;
        assert_eq!(all.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_merge_update_applies_pending() -> Result<()> {
        let db = setup_test_db().await?;

        let existing =
            create_test_reservation_with_party(&db, "Jane Smith", "jane@example.edu", 2).await?;

        let pending = PendingReservation {
            name: "Jane S. Smith".to_string(),
            email: "jane@example.edu".to_string(),
            party_size: 1,
        };
        let outcome = resolve_merge(&db, &pending, MergeDecision::UpdateExisting).await?;
        let MergeOutcome::Updated {
            reservation,
            needs_guest_removal,
        } = outcome
        else {
            return Err(Error::invariant("expected an updated outcome"));
        };

        assert_eq!(reservation.id, existing.id);
        assert_eq!(reservation.name, "Jane S. Smith");
        assert_eq!(reservation.party_size, 1);
        // Party size decreased, so the removal flow must complete the operation
        assert!(needs_guest_removal);

        let all = Reservation::find().all(&db).await?;
        assert_eq!(all.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_merge_without_shrink_needs_no_removal() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_reservation(&db, "Jane Smith", "jane@example.edu").await?;

        let pending = PendingReservation {
            name: "Jane Smith".to_string(),
            email: "jane@example.edu".to_string(),
            party_size: 2,
        };
        let outcome = resolve_merge(&db, &pending, MergeDecision::UpdateExisting).await?;
        let MergeOutcome::Updated {
            needs_guest_removal,
            ..
        } = outcome
        else {
            return Err(Error::invariant("expected an updated outcome"));
        };
        assert!(!needs_guest_removal);

        Ok(())
    }

    #[tokio::test]
    async fn test_merge_cancel_changes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let existing = create_test_reservation(&db, "Jane Smith", "jane@example.edu").await?;

        let pending = PendingReservation {
            name: "Someone Else".to_string(),
            email: "jane@example.edu".to_string(),
            party_size: 2,
        };
        let outcome = resolve_merge(&db, &pending, MergeDecision::Cancel).await?;
        assert!(matches!(outcome, MergeOutcome::Cancelled));

        let reloaded = Reservation::find_by_id(existing.id).one(&db).await?.unwrap();
        assert_eq!(reloaded, existing);

        Ok(())
    }

    #[tokio::test]
    async fn test_merge_with_vanished_reservation() -> Result<()> {
        let db = setup_test_db().await?;

        let pending = PendingReservation {
            name: "Jane".to_string(),
            email: "gone@example.edu".to_string(),
            party_size: 1,
        };
        let result = resolve_merge(&db, &pending, MergeDecision::UpdateExisting).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_modify_reservation() -> Result<()> {
        let db = setup_test_db().await?;
        let event = test_event_config();
        let reservation = create_test_reservation(&db, "Jane Smith", "jane@example.edu").await?;

        let outcome = modify_reservation(
            &db,
            &event,
            reservation.id,
            "Jane Doe",
            "Jane.Doe@Example.EDU",
            2,
        )
        .await?;

        assert_eq!(outcome.reservation.name, "Jane Doe");
        assert_eq!(outcome.reservation.email, "jane.doe@example.edu");
        assert_eq!(outcome.reservation.party_size, 2);
        assert!(!outcome.needs_guest_removal);
        // Code never changes on modify
        assert_eq!(outcome.reservation.code, reservation.code);

        Ok(())
    }

    #[tokio::test]
    async fn test_modify_rejects_foreign_email_collision() -> Result<()> {
        let db = setup_test_db().await?;
        let event = test_event_config();
        let jane = create_test_reservation(&db, "Jane Smith", "jane@example.edu").await?;
        let john = create_test_reservation(&db, "John Doe", "john@example.edu").await?;

        let result =
            modify_reservation(&db, &event, john.id, "John Doe", "jane@example.edu", 1).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        // Both rows untouched
        let jane_now = Reservation::find_by_id(jane.id).one(&db).await?.unwrap();
        let john_now = Reservation::find_by_id(john.id).one(&db).await?.unwrap();
        assert_eq!(jane_now.email, "jane@example.edu");
        assert_eq!(john_now.email, "john@example.edu");

        Ok(())
    }

    #[tokio::test]
    async fn test_modify_keeping_own_email_is_allowed() -> Result<()> {
        let db = setup_test_db().await?;
        let event = test_event_config();
        let reservation = create_test_reservation(&db, "Jane Smith", "jane@example.edu").await?;

        let outcome =
            modify_reservation(&db, &event, reservation.id, "Jane Smith", "jane@example.edu", 1)
                .await?;
        assert_eq!(outcome.reservation.email, "jane@example.edu");

        Ok(())
    }

    #[tokio::test]
    async fn test_modify_shrink_with_slot_two_flags_removal() -> Result<()> {
        let db = setup_test_db().await?;
        let event = test_event_config();
        let reservation =
            create_test_reservation_with_party(&db, "Jane Smith", "jane@example.edu", 2).await?;
        create_test_guest(&db, reservation.id, 1, "Jane", "Smith").await?;
        create_test_guest(&db, reservation.id, 2, "John", "Smith").await?;

        let outcome =
            modify_reservation(&db, &event, reservation.id, "Jane Smith", "jane@example.edu", 1)
                .await?;
        assert!(outcome.needs_guest_removal);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_cascades_to_guests_and_preferences() -> Result<()> {
        let db = setup_test_db().await?;
        let reservation =
            create_test_reservation_with_party(&db, "Jane Smith", "jane@example.edu", 2).await?;
        let other = create_test_reservation(&db, "John Doe", "john@example.edu").await?;

        create_test_guest(&db, reservation.id, 1, "Jane", "Smith").await?;
        create_test_guest(&db, reservation.id, 2, "John", "Smith").await?;
        crate::core::seating::save_preferences(&db, reservation.id, &[other.id]).await?;

        delete_reservation(&db, reservation.id).await?;

        assert!(Reservation::find_by_id(reservation.id).one(&db).await?.is_none());
        let guests = roster::get_roster(&db, reservation.id).await?;
        assert!(guests.is_empty());
        let prefs = SeatingPreference::find()
            .filter(seating_preference::Column::ReservationId.eq(reservation.id))
            .one(&db)
            .await?;
        assert!(prefs.is_none());

        // The unrelated reservation survives
        assert!(Reservation::find_by_id(other.id).one(&db).await?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_reservation() -> Result<()> {
        let db = setup_test_db().await?;
        let result = delete_reservation(&db, 42).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_orderings() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_reservation(&db, "Zed Alpha", "zed@example.edu").await?;
        create_test_reservation(&db, "Ann Boyd", "ann@example.edu").await?;

        let by_name = list_by_name(&db).await?;
        assert_eq!(by_name[0].name, "Ann Boyd");
        assert_eq!(by_name[1].name, "Zed Alpha");

        let recent = list_recent_first(&db).await?;
        assert_eq!(recent.len(), 2);

        Ok(())
    }
}
