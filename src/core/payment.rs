//! Payment status tracking - a small label state machine on the reservation.
//!
//! Guests self-report a payment method, which parks the status in a pending
//! state until the administrator confirms it. Growing the roster of an
//! already-paid reservation forces the status to a distinct flag so the admin
//! knows the paid amount may be wrong. The administrator may also set any
//! status directly; that manual override is deliberate.

use crate::{
    entities::{Reservation, reservation},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use std::fmt;

/// Payment status labels, persisted verbatim on the reservation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    /// Default state; nothing reported or confirmed
    NotPaid,
    /// Guest reported paying cash; awaiting admin confirmation
    PendingCash,
    /// Guest reported paying via Venmo; awaiting admin confirmation
    PendingVenmo,
    /// Administrator confirmed a cash payment
    CashConfirmed,
    /// Administrator confirmed a Venmo payment
    VenmoConfirmed,
    /// Roster grew after a non-default status; payment needs review
    GuestsChangedNotPaid,
}

impl PaymentStatus {
    /// The persisted label for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotPaid => "not paid",
            Self::PendingCash => "pending - cash",
            Self::PendingVenmo => "pending - Venmo",
            Self::CashConfirmed => "cash",
            Self::VenmoConfirmed => "Venmo",
            Self::GuestsChangedNotPaid => "guests changed - not paid",
        }
    }

    /// Parses a persisted or submitted label back into a status.
    ///
    /// Unknown labels are a validation failure, never coerced to a default.
    pub fn parse_label(label: &str) -> Result<Self> {
        match label {
            "not paid" => Ok(Self::NotPaid),
            "pending - cash" => Ok(Self::PendingCash),
            "pending - Venmo" => Ok(Self::PendingVenmo),
            "cash" => Ok(Self::CashConfirmed),
            "Venmo" => Ok(Self::VenmoConfirmed),
            "guests changed - not paid" => Ok(Self::GuestsChangedNotPaid),
            other => Err(Error::validation(format!(
                "Unknown payment status: {other}"
            ))),
        }
    }

    /// Transition applied when a reservation's roster grows from 1 to 2.
    ///
    /// Any non-default status becomes the needs-review flag; `not paid`
    /// stays `not paid`.
    #[must_use]
    pub const fn on_roster_grow(self) -> Self {
        match self {
            Self::NotPaid => Self::NotPaid,
            _ => Self::GuestsChangedNotPaid,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment methods a guest may self-report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    /// Cash in hand at the event
    Cash,
    /// Venmo transfer
    Venmo,
}

impl PaymentMethod {
    /// Parses a submitted method name (case-insensitive).
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "venmo" => Ok(Self::Venmo),
            other => Err(Error::validation(format!("Unknown payment method: {other}"))),
        }
    }

    /// The pending status this method self-reports into.
    #[must_use]
    pub const fn pending_status(self) -> PaymentStatus {
        match self {
            Self::Cash => PaymentStatus::PendingCash,
            Self::Venmo => PaymentStatus::PendingVenmo,
        }
    }
}

/// Records a guest's self-reported payment method as a pending status.
pub async fn self_report(
    db: &DatabaseConnection,
    reservation_id: i64,
    method: PaymentMethod,
) -> Result<reservation::Model> {
    set_status(db, reservation_id, method.pending_status()).await
}

/// Sets a reservation's payment status directly.
///
/// This is the administrator's manual override: any status may be written
/// regardless of the natural transition order.
pub async fn set_status(
    db: &DatabaseConnection,
    reservation_id: i64,
    status: PaymentStatus,
) -> Result<reservation::Model> {
    let reservation = Reservation::find_by_id(reservation_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("reservation"))?;

    let mut active: reservation::ActiveModel = reservation.into();
    active.payment_status = Set(status.as_str().to_string());
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_labels_round_trip() {
        let all = [
            PaymentStatus::NotPaid,
            PaymentStatus::PendingCash,
            PaymentStatus::PendingVenmo,
            PaymentStatus::CashConfirmed,
            PaymentStatus::VenmoConfirmed,
            PaymentStatus::GuestsChangedNotPaid,
        ];
        for status in all {
            assert_eq!(PaymentStatus::parse_label(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_label_rejected() {
        let result = PaymentStatus::parse_label("paid in kind");
        assert!(matches!(result, Err(Error::Validation { .. })));
    }

    #[test]
    fn test_on_roster_grow_transitions() {
        assert_eq!(
            PaymentStatus::NotPaid.on_roster_grow(),
            PaymentStatus::NotPaid
        );
        assert_eq!(
            PaymentStatus::CashConfirmed.on_roster_grow(),
            PaymentStatus::GuestsChangedNotPaid
        );
        assert_eq!(
            PaymentStatus::PendingVenmo.on_roster_grow(),
            PaymentStatus::GuestsChangedNotPaid
        );
        assert_eq!(
            PaymentStatus::GuestsChangedNotPaid.on_roster_grow(),
            PaymentStatus::GuestsChangedNotPaid
        );
    }

    #[test]
    fn test_parse_method() {
        assert_eq!(
            PaymentMethod::parse("Venmo").unwrap(),
            PaymentMethod::Venmo
        );
        assert_eq!(PaymentMethod::parse(" cash ").unwrap(), PaymentMethod::Cash);
        assert!(PaymentMethod::parse("check").is_err());
    }

    #[tokio::test]
    async fn test_self_report_sets_pending() -> Result<()> {
        let (db, reservation) = setup_with_reservation().await?;

        let updated = self_report(&db, reservation.id, PaymentMethod::Venmo).await?;
        assert_eq!(updated.payment_status, "pending - Venmo");

        let updated = self_report(&db, reservation.id, PaymentMethod::Cash).await?;
        assert_eq!(updated.payment_status, "pending - cash");

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_override_any_status() -> Result<()> {
        let (db, reservation) = setup_with_reservation().await?;

        // Jump straight to confirmed, bypassing the pending states
        let updated = set_status(&db, reservation.id, PaymentStatus::VenmoConfirmed).await?;
        assert_eq!(updated.payment_status, "Venmo");

        // And back down to the default
        let updated = set_status(&db, reservation.id, PaymentStatus::NotPaid).await?;
        assert_eq!(updated.payment_status, "not paid");

        Ok(())
    }

    #[tokio::test]
    async fn test_set_status_missing_reservation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = set_status(&db, 999, PaymentStatus::CashConfirmed).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));

        Ok(())
    }
}
