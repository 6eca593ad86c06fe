//! Seating preference ranking - an ordered preference over other reservations.
//!
//! Each reservation may store one ranked list of other reservations' ids,
//! persisted as a comma-delimited sequence and replaced wholesale on save.
//! Partial rankings are valid; ids of since-deleted reservations stay in the
//! stored sequence until the owner's next save and are skipped on display.

use crate::{
    core::reservation::list_by_name,
    entities::{Guest, Reservation, SeatingPreference, guest, seating_preference},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use std::collections::HashSet;

/// Encodes a ranked id sequence as its persisted comma-delimited form.
///
/// `encode_ranked_ids(&[1, 2, 3]) == "1,2,3"`; the empty list encodes as `""`.
#[must_use]
pub fn encode_ranked_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Decodes the persisted comma-delimited form back into an id sequence.
///
/// Unparseable fragments are skipped rather than treated as corruption.
#[must_use]
pub fn decode_ranked_ids(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

/// The stored ranked ids for a reservation, empty when never saved.
pub async fn get_ranked_ids(db: &DatabaseConnection, reservation_id: i64) -> Result<Vec<i64>> {
    let preference = SeatingPreference::find()
        .filter(seating_preference::Column::ReservationId.eq(reservation_id))
        .one(db)
        .await?;
    Ok(preference.map_or_else(Vec::new, |p| decode_ranked_ids(&p.ranked_ids)))
}

/// Replaces a reservation's ranked list wholesale.
///
/// The sequence is sanitized to contain each id at most once and never the
/// owner's own id. Listed ids are NOT checked against live reservations;
/// partial rankings and stale ids are intentional.
pub async fn save_preferences(
    db: &DatabaseConnection,
    reservation_id: i64,
    ranked: &[i64],
) -> Result<seating_preference::Model> {
    let mut seen = HashSet::new();
    let sanitized: Vec<i64> = ranked
        .iter()
        .copied()
        .filter(|id| *id != reservation_id && seen.insert(*id))
        .collect();

    let txn = db.begin().await?;

    Reservation::find_by_id(reservation_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("reservation"))?;

    let now = chrono::Utc::now();
    let existing = SeatingPreference::find()
        .filter(seating_preference::Column::ReservationId.eq(reservation_id))
        .one(&txn)
        .await?;

    let saved = match existing {
        Some(current) => {
            let mut active: seating_preference::ActiveModel = current.into();
            active.ranked_ids = Set(encode_ranked_ids(&sanitized));
            active.updated_at = Set(now);
            active.update(&txn).await?
        }
        None => {
            let model = seating_preference::ActiveModel {
                reservation_id: Set(reservation_id),
                ranked_ids: Set(encode_ranked_ids(&sanitized)),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            model.insert(&txn).await?
        }
    };

    txn.commit().await?;
    Ok(saved)
}

/// One other reservation as presented on the seating board.
#[derive(Debug, Clone, Serialize)]
pub struct SeatingEntry {
    /// The other reservation's id, the value a ranking refers to
    pub reservation_id: i64,
    /// Guests' full names joined, falling back to the reservation name
    pub display_name: String,
    /// 1-based rank when the entry is ranked
    pub rank: Option<u32>,
}

/// The seating board: every other reservation, partitioned by ranking.
#[derive(Debug, Serialize)]
pub struct SeatingBoard {
    /// Entries present in the stored sequence, ordered by rank
    pub ranked: Vec<SeatingEntry>,
    /// Everyone else; relative order unspecified (listed by name here)
    pub unranked: Vec<SeatingEntry>,
}

/// Builds the seating board for a reservation.
///
/// Ranked entries appear in stored order with 1-based ranks; stale ids in the
/// stored sequence refer to nothing and are simply skipped. Display names
/// prefer the roster of the other reservation's guests over its bare name.
pub async fn build_seating_board(
    db: &DatabaseConnection,
    reservation_id: i64,
) -> Result<SeatingBoard> {
    let ranked_ids = get_ranked_ids(db, reservation_id).await?;
    let others: Vec<_> = list_by_name(db)
        .await?
        .into_iter()
        .filter(|r| r.id != reservation_id)
        .collect();

    let mut ranked = Vec::new();
    let mut unranked = Vec::new();
    for other in others {
        let display_name = display_name_for(db, other.id, &other.name).await?;
        let position = ranked_ids.iter().position(|id| *id == other.id);
        let entry = SeatingEntry {
            reservation_id: other.id,
            display_name,
            rank: position.map(|p| u32::try_from(p + 1).unwrap_or(u32::MAX)),
        };
        match position {
            Some(_) => ranked.push(entry),
            None => unranked.push(entry),
        }
    }
    ranked.sort_by_key(|entry| entry.rank);

    Ok(SeatingBoard { ranked, unranked })
}

/// Display name for a reservation: its guests' full names joined with
/// " and ", or the reservation name while no guest records exist.
async fn display_name_for(
    db: &DatabaseConnection,
    reservation_id: i64,
    fallback: &str,
) -> Result<String> {
    let guests = Guest::find()
        .filter(guest::Column::ReservationId.eq(reservation_id))
        .order_by_asc(guest::Column::Slot)
        .all(db)
        .await?;

    if guests.is_empty() {
        return Ok(fallback.to_string());
    }
    Ok(guests
        .iter()
        .map(|g| format!("{} {}", g.first_name, g.last_name))
        .collect::<Vec<_>>()
        .join(" and "))
}
