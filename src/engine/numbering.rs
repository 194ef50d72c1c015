//! Document number allocation.
//!
//! Order numbers look like `BOL-2024-0001`: a fixed prefix, the calendar
//! year, and a zero-padded sequence that restarts at 1 each year. The next
//! number is always derived from the greatest number already stored for the
//! year, read inside the same transaction that inserts the order, so the
//! sequence survives restarts and concurrent processes. Gaps left by deleted
//! or rolled-back orders are never backfilled.
//!
//! The `UNIQUE` constraint on `orders.number` is the authoritative guard
//! against two transactions picking the same number; the order engine
//! retries the whole creation transaction when that constraint fires.

use diesel::prelude::*;

use crate::domain::errors::DomainError;
use crate::schema::orders;

pub const NUMBER_PREFIX: &str = "BOL";

fn year_prefix(year: i32) -> String {
    format!("{NUMBER_PREFIX}-{year}-")
}

pub fn format_number(year: i32, sequence: u32) -> String {
    format!("{NUMBER_PREFIX}-{year}-{sequence:04}")
}

/// Next sequence value given the greatest number issued so far this year
/// (`None` for a fresh year).
pub fn next_in_sequence(last: Option<&str>) -> Result<u32, DomainError> {
    let Some(number) = last else {
        return Ok(1);
    };
    let tail = number.rsplit('-').next().unwrap_or_default();
    let sequence: u32 = tail.parse().map_err(|_| {
        DomainError::Internal(format!("malformed order number '{number}' in store"))
    })?;
    Ok(sequence + 1)
}

/// Allocate the next document number for `year`.
///
/// Must be called on the same connection, inside the same transaction, as
/// the order insert that will use the number.
///
/// The descending string sort that finds the year's maximum depends on the
/// zero-padded 4-digit tail: once a year passes sequence 9999, five-digit
/// numbers sort below `-9999` and allocation stops advancing. The volume
/// these documents are issued at stays far under that ceiling.
pub fn allocate(conn: &mut PgConnection, year: i32) -> Result<String, DomainError> {
    let prefix = year_prefix(year);

    let last: Option<String> = orders::table
        .filter(orders::number.like(format!("{prefix}%")))
        .order(orders::number.desc())
        .select(orders::number)
        .first(conn)
        .optional()?;

    let sequence = next_in_sequence(last.as_deref())?;
    Ok(format_number(year, sequence))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_year_starts_at_one() {
        assert_eq!(next_in_sequence(None).unwrap(), 1);
        assert_eq!(format_number(2024, 1), "BOL-2024-0001");
    }

    #[test]
    fn sequence_increments_from_last_number() {
        assert_eq!(next_in_sequence(Some("BOL-2024-0001")).unwrap(), 2);
        assert_eq!(next_in_sequence(Some("BOL-2024-0042")).unwrap(), 43);
    }

    #[test]
    fn gaps_are_tolerated_not_backfilled() {
        // 0002 was deleted; the next number still moves past the max.
        assert_eq!(next_in_sequence(Some("BOL-2024-0003")).unwrap(), 4);
    }

    #[test]
    fn sequence_is_zero_padded_to_four_digits() {
        assert_eq!(format_number(2025, 7), "BOL-2025-0007");
        assert_eq!(format_number(2025, 1234), "BOL-2025-1234");
    }

    #[test]
    fn malformed_stored_number_is_an_internal_error() {
        assert!(matches!(
            next_in_sequence(Some("BOL-2024-XYZ")),
            Err(DomainError::Internal(_))
        ));
    }
}
