//! Temporal filtering of transaction records against a named relative window.
//!
//! The filter is a pure function of its inputs: the evaluation instant is an
//! explicit parameter so every window computation is deterministic under test.
//! Timestamps are compared as naive date-times; the backend emits them in one
//! consistent time zone and this client never converts zones.

use crate::types::{TimeRangeSelection, TransactionRecord};
use chrono::{Duration, Months, NaiveDate, NaiveDateTime};

/// Narrow `records` to those whose timestamp falls in the window named by
/// `selection`, evaluated against `now`.
///
/// The result borrows from the input slice and preserves its order. A record
/// whose timestamp cannot be parsed is dropped from any window that needs the
/// parse; it never aborts the pass.
pub fn filter_records<'a>(
    records: &'a [TransactionRecord],
    selection: TimeRangeSelection,
    now: NaiveDateTime,
) -> Vec<&'a TransactionRecord> {
    match selection {
        TimeRangeSelection::Today => {
            let today = now.date();
            records
                .iter()
                .filter(|r| date_part(&r.waktu_parkir) == Some(today))
                .collect()
        }
        TimeRangeSelection::Last7Days => filter_since(records, now - Duration::days(7)),
        TimeRangeSelection::Last30Days => filter_since(records, now - Duration::days(30)),
        TimeRangeSelection::LastYear => {
            // Feb 29 minus a year clamps to Feb 28 of the prior year.
            let cutoff = now
                .checked_sub_months(Months::new(12))
                .unwrap_or(NaiveDateTime::MIN);
            filter_since(records, cutoff)
        }
        TimeRangeSelection::All => records.iter().collect(),
    }
}

/// Inclusive lower bound, no upper bound. Unparseable timestamps never match.
fn filter_since<'a>(
    records: &'a [TransactionRecord],
    cutoff: NaiveDateTime,
) -> Vec<&'a TransactionRecord> {
    records
        .iter()
        .filter(|r| parse_timestamp(&r.waktu_parkir).is_some_and(|ts| ts >= cutoff))
        .collect()
}

/// Parse a backend timestamp. The backend sends ISO-8601 local date-times,
/// with or without fractional seconds; some older rows carry a `Z` suffix
/// whose offset is ignored rather than converted.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim().trim_end_matches('Z');
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// Calendar date of a timestamp, taken from the text before the `T`
/// separator. A timestamp without the separator has no date part.
fn date_part(raw: &str) -> Option<NaiveDate> {
    let (date, _) = raw.split_once('T')?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
