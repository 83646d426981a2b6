//! Time zones and civil timestamps.
//!
//! The setup document stores every time as a civil time (no offset) together
//! with one IANA zone for the whole election. Dates in the future are kept
//! that way so that they keep their intended meaning if the zone rules change
//! before the election happens.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::{Tz, TZ_VARIANTS};
use log::debug;

/// The calendar primitives needed to check the timing of an election.
pub trait Calendar {
    type Instant: Ord;

    fn is_valid_time_zone(&self, name: &str) -> bool;

    /// Reads a civil timestamp. Returns `None` if it is malformed.
    fn parse_timestamp(&self, value: &str) -> Option<Self::Instant>;
}

/// The calendar backed by the IANA time zone database.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct IanaCalendar;

impl Calendar for IanaCalendar {
    type Instant = NaiveDateTime;

    fn is_valid_time_zone(&self, name: &str) -> bool {
        is_valid_zone(name)
    }

    fn parse_timestamp(&self, value: &str) -> Option<NaiveDateTime> {
        parse_civil(value)
    }
}

/// Reads a civil time in one of the forms produced by date pickers:
/// `2025-01-01T09:30:00` (with optional fractional seconds), `2025-01-01T09:30`
/// or `2025-01-01` (midnight).
pub fn parse_civil(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = value.parse::<NaiveDateTime>() {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
        return Some(dt);
    }
    let res = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0));
    if res.is_none() {
        debug!("parse_civil: cannot read {:?}", value);
    }
    res
}

pub fn is_valid_zone(name: &str) -> bool {
    name.parse::<Tz>().is_ok()
}

/// All the zone names starting with the given prefix, in lexicographic order.
///
/// An empty prefix returns every known zone.
pub fn prefix_search(prefix: &str) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = TZ_VARIANTS
        .iter()
        .map(|tz| tz.name())
        .filter(|name| name.starts_with(prefix))
        .collect();
    names.sort_unstable();
    names
}

/// Resolves a civil time in the given zone.
///
/// When the clocks go back, the same civil time happens twice and the earliest
/// instant is chosen. A civil time skipped when the clocks go forward does not
/// exist and gives `None`, as does an unknown zone.
pub fn resolve_local(zone: &str, civil: &NaiveDateTime) -> Option<DateTime<Tz>> {
    let tz: Tz = zone.parse().ok()?;
    tz.from_local_datetime(civil).earliest()
}
