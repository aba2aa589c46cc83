//! Date-based trip lifecycle classification.
//!
//! A trip's phase depends on the wall clock, so it is re-derived on every read
//! instead of being trusted from storage. Nothing in here fails: dates that
//! are missing or unparseable leave the stored status as it is.

use chrono::NaiveDate;

use crate::models::trip::{Trip, TripStatus};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Resolves the `(start, end)` pair of raw date strings.
///
/// `start` falls back to the legacy `trip_date`; `end` falls back to
/// `trip_date` and then to `start`.
fn date_range<'a>(
    start_date: Option<&'a str>,
    end_date: Option<&'a str>,
    trip_date: Option<&'a str>,
) -> Option<(&'a str, &'a str)> {
    let start = start_date.or(trip_date)?;
    let end = end_date.or(trip_date).unwrap_or(start);
    Some((start, end))
}

fn classify(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> TripStatus {
    if today < start {
        TripStatus::Upcoming
    } else if today <= end {
        TripStatus::Ongoing
    } else {
        TripStatus::Completed
    }
}

fn classify_raw(
    start_date: Option<&str>,
    end_date: Option<&str>,
    trip_date: Option<&str>,
    today: NaiveDate,
) -> Option<TripStatus> {
    let (start, end) = date_range(start_date, end_date, trip_date)?;
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    Some(classify(start, end, today))
}

/// The status a trip should be displayed with on `today`.
pub fn derive_status(trip: &Trip, today: NaiveDate) -> TripStatus {
    if trip.status.is_absorbing() {
        return trip.status;
    }

    classify_raw(
        trip.start_date.as_deref(),
        trip.end_date.as_deref(),
        trip.trip_date.as_deref(),
        today,
    )
    .unwrap_or(trip.status)
}

/// Returns the trip with its status re-derived for `today`.
pub fn with_derived_status(mut trip: Trip, today: NaiveDate) -> Trip {
    trip.status = derive_status(&trip, today);
    trip
}

/// Status assigned when a trip is created.
///
/// An explicit `wishlist` or `cancelled` is kept as requested. Otherwise the
/// dates decide, and without usable dates the requested status (or
/// `planning`) is used.
pub fn initial_status(
    requested: Option<TripStatus>,
    start_date: Option<&str>,
    end_date: Option<&str>,
    trip_date: Option<&str>,
    today: NaiveDate,
) -> TripStatus {
    if let Some(status) = requested.filter(TripStatus::is_absorbing) {
        return status;
    }

    classify_raw(start_date, end_date, trip_date, today).unwrap_or(requested.unwrap_or_default())
}
