use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    #[default]
    Planning,
    Upcoming,
    Ongoing,
    Completed,
    Wishlist,
    Cancelled,
}

impl TripStatus {
    /// Statuses that date-based recomputation never overwrites.
    pub fn is_absorbing(&self) -> bool {
        matches!(self, TripStatus::Wishlist | TripStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Planning => "planning",
            TripStatus::Upcoming => "upcoming",
            TripStatus::Ongoing => "ongoing",
            TripStatus::Completed => "completed",
            TripStatus::Wishlist => "wishlist",
            TripStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub user_id: String,
    pub destination: Option<String>,
    pub destination_id: Option<String>,
    pub country: Option<String>,
    /// Single-date trips created by older clients
    pub trip_date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    pub status: TripStatus,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewTrip {
    pub user_id: Option<String>,
    pub destination: Option<String>,
    pub destination_id: Option<String>,
    pub country: Option<String>,
    #[serde(alias = "travel_date")]
    pub trip_date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    pub status: Option<TripStatus>,
}

#[derive(Debug, Deserialize)]
pub struct TripStatusUpdate {
    pub status: Option<TripStatus>,
}

#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub success: bool,
    pub trip: Trip,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&TripStatus::Wishlist).unwrap();
        assert_eq!(json, "\"wishlist\"");

        let parsed: TripStatus = serde_json::from_str("\"ongoing\"").unwrap();
        assert_eq!(parsed, TripStatus::Ongoing);
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<TripStatus>("\"paused\"").is_err());
    }

    #[test]
    fn travel_date_is_accepted_as_trip_date() {
        let trip: NewTrip = serde_json::from_str(
            r#"{"user_id":"u1","destination":"Kyoto","travel_date":"2030-04-01"}"#,
        )
        .unwrap();
        assert_eq!(trip.trip_date.as_deref(), Some("2030-04-01"));
    }
}
