use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    destination::{Destination, DestinationUpdate},
    preferences::UserPreferences,
    trip::{Trip, TripStatus},
    user::{User, UserRole},
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
    #[error("bson serialization error: {0}")]
    BsonSer(#[from] bson::ser::Error),
    #[error("bson deserialization error: {0}")]
    BsonDe(#[from] bson::de::Error),
    #[error("duplicate key: {0}")]
    Duplicate(String),
    #[error("datastore unavailable: {0}")]
    Unavailable(String),
}

/// Persistence for everything the API serves.
///
/// Lookups return `Ok(None)` for missing records and updates return the
/// updated record (or `None` if nothing matched). Errors are only raised for
/// backend failures.
#[async_trait]
pub trait TravelStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    // Users
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn record_signin(&self, id: &str, success: bool) -> Result<(), StoreError>;
    async fn set_user_role(&self, id: &str, role: UserRole) -> Result<Option<User>, StoreError>;
    /// Deletes the user together with their trips and preferences.
    async fn delete_user(&self, id: &str) -> Result<bool, StoreError>;

    // Preferences
    async fn upsert_preferences(&self, preferences: &UserPreferences) -> Result<(), StoreError>;
    async fn get_preferences(&self, user_id: &str) -> Result<Option<UserPreferences>, StoreError>;

    // Destinations
    async fn insert_destination(&self, destination: &Destination) -> Result<(), StoreError>;
    async fn get_destination(&self, id: &str) -> Result<Option<Destination>, StoreError>;
    async fn list_destinations(&self, only_active: bool) -> Result<Vec<Destination>, StoreError>;
    async fn update_destination(
        &self,
        id: &str,
        update: DestinationUpdate,
    ) -> Result<Option<Destination>, StoreError>;
    async fn toggle_destination(&self, id: &str) -> Result<Option<Destination>, StoreError>;
    async fn delete_destination(&self, id: &str) -> Result<bool, StoreError>;

    // Trips
    async fn insert_trip(&self, trip: &Trip) -> Result<(), StoreError>;
    async fn get_trip(&self, id: &str) -> Result<Option<Trip>, StoreError>;
    async fn list_trips(&self, user_id: &str) -> Result<Vec<Trip>, StoreError>;
    async fn set_trip_status(&self, id: &str, status: TripStatus)
        -> Result<Option<Trip>, StoreError>;
    async fn delete_trip(&self, id: &str) -> Result<bool, StoreError>;
}
