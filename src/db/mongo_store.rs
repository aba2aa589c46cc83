use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Bson, Document},
    error::{ErrorKind, WriteError, WriteFailure},
    options::{IndexOptions, ReturnDocument},
    Client, Collection, Database, IndexModel,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::db::store::{StoreError, TravelStore};
use crate::models::{
    destination::{Destination, DestinationUpdate},
    preferences::UserPreferences,
    trip::{Trip, TripStatus},
    user::{User, UserRole},
};

const USERS: &str = "users";
const PREFERENCES: &str = "user_preferences";
const DESTINATIONS: &str = "destinations";
const TRIPS: &str = "trips";

const DUPLICATE_KEY: i32 = 11000;

pub struct MongoStore {
    db: Database,
}

/// Unique indexes backing the one-user-per-username/email and
/// one-preferences-per-user rules.
fn unique_indexes() -> Vec<(&'static str, IndexModel)> {
    let unique = |collection: &'static str, field: &str| {
        let mut keys = Document::new();
        keys.insert(field, 1);
        let model = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build();
        (collection, model)
    };

    vec![
        unique(USERS, "username"),
        unique(USERS, "email"),
        unique(PREFERENCES, "user_id"),
    ]
}

impl MongoStore {
    /// Opens the database and makes sure the unique indexes exist.
    pub async fn connect(client: &Client, database: &str) -> Result<Self, StoreError> {
        let store = Self {
            db: client.database(database),
        };

        for (collection, index) in unique_indexes() {
            store.collection(collection).create_index(index).await?;
        }
        log::info!("MongoDB indexes ensured on {}", database);

        Ok(store)
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }

    async fn find_one<T: DeserializeOwned>(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<T>, StoreError> {
        self.collection(collection)
            .find_one(filter)
            .await?
            .map(from_stored)
            .transpose()
    }

    async fn find_all<T: DeserializeOwned>(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Vec<T>, StoreError> {
        let docs: Vec<Document> = self
            .collection(collection)
            .find(filter)
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        docs.into_iter().map(from_stored).collect()
    }

    async fn insert<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let document = to_stored(id, value)?;
        match self.collection(collection).insert_one(document).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => Err(StoreError::Duplicate(id.to_string())),
            Err(err) => Err(err.into()),
        }
    }

    async fn update_by_id<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        update: impl Into<mongodb::options::UpdateModifications>,
    ) -> Result<Option<T>, StoreError> {
        self.collection(collection)
            .find_one_and_update(by_id(id), update)
            .return_document(ReturnDocument::After)
            .await?
            .map(from_stored)
            .transpose()
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let result = self.collection(collection).delete_one(by_id(id)).await?;
        Ok(result.deleted_count > 0)
    }
}

/// Ids created by this service are ObjectId hex strings; anything else is
/// stored as a plain string id.
fn stored_id(id: &str) -> Bson {
    match ObjectId::parse_str(id) {
        Ok(oid) => Bson::ObjectId(oid),
        Err(_) => Bson::String(id.to_string()),
    }
}

fn by_id(id: &str) -> Document {
    doc! { "_id": stored_id(id) }
}

fn to_stored<T: Serialize>(id: &str, value: &T) -> Result<Document, StoreError> {
    let mut document = bson::to_document(value)?;
    document.remove("id");
    document.insert("_id", stored_id(id));
    Ok(document)
}

fn from_stored<T: DeserializeOwned>(mut document: Document) -> Result<T, StoreError> {
    if let Some(id) = document.remove("_id") {
        let id = match id {
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::String(s) => s,
            other => other.to_string(),
        };
        document.insert("id", id);
    }
    Ok(bson::from_document(document)?)
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(WriteError {
            code: DUPLICATE_KEY,
            ..
        }))
    )
}

fn destination_set(update: DestinationUpdate) -> Document {
    let mut set = Document::new();
    if let Some(name) = update.name {
        set.insert("name", name);
    }
    if let Some(country) = update.country {
        set.insert("country", country);
    }
    if let Some(travel_style) = update.travel_style {
        set.insert("travel_style", travel_style);
    }
    if let Some(budget) = update.budget {
        set.insert("budget", budget);
    }
    if let Some(description) = update.description {
        set.insert("description", description);
    }
    if let Some(activities) = update.activities {
        set.insert("activities", activities);
    }
    if let Some(season) = update.season {
        set.insert("season", season);
    }
    if let Some(image) = update.image {
        set.insert("image", image);
    }
    if let Some(active) = update.active {
        set.insert("active", active);
    }
    set
}

#[async_trait]
impl TravelStore for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.insert(USERS, &user.id, user).await
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        self.find_one(USERS, by_id(id)).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.find_one(USERS, doc! { "username": username }).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.find_one(USERS, doc! { "email": email }).await
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        self.find_all(USERS, doc! {}).await
    }

    async fn record_signin(&self, id: &str, success: bool) -> Result<(), StoreError> {
        let now = bson::to_bson(&Utc::now())?;
        let update = if success {
            doc! {
                "$set": {
                    "last_signin": now.clone(),
                    "failed_signins": 0,
                    "updated_at": now
                }
            }
        } else {
            doc! {
                "$inc": { "failed_signins": 1 },
                "$set": { "updated_at": now }
            }
        };

        self.collection(USERS).update_one(by_id(id), update).await?;
        Ok(())
    }

    async fn set_user_role(&self, id: &str, role: UserRole) -> Result<Option<User>, StoreError> {
        let now = bson::to_bson(&Utc::now())?;
        self.update_by_id(
            USERS,
            id,
            doc! { "$set": { "role": role.as_str(), "updated_at": now } },
        )
        .await
    }

    async fn delete_user(&self, id: &str) -> Result<bool, StoreError> {
        if !self.delete_by_id(USERS, id).await? {
            return Ok(false);
        }

        let trips = self
            .collection(TRIPS)
            .delete_many(doc! { "user_id": id })
            .await?;
        self.collection(PREFERENCES)
            .delete_one(doc! { "user_id": id })
            .await?;
        log::info!(
            "Deleted user {} with {} trips",
            id,
            trips.deleted_count
        );
        Ok(true)
    }

    async fn upsert_preferences(&self, preferences: &UserPreferences) -> Result<(), StoreError> {
        let document = bson::to_document(preferences)?;
        self.collection(PREFERENCES)
            .replace_one(doc! { "user_id": preferences.user_id.as_str() }, document)
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn get_preferences(&self, user_id: &str) -> Result<Option<UserPreferences>, StoreError> {
        self.find_one(PREFERENCES, doc! { "user_id": user_id }).await
    }

    async fn insert_destination(&self, destination: &Destination) -> Result<(), StoreError> {
        self.insert(DESTINATIONS, &destination.id, destination).await
    }

    async fn get_destination(&self, id: &str) -> Result<Option<Destination>, StoreError> {
        self.find_one(DESTINATIONS, by_id(id)).await
    }

    async fn list_destinations(&self, only_active: bool) -> Result<Vec<Destination>, StoreError> {
        // documents written without the flag count as active
        let filter = if only_active {
            doc! { "active": { "$ne": false } }
        } else {
            doc! {}
        };
        self.find_all(DESTINATIONS, filter).await
    }

    async fn update_destination(
        &self,
        id: &str,
        update: DestinationUpdate,
    ) -> Result<Option<Destination>, StoreError> {
        let set = destination_set(update);
        if set.is_empty() {
            return self.get_destination(id).await;
        }
        self.update_by_id(DESTINATIONS, id, doc! { "$set": set }).await
    }

    async fn toggle_destination(&self, id: &str) -> Result<Option<Destination>, StoreError> {
        let pipeline = vec![doc! {
            "$set": { "active": { "$not": [{ "$ifNull": ["$active", true] }] } }
        }];
        self.update_by_id(DESTINATIONS, id, pipeline).await
    }

    async fn delete_destination(&self, id: &str) -> Result<bool, StoreError> {
        self.delete_by_id(DESTINATIONS, id).await
    }

    async fn insert_trip(&self, trip: &Trip) -> Result<(), StoreError> {
        self.insert(TRIPS, &trip.id, trip).await
    }

    async fn get_trip(&self, id: &str) -> Result<Option<Trip>, StoreError> {
        self.find_one(TRIPS, by_id(id)).await
    }

    async fn list_trips(&self, user_id: &str) -> Result<Vec<Trip>, StoreError> {
        self.find_all(TRIPS, doc! { "user_id": user_id }).await
    }

    async fn set_trip_status(
        &self,
        id: &str,
        status: TripStatus,
    ) -> Result<Option<Trip>, StoreError> {
        self.update_by_id(TRIPS, id, doc! { "$set": { "status": status.as_str() } })
            .await
    }

    async fn delete_trip(&self, id: &str) -> Result<bool, StoreError> {
        self.delete_by_id(TRIPS, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_stored_documents() {
        let id = ObjectId::new().to_hex();
        let trip = Trip {
            id: id.clone(),
            user_id: "u1".to_string(),
            destination: Some("Paris".to_string()),
            destination_id: None,
            country: Some("France".to_string()),
            trip_date: None,
            start_date: Some("2030-05-01".to_string()),
            end_date: Some("2030-05-07".to_string()),
            image: None,
            description: None,
            activities: vec!["Louvre".to_string()],
            status: TripStatus::Upcoming,
            created_at: Some(Utc::now()),
        };

        let stored = to_stored(&id, &trip).unwrap();
        assert!(stored.get("id").is_none());
        assert_eq!(stored.get_object_id("_id").unwrap().to_hex(), id);
        assert_eq!(stored.get_str("status").unwrap(), "upcoming");

        let loaded: Trip = from_stored(stored).unwrap();
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.status, TripStatus::Upcoming);
        assert_eq!(loaded.activities, vec!["Louvre".to_string()]);
    }

    #[test]
    fn uniqueness_is_enforced_by_indexes() {
        let indexes: Vec<(&str, String, Option<bool>)> = unique_indexes()
            .into_iter()
            .map(|(collection, index)| {
                let field = index.keys.keys().next().cloned().unwrap_or_default();
                let unique = index.options.and_then(|options| options.unique);
                (collection, field, unique)
            })
            .collect();

        assert_eq!(
            indexes,
            vec![
                (USERS, "username".to_string(), Some(true)),
                (USERS, "email".to_string(), Some(true)),
                (PREFERENCES, "user_id".to_string(), Some(true)),
            ]
        );
    }

    #[test]
    fn non_object_ids_are_kept_as_strings() {
        assert_eq!(stored_id("legacy-42"), Bson::String("legacy-42".to_string()));
    }

    #[test]
    fn empty_update_sets_nothing() {
        assert!(destination_set(DestinationUpdate::default()).is_empty());

        let set = destination_set(DestinationUpdate {
            name: Some("Lisbon".to_string()),
            active: Some(false),
            ..Default::default()
        });
        assert_eq!(set.get_str("name").unwrap(), "Lisbon");
        assert!(!set.get_bool("active").unwrap());
    }
}
