use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::db::store::{StoreError, TravelStore};
use crate::models::{
    destination::{Destination, DestinationUpdate},
    preferences::UserPreferences,
    trip::{Trip, TripStatus},
    user::{User, UserRole},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    preferences: HashMap<String, UserPreferences>,
    destinations: Vec<Destination>,
    trips: Vec<Trip>,
}

/// In-memory storage for tests and local development.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TravelStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(StoreError::Duplicate(user.username.clone()));
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn record_signin(&self, id: &str, success: bool) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == id) {
            let now = Utc::now();
            if success {
                user.failed_signins = 0;
                user.last_signin = Some(now);
            } else {
                user.failed_signins += 1;
            }
            user.updated_at = now;
        }
        Ok(())
    }

    async fn set_user_role(&self, id: &str, role: UserRole) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.iter_mut().find(|u| u.id == id).map(|user| {
            user.role = role;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn delete_user(&self, id: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Ok(false);
        }
        tables.trips.retain(|t| t.user_id != id);
        tables.preferences.remove(id);
        Ok(true)
    }

    async fn upsert_preferences(&self, preferences: &UserPreferences) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables
            .preferences
            .insert(preferences.user_id.clone(), preferences.clone());
        Ok(())
    }

    async fn get_preferences(&self, user_id: &str) -> Result<Option<UserPreferences>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.preferences.get(user_id).cloned())
    }

    async fn insert_destination(&self, destination: &Destination) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.destinations.iter().any(|d| d.id == destination.id) {
            return Err(StoreError::Duplicate(destination.id.clone()));
        }
        tables.destinations.push(destination.clone());
        Ok(())
    }

    async fn get_destination(&self, id: &str) -> Result<Option<Destination>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.destinations.iter().find(|d| d.id == id).cloned())
    }

    async fn list_destinations(&self, only_active: bool) -> Result<Vec<Destination>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .destinations
            .iter()
            .filter(|d| !only_active || d.active)
            .cloned()
            .collect())
    }

    async fn update_destination(
        &self,
        id: &str,
        update: DestinationUpdate,
    ) -> Result<Option<Destination>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.destinations.iter_mut().find(|d| d.id == id).map(|destination| {
            update.apply(destination);
            destination.clone()
        }))
    }

    async fn toggle_destination(&self, id: &str) -> Result<Option<Destination>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.destinations.iter_mut().find(|d| d.id == id).map(|destination| {
            destination.active = !destination.active;
            destination.clone()
        }))
    }

    async fn delete_destination(&self, id: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.destinations.len();
        tables.destinations.retain(|d| d.id != id);
        Ok(tables.destinations.len() != before)
    }

    async fn insert_trip(&self, trip: &Trip) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.trips.iter().any(|t| t.id == trip.id) {
            return Err(StoreError::Duplicate(trip.id.clone()));
        }
        tables.trips.push(trip.clone());
        Ok(())
    }

    async fn get_trip(&self, id: &str) -> Result<Option<Trip>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.trips.iter().find(|t| t.id == id).cloned())
    }

    async fn list_trips(&self, user_id: &str) -> Result<Vec<Trip>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .trips
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn set_trip_status(
        &self,
        id: &str,
        status: TripStatus,
    ) -> Result<Option<Trip>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.trips.iter_mut().find(|t| t.id == id).map(|trip| {
            trip.status = status;
            trip.clone()
        }))
    }

    async fn delete_trip(&self, id: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.trips.len();
        tables.trips.retain(|t| t.id != id);
        Ok(tables.trips.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, username: &str) -> User {
        let now = Utc::now();
        User {
            id: id.to_string(),
            display_name: username.to_string(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "hash".to_string(),
            role: UserRole::User,
            failed_signins: 0,
            last_signin: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn trip(id: &str, user_id: &str) -> Trip {
        Trip {
            id: id.to_string(),
            user_id: user_id.to_string(),
            destination: Some("Bali".to_string()),
            destination_id: None,
            country: None,
            trip_date: None,
            start_date: None,
            end_date: None,
            image: None,
            description: None,
            activities: vec![],
            status: TripStatus::Planning,
            created_at: None,
        }
    }

    #[actix_rt::test]
    async fn duplicate_username_is_rejected() {
        let store = MemoryStore::new();
        store.insert_user(&user("1", "ana")).await.unwrap();
        let result = store.insert_user(&user("2", "ana")).await;
        assert!(matches!(result, Err(StoreError::Duplicate(_))));
    }

    #[actix_rt::test]
    async fn signin_bookkeeping() {
        let store = MemoryStore::new();
        store.insert_user(&user("1", "ana")).await.unwrap();

        store.record_signin("1", false).await.unwrap();
        store.record_signin("1", false).await.unwrap();
        let u = store.find_user_by_id("1").await.unwrap().unwrap();
        assert_eq!(u.failed_signins, 2);
        assert!(u.last_signin.is_none());

        store.record_signin("1", true).await.unwrap();
        let u = store.find_user_by_id("1").await.unwrap().unwrap();
        assert_eq!(u.failed_signins, 0);
        assert!(u.last_signin.is_some());
    }

    #[actix_rt::test]
    async fn deleting_user_cascades() {
        let store = MemoryStore::new();
        store.insert_user(&user("1", "ana")).await.unwrap();
        store.insert_user(&user("2", "ben")).await.unwrap();
        store.insert_trip(&trip("t1", "1")).await.unwrap();
        store.insert_trip(&trip("t2", "2")).await.unwrap();
        store
            .upsert_preferences(&UserPreferences {
                user_id: "1".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(store.delete_user("1").await.unwrap());
        assert!(store.list_trips("1").await.unwrap().is_empty());
        assert_eq!(store.list_trips("2").await.unwrap().len(), 1);
        assert!(store.get_preferences("1").await.unwrap().is_none());
        assert!(!store.delete_user("1").await.unwrap());
    }
}
