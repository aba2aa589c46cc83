use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Destination {
    pub id: String,
    pub name: String,
    pub country: String,
    pub travel_style: Option<String>,
    pub budget: Option<String>,
    pub description: Option<String>,
    #[serde(default, alias = "tags", alias = "activity_tags")]
    pub activities: Vec<String>,
    pub season: Option<String>,
    pub image: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct NewDestination {
    pub name: Option<String>,
    pub country: Option<String>,
    pub travel_style: Option<String>,
    pub budget: Option<String>,
    pub description: Option<String>,
    #[serde(default, alias = "tags", alias = "activity_tags")]
    pub activities: Vec<String>,
    pub season: Option<String>,
    pub image: Option<String>,
    pub active: Option<bool>,
}

/// Partial update sent by the admin edit form. Absent fields are left alone.
#[derive(Debug, Default, Deserialize)]
pub struct DestinationUpdate {
    pub name: Option<String>,
    pub country: Option<String>,
    pub travel_style: Option<String>,
    pub budget: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "tags", alias = "activity_tags")]
    pub activities: Option<Vec<String>>,
    pub season: Option<String>,
    pub image: Option<String>,
    pub active: Option<bool>,
}

impl DestinationUpdate {
    pub fn apply(self, destination: &mut Destination) {
        if let Some(name) = self.name {
            destination.name = name;
        }
        if let Some(country) = self.country {
            destination.country = country;
        }
        if self.travel_style.is_some() {
            destination.travel_style = self.travel_style;
        }
        if self.budget.is_some() {
            destination.budget = self.budget;
        }
        if self.description.is_some() {
            destination.description = self.description;
        }
        if let Some(activities) = self.activities {
            destination.activities = activities;
        }
        if self.season.is_some() {
            destination.season = self.season;
        }
        if self.image.is_some() {
            destination.image = self.image;
        }
        if let Some(active) = self.active {
            destination.active = active;
        }
    }
}

/// A destination as returned by the recommendations endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub name: String,
    pub country: String,
    pub travel_style: Option<String>,
    pub budget: Option<String>,
    pub description: Option<String>,
    pub activities: Vec<String>,
    pub season: Option<String>,
    pub image: Option<String>,
    #[serde(rename = "match")]
    pub match_score: u8,
}

impl Recommendation {
    pub fn new(destination: Destination, match_score: u8) -> Self {
        Recommendation {
            id: destination.id,
            name: destination.name,
            country: destination.country,
            travel_style: destination.travel_style,
            budget: destination.budget,
            description: destination.description,
            activities: destination.activities,
            season: destination.season,
            image: destination.image,
            match_score,
        }
    }
}
