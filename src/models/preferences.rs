use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    pub user_id: String,
    pub travel_style: Option<String>,
    pub budget: Option<String>,
    /// Older clients send a list of styles instead of a single token
    #[serde(default)]
    pub travel_styles: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub travel_frequency: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferencesInput {
    pub travel_style: Option<String>,
    pub budget: Option<String>,
    #[serde(default)]
    pub travel_styles: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub travel_frequency: Option<String>,
}

impl PreferencesInput {
    pub fn into_preferences(self, user_id: String, now: DateTime<Utc>) -> UserPreferences {
        let travel_style = non_empty(self.travel_style)
            .or_else(|| self.travel_styles.iter().find(|s| !s.trim().is_empty()).cloned());

        UserPreferences {
            user_id,
            travel_style,
            budget: non_empty(self.budget),
            travel_styles: self.travel_styles,
            interests: self.interests,
            travel_frequency: non_empty(self.travel_frequency),
            updated_at: Some(now),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
