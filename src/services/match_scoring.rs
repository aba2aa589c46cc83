use crate::models::{destination::Destination, preferences::UserPreferences};
use serde::{Deserialize, Serialize};

pub const MAX_SCORE: u8 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchWeights {
    /// Points for an exact travel style match
    pub style_points: u8,
    /// Points for an exact budget match
    pub budget_points: u8,
    /// Score returned when nothing matched or no preferences exist
    pub neutral_score: u8,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            style_points: 50,
            budget_points: 50,
            neutral_score: 50,
        }
    }
}

impl MatchWeights {
    /// Create weights from environment variables or use defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            style_points: std::env::var("MATCH_STYLE_POINTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.style_points),
            budget_points: std::env::var("MATCH_BUDGET_POINTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.budget_points),
            neutral_score: std::env::var("MATCH_NEUTRAL_SCORE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.neutral_score),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchScorer {
    pub weights: MatchWeights,
}

impl MatchScorer {
    pub fn new() -> Self {
        let weights = MatchWeights::from_env();
        log::info!("MatchScorer initialized with weights: {:?}", weights);
        Self { weights }
    }

    pub fn with_weights(weights: MatchWeights) -> Self {
        Self { weights }
    }

    /// Compatibility of a destination with a user's preferences, in `0..=100`.
    ///
    /// Each exactly matching field adds its points. A total of zero, which
    /// includes having no preferences at all, yields the neutral score.
    pub fn score(&self, preferences: Option<&UserPreferences>, destination: &Destination) -> u8 {
        let Some(preferences) = preferences else {
            return self.weights.neutral_score.min(MAX_SCORE);
        };

        let mut total: u32 = 0;
        if fields_match(&preferences.travel_style, &destination.travel_style) {
            total += u32::from(self.weights.style_points);
        }
        if fields_match(&preferences.budget, &destination.budget) {
            total += u32::from(self.weights.budget_points);
        }

        if total == 0 {
            return self.weights.neutral_score.min(MAX_SCORE);
        }
        total.min(u32::from(MAX_SCORE)) as u8
    }
}

fn fields_match(wanted: &Option<String>, offered: &Option<String>) -> bool {
    match (wanted, offered) {
        (Some(wanted), Some(offered)) => wanted == offered,
        _ => false,
    }
}

/// Scores with the default weights.
pub fn score(preferences: Option<&UserPreferences>, destination: &Destination) -> u8 {
    MatchScorer::default().score(preferences, destination)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination(style: Option<&str>, budget: Option<&str>) -> Destination {
        Destination {
            id: "d1".to_string(),
            name: "Kyoto".to_string(),
            country: "Japan".to_string(),
            travel_style: style.map(str::to_string),
            budget: budget.map(str::to_string),
            description: None,
            activities: vec![],
            season: None,
            image: None,
            active: true,
            created_at: None,
        }
    }

    fn prefs(style: Option<&str>, budget: Option<&str>) -> UserPreferences {
        UserPreferences {
            user_id: "u1".to_string(),
            travel_style: style.map(str::to_string),
            budget: budget.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn missing_preferences_are_neutral() {
        assert_eq!(score(None, &destination(Some("Luxury"), Some("High"))), 50);
        assert_eq!(score(None, &destination(None, None)), 50);
    }

    #[test]
    fn full_match_scores_100() {
        let p = prefs(Some("Luxury"), Some("High"));
        assert_eq!(score(Some(&p), &destination(Some("Luxury"), Some("High"))), 100);
    }

    #[test]
    fn mismatch_on_both_falls_back_to_neutral() {
        let p = prefs(Some("Adventure"), Some("Budget"));
        assert_eq!(score(Some(&p), &destination(Some("Luxury"), Some("High"))), 50);
    }

    #[test]
    fn single_field_match_scores_its_points() {
        let style_only = prefs(Some("Luxury"), Some("Budget"));
        assert_eq!(
            score(Some(&style_only), &destination(Some("Luxury"), Some("High"))),
            50
        );

        let budget_only = prefs(Some("Adventure"), Some("High"));
        assert_eq!(
            score(Some(&budget_only), &destination(Some("Luxury"), Some("High"))),
            50
        );
    }

    #[test]
    fn absent_preference_field_never_contributes() {
        let p = prefs(Some("Luxury"), None);
        assert_eq!(score(Some(&p), &destination(Some("Luxury"), Some("High"))), 50);

        // both sides absent is not a match
        let empty = prefs(None, None);
        assert_eq!(score(Some(&empty), &destination(None, None)), 50);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let p = prefs(Some("luxury"), Some("high"));
        assert_eq!(score(Some(&p), &destination(Some("Luxury"), Some("High"))), 50);
    }

    #[test]
    fn custom_weights_are_clamped() {
        let scorer = MatchScorer::with_weights(MatchWeights {
            style_points: 80,
            budget_points: 70,
            neutral_score: 120,
        });
        let p = prefs(Some("Luxury"), Some("High"));
        assert_eq!(scorer.score(Some(&p), &destination(Some("Luxury"), Some("High"))), 100);
        assert_eq!(scorer.score(None, &destination(None, None)), 100);
    }

    #[test]
    fn exhaustive_presence_combinations_stay_in_range() {
        let values = [None, Some("Luxury"), Some("Budget")];
        for ps in values {
            for pb in values {
                for ds in values {
                    for db in values {
                        let s = score(Some(&prefs(ps, pb)), &destination(ds, db));
                        assert!(s == 50 || s == 100, "unexpected score {s}");
                        let expected_hits = [(ps, ds), (pb, db)]
                            .iter()
                            .filter(|(a, b)| a.is_some() && a == b)
                            .count();
                        let expected = if expected_hits == 0 { 50 } else { expected_hits as u8 * 50 };
                        assert_eq!(s, expected);
                    }
                }
            }
        }
    }
}
