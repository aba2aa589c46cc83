use actix_web::{web, HttpResponse};

use crate::db::store::TravelStore;
use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::destination::{Destination, Recommendation};
use crate::models::preferences::UserPreferences;
use crate::services::match_scoring::MatchScorer;

/// Scores every destination and orders them best first. Equal scores keep
/// their catalog order.
pub fn rank_destinations(
    scorer: &MatchScorer,
    preferences: Option<&UserPreferences>,
    destinations: Vec<Destination>,
) -> Vec<Recommendation> {
    let mut ranked: Vec<Recommendation> = destinations
        .into_iter()
        .map(|destination| {
            let score = scorer.score(preferences, &destination);
            Recommendation::new(destination, score)
        })
        .collect();

    ranked.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    ranked
}

/*
    GET /destinations
*/
pub async fn list_active_destinations(
    store: web::Data<dyn TravelStore>,
) -> Result<HttpResponse, ApiError> {
    let destinations = store.list_destinations(true).await?;
    Ok(HttpResponse::Ok().json(destinations))
}

/*
    GET /recommendations/{user_id}
*/
pub async fn get_recommendations(
    auth: AuthenticatedUser,
    store: web::Data<dyn TravelStore>,
    scorer: web::Data<MatchScorer>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    auth.ensure_can_access(&user_id)?;

    let preferences = store.get_preferences(&user_id).await?;
    if preferences.is_none() {
        log::debug!("No preferences for user {}, using neutral scores", user_id);
    }

    let destinations = store.list_destinations(true).await?;
    let ranked = rank_destinations(&scorer, preferences.as_ref(), destinations);

    Ok(HttpResponse::Ok().json(ranked))
}
