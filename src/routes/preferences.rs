use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::db::store::TravelStore;
use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::preferences::PreferencesInput;

/*
    POST /user/preferences/{user_id}
*/
pub async fn save_preferences(
    auth: AuthenticatedUser,
    store: web::Data<dyn TravelStore>,
    path: web::Path<String>,
    input: web::Json<PreferencesInput>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    auth.ensure_can_access(&user_id)?;

    let preferences = input.into_inner().into_preferences(user_id, Utc::now());
    store.upsert_preferences(&preferences).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Preferences saved successfully" })))
}

/*
    GET /user/preferences/{user_id}
*/
pub async fn get_preferences(
    auth: AuthenticatedUser,
    store: web::Data<dyn TravelStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    auth.ensure_can_access(&user_id)?;

    match store.get_preferences(&user_id).await? {
        Some(preferences) => Ok(HttpResponse::Ok().json(preferences)),
        None => Err(ApiError::NotFound("Preferences not found".to_string())),
    }
}
