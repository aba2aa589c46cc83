use actix_web::{web, HttpResponse};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use crate::db::store::TravelStore;
use crate::error::ApiError;
use crate::models::destination::{Destination, DestinationUpdate, NewDestination};

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{field} is required")))
}

/*
    GET /admin/destinations
*/
pub async fn list_destinations(
    store: web::Data<dyn TravelStore>,
) -> Result<HttpResponse, ApiError> {
    let destinations = store.list_destinations(false).await?;
    Ok(HttpResponse::Ok().json(destinations))
}

/*
    POST /admin/destinations
*/
pub async fn create_destination(
    store: web::Data<dyn TravelStore>,
    input: web::Json<NewDestination>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();

    let destination = Destination {
        id: ObjectId::new().to_hex(),
        name: required(input.name, "name")?,
        country: required(input.country, "country")?,
        travel_style: input.travel_style,
        budget: input.budget,
        description: input.description,
        activities: input
            .activities
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect(),
        season: input.season,
        image: input.image,
        active: input.active.unwrap_or(true),
        created_at: Some(Utc::now()),
    };

    store.insert_destination(&destination).await?;
    log::info!("Created destination {} ({})", destination.name, destination.id);

    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": destination })))
}

/*
    PATCH /admin/destinations/{id}

    An empty body toggles `active`; a JSON body updates the given fields.
*/
pub async fn patch_destination(
    store: web::Data<dyn TravelStore>,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let updated = if body.iter().all(u8::is_ascii_whitespace) {
        store.toggle_destination(&id).await?
    } else {
        let update: DestinationUpdate = serde_json::from_slice(&body)
            .map_err(|err| ApiError::BadRequest(format!("Invalid destination update: {err}")))?;
        if matches!(&update.name, Some(name) if name.trim().is_empty()) {
            return Err(ApiError::BadRequest("name is required".to_string()));
        }
        store.update_destination(&id, update).await?
    };

    match updated {
        Some(destination) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": destination }))),
        None => Err(ApiError::NotFound("Destination not found".to_string())),
    }
}

/*
    DELETE /admin/destinations/{id}
*/
pub async fn delete_destination(
    store: web::Data<dyn TravelStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    if !store.delete_destination(&path.into_inner()).await? {
        return Err(ApiError::NotFound("Destination not found".to_string()));
    }
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
