use actix_web::{web, HttpResponse};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use crate::db::store::TravelStore;
use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::trip::{NewTrip, Trip, TripResponse, TripStatus, TripStatusUpdate};
use crate::services::trip_status::{initial_status, parse_date, with_derived_status};

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_date(field: &str, value: Option<&str>) -> Result<(), ApiError> {
    match value {
        Some(raw) if parse_date(raw).is_none() => Err(ApiError::BadRequest(format!(
            "Invalid {field}, expected YYYY-MM-DD"
        ))),
        _ => Ok(()),
    }
}

async fn owned_trip(
    store: &dyn TravelStore,
    auth: &AuthenticatedUser,
    trip_id: &str,
) -> Result<Trip, ApiError> {
    let trip = store
        .get_trip(trip_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Trip not found".to_string()))?;
    auth.ensure_can_access(&trip.user_id)?;
    Ok(trip)
}

/*
    POST /trips
    POST /trips/create
*/
pub async fn create_trip(
    auth: AuthenticatedUser,
    store: web::Data<dyn TravelStore>,
    input: web::Json<NewTrip>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();

    let user_id = non_empty(input.user_id).unwrap_or_else(|| auth.user_id.clone());
    auth.ensure_can_access(&user_id)?;

    let mut destination = non_empty(input.destination);
    let destination_id = non_empty(input.destination_id);
    let mut country = non_empty(input.country);

    if destination.is_none() && destination_id.is_none() {
        return Err(ApiError::BadRequest("Missing destination".to_string()));
    }

    if let Some(id) = &destination_id {
        let catalog = store
            .get_destination(id)
            .await?
            .ok_or_else(|| ApiError::BadRequest("Unknown destination_id".to_string()))?;
        destination.get_or_insert(catalog.name);
        country.get_or_insert(catalog.country);
    }

    let trip_date = non_empty(input.trip_date);
    let start_date = non_empty(input.start_date);
    let end_date = non_empty(input.end_date);

    validate_date("trip_date", trip_date.as_deref())?;
    validate_date("start_date", start_date.as_deref())?;
    validate_date("end_date", end_date.as_deref())?;

    let start = start_date.as_deref().or(trip_date.as_deref()).and_then(parse_date);
    // Resolved the same way the status deriver resolves the trip's end.
    let end = end_date.as_deref().or(trip_date.as_deref()).and_then(parse_date);
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(ApiError::BadRequest(
                "Trip cannot end before it starts".to_string(),
            ));
        }
    }

    let now = Utc::now();
    let status = initial_status(
        input.status,
        start_date.as_deref(),
        end_date.as_deref(),
        trip_date.as_deref(),
        now.date_naive(),
    );

    let trip = Trip {
        id: ObjectId::new().to_hex(),
        user_id,
        destination,
        destination_id,
        country,
        trip_date,
        start_date,
        end_date,
        image: non_empty(input.image),
        description: non_empty(input.description),
        activities: input.activities,
        status,
        created_at: Some(now),
    };

    store.insert_trip(&trip).await?;
    log::info!("Created trip {} for user {} ({})", trip.id, trip.user_id, trip.status);

    Ok(HttpResponse::Ok().json(TripResponse {
        success: true,
        trip,
    }))
}

/*
    GET /trips/{user_id}
*/
pub async fn list_trips(
    auth: AuthenticatedUser,
    store: web::Data<dyn TravelStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    auth.ensure_can_access(&user_id)?;

    // Display-only: the derived status is not written back.
    let today = Utc::now().date_naive();
    let trips: Vec<Trip> = store
        .list_trips(&user_id)
        .await?
        .into_iter()
        .map(|trip| with_derived_status(trip, today))
        .collect();

    Ok(HttpResponse::Ok().json(trips))
}

/*
    PATCH /trips/status/{trip_id}
*/
pub async fn update_trip_status(
    auth: AuthenticatedUser,
    store: web::Data<dyn TravelStore>,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let trip_id = path.into_inner();

    let requested = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        serde_json::from_slice::<TripStatusUpdate>(&body)
            .map_err(|err| ApiError::BadRequest(format!("Invalid status update: {err}")))?
            .status
    };
    let status = requested.unwrap_or(TripStatus::Completed);

    owned_trip(store.get_ref(), &auth, &trip_id).await?;

    let trip = store
        .set_trip_status(&trip_id, status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Trip not found".to_string()))?;

    Ok(HttpResponse::Ok().json(TripResponse {
        success: true,
        trip,
    }))
}

/*
    DELETE /trips/{trip_id}
*/
pub async fn delete_trip(
    auth: AuthenticatedUser,
    store: web::Data<dyn TravelStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let trip_id = path.into_inner();
    owned_trip(store.get_ref(), &auth, &trip_id).await?;

    if !store.delete_trip(&trip_id).await? {
        return Err(ApiError::NotFound("Trip not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
