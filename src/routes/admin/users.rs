use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::db::store::TravelStore;
use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::user::{UserProfile, UserRole};

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateRoleResponse {
    pub success: bool,
    pub message: String,
    pub user_id: String,
    pub role: UserRole,
}

/*
    GET /admin/users
*/
pub async fn list_users(store: web::Data<dyn TravelStore>) -> Result<HttpResponse, ApiError> {
    let users: Vec<UserProfile> = store
        .list_users()
        .await?
        .iter()
        .map(UserProfile::from)
        .collect();
    Ok(HttpResponse::Ok().json(users))
}

/*
    PUT /admin/users/{id}/role
*/
pub async fn update_user_role(
    store: web::Data<dyn TravelStore>,
    path: web::Path<String>,
    input: web::Json<UpdateRoleRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    let role = input.into_inner().role;

    match store.set_user_role(&user_id, role).await? {
        Some(user) => {
            log::info!("User {} role set to {}", user.id, role.as_str());
            Ok(HttpResponse::Ok().json(UpdateRoleResponse {
                success: true,
                message: format!("User role updated to {}", role.as_str()),
                user_id: user.id,
                role,
            }))
        }
        None => Err(ApiError::NotFound("User not found".to_string())),
    }
}

/*
    DELETE /admin/users/{id}
*/
pub async fn delete_user(
    auth: AuthenticatedUser,
    store: web::Data<dyn TravelStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    if user_id == auth.user_id {
        return Err(ApiError::BadRequest(
            "Admins cannot delete their own account".to_string(),
        ));
    }

    if !store.delete_user(&user_id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }
    log::info!("Admin {} deleted user {}", auth.user_id, user_id);

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
