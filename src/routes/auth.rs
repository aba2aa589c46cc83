use actix_web::{web, HttpResponse};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;

use crate::config::AppConfig;
use crate::db::store::{StoreError, TravelStore};
use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::user::{
    AuthResponse, SignInRequest, SignUpRequest, User, UserProfile, UserRole,
};
use crate::services::auth_service::{generate_token, hash_password, is_valid_email, verify_password};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

fn token_for(user: &User, config: &AppConfig) -> Result<String, ApiError> {
    generate_token(user, &config.jwt_secret, config.jwt_ttl_hours)
        .map_err(|err| ApiError::Internal(format!("Token generation failed: {err}")))
}

/*
    POST /auth/signup
*/
pub async fn signup(
    store: web::Data<dyn TravelStore>,
    config: web::Data<AppConfig>,
    input: web::Json<SignUpRequest>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    let username = input.username.trim().to_string();
    let email = input.email.trim().to_string();
    let display_name = input.display_name.trim().to_string();

    if username.is_empty() || display_name.is_empty() || input.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Display name, username and password are required".to_string(),
        ));
    }
    if !is_valid_email(&email) {
        return Err(ApiError::BadRequest("Invalid email address".to_string()));
    }

    if store.find_user_by_username(&username).await?.is_some() {
        return Err(ApiError::BadRequest("Username already exists".to_string()));
    }
    if store.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already exists".to_string()));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|err| ApiError::Internal(format!("Password hashing failed: {err}")))?;

    let role = if config.is_admin_email(&email) {
        UserRole::Admin
    } else {
        UserRole::User
    };

    let now = Utc::now();
    let user = User {
        id: ObjectId::new().to_hex(),
        display_name,
        username,
        email,
        password_hash,
        role,
        failed_signins: 0,
        last_signin: None,
        created_at: now,
        updated_at: now,
    };

    match store.insert_user(&user).await {
        Ok(()) => {}
        // lost a race with a concurrent signup
        Err(StoreError::Duplicate(_)) => {
            return Err(ApiError::BadRequest("User already exists".to_string()))
        }
        Err(err) => return Err(err.into()),
    }
    log::info!("Created user {} ({})", user.username, user.id);

    let auth_token = token_for(&user, &config)?;
    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "User created successfully".to_string(),
        user: UserProfile::from(&user),
        auth_token,
    }))
}

/*
    POST /auth/signin
*/
pub async fn signin(
    store: web::Data<dyn TravelStore>,
    config: web::Data<AppConfig>,
    input: web::Json<SignInRequest>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();

    let Some(user) = store.find_user_by_username(input.username.trim()).await? else {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if !verify_password(&input.password, &user.password_hash) {
        store.record_signin(&user.id, false).await?;
        log::info!(
            "Failed signin for {} ({} previous failures)",
            user.username,
            user.failed_signins
        );
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    store.record_signin(&user.id, true).await?;

    let auth_token = token_for(&user, &config)?;
    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Sign in successful".to_string(),
        user: UserProfile::from(&user),
        auth_token,
    }))
}

/*
    GET /auth/session
*/
pub async fn user_session(
    auth: AuthenticatedUser,
    store: web::Data<dyn TravelStore>,
) -> Result<HttpResponse, ApiError> {
    match store.find_user_by_id(&auth.user_id).await? {
        Some(user) => Ok(HttpResponse::Ok().json(UserProfile::from(&user))),
        None => Err(ApiError::NotFound("User not found".to_string())),
    }
}

/*
    GET /auth/user/{user_id}
*/
pub async fn get_user(
    auth: AuthenticatedUser,
    store: web::Data<dyn TravelStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    auth.ensure_can_access(&user_id)?;

    match store.find_user_by_id(&user_id).await? {
        Some(user) => Ok(HttpResponse::Ok().json(UserProfile::from(&user))),
        None => Err(ApiError::NotFound("User not found".to_string())),
    }
}
