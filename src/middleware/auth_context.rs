use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};

use crate::error::ApiError;
use crate::middleware::auth::Claims;
use crate::models::user::UserRole;

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Allows access to resources owned by `owner_id`.
    pub fn ensure_can_access(&self, owner_id: &str) -> Result<(), ApiError> {
        if self.user_id == owner_id || self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(claims) = req.extensions().get::<Claims>() {
            ready(Ok(AuthenticatedUser {
                user_id: claims.user_id.clone(),
                email: claims.sub.clone(),
                role: UserRole::from_claim(claims.role.as_deref()),
            }))
        } else {
            ready(Err(ApiError::Unauthorized(
                "User not authenticated".to_string(),
            )))
        }
    }
}
