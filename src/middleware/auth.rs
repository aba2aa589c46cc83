use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::services::auth_service::decode_token;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,     // subject (email)
    pub exp: usize,      // expiration time
    pub iat: usize,      // issued at
    pub user_id: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Validates the bearer token and stores its [`Claims`] in the request
/// extensions.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let header = req.headers().get("Authorization")?.to_str().ok()?;
    header.strip_prefix("Bearer ").map(|t| t.trim().to_string())
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(token) = bearer_token(&req) else {
            return Box::pin(ready(Err(Error::from(ApiError::Unauthorized(
                "No authorization header".to_string(),
            )))));
        };

        let Some(secret) = req
            .app_data::<web::Data<AppConfig>>()
            .map(|config| config.jwt_secret.clone())
        else {
            return Box::pin(ready(Err(Error::from(ApiError::Internal(
                "AppConfig missing from app data".to_string(),
            )))));
        };

        match decode_token(&token, &secret) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                Box::pin(self.service.call(req))
            }
            Err(err) => {
                log::debug!("Error decoding token: {:?}", err);
                Box::pin(ready(Err(Error::from(ApiError::Unauthorized(
                    "Invalid token".to_string(),
                )))))
            }
        }
    }
}
