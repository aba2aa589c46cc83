use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::error::ApiError;
use crate::middleware::auth::Claims;
use crate::models::user::UserRole;

/// Must run after [`AuthMiddleware`](crate::middleware::auth::AuthMiddleware),
/// i.e. be registered with `.wrap` before it.
pub struct RequireRole {
    required_role: UserRole,
}

impl RequireRole {
    pub fn new(role: UserRole) -> Self {
        RequireRole {
            required_role: role,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequireRoleService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleService {
            service,
            required_role: self.required_role,
        }))
    }
}

pub struct RequireRoleService<S> {
    service: S,
    required_role: UserRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleService<S>
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
        let claims = req.extensions().get::<Claims>().cloned();

        let Some(claims) = claims else {
            return Box::pin(ready(Err(Error::from(ApiError::Unauthorized(
                "No authorization".to_string(),
            )))));
        };

        let user_role = UserRole::from_claim(claims.role.as_deref());
        if user_role == self.required_role || user_role == UserRole::Admin {
            return Box::pin(self.service.call(req));
        }

        log::info!(
            "Access denied for user {}: requires {:?}",
            claims.user_id,
            self.required_role
        );
        Box::pin(ready(Err(Error::from(ApiError::Forbidden))))
    }
}
