use actix_web::web;

use crate::middleware::auth::AuthMiddleware;
use crate::middleware::role_auth::RequireRole;
use crate::models::user::UserRole;

pub mod destinations;
pub mod users;

pub fn config(cfg: &mut web::ServiceConfig) {
    // The last `wrap` runs first, so tokens are decoded before the role check.
    cfg.service(
        web::scope("/admin")
            .wrap(RequireRole::new(UserRole::Admin))
            .wrap(AuthMiddleware)
            .route("/destinations", web::get().to(destinations::list_destinations))
            .route("/destinations", web::post().to(destinations::create_destination))
            .route("/destinations/{id}", web::patch().to(destinations::patch_destination))
            .route("/destinations/{id}", web::delete().to(destinations::delete_destination))
            .route("/users", web::get().to(users::list_users))
            .route("/users/{id}/role", web::put().to(users::update_user_role))
            .route("/users/{id}", web::delete().to(users::delete_user)),
    );
}
