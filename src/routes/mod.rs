use actix_web::web;

use crate::middleware::auth::AuthMiddleware;

pub mod admin;
pub mod auth;
pub mod chat;
pub mod health;
pub mod preferences;
pub mod recommendations;
pub mod trips;

/// Registers every route. The protected catch-all scope goes last since an
/// empty prefix matches every path.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::root))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/auth")
                .route("/signup", web::post().to(auth::signup))
                .route("/signin", web::post().to(auth::signin))
                .service(
                    web::scope("")
                        .wrap(AuthMiddleware)
                        .route("/session", web::get().to(auth::user_session))
                        .route("/user/{user_id}", web::get().to(auth::get_user)),
                ),
        )
        .route(
            "/destinations",
            web::get().to(recommendations::list_active_destinations),
        )
        .configure(admin::config)
        .service(
            web::scope("")
                .wrap(AuthMiddleware)
                .route(
                    "/user/preferences/{user_id}",
                    web::post().to(preferences::save_preferences),
                )
                .route(
                    "/user/preferences/{user_id}",
                    web::get().to(preferences::get_preferences),
                )
                .route(
                    "/recommendations/{user_id}",
                    web::get().to(recommendations::get_recommendations),
                )
                .route("/ai/chat/{user_id}", web::post().to(chat::chat))
                .route("/ai/chat/{user_id}", web::delete().to(chat::clear_chat))
                .route("/trips", web::post().to(trips::create_trip))
                .route("/trips/create", web::post().to(trips::create_trip))
                .route(
                    "/trips/status/{trip_id}",
                    web::patch().to(trips::update_trip_status),
                )
                .route("/trips/{user_id}", web::get().to(trips::list_trips))
                .route("/trips/{trip_id}", web::delete().to(trips::delete_trip)),
        );
}
