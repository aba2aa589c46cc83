use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::env;

use crate::config::AppConfig;
use crate::db::store::TravelStore;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "online",
        "message": "Travel Agent API is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn health_check(
    store: web::Data<dyn TravelStore>,
    config: web::Data<AppConfig>,
) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let datastore = check_datastore(store.get_ref()).await;
    let chat = check_chat(&config);

    // Chat being unconfigured is reported but does not degrade the service.
    if datastore.status != "ok" {
        health.status = "degraded".to_string();
    }

    health.services.insert("datastore".to_string(), datastore);
    health.services.insert("ai_chat".to_string(), chat);

    HttpResponse::Ok().json(health)
}

async fn check_datastore(store: &dyn TravelStore) -> ServiceStatus {
    match store.ping().await {
        Ok(()) => ServiceStatus {
            status: "ok".to_string(),
            details: Some("Datastore reachable".to_string()),
        },
        Err(e) => {
            log::error!("Datastore health check failed: {}", e);

            ServiceStatus {
                status: "error".to_string(),
                details: Some("Failed to reach datastore".to_string()),
            }
        }
    }
}

fn check_chat(config: &AppConfig) -> ServiceStatus {
    if config.groq_api_key.is_some() {
        ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("Model {}", config.groq_model)),
        }
    } else {
        ServiceStatus {
            status: "unconfigured".to_string(),
            details: Some("GROQ_API_KEY not set".to_string()),
        }
    }
}
