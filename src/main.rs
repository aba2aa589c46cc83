use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};
use env_logger::Env;

use tripolingo_api::config::AppConfig;
use tripolingo_api::db::{self, MemoryStore, MongoStore, TravelStore};
use tripolingo_api::services::chat::{ChatCompletion, GroqChatClient};
use tripolingo_api::services::match_scoring::MatchScorer;
use tripolingo_api::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    log::info!("Application starting...");

    let config = AppConfig::from_env()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;

    let store: Arc<dyn TravelStore> = match &config.mongodb_uri {
        Some(uri) => {
            let client = db::mongo::create_mongo_client(uri)
                .await
                .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
            let store = MongoStore::connect(&client, &config.mongodb_database)
                .await
                .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
            log::info!("Using MongoDB database {}", config.mongodb_database);
            Arc::new(store)
        }
        None => {
            log::warn!("MONGODB_URI not set, using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    if config.groq_api_key.is_none() {
        log::warn!("GROQ_API_KEY not set, AI chat will be unavailable");
    }
    let chat: Arc<dyn ChatCompletion> = Arc::new(GroqChatClient::new(
        config.groq_api_key.clone(),
        config.groq_model.clone(),
        config.groq_base_url.clone(),
    ));

    let host = config.host.clone();
    let port = config.port;
    let state = AppState::new(config, store, chat, MatchScorer::new());

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(|cfg| state.configure(cfg))
    })
    .bind((host, port))?
    .run()
    .await
}
