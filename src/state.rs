use std::sync::Arc;

use actix_web::web;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::db::store::TravelStore;
use crate::routes;
use crate::services::chat::ChatCompletion;
use crate::services::chat_memory::ChatMemory;
use crate::services::match_scoring::MatchScorer;

/// Shared handles registered as app data on every worker.
#[derive(Clone)]
pub struct AppState {
    pub config: web::Data<AppConfig>,
    pub store: web::Data<dyn TravelStore>,
    pub chat: web::Data<dyn ChatCompletion>,
    pub memory: web::Data<ChatMemory>,
    pub scorer: web::Data<MatchScorer>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn TravelStore>,
        chat: Arc<dyn ChatCompletion>,
        scorer: MatchScorer,
    ) -> Self {
        let memory = ChatMemory::new(config.chat_history_limit, config.chat_max_users);
        Self {
            config: web::Data::new(config),
            store: web::Data::from(store),
            chat: web::Data::from(chat),
            memory: web::Data::new(memory),
            scorer: web::Data::new(scorer),
        }
    }

    /// Registers the shared state and all routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.config.clone())
            .app_data(self.store.clone())
            .app_data(self.chat.clone())
            .app_data(self.memory.clone())
            .app_data(self.scorer.clone())
            .app_data(json_config());
        routes::configure(cfg);
    }
}

/// Malformed JSON bodies are reported in the same `{"detail": ..}` shape as
/// handler errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::BadRequest(format!("Invalid request body: {err}")).into()
    })
}
