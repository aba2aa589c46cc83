#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_web::{
    dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse},
    http::StatusCode,
    test, App,
};
use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;

use tripolingo_api::config::AppConfig;
use tripolingo_api::db::{MemoryStore, TravelStore};
use tripolingo_api::models::{
    chat::ChatMessage,
    destination::Destination,
    user::{User, UserRole},
};
use tripolingo_api::services::auth_service::generate_token;
use tripolingo_api::services::chat::{ChatCompletion, ChatError};
use tripolingo_api::services::match_scoring::MatchScorer;
use tripolingo_api::AppState;

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_PASSWORD: &str = "testpassword123";
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// Replies with a fixed text and records every prompt it was sent.
pub struct ScriptedChat {
    pub reply: String,
    pub prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedChat {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> Vec<ChatMessage> {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ChatCompletion for ScriptedChat {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        self.prompts.lock().unwrap().push(messages.to_vec());
        Ok(self.reply.clone())
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: TEST_SECRET.to_string(),
        admin_emails: vec![ADMIN_EMAIL.to_string()],
        ..Default::default()
    }
}

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub chat: Arc<ScriptedChat>,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_chat(Arc::new(ScriptedChat::new(
            "Kyoto is wonderful in spring, and Bali is great for surfing.",
        )))
    }

    pub fn with_chat(chat: Arc<ScriptedChat>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(
            test_config(),
            store.clone(),
            chat.clone(),
            MatchScorer::default(),
        );
        Self { store, chat, state }
    }

    pub fn with_completion(completion: Arc<dyn ChatCompletion>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(test_config(), store.clone(), completion, MatchScorer::default());
        Self {
            store,
            chat: Arc::new(ScriptedChat::new("")),
            state,
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().configure(|cfg| self.state.configure(cfg))
    }

    /// Inserts a user directly and returns it with a bearer header value.
    pub async fn seed_user(&self, username: &str, role: UserRole) -> (User, String) {
        let now = Utc::now();
        let user = User {
            id: ObjectId::new().to_hex(),
            display_name: username.to_string(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: bcrypt::hash(TEST_PASSWORD, 4).unwrap(),
            role,
            failed_signins: 0,
            last_signin: None,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_user(&user).await.unwrap();
        let token = bearer(&user);
        (user, token)
    }

    pub async fn seed_destination(
        &self,
        name: &str,
        travel_style: &str,
        budget: &str,
        active: bool,
    ) -> Destination {
        let destination = Destination {
            id: ObjectId::new().to_hex(),
            name: name.to_string(),
            country: "Somewhere".to_string(),
            travel_style: Some(travel_style.to_string()),
            budget: Some(budget.to_string()),
            description: Some(format!("{name} description")),
            activities: vec!["Walking".to_string()],
            season: None,
            image: None,
            active,
            created_at: Some(Utc::now()),
        };
        self.store.insert_destination(&destination).await.unwrap();
        destination
    }
}

pub fn bearer(user: &User) -> String {
    format!("Bearer {}", generate_token(user, TEST_SECRET, 1).unwrap())
}

/// Status of a call whether it was answered by a handler or rejected by
/// middleware.
pub async fn status_of<S, B>(app: &S, req: actix_http::Request) -> StatusCode
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => resp.status(),
        Err(err) => err.as_response_error().status_code(),
    }
}

/// Status and JSON body of a call, including middleware rejections.
pub async fn json_of<S>(app: &S, req: actix_http::Request) -> (StatusCode, serde_json::Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = match test::try_call_service(app, req).await {
        Ok(resp) => resp.into_parts().1,
        Err(err) => err.error_response(),
    };
    let status = response.status();
    let bytes = actix_web::body::to_bytes(response.into_body()).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}
