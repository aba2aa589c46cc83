use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::db::store::TravelStore;
use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::chat::{ChatMessage, ChatRequest, ChatResponse};
use crate::services::chat::{build_prompt, mentioned_destinations, ChatCompletion};
use crate::services::chat_memory::ChatMemory;

/*
    POST /ai/chat/{user_id}
*/
pub async fn chat(
    auth: AuthenticatedUser,
    store: web::Data<dyn TravelStore>,
    completion: web::Data<dyn ChatCompletion>,
    memory: web::Data<ChatMemory>,
    path: web::Path<String>,
    input: web::Json<ChatRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    auth.ensure_can_access(&user_id)?;

    let message = input
        .into_inner()
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Message missing".to_string()))?;

    let prompt = build_prompt(&memory.history(&user_id), &message);
    let reply = completion.complete(&prompt).await?;

    memory.append(&user_id, ChatMessage::user(message));
    memory.append(&user_id, ChatMessage::assistant(reply.clone()));

    // Suggestions are best effort; a datastore hiccup should not lose the reply.
    let suggested_destinations = match store.list_destinations(true).await {
        Ok(destinations) => {
            mentioned_destinations(&reply, destinations.iter().map(|d| d.name.as_str()))
        }
        Err(err) => {
            log::warn!("Could not load destinations for chat suggestions: {}", err);
            Vec::new()
        }
    };

    Ok(HttpResponse::Ok().json(ChatResponse {
        reply,
        suggested_destinations,
    }))
}

/*
    DELETE /ai/chat/{user_id}
*/
pub async fn clear_chat(
    auth: AuthenticatedUser,
    memory: web::Data<ChatMemory>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    auth.ensure_can_access(&user_id)?;

    memory.clear(&user_id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Chat history cleared" })))
}
