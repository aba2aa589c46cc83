use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::chat::ChatMessage;

pub const SYSTEM_PROMPT: &str = "You are Tripolingo AI, a cinematic smart travel assistant.";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat completion is not configured")]
    NotConfigured,
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: status {status}, body {body}")]
    Api { status: u16, body: String },
    #[error("completion returned no choices")]
    EmptyResponse,
}

#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// Client for Groq's OpenAI-compatible chat completions endpoint.
pub struct GroqChatClient {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GroqChatClient {
    pub fn new(api_key: Option<String>, model: String, base_url: String) -> Self {
        Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ChatCompletion for GroqChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let api_key = self.api_key.as_deref().ok_or(ChatError::NotConfigured)?;
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&CompletionRequest {
                model: &self.model,
                messages,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ChatError::Api { status, body });
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ChatError::EmptyResponse)
    }
}

/// Builds the prompt: system prompt, prior history, then the new message.
pub fn build_prompt(history: &[ChatMessage], message: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(SYSTEM_PROMPT));
    messages.extend(history.iter().cloned());
    messages.push(ChatMessage::user(message));
    messages
}

/// Names from `candidates` that the reply mentions as whole words, in
/// candidate order.
pub fn mentioned_destinations<'a, I>(reply: &str, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut found: Vec<String> = Vec::new();
    for name in candidates {
        let needle = name.trim();
        if needle.is_empty() || found.iter().any(|f| f.eq_ignore_ascii_case(needle)) {
            continue;
        }
        // Bounded by non-word characters rather than `\b`, so names ending
        // in punctuation still match.
        let pattern = format!(r"(?i)(?:^|\W){}(?:\W|$)", regex::escape(needle));
        match Regex::new(&pattern) {
            Ok(re) if re.is_match(reply) => found.push(needle.to_string()),
            Ok(_) => {}
            Err(err) => log::warn!("Skipping destination {:?} for suggestions: {}", needle, err),
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::ChatRole;

    #[test]
    fn prompt_wraps_history() {
        let history = vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")];
        let prompt = build_prompt(&history, "where to?");

        assert_eq!(prompt.len(), 4);
        assert_eq!(prompt[0].role, ChatRole::System);
        assert_eq!(prompt[0].content, SYSTEM_PROMPT);
        assert_eq!(prompt[3], ChatMessage::user("where to?"));
    }

    #[test]
    fn mentions_are_case_insensitive_and_unique() {
        let names = ["Kyoto", "Paris", "Bali", "kyoto"];
        let found = mentioned_destinations("Try KYOTO in spring, or paris.", names);
        assert_eq!(found, vec!["Kyoto".to_string(), "Paris".to_string()]);
    }

    #[test]
    fn mentions_match_whole_words_only() {
        let names = ["Bali", "Nice", "St. Lucia.", "Rio"];
        let found = mentioned_destinations(
            "Balinese food is great and the weather is nice. Or try St. Lucia. Rio!",
            names,
        );
        assert_eq!(
            found,
            vec!["Nice".to_string(), "St. Lucia.".to_string(), "Rio".to_string()]
        );

        assert!(mentioned_destinations("Balinese dancers", ["Bali"]).is_empty());
        assert_eq!(mentioned_destinations("Bali", ["Bali"]), vec!["Bali".to_string()]);
    }

    #[test]
    fn message_serializes_in_openai_shape() {
        let json = serde_json::to_value(ChatMessage::user("hey")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hey"}));
    }

    #[actix_rt::test]
    async fn missing_key_is_not_configured() {
        let client = GroqChatClient::new(None, DEFAULT_MODEL.to_string(), DEFAULT_BASE_URL.to_string());
        let result = client.complete(&[ChatMessage::user("hi")]).await;
        assert!(matches!(result, Err(ChatError::NotConfigured)));
    }
}
