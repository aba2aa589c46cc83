use std::env;

use thiserror::Error;

use crate::services::chat::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::services::chat_memory::{DEFAULT_HISTORY_LIMIT, DEFAULT_MAX_USERS};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const DATABASE: &str = "tripolingo";
const JWT_TTL_HOURS: i64 = 24;
const DEV_JWT_SECRET: &str = "tripolingo-development-secret";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// No URI means the in-memory store is used
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    pub groq_base_url: String,
    /// Emails granted the admin role at signup
    pub admin_emails: Vec<String>,
    pub chat_history_limit: usize,
    pub chat_max_users: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: HOST.to_string(),
            port: PORT,
            mongodb_uri: None,
            mongodb_database: DATABASE.to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_ttl_hours: JWT_TTL_HOURS,
            groq_api_key: None,
            groq_model: DEFAULT_MODEL.to_string(),
            groq_base_url: DEFAULT_BASE_URL.to_string(),
            admin_emails: Vec::new(),
            chat_history_limit: DEFAULT_HISTORY_LIMIT,
            chat_max_users: DEFAULT_MAX_USERS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let jwt_secret = match optional("JWT_SECRET") {
            Some(secret) => secret,
            None if cfg!(debug_assertions) => {
                log::warn!("JWT_SECRET not set, using development secret");
                defaults.jwt_secret
            }
            None => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        Ok(Self {
            host: optional("HOST").unwrap_or(defaults.host),
            port: parsed("PORT")?.unwrap_or(defaults.port),
            mongodb_uri: optional("MONGODB_URI"),
            mongodb_database: optional("MONGODB_DATABASE").unwrap_or(defaults.mongodb_database),
            jwt_secret,
            jwt_ttl_hours: parsed("JWT_TTL_HOURS")?.unwrap_or(defaults.jwt_ttl_hours),
            groq_api_key: optional("GROQ_API_KEY"),
            groq_model: optional("GROQ_MODEL").unwrap_or(defaults.groq_model),
            groq_base_url: optional("GROQ_BASE_URL").unwrap_or(defaults.groq_base_url),
            admin_emails: optional("ADMIN_EMAILS")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            chat_history_limit: parsed("CHAT_HISTORY_LIMIT")?
                .unwrap_or(defaults.chat_history_limit),
            chat_max_users: parsed("CHAT_MAX_USERS")?.unwrap_or(defaults.chat_max_users),
        })
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(email))
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match optional(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(None),
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
