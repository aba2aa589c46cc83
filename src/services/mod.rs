pub mod auth_service;
pub mod chat;
pub mod chat_memory;
pub mod match_scoring;
pub mod trip_status;
