pub mod chat;
pub mod destination;
pub mod preferences;
pub mod trip;
pub mod user;
