use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::models::chat::ChatMessage;

pub const DEFAULT_HISTORY_LIMIT: usize = 5;
pub const DEFAULT_MAX_USERS: usize = 1024;

#[derive(Default)]
struct MemoryState {
    histories: HashMap<String, VecDeque<ChatMessage>>,
    /// User ids ordered from least to most recently appended
    recency: VecDeque<String>,
}

/// Process-local conversation history per user.
///
/// Each history keeps only the newest `per_user_limit` messages, and at most
/// `max_users` histories are held. Nothing survives a restart.
pub struct ChatMemory {
    per_user_limit: usize,
    max_users: usize,
    state: Mutex<MemoryState>,
}

impl Default for ChatMemory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT, DEFAULT_MAX_USERS)
    }
}

impl ChatMemory {
    pub fn new(per_user_limit: usize, max_users: usize) -> Self {
        Self {
            per_user_limit,
            max_users: max_users.max(1),
            state: Mutex::new(MemoryState::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // The state is plain data; a panic elsewhere cannot leave it half-written.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn history(&self, user_id: &str) -> Vec<ChatMessage> {
        self.lock()
            .histories
            .get(user_id)
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn append(&self, user_id: &str, message: ChatMessage) {
        if self.per_user_limit == 0 {
            return;
        }

        let mut state = self.lock();

        if let Some(pos) = state.recency.iter().position(|id| id == user_id) {
            state.recency.remove(pos);
        } else if state.histories.len() >= self.max_users {
            if let Some(evicted) = state.recency.pop_front() {
                log::debug!("Evicting chat history for user {}", evicted);
                state.histories.remove(&evicted);
            }
        }
        state.recency.push_back(user_id.to_string());

        let history = state.histories.entry(user_id.to_string()).or_default();
        history.push_back(message);
        while history.len() > self.per_user_limit {
            history.pop_front();
        }
    }

    pub fn clear(&self, user_id: &str) {
        let mut state = self.lock();
        state.histories.remove(user_id);
        state.recency.retain(|id| id != user_id);
    }

    pub fn user_count(&self) -> usize {
        self.lock().histories.len()
    }
}
