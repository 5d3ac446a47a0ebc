use std::rc::Rc;
use uuid::Uuid;

use crate::utils::storage::KeyValueStore;

pub const SESSION_KEY: &str = "chat_session_id";

/// Session identifier handed to the chat backend so it can correlate
/// conversation state. The client keeps nothing else between turns.
#[derive(Clone)]
pub struct ChatSession {
    store: Rc<dyn KeyValueStore>,
}

impl ChatSession {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Return the persisted id, creating one on first use.
    pub fn ensure_id(&self) -> String {
        if let Some(id) = self.store.get(SESSION_KEY) {
            return id;
        }
        let id = format!("session_{}", Uuid::new_v4());
        self.store.set(SESSION_KEY, &id);
        id
    }

    /// Drop the id so the next interaction starts a fresh conversation.
    pub fn clear(&self) {
        self.store.remove(SESSION_KEY);
    }
}
