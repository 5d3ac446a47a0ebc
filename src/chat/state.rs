use std::rc::Rc;

use uuid::Uuid;
use yew::Reducible;

use crate::chat::extract::ChatOptions;

pub const GREETING: &str =
    "Hi 👋 I'm OneTracker AI. Ask me anything about OneTracker, features, or book a demo.";
pub const REPEAT_GREETING: &str = "Hi 👋 I'm OneTracker AI. How can I assist you today?";
pub const CANCELLED_MESSAGE: &str = "Booking cancelled. How else can I assist you?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
}

fn greeting(content: &str) -> ChatMessage {
    ChatMessage {
        id: "init".to_string(),
        role: Role::Assistant,
        content: content.to_string(),
    }
}

/// Rendered conversation state. Messages are append-only except for the
/// in-place content growth of the assistant message being revealed.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub options: ChatOptions,
    pub booking_active: bool,
}

impl ChatState {
    pub fn new() -> Self {
        Self {
            messages: vec![greeting(GREETING)],
            options: ChatOptions::None,
            booking_active: false,
        }
    }

    pub fn push_user(&mut self, content: String) {
        self.messages.push(ChatMessage {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            content,
        });
    }

    pub fn begin_assistant(&mut self, id: String) {
        self.messages.push(ChatMessage {
            id,
            role: Role::Assistant,
            content: String::new(),
        });
    }

    pub fn set_content(&mut self, id: &str, content: String) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == id) {
            message.content = content;
        }
    }

    /// Options derived from the latest reply; any non-empty set marks an
    /// active booking exchange.
    pub fn apply_options(&mut self, options: ChatOptions) {
        if !options.is_none() {
            self.booking_active = true;
        }
        self.options = options;
    }

    pub fn clear_options(&mut self) {
        self.options = ChatOptions::None;
    }

    pub fn end_booking(&mut self) {
        self.booking_active = false;
    }

    /// Cancel is client-local: fixed message, no backend round trip.
    pub fn cancel(&mut self) {
        self.messages = vec![greeting(CANCELLED_MESSAGE)];
        self.options = ChatOptions::None;
        self.booking_active = false;
    }

    /// After a confirmed booking the conversation returns to a single
    /// greeting message.
    pub fn reset_greeting(&mut self) {
        self.messages = vec![greeting(REPEAT_GREETING)];
        self.options = ChatOptions::None;
        self.booking_active = false;
    }
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

pub enum ChatAction {
    PushUser(String),
    BeginAssistant(String),
    SetContent { id: String, content: String },
    ApplyOptions(ChatOptions),
    ClearOptions,
    EndBooking,
    Cancel,
    ResetGreeting,
}

impl Reducible for ChatState {
    type Action = ChatAction;

    fn reduce(self: Rc<Self>, action: ChatAction) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ChatAction::PushUser(content) => next.push_user(content),
            ChatAction::BeginAssistant(id) => next.begin_assistant(id),
            ChatAction::SetContent { id, content } => next.set_content(&id, content),
            ChatAction::ApplyOptions(options) => next.apply_options(options),
            ChatAction::ClearOptions => next.clear_options(),
            ChatAction::EndBooking => next.end_booking(),
            ChatAction::Cancel => next.cancel(),
            ChatAction::ResetGreeting => next.reset_greeting(),
        }
        Rc::new(next)
    }
}
