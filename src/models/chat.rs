// src/models/chat.rs
// DOCUMENTATION: Assistant chat messages
// PURPOSE: Session-local transcript entries; never persisted server side

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const ASSISTANT_GREETING: &str = "Hi there! I'm your Mountain View Assistant. Ask me about \
the park, local Texas attractions, or for help planning your trip! I can also look up the \
real-time weather in Van Horn for you.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Guest turns live only in the client transcript
    #[allow(dead_code)]
    User,
    Assistant,
}

/// Web citation attached to a grounded answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<GroundingSource>,
}

impl ChatMessage {
    pub fn assistant(text: impl Into<String>, sources: Vec<GroundingSource>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
            sources,
        }
    }

    pub fn greeting() -> Self {
        Self::assistant(ASSISTANT_GREETING, Vec::new())
    }
}

/// POST /assistant/chat body
#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
}
