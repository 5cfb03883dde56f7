use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub group_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
    pub sender_id: String,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub attachment_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn display_sender(&self) -> &str {
        self.sender_name.as_deref().unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
    pub session_id: Option<String>,
    pub content: Option<String>,
    pub attachment_url: Option<String>,
}

impl NewMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// A message with neither text nor an attachment is not worth sending.
    pub fn is_empty(&self) -> bool {
        let no_text = self.content.as_deref().is_none_or(|c| c.trim().is_empty());
        no_text && self.attachment_url.is_none()
    }
}
