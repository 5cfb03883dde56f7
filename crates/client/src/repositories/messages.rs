use async_trait::async_trait;
use serde_json::Value;
use studysync_core::{
    errors::{StudyError, StudyResult},
    models::chat::{ChatMessage, NewMessage},
};
use tracing::warn;

use super::MessageFeed;
use crate::http::ApiClient;

/// Reads the `messages` array of a response body, skipping malformed entries.
fn parse_message_list(body: Value) -> Vec<ChatMessage> {
    let Value::Object(mut body) = body else {
        return Vec::new();
    };
    let Some(Value::Array(items)) = body.remove("messages") else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<ChatMessage>(item) {
            Ok(message) => Some(message),
            Err(e) => {
                warn!("Skipping chat message: {}", e);
                None
            }
        })
        .collect()
}

fn messages_path(group_id: &str) -> String {
    format!("/api/groups/{}/messages", group_id)
}

#[async_trait]
impl MessageFeed for ApiClient {
    async fn list_messages(&self, group_id: &str, limit: usize) -> StudyResult<Vec<ChatMessage>> {
        let body: Value = self
            .get_json(&messages_path(group_id), &[("limit", limit.to_string())])
            .await?;
        Ok(parse_message_list(body))
    }

    async fn send_message(&self, group_id: &str, message: &NewMessage) -> StudyResult<ChatMessage> {
        if message.is_empty() {
            return Err(StudyError::Validation(
                "A message needs text or an attachment".to_string(),
            ));
        }

        let body: Value = self.post_json(&messages_path(group_id), message).await?;
        let record = match body {
            Value::Object(mut map) if map.get("message").is_some_and(Value::is_object) => {
                map.remove("message").unwrap_or(Value::Null)
            }
            other => other,
        };

        serde_json::from_value(record)
            .map_err(|e| StudyError::Validation(format!("Malformed chat message: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn skips_malformed_messages() {
        let messages = parse_message_list(json!({
            "messages": [
                {
                    "id": 1,
                    "group_id": "group-1",
                    "sender_id": "user-1",
                    "content": "hi",
                    "created_at": "2030-01-01T08:00:00Z"
                },
                { "id": "two", "content": "no sender" },
                {
                    "id": 3,
                    "group_id": "group-1",
                    "sender_id": "user-2",
                    "created_at": "yesterday"
                },
                {
                    "id": 4,
                    "group_id": "group-1",
                    "sender_id": "user-2",
                    "attachment_url": "https://files.example/notes.pdf",
                    "created_at": "2030-01-01T08:05:00Z"
                }
            ]
        }));

        let ids: Vec<_> = messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn missing_or_wrong_shape_is_empty() {
        assert!(parse_message_list(json!({})).is_empty());
        assert!(parse_message_list(json!({ "messages": null })).is_empty());
        assert!(parse_message_list(json!([])).is_empty());
    }
}
