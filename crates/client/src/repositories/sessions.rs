use async_trait::async_trait;
use serde_json::Value;
use studysync_core::{
    errors::{StudyError, StudyResult},
    models::session::{NewSession, Session, SessionRecord},
};
use tracing::{debug, warn};

use super::SessionStore;
use crate::http::ApiClient;

fn sessions_path(group_id: &str) -> String {
    format!("/api/groups/{}/sessions", group_id)
}

fn record_to_session(value: Value) -> StudyResult<Session> {
    let record: SessionRecord = serde_json::from_value(value)
        .map_err(|e| StudyError::Validation(format!("Malformed session record: {}", e)))?;
    Session::try_from(record)
}

/// Reads the `sessions` array of a response body.
///
/// A missing or non-array field counts as an empty list. Records that fail
/// validation are logged and skipped so one bad row cannot hide the rest.
pub(crate) fn parse_session_list(body: Value) -> Vec<Session> {
    let Value::Object(mut body) = body else {
        return Vec::new();
    };
    let Some(Value::Array(items)) = body.remove("sessions") else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match record_to_session(item) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Skipping session record: {}", e);
                None
            }
        })
        .collect()
}

#[async_trait]
impl SessionStore for ApiClient {
    async fn list_sessions(&self, group_id: &str) -> StudyResult<Vec<Session>> {
        let body: Value = self.get_json(&sessions_path(group_id), &[]).await?;
        let sessions = parse_session_list(body);
        debug!("Loaded {} sessions for group {}", sessions.len(), group_id);
        Ok(sessions)
    }

    async fn create_session(&self, group_id: &str, session: &NewSession) -> StudyResult<Session> {
        let body: Value = self.post_json(&sessions_path(group_id), session).await?;

        // The backend answers either `{"session": {...}}` or the bare record.
        let record = match body {
            Value::Object(mut map) if map.get("session").is_some_and(Value::is_object) => {
                map.remove("session").unwrap_or(Value::Null)
            }
            other => other,
        };

        record_to_session(record)
    }

    async fn delete_session(&self, group_id: &str, session_id: &str) -> StudyResult<()> {
        let path = format!("{}/{}", sessions_path(group_id), session_id);
        self.delete(&path).await
    }
}
