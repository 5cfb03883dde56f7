use async_trait::async_trait;
use serde_json::Value;
use studysync_core::{errors::StudyResult, models::session::Session};

use super::{AcceptedSessionSource, sessions::parse_session_list};
use crate::http::ApiClient;

const ACCEPTED_SESSIONS_PATH: &str = "/api/my/sessions";

#[async_trait]
impl AcceptedSessionSource for ApiClient {
    async fn accepted_sessions(&self) -> StudyResult<Vec<Session>> {
        let body: Value = self
            .get_json(ACCEPTED_SESSIONS_PATH, &[("status", "accepted".to_string())])
            .await?;
        Ok(parse_session_list(body))
    }
}
