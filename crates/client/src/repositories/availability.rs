use async_trait::async_trait;
use chrono::SecondsFormat;
use serde_json::Value;
use studysync_core::{Interval, errors::StudyResult};

use super::AvailabilitySource;
use crate::http::ApiClient;

/// Pulls the member names out of `{"unavailable_usernames": [...]}`.
///
/// Anything that is not an array of strings is ignored; the signal is
/// advisory and should never fail the caller.
fn unavailable_names(body: &Value) -> Vec<String> {
    body.get("unavailable_usernames")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl AvailabilitySource for ApiClient {
    async fn unavailable_members(
        &self,
        group_id: &str,
        window: Interval,
    ) -> StudyResult<Vec<String>> {
        let path = format!("/api/groups/{}/availability", group_id);
        let query = [
            ("start", window.start.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ("end", window.end.to_rfc3339_opts(SecondsFormat::Millis, true)),
        ];

        let body: Value = self.get_json(&path, &query).await?;
        Ok(unavailable_names(&body))
    }
}
