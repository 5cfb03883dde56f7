use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::StudyError;

/// Length assumed for a session whose duration is missing or not positive.
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

/// A scheduled study meeting belonging to a group.
///
/// `duration_minutes` is kept exactly as the backend sent it; it is only
/// normalized when a window is derived from the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub group_id: String,
    pub creator_id: String,
    pub start_at: DateTime<Utc>,
    #[serde(rename = "time_goal_minutes", alias = "duration_minutes", default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub content_goal: Option<String>,
}

/// A session record as it arrives from the backend, before validation.
///
/// Timestamps are still strings here; [`Session::try_from`] rejects records
/// whose `start_at` is not an RFC 3339 instant.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    #[serde(default)]
    pub group_id: String,
    #[serde(default)]
    pub creator_id: String,
    pub start_at: String,
    #[serde(default, alias = "duration_minutes")]
    pub time_goal_minutes: Option<Value>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub content_goal: Option<String>,
}

impl TryFrom<SessionRecord> for Session {
    type Error = StudyError;

    fn try_from(record: SessionRecord) -> Result<Self, Self::Error> {
        let start_at = DateTime::parse_from_rfc3339(&record.start_at)
            .map_err(|e| {
                StudyError::Validation(format!(
                    "Session {} has invalid start_at {:?}: {}",
                    record.id, record.start_at, e
                ))
            })?
            .with_timezone(&Utc);

        // Only JSON numbers count as a duration; anything else falls back to the default later.
        let duration_minutes = record.time_goal_minutes.as_ref().and_then(|value| match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
            _ => None,
        });

        Ok(Session {
            id: record.id,
            group_id: record.group_id,
            creator_id: record.creator_id,
            start_at,
            duration_minutes,
            venue: record.venue,
            topic: record.topic,
            content_goal: record.content_goal,
        })
    }
}

/// A session the user is about to create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSession {
    pub start_at: DateTime<Utc>,
    #[serde(rename = "time_goal_minutes", alias = "duration_minutes", default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub content_goal: Option<String>,
}

impl NewSession {
    pub fn starting_at(start_at: DateTime<Utc>) -> Self {
        Self {
            start_at,
            duration_minutes: None,
            venue: None,
            topic: None,
            content_goal: None,
        }
    }

    pub fn with_duration(mut self, minutes: i64) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = Some(venue.into());
        self
    }
}
