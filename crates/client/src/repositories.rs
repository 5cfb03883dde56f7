//! Collaborator interfaces the planner depends on, and their HTTP implementations.
//!
//! The session store is required. Accepted sessions and availability come from
//! endpoints the backend may not implement, so the planner holds them as
//! optional capabilities and treats any failure as "no signal".

use async_trait::async_trait;
use studysync_core::{
    Interval,
    errors::StudyResult,
    models::{
        chat::{ChatMessage, NewMessage},
        session::{NewSession, Session},
    },
};

pub mod accepted;
pub mod availability;
pub mod messages;
pub mod sessions;

/// Create/list/delete for a group's sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Sessions of the group in backend order. Records whose timestamps do
    /// not parse are dropped rather than failing the whole list.
    async fn list_sessions(&self, group_id: &str) -> StudyResult<Vec<Session>>;

    async fn create_session(&self, group_id: &str, session: &NewSession) -> StudyResult<Session>;

    async fn delete_session(&self, group_id: &str, session_id: &str) -> StudyResult<()>;
}

/// Sessions the signed-in user has accepted, across all groups.
#[async_trait]
pub trait AcceptedSessionSource: Send + Sync {
    async fn accepted_sessions(&self) -> StudyResult<Vec<Session>>;
}

/// Members of a group considered unavailable during a window.
#[async_trait]
pub trait AvailabilitySource: Send + Sync {
    async fn unavailable_members(
        &self,
        group_id: &str,
        window: Interval,
    ) -> StudyResult<Vec<String>>;
}

/// Group chat, refreshed by polling.
#[async_trait]
pub trait MessageFeed: Send + Sync {
    async fn list_messages(&self, group_id: &str, limit: usize) -> StudyResult<Vec<ChatMessage>>;

    async fn send_message(&self, group_id: &str, message: &NewMessage) -> StudyResult<ChatMessage>;
}
