use async_trait::async_trait;
use mockall::mock;
use studysync_core::{
    Interval,
    errors::StudyResult,
    models::{
        chat::{ChatMessage, NewMessage},
        session::{NewSession, Session},
    },
};

use crate::repositories::{AcceptedSessionSource, AvailabilitySource, MessageFeed, SessionStore};

// Mock collaborators for testing
mock! {
    pub SessionStore {}

    #[async_trait]
    impl SessionStore for SessionStore {
        async fn list_sessions(&self, group_id: &str) -> StudyResult<Vec<Session>>;

        async fn create_session(
            &self,
            group_id: &str,
            session: &NewSession,
        ) -> StudyResult<Session>;

        async fn delete_session(&self, group_id: &str, session_id: &str) -> StudyResult<()>;
    }
}

mock! {
    pub AcceptedSessionSource {}

    #[async_trait]
    impl AcceptedSessionSource for AcceptedSessionSource {
        async fn accepted_sessions(&self) -> StudyResult<Vec<Session>>;
    }
}

mock! {
    pub AvailabilitySource {}

    #[async_trait]
    impl AvailabilitySource for AvailabilitySource {
        async fn unavailable_members(
            &self,
            group_id: &str,
            window: Interval,
        ) -> StudyResult<Vec<String>>;
    }
}

mock! {
    pub MessageFeed {}

    #[async_trait]
    impl MessageFeed for MessageFeed {
        async fn list_messages(
            &self,
            group_id: &str,
            limit: usize,
        ) -> StudyResult<Vec<ChatMessage>>;

        async fn send_message(
            &self,
            group_id: &str,
            message: &NewMessage,
        ) -> StudyResult<ChatMessage>;
    }
}
