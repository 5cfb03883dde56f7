//! # Session Planner
//!
//! Wires the collaborators into the conflict engine for one group:
//!
//! 1. fetch the group's sessions and the user's accepted sessions
//! 2. check every group session against the accepted ones
//! 3. ask the availability source about the soonest upcoming session
//! 4. hand back a [`SessionBoard`] with whatever warnings apply
//!
//! Only the session list is required. Accepted sessions and availability are
//! optional capabilities; when absent or failing they contribute nothing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use studysync_core::{
    ConflictResult, availability_window, compute_self_conflict,
    errors::StudyResult,
    models::{
        availability::AvailabilitySignal,
        session::{NewSession, Session},
    },
};
use tracing::{debug, info, warn};

use crate::{
    http::ApiClient,
    repositories::{AcceptedSessionSource, AvailabilitySource, SessionStore},
};

pub const SELF_CONFLICT_WARNING: &str =
    "Heads up: You have another accepted session that overlaps one or more of these times.";

pub const PROPOSAL_CONFLICT_PROMPT: &str =
    "This overlaps one of your accepted sessions. Create anyway?";

/// How a warning should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Informational; nothing for the user to decide.
    Advisory,
    /// The user should confirm before going ahead.
    Confirm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub severity: Severity,
    pub message: String,
}

/// The computed view of a group's sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionBoard {
    pub sessions: Vec<Session>,
    pub accepted: Vec<Session>,
    pub conflict: ConflictResult,
    pub availability: Option<AvailabilitySignal>,
}

impl SessionBoard {
    /// The group session and accepted session behind the self-conflict, if any.
    pub fn conflicting_sessions(&self) -> Option<(&Session, &Session)> {
        let pair = self.conflict.pair?;
        Some((
            self.sessions.get(pair.candidate_index)?,
            self.accepted.get(pair.accepted_index)?,
        ))
    }

    /// Sessions the given user may delete (only creators can).
    pub fn deletable_by<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Session> + 'a {
        self.sessions.iter().filter(move |s| s.creator_id == user_id)
    }

    pub fn warnings(&self) -> Vec<Warning> {
        let mut warnings = Vec::new();

        if self.conflict.has_conflict {
            warnings.push(Warning {
                severity: Severity::Confirm,
                message: SELF_CONFLICT_WARNING.to_string(),
            });
        }

        if let Some(signal) = self.availability.as_ref().filter(|s| !s.is_empty()) {
            warnings.push(Warning {
                severity: Severity::Advisory,
                message: format!(
                    "May be unavailable for the next session ({}): {}",
                    signal.window.start.format("%Y-%m-%d %H:%M UTC"),
                    signal.unavailable.join(", ")
                ),
            });
        }

        warnings
    }
}

/// What happened to a proposed session.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created(Session),
    /// The proposal clashed with an accepted session and the user declined.
    Cancelled(ConflictResult),
}

pub struct SessionPlanner {
    group_id: String,
    store: Arc<dyn SessionStore>,
    accepted: Option<Arc<dyn AcceptedSessionSource>>,
    availability: Option<Arc<dyn AvailabilitySource>>,
}

impl SessionPlanner {
    pub fn new(group_id: impl Into<String>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            group_id: group_id.into(),
            store,
            accepted: None,
            availability: None,
        }
    }

    /// A planner backed entirely by the HTTP client, with every capability enabled.
    pub fn from_client(group_id: impl Into<String>, client: Arc<ApiClient>) -> Self {
        Self::new(group_id, client.clone())
            .with_accepted_source(client.clone())
            .with_availability_source(client)
    }

    pub fn with_accepted_source(mut self, source: Arc<dyn AcceptedSessionSource>) -> Self {
        self.accepted = Some(source);
        self
    }

    pub fn with_availability_source(mut self, source: Arc<dyn AvailabilitySource>) -> Self {
        self.availability = Some(source);
        self
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Fetches everything and builds the board.
    ///
    /// # Errors
    ///
    /// Only a failure to list the group's sessions is returned.
    pub async fn load(&self, now: DateTime<Utc>) -> StudyResult<SessionBoard> {
        let (sessions, accepted) = tokio::join!(
            self.store.list_sessions(&self.group_id),
            self.load_accepted()
        );
        let sessions = sessions?;

        Ok(self.evaluate(sessions, accepted, now).await)
    }

    /// The user's accepted sessions, or nothing when the source is missing or failing.
    pub async fn load_accepted(&self) -> Vec<Session> {
        let Some(source) = &self.accepted else {
            return Vec::new();
        };

        match source.accepted_sessions().await {
            Ok(sessions) => sessions,
            Err(e) if e.is_unsupported() => {
                debug!("Backend has no accepted sessions endpoint: {}", e);
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to load accepted sessions, assuming none: {}", e);
                Vec::new()
            }
        }
    }

    /// Runs the engine over already-fetched inputs and queries availability.
    pub async fn evaluate(
        &self,
        sessions: Vec<Session>,
        accepted: Vec<Session>,
        now: DateTime<Utc>,
    ) -> SessionBoard {
        let conflict = compute_self_conflict(&sessions, &accepted);
        if conflict.has_conflict {
            info!("Group {} has a session overlapping an accepted one", self.group_id);
        }

        let availability = self.availability_signal(&sessions, now).await;

        SessionBoard {
            sessions,
            accepted,
            conflict,
            availability,
        }
    }

    async fn availability_signal(
        &self,
        sessions: &[Session],
        now: DateTime<Utc>,
    ) -> Option<AvailabilitySignal> {
        let source = self.availability.as_ref()?;
        let (soonest, window) = availability_window(sessions, now)?;

        match source.unavailable_members(&self.group_id, window).await {
            Ok(unavailable) if !unavailable.is_empty() => Some(AvailabilitySignal {
                session_id: soonest.id.clone(),
                window,
                unavailable,
            }),
            Ok(_) => None,
            Err(e) if e.is_unsupported() => {
                debug!("Backend has no availability endpoint: {}", e);
                None
            }
            Err(e) => {
                warn!("Availability check for session {} failed: {}", soonest.id, e);
                None
            }
        }
    }

    /// Checks a proposal against the user's accepted sessions without creating it.
    pub fn check_proposal(&self, proposal: &NewSession, accepted: &[Session]) -> ConflictResult {
        compute_self_conflict(std::slice::from_ref(proposal), accepted)
    }

    /// Creates a session, asking `confirm` first if it clashes with an accepted one.
    ///
    /// Nothing is sent to the backend when `confirm` returns `false`.
    pub async fn create_session<F>(
        &self,
        proposal: &NewSession,
        accepted: &[Session],
        confirm: F,
    ) -> StudyResult<CreateOutcome>
    where
        F: FnOnce(&ConflictResult) -> bool,
    {
        let conflict = self.check_proposal(proposal, accepted);
        if conflict.has_conflict && !confirm(&conflict) {
            info!("Session creation cancelled after conflict warning");
            return Ok(CreateOutcome::Cancelled(conflict));
        }

        let session = self.store.create_session(&self.group_id, proposal).await?;
        info!("Created session {} in group {}", session.id, self.group_id);
        Ok(CreateOutcome::Created(session))
    }

    pub async fn delete_session(&self, session_id: &str) -> StudyResult<()> {
        self.store.delete_session(&self.group_id, session_id).await?;
        info!("Deleted session {} from group {}", session_id, self.group_id);
        Ok(())
    }
}
