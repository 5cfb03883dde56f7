//! # StudySync Client
//!
//! The caller side of the session conflict engine: it fetches a group's
//! sessions, the signed-in user's accepted sessions and member availability
//! from the StudySync backend, runs the engine from `studysync-core` over
//! them, and keeps the resulting views fresh by polling.
//!
//! ## Architecture
//!
//! - **Config**: environment-driven settings
//! - **Auth**: the token provider every request is made on behalf of
//! - **Http**: authenticated fetch and status-to-error mapping
//! - **Repositories**: collaborator traits and their HTTP implementations
//! - **Planner**: turns fetched data into a board of sessions and warnings
//! - **Refresh**: pollers and latest-result-wins views
//!
//! Nothing here keeps process-wide state; the token provider is passed in.

/// Token provider passed explicitly to the HTTP client
pub mod auth;
/// Configuration loaded from the environment
pub mod config;
/// Authenticated fetch against the backend
pub mod http;
/// Mock collaborators for testing
pub mod mock;
/// Builds the session board for a group
pub mod planner;
/// Polling and stale-result suppression
pub mod refresh;
/// Collaborator traits and HTTP implementations
pub mod repositories;

use std::sync::Arc;

use studysync_core::errors::StudyResult;

use crate::{auth::StaticToken, config::ClientConfig, http::ApiClient};

/// Builds an HTTP client authenticated with the token from `config`.
///
/// # Example
///
/// ```no_run
/// use studysync_client::{config::ClientConfig, connect, planner::SessionPlanner};
///
/// # async fn example() -> eyre::Result<()> {
/// let client = connect(ClientConfig::from_env()?)?;
/// let planner = SessionPlanner::from_client("group-id", client);
/// let board = planner.load(chrono::Utc::now()).await?;
/// for warning in board.warnings() {
///     println!("{}", warning.message);
/// }
/// # Ok(())
/// # }
/// ```
pub fn connect(config: ClientConfig) -> StudyResult<Arc<ApiClient>> {
    let auth = Arc::new(StaticToken::from_config(&config));
    Ok(Arc::new(ApiClient::new(config, auth)?))
}
