//! # Client Configuration Module
//!
//! Loads settings for talking to the StudySync backend from environment
//! variables, with defaults where a sensible one exists.
//!
//! ## Environment Variables
//!
//! - `STUDYSYNC_API_URL`: Base URL of the backend API (required)
//! - `STUDYSYNC_ACCESS_TOKEN`: Bearer token for authenticated requests
//! - `STUDYSYNC_USER_ID`: Identifier of the signed-in user
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `STUDYSYNC_REQUEST_TIMEOUT_SECONDS`: HTTP timeout (default: 30)
//! - `STUDYSYNC_CHAT_POLL_MILLIS`: Chat refresh period (default: 2000)
//! - `STUDYSYNC_MESSAGE_LIMIT`: Messages fetched per refresh (default: 200)

use eyre::{Result, WrapErr};
use std::{env, time::Duration};
use tracing::Level;

/// Configuration for the StudySync backend client
///
/// # Example
///
/// ```no_run
/// use studysync_client::config::ClientConfig;
///
/// fn example() -> eyre::Result<()> {
///     let config = ClientConfig::from_env()?;
///     println!("Talking to {}", config.api_url);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend, without a trailing slash
    pub api_url: String,

    /// Bearer token attached to every request
    pub access_token: Option<String>,

    /// Signed-in user, used to decide which sessions the user created
    pub user_id: Option<String>,

    pub log_level: Level,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Chat poll period in milliseconds
    pub chat_poll_millis: u64,

    /// Maximum number of chat messages fetched per poll
    pub message_limit: usize,
}

impl ClientConfig {
    /// Creates a new ClientConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - `STUDYSYNC_API_URL` is not set
    /// - `STUDYSYNC_MESSAGE_LIMIT` is set but is not a number
    pub fn from_env() -> Result<Self> {
        let api_url = env::var("STUDYSYNC_API_URL")
            .wrap_err("STUDYSYNC_API_URL environment variable must be set")?;

        let access_token = env::var("STUDYSYNC_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        let user_id = env::var("STUDYSYNC_USER_ID")
            .ok()
            .filter(|u| !u.trim().is_empty());

        let log_level =
            parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        let request_timeout = env::var("STUDYSYNC_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        let chat_poll_millis = env::var("STUDYSYNC_CHAT_POLL_MILLIS")
            .unwrap_or_else(|_| "2000".to_string())
            .parse()
            .unwrap_or(2000);

        let message_limit = env::var("STUDYSYNC_MESSAGE_LIMIT")
            .unwrap_or_else(|_| "200".to_string())
            .parse()
            .wrap_err("Invalid STUDYSYNC_MESSAGE_LIMIT value")?;

        Ok(Self::new(api_url)
            .with_access_token(access_token)
            .with_user_id(user_id)
            .with_log_level(log_level)
            .with_timeouts(request_timeout, chat_poll_millis)
            .with_message_limit(message_limit))
    }

    /// A configuration with defaults for everything except the API URL.
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            api_url,
            access_token: None,
            user_id: None,
            log_level: Level::INFO,
            request_timeout: 30,
            chat_poll_millis: 2000,
            message_limit: 200,
        }
    }

    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    pub fn with_user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_log_level(mut self, level: Level) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_timeouts(mut self, request_timeout: u64, chat_poll_millis: u64) -> Self {
        self.request_timeout = request_timeout;
        self.chat_poll_millis = chat_poll_millis;
        self
    }

    pub fn with_message_limit(mut self, limit: usize) -> Self {
        self.message_limit = limit;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn chat_poll_period(&self) -> Duration {
        Duration::from_millis(self.chat_poll_millis.max(1))
    }

    /// Joins a path such as `/api/my/sessions` onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

pub fn parse_log_level(value: &str) -> Level {
    match value.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
