//! Session/token context passed explicitly to everything that talks to the backend.

use async_trait::async_trait;

use crate::config::ClientConfig;

/// Supplies the signed-in user's credentials on demand.
///
/// Implementations may refresh tokens behind the scenes; callers ask for the
/// token right before each request instead of caching it.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Option<String>;

    async fn user_id(&self) -> Option<String>;
}

/// A fixed token, typically read from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticToken {
    token: Option<String>,
    user_id: Option<String>,
}

impl StaticToken {
    pub fn new(token: impl Into<String>, user_id: Option<String>) -> Self {
        Self {
            token: Some(token.into()),
            user_id,
        }
    }

    /// No credentials at all; every authenticated request is refused locally.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            token: config.access_token.clone(),
            user_id: config.user_id.clone(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Option<String> {
        self.token.clone()
    }

    async fn user_id(&self) -> Option<String> {
        self.user_id.clone()
    }
}
