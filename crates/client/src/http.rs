//! # Authenticated Fetch
//!
//! A thin wrapper around `reqwest` that attaches the caller's bearer token to
//! every request and maps backend failures onto [`StudyError`].
//!
//! Status mapping:
//!
//! | Status          | Error                          |
//! |-----------------|--------------------------------|
//! | 400, 422        | `StudyError::Validation`       |
//! | 401             | `StudyError::Authentication`   |
//! | 403             | `StudyError::Authorization`    |
//! | 404             | `StudyError::NotFound`         |
//! | 405, 501        | `StudyError::Unsupported`      |
//! | anything else   | `StudyError::Backend`          |
//!
//! When the body is JSON with an `error` field, that text becomes the message.

use std::sync::Arc;

use eyre::{WrapErr, eyre};
use reqwest::{Method, RequestBuilder, Response, StatusCode, header::CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use studysync_core::errors::{StudyError, StudyResult};
use tracing::debug;

use crate::{auth::TokenProvider, config::ClientConfig};

/// HTTP access to the StudySync backend on behalf of one signed-in user.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    auth: Arc<dyn TokenProvider>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, auth: Arc<dyn TokenProvider>) -> StudyResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .wrap_err("Failed to build HTTP client")?;

        Ok(Self { http, config, auth })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn auth(&self) -> &Arc<dyn TokenProvider> {
        &self.auth
    }

    /// Starts a request with the bearer token attached.
    ///
    /// Fails with `Authentication("Unauthorized")` before touching the
    /// network when no token is available.
    pub async fn request(&self, method: Method, path: &str) -> StudyResult<RequestBuilder> {
        let token = self
            .auth
            .access_token()
            .await
            .ok_or_else(|| StudyError::Authentication("Unauthorized".to_string()))?;

        Ok(self
            .http
            .request(method, self.config.endpoint(path))
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json"))
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> StudyResult<T> {
        let request = self.request(Method::GET, path).await?.query(query);
        let response = self.send(request, path).await?;
        decode(response, path).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> StudyResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path).await?.json(body);
        let response = self.send(request, path).await?;
        decode(response, path).await
    }

    pub async fn delete(&self, path: &str) -> StudyResult<()> {
        let request = self.request(Method::DELETE, path).await?;
        self.send(request, path).await?;
        Ok(())
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> StudyResult<Response> {
        let response = request
            .send()
            .await
            .wrap_err_with(|| format!("Request to {} failed", path))?;

        let status = response.status();
        debug!("{} -> {}", path, status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, path, error_message(status, &body)))
    }
}

async fn decode<T: DeserializeOwned>(response: Response, path: &str) -> StudyResult<T> {
    let value = response
        .json::<T>()
        .await
        .wrap_err_with(|| format!("Invalid JSON from {}", path))?;
    Ok(value)
}

/// Prefers the backend's `{"error": "..."}` text, then the raw body, then the status line.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| status.to_string())
}

pub fn status_error(status: StatusCode, path: &str, message: String) -> StudyError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            StudyError::Validation(message)
        }
        StatusCode::UNAUTHORIZED => StudyError::Authentication(message),
        StatusCode::FORBIDDEN => StudyError::Authorization(message),
        StatusCode::NOT_FOUND => StudyError::NotFound(format!("{}: {}", path, message)),
        StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED => {
            StudyError::Unsupported(format!("{}: {}", path, message))
        }
        _ => StudyError::Backend(eyre!("{} from {}: {}", status, path, message)),
    }
}
