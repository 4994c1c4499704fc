//! Backend API Client

use std::sync::Arc;
use std::time::Duration;

use kernel::error::app_error::{AppError, AppResult, OptionExt};
use kernel::error::conversions::kind_for_status;
use platform::http::{IdTokenSource, bearer_headers, build_client};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Longest response body excerpt kept in error messages
const ERROR_BODY_EXCERPT: usize = 200;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend, e.g. `https://api.example.com/v1`
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout: platform::http::DEFAULT_TIMEOUT,
        }
    }
}

/// HTTP client for the backend services
pub struct ApiClient<T>
where
    T: IdTokenSource,
{
    http: Client,
    base_url: String,
    tokens: Arc<T>,
}

impl<T> ApiClient<T>
where
    T: IdTokenSource,
{
    pub fn new(config: &ApiConfig, tokens: Arc<T>) -> AppResult<Self> {
        let http = build_client(config.timeout).map_err(|e| {
            AppError::unknown("Failed to build HTTP client").with_source(e)
        })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET requiring a signed-in user
    pub async fn get_json<R>(&self, path: &str) -> AppResult<R>
    where
        R: DeserializeOwned,
    {
        let request = self.authorized(self.http.get(self.url(path)))?;
        send(request, path).await
    }

    /// Anonymous GET
    pub async fn get_public_json<R>(&self, path: &str) -> AppResult<R>
    where
        R: DeserializeOwned,
    {
        send(self.http.get(self.url(path)), path).await
    }

    /// POST requiring a signed-in user
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> AppResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.authorized(self.http.post(self.url(path)).json(body))?;
        send(request, path).await
    }

    fn authorized(&self, request: RequestBuilder) -> AppResult<RequestBuilder> {
        let token = self
            .tokens
            .id_token()
            .ok_or_no_session("Sign in to continue")?;
        let headers = bearer_headers(&token)
            .map_err(|e| AppError::no_session("Stored token is not a valid header").with_source(e))?;
        Ok(request.headers(headers))
    }
}

async fn send<R>(request: RequestBuilder, path: &str) -> AppResult<R>
where
    R: DeserializeOwned,
{
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let excerpt: String = body.chars().take(ERROR_BODY_EXCERPT).collect();
        tracing::warn!(path, status = status.as_u16(), "Backend request failed");
        return Err(AppError::new(
            kind_for_status(status.as_u16()),
            format!("HTTP {}: {}", status.as_u16(), excerpt),
        ));
    }

    tracing::debug!(path, status = status.as_u16(), "Backend request succeeded");
    Ok(response.json::<R>().await?)
}
