use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT},
    Client, Response, StatusCode,
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

use crate::models::{RepositoryPayload, UserPayload};
use crate::rate_limit::{RateLimitError, RateLimitPolicy, RateLimiter};

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
pub const API_VERSION: &str = "2022-11-28";
pub const DEFAULT_PER_PAGE: u32 = 100;
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub user_agent: String,
    pub per_page: u32,
    /// Fixed pause after every request, independent of the quota.
    pub request_delay: Duration,
    pub rate_limit: RateLimitPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            user_agent: concat!("stargazer-crawler/", env!("CARGO_PKG_VERSION")).to_string(),
            per_page: DEFAULT_PER_PAGE,
            request_delay: DEFAULT_REQUEST_DELAY,
            rate_limit: RateLimitPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }
}

#[derive(Debug, Error)]
pub enum BuildClientError {
    #[error("InvalidToken: {source}")]
    InvalidToken {
        source: reqwest::header::InvalidHeaderValue,
    },

    #[error("InvalidUserAgent: {source}")]
    InvalidUserAgent {
        source: reqwest::header::InvalidHeaderValue,
    },

    #[error("ClientBuild: {source}")]
    ClientBuild { source: reqwest::Error },
}

/// Failure on the shared send path, before the status is looked at.
#[derive(Debug, Error)]
pub enum SendRequestError {
    #[error("RequestSend: {source}")]
    RequestSend { source: reqwest::Error },

    #[error("RateLimit: {source}")]
    RateLimit {
        #[from]
        source: RateLimitError,
    },
}

#[derive(Debug, Error)]
pub enum GetRepositoryError {
    #[error("SendRequest: {source}")]
    SendRequest {
        #[from]
        source: SendRequestError,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead { source: reqwest::Error },

    #[error("RepositoryNotFound: {full_name}")]
    NotFound { full_name: String },

    #[error("UnexpectedStatus: {status} {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody { source: serde_json::Error },
}

#[derive(Debug, Error)]
pub enum GetUserError {
    #[error("SendRequest: {source}")]
    SendRequest {
        #[from]
        source: SendRequestError,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead { source: reqwest::Error },

    #[error("UnexpectedStatus: {status} {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody { source: serde_json::Error },
}

impl GetUserError {
    /// Quota headers could not be read; continuing would run unprotected.
    pub fn is_rate_limit(&self) -> bool {
        matches!(
            self,
            GetUserError::SendRequest {
                source: SendRequestError::RateLimit { .. }
            }
        )
    }
}

/// Session for the GitHub REST API, built once per process and passed by reference.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: String,
    per_page: u32,
    request_delay: Duration,
    rate_limiter: RateLimiter,
}

impl GitHubClient {
    pub fn new(config: ClientConfig) -> Result<Self, BuildClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|source| BuildClientError::InvalidUserAgent { source })?,
        );

        match config.token.as_deref() {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|source| BuildClientError::InvalidToken { source })?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            None => warn!(
                "No GITHUB_TOKEN environment variable found. This will result in a lower rate limit."
            ),
        }

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|source| BuildClientError::ClientBuild { source })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            per_page: config.per_page,
            request_delay: config.request_delay,
            rate_limiter: RateLimiter::new(config.rate_limit),
        })
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub(crate) fn url(&self, route: &str) -> String {
        format!("{}/{}", self.base_url, route.trim_start_matches('/'))
    }

    /// Every request goes through here: send, pause, then check the quota.
    pub(crate) async fn send(&self, route: &str) -> Result<Response, SendRequestError> {
        let response = self
            .http
            .get(self.url(route))
            .send()
            .await
            .map_err(|source| SendRequestError::RequestSend { source })?;

        tokio::time::sleep(self.request_delay).await;
        self.rate_limiter.observe(response.headers()).await?;

        Ok(response)
    }

    pub async fn get_repository(
        &self,
        full_name: &str,
    ) -> Result<RepositoryPayload, GetRepositoryError> {
        let response = self.send(&format!("repos/{full_name}")).await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| GetRepositoryError::ResponseRead { source })?;

        if status == StatusCode::NOT_FOUND {
            return Err(GetRepositoryError::NotFound {
                full_name: full_name.to_string(),
            });
        }
        if !status.is_success() {
            return Err(GetRepositoryError::UnexpectedStatus { status, body });
        }

        decode(&body).map_err(|source| GetRepositoryError::DeserializeResponseBody { source })
    }

    pub async fn get_user(&self, login: &str) -> Result<UserPayload, GetUserError> {
        let response = self.send(&format!("users/{login}")).await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| GetUserError::ResponseRead { source })?;

        if !status.is_success() {
            return Err(GetUserError::UnexpectedStatus { status, body });
        }

        decode(&body).map_err(|source| GetUserError::DeserializeResponseBody { source })
    }
}

pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(body)
}
