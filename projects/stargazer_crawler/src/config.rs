//! Environment-driven settings shared by the binaries.
//!
//! A `.env` file in the working directory is loaded first (see [`load_dotenv`]),
//! then `GITHUB_TOKEN` and `GITHUB_API_URL` are read from the environment.

use interfaces_github_stargazers::ClientConfig;
use thiserror::Error;
use tracing::debug;

pub const TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const API_URL_ENV: &str = "GITHUB_API_URL";
pub const DEFAULT_DATABASE_PATH: &str = "results.sqlite";
pub const DEFAULT_REPOS_FILE: &str = "repos.txt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MissingToken: GITHUB_TOKEN environment variable not set")]
    MissingToken,
}

pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded environment from {}", path.display());
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// The API credential, if any. An empty value counts as absent.
pub fn github_token() -> Option<String> {
    non_empty(std::env::var(TOKEN_ENV).ok())
}

pub fn require_github_token() -> Result<String, ConfigError> {
    github_token().ok_or(ConfigError::MissingToken)
}

pub fn client_config(token: Option<String>) -> ClientConfig {
    client_config_from(token, non_empty(std::env::var(API_URL_ENV).ok()))
}

fn client_config_from(token: Option<String>, base_url: Option<String>) -> ClientConfig {
    let config = ClientConfig::default().with_token(token);
    match base_url {
        Some(url) => config.with_base_url(url),
        None => config,
    }
}
