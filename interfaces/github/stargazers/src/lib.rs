//! GitHub REST client for repository metadata, stargazer listings and user profiles.
//!
//! Every request passes through one send path that pauses between calls and
//! checks the `X-RateLimit-*` headers, waiting for the quota window when it runs low.

pub mod client;
pub mod models;
pub mod pagination;
pub mod rate_limit;

pub use client::{
    BuildClientError, ClientConfig, GetRepositoryError, GetUserError, GitHubClient,
    SendRequestError,
};
pub use models::{RepositoryPayload, StargazerPayload, UserPayload};
pub use pagination::{
    Completion, FetchAllPagesError, FetchProgress, PaginatedFetchConfig, PaginatedFetchResult,
    ProgressCallback,
};
pub use rate_limit::{RateLimitError, RateLimitPolicy, RateLimiter};
pub use reqwest::StatusCode;
