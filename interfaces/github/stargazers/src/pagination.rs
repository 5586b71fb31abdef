//! Page-by-page fetching until the API hands back an empty page.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error};

use crate::client::{decode, GitHubClient, SendRequestError};
use crate::models::{RepositoryPayload, StargazerPayload};

/// What to fetch and how to describe it.
pub struct PaginatedFetchConfig<'a> {
    /// Used in log lines and progress events.
    pub label: &'a str,
    /// Route for a given `(page, per_page)`.
    pub route_fn: Box<dyn Fn(u32, u32) -> String + Send + Sync + 'a>,
    /// Known item count, for progress estimation only.
    pub expected_items: Option<u64>,
}

impl<'a> PaginatedFetchConfig<'a> {
    pub fn stargazers(repository: &'a RepositoryPayload) -> Self {
        let full_name = repository.full_name.as_str();
        Self {
            label: full_name,
            route_fn: Box::new(move |page, per_page| {
                format!("repos/{full_name}/stargazers?page={page}&per_page={per_page}")
            }),
            expected_items: u64::try_from(repository.stargazers_count).ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchProgress {
    Started {
        label: String,
        estimated_pages: Option<u64>,
    },
    PageFetched {
        page: u32,
        count: usize,
        total_so_far: usize,
    },
    Finished {
        total: usize,
    },
}

pub type ProgressCallback<'a> = dyn Fn(FetchProgress) + Send + Sync + 'a;

fn emit(on_progress: Option<&ProgressCallback<'_>>, event: FetchProgress) {
    if let Some(callback) = on_progress {
        callback(event);
    }
}

/// How the page loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// An empty page was reached.
    Exhausted,
    /// `page` answered with a non-success status; earlier pages are kept.
    Interrupted { page: u32, status: StatusCode },
}

#[derive(Debug)]
pub struct PaginatedFetchResult<T> {
    pub items: Vec<T>,
    pub pages_requested: u32,
    pub completion: Completion,
}

#[derive(Debug, Error)]
pub enum FetchAllPagesError {
    #[error("SendRequest: {source}")]
    SendRequest {
        #[from]
        source: SendRequestError,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead { source: reqwest::Error },

    #[error("DeserializeResponseBody: page {page}: {source}")]
    DeserializeResponseBody { page: u32, source: serde_json::Error },
}

/// Page estimate shown next to progress; the loop never stops on it.
pub fn estimated_pages(expected_items: u64, per_page: u32) -> u64 {
    expected_items / u64::from(per_page.max(1)) + 1
}

impl GitHubClient {
    pub async fn fetch_all_pages<T: DeserializeOwned>(
        &self,
        config: &PaginatedFetchConfig<'_>,
        on_progress: Option<&ProgressCallback<'_>>,
    ) -> Result<PaginatedFetchResult<T>, FetchAllPagesError> {
        let per_page = self.per_page();
        let mut items: Vec<T> = Vec::new();
        let mut page = 0u32;

        emit(
            on_progress,
            FetchProgress::Started {
                label: config.label.to_string(),
                estimated_pages: config
                    .expected_items
                    .map(|total| estimated_pages(total, per_page)),
            },
        );

        let completion = loop {
            page += 1;
            let route = (config.route_fn)(page, per_page);
            let response = self.send(&route).await?;
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|source| FetchAllPagesError::ResponseRead { source })?;

            if !status.is_success() {
                error!(
                    "Error getting page {page} for {}: {status} {body}",
                    config.label
                );
                break Completion::Interrupted { page, status };
            }

            let batch: Vec<T> = decode(&body)
                .map_err(|source| FetchAllPagesError::DeserializeResponseBody { page, source })?;
            if batch.is_empty() {
                debug!("Page {page} for {} is empty, done", config.label);
                break Completion::Exhausted;
            }

            let count = batch.len();
            items.extend(batch);
            emit(
                on_progress,
                FetchProgress::PageFetched {
                    page,
                    count,
                    total_so_far: items.len(),
                },
            );
        };

        emit(on_progress, FetchProgress::Finished { total: items.len() });

        Ok(PaginatedFetchResult {
            items,
            pages_requested: page,
            completion,
        })
    }

    pub async fn list_stargazers(
        &self,
        repository: &RepositoryPayload,
        on_progress: Option<&ProgressCallback<'_>>,
    ) -> Result<PaginatedFetchResult<StargazerPayload>, FetchAllPagesError> {
        self.fetch_all_pages(&PaginatedFetchConfig::stargazers(repository), on_progress)
            .await
    }
}
