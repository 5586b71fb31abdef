//! Batch crawl over a list of repositories.
//!
//! The star table is wiped once, then every listed repository is crawled in
//! its own child process, in file order. Repository and user rows survive
//! across runs so profiles are fetched at most once.

pub mod repo_list;
pub mod supervisor;

use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::config::TOKEN_ENV;
use crate::db::star::queries::{clear_stars, ClearStarsError};
use crate::db::{establish_connection, EstablishConnectionError};

pub use repo_list::{parse_repository_list, read_repository_list, ReadRepositoryListError};
pub use supervisor::{BatchReport, CrawlCommand, CrawlTask, Supervisor, TaskOutcome, TaskRecord};

pub const CRAWLER_BIN_NAME: &str = "stargazers-crawl";

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub repos_file: PathBuf,
    pub database_path: String,
    pub crawler_bin: PathBuf,
    /// Passed to every child as `GITHUB_TOKEN`.
    pub token: String,
    /// Extra variables for every child.
    pub child_env: Vec<(String, String)>,
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("ReadRepositoryList: {source}")]
    ReadRepositoryList {
        #[from]
        source: ReadRepositoryListError,
    },

    #[error("EstablishConnection: {source}")]
    EstablishConnection {
        #[from]
        source: EstablishConnectionError,
    },

    #[error("ClearStars: {source}")]
    ClearStars {
        #[from]
        source: ClearStarsError,
    },
}

/// The single-repository crawler installed next to the running binary.
pub fn default_crawler_bin() -> PathBuf {
    let file_name = format!("{CRAWLER_BIN_NAME}{}", std::env::consts::EXE_SUFFIX);
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&file_name)))
        .unwrap_or_else(|| PathBuf::from(file_name))
}

pub async fn run_batch(options: &BatchOptions) -> Result<BatchReport, BatchError> {
    let repositories = read_repository_list(&options.repos_file)?;
    info!(
        "{} repositories listed in {}",
        repositories.len(),
        options.repos_file.display()
    );

    {
        let mut conn = establish_connection(&options.database_path)?;
        let cleared = clear_stars(&mut conn)?;
        info!("Database cleaned ({cleared} star rows removed), ready to start crawling...");
    }

    let command = options.child_env.iter().fold(
        CrawlCommand::new(&options.crawler_bin, &options.database_path)
            .with_env(TOKEN_ENV, &options.token),
        |command, (key, value)| command.with_env(key, value),
    );

    let mut supervisor = Supervisor::new(command);
    for repository in repositories {
        supervisor.enqueue(repository);
    }

    let report = supervisor.run().await;
    report.log_summary();
    Ok(report)
}
