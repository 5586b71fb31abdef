//! Stargazer crawler
//!
//! - GitHub access in `interfaces_github_stargazers`
//! - SQLite models and queries in `db/`
//! - Single-repository crawl in `crawl`, batch driver in `batch/`
//! - Reads GITHUB_TOKEN (and optionally GITHUB_API_URL) from the environment

pub mod batch;
pub mod cli;
pub mod config;
pub mod crawl;
pub mod db;
pub mod progress;
