//! Command-line arguments for the three binaries.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{DEFAULT_DATABASE_PATH, DEFAULT_REPOS_FILE};

/// Crawl one repository's stargazers and their profiles into SQLite.
#[derive(Debug, Parser)]
#[command(name = "stargazers-crawl", version)]
pub struct CrawlArgs {
    /// Repository as `owner/name`
    pub repository: String,

    /// SQLite database file
    #[arg(default_value = DEFAULT_DATABASE_PATH)]
    pub database: String,

    /// Hide progress bars
    #[arg(short, long)]
    pub quiet: bool,
}

/// Create the crawl tables if they do not exist yet.
#[derive(Debug, Parser)]
#[command(name = "stargazers-init-db", version)]
pub struct InitDbArgs {
    /// SQLite database file
    #[arg(default_value = DEFAULT_DATABASE_PATH)]
    pub database: String,
}

/// Crawl every repository listed in a file, one child process each.
#[derive(Debug, Parser)]
#[command(name = "stargazers-crawl-all", version)]
pub struct CrawlAllArgs {
    /// Newline-separated `owner/name` list; `#` starts a comment
    #[arg(long, default_value = DEFAULT_REPOS_FILE)]
    pub repos_file: PathBuf,

    /// SQLite database file
    #[arg(long, default_value = DEFAULT_DATABASE_PATH)]
    pub database: String,

    /// Single-repository crawler to run per entry [default: next to this binary]
    #[arg(long)]
    pub crawler_bin: Option<PathBuf>,
}
