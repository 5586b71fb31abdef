use std::process::ExitCode;

use clap::Parser;
use projects_stargazer_crawler::{
    batch::{default_crawler_bin, run_batch, BatchError, BatchOptions},
    cli::CrawlAllArgs,
    config::{self, ConfigError},
};
use thiserror::Error;
use tracing::error;
use utils_trace::tracing_init;

#[derive(Debug, Error)]
pub enum MainError {
    #[error("Config: {source}")]
    Config {
        #[source]
        source: ConfigError,
    },
    #[error("Batch: {source}")]
    Batch {
        #[source]
        source: BatchError,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CrawlAllArgs::parse();
    config::load_dotenv();

    if let Err(err) = tracing_init("info") {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CrawlAllArgs) -> Result<(), MainError> {
    let token = config::require_github_token().map_err(|source| MainError::Config { source })?;

    let options = BatchOptions {
        repos_file: args.repos_file,
        database_path: args.database,
        crawler_bin: args.crawler_bin.unwrap_or_else(default_crawler_bin),
        token,
        child_env: Vec::new(),
    };

    run_batch(&options)
        .await
        .map_err(|source| MainError::Batch { source })?;

    Ok(())
}
