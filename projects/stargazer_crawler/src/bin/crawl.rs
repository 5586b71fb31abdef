use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use interfaces_github_stargazers::{BuildClientError, GitHubClient};
use projects_stargazer_crawler::{
    cli::CrawlArgs,
    config,
    crawl::{crawl_repository, CrawlError, CrawlOptions},
    db::{establish_connection, EstablishConnectionError},
};
use thiserror::Error;
use tracing::error;
use utils_trace::tracing_init;

#[derive(Debug, Error)]
pub enum MainError {
    #[error("TracingInit: {source}")]
    TracingInit {
        #[source]
        source: utils_trace::TracingInitError,
    },
    #[error("BuildClient: {source}")]
    BuildClient {
        #[source]
        source: BuildClientError,
    },
    #[error("EstablishConnection: {source}")]
    EstablishConnection {
        #[source]
        source: EstablishConnectionError,
    },
    #[error("Crawl: {source}")]
    Crawl {
        #[source]
        source: CrawlError,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CrawlArgs::parse();
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

async fn run(args: CrawlArgs) -> Result<(), MainError> {
    let client = GitHubClient::new(config::client_config(config::github_token()))
        .map_err(|source| MainError::BuildClient { source })?;

    let mut conn = establish_connection(&args.database)
        .map_err(|source| MainError::EstablishConnection { source })?;

    let options = CrawlOptions {
        show_progress: !args.quiet && std::io::stderr().is_terminal(),
    };

    crawl_repository(&client, &mut conn, &args.repository, &options)
        .await
        .map_err(|source| MainError::Crawl { source })?;

    Ok(())
}
