use std::process::ExitCode;

use clap::Parser;
use projects_stargazer_crawler::{
    cli::InitDbArgs,
    db::{establish_connection, init_schema, EstablishConnectionError, InitSchemaError},
};
use thiserror::Error;
use tracing::{error, info};
use utils_trace::tracing_init;

#[derive(Debug, Error)]
pub enum MainError {
    #[error("EstablishConnection: {source}")]
    EstablishConnection {
        #[source]
        source: EstablishConnectionError,
    },
    #[error("InitSchema: {source}")]
    InitSchema {
        #[source]
        source: InitSchemaError,
    },
}

fn main() -> ExitCode {
    let args = InitDbArgs::parse();

    if let Err(err) = tracing_init("info") {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    info!("Initializing database at {}", args.database);
    match run(&args.database) {
        Ok(()) => {
            info!("Database initialized successfully");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Error initializing database: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(database: &str) -> Result<(), MainError> {
    let mut conn =
        establish_connection(database).map_err(|source| MainError::EstablishConnection { source })?;
    init_schema(&mut conn).map_err(|source| MainError::InitSchema { source })
}
