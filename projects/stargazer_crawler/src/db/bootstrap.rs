use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::SqliteConnection;
use thiserror::Error;

/// Create-if-absent DDL for the three crawl tables.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS repositories (id TEXT PRIMARY KEY COLLATE NOCASE,
    stars INTEGER, forks INTEGER, watchers INTEGER);
CREATE TABLE IF NOT EXISTS stars (repo_id TEXT NOT NULL COLLATE NOCASE, user_id TEXT NOT NULL,
    FOREIGN KEY(repo_id) REFERENCES repositories(id),
    PRIMARY KEY(repo_id, user_id));
CREATE TABLE IF NOT EXISTS users (id TEXT PRIMARY KEY, name TEXT,
    company TEXT, blog TEXT, location TEXT, email TEXT, bio TEXT,
    twitter_username TEXT, public_repos INTEGER, public_gists INTEGER,
    followers INTEGER, following INTEGER, created_at TIMESTAMP);
"#;

#[derive(Debug, Error)]
pub enum EstablishConnectionError {
    #[error("EstablishConnection: {path}: {source}")]
    EstablishConnection {
        path: String,
        source: diesel::ConnectionError,
    },

    #[error("DisableForeignKeys: {path}: {source}")]
    DisableForeignKeys {
        path: String,
        source: diesel::result::Error,
    },
}

/// Opens (creating if needed) the SQLite file at `path`.
///
/// Foreign keys stay declared but unenforced: star rows may land before
/// their repository row.
pub fn establish_connection(path: &str) -> Result<SqliteConnection, EstablishConnectionError> {
    let mut conn = SqliteConnection::establish(path).map_err(|source| {
        EstablishConnectionError::EstablishConnection {
            path: path.to_string(),
            source,
        }
    })?;

    conn.batch_execute("PRAGMA foreign_keys = OFF")
        .map_err(|source| EstablishConnectionError::DisableForeignKeys {
            path: path.to_string(),
            source,
        })?;

    Ok(conn)
}

#[derive(Debug, Error)]
pub enum InitSchemaError {
    #[error("InitSchema: {source}")]
    InitSchema {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn init_schema(conn: &mut SqliteConnection) -> Result<(), InitSchemaError> {
    conn.batch_execute(SCHEMA_SQL)
        .map_err(|source| InitSchemaError::InitSchema { source })
}
