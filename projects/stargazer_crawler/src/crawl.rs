//! End-to-end crawl of a single repository.
//!
//! A fresh crawl resolves the repository, lists its stargazers, stores both,
//! then fetches each stargazer's profile. When star rows for the repository
//! already exist, the first three steps are skipped and only the profile pass
//! runs, which itself skips every login already in the `users` table.

use diesel::SqliteConnection;
use interfaces_github_stargazers::{
    Completion, FetchAllPagesError, GetRepositoryError, GetUserError, GitHubClient, StatusCode,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::db::repository::{models::NewRepository, queries::*};
use crate::db::star::queries::*;
use crate::db::user::{models::NewUser, queries::*};
use crate::progress;

#[derive(Debug, Clone, Default)]
pub struct CrawlOptions {
    pub show_progress: bool,
}

/// Which branch the crawl took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPath {
    /// Metadata and stargazers were fetched in this run. `interrupted` is set
    /// when the listing stopped on an error page and only a prefix was stored.
    Fresh { interrupted: bool },
    /// Stargazers were already stored; only profiles were processed.
    Resumed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileTally {
    pub already_present: usize,
    pub inserted: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    pub repository: String,
    pub path: CrawlPath,
    pub stargazers: usize,
    pub profiles: ProfileTally,
}

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("LoadStargazers: {source}")]
    LoadStargazers {
        #[from]
        source: GetStargazersForRepositoryError,
    },

    #[error("ResolveRepository: {source}")]
    ResolveRepository {
        #[from]
        source: GetRepositoryError,
    },

    #[error("FetchStargazers: {source}")]
    FetchStargazers {
        #[from]
        source: FetchAllPagesError,
    },

    #[error("NoStargazers: {repository} has no stargazers")]
    NoStargazers { repository: String },

    #[error("StargazersUnavailable: listing {repository} failed with {status}")]
    StargazersUnavailable {
        repository: String,
        status: StatusCode,
    },

    #[error("PersistRepository: {source}")]
    PersistRepository {
        #[from]
        source: InsertRepositoryError,
    },

    #[error("PersistStars: {source}")]
    PersistStars {
        #[from]
        source: InsertStarsError,
    },

    #[error("EnsureUserProfile: {source}")]
    EnsureUserProfile {
        #[from]
        source: EnsureUserProfileError,
    },
}

pub async fn crawl_repository(
    client: &GitHubClient,
    conn: &mut SqliteConnection,
    repository: &str,
    options: &CrawlOptions,
) -> Result<CrawlReport, CrawlError> {
    let existing = get_stargazers_for_repository(conn, repository)?;

    let (repository, path, stargazers) = if existing.is_empty() {
        info!("No stargazers found for repository {repository} in database, fetching them...");
        let (full_name, interrupted) =
            fetch_and_persist_stargazers(client, conn, repository, options).await?;
        let stargazers = get_stargazers_for_repository(conn, &full_name)?;
        (full_name, CrawlPath::Fresh { interrupted }, stargazers)
    } else {
        info!(
            "{} stargazers already stored for repository {repository}, resuming",
            existing.len()
        );
        (repository.to_string(), CrawlPath::Resumed, existing)
    };

    info!(
        "Crawling user profile for {} stargazers for repository {repository}...",
        stargazers.len()
    );
    let profiles = fetch_profiles(client, conn, &stargazers, options).await?;
    info!(
        inserted = profiles.inserted,
        already_present = profiles.already_present,
        skipped = profiles.skipped,
        "Finished crawling {repository}"
    );

    Ok(CrawlReport {
        repository,
        path,
        stargazers: stargazers.len(),
        profiles,
    })
}

/// Resolves the repository, lists its stargazers and stores both.
///
/// Returns the repository's canonical full name and whether the listing was cut short.
async fn fetch_and_persist_stargazers(
    client: &GitHubClient,
    conn: &mut SqliteConnection,
    repository: &str,
    options: &CrawlOptions,
) -> Result<(String, bool), CrawlError> {
    let resolved = client.get_repository(repository).await?;
    info!(
        "Repository {} found, #Stars: {}, #Forks: {}, #Watches: {}",
        resolved.full_name,
        resolved.stargazers_count,
        resolved.forks_count,
        resolved.watchers_count
    );

    let pb = progress::pages_bar(options.show_progress);
    let on_progress = |event| progress::apply(&pb, event);
    let fetched = client.list_stargazers(&resolved, Some(&on_progress)).await?;

    let interrupted = match fetched.completion {
        Completion::Exhausted => false,
        Completion::Interrupted { status, .. } if fetched.items.is_empty() => {
            return Err(CrawlError::StargazersUnavailable {
                repository: resolved.full_name,
                status,
            });
        }
        Completion::Interrupted { page, status } => {
            warn!(
                "Stargazer listing for {} stopped at page {page} ({status}), keeping the {} fetched so far",
                resolved.full_name,
                fetched.items.len()
            );
            true
        }
    };

    if fetched.items.is_empty() {
        return Err(CrawlError::NoStargazers {
            repository: resolved.full_name,
        });
    }
    info!(
        "{} stargazers fetched for repository {}",
        fetched.items.len(),
        resolved.full_name
    );

    info!("Persisting repository data to database...");
    insert_repository(conn, &NewRepository::from(&resolved))?;

    info!("Persisting stargazers data to database...");
    let logins: Vec<&str> = fetched.items.iter().map(|s| s.login.as_str()).collect();
    insert_stars(conn, &resolved.full_name, &logins)?;

    Ok((resolved.full_name, interrupted))
}

async fn fetch_profiles(
    client: &GitHubClient,
    conn: &mut SqliteConnection,
    logins: &[String],
    options: &CrawlOptions,
) -> Result<ProfileTally, CrawlError> {
    let pb = progress::profiles_bar(logins.len() as u64, options.show_progress);
    let mut tally = ProfileTally::default();

    for login in logins {
        match ensure_user_profile(client, conn, login).await? {
            ProfileOutcome::AlreadyPresent => tally.already_present += 1,
            ProfileOutcome::Inserted => tally.inserted += 1,
            ProfileOutcome::Skipped => tally.skipped += 1,
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(tally)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileOutcome {
    /// Stored by an earlier run; no request was made.
    AlreadyPresent,
    Inserted,
    /// The profile request failed and the user was left out.
    Skipped,
}

#[derive(Debug, Error)]
pub enum EnsureUserProfileError {
    #[error("UserExists: {source}")]
    UserExists {
        #[from]
        source: UserExistsError,
    },

    #[error("RateLimit: {source}")]
    RateLimit { source: GetUserError },

    #[error("InsertUser: {source}")]
    InsertUser {
        #[from]
        source: InsertUserError,
    },
}

/// Stores the profile for `login` unless it is already present.
///
/// The store is checked before the API, so a known login costs no request.
/// Callers can call this for every stargazer on every run.
pub async fn ensure_user_profile(
    client: &GitHubClient,
    conn: &mut SqliteConnection,
    login: &str,
) -> Result<ProfileOutcome, EnsureUserProfileError> {
    if user_exists(conn, login)? {
        debug!("User {login} already exists in database, skipping...");
        return Ok(ProfileOutcome::AlreadyPresent);
    }

    let user = match client.get_user(login).await {
        Ok(user) => user,
        Err(source) if source.is_rate_limit() => {
            return Err(EnsureUserProfileError::RateLimit { source })
        }
        Err(err) => {
            error!("Error getting user {login}, skipping...: {err}");
            return Ok(ProfileOutcome::Skipped);
        }
    };

    insert_user(conn, &NewUser::from(&user))?;
    Ok(ProfileOutcome::Inserted)
}
