use diesel::prelude::*;
use thiserror::Error;

use crate::db::{schema::stars::dsl::*, star::models::*};

#[derive(Debug, Error)]
pub enum InsertStarsError {
    #[error("InsertStars: {source}")]
    InsertStars {
        #[from]
        source: diesel::result::Error,
    },
}

/// Records that every login in `stargazers` starred `repository`.
///
/// One transaction for the whole batch; pairs already stored are left alone.
/// Returns how many new rows were written.
pub fn insert_stars<S: AsRef<str>>(
    conn: &mut SqliteConnection,
    repository: &str,
    stargazers: &[S],
) -> Result<usize, InsertStarsError> {
    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        let mut inserted = 0;
        for login in stargazers {
            inserted += diesel::insert_or_ignore_into(stars)
                .values(&NewStar {
                    repo_id: repository,
                    user_id: login.as_ref(),
                })
                .execute(conn)?;
        }
        Ok(inserted)
    })
    .map_err(|source| InsertStarsError::InsertStars { source })
}

#[derive(Debug, Error)]
pub enum GetStargazersForRepositoryError {
    #[error("GetStargazersForRepository: {source}")]
    GetStargazersForRepository {
        #[from]
        source: diesel::result::Error,
    },
}

/// Logins of everyone recorded as starring `repository`, in insertion order.
pub fn get_stargazers_for_repository(
    conn: &mut SqliteConnection,
    repository: &str,
) -> Result<Vec<String>, GetStargazersForRepositoryError> {
    stars
        .filter(repo_id.eq(repository))
        .select(user_id)
        .order(diesel::dsl::sql::<diesel::sql_types::BigInt>("rowid"))
        .load::<String>(conn)
        .map_err(|source| GetStargazersForRepositoryError::GetStargazersForRepository { source })
}

#[derive(Debug, Error)]
pub enum ClearStarsError {
    #[error("ClearStars: {source}")]
    ClearStars {
        #[from]
        source: diesel::result::Error,
    },
}

/// Deletes every star row. Repositories and users are untouched.
pub fn clear_stars(conn: &mut SqliteConnection) -> Result<usize, ClearStarsError> {
    diesel::delete(stars)
        .execute(conn)
        .map_err(|source| ClearStarsError::ClearStars { source })
}

#[derive(Debug, Error)]
pub enum CountStarsError {
    #[error("CountStars: {source}")]
    CountStars {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn count_stars(conn: &mut SqliteConnection) -> Result<i64, CountStarsError> {
    stars
        .count()
        .get_result(conn)
        .map_err(|source| CountStarsError::CountStars { source })
}
