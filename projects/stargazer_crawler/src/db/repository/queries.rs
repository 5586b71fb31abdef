use diesel::prelude::*;

use crate::db::{repository::models::*, schema::repositories::dsl::*};

#[derive(Debug, thiserror::Error)]
pub enum InsertRepositoryError {
    #[error("InsertRepository: {source}")]
    InsertRepository {
        #[from]
        source: diesel::result::Error,
    },
}

/// Inserts the snapshot unless the repository is already stored.
///
/// Returns the number of rows written, `0` when the existing snapshot was kept.
pub fn insert_repository(
    conn: &mut SqliteConnection,
    new: &NewRepository,
) -> Result<usize, InsertRepositoryError> {
    diesel::insert_or_ignore_into(repositories)
        .values(new)
        .execute(conn)
        .map_err(|source| InsertRepositoryError::InsertRepository { source })
}

#[derive(Debug, thiserror::Error)]
pub enum GetRepositoryByIdError {
    #[error("GetRepositoryById: {source}")]
    GetRepositoryById {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn get_repository_by_id(
    conn: &mut SqliteConnection,
    id_val: &str,
) -> Result<Option<Repository>, GetRepositoryByIdError> {
    repositories
        .filter(id.eq(id_val))
        .select(Repository::as_select())
        .first(conn)
        .optional()
        .map_err(|source| GetRepositoryByIdError::GetRepositoryById { source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{establish_connection, init_schema};

    fn conn() -> SqliteConnection {
        let mut conn = establish_connection(":memory:").unwrap();
        init_schema(&mut conn).unwrap();
        conn
    }

    #[test]
    fn snapshot_is_immutable_on_conflict() {
        let mut conn = conn();
        let first = NewRepository {
            id: "acme/widget",
            stars: Some(250),
            forks: Some(12),
            watchers: Some(250),
        };
        assert_eq!(insert_repository(&mut conn, &first).unwrap(), 1);

        let later = NewRepository {
            stars: Some(9_000),
            ..first.clone()
        };
        assert_eq!(insert_repository(&mut conn, &later).unwrap(), 0);

        let stored = get_repository_by_id(&mut conn, "acme/widget").unwrap().unwrap();
        assert_eq!(stored.stars, Some(250));
        assert_eq!(stored.forks, Some(12));
    }

    #[test]
    fn unknown_repository_is_none() {
        let mut conn = conn();
        assert_eq!(get_repository_by_id(&mut conn, "acme/nothing").unwrap(), None);
    }
}
