use diesel::prelude::*;
use interfaces_github_stargazers::RepositoryPayload;

use crate::db::schema::repositories;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = repositories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Repository {
    pub id: String,
    pub stars: Option<i64>,
    pub forks: Option<i64>,
    pub watchers: Option<i64>,
}

/// Snapshot of the counters at crawl time.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = repositories)]
pub struct NewRepository<'a> {
    pub id: &'a str,
    pub stars: Option<i64>,
    pub forks: Option<i64>,
    pub watchers: Option<i64>,
}

impl<'a> From<&'a RepositoryPayload> for NewRepository<'a> {
    fn from(payload: &'a RepositoryPayload) -> Self {
        Self {
            id: &payload.full_name,
            stars: Some(payload.stargazers_count),
            forks: Some(payload.forks_count),
            watchers: Some(payload.watchers_count),
        }
    }
}
