use diesel::prelude::*;
use interfaces_github_stargazers::UserPayload;

use crate::db::schema::users;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub twitter_username: Option<String>,
    pub public_repos: Option<i64>,
    pub public_gists: Option<i64>,
    pub followers: Option<i64>,
    pub following: Option<i64>,
    pub created_at: Option<String>,
}

/// Profile fields exactly as the API returned them.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub id: &'a str,
    pub name: Option<&'a str>,
    pub company: Option<&'a str>,
    pub blog: Option<&'a str>,
    pub location: Option<&'a str>,
    pub email: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub twitter_username: Option<&'a str>,
    pub public_repos: Option<i64>,
    pub public_gists: Option<i64>,
    pub followers: Option<i64>,
    pub following: Option<i64>,
    pub created_at: Option<&'a str>,
}

impl<'a> From<&'a UserPayload> for NewUser<'a> {
    fn from(payload: &'a UserPayload) -> Self {
        Self {
            id: &payload.login,
            name: payload.name.as_deref(),
            company: payload.company.as_deref(),
            blog: payload.blog.as_deref(),
            location: payload.location.as_deref(),
            email: payload.email.as_deref(),
            bio: payload.bio.as_deref(),
            twitter_username: payload.twitter_username.as_deref(),
            public_repos: payload.public_repos,
            public_gists: payload.public_gists,
            followers: payload.followers,
            following: payload.following,
            created_at: payload.created_at.as_deref(),
        }
    }
}
