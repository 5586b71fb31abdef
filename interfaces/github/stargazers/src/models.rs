use serde::Deserialize;

/// `GET repos/{owner}/{name}`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RepositoryPayload {
    pub full_name: String,
    pub stargazers_count: i64,
    pub forks_count: i64,
    pub watchers_count: i64,
}

/// One entry of `GET repos/{owner}/{name}/stargazers`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StargazerPayload {
    pub login: String,
}

/// `GET users/{login}`. Everything but the login may be null.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UserPayload {
    pub login: String,
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
    /// Kept as the API's string, no parsing.
    pub created_at: Option<String>,
}
