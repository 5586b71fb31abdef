use diesel::dsl::exists;
use diesel::prelude::*;
use thiserror::Error;

use crate::db::{schema::users::dsl::*, user::models::*};

#[derive(Debug, Error)]
pub enum UserExistsError {
    #[error("UserExists: {source}")]
    UserExists {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn user_exists(conn: &mut SqliteConnection, login: &str) -> Result<bool, UserExistsError> {
    diesel::select(exists(users.filter(id.eq(login))))
        .get_result(conn)
        .map_err(|source| UserExistsError::UserExists { source })
}

#[derive(Debug, Error)]
pub enum InsertUserError {
    #[error("InsertUser: {source}")]
    InsertUser {
        #[from]
        source: diesel::result::Error,
    },
}

/// Inserts the profile unless the login is already stored; existing rows are never touched.
pub fn insert_user(conn: &mut SqliteConnection, new: &NewUser) -> Result<usize, InsertUserError> {
    diesel::insert_or_ignore_into(users)
        .values(new)
        .execute(conn)
        .map_err(|source| InsertUserError::InsertUser { source })
}

#[derive(Debug, Error)]
pub enum GetUserByIdError {
    #[error("GetUserById: {source}")]
    GetUserById {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    login: &str,
) -> Result<Option<User>, GetUserByIdError> {
    users
        .filter(id.eq(login))
        .select(User::as_select())
        .first(conn)
        .optional()
        .map_err(|source| GetUserByIdError::GetUserById { source })
}

#[derive(Debug, Error)]
pub enum CountUsersError {
    #[error("CountUsers: {source}")]
    CountUsers {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn count_users(conn: &mut SqliteConnection) -> Result<i64, CountUsersError> {
    users
        .count()
        .get_result(conn)
        .map_err(|source| CountUsersError::CountUsers { source })
}
