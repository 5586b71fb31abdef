use diesel::prelude::*;

use crate::db::schema::stars;

/// "`user_id` starred `repo_id`".
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = stars)]
pub struct NewStar<'a> {
    pub repo_id: &'a str,
    pub user_id: &'a str,
}
