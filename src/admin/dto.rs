use serde::{Deserialize, Serialize};

use crate::auth::repo_types::Account;

#[derive(Debug, Serialize)]
pub struct Overview {
    pub total_users: i64,
    pub total_favorites: i64,
    pub total_books: u64,
}

#[derive(Debug, Serialize)]
pub struct BookCount {
    pub total_books: u64,
}

/// Public projection of a user row.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<Account> for UserView {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            username: a.username,
            email: a.email,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}
