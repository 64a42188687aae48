use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Row shape shared by the `users` and `admins` tables.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: i64,                    // unique account ID
    pub username: String,           // unique login name
    pub email: String,              // unique email
    #[serde(skip_serializing)]
    pub password_hash: String,      // Argon2 hash, not exposed in JSON
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime, // creation timestamp
}

/// Which credential table an account lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    User,
    Admin,
}

impl AccountKind {
    pub fn table(self) -> &'static str {
        match self {
            AccountKind::User => "users",
            AccountKind::Admin => "admins",
        }
    }
}
