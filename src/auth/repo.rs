use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::repo_types::{Account, AccountKind};

/// Credential store for both `users` and `admins`.
#[async_trait]
pub trait AccountRepo: Send + Sync {
    /// Find an account whose username equals `identifier`, or whose email
    /// equals it ignoring case.
    async fn find(&self, kind: AccountKind, identifier: &str) -> anyhow::Result<Option<Account>>;

    async fn find_by_username(
        &self,
        kind: AccountKind,
        username: &str,
    ) -> anyhow::Result<Option<Account>>;

    /// Insert a new account. Returns `None` when the username or email is taken.
    async fn create(
        &self,
        kind: AccountKind,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<Option<Account>>;

    async fn list_users(&self) -> anyhow::Result<Vec<Account>>;

    /// Case-insensitive substring match on username or email.
    async fn search_users(&self, query: &str) -> anyhow::Result<Vec<Account>>;

    /// Returns `false` when no user had that id.
    async fn delete_user(&self, id: i64) -> anyhow::Result<bool>;

    async fn count_users(&self) -> anyhow::Result<i64>;
}

#[derive(Clone)]
pub struct PgAccountRepo {
    db: PgPool,
}

impl PgAccountRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepo for PgAccountRepo {
    async fn find(&self, kind: AccountKind, identifier: &str) -> anyhow::Result<Option<Account>> {
        let sql = format!(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM {}
            WHERE username = $1 OR lower(email) = lower($1)
            ORDER BY id
            LIMIT 1
            "#,
            kind.table()
        );
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(identifier)
            .fetch_optional(&self.db)
            .await
            .context("find account by identifier")?;
        Ok(account)
    }

    async fn find_by_username(
        &self,
        kind: AccountKind,
        username: &str,
    ) -> anyhow::Result<Option<Account>> {
        let sql = format!(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM {}
            WHERE username = $1
            "#,
            kind.table()
        );
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(username)
            .fetch_optional(&self.db)
            .await
            .context("find account by username")?;
        Ok(account)
    }

    async fn create(
        &self,
        kind: AccountKind,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<Option<Account>> {
        let sql = format!(
            r#"
            INSERT INTO {} (username, email, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            RETURNING id, username, email, password_hash, created_at
            "#,
            kind.table()
        );
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .fetch_optional(&self.db)
            .await
            .context("insert account")?;
        Ok(account)
    }

    async fn list_users(&self) -> anyhow::Result<Vec<Account>> {
        let rows = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list users")?;
        Ok(rows)
    }

    async fn search_users(&self, query: &str) -> anyhow::Result<Vec<Account>> {
        let rows = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username ILIKE $1 OR email ILIKE $1
            ORDER BY id
            "#,
        )
        .bind(like_pattern(query))
        .fetch_all(&self.db)
        .await
        .context("search users")?;
        Ok(rows)
    }

    async fn delete_user(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete user")?;
        Ok(res.rows_affected() > 0)
    }

    async fn count_users(&self) -> anyhow::Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await
            .context("count users")?;
        Ok(count)
    }
}

/// `%query%` with LIKE metacharacters escaped.
fn like_pattern(query: &str) -> String {
    let mut out = String::with_capacity(query.len() + 2);
    out.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}
