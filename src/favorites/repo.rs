use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

#[async_trait]
pub trait FavoriteRepo: Send + Sync {
    /// Returns `false` when the pair already existed.
    async fn add(&self, user_id: i64, book_id: &str) -> anyhow::Result<bool>;

    /// Returns `false` when the pair did not exist.
    async fn remove(&self, user_id: i64, book_id: &str) -> anyhow::Result<bool>;

    async fn exists(&self, user_id: i64, book_id: &str) -> anyhow::Result<bool>;

    /// Book ids in the order they were favorited.
    async fn list_book_ids(&self, user_id: i64) -> anyhow::Result<Vec<String>>;

    async fn count(&self) -> anyhow::Result<i64>;
}

#[derive(Clone)]
pub struct PgFavoriteRepo {
    db: PgPool,
}

impl PgFavoriteRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FavoriteRepo for PgFavoriteRepo {
    async fn add(&self, user_id: i64, book_id: &str) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO favorites (user_id, book_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, book_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .execute(&self.db)
        .await
        .context("insert favorite")?;
        Ok(res.rows_affected() > 0)
    }

    async fn remove(&self, user_id: i64, book_id: &str) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND book_id = $2")
            .bind(user_id)
            .bind(book_id)
            .execute(&self.db)
            .await
            .context("delete favorite")?;
        Ok(res.rows_affected() > 0)
    }

    async fn exists(&self, user_id: i64, book_id: &str) -> anyhow::Result<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM favorites WHERE user_id = $1 AND book_id = $2)",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&self.db)
        .await
        .context("check favorite")?;
        Ok(exists)
    }

    async fn list_book_ids(&self, user_id: i64) -> anyhow::Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT book_id
              FROM favorites
             WHERE user_id = $1
             ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list favorites by user")?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn count(&self) -> anyhow::Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM favorites")
            .fetch_one(&self.db)
            .await
            .context("count favorites")?;
        Ok(count)
    }
}
