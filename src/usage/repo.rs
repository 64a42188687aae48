use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use super::Purpose;
use crate::llm::TokenUsage;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UsageRow {
    pub purpose: String,
    pub input_tokens: i64,
    pub output_tokens: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[async_trait]
pub trait UsageRepo: Send + Sync {
    async fn record(&self, purpose: Purpose, usage: TokenUsage) -> anyhow::Result<()>;

    /// All rows, newest first.
    async fn list(&self) -> anyhow::Result<Vec<UsageRow>>;
}

#[derive(Clone)]
pub struct PgUsageRepo {
    db: PgPool,
}

impl PgUsageRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UsageRepo for PgUsageRepo {
    async fn record(&self, purpose: Purpose, usage: TokenUsage) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO llm_usage_logs (purpose, input_tokens, output_tokens)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(purpose.as_str())
        .bind(usage.prompt_tokens)
        .bind(usage.completion_tokens)
        .execute(&self.db)
        .await
        .context("insert usage log")?;
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<UsageRow>> {
        let rows = sqlx::query_as::<_, UsageRow>(
            r#"
            SELECT purpose, input_tokens, output_tokens, created_at
            FROM llm_usage_logs
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list usage logs")?;
        Ok(rows)
    }
}
