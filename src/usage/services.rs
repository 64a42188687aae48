use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, error};

use super::{
    repo::{UsageRepo, UsageRow},
    Purpose,
};
use crate::llm::TokenUsage;

/// Writes a usage row after a completed model call.
///
/// The call has already been billed by the time this runs, so a failed
/// write is logged and swallowed instead of failing the request.
pub async fn record_usage(repo: &dyn UsageRepo, purpose: Purpose, usage: TokenUsage) {
    match repo.record(purpose, usage).await {
        Ok(()) => debug!(
            purpose = purpose.as_str(),
            input_tokens = usage.prompt_tokens,
            output_tokens = usage.completion_tokens,
            "usage recorded"
        ),
        Err(e) => error!(
            error = %e,
            purpose = purpose.as_str(),
            input_tokens = usage.prompt_tokens,
            output_tokens = usage.completion_tokens,
            "failed to record usage"
        ),
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PurposeTotals {
    pub input: i64,
    pub output: i64,
}

#[derive(Debug, Serialize)]
pub struct UsageSummary {
    pub by_purpose: BTreeMap<String, PurposeTotals>,
    pub total_input_tokens: i64,
    pub total_output_tokens: i64,
    pub total_tokens: i64,
}

#[derive(Debug, Serialize)]
pub struct UsageLogEntry {
    pub purpose: String,
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub total_tokens: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct UsageReport {
    pub summary: UsageSummary,
    pub logs: Vec<UsageLogEntry>,
}

/// Aggregates rows per purpose; row order is preserved in `logs`.
pub fn summarize(rows: Vec<UsageRow>) -> UsageReport {
    let mut by_purpose: BTreeMap<String, PurposeTotals> = BTreeMap::new();
    let mut logs = Vec::with_capacity(rows.len());

    for row in rows {
        let totals = by_purpose.entry(row.purpose.clone()).or_default();
        totals.input += row.input_tokens;
        totals.output += row.output_tokens;
        logs.push(UsageLogEntry {
            total_tokens: row.input_tokens + row.output_tokens,
            purpose: row.purpose,
            input_tokens: row.input_tokens,
            output_tokens: row.output_tokens,
            created_at: row.created_at,
        });
    }

    let total_input_tokens = by_purpose.values().map(|t| t.input).sum();
    let total_output_tokens = by_purpose.values().map(|t| t.output).sum();
    UsageReport {
        summary: UsageSummary {
            by_purpose,
            total_input_tokens,
            total_output_tokens,
            total_tokens: total_input_tokens + total_output_tokens,
        },
        logs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingUsage, MemoryUsage};
    use time::macros::datetime;

    fn row(purpose: &str, input: i64, output: i64) -> UsageRow {
        UsageRow {
            purpose: purpose.into(),
            input_tokens: input,
            output_tokens: output,
            created_at: datetime!(2024-06-01 12:00 UTC),
        }
    }

    #[test]
    fn summarize_groups_by_purpose() {
        let report = summarize(vec![
            row("explain", 40, 12),
            row("chatbot", 100, 250),
            row("explain", 10, 5),
            row("recommend", 3, 0),
        ]);
        let s = &report.summary;
        assert_eq!(s.by_purpose["explain"], PurposeTotals { input: 50, output: 17 });
        assert_eq!(s.by_purpose["chatbot"], PurposeTotals { input: 100, output: 250 });
        assert_eq!(s.by_purpose["recommend"], PurposeTotals { input: 3, output: 0 });
        assert_eq!(s.total_input_tokens, 153);
        assert_eq!(s.total_output_tokens, 267);
        assert_eq!(s.total_tokens, 420);
        assert_eq!(report.logs.len(), 4);
        assert_eq!(report.logs[1].total_tokens, 350);
    }

    #[test]
    fn summarize_empty() {
        let report = summarize(Vec::new());
        assert!(report.summary.by_purpose.is_empty());
        assert_eq!(report.summary.total_tokens, 0);
        assert!(report.logs.is_empty());
    }

    #[tokio::test]
    async fn record_usage_appends() {
        let repo = MemoryUsage::default();
        record_usage(
            &repo,
            Purpose::Explain,
            TokenUsage {
                prompt_tokens: 7,
                completion_tokens: 3,
            },
        )
        .await;
        let rows = repo.list().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].purpose, "explain");
        assert_eq!(rows[0].input_tokens, 7);
    }

    #[tokio::test]
    async fn record_usage_swallows_write_failure() {
        record_usage(&FailingUsage, Purpose::Chatbot, TokenUsage::default()).await;
    }
}
