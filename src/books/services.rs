use tracing::{debug, warn};

use super::prompts;
use crate::{
    catalog::ScoredBook,
    error::AppError,
    llm::{ChatRequest, TokenUsage},
    state::AppState,
    usage::{services::record_usage, Purpose},
};

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        warn!(field, "required field is blank");
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(value)
}

/// Semantic search: embed the query, then ask the catalog for neighbours.
pub async fn recommend(st: &AppState, query: &str) -> Result<Vec<ScoredBook>, AppError> {
    let query = required("query", query)?;

    let embedding = st.llm.embed(query).await?;
    record_usage(
        st.usage.as_ref(),
        Purpose::Recommend,
        TokenUsage {
            prompt_tokens: embedding.usage.prompt_tokens,
            completion_tokens: 0,
        },
    )
    .await;

    let hits = st
        .catalog
        .search(&embedding.vector, st.config.recommend_limit)
        .await?;
    debug!(hits = hits.len(), "recommendations found");
    Ok(hits)
}

async fn complete(st: &AppState, purpose: Purpose, request: ChatRequest) -> Result<String, AppError> {
    let completion = st.llm.chat(request).await?;
    record_usage(st.usage.as_ref(), purpose, completion.usage).await;
    Ok(completion.text.trim().to_string())
}

pub async fn explain(
    st: &AppState,
    title: &str,
    author: &str,
    description: &str,
) -> Result<String, AppError> {
    let title = required("title", title)?;
    let request = prompts::explain(
        title,
        author.trim(),
        description.trim(),
        &st.config.reply_language,
    );
    complete(st, Purpose::Explain, request).await
}

pub async fn chat(st: &AppState, message: &str) -> Result<String, AppError> {
    let message = required("message", message)?;
    let request = prompts::chatbot(message, &st.config.reply_language);
    complete(st, Purpose::Chatbot, request).await
}
