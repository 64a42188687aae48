use serde::{Deserialize, Serialize};

use crate::{catalog::ScoredBook, suggest::Suggestion};

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub results: Vec<ScoredBook>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}
