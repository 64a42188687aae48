use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{
        ChatRequestBody, ChatResponse, ExplainRequest, ExplainResponse, QueryParams,
        RecommendResponse, SuggestionsResponse,
    },
    services,
};
use crate::{error::AppResult, state::AppState};

pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/bookrcm", get(recommend))
        .route("/suggestions", get(suggestions))
        .route("/explain", post(explain))
        .route("/chatbot-recommend", post(chatbot_recommend))
}

#[instrument(skip(state))]
pub async fn recommend(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> AppResult<Json<RecommendResponse>> {
    let results = services::recommend(&state, &params.query).await?;
    Ok(Json(RecommendResponse { results }))
}

#[instrument(skip(state))]
pub async fn suggestions(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Json<SuggestionsResponse> {
    Json(SuggestionsResponse {
        suggestions: state.suggestions.suggest(&params.query),
    })
}

#[instrument(skip(state, payload))]
pub async fn explain(
    State(state): State<AppState>,
    Json(payload): Json<ExplainRequest>,
) -> AppResult<Json<ExplainResponse>> {
    let reason = services::explain(
        &state,
        &payload.title,
        &payload.author,
        &payload.description,
    )
    .await?;
    Ok(Json(ExplainResponse { reason }))
}

#[instrument(skip(state, payload))]
pub async fn chatbot_recommend(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequestBody>,
) -> AppResult<Json<ChatResponse>> {
    let reply = services::chat(&state, &payload.message).await?;
    Ok(Json(ChatResponse { reply }))
}
