use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use super::{ChatMessage, ChatRequest, Completion, Embedding, LanguageModel, LlmError, TokenUsage};
use crate::config::OpenAiConfig;

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize, Debug)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: TokenUsage,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Serialize, Debug)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize, Debug)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
    #[serde(default)]
    usage: TokenUsage,
}

#[derive(Deserialize, Debug)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Client for the OpenAI API or any service exposing the same endpoints.
#[derive(Clone, Debug)]
pub struct OpenAiClient {
    client: ReqwestClient,
    base_url: String,
    api_key: String,
    chat_model: String,
    embedding_model: String,
}

impl OpenAiClient {
    pub fn new(cfg: &OpenAiConfig, timeout: Duration) -> Result<Self, LlmError> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            chat_model: cfg.chat_model.clone(),
            embedding_model: cfg.embedding_model.clone(),
        })
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, LlmError>
    where
        B: Serialize + std::fmt::Debug,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "--> openai");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::Decode(e.to_string()))
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn chat(&self, request: ChatRequest) -> Result<Completion, LlmError> {
        let body = ChatCompletionRequest {
            model: &self.chat_model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };
        let res: ChatCompletionResponse = self.post("chat/completions", &body).await?;
        let text = res
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(LlmError::Empty("choices"))?;
        debug!(
            prompt_tokens = res.usage.prompt_tokens,
            completion_tokens = res.usage.completion_tokens,
            "chat completion done"
        );
        Ok(Completion {
            text,
            usage: res.usage,
        })
    }

    async fn embed(&self, input: &str) -> Result<Embedding, LlmError> {
        let body = EmbeddingRequest {
            model: &self.embedding_model,
            input,
        };
        let res: EmbeddingResponse = self.post("embeddings", &body).await?;
        let vector = res
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(LlmError::Empty("embeddings"))?;
        Ok(Embedding {
            vector,
            usage: res.usage,
        })
    }
}
