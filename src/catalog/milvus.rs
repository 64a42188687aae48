use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{filter, Book, BookSummary, CatalogError, ScoredBook, VectorCatalog};
use crate::config::MilvusConfig;

const BOOK_FIELDS: &[&str] = &[
    "id",
    "title",
    "author",
    "publishing_year",
    "thumbnail",
    "description",
    "publisher",
    "num_pages",
    "language",
    "categories",
    "link",
];

const SUMMARY_FIELDS: &[&str] = &["id", "title", "author", "categories"];

// --- REST v2 envelope ---

#[derive(Deserialize, Debug)]
struct Envelope<T> {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CollectionStats {
    row_count: u64,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    collection_name: &'a str,
    filter: String,
    output_fields: &'a [&'a str],
    limit: u32,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    collection_name: &'a str,
    data: Vec<&'a [f32]>,
    anns_field: &'a str,
    limit: u32,
    output_fields: &'a [&'a str],
}

/// Catalog client speaking the Milvus RESTful v2 API.
#[derive(Clone, Debug)]
pub struct MilvusCatalog {
    client: ReqwestClient,
    base_url: String,
    token: Option<String>,
    collection: String,
    vector_field: String,
}

impl MilvusCatalog {
    pub fn new(cfg: &MilvusConfig, timeout: Duration) -> Result<Self, CatalogError> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: cfg.url.trim_end_matches('/').to_string(),
            token: cfg.token.clone(),
            collection: cfg.collection.clone(),
            vector_field: cfg.vector_field.clone(),
        })
    }

    async fn call<B, T>(&self, path: &str, body: &B) -> Result<Option<T>, CatalogError>
    where
        B: Serialize + std::fmt::Debug,
        T: DeserializeOwned,
    {
        let url = format!("{}/v2/vectordb/{}", self.base_url, path);
        debug!(%url, payload = ?body, "--> milvus");

        let mut request_builder = self.client.post(&url).json(body);
        if let Some(token) = &self.token {
            request_builder = request_builder.bearer_auth(token);
        }

        let response = request_builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                code: i64::from(status.as_u16()),
                message: error_text,
            });
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))?;
        // Milvus reports success as 0; some gateways rewrite it to 200.
        if envelope.code != 0 && envelope.code != 200 {
            return Err(CatalogError::Api {
                code: envelope.code,
                message: envelope.message.unwrap_or_default(),
            });
        }
        Ok(envelope.data)
    }

    async fn query<T: DeserializeOwned>(
        &self,
        filter: String,
        fields: &[&str],
        limit: u32,
    ) -> Result<Vec<T>, CatalogError> {
        let req = QueryRequest {
            collection_name: &self.collection,
            filter,
            output_fields: fields,
            limit,
        };
        Ok(self
            .call::<_, Vec<T>>("entities/query", &req)
            .await?
            .unwrap_or_default())
    }
}

#[async_trait]
impl VectorCatalog for MilvusCatalog {
    async fn count(&self) -> Result<u64, CatalogError> {
        let stats = self
            .call::<_, CollectionStats>(
                "collections/get_stats",
                &json!({ "collectionName": self.collection }),
            )
            .await?
            .ok_or_else(|| CatalogError::Decode("get_stats returned no data".into()))?;
        Ok(stats.row_count)
    }

    async fn get(&self, id: &str) -> Result<Option<Book>, CatalogError> {
        let mut rows: Vec<Book> = self.query(filter::id_equals(id), BOOK_FIELDS, 1).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    async fn search(&self, vector: &[f32], limit: u32) -> Result<Vec<ScoredBook>, CatalogError> {
        let req = SearchRequest {
            collection_name: &self.collection,
            data: vec![vector],
            anns_field: &self.vector_field,
            limit,
            output_fields: BOOK_FIELDS,
        };
        let hits = self
            .call::<_, Vec<ScoredBook>>("entities/search", &req)
            .await?
            .unwrap_or_default();
        debug!(hits = hits.len(), "milvus search done");
        Ok(hits)
    }

    async fn find_matching(
        &self,
        needle: &str,
        limit: u32,
    ) -> Result<Vec<BookSummary>, CatalogError> {
        self.query(filter::text_contains(needle), SUMMARY_FIELDS, limit)
            .await
    }

    async fn delete(&self, id: &str) -> Result<(), CatalogError> {
        self.call::<_, Value>(
            "entities/delete",
            &json!({ "collectionName": self.collection, "filter": filter::id_equals(id) }),
        )
        .await?;
        info!(book_id = %id, "book deleted from catalog");
        Ok(())
    }
}
