//! Book catalog backed by an external vector index.
//!
//! The catalog owns book metadata and embeddings; this service only reads
//! from it, except for admin deletions. Lookups that miss return `None`
//! rather than an error so callers can tell "gone" from "unreachable".

pub mod filter;
pub mod milvus;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("api error {code}: {message}")]
    Api { code: i64, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Full book record as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub publishing_year: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub num_pages: Option<i64>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// A similarity-search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredBook {
    #[serde(flatten)]
    pub book: Book,
    pub distance: f64,
}

/// The subset of fields shown in admin search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub categories: Option<String>,
}

impl From<&Book> for BookSummary {
    fn from(b: &Book) -> Self {
        Self {
            id: b.id.clone(),
            title: b.title.clone(),
            author: b.author.clone(),
            categories: b.categories.clone(),
        }
    }
}

#[async_trait]
pub trait VectorCatalog: Send + Sync {
    /// Number of entries in the collection.
    async fn count(&self) -> Result<u64, CatalogError>;

    /// Point lookup by id.
    async fn get(&self, id: &str) -> Result<Option<Book>, CatalogError>;

    /// Nearest neighbours of `vector`, closest first.
    async fn search(&self, vector: &[f32], limit: u32) -> Result<Vec<ScoredBook>, CatalogError>;

    /// Entries whose title, author or categories contain `needle`.
    async fn find_matching(
        &self,
        needle: &str,
        limit: u32,
    ) -> Result<Vec<BookSummary>, CatalogError>;

    async fn delete(&self, id: &str) -> Result<(), CatalogError>;
}

// Datasets carry years and page counts as numbers, numeric strings or floats.
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(serde_json::Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn book_accepts_numeric_strings() {
        let book: Book = serde_json::from_value(json!({
            "id": "b1",
            "title": "Dune",
            "publishing_year": "1965",
            "num_pages": 412.0,
            "extra_field": "ignored"
        }))
        .unwrap();
        assert_eq!(book.publishing_year, Some(1965));
        assert_eq!(book.num_pages, Some(412));
        assert_eq!(book.author, None);
    }

    #[test]
    fn unparseable_numbers_become_none() {
        let book: Book = serde_json::from_value(json!({
            "id": "b1",
            "publishing_year": "unknown",
            "num_pages": null
        }))
        .unwrap();
        assert_eq!(book.publishing_year, None);
        assert_eq!(book.num_pages, None);
        assert_eq!(book.title, "");
    }

    #[test]
    fn scored_book_flattens() {
        let hit: ScoredBook = serde_json::from_value(json!({
            "id": "b1",
            "title": "Dune",
            "distance": 0.25
        }))
        .unwrap();
        assert_eq!(hit.book.id, "b1");
        let out = serde_json::to_value(&hit).unwrap();
        assert_eq!(out["title"], "Dune");
        assert_eq!(out["distance"], 0.25);
    }
}
