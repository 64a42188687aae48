//! Keyword suggestions over the book dataset, held in memory.

use std::{collections::HashSet, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestionRow {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub categories: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub query: String,
}

/// Rows in dataset-load order; matching is a linear scan.
#[derive(Debug, Default)]
pub struct SuggestionIndex {
    rows: Vec<SuggestionRow>,
}

impl SuggestionIndex {
    pub fn new(rows: Vec<SuggestionRow>) -> Self {
        Self { rows }
    }

    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> anyhow::Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let mut rows = Vec::new();
        for record in rdr.deserialize::<SuggestionRow>() {
            rows.push(record.context("parse book row")?);
        }
        Ok(Self::new(rows))
    }

    /// Loads the dataset, or an empty index when the file is absent.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "book dataset not found; suggestions disabled");
            return Ok(Self::default());
        }
        let file = std::fs::File::open(path)
            .with_context(|| format!("open book dataset {}", path.display()))?;
        let index = Self::from_csv_reader(file)?;
        info!(rows = index.len(), path = %path.display(), "suggestion index loaded");
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Up to [`MAX_SUGGESTIONS`] titles, authors and category segments that
    /// contain `query`, case-insensitively, in first-seen order.
    pub fn suggest(&self, query: &str) -> Vec<Suggestion> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut push = |candidate: &str| -> bool {
            let candidate = candidate.trim();
            if !candidate.is_empty() && seen.insert(candidate.to_lowercase()) {
                out.push(Suggestion {
                    query: candidate.to_string(),
                });
            }
            out.len() >= MAX_SUGGESTIONS
        };

        'rows: for row in &self.rows {
            if row.title.to_lowercase().contains(&needle) && push(&row.title) {
                break;
            }
            if row.author.to_lowercase().contains(&needle) && push(&row.author) {
                break;
            }
            for category in row.categories.split('/') {
                if category.to_lowercase().contains(&needle) && push(category) {
                    break 'rows;
                }
            }
        }
        out
    }
}
