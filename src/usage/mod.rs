//! Append-only accounting of language-model token consumption.

pub mod repo;
pub mod services;

use serde::{Deserialize, Serialize};

/// Why a language-model call was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    Recommend,
    Explain,
    Chatbot,
}

impl Purpose {
    pub fn as_str(self) -> &'static str {
        match self {
            Purpose::Recommend => "recommend",
            Purpose::Explain => "explain",
            Purpose::Chatbot => "chatbot",
        }
    }
}
