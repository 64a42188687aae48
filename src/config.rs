use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MilvusConfig {
    pub url: String,
    pub token: Option<String>,
    pub collection: String,
    pub vector_field: String,
}

/// Credentials for the admin account ensured at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub openai: OpenAiConfig,
    pub milvus: MilvusConfig,
    pub books_csv_path: String,
    pub recommend_limit: u32,
    pub reply_language: String,
    pub upstream_timeout_secs: u64,
    pub cors_origins: Vec<String>,
    pub admin_seed: Option<AdminSeed>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: env_or("JWT_ISSUER", "bookrec"),
            audience: env_or("JWT_AUDIENCE", "bookrec-users"),
            ttl_minutes: env_parsed("JWT_TTL_MINUTES", 30),
        };
        let openai = OpenAiConfig {
            api_key: std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            chat_model: env_or("OPENAI_CHAT_MODEL", "gpt-4o-mini"),
            embedding_model: env_or("OPENAI_EMBEDDING_MODEL", "text-embedding-ada-002"),
        };
        let milvus = MilvusConfig {
            url: std::env::var("MILVUS_URL").context("MILVUS_URL must be set")?,
            token: std::env::var("MILVUS_TOKEN").ok().filter(|t| !t.is_empty()),
            collection: env_or("MILVUS_COLLECTION", "books_dataset"),
            vector_field: env_or("MILVUS_VECTOR_FIELD", "vector"),
        };
        let cors_origins = std::env::var("CORS_ORIGINS")
            .map(|v| split_origins(&v))
            .unwrap_or_default();
        let admin_seed = match (
            std::env::var("ADMIN_USERNAME"),
            std::env::var("ADMIN_EMAIL"),
            std::env::var("ADMIN_PASSWORD"),
        ) {
            (Ok(username), Ok(email), Ok(password)) => Some(AdminSeed {
                username,
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt,
            openai,
            milvus,
            books_csv_path: env_or("BOOKS_CSV_PATH", "./data/books_full.csv"),
            recommend_limit: env_parsed("RECOMMEND_LIMIT", 100),
            reply_language: env_or("REPLY_LANGUAGE", "Vietnamese"),
            upstream_timeout_secs: env_parsed("UPSTREAM_TIMEOUT_SECS", 60),
            cors_origins,
            admin_seed,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
