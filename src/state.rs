use std::{sync::Arc, time::Duration};

use anyhow::Context;

use crate::{
    auth::repo::{AccountRepo, PgAccountRepo},
    catalog::{milvus::MilvusCatalog, VectorCatalog},
    config::AppConfig,
    db,
    favorites::repo::{FavoriteRepo, PgFavoriteRepo},
    llm::{openai::OpenAiClient, LanguageModel},
    suggest::SuggestionIndex,
    usage::repo::{PgUsageRepo, UsageRepo},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub accounts: Arc<dyn AccountRepo>,
    pub favorites: Arc<dyn FavoriteRepo>,
    pub usage: Arc<dyn UsageRepo>,
    pub catalog: Arc<dyn VectorCatalog>,
    pub llm: Arc<dyn LanguageModel>,
    pub suggestions: Arc<SuggestionIndex>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let pool = db::connect(&config.database_url).await?;
        db::migrate(&pool).await?;

        let timeout = Duration::from_secs(config.upstream_timeout_secs);
        let catalog = MilvusCatalog::new(&config.milvus, timeout).context("build catalog client")?;
        let llm = OpenAiClient::new(&config.openai, timeout).context("build model client")?;
        let suggestions = SuggestionIndex::load(&config.books_csv_path)?;

        Ok(Self {
            accounts: Arc::new(PgAccountRepo::new(pool.clone())),
            favorites: Arc::new(PgFavoriteRepo::new(pool.clone())),
            usage: Arc::new(PgUsageRepo::new(pool)),
            catalog: Arc::new(catalog),
            llm: Arc::new(llm),
            suggestions: Arc::new(suggestions),
            config,
        })
    }
}
