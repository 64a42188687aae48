mod admin;
mod app;
mod auth;
mod books;
mod catalog;
mod config;
mod db;
mod dto;
mod error;
mod favorites;
mod llm;
mod state;
mod suggest;
mod usage;

#[cfg(test)]
mod testing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "bookrec=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init().await?;

    if let Some(seed) = &app_state.config.admin_seed {
        auth::services::ensure_admin(app_state.accounts.as_ref(), seed).await?;
    }

    app::serve(app::build_app(app_state)).await
}
