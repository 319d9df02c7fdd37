mod app;
mod auth;
mod config;
mod db;
mod error;
#[cfg(test)]
mod memory;
mod nutrition;
mod records;
mod state;
mod tracker;


use crate::{
    config::AppConfig,
    state::{AppState, Repositories},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "wellness_api=debug,axum=info,tower_http=info".to_string());
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

    let config = AppConfig::from_env()?;
    tracing::debug!(jwt = ?config.jwt, password = ?config.password, "configuration loaded");

    let db = db::connect(&config.database).await?;
    db::migrate(&db).await;

    let state = AppState::new(&config, Repositories::postgres(db.clone()))?;
    let app = app::build_app(state);

    app::serve(app, config.listen_addr()?).await?;

    db.close().await;
    Ok(())
}
