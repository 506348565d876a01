use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use taskboard_api::{
    app,
    auth::TokenIssuer,
    cli::Cli,
    config::AppConfig,
    cors_layer,
    database::{DatabaseManager, PgStore},
    services::CredentialStore,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and JWT_SECRET
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("taskboard_api=info,tower_http=debug")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env().context("invalid configuration")?;
    cli.apply(&mut config);
    tracing::info!("Starting task board API in {:?} mode", config.environment);

    let db = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    let store = Arc::new(PgStore::new(db.clone()));

    let credentials = CredentialStore::new(store.clone(), &config.password).context("invalid password settings")?;
    let tokens = TokenIssuer::new(&config.security.jwt_secret).context("invalid JWT settings")?;
    let state = AppState::new(store, credentials, tokens);

    let router = app(state, cors_layer(&config.security));

    let bind_addr = config.server_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
