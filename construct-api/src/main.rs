//! # Construct API Server
//!
//! Multi-tenant backend for construction companies: clients, projects with
//! task trees, trackable links and public profiles.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p construct-api
//! ```

use construct_api::{
    app::{build_router, AppState},
    config::Config,
};
use construct_shared::auth::identity::GoogleIdentityVerifier;
use construct_shared::db::{
    migrations::run_migrations,
    pool::{close_pool, create_pool, DatabaseConfig},
};
use construct_shared::repository::{PgRepository, Repositories};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "construct_api=debug,construct_shared=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Construct API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    tracing::info!(
        comment_policy = ?config.comments.policy,
        google_login = config.google.audience.is_some(),
        "Configuration loaded"
    );

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;
    run_migrations(&pool).await?;

    let repos = Repositories::from_store(PgRepository::new(pool.clone()));
    let bind_address = config.bind_address();
    let state = AppState::new(&repos, Arc::new(GoogleIdentityVerifier::new()), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
