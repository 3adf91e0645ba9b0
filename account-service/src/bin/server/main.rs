use std::sync::Arc;

use account_service::account::ports::AccountServicePort;
use account_service::account::service::AccountService;
use account_service::config::Config;
use account_service::inbound::http::router::create_router;
use account_service::repositories::InMemoryCredentialRepository;
use account_service::repositories::PostgresCredentialRepository;
use auth::Authenticator;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,auth=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    let persistence = if config.database.url.is_some() {
        "postgresql"
    } else {
        "memory"
    };

    tracing::info!(
        http_port = config.server.http_port,
        token_ttl_hours = config.auth.token_ttl_hours,
        persistence,
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::new(config.auth.token_config()?));

    let account_service: Arc<dyn AccountServicePort> = match &config.database.url {
        Some(url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            Arc::new(AccountService::new(
                Arc::new(PostgresCredentialRepository::new(pg_pool)),
                Arc::clone(&authenticator),
            ))
        }
        None => {
            tracing::warn!("No database configured; credentials are kept in memory");
            Arc::new(AccountService::new(
                Arc::new(InMemoryCredentialRepository::new()),
                Arc::clone(&authenticator),
            ))
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(account_service, authenticator);

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
