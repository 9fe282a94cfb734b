use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tg_catalog::{
    AppState,
    auth,
    config::{AppConfig, Env},
    create_router,
    repository::{PostgresRepository, RepositoryState},
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// The asynchronous entry point, responsible for initializing configuration,
/// logging, the database pool, the repository, and the HTTP server.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (fail-fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    // Prioritizes RUST_LOG, falling back to sensible local defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tg_catalog=debug,tower_http=info,axum=trace".into());

    // 3. Initialize Logging based on Environment
    match config.env {
        Env::Local => {
            // LOCAL: pretty output for human readability.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // PROD: JSON output for centralized log aggregators.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Database Initialization (Postgres)
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    // Schema migrations are embedded at compile time and applied on boot.
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("FATAL: Failed to run database migrations.");

    // Instantiate the repository, wrapped in an Arc for shared ownership.
    let repo = Arc::new(PostgresRepository::new(pool)) as RepositoryState;

    // 5. Administrator Seed (optional, out-of-band identity creation)
    seed_admin(&repo).await;

    // 6. State Assembly and Server Startup
    let app_state = AppState {
        repo,
        config: config.clone(),
    };

    let app = create_router(app_state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .expect("FATAL: Failed to bind HTTP listener.");

    tracing::info!("Listening on {}", config.bind_addr);
    tracing::info!("API documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, app).await.expect("HTTP server failed");
}

/// seed_admin
///
/// Creates the administrator record from ADMIN_LOGIN / ADMIN_PASSWORD when
/// both are set and the login does not already exist. This is the only
/// creation path for the moderation identity; no request handler can create
/// one. A no-op when the variables are absent.
async fn seed_admin(repo: &RepositoryState) {
    let (Ok(login), Ok(password)) = (
        std::env::var("ADMIN_LOGIN"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        return;
    };

    let existing = repo
        .get_admin_by_login(&login)
        .await
        .expect("FATAL: Failed to query administrators during seed.");

    if existing.is_some() {
        tracing::debug!("administrator '{}' already present, seed skipped", login);
        return;
    }

    let password_hash =
        auth::hash_password(&password).expect("FATAL: Failed to hash the seed password.");

    repo.create_admin(&login, &password_hash)
        .await
        .expect("FATAL: Failed to create the seed administrator.");

    tracing::info!("administrator '{}' seeded", login);
}
