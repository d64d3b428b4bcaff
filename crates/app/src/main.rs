use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::ConnectOptions;
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "ledger={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let server = settings.server;
    let engine = match build_engine(&server.database).await {
        Ok(engine) => engine,
        Err(err) => {
            tracing::error!("failed to initialize storage: {err}");
            return Err(err);
        }
    };

    let addr = format!("{}:{}", server.bind, server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return Err(err.into());
        }
    };

    server::run_with_listener(engine, listener).await?;
    Ok(())
}

async fn build_engine(
    config: &Database,
) -> Result<engine::Engine, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => {
            tracing::info!("Using in-memory storage");
            return Ok(engine::Engine::builder().memory().build());
        }
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
        Database::Postgres(postgres) => postgres.url(),
    };

    let mut options = ConnectOptions::new(url);
    options
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    if matches!(config, Database::Sqlite(_)) {
        // SQLite allows a single writer at a time.
        options.max_connections(1);
    }

    let database = sea_orm::Database::connect(options).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("Using relational storage, migrations applied");

    Ok(engine::Engine::builder().database(database).build())
}
