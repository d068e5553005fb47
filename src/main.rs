use std::env;
use std::error::Error;

use health_reporter::app;
use health_reporter::error::ConfigError;
use health_reporter::utils::config::HealthConfig;
use health_reporter::utils::constant::DEFAULT_BIND_ADDRESS;
use health_reporter::utils::shutdown::shutdown_signal;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::info;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = HealthConfig::from_env()?;
    let database_url =
        env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

    // Lazy so the liveness probe answers even when the database is down
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(config.database_timeout)
        .connect_lazy(&database_url)?;

    let app = app(db_pool, config);

    let addr = env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
    let listener = TcpListener::bind(&addr).await?;
    info!("Server starting at http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "health_reporter=info,tower_http=info".into());

    let production = env::var("APP_ENV")
        .map(|v| v.eq_ignore_ascii_case("production"))
        .unwrap_or(false);

    if production {
        tracing_subscriber::registry()
            .with(filter)
            .with(JsonStorageLayer)
            .with(BunyanFormattingLayer::new(
                "health-reporter".into(),
                std::io::stdout,
            ))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
