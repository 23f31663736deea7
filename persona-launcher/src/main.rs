mod cli;

use axum::Router;
use backend::{BackendConfig, dbs::DatabaseConfig, responder::ResponderConfig};
use clap::Parser;
use std::net::SocketAddr;
use tower_http::services::ServeDir;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
    dotenvy::dotenv().ok();

    let cli = cli::Cli::parse();

    let database = match cli.local_db_path {
        Some(path) => DatabaseConfig::Local { path: Some(path) },
        None => {
            // Without the JSON-file store a connection string is mandatory.
            let url = std::env::var("DATABASE_URL")
                .map_err(|_| "DATABASE_URL must be set (or pass --local-db-path)")?;
            DatabaseConfig::Postgres { url }
        }
    };

    let responder = match std::env::var("OPENAI_API_KEY") {
        Ok(api_key) if !api_key.is_empty() => ResponderConfig::OpenAi {
            api_key,
            api_base: std::env::var("OPENAI_API_BASE").ok(),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_owned()),
        },
        _ => {
            tracing::warn!("OPENAI_API_KEY not set, using the keyword placeholder responder");
            ResponderConfig::Keyword
        }
    };

    let router = Router::new().fallback_service(ServeDir::new(cli.dist_dir));
    let router = backend::init(router, BackendConfig { database, responder }).await?;

    let addr = SocketAddr::from(([127, 0, 0, 1], cli.port));
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
