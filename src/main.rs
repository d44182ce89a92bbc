use clap::Parser;
use huddlebooks::config::{CliArgs, get_config};
use huddlebooks::{create_app, db, run_migrations};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if std::fs::metadata(".env").is_ok() {
        info!("Loading .env file");
        dotenv::dotenv().ok();
    }

    let args = CliArgs::parse();
    let config = get_config(args);

    let pool = Arc::new(db::init_pool(&config.database_url));

    // Apply any pending migrations before serving
    let mut conn = pool.get()?;
    run_migrations(&mut conn);
    drop(conn);

    let app = create_app(pool);

    let addr = config.bind_addr()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
