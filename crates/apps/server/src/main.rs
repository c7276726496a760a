use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod changes;
mod config;
mod payments;
mod routes;
mod supabase;

use crate::changes::ChangeHub;
use crate::config::Config;
use crate::routes::{router, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::parse();
    if let Err(err) = run(config).await {
        error!("server failed: {err}");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState {
        catalog: config.catalog_backend()?,
        payments: config.payment_gateway()?,
        changes: ChangeHub::new(),
        publishable_key: config.stripe_publishable_key.clone(),
    };
    info!(
        catalog = ?config.catalog,
        payments = ?config.payments,
        "backends configured"
    );

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("talent server listening on http://{}", config.addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
