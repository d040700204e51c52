//! Resident registry service entry point.
//!
//! Startup order: config, logging, database pool + schema bootstrap,
//! gateway. A failure in any of these is fatal; the service never runs
//! with a partially initialized store.

use std::sync::Arc;

use resident_registry::config::AppConfig;
use resident_registry::gateway::{self, state::AppState};
use resident_registry::logging;
use resident_registry::payment::CallbackVerifier;
use resident_registry::registry::Database;
use resident_registry::snowflake::IdAllocator;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _guard = logging::init_logging(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        git = env!("GIT_HASH"),
        env = %env,
        "starting resident-registry"
    );

    let db = Arc::new(Database::connect(&config.postgres_url).await?);
    db.init_schema(&config.admin.username, &config.admin.password)
        .await?;

    let verifier = CallbackVerifier::new(
        config.payment.secret_key.clone(),
        config.payment.merchant_code.clone(),
    );
    let state = Arc::new(AppState::new(
        db,
        Arc::new(IdAllocator::new()),
        verifier,
        config.page_size,
    ));

    gateway::run_server(&config.gateway.host, config.gateway.port, state).await;
    Ok(())
}
