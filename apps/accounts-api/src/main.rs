use core_config::tracing::{init_tracing, install_color_eyre};
use domain_accounts::{AccountService, InMemoryAccountStore, JwtTokenService, handlers};
use std::sync::Arc;
use tracing::info;

mod config;
mod server;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    // Accounts live in memory only; a restart starts from the seeded superadmin
    let store = Arc::new(InMemoryAccountStore::new());
    let service = AccountService::new(store);
    service
        .seed_superadmin(&config.superadmin)
        .await
        .map_err(|e| eyre::eyre!("Failed to seed superadmin: {}", e))?;

    let tokens = Arc::new(JwtTokenService::new(&config.jwt));
    let router = server::with_request_tracing(handlers::router(service, tokens));

    server::serve(router, &config.server).await?;

    info!("Good bye");
    Ok(())
}
