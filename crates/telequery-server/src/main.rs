//! telequery - HTTP proxy for carrier account queries.
//!
//! Callers send an account id and password with each request; the server
//! keeps the provider session cached on disk and logs in again only when
//! the credentials change or the provider reports the session expired.

mod logging;
mod routes;
mod server;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use telequery_core::{
    Authenticator, Config, CredentialStore, FileCredentialStore, HttpRemoteClient, QueryExecutor,
    SessionCacheManager,
};

use routes::{Defaults, Routes};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    let _log_guard = logging::init_tracing(config.debug, config.log_dir.as_deref());
    info!(
        provider = %config.provider_base_url,
        store = %config.store_path.display(),
        allowlist = config.allowlist.as_ref().map(|l| l.len()),
        "telequery starting"
    );

    let client = Arc::new(HttpRemoteClient::new(
        config.provider_base_url.clone(),
        config.request_timeout,
    )?);
    let store: Arc<dyn CredentialStore> = Arc::new(FileCredentialStore::new(&config.store_path));

    let mut authenticator = Authenticator::new(client, store);
    if let Some(ref allowlist) = config.allowlist {
        authenticator = authenticator.with_allowlist(allowlist.clone());
    }

    let executor = QueryExecutor::new(SessionCacheManager::new(authenticator));
    let routes = Routes::new(executor, Defaults::from_config(&config));

    server::serve(&config.listen_addr(), routes).await?;

    info!("telequery shutting down");
    Ok(())
}
