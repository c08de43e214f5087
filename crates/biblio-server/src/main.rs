//! Biblio Server Binary
//!
//! Serves the bibliography API and the built frontend.

use std::sync::Arc;

use biblio_core::BibliographyService;
use biblio_server::{serve, AppState, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::load()?;
    tracing::info!(db = %config.store.db_path.display(), "opening store");
    let service = BibliographyService::open(&config.store).await?;
    let state = Arc::new(AppState::new(service));

    serve(&config, state).await
}
