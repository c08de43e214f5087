//! Biblio Server - HTTP API for the bibliography store
//!
//! Thin JSON adapter over [`biblio_core::BibliographyService`], plus static
//! serving of the built frontend.

pub mod config;
pub mod http;

use std::path::Path;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use biblio_core::BibliographyService;

pub use config::ServerConfig;

/// Shared application state
pub struct AppState {
    pub service: BibliographyService,
}

impl AppState {
    pub fn new(service: BibliographyService) -> Self {
        Self { service }
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Project endpoints
        .route(
            "/projects",
            get(http::get_projects)
                .post(http::create_project)
                .put(http::update_project)
                .delete(http::delete_project),
        )
        .route("/projects/exists", get(http::project_exists))
        // Source endpoints
        .route(
            "/projects/{project_id}/sources",
            get(http::list_sources)
                .post(http::create_source)
                .put(http::update_source),
        )
        .route(
            "/projects/{project_id}/sources/{source_id}",
            get(http::get_source).delete(http::delete_source),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes with the frontend directory behind them
pub fn app(state: Arc<AppState>, frontend_dir: &Path) -> Router {
    create_router(state).fallback_service(ServeDir::new(frontend_dir))
}

/// Start the server
pub async fn serve(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = app(state, &config.frontend_dir);
    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    tracing::info!("Biblio server listening on {}", config.addr);
    axum::serve(listener, app).await?;
    Ok(())
}
