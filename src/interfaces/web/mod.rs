//! The HTTP surface of the orbital-grid service.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::cache::SolveCache;
use crate::interfaces::input::RenderDefaults;

pub mod handlers;


/// Shared state injected into every handler.
pub struct AppState {
    /// The per-molecule solve cache.
    pub cache: SolveCache,

    /// Render parameters applied when a request omits the corresponding query parameter.
    pub defaults: RenderDefaults,
}

/// The state handle cloned across handlers.
pub type SharedState = Arc<AppState>;

/// Builds the full router of the service.
///
/// CORS is fully permissive: the service publishes read-only scientific data to browser-based
/// volume renderers on arbitrary origins.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);
    Router::new()
        .route("/", get(handlers::root))
        .route("/api/molecules", get(handlers::list_molecules))
        .route("/api/molecule/info", get(handlers::molecule_info))
        .route("/api/orbital/:orbital_index", get(handlers::orbital))
        .route("/api/orbitals/batch", get(handlers::orbitals_batch))
        .layer(CorsLayer::permissive())
        .with_state(shared)
}
