pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;

use state::AppState;

/// Build the application router.
///
/// Separate from [`run_server`] so the test suite can drive the full HTTP
/// surface without binding a socket.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/transfers",
            post(handlers::create_transfer).get(handlers::list_transfers),
        )
        .route("/transfers/{idem_key}", get(handlers::get_transfer))
        .route("/health", get(handlers::health_check))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(openapi::ApiDoc::openapi()) }),
        )
        .with_state(state)
}

/// Start HTTP Gateway server
pub async fn run_server(state: Arc<AppState>, host: &str, port: u16) {
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("❌ FATAL: Failed to bind to {}: {}", addr, e);
            eprintln!(
                "   Hint: Port {} may already be in use. Check with: lsof -i :{}",
                port, port
            );
            std::process::exit(1);
        }
    };

    println!("🚀 Gateway listening on http://{}", addr);
    println!("📖 OpenAPI JSON: http://{}/api-docs/openapi.json", addr);

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("❌ FATAL: Server error: {}", e);
        std::process::exit(1);
    }
}
