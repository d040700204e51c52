pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::admin_auth::admin_auth_middleware;
use state::AppState;

/// Build the gateway router.
///
/// Split out of [`run_server`] so tests can drive the router without
/// binding a socket.
pub fn build_router(state: Arc<AppState>) -> Router {
    let admin_routes = Router::new()
        .route("/residents/count", get(handlers::count_requests))
        .route("/requests", get(handlers::list_requests))
        .route("/requests/accept", post(handlers::accept_requests))
        .route("/requests/reject", post(handlers::reject_requests))
        .layer(from_fn_with_state(state.clone(), admin_auth_middleware));

    Router::new()
        .route("/api/v1/health", get(handlers::health_check))
        .route("/api/v1/register", post(handlers::register))
        .route("/ipn", get(handlers::ipn))
        .nest("/api/v1/admin", admin_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Start the HTTP gateway server.
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) {
    let app = build_router(state);

    let addr = format!("{host}:{port}");
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("❌ FATAL: Failed to bind to {addr}: {e}");
            eprintln!("   Hint: Port {port} may already be in use. Check with: lsof -i :{port}");
            std::process::exit(1);
        }
    };

    println!("🚀 Gateway listening on http://{addr}");
    println!("📖 API Docs: http://{addr}/docs");

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("❌ FATAL: Server error: {e}");
        std::process::exit(1);
    }
}
