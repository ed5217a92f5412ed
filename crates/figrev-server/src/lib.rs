pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(data_dir: PathBuf) -> Router {
    let app_state = state::AppState::new(data_dir);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/ping", get(routes::ping::ping))
        .route("/api/config", post(routes::config::set_config))
        .route("/api/review", post(routes::review::post_review))
        .layer(cors)
        .with_state(app_state)
}

/// Start the figrev API server.
pub async fn serve(data_dir: PathBuf, port: u16) -> anyhow::Result<()> {
    let app = build_router(data_dir);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("figrev server listening on http://localhost:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}
