use axum::response::Html;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::store::AnimalStore;

pub mod routes;

/// Server state
pub struct AppState {
    pub store: AnimalStore,
}

async fn dashboard() -> Html<&'static str> {
    Html(include_str!("dashboard.html"))
}

pub async fn start_server(port: u16, store: AnimalStore) -> anyhow::Result<()> {
    let state = Arc::new(AppState { store });

    let app = Router::new()
        .route("/", get(dashboard))
        .route("/api/animals", get(routes::handle_animals))
        .route("/api/breeds", get(routes::handle_breeds))
        .route("/api/markers", get(routes::handle_markers))
        .route("/api/types", get(routes::handle_types))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting dashboard on {}", addr);
    println!("🌍 Dashboard running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
