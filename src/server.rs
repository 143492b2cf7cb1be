//! Serving shell for butterfly-viz
//!
//! A single `GET /` endpoint that rebuilds the map on every request.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use log::{error, info};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::core::MapComposer;

/// Build the Axum router
///
/// Every response, including 404s, carries no-store caching headers.
pub fn build_router(composer: Arc<MapComposer>) -> Router {
    Router::new()
        .route("/", get(index))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::EXPIRES,
            HeaderValue::from_static("0"),
        ))
        .with_state(composer)
}

async fn index(State(composer): State<Arc<MapComposer>>) -> Response {
    let map = composer.compose().await;

    match map.to_html() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("❌ Failed to render map: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render map").into_response()
        }
    }
}

/// Bind `addr` and serve until the process is stopped
pub async fn run_server(composer: MapComposer, addr: &str) -> anyhow::Result<()> {
    let app = build_router(Arc::new(composer));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🚀 Server listening on http://{}", listener.local_addr()?);
    info!("👉 Use the top-right menu to switch base map or transport mode.");

    axum::serve(listener, app).await?;

    Ok(())
}
