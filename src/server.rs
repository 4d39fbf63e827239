//! HTTP front end: `GET /extract?url=...` returns the scraped record.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::page::PageLoader;
use crate::scraper::ProfileScraper;

#[derive(Debug, Deserialize)]
pub struct ExtractQuery {
    url: Option<String>,
}

/// Build the router around a scraper. Each request loads its own page.
pub fn router<L>(scraper: ProfileScraper<L>) -> Router
where
    L: PageLoader + 'static,
{
    Router::new()
        .route("/extract", get(extract::<L>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(scraper))
}

async fn extract<L>(
    State(scraper): State<Arc<ProfileScraper<L>>>,
    Query(query): Query<ExtractQuery>,
) -> Response
where
    L: PageLoader + 'static,
{
    let Some(url) = query.url.filter(|u| !u.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Please provide a 'url' parameter" })),
        )
            .into_response();
    };

    info!("Extract request for {}", url);
    let record = scraper.scrape(&url).await;
    (StatusCode::OK, Json(record)).into_response()
}

/// Serve until the process is interrupted
pub async fn serve<L>(scraper: ProfileScraper<L>, addr: std::net::SocketAddr) -> anyhow::Result<()>
where
    L: PageLoader + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(scraper))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
