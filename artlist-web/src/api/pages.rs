//! Full-page routes

use axum::{extract::State, response::Html, routing::get, Router};

use crate::{render, AppState};

/// GET /
///
/// Add page: to-do list plus an empty artist form
pub async fn index_page(State(state): State<AppState>) -> Html<String> {
    let pending = state.store.pending().await;
    Html(render::index_page(&pending))
}

/// GET /gallery
pub async fn gallery_page(State(state): State<AppState>) -> Html<String> {
    let artists = state.store.artists().await;
    Html(render::gallery_page(&artists))
}

pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_page))
        .route("/gallery", get(gallery_page))
}
