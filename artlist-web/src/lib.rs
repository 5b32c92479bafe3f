//! artlist-web library - HTTP surface of the artist curator
//!
//! Every user action posts a form and gets back an HTML fragment that
//! replaces part of the page.

use std::path::PathBuf;
use std::sync::Arc;

use artlist_common::ArtistStore;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod render;

pub use crate::error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Master list + pending list
    pub store: Arc<ArtistStore>,
    /// Served under /static
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(store: Arc<ArtistStore>, static_dir: PathBuf) -> Self {
        Self { store, static_dir }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let images = ServeDir::new(state.store.thumbnails().images_dir());
    let statics = ServeDir::new(&state.static_dir);

    Router::new()
        .merge(api::page_routes())
        .merge(api::todo_routes())
        .merge(api::artist_form_routes())
        .merge(api::gallery_routes())
        .merge(api::ui_routes())
        .merge(api::health_routes())
        .nest_service("/images", images)
        .nest_service("/static", statics)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
