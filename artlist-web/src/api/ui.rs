//! Embedded UI assets
//!
//! Compiled into the binary; the configurable static directory is served
//! separately under /static.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::AppState;

const APP_CSS: &str = include_str!("../../ui/app.css");
const APP_JS: &str = include_str!("../../ui/app.js");

/// GET /assets/app.css
pub async fn serve_app_css() -> Response {
    (StatusCode::OK, [("content-type", "text/css")], APP_CSS).into_response()
}

/// GET /assets/app.js
pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/javascript")],
        APP_JS,
    )
        .into_response()
}

pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/assets/app.css", get(serve_app_css))
        .route("/assets/app.js", get(serve_app_js))
}
