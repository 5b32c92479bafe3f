//! Gallery card handlers: edit, update, delete

use artlist_common::store::Update;
use artlist_common::validation::ArtistEdit;
use artlist_common::ArtistRecord;
use axum::{
    extract::{Path, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::render::{self, EditView};
use crate::{ApiError, ApiResult, AppState};

const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");
const HX_RETARGET: HeaderName = HeaderName::from_static("hx-retarget");
const HX_RESWAP: HeaderName = HeaderName::from_static("hx-reswap");

#[derive(Debug, Deserialize)]
pub struct EditArtistForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub img_url: String,
}

/// GET /artists/edit/:id
pub async fn edit_artist(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<Html<String>> {
    let record = state
        .store
        .find(id)
        .await
        .ok_or_else(|| ApiError::NotFound("Artist not found".to_string()))?;

    Ok(Html(render::edit_form_content(&EditView {
        record,
        errors: Default::default(),
    })))
}

/// POST /artists/update/:id
///
/// Success swaps the card in place. Validation or thumbnail failures are
/// retargeted into the edit area instead.
pub async fn update_artist(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Form(form): Form<EditArtistForm>,
) -> ApiResult<Response> {
    let edit = ArtistEdit::new(&form.name, &form.desc, &form.img_url);

    match state.store.update_record(id, &edit).await? {
        Update::Updated(record) => Ok(Html(render::update_response(&record)).into_response()),
        Update::Rejected { errors, thumbnail } => {
            let view = EditView {
                record: ArtistRecord {
                    id,
                    name: edit.name,
                    description: edit.description,
                    image_url: edit.image_url,
                    thumbnail,
                },
                errors,
            };
            Ok((
                [
                    (HX_RETARGET, HeaderValue::from_static("#edit-form-target")),
                    (HX_RESWAP, HeaderValue::from_static("innerHTML")),
                ],
                Html(render::edit_form_content(&view)),
            )
                .into_response())
        }
    }
}

/// POST|DELETE /artists/delete/:id
///
/// Empty body; the client removes the card and listens for `artist-deleted`.
pub async fn delete_artist(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<Response> {
    state.store.delete_record(id).await?;

    let trigger = json!({ "artist-deleted": { "id": id.to_string() } }).to_string();
    let trigger = HeaderValue::from_str(&trigger)
        .map_err(|e| ApiError::Internal(format!("Invalid trigger header: {}", e)))?;

    Ok((StatusCode::OK, [(HX_TRIGGER, trigger)]).into_response())
}

pub fn gallery_routes() -> Router<AppState> {
    Router::new()
        .route("/artists/edit/:id", get(edit_artist))
        .route("/artists/update/:id", post(update_artist))
        .route("/artists/delete/:id", post(delete_artist).delete(delete_artist))
}
