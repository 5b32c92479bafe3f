//! Add-artist form handlers

use artlist_common::store::Submission;
use artlist_common::validation::{ArtistForm, FieldErrors};
use axum::{extract::State, response::Html, routing::post, Form, Router};
use serde::Deserialize;
use tracing::debug;

use crate::render::{self, FormView};
use crate::{ApiResult, AppState};

use super::todo::NameForm;

#[derive(Debug, Deserialize)]
pub struct CheckNameForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub original_name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddArtistForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub img_url: String,
}

/// POST /populate-form
///
/// Form pre-filled with a to-do entry
pub async fn populate_form(Form(form): Form<NameForm>) -> Html<String> {
    let view = FormView {
        name: form.name.clone(),
        original_name: form.name,
        ..FormView::default()
    };
    Html(render::artist_form(&view))
}

/// POST /check-name
///
/// Re-renders the form with a message when the name is already taken
pub async fn check_name(
    State(state): State<AppState>,
    Form(form): Form<CheckNameForm>,
) -> Html<String> {
    let name = form.name.trim().to_string();
    let errors = if !name.is_empty() && state.store.name_taken(&name, None).await {
        FieldErrors::name_taken()
    } else {
        FieldErrors::default()
    };

    Html(render::artist_form(&FormView {
        name,
        original_name: form.original_name,
        errors,
        ..FormView::default()
    }))
}

/// POST /cancel-add-form
pub async fn cancel_add_form() -> Html<String> {
    Html(render::artist_form(&FormView::default()))
}

/// POST /submit-artist-add-form
///
/// On success the form comes back cleared and the to-do list no longer holds
/// `original_name`; on failure every value is kept and each failing field
/// carries its message.
pub async fn submit_artist_add_form(
    State(state): State<AppState>,
    Form(form): Form<AddArtistForm>,
) -> ApiResult<Html<String>> {
    let form = ArtistForm::new(&form.name, &form.desc, &form.img_url, &form.original_name);

    match state.store.submit(&form).await? {
        Submission::Created { pending, .. } => {
            Ok(Html(render::submit_response(&FormView::default(), &pending)))
        }
        Submission::Rejected(errors) => {
            debug!("Add form rejected for {:?}: {:?}", form.name, errors);
            let view = FormView {
                name: form.name,
                original_name: form.original_name,
                description: form.description,
                image_url: form.image_url,
                errors,
            };
            let pending = state.store.pending().await;
            Ok(Html(render::submit_response(&view, &pending)))
        }
    }
}

pub fn artist_form_routes() -> Router<AppState> {
    Router::new()
        .route("/populate-form", post(populate_form))
        .route("/check-name", post(check_name))
        .route("/cancel-add-form", post(cancel_add_form))
        .route("/submit-artist-add-form", post(submit_artist_add_form))
}
