//! To-do (pending) list handlers

use artlist_common::store::pending::split_names;
use axum::{extract::State, response::Html, routing::post, Form, Router};
use serde::Deserialize;

use crate::render::{self, FormView};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct NameForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct NamesForm {
    /// One name per line
    #[serde(default)]
    pub names: String,
}

#[derive(Debug, Deserialize)]
pub struct OriginalNameForm {
    #[serde(default)]
    pub original_name: String,
}

/// POST /confirm-delete-todo
///
/// Confirmation dialog for removing one to-do entry
pub async fn confirm_delete_todo(Form(form): Form<NameForm>) -> Html<String> {
    Html(render::confirm_delete_content(&form.name))
}

/// POST /delete-todo-item
///
/// Removes the name (case-insensitive) and returns the list items
pub async fn delete_todo_item(
    State(state): State<AppState>,
    Form(form): Form<NameForm>,
) -> ApiResult<Html<String>> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Name is required".to_string()));
    }

    let pending = state.store.remove_pending_name(name).await?;
    Ok(Html(render::todo_list_response(&pending)))
}

/// POST /add-to-todo-list
///
/// Appends every non-blank line and returns the list items
pub async fn add_to_todo_list(
    State(state): State<AppState>,
    Form(form): Form<NamesForm>,
) -> ApiResult<Html<String>> {
    let pending = state.store.add_pending_names(&split_names(&form.names)).await?;
    Ok(Html(render::todo_list_response(&pending)))
}

/// POST /confirm-delete-todo-form
///
/// With no populated name there is nothing to confirm: the form is simply
/// cleared.
pub async fn confirm_delete_todo_form(
    State(state): State<AppState>,
    Form(form): Form<OriginalNameForm>,
) -> ApiResult<Html<String>> {
    let original_name = form.original_name.trim();
    if original_name.is_empty() {
        return delete_todo_form(State(state), Form(form)).await;
    }
    Ok(Html(render::confirm_delete_and_clear_content(original_name)))
}

/// POST /delete-todo-form
///
/// Removes the name the form was populated from, then returns a cleared form
/// with the list refreshed out-of-band.
pub async fn delete_todo_form(
    State(state): State<AppState>,
    Form(form): Form<OriginalNameForm>,
) -> ApiResult<Html<String>> {
    let original_name = form.original_name.trim();
    let pending = if original_name.is_empty() {
        state.store.pending().await
    } else {
        state.store.remove_pending_name(original_name).await?
    };

    Ok(Html(render::submit_response(&FormView::default(), &pending)))
}

pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/confirm-delete-todo", post(confirm_delete_todo))
        .route("/delete-todo-item", post(delete_todo_item))
        .route("/add-to-todo-list", post(add_to_todo_list))
        .route("/confirm-delete-todo-form", post(confirm_delete_todo_form))
        .route("/delete-todo-form", post(delete_todo_form))
}
