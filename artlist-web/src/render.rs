//! HTML page and fragment builders
//!
//! Fragments carry htmx attributes; out-of-band pieces (`hx-swap-oob`) let a
//! single response refresh the form, the to-do list and the dialog slot.

use artlist_common::validation::FieldErrors;
use artlist_common::ArtistRecord;
use serde_json::{Map, Value};

const EDIT_PLACEHOLDER: &str = r##"<p>Click "edit" on a card above to load its data here.</p>"##;

/// Values and messages of the add form
#[derive(Debug, Clone, Default)]
pub struct FormView {
    pub name: String,
    pub original_name: String,
    pub description: String,
    pub image_url: String,
    pub errors: FieldErrors,
}

/// Values and messages of the edit form
#[derive(Debug, Clone)]
pub struct EditView {
    pub record: ArtistRecord,
    pub errors: FieldErrors,
}

/// Escape text for element content and quoted attribute values
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// `hx-vals` attribute value carrying one form field
fn hx_vals(field: &str, value: &str) -> String {
    let mut vals = Map::new();
    vals.insert(field.to_string(), Value::String(value.to_string()));
    escape(&Value::Object(vals).to_string())
}

fn field_error(message: &Option<String>) -> String {
    match message {
        Some(msg) => format!(r##"<span class="field-error">{}</span>"##, escape(msg)),
        None => String::new(),
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="/assets/app.css">
    <script src="https://unpkg.com/htmx.org@1.9.12"></script>
    <script src="/assets/app.js" defer></script>
</head>
<body>
    <nav>
        <a href="/">Add artists</a>
        <a href="/gallery">Gallery</a>
    </nav>
    <main>
{body}
    </main>
</body>
</html>
"##,
        title = escape(title),
        body = body,
    )
}

// ============================================================================
// Add page
// ============================================================================

/// Full add page: to-do list and an empty form
pub fn index_page(pending: &[String]) -> String {
    let body = format!(
        r##"<div class="add-layout">
    <section class="todo">
        <h2>To add</h2>
        <form hx-post="/add-to-todo-list" hx-target="#todo-list" hx-swap="innerHTML" hx-on::after-request="this.reset()">
            <textarea name="names" rows="4" placeholder="One name per line"></textarea>
            <button type="submit">Add names</button>
        </form>
        <ul id="todo-list">{items}</ul>
    </section>
    <section id="artist-form-container">{form}</section>
    <div id="dialog"></div>
</div>"##,
        items = todo_list_items(pending),
        form = artist_form(&FormView::default()),
    );
    layout("Add artists", &body)
}

/// Inner HTML of the to-do `<ul>`
pub fn todo_list_items(pending: &[String]) -> String {
    pending
        .iter()
        .map(|name| {
            let vals = hx_vals("name", name);
            format!(
                r##"<li><a href="#" hx-post="/populate-form" hx-vals="{vals}" hx-target="#artist-form-container">{name}</a> <button type="button" class="remove" hx-post="/confirm-delete-todo" hx-vals="{vals}" hx-target="#dialog">&times;</button></li>"##,
                vals = vals,
                name = escape(name),
            )
        })
        .collect()
}

/// To-do list items plus an out-of-band reset of the dialog slot
pub fn todo_list_response(pending: &[String]) -> String {
    format!("{}{}", todo_list_items(pending), clear_dialog_oob())
}

fn clear_dialog_oob() -> &'static str {
    r##"<div id="dialog" hx-swap-oob="innerHTML"></div>"##
}

/// The add form, with values and field messages
pub fn artist_form(view: &FormView) -> String {
    format!(
        r##"<form id="artist-form" hx-post="/submit-artist-add-form" hx-target="#artist-form-container" hx-swap="innerHTML">
    <input type="hidden" name="original_name" value="{original_name}">
    <label>Name
        <input type="text" name="name" value="{name}" hx-post="/check-name" hx-trigger="change" hx-include="closest form" hx-target="#artist-form-container">
    </label>
    {name_msg}
    <label>Description
        <textarea name="desc" rows="4">{desc}</textarea>
    </label>
    {desc_msg}
    <label>Image URL
        <input type="url" name="img_url" value="{img_url}">
    </label>
    {img_msg}
    <div class="actions">
        <button type="submit">Add to master list</button>
        <button type="button" hx-post="/cancel-add-form" hx-target="#artist-form-container">Clear</button>
        <button type="button" hx-post="/confirm-delete-todo-form" hx-include="closest form" hx-target="#dialog">Remove from to-do</button>
    </div>
</form>"##,
        original_name = escape(&view.original_name),
        name = escape(&view.name),
        name_msg = field_error(&view.errors.name),
        desc = escape(&view.description),
        desc_msg = field_error(&view.errors.description),
        img_url = escape(&view.image_url),
        img_msg = field_error(&view.errors.image),
    )
}

/// Form swap target plus out-of-band to-do list and dialog reset
pub fn submit_response(view: &FormView, pending: &[String]) -> String {
    format!(
        r##"{form}<ul id="todo-list" hx-swap-oob="innerHTML">{items}</ul>{dialog}"##,
        form = artist_form(view),
        items = todo_list_items(pending),
        dialog = clear_dialog_oob(),
    )
}

/// Confirmation for removing a to-do entry from the list itself
pub fn confirm_delete_content(name: &str) -> String {
    format!(
        r##"<div class="dialog">
    <p>Remove <strong>{name}</strong> from the to-do list?</p>
    <button type="button" hx-post="/delete-todo-item" hx-vals="{vals}" hx-target="#todo-list" hx-swap="innerHTML">Remove</button>
    <button type="button" class="dismiss">Cancel</button>
</div>"##,
        name = escape(name),
        vals = hx_vals("name", name),
    )
}

/// Confirmation for removing the entry the form was populated from
pub fn confirm_delete_and_clear_content(name: &str) -> String {
    format!(
        r##"<div class="dialog">
    <p>Remove <strong>{name}</strong> from the to-do list and clear the form?</p>
    <button type="button" hx-post="/delete-todo-form" hx-vals="{vals}" hx-target="#artist-form-container" hx-swap="innerHTML">Remove</button>
    <button type="button" class="dismiss">Cancel</button>
</div>"##,
        name = escape(name),
        vals = hx_vals("original_name", name),
    )
}

// ============================================================================
// Gallery
// ============================================================================

/// Full gallery page
pub fn gallery_page(artists: &[ArtistRecord]) -> String {
    let items: String = artists.iter().map(grid_item).collect();
    let body = format!(
        r##"<section>
    <h2>Gallery ({count})</h2>
    <div id="gallery-grid" class="grid">{items}</div>
</section>
<section>
    <h2>Edit</h2>
    <div id="edit-form-target">{placeholder}</div>
</section>"##,
        count = artists.len(),
        items = items,
        placeholder = EDIT_PLACEHOLDER,
    );
    layout("Gallery", &body)
}

/// One gallery card
pub fn grid_item(record: &ArtistRecord) -> String {
    format!(
        r##"<div class="grid-item" id="artist-{id}">
    <img src="/images/{thumb}" alt="{name}" loading="lazy">
    <h3>{name}</h3>
    <p>{desc}</p>
    <button type="button" hx-get="/artists/edit/{id}" hx-target="#edit-form-target" hx-swap="innerHTML">edit</button>
    <button type="button" hx-post="/artists/delete/{id}" hx-target="#artist-{id}" hx-swap="outerHTML" hx-confirm="Delete {name}?">delete</button>
</div>"##,
        id = record.id,
        thumb = escape(&record.thumbnail),
        name = escape(&record.name),
        desc = escape(&record.description),
    )
}

/// Edit form for one record
pub fn edit_form_content(view: &EditView) -> String {
    let rec = &view.record;
    format!(
        r##"<form class="edit-form" data-artist-id="{id}" hx-post="/artists/update/{id}" hx-target="#artist-{id}" hx-swap="outerHTML">
    <img src="/images/{thumb}" alt="{name}" class="edit-thumb">
    <label>Name
        <input type="text" name="name" value="{name}">
    </label>
    {name_msg}
    <label>Description
        <textarea name="desc" rows="4">{desc}</textarea>
    </label>
    {desc_msg}
    <label>Image URL
        <input type="url" name="img_url" value="{img_url}">
    </label>
    {img_msg}
    <div class="actions">
        <button type="submit">Save</button>
        <button type="button" class="cancel-edit">Cancel</button>
    </div>
</form>"##,
        id = rec.id,
        thumb = escape(&rec.thumbnail),
        name = escape(&rec.name),
        name_msg = field_error(&view.errors.name),
        desc = escape(&rec.description),
        desc_msg = field_error(&view.errors.description),
        img_url = escape(&rec.image_url),
        img_msg = field_error(&view.errors.image),
    )
}

/// Updated card plus an out-of-band reset of the edit area
pub fn update_response(record: &ArtistRecord) -> String {
    format!(
        r##"<div id="edit-form-target" hx-swap-oob="true">{placeholder}</div>{item}"##,
        placeholder = EDIT_PLACEHOLDER,
        item = grid_item(record),
    )
}
