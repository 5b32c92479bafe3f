//! HTTP handlers for artlist-web
//!
//! One module per handler group. Form posts use
//! `application/x-www-form-urlencoded` bodies and answer with HTML fragments.

pub mod artist_form;
pub mod gallery;
pub mod health;
pub mod pages;
pub mod todo;
pub mod ui;

pub use artist_form::artist_form_routes;
pub use gallery::gallery_routes;
pub use health::health_routes;
pub use pages::page_routes;
pub use todo::todo_routes;
pub use ui::ui_routes;
