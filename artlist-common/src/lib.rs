//! # artlist common library
//!
//! Domain logic shared by the artlist binaries:
//! - Flat-file artist store (master list + pending list)
//! - Thumbnail fetching and resizing
//! - Form validation
//! - Configuration loading
//! - Legacy file migration

pub mod config;
pub mod error;
pub mod legacy;
pub mod store;
pub mod thumbnail;
pub mod validation;

pub use error::{Error, Result};
pub use store::{ArtistRecord, ArtistStore, StorePaths};
pub use thumbnail::{HttpImageSource, ImageSource, ThumbnailError, ThumbnailGenerator};
