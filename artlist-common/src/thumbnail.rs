//! Thumbnail generation
//!
//! Fetches a remote image, scales it to a fixed width (aspect ratio kept) and
//! writes a JPEG copy into the images directory. The network side sits behind
//! [`ImageSource`] so it can be swapped out.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageFormat};
use thiserror::Error;
use tracing::{debug, info};

const USER_AGENT: &str = concat!("artlist/", env!("CARGO_PKG_VERSION"));

/// Default thumbnail width in pixels
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 200;

/// Thumbnail errors
///
/// Callers show every variant to the user as the same generic warning; the
/// variants exist for logging.
#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("Network error fetching image: {0}")]
    Fetch(String),

    #[error("Image request returned status {0}")]
    Status(u16),

    #[error("Could not decode image: {0}")]
    Decode(String),

    #[error("Could not save thumbnail: {0}")]
    Save(String),
}

/// Source of raw image bytes
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch the body behind `url`; non-2xx responses are errors
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ThumbnailError>;
}

/// [`ImageSource`] backed by an HTTP GET
pub struct HttpImageSource {
    http_client: reqwest::Client,
}

impl HttpImageSource {
    pub fn new(timeout: Duration) -> Result<Self, ThumbnailError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ThumbnailError::Fetch(e.to_string()))?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ThumbnailError> {
        debug!("Fetching image: {}", url);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ThumbnailError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ThumbnailError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ThumbnailError::Fetch(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

/// Writes resized thumbnails into one images directory
#[derive(Clone)]
pub struct ThumbnailGenerator {
    images_dir: PathBuf,
    width: u32,
    source: Arc<dyn ImageSource>,
}

impl ThumbnailGenerator {
    pub fn new(images_dir: impl Into<PathBuf>, width: u32, source: Arc<dyn ImageSource>) -> Self {
        Self {
            images_dir: images_dir.into(),
            width: width.max(1),
            source,
        }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Full path of `filename` inside the images directory
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.images_dir.join(filename)
    }

    /// Name for a freshly generated thumbnail of record `id`
    ///
    /// The timestamp keeps a replaced thumbnail from colliding with the old
    /// file (and with browser caches).
    pub fn filename_for(id: u32) -> String {
        format!("{}-{}.jpg", id, chrono::Utc::now().timestamp())
    }

    /// Like [`Self::filename_for`], but never `current` and never a file that
    /// is already on disk
    pub fn unused_filename_for(&self, id: u32, current: &str) -> String {
        let base = Self::filename_for(id);
        let stem = base.trim_end_matches(".jpg").to_string();
        let mut candidate = base;
        let mut n = 1;
        while candidate == current || self.exists(&candidate) {
            candidate = format!("{}-{}.jpg", stem, n);
            n += 1;
        }
        candidate
    }

    /// True if `filename` is present in the images directory
    pub fn exists(&self, filename: &str) -> bool {
        !filename.is_empty() && self.path_for(filename).is_file()
    }

    /// Fetch `url`, resize, and write the result as `filename`
    pub async fn fetch_and_resize(&self, url: &str, filename: &str) -> Result<(), ThumbnailError> {
        let bytes = self.source.fetch(url).await?;
        let decoded =
            image::load_from_memory(&bytes).map_err(|e| ThumbnailError::Decode(e.to_string()))?;

        let resized = resize_to_width(&decoded, self.width);

        fs::create_dir_all(&self.images_dir).map_err(|e| ThumbnailError::Save(e.to_string()))?;
        save_jpeg_atomic(&resized, &self.path_for(filename))?;

        info!(
            "Created thumbnail {} ({}x{}) from {}",
            filename,
            resized.width(),
            resized.height(),
            url
        );
        Ok(())
    }

    /// Generate `filename` unless it already exists
    ///
    /// Returns true if a fetch was performed.
    pub async fn ensure(&self, url: &str, filename: &str) -> Result<bool, ThumbnailError> {
        if self.exists(filename) {
            debug!("Thumbnail {} already present, skipping fetch", filename);
            return Ok(false);
        }
        self.fetch_and_resize(url, filename).await?;
        Ok(true)
    }

    /// Delete a thumbnail file; a missing file is not an error
    pub fn remove(&self, filename: &str) -> std::io::Result<()> {
        if filename.is_empty() {
            return Ok(());
        }
        match fs::remove_file(self.path_for(filename)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Scale to `width`, height following the source aspect ratio (minimum 1)
pub fn resize_to_width(image: &DynamicImage, width: u32) -> DynamicImage {
    let (src_w, src_h) = image.dimensions();
    let height = ((src_h as f64 * width as f64 / src_w.max(1) as f64).round() as u32).max(1);
    image.resize_exact(width, height, FilterType::Lanczos3)
}

fn save_jpeg_atomic(image: &DynamicImage, target: &Path) -> Result<(), ThumbnailError> {
    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut encoded = Cursor::new(Vec::new());
    rgb.write_to(&mut encoded, ImageFormat::Jpeg)
        .map_err(|e| ThumbnailError::Save(e.to_string()))?;

    let temp = target.with_extension("jpg.tmp");
    fs::write(&temp, encoded.into_inner()).map_err(|e| ThumbnailError::Save(e.to_string()))?;
    fs::rename(&temp, target).map_err(|e| {
        let _ = fs::remove_file(&temp);
        ThumbnailError::Save(e.to_string())
    })
}
