//! Campground pictures live with an external image host; the database only
//! keeps the URL it hands back and the asset id needed to delete it again.

mod cloudinary;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use cloudinary::Cloudinary;

/// What the host returns for a stored upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedImage {
    pub url: String,
    pub public_id: String,
}

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("image host unreachable: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Api(String),

    #[error("unexpected response from image host: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<HostedImage, ImageError>;

    async fn destroy(&self, public_id: &str) -> Result<(), ImageError>;
}

pub type SharedImageHost = Arc<dyn ImageHost>;

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Only names ending in a known image extension are accepted for upload.
pub fn is_image_filename(filename: &str) -> bool {
    let Some((_, extension)) = filename.rsplit_once('.') else {
        return false;
    };
    IMAGE_EXTENSIONS
        .iter()
        .any(|known| extension.eq_ignore_ascii_case(known))
}
