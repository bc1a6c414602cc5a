//! Media host for catalog images.
//!
//! Admins upload images straight from the browser; the server only removes
//! them when an admin deletes an image from an entity.

mod cloudinary;

pub use cloudinary::MediaClient;

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("media host rejected request with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid media host response: {0}")]
    InvalidResponse(String),
}

/// Delete an uploaded image by its public id.
#[derive(Debug, Clone)]
pub struct DestroyImage {
    pub public_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyOutcome {
    Deleted,
    /// The media host did not know the image.
    NotFound,
}
