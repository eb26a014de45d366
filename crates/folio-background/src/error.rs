//! Error types for the background engine.
//!
//! Nothing here ever reaches the screen: a failed image load is logged and the
//! particle keeps its placeholder.

use std::fmt;

/// Errors that can occur while loading a floating image.
#[derive(Debug)]
pub enum BackgroundError {
    /// The HTTP request failed.
    Fetch(Box<ureq::Error>),
    /// Failed to read the image file from disk.
    Io(std::io::Error),
    /// The bytes are not a decodable image.
    Decode(image::ImageError),
}

impl fmt::Display for BackgroundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundError::Fetch(e) => write!(f, "Failed to fetch image: {}", e),
            BackgroundError::Io(e) => write!(f, "Failed to read image file: {}", e),
            BackgroundError::Decode(e) => write!(f, "Failed to decode image: {}", e),
        }
    }
}

impl std::error::Error for BackgroundError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BackgroundError::Fetch(e) => Some(e.as_ref()),
            BackgroundError::Io(e) => Some(e),
            BackgroundError::Decode(e) => Some(e),
        }
    }
}

impl From<ureq::Error> for BackgroundError {
    fn from(e: ureq::Error) -> Self {
        BackgroundError::Fetch(Box::new(e))
    }
}

impl From<std::io::Error> for BackgroundError {
    fn from(e: std::io::Error) -> Self {
        BackgroundError::Io(e)
    }
}

impl From<image::ImageError> for BackgroundError {
    fn from(e: image::ImageError) -> Self {
        BackgroundError::Decode(e)
    }
}
