//! Error types for the parts of the crate that touch the outside world
//!
//! Bubble geometry, text annotation and the interaction state machine never
//! fail. Only settings persistence, the clipboard and image decoding do.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BubbleError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Image decode error: {0}")]
    Image(String),
}

impl From<arboard::Error> for BubbleError {
    fn from(err: arboard::Error) -> Self {
        BubbleError::Clipboard(err.to_string())
    }
}

impl From<image::ImageError> for BubbleError {
    fn from(err: image::ImageError) -> Self {
        BubbleError::Image(err.to_string())
    }
}
