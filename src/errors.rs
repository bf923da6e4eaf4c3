// ABOUTME: Error types for the deckgen application
// ABOUTME: Provides structured error handling for each stage of the pipeline

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to fetch remote resource: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("HTTP error {status} while fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid deck file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid deck content: {0}")]
    Content(String),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Input validation error: {0}")]
    Validation(String),

    #[error("PPTX generation error: {0}")]
    Pptx(String),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Failed to save presentation to {path:?}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// Implement conversion from zip errors
impl From<zip::result::ZipError> for DeckError {
    fn from(err: zip::result::ZipError) -> Self {
        DeckError::Pptx(format!("ZIP operation failed: {}", err))
    }
}

impl From<quick_xml::Error> for DeckError {
    fn from(err: quick_xml::Error) -> Self {
        DeckError::Xml(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
