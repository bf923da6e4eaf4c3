// ABOUTME: Deck content module for the deckgen application
// ABOUTME: Loads and validates the slide records and image resources that make up the deck

use crate::errors::{DeckError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Number of slides every deck must contain.
pub const SLIDE_COUNT: usize = 12;

const BUILTIN_DECK: &str = include_str!("../assets/deck.json");

/// One slide of the deck: title, bullet points, speaker notes and an optional illustration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSpec {
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub notes: String,
    /// Name of the image resource shown on this slide
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A named image, either a remote URL or a local file path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResource {
    pub name: String,
    pub source: String,
}

/// The complete deck description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub title: String,
    #[serde(default = "default_language")]
    pub language: String,
    pub file_name: String,
    #[serde(default)]
    pub images: Vec<ImageResource>,
    pub slides: Vec<SlideSpec>,
}

fn default_language() -> String {
    "en-US".to_string()
}

impl Deck {
    /// The deck shipped with the binary
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_DECK)
    }

    /// Parse and validate a deck from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let deck: Deck = serde_json::from_str(json)?;
        deck.validate()?;
        Ok(deck)
    }

    /// Load and validate a deck from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading deck from {:?}", path);
        if !path.exists() {
            return Err(DeckError::PathNotFound(path.to_path_buf()));
        }
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load the deck at `path`, or the built-in deck when no path is given
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    /// Check the structural rules every deck must follow
    pub fn validate(&self) -> Result<()> {
        if self.slides.len() != SLIDE_COUNT {
            return Err(DeckError::Content(format!(
                "expected {} slides, found {}",
                SLIDE_COUNT,
                self.slides.len()
            )));
        }

        if self.file_name.trim().is_empty() {
            return Err(DeckError::Content("file_name must not be empty".to_string()));
        }
        if self.file_name.contains(['/', '\\']) {
            return Err(DeckError::Content(format!(
                "file_name must be a bare file name: {}",
                self.file_name
            )));
        }

        let mut names = HashSet::new();
        for image in &self.images {
            if image.name.is_empty() {
                return Err(DeckError::Content("image name must not be empty".to_string()));
            }
            // Names end up in temporary file names inside the output directory
            if image.name.contains(['/', '\\']) || image.name.contains("..") {
                return Err(DeckError::Content(format!(
                    "image name must not contain path components: {}",
                    image.name
                )));
            }
            if !names.insert(image.name.as_str()) {
                return Err(DeckError::Content(format!(
                    "duplicate image name: {}",
                    image.name
                )));
            }
        }

        for (index, slide) in self.slides.iter().enumerate() {
            let Some(name) = &slide.image else {
                continue;
            };
            if index == 0 {
                return Err(DeckError::Content(
                    "the title slide cannot carry an image".to_string(),
                ));
            }
            if !names.contains(name.as_str()) {
                return Err(DeckError::Content(format!(
                    "slide {} references unknown image: {}",
                    index, name
                )));
            }
        }

        Ok(())
    }
}
