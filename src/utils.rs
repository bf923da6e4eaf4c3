// ABOUTME: Utility functions for the deckgen application
// ABOUTME: Provides directory validation and creation helpers

use crate::errors::{DeckError, Result};
use std::path::Path;

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    } else if !path.is_dir() {
        return Err(DeckError::Validation(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}
