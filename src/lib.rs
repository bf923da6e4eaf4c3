// ABOUTME: Library module for the deckgen program.
// ABOUTME: Contains the deck model, image resolution, slide assembly and PPTX writing.

// Reexport modules
pub mod builder;
pub mod config;
pub mod deck;
pub mod errors;
pub mod inspect;
pub mod pptx;
pub mod resources;
pub mod utils;

// Reexport common types and functions
pub use builder::{assemble, build_deck, finalize, BuildReport};
pub use config::{Config, PicturePlacement};
pub use deck::{Deck, ImageResource, SlideSpec};
pub use errors::{DeckError, Result};
pub use inspect::{read_outline, SlideOutline};
pub use pptx::{Presentation, SlideLayout};
pub use resources::{Fetch, HttpFetcher, ImageResolver, ResolvedImages};

#[cfg(test)]
mod tests;
