// ABOUTME: Deck assembly module for the deckgen application
// ABOUTME: Maps slide records onto a presentation, saves it and cleans up staged images

use crate::config::{Config, PicturePlacement};
use crate::deck::{Deck, SlideSpec};
use crate::errors::{DeckError, Result};
use crate::pptx::{Picture, Presentation, Slide, SlideLayout};
use crate::resources::{Fetch, ImageResolver, ResolvedImages};
use image::io::Reader as ImageReader;
use image::GenericImageView;
use log::{info, warn};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Summary of a completed build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub output_path: PathBuf,
    pub slide_count: usize,
    pub image_count: usize,
    /// Non-fatal problems: images that could not be fetched or placed
    pub warnings: Vec<String>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Resolve images, assemble every slide and write the deck into `output_dir`.
///
/// `output_dir` must already exist. Only a save failure is fatal; image problems end up in
/// `BuildReport::warnings`.
pub fn build_deck(
    deck: &Deck,
    output_dir: &Path,
    config: &Config,
    fetcher: &dyn Fetch,
) -> Result<BuildReport> {
    deck.validate()?;
    info!(
        "Building deck \"{}\" ({} slides) in {:?}",
        deck.title,
        deck.slides.len(),
        output_dir
    );

    let images =
        ImageResolver::new(fetcher, output_dir, config.jpeg_quality).resolve(&deck.images);
    let mut warnings: Vec<String> = images
        .failures()
        .iter()
        .map(|(name, reason)| format!("image {} unavailable: {}", name, reason))
        .collect();

    let (presentation, placement_warnings) = assemble(deck, &images, config);
    warnings.extend(placement_warnings);

    let output_path = finalize(&presentation, output_dir, &deck.file_name, images)?;

    Ok(BuildReport {
        output_path,
        slide_count: presentation.slide_count(),
        image_count: presentation.picture_count(),
        warnings,
    })
}

/// Materialise one slide per record, in order.
///
/// Returns the presentation and any placement warnings.
pub fn assemble(
    deck: &Deck,
    images: &ResolvedImages,
    config: &Config,
) -> (Presentation, Vec<String>) {
    let mut presentation = Presentation::new(&deck.title, &deck.language);
    let mut warnings = Vec::new();

    for (index, spec) in deck.slides.iter().enumerate() {
        info!("Assembling slide {}: {}", index + 1, spec.title);

        if index == 0 {
            let slide = presentation.add_slide(SlideLayout::Title);
            slide.set_title(&spec.title);
            slide.set_body(&spec.bullets, None);
            slide.set_notes(&spec.notes);
            continue;
        }

        let slide = presentation.add_slide(SlideLayout::TitleAndContent);
        slide.set_title(&spec.title);
        slide.set_body(&spec.bullets, Some(config.body_font_size()));
        if let Some(warning) = attach_image(slide, spec, images, config.picture) {
            warnings.push(warning);
        }
        slide.set_notes(&spec.notes);
    }

    (presentation, warnings)
}

// Returns a warning when the slide wanted an image that could not be placed.
fn attach_image(
    slide: &mut Slide,
    spec: &SlideSpec,
    images: &ResolvedImages,
    placement: PicturePlacement,
) -> Option<String> {
    let name = spec.image.as_deref()?;
    let Some(path) = images.path(name) else {
        info!("No image available for {}, slide \"{}\" goes without it", name, spec.title);
        return None;
    };

    match load_picture(path, name, placement) {
        Ok(picture) => {
            slide.add_picture(picture);
            None
        }
        Err(e) => {
            warn!("Failed to insert image {} on slide \"{}\": {}", name, spec.title, e);
            Some(format!("image {} not inserted on \"{}\": {}", name, spec.title, e))
        }
    }
}

/// Read a staged image and size it to the placement height, keeping its aspect ratio.
pub fn load_picture(path: &Path, name: &str, placement: PicturePlacement) -> Result<Picture> {
    let data = fs::read(path)?;

    // Decode fully so a corrupt file is caught here rather than by the viewer
    let decoded = ImageReader::new(Cursor::new(&data))
        .with_guessed_format()?
        .decode()?;
    let (width, height) = decoded.dimensions();
    let (width, height) = (i64::from(width), i64::from(height));
    if width == 0 || height == 0 {
        return Err(DeckError::Validation(format!("image {:?} has no pixels", path)));
    }

    Ok(Picture {
        data,
        description: name.to_string(),
        x: placement.left,
        y: placement.top,
        cx: placement.height * width / height,
        cy: placement.height,
    })
}

/// Save the presentation as `output_dir/file_name`, then remove the staged images whether or
/// not the save succeeded.
pub fn finalize(
    presentation: &Presentation,
    output_dir: &Path,
    file_name: &str,
    mut images: ResolvedImages,
) -> Result<PathBuf> {
    let output_path = output_dir.join(file_name);
    let saved = presentation.save(&output_path);

    images.cleanup();

    match &saved {
        Ok(path) => info!("Deck written to {:?}", path),
        Err(e) => warn!("Deck could not be written to {:?}: {}", output_path, e),
    }
    saved
}
