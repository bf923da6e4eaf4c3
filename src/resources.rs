// ABOUTME: Image resource handling for the deckgen application
// ABOUTME: Fetches, decodes and stages illustrations as temporary JPEG files

use crate::config::Config;
use crate::deck::ImageResource;
use crate::errors::{DeckError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use log::{debug, info, warn};
use reqwest::blocking::Client;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Retrieves the raw bytes behind a remote image URL.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

impl<F> Fetch for F
where
    F: Fn(&str) -> Result<Vec<u8>>,
{
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self(url)
    }
}

/// Blocking HTTP fetcher with a fixed per-request timeout and no retries.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher using the timeout and user agent from the configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.image_timeout_ms))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        info!("Fetching remote image: {}", url);
        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeckError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes()?.to_vec())
    }
}

/// Where an image resource's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Remote(Url),
    Local(PathBuf),
}

impl ImageSource {
    /// Classify a source string as an http(s) URL or a local path.
    pub fn new(source: &str) -> Self {
        match Url::parse(source) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Self::Remote(url),
            _ => Self::Local(PathBuf::from(source)),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Read the bytes behind this source, going through `fetcher` for remote ones
    pub fn read(&self, fetcher: &dyn Fetch) -> Result<Vec<u8>> {
        match self {
            Self::Remote(url) => fetcher.fetch(url.as_str()),
            Self::Local(path) => {
                info!("Reading local image: {:?}", path);
                if !path.exists() {
                    return Err(DeckError::PathNotFound(path.clone()));
                }
                Ok(fs::read(path)?)
            }
        }
    }
}

/// Outcome of resolving every image resource of a deck.
///
/// Owns the temporary JPEG files it produced and removes them on `cleanup()` or drop.
#[derive(Debug, Default)]
pub struct ResolvedImages {
    paths: BTreeMap<String, Option<PathBuf>>,
    failures: Vec<(String, String)>,
}

impl ResolvedImages {
    /// Local path of a successfully resolved image
    pub fn path(&self, name: &str) -> Option<&Path> {
        self.paths.get(name).and_then(|p| p.as_deref())
    }

    /// Whether `name` was one of the resources handed to the resolver
    pub fn contains(&self, name: &str) -> bool {
        self.paths.contains_key(name)
    }

    pub fn resolved_count(&self) -> usize {
        self.paths.values().filter(|p| p.is_some()).count()
    }

    /// Names and reasons of the resources that could not be resolved
    pub fn failures(&self) -> &[(String, String)] {
        &self.failures
    }

    // A repeated name replaces the earlier entry, whose file is removed right away.
    fn record(&mut self, name: &str, path: Option<PathBuf>) {
        if let Some(Some(replaced)) = self.paths.insert(name.to_string(), path) {
            remove_temp_file(&replaced);
        }
    }

    /// Remove every temporary file. Safe to call more than once.
    pub fn cleanup(&mut self) {
        for path in self.paths.values_mut() {
            if let Some(file) = path.take() {
                remove_temp_file(&file);
            }
        }
    }
}

fn remove_temp_file(file: &Path) {
    if !file.exists() {
        return;
    }
    match fs::remove_file(file) {
        Ok(()) => debug!("Removed temporary image {:?}", file),
        Err(e) => warn!("Failed to remove temporary image {:?}: {}", file, e),
    }
}

impl Drop for ResolvedImages {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Turns image resources into local JPEG files, one best-effort attempt each.
pub struct ImageResolver<'a> {
    fetcher: &'a dyn Fetch,
    work_dir: PathBuf,
    jpeg_quality: u8,
}

impl<'a> ImageResolver<'a> {
    pub fn new(fetcher: &'a dyn Fetch, work_dir: &Path, jpeg_quality: u8) -> Self {
        Self {
            fetcher,
            work_dir: work_dir.to_path_buf(),
            jpeg_quality,
        }
    }

    /// Resolve all resources. Individual failures are logged and leave that name absent.
    pub fn resolve(&self, resources: &[ImageResource]) -> ResolvedImages {
        info!("Resolving {} image resources", resources.len());

        resources
            .iter()
            .map(|resource| (resource, self.resolve_one(resource)))
            .fold(ResolvedImages::default(), |mut resolved, (resource, outcome)| {
                match outcome {
                    Ok(path) => {
                        info!("Image {} staged at {:?}", resource.name, path);
                        resolved.record(&resource.name, Some(path));
                    }
                    Err(e) => {
                        warn!(
                            "Could not load image {} from {}: {}",
                            resource.name, resource.source, e
                        );
                        resolved.record(&resource.name, None);
                        resolved.failures.push((resource.name.clone(), e.to_string()));
                    }
                }
                resolved
            })
    }

    fn resolve_one(&self, resource: &ImageResource) -> Result<PathBuf> {
        let bytes = ImageSource::new(&resource.source).read(self.fetcher)?;

        // Normalise every image to 8-bit RGB so it can be stored as JPEG
        let rgb = image::load_from_memory(&bytes)?.to_rgb8();

        let path = self.work_dir.join(format!(
            "tmp_{}_{}.jpg",
            resource.name,
            uuid::Uuid::new_v4().simple()
        ));
        if let Err(e) = write_jpeg(fs::File::create(&path)?, &rgb, self.jpeg_quality) {
            // Do not leave a half-written file behind
            let _ = fs::remove_file(&path);
            return Err(e);
        }

        Ok(path)
    }
}

fn write_jpeg(file: fs::File, rgb: &RgbImage, quality: u8) -> Result<()> {
    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, quality).encode_image(rgb)?;
    writer.flush()?;
    Ok(())
}
