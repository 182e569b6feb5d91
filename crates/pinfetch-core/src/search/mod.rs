//! Search collaborator: turns search results into download requests.
//!
//! Results arrive as pins (title, description, alt text, image URL). They are
//! split into four parallel columns, checked for equal length, and zipped back
//! into [`DownloadRequest`]s named `sanitize("{title} {description} {alt}.jpg")`.

pub mod pinterest;

use crate::batch::DownloadRequest;
use crate::filename::filename_for;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One search result with a direct image URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub title: String,
    pub description: String,
    pub seo_alt_text: String,
    pub image_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search request failed")]
    Transport(#[from] curl::Error),
    #[error("search returned HTTP {0}")]
    Http(u32),
    #[error("invalid search URL")]
    Url(#[from] url::ParseError),
    #[error("unexpected search response")]
    Parse(#[source] serde_json::Error),
    #[error("failed to read results file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The four result columns had different lengths; no download may start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "search results are inconsistent: {titles} titles, {descriptions} descriptions, \
     {alt_texts} alt texts, {urls} urls"
)]
pub struct PreconditionError {
    pub titles: usize,
    pub descriptions: usize,
    pub alt_texts: usize,
    pub urls: usize,
}

/// Search results as parallel attribute lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultColumns {
    pub titles: Vec<String>,
    pub descriptions: Vec<String>,
    pub alt_texts: Vec<String>,
    pub urls: Vec<String>,
}

impl ResultColumns {
    pub fn from_pins(pins: &[Pin]) -> Self {
        let mut cols = Self::default();
        for pin in pins {
            cols.titles.push(pin.title.clone());
            cols.descriptions.push(pin.description.clone());
            cols.alt_texts.push(pin.seo_alt_text.clone());
            cols.urls.push(pin.image_url.clone());
        }
        cols
    }

    /// Zips the columns into requests, failing if their lengths differ.
    pub fn into_requests(self) -> Result<Vec<DownloadRequest>, PreconditionError> {
        let n = self.urls.len();
        if self.titles.len() != n || self.descriptions.len() != n || self.alt_texts.len() != n {
            return Err(PreconditionError {
                titles: self.titles.len(),
                descriptions: self.descriptions.len(),
                alt_texts: self.alt_texts.len(),
                urls: n,
            });
        }
        Ok(self
            .titles
            .iter()
            .zip(&self.descriptions)
            .zip(&self.alt_texts)
            .zip(self.urls)
            .map(|(((title, description), alt), url)| {
                DownloadRequest::new(url, filename_for(title, description, alt))
            })
            .collect())
    }
}

/// Search result as the API returns it. Text fields are often `null`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawPin {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    seo_alt_text: Option<String>,
    #[serde(default)]
    images: Option<RawImages>,
}

#[derive(Debug, Deserialize)]
struct RawImages {
    #[serde(default)]
    orig: Option<RawImage>,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    url: String,
}

impl RawPin {
    /// `None` when the result carries no original-size image.
    pub(crate) fn into_pin(self) -> Option<Pin> {
        let image_url = self.images?.orig?.url;
        Some(Pin {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            seo_alt_text: self.seo_alt_text.unwrap_or_default(),
            image_url,
        })
    }
}

pub(crate) fn pins_from_raw(raw: Vec<RawPin>) -> Vec<Pin> {
    let total = raw.len();
    let pins: Vec<Pin> = raw.into_iter().filter_map(RawPin::into_pin).collect();
    if pins.len() < total {
        tracing::debug!(dropped = total - pins.len(), "results without an original image url");
    }
    pins
}

/// Parses a JSON array of search results (API shape) into pins.
pub fn parse_pins(bytes: &[u8]) -> Result<Vec<Pin>, SearchError> {
    let raw: Vec<RawPin> = serde_json::from_slice(bytes).map_err(SearchError::Parse)?;
    Ok(pins_from_raw(raw))
}

/// Reads a saved results file (a JSON array of search results).
pub fn parse_pins_file(path: &Path) -> Result<Vec<Pin>, SearchError> {
    let bytes = fs::read(path).map_err(|source| SearchError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_pins(&bytes)
}
