// ABOUTME: Deck loading for the slider-export application
// ABOUTME: Reads an authored slide list from JSON and classifies each image reference

use crate::errors::{Result, SliderError};
use crate::slide::{
    embed_image_file, validate_remote_url, EmbeddedImage, ImageSource, SlideRecord,
};
use crate::utils;
use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One slide as written in a deck file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub text: String,
    pub image: String,
    #[serde(default)]
    pub is_local_file: bool,
    pub image_file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DeckFile {
    List(Vec<DeckEntry>),
    Document {
        title: Option<String>,
        slides: Vec<DeckEntry>,
    },
}

/// An ordered slide list loaded from disk
#[derive(Debug, Clone)]
pub struct Deck {
    pub title: Option<String>,
    pub slides: Vec<SlideRecord>,
}

impl DeckEntry {
    /// Turn the entry into a slide record. Local entries either carry a data
    /// URI already or name an image file relative to `base_dir`, which is
    /// read and inlined.
    pub fn into_slide(self, base_dir: &Path) -> Result<SlideRecord> {
        let image = if self.is_local_file {
            let reference = self.image.trim();
            if reference.starts_with("data:") {
                ImageSource::Embedded(EmbeddedImage::new(reference))
            } else {
                let path = base_dir.join(reference);
                debug!("Loading local image {:?}", path);
                ImageSource::Embedded(embed_image_file(&path)?)
            }
        } else {
            ImageSource::Remote(validate_remote_url(&self.image)?)
        };

        let mut slide = SlideRecord::new(self.text, image);
        if let Some(id) = self.id {
            slide = slide.with_id(id);
        }
        if let Some(title) = self.title {
            slide = slide.with_title(title);
        }
        if let Some(name) = self.image_file_name {
            slide = slide.with_assigned_file_name(name);
        }
        Ok(slide)
    }
}

/// Parse deck JSON. Accepts either a bare array of slides or an object with
/// `title` and `slides`.
pub fn parse_deck(json: &str, base_dir: &Path) -> Result<Deck> {
    let (title, entries) = match serde_json::from_str::<DeckFile>(json)? {
        DeckFile::List(entries) => (None, entries),
        DeckFile::Document { title, slides } => (title, slides),
    };

    let slides = entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            entry.into_slide(base_dir).map_err(|e| {
                SliderError::ValidationError(format!("slide {}: {}", i + 1, e))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Deck { title, slides })
}

/// Load a deck file from disk
pub fn load_deck(path: &Path) -> Result<Deck> {
    info!("Loading deck: {:?}", path);

    utils::validate_file_exists(path)?;

    let json = fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or(Path::new("."));
    let deck = parse_deck(&json, base_dir)?;

    info!(
        "Loaded {} slide(s), {} with embedded images",
        deck.slides.len(),
        deck.slides.iter().filter(|s| s.is_embedded()).count()
    );
    Ok(deck)
}
