// ABOUTME: Asset extraction for the slider-export application
// ABOUTME: Pulls embedded images out of slides, names them and rewrites slide paths

use crate::errors::{Result, SliderError};
use crate::slide::{EmbeddedImage, ImageSource, PayloadEncoding, SlideRecord};
use base64::Engine;
use log::{debug, info, warn};
use percent_encoding::percent_decode_str;
use std::collections::HashSet;
use std::path::Path;

/// Extension used when neither the file name nor the MIME type gives one
pub const DEFAULT_EXTENSION: &str = "jpg";

const FILE_NAME_PREFIX: &str = "slider";

/// An image pulled out of a slide during one export run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedAsset {
    pub file_name: String,
    pub mime_type: String,
    pub encoding: PayloadEncoding,
    /// Payload still in its inline encoding
    pub payload: String,
}

impl ExtractedAsset {
    /// Decode the inline payload into native bytes
    pub fn decode(&self) -> Result<Vec<u8>> {
        match self.encoding {
            PayloadEncoding::Base64 => {
                let compact: String = self
                    .payload
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                Ok(base64::engine::general_purpose::STANDARD.decode(compact)?)
            }
            // RFC 2397: non-base64 payloads are percent-encoded
            PayloadEncoding::Raw => Ok(percent_decode_str(&self.payload).collect()),
        }
    }
}

/// Slides rewritten to point at bundled assets, plus the assets themselves
#[derive(Debug, Clone)]
pub struct Extraction {
    pub slides: Vec<SlideRecord>,
    pub assets: Vec<ExtractedAsset>,
}

/// Hands out file names that are unique within one export run
#[derive(Debug)]
pub struct NameGenerator {
    run_id: String,
    counter: u32,
    used: HashSet<String>,
}

impl NameGenerator {
    pub fn new() -> Self {
        let run_id = uuid::Uuid::new_v4().simple().to_string();
        Self::with_run_id(&run_id[..8])
    }

    pub fn with_run_id(run_id: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            counter: 0,
            used: HashSet::new(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Claim a name for an asset. A preferred name is honoured when it is a
    /// plain file name not yet handed out in this run.
    pub fn claim(&mut self, preferred: Option<&str>, extension: &str) -> String {
        if let Some(name) = preferred {
            if !is_plain_file_name(name) {
                warn!("Ignoring unusable assigned file name {:?}", name);
            } else if self.used.contains(name) {
                warn!(
                    "Assigned file name {} already used in this export, generating a new one",
                    name
                );
            } else {
                self.used.insert(name.to_string());
                return name.to_string();
            }
        }

        loop {
            self.counter += 1;
            let name = format!(
                "{}-{}-{}.{}",
                FILE_NAME_PREFIX, self.run_id, self.counter, extension
            );
            if self.used.insert(name.clone()) {
                return name;
            }
        }
    }
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// A name that can sit directly inside the asset directory
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

/// Pick the extension for an extracted image: original file name first,
/// then the MIME subtype, then the default.
pub fn file_extension(image: &EmbeddedImage, mime_type: &str) -> String {
    let from_name = image
        .original_name()
        .and_then(|name| Path::new(name).extension())
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));
    if let Some(ext) = from_name {
        return ext;
    }

    extension_for_mime(mime_type).unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

fn extension_for_mime(mime_type: &str) -> Option<String> {
    let mime = mime_type.trim().to_lowercase();
    let subtype = mime.strip_prefix("image/")?;
    let ext = match subtype {
        "jpeg" | "pjpeg" | "jpg" => "jpg",
        "svg+xml" => "svg",
        "x-icon" | "vnd.microsoft.icon" => "ico",
        other if !other.is_empty() && other.chars().all(|c| c.is_ascii_alphanumeric()) => other,
        _ => return None,
    };
    Some(ext.to_string())
}

/// Relative path of an asset as referenced from the exported document
pub fn relative_asset_path(asset_dir: &str, file_name: &str) -> String {
    format!("./{}/{}", asset_dir, file_name)
}

/// Extract every embedded image with a fresh run-scoped name generator
pub fn extract_assets(slides: &[SlideRecord], asset_dir: &str) -> Result<Extraction> {
    let mut names = NameGenerator::new();
    extract_assets_with(slides, asset_dir, &mut names)
}

/// Extract every embedded image, preserving slide order. Remote slides pass
/// through untouched; embedded slides are rewritten to point at
/// `./<asset_dir>/<file_name>`. A malformed embedded reference aborts the run.
pub fn extract_assets_with(
    slides: &[SlideRecord],
    asset_dir: &str,
    names: &mut NameGenerator,
) -> Result<Extraction> {
    debug!("Extracting assets for naming run {}", names.run_id());
    let mut rewritten = Vec::with_capacity(slides.len());
    let mut assets = Vec::new();

    for slide in slides {
        let image = match &slide.image {
            ImageSource::Embedded(image) => image,
            _ => {
                rewritten.push(slide.clone());
                continue;
            }
        };

        let data_uri = image
            .parse()
            .map_err(|reason| SliderError::MalformedEmbeddedReference {
                slide_id: slide.id.to_string(),
                reason,
            })?;

        let extension = file_extension(image, data_uri.mime_type);
        let file_name = names.claim(slide.assigned_file_name.as_deref(), &extension);
        debug!("Slide {} -> asset {}", slide.id, file_name);

        assets.push(ExtractedAsset {
            file_name: file_name.clone(),
            mime_type: data_uri.mime_type.to_string(),
            encoding: data_uri.encoding,
            payload: data_uri.payload.to_string(),
        });

        let mut bundled = slide.clone();
        bundled.image = ImageSource::Bundled(relative_asset_path(asset_dir, &file_name));
        bundled.assigned_file_name = Some(file_name);
        rewritten.push(bundled);
    }

    info!(
        "Extracted {} embedded image(s) from {} slide(s)",
        assets.len(),
        slides.len()
    );

    Ok(Extraction {
        slides: rewritten,
        assets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_prefers_original_name() {
        let image =
            EmbeddedImage::new("data:image/png;base64,AAA=").with_original_name("Photo.JPEG");
        assert_eq!(file_extension(&image, "image/png"), "jpeg");
    }

    #[test]
    fn extension_falls_back_to_mime_then_default() {
        let image = EmbeddedImage::new("data:image/png;base64,AAA=");
        assert_eq!(file_extension(&image, "image/png"), "png");
        assert_eq!(file_extension(&image, "image/jpeg"), "jpg");
        assert_eq!(file_extension(&image, "image/svg+xml"), "svg");
        assert_eq!(file_extension(&image, "application/octet-stream"), "jpg");
    }

    #[test]
    fn generator_never_repeats_names() {
        let mut names = NameGenerator::with_run_id("abcd1234");
        let first = names.claim(None, "png");
        let second = names.claim(None, "png");
        assert_eq!(first, "slider-abcd1234-1.png");
        assert_ne!(first, second);
    }

    #[test]
    fn generator_reuses_assigned_name_once() {
        let mut names = NameGenerator::with_run_id("abcd1234");
        assert_eq!(names.claim(Some("cover.png"), "png"), "cover.png");
        let duplicate = names.claim(Some("cover.png"), "png");
        assert_ne!(duplicate, "cover.png");
    }

    #[test]
    fn generator_rejects_path_like_names() {
        let mut names = NameGenerator::with_run_id("abcd1234");
        let name = names.claim(Some("../evil.png"), "png");
        assert_eq!(name, "slider-abcd1234-1.png");
    }

    #[test]
    fn decodes_base64_payload_with_line_breaks() {
        let asset = ExtractedAsset {
            file_name: "a.png".to_string(),
            mime_type: "image/png".to_string(),
            encoding: PayloadEncoding::Base64,
            payload: "aGVs\nbG8=".to_string(),
        };
        assert_eq!(asset.decode().unwrap(), b"hello");
    }

    #[test]
    fn decodes_percent_encoded_payload() {
        let asset = ExtractedAsset {
            file_name: "a.svg".to_string(),
            mime_type: "image/svg+xml".to_string(),
            encoding: PayloadEncoding::Raw,
            payload: "%3Csvg%3E%3C%2Fsvg%3E".to_string(),
        };
        assert_eq!(asset.decode().unwrap(), b"<svg></svg>");
    }

    #[test]
    fn empty_payload_decodes_to_no_bytes() {
        let asset = ExtractedAsset {
            file_name: "a.png".to_string(),
            mime_type: "image/png".to_string(),
            encoding: PayloadEncoding::Base64,
            payload: String::new(),
        };
        assert!(asset.decode().unwrap().is_empty());
    }
}
