// ABOUTME: Slide record model for the slider-export application
// ABOUTME: Defines slides, their image sources and the trusted rich text they carry

use crate::errors::{Result, SliderError};
use base64::Engine;
use log::debug;
use std::fmt;
use std::fs;
use std::path::Path;
use url::Url;

/// Opaque identifier of an authored slide. Stable for the life of the slide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlideId(String);

impl SlideId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SlideId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for SlideId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SlideId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Author-trusted rich text. The document generator inserts it verbatim
/// unless the export is configured to escape it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the text has any non-whitespace content
    pub fn has_content(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl From<&str> for TrustedHtml {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// How the payload of a data URI is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadEncoding {
    Base64,
    Raw,
}

/// Borrowed view of a parsed data URI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUri<'a> {
    pub mime_type: &'a str,
    pub encoding: PayloadEncoding,
    pub payload: &'a str,
}

/// An image carried inline as a data URI, kept in its original encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    uri: String,
    original_name: Option<String>,
}

impl EmbeddedImage {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            original_name: None,
        }
    }

    /// Encode raw bytes as a base64 data URI
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self::new(format!("data:{};base64,{}", mime_type, encoded))
    }

    /// Remember the file name the image was picked from
    pub fn with_original_name(mut self, name: impl Into<String>) -> Self {
        self.original_name = Some(name.into());
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    /// Split the data URI into MIME type, encoding and payload.
    /// Returns a human-readable reason when the reference is malformed.
    pub fn parse(&self) -> std::result::Result<DataUri<'_>, String> {
        let rest = self
            .uri
            .strip_prefix("data:")
            .ok_or_else(|| "missing 'data:' prefix".to_string())?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| "missing ',' between header and payload".to_string())?;
        let mut params = header.split(';');
        let mime_type = match params.next().map(str::trim) {
            Some(mime) if !mime.is_empty() => mime,
            // RFC 2397 default
            _ => "text/plain",
        };
        let encoding = if params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            PayloadEncoding::Base64
        } else {
            PayloadEncoding::Raw
        };

        Ok(DataUri {
            mime_type,
            encoding,
            payload,
        })
    }
}

/// Where a slide's image comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Absolute URL fetched by the viewer
    Remote(String),
    /// Image bytes carried inline
    Embedded(EmbeddedImage),
    /// Relative path to an asset extracted into the export bundle
    Bundled(String),
}

impl ImageSource {
    /// The string to place in an `<img src>` attribute
    pub fn src(&self) -> &str {
        match self {
            ImageSource::Remote(url) => url,
            ImageSource::Embedded(image) => image.uri(),
            ImageSource::Bundled(path) => path,
        }
    }
}

/// One authored slide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideRecord {
    pub id: SlideId,
    pub title: Option<String>,
    pub text: TrustedHtml,
    pub image: ImageSource,
    pub assigned_file_name: Option<String>,
}

impl SlideRecord {
    pub fn new(text: impl Into<String>, image: ImageSource) -> Self {
        Self {
            id: SlideId::new(),
            title: None,
            text: TrustedHtml::new(text),
            image,
            assigned_file_name: None,
        }
    }

    /// Create a slide pointing at a remote image. The URL must be an absolute http(s) URL.
    pub fn remote(text: impl Into<String>, image_url: &str) -> Result<Self> {
        let url = validate_remote_url(image_url)?;
        Ok(Self::new(text, ImageSource::Remote(url)))
    }

    /// Create a slide from an inline data URI
    pub fn embedded(text: impl Into<String>, data_uri: impl Into<String>) -> Self {
        Self::new(text, ImageSource::Embedded(EmbeddedImage::new(data_uri)))
    }

    /// Create a slide from a local image file, inlining its bytes as a data URI
    pub fn from_file(text: impl Into<String>, image_path: &Path) -> Result<Self> {
        let image = embed_image_file(image_path)?;
        Ok(Self::new(text, ImageSource::Embedded(image)))
    }

    pub fn with_id(mut self, id: impl Into<SlideId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_assigned_file_name(mut self, name: impl Into<String>) -> Self {
        self.assigned_file_name = Some(name.into());
        self
    }

    /// Whether the slide carries its image bytes inline
    pub fn is_embedded(&self) -> bool {
        matches!(self.image, ImageSource::Embedded(_))
    }
}

/// Check that a remote image reference is an absolute http(s) URL
pub fn validate_remote_url(image_url: &str) -> Result<String> {
    let url = Url::parse(image_url.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(image_url.trim().to_string()),
        other => Err(SliderError::InvalidImageUrl(format!(
            "unsupported scheme '{}' in {}",
            other, image_url
        ))),
    }
}

/// Read an image file and turn it into an embedded data URI
pub fn embed_image_file(path: &Path) -> Result<EmbeddedImage> {
    if !path.is_file() {
        return Err(SliderError::PathNotFoundError(path.to_path_buf()));
    }

    let bytes = fs::read(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    debug!(
        "Embedding {:?} as {} ({} bytes)",
        path,
        mime.essence_str(),
        bytes.len()
    );

    let mut image = EmbeddedImage::from_bytes(mime.essence_str(), &bytes);
    if let Some(name) = path.file_name() {
        image = image.with_original_name(name.to_string_lossy());
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_base64_data_uri() {
        let image = EmbeddedImage::new("data:image/png;base64,AAA=");
        let parsed = image.parse().expect("valid data URI");
        assert_eq!(parsed.mime_type, "image/png");
        assert_eq!(parsed.encoding, PayloadEncoding::Base64);
        assert_eq!(parsed.payload, "AAA=");
    }

    #[test]
    fn parses_raw_data_uri_with_default_mime() {
        let image = EmbeddedImage::new("data:,hello");
        let parsed = image.parse().expect("valid data URI");
        assert_eq!(parsed.mime_type, "text/plain");
        assert_eq!(parsed.encoding, PayloadEncoding::Raw);
    }

    #[test]
    fn rejects_reference_without_prefix() {
        let image = EmbeddedImage::new("image/png;base64,AAA=");
        assert!(image.parse().unwrap_err().contains("data:"));
    }

    #[test]
    fn rejects_reference_without_separator() {
        assert!(EmbeddedImage::new("data:image/png;base64").parse().is_err());
    }

    #[test]
    fn accepts_empty_payload() {
        let image = EmbeddedImage::new("data:image/png;base64,");
        let parsed = image
            .parse()
            .expect("empty payload is well formed");
        assert_eq!(parsed.payload, "");
    }

    #[test]
    fn remote_slide_requires_absolute_http_url() {
        assert!(SlideRecord::remote("A", "https://x/a.png").is_ok());
        assert!(SlideRecord::remote("A", "a.png").is_err());
        assert!(SlideRecord::remote("A", "ftp://x/a.png").is_err());
    }

    #[test]
    fn embedded_predicate_follows_variant() {
        let remote = SlideRecord::remote("A", "https://x/a.png").unwrap();
        let embedded = SlideRecord::embedded("B", "data:image/png;base64,AAA=");
        assert!(!remote.is_embedded());
        assert!(embedded.is_embedded());
    }

    #[test]
    fn trusted_html_content_check() {
        assert!(!TrustedHtml::new("   \n").has_content());
        assert!(TrustedHtml::new("<b>hi</b>").has_content());
    }

    #[test]
    fn fresh_ids_are_distinct() {
        assert_ne!(SlideId::new(), SlideId::new());
    }
}
