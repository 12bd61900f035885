// ABOUTME: Export orchestration for the slider-export application
// ABOUTME: Chooses a bundling strategy, drives extraction, rendering and packaging, and delivers the result

use crate::archive::assemble_archive;
use crate::assets::extract_assets;
use crate::config::Config;
use crate::errors::{Result, SliderError};
use crate::html::generate_document;
use crate::preview::ViewingSurface;
use crate::slide::SlideRecord;
use crate::utils;
use chrono::{NaiveDate, Utc};
use log::{debug, error, info, warn};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// How one export run packages its output, decided once per call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStrategy {
    /// Every image is remote: ship the document alone
    SingleDocument,
    /// At least one embedded image: ship a ZIP with the document and an asset directory
    DocumentPlusAssets,
}

impl ExportStrategy {
    pub fn select(slides: &[SlideRecord]) -> Self {
        if slides.iter().any(SlideRecord::is_embedded) {
            ExportStrategy::DocumentPlusAssets
        } else {
            ExportStrategy::SingleDocument
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Document,
    Archive,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Document => "html",
            ArtifactKind::Archive => "zip",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ArtifactKind::Document => "text/html",
            ArtifactKind::Archive => "application/zip",
        }
    }
}

/// The single deliverable produced by an export run
#[derive(Debug, Clone)]
pub struct Artifact {
    pub file_name: String,
    pub kind: ArtifactKind,
    pub bytes: Vec<u8>,
    pub asset_count: usize,
}

/// `<base-name>-<YYYY-MM-DD>.<ext>`
pub fn artifact_file_name(base_name: &str, date: NaiveDate, kind: ArtifactKind) -> String {
    format!(
        "{}-{}.{}",
        base_name,
        date.format("%Y-%m-%d"),
        kind.extension()
    )
}

/// Performs the save/download action for a finished artifact
pub trait DeliverySink {
    /// Save the artifact, returning where it ended up
    fn deliver(&mut self, artifact: &Artifact) -> Result<String>;
}

/// Saves artifacts into a directory on the local filesystem
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DeliverySink for DirectorySink {
    fn deliver(&mut self, artifact: &Artifact) -> Result<String> {
        utils::ensure_directory_exists(&self.dir)?;
        let path = self.dir.join(&artifact.file_name);
        info!(
            "Saving {} ({}, {} bytes) to {:?}",
            artifact.file_name,
            artifact.kind.mime_type(),
            artifact.bytes.len(),
            path
        );
        fs::write(&path, &artifact.bytes).map_err(|e| {
            SliderError::DeliveryError(format!("failed to write {:?}: {}", path, e))
        })?;
        Ok(path.to_string_lossy().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    Exporting,
    Failed,
}

/// User-facing outcome of an export or preview request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Exported {
        file_name: String,
        location: String,
        kind: ArtifactKind,
        asset_count: usize,
        asset_dir: String,
    },
    PreviewOpened {
        location: String,
    },
    NothingToExport,
    NothingToPreview,
    PreviewUnavailable,
    ExportFailed,
}

impl Notice {
    pub fn is_success(&self) -> bool {
        matches!(self, Notice::Exported { .. } | Notice::PreviewOpened { .. })
    }
}

const CONTROLS_HELP: &str = "Controls:\n\
    \u{2022} Left/Right arrow keys move between slides\n\
    \u{2022} Click the indicator dots to jump to a slide\n\
    \u{2022} Works on mobile layouts";

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Exported {
                kind: ArtifactKind::Archive,
                location,
                asset_count,
                asset_dir,
                ..
            } => write!(
                f,
                "ZIP file saved: {location} ({asset_count} image(s))\n\n\
                 How to use:\n\
                 1. Extract the ZIP file\n\
                 2. Keep index.html and the {asset_dir} folder in the same place\n\
                 3. Open index.html in a browser\n\n{CONTROLS_HELP}"
            ),
            Notice::Exported { location, .. } => {
                write!(f, "HTML file saved: {location}\n\n{CONTROLS_HELP}")
            }
            Notice::PreviewOpened { location } => write!(f, "Preview open at {location}"),
            Notice::NothingToExport => write!(f, "No slides to export."),
            Notice::NothingToPreview => {
                write!(f, "Add at least one slide before previewing.")
            }
            Notice::PreviewUnavailable => write!(
                f,
                "The preview could not be opened. Check that the preview surface is allowed to open."
            ),
            Notice::ExportFailed => {
                write!(f, "An error occurred during export. Please try again.")
            }
        }
    }
}

/// Drives export and preview requests. Requests run one at a time to
/// completion; `&mut self` rules out overlapping runs.
pub struct Exporter {
    config: Config,
    state: ExportState,
    date: Option<NaiveDate>,
    last_failure: Option<String>,
}

impl Exporter {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: ExportState::Idle,
            date: None,
            last_failure: None,
        })
    }

    /// Pin the date used in artifact names
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> ExportState {
        self.state
    }

    /// Internal detail of the most recent failure, for diagnostics
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    fn today(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Run the pipeline without delivering: extract, render and, when any
    /// image is embedded, package. All or nothing.
    pub fn build_artifact(&self, slides: &[SlideRecord]) -> Result<Artifact> {
        if slides.is_empty() {
            return Err(SliderError::NothingToExport);
        }

        let strategy = ExportStrategy::select(slides);
        info!("Exporting {} slide(s) as {:?}", slides.len(), strategy);

        let extraction = extract_assets(slides, &self.config.asset_dir)?;
        let document = generate_document(&extraction.slides, &self.config.document_options());

        let artifact = match strategy {
            ExportStrategy::SingleDocument => Artifact {
                file_name: artifact_file_name(
                    &self.config.base_name,
                    self.today(),
                    ArtifactKind::Document,
                ),
                kind: ArtifactKind::Document,
                bytes: document.into_bytes(),
                asset_count: 0,
            },
            ExportStrategy::DocumentPlusAssets => {
                let bytes =
                    assemble_archive(&document, &extraction.assets, &self.config.asset_dir)?;
                Artifact {
                    file_name: artifact_file_name(
                        &self.config.base_name,
                        self.today(),
                        ArtifactKind::Archive,
                    ),
                    kind: ArtifactKind::Archive,
                    bytes,
                    asset_count: extraction.assets.len(),
                }
            }
        };

        Ok(artifact)
    }

    /// Export the slides and hand the artifact to the sink. Every failure is
    /// turned into a notice; the exporter is idle again when this returns.
    pub fn export(&mut self, slides: &[SlideRecord], sink: &mut dyn DeliverySink) -> Notice {
        if slides.is_empty() {
            warn!("Export requested with no slides");
            return Notice::NothingToExport;
        }

        self.transition(ExportState::Exporting);
        let result = self
            .build_artifact(slides)
            .and_then(|artifact| sink.deliver(&artifact).map(|location| (artifact, location)));

        match result {
            Ok((artifact, location)) => {
                self.transition(ExportState::Idle);
                info!("Export complete: {}", artifact.file_name);
                Notice::Exported {
                    file_name: artifact.file_name,
                    location,
                    kind: artifact.kind,
                    asset_count: artifact.asset_count,
                    asset_dir: self.config.asset_dir.clone(),
                }
            }
            Err(e) if e.is_empty_input() => {
                self.transition(ExportState::Idle);
                Notice::NothingToExport
            }
            Err(e) => {
                self.fail(&e);
                Notice::ExportFailed
            }
        }
    }

    /// Render the original slides with embedded images left inline
    pub fn render_preview(&self, slides: &[SlideRecord]) -> Result<String> {
        if slides.is_empty() {
            return Err(SliderError::NothingToPreview);
        }
        Ok(generate_document(slides, &self.config.document_options()))
    }

    /// Render the original slides and show them on the viewing surface
    pub fn preview(&mut self, slides: &[SlideRecord], surface: &mut dyn ViewingSurface) -> Notice {
        let shown = self
            .render_preview(slides)
            .and_then(|document| surface.show(&document));
        match shown {
            Ok(location) => Notice::PreviewOpened { location },
            Err(e) if e.is_empty_input() => {
                warn!("Preview requested with no slides");
                Notice::NothingToPreview
            }
            Err(e) => {
                error!("Preview failed: {}", e);
                self.last_failure = Some(e.to_string());
                Notice::PreviewUnavailable
            }
        }
    }

    fn fail(&mut self, err: &SliderError) {
        self.transition(ExportState::Failed);
        error!("Export failed: {}", err);
        self.last_failure = Some(err.to_string());
        self.transition(ExportState::Idle);
    }

    fn transition(&mut self, next: ExportState) {
        debug!("Exporter state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
