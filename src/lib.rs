// ABOUTME: Library module for the slider-export program.
// ABOUTME: Turns an ordered slide list into a standalone HTML presentation or a ZIP bundle.

// Reexport modules
pub mod archive;
pub mod assets;
pub mod config;
pub mod deck;
pub mod errors;
pub mod export;
pub mod html;
pub mod navigation;
pub mod preview;
pub mod slide;
pub mod utils;

// Reexport common types and functions
pub use archive::{assemble_archive, DOCUMENT_NAME};
pub use assets::{extract_assets, ExtractedAsset, Extraction, NameGenerator};
pub use config::Config;
pub use deck::{load_deck, parse_deck, Deck};
pub use errors::{Result, SliderError};
pub use export::{
    Artifact, ArtifactKind, DeliverySink, DirectorySink, ExportState, ExportStrategy, Exporter,
    Notice,
};
pub use html::{generate_document, DocumentOptions, TextPolicy};
pub use navigation::{Carousel, SlideState};
pub use preview::{HttpPreview, ViewingSurface};
pub use slide::{EmbeddedImage, ImageSource, SlideId, SlideRecord, TrustedHtml};
