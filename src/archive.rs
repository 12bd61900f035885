// ABOUTME: Archive assembly module for the slider-export application
// ABOUTME: Packages the exported document and its image assets into a ZIP file

use crate::assets::ExtractedAsset;
use crate::errors::{Result, SliderError};
use log::{debug, info};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

/// Name of the document at the archive root
pub const DOCUMENT_NAME: &str = "index.html";

/// Build a ZIP archive holding `index.html` at the root and every asset,
/// decoded to native bytes, under `<asset_dir>/`.
pub fn assemble_archive(
    document: &str,
    assets: &[ExtractedAsset],
    asset_dir: &str,
) -> Result<Vec<u8>> {
    info!(
        "Assembling archive with {} asset(s) under {}/",
        assets.len(),
        asset_dir
    );

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file(DOCUMENT_NAME, options)?;
    zip.write_all(document.as_bytes())?;

    zip.add_directory(format!("{}/", asset_dir), options)?;

    let mut seen = HashSet::new();
    for asset in assets {
        if !seen.insert(asset.file_name.as_str()) {
            return Err(SliderError::ArchiveError(format!(
                "duplicate asset name: {}",
                asset.file_name
            )));
        }

        let bytes = asset.decode()?;
        let entry_name = format!("{}/{}", asset_dir, asset.file_name);
        debug!("Adding {} ({} bytes)", entry_name, bytes.len());

        // Image formats are already compressed
        zip.start_file(
            entry_name,
            options.compression_method(CompressionMethod::Stored),
        )?;
        zip.write_all(&bytes)?;
    }

    let cursor = zip.finish()?;
    let archive = cursor.into_inner();
    info!("Archive assembled ({} bytes)", archive.len());
    Ok(archive)
}
