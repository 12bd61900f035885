use slider_export::{
    extract_assets, Config, DirectorySink, Exporter, ImageSource, Notice, SlideRecord,
};
use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

fn read_archive(path: &Path) -> zip::ZipArchive<fs::File> {
    let file = fs::File::open(path).expect("Failed to open archive");
    zip::ZipArchive::new(file).expect("Failed to read archive")
}

fn read_entry(archive: &mut zip::ZipArchive<fs::File>, name: &str) -> Vec<u8> {
    let mut entry = archive.by_name(name).expect("Missing archive entry");
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes).expect("Failed to read entry");
    bytes
}

fn asset_entries(archive: &mut zip::ZipArchive<fs::File>) -> Vec<String> {
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .filter(|name| name.starts_with("slider-images/") && name != "slider-images/")
        .collect()
}

#[test]
fn test_mixed_deck_exports_archive_with_rewritten_paths() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let slides = vec![
        SlideRecord::remote("A", "https://x/a.png").unwrap(),
        SlideRecord::embedded("B", "data:image/png;base64,AAA="),
    ];

    let mut exporter = Exporter::new(Config::default()).unwrap();
    let mut sink = DirectorySink::new(temp_dir.path());
    let notice = exporter.export(&slides, &mut sink);

    let file_name = match &notice {
        Notice::Exported { file_name, .. } => file_name.clone(),
        other => panic!("Export failed: {:?}", other),
    };
    assert!(file_name.starts_with("curved-slider-export-"));
    assert!(file_name.ends_with(".zip"));

    let archive_path = temp_dir.path().join(&file_name);
    assert!(archive_path.exists(), "Archive was not written");

    let mut archive = read_archive(&archive_path);
    let html = String::from_utf8(read_entry(&mut archive, "index.html")).unwrap();
    assert!(html.contains(r#"src="https://x/a.png""#));

    let assets = asset_entries(&mut archive);
    assert_eq!(assets.len(), 1);
    let asset_name = assets[0].trim_start_matches("slider-images/").to_string();
    assert!(asset_name.ends_with(".png"));
    assert!(html.contains(&format!(r#"src="./slider-images/{}""#, asset_name)));

    // Decoded payload of "AAA=" is two zero bytes
    assert_eq!(read_entry(&mut archive, &assets[0]), vec![0u8, 0u8]);
}

#[test]
fn test_percent_encoded_svg_is_bundled_as_markup() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let slides = vec![SlideRecord::embedded(
        "svg",
        "data:image/svg+xml,%3Csvg%3E%3C%2Fsvg%3E",
    )];

    let mut exporter = Exporter::new(Config::default()).unwrap();
    let mut sink = DirectorySink::new(temp_dir.path());
    let file_name = match exporter.export(&slides, &mut sink) {
        Notice::Exported { file_name, .. } => file_name,
        other => panic!("Export failed: {:?}", other),
    };

    let mut archive = read_archive(&temp_dir.path().join(file_name));
    let assets = asset_entries(&mut archive);
    assert_eq!(assets.len(), 1);
    assert!(assets[0].ends_with(".svg"));
    assert_eq!(read_entry(&mut archive, &assets[0]), b"<svg></svg>");
}

#[test]
fn test_remote_deck_exports_single_document() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let slides = vec![
        SlideRecord::remote("One", "https://x/1.png").unwrap(),
        SlideRecord::remote("Two", "https://x/2.png").unwrap(),
        SlideRecord::remote("Three", "https://x/3.png").unwrap(),
    ];

    let mut exporter = Exporter::new(Config::default()).unwrap();
    let mut sink = DirectorySink::new(temp_dir.path());
    let notice = exporter.export(&slides, &mut sink);
    assert!(notice.is_success(), "Export failed: {:?}", notice);

    let entries: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].ends_with(".html"));

    let html = fs::read_to_string(temp_dir.path().join(&entries[0])).unwrap();
    assert_eq!(html.matches(r#"<div class="content-slide"#).count(), 3);
    let one = html.find(">One</div>").unwrap();
    let two = html.find(">Two</div>").unwrap();
    let three = html.find(">Three</div>").unwrap();
    assert!(one < two && two < three);
}

#[test]
fn test_every_embedded_slide_has_exactly_one_matching_asset() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    // Byte-identical payloads must still get distinct names
    let slides: Vec<SlideRecord> = (0..5)
        .map(|i| SlideRecord::embedded(format!("slide {}", i), "data:image/gif;base64,R0lG"))
        .collect();

    let mut exporter = Exporter::new(Config::default()).unwrap();
    let mut sink = DirectorySink::new(temp_dir.path());
    let notice = exporter.export(&slides, &mut sink);
    let file_name = match notice {
        Notice::Exported { file_name, .. } => file_name,
        other => panic!("Export failed: {:?}", other),
    };

    let mut archive = read_archive(&temp_dir.path().join(file_name));
    let html = String::from_utf8(read_entry(&mut archive, "index.html")).unwrap();
    let assets = asset_entries(&mut archive);
    assert_eq!(assets.len(), 5);

    let unique: HashSet<_> = assets.iter().collect();
    assert_eq!(unique.len(), 5);

    let referenced = html.matches(r#"src="./slider-images/"#).count();
    assert_eq!(referenced, 5);
    for asset in &assets {
        assert!(
            html.contains(&format!(r#"src="./{}""#, asset)),
            "Asset {} is not referenced by the document",
            asset
        );
        assert_eq!(read_entry(&mut archive, asset), b"GIF".to_vec());
    }
}

#[test]
fn test_extraction_preserves_order_and_length() {
    let slides = vec![
        SlideRecord::embedded("a", "data:image/jpeg;base64,AAA="),
        SlideRecord::remote("b", "https://x/b.png").unwrap(),
        SlideRecord::embedded("c", "data:image/png;base64,AAA=").with_assigned_file_name("kept.png"),
    ];

    let extraction = extract_assets(&slides, "slider-images").unwrap();

    assert_eq!(extraction.slides.len(), 3);
    assert_eq!(extraction.assets.len(), 2);
    for (before, after) in slides.iter().zip(&extraction.slides) {
        assert_eq!(before.id, after.id);
        assert_eq!(before.text, after.text);
    }
    assert_eq!(extraction.slides[1].image, slides[1].image);
    assert!(extraction.assets[0].file_name.ends_with(".jpg"));
    assert_eq!(extraction.assets[1].file_name, "kept.png");
    assert_eq!(
        extraction.slides[2].image,
        ImageSource::Bundled("./slider-images/kept.png".to_string())
    );
}

#[test]
fn test_failed_export_writes_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output_dir = temp_dir.path().join("out");
    let slides = vec![
        SlideRecord::embedded("good", "data:image/png;base64,AAA="),
        SlideRecord::embedded("bad", "data:image/png;base64,***"),
    ];

    let mut exporter = Exporter::new(Config::default()).unwrap();
    let mut sink = DirectorySink::new(&output_dir);
    let notice = exporter.export(&slides, &mut sink);

    assert_eq!(notice, Notice::ExportFailed);
    assert!(!output_dir.exists() || fs::read_dir(&output_dir).unwrap().next().is_none());
}
