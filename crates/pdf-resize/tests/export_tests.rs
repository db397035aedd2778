mod common;

use chrono::NaiveDate;
use common::*;
use pdf_resize::export::{build_resized_document, plan_for, save, write_selected};
use pdf_resize::render::{media_box, page_id_at, page_rotation};
use pdf_resize::*;
use std::sync::Arc;
use tempfile::TempDir;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
}

fn request(folder: &std::path::Path, outputs: Vec<OutputSpec>) -> SaveRequest {
    SaveRequest {
        folder: folder.to_path_buf(),
        subfolder: None,
        template: "scan_*size*".to_string(),
        date: date(),
        outputs,
        trim_mm: 0.0,
        current_page: 0,
        page_selection: PageSelection::Single,
    }
}

#[test]
fn test_build_sets_target_media_box() {
    let source = create_letter_pdf(1);
    let spec = OutputSpec::new(SizeMode::Fill, 210.0, 297.0);
    let output = build_resized_document(&source, &[0], 0.0, &spec).unwrap();

    assert_eq!(output.get_pages().len(), 1);
    let mb = page_media_box(&output, 0);
    assert_eq!(mb[0], 0.0);
    assert_eq!(mb[1], 0.0);
    assert!(approx(mb[2], 595.28, 0.01));
    assert!(approx(mb[3], 841.89, 0.01));
}

#[test]
fn test_build_places_cropped_xobject() {
    let source = create_test_pdf(&[(200, 400)]);
    // 100 x 100 pt target, fill: scale 0.5, vertical overflow centered
    let mm = 100.0 * 25.4 / 72.0;
    let spec = OutputSpec::new(SizeMode::Fill, mm, mm);
    let output = build_resized_document(&source, &[0], 0.0, &spec).unwrap();

    let page_id = page_id_at(&output, 0).unwrap();
    let content = String::from_utf8(output.get_page_content(page_id).unwrap()).unwrap();
    assert!(content.contains("cm /P0 Do"), "content was {}", content);
    let nums: Vec<f64> = content
        .split_whitespace()
        .skip(1)
        .take(6)
        .map(|s| s.parse().unwrap())
        .collect();
    assert!(approx(nums[0], 0.5, 1e-6));
    assert!(approx(nums[3], 0.5, 1e-6));
    assert!(approx(nums[4], 0.0, 1e-6));
    assert!(approx(nums[5], -50.0, 1e-4));

    let page = output.get_dictionary(page_id).unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
    let xobject_id = xobjects.get(b"P0").unwrap().as_reference().unwrap();
    let stream = output.get_object(xobject_id).unwrap().as_stream().unwrap();
    let bbox = stream.dict.get(b"BBox").unwrap().as_array().unwrap();
    let bbox: Vec<f64> = bbox.iter().map(number).collect();
    assert_eq!(bbox, vec![0.0, 0.0, 200.0, 400.0]);
    assert_eq!(stream.dict.get(b"Subtype").unwrap().as_name().unwrap(), b"Form");
}

#[test]
fn test_build_trim_crops_bbox() {
    let source = create_test_pdf(&[(612, 792)]);
    let spec = OutputSpec::new(SizeMode::SetWidth, 100.0, 100.0);
    // 25.4 mm = 72 pt on every edge
    let output = build_resized_document(&source, &[0], 25.4, &spec).unwrap();

    let page_id = page_id_at(&output, 0).unwrap();
    let page = output.get_dictionary(page_id).unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
    let xobject_id = xobjects.get(b"P0").unwrap().as_reference().unwrap();
    let stream = output.get_object(xobject_id).unwrap().as_stream().unwrap();
    let bbox: Vec<f64> = stream
        .dict
        .get(b"BBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(number)
        .collect();
    assert!(approx(bbox[0], 72.0, 0.01));
    assert!(approx(bbox[1], 72.0, 0.01));
    assert!(approx(bbox[2], 540.0, 0.01));
    assert!(approx(bbox[3], 720.0, 0.01));
}

#[test]
fn test_build_all_pages_in_order() {
    let source = create_test_pdf(&[(100, 100), (200, 200), (300, 300)]);
    let spec = OutputSpec::new(SizeMode::Fill, 50.0, 50.0);
    let output = build_resized_document(&source, &[0, 1, 2], 0.0, &spec).unwrap();
    assert_eq!(output.get_pages().len(), 3);
}

#[test]
fn test_build_page_out_of_range() {
    let source = create_letter_pdf(2);
    let spec = OutputSpec::new(SizeMode::Fill, 50.0, 50.0);
    let result = build_resized_document(&source, &[5], 0.0, &spec);
    assert!(matches!(
        result,
        Err(ResizeError::PageOutOfRange { index: 5, count: 2 })
    ));
}

#[test]
fn test_inherited_attributes() {
    let source = create_inherited_pdf(2, [10, 20, 310, 620], 90);
    let page_id = page_id_at(&source, 1).unwrap();
    let mb = media_box(&source, page_id);
    assert_eq!(mb, Rect::new(10.0, 20.0, 300.0, 600.0));
    assert_eq!(page_rotation(&source, page_id), 90);

    let info = DocumentInfo::from_document(&source).unwrap();
    assert_eq!(info.page_count(), 2);
    let geometry = info.page(0).unwrap().geometry();
    assert!(approx(geometry.width, 600.0 * 25.4 / 72.0, 1e-9));
    assert!(approx(geometry.height, 300.0 * 25.4 / 72.0, 1e-9));

    // Inherited resources are copied into the form
    let spec = OutputSpec::new(SizeMode::Fill, 50.0, 50.0);
    let output = build_resized_document(&source, &[0], 0.0, &spec).unwrap();
    let page_id = page_id_at(&output, 0).unwrap();
    let page = output.get_dictionary(page_id).unwrap();
    let xobjects = page
        .get(b"Resources")
        .unwrap()
        .as_dict()
        .unwrap()
        .get(b"XObject")
        .unwrap()
        .as_dict()
        .unwrap();
    let xobject_id = xobjects.get(b"P0").unwrap().as_reference().unwrap();
    let stream = output.get_object(xobject_id).unwrap().as_stream().unwrap();
    let form_resources = stream.dict.get(b"Resources").unwrap().as_dict().unwrap();
    assert!(form_resources.has(b"Font"));
}

#[test]
fn test_document_info_rejects_empty() {
    let source = create_test_pdf(&[]);
    assert!(matches!(
        DocumentInfo::from_document(&source),
        Err(ResizeError::NoPages)
    ));
}

#[tokio::test]
async fn test_save_writes_every_output() {
    let dir = TempDir::new().unwrap();
    let source = Arc::new(create_letter_pdf(3));
    let mut req = request(
        dir.path(),
        vec![
            OutputSpec::new(SizeMode::Fill, 210.0, 297.0),
            OutputSpec::new(SizeMode::SetWidth, 100.0, 50.4),
        ],
    );
    req.page_selection = PageSelection::All;

    let outcome = save(&LocalDisk, Arc::clone(&source), &req).await.unwrap();
    let SaveOutcome::Saved(paths) = outcome else {
        panic!("Expected Saved, got {:?}", outcome);
    };
    assert_eq!(
        paths,
        vec![
            dir.path().join("scan_210x297.pdf"),
            dir.path().join("scan_100x50.pdf"),
        ]
    );

    let written = load_pdf(&paths[0]).await.unwrap();
    assert_eq!(written.get_pages().len(), 3);
    let mb = page_media_box(&written, 2);
    assert!(approx(mb[2], 595.28, 0.01));
}

#[tokio::test]
async fn test_save_single_page_uses_current_page() {
    let dir = TempDir::new().unwrap();
    let source = Arc::new(create_test_pdf(&[(100, 100), (200, 300)]));
    let mut req = request(dir.path(), vec![OutputSpec::new(SizeMode::Fill, 10.0, 10.0)]);
    req.current_page = 1;

    let outcome = save(&LocalDisk, source, &req).await.unwrap();
    let SaveOutcome::Saved(paths) = outcome else {
        panic!("Expected Saved");
    };
    let written = load_pdf(&paths[0]).await.unwrap();
    assert_eq!(written.get_pages().len(), 1);
}

#[tokio::test]
async fn test_save_creates_subfolder() {
    let dir = TempDir::new().unwrap();
    let source = Arc::new(create_letter_pdf(1));
    let mut req = request(dir.path(), vec![OutputSpec::new(SizeMode::Fill, 10.0, 20.0)]);
    req.subfolder = Some("PDF/".to_string());

    save(&LocalDisk, source, &req).await.unwrap();
    assert!(dir.path().join("PDF").join("scan_10x20.pdf").exists());
}

#[tokio::test]
async fn test_save_reports_conflicts_without_writing() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("scan_10x10.pdf"), b"old").unwrap();

    let source = Arc::new(create_letter_pdf(1));
    let req = request(
        dir.path(),
        vec![
            OutputSpec::new(SizeMode::Fill, 10.0, 10.0),
            OutputSpec::new(SizeMode::Fill, 20.0, 20.0),
        ],
    );

    let outcome = save(&LocalDisk, Arc::clone(&source), &req).await.unwrap();
    let SaveOutcome::Conflict(set) = outcome else {
        panic!("Expected Conflict");
    };
    assert!(set.entries()[0].is_conflict);
    assert!(!set.entries()[1].is_conflict);
    assert!(!dir.path().join("scan_20x20.pdf").exists());
    assert_eq!(std::fs::read(dir.path().join("scan_10x10.pdf")).unwrap(), b"old");

    // Overwrite everything that is still flagged
    let written = write_selected(&LocalDisk, source, &req, &set.selected_indices())
        .await
        .unwrap();
    assert_eq!(written.len(), 2);
    assert_ne!(std::fs::read(dir.path().join("scan_10x10.pdf")).unwrap(), b"old");
}

#[tokio::test]
async fn test_download_folder_skips_conflict_detection() {
    let chosen = TempDir::new().unwrap();
    let downloads = TempDir::new().unwrap();
    std::fs::write(downloads.path().join("scan_10x10.pdf"), b"old").unwrap();

    let platform = DownloadFolder::new(downloads.path());
    let source = Arc::new(create_letter_pdf(1));
    let req = request(chosen.path(), vec![OutputSpec::new(SizeMode::Fill, 10.0, 10.0)]);

    let planned = plan_for(&platform, &req);
    assert_eq!(planned[0].path, downloads.path().join("scan_10x10.pdf"));

    let outcome = save(&platform, source, &req).await.unwrap();
    assert_eq!(
        outcome,
        SaveOutcome::Saved(vec![downloads.path().join("scan_10x10.pdf")])
    );
    assert!(!chosen.path().join("scan_10x10.pdf").exists());
}

#[tokio::test]
async fn test_save_error_aborts() {
    let dir = TempDir::new().unwrap();
    // A file where the subfolder should be
    std::fs::write(dir.path().join("blocked"), b"").unwrap();

    let source = Arc::new(create_letter_pdf(1));
    let mut req = request(dir.path(), vec![OutputSpec::new(SizeMode::Fill, 10.0, 10.0)]);
    req.subfolder = Some("blocked".to_string());

    let result = save(&LocalDisk, source, &req).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_load_pdf_bytes_round_trip() {
    let mut doc = create_letter_pdf(2);
    let bytes = to_bytes(&mut doc);
    let loaded = load_pdf_bytes(bytes).await.unwrap();
    assert_eq!(loaded.get_pages().len(), 2);

    let again = document_to_bytes(loaded).await.unwrap();
    assert!(again.starts_with(b"%PDF-"));
}
