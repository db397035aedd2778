mod common;

use chrono::NaiveDate;
use common::*;
use pdf_resize::constants::round2;
use pdf_resize::geometry::crop_overlay;
use pdf_resize::*;
use std::path::{Path, PathBuf};

fn loaded(sizes: &[(i64, i64)]) -> ResizeSession {
    let doc = create_test_pdf(sizes);
    let info = DocumentInfo::from_document(&doc).unwrap();
    let mut session = ResizeSession::new();
    session
        .load_document(info, Some(Path::new("/data/scans/flyer_A4_240105.pdf")), "flyer_A4_240105.pdf")
        .unwrap();
    session
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
}

#[test]
fn test_load_derives_first_adjuster() {
    let session = loaded(&[(612, 792)]);
    assert_eq!(session.page_count(), 1);
    assert_eq!(session.adjusters().len(), 1);

    let adj = &session.adjusters()[0];
    assert_eq!(adj.size(), Size::new(215.9, 279.4));
    assert_eq!(adj.source, DimensionSource::PdfDerived);
    assert_eq!(session.filename().value(), "flyer_A4_240105");
    assert_eq!(session.export_folder(), Some(Path::new("/data/scans")));
}

#[test]
fn test_trim_resyncs_derived_adjuster() {
    let mut session = loaded(&[(612, 792)]);

    session.set_trim(10.0);
    let adj = &session.adjusters()[0];
    assert_eq!(adj.size(), Size::new(195.9, 259.4));
    assert_eq!(adj.source, DimensionSource::TrimmedDerived);

    session.set_trim(0.0);
    let adj = &session.adjusters()[0];
    assert_eq!(adj.size(), Size::new(215.9, 279.4));
    assert_eq!(adj.source, DimensionSource::PdfDerived);
}

#[test]
fn test_trim_leaves_manual_adjuster() {
    let mut session = loaded(&[(612, 792)]);
    let id = session.adjusters()[0].id();
    session.set_width(id, 100.0);

    session.set_trim(10.0);
    assert_eq!(session.adjusters()[0].width(), 100.0);
    assert_eq!(session.adjusters()[0].source, DimensionSource::Manual);
}

#[test]
fn test_negative_trim_clamped() {
    let mut session = loaded(&[(612, 792)]);
    session.set_trim(-4.0);
    assert_eq!(session.trim(), 0.0);
}

#[test]
fn test_aspect_change_updates_locked_adjusters() {
    let mut session = loaded(&[(612, 792)]);
    let second = session.add_adjuster();
    session.set_mode(second, SizeMode::SetHeight);
    let third = session.add_adjuster();
    session.set_mode(third, SizeMode::SetWidth);

    session.set_trim(10.0);
    let aspect = session.aspect_ratio();
    let effective = session.effective_size().unwrap();
    assert_eq!(aspect, effective.width / effective.height);

    let adjusters = session.adjusters();
    let set_height = &adjusters[1];
    assert_eq!(set_height.height(), round2(set_height.width() / aspect));
    let set_width = &adjusters[2];
    assert_eq!(set_width.width(), round2(set_width.height() * aspect));
}

#[test]
fn test_add_duplicates_last_and_remove_keeps_one() {
    let mut session = loaded(&[(612, 792)]);
    let first = session.adjusters()[0].id();
    session.set_width(first, 50.0);

    let second = session.add_adjuster();
    assert_ne!(first, second);
    assert_eq!(session.adjusters()[1].width(), 50.0);

    assert!(session.remove_adjuster(first));
    assert!(!session.remove_adjuster(second));
    assert_eq!(session.adjusters().len(), 1);
}

#[test]
fn test_page_change_resets_single_derived_adjuster() {
    let mut session = loaded(&[(612, 792), (792, 612)]);
    session.next_page();
    assert_eq!(session.current_page(), 1);
    assert_eq!(session.adjusters()[0].size(), Size::new(279.4, 215.9));

    session.next_page();
    assert_eq!(session.current_page(), 1);
    session.previous_page();
    session.previous_page();
    assert_eq!(session.current_page(), 0);
    assert_eq!(session.adjusters()[0].size(), Size::new(215.9, 279.4));
}

#[test]
fn test_page_change_leaves_multiple_adjusters() {
    let mut session = loaded(&[(612, 792), (792, 612)]);
    session.add_adjuster();
    session.set_page(1);
    assert_eq!(session.adjusters()[0].size(), Size::new(215.9, 279.4));
}

#[test]
fn test_preset_follows_source_orientation() {
    let mut session = loaded(&[(792, 612)]);
    let id = session.adjusters()[0].id();
    session.apply_preset(id, Size::new(210.0, 297.0));
    let adj = &session.adjusters()[0];
    assert_eq!(adj.size(), Size::new(297.0, 210.0));
    assert_eq!(adj.mode, SizeMode::Fill);
}

#[test]
fn test_set_to_trimmed_and_pdf_dimensions() {
    let mut session = loaded(&[(612, 792)]);
    let id = session.adjusters()[0].id();
    session.set_width(id, 10.0);
    session.set_trim(5.0);

    session.set_to_trimmed_dimensions();
    assert_eq!(session.adjusters()[0].size(), Size::new(205.9, 269.4));
    assert_eq!(
        session.adjusters()[0].source,
        DimensionSource::TrimmedDerived
    );

    session.set_to_pdf_dimensions();
    assert_eq!(session.adjusters()[0].size(), Size::new(215.9, 279.4));
}

#[test]
fn test_crop_overlay_scaled() {
    let mut session = loaded(&[(612, 792)]);
    let id = session.adjusters()[0].id();
    session.set_trim(3.0);
    session.apply_preset(id, Size::new(100.0, 100.0));

    let page = session.page_geometry().unwrap();
    let expected = crop_overlay(page, 3.0, Size::new(100.0, 100.0), SizeMode::Fill).scaled(2.0);
    assert_eq!(session.crop_overlay(id, 2.0), Some(expected));
    assert!(expected.top > expected.left);
}

#[test]
fn test_load_rejected_while_saving() {
    let mut session = loaded(&[(612, 792)]);
    session.begin_save(date()).unwrap();

    let doc = create_letter_pdf(2);
    let info = DocumentInfo::from_document(&doc).unwrap();
    let result = session.load_document(info, None, "other.pdf");
    assert!(matches!(result, Err(ResizeError::Busy)));
    assert_eq!(session.page_count(), 1);
}

#[test]
fn test_load_resets_state() {
    let mut session = loaded(&[(612, 792), (612, 792)]);
    session.set_trim(5.0);
    session.next_page();
    session.filename_mut().set_value("renamed");

    let doc = create_letter_pdf(3);
    let info = DocumentInfo::from_document(&doc).unwrap();
    session.load_document(info, None, "second.pdf").unwrap();
    assert_eq!(session.trim(), 0.0);
    assert_eq!(session.current_page(), 0);
    assert_eq!(session.page_count(), 3);
    assert_eq!(session.filename().value(), "second");
    // No path: folder from the first load is kept
    assert_eq!(session.export_folder(), Some(Path::new("/data/scans")));
}

#[test]
fn test_save_request_snapshot() {
    let mut session = loaded(&[(612, 792)]);
    session.set_use_subfolder(true);
    session.set_page_selection(PageSelection::All);
    session.filename_mut().replace_size();

    let request = session.save_request(date()).unwrap();
    assert_eq!(request.folder, PathBuf::from("/data/scans"));
    assert_eq!(request.subfolder.as_deref(), Some("PDF"));
    assert_eq!(request.template, "flyer_*size*_240105");
    assert_eq!(request.outputs.len(), 1);
    assert_eq!(request.page_selection, PageSelection::All);
}

#[test]
fn test_save_requires_folder() {
    let mut session = ResizeSession::new();
    assert!(session.begin_save(date()).is_err());

    let doc = create_letter_pdf(1);
    let info = DocumentInfo::from_document(&doc).unwrap();
    session.load_document(info, None, "x.pdf").unwrap();
    assert!(matches!(
        session.begin_save(date()),
        Err(ResizeError::Config(_))
    ));
    assert_eq!(session.save_status(), &SaveStatus::Idle);
}

#[test]
fn test_options_round_trip_through_session() {
    let mut session = loaded(&[(612, 792)]);
    let options = ResizeOptions {
        trim_mm: 2.0,
        outputs: vec![
            OutputSpec::new(SizeMode::Fill, 100.0, 150.0),
            OutputSpec::new(SizeMode::SetWidth, 50.0, 50.0),
        ],
        file_name: "poster_*size*".to_string(),
        export_folder: Some(PathBuf::from("/tmp/export")),
        use_subfolder: true,
        subfolder_name: "Print".to_string(),
        page_selection: PageSelection::All,
    };
    session.apply_options(&options);

    assert_eq!(session.adjusters().len(), 2);
    assert_eq!(session.filename().value(), "poster_*size*");
    assert_eq!(session.export_folder(), Some(Path::new("/tmp/export")));
    assert_eq!(session.subfolder_name(), "Print");

    let back = session.to_options();
    assert_eq!(back.trim_mm, 2.0);
    assert_eq!(back.outputs[0], OutputSpec::new(SizeMode::Fill, 100.0, 150.0));
    // The aspect-locked output follows the trimmed page
    let aspect = session.aspect_ratio();
    assert_eq!(back.outputs[1].width_mm, round2(50.0 * aspect));
}

#[test]
fn test_options_sync_locked_sizes_with_and_without_trim() {
    for trim in [0.0, 5.0] {
        let mut session = loaded(&[(612, 792)]);
        let options = ResizeOptions {
            trim_mm: trim,
            outputs: vec![OutputSpec::new(SizeMode::SetHeight, 100.0, 50.0)],
            ..ResizeOptions::default()
        };
        session.apply_options(&options);

        let adj = &session.adjusters()[0];
        assert_eq!(adj.width(), 100.0, "trim {trim}");
        assert_eq!(adj.height(), round2(100.0 / session.aspect_ratio()), "trim {trim}");
        assert!(adj.height() > 120.0, "trim {trim}");
    }
}

#[test]
fn test_fail_save_only_for_current_attempt() {
    let mut session = loaded(&[(612, 792)]);
    let (first, _) = session.begin_save(date()).unwrap();
    session.fail_save(first, "disk full");
    assert_eq!(
        session.save_status(),
        &SaveStatus::Error("disk full".to_string())
    );

    session.acknowledge_error();
    let (second, _) = session.begin_save(date()).unwrap();
    session.fail_save(first, "stale");
    assert_eq!(session.save_status(), &SaveStatus::Saving);
    session.finish_write(second, Ok(Vec::new()));
    assert_eq!(session.save_status(), &SaveStatus::Success);
}
