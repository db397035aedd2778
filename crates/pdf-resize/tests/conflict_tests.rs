mod common;

use chrono::NaiveDate;
use common::*;
use pdf_resize::export::{save, write_selected};
use pdf_resize::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// In-memory platform: a fixed set of existing paths, records writes
#[derive(Default)]
struct MockPlatform {
    existing: HashSet<PathBuf>,
    written: Mutex<Vec<PathBuf>>,
    checks: Mutex<usize>,
}

impl MockPlatform {
    fn with_existing(paths: &[&str]) -> Self {
        Self {
            existing: paths.iter().map(PathBuf::from).collect(),
            ..Default::default()
        }
    }

    fn written(&self) -> Vec<PathBuf> {
        self.written.lock().unwrap().clone()
    }
}

impl OutputPlatform for MockPlatform {
    fn checks_existence(&self) -> bool {
        true
    }

    fn destination(&self, folder: &Path, file_name: &str) -> PathBuf {
        folder.join(file_name)
    }

    async fn exists(&self, paths: &[PathBuf]) -> pdf_resize::Result<Vec<bool>> {
        *self.checks.lock().unwrap() += 1;
        Ok(paths.iter().map(|p| self.existing.contains(p)).collect())
    }

    async fn write(&self, path: &Path, _bytes: Vec<u8>) -> pdf_resize::Result<PathBuf> {
        self.written.lock().unwrap().push(path.to_path_buf());
        Ok(path.to_path_buf())
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// Session with a loaded letter document and three 100/200/300 mm square outputs
fn session_with_three_outputs(doc: &lopdf::Document) -> ResizeSession {
    let mut session = ResizeSession::new();
    let info = DocumentInfo::from_document(doc).unwrap();
    session
        .load_document(info, Some(Path::new("/out/source.pdf")), "source.pdf")
        .unwrap();
    session.filename_mut().set_value("*size*");

    let first = session.adjusters()[0].id();
    session.set_width(first, 100.0);
    session.set_height(first, 100.0);
    let second = session.add_adjuster();
    session.set_width(second, 200.0);
    session.set_height(second, 200.0);
    let third = session.add_adjuster();
    session.set_width(third, 300.0);
    session.set_height(third, 300.0);
    session
}

#[tokio::test]
async fn test_conflict_round_trip() {
    let doc = create_letter_pdf(1);
    let source = Arc::new(doc.clone());
    let platform = MockPlatform::with_existing(&["/out/100x100.pdf", "/out/300x300.pdf"]);
    let mut session = session_with_three_outputs(&doc);

    let (generation, request) = session.begin_save(date()).unwrap();
    assert_eq!(session.save_status(), &SaveStatus::Saving);

    let result = save(&platform, Arc::clone(&source), &request).await;
    session.finish_save(generation, request, result);
    assert_eq!(session.save_status(), &SaveStatus::Conflict);
    assert!(platform.written().is_empty());

    let flags: Vec<_> = session
        .conflicts()
        .unwrap()
        .entries()
        .iter()
        .map(|e| (e.is_conflict, e.should_overwrite))
        .collect();
    assert_eq!(flags, [(true, true), (false, true), (true, true)]);

    assert!(session.toggle_conflict(0));
    let (generation, request, selected) = session.resolve_conflicts().unwrap();
    assert_eq!(selected, [1, 2]);

    let result = write_selected(&platform, source, &request, &selected).await;
    session.finish_write(generation, result);

    assert_eq!(
        platform.written(),
        vec![
            PathBuf::from("/out/200x200.pdf"),
            PathBuf::from("/out/300x300.pdf"),
        ]
    );
    assert_eq!(session.save_status(), &SaveStatus::Success);
    assert!(session.expire_success(generation));
    assert_eq!(session.save_status(), &SaveStatus::Idle);
}

#[tokio::test]
async fn test_no_conflicts_writes_all_in_order() {
    let doc = create_letter_pdf(1);
    let platform = MockPlatform::default();
    let mut session = session_with_three_outputs(&doc);

    let (generation, request) = session.begin_save(date()).unwrap();
    let result = save(&platform, Arc::new(doc), &request).await;
    session.finish_save(generation, request, result);

    assert_eq!(session.save_status(), &SaveStatus::Success);
    assert_eq!(*platform.checks.lock().unwrap(), 1);
    assert_eq!(
        platform.written(),
        vec![
            PathBuf::from("/out/100x100.pdf"),
            PathBuf::from("/out/200x200.pdf"),
            PathBuf::from("/out/300x300.pdf"),
        ]
    );
}

#[tokio::test]
async fn test_cancel_writes_nothing() {
    let doc = create_letter_pdf(1);
    let platform = MockPlatform::with_existing(&["/out/200x200.pdf"]);
    let mut session = session_with_three_outputs(&doc);

    let (generation, request) = session.begin_save(date()).unwrap();
    let result = save(&platform, Arc::new(doc), &request).await;
    session.finish_save(generation, request, result);
    assert_eq!(
        session.conflicts().unwrap().primary_action(),
        PrimaryAction::Overwrite
    );
    session.toggle_conflict(1);
    assert_eq!(
        session.conflicts().unwrap().primary_action(),
        PrimaryAction::Continue
    );

    session.cancel_conflicts();
    assert_eq!(session.save_status(), &SaveStatus::Idle);
    assert!(session.resolve_conflicts().is_err());
    assert!(platform.written().is_empty());
}

#[tokio::test]
async fn test_folder_change_invalidates_conflict() {
    let doc = create_letter_pdf(1);
    let platform = MockPlatform::with_existing(&["/out/100x100.pdf"]);
    let mut session = session_with_three_outputs(&doc);

    let (generation, request) = session.begin_save(date()).unwrap();
    let result = save(&platform, Arc::new(doc), &request).await;
    session.finish_save(generation, request, result);
    assert_eq!(session.save_status(), &SaveStatus::Conflict);

    session.set_use_subfolder(true);
    assert_eq!(session.save_status(), &SaveStatus::Idle);
    assert!(session.conflicts().is_none());
}

#[tokio::test]
async fn test_error_surfaces_message() {
    let doc = create_letter_pdf(1);
    let mut session = session_with_three_outputs(&doc);
    let platform = MockPlatform::default();

    let (generation, mut request) = session.begin_save(date()).unwrap();
    request.current_page = 7;
    let result = save(&platform, Arc::new(doc), &request).await;
    session.finish_save(generation, request, result);

    match session.save_status() {
        SaveStatus::Error(message) => assert!(message.contains("out of range")),
        other => panic!("Expected error, got {:?}", other),
    }
    session.acknowledge_error();
    assert_eq!(session.save_status(), &SaveStatus::Idle);
}
