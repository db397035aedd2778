//! Export orchestration
//!
//! A save plans one output file per adjuster, checks the targets for
//! existing files when the platform can, and otherwise builds and writes
//! every output in adjuster order. The first failure aborts the whole save;
//! files already written stay in place.

mod build;
mod paths;
mod platform;

pub use build::build_resized_document;
pub use paths::{PlannedOutput, output_file_name, output_folder, plan_outputs};
pub use platform::{DownloadFolder, LocalDisk, OutputPlatform};

use crate::conflict::ConflictSet;
use crate::io::document_to_bytes;
use crate::types::*;
use chrono::NaiveDate;
use lopdf::Document;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a save needs, captured when the save is requested
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub folder: PathBuf,
    pub subfolder: Option<String>,
    /// File name template, without extension
    pub template: String,
    /// Date used for the date tokens
    pub date: NaiveDate,
    pub outputs: Vec<OutputSpec>,
    pub trim_mm: f64,
    pub current_page: usize,
    pub page_selection: PageSelection,
}

impl SaveRequest {
    /// Source page indices every output contains, ascending
    pub fn pages(&self, page_count: usize) -> Vec<usize> {
        self.page_selection.pages(self.current_page, page_count)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Every output was written
    Saved(Vec<PathBuf>),
    /// Some targets exist; nothing was written
    Conflict(ConflictSet),
}

/// Plan the outputs for a platform
pub fn plan_for<P: OutputPlatform>(platform: &P, request: &SaveRequest) -> Vec<PlannedOutput> {
    plan_outputs(request, |folder, name| platform.destination(folder, name))
}

/// Run a save: existence check first, then write everything if nothing conflicts
pub async fn save<P: OutputPlatform>(
    platform: &P,
    source: Arc<Document>,
    request: &SaveRequest,
) -> Result<SaveOutcome> {
    let planned = plan_for(platform, request);
    if planned.is_empty() {
        return Err(ResizeError::Config("No output sizes to save".to_string()));
    }

    if platform.checks_existence() {
        let paths: Vec<PathBuf> = planned.iter().map(|p| p.path.clone()).collect();
        let exists = platform.exists(&paths).await?;
        if exists.iter().any(|&e| e) {
            log::info!(
                "{} of {} outputs already exist",
                exists.iter().filter(|&&e| e).count(),
                paths.len()
            );
            return Ok(SaveOutcome::Conflict(ConflictSet::from_existence(
                &paths, &exists,
            )));
        }
    }

    let all: Vec<usize> = (0..planned.len()).collect();
    let written = write_selected(platform, source, request, &all).await?;
    Ok(SaveOutcome::Saved(written))
}

/// Build and write the outputs at `indices` (adjuster positions), in the order given
pub async fn write_selected<P: OutputPlatform>(
    platform: &P,
    source: Arc<Document>,
    request: &SaveRequest,
    indices: &[usize],
) -> Result<Vec<PathBuf>> {
    let planned = plan_for(platform, request);
    let page_count = source.get_pages().len();
    if page_count == 0 {
        return Err(ResizeError::NoPages);
    }
    let pages = request.pages(page_count);

    let mut written = Vec::with_capacity(indices.len());
    for &index in indices {
        let Some(output) = planned.get(index) else {
            log::warn!("Skipping unknown output index {}", index);
            continue;
        };

        let source = Arc::clone(&source);
        let pages = pages.clone();
        let trim = request.trim_mm;
        let spec = output.spec;
        let doc = tokio::task::spawn_blocking(move || {
            build_resized_document(&source, &pages, trim, &spec)
        })
        .await??;

        let bytes = document_to_bytes(doc).await?;
        let path = platform.write(&output.path, bytes).await?;
        log::info!("Saved {}", path.display());
        written.push(path);
    }
    Ok(written)
}
