//! Editing session
//!
//! [`ResizeSession`] is the single owner of everything the user edits: the
//! loaded document's page geometry, trim, the adjuster list, the file name
//! template, the export location and the save workflow. Every mutating method
//! finishes with [`ResizeSession::recompute`], which re-derives the aspect
//! ratio and keeps aspect-locked adjusters consistent.

use crate::adjuster::{Adjuster, AdjusterId};
use crate::conflict::{ConflictSet, SaveStatus, SaveWorkflow};
use crate::constants::{DEFAULT_SUBFOLDER_NAME, round2};
use crate::export::{SaveOutcome, SaveRequest};
use crate::geometry::{PageGeometry, aspect_ratio, crop_overlay, effective_size};
use crate::io::DocumentInfo;
use crate::options::ResizeOptions;
use crate::tokens::{FilenameEditor, base_file_name};
use crate::types::*;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// The document currently being edited
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub path: Option<PathBuf>,
    /// File name as shown to the user, including extension
    pub file_name: String,
    pub info: DocumentInfo,
}

#[derive(Debug, Clone)]
pub struct ResizeSession {
    document: Option<LoadedDocument>,
    current_page: usize,
    page_selection: PageSelection,
    trim: f64,
    adjusters: Vec<Adjuster>,
    filename: FilenameEditor,
    export_folder: Option<PathBuf>,
    use_subfolder: bool,
    subfolder_name: String,
    workflow: SaveWorkflow,
    /// Request captured when a save ran into conflicts
    pending: Option<SaveRequest>,
    aspect: f64,
}

impl Default for ResizeSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ResizeSession {
    pub fn new() -> Self {
        Self {
            document: None,
            current_page: 0,
            page_selection: PageSelection::Single,
            trim: 0.0,
            adjusters: vec![Adjuster::default()],
            filename: FilenameEditor::default(),
            export_folder: None,
            use_subfolder: false,
            subfolder_name: DEFAULT_SUBFOLDER_NAME.to_string(),
            workflow: SaveWorkflow::new(),
            pending: None,
            aspect: 1.0,
        }
    }

    // =========================================================================
    // Document
    // =========================================================================

    /// Replace the loaded document.
    ///
    /// Trim and page are reset, the file name starts over from the new base
    /// name and the export folder moves to the file's directory. Refused while
    /// a save is running.
    pub fn load_document(
        &mut self,
        info: DocumentInfo,
        path: Option<&Path>,
        file_name: impl Into<String>,
    ) -> Result<()> {
        if self.workflow.is_saving() {
            return Err(ResizeError::Busy);
        }
        if info.page_count() == 0 {
            return Err(ResizeError::NoPages);
        }

        let file_name = file_name.into();
        self.filename = FilenameEditor::new(base_file_name(&file_name));
        if let Some(parent) = path.and_then(Path::parent) {
            self.export_folder = Some(parent.to_path_buf());
        }
        self.document = Some(LoadedDocument {
            path: path.map(Path::to_path_buf),
            file_name,
            info,
        });
        self.trim = 0.0;
        self.current_page = 0;
        self.workflow.reset();
        self.pending = None;

        if self.adjusters.is_empty() {
            if let Some(page) = self.page_geometry() {
                self.adjusters.push(Adjuster::from_page(page.size()));
            }
        }
        self.on_page_geometry_changed();
        self.recompute();
        Ok(())
    }

    pub fn close_document(&mut self) {
        self.document = None;
        self.current_page = 0;
        self.filename = FilenameEditor::default();
        self.workflow.reset();
        self.pending = None;
    }

    pub fn document(&self) -> Option<&LoadedDocument> {
        self.document.as_ref()
    }

    pub fn page_count(&self) -> usize {
        self.document
            .as_ref()
            .map(|d| d.info.page_count())
            .unwrap_or(0)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Displayed size of the current page
    pub fn page_geometry(&self) -> Option<PageGeometry> {
        let doc = self.document.as_ref()?;
        doc.info.pages.get(self.current_page).map(|p| p.geometry())
    }

    pub fn set_page(&mut self, index: usize) {
        let count = self.page_count();
        if count == 0 {
            return;
        }
        let index = index.min(count - 1);
        if index != self.current_page {
            let before = self.page_geometry();
            self.current_page = index;
            if self.page_geometry() != before {
                self.on_page_geometry_changed();
            }
            self.recompute();
        }
    }

    pub fn next_page(&mut self) {
        self.set_page(self.current_page + 1);
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.current_page.saturating_sub(1));
    }

    pub fn page_selection(&self) -> PageSelection {
        self.page_selection
    }

    pub fn set_page_selection(&mut self, selection: PageSelection) {
        self.page_selection = selection;
    }

    // =========================================================================
    // Trim
    // =========================================================================

    pub fn trim(&self) -> f64 {
        self.trim
    }

    /// Set the trim margin. A derived first adjuster follows the trimmed size.
    pub fn set_trim(&mut self, trim: f64) {
        let trim = if trim.is_finite() { trim.max(0.0) } else { 0.0 };
        if trim == self.trim {
            return;
        }
        self.trim = trim;

        if let Some(effective) = self.effective_size() {
            if let Some(first) = self.adjusters.first_mut().filter(|a| a.source.is_derived()) {
                let source = if trim == 0.0 {
                    DimensionSource::PdfDerived
                } else {
                    DimensionSource::TrimmedDerived
                };
                first.set_dimensions(
                    Size::new(round2(effective.width), round2(effective.height)),
                    source,
                );
            }
        }
        self.recompute();
    }

    /// Current page after trim
    pub fn effective_size(&self) -> Option<Size> {
        self.page_geometry().map(|p| effective_size(p, self.trim))
    }

    /// Width over height of the trimmed page (1 without a document)
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect
    }

    // =========================================================================
    // Adjusters
    // =========================================================================

    pub fn adjusters(&self) -> &[Adjuster] {
        &self.adjusters
    }

    pub fn adjuster(&self, id: AdjusterId) -> Option<&Adjuster> {
        self.adjusters.iter().find(|a| a.id() == id)
    }

    fn adjuster_mut(&mut self, id: AdjusterId) -> Option<&mut Adjuster> {
        self.adjusters.iter_mut().find(|a| a.id() == id)
    }

    /// Duplicate the last adjuster; returns the new id
    pub fn add_adjuster(&mut self) -> AdjusterId {
        let adjuster = self
            .adjusters
            .last()
            .map(Adjuster::duplicate)
            .unwrap_or_default();
        let id = adjuster.id();
        self.adjusters.push(adjuster);
        self.recompute();
        id
    }

    /// Remove an adjuster. The last remaining one cannot be removed.
    pub fn remove_adjuster(&mut self, id: AdjusterId) -> bool {
        if self.adjusters.len() <= 1 {
            return false;
        }
        let before = self.adjusters.len();
        self.adjusters.retain(|a| a.id() != id);
        let removed = self.adjusters.len() != before;
        if removed {
            self.recompute();
        }
        removed
    }

    pub fn set_mode(&mut self, id: AdjusterId, mode: SizeMode) {
        let aspect = self.aspect;
        if let Some(adj) = self.adjuster_mut(id) {
            adj.set_mode(mode, aspect);
        }
        self.recompute();
    }

    pub fn set_width(&mut self, id: AdjusterId, width: f64) {
        let aspect = self.aspect;
        if let Some(adj) = self.adjuster_mut(id) {
            adj.set_width(width, aspect);
        }
        self.recompute();
    }

    pub fn set_height(&mut self, id: AdjusterId, height: f64) {
        let aspect = self.aspect;
        if let Some(adj) = self.adjuster_mut(id) {
            adj.set_height(height, aspect);
        }
        self.recompute();
    }

    pub fn swap_dimensions(&mut self, id: AdjusterId) {
        if let Some(adj) = self.adjuster_mut(id) {
            adj.swap();
        }
        self.recompute();
    }

    pub fn apply_preset(&mut self, id: AdjusterId, preset: Size) {
        let aspect = self.aspect;
        if let Some(adj) = self.adjuster_mut(id) {
            adj.apply_preset(preset, aspect);
        }
        self.recompute();
    }

    /// First adjuster takes the untrimmed page size
    pub fn set_to_pdf_dimensions(&mut self) {
        let Some(page) = self.page_geometry() else {
            return;
        };
        if let Some(first) = self.adjusters.first_mut() {
            first.set_dimensions(
                Size::new(round2(page.width), round2(page.height)),
                DimensionSource::PdfDerived,
            );
        }
        self.recompute();
    }

    /// First adjuster takes the trimmed page size
    pub fn set_to_trimmed_dimensions(&mut self) {
        let Some(effective) = self.effective_size() else {
            return;
        };
        if let Some(first) = self.adjusters.first_mut() {
            first.set_dimensions(
                Size::new(round2(effective.width), round2(effective.height)),
                DimensionSource::TrimmedDerived,
            );
        }
        self.recompute();
    }

    /// Preview crop insets for one adjuster, scaled to pixels
    pub fn crop_overlay(&self, focused: AdjusterId, px_per_mm: f64) -> Option<Insets> {
        let page = self.page_geometry()?;
        let adj = self.adjuster(focused)?;
        Some(crop_overlay(page, self.trim, adj.size(), adj.mode).scaled(px_per_mm))
    }

    fn on_page_geometry_changed(&mut self) {
        let Some(page) = self.page_geometry() else {
            return;
        };
        if let [only] = self.adjusters.as_mut_slice() {
            if only.source.is_derived() {
                only.set_dimensions(
                    Size::new(round2(page.width), round2(page.height)),
                    DimensionSource::PdfDerived,
                );
            }
        }
    }

    /// Re-derive the aspect ratio; aspect-locked adjusters follow when it changed
    pub fn recompute(&mut self) {
        let Some(effective) = self.effective_size() else {
            return;
        };
        let aspect = aspect_ratio(effective);
        if (aspect - self.aspect).abs() > f64::EPSILON {
            self.aspect = aspect;
            for adj in &mut self.adjusters {
                adj.sync_to_aspect(aspect);
            }
        }
    }

    // =========================================================================
    // File name and export location
    // =========================================================================

    pub fn filename(&self) -> &FilenameEditor {
        &self.filename
    }

    pub fn filename_mut(&mut self) -> &mut FilenameEditor {
        &mut self.filename
    }

    pub fn export_folder(&self) -> Option<&Path> {
        self.export_folder.as_deref()
    }

    pub fn set_export_folder(&mut self, folder: Option<PathBuf>) {
        if folder != self.export_folder {
            self.export_folder = folder;
            self.invalidate_targets();
        }
    }

    pub fn use_subfolder(&self) -> bool {
        self.use_subfolder
    }

    pub fn set_use_subfolder(&mut self, enabled: bool) {
        if enabled != self.use_subfolder {
            self.use_subfolder = enabled;
            self.invalidate_targets();
        }
    }

    pub fn subfolder_name(&self) -> &str {
        &self.subfolder_name
    }

    pub fn set_subfolder_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name != self.subfolder_name {
            self.subfolder_name = name;
            self.invalidate_targets();
        }
    }

    fn invalidate_targets(&mut self) {
        self.workflow.invalidate_targets();
        self.pending = None;
    }

    // =========================================================================
    // Saving
    // =========================================================================

    pub fn workflow(&self) -> &SaveWorkflow {
        &self.workflow
    }

    pub fn save_status(&self) -> &SaveStatus {
        self.workflow.status()
    }

    pub fn conflicts(&self) -> Option<&ConflictSet> {
        self.workflow.conflicts()
    }

    pub fn toggle_conflict(&mut self, index: usize) -> bool {
        self.workflow
            .conflicts_mut()
            .is_some_and(|set| set.toggle(index))
    }

    /// Snapshot of everything needed to save, without touching the workflow
    pub fn save_request(&self, date: NaiveDate) -> Result<SaveRequest> {
        if self.document.is_none() {
            return Err(ResizeError::Config("No document loaded".to_string()));
        }
        let folder = self
            .export_folder
            .clone()
            .ok_or_else(|| ResizeError::Config("No export folder selected".to_string()))?;

        Ok(SaveRequest {
            folder,
            subfolder: self.use_subfolder.then(|| self.subfolder_name.clone()),
            template: self.filename.value().to_string(),
            date,
            outputs: self.adjusters.iter().map(Adjuster::spec).collect(),
            trim_mm: self.trim,
            current_page: self.current_page,
            page_selection: self.page_selection,
        })
    }

    /// Start a save. Returns the attempt's generation and the request to run.
    pub fn begin_save(&mut self, date: NaiveDate) -> Result<(u64, SaveRequest)> {
        let request = self.save_request(date)?;
        let generation = self.workflow.begin()?;
        self.pending = None;
        Ok((generation, request))
    }

    /// Feed back the result of [`crate::export::save`]
    pub fn finish_save(
        &mut self,
        generation: u64,
        request: SaveRequest,
        result: Result<SaveOutcome>,
    ) {
        match result {
            Ok(SaveOutcome::Saved(_)) => {
                self.workflow.complete_success(generation);
            }
            Ok(SaveOutcome::Conflict(set)) => {
                if self.workflow.complete_conflict(generation, set) {
                    self.pending = Some(request);
                }
            }
            Err(e) => {
                self.workflow.complete_error(generation, e.to_string());
            }
        }
    }

    /// Accept the conflict decisions. Returns the request captured at save
    /// time and the adjuster positions to write.
    pub fn resolve_conflicts(&mut self) -> Result<(u64, SaveRequest, Vec<usize>)> {
        let request = self
            .pending
            .take()
            .ok_or_else(|| ResizeError::Config("No conflict to resolve".to_string()))?;
        let (generation, selected) = self.workflow.resolve()?;
        Ok((generation, request, selected))
    }

    /// Feed back the result of [`crate::export::write_selected`]
    pub fn finish_write(&mut self, generation: u64, result: Result<Vec<PathBuf>>) {
        match result {
            Ok(_) => {
                self.workflow.complete_success(generation);
            }
            Err(e) => {
                self.workflow.complete_error(generation, e.to_string());
            }
        }
    }

    /// Record a failure reported as text, e.g. across a channel
    pub fn fail_save(&mut self, generation: u64, message: impl Into<String>) {
        self.workflow.complete_error(generation, message);
    }

    pub fn cancel_conflicts(&mut self) {
        self.workflow.cancel();
        self.pending = None;
    }

    pub fn acknowledge_error(&mut self) {
        self.workflow.acknowledge_error();
    }

    pub fn expire_success(&mut self, generation: u64) -> bool {
        self.workflow.expire_success(generation)
    }

    // =========================================================================
    // Options
    // =========================================================================

    /// Apply a stored configuration on top of the current state
    pub fn apply_options(&mut self, options: &ResizeOptions) {
        if !options.outputs.is_empty() {
            self.adjusters = options.outputs.iter().map(Adjuster::from_spec).collect();
        }
        if !options.file_name.trim().is_empty() {
            self.filename.set_value(options.file_name.clone());
        }
        if options.export_folder.is_some() {
            self.set_export_folder(options.export_folder.clone());
        }
        self.set_use_subfolder(options.use_subfolder);
        self.set_subfolder_name(options.subfolder_name.clone());
        self.page_selection = options.page_selection;

        // Trim last and directly: configured adjusters are explicit
        self.trim = options.trim_mm.max(0.0);
        self.recompute();

        // Aspect-locked sizes always follow the loaded page, whatever the trim
        if self.effective_size().is_some() {
            let aspect = self.aspect;
            for adj in &mut self.adjusters {
                adj.sync_to_aspect(aspect);
            }
        }
    }

    pub fn to_options(&self) -> ResizeOptions {
        ResizeOptions {
            trim_mm: self.trim,
            outputs: self.adjusters.iter().map(Adjuster::spec).collect(),
            file_name: self.filename.value().to_string(),
            export_folder: self.export_folder.clone(),
            use_subfolder: self.use_subfolder,
            subfolder_name: self.subfolder_name.clone(),
            page_selection: self.page_selection,
        }
    }
}
