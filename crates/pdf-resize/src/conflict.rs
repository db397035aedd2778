//! Save workflow and same-name conflict resolution
//!
//! ```text
//! Idle -> Saving -> { Success | Conflict | Error } -> Idle
//!                        Conflict -> Saving (resolve) | Idle (cancel)
//! ```
//!
//! Every save attempt gets a generation number. Completions and the success
//! timeout carry it, so results of a superseded attempt are ignored.

use crate::types::{ResizeError, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Success,
    Conflict,
    Error(String),
}

impl SaveStatus {
    pub fn label(&self) -> &str {
        match self {
            SaveStatus::Idle => "Save",
            SaveStatus::Saving => "Saving…",
            SaveStatus::Success => "Saved",
            SaveStatus::Conflict => "File exists",
            SaveStatus::Error(_) => "Error",
        }
    }
}

/// One proposed output file
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictEntry {
    /// File name including the extension
    pub file_name: String,
    pub is_conflict: bool,
    pub should_overwrite: bool,
    pub original_path: PathBuf,
}

/// Label of the button that resolves a conflict set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    Overwrite,
    Continue,
}

impl PrimaryAction {
    pub fn label(self) -> &'static str {
        match self {
            PrimaryAction::Overwrite => "Overwrite",
            PrimaryAction::Continue => "Continue",
        }
    }
}

/// Per-output overwrite decisions, one entry per adjuster in list order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConflictSet {
    entries: Vec<ConflictEntry>,
}

impl ConflictSet {
    /// Build from proposed paths and the parallel result of an existence check.
    /// Every entry starts out flagged for overwrite.
    pub fn from_existence(paths: &[PathBuf], exists: &[bool]) -> Self {
        let entries = paths
            .iter()
            .enumerate()
            .map(|(i, path)| ConflictEntry {
                file_name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                is_conflict: exists.get(i).copied().unwrap_or(false),
                should_overwrite: true,
                original_path: path.clone(),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[ConflictEntry] {
        &self.entries
    }

    pub fn has_conflicts(&self) -> bool {
        self.entries.iter().any(|e| e.is_conflict)
    }

    pub fn conflict_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_conflict).count()
    }

    /// Flip the overwrite flag of a conflicting entry.
    /// Non-conflicting entries always write and cannot be toggled.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) if entry.is_conflict => {
                entry.should_overwrite = !entry.should_overwrite;
                true
            }
            _ => false,
        }
    }

    /// Untick every conflicting entry
    pub fn skip_all_conflicts(&mut self) {
        for entry in self.entries.iter_mut().filter(|e| e.is_conflict) {
            entry.should_overwrite = false;
        }
    }

    pub fn has_conflicts_to_overwrite(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.is_conflict && e.should_overwrite)
    }

    pub fn primary_action(&self) -> PrimaryAction {
        if self.has_conflicts_to_overwrite() {
            PrimaryAction::Overwrite
        } else {
            PrimaryAction::Continue
        }
    }

    /// Indices of the outputs to write, ascending
    pub fn selected_indices(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_conflict || e.should_overwrite)
            .map(|(i, _)| i)
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SaveWorkflow {
    status: SaveStatus,
    conflicts: Option<ConflictSet>,
    generation: u64,
}

impl SaveWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &SaveStatus {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_saving(&self) -> bool {
        self.status == SaveStatus::Saving
    }

    pub fn conflicts(&self) -> Option<&ConflictSet> {
        self.conflicts.as_ref()
    }

    pub fn conflicts_mut(&mut self) -> Option<&mut ConflictSet> {
        self.conflicts.as_mut()
    }

    /// Start a save attempt. Returns its generation.
    pub fn begin(&mut self) -> Result<u64> {
        if self.is_saving() {
            return Err(ResizeError::Busy);
        }
        self.generation += 1;
        self.status = SaveStatus::Saving;
        self.conflicts = None;
        Ok(self.generation)
    }

    fn is_current(&self, generation: u64) -> bool {
        generation == self.generation && self.is_saving()
    }

    pub fn complete_success(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.status = SaveStatus::Success;
        true
    }

    pub fn complete_conflict(&mut self, generation: u64, conflicts: ConflictSet) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.status = SaveStatus::Conflict;
        self.conflicts = Some(conflicts);
        true
    }

    pub fn complete_error(&mut self, generation: u64, message: impl Into<String>) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.status = SaveStatus::Error(message.into());
        true
    }

    /// Accept the current conflict decisions and go back to `Saving`.
    ///
    /// Returns the new generation and the indices of the outputs to write.
    pub fn resolve(&mut self) -> Result<(u64, Vec<usize>)> {
        if self.status != SaveStatus::Conflict {
            return Err(ResizeError::Config("No conflict to resolve".to_string()));
        }
        let selected = self
            .conflicts
            .take()
            .map(|set| set.selected_indices())
            .unwrap_or_default();
        self.generation += 1;
        self.status = SaveStatus::Saving;
        Ok((self.generation, selected))
    }

    /// Drop the conflict set without writing anything
    pub fn cancel(&mut self) {
        if self.status == SaveStatus::Conflict {
            self.conflicts = None;
            self.status = SaveStatus::Idle;
        }
    }

    pub fn acknowledge_error(&mut self) {
        if matches!(self.status, SaveStatus::Error(_)) {
            self.status = SaveStatus::Idle;
        }
    }

    /// Return to idle once the success message has been shown, unless a newer save started
    pub fn expire_success(&mut self, generation: u64) -> bool {
        if self.status == SaveStatus::Success && generation == self.generation {
            self.status = SaveStatus::Idle;
            return true;
        }
        false
    }

    /// Target paths changed (folder or subfolder); anything pending is stale
    pub fn invalidate_targets(&mut self) {
        if self.status != SaveStatus::Idle {
            self.reset();
        }
    }

    pub fn reset(&mut self) {
        self.generation += 1;
        self.status = SaveStatus::Idle;
        self.conflicts = None;
    }
}
