use std::path::PathBuf;
use thiserror::Error;

// Re-export types from the library crate
pub use pdf_resize::{
    ConflictSet, DocumentInfo, PresetList, ResizeOptions, SaveOutcome, SaveRequest,
};

/// Commands sent from UI to worker
#[derive(Debug)]
pub enum PdfCommand {
    Load {
        path: PathBuf,
    },
    /// Check targets and write every output unless something conflicts
    Save {
        doc_id: DocumentId,
        generation: u64,
        request: SaveRequest,
        target: OutputTarget,
    },
    /// Write only the outputs at `indices` after a conflict was resolved
    WriteSelected {
        doc_id: DocumentId,
        generation: u64,
        request: SaveRequest,
        indices: Vec<usize>,
        target: OutputTarget,
    },
    Close {
        doc_id: DocumentId,
    },
    LoadConfig {
        path: PathBuf,
    },
    SaveConfig {
        path: PathBuf,
        options: ResizeOptions,
    },
    LoadPresets {
        path: PathBuf,
    },
    SavePresets {
        path: PathBuf,
        presets: PresetList,
    },
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum PdfUpdate {
    Loaded {
        doc_id: DocumentId,
        path: PathBuf,
        file_name: String,
        info: DocumentInfo,
    },
    SaveComplete {
        generation: u64,
        paths: Vec<PathBuf>,
    },
    SaveConflict {
        generation: u64,
        request: SaveRequest,
        conflicts: ConflictSet,
    },
    SaveFailed {
        generation: u64,
        message: String,
    },
    Closed {
        doc_id: DocumentId,
    },
    ConfigLoaded {
        options: ResizeOptions,
    },
    ConfigSaved {
        path: PathBuf,
    },
    PresetsLoaded {
        presets: PresetList,
    },
    PresetsSaved {
        path: PathBuf,
    },
    Error {
        message: String,
    },
}

/// Handle to a loaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

/// Where a save writes its files
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputTarget {
    /// The chosen export folder, with conflict detection
    #[default]
    Disk,
    /// A downloads directory, no conflict detection
    Downloads(PathBuf),
}

/// Failure to reach the worker
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("Worker is not running")]
    Disconnected,
}
