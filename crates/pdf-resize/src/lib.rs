mod adjuster;
mod conflict;
pub mod constants;
pub mod export;
pub mod format;
pub mod geometry;
mod io;
mod options;
mod presets;
pub mod render;
mod session;
pub mod tokens;
mod types;

pub use adjuster::{Adjuster, AdjusterId};
pub use conflict::{ConflictEntry, ConflictSet, PrimaryAction, SaveStatus, SaveWorkflow};
pub use export::{DownloadFolder, LocalDisk, OutputPlatform, SaveOutcome, SaveRequest};
pub use io::{DocumentInfo, PageInfo, document_to_bytes, load_pdf, load_pdf_bytes};
pub use options::*;
pub use presets::{Preset, PresetList, default_presets};
pub use session::{LoadedDocument, ResizeSession};
pub use tokens::{FilenameEditor, FilenameToken};
pub use types::*;
