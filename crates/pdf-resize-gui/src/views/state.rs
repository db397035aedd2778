use pdf_async_runtime::OutputTarget;
use pdf_resize::constants::{MIN_DIMENSION_MM, MIN_TRIM_MM};
use pdf_resize::format::NumericField;
use pdf_resize::{AdjusterId, Preset, ResizeSession};
use std::collections::HashMap;
use std::ops::Range;
use std::path::PathBuf;

pub struct DimensionFields {
    pub width: NumericField,
    pub height: NumericField,
}

/// Input buffers and UI-only choices that live next to the session
pub struct ViewState {
    pub trim: NumericField,
    pub dims: HashMap<AdjusterId, DimensionFields>,
    /// Adjuster whose crop is drawn over the page
    pub focused: Option<AdjusterId>,
    /// Last known selection in the file name field, in bytes
    pub filename_selection: Option<Range<usize>>,
    pub subfolder_name: String,
    /// When set, saves go to this directory without an existence check
    pub download_dir: Option<PathBuf>,
    pub show_presets: bool,
    pub preset_editor: PresetEditor,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            trim: NumericField::new(0.0, MIN_TRIM_MM),
            dims: HashMap::new(),
            focused: None,
            filename_selection: None,
            subfolder_name: String::new(),
            download_dir: None,
            show_presets: false,
            preset_editor: PresetEditor::default(),
        }
    }
}

impl ViewState {
    /// Bring every buffer in line with the session. Buffers holding an
    /// uncommitted edit keep their text.
    pub fn sync(&mut self, session: &ResizeSession) {
        self.trim.sync(session.trim());

        let ids: Vec<AdjusterId> = session.adjusters().iter().map(|a| a.id()).collect();
        self.dims.retain(|id, _| ids.contains(id));
        for adj in session.adjusters() {
            let fields = self.dims.entry(adj.id()).or_insert_with(|| DimensionFields {
                width: NumericField::new(adj.width(), MIN_DIMENSION_MM),
                height: NumericField::new(adj.height(), MIN_DIMENSION_MM),
            });
            fields.width.sync(adj.width());
            fields.height.sync(adj.height());
        }

        if self.focused.is_none_or(|id| !ids.contains(&id)) {
            self.focused = ids.first().copied();
        }
        if self.subfolder_name != session.subfolder_name() {
            self.subfolder_name = session.subfolder_name().to_string();
        }
    }

    /// Forget edits tied to the previous document
    pub fn reset_for_document(&mut self) {
        self.filename_selection = None;
    }

    pub fn output_target(&self) -> OutputTarget {
        match &self.download_dir {
            Some(dir) => OutputTarget::Downloads(dir.clone()),
            None => OutputTarget::Disk,
        }
    }
}

/// Add/edit form of the presets window
pub struct PresetEditor {
    pub name: String,
    pub width: NumericField,
    pub height: NumericField,
    /// Index being edited; `None` adds a new preset
    pub editing: Option<usize>,
    pub error: Option<String>,
}

impl Default for PresetEditor {
    fn default() -> Self {
        Self {
            name: String::new(),
            width: NumericField::new(210.0, MIN_DIMENSION_MM),
            height: NumericField::new(297.0, MIN_DIMENSION_MM),
            editing: None,
            error: None,
        }
    }
}

impl PresetEditor {
    pub fn edit(&mut self, index: usize, preset: &Preset) {
        self.name = preset.name.clone();
        self.width = NumericField::new(preset.width, MIN_DIMENSION_MM);
        self.height = NumericField::new(preset.height, MIN_DIMENSION_MM);
        self.editing = Some(index);
        self.error = None;
    }

    pub fn preset(&self) -> Preset {
        Preset::new(self.name.trim(), self.width.value(), self.height.value())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
