//! One requested output size

use crate::constants::{DEFAULT_ADJUSTER_SIZE_MM, MIN_DIMENSION_MM, round2};
use crate::geometry::orient_preset;
use crate::types::{DimensionSource, OutputSpec, Size, SizeMode};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ADJUSTER_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of an adjuster within the process
pub type AdjusterId = u64;

fn next_id() -> AdjusterId {
    NEXT_ADJUSTER_ID.fetch_add(1, Ordering::Relaxed)
}

/// Target output size plus the mode used to map the source onto it.
///
/// Width and height are millimeters and are kept `>= 1` by every setter.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjuster {
    id: AdjusterId,
    pub mode: SizeMode,
    width: f64,
    height: f64,
    pub source: DimensionSource,
}

impl Default for Adjuster {
    fn default() -> Self {
        let (width, height) = DEFAULT_ADJUSTER_SIZE_MM;
        Self::new(SizeMode::Fill, width, height, DimensionSource::PdfDerived)
    }
}

impl Adjuster {
    pub fn new(mode: SizeMode, width: f64, height: f64, source: DimensionSource) -> Self {
        Self {
            id: next_id(),
            mode,
            width: clamp_dimension(width),
            height: clamp_dimension(height),
            source,
        }
    }

    /// Adjuster matching a page, as created when a document is loaded
    pub fn from_page(page: Size) -> Self {
        Self::new(
            SizeMode::Fill,
            round2(page.width),
            round2(page.height),
            DimensionSource::PdfDerived,
        )
    }

    /// Copy with a fresh id
    pub fn duplicate(&self) -> Self {
        Self {
            id: next_id(),
            ..self.clone()
        }
    }

    pub fn id(&self) -> AdjusterId {
        self.id
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn spec(&self) -> OutputSpec {
        OutputSpec::new(self.mode, self.width, self.height)
    }

    /// Adjuster for a configured output; user supplied, so tagged manual
    pub fn from_spec(spec: &OutputSpec) -> Self {
        Self::new(
            spec.mode,
            spec.width_mm,
            spec.height_mm,
            DimensionSource::Manual,
        )
    }

    /// Replace both dimensions and their provenance
    pub fn set_dimensions(&mut self, size: Size, source: DimensionSource) {
        self.width = clamp_dimension(size.width);
        self.height = clamp_dimension(size.height);
        self.source = source;
    }

    /// Switch mode, recomputing the dimension that now follows the aspect ratio
    pub fn set_mode(&mut self, mode: SizeMode, aspect: f64) {
        self.mode = mode;
        self.sync_to_aspect(aspect);
    }

    /// User edit of the width. In SetHeight mode the height follows.
    pub fn set_width(&mut self, width: f64, aspect: f64) {
        self.width = clamp_dimension(width);
        if self.mode == SizeMode::SetHeight && aspect > 0.0 {
            self.height = clamp_dimension(round2(self.width / aspect));
        }
        self.source = DimensionSource::Manual;
    }

    /// User edit of the height. In SetWidth mode the width follows.
    pub fn set_height(&mut self, height: f64, aspect: f64) {
        self.height = clamp_dimension(height);
        if self.mode == SizeMode::SetWidth && aspect > 0.0 {
            self.width = clamp_dimension(round2(self.height * aspect));
        }
        self.source = DimensionSource::Manual;
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.width, &mut self.height);
        self.source = DimensionSource::Manual;
    }

    /// Apply a preset, oriented to match the source
    pub fn apply_preset(&mut self, preset: Size, aspect: f64) {
        let oriented = orient_preset(preset, aspect);
        self.width = clamp_dimension(oriented.width);
        self.height = clamp_dimension(oriented.height);
        self.mode = SizeMode::Fill;
        self.source = DimensionSource::PdfDerived;
    }

    /// Recompute the aspect-locked dimension after the source aspect changed.
    /// Fill adjusters are left alone.
    pub fn sync_to_aspect(&mut self, aspect: f64) {
        if !(aspect.is_finite() && aspect > 0.0) {
            return;
        }
        match self.mode {
            SizeMode::SetHeight => self.height = clamp_dimension(round2(self.width / aspect)),
            SizeMode::SetWidth => self.width = clamp_dimension(round2(self.height * aspect)),
            SizeMode::Fill => {}
        }
    }
}

fn clamp_dimension(value: f64) -> f64 {
    if value.is_finite() {
        value.max(MIN_DIMENSION_MM)
    } else {
        MIN_DIMENSION_MM
    }
}
