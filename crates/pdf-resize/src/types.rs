use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Document has no pages")]
    NoPages,
    #[error("Page {index} is out of range (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),
    #[error("A save is already in progress")]
    Busy,
}

pub type Result<T> = std::result::Result<T, ResizeError>;

/// How an adjuster maps the trimmed source onto its target size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SizeMode {
    /// Uniform scale to cover the target, overflow is center-cropped
    #[default]
    Fill,
    /// Height is typed, width follows the source aspect ratio
    SetWidth,
    /// Width is typed, height follows the source aspect ratio
    SetHeight,
}

impl SizeMode {
    pub const ALL: [SizeMode; 3] = [SizeMode::Fill, SizeMode::SetWidth, SizeMode::SetHeight];

    pub fn label(self) -> &'static str {
        match self {
            SizeMode::Fill => "Fill",
            SizeMode::SetWidth => "Set Width",
            SizeMode::SetHeight => "Set Height",
        }
    }
}

/// Provenance of an adjuster's dimensions.
///
/// Derived values follow page and trim changes, manual values are left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DimensionSource {
    #[default]
    PdfDerived,
    TrimmedDerived,
    Manual,
}

impl DimensionSource {
    pub fn is_derived(self) -> bool {
        matches!(
            self,
            DimensionSource::PdfDerived | DimensionSource::TrimmedDerived
        )
    }
}

/// Which pages of the source document are exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageSelection {
    /// Only the page currently shown
    #[default]
    Single,
    /// Every page, in ascending order
    All,
}

impl PageSelection {
    /// Page indices to process for a document with `page_count` pages
    pub fn pages(self, current_page: usize, page_count: usize) -> Vec<usize> {
        match self {
            PageSelection::Single => vec![current_page],
            PageSelection::All => (0..page_count.max(1)).collect(),
        }
    }
}

/// Plain description of one output: target size in millimeters plus mode
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputSpec {
    #[cfg_attr(feature = "serde", serde(default))]
    pub mode: SizeMode,
    pub width_mm: f64,
    pub height_mm: f64,
}

impl OutputSpec {
    pub const fn new(mode: SizeMode, width_mm: f64, height_mm: f64) -> Self {
        Self {
            mode,
            width_mm,
            height_mm,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width_mm, self.height_mm)
    }
}

/// A width/height pair. Units depend on context (millimeters in the model, points in export).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Portrait when `width <= height`
    pub fn is_portrait(&self) -> bool {
        self.width <= self.height
    }

    pub fn swapped(self) -> Self {
        Self::new(self.height, self.width)
    }
}

/// Axis-aligned rectangle in PDF user space (origin bottom-left)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }
}

/// Distances from each edge, used for the crop overlay
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self {
            top: self.top * factor,
            right: self.right * factor,
            bottom: self.bottom * factor,
            left: self.left * factor,
        }
    }
}
