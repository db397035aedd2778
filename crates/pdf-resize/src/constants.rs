//! Shared constants for PDF resizing
//!
//! This module centralizes unit conversion and the fixed values used by the
//! editing session and export.

use std::time::Duration;

// =============================================================================
// Unit Conversion
// =============================================================================

/// Millimeters per point (1 inch = 72 points, 1 inch = 25.4mm)
pub const MM_PER_POINT: f64 = 25.4 / 72.0;

/// Points per millimeter
pub const POINTS_PER_MM: f64 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f64) -> f64 {
    pt * MM_PER_POINT
}

/// Round to two decimal places
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// Dimensions
// =============================================================================

/// Smallest width/height (mm) an adjuster or trimmed page may have
pub const MIN_DIMENSION_MM: f64 = 1.0;

/// Smallest trim margin (mm)
pub const MIN_TRIM_MM: f64 = 0.0;

/// Adjuster size used before any document has been loaded (A4 portrait)
pub const DEFAULT_ADJUSTER_SIZE_MM: (f64, f64) = (210.0, 297.0);

/// Default page width in points when a page has no MediaBox (US Letter)
pub const DEFAULT_PAGE_WIDTH_PT: f64 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f64 = 792.0;

// =============================================================================
// Export
// =============================================================================

/// File name used when the template is empty
pub const FALLBACK_FILE_NAME: &str = "output";

/// Extension appended to every exported file
pub const PDF_EXTENSION: &str = "pdf";

/// Default name of the optional export subfolder
pub const DEFAULT_SUBFOLDER_NAME: &str = "PDF";

/// How long a successful save stays visible before returning to idle
pub const SUCCESS_DISPLAY_DURATION: Duration = Duration::from_secs(5);
