//! Size and crop geometry
//!
//! Everything here is pure math over millimeters (the editing model) or
//! points (export). The same [`compute_transform`] drives both the preview
//! overlay and the page placement written to the output document.

use crate::constants::{MIN_DIMENSION_MM, mm_to_pt, pt_to_mm};
use crate::types::{Insets, Rect, Size, SizeMode};

/// Untrimmed size of one source page in millimeters, as displayed
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
}

impl PageGeometry {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Convert native point dimensions, applying the page's `/Rotate`.
    /// Quarter turns swap width and height.
    pub fn from_points(width_pt: f64, height_pt: f64, rotation: i64) -> Self {
        let (w, h) = if rotation.rem_euclid(180) == 90 {
            (height_pt, width_pt)
        } else {
            (width_pt, height_pt)
        };
        Self::new(pt_to_mm(w), pt_to_mm(h))
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Page size after removing `trim` from every edge, never below 1 mm
pub fn effective_size(page: PageGeometry, trim_mm: f64) -> Size {
    clamp_trimmed(page.size(), trim_mm, MIN_DIMENSION_MM)
}

fn clamp_trimmed(size: Size, trim: f64, min: f64) -> Size {
    let trim = trim.max(0.0);
    Size::new(
        (size.width - 2.0 * trim).max(min),
        (size.height - 2.0 * trim).max(min),
    )
}

/// Width over height of the effective source
pub fn aspect_ratio(effective: Size) -> f64 {
    if effective.height <= 0.0 {
        return 1.0;
    }
    effective.width / effective.height
}

/// How the effective source is placed inside the target box.
///
/// `excess_*` is the overflow on each side of the target (in target units)
/// that Fill mode crops away; it is zero in the stretch modes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub excess_x: f64,
    pub excess_y: f64,
}

/// Map `source` onto `target` according to `mode`. Both sizes share one unit.
pub fn compute_transform(source: Size, target: Size, mode: SizeMode) -> Transform {
    let source_w = if source.width > 0.0 { source.width } else { 1.0 };
    let source_h = if source.height > 0.0 { source.height } else { 1.0 };

    match mode {
        SizeMode::Fill => {
            let scale = (target.width / source_w).max(target.height / source_h);
            let scaled_w = source_w * scale;
            let scaled_h = source_h * scale;
            Transform {
                scale_x: scale,
                scale_y: scale,
                offset_x: (target.width - scaled_w) / 2.0,
                offset_y: (target.height - scaled_h) / 2.0,
                excess_x: (scaled_w - target.width) / 2.0,
                excess_y: (scaled_h - target.height) / 2.0,
            }
        }
        SizeMode::SetWidth | SizeMode::SetHeight => Transform {
            scale_x: target.width / source_w,
            scale_y: target.height / source_h,
            ..Transform::default()
        },
    }
}

/// Insets (mm, relative to the untrimmed page) of the region that ends up
/// in the output: the trim on every edge plus, in Fill mode, the overflow
/// expressed back in source millimeters.
pub fn crop_overlay(page: PageGeometry, trim_mm: f64, target: Size, mode: SizeMode) -> Insets {
    let trim = trim_mm.max(0.0);
    let effective = effective_size(page, trim);
    let mut insets = Insets::uniform(trim);

    if mode == SizeMode::Fill {
        let transform = compute_transform(effective, target, mode);
        if transform.scale_x > 0.0 {
            let excess_w = transform.excess_x / transform.scale_x;
            let excess_h = transform.excess_y / transform.scale_y;
            insets.left += excess_w;
            insets.right += excess_w;
            insets.top += excess_h;
            insets.bottom += excess_h;
        }
    }
    insets
}

/// Orient a preset to match the source: swapped when the preset's
/// orientation differs from `aspect` (portrait when `aspect <= 1`)
pub fn orient_preset(preset: Size, aspect: f64) -> Size {
    let source_portrait = aspect <= 1.0;
    if preset.is_portrait() != source_portrait {
        preset.swapped()
    } else {
        preset
    }
}

/// Everything export needs to place one source page on one output page (points)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportPlacement {
    /// Region of the source page kept after trimming, in source user space
    pub crop: Rect,
    /// Output page size
    pub target: Size,
    /// Placement of the crop (lower-left at origin) inside the output page
    pub transform: Transform,
}

/// Compute the placement for a source page with the given MediaBox.
///
/// Trim and target come from the editing model in millimeters and are
/// converted with the fixed point factor.
pub fn export_placement(
    media_box: Rect,
    trim_mm: f64,
    target_mm: Size,
    mode: SizeMode,
) -> ExportPlacement {
    let trim_pt = mm_to_pt(trim_mm.max(0.0));
    let cropped = clamp_trimmed(
        Size::new(media_box.width, media_box.height),
        trim_pt,
        mm_to_pt(MIN_DIMENSION_MM),
    );
    let crop = Rect::new(
        media_box.x + trim_pt,
        media_box.y + trim_pt,
        cropped.width,
        cropped.height,
    );
    let target = Size::new(mm_to_pt(target_mm.width), mm_to_pt(target_mm.height));
    let transform = compute_transform(cropped, target, mode);

    ExportPlacement {
        crop,
        target,
        transform,
    }
}
