/// Pure shape checks used to pick a clear path

use crate::clear::ScissorRect;
use crate::resource::{AttachmentView, ImageDimension};

/// Axis-aligned rectangle, `x1`/`y1` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x0: i32,
    pub x1: i32,
    pub y0: i32,
    pub y1: i32,
}

impl Rect {
    pub fn new(x0: i32, x1: i32, y0: i32, y1: i32) -> Self {
        Self { x0, x1, y0, y1 }
    }

    /// The `[0,width) x [0,height)` framebuffer extent
    pub fn extent(width: u32, height: u32) -> Self {
        Self::new(0, clamp_to_i32(width), 0, clamp_to_i32(height))
    }

    /// Returns true unless the rectangles are strictly apart
    ///
    /// Rectangles sharing only an edge count as intersecting; their
    /// intersection is empty.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.x1 < other.x0 || other.x1 < self.x0 || self.y1 < other.y0 || other.y1 < self.y0)
    }

    /// Intersection of both rectangles, `None` when they are strictly apart
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }

        Some(Rect {
            x0: self.x0.max(other.x0),
            x1: self.x1.min(other.x1),
            y0: self.y0.max(other.y0),
            y1: self.y1.min(other.y1),
        })
    }
}

impl From<ScissorRect> for Rect {
    fn from(scissor: ScissorRect) -> Self {
        Rect::new(
            clamp_to_i32(scissor.min_x),
            clamp_to_i32(scissor.max_x),
            clamp_to_i32(scissor.min_y),
            clamp_to_i32(scissor.max_y),
        )
    }
}

fn clamp_to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Returns true if `rect` covers the whole `width x height` framebuffer
///
/// A rectangle strictly apart from the framebuffer covers nothing.
pub fn covers_full_extent(rect: &Rect, width: u32, height: u32) -> bool {
    let extent = Rect::extent(width, height);
    rect.intersection(&extent) == Some(extent)
}

/// Returns true if `view` may be cleared with a direct image clear
///
/// Drivers report a single indivisible layer for 3D images, so a view of
/// a 3D image qualifies only when it addresses exactly layer 0.
pub fn direct_clear_supported(view: &AttachmentView, dimension: ImageDimension) -> bool {
    if !dimension.is_volume() {
        return true;
    }

    view.first_layer() == 0 && view.last_layer() == view.first_layer()
}

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
