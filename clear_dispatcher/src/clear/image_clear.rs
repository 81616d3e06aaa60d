/// Direct image clears (`clear_color_image` / `clear_depth_stencil_image`)
///
/// One attachment at a time, outside any render pass, for requests covering
/// the whole framebuffer. Each call moves the image to a layout accepting
/// transfer writes when needed and clears the view's mip level and layers.

use glam::Vec4;
use crate::clear::color::resolve_clear_color;
use crate::clear::geometry::direct_clear_supported;
use crate::command::{CommandList, SubresourceRange};
use crate::error::Result;
use crate::resource::{AspectFlags, AttachmentView, ImageLayout, ImageRegistry, ImageResource};
use crate::{driver_trace, driver_warn};

const SOURCE: &str = "clear::ImageClear";

/// Result of one direct attachment clear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectClearStatus {
    /// The clear was recorded, preceded by a barrier if `transitioned`
    Emitted { transitioned: bool },
    /// Nothing to do for this attachment (missing image, no matching aspect)
    Skipped,
    /// The view cannot be cleared directly; the whole request must go
    /// through the render-pass path. Nothing was recorded.
    FallbackRequired,
}

fn view_range(view: &AttachmentView, aspect: AspectFlags) -> SubresourceRange {
    SubresourceRange {
        aspect,
        base_mip_level: view.mip_level(),
        level_count: 1,
        base_array_layer: view.first_layer(),
        layer_count: view.layer_count(),
    }
}

fn prepare_for_transfer(
    cmd: &mut dyn CommandList,
    image: &mut ImageResource,
    aspect: AspectFlags,
) -> Result<bool> {
    if image.layout().accepts_transfer_writes() {
        return Ok(false);
    }

    driver_trace!(SOURCE, "Transition {:?} {:?} -> TransferDst", image.handle(), image.layout());
    image.transition(cmd, aspect, ImageLayout::TransferDst)?;
    Ok(true)
}

/// Clear one color attachment directly
pub fn clear_color_attachment(
    cmd: &mut dyn CommandList,
    images: &mut ImageRegistry,
    view: &AttachmentView,
    color: Vec4,
) -> Result<DirectClearStatus> {
    let Some(image) = images.get_mut(view.image()) else {
        driver_warn!(SOURCE, "Color attachment references a missing image");
        return Ok(DirectClearStatus::Skipped);
    };

    if !direct_clear_supported(view, image.info().dimension) {
        return Ok(DirectClearStatus::FallbackRequired);
    }

    let transitioned = prepare_for_transfer(cmd, image, AspectFlags::COLOR)?;
    let value = resolve_clear_color(color, view.format(), image.format());
    let range = view_range(view, AspectFlags::COLOR);

    cmd.clear_color_image(image.handle(), image.layout(), value, &range)?;
    Ok(DirectClearStatus::Emitted { transitioned })
}

/// Clear the depth/stencil attachment directly
///
/// Only the `requested` aspects the image format actually has are
/// cleared. The barrier, when needed, covers every aspect of the format
/// since the image carries a single layout.
pub fn clear_depth_stencil_attachment(
    cmd: &mut dyn CommandList,
    images: &mut ImageRegistry,
    view: &AttachmentView,
    requested: AspectFlags,
    depth: f64,
    stencil: u32,
) -> Result<DirectClearStatus> {
    let Some(image) = images.get_mut(view.image()) else {
        driver_warn!(SOURCE, "Depth/stencil attachment references a missing image");
        return Ok(DirectClearStatus::Skipped);
    };

    if !direct_clear_supported(view, image.info().dimension) {
        return Ok(DirectClearStatus::FallbackRequired);
    }

    let format_aspects = image.format().aspects();
    let aspect = requested & format_aspects;
    if aspect.is_empty() {
        driver_warn!(SOURCE, "Format {:?} has none of the requested aspects {:?}", image.format(), requested);
        return Ok(DirectClearStatus::Skipped);
    }

    let transitioned = prepare_for_transfer(cmd, image, format_aspects)?;
    let range = view_range(view, aspect);

    cmd.clear_depth_stencil_image(image.handle(), image.layout(), depth as f32, stencil, &range)?;
    Ok(DirectClearStatus::Emitted { transitioned })
}

#[cfg(test)]
#[path = "image_clear_tests.rs"]
mod tests;
