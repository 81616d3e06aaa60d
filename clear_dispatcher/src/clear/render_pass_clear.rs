/// Render-pass-scoped clears (`clear_attachments`)
///
/// Valid for any request shape. The batch is obtained through
/// `BatchProvider::render_pass_batch()`, which is responsible for entering a
/// render pass when none is active; nothing here begins one.

use crate::clear::{ClearBuffers, ClearRequest, ScissorRect};
use crate::command::{BatchProvider, ClearAttachment, ClearRect, ClearValue, Rect2D};
use crate::error::Result;
use crate::resource::{AspectFlags, FramebufferState, ImageRegistry};
use crate::{driver_trace, driver_warn};

const SOURCE: &str = "clear::RenderPassClear";

/// One descriptor per selected and bound attachment, color slots first
pub fn build_clear_attachments(
    framebuffer: &FramebufferState,
    request: &ClearRequest,
) -> Vec<ClearAttachment> {
    let mut attachments = Vec::new();
    let color = request.color.to_array();

    for (index, _) in framebuffer.color_attachments() {
        if request.buffers.selects_color(index) {
            attachments.push(ClearAttachment {
                aspect: AspectFlags::COLOR,
                color_attachment: index as u32,
                value: ClearValue::Color(color),
            });
        }
    }

    let requested = request.buffers.depth_stencil_aspects();
    if requested.is_empty() {
        return attachments;
    }

    match framebuffer.depth_stencil_attachment() {
        Some(view) => {
            let aspect = requested & view.format().aspects();
            if aspect.is_empty() {
                driver_warn!(SOURCE, "Format {:?} has none of the requested aspects {:?}", view.format(), requested);
            } else {
                attachments.push(ClearAttachment {
                    aspect,
                    color_attachment: 0,
                    value: ClearValue::DepthStencil {
                        depth: request.depth as f32,
                        stencil: request.stencil,
                    },
                });
            }
        }
        None => {
            driver_warn!(SOURCE, "Depth/stencil clear requested with no depth/stencil attachment bound");
        }
    }

    attachments
}

/// Clear rectangle for `scissor`, clamped to the framebuffer
///
/// Without a scissor the whole framebuffer is covered. The layer span is
/// always the framebuffer's full layer count.
pub fn clear_rect(framebuffer: &FramebufferState, scissor: Option<ScissorRect>) -> ClearRect {
    let rect = match scissor {
        Some(scissor) => {
            let width = scissor
                .max_x
                .saturating_sub(scissor.min_x)
                .min(framebuffer.width().saturating_sub(scissor.min_x));
            let height = scissor
                .max_y
                .saturating_sub(scissor.min_y)
                .min(framebuffer.height().saturating_sub(scissor.min_y));
            Rect2D {
                x: i32::try_from(scissor.min_x).unwrap_or(i32::MAX),
                y: i32::try_from(scissor.min_y).unwrap_or(i32::MAX),
                width,
                height,
            }
        }
        None => Rect2D {
            x: 0,
            y: 0,
            width: framebuffer.width(),
            height: framebuffer.height(),
        },
    };

    ClearRect {
        rect,
        base_array_layer: 0,
        layer_count: framebuffer.num_layers(),
    }
}

/// Record one `clear_attachments` covering every selected attachment
///
/// Returns false when there was nothing to clear (no descriptor, empty
/// rectangle or no layer), in which case no batch is requested and
/// nothing is recorded.
pub fn clear_in_render_pass(
    batches: &mut dyn BatchProvider,
    framebuffer: &FramebufferState,
    images: &mut ImageRegistry,
    request: &ClearRequest,
) -> Result<bool> {
    let attachments = build_clear_attachments(framebuffer, request);
    if attachments.is_empty() {
        driver_trace!(SOURCE, "No bound attachment selected by {:?}", request.buffers);
        return Ok(false);
    }

    let rect = clear_rect(framebuffer, request.scissor);
    if rect.rect.width == 0 || rect.rect.height == 0 || rect.layer_count == 0 {
        driver_trace!(SOURCE, "Empty clear rectangle {:?}", rect);
        return Ok(false);
    }

    let cmd = batches.render_pass_batch(framebuffer, images)?;
    cmd.clear_attachments(&attachments, &rect)?;
    Ok(true)
}

/// Returns true if `buffers` selects anything this framebuffer has bound
pub fn selects_bound_attachment(framebuffer: &FramebufferState, buffers: ClearBuffers) -> bool {
    let color = framebuffer
        .color_attachments()
        .any(|(index, _)| buffers.selects_color(index));
    let depth_stencil = framebuffer.depth_stencil_attachment().is_some()
        && buffers.intersects(ClearBuffers::DEPTH_STENCIL);
    color || depth_stencil
}

#[cfg(test)]
#[path = "render_pass_clear_tests.rs"]
mod tests;
