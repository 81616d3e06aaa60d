/// BatchProvider trait - access to the current recording target

use crate::command::CommandList;
use crate::error::Result;
use crate::resource::{FramebufferState, ImageLayout, ImageRegistry};
use crate::driver_warn;

const SOURCE: &str = "clear::Batch";

/// Source of recording targets for one graphics context
///
/// Exactly one batch is current at a time. The clear path asks for it in
/// one of two ways and never begins or ends render passes itself.
pub trait BatchProvider {
    /// The current batch, inside or outside a render pass
    fn current_batch(&mut self) -> Result<&mut dyn CommandList>;

    /// A batch inside a render pass over `framebuffer`
    ///
    /// When the current batch is outside a render pass, implementations
    /// move the attachment images into the layouts their render pass
    /// expects (see `transition_render_pass_attachments()`), then begin it.
    /// Every layout change goes through `images` so the tracked layouts
    /// stay in step with the batch.
    fn render_pass_batch(
        &mut self,
        framebuffer: &FramebufferState,
        images: &mut ImageRegistry,
    ) -> Result<&mut dyn CommandList>;
}

/// Move every bound attachment image of `framebuffer` to its attachment layout
///
/// Color images go to `ColorAttachment`, the depth/stencil image to
/// `DepthStencilAttachment`. Images already there are left alone and
/// unregistered images are skipped. Must be recorded outside a render pass.
///
/// Returns the number of barriers recorded.
pub fn transition_render_pass_attachments(
    cmd: &mut dyn CommandList,
    framebuffer: &FramebufferState,
    images: &mut ImageRegistry,
) -> Result<u32> {
    let targets = framebuffer
        .color_attachments()
        .map(|(_, view)| (view, ImageLayout::ColorAttachment))
        .chain(
            framebuffer
                .depth_stencil_attachment()
                .map(|view| (view, ImageLayout::DepthStencilAttachment)),
        );

    let mut transitions = 0;
    for (view, layout) in targets {
        let Some(image) = images.get_mut(view.image()) else {
            driver_warn!(SOURCE, "Render pass attachment references a missing image");
            continue;
        };
        if image.layout() != layout {
            let aspects = image.format().aspects();
            image.transition(cmd, aspects, layout)?;
            transitions += 1;
        }
    }

    Ok(transitions)
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
