/// VulkanBatch - BatchProvider over a single Vulkan command list

use clear_dispatcher::dispatch::command::{
    transition_render_pass_attachments, BatchProvider, CommandList,
};
use clear_dispatcher::dispatch::resource::{FramebufferState, ImageRegistry};
use clear_dispatcher::dispatch::Result;
use clear_dispatcher::{driver_bail, driver_trace};

use crate::vulkan_command_list::{RenderPassBinding, VulkanCommandList};

const SOURCE: &str = "clear::vulkan";

/// One recording command list plus the render pass it may enter
///
/// `render_pass_batch()` begins the bound render pass if the command list is
/// not already inside one, after moving the attachments into the
/// `COLOR_ATTACHMENT_OPTIMAL` / `DEPTH_STENCIL_ATTACHMENT_OPTIMAL` layouts
/// the render pass is built for. Without a binding it fails, since there
/// is no render pass to enter.
pub struct VulkanBatch {
    cmd: VulkanCommandList,
    render_pass: Option<RenderPassBinding>,
}

impl VulkanBatch {
    pub fn new(cmd: VulkanCommandList) -> Self {
        Self {
            cmd,
            render_pass: None,
        }
    }

    /// Set the render pass entered by `render_pass_batch()`
    pub fn bind_render_pass(&mut self, binding: Option<RenderPassBinding>) {
        self.render_pass = binding;
    }

    pub fn command_list(&self) -> &VulkanCommandList {
        &self.cmd
    }

    pub fn command_list_mut(&mut self) -> &mut VulkanCommandList {
        &mut self.cmd
    }

    /// End the render pass if one is active, then stop recording
    pub fn finish(&mut self) -> Result<()> {
        if self.cmd.in_render_pass() {
            self.cmd.end_render_pass()?;
        }
        self.cmd.end()
    }

    pub fn into_command_list(self) -> VulkanCommandList {
        self.cmd
    }
}

impl BatchProvider for VulkanBatch {
    fn current_batch(&mut self) -> Result<&mut dyn CommandList> {
        Ok(&mut self.cmd)
    }

    fn render_pass_batch(
        &mut self,
        framebuffer: &FramebufferState,
        images: &mut ImageRegistry,
    ) -> Result<&mut dyn CommandList> {
        if !self.cmd.in_render_pass() {
            let Some(binding) = self.render_pass else {
                driver_bail!(SOURCE, "No render pass bound to the batch");
            };
            let transitions = transition_render_pass_attachments(&mut self.cmd, framebuffer, images)?;
            driver_trace!(
                SOURCE,
                "Entering render pass {:?} ({} attachment transition(s))",
                binding.render_pass,
                transitions
            );
            self.cmd.begin_render_pass(&binding)?;
        }
        Ok(&mut self.cmd)
    }
}
