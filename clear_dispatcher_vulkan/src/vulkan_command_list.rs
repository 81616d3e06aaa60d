/// VulkanCommandList - Vulkan implementation of the CommandList trait

use ash::vk;
use clear_dispatcher::dispatch::command::{
    ClearAttachment, ClearRect, CommandList, ImageBarrier, SubresourceRange,
};
use clear_dispatcher::dispatch::resource::{ImageHandle, ImageLayout};
use clear_dispatcher::dispatch::Result;
use clear_dispatcher::{driver_bail, driver_err};
use std::sync::Arc;

use crate::vulkan_format::{
    clear_attachment_to_vk, clear_rect_to_vk, image_from_handle, image_layout_to_vk,
    layout_access_mask, layout_stage_mask, subresource_range_to_vk,
};

const SOURCE: &str = "clear::vulkan";

/// Render pass + framebuffer a batch enters on demand
#[derive(Debug, Clone, Copy)]
pub struct RenderPassBinding {
    pub render_pass: vk::RenderPass,
    pub framebuffer: vk::Framebuffer,
    pub extent: vk::Extent2D,
}

/// Vulkan command list
///
/// Owns one primary command buffer and the pool it was allocated from.
pub struct VulkanCommandList {
    /// Vulkan device
    device: Arc<ash::Device>,
    /// Command pool for allocating the command buffer
    command_pool: vk::CommandPool,
    /// Command buffer for recording
    command_buffer: vk::CommandBuffer,
    /// Whether the command list is currently recording
    is_recording: bool,
    /// Whether we're inside a render pass
    in_render_pass: bool,
}

impl VulkanCommandList {
    /// Create a new command list
    ///
    /// # Arguments
    ///
    /// * `device` - Vulkan logical device
    /// * `queue_family` - Queue family the command buffer will be submitted to
    pub fn new(device: Arc<ash::Device>, queue_family: u32) -> Result<Self> {
        unsafe {
            let command_pool_create_info = vk::CommandPoolCreateInfo::default()
                .queue_family_index(queue_family)
                .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);

            let command_pool = device
                .create_command_pool(&command_pool_create_info, None)
                .map_err(|e| driver_err!(SOURCE, "Failed to create command pool: {:?}", e))?;

            let command_buffer_allocate_info = vk::CommandBufferAllocateInfo::default()
                .command_pool(command_pool)
                .level(vk::CommandBufferLevel::PRIMARY)
                .command_buffer_count(1);

            let command_buffers = match device.allocate_command_buffers(&command_buffer_allocate_info) {
                Ok(buffers) => buffers,
                Err(e) => {
                    device.destroy_command_pool(command_pool, None);
                    driver_bail!(SOURCE, "Failed to allocate command buffer: {:?}", e);
                }
            };

            Ok(Self {
                device,
                command_pool,
                command_buffer: command_buffers[0],
                is_recording: false,
                in_render_pass: false,
            })
        }
    }

    /// Get the underlying Vulkan command buffer
    pub fn command_buffer(&self) -> vk::CommandBuffer {
        self.command_buffer
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    /// Reset the command buffer and start recording
    pub fn begin(&mut self) -> Result<()> {
        if self.is_recording {
            driver_bail!(SOURCE, "Command list already recording");
        }

        unsafe {
            self.device
                .reset_command_buffer(self.command_buffer, vk::CommandBufferResetFlags::empty())
                .map_err(|e| driver_err!(SOURCE, "Failed to reset command buffer: {:?}", e))?;

            let begin_info = vk::CommandBufferBeginInfo::default()
                .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);

            self.device
                .begin_command_buffer(self.command_buffer, &begin_info)
                .map_err(|e| driver_err!(SOURCE, "Failed to begin command buffer: {:?}", e))?;
        }

        self.is_recording = true;
        self.in_render_pass = false;
        Ok(())
    }

    /// Stop recording; the render pass must have been ended
    pub fn end(&mut self) -> Result<()> {
        self.ensure_recording()?;

        if self.in_render_pass {
            driver_bail!(SOURCE, "Render pass not ended before ending command list");
        }

        unsafe {
            self.device
                .end_command_buffer(self.command_buffer)
                .map_err(|e| driver_err!(SOURCE, "Failed to end command buffer: {:?}", e))?;
        }

        self.is_recording = false;
        Ok(())
    }

    /// Begin `binding`'s render pass over its whole framebuffer
    ///
    /// Attachments are loaded, not cleared, so no clear values are passed.
    pub fn begin_render_pass(&mut self, binding: &RenderPassBinding) -> Result<()> {
        self.ensure_recording()?;

        if self.in_render_pass {
            driver_bail!(SOURCE, "Already inside a render pass");
        }

        let render_pass_info = vk::RenderPassBeginInfo::default()
            .render_pass(binding.render_pass)
            .framebuffer(binding.framebuffer)
            .render_area(vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent: binding.extent,
            });

        unsafe {
            self.device.cmd_begin_render_pass(
                self.command_buffer,
                &render_pass_info,
                vk::SubpassContents::INLINE,
            );
        }

        self.in_render_pass = true;
        Ok(())
    }

    pub fn end_render_pass(&mut self) -> Result<()> {
        self.ensure_recording()?;

        if !self.in_render_pass {
            driver_bail!(SOURCE, "Not inside a render pass");
        }

        unsafe {
            self.device.cmd_end_render_pass(self.command_buffer);
        }

        self.in_render_pass = false;
        Ok(())
    }

    fn ensure_recording(&self) -> Result<()> {
        if !self.is_recording {
            driver_bail!(SOURCE, "Command list not recording");
        }
        Ok(())
    }

    fn ensure_outside_render_pass(&self, command: &str) -> Result<()> {
        self.ensure_recording()?;
        if self.in_render_pass {
            driver_bail!(SOURCE, "{} recorded inside a render pass", command);
        }
        Ok(())
    }
}

impl CommandList for VulkanCommandList {
    fn in_render_pass(&self) -> bool {
        self.in_render_pass
    }

    fn pipeline_barrier(&mut self, barrier: &ImageBarrier) -> Result<()> {
        self.ensure_outside_render_pass("pipeline_barrier")?;

        let vk_barrier = vk::ImageMemoryBarrier::default()
            .src_access_mask(layout_access_mask(barrier.old_layout))
            .dst_access_mask(layout_access_mask(barrier.new_layout))
            .old_layout(image_layout_to_vk(barrier.old_layout))
            .new_layout(image_layout_to_vk(barrier.new_layout))
            .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .image(image_from_handle(barrier.image))
            .subresource_range(subresource_range_to_vk(&barrier.range));

        unsafe {
            self.device.cmd_pipeline_barrier(
                self.command_buffer,
                layout_stage_mask(barrier.old_layout),
                layout_stage_mask(barrier.new_layout),
                vk::DependencyFlags::empty(),
                &[],
                &[],
                &[vk_barrier],
            );
        }

        Ok(())
    }

    fn clear_attachments(&mut self, attachments: &[ClearAttachment], rect: &ClearRect) -> Result<()> {
        self.ensure_recording()?;

        if !self.in_render_pass {
            driver_bail!(SOURCE, "clear_attachments recorded outside a render pass");
        }

        let vk_attachments: Vec<vk::ClearAttachment> =
            attachments.iter().map(clear_attachment_to_vk).collect();
        let vk_rects = [clear_rect_to_vk(rect)];

        unsafe {
            self.device
                .cmd_clear_attachments(self.command_buffer, &vk_attachments, &vk_rects);
        }

        Ok(())
    }

    fn clear_color_image(
        &mut self,
        image: ImageHandle,
        layout: ImageLayout,
        color: [f32; 4],
        range: &SubresourceRange,
    ) -> Result<()> {
        self.ensure_outside_render_pass("clear_color_image")?;

        let value = vk::ClearColorValue { float32: color };
        let ranges = [subresource_range_to_vk(range)];

        unsafe {
            self.device.cmd_clear_color_image(
                self.command_buffer,
                image_from_handle(image),
                image_layout_to_vk(layout),
                &value,
                &ranges,
            );
        }

        Ok(())
    }

    fn clear_depth_stencil_image(
        &mut self,
        image: ImageHandle,
        layout: ImageLayout,
        depth: f32,
        stencil: u32,
        range: &SubresourceRange,
    ) -> Result<()> {
        self.ensure_outside_render_pass("clear_depth_stencil_image")?;

        let value = vk::ClearDepthStencilValue { depth, stencil };
        let ranges = [subresource_range_to_vk(range)];

        unsafe {
            self.device.cmd_clear_depth_stencil_image(
                self.command_buffer,
                image_from_handle(image),
                image_layout_to_vk(layout),
                &value,
                &ranges,
            );
        }

        Ok(())
    }
}

impl Drop for VulkanCommandList {
    fn drop(&mut self) {
        unsafe {
            // Frees the command buffer along with the pool
            self.device.destroy_command_pool(self.command_pool, None);
        }
    }
}
