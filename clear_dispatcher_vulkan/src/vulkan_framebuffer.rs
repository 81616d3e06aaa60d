/// VulkanFramebuffer - render pass + framebuffer for a FramebufferState
///
/// Attachments are loaded and stored, so entering the render pass never
/// touches their contents. Only `vkCmdClearAttachments` inside it does.
/// Attachments must be in their attachment layouts on entry, which
/// `VulkanBatch` takes care of.

use ash::vk;
use clear_dispatcher::dispatch::resource::{AttachmentView, FramebufferState};
use clear_dispatcher::dispatch::{Error, Result};
use clear_dispatcher::driver_err;
use std::sync::Arc;

use crate::vulkan_command_list::RenderPassBinding;
use crate::vulkan_format::format_to_vk;
use crate::vulkan_image::VulkanImage;

const SOURCE: &str = "clear::vulkan";

/// Render pass, framebuffer and attachment views of one `FramebufferState`
pub struct VulkanFramebuffer {
    device: Arc<ash::Device>,
    render_pass: vk::RenderPass,
    framebuffer: vk::Framebuffer,
    views: Vec<vk::ImageView>,
    extent: vk::Extent2D,
}

impl VulkanFramebuffer {
    /// Build the render pass and framebuffer for `state`
    ///
    /// `images` must contain the image of every bound attachment. All
    /// attachments must cover at least `state.num_layers()` layers.
    pub fn new(
        device: Arc<ash::Device>,
        state: &FramebufferState,
        images: &[&VulkanImage],
    ) -> Result<Self> {
        let layers = state.num_layers();
        if layers == 0 {
            return Err(Error::InvalidResource(
                "Framebuffer has no bound attachment".to_string(),
            ));
        }

        let bound: Vec<(Option<usize>, &AttachmentView)> = state
            .color_attachments()
            .map(|(slot, view)| (Some(slot), view))
            .chain(state.depth_stencil_attachment().map(|view| (None, view)))
            .collect();

        for (_, view) in &bound {
            if view.layer_count() < layers {
                return Err(Error::InvalidResource(format!(
                    "Attachment covers {} layers, framebuffer needs {}",
                    view.layer_count(),
                    layers
                )));
            }
        }

        let mut framebuffer = Self {
            device: Arc::clone(&device),
            render_pass: vk::RenderPass::null(),
            framebuffer: vk::Framebuffer::null(),
            views: Vec::with_capacity(bound.len()),
            extent: vk::Extent2D {
                width: state.width(),
                height: state.height(),
            },
        };

        // Views are pushed in attachment order: colors by slot, then depth
        for (_, view) in &bound {
            let Some(image) = images.iter().find(|image| image.key() == view.image()) else {
                return Err(Error::InvalidResource(
                    "No VulkanImage supplied for a bound attachment".to_string(),
                ));
            };
            framebuffer.views.push(image.create_view(view)?);
        }

        framebuffer.render_pass = create_render_pass(&device, &bound)?;

        let framebuffer_info = vk::FramebufferCreateInfo::default()
            .render_pass(framebuffer.render_pass)
            .attachments(&framebuffer.views)
            .width(state.width())
            .height(state.height())
            .layers(layers);

        framebuffer.framebuffer = unsafe {
            device
                .create_framebuffer(&framebuffer_info, None)
                .map_err(|e| driver_err!(SOURCE, "Failed to create framebuffer: {:?}", e))?
        };

        Ok(framebuffer)
    }

    /// Binding for `VulkanBatch::bind_render_pass()`
    pub fn binding(&self) -> RenderPassBinding {
        RenderPassBinding {
            render_pass: self.render_pass,
            framebuffer: self.framebuffer,
            extent: self.extent,
        }
    }
}

fn create_render_pass(
    device: &ash::Device,
    bound: &[(Option<usize>, &AttachmentView)],
) -> Result<vk::RenderPass> {
    let mut attachments = Vec::with_capacity(bound.len());
    let mut color_attachment_refs = Vec::new();
    let mut depth_attachment_ref: Option<vk::AttachmentReference> = None;

    for (index, (slot, view)) in bound.iter().enumerate() {
        let layout = match slot {
            Some(_) => vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
            None => vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
        };
        attachments.push(
            vk::AttachmentDescription::default()
                .format(format_to_vk(view.format()))
                .samples(vk::SampleCountFlags::TYPE_1)
                .load_op(vk::AttachmentLoadOp::LOAD)
                .store_op(vk::AttachmentStoreOp::STORE)
                .stencil_load_op(vk::AttachmentLoadOp::LOAD)
                .stencil_store_op(vk::AttachmentStoreOp::STORE)
                .initial_layout(layout)
                .final_layout(layout),
        );

        let reference = vk::AttachmentReference::default()
            .attachment(index as u32)
            .layout(layout);

        match slot {
            Some(slot) => {
                // Subpass color index == attachment slot, gaps are unused
                if color_attachment_refs.len() <= *slot {
                    color_attachment_refs.resize(
                        *slot + 1,
                        vk::AttachmentReference::default()
                            .attachment(vk::ATTACHMENT_UNUSED)
                            .layout(vk::ImageLayout::UNDEFINED),
                    );
                }
                color_attachment_refs[*slot] = reference;
            }
            None => depth_attachment_ref = Some(reference),
        }
    }

    let mut subpass = vk::SubpassDescription::default()
        .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
        .color_attachments(&color_attachment_refs);

    if let Some(ref depth_ref) = depth_attachment_ref {
        subpass = subpass.depth_stencil_attachment(depth_ref);
    }

    let (stage_mask, access_mask) = if depth_attachment_ref.is_some() {
        (
            vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT
                | vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS
                | vk::PipelineStageFlags::LATE_FRAGMENT_TESTS,
            vk::AccessFlags::COLOR_ATTACHMENT_WRITE
                | vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE,
        )
    } else {
        (
            vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
            vk::AccessFlags::COLOR_ATTACHMENT_WRITE,
        )
    };

    let dependency = vk::SubpassDependency::default()
        .src_subpass(vk::SUBPASS_EXTERNAL)
        .dst_subpass(0)
        .src_stage_mask(stage_mask)
        .src_access_mask(access_mask)
        .dst_stage_mask(stage_mask)
        .dst_access_mask(access_mask);

    let render_pass_info = vk::RenderPassCreateInfo::default()
        .attachments(&attachments)
        .subpasses(std::slice::from_ref(&subpass))
        .dependencies(std::slice::from_ref(&dependency));

    unsafe {
        device
            .create_render_pass(&render_pass_info, None)
            .map_err(|e| driver_err!(SOURCE, "Failed to create render pass: {:?}", e))
    }
}

impl Drop for VulkanFramebuffer {
    fn drop(&mut self) {
        unsafe {
            if self.framebuffer != vk::Framebuffer::null() {
                self.device.destroy_framebuffer(self.framebuffer, None);
            }
            if self.render_pass != vk::RenderPass::null() {
                self.device.destroy_render_pass(self.render_pass, None);
            }
            for view in self.views.drain(..) {
                self.device.destroy_image_view(view, None);
            }
        }
    }
}
