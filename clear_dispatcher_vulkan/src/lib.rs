/*!
# Clear Dispatcher - Vulkan Backend

Vulkan recording targets for the `clear_dispatcher` crate.

Provides a headless device context, a command list implementing the
`CommandList` trait, a `BatchProvider` that enters a LOAD/STORE render pass
on demand, and GPU images registered in an `ImageRegistry`.

Uses Ash for Vulkan bindings and gpu-allocator for memory management.

```no_run
use clear_dispatcher::dispatch::{ClearDispatcher, ClearContext, ClearRequest, ClearBuffers};
use clear_dispatcher::dispatch::resource::{FramebufferState, ImageRegistry};
use clear_dispatcher_vulkan::{VulkanBatch, VulkanConfig, VulkanContext};

let ctx = VulkanContext::new(VulkanConfig::default())?;
let mut batch = VulkanBatch::new(ctx.create_command_list()?);
batch.command_list_mut().begin()?;

let framebuffer = FramebufferState::new(64, 64);
let mut images = ImageRegistry::new();
let mut dispatcher = ClearDispatcher::default();
let request = ClearRequest::new(ClearBuffers::empty());
dispatcher.clear(&mut ClearContext::new(&framebuffer, &mut images, &mut batch), &request)?;

batch.finish()?;
ctx.submit_and_wait(batch.command_list())?;
# Ok::<(), clear_dispatcher::dispatch::Error>(())
```
*/

mod vulkan_batch;
mod vulkan_command_list;
mod vulkan_context;
mod vulkan_debug;
mod vulkan_format;
mod vulkan_framebuffer;
mod vulkan_image;

pub use vulkan_batch::VulkanBatch;
pub use vulkan_command_list::{RenderPassBinding, VulkanCommandList};
pub use vulkan_context::{VulkanConfig, VulkanContext};
pub use vulkan_framebuffer::VulkanFramebuffer;
pub use vulkan_image::{color_texel_size, VulkanImage};

// Re-export validation counters
pub use vulkan_debug::{reset_validation_stats, validation_stats, ValidationStats};

/// Conversions between `clear_dispatcher` types and Vulkan types
pub mod convert {
    pub use crate::vulkan_format::{
        aspect_to_vk, clear_attachment_to_vk, clear_rect_to_vk, clear_value_to_vk,
        format_to_vk, image_from_handle, image_handle, image_layout_to_vk, image_type_to_vk,
        layout_access_mask, layout_stage_mask, subresource_range_to_vk, view_type_to_vk,
    };
}
