/// CommandList trait - the recording primitives used by the clear path

use crate::error::Result;
use crate::resource::{AspectFlags, ImageHandle, ImageInfo, ImageLayout};

/// Command recording target ("batch")
///
/// Commands are appended in call order and submitted later by the owner of
/// the batch. Implementations never reorder commands.
pub trait CommandList: Send + Sync {
    /// Returns true while a render pass is active on this batch
    fn in_render_pass(&self) -> bool;

    /// Record an image layout transition
    fn pipeline_barrier(&mut self, barrier: &ImageBarrier) -> Result<()>;

    /// Clear regions of the current render pass attachments
    ///
    /// Only valid inside a render pass.
    ///
    /// # Arguments
    ///
    /// * `attachments` - One descriptor per attachment to clear (never empty)
    /// * `rect` - Region and layer span applied to every descriptor
    fn clear_attachments(&mut self, attachments: &[ClearAttachment], rect: &ClearRect) -> Result<()>;

    /// Clear a color image directly
    ///
    /// Only valid outside a render pass, with `layout` being the image's
    /// current layout (`General` or `TransferDst`).
    fn clear_color_image(
        &mut self,
        image: ImageHandle,
        layout: ImageLayout,
        color: [f32; 4],
        range: &SubresourceRange,
    ) -> Result<()>;

    /// Clear a depth/stencil image directly
    ///
    /// Same constraints as `clear_color_image()`.
    fn clear_depth_stencil_image(
        &mut self,
        image: ImageHandle,
        layout: ImageLayout,
        depth: f32,
        stencil: u32,
        range: &SubresourceRange,
    ) -> Result<()>;
}

/// 2D rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect2D {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Region cleared by `CommandList::clear_attachments()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearRect {
    pub rect: Rect2D,
    pub base_array_layer: u32,
    pub layer_count: u32,
}

/// Clear value for an attachment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClearValue {
    /// Color clear value (RGBA)
    Color([f32; 4]),
    /// Depth/stencil clear value
    DepthStencil { depth: f32, stencil: u32 },
}

/// One attachment cleared by `CommandList::clear_attachments()`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearAttachment {
    /// COLOR, or any combination of DEPTH and STENCIL
    pub aspect: AspectFlags,
    /// Color attachment index (ignored for depth/stencil)
    pub color_attachment: u32,
    pub value: ClearValue,
}

/// Mip levels and layers of one aspect set of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubresourceRange {
    pub aspect: AspectFlags,
    pub base_mip_level: u32,
    pub level_count: u32,
    pub base_array_layer: u32,
    pub layer_count: u32,
}

impl SubresourceRange {
    /// Every mip level and layer of `info`
    pub fn whole(aspect: AspectFlags, info: &ImageInfo) -> Self {
        Self {
            aspect,
            base_mip_level: 0,
            level_count: info.mip_levels,
            base_array_layer: 0,
            layer_count: info.array_layers,
        }
    }
}

/// Image layout transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageBarrier {
    pub image: ImageHandle,
    pub old_layout: ImageLayout,
    pub new_layout: ImageLayout,
    pub range: SubresourceRange,
}
