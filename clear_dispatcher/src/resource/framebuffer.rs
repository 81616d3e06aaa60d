/// Framebuffer state and attachment views
///
/// The framebuffer state is owned by the rendering context and is
/// read-only to the clear path.

use crate::error::{Error, Result};
use crate::resource::{Format, ImageKey};

/// Maximum number of color attachments in a framebuffer
pub const MAX_COLOR_ATTACHMENTS: usize = 8;

/// View of an image bound as a framebuffer attachment
///
/// Addresses a single mip level and the inclusive layer range
/// `first_layer..=last_layer`. For 3D images the layers are depth slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentView {
    image: ImageKey,
    format: Format,
    mip_level: u32,
    first_layer: u32,
    last_layer: u32,
}

impl AttachmentView {
    /// View of mip 0, layer 0
    pub fn new(image: ImageKey, format: Format) -> Self {
        Self {
            image,
            format,
            mip_level: 0,
            first_layer: 0,
            last_layer: 0,
        }
    }

    /// View of an explicit mip level and layer range
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResource` if `first_layer > last_layer`.
    pub fn with_range(
        image: ImageKey,
        format: Format,
        mip_level: u32,
        first_layer: u32,
        last_layer: u32,
    ) -> Result<Self> {
        if first_layer > last_layer {
            return Err(Error::InvalidResource(format!(
                "Attachment view first_layer {} > last_layer {}",
                first_layer, last_layer
            )));
        }

        Ok(Self {
            image,
            format,
            mip_level,
            first_layer,
            last_layer,
        })
    }

    pub fn image(&self) -> ImageKey {
        self.image
    }

    /// View format (may differ from the image's native format)
    pub fn format(&self) -> Format {
        self.format
    }

    pub fn mip_level(&self) -> u32 {
        self.mip_level
    }

    pub fn first_layer(&self) -> u32 {
        self.first_layer
    }

    pub fn last_layer(&self) -> u32 {
        self.last_layer
    }

    /// Number of layers addressed by the view (always >= 1)
    pub fn layer_count(&self) -> u32 {
        self.last_layer - self.first_layer + 1
    }
}

/// Currently bound framebuffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramebufferState {
    color_attachments: [Option<AttachmentView>; MAX_COLOR_ATTACHMENTS],
    depth_stencil_attachment: Option<AttachmentView>,
    width: u32,
    height: u32,
    /// Explicit layer count, 0 = derive from the attachments
    layers: u32,
}

impl FramebufferState {
    /// Create an empty framebuffer of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            color_attachments: [None; MAX_COLOR_ATTACHMENTS],
            depth_stencil_attachment: None,
            width,
            height,
            layers: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Set an explicit layer count (0 derives it from the attachments)
    pub fn set_layers(&mut self, layers: u32) {
        self.layers = layers;
    }

    /// Bind or unbind a color attachment
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResource` if `index >= MAX_COLOR_ATTACHMENTS`.
    pub fn set_color_attachment(&mut self, index: usize, view: Option<AttachmentView>) -> Result<()> {
        let slot = self.color_attachments.get_mut(index).ok_or_else(|| {
            Error::InvalidResource(format!(
                "Color attachment index {} out of range (max {})",
                index, MAX_COLOR_ATTACHMENTS
            ))
        })?;
        *slot = view;
        Ok(())
    }

    /// Bind or unbind the depth/stencil attachment
    pub fn set_depth_stencil_attachment(&mut self, view: Option<AttachmentView>) {
        self.depth_stencil_attachment = view;
    }

    /// Color attachment at `index`, if bound
    pub fn color_attachment(&self, index: usize) -> Option<&AttachmentView> {
        self.color_attachments.get(index).and_then(|slot| slot.as_ref())
    }

    /// Bound color attachments with their slot index, in slot order
    pub fn color_attachments(&self) -> impl Iterator<Item = (usize, &AttachmentView)> {
        self.color_attachments
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|view| (index, view)))
    }

    /// Depth/stencil attachment, if bound
    pub fn depth_stencil_attachment(&self) -> Option<&AttachmentView> {
        self.depth_stencil_attachment.as_ref()
    }

    /// Number of layers rendered to
    ///
    /// The explicit layer count when set, otherwise the widest layer range
    /// of any bound attachment (0 when nothing is bound).
    pub fn num_layers(&self) -> u32 {
        if self.layers > 0 {
            return self.layers;
        }

        self.color_attachments
            .iter()
            .flatten()
            .chain(self.depth_stencil_attachment.iter())
            .map(AttachmentView::layer_count)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "framebuffer_tests.rs"]
mod tests;
