/// Image resources, layouts, and the image registry
///
/// An `ImageResource` is the backing storage of one or more attachment
/// views. Its current layout is shared state: the rest of the driver reads
/// it between calls, and `ImageResource::transition()` is the only place in
/// this crate that changes it.

use bitflags::bitflags;
use slotmap::{new_key_type, SlotMap};
use crate::command::{CommandList, ImageBarrier, SubresourceRange};
use crate::error::Result;
use crate::resource::Format;

bitflags! {
    /// Image aspects addressed by a barrier or clear
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AspectFlags: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

/// API-visible image layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageLayout {
    /// Contents undefined (initial state)
    Undefined,
    /// Usable for every operation, slower on most hardware
    General,
    /// Color attachment
    ColorAttachment,
    /// Depth/stencil attachment
    DepthStencilAttachment,
    /// Shader read-only access
    ShaderReadOnly,
    /// Transfer source
    TransferSrc,
    /// Transfer destination
    TransferDst,
    /// Presentation to a swapchain
    PresentSrc,
}

impl ImageLayout {
    /// Returns true if a direct image clear can be recorded in this layout
    pub fn accepts_transfer_writes(self) -> bool {
        matches!(self, ImageLayout::General | ImageLayout::TransferDst)
    }
}

/// Image dimensionality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageDimension {
    D1,
    D1Array,
    D2,
    D2Array,
    Cube,
    CubeArray,
    /// Volumetric image; attachment "layers" address depth slices
    D3,
}

impl ImageDimension {
    /// Returns true for volumetric (3D) images
    pub fn is_volume(self) -> bool {
        self == ImageDimension::D3
    }
}

/// Opaque backend image handle (e.g. the raw `VkImage` value)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u64);

/// Read-only properties of an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// Native storage format
    pub format: Format,
    /// Dimensionality
    pub dimension: ImageDimension,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Depth in pixels (1 unless 3D)
    pub depth: u32,
    /// Number of mip levels
    pub mip_levels: u32,
    /// Number of array layers (1 for 3D images)
    pub array_layers: u32,
}

impl ImageInfo {
    /// Plain 2D image with one mip level and one layer
    pub fn new_2d(format: Format, width: u32, height: u32) -> Self {
        Self {
            format,
            dimension: ImageDimension::D2,
            width,
            height,
            depth: 1,
            mip_levels: 1,
            array_layers: 1,
        }
    }

    /// 2D array image
    pub fn new_2d_array(format: Format, width: u32, height: u32, array_layers: u32) -> Self {
        Self {
            dimension: ImageDimension::D2Array,
            array_layers,
            ..Self::new_2d(format, width, height)
        }
    }

    /// Volumetric image
    pub fn new_3d(format: Format, width: u32, height: u32, depth: u32) -> Self {
        Self {
            dimension: ImageDimension::D3,
            depth,
            ..Self::new_2d(format, width, height)
        }
    }

    /// Builder-style mip level count
    pub fn with_mip_levels(mut self, mip_levels: u32) -> Self {
        self.mip_levels = mip_levels.max(1);
        self
    }
}

/// Backing storage of attachment views
#[derive(Debug, Clone)]
pub struct ImageResource {
    handle: ImageHandle,
    info: ImageInfo,
    layout: ImageLayout,
}

impl ImageResource {
    /// Create an image resource in the `Undefined` layout
    pub fn new(handle: ImageHandle, info: ImageInfo) -> Self {
        Self {
            handle,
            info,
            layout: ImageLayout::Undefined,
        }
    }

    /// Backend handle
    pub fn handle(&self) -> ImageHandle {
        self.handle
    }

    /// Read-only properties
    pub fn info(&self) -> &ImageInfo {
        &self.info
    }

    /// Native storage format
    pub fn format(&self) -> Format {
        self.info.format
    }

    /// Current layout as last recorded
    pub fn layout(&self) -> ImageLayout {
        self.layout
    }

    /// Record a layout the image reached outside of `transition()`
    ///
    /// Used by collaborators whose own commands change the layout, e.g. a
    /// render pass with a different final layout.
    pub fn assume_layout(&mut self, layout: ImageLayout) {
        self.layout = layout;
    }

    /// Transition the whole image to `new_layout`
    ///
    /// Records one barrier covering every mip level and layer of the
    /// requested aspect, then updates the layout field so it matches what
    /// the GPU will see once the barrier executes.
    pub fn transition(
        &mut self,
        cmd: &mut dyn CommandList,
        aspect: AspectFlags,
        new_layout: ImageLayout,
    ) -> Result<()> {
        let barrier = ImageBarrier {
            image: self.handle,
            old_layout: self.layout,
            new_layout,
            range: SubresourceRange::whole(aspect, &self.info),
        };

        cmd.pipeline_barrier(&barrier)?;
        self.layout = new_layout;
        Ok(())
    }
}

new_key_type! {
    /// Key of an image in an `ImageRegistry`
    pub struct ImageKey;
}

/// Owner of all image resources referenced by attachment views
#[derive(Debug, Default)]
pub struct ImageRegistry {
    images: SlotMap<ImageKey, ImageResource>,
}

impl ImageRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image and return its key
    pub fn insert(&mut self, image: ImageResource) -> ImageKey {
        self.images.insert(image)
    }

    /// Get an image
    pub fn get(&self, key: ImageKey) -> Option<&ImageResource> {
        self.images.get(key)
    }

    /// Get an image for layout updates
    pub fn get_mut(&mut self, key: ImageKey) -> Option<&mut ImageResource> {
        self.images.get_mut(key)
    }

    /// Unregister an image (its GPU object is about to be destroyed)
    pub fn remove(&mut self, key: ImageKey) -> Option<ImageResource> {
        self.images.remove(key)
    }
}

#[cfg(test)]
#[path = "image_tests.rs"]
mod tests;
