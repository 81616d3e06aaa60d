/// Pixel formats of images and attachment views

use crate::resource::AspectFlags;

/// Image / view pixel format
///
/// Views may reinterpret their image with a different format of the same
/// size class (e.g. an `_UNORM` view of an `_SRGB` image).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum Format {
    // Color formats
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_UNORM,
    B8G8R8A8_SRGB,
    A2B10G10R10_UNORM,
    R16G16B16A16_SFLOAT,
    R32G32B32A32_SFLOAT,

    // Depth / stencil formats
    D16_UNORM,
    D32_FLOAT,
    S8_UINT,
    D24_UNORM_S8_UINT,
    D32_FLOAT_S8_UINT,
}

impl Format {
    /// Returns true if the format stores perceptually (sRGB) encoded color
    pub fn is_srgb(self) -> bool {
        matches!(self, Format::R8G8B8A8_SRGB | Format::B8G8R8A8_SRGB)
    }

    /// Returns true if the format has a depth component
    pub fn has_depth(self) -> bool {
        matches!(
            self,
            Format::D16_UNORM
                | Format::D32_FLOAT
                | Format::D24_UNORM_S8_UINT
                | Format::D32_FLOAT_S8_UINT
        )
    }

    /// Returns true if the format has a stencil component
    pub fn has_stencil(self) -> bool {
        matches!(
            self,
            Format::S8_UINT | Format::D24_UNORM_S8_UINT | Format::D32_FLOAT_S8_UINT
        )
    }

    /// Returns true for depth and/or stencil formats
    pub fn is_depth_stencil(self) -> bool {
        self.has_depth() || self.has_stencil()
    }

    /// Image aspects present in this format
    pub fn aspects(self) -> AspectFlags {
        if !self.is_depth_stencil() {
            return AspectFlags::COLOR;
        }

        let mut aspects = AspectFlags::empty();
        if self.has_depth() {
            aspects |= AspectFlags::DEPTH;
        }
        if self.has_stencil() {
            aspects |= AspectFlags::STENCIL;
        }
        aspects
    }
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
