/// Clear color resolution between a view format and its image's storage

use glam::Vec4;
use crate::resource::Format;

/// Decode one sRGB-encoded channel to linear
pub fn srgb_to_linear(channel: f32) -> f32 {
    if channel <= 0.0 {
        0.0
    } else if channel <= 0.04045 {
        channel / 12.92
    } else if channel < 1.0 {
        ((channel + 0.055) / 1.055).powf(2.4)
    } else {
        1.0
    }
}

/// Returns true if a clear through `view_format` must be decoded for an
/// image stored as `image_format`
///
/// Only a linear view over sRGB storage needs it.
pub fn needs_srgb_decode(view_format: Format, image_format: Format) -> bool {
    view_format != image_format && !view_format.is_srgb() && image_format.is_srgb()
}

/// Color handed to a direct image clear
///
/// RGB channels are decoded when `needs_srgb_decode()` holds; alpha is
/// never touched.
pub fn resolve_clear_color(color: Vec4, view_format: Format, image_format: Format) -> [f32; 4] {
    if !needs_srgb_decode(view_format, image_format) {
        return color.to_array();
    }

    [
        srgb_to_linear(color.x),
        srgb_to_linear(color.y),
        srgb_to_linear(color.z),
        color.w,
    ]
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
