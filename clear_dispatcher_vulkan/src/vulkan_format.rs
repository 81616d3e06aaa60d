/// Conversions from clear_dispatcher types to Vulkan types
///
/// Pure functions, no device required.

use ash::vk;
use ash::vk::Handle;
use clear_dispatcher::dispatch::command::{ClearAttachment, ClearRect, ClearValue, SubresourceRange};
use clear_dispatcher::dispatch::resource::{AspectFlags, Format, ImageDimension, ImageHandle, ImageLayout};

pub fn format_to_vk(format: Format) -> vk::Format {
    match format {
        Format::R8G8B8A8_UNORM => vk::Format::R8G8B8A8_UNORM,
        Format::R8G8B8A8_SRGB => vk::Format::R8G8B8A8_SRGB,
        Format::B8G8R8A8_UNORM => vk::Format::B8G8R8A8_UNORM,
        Format::B8G8R8A8_SRGB => vk::Format::B8G8R8A8_SRGB,
        Format::A2B10G10R10_UNORM => vk::Format::A2B10G10R10_UNORM_PACK32,
        Format::R16G16B16A16_SFLOAT => vk::Format::R16G16B16A16_SFLOAT,
        Format::R32G32B32A32_SFLOAT => vk::Format::R32G32B32A32_SFLOAT,
        Format::D16_UNORM => vk::Format::D16_UNORM,
        Format::D32_FLOAT => vk::Format::D32_SFLOAT,
        Format::S8_UINT => vk::Format::S8_UINT,
        Format::D24_UNORM_S8_UINT => vk::Format::D24_UNORM_S8_UINT,
        Format::D32_FLOAT_S8_UINT => vk::Format::D32_SFLOAT_S8_UINT,
    }
}

pub fn image_layout_to_vk(layout: ImageLayout) -> vk::ImageLayout {
    match layout {
        ImageLayout::Undefined => vk::ImageLayout::UNDEFINED,
        ImageLayout::General => vk::ImageLayout::GENERAL,
        ImageLayout::ColorAttachment => vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
        ImageLayout::DepthStencilAttachment => vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
        ImageLayout::ShaderReadOnly => vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
        ImageLayout::TransferSrc => vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
        ImageLayout::TransferDst => vk::ImageLayout::TRANSFER_DST_OPTIMAL,
        ImageLayout::PresentSrc => vk::ImageLayout::PRESENT_SRC_KHR,
    }
}

pub fn aspect_to_vk(aspect: AspectFlags) -> vk::ImageAspectFlags {
    let mut flags = vk::ImageAspectFlags::empty();
    if aspect.contains(AspectFlags::COLOR) {
        flags |= vk::ImageAspectFlags::COLOR;
    }
    if aspect.contains(AspectFlags::DEPTH) {
        flags |= vk::ImageAspectFlags::DEPTH;
    }
    if aspect.contains(AspectFlags::STENCIL) {
        flags |= vk::ImageAspectFlags::STENCIL;
    }
    flags
}

pub fn image_type_to_vk(dimension: ImageDimension) -> vk::ImageType {
    match dimension {
        ImageDimension::D1 | ImageDimension::D1Array => vk::ImageType::TYPE_1D,
        ImageDimension::D2
        | ImageDimension::D2Array
        | ImageDimension::Cube
        | ImageDimension::CubeArray => vk::ImageType::TYPE_2D,
        ImageDimension::D3 => vk::ImageType::TYPE_3D,
    }
}

pub fn view_type_to_vk(dimension: ImageDimension) -> vk::ImageViewType {
    match dimension {
        ImageDimension::D1 => vk::ImageViewType::TYPE_1D,
        ImageDimension::D1Array => vk::ImageViewType::TYPE_1D_ARRAY,
        ImageDimension::D2 => vk::ImageViewType::TYPE_2D,
        ImageDimension::D2Array => vk::ImageViewType::TYPE_2D_ARRAY,
        ImageDimension::Cube => vk::ImageViewType::CUBE,
        ImageDimension::CubeArray => vk::ImageViewType::CUBE_ARRAY,
        ImageDimension::D3 => vk::ImageViewType::TYPE_3D,
    }
}

/// Accesses to wait for (as source) or to make available (as destination)
/// for an image in `layout`
pub fn layout_access_mask(layout: ImageLayout) -> vk::AccessFlags {
    match layout {
        ImageLayout::Undefined | ImageLayout::PresentSrc => vk::AccessFlags::empty(),
        ImageLayout::General => vk::AccessFlags::MEMORY_READ | vk::AccessFlags::MEMORY_WRITE,
        ImageLayout::ColorAttachment => {
            vk::AccessFlags::COLOR_ATTACHMENT_READ | vk::AccessFlags::COLOR_ATTACHMENT_WRITE
        }
        ImageLayout::DepthStencilAttachment => {
            vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ
                | vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE
        }
        ImageLayout::ShaderReadOnly => vk::AccessFlags::SHADER_READ,
        ImageLayout::TransferSrc => vk::AccessFlags::TRANSFER_READ,
        ImageLayout::TransferDst => vk::AccessFlags::TRANSFER_WRITE,
    }
}

/// Pipeline stages touching an image in `layout`
pub fn layout_stage_mask(layout: ImageLayout) -> vk::PipelineStageFlags {
    match layout {
        ImageLayout::Undefined => vk::PipelineStageFlags::TOP_OF_PIPE,
        ImageLayout::General => vk::PipelineStageFlags::ALL_COMMANDS,
        ImageLayout::ColorAttachment => vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
        ImageLayout::DepthStencilAttachment => {
            vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS | vk::PipelineStageFlags::LATE_FRAGMENT_TESTS
        }
        ImageLayout::ShaderReadOnly => vk::PipelineStageFlags::FRAGMENT_SHADER,
        ImageLayout::TransferSrc | ImageLayout::TransferDst => vk::PipelineStageFlags::TRANSFER,
        ImageLayout::PresentSrc => vk::PipelineStageFlags::BOTTOM_OF_PIPE,
    }
}

pub fn subresource_range_to_vk(range: &SubresourceRange) -> vk::ImageSubresourceRange {
    vk::ImageSubresourceRange {
        aspect_mask: aspect_to_vk(range.aspect),
        base_mip_level: range.base_mip_level,
        level_count: range.level_count,
        base_array_layer: range.base_array_layer,
        layer_count: range.layer_count,
    }
}

pub fn clear_rect_to_vk(rect: &ClearRect) -> vk::ClearRect {
    vk::ClearRect {
        rect: vk::Rect2D {
            offset: vk::Offset2D { x: rect.rect.x, y: rect.rect.y },
            extent: vk::Extent2D { width: rect.rect.width, height: rect.rect.height },
        },
        base_array_layer: rect.base_array_layer,
        layer_count: rect.layer_count,
    }
}

pub fn clear_value_to_vk(value: &ClearValue) -> vk::ClearValue {
    match value {
        ClearValue::Color(color) => vk::ClearValue {
            color: vk::ClearColorValue { float32: *color },
        },
        ClearValue::DepthStencil { depth, stencil } => vk::ClearValue {
            depth_stencil: vk::ClearDepthStencilValue {
                depth: *depth,
                stencil: *stencil,
            },
        },
    }
}

pub fn clear_attachment_to_vk(attachment: &ClearAttachment) -> vk::ClearAttachment {
    vk::ClearAttachment::default()
        .aspect_mask(aspect_to_vk(attachment.aspect))
        .color_attachment(attachment.color_attachment)
        .clear_value(clear_value_to_vk(&attachment.value))
}

pub fn image_handle(image: vk::Image) -> ImageHandle {
    ImageHandle(image.as_raw())
}

pub fn image_from_handle(handle: ImageHandle) -> vk::Image {
    vk::Image::from_raw(handle.0)
}

#[cfg(test)]
#[path = "vulkan_format_tests.rs"]
mod tests;
