/// VulkanImage - GPU image usable as a clear target
///
/// Owns the VkImage and its memory (gpu-allocator). The image is registered
/// in an `ImageRegistry` on creation so the clear path can track its layout.

use ash::vk;
use clear_dispatcher::dispatch::resource::{
    AspectFlags, AttachmentView, Format, ImageDimension, ImageInfo, ImageKey, ImageLayout,
    ImageRegistry, ImageResource,
};
use clear_dispatcher::dispatch::{Error, Result};
use clear_dispatcher::{driver_bail, driver_err, driver_error, driver_warn};
use gpu_allocator::vulkan::{Allocation, AllocationCreateDesc, AllocationScheme, Allocator};
use gpu_allocator::MemoryLocation;
use std::sync::{Arc, Mutex};

use crate::vulkan_context::VulkanContext;
use crate::vulkan_format::{
    aspect_to_vk, format_to_vk, image_handle, image_type_to_vk, view_type_to_vk,
};

const SOURCE: &str = "clear::vulkan";

/// Bytes per texel of a color format, `None` for depth/stencil formats
pub fn color_texel_size(format: Format) -> Option<u32> {
    match format {
        Format::R8G8B8A8_UNORM
        | Format::R8G8B8A8_SRGB
        | Format::B8G8R8A8_UNORM
        | Format::B8G8R8A8_SRGB
        | Format::A2B10G10R10_UNORM => Some(4),
        Format::R16G16B16A16_SFLOAT => Some(8),
        Format::R32G32B32A32_SFLOAT => Some(16),
        Format::D16_UNORM
        | Format::D32_FLOAT
        | Format::S8_UINT
        | Format::D24_UNORM_S8_UINT
        | Format::D32_FLOAT_S8_UINT => None,
    }
}

fn usage_for(format: Format) -> vk::ImageUsageFlags {
    let attachment = if format.is_depth_stencil() {
        vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT
    } else {
        vk::ImageUsageFlags::COLOR_ATTACHMENT
    };
    attachment | vk::ImageUsageFlags::TRANSFER_SRC | vk::ImageUsageFlags::TRANSFER_DST
}

fn create_flags_for(info: &ImageInfo) -> vk::ImageCreateFlags {
    let mut flags = vk::ImageCreateFlags::empty();
    if !info.format.is_depth_stencil() {
        // Views may reinterpret sRGB storage as UNORM
        flags |= vk::ImageCreateFlags::MUTABLE_FORMAT;
    }
    match info.dimension {
        ImageDimension::D3 => flags |= vk::ImageCreateFlags::TYPE_2D_ARRAY_COMPATIBLE,
        ImageDimension::Cube | ImageDimension::CubeArray => flags |= vk::ImageCreateFlags::CUBE_COMPATIBLE,
        _ => {}
    }
    flags
}

/// Vulkan image with bound memory
pub struct VulkanImage {
    device: Arc<ash::Device>,
    allocator: Arc<Mutex<Allocator>>,
    image: vk::Image,
    allocation: Option<Allocation>,
    key: ImageKey,
    info: ImageInfo,
}

impl VulkanImage {
    /// Create an image and register it in `images` (initial layout `Undefined`)
    pub fn new(
        ctx: &VulkanContext,
        images: &mut ImageRegistry,
        info: ImageInfo,
        name: &str,
    ) -> Result<Self> {
        let device = Arc::clone(ctx.device());

        let image_create_info = vk::ImageCreateInfo::default()
            .flags(create_flags_for(&info))
            .image_type(image_type_to_vk(info.dimension))
            .format(format_to_vk(info.format))
            .extent(vk::Extent3D {
                width: info.width,
                height: info.height,
                depth: info.depth,
            })
            .mip_levels(info.mip_levels)
            .array_layers(info.array_layers)
            .samples(vk::SampleCountFlags::TYPE_1)
            .tiling(vk::ImageTiling::OPTIMAL)
            .usage(usage_for(info.format))
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
            .initial_layout(vk::ImageLayout::UNDEFINED);

        unsafe {
            let image = device
                .create_image(&image_create_info, None)
                .map_err(|e| driver_err!(SOURCE, "Failed to create image '{}': {:?}", name, e))?;

            let requirements = device.get_image_memory_requirements(image);

            let allocated = ctx.lock_allocator().and_then(|mut allocator| {
                allocator
                    .allocate(&AllocationCreateDesc {
                        name,
                        requirements,
                        location: MemoryLocation::GpuOnly,
                        linear: false,
                        allocation_scheme: AllocationScheme::GpuAllocatorManaged,
                    })
                    .map_err(|_e| {
                        let size_mb = requirements.size as f64 / (1024.0 * 1024.0);
                        driver_error!(
                            SOURCE,
                            "Out of GPU memory for image '{}' ({}x{}x{}, layers: {}, {:.2} MB)",
                            name, info.width, info.height, info.depth, info.array_layers, size_mb
                        );
                        Error::OutOfMemory
                    })
            });

            let allocation = match allocated {
                Ok(allocation) => allocation,
                Err(e) => {
                    device.destroy_image(image, None);
                    return Err(e);
                }
            };

            if let Err(e) = device.bind_image_memory(image, allocation.memory(), allocation.offset()) {
                if let Ok(mut allocator) = ctx.lock_allocator() {
                    allocator.free(allocation).ok();
                }
                device.destroy_image(image, None);
                driver_bail!(SOURCE, "Failed to bind memory of image '{}': {:?}", name, e);
            }

            let key = images.insert(ImageResource::new(image_handle(image), info.clone()));

            Ok(Self {
                device,
                allocator: ctx.allocator(),
                image,
                allocation: Some(allocation),
                key,
                info,
            })
        }
    }

    /// Unregister the image from `images` and destroy it
    ///
    /// Dropping without `release()` destroys the GPU object but leaves a
    /// stale registry entry behind.
    pub fn release(self, images: &mut ImageRegistry) {
        images.remove(self.key);
    }

    pub fn image(&self) -> vk::Image {
        self.image
    }

    pub fn key(&self) -> ImageKey {
        self.key
    }

    pub fn info(&self) -> &ImageInfo {
        &self.info
    }

    /// Create a 2D (array) view matching `view`'s mip level, layers and format
    ///
    /// Layers of a 3D image address depth slices. The caller owns the
    /// returned view.
    pub fn create_view(&self, view: &AttachmentView) -> Result<vk::ImageView> {
        if view.image() != self.key {
            driver_bail!(SOURCE, "Attachment view does not reference this image");
        }

        let view_type = if view.layer_count() > 1 || self.info.dimension == ImageDimension::D3 {
            vk::ImageViewType::TYPE_2D_ARRAY
        } else {
            view_type_to_vk(ImageDimension::D2)
        };

        let view_create_info = vk::ImageViewCreateInfo::default()
            .image(self.image)
            .view_type(view_type)
            .format(format_to_vk(view.format()))
            .components(vk::ComponentMapping {
                r: vk::ComponentSwizzle::IDENTITY,
                g: vk::ComponentSwizzle::IDENTITY,
                b: vk::ComponentSwizzle::IDENTITY,
                a: vk::ComponentSwizzle::IDENTITY,
            })
            .subresource_range(vk::ImageSubresourceRange {
                aspect_mask: aspect_to_vk(view.format().aspects()),
                base_mip_level: view.mip_level(),
                level_count: 1,
                base_array_layer: view.first_layer(),
                layer_count: view.layer_count(),
            });

        unsafe {
            self.device
                .create_image_view(&view_create_info, None)
                .map_err(|e| driver_err!(SOURCE, "Failed to create image view: {:?}", e))
        }
    }

    /// Copy mip 0 of `layer` (depth slice for 3D images) back to the host
    ///
    /// The image is moved to `TransferSrc` through its registry entry.
    /// Color formats only.
    pub fn read_texels(
        &self,
        ctx: &VulkanContext,
        images: &mut ImageRegistry,
        layer: u32,
    ) -> Result<Vec<u8>> {
        let Some(texel_size) = color_texel_size(self.info.format) else {
            return Err(Error::InvalidResource(format!(
                "read_texels: {:?} is not a color format",
                self.info.format
            )));
        };
        let Some(resource) = images.get_mut(self.key) else {
            return Err(Error::InvalidResource("read_texels: image not registered".to_string()));
        };

        let size = u64::from(self.info.width) * u64::from(self.info.height) * u64::from(texel_size);
        let readback = ReadbackBuffer::new(ctx, size)?;

        let mut cmd = ctx.create_command_list()?;
        cmd.begin()?;

        if resource.layout() != ImageLayout::TransferSrc {
            resource.transition(&mut cmd, AspectFlags::COLOR, ImageLayout::TransferSrc)?;
        }

        let (base_array_layer, z) = if self.info.dimension == ImageDimension::D3 {
            (0, layer as i32)
        } else {
            (layer, 0)
        };

        let region = vk::BufferImageCopy::default()
            .buffer_offset(0)
            .image_subresource(vk::ImageSubresourceLayers {
                aspect_mask: vk::ImageAspectFlags::COLOR,
                mip_level: 0,
                base_array_layer,
                layer_count: 1,
            })
            .image_offset(vk::Offset3D { x: 0, y: 0, z })
            .image_extent(vk::Extent3D {
                width: self.info.width,
                height: self.info.height,
                depth: 1,
            });

        let host_barrier = vk::MemoryBarrier::default()
            .src_access_mask(vk::AccessFlags::TRANSFER_WRITE)
            .dst_access_mask(vk::AccessFlags::HOST_READ);

        unsafe {
            self.device.cmd_copy_image_to_buffer(
                cmd.command_buffer(),
                self.image,
                vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
                readback.buffer,
                &[region],
            );
            self.device.cmd_pipeline_barrier(
                cmd.command_buffer(),
                vk::PipelineStageFlags::TRANSFER,
                vk::PipelineStageFlags::HOST,
                vk::DependencyFlags::empty(),
                &[host_barrier],
                &[],
                &[],
            );
        }

        cmd.end()?;
        ctx.submit_and_wait(&cmd)?;

        readback.read(size as usize)
    }
}

impl Drop for VulkanImage {
    fn drop(&mut self) {
        unsafe {
            if let Some(allocation) = self.allocation.take() {
                match self.allocator.lock() {
                    Ok(mut allocator) => {
                        allocator.free(allocation).ok();
                    }
                    Err(_) => driver_warn!(SOURCE, "GPU allocator poisoned, leaking image memory"),
                }
            }
            self.device.destroy_image(self.image, None);
        }
    }
}

/// Host-visible buffer used by `read_texels()`
struct ReadbackBuffer {
    device: Arc<ash::Device>,
    allocator: Arc<Mutex<Allocator>>,
    buffer: vk::Buffer,
    allocation: Option<Allocation>,
}

impl ReadbackBuffer {
    fn new(ctx: &VulkanContext, size: u64) -> Result<Self> {
        let device = Arc::clone(ctx.device());
        let buffer_info = vk::BufferCreateInfo::default()
            .size(size)
            .usage(vk::BufferUsageFlags::TRANSFER_DST)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);

        unsafe {
            let buffer = device
                .create_buffer(&buffer_info, None)
                .map_err(|e| driver_err!(SOURCE, "Failed to create readback buffer: {:?}", e))?;

            let mut readback = Self {
                device: Arc::clone(&device),
                allocator: ctx.allocator(),
                buffer,
                allocation: None,
            };

            let requirements = device.get_buffer_memory_requirements(buffer);
            let allocation = ctx.lock_allocator()?.allocate(&AllocationCreateDesc {
                name: "readback",
                requirements,
                location: MemoryLocation::GpuToCpu,
                linear: true,
                allocation_scheme: AllocationScheme::GpuAllocatorManaged,
            })
            .map_err(|_e| {
                driver_error!(SOURCE, "Out of GPU memory for readback buffer ({} bytes)", size);
                Error::OutOfMemory
            })?;

            let bound = device.bind_buffer_memory(buffer, allocation.memory(), allocation.offset());
            readback.allocation = Some(allocation);
            bound.map_err(|e| driver_err!(SOURCE, "Failed to bind readback buffer memory: {:?}", e))?;

            Ok(readback)
        }
    }

    fn read(&self, len: usize) -> Result<Vec<u8>> {
        let Some(mapped) = self.allocation.as_ref().and_then(|a| a.mapped_slice()) else {
            driver_bail!(SOURCE, "Readback buffer is not host-mapped");
        };
        if mapped.len() < len {
            driver_bail!(SOURCE, "Readback buffer too small ({} < {})", mapped.len(), len);
        }
        Ok(mapped[..len].to_vec())
    }
}

impl Drop for ReadbackBuffer {
    fn drop(&mut self) {
        unsafe {
            if let Some(allocation) = self.allocation.take() {
                if let Ok(mut allocator) = self.allocator.lock() {
                    allocator.free(allocation).ok();
                }
            }
            self.device.destroy_buffer(self.buffer, None);
        }
    }
}
