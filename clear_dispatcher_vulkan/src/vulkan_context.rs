/// VulkanContext - headless device bring-up for recording and submitting clears
///
/// Contains everything needed to run the clear path on a GPU:
/// - Device for Vulkan API calls
/// - Allocator for image memory
/// - Queue for command submission

use ash::vk;
use clear_dispatcher::dispatch::{Error, Result};
use clear_dispatcher::{driver_err, driver_error, driver_info};
use gpu_allocator::vulkan::{Allocator, AllocatorCreateDesc};
use std::ffi::CString;
use std::mem::ManuallyDrop;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::vulkan_command_list::VulkanCommandList;

const SOURCE: &str = "clear::vulkan";

/// Backend configuration
#[derive(Debug, Clone)]
pub struct VulkanConfig {
    /// Enable VK_LAYER_KHRONOS_validation and route its messages to the logger
    pub enable_validation: bool,
    /// Application name reported to the driver
    pub app_name: String,
}

impl Default for VulkanConfig {
    fn default() -> Self {
        Self {
            enable_validation: cfg!(feature = "vulkan-validation"),
            app_name: "clear_dispatcher".to_string(),
        }
    }
}

/// Headless Vulkan device, queue and allocator
///
/// Images created from this context must be dropped before it.
pub struct VulkanContext {
    /// Vulkan entry (keeps the loader alive)
    _entry: ash::Entry,
    instance: ash::Instance,
    physical_device: vk::PhysicalDevice,
    device: Arc<ash::Device>,

    /// Graphics queue
    queue: vk::Queue,
    queue_family: u32,

    /// GPU memory allocator
    /// Wrapped in ManuallyDrop so it is dropped BEFORE the device is destroyed
    allocator: ManuallyDrop<Arc<Mutex<Allocator>>>,

    /// Fence for submit_and_wait()
    submit_fence: vk::Fence,

    debug_utils: Option<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)>,
}

impl VulkanContext {
    /// Create a headless context on the first GPU exposing a graphics queue
    pub fn new(config: VulkanConfig) -> Result<Self> {
        unsafe {
            let entry = ash::Entry::load().map_err(|e| {
                driver_error!(SOURCE, "Failed to load Vulkan library: {:?}", e);
                Error::InitializationFailed(format!("Failed to load Vulkan library: {:?}", e))
            })?;

            let app_name = CString::new(config.app_name.clone())
                .map_err(|e| Error::InitializationFailed(format!("Invalid application name: {}", e)))?;

            let app_info = vk::ApplicationInfo::default()
                .application_name(&app_name)
                .application_version(vk::make_api_version(0, 1, 0, 0))
                .engine_name(c"clear_dispatcher")
                .engine_version(vk::make_api_version(0, 0, 1, 0))
                .api_version(vk::API_VERSION_1_2);

            let mut extension_names = Vec::new();
            let mut layer_names = Vec::new();
            if config.enable_validation {
                extension_names.push(ash::ext::debug_utils::NAME.as_ptr());
                layer_names.push(c"VK_LAYER_KHRONOS_validation".as_ptr());
            }

            let create_info = vk::InstanceCreateInfo::default()
                .application_info(&app_info)
                .enabled_layer_names(&layer_names)
                .enabled_extension_names(&extension_names);

            let instance = entry.create_instance(&create_info, None).map_err(|e| {
                driver_error!(SOURCE, "Failed to create Vulkan instance: {:?}", e);
                Error::InitializationFailed(format!("Failed to create instance: {:?}", e))
            })?;

            let debug_utils = if config.enable_validation {
                let loader = ash::ext::debug_utils::Instance::new(&entry, &instance);
                match loader.create_debug_utils_messenger(&crate::vulkan_debug::messenger_create_info(), None) {
                    Ok(messenger) => Some((loader, messenger)),
                    Err(e) => {
                        instance.destroy_instance(None);
                        driver_error!(SOURCE, "Failed to create debug messenger: {:?}", e);
                        return Err(Error::InitializationFailed(format!(
                            "Failed to create debug messenger: {:?}",
                            e
                        )));
                    }
                }
            } else {
                None
            };

            // Pick the first device with a graphics queue
            let physical_devices = instance.enumerate_physical_devices().map_err(|e| {
                driver_error!(SOURCE, "Failed to enumerate physical devices: {:?}", e);
                Error::InitializationFailed(format!("Failed to enumerate physical devices: {:?}", e))
            })?;

            let selected = physical_devices.into_iter().find_map(|physical_device| {
                instance
                    .get_physical_device_queue_family_properties(physical_device)
                    .iter()
                    .position(|qf| qf.queue_flags.contains(vk::QueueFlags::GRAPHICS))
                    .map(|index| (physical_device, index as u32))
            });

            let Some((physical_device, queue_family)) = selected else {
                driver_error!(SOURCE, "No Vulkan-capable GPU with a graphics queue found");
                return Err(Error::InitializationFailed(
                    "No Vulkan-capable GPU with a graphics queue found".to_string(),
                ));
            };

            let properties = instance.get_physical_device_properties(physical_device);
            let device_name = properties
                .device_name_as_c_str()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|_| "Unknown".to_string());
            driver_info!(SOURCE, "Using GPU '{}' (queue family {})", device_name, queue_family);

            let queue_priorities = [1.0];
            let queue_create_infos = [vk::DeviceQueueCreateInfo::default()
                .queue_family_index(queue_family)
                .queue_priorities(&queue_priorities)];

            let device_create_info =
                vk::DeviceCreateInfo::default().queue_create_infos(&queue_create_infos);

            let device = Arc::new(
                instance
                    .create_device(physical_device, &device_create_info, None)
                    .map_err(|e| {
                        driver_error!(SOURCE, "Failed to create logical device: {:?}", e);
                        Error::InitializationFailed(format!("Failed to create device: {:?}", e))
                    })?,
            );

            let queue = device.get_device_queue(queue_family, 0);

            let allocator = Allocator::new(&AllocatorCreateDesc {
                instance: instance.clone(),
                device: (*device).clone(),
                physical_device,
                debug_settings: Default::default(),
                buffer_device_address: false,
                allocation_sizes: Default::default(),
            })
            .map_err(|e| {
                driver_error!(SOURCE, "Failed to create GPU allocator: {:?}", e);
                Error::InitializationFailed(format!("Failed to create allocator: {:?}", e))
            })?;

            let submit_fence = device
                .create_fence(&vk::FenceCreateInfo::default(), None)
                .map_err(|e| {
                    driver_error!(SOURCE, "Failed to create submit fence: {:?}", e);
                    Error::InitializationFailed(format!("Failed to create fence: {:?}", e))
                })?;

            Ok(Self {
                _entry: entry,
                instance,
                physical_device,
                device,
                queue,
                queue_family,
                allocator: ManuallyDrop::new(Arc::new(Mutex::new(allocator))),
                submit_fence,
                debug_utils,
            })
        }
    }

    pub fn device(&self) -> &Arc<ash::Device> {
        &self.device
    }

    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    pub fn queue_family(&self) -> u32 {
        self.queue_family
    }

    /// Lock the allocator
    pub(crate) fn lock_allocator(&self) -> Result<MutexGuard<'_, Allocator>> {
        self.allocator
            .lock()
            .map_err(|_| driver_err!(SOURCE, "GPU allocator mutex poisoned"))
    }

    pub(crate) fn allocator(&self) -> Arc<Mutex<Allocator>> {
        Arc::clone(&self.allocator)
    }

    /// Create a command list on the graphics queue family
    pub fn create_command_list(&self) -> Result<VulkanCommandList> {
        VulkanCommandList::new(Arc::clone(&self.device), self.queue_family)
    }

    /// Submit one finished command list and block until the GPU is done
    pub fn submit_and_wait(&self, cmd: &VulkanCommandList) -> Result<()> {
        if cmd.is_recording() {
            return Err(driver_err!(SOURCE, "submit_and_wait: command list still recording"));
        }

        let command_buffers = [cmd.command_buffer()];
        let submit_info = vk::SubmitInfo::default().command_buffers(&command_buffers);

        unsafe {
            self.device
                .reset_fences(&[self.submit_fence])
                .map_err(|e| driver_err!(SOURCE, "submit: failed to reset fence: {:?}", e))?;

            self.device
                .queue_submit(self.queue, &[submit_info], self.submit_fence)
                .map_err(|e| driver_err!(SOURCE, "submit: failed to submit queue: {:?}", e))?;

            self.device
                .wait_for_fences(&[self.submit_fence], true, u64::MAX)
                .map_err(|e| driver_err!(SOURCE, "submit: failed to wait for fence: {:?}", e))?;
        }

        Ok(())
    }

    pub fn wait_idle(&self) -> Result<()> {
        unsafe {
            self.device
                .device_wait_idle()
                .map_err(|e| driver_err!(SOURCE, "Failed to wait idle: {:?}", e))
        }
    }
}

impl Drop for VulkanContext {
    fn drop(&mut self) {
        unsafe {
            self.device.device_wait_idle().ok();

            self.device.destroy_fence(self.submit_fence, None);

            // Free VkDeviceMemory pages BEFORE destroying the device
            ManuallyDrop::drop(&mut self.allocator);

            if let Some((loader, messenger)) = self.debug_utils.take() {
                loader.destroy_debug_utils_messenger(messenger, None);
            }

            self.device.destroy_device(None);
            self.instance.destroy_instance(None);
        }
    }
}
