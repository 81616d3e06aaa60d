//! Resource module
//!
//! Images, attachment views, and framebuffer state read and updated by the
//! clear path.

pub mod format;
pub mod image;
pub mod framebuffer;

pub use format::Format;
pub use image::{
    AspectFlags, ImageLayout, ImageDimension, ImageHandle,
    ImageInfo, ImageResource, ImageKey, ImageRegistry,
};
pub use framebuffer::{AttachmentView, FramebufferState, MAX_COLOR_ATTACHMENTS};
