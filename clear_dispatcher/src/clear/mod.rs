//! Clear path selection and emission
//!
//! `ClearDispatcher::clear()` is the entry point. The other modules are the
//! pieces it is built from and are public so backends and tests can reuse
//! them.

pub mod color;
pub mod config;
pub mod dispatcher;
pub mod geometry;
pub mod image_clear;
pub mod render_pass_clear;
pub mod request;

pub use config::{ClearConfig, ClearStats};
pub use dispatcher::{ClearContext, ClearDispatcher, ClearOutcome, RenderPassReason};
pub use image_clear::DirectClearStatus;
pub use request::{ClearBuffers, ClearRequest, ScissorRect};
