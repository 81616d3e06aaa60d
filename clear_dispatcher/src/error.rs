//! Error types for the clear dispatcher
//!
//! Routing decisions never fail. These errors come from the recording
//! backend (command buffer state, device loss) and from resource
//! construction (invalid attachment views, allocation failures).

use std::fmt;

/// Result type for clear dispatcher operations
pub type Result<T> = std::result::Result<T, Error>;

/// Clear dispatcher errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (Vulkan call failed, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (attachment view, image, format)
    InvalidResource(String),

    /// Recording target in the wrong state (not recording, no render pass bound)
    InvalidState(String),

    /// Initialization failed (instance, device, allocator)
    InitializationFailed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
