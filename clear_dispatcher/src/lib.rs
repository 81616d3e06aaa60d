/*!
# Clear Dispatcher

Backend-agnostic clear path selection for explicit graphics APIs.

Given a request to clear some color/depth/stencil attachments of the bound
framebuffer, the dispatcher decides how to express it and records the
commands into a batch supplied by the backend.

## Architecture

- **CommandList**: recording primitives (barrier, attachment clear, direct
  image clears) implemented by a backend
- **BatchProvider**: yields the current batch, or one inside a render pass
- **FramebufferState / ImageRegistry**: attachments and the images behind
  them, including each image's current layout
- **ClearDispatcher**: routes each `ClearRequest` to the render-pass path or
  the direct image path

Backend implementations (Vulkan) provide concrete types for the traits.
*/

mod error;
pub mod clear;
pub mod command;
pub mod log;
pub mod resource;

pub use error::{Error, Result};

// Main namespace module
pub mod dispatch {
    pub use crate::error::{Error, Result};

    pub use crate::clear::{
        ClearBuffers, ClearConfig, ClearContext, ClearDispatcher, ClearOutcome, ClearRequest,
        ClearStats, RenderPassReason, ScissorRect,
    };

    // Logging sub-module (types only; driver_* macros live at the crate root)
    pub mod log {
        pub use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
    }

    // Recording sub-module
    pub mod command {
        pub use crate::command::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }
}

// Re-export math library at crate root
pub use glam;
