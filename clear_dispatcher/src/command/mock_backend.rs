/// Mock recording backend for unit tests (no GPU required)
///
/// `MockCommandList` stores every recorded command as a `RecordedCommand`
/// so tests can assert on the exact emitted sequence.

use std::sync::{Arc, Mutex};
use crate::command::{
    transition_render_pass_attachments, BatchProvider, ClearAttachment, ClearRect, CommandList,
    ImageBarrier, SubresourceRange,
};
use crate::error::{Error, Result};
use crate::log::{LogEntry, Logger};
use crate::resource::{FramebufferState, ImageHandle, ImageLayout, ImageRegistry};

// ============================================================================
// Recorded commands
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCommand {
    BeginRenderPass,
    Barrier(ImageBarrier),
    ClearAttachments {
        attachments: Vec<ClearAttachment>,
        rect: ClearRect,
    },
    ClearColorImage {
        image: ImageHandle,
        layout: ImageLayout,
        color: [f32; 4],
        range: SubresourceRange,
    },
    ClearDepthStencilImage {
        image: ImageHandle,
        layout: ImageLayout,
        depth: f32,
        stencil: u32,
        range: SubresourceRange,
    },
}

impl RecordedCommand {
    pub fn is_direct_clear(&self) -> bool {
        matches!(
            self,
            RecordedCommand::ClearColorImage { .. } | RecordedCommand::ClearDepthStencilImage { .. }
        )
    }
}

// ============================================================================
// Mock CommandList
// ============================================================================

#[derive(Debug, Default)]
pub struct MockCommandList {
    pub commands: Vec<RecordedCommand>,
    pub in_render_pass: bool,
    /// When set, every recording call fails with this error
    pub fail_with: Option<Error>,
}

impl MockCommandList {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, command: RecordedCommand) -> Result<()> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.commands.push(command);
        Ok(())
    }
}

impl CommandList for MockCommandList {
    fn in_render_pass(&self) -> bool {
        self.in_render_pass
    }

    fn pipeline_barrier(&mut self, barrier: &ImageBarrier) -> Result<()> {
        self.record(RecordedCommand::Barrier(*barrier))
    }

    fn clear_attachments(&mut self, attachments: &[ClearAttachment], rect: &ClearRect) -> Result<()> {
        if !self.in_render_pass {
            return Err(Error::InvalidState("clear_attachments outside a render pass".to_string()));
        }
        self.record(RecordedCommand::ClearAttachments {
            attachments: attachments.to_vec(),
            rect: *rect,
        })
    }

    fn clear_color_image(
        &mut self,
        image: ImageHandle,
        layout: ImageLayout,
        color: [f32; 4],
        range: &SubresourceRange,
    ) -> Result<()> {
        if self.in_render_pass {
            return Err(Error::InvalidState("clear_color_image inside a render pass".to_string()));
        }
        self.record(RecordedCommand::ClearColorImage { image, layout, color, range: *range })
    }

    fn clear_depth_stencil_image(
        &mut self,
        image: ImageHandle,
        layout: ImageLayout,
        depth: f32,
        stencil: u32,
        range: &SubresourceRange,
    ) -> Result<()> {
        if self.in_render_pass {
            return Err(Error::InvalidState("clear_depth_stencil_image inside a render pass".to_string()));
        }
        self.record(RecordedCommand::ClearDepthStencilImage {
            image,
            layout,
            depth,
            stencil,
            range: *range,
        })
    }
}

// ============================================================================
// Mock BatchProvider
// ============================================================================

/// Single-batch provider; `render_pass_batch()` enters a render pass on demand
#[derive(Debug, Default)]
pub struct MockBatchProvider {
    pub batch: MockCommandList,
    pub render_pass_requests: u32,
    /// Move attachments to their attachment layouts before entering
    pub transition_attachments: bool,
}

impl MockBatchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider whose batch is already inside a render pass
    pub fn in_render_pass() -> Self {
        let mut provider = Self::default();
        provider.batch.in_render_pass = true;
        provider
    }

    pub fn commands(&self) -> &[RecordedCommand] {
        &self.batch.commands
    }
}

impl BatchProvider for MockBatchProvider {
    fn current_batch(&mut self) -> Result<&mut dyn CommandList> {
        Ok(&mut self.batch)
    }

    fn render_pass_batch(
        &mut self,
        framebuffer: &FramebufferState,
        images: &mut ImageRegistry,
    ) -> Result<&mut dyn CommandList> {
        self.render_pass_requests += 1;
        if !self.batch.in_render_pass {
            if self.transition_attachments {
                transition_render_pass_attachments(&mut self.batch, framebuffer, images)?;
            }
            self.batch.commands.push(RecordedCommand::BeginRenderPass);
            self.batch.in_render_pass = true;
        }
        Ok(&mut self.batch)
    }
}

// ============================================================================
// Capture logger
// ============================================================================

/// Logger storing every entry for later assertions
pub struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl CaptureLogger {
    pub fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry.clone());
        }
    }
}
