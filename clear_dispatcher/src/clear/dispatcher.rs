//! Clear dispatcher
//!
//! Picks the mechanism used for one clear request and records it:
//!
//! - **Render-pass path**: a single `clear_attachments` inside a render
//!   pass. Always valid. Used for partial scissors, when a render pass is
//!   already active, under conditional rendering, or when direct clears
//!   are disabled.
//! - **Direct path**: one `clear_color_image` per selected color attachment
//!   then one `clear_depth_stencil_image`, each preceded by a layout
//!   transition when needed. Used for full-extent clears outside a render
//!   pass.
//!
//! A view that cannot be cleared directly (a 3D image addressed past layer
//! 0) abandons the direct path for the whole request, which is then
//! re-issued through the render-pass path. Direct clears already recorded
//! for earlier attachments stay in the batch.

use crate::clear::config::{ClearConfig, ClearStats};
use crate::clear::geometry::{covers_full_extent, Rect};
use crate::clear::image_clear::{
    clear_color_attachment, clear_depth_stencil_attachment, DirectClearStatus,
};
use crate::clear::render_pass_clear::{clear_in_render_pass, selects_bound_attachment};
use crate::clear::ClearRequest;
use crate::command::BatchProvider;
use crate::error::Result;
use crate::resource::{FramebufferState, ImageRegistry};
use crate::{driver_debug, driver_trace};

const SOURCE: &str = "clear::Dispatcher";

/// Everything a clear reads or writes besides the request itself
pub struct ClearContext<'a> {
    /// Currently bound framebuffer
    pub framebuffer: &'a FramebufferState,
    /// Images referenced by the framebuffer views (layouts are updated)
    pub images: &'a mut ImageRegistry,
    /// Source of the batch commands are recorded into
    pub batches: &'a mut dyn BatchProvider,
    /// Conditional rendering is active on the context
    pub render_condition_active: bool,
}

impl<'a> ClearContext<'a> {
    pub fn new(
        framebuffer: &'a FramebufferState,
        images: &'a mut ImageRegistry,
        batches: &'a mut dyn BatchProvider,
    ) -> Self {
        Self {
            framebuffer,
            images,
            batches,
            render_condition_active: false,
        }
    }

    pub fn with_render_condition(mut self, active: bool) -> Self {
        self.render_condition_active = active;
        self
    }
}

/// Why a request went through the render-pass path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPassReason {
    /// The scissor does not cover the whole framebuffer
    PartialScissor,
    /// The current batch is already inside a render pass
    InsideRenderPass,
    /// Direct image clears cannot be predicated
    ConditionalRendering,
    /// `ClearConfig::direct_image_clears` is off
    DirectClearsDisabled,
}

/// Path taken by `ClearDispatcher::clear()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The request selects no bound attachment
    Nothing,
    /// One render-pass-scoped clear
    RenderPass(RenderPassReason),
    /// Direct image clears only
    Direct { color_clears: u32, depth_stencil: bool },
    /// The direct path was abandoned after `direct_clears` clears and the
    /// request re-issued through the render-pass path
    Fallback { direct_clears: u32 },
}

enum DirectPass {
    Completed { color_clears: u32, depth_stencil: bool },
    FallbackRequired { direct_clears: u32 },
}

/// Routes clear requests to the render-pass or direct path
///
/// Holds no state between calls besides its configuration and counters.
#[derive(Debug, Default)]
pub struct ClearDispatcher {
    config: ClearConfig,
    stats: ClearStats,
}

impl ClearDispatcher {
    pub fn new(config: ClearConfig) -> Self {
        Self {
            config,
            stats: ClearStats::default(),
        }
    }

    pub fn config(&self) -> &ClearConfig {
        &self.config
    }

    pub fn stats(&self) -> &ClearStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = ClearStats::default();
    }

    /// Record the commands clearing `request` against the context
    ///
    /// Routing never fails. Errors come only from the recording backend.
    pub fn clear(&mut self, ctx: &mut ClearContext<'_>, request: &ClearRequest) -> Result<ClearOutcome> {
        let framebuffer = ctx.framebuffer;

        if !selects_bound_attachment(framebuffer, request.buffers) {
            driver_trace!(SOURCE, "Clear of {:?} selects no bound attachment", request.buffers);
            return Ok(ClearOutcome::Nothing);
        }

        if let Some(reason) = self.render_pass_reason(ctx, request)? {
            if !self.clear_in_render_pass(ctx, request)? {
                // Clamped away entirely (disjoint scissor, no layer)
                return Ok(ClearOutcome::Nothing);
            }
            return Ok(ClearOutcome::RenderPass(reason));
        }

        match self.direct_pass(ctx, request)? {
            DirectPass::Completed { color_clears, depth_stencil } => {
                Ok(ClearOutcome::Direct { color_clears, depth_stencil })
            }
            DirectPass::FallbackRequired { direct_clears } => {
                driver_debug!(
                    SOURCE,
                    "Direct clear not supported for a 3D attachment view, falling back after {} direct clear(s)",
                    direct_clears
                );
                self.stats.fallbacks += 1;
                self.clear_in_render_pass(ctx, request)?;
                Ok(ClearOutcome::Fallback { direct_clears })
            }
        }
    }

    fn render_pass_reason(
        &self,
        ctx: &mut ClearContext<'_>,
        request: &ClearRequest,
    ) -> Result<Option<RenderPassReason>> {
        let framebuffer = ctx.framebuffer;

        if let Some(scissor) = request.scissor {
            if !covers_full_extent(&Rect::from(scissor), framebuffer.width(), framebuffer.height()) {
                return Ok(Some(RenderPassReason::PartialScissor));
            }
        }

        let cmd = ctx.batches.current_batch()?;
        let reason = if cmd.in_render_pass() {
            Some(RenderPassReason::InsideRenderPass)
        } else if ctx.render_condition_active {
            Some(RenderPassReason::ConditionalRendering)
        } else if !self.config.direct_image_clears {
            Some(RenderPassReason::DirectClearsDisabled)
        } else {
            None
        };
        Ok(reason)
    }

    fn clear_in_render_pass(&mut self, ctx: &mut ClearContext<'_>, request: &ClearRequest) -> Result<bool> {
        let recorded = clear_in_render_pass(ctx.batches, ctx.framebuffer, ctx.images, request)?;
        if recorded {
            self.stats.render_pass_clears += 1;
            if self.config.trace_commands {
                driver_trace!(SOURCE, "clear_attachments {:?} scissor {:?}", request.buffers, request.scissor);
            }
        }
        Ok(recorded)
    }

    fn direct_pass(&mut self, ctx: &mut ClearContext<'_>, request: &ClearRequest) -> Result<DirectPass> {
        let framebuffer = ctx.framebuffer;
        let cmd = ctx.batches.current_batch()?;
        let mut color_clears = 0;

        for (index, view) in framebuffer.color_attachments() {
            if !request.buffers.selects_color(index) {
                continue;
            }

            match clear_color_attachment(cmd, ctx.images, view, request.color)? {
                DirectClearStatus::Emitted { transitioned } => {
                    self.count_direct_clear(transitioned);
                    self.stats.direct_color_clears += 1;
                    color_clears += 1;
                    if self.config.trace_commands {
                        driver_trace!(SOURCE, "clear_color_image attachment {} transitioned={}", index, transitioned);
                    }
                }
                DirectClearStatus::Skipped => {}
                DirectClearStatus::FallbackRequired => {
                    return Ok(DirectPass::FallbackRequired { direct_clears: color_clears });
                }
            }
        }

        let requested = request.buffers.depth_stencil_aspects();
        let mut depth_stencil = false;
        let view = framebuffer
            .depth_stencil_attachment()
            .filter(|_| !requested.is_empty());

        if let Some(view) = view {
            let status = clear_depth_stencil_attachment(
                cmd,
                ctx.images,
                view,
                requested,
                request.depth,
                request.stencil,
            )?;

            match status {
                DirectClearStatus::Emitted { transitioned } => {
                    self.count_direct_clear(transitioned);
                    self.stats.direct_depth_stencil_clears += 1;
                    depth_stencil = true;
                    if self.config.trace_commands {
                        driver_trace!(SOURCE, "clear_depth_stencil_image {:?} transitioned={}", requested, transitioned);
                    }
                }
                DirectClearStatus::Skipped => {}
                DirectClearStatus::FallbackRequired => {
                    return Ok(DirectPass::FallbackRequired { direct_clears: color_clears });
                }
            }
        }

        Ok(DirectPass::Completed { color_clears, depth_stencil })
    }

    fn count_direct_clear(&mut self, transitioned: bool) {
        if transitioned {
            self.stats.layout_transitions += 1;
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
