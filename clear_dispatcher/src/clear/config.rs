/// Clear dispatcher configuration and statistics

/// Configuration for `ClearDispatcher`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearConfig {
    /// Allow direct image clears for full-extent requests outside a render
    /// pass. When false every request takes the render-pass path.
    pub direct_image_clears: bool,

    /// Log every emitted command at trace level
    pub trace_commands: bool,
}

impl Default for ClearConfig {
    fn default() -> Self {
        Self {
            direct_image_clears: true,
            trace_commands: cfg!(debug_assertions),
        }
    }
}

/// Counters accumulated by `ClearDispatcher` across calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearStats {
    /// Render-pass-scoped clear commands emitted (fallbacks included)
    pub render_pass_clears: u64,
    /// Direct color image clears emitted
    pub direct_color_clears: u64,
    /// Direct depth/stencil image clears emitted
    pub direct_depth_stencil_clears: u64,
    /// Requests abandoned mid-way to the render-pass path
    pub fallbacks: u64,
    /// Layout transitions recorded before direct clears
    pub layout_transitions: u64,
}
