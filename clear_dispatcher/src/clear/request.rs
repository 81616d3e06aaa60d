/// Clear requests: buffer selection mask, scissor, and clear values

use bitflags::bitflags;
use glam::Vec4;
use crate::resource::{AspectFlags, MAX_COLOR_ATTACHMENTS};

bitflags! {
    /// Attachments selected by a clear request
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearBuffers: u32 {
        const DEPTH = 1 << 0;
        const STENCIL = 1 << 1;
        const COLOR0 = 1 << 2;
        const COLOR1 = 1 << 3;
        const COLOR2 = 1 << 4;
        const COLOR3 = 1 << 5;
        const COLOR4 = 1 << 6;
        const COLOR5 = 1 << 7;
        const COLOR6 = 1 << 8;
        const COLOR7 = 1 << 9;

        const DEPTH_STENCIL = Self::DEPTH.bits() | Self::STENCIL.bits();
        const COLOR = Self::COLOR0.bits() | Self::COLOR1.bits() | Self::COLOR2.bits()
            | Self::COLOR3.bits() | Self::COLOR4.bits() | Self::COLOR5.bits()
            | Self::COLOR6.bits() | Self::COLOR7.bits();
    }
}

impl ClearBuffers {
    /// Bit selecting color attachment `index` (empty if out of range)
    pub fn color(index: usize) -> Self {
        if index >= MAX_COLOR_ATTACHMENTS {
            return Self::empty();
        }
        Self::from_bits_truncate(Self::COLOR0.bits() << index)
    }

    /// Returns true if color attachment `index` is selected
    pub fn selects_color(self, index: usize) -> bool {
        let bit = Self::color(index);
        !bit.is_empty() && self.contains(bit)
    }

    /// Depth/stencil aspects selected by the mask
    pub fn depth_stencil_aspects(self) -> AspectFlags {
        let mut aspects = AspectFlags::empty();
        if self.contains(Self::DEPTH) {
            aspects |= AspectFlags::DEPTH;
        }
        if self.contains(Self::STENCIL) {
            aspects |= AspectFlags::STENCIL;
        }
        aspects
    }
}

/// Scissor rectangle in framebuffer pixels, max exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScissorRect {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl ScissorRect {
    pub fn new(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }
}

/// One clear call
///
/// Built by the caller for a single `ClearDispatcher::clear()` and not
/// retained afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearRequest {
    pub buffers: ClearBuffers,
    pub scissor: Option<ScissorRect>,
    pub color: Vec4,
    pub depth: f64,
    pub stencil: u32,
}

impl ClearRequest {
    /// Clear `buffers` to transparent black, depth 1.0, stencil 0
    pub fn new(buffers: ClearBuffers) -> Self {
        Self {
            buffers,
            scissor: None,
            color: Vec4::ZERO,
            depth: 1.0,
            stencil: 0,
        }
    }

    pub fn with_scissor(mut self, scissor: ScissorRect) -> Self {
        self.scissor = Some(scissor);
        self
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_stencil(mut self, stencil: u32) -> Self {
        self.stencil = stencil;
        self
    }
}
