//! Scrollbar visibility and ranges.
//!
//! Showing a scrollbar takes client area away from the opposite axis, which
//! can in turn make that axis need a scrollbar too. [`ScrollState::recompute`]
//! resolves this in two passes: first assuming no bars, then once more with
//! the bars implied by the first pass subtracted. Adding a bar only ever
//! shrinks the space of the other axis, so a bar found in the first pass is
//! kept and no third pass is needed.
//!
//! Ranges and positions are in framebuffer pixels, so a scrollbar position
//! maps directly to a viewport origin component.

use crate::scaling::scaled_exceeds;
use crate::viewport::ViewportTransform;
use rfb_common::Dimension;
use tracing::debug;

/// Scrollbar orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Values pushed to a host scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollbarInfo {
    pub visible: bool,
    /// Largest thumb position.
    pub range: u32,
    /// Visible span, used as the thumb size and the page step.
    pub page: u32,
    pub position: u32,
}

/// Scrollbar actions delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAction {
    LineUp,
    LineDown,
    PageUp,
    PageDown,
    /// Thumb dragged or released at this position.
    Track(i32),
    Top,
    Bottom,
}

/// Derived scrollbar state for the current layout.
#[derive(Debug, Clone)]
pub struct ScrollState {
    scrollbar_size: u32,
    line_step: u32,
    need_horizontal: bool,
    need_vertical: bool,
    viewport: Dimension,
}

impl ScrollState {
    pub fn new(scrollbar_size: u32, line_step: u32) -> Self {
        Self {
            scrollbar_size,
            line_step,
            need_horizontal: false,
            need_vertical: false,
            viewport: Dimension::default(),
        }
    }

    pub fn need_horizontal(&self) -> bool {
        self.need_horizontal
    }

    pub fn need_vertical(&self) -> bool {
        self.need_vertical
    }

    /// Client area left for the image once visible scrollbars are removed.
    pub fn viewport(&self) -> Dimension {
        self.viewport
    }

    /// Recompute scrollbar visibility and return the new viewport size.
    pub fn recompute(&mut self, framebuffer: Dimension, percent: u32, client: Dimension) -> Dimension {
        let bar = self.scrollbar_size;

        let mut need_h = scaled_exceeds(framebuffer.width, percent, client.width);
        let mut need_v = scaled_exceeds(framebuffer.height, percent, client.height);

        let width = client.width.saturating_sub(if need_v { bar } else { 0 });
        let height = client.height.saturating_sub(if need_h { bar } else { 0 });
        need_h |= scaled_exceeds(framebuffer.width, percent, width);
        need_v |= scaled_exceeds(framebuffer.height, percent, height);

        let viewport = Dimension::new(
            client.width.saturating_sub(if need_v { bar } else { 0 }),
            client.height.saturating_sub(if need_h { bar } else { 0 }),
        );

        if need_h != self.need_horizontal || need_v != self.need_vertical {
            debug!(
                "Scrollbars: horizontal={} vertical={} (viewport {})",
                need_h, need_v, viewport
            );
        }
        self.need_horizontal = need_h;
        self.need_vertical = need_v;
        self.viewport = viewport;
        viewport
    }

    /// Scrollbar values for `axis` given the current transform.
    pub fn info(&self, axis: Axis, transform: &ViewportTransform) -> ScrollbarInfo {
        let (visible, range, page, position) = match axis {
            Axis::Horizontal => (
                self.need_horizontal,
                transform.max_origin().x,
                self.viewport.width as f64 / transform.scale(),
                transform.origin().x,
            ),
            Axis::Vertical => (
                self.need_vertical,
                transform.max_origin().y,
                self.viewport.height as f64 / transform.scale(),
                transform.origin().y,
            ),
        };
        if !visible {
            return ScrollbarInfo::default();
        }
        ScrollbarInfo {
            visible,
            range: range.ceil() as u32,
            page: page.floor() as u32,
            position: position.round().max(0.0) as u32,
        }
    }

    /// Origin component on `axis` after applying `action`.
    pub fn position_after(&self, axis: Axis, action: ScrollAction, transform: &ViewportTransform) -> f64 {
        let info = self.info(axis, transform);
        let current = match axis {
            Axis::Horizontal => transform.origin().x,
            Axis::Vertical => transform.origin().y,
        };
        let line = self.line_step as f64;
        let page = info.page.max(1) as f64;
        match action {
            ScrollAction::LineUp => current - line,
            ScrollAction::LineDown => current + line,
            ScrollAction::PageUp => current - page,
            ScrollAction::PageDown => current + page,
            ScrollAction::Track(pos) => pos as f64,
            ScrollAction::Top => 0.0,
            ScrollAction::Bottom => info.range as f64,
        }
    }
}
