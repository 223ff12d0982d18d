//! Drawing surface provided by the host windowing system.
//!
//! The view never draws directly. It asks the host to schedule repaints
//! ([`WindowHost::invalidate`]) and, while painting, to stretch framebuffer
//! snapshots into local rectangles ([`WindowHost::blit`]) and to fill the
//! letterbox ([`WindowHost::fill`]).

use crate::scroll::{Axis, ScrollbarInfo};
use rfb_common::{Dimension, Rect};
use rfb_pixelbuffer::RegionSnapshot;

/// Background colour as `[r, g, b]`.
pub type Rgb = [u8; 3];

/// Operations the view needs from a host window.
pub trait WindowHost {
    /// Client area of the window, scrollbars included.
    fn client_area(&self) -> Dimension;

    /// Schedule a repaint of a local rectangle.
    fn invalidate(&mut self, rect: Rect);

    /// Draw `snapshot` stretched into `dst`, touching only pixels inside `clip`.
    ///
    /// `dst` may extend past the viewport when the snapshot edges fall on
    /// fractional local pixels; `clip` is always inside the viewport.
    fn blit(&mut self, dst: Rect, clip: Rect, snapshot: &RegionSnapshot);

    /// Fill a local rectangle with a solid colour.
    fn fill(&mut self, rect: Rect, colour: Rgb);

    /// Update a scrollbar.
    fn set_scrollbar(&mut self, axis: Axis, info: ScrollbarInfo);
}

/// Host operation captured by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOp {
    Invalidate(Rect),
    Blit {
        dst: Rect,
        clip: Rect,
        source: Rect,
    },
    Fill(Rect, Rgb),
    Scrollbar(Axis, ScrollbarInfo),
}

/// Headless [`WindowHost`] that records every call.
///
/// Used by tests and by embedders running without a window.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    client_area: Dimension,
    ops: Vec<HostOp>,
}

impl RecordingHost {
    pub fn new(client_area: Dimension) -> Self {
        Self {
            client_area,
            ops: Vec::new(),
        }
    }

    /// Change the reported client area, as a window resize would.
    pub fn set_client_area(&mut self, client_area: Dimension) {
        self.client_area = client_area;
    }

    pub fn ops(&self) -> &[HostOp] {
        &self.ops
    }

    /// Remove and return all recorded operations.
    pub fn take_ops(&mut self) -> Vec<HostOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn invalidated(&self) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                HostOp::Invalidate(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    pub fn fills(&self) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                HostOp::Fill(r, _) => Some(*r),
                _ => None,
            })
            .collect()
    }

    pub fn blits(&self) -> Vec<(Rect, Rect, Rect)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                HostOp::Blit { dst, clip, source } => Some((*dst, *clip, *source)),
                _ => None,
            })
            .collect()
    }

    /// Most recent scrollbar update for `axis`.
    pub fn scrollbar(&self, axis: Axis) -> Option<ScrollbarInfo> {
        self.ops.iter().rev().find_map(|op| match op {
            HostOp::Scrollbar(a, info) if *a == axis => Some(*info),
            _ => None,
        })
    }
}

impl WindowHost for RecordingHost {
    fn client_area(&self) -> Dimension {
        self.client_area
    }

    fn invalidate(&mut self, rect: Rect) {
        self.ops.push(HostOp::Invalidate(rect));
    }

    fn blit(&mut self, dst: Rect, clip: Rect, snapshot: &RegionSnapshot) {
        self.ops.push(HostOp::Blit {
            dst,
            clip,
            source: snapshot.rect(),
        });
    }

    fn fill(&mut self, rect: Rect, colour: Rgb) {
        self.ops.push(HostOp::Fill(rect, colour));
    }

    fn set_scrollbar(&mut self, axis: Axis, info: ScrollbarInfo) {
        self.ops.push(HostOp::Scrollbar(axis, info));
    }
}
