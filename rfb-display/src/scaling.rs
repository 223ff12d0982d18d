//! Scale selection for the remote desktop view.
//!
//! A scale is either [`ScaleMode::Auto`], recomputed to fit the client area
//! whenever the window or the remote screen changes size, or an explicit
//! percentage chosen by the user. Percentages are kept as integers so that
//! the fit test shared by the viewport and the scrollbars is exact.

use rfb_common::Dimension;
use std::fmt;
use tracing::debug;

/// Requested scaling for the framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleMode {
    /// Largest scale up to 100% that shows the whole remote screen.
    Auto,
    /// Explicit percentage, clamped to [`ScaleLimits`].
    Percent(u32),
}

impl Default for ScaleMode {
    fn default() -> Self {
        Self::Percent(100)
    }
}

impl fmt::Display for ScaleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "Auto"),
            Self::Percent(p) => write!(f, "{}%", p),
        }
    }
}

/// Bounds applied to explicit scale requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleLimits {
    pub min_percent: u32,
    pub max_percent: u32,
}

impl Default for ScaleLimits {
    fn default() -> Self {
        Self {
            min_percent: 10,
            max_percent: 800,
        }
    }
}

impl ScaleLimits {
    /// Limits usable for clamping: the minimum is at least 1% and the
    /// maximum never below the minimum. An inverted pair collapses to the
    /// minimum.
    pub fn normalized(&self) -> Self {
        let min_percent = self.min_percent.max(1);
        Self {
            min_percent,
            max_percent: self.max_percent.max(min_percent),
        }
    }

    /// Clamp a requested percentage. Out-of-range requests are not errors.
    pub fn clamp_percent(&self, percent: u32) -> u32 {
        let limits = self.normalized();
        let clamped = percent.clamp(limits.min_percent, limits.max_percent);
        if clamped != percent {
            debug!(
                "Scale {}% clamped to {}% (limits {}..={})",
                percent, clamped, limits.min_percent, limits.max_percent
            );
        }
        clamped
    }

    /// Resolve a mode to a concrete percentage for the given sizes.
    pub fn resolve(&self, mode: ScaleMode, framebuffer: Dimension, area: Dimension) -> u32 {
        match mode {
            ScaleMode::Auto => self.clamp_percent(auto_scale_percent(framebuffer, area)),
            ScaleMode::Percent(p) => self.clamp_percent(p),
        }
    }
}

/// Largest whole percentage, at most 100, at which `framebuffer` fits in `area`.
///
/// The ratio is floored so the scaled image never exceeds the area. Returns
/// 100 when the framebuffer already fits or either size is empty.
pub fn auto_scale_percent(framebuffer: Dimension, area: Dimension) -> u32 {
    if framebuffer.is_empty() || area.is_empty() {
        return 100;
    }
    if framebuffer.width <= area.width && framebuffer.height <= area.height {
        return 100;
    }

    let by_width = area.width as u64 * 100 / framebuffer.width as u64;
    let by_height = area.height as u64 * 100 / framebuffer.height as u64;
    by_width.min(by_height).min(100) as u32
}

/// True when `length` framebuffer pixels scaled by `percent` take more than
/// `available` local pixels.
///
/// Integer arithmetic: the viewport and the scrollbar logic must agree exactly.
pub fn scaled_exceeds(length: u32, percent: u32, available: u32) -> bool {
    length as u64 * percent as u64 > available as u64 * 100
}

/// Convert a percentage to a ratio (100% = 1.0).
pub fn percent_to_ratio(percent: u32) -> f64 {
    percent as f64 / 100.0
}

/// Format a ratio for status displays.
pub fn scale_to_percent_string(scale: f64) -> String {
    format!("{:.0}%", scale * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_mode_display() {
        assert_eq!(ScaleMode::Auto.to_string(), "Auto");
        assert_eq!(ScaleMode::Percent(150).to_string(), "150%");
    }

    #[test]
    fn test_auto_scale_fits_both_axes() {
        let fb = Dimension::new(1024, 768);
        assert_eq!(auto_scale_percent(fb, Dimension::new(800, 600)), 78);
        // Height is the limiting axis here
        assert_eq!(auto_scale_percent(fb, Dimension::new(1000, 384)), 50);
    }

    #[test]
    fn test_auto_scale_never_enlarges() {
        let fb = Dimension::new(640, 480);
        assert_eq!(auto_scale_percent(fb, Dimension::new(1920, 1080)), 100);
        assert_eq!(auto_scale_percent(fb, Dimension::new(0, 0)), 100);
    }

    #[test]
    fn test_clamp_percent() {
        let limits = ScaleLimits::default();
        assert_eq!(limits.clamp_percent(5), 10);
        assert_eq!(limits.clamp_percent(1000), 800);
        assert_eq!(limits.clamp_percent(250), 250);
    }

    #[test]
    fn test_degenerate_limits_are_normalized() {
        let inverted = ScaleLimits {
            min_percent: 500,
            max_percent: 100,
        };
        assert_eq!(
            inverted.normalized(),
            ScaleLimits {
                min_percent: 500,
                max_percent: 500
            }
        );
        assert_eq!(inverted.clamp_percent(150), 500);

        let zero = ScaleLimits {
            min_percent: 0,
            max_percent: 0,
        };
        assert_eq!(zero.clamp_percent(0), 1);
        assert_eq!(zero.resolve(ScaleMode::Percent(300), Dimension::new(10, 10), Dimension::new(10, 10)), 1);
    }

    #[test]
    fn test_resolve_auto_respects_minimum() {
        let limits = ScaleLimits {
            min_percent: 50,
            max_percent: 200,
        };
        let percent = limits.resolve(
            ScaleMode::Auto,
            Dimension::new(4000, 4000),
            Dimension::new(400, 400),
        );
        assert_eq!(percent, 50);
    }

    #[test]
    fn test_scaled_exceeds() {
        assert!(!scaled_exceeds(1024, 78, 800)); // 798.72
        assert!(scaled_exceeds(1024, 79, 800)); // 808.96
        assert!(!scaled_exceeds(800, 100, 800));
    }

    #[test]
    fn test_percent_string() {
        assert_eq!(scale_to_percent_string(percent_to_ratio(150)), "150%");
        assert_eq!(scale_to_percent_string(0.5), "50%");
    }
}
