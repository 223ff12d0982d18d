//! Storage description of a pixel.
//!
//! The viewer never decodes pixel values; the protocol engine hands over
//! pixels already converted to the local format. All the store needs to know
//! is how many bytes a pixel occupies.

use std::fmt;

/// Describes the storage layout of pixels held in a [`PixelStore`](crate::PixelStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormat {
    /// Bits used per pixel (bpp), e.g. 32 for RGB888 in 32-bit storage.
    pub bits_per_pixel: u8,

    /// Significant colour bits, e.g. 24 for RGB888.
    pub depth: u8,

    /// Byte order for multi-byte pixels.
    pub big_endian: bool,
}

impl PixelFormat {
    /// Returns bytes-per-pixel (storage width), rounded up to the nearest byte.
    ///
    /// ```
    /// use rfb_pixelbuffer::PixelFormat;
    ///
    /// assert_eq!(PixelFormat::rgb888().bytes_per_pixel(), 4);
    /// assert_eq!(PixelFormat::rgb565().bytes_per_pixel(), 2);
    /// ```
    pub fn bytes_per_pixel(&self) -> u8 {
        self.bits_per_pixel.div_ceil(8)
    }

    /// Little-endian 32bpp, 24-bit depth. The local format of the viewer.
    pub const fn rgb888() -> Self {
        Self {
            bits_per_pixel: 32,
            depth: 24,
            big_endian: false,
        }
    }

    /// Little-endian 16bpp RGB565.
    pub const fn rgb565() -> Self {
        Self {
            bits_per_pixel: 16,
            depth: 16,
            big_endian: false,
        }
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        Self::rgb888()
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}bpp/depth {} {}",
            self.bits_per_pixel,
            self.depth,
            if self.big_endian { "BE" } else { "LE" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_per_pixel_rounds_up() {
        let pf = PixelFormat {
            bits_per_pixel: 12,
            depth: 12,
            big_endian: false,
        };
        assert_eq!(pf.bytes_per_pixel(), 2);
        assert_eq!(PixelFormat::rgb888().bytes_per_pixel(), 4);
    }

    #[test]
    fn test_display() {
        assert_eq!(PixelFormat::rgb888().to_string(), "32bpp/depth 24 LE");
    }
}
