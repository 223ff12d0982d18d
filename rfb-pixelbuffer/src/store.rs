//! Mutex-guarded store for the remote screen image.
//!
//! [`PixelStore`] owns the pixels of the remote framebuffer. The allocation
//! (its *capacity*) may be larger than the remote screen; only the *valid*
//! region, equal to the last size passed to [`PixelStore::resize`], is ever
//! written or read.
//!
//! # Locking
//!
//! A single [`parking_lot::Mutex`] guards the buffer. Critical sections are
//! kept proportional to the rectangle being copied:
//!
//! - [`write`](PixelStore::write) holds the lock for the row copies only.
//! - [`read_region`](PixelStore::read_region) copies the requested rectangle
//!   into a [`RegionSnapshot`] and releases the lock before returning, so the
//!   caller blits without blocking the decode producer.
//! - [`resize`](PixelStore::resize) holds the lock for the whole operation.
//!
//! Because both writers and readers copy a rectangle under the lock, a reader
//! observes every written rectangle either completely old or completely new.
//!
//! # Example
//!
//! ```
//! use rfb_common::{Dimension, Rect};
//! use rfb_pixelbuffer::{PixelFormat, PixelStore};
//!
//! let store = PixelStore::new(PixelFormat::rgb888());
//! store.resize(Dimension::new(64, 64));
//!
//! let rect = Rect::new(8, 8, 2, 2);
//! let pixels = vec![0xAB; 2 * 2 * 4];
//! store.write(rect, &pixels, 0).unwrap();
//!
//! let snapshot = store.read_region(rect);
//! assert_eq!(snapshot.data(), &pixels[..]);
//! ```

use crate::{PixelFormat, PixelStoreError};
use parking_lot::Mutex;
use rfb_common::{Dimension, Rect};
use std::sync::Arc;
use tracing::{debug, trace};

/// Store shared between the decode producer and the UI thread.
pub type SharedPixelStore = Arc<PixelStore>;

/// Backing storage, only touched with the store lock held.
#[derive(Debug)]
struct Surface {
    /// Row-major pixels, `capacity.width` pixels per row.
    data: Vec<u8>,
    /// Allocated size. Never shrinks.
    capacity: Dimension,
    /// Size of the remote screen; the only addressable region.
    valid: Dimension,
}

impl Surface {
    fn stride(&self) -> usize {
        self.capacity.width as usize
    }

    /// Widened to i64 so rectangles near the i32 limits cannot wrap into range.
    fn check_bounds(&self, rect: Rect) -> Result<(), PixelStoreError> {
        let fits = |start: i32, len: u32, limit: u32| {
            start >= 0 && i64::from(start) + i64::from(len) <= i64::from(limit)
        };
        if !fits(rect.x, rect.width, self.valid.width) || !fits(rect.y, rect.height, self.valid.height) {
            return Err(PixelStoreError::OutOfBounds {
                rect,
                dimension: self.valid,
            });
        }
        Ok(())
    }
}

/// Pixel buffer holding the full remote screen image.
#[derive(Debug)]
pub struct PixelStore {
    format: PixelFormat,
    surface: Mutex<Surface>,
}

impl PixelStore {
    /// Create an empty store. Call [`resize`](Self::resize) once the remote
    /// screen size is known.
    pub fn new(format: PixelFormat) -> Self {
        Self {
            format,
            surface: Mutex::new(Surface {
                data: Vec::new(),
                capacity: Dimension::default(),
                valid: Dimension::default(),
            }),
        }
    }

    /// Create a store already sized for `dimension`.
    pub fn with_dimension(format: PixelFormat, dimension: Dimension) -> Self {
        let store = Self::new(format);
        store.resize(dimension);
        store
    }

    /// Convenience constructor returning a [`SharedPixelStore`].
    pub fn shared(format: PixelFormat) -> SharedPixelStore {
        Arc::new(Self::new(format))
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel() as usize
    }

    /// Current valid dimension (the remote screen size).
    pub fn dimension(&self) -> Dimension {
        self.surface.lock().valid
    }

    /// Allocated size; always at least [`dimension`](Self::dimension).
    pub fn capacity(&self) -> Dimension {
        self.surface.lock().capacity
    }

    /// Set the valid region to `dimension`.
    ///
    /// Storage is reallocated only when the current capacity is too small on
    /// either axis. Old contents are not preserved: the whole buffer is
    /// cleared, a full-frame update is expected to follow.
    pub fn resize(&self, dimension: Dimension) {
        let bpp = self.bytes_per_pixel();
        let mut surface = self.surface.lock();

        if dimension.width > surface.capacity.width || dimension.height > surface.capacity.height {
            let capacity = Dimension::new(
                dimension.width.max(surface.capacity.width),
                dimension.height.max(surface.capacity.height),
            );
            debug!(
                "Reallocating pixel store: {} -> {} (valid {})",
                surface.capacity, capacity, dimension
            );
            surface.data = vec![0u8; capacity.area() as usize * bpp];
            surface.capacity = capacity;
        } else {
            surface.data.fill(0);
        }
        surface.valid = dimension;
    }

    /// Copy `pixels` into the store at `rect`.
    ///
    /// `stride` is the source row length in **pixels**; 0 means tightly
    /// packed (`rect.width`). On error the store is left unchanged.
    pub fn write(&self, rect: Rect, pixels: &[u8], stride: usize) -> Result<(), PixelStoreError> {
        if rect.is_empty() {
            return Ok(());
        }

        let bpp = self.bytes_per_pixel();
        let src_stride = if stride == 0 { rect.width as usize } else { stride };
        let row_bytes = rect.width as usize * bpp;
        let required = src_stride
            .checked_mul(bpp)
            .and_then(|row| row.checked_mul(rect.height as usize - 1))
            .and_then(|rows| rows.checked_add(row_bytes))
            .unwrap_or(usize::MAX);
        if pixels.len() < required {
            return Err(PixelStoreError::DataLength {
                expected: required,
                actual: pixels.len(),
            });
        }

        let mut surface = self.surface.lock();
        surface.check_bounds(rect)?;

        let dst_stride = surface.stride();
        for row in 0..rect.height as usize {
            let dst = ((rect.y as usize + row) * dst_stride + rect.x as usize) * bpp;
            let src = row * src_stride * bpp;
            surface.data[dst..dst + row_bytes].copy_from_slice(&pixels[src..src + row_bytes]);
        }
        trace!("Wrote {} into pixel store", rect);
        Ok(())
    }

    /// Fill `rect` with a single pixel value.
    pub fn fill(&self, rect: Rect, pixel: &[u8]) -> Result<(), PixelStoreError> {
        let bpp = self.bytes_per_pixel();
        if pixel.len() != bpp {
            return Err(PixelStoreError::DataLength {
                expected: bpp,
                actual: pixel.len(),
            });
        }

        let mut surface = self.surface.lock();
        surface.check_bounds(rect)?;

        let stride = surface.stride();
        for row in 0..rect.height as usize {
            let start = ((rect.y as usize + row) * stride + rect.x as usize) * bpp;
            for chunk in surface.data[start..start + rect.width as usize * bpp].chunks_exact_mut(bpp) {
                chunk.copy_from_slice(pixel);
            }
        }
        Ok(())
    }

    /// Copy out `rect` intersected with the valid region.
    ///
    /// Returns an empty snapshot when the rectangle lies fully outside. The
    /// lock is released before this returns.
    pub fn read_region(&self, rect: Rect) -> RegionSnapshot {
        let bpp = self.bytes_per_pixel();
        let surface = self.surface.lock();

        let Some(clipped) = surface.valid.to_rect().intersection(&rect) else {
            return RegionSnapshot::empty(self.format);
        };

        let stride = surface.stride();
        let row_bytes = clipped.width as usize * bpp;
        let mut data = Vec::with_capacity(row_bytes * clipped.height as usize);
        for row in 0..clipped.height as usize {
            let start = ((clipped.y as usize + row) * stride + clipped.x as usize) * bpp;
            data.extend_from_slice(&surface.data[start..start + row_bytes]);
        }
        drop(surface);

        RegionSnapshot {
            rect: clipped,
            format: self.format,
            data,
        }
    }
}

/// Tightly packed copy of a framebuffer region, detached from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSnapshot {
    rect: Rect,
    format: PixelFormat,
    data: Vec<u8>,
}

impl RegionSnapshot {
    fn empty(format: PixelFormat) -> Self {
        Self {
            rect: Rect::default(),
            format,
            data: Vec::new(),
        }
    }

    /// Framebuffer rectangle the pixels were taken from.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_empty(&self) -> bool {
        self.rect.is_empty()
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    /// Pixels in row-major order, stride equal to `rect().width`.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at framebuffer coordinate `(x, y)`, if inside the snapshot.
    pub fn pixel(&self, x: i32, y: i32) -> Option<&[u8]> {
        if !self.rect.contains_point(x, y) {
            return None;
        }
        let bpp = self.format.bytes_per_pixel() as usize;
        let offset = ((y - self.rect.y) as usize * self.rect.width as usize
            + (x - self.rect.x) as usize)
            * bpp;
        Some(&self.data[offset..offset + bpp])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(rect: Rect, seed: u8) -> Vec<u8> {
        (0..rect.area() as usize * 4)
            .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
            .collect()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = PixelStore::new(PixelFormat::rgb888());
        assert_eq!(store.dimension(), Dimension::new(0, 0));
        assert!(store.read_region(Rect::new(0, 0, 10, 10)).is_empty());
    }

    #[test]
    fn test_write_then_read_returns_written_pixels() {
        let store = PixelStore::with_dimension(PixelFormat::rgb888(), Dimension::new(100, 80));
        let rect = Rect::new(10, 20, 7, 5);
        let pixels = pattern(rect, 3);

        store.write(rect, &pixels, 0).unwrap();

        let snapshot = store.read_region(rect);
        assert_eq!(snapshot.rect(), rect);
        assert_eq!(snapshot.data(), &pixels[..]);
    }

    #[test]
    fn test_out_of_bounds_write_leaves_store_unchanged() {
        let store = PixelStore::with_dimension(PixelFormat::rgb888(), Dimension::new(50, 50));
        let before = store.read_region(Rect::new(0, 0, 50, 50));

        let rect = Rect::new(45, 45, 10, 10);
        let err = store.write(rect, &pattern(rect, 9), 0).unwrap_err();
        assert!(matches!(err, PixelStoreError::OutOfBounds { .. }));

        let negative = Rect::new(-1, 0, 2, 2);
        assert!(store.write(negative, &pattern(negative, 1), 0).is_err());

        assert_eq!(store.read_region(Rect::new(0, 0, 50, 50)), before);
    }

    #[test]
    fn test_rect_past_i32_max_is_out_of_bounds() {
        let store = PixelStore::with_dimension(PixelFormat::rgb888(), Dimension::new(100, 100));
        let before = store.read_region(Rect::new(0, 0, 100, 100));

        let rect = Rect::new(i32::MAX - 1, 0, 10, 1);
        let err = store.write(rect, &[0xEE; 40], 0).unwrap_err();
        assert!(matches!(err, PixelStoreError::OutOfBounds { .. }));

        let tall = Rect::new(0, i32::MAX - 3, 1, 8);
        assert!(store.write(tall, &[0xEE; 32], 0).is_err());
        assert!(store.fill(rect, &[1, 2, 3, 4]).is_err());
        assert!(store.read_region(rect).is_empty());

        assert_eq!(store.read_region(Rect::new(0, 0, 100, 100)), before);
    }

    #[test]
    fn test_huge_stride_reports_short_data() {
        let store = PixelStore::with_dimension(PixelFormat::rgb888(), Dimension::new(10, 10));
        let err = store.write(Rect::new(0, 0, 2, 2), &[0; 16], usize::MAX).unwrap_err();
        assert!(matches!(err, PixelStoreError::DataLength { .. }));
    }

    #[test]
    fn test_short_data_rejected() {
        let store = PixelStore::with_dimension(PixelFormat::rgb888(), Dimension::new(50, 50));
        let err = store.write(Rect::new(0, 0, 4, 4), &[0u8; 10], 0).unwrap_err();
        assert_eq!(
            err,
            PixelStoreError::DataLength {
                expected: 64,
                actual: 10
            }
        );
    }

    #[test]
    fn test_write_with_source_stride() {
        let store = PixelStore::with_dimension(PixelFormat::rgb888(), Dimension::new(20, 20));
        // 2x2 rect taken from a source 3 pixels wide
        let src: Vec<u8> = (0..3 * 2 * 4).map(|i| i as u8).collect();
        store.write(Rect::new(5, 5, 2, 2), &src, 3).unwrap();

        let snapshot = store.read_region(Rect::new(5, 5, 2, 2));
        assert_eq!(snapshot.pixel(5, 5).unwrap(), &src[0..4]);
        assert_eq!(snapshot.pixel(6, 5).unwrap(), &src[4..8]);
        assert_eq!(snapshot.pixel(5, 6).unwrap(), &src[12..16]);
        assert_eq!(snapshot.pixel(6, 6).unwrap(), &src[16..20]);
    }

    #[test]
    fn test_read_region_is_clipped_to_valid_dimension() {
        let store = PixelStore::with_dimension(PixelFormat::rgb888(), Dimension::new(30, 30));
        let snapshot = store.read_region(Rect::new(20, -5, 20, 20));
        assert_eq!(snapshot.rect(), Rect::new(20, 0, 10, 15));
        assert_eq!(snapshot.data().len(), 10 * 15 * 4);

        assert!(store.read_region(Rect::new(30, 0, 5, 5)).is_empty());
    }

    #[test]
    fn test_resize_keeps_capacity_when_shrinking() {
        let store = PixelStore::with_dimension(PixelFormat::rgb888(), Dimension::new(200, 100));
        store.resize(Dimension::new(100, 150));
        assert_eq!(store.dimension(), Dimension::new(100, 150));
        assert_eq!(store.capacity(), Dimension::new(200, 150));

        store.resize(Dimension::new(50, 50));
        assert_eq!(store.dimension(), Dimension::new(50, 50));
        assert_eq!(store.capacity(), Dimension::new(200, 150));

        // Writes beyond the valid region fail even though capacity allows them
        let rect = Rect::new(60, 0, 10, 10);
        assert!(store.write(rect, &pattern(rect, 0), 0).is_err());
    }

    #[test]
    fn test_resize_clears_contents() {
        let store = PixelStore::with_dimension(PixelFormat::rgb888(), Dimension::new(10, 10));
        store.fill(Rect::new(0, 0, 10, 10), &[1, 2, 3, 4]).unwrap();
        store.resize(Dimension::new(8, 8));
        assert!(store.read_region(Rect::new(0, 0, 8, 8)).data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fill() {
        let store = PixelStore::with_dimension(PixelFormat::rgb565(), Dimension::new(10, 10));
        store.fill(Rect::new(2, 2, 3, 3), &[0xFF, 0x07]).unwrap();
        let snapshot = store.read_region(Rect::new(0, 0, 10, 10));
        assert_eq!(snapshot.pixel(3, 3).unwrap(), &[0xFF, 0x07]);
        assert_eq!(snapshot.pixel(1, 1).unwrap(), &[0, 0]);
        assert!(store.fill(Rect::new(0, 0, 1, 1), &[1, 2, 3]).is_err());
    }
}
