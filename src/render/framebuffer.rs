//! Output buffers for rendered frames.
//!
//! All buffers are dense row-major `f64` grids. Cells that no geometry ever
//! reached carry the [`BACKGROUND_DEPTH`] sentinel; downstream consumers
//! threshold against it (e.g. `depth > 1e4`) to turn background into a
//! missing-value marker before visualization.

use crate::error::RasterError;

/// Sentinel written to background cells of the output buffers.
///
/// Large enough to be distinguishable from any plausible scene depth, small
/// enough to survive text round-trips exactly.
pub const BACKGROUND_DEPTH: f64 = 1.0e6;

/// A row-major 2D grid of `f64` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer2d {
    data: Vec<f64>,
    width: usize,
    height: usize,
}

impl Buffer2d {
    /// Allocates a `width * height` buffer filled with `value`.
    ///
    /// Allocation goes through `try_reserve_exact` so an out-of-memory
    /// condition is reported instead of aborting.
    pub fn filled(width: usize, height: usize, value: f64) -> Result<Self, RasterError> {
        let len = width * height;
        let mut data = Vec::new();
        data.try_reserve_exact(len)?;
        data.resize(len, value);
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        self.data[y * self.width + x] = value;
    }

    /// Flat row-major view of the grid.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

/// The three buffers produced for one rendered frame.
///
/// With a sub-sample factor `k` and a `W x H` pixel sensor, `image` is
/// `W x H` while the sub-pixel buffers are `W*k x H*k`.
#[derive(Debug, Clone)]
pub struct FrameBuffers {
    /// Field image at pixel resolution, box-filtered from the sub-pixel image.
    pub image: Buffer2d,
    /// Field image at sub-pixel resolution.
    pub image_subpx: Buffer2d,
    /// Depth at sub-pixel resolution.
    pub depth_subpx: Buffer2d,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_buffer_has_requested_shape() {
        let buf = Buffer2d::filled(4, 3, 7.5).unwrap();
        assert_eq!(buf.width(), 4);
        assert_eq!(buf.height(), 3);
        assert_eq!(buf.as_slice().len(), 12);
        assert!(buf.as_slice().iter().all(|&v| v == 7.5));
    }

    #[test]
    fn get_set_are_row_major() {
        let mut buf = Buffer2d::filled(3, 2, 0.0).unwrap();
        buf.set(2, 1, 9.0);
        assert_eq!(buf.get(2, 1), 9.0);
        assert_eq!(buf.as_slice()[5], 9.0);
    }
}
