//! Box-filter reduction of sub-pixel buffers to pixel resolution.
//!
//! Each output pixel owns a `k x k` block of sub-samples. Background
//! sub-samples (never reached by geometry, depth still `+inf`) are left out
//! of the average, so a partially covered edge pixel gets the mean of its
//! covered samples only and is not diluted toward the background. A pixel
//! with no covered sub-samples at all becomes
//! background itself.

use crate::error::RasterError;
use crate::render::framebuffer::{Buffer2d, BACKGROUND_DEPTH};

/// Averages the covered sub-samples of each pixel block of a field buffer.
///
/// `depth_subpx` decides coverage: a sub-sample counts iff its depth is
/// finite. Pixels with zero covered sub-samples are set to
/// [`BACKGROUND_DEPTH`]. Both inputs must share dimensions divisible by
/// `sub_samp`.
pub fn downsample_field(
    field_subpx: &Buffer2d,
    depth_subpx: &Buffer2d,
    sub_samp: u32,
) -> Result<Buffer2d, RasterError> {
    downsample_with(depth_subpx, sub_samp, |x, y| field_subpx.get(x, y))
}

/// Averages the covered sub-samples of each pixel block of the depth
/// buffer itself.
pub fn downsample_depth(depth_subpx: &Buffer2d, sub_samp: u32) -> Result<Buffer2d, RasterError> {
    downsample_with(depth_subpx, sub_samp, |x, y| depth_subpx.get(x, y))
}

fn downsample_with<F>(
    depth_subpx: &Buffer2d,
    sub_samp: u32,
    sample: F,
) -> Result<Buffer2d, RasterError>
where
    F: Fn(usize, usize) -> f64,
{
    let k = sub_samp as usize;
    let width = depth_subpx.width() / k;
    let height = depth_subpx.height() / k;
    let mut out = Buffer2d::filled(width, height, BACKGROUND_DEPTH)?;

    for py in 0..height {
        for px in 0..width {
            let mut sum = 0.0;
            let mut covered = 0u32;
            for sy in 0..k {
                for sx in 0..k {
                    let (x, y) = (px * k + sx, py * k + sy);
                    if depth_subpx.get(x, y).is_finite() {
                        sum += sample(x, y);
                        covered += 1;
                    }
                }
            }
            if covered > 0 {
                out.set(px, py, sum / f64::from(covered));
            }
        }
    }

    Ok(out)
}

/// Replaces never-written `+inf` cells with the background sentinel in the
/// sub-pixel output buffers, after downsampling has used finiteness as the
/// coverage flag.
pub fn finalize_background(depth_subpx: &mut Buffer2d, field_subpx: &mut Buffer2d) {
    for (depth, field) in depth_subpx
        .as_mut_slice()
        .iter_mut()
        .zip(field_subpx.as_mut_slice())
    {
        if !depth.is_finite() {
            *depth = BACKGROUND_DEPTH;
            *field = BACKGROUND_DEPTH;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fully_covered_constant_block_is_exact() {
        // 2x2 pixels at k = 3; every sub-sample covered with value 5.0.
        let depth = Buffer2d::filled(6, 6, 12.0).unwrap();
        let field = Buffer2d::filled(6, 6, 5.0).unwrap();

        let image = downsample_field(&field, &depth, 3).unwrap();
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 2);
        for &v in image.as_slice() {
            assert_relative_eq!(v, 5.0);
        }
    }

    #[test]
    fn uncovered_samples_are_excluded_from_the_average() {
        // One pixel, k = 2: three covered samples at 4.0, one background.
        let mut depth = Buffer2d::filled(2, 2, 10.0).unwrap();
        depth.set(1, 1, f64::INFINITY);
        let field = Buffer2d::filled(2, 2, 4.0).unwrap();

        let image = downsample_field(&field, &depth, 2).unwrap();
        assert_relative_eq!(image.get(0, 0), 4.0);
    }

    #[test]
    fn empty_pixel_is_background() {
        let depth = Buffer2d::filled(2, 2, f64::INFINITY).unwrap();
        let field = Buffer2d::filled(2, 2, 0.0).unwrap();

        let image = downsample_field(&field, &depth, 2).unwrap();
        assert_relative_eq!(image.get(0, 0), BACKGROUND_DEPTH);
    }

    #[test]
    fn depth_downsample_averages_covered_depths() {
        let mut depth = Buffer2d::filled(2, 2, 8.0).unwrap();
        depth.set(0, 0, 10.0);
        depth.set(1, 1, f64::INFINITY);

        let out = downsample_depth(&depth, 2).unwrap();
        assert_relative_eq!(out.get(0, 0), (10.0 + 8.0 + 8.0) / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn finalize_maps_infinity_to_sentinel() {
        let mut depth = Buffer2d::filled(2, 1, f64::INFINITY).unwrap();
        depth.set(0, 0, 3.0);
        let mut field = Buffer2d::filled(2, 1, 1.5).unwrap();

        finalize_background(&mut depth, &mut field);

        assert_relative_eq!(depth.get(0, 0), 3.0);
        assert_relative_eq!(field.get(0, 0), 1.5);
        assert_relative_eq!(depth.get(1, 0), BACKGROUND_DEPTH);
        assert_relative_eq!(field.get(1, 0), BACKGROUND_DEPTH);
    }
}
