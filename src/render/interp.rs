//! Barycentric field interpolation.
//!
//! The coverage test guarantees weights in [0, 1] summing to 1, so this is
//! pure affine interpolation across the triangle, exact for any nodal
//! scalar field (or one component of a vector field) that varies linearly
//! over the element face. No extrapolation can occur.

/// Interpolates a nodal quantity at a point given its barycentric weights.
#[inline]
pub fn interpolate(weights: [f64; 3], values: [f64; 3]) -> f64 {
    weights[0] * values[0] + weights[1] * values[1] + weights[2] * values[2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn vertex_weights_return_vertex_values() {
        let values = [2.0, -3.0, 7.0];
        assert_relative_eq!(interpolate([1.0, 0.0, 0.0], values), 2.0);
        assert_relative_eq!(interpolate([0.0, 1.0, 0.0], values), -3.0);
        assert_relative_eq!(interpolate([0.0, 0.0, 1.0], values), 7.0);
    }

    #[test]
    fn centroid_is_the_mean() {
        let third = 1.0 / 3.0;
        let v = interpolate([third, third, third], [3.0, 6.0, 9.0]);
        assert_relative_eq!(v, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn interior_value_stays_within_vertex_bounds() {
        let values = [1.0, 5.0, 5.5];
        let v = interpolate([0.2, 0.5, 0.3], values);
        assert!(v >= 1.0 && v <= 5.5);
    }
}
