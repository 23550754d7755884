//! 4x4 transformation matrix using column-major convention.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat4 * Vec`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//!
//! Rotations are active, right-handed rotations about the world axes, so a
//! rotation matrix built here matches the usual textbook form (and what a
//! scientific rotation library produces for the same Euler angles).

use std::ops::Mul;

use super::vec3::Vec3;

/// 4x4 matrix stored as `data[row][col]` with column-major convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f64; 4]; 4],
}

impl Mat4 {
    pub fn new(data: [[f64; 4]; 4]) -> Self {
        Mat4 { data }
    }

    pub fn identity() -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a translation matrix.
    ///
    /// Translation is stored in the last column (column-major convention).
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the X axis.
    pub fn rotation_x(angle: f64) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the Y axis.
    pub fn rotation_y(angle: f64) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Mat4::new([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the Z axis.
    pub fn rotation_z(angle: f64) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Mat4::new([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation from intrinsic Z-Y-X Euler angles (radians).
    ///
    /// Equivalent to `Rz * Ry * Rx`: the X rotation is applied first in the
    /// rotating frame. This matches the Euler convention camera orientations
    /// are usually specified in for optical setups.
    pub fn from_euler_zyx(rz: f64, ry: f64, rx: f64) -> Self {
        Mat4::rotation_z(rz) * Mat4::rotation_y(ry) * Mat4::rotation_x(rx)
    }

    /// Returns a new matrix with transpose applied: `self.transpose()`.
    pub fn transpose(&self) -> Self {
        let mut data = [[0.0f64; 4]; 4];
        for (row, values) in self.data.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                data[col][row] = *value;
            }
        }
        Mat4 { data }
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    /// Set element at [row][col].
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row][col] = value;
    }
}

/// Matrix multiplication: Mat4 * Mat4.
///
/// For column-major convention, `A * B * v` applies B first, then A.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f64; 4]; 4];

        for row in 0..4 {
            for col in 0..4 {
                result[row][col] = self.data[row][0] * rhs.data[0][col]
                    + self.data[row][1] * rhs.data[1][col]
                    + self.data[row][2] * rhs.data[2][col]
                    + self.data[row][3] * rhs.data[3][col];
            }
        }

        Mat4::new(result)
    }
}

/// Transform a point: Mat4 * Vec3 (treats Vec3 as column vector with w=1).
impl Mul<Vec3> for Mat4 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Self::Output {
        Vec3::new(
            self.data[0][0] * v.x + self.data[0][1] * v.y + self.data[0][2] * v.z + self.data[0][3],
            self.data[1][0] * v.x + self.data[1][1] * v.y + self.data[1][2] * v.z + self.data[1][3],
            self.data[2][0] * v.x + self.data[2][1] * v.y + self.data[2][2] * v.z + self.data[2][3],
        )
    }
}
