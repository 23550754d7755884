//! Minimal double-precision vector/matrix math for camera geometry.
//!
//! Rendering for measurement validation is done entirely in `f64`: the
//! output images are compared against field data at sub-pixel accuracy,
//! so single precision is not enough headroom for the projective math.

pub mod mat4;
pub mod vec2;
pub mod vec3;

pub use mat4::Mat4;
pub use vec2::Vec2;
pub use vec3::Vec3;
