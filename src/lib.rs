//! A CPU rasterizer producing synthetic camera images of deforming
//! finite-element surface meshes.
//!
//! Given a pinhole camera and a triangulated surface mesh carrying
//! per-node field values, the renderer produces, per frame, a
//! pixel-resolution field image, a supersampled sub-pixel field image, and
//! a sub-pixel depth buffer: ground-truth imagery for validating optical
//! measurement techniques such as digital image correlation.
//!
//! Reading simulation files, extracting surface meshes, unit scaling, and
//! exporting/plotting the buffers are external concerns: this crate takes
//! prepared mesh buffers and camera parameters and hands back pixel data.
//!
//! # Quick Start
//!
//! ```ignore
//! use synraster::prelude::*;
//!
//! let camera = CameraData::new(config)?;
//! let mesh = RenderMesh::new(coords, connectivity, fields, None, frames, 1)?;
//! let buffers = FrameRenderer::new(&camera).render_frame(&mesh, 0, 0)?;
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod error;
pub mod math;
pub mod mesh;
pub mod render;

// Re-export commonly needed types at crate root for convenience
pub use camera::{pos_fill_frame, CameraConfig, CameraData, ProjectedPoint};
pub use error::RasterError;
pub use mesh::RenderMesh;
pub use render::{Buffer2d, FrameBuffers, FrameRenderer, BACKGROUND_DEPTH};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use synraster::prelude::*;
/// ```
pub mod prelude {
    // Camera
    pub use crate::camera::{pos_fill_frame, CameraConfig, CameraData, ProjectedPoint};

    // Mesh
    pub use crate::mesh::RenderMesh;

    // Rendering
    pub use crate::render::{Buffer2d, FrameBuffers, FrameRenderer, BACKGROUND_DEPTH};

    // Errors
    pub use crate::error::RasterError;

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;
}
