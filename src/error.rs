//! Crate-wide error type.
//!
//! Rendering is deterministic, so none of these conditions are retried:
//! configuration errors are rejected before any rendering starts, bounds
//! errors are reported immediately rather than clamped (a clamped index
//! would silently corrupt a render), and geometry/resource errors surface
//! to the caller as-is.

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors produced by camera construction, mesh access, and rendering.
#[derive(Error, Debug)]
pub enum RasterError {
    /// Invalid camera configuration (rejected at construction time).
    #[error("invalid camera configuration: {0}")]
    Camera(String),

    /// A point cloud or geometry from which no camera placement or scale
    /// can be derived.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Frame index past the end of the mesh's stored frames.
    #[error("frame index {frame} out of range (mesh has {num_frames} frames)")]
    Frame { frame: usize, num_frames: usize },

    /// Field channel index past the end of the mesh's stored fields.
    #[error("field index {field} out of range (mesh has {num_fields} fields)")]
    Field { field: usize, num_fields: usize },

    /// Connectivity references a node that does not exist.
    #[error("element {elem} references node {node}, but mesh has {num_nodes} nodes")]
    NodeIndex {
        elem: usize,
        node: usize,
        num_nodes: usize,
    },

    /// A flat array's length does not match its declared shape.
    #[error("shape mismatch for {name}: expected {expected} values, got {actual}")]
    Shape {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Output buffer allocation failed.
    #[error("failed to allocate output buffer: {0}")]
    Allocation(#[from] TryReserveError),
}
