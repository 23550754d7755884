//! Rasterization pipeline: scan conversion, interpolation, downsampling,
//! and per-frame orchestration.

pub mod framebuffer;
pub mod interp;
pub mod rasterizer;
pub mod renderer;
pub mod sampler;

pub use framebuffer::{Buffer2d, FrameBuffers, BACKGROUND_DEPTH};
pub use rasterizer::RasterStats;
pub use renderer::FrameRenderer;
