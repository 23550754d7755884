//! Per-frame render orchestration.
//!
//! [`FrameRenderer`] ties the pipeline together: fetch the frame's node
//! coordinates and field channel from the mesh, rasterize into sub-pixel
//! buffers, box-filter down to pixel resolution, and hand the three output
//! buffers back to the caller. Rendering a frame is a pure function of
//! (camera, mesh frame), so a sequence of frames and field channels is
//! rendered in parallel with no shared mutable state.

use std::time::Instant;

use rayon::prelude::*;

use crate::camera::CameraData;
use crate::error::RasterError;
use crate::mesh::RenderMesh;
use crate::render::framebuffer::{Buffer2d, FrameBuffers, BACKGROUND_DEPTH};
use crate::render::rasterizer::rasterize_frame;
use crate::render::sampler;

/// Renders frames of a [`RenderMesh`] through a fixed camera.
///
/// The camera is borrowed, read-only and explicit; there is no hidden
/// "current camera" state anywhere.
pub struct FrameRenderer<'a> {
    camera: &'a CameraData,
}

impl<'a> FrameRenderer<'a> {
    pub fn new(camera: &'a CameraData) -> Self {
        Self { camera }
    }

    pub fn camera(&self) -> &CameraData {
        self.camera
    }

    /// Renders one frame of one field channel.
    ///
    /// Returns the pixel-resolution field image together with the
    /// sub-pixel field and depth buffers. Buffers are freshly allocated
    /// per call and owned by the caller afterwards.
    ///
    /// # Errors
    ///
    /// Bounds errors from the mesh accessors and allocation failures; both
    /// are fatal for this call and never retried.
    pub fn render_frame(
        &self,
        mesh: &RenderMesh,
        frame: usize,
        field: usize,
    ) -> Result<FrameBuffers, RasterError> {
        let start = Instant::now();

        let coords = mesh.coords_at(frame)?;
        let values = mesh.field_at(frame, field)?;

        let [grid_w, grid_h] = self.camera.subpx_dims();
        let mut depth_subpx = Buffer2d::filled(grid_w, grid_h, f64::INFINITY)?;
        let mut image_subpx = Buffer2d::filled(grid_w, grid_h, BACKGROUND_DEPTH)?;

        let stats = rasterize_frame(
            self.camera,
            &coords,
            mesh.connectivity(),
            &values,
            &mut depth_subpx,
            &mut image_subpx,
        );

        let image = sampler::downsample_field(&image_subpx, &depth_subpx, self.camera.sub_samp())?;
        sampler::finalize_background(&mut depth_subpx, &mut image_subpx);

        log::debug!(
            "frame {frame} field {field}: {} triangles ({} behind, {} degenerate, \
             {} culled), {} samples written in {:.1?}",
            stats.triangles_in,
            stats.clipped_behind,
            stats.degenerate,
            stats.culled_backface,
            stats.samples_written,
            start.elapsed()
        );

        Ok(FrameBuffers {
            image,
            image_subpx,
            depth_subpx,
        })
    }

    /// Renders the cross product of `frames` and `fields` in parallel.
    ///
    /// Output order is deterministic: frames outermost, field channels
    /// within a frame. The first error encountered aborts the batch.
    pub fn render_sequence(
        &self,
        mesh: &RenderMesh,
        frames: &[usize],
        fields: &[usize],
    ) -> Result<Vec<FrameBuffers>, RasterError> {
        let jobs: Vec<(usize, usize)> = frames
            .iter()
            .flat_map(|&frame| fields.iter().map(move |&field| (frame, field)))
            .collect();

        jobs.par_iter()
            .map(|&(frame, field)| self.render_frame(mesh, frame, field))
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
