//! Surface-mesh buffers extracted from a simulation.
//!
//! [`RenderMesh`] is a passive container: node coordinates, triangle
//! connectivity (fixed across frames), per-node render-field samples and
//! optional per-node displacements, both stored per frame. All shapes are
//! validated at construction; accessors are bounds-checked and never clamp
//! an out-of-range index.
//!
//! Flat array layouts match the upstream mesh-extraction contract:
//! `fields_render` is `(node, frame, field)` row-major and `fields_disp`
//! is `(node, frame, component)` row-major with three components.

use crate::error::RasterError;
use crate::math::vec3::Vec3;

/// Triangulated surface mesh with per-frame nodal field data.
#[derive(Debug, Clone)]
pub struct RenderMesh {
    coords: Vec<Vec3>,
    connectivity: Vec<[usize; 3]>,
    fields_render: Vec<f64>,
    fields_disp: Option<Vec<f64>>,
    num_frames: usize,
    num_fields: usize,
}

impl RenderMesh {
    /// Builds a mesh, validating connectivity and array shapes.
    ///
    /// `fields_render` must hold `num_nodes * num_frames * num_fields`
    /// values; `fields_disp`, when present, `num_nodes * num_frames * 3`.
    ///
    /// # Errors
    ///
    /// [`RasterError::NodeIndex`] if any element references a node outside
    /// `[0, num_nodes)`; [`RasterError::Shape`] on a length mismatch.
    pub fn new(
        coords: Vec<Vec3>,
        connectivity: Vec<[usize; 3]>,
        fields_render: Vec<f64>,
        fields_disp: Option<Vec<f64>>,
        num_frames: usize,
        num_fields: usize,
    ) -> Result<Self, RasterError> {
        let num_nodes = coords.len();

        for (elem, nodes) in connectivity.iter().enumerate() {
            for &node in nodes {
                if node >= num_nodes {
                    return Err(RasterError::NodeIndex {
                        elem,
                        node,
                        num_nodes,
                    });
                }
            }
        }

        let expected = num_nodes * num_frames * num_fields;
        if fields_render.len() != expected {
            return Err(RasterError::Shape {
                name: "fields_render",
                expected,
                actual: fields_render.len(),
            });
        }

        if let Some(disp) = &fields_disp {
            let expected = num_nodes * num_frames * 3;
            if disp.len() != expected {
                return Err(RasterError::Shape {
                    name: "fields_disp",
                    expected,
                    actual: disp.len(),
                });
            }
        }

        Ok(Self {
            coords,
            connectivity,
            fields_render,
            fields_disp,
            num_frames,
            num_fields,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.coords.len()
    }

    pub fn num_elems(&self) -> usize {
        self.connectivity.len()
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    pub fn num_fields(&self) -> usize {
        self.num_fields
    }

    /// Triangle connectivity, shared by every frame.
    pub fn connectivity(&self) -> &[[usize; 3]] {
        &self.connectivity
    }

    /// Node coordinates for one frame: the undeformed coordinates with that
    /// frame's displacement applied when displacement data is present.
    ///
    /// # Errors
    ///
    /// [`RasterError::Frame`] if `frame >= num_frames`.
    pub fn coords_at(&self, frame: usize) -> Result<Vec<Vec3>, RasterError> {
        self.check_frame(frame)?;

        let coords = match &self.fields_disp {
            None => self.coords.clone(),
            Some(disp) => self
                .coords
                .iter()
                .enumerate()
                .map(|(node, &p)| {
                    let base = (node * self.num_frames + frame) * 3;
                    p + Vec3::new(disp[base], disp[base + 1], disp[base + 2])
                })
                .collect(),
        };
        Ok(coords)
    }

    /// One per-node field channel for one frame.
    ///
    /// # Errors
    ///
    /// [`RasterError::Frame`] / [`RasterError::Field`] on out-of-range
    /// indices.
    pub fn field_at(&self, frame: usize, field: usize) -> Result<Vec<f64>, RasterError> {
        self.check_frame(frame)?;
        if field >= self.num_fields {
            return Err(RasterError::Field {
                field,
                num_fields: self.num_fields,
            });
        }

        let values = (0..self.num_nodes())
            .map(|node| {
                self.fields_render[(node * self.num_frames + frame) * self.num_fields + field]
            })
            .collect();
        Ok(values)
    }

    fn check_frame(&self, frame: usize) -> Result<(), RasterError> {
        if frame >= self.num_frames {
            return Err(RasterError::Frame {
                frame,
                num_frames: self.num_frames,
            });
        }
        Ok(())
    }
}
