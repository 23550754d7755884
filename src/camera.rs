//! Pinhole camera model.
//!
//! # Coordinate System
//!
//! - World space is right-handed; the camera looks along its local **+Z**
//!   axis, so points with positive camera-space Z are in front of the lens.
//! - Image space is **y-down**: row 0 is the top of the image, matching how
//!   the output buffers are written out and plotted.
//!
//! # Derived state
//!
//! All projective state (sensor size, image distance, world↔camera
//! matrices) is computed once at construction and cached; [`CameraData`] is
//! immutable afterwards. The image distance comes from the thin-lens
//! relation focused at the region-of-interest distance `L`:
//!
//! ```text
//! 1/f = 1/L + 1/image_dist   =>   image_dist = f * L / (L - f)
//! ```

use crate::error::RasterError;
use crate::math::mat4::Mat4;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;

/// Tolerance for the rotation-matrix orthonormality check.
const ROT_TOL: f64 = 1e-6;

/// Camera configuration as supplied by the caller.
///
/// This is the raw parameter set; it is validated and frozen into a
/// [`CameraData`] before any rendering.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Sensor pixel counts as (width, height).
    pub pixels_num: [u32; 2],
    /// Physical pixel pitch as (width, height), world units.
    pub pixels_size: [f64; 2],
    /// Lens focal length, world units.
    pub focal_length: f64,
    /// Camera position in world space.
    pub pos_world: Vec3,
    /// Camera orientation in world space (rotation part only).
    pub rot_world: Mat4,
    /// World point the camera is focused on.
    pub roi_cent_world: Vec3,
    /// Sub-samples per pixel per axis, for antialiasing. Must be >= 1.
    pub sub_samp: u32,
    /// Skip triangles that face away from the camera.
    pub back_face_removal: bool,
}

/// A world point projected into image space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    /// Continuous position on the sub-sample grid (x = column, y = row).
    pub image: Vec2,
    /// Camera-space Z, i.e. distance along the view axis.
    pub depth: f64,
    /// False for points at or behind the image plane.
    pub visible: bool,
}

/// Validated, immutable camera with cached projective transforms.
#[derive(Debug, Clone)]
pub struct CameraData {
    pixels_num: [u32; 2],
    pixels_size: [f64; 2],
    focal_length: f64,
    pos_world: Vec3,
    rot_world: Mat4,
    roi_cent_world: Vec3,
    sub_samp: u32,
    back_face_removal: bool,

    sensor_size: [f64; 2],
    image_dist: f64,
    world_to_cam: Mat4,
    cam_to_world: Mat4,
}

impl CameraData {
    /// Validates the configuration and derives the cached transforms.
    ///
    /// # Errors
    ///
    /// [`RasterError::Camera`] for non-positive pixel counts/sizes/focal
    /// length, `sub_samp` of zero, a non-orthonormal rotation, or a
    /// region of interest closer than the focal length.
    pub fn new(config: CameraConfig) -> Result<Self, RasterError> {
        let CameraConfig {
            pixels_num,
            pixels_size,
            focal_length,
            pos_world,
            rot_world,
            roi_cent_world,
            sub_samp,
            back_face_removal,
        } = config;

        if pixels_num[0] < 1 || pixels_num[1] < 1 {
            return Err(RasterError::Camera(format!(
                "pixel counts must be >= 1, got {}x{}",
                pixels_num[0], pixels_num[1]
            )));
        }
        if pixels_size[0] <= 0.0 || pixels_size[1] <= 0.0 {
            return Err(RasterError::Camera(format!(
                "pixel sizes must be positive, got ({}, {})",
                pixels_size[0], pixels_size[1]
            )));
        }
        if focal_length <= 0.0 {
            return Err(RasterError::Camera(format!(
                "focal length must be positive, got {focal_length}"
            )));
        }
        if sub_samp < 1 {
            return Err(RasterError::Camera(
                "sub-sample factor must be >= 1".to_string(),
            ));
        }
        check_rotation(&rot_world)?;

        let focus_dist = (pos_world - roi_cent_world).magnitude();
        if focus_dist <= focal_length {
            return Err(RasterError::Camera(format!(
                "region of interest at distance {focus_dist} is inside the \
                 focal length {focal_length}"
            )));
        }

        let sensor_size = [
            f64::from(pixels_num[0]) * pixels_size[0],
            f64::from(pixels_num[1]) * pixels_size[1],
        ];
        let image_dist = focal_length * focus_dist / (focus_dist - focal_length);

        // world_to_cam: translate by -pos, then rotate by R^-1 = R^T.
        let rot_inv = rot_world.transpose();
        let world_to_cam =
            rot_inv * Mat4::translation(-pos_world.x, -pos_world.y, -pos_world.z);
        let cam_to_world =
            Mat4::translation(pos_world.x, pos_world.y, pos_world.z) * rot_world;

        Ok(Self {
            pixels_num,
            pixels_size,
            focal_length,
            pos_world,
            rot_world,
            roi_cent_world,
            sub_samp,
            back_face_removal,
            sensor_size,
            image_dist,
            world_to_cam,
            cam_to_world,
        })
    }

    /// Projects a world point onto the sub-sample grid.
    ///
    /// The pinhole projection scales camera-space X/Y by
    /// `image_dist / depth`; the physical image-plane position is then
    /// converted to grid coordinates with the sensor centre mapping to the
    /// image centre and y flipped into row direction.
    pub fn project_point(&self, point: Vec3) -> ProjectedPoint {
        let cam = self.world_to_cam * point;
        let depth = cam.z;
        if depth <= 0.0 {
            return ProjectedPoint {
                image: Vec2::ZERO,
                depth,
                visible: false,
            };
        }

        let plane_x = cam.x * self.image_dist / depth;
        let plane_y = cam.y * self.image_dist / depth;

        let k = f64::from(self.sub_samp);
        let col = (plane_x + 0.5 * self.sensor_size[0]) / (self.pixels_size[0] / k);
        let row = (0.5 * self.sensor_size[1] - plane_y) / (self.pixels_size[1] / k);

        ProjectedPoint {
            image: Vec2::new(col, row),
            depth,
            visible: true,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Sensor pixel counts as (width, height).
    pub fn pixels_num(&self) -> [u32; 2] {
        self.pixels_num
    }

    /// Physical pixel pitch as (width, height).
    pub fn pixels_size(&self) -> [f64; 2] {
        self.pixels_size
    }

    /// Lens focal length.
    pub fn focal_length(&self) -> f64 {
        self.focal_length
    }

    /// Camera position in world space.
    pub fn pos_world(&self) -> Vec3 {
        self.pos_world
    }

    /// Camera orientation in world space.
    pub fn rot_world(&self) -> &Mat4 {
        &self.rot_world
    }

    /// World point the camera is focused on.
    pub fn roi_cent_world(&self) -> Vec3 {
        self.roi_cent_world
    }

    /// Sub-samples per pixel per axis.
    pub fn sub_samp(&self) -> u32 {
        self.sub_samp
    }

    /// Whether back-facing triangles are skipped.
    pub fn back_face_removal(&self) -> bool {
        self.back_face_removal
    }

    /// Physical sensor dimensions as (width, height).
    pub fn sensor_size(&self) -> [f64; 2] {
        self.sensor_size
    }

    /// Lens-to-sensor distance derived from the thin-lens relation.
    pub fn image_dist(&self) -> f64 {
        self.image_dist
    }

    /// Cached world-to-camera transform.
    pub fn world_to_cam(&self) -> &Mat4 {
        &self.world_to_cam
    }

    /// Cached camera-to-world transform.
    pub fn cam_to_world(&self) -> &Mat4 {
        &self.cam_to_world
    }

    /// Sub-sample grid dimensions as (width, height).
    pub fn subpx_dims(&self) -> [usize; 2] {
        [
            self.pixels_num[0] as usize * self.sub_samp as usize,
            self.pixels_num[1] as usize * self.sub_samp as usize,
        ]
    }
}

/// Verifies that the 3x3 rotation part of `rot` is orthonormal with
/// determinant +1, within [`ROT_TOL`].
fn check_rotation(rot: &Mat4) -> Result<(), RasterError> {
    let cols = [
        Vec3::new(rot.get(0, 0), rot.get(1, 0), rot.get(2, 0)),
        Vec3::new(rot.get(0, 1), rot.get(1, 1), rot.get(2, 1)),
        Vec3::new(rot.get(0, 2), rot.get(1, 2), rot.get(2, 2)),
    ];

    for i in 0..3 {
        for j in 0..3 {
            let expected = if i == j { 1.0 } else { 0.0 };
            if (cols[i].dot(cols[j]) - expected).abs() > ROT_TOL {
                return Err(RasterError::Camera(
                    "rotation matrix is not orthonormal".to_string(),
                ));
            }
        }
    }

    let det = cols[0].cross(cols[1]).dot(cols[2]);
    if (det - 1.0).abs() > ROT_TOL {
        return Err(RasterError::Camera(format!(
            "rotation matrix determinant is {det}, expected +1"
        )));
    }
    Ok(())
}

/// Computes a camera placement that frames a point cloud.
///
/// The region of interest is the centroid of `coords_world`. The camera is
/// placed behind the centroid along its view axis at the closed-form
/// distance where the projected extent of the cloud spans `frame_fill` of
/// the sensor in the tighter axis. From the similar-triangles projection
/// combined with the thin-lens image distance:
///
/// ```text
/// extent * f / (d - f) = frame_fill * sensor_dim
///                   d  = f + extent * f / (frame_fill * sensor_dim)
/// ```
///
/// evaluated per axis, keeping the larger distance so the whole cloud fits.
/// `frame_fill` below 1 leaves a margin around the geometry.
///
/// Returns `(roi_cent_world, cam_pos_world)`.
///
/// # Errors
///
/// [`RasterError::Camera`] for non-positive parameters and
/// [`RasterError::DegenerateGeometry`] when the points are all coincident
/// (no scale can be derived) or the cloud is empty.
pub fn pos_fill_frame(
    coords_world: &[Vec3],
    pixels_num: [u32; 2],
    pixels_size: [f64; 2],
    focal_length: f64,
    rot_world: &Mat4,
    frame_fill: f64,
) -> Result<(Vec3, Vec3), RasterError> {
    if coords_world.is_empty() {
        return Err(RasterError::DegenerateGeometry(
            "cannot frame an empty point cloud".to_string(),
        ));
    }
    if pixels_num[0] < 1 || pixels_num[1] < 1 || pixels_size[0] <= 0.0 || pixels_size[1] <= 0.0 {
        return Err(RasterError::Camera(
            "sensor dimensions must be positive".to_string(),
        ));
    }
    if focal_length <= 0.0 || frame_fill <= 0.0 {
        return Err(RasterError::Camera(
            "focal length and frame fill must be positive".to_string(),
        ));
    }
    check_rotation(rot_world)?;

    let n = coords_world.len() as f64;
    let roi = coords_world
        .iter()
        .fold(Vec3::ZERO, |acc, &p| acc + p)
        / n;

    // Extents of the cloud in the camera's own x/y axes, about the centroid.
    let rot_inv = rot_world.transpose();
    let mut min = Vec2::new(f64::INFINITY, f64::INFINITY);
    let mut max = Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for &p in coords_world {
        let local = rot_inv * (p - roi);
        min.x = min.x.min(local.x);
        min.y = min.y.min(local.y);
        max.x = max.x.max(local.x);
        max.y = max.y.max(local.y);
    }
    let extent = max - min;

    let sensor = [
        f64::from(pixels_num[0]) * pixels_size[0],
        f64::from(pixels_num[1]) * pixels_size[1],
    ];
    if extent.x < f64::EPSILON && extent.y < f64::EPSILON {
        return Err(RasterError::DegenerateGeometry(
            "all points coincident, camera distance is ill-defined".to_string(),
        ));
    }

    let dist_x = focal_length + extent.x * focal_length / (frame_fill * sensor[0]);
    let dist_y = focal_length + extent.y * focal_length / (frame_fill * sensor[1]);
    let dist = dist_x.max(dist_y);

    // The camera looks along its local +Z; back away from the centroid.
    let view_axis = Vec3::new(
        rot_world.get(0, 2),
        rot_world.get(1, 2),
        rot_world.get(2, 2),
    );
    let cam_pos = roi - view_axis * dist;

    Ok((roi, cam_pos))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn basic_config() -> CameraConfig {
        CameraConfig {
            pixels_num: [20, 20],
            pixels_size: [0.1, 0.1],
            focal_length: 5.0,
            pos_world: Vec3::new(0.0, 0.0, -10.0),
            rot_world: Mat4::identity(),
            roi_cent_world: Vec3::ZERO,
            sub_samp: 1,
            back_face_removal: true,
        }
    }

    #[test]
    fn derives_sensor_size_and_image_dist() {
        let cam = CameraData::new(basic_config()).unwrap();

        assert_relative_eq!(cam.sensor_size()[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(cam.sensor_size()[1], 2.0, epsilon = 1e-12);
        // Thin lens at L = 10, f = 5: image distance is 10.
        assert_relative_eq!(cam.image_dist(), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn roi_centre_projects_to_image_centre() {
        let cam = CameraData::new(basic_config()).unwrap();
        let p = cam.project_point(Vec3::ZERO);

        assert!(p.visible);
        assert_relative_eq!(p.depth, 10.0, epsilon = 1e-12);
        assert_relative_eq!(p.image.x, 10.0, epsilon = 1e-12);
        assert_relative_eq!(p.image.y, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn unit_offset_maps_to_ten_pixels() {
        // Magnification 1 (L = 10, image_dist = 10), pixel pitch 0.1: one
        // world unit spans ten pixels.
        let cam = CameraData::new(basic_config()).unwrap();
        let p = cam.project_point(Vec3::new(0.5, 0.0, 0.0));

        assert_relative_eq!(p.image.x, 15.0, epsilon = 1e-12);
    }

    #[test]
    fn positive_world_y_maps_to_smaller_row() {
        let cam = CameraData::new(basic_config()).unwrap();
        let up = cam.project_point(Vec3::new(0.0, 0.5, 0.0));
        let centre = cam.project_point(Vec3::ZERO);

        assert!(up.image.y < centre.image.y);
    }

    #[test]
    fn points_behind_camera_are_not_visible() {
        let cam = CameraData::new(basic_config()).unwrap();
        let p = cam.project_point(Vec3::new(0.0, 0.0, -20.0));

        assert!(!p.visible);
        assert!(p.depth <= 0.0);
    }

    #[test]
    fn sub_sampling_scales_image_coordinates() {
        let mut config = basic_config();
        config.sub_samp = 4;
        let cam = CameraData::new(config).unwrap();
        let p = cam.project_point(Vec3::new(0.5, 0.0, 0.0));

        assert_relative_eq!(p.image.x, 60.0, epsilon = 1e-12);
        assert_eq!(cam.subpx_dims(), [80, 80]);
    }

    #[test]
    fn rejects_bad_configuration() {
        let mut config = basic_config();
        config.focal_length = -1.0;
        assert!(matches!(
            CameraData::new(config),
            Err(RasterError::Camera(_))
        ));

        let mut config = basic_config();
        config.sub_samp = 0;
        assert!(matches!(
            CameraData::new(config),
            Err(RasterError::Camera(_))
        ));

        let mut config = basic_config();
        config.pixels_size = [0.1, 0.0];
        assert!(matches!(
            CameraData::new(config),
            Err(RasterError::Camera(_))
        ));
    }

    #[test]
    fn rejects_non_orthonormal_rotation() {
        let mut config = basic_config();
        let mut rot = Mat4::identity();
        rot.set(0, 0, 2.0); // scale is not a rotation
        config.rot_world = rot;

        assert!(matches!(
            CameraData::new(config),
            Err(RasterError::Camera(_))
        ));
    }

    #[test]
    fn rejects_roi_inside_focal_length() {
        let mut config = basic_config();
        config.pos_world = Vec3::new(0.0, 0.0, -2.0); // closer than f = 5
        assert!(matches!(
            CameraData::new(config),
            Err(RasterError::Camera(_))
        ));
    }

    #[test]
    fn world_to_cam_and_back_round_trips() {
        let mut config = basic_config();
        config.rot_world = Mat4::from_euler_zyx(0.2, -0.5, 0.9);
        config.pos_world = Vec3::new(3.0, -2.0, -12.0);
        let cam = CameraData::new(config).unwrap();

        let p = Vec3::new(1.5, -0.25, 4.0);
        let back = *cam.cam_to_world() * (*cam.world_to_cam() * p);
        assert_relative_eq!(back.x, p.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-9);
        assert_relative_eq!(back.z, p.z, epsilon = 1e-9);
    }

    #[test]
    fn fill_frame_round_trip_hits_target_fill() {
        // Planar cloud facing the camera: projection is exact, so the
        // projected extent must match the requested fill fraction.
        let coords = [
            Vec3::new(-2.0, -1.0, 0.0),
            Vec3::new(2.0, -1.0, 0.0),
            Vec3::new(2.0, 1.0, 0.0),
            Vec3::new(-2.0, 1.0, 0.0),
        ];
        let pixels_num = [100, 80];
        let pixels_size = [0.05, 0.05];
        let focal = 25.0;
        let fill = 0.9;
        let rot = Mat4::identity();

        let (roi, cam_pos) =
            pos_fill_frame(&coords, pixels_num, pixels_size, focal, &rot, fill).unwrap();

        let cam = CameraData::new(CameraConfig {
            pixels_num,
            pixels_size,
            focal_length: focal,
            pos_world: cam_pos,
            rot_world: rot,
            roi_cent_world: roi,
            sub_samp: 1,
            back_face_removal: false,
        })
        .unwrap();

        let projected: Vec<_> = coords.iter().map(|&p| cam.project_point(p)).collect();
        assert!(projected.iter().all(|p| p.visible));

        let min_x = projected.iter().map(|p| p.image.x).fold(f64::INFINITY, f64::min);
        let max_x = projected
            .iter()
            .map(|p| p.image.x)
            .fold(f64::NEG_INFINITY, f64::max);

        // Width is the tighter axis here (4.0 over 5.0 sensor units vs 2.0
        // over 4.0): its projected span should fill 90% of the sensor.
        let span_frac = (max_x - min_x) * pixels_size[0] / cam.sensor_size()[0];
        assert_relative_eq!(span_frac, fill, epsilon = 1e-9);
    }

    #[test]
    fn fill_frame_rejects_coincident_points() {
        let coords = [Vec3::new(1.0, 2.0, 3.0); 5];
        let result = pos_fill_frame(
            &coords,
            [100, 100],
            [0.01, 0.01],
            10.0,
            &Mat4::identity(),
            1.0,
        );
        assert!(matches!(result, Err(RasterError::DegenerateGeometry(_))));
    }
}
