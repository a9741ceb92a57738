/// World -> view -> projection -> screen pipeline with culling, flat shading and
/// painter's-algorithm ordering
///
/// Visibility is resolved by drawing order only: rows come back farthest first,
/// keyed on each triangle's farthest vertex. Interpenetrating geometry is not
/// resolved correctly, and a triangle crossing the near plane is dropped whole.
use std::cmp::Ordering;

use log::{debug, info};
use rayon::prelude::*;

use crate::camera::Camera;
use crate::config::PipelineConfig;
use crate::geometry::{Mesh, Rgb, Triangle};
use crate::math::{Matrix4, Vector3};
use crate::transform::projection;

/// Triangles with any view-space `z` below this are discarded.
pub const MESH_NEAR_Z: f32 = 0.1;
/// Overlay points closer than this are not projected.
pub const OVERLAY_NEAR_Z: f32 = 1.0;
/// Stars behind this view-space `z` are not drawn.
pub const STAR_NEAR_Z: f32 = 0.1;
/// Faces lit head-on by this direction get full brightness.
pub const LIGHT_DIRECTION: Vector3 = Vector3::new(0.0, 0.0, -1.0);
/// Brightness floor for faces turned away from the light.
pub const AMBIENT: f32 = 0.2;

/// A triangle ready for the rasterizer
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedTriangle {
    /// Screen-space points; `x`/`y` in pixels, `z` is the post-divide depth
    pub points: [Vector3; 3],
    /// Largest view-space `z` of the three vertices
    pub depth: f32,
    pub color: Rgb,
    pub edge_flags: [bool; 3],
}

/// A single point projected for overlay drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    /// View-space depth of the point
    pub depth: f32,
}

/// Mesh-path NDC to pixel mapping. Y is not flipped.
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: f32, height: f32) -> (f32, f32) {
    ((ndc_x + 1.0) * 0.5 * width, (ndc_y + 1.0) * 0.5 * height)
}

/// Overlay/star NDC to pixel mapping. Y grows downwards.
pub fn ndc_to_screen_flipped(ndc_x: f32, ndc_y: f32, width: f32, height: f32) -> (f32, f32) {
    ((ndc_x + 1.0) * 0.5 * width, (1.0 - ndc_y) * 0.5 * height)
}

/// Per-frame projector. The projection matrix is computed once at construction.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    projection: Matrix4,
}

impl Pipeline {
    pub fn new(width: u32, height: u32, fov_degrees: f32) -> Self {
        Self::with_config(PipelineConfig::new(width, height, fov_degrees))
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        let projection = projection(
            config.fov_degrees,
            config.aspect_ratio(),
            config.near,
            config.far,
        );
        info!(
            "Pipeline {}x{} fov {} near {} far {}",
            config.width,
            config.height,
            config.fov_degrees,
            config.near,
            config.far
        );
        Self { config, projection }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn width(&self) -> f32 {
        self.config.width as f32
    }

    pub fn height(&self) -> f32 {
        self.config.height as f32
    }

    pub fn projection_matrix(&self) -> &Matrix4 {
        &self.projection
    }

    /// Project, cull, shade and depth-sort every triangle of `mesh`.
    pub fn process_mesh(
        &self,
        mesh: &Mesh,
        camera: &Camera,
        world: &Matrix4,
        base_color: Rgb,
    ) -> Vec<ProjectedTriangle> {
        self.process_mesh_with_view(mesh, &camera.view_matrix(), world, base_color)
    }

    pub fn process_mesh_with_view(
        &self,
        mesh: &Mesh,
        view: &Matrix4,
        world: &Matrix4,
        base_color: Rgb,
    ) -> Vec<ProjectedTriangle> {
        let mut rows: Vec<ProjectedTriangle> = mesh
            .triangles
            .iter()
            .filter_map(|tri| self.process_triangle(tri, view, world, base_color))
            .collect();
        sort_far_to_near(&mut rows);
        debug!("{} of {} triangles visible", rows.len(), mesh.len());
        rows
    }

    /// Same output as [`Pipeline::process_mesh_with_view`], with the
    /// per-triangle work spread over the rayon pool.
    pub fn par_process_mesh_with_view(
        &self,
        mesh: &Mesh,
        view: &Matrix4,
        world: &Matrix4,
        base_color: Rgb,
    ) -> Vec<ProjectedTriangle> {
        let mut rows: Vec<ProjectedTriangle> = mesh
            .triangles
            .par_iter()
            .filter_map(|tri| self.process_triangle(tri, view, world, base_color))
            .collect();
        sort_far_to_near(&mut rows);
        rows
    }

    fn process_triangle(
        &self,
        tri: &Triangle,
        view: &Matrix4,
        world: &Matrix4,
        base_color: Rgb,
    ) -> Option<ProjectedTriangle> {
        let world_pts = tri.points.map(|p| world.multiply_vector(&p));
        let view_pts = world_pts.map(|p| view.multiply_vector(&p));
        let [v0, v1, v2] = view_pts;

        // Backface: normal pointing along the ray from the eye.
        let normal_view = (v1 - v0).cross(&(v2 - v0)).normalize();
        let camera_ray = v0.normalize();
        if normal_view.dot(&camera_ray) > 0.0 {
            return None;
        }

        if view_pts.iter().any(|p| p.z < MESH_NEAR_Z) {
            return None;
        }

        let points = view_pts.map(|p| self.to_screen(&p));
        let depth = v0.z.max(v1.z).max(v2.z);

        let [w0, w1, w2] = world_pts;
        let normal = (w1 - w0).cross(&(w2 - w0)).normalize();
        let brightness = normal.dot(&LIGHT_DIRECTION.normalize()).max(AMBIENT);

        Some(ProjectedTriangle {
            points,
            depth,
            color: base_color.scaled(brightness),
            edge_flags: tri.edge_flags(),
        })
    }

    /// Projection, divide (skipped when `w` is zero) and mesh-path screen mapping.
    fn to_screen(&self, view_point: &Vector3) -> Vector3 {
        let clip = self.projection.multiply_vector(view_point);
        let mut p = clip.perspective_divide().unwrap_or(clip);
        let (x, y) = ndc_to_screen(p.x, p.y, self.width(), self.height());
        p.x = x;
        p.y = y;
        p
    }

    /// Project one world-space point for overlay drawing.
    ///
    /// Returns `None` closer than [`OVERLAY_NEAR_Z`] or when `w` is zero.
    pub fn project_point(&self, point: &Vector3, camera: &Camera) -> Option<ScreenPoint> {
        self.project_point_with_view(point, &camera.view_matrix())
    }

    pub fn project_point_with_view(&self, point: &Vector3, view: &Matrix4) -> Option<ScreenPoint> {
        let p_view = view.multiply_vector(point);
        if p_view.z < OVERLAY_NEAR_Z {
            return None;
        }

        let ndc = self.projection.multiply_vector(&p_view).perspective_divide()?;
        let (x, y) = ndc_to_screen_flipped(ndc.x, ndc.y, self.width(), self.height());
        Some(ScreenPoint {
            x,
            y,
            depth: p_view.z,
        })
    }

    /// Project a direction at infinity, such as a background star.
    ///
    /// Only the camera's rotation applies. Returns `None` for stars behind the
    /// camera or outside the screen.
    pub fn project_star(&self, direction: &Vector3, camera: &Camera) -> Option<(f32, f32)> {
        let p_view = camera.view_matrix().rotation_part().multiply_vector(direction);
        if p_view.z < STAR_NEAR_Z {
            return None;
        }

        let ndc = self.projection.multiply_vector(&p_view).perspective_divide()?;
        let (x, y) = ndc_to_screen_flipped(ndc.x, ndc.y, self.width(), self.height());
        if (0.0..self.width()).contains(&x) && (0.0..self.height()).contains(&y) {
            Some((x, y))
        } else {
            None
        }
    }
}

/// Painter's order: largest depth first. Stable, so equal depths keep mesh order.
fn sort_far_to_near(rows: &mut [ProjectedTriangle]) {
    rows.sort_by(|a, b| b.depth.partial_cmp(&a.depth).unwrap_or(Ordering::Equal));
}
