/// Triangles, meshes and the procedural shapes the simulator draws
use std::f32::consts::PI;

use crate::math::Vector3;

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale every channel, truncating towards zero and saturating at 0 and 255.
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(
            (self.r as f32 * factor) as u8,
            (self.g as f32 * factor) as u8,
            (self.b as f32 * factor) as u8,
        )
    }
}

/// A mesh face in model space.
///
/// `edge_flags[i]` says whether the edge from `points[i]` to `points[(i + 1) % 3]`
/// belongs to the original polygon outline and should be stroked in wireframe.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub points: [Vector3; 3],
    pub normal: Vector3,
    pub color: Rgb,
    edge_flags: [bool; 3],
}

impl Triangle {
    pub fn new(p0: Vector3, p1: Vector3, p2: Vector3) -> Self {
        Self::with_edge_flags(p0, p1, p2, [true; 3])
    }

    pub fn with_edge_flags(p0: Vector3, p1: Vector3, p2: Vector3, edge_flags: [bool; 3]) -> Self {
        Self {
            points: [p0, p1, p2],
            normal: Vector3::zero(),
            color: Rgb::WHITE,
            edge_flags,
        }
    }

    pub fn edge_flags(&self) -> [bool; 3] {
        self.edge_flags
    }

    /// Calculate the face normal from the triangle's points
    pub fn calculate_normal(&self) -> Vector3 {
        let [p0, p1, p2] = self.points;
        (p1 - p0).cross(&(p2 - p0)).normalize()
    }
}

/// An ordered collection of triangles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Fill in every triangle's face normal.
    pub fn compute_normals(&mut self) {
        for triangle in &mut self.triangles {
            triangle.normal = triangle.calculate_normal();
        }
    }

    /// Unit cube centred on the origin, outward-facing winding.
    pub fn cube() -> Self {
        let verts = [
            Vector3::new(-0.5, -0.5, -0.5),
            Vector3::new(-0.5, 0.5, -0.5),
            Vector3::new(0.5, 0.5, -0.5),
            Vector3::new(0.5, -0.5, -0.5),
            Vector3::new(-0.5, -0.5, 0.5),
            Vector3::new(-0.5, 0.5, 0.5),
            Vector3::new(0.5, 0.5, 0.5),
            Vector3::new(0.5, -0.5, 0.5),
        ];

        const INDICES: [[usize; 3]; 12] = [
            [0, 1, 2], [0, 2, 3], // -Z
            [3, 2, 6], [3, 6, 7], // +X
            [7, 6, 5], [7, 5, 4], // +Z
            [4, 5, 1], [4, 1, 0], // -X
            [1, 5, 6], [1, 6, 2], // +Y
            [4, 0, 3], [4, 3, 7], // -Y
        ];

        let mut mesh = Self::with_capacity(INDICES.len());
        for [a, b, c] in INDICES {
            mesh.add_triangle(Triangle::new(verts[a], verts[b], verts[c]));
        }
        mesh
    }

    /// Latitude/longitude sphere with precomputed face normals.
    ///
    /// Rings run from the +Y pole down to the -Y pole; each ring/sector quad
    /// becomes two triangles.
    pub fn sphere(radius: f32, rings: usize, sectors: usize) -> Self {
        let mut verts = Vec::with_capacity((rings + 1) * (sectors + 1));
        for i in 0..=rings {
            let theta = i as f32 / rings as f32 * PI;
            let y = theta.cos() * radius;
            let ring_radius = theta.sin() * radius;

            for j in 0..=sectors {
                let phi = j as f32 / sectors as f32 * 2.0 * PI;
                verts.push(Vector3::new(ring_radius * phi.cos(), y, ring_radius * phi.sin()));
            }
        }

        let mut mesh = Self::with_capacity(rings * sectors * 2);
        for i in 0..rings {
            for j in 0..sectors {
                let top_left = i * (sectors + 1) + j;
                let top_right = top_left + 1;
                let bottom_left = (i + 1) * (sectors + 1) + j;
                let bottom_right = bottom_left + 1;

                mesh.add_triangle(Triangle::new(
                    verts[top_left],
                    verts[top_right],
                    verts[bottom_left],
                ));
                mesh.add_triangle(Triangle::new(
                    verts[top_right],
                    verts[bottom_right],
                    verts[bottom_left],
                ));
            }
        }

        mesh.compute_normals();
        mesh
    }

    /// Four-sided pyramid with its tip on +Y and its base on the XZ plane.
    pub fn pyramid(base_size: f32, height: f32) -> Self {
        let tip = Vector3::new(0.0, height, 0.0);
        let b1 = Vector3::new(-base_size, 0.0, -base_size);
        let b2 = Vector3::new(base_size, 0.0, -base_size);
        let b3 = Vector3::new(base_size, 0.0, base_size);
        let b4 = Vector3::new(-base_size, 0.0, base_size);

        let mut mesh = Self::with_capacity(6);
        mesh.add_triangle(Triangle::new(tip, b3, b2));
        mesh.add_triangle(Triangle::new(tip, b2, b1));
        mesh.add_triangle(Triangle::new(tip, b1, b4));
        mesh.add_triangle(Triangle::new(tip, b4, b3));
        mesh.add_triangle(Triangle::new(b1, b2, b3));
        mesh.add_triangle(Triangle::new(b1, b3, b4));
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn centroid(t: &Triangle) -> Vector3 {
        (t.points[0] + t.points[1] + t.points[2]) / 3.0
    }

    #[test]
    fn test_default_triangle() {
        let t = Triangle::new(Vector3::zero(), Vector3::zero(), Vector3::zero());
        assert_eq!(t.edge_flags(), [true, true, true]);
        assert_eq!(t.color, Rgb::WHITE);
        assert_eq!(t.normal, Vector3::zero());
    }

    #[test]
    fn test_calculate_normal() {
        let t = Triangle::new(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(t.calculate_normal(), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let cube = Mesh::cube();
        assert_eq!(cube.len(), 12);
        for t in &cube.triangles {
            assert!(t.calculate_normal().dot(&centroid(t)) > 0.0);
        }
    }

    #[test]
    fn test_pyramid_normals_point_outward() {
        let pyramid = Mesh::pyramid(0.5, 2.0);
        assert_eq!(pyramid.len(), 6);
        let inside = Vector3::new(0.0, 0.5, 0.0);
        for t in &pyramid.triangles {
            assert!(t.calculate_normal().dot(&(centroid(t) - inside)) > 0.0);
        }
    }

    #[test]
    fn test_sphere_shape() {
        let sphere = Mesh::sphere(2.0, 8, 12);
        assert_eq!(sphere.len(), 8 * 12 * 2);
        for t in &sphere.triangles {
            for p in &t.points {
                assert_relative_eq!(p.magnitude(), 2.0, epsilon = 1e-4);
            }
            // Triangles touching a pole can collapse to a sliver.
            let [p0, p1, p2] = t.points;
            if (p1 - p0).cross(&(p2 - p0)).magnitude() > 1e-4 {
                assert!(t.normal.dot(&centroid(t)) > 0.0);
            }
        }
    }

    #[test]
    fn test_rgb_scaled_truncates() {
        let c = Rgb::new(200, 100, 3).scaled(0.5);
        assert_eq!(c, Rgb::new(100, 50, 1));
        assert_eq!(Rgb::new(200, 0, 0).scaled(2.0), Rgb::new(255, 0, 0));
    }
}
