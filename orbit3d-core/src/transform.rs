/// Builders for the homogeneous transforms used by the renderer
///
/// Every angle is in degrees. Matrices act on column vectors, so a model placed
/// with `translation * rotation * scaling` is scaled first and translated last.
use crate::math::{Matrix4, Vector3};

/// Dot product above which a direction counts as parallel to the up reference.
const PARALLEL_THRESHOLD: f32 = 0.99;

pub fn translation(x: f32, y: f32, z: f32) -> Matrix4 {
    Matrix4::from_rows([
        [1.0, 0.0, 0.0, x],
        [0.0, 1.0, 0.0, y],
        [0.0, 0.0, 1.0, z],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Translation by a vector's x, y, z.
pub fn translation_to(v: &Vector3) -> Matrix4 {
    translation(v.x, v.y, v.z)
}

pub fn rotation_x(angle_deg: f32) -> Matrix4 {
    let (s, c) = angle_deg.to_radians().sin_cos();
    Matrix4::from_rows([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, c, -s, 0.0],
        [0.0, s, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn rotation_y(angle_deg: f32) -> Matrix4 {
    let (s, c) = angle_deg.to_radians().sin_cos();
    Matrix4::from_rows([
        [c, 0.0, s, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [-s, 0.0, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn rotation_z(angle_deg: f32) -> Matrix4 {
    let (s, c) = angle_deg.to_radians().sin_cos();
    Matrix4::from_rows([
        [c, -s, 0.0, 0.0],
        [s, c, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn scaling(x: f32, y: f32, z: f32) -> Matrix4 {
    Matrix4::from_rows([
        [x, 0.0, 0.0, 0.0],
        [0.0, y, 0.0, 0.0],
        [0.0, 0.0, z, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Perspective projection.
///
/// `aspect_ratio` is height / width. View-space `z` ends up in `w`, so the
/// caller divides by `w` to reach normalized device coordinates.
pub fn projection(fov_deg: f32, aspect_ratio: f32, near: f32, far: f32) -> Matrix4 {
    let focal = 1.0 / (fov_deg.to_radians() / 2.0).tan();
    Matrix4::from_rows([
        [aspect_ratio * focal, 0.0, 0.0, 0.0],
        [0.0, focal, 0.0, 0.0],
        [0.0, 0.0, far / (far - near), (-far * near) / (far - near)],
        [0.0, 0.0, 1.0, 0.0],
    ])
}

/// Rotation that maps the local Y axis onto `direction`.
///
/// Falls back to +Z as the up reference when `direction` is nearly parallel to
/// `up_reference`.
pub fn align_to_direction_with_up(direction: &Vector3, up_reference: &Vector3) -> Matrix4 {
    let new_y = direction.normalize();

    let up = if new_y.dot(up_reference).abs() > PARALLEL_THRESHOLD {
        Vector3::new(0.0, 0.0, 1.0)
    } else {
        *up_reference
    };

    let new_x = new_y.cross(&up).normalize();
    let new_z = new_x.cross(&new_y).normalize();

    Matrix4::from_rows([
        [new_x.x, new_y.x, new_z.x, 0.0],
        [new_x.y, new_y.y, new_z.y, 0.0],
        [new_x.z, new_y.z, new_z.z, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// [`align_to_direction_with_up`] with +Y as the up reference.
pub fn align_to_direction(direction: &Vector3) -> Matrix4 {
    align_to_direction_with_up(direction, &Vector3::new(0.0, 1.0, 0.0))
}
