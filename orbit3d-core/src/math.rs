/// Vector and matrix primitives shared by every stage of the renderer
use nalgebra::Vector4;
use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

/// A 3D point or direction with a homogeneous `w` component.
///
/// `w` defaults to 1 and is only carried through [`Matrix4::multiply_vector`];
/// arithmetic on vectors always produces `w = 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, w: 1.0 }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction; the zero vector stays zero.
    pub fn normalize(&self) -> Self {
        let m = self.magnitude();
        if m == 0.0 {
            return Self::zero();
        }
        *self / m
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Right-handed cross product.
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn distance_to(&self, other: &Self) -> f32 {
        (*self - *other).magnitude()
    }

    /// Divide x, y, z by `w`. Returns `None` when `w` is zero.
    pub fn perspective_divide(&self) -> Option<Self> {
        if self.w == 0.0 {
            return None;
        }
        Some(Self {
            x: self.x / self.w,
            y: self.y / self.w,
            z: self.z / self.w,
            w: self.w,
        })
    }

    fn to_homogeneous(self) -> Vector4<f32> {
        Vector4::new(self.x, self.y, self.z, self.w)
    }
}

impl Default for Vector3 {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Div<f32> for Vector3 {
    type Output = Self;

    /// Dividing by zero yields the zero vector.
    fn div(self, scalar: f32) -> Self {
        if scalar == 0.0 {
            return Self::zero();
        }
        Self::new(self.x / scalar, self.y / scalar, self.z / scalar)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Unit forward vector for a yaw/pitch pair in degrees.
///
/// Yaw turns around +Y starting from +Z; positive pitch tilts the nose towards -Y.
pub fn heading(yaw_deg: f32, pitch_deg: f32) -> Vector3 {
    let (sin_yaw, cos_yaw) = yaw_deg.to_radians().sin_cos();
    let (sin_pitch, cos_pitch) = pitch_deg.to_radians().sin_cos();
    Vector3::new(sin_yaw * cos_pitch, -sin_pitch, cos_yaw * cos_pitch)
}

/// A 4x4 transform acting on column vectors.
///
/// `m[(row, col)]` addresses rows first. Composition `a * b` applies `b` first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4(pub nalgebra::Matrix4<f32>);

impl Matrix4 {
    pub fn identity() -> Self {
        Self(nalgebra::Matrix4::identity())
    }

    /// Build from rows, as laid out on paper.
    pub fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        let mut m = Self::identity();
        for (i, row) in rows.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                m[(i, j)] = *value;
            }
        }
        m
    }

    /// Transform `v` as a homogeneous column vector, keeping the resulting `w`.
    pub fn multiply_vector(&self, v: &Vector3) -> Vector3 {
        let r = self.0 * v.to_homogeneous();
        Vector3 {
            x: r.x,
            y: r.y,
            z: r.z,
            w: r.w,
        }
    }

    /// Column `j` as a vector (ignores the bottom row).
    pub fn column(&self, j: usize) -> Vector3 {
        Vector3::new(self[(0, j)], self[(1, j)], self[(2, j)])
    }

    /// Upper-left 3x3 block with the translation column cleared.
    pub fn rotation_part(&self) -> Self {
        let mut m = *self;
        m[(0, 3)] = 0.0;
        m[(1, 3)] = 0.0;
        m[(2, 3)] = 0.0;
        m
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Matrix4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl Index<(usize, usize)> for Matrix4 {
    type Output = f32;

    fn index(&self, index: (usize, usize)) -> &f32 {
        &self.0[index]
    }
}

impl IndexMut<(usize, usize)> for Matrix4 {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f32 {
        &mut self.0[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_matrix(seed: f32) -> Matrix4 {
        let mut rows = [[0.0; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = seed + (i * 4 + j) as f32 * 0.37 - 2.0;
            }
        }
        Matrix4::from_rows(rows)
    }

    #[test]
    fn test_normalize_unit_length() {
        for v in [
            Vector3::new(3.0, 4.0, 0.0),
            Vector3::new(-1.0, 2.0, -7.5),
            Vector3::new(0.001, 0.0, 0.0),
        ] {
            assert_relative_eq!(v.normalize().magnitude(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        let n = Vector3::zero().normalize();
        assert_eq!(n, Vector3::zero());
        assert!(!n.x.is_nan());
    }

    #[test]
    fn test_divide_by_zero_is_zero() {
        assert_eq!(Vector3::new(1.0, 2.0, 3.0) / 0.0, Vector3::zero());
    }

    #[test]
    fn test_cross_is_perpendicular() {
        let pairs = [
            (Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0)),
            (Vector3::new(1.5, -2.0, 0.3), Vector3::new(-0.7, 4.0, 2.2)),
            (Vector3::new(10.0, 3.0, -6.0), Vector3::new(1.0, 1.0, 1.0)),
        ];
        for (a, b) in pairs {
            let c = a.cross(&b);
            assert_relative_eq!(c.dot(&a), 0.0, epsilon = 1e-4);
            assert_relative_eq!(c.dot(&b), 0.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_cross_right_handed() {
        let z = Vector3::new(1.0, 0.0, 0.0).cross(&Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(z, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_distance() {
        let a = Vector3::new(1.0, 1.0, 1.0);
        let b = Vector3::new(4.0, 5.0, 1.0);
        assert_relative_eq!(a.distance_to(&b), 5.0);
    }

    #[test]
    fn test_identity_fixed_point() {
        let m = sample_matrix(0.5);
        assert_eq!(Matrix4::identity() * m, m);
        assert_eq!(m * Matrix4::identity(), m);
        assert_eq!(Matrix4::default(), Matrix4::identity());
    }

    #[test]
    fn test_composition_associative() {
        let a = sample_matrix(0.1);
        let b = sample_matrix(-1.3);
        let c = sample_matrix(2.2);
        let left = (a * b) * c;
        let right = a * (b * c);
        assert!((left.0 - right.0).norm() <= 1e-5 * left.0.norm());
    }

    #[test]
    fn test_multiply_vector_carries_w() {
        let m = Matrix4::from_rows([
            [1.0, 0.0, 0.0, 2.0],
            [0.0, 1.0, 0.0, 3.0],
            [0.0, 0.0, 1.0, 4.0],
            [0.0, 0.0, 1.0, 0.0],
        ]);
        let r = m.multiply_vector(&Vector3::new(1.0, 1.0, 5.0));
        assert_eq!((r.x, r.y, r.z, r.w), (3.0, 4.0, 9.0, 5.0));
    }

    #[test]
    fn test_from_rows_row_major() {
        let m = Matrix4::from_rows([
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ]);
        assert_eq!(m[(0, 3)], 4.0);
        assert_eq!(m[(3, 0)], 13.0);
        assert_eq!(m.column(1), Vector3::new(2.0, 6.0, 10.0));
    }

    #[test]
    fn test_heading_axes() {
        let forward = heading(0.0, 0.0);
        assert_relative_eq!(forward.z, 1.0);
        let right = heading(90.0, 0.0);
        assert_relative_eq!(right.x, 1.0, epsilon = 1e-6);
        let nose_down = heading(0.0, 90.0);
        assert_relative_eq!(nose_down.y, -1.0, epsilon = 1e-6);
    }
}
