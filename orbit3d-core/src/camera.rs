/// Camera pose, view matrix and the chase / follow / free-fly modes
use crate::math::{heading, Matrix4, Vector3};
use crate::transform::{rotation_x, rotation_y, translation};

/// Degrees of rotation per unit of mouse movement.
pub const LOOK_SENSITIVITY: f32 = 0.2;
/// Pitch is kept inside +/- this many degrees.
pub const PITCH_LIMIT: f32 = 89.0;

const FREE_FLY_SPEED: f32 = 60.0;
const TURBO_FACTOR: f32 = 10.0;
const PRECISION_FACTOR: f32 = 1.0 / 3.0;

/// How the camera decides its pose each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// Sits behind the ship and copies its orientation
    Chase,
    /// Orbits the ship at `follow_distance`, steered by the mouse
    Follow,
    /// Detached, flown with the movement keys
    Free,
}

impl CameraMode {
    pub fn next(self) -> Self {
        match self {
            CameraMode::Chase => CameraMode::Follow,
            CameraMode::Follow => CameraMode::Free,
            CameraMode::Free => CameraMode::Chase,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CameraMode::Chase => "CHASE",
            CameraMode::Follow => "FOLLOW",
            CameraMode::Free => "FREE",
        }
    }
}

/// Movement requested for one frame of free flight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreeFlyInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub turbo: bool,
    pub precision: bool,
}

/// Camera with a position and yaw/pitch in degrees (no roll)
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vector3,
    pub yaw: f32,
    pub pitch: f32,
    pub mode: CameraMode,
    pub follow_distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self::with_pose(Vector3::new(0.0, 0.0, -10.0), 0.0, 0.0)
    }

    pub fn with_pose(position: Vector3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw,
            pitch,
            mode: CameraMode::Chase,
            follow_distance: 15.0,
            min_distance: 5.0,
            max_distance: 1000.0,
        }
    }

    /// World to view transform: undo the translation, then the yaw, then the pitch.
    pub fn view_matrix(&self) -> Matrix4 {
        let p = self.position;
        rotation_x(-self.pitch) * rotation_y(-self.yaw) * translation(-p.x, -p.y, -p.z)
    }

    pub fn forward(&self) -> Vector3 {
        heading(self.yaw, self.pitch)
    }

    pub fn switch_mode(&mut self) {
        self.mode = self.mode.next();
    }

    /// Change the follow distance, clamped to `[min_distance, max_distance]`.
    pub fn adjust_distance(&mut self, delta: f32) {
        self.follow_distance =
            (self.follow_distance + delta).clamp(self.min_distance, self.max_distance);
    }

    /// Copy the target's orientation and sit `follow_distance` behind it.
    pub fn chase(&mut self, target: &Vector3, target_yaw: f32, target_pitch: f32) {
        self.yaw = target_yaw;
        self.pitch = target_pitch;
        self.place_behind(target);
    }

    /// Look around with the mouse while staying `follow_distance` from the target.
    pub fn follow(&mut self, target: &Vector3, mouse_delta: (f32, f32)) {
        self.look(mouse_delta);
        self.place_behind(target);
    }

    /// Mouse look plus movement along the ground plane and the world Y axis.
    pub fn free_fly(&mut self, input: &FreeFlyInput, mouse_delta: (f32, f32)) {
        self.look(mouse_delta);

        let speed = if input.turbo {
            FREE_FLY_SPEED * TURBO_FACTOR
        } else if input.precision {
            FREE_FLY_SPEED * PRECISION_FACTOR
        } else {
            FREE_FLY_SPEED
        };

        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        let ahead = Vector3::new(sin_yaw, 0.0, cos_yaw) * speed;
        let strafe = Vector3::new(cos_yaw, 0.0, -sin_yaw) * speed;

        if input.forward {
            self.position = self.position + ahead;
        }
        if input.back {
            self.position = self.position - ahead;
        }
        if input.left {
            self.position = self.position - strafe;
        }
        if input.right {
            self.position = self.position + strafe;
        }
        if input.up {
            self.position.y -= speed;
        }
        if input.down {
            self.position.y += speed;
        }
    }

    fn look(&mut self, (dx, dy): (f32, f32)) {
        self.yaw += dx * LOOK_SENSITIVITY;
        self.pitch = (self.pitch - dy * LOOK_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    fn place_behind(&mut self, target: &Vector3) {
        self.position = *target - self.forward() * self.follow_distance;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn to_view(camera: &Camera, p: Vector3) -> Vector3 {
        camera.view_matrix().multiply_vector(&p)
    }

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new();
        assert_eq!(camera.mode, CameraMode::Chase);
        assert_eq!(camera.position, Vector3::new(0.0, 0.0, -10.0));
        assert_eq!(camera.follow_distance, 15.0);
    }

    #[test]
    fn test_view_matrix_translates_first() {
        let camera = Camera::with_pose(Vector3::new(1.0, 2.0, 3.0), 0.0, 0.0);
        let p = to_view(&camera, Vector3::new(1.0, 2.0, 8.0));
        assert_relative_eq!(p.x, 0.0);
        assert_relative_eq!(p.y, 0.0);
        assert_relative_eq!(p.z, 5.0);
    }

    #[test]
    fn test_view_matrix_matches_heading() {
        // A point straight ahead of the camera lands on the view +Z axis.
        for (yaw, pitch) in [(0.0, 0.0), (90.0, 0.0), (-35.0, 20.0), (170.0, -60.0)] {
            let camera = Camera::with_pose(Vector3::new(4.0, -2.0, 7.0), yaw, pitch);
            let ahead = camera.position + camera.forward() * 10.0;
            let p = to_view(&camera, ahead);
            assert_relative_eq!(p.x, 0.0, epsilon = 1e-4);
            assert_relative_eq!(p.y, 0.0, epsilon = 1e-4);
            assert_relative_eq!(p.z, 10.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_switch_mode_cycles() {
        let mut camera = Camera::new();
        camera.switch_mode();
        assert_eq!(camera.mode, CameraMode::Follow);
        camera.switch_mode();
        assert_eq!(camera.mode, CameraMode::Free);
        camera.switch_mode();
        assert_eq!(camera.mode, CameraMode::Chase);
    }

    #[test]
    fn test_adjust_distance_clamps() {
        let mut camera = Camera::new();
        camera.adjust_distance(-100.0);
        assert_eq!(camera.follow_distance, 5.0);
        camera.adjust_distance(5000.0);
        assert_eq!(camera.follow_distance, 1000.0);
        camera.adjust_distance(-10.0);
        assert_eq!(camera.follow_distance, 990.0);
    }

    #[test]
    fn test_chase_sits_behind_target() {
        let mut camera = Camera::new();
        let target = Vector3::new(100.0, 0.0, 0.0);
        camera.chase(&target, 90.0, 0.0);
        assert_eq!(camera.yaw, 90.0);
        assert_relative_eq!(camera.position.x, 85.0, epsilon = 1e-4);
        assert_relative_eq!(camera.position.z, 0.0, epsilon = 1e-4);
        assert_relative_eq!(camera.position.distance_to(&target), 15.0, epsilon = 1e-4);
    }

    #[test]
    fn test_follow_clamps_pitch() {
        let mut camera = Camera::new();
        camera.follow(&Vector3::zero(), (0.0, -10_000.0));
        assert_eq!(camera.pitch, PITCH_LIMIT);
        assert_relative_eq!(camera.position.magnitude(), 15.0, epsilon = 1e-3);
    }

    #[test]
    fn test_free_fly_moves() {
        let mut camera = Camera::with_pose(Vector3::zero(), 0.0, 0.0);
        let input = FreeFlyInput {
            forward: true,
            ..Default::default()
        };
        camera.free_fly(&input, (0.0, 0.0));
        assert_relative_eq!(camera.position.z, 60.0);

        let input = FreeFlyInput {
            up: true,
            turbo: true,
            ..Default::default()
        };
        camera.free_fly(&input, (0.0, 0.0));
        assert_relative_eq!(camera.position.y, -600.0);

        let input = FreeFlyInput {
            right: true,
            precision: true,
            ..Default::default()
        };
        camera.free_fly(&input, (0.0, 0.0));
        assert_relative_eq!(camera.position.x, 20.0, epsilon = 1e-4);
    }
}
