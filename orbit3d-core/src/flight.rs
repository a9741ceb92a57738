/// Spacecraft and planet physics
///
/// Units are kilometres and seconds-per-frame. Every step is scaled by `dt`,
/// which the host multiplies up for time warp.
use crate::camera::{Camera, LOOK_SENSITIVITY, PITCH_LIMIT};
use crate::math::{heading, Matrix4, Vector3};
use crate::transform::{rotation_x, rotation_y, scaling, translation_to};

/// Ships stop this far above the planet surface.
pub const COLLISION_BUFFER: f32 = 1.0;
/// Frames per second used to convert per-frame velocity to a speed readout.
pub const FRAMES_PER_SECOND: f32 = 60.0;

/// A gravitating sphere
#[derive(Debug, Clone, PartialEq)]
pub struct Planet {
    pub position: Vector3,
    pub radius: f32,
    /// Standard gravitational parameter (km^3/s^2)
    pub mu: f32,
}

impl Planet {
    pub fn new(position: Vector3, radius: f32, mu: f32) -> Self {
        Self {
            position,
            radius,
            mu,
        }
    }

    /// Earth-sized planet 7000 km above the origin.
    pub fn earth() -> Self {
        Self::new(Vector3::new(0.0, 7000.0, 0.0), 6371.0, 398_600.0)
    }

    /// Places a unit sphere mesh at the planet's position and size.
    pub fn world_matrix(&self) -> Matrix4 {
        let r = self.radius;
        translation_to(&self.position) * scaling(r, r, r)
    }
}

/// Thrust requested for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShipControls {
    pub thrust_forward: bool,
    pub thrust_back: bool,
}

/// The player's ship
#[derive(Debug, Clone, PartialEq)]
pub struct Spacecraft {
    pub position: Vector3,
    pub velocity: Vector3,
    pub yaw: f32,
    pub pitch: f32,
    pub acceleration: f32,
}

impl Spacecraft {
    pub fn new(position: Vector3) -> Self {
        Self {
            position,
            velocity: Vector3::zero(),
            yaw: 0.0,
            pitch: 0.0,
            acceleration: 0.05,
        }
    }

    pub fn forward(&self) -> Vector3 {
        heading(self.yaw, self.pitch)
    }

    /// Accelerate towards the planet by `mu / r^2`. No pull inside the planet.
    pub fn apply_gravity(&mut self, planet: &Planet, dt: f32) {
        let offset = planet.position - self.position;
        let dist_sq = offset.dot(&offset);
        let dist = dist_sq.sqrt();
        if dist < planet.radius {
            return;
        }

        let step = planet.mu / dist_sq * dt;
        self.velocity = self.velocity + offset / dist * step;
    }

    /// Stop the ship and push it back onto the surface if it sank below it.
    ///
    /// Returns whether a collision happened.
    pub fn check_collision(&mut self, planet: &Planet) -> bool {
        let offset = self.position - planet.position;
        let dist = offset.magnitude();
        let surface = planet.radius + COLLISION_BUFFER;
        if dist >= surface {
            return false;
        }

        self.velocity = Vector3::zero();
        if dist > 0.0 {
            self.position = planet.position + offset / dist * surface;
        }
        true
    }

    /// Steering, thrust and position integration for one frame.
    ///
    /// Steering ignores `dt` so look speed stays the same under time warp.
    pub fn update(
        &mut self,
        controls: &ShipControls,
        (dx, dy): (f32, f32),
        dt: f32,
        controls_enabled: bool,
    ) {
        if controls_enabled {
            self.yaw += dx * LOOK_SENSITIVITY;
            self.pitch -= dy * LOOK_SENSITIVITY;
        }
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let thrust = self.forward() * (self.acceleration * dt);
        if controls_enabled {
            if controls.thrust_forward {
                self.velocity = self.velocity + thrust;
            }
            if controls.thrust_back {
                self.velocity = self.velocity - thrust;
            }
        }

        self.position = self.position + self.velocity * dt;
    }

    /// Model to world. The ship model's nose points along +X, hence the fixed
    /// quarter turn applied first.
    pub fn world_matrix(&self) -> Matrix4 {
        translation_to(&self.position)
            * (rotation_y(self.yaw) * rotation_x(self.pitch))
            * rotation_x(90.0)
    }

    /// Height above the planet surface.
    pub fn altitude(&self, planet: &Planet) -> f32 {
        self.position.distance_to(&planet.position) - planet.radius
    }

    /// Speed in km/s.
    pub fn speed(&self) -> f32 {
        self.velocity.magnitude() * FRAMES_PER_SECOND
    }
}

/// Which of two whole objects goes on screen first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOrder {
    ShipFirst,
    PlanetFirst,
}

/// Painter's order between ship and planet: the one farther from the camera first.
pub fn render_order(camera: &Camera, ship: &Spacecraft, planet: &Planet) -> RenderOrder {
    let to_planet = camera.position.distance_to(&planet.position);
    let to_ship = camera.position.distance_to(&ship.position);
    if to_planet < to_ship {
        RenderOrder::ShipFirst
    } else {
        RenderOrder::PlanetFirst
    }
}
