/// Background starfield
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::math::{heading, Vector3};

/// Fixed set of unit directions drawn at infinity
#[derive(Debug, Clone, Default)]
pub struct Starfield {
    pub stars: Vec<Vector3>,
}

impl Starfield {
    /// Sample `count` directions with yaw in [0, 360) and pitch in [-90, 90].
    pub fn generate<R: Rng>(count: usize, rng: &mut R) -> Self {
        let stars = (0..count)
            .map(|_| {
                let yaw = rng.random_range(0.0..360.0);
                let pitch = rng.random_range(-90.0..=90.0);
                heading(yaw, pitch)
            })
            .collect();
        Self { stars }
    }

    /// Reproducible starfield for a given seed.
    pub fn with_seed(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::generate(count, &mut rng)
    }

    pub fn random(count: usize) -> Self {
        Self::generate(count, &mut rand::rng())
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_stars_are_unit_directions() {
        let field = Starfield::with_seed(500, 7);
        assert_eq!(field.len(), 500);
        for star in &field.stars {
            assert_relative_eq!(star.magnitude(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_seeded_fields_repeat() {
        let a = Starfield::with_seed(32, 42);
        let b = Starfield::with_seed(32, 42);
        let c = Starfield::with_seed(32, 43);
        assert_eq!(a.stars, b.stars);
        assert_ne!(a.stars, c.stars);
    }
}
