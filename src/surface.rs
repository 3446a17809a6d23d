/// Layered noise sampled on a planet's surface
use glam::Vec3;
use noise::{NoiseFn, Perlin};

/// Multi-layer noise sampler used to decide where land rises on a planet
pub struct SurfaceNoise {
    /// Continent-scale shapes
    low_freq: Perlin,
    /// Coastline detail
    high_freq: Perlin,
}

impl SurfaceNoise {
    /// Create a new surface noise sampler with the given seed
    pub fn new(seed: u32) -> Self {
        Self {
            low_freq: Perlin::new(seed),
            high_freq: Perlin::new(seed.wrapping_add(1)),
        }
    }

    /// Sample layered noise at a direction from the planet center
    ///
    /// The direction is normalized first so the result only depends on where
    /// on the surface it points. Returns a value roughly in [-1.5, 1.5].
    pub fn sample(&self, direction: Vec3, frequency: f32) -> f32 {
        let p = direction.normalize_or_zero() * frequency;

        let low = self.low_freq.get([p.x as f64, p.y as f64, p.z as f64]) as f32;

        let q = p * 4.0;
        let high = self.high_freq.get([q.x as f64, q.y as f64, q.z as f64]) as f32 * 0.5;

        low + high
    }

    /// Whether the surface at this direction is land
    pub fn is_land(&self, direction: Vec3, frequency: f32) -> bool {
        self.sample(direction, frequency) > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_noise() {
        let noise1 = SurfaceNoise::new(12345);
        let noise2 = SurfaceNoise::new(12345);
        let dir = Vec3::new(0.3, 0.8, -0.2);

        assert_eq!(noise1.sample(dir, 1.7), noise2.sample(dir, 1.7));
    }

    #[test]
    fn test_only_direction_matters() {
        let noise = SurfaceNoise::new(7);
        let dir = Vec3::new(1.0, 2.0, 3.0);

        let near = noise.sample(dir, 1.5);
        let far = noise.sample(dir * 40.0, 1.5);
        assert!((near - far).abs() < 1e-5);
    }

    #[test]
    fn test_different_seeds_produce_different_values() {
        let noise1 = SurfaceNoise::new(12345);
        let noise2 = SurfaceNoise::new(54321);

        let found_difference = (0..25).any(|i| {
            let dir = Vec3::new((i as f32 * 0.37).sin(), (i as f32 * 0.71).cos(), i as f32 * 0.1 - 1.2);
            noise1.sample(dir, 1.7) != noise2.sample(dir, 1.7)
        });

        assert!(found_difference, "Different seeds should produce different values");
    }

    #[test]
    fn test_noise_roughly_in_range() {
        let noise = SurfaceNoise::new(42);
        for i in 0..100 {
            let dir = Vec3::new((i as f32).sin(), (i as f32 * 1.3).cos(), (i as f32 * 0.7).sin());
            let val = noise.sample(dir, 1.7);
            assert!(val > -2.0 && val < 2.0, "Noise value {} out of expected range", val);
        }
    }
}
