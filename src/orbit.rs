/// Per-frame orbit and spin animation
use crate::data::{Body, SolarSystem};
use tracing::debug;

/// Base angular step for planets, scaled by how far out they orbit
pub const PLANET_ORBIT_STEP: f32 = 0.009;
/// Planet self-rotation per frame
pub const PLANET_SPIN_STEP: f32 = 2.0 / 30.0;
/// Sun self-rotation per frame
pub const SUN_SPIN_STEP: f32 = 0.005;
/// Base angular step for moons, scaled by planet radius over moon distance
pub const MOON_ORBIT_STEP: f32 = 0.02;

/// Drives the animation loop; frames are ignored while stopped
#[derive(Debug, Clone)]
pub struct OrbitAnimator {
    running: bool,
    frame: u64,
}

impl Default for OrbitAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitAnimator {
    pub fn new() -> Self {
        Self {
            running: true,
            frame: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Frames advanced since creation
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advance one frame. Returns false when stopped.
    pub fn tick(&mut self, system: &mut SolarSystem) -> bool {
        if !self.running {
            return false;
        }

        step(system);
        self.frame += 1;

        if self.frame % 600 == 0 {
            debug!("Animated {} frames of '{}'", self.frame, system.name());
        }
        true
    }

    /// Advance several frames, returning how many actually ran
    pub fn advance(&mut self, system: &mut SolarSystem, frames: u64) -> u64 {
        let mut ran = 0;
        for _ in 0..frames {
            if !self.tick(system) {
                break;
            }
            ran += 1;
        }
        ran
    }
}

/// Move every planet and moon one frame along its orbit and spin the bodies
pub fn step(system: &mut SolarSystem) {
    let radius_max = system.properties.radius_max;

    for planet in system.planets.iter_mut() {
        advance_orbit(&mut planet.body, PLANET_ORBIT_STEP * radius_max);
        planet.body.rotation.y += PLANET_SPIN_STEP;

        let planet_radius = planet.body.radius();
        for moon in planet.moons.iter_mut() {
            advance_orbit(moon, MOON_ORBIT_STEP * planet_radius);
        }
    }

    system.sun.rotation.y += SUN_SPIN_STEP;
}

/// `angle += scale / distance`, keeping the body's height
///
/// A body sitting at the orbit center has nowhere to go and is left alone.
fn advance_orbit(body: &mut Body, scale: f32) {
    if body.orbit.distance <= f32::EPSILON {
        return;
    }

    body.orbit.angle += scale / body.orbit.distance;
    body.position = body.orbit.position(body.position.y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SystemProperties;
    use crate::generator::generate_system;

    #[test]
    fn test_planet_angle_step() {
        let mut system = generate_system(&SystemProperties::starter(), 42).unwrap();
        let before: Vec<f32> = system.planets.iter().map(|p| p.body.orbit.angle).collect();

        step(&mut system);

        for (planet, angle) in system.planets.iter().zip(before) {
            let expected = angle + 0.009 / (planet.body.orbit.distance / 300.0);
            assert!((planet.body.orbit.angle - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn test_height_preserved_and_position_on_orbit() {
        let mut system = generate_system(&SystemProperties::custom(), 1).unwrap();
        let heights: Vec<f32> = system.planets.iter().map(|p| p.body.position.y).collect();

        for _ in 0..10 {
            step(&mut system);
        }

        for (planet, y) in system.planets.iter().zip(heights) {
            assert_eq!(planet.body.position.y, y);
            let expected = planet.body.orbit.position(y);
            assert!((planet.body.position - expected).length() < 1e-3);
        }
    }

    #[test]
    fn test_moon_angle_step() {
        let mut props = SystemProperties::custom();
        props.moon_count = 4;
        let mut system = (0..)
            .map(|seed| generate_system(&props, seed).unwrap())
            .find(|s| s.moon_count() > 0)
            .unwrap();
        let before: Vec<Vec<(f32, f32)>> = system
            .planets
            .iter()
            .map(|p| p.moons.iter().map(|m| (m.orbit.angle, m.position.y)).collect())
            .collect();

        step(&mut system);

        for (planet, moons) in system.planets.iter().zip(before) {
            let planet_radius = planet.body.radius();
            for (moon, (angle, y)) in planet.moons.iter().zip(moons) {
                let expected = angle + 0.02 * planet_radius / moon.orbit.distance;
                assert!((moon.orbit.angle - expected).abs() < 1e-5);
                assert_eq!(moon.position.y, y);
                assert!((moon.position - moon.orbit.position(y)).length() < 1e-3);
            }
        }
    }

    #[test]
    fn test_spin() {
        let mut system = generate_system(&SystemProperties::starter(), 42).unwrap();
        let planet_y = system.planets[0].body.rotation.y;

        step(&mut system);

        assert!((system.sun.rotation.y - 0.005).abs() < 1e-6);
        assert!((system.planets[0].body.rotation.y - planet_y - 2.0 / 30.0).abs() < 1e-5);
    }

    #[test]
    fn test_stopped_animator_does_nothing() {
        let mut system = generate_system(&SystemProperties::starter(), 42).unwrap();
        let snapshot = system.clone();
        let mut animator = OrbitAnimator::new();
        animator.stop();

        assert!(!animator.tick(&mut system));
        assert_eq!(animator.advance(&mut system, 50), 0);
        assert_eq!(system, snapshot);

        animator.start();
        assert_eq!(animator.advance(&mut system, 50), 50);
        assert_eq!(animator.frame(), 50);
        assert_ne!(system, snapshot);
    }

    #[test]
    fn test_zero_distance_does_not_move() {
        let mut system = generate_system(&SystemProperties::starter(), 42).unwrap();
        system.planets[0].body.orbit.distance = 0.0;
        let angle = system.planets[0].body.orbit.angle;

        step(&mut system);

        assert_eq!(system.planets[0].body.orbit.angle, angle);
        assert!(system.planets[0].body.orbit.angle.is_finite());
    }
}
