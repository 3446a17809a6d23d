//! Viewer state: camera, animation toggle and click handlers

use crate::config::SceneSettings;
use crate::data::{Body, Orbit, SolarSystem};
use crate::error::InteractionError;
use crate::orbit::OrbitAnimator;
use crate::palette::{self, Material};
use crate::scene::CameraRig;
use crate::shapes::TETRAHEDRON;
use glam::Vec3;
use tracing::{debug, info};

/// Where the camera sits relative to a focused planet
pub const FOCUS_OFFSET: Vec3 = Vec3::new(10.0, 0.0, 0.0);
/// Drop point for bodies spawned by clicking the sun
pub const SPAWN_POSITION: Vec3 = Vec3::new(30.0, 100.0, 30.0);
pub const SPAWN_RADIUS: f32 = 20.0;

pub struct Viewer {
    camera: CameraRig,
    home: CameraRig,
    animator: OrbitAnimator,
    focused: Option<usize>,
}

impl Viewer {
    pub fn new(settings: &SceneSettings) -> Self {
        let camera = CameraRig::from_settings(settings);
        Self {
            camera,
            home: camera,
            animator: OrbitAnimator::new(),
            focused: None,
        }
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn animator(&self) -> &OrbitAnimator {
        &self.animator
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    /// Move the camera next to a planet and freeze the animation
    pub fn focus_planet(&mut self, system: &SolarSystem, index: usize) -> Result<Vec3, InteractionError> {
        let planet = system.planets.get(index).ok_or(InteractionError::NoSuchPlanet {
            index,
            count: system.planets.len(),
        })?;

        self.camera.position = planet.body.position + FOCUS_OFFSET;
        self.animator.stop();
        self.focused = Some(index);

        info!("Focused planet {} of '{}'", index, system.name());
        Ok(self.camera.position)
    }

    /// Spawn a green tetrahedron above the sun
    pub fn click_sun<'a>(&self, system: &'a mut SolarSystem) -> &'a Body {
        let index = system.extras.len();
        system.extras.push(spawned_tetrahedron());
        debug!("Spawned extra body {} in '{}'", index, system.name());
        &system.extras[index]
    }

    /// Restart the animation. The camera stays where it is.
    pub fn resume(&mut self) {
        self.animator.start();
        self.focused = None;
    }

    /// Back to the starting camera with the animation running
    pub fn reset(&mut self) {
        self.camera = self.home;
        self.resume();
    }

    /// Run up to `frames` animation frames; none run while focused
    pub fn tick(&mut self, system: &mut SolarSystem, frames: u64) -> u64 {
        self.animator.advance(system, frames)
    }
}

fn spawned_tetrahedron() -> Body {
    Body {
        geometry: TETRAHEDRON.sized(SPAWN_RADIUS),
        material: Material::star(palette::GREEN),
        orbit: Orbit {
            distance: 0.0,
            angle: 0.0,
        },
        position: SPAWN_POSITION,
        rotation: Vec3::ZERO,
    }
}
