//! Ties generation, animation, interaction and persistence together
//!
//! The controller owns the current system. The starter system comes from
//! the configured properties; filling in the form replaces it with one
//! derived from [`Preferences`].

use crate::archive::SystemRecord;
use crate::config::GeneratorConfig;
use crate::data::{Body, SolarSystem, SystemProperties};
use crate::error::{InteractionError, PropertiesError};
use crate::generator::SystemGenerator;
use crate::interaction::Viewer;
use crate::preferences::Preferences;
use crate::scene::{SceneBuilder, SceneGraph, SceneHandles};
use glam::Vec3;
use tracing::info;

pub struct SystemController {
    properties: SystemProperties,
    default_seed: Option<u64>,
    preferences: Option<Preferences>,
    system: Option<SolarSystem>,
    viewer: Viewer,
}

impl SystemController {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            properties: config.generator.starter.clone(),
            default_seed: config.generator.default_seed,
            preferences: None,
            system: None,
            viewer: Viewer::new(&config.scene),
        }
    }

    pub fn properties(&self) -> &SystemProperties {
        &self.properties
    }

    /// Replace the properties used by the next [`init`](Self::init)
    pub fn set_properties(&mut self, properties: SystemProperties) {
        self.properties = properties;
    }

    /// Answers behind the current system, if it came from the form
    pub fn preferences(&self) -> Option<&Preferences> {
        self.preferences.as_ref()
    }

    pub fn system(&self) -> Option<&SolarSystem> {
        self.system.as_ref()
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// Generate from the current properties with the configured seed, or a
    /// random one
    pub fn init(&mut self) -> Result<&SolarSystem, PropertiesError> {
        let seed = self.default_seed.unwrap_or_else(rand::random);
        self.preferences = None;
        self.generate(seed)
    }

    /// Replace the current system with one built from the form answers
    pub fn regenerate(&mut self, preferences: &Preferences) -> Result<&SolarSystem, PropertiesError> {
        self.regenerate_with_seed(preferences, preferences.seed())
    }

    pub fn regenerate_with_seed(
        &mut self,
        preferences: &Preferences,
        seed: u64,
    ) -> Result<&SolarSystem, PropertiesError> {
        info!(
            "Regenerating for {} ({}, {})",
            preferences.system_name(),
            preferences.personality.label(),
            preferences.animal.label()
        );
        self.properties = preferences.to_properties();
        self.preferences = Some(preferences.clone());
        self.generate(seed)
    }

    fn generate(&mut self, seed: u64) -> Result<&SolarSystem, PropertiesError> {
        let system = SystemGenerator::new(seed).generate(&self.properties)?;
        self.viewer.reset();
        let system = self.system.insert(system);
        Ok(&*system)
    }

    /// Advance the animation, returning how many frames ran
    pub fn tick(&mut self, frames: u64) -> Result<u64, InteractionError> {
        let system = self.system.as_mut().ok_or(InteractionError::NoSystem)?;
        Ok(self.viewer.tick(system, frames))
    }

    pub fn focus_planet(&mut self, index: usize) -> Result<Vec3, InteractionError> {
        let system = self.system.as_ref().ok_or(InteractionError::NoSystem)?;
        self.viewer.focus_planet(system, index)
    }

    pub fn click_sun(&mut self) -> Result<&Body, InteractionError> {
        let system = self.system.as_mut().ok_or(InteractionError::NoSystem)?;
        Ok(self.viewer.click_sun(system))
    }

    pub fn resume(&mut self) {
        self.viewer.resume();
    }

    pub fn build_scene<G: SceneGraph>(&self, graph: &mut G) -> Result<SceneHandles, InteractionError> {
        let system = self.system.as_ref().ok_or(InteractionError::NoSystem)?;
        Ok(SceneBuilder::build(system, graph))
    }

    /// Package the current system for saving
    pub fn snapshot(&self) -> Result<SystemRecord, InteractionError> {
        let system = self.system.as_ref().ok_or(InteractionError::NoSystem)?;
        Ok(SystemRecord::new(system.clone(), self.preferences.clone()))
    }

    /// Show a previously saved system exactly as it was stored
    pub fn restore(&mut self, record: SystemRecord) {
        info!("Restoring '{}' ({})", record.system.name(), record.id);
        self.properties = record.system.properties.clone();
        self.preferences = record.preferences;
        self.system = Some(record.system);
        self.viewer.reset();
    }
}
