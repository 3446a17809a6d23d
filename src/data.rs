use crate::error::PropertiesError;
use crate::palette::{self, Color, Material};
use crate::shapes::Geometry;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Identifiers ---
pub type SystemId = Uuid;

// --- Star ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SunKind {
    YellowDwarf,
    RedGiant,
    BlueGiant,
    WhiteDwarf,
    Pulsar,
}

impl Default for SunKind {
    fn default() -> Self {
        SunKind::YellowDwarf
    }
}

impl SunKind {
    pub fn color(&self) -> Color {
        match self {
            SunKind::YellowDwarf => palette::SUN,
            SunKind::RedGiant => Color::hex(0xff6f4a),
            SunKind::BlueGiant => Color::hex(0x8fd3ff),
            SunKind::WhiteDwarf => Color::hex(0xf4f6ff),
            SunKind::Pulsar => Color::hex(0xc58cff),
        }
    }

    /// Multiplier applied to the base sun size
    pub fn size_factor(&self) -> f32 {
        match self {
            SunKind::YellowDwarf => 1.0,
            SunKind::RedGiant => 1.8,
            SunKind::BlueGiant => 1.5,
            SunKind::WhiteDwarf => 0.6,
            SunKind::Pulsar => 0.4,
        }
    }
}

// --- Generation parameters ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemProperties {
    pub name: String,

    // Star
    pub sun_size: f32,
    pub sun_kind: SunKind,
    pub sun_color: Color,

    // Planet belt
    pub radius_min: f32,        // Inner orbit distance
    pub radius_max: f32,        // Orbit spacing reference; also scales orbit speed
    pub planet_count: usize,
    pub planet_min_radius: f32,
    pub planet_max_radius: f32,

    // Asteroids
    pub asteroid_count: usize,
    pub asteroid_min_radius: f32,
    pub asteroid_max_radius: f32,
    pub belt_host: usize,       // Planet index the belt circles

    // Moons and rings
    pub moon_count: usize,      // Upper bound per planet
    pub moon_min_radius: f32,
    pub moon_max_radius: f32,
    pub ring_chance: f32,       // 0.0-1.0

    // Surface features, per planet
    pub landmass_count: usize,
    pub trees_per_planet: usize,
    pub cities_per_planet: usize,
}

impl SystemProperties {
    /// The busy system shown before anyone fills in the form
    pub fn starter() -> Self {
        Self {
            name: "Home System".to_string(),
            sun_size: 140.0,
            sun_kind: SunKind::YellowDwarf,
            sun_color: palette::SUN,
            radius_min: 190.0,
            radius_max: 300.0,
            planet_count: 9,
            planet_min_radius: 20.0,
            planet_max_radius: 50.0,
            asteroid_count: 300,
            asteroid_min_radius: 1.0,
            asteroid_max_radius: 3.0,
            belt_host: 0,
            moon_count: 0,
            moon_min_radius: 2.0,
            moon_max_radius: 6.0,
            ring_chance: 0.0,
            landmass_count: 0,
            trees_per_planet: 1,
            cities_per_planet: 0,
        }
    }

    /// Baseline for user-created systems, before preferences are applied
    pub fn custom() -> Self {
        Self {
            name: DEFAULT_SYSTEM_NAME.to_string(),
            sun_size: 20.0,
            planet_count: 2,
            moon_count: 2,
            ring_chance: 0.2,
            landmass_count: 3,
            trees_per_planet: 3,
            cities_per_planet: 1,
            ..Self::starter()
        }
    }

    /// Check bounds before generation
    pub fn validate(&self) -> Result<(), PropertiesError> {
        let bounds = [
            ("radius", self.radius_min, self.radius_max),
            ("planet radius", self.planet_min_radius, self.planet_max_radius),
            ("asteroid radius", self.asteroid_min_radius, self.asteroid_max_radius),
            ("moon radius", self.moon_min_radius, self.moon_max_radius),
        ];

        for (what, min, max) in bounds {
            if !min.is_finite() || !max.is_finite() || min <= 0.0 {
                return Err(PropertiesError::NonPositive { what, value: min });
            }
            if min > max {
                return Err(PropertiesError::InvertedBounds { what, min, max });
            }
        }

        if !self.sun_size.is_finite() || self.sun_size <= 0.0 {
            return Err(PropertiesError::NonPositive {
                what: "sun size",
                value: self.sun_size,
            });
        }

        if !(0.0..=1.0).contains(&self.ring_chance) {
            return Err(PropertiesError::RingChance(self.ring_chance));
        }

        if self.asteroid_count > 0 && self.planet_count > 0 && self.belt_host >= self.planet_count {
            return Err(PropertiesError::BeltHost {
                host: self.belt_host,
                planet_count: self.planet_count,
            });
        }

        Ok(())
    }
}

impl Default for SystemProperties {
    fn default() -> Self {
        Self::starter()
    }
}

pub const DEFAULT_SYSTEM_NAME: &str = "Solar System Ray-1";

// --- Generated bodies ---

/// Circular orbit around a parent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    pub distance: f32,
    pub angle: f32,
}

impl Orbit {
    /// Point on the orbit circle in the parent's XZ plane at height `y`
    pub fn position(&self, y: f32) -> Vec3 {
        Vec3::new(
            self.angle.cos() * self.distance,
            y,
            self.angle.sin() * self.distance,
        )
    }
}

/// Shape, look and placement shared by every free-floating body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub geometry: Geometry,
    pub material: Material,
    pub orbit: Orbit,
    pub position: Vec3,
    pub rotation: Vec3, // Euler XYZ in radians
}

impl Body {
    pub fn radius(&self) -> f32 {
        self.geometry.radius
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sun {
    pub kind: SunKind,
    pub geometry: Geometry,
    pub material: Material,
    pub rotation: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub tilt: f32,
    pub color: Color,
}

/// Flat patch of land resting on a planet's surface (planet-local)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmass {
    pub radius: f32,
    pub position: Vec3,
    pub orientation: Quat,
    pub color: Color,
}

/// Cone tree standing on a planet face (planet-local)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub scale: f32,
    pub position: Vec3,
    pub orientation: Quat,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub offset: Vec3, // Relative to the city center, in the landmass's local frame
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub landmass: usize, // Index into the planet's landmasses
    pub position: Vec3,
    pub orientation: Quat,
    pub buildings: Vec<Building>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub index: usize,
    pub body: Body,
    pub moons: Vec<Body>, // Positions relative to the planet
    pub ring: Option<Ring>,
    pub landmasses: Vec<Landmass>,
    pub trees: Vec<Tree>,
    pub cities: Vec<City>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidBelt {
    pub host: usize,
    pub asteroids: Vec<Body>, // Positions relative to the host planet
}

/// One complete generated system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarSystem {
    pub id: SystemId,
    pub seed: u64,
    pub properties: SystemProperties,
    pub sun: Sun,
    pub planets: Vec<Planet>,
    pub belt: Option<AsteroidBelt>,
    /// Bodies added by interaction after generation
    #[serde(default)]
    pub extras: Vec<Body>,
}

impl SolarSystem {
    pub fn name(&self) -> &str {
        &self.properties.name
    }

    pub fn moon_count(&self) -> usize {
        self.planets.iter().map(|p| p.moons.len()).sum()
    }

    pub fn asteroid_count(&self) -> usize {
        self.belt.as_ref().map(|b| b.asteroids.len()).unwrap_or(0)
    }

    pub fn tree_count(&self) -> usize {
        self.planets.iter().map(|p| p.trees.len()).sum()
    }

    pub fn city_count(&self) -> usize {
        self.planets.iter().map(|p| p.cities.len()).sum()
    }

    pub fn landmass_count(&self) -> usize {
        self.planets.iter().map(|p| p.landmasses.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_properties_valid() {
        let props = SystemProperties::starter();
        assert!(props.validate().is_ok());
        assert_eq!(props.planet_count, 9);
        assert_eq!(props.sun_size, 140.0);
    }

    #[test]
    fn test_custom_properties() {
        let props = SystemProperties::custom();
        assert!(props.validate().is_ok());
        assert_eq!(props.name, "Solar System Ray-1");
        assert_eq!(props.planet_count, 2);
        assert_eq!(props.sun_size, 20.0);
        assert_eq!(props.radius_min, 190.0);
        assert_eq!(props.radius_max, 300.0);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let props = SystemProperties {
            planet_min_radius: 60.0,
            planet_max_radius: 50.0,
            ..SystemProperties::starter()
        };
        assert!(matches!(
            props.validate(),
            Err(PropertiesError::InvertedBounds { what: "planet radius", .. })
        ));
    }

    #[test]
    fn test_belt_host_out_of_range() {
        let props = SystemProperties {
            planet_count: 2,
            belt_host: 2,
            ..SystemProperties::starter()
        };
        assert!(matches!(props.validate(), Err(PropertiesError::BeltHost { host: 2, .. })));

        // No asteroids, no host needed
        let props = SystemProperties {
            asteroid_count: 0,
            ..props
        };
        assert!(props.validate().is_ok());
    }

    #[test]
    fn test_ring_chance_range() {
        let props = SystemProperties {
            ring_chance: 1.5,
            ..SystemProperties::custom()
        };
        assert!(matches!(props.validate(), Err(PropertiesError::RingChance(_))));
    }

    #[test]
    fn test_non_positive_sun() {
        let props = SystemProperties {
            sun_size: 0.0,
            ..SystemProperties::starter()
        };
        assert!(matches!(props.validate(), Err(PropertiesError::NonPositive { what: "sun size", .. })));
    }

    #[test]
    fn test_orbit_position() {
        let orbit = Orbit {
            distance: 100.0,
            angle: std::f32::consts::FRAC_PI_2,
        };
        let pos = orbit.position(3.0);
        assert!(pos.x.abs() < 1e-4);
        assert_eq!(pos.y, 3.0);
        assert!((pos.z - 100.0).abs() < 1e-4);
    }
}
