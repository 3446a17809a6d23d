/// Seeded procedural generation of a complete solar system
///
/// Every random pick is drawn from one `StdRng`, so the same seed and the
/// same properties always produce the same system.
use crate::data::*;
use crate::error::PropertiesError;
use crate::mesh::Mesh;
use crate::palette::{self, Material, BODY_MATERIALS, BUILDING_COLORS, RING_COLORS};
use crate::shapes::{Shape, ASTEROID_SHAPES, MOON_SHAPES, PLANET_SHAPES, STAR};
use crate::surface::SurfaceNoise;
use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;
use tracing::{debug, info};

/// Scale of the first tree planted on a planet
pub const FIRST_TREE_SCALE: f32 = 5.0;

/// Attempts at finding land before settling for the last direction tried
const LANDMASS_ATTEMPTS: usize = 32;

/// Noise frequency for continent shapes
const CONTINENT_FREQUENCY: f32 = 1.7;

pub struct SystemGenerator {
    seed: u64,
    rng: StdRng,
}

impl SystemGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a full system for the given properties
    pub fn generate(&mut self, props: &SystemProperties) -> Result<SolarSystem, PropertiesError> {
        props.validate()?;

        info!(
            "Generating system '{}' (seed {}): {} planet(s), {} asteroid(s)",
            props.name, self.seed, props.planet_count, props.asteroid_count
        );

        let id = uuid::Builder::from_random_bytes(self.rng.gen()).into_uuid();
        let sun = self.generate_sun(props);

        let planets: Vec<Planet> = (0..props.planet_count)
            .map(|i| self.generate_planet(props, i))
            .collect();

        let belt = if props.asteroid_count > 0 && !planets.is_empty() {
            Some(self.generate_asteroid_belt(props))
        } else {
            None
        };

        let system = SolarSystem {
            id,
            seed: self.seed,
            properties: props.clone(),
            sun,
            planets,
            belt,
            extras: Vec::new(),
        };

        info!(
            "Generated '{}': {} moons, {} landmasses, {} trees, {} cities",
            system.name(),
            system.moon_count(),
            system.landmass_count(),
            system.tree_count(),
            system.city_count()
        );

        Ok(system)
    }

    fn generate_sun(&mut self, props: &SystemProperties) -> Sun {
        Sun {
            kind: props.sun_kind,
            geometry: STAR.sized(props.sun_size),
            material: Material::star(props.sun_color),
            rotation: Vec3::ZERO,
        }
    }

    fn generate_planet(&mut self, props: &SystemProperties, index: usize) -> Planet {
        let shape = self.pick(&PLANET_SHAPES);
        let radius = self.uniform(props.planet_min_radius, props.planet_max_radius);
        let distance = props.radius_min + index as f32 * (props.radius_max - props.radius_min);

        let body = self.scatter_body(shape, radius, distance);

        debug!(
            "Planet {}: {:?} r={:.1} at distance {:.1}",
            index, shape.kind, radius, distance
        );

        let moons = self.generate_moons(props, radius);
        let ring = self.generate_ring(props, radius);
        let mesh = Mesh::from_geometry(&body.geometry);
        let landmasses = self.place_landmasses(props.landmass_count, radius);
        let trees = self.plant_trees(&mesh, props.trees_per_planet);
        let cities = self.build_cities(&landmasses, props.cities_per_planet);

        Planet {
            index,
            body,
            moons,
            ring,
            landmasses,
            trees,
            cities,
        }
    }

    /// Size a shape, drop it on a random point of its orbit and spin it randomly
    fn scatter_body(&mut self, shape: Shape, radius: f32, distance: f32) -> Body {
        let material = Material::phong(self.pick(&BODY_MATERIALS));
        let orbit = Orbit {
            distance,
            angle: self.rng.gen::<f32>() * TAU,
        };
        let height = 4.0 - 10.0 * self.rng.gen::<f32>();
        let rotation = self.random_rotation();

        Body {
            geometry: shape.sized(radius),
            material,
            orbit,
            position: orbit.position(height),
            rotation,
        }
    }

    fn generate_asteroid_belt(&mut self, props: &SystemProperties) -> AsteroidBelt {
        let asteroids = (0..props.asteroid_count)
            .map(|i| {
                let shape = self.pick(&ASTEROID_SHAPES);
                let radius = self.uniform(props.asteroid_min_radius, props.asteroid_max_radius);
                let distance = radius + i as f32 / 20.0 + 50.0;
                self.scatter_body(shape, radius, distance)
            })
            .collect();

        debug!("Asteroid belt of {} around planet {}", props.asteroid_count, props.belt_host);

        AsteroidBelt {
            host: props.belt_host,
            asteroids,
        }
    }

    fn generate_moons(&mut self, props: &SystemProperties, planet_radius: f32) -> Vec<Body> {
        let count = self.rng.gen_range(0..=props.moon_count);

        (0..count)
            .map(|k| {
                let shape = self.pick(&MOON_SHAPES);
                let radius = self.uniform(props.moon_min_radius, props.moon_max_radius);
                let distance = planet_radius * 1.6 + 10.0 * k as f32 + 4.0 * self.rng.gen::<f32>();
                let material = Material::phong(self.pick(&BODY_MATERIALS));
                let orbit = Orbit {
                    distance,
                    angle: self.rng.gen::<f32>() * TAU,
                };
                let height = 2.0 - 4.0 * self.rng.gen::<f32>();

                Body {
                    geometry: shape.sized(radius),
                    material,
                    orbit,
                    position: orbit.position(height),
                    rotation: self.random_rotation(),
                }
            })
            .collect()
    }

    fn generate_ring(&mut self, props: &SystemProperties, planet_radius: f32) -> Option<Ring> {
        if self.rng.gen::<f32>() >= props.ring_chance {
            return None;
        }

        Some(Ring {
            inner_radius: planet_radius * 1.3,
            outer_radius: planet_radius * (1.6 + 0.5 * self.rng.gen::<f32>()),
            tilt: self.rng.gen::<f32>() * 0.8 - 0.4,
            color: self.pick(&RING_COLORS),
        })
    }

    /// Scatter landmasses where the planet's surface noise says there is land
    fn place_landmasses(&mut self, count: usize, planet_radius: f32) -> Vec<Landmass> {
        if count == 0 {
            return Vec::new();
        }

        let noise = SurfaceNoise::new(self.rng.gen());
        let mut landmasses = Vec::with_capacity(count);

        for _ in 0..count {
            let mut direction = self.random_direction();
            for _ in 1..LANDMASS_ATTEMPTS {
                if noise.is_land(direction, CONTINENT_FREQUENCY) {
                    break;
                }
                direction = self.random_direction();
            }

            let radius = planet_radius * (0.15 + 0.15 * self.rng.gen::<f32>());
            let color = self.pick(&[palette::GREEN, palette::SAND, palette::GREEN]);

            landmasses.push(Landmass {
                radius,
                position: direction * planet_radius,
                orientation: Quat::from_rotation_arc(Vec3::Y, direction),
                color,
            });
        }

        landmasses
    }

    /// Plant cone trees on mesh faces, the first one always on face 0
    fn plant_trees(&mut self, mesh: &Mesh, count: usize) -> Vec<Tree> {
        let faces = mesh.face_count();
        if faces == 0 {
            return Vec::new();
        }

        let mut trees = Vec::with_capacity(count);
        for i in 0..count {
            let (face, scale) = if i == 0 {
                (0, FIRST_TREE_SCALE)
            } else {
                (self.rng.gen_range(0..faces), self.uniform(3.0, 6.0))
            };

            if let Some(anchor) = mesh.face_anchor(face) {
                trees.push(Tree {
                    scale,
                    position: anchor.point,
                    orientation: Quat::from_rotation_arc(Vec3::Y, anchor.normal),
                });
            }
        }

        trees
    }

    /// Build box-building clusters on top of randomly chosen landmasses
    fn build_cities(&mut self, landmasses: &[Landmass], count: usize) -> Vec<City> {
        if landmasses.is_empty() {
            return Vec::new();
        }

        (0..count)
            .map(|_| {
                let landmass = self.rng.gen_range(0..landmasses.len());
                let site = &landmasses[landmass];
                let building_count = self.rng.gen_range(3..=7);

                let buildings = (0..building_count)
                    .map(|_| {
                        let spread = site.radius * 0.6;
                        let height = site.radius * self.uniform(0.2, 0.6);
                        Building {
                            offset: Vec3::new(
                                self.uniform(-spread, spread),
                                height * 0.5,
                                self.uniform(-spread, spread),
                            ),
                            width: site.radius * self.uniform(0.1, 0.2),
                            height,
                            depth: site.radius * self.uniform(0.1, 0.2),
                            color: self.pick(&BUILDING_COLORS),
                        }
                    })
                    .collect();

                City {
                    landmass,
                    position: site.position,
                    orientation: site.orientation,
                    buildings,
                }
            })
            .collect()
    }

    fn pick<T: Copy>(&mut self, table: &[T]) -> T {
        table[self.rng.gen_range(0..table.len())]
    }

    /// Uniform sample in `[min, max)`; collapses to `min` when the bounds meet
    fn uniform(&mut self, min: f32, max: f32) -> f32 {
        min + self.rng.gen::<f32>() * (max - min)
    }

    fn random_rotation(&mut self) -> Vec3 {
        Vec3::new(
            self.rng.gen::<f32>() * TAU,
            self.rng.gen::<f32>() * TAU,
            self.rng.gen::<f32>() * TAU,
        )
    }

    /// Uniformly distributed unit vector
    fn random_direction(&mut self) -> Vec3 {
        let z = self.rng.gen::<f32>() * 2.0 - 1.0;
        let theta = self.rng.gen::<f32>() * TAU;
        let r = (1.0 - z * z).max(0.0).sqrt();
        Vec3::new(r * theta.cos(), z, r * theta.sin())
    }
}

/// Generate a system in one call
pub fn generate_system(props: &SystemProperties, seed: u64) -> Result<SolarSystem, PropertiesError> {
    SystemGenerator::new(seed).generate(props)
}
