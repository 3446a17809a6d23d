//! Scene graph seam and the builder that mirrors a generated system into it
//!
//! The renderer itself lives outside this crate. Everything it needs to know
//! goes through [`SceneGraph`]: nodes are added under a parent, then moved,
//! recolored or removed. [`SceneTree`] is an in-memory implementation used by
//! the CLI and the tests, and can be dumped as JSON for an external viewer.

use crate::config::SceneSettings;
use crate::data::{Body, Planet, SolarSystem};
use crate::palette::{self, Color, Material};
use crate::shapes::Geometry;
use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use tracing::debug;

pub type NodeId = usize;

/// Local transform relative to the parent node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn oriented(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// Position plus XYZ Euler angles in radians
    pub fn euler(position: Vec3, angles: Vec3) -> Self {
        Self::oriented(
            position,
            Quat::from_euler(EulerRot::XYZ, angles.x, angles.y, angles.z),
        )
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub distance: f32,
    pub shadow_map_size: u32,
    pub shadow_extent: f32, // Half-size of the orthographic shadow camera
    pub shadow_far: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: palette::WHITE,
            intensity: 1.5,
            distance: 800.0,
            shadow_map_size: 2048,
            shadow_extent: 800.0,
            shadow_far: 800.0,
        }
    }
}

/// Where the directional light sits
pub const KEY_LIGHT_POSITION: Vec3 = Vec3::new(300.0, 100.0, 300.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Group,
    Mesh { geometry: Geometry, material: Material },
    Ring { inner_radius: f32, outer_radius: f32, color: Color },
    AmbientLight { color: Color, intensity: f32 },
    DirectionalLight(DirectionalLight),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
}

impl SceneNode {
    pub fn group(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Group,
            transform,
        }
    }

    pub fn mesh(name: impl Into<String>, geometry: Geometry, material: Material, transform: Transform) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Mesh { geometry, material },
            transform,
        }
    }

    fn body(name: String, body: &Body) -> Self {
        Self::mesh(
            name,
            body.geometry,
            body.material,
            Transform::euler(body.position, body.rotation),
        )
    }
}

/// Operations the generator needs from a scene graph
pub trait SceneGraph {
    /// Attach a node under `parent`, or at the root when `None`
    fn add_node(&mut self, parent: Option<NodeId>, node: SceneNode) -> NodeId;
    /// Returns false if the node does not exist
    fn set_transform(&mut self, id: NodeId, transform: Transform) -> bool;
    fn set_material(&mut self, id: NodeId, material: Material) -> bool;
    /// Remove a node and everything below it
    fn remove(&mut self, id: NodeId) -> bool;
    fn node(&self, id: NodeId) -> Option<&SceneNode>;
    fn children(&self, id: NodeId) -> Vec<NodeId>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    node: SceneNode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed scene graph; removed slots stay empty so ids never shift
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneTree {
    entries: Vec<Option<Entry>>,
    roots: Vec<NodeId>,
}

impl SceneTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entries.get(id)?.as_ref()?.parent
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.entries
            .iter()
            .position(|e| e.as_ref().map(|e| e.node.name == name).unwrap_or(false))
    }

    /// Node transform composed with every ancestor's
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let entry = self.entries.get(id)?.as_ref()?;
        let local = entry.node.transform.matrix();
        match entry.parent {
            Some(parent) => Some(self.world_matrix(parent)? * local),
            None => Some(local),
        }
    }

    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.transform_point3(Vec3::ZERO))
    }

    fn entry_mut(&mut self, id: NodeId) -> Option<&mut Entry> {
        self.entries.get_mut(id)?.as_mut()
    }

    fn remove_subtree(&mut self, id: NodeId) {
        if let Some(entry) = self.entries.get_mut(id).and_then(Option::take) {
            for child in entry.children {
                self.remove_subtree(child);
            }
        }
    }
}

impl SceneGraph for SceneTree {
    fn add_node(&mut self, parent: Option<NodeId>, node: SceneNode) -> NodeId {
        let id = self.entries.len();
        // A dangling parent attaches at the root instead
        let parent = parent.filter(|p| self.entries.get(*p).map(Option::is_some).unwrap_or(false));

        self.entries.push(Some(Entry {
            node,
            parent,
            children: Vec::new(),
        }));

        match parent.and_then(|p| self.entry_mut(p)) {
            Some(parent_entry) => parent_entry.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    fn set_transform(&mut self, id: NodeId, transform: Transform) -> bool {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.node.transform = transform;
                true
            }
            None => false,
        }
    }

    fn set_material(&mut self, id: NodeId, material: Material) -> bool {
        match self.entry_mut(id).map(|e| &mut e.node.kind) {
            Some(NodeKind::Mesh { material: current, .. }) => {
                *current = material;
                true
            }
            _ => false,
        }
    }

    fn remove(&mut self, id: NodeId) -> bool {
        let parent = match self.entries.get(id).and_then(Option::as_ref) {
            Some(entry) => entry.parent,
            None => return false,
        };

        match parent.and_then(|p| self.entry_mut(p)) {
            Some(parent_entry) => parent_entry.children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }

        self.remove_subtree(id);
        true
    }

    fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.entries.get(id)?.as_ref().map(|e| &e.node)
    }

    fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.entries
            .get(id)
            .and_then(Option::as_ref)
            .map(|e| e.children.clone())
            .unwrap_or_default()
    }
}

/// Perspective camera plus orbit-control limits and the clear color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    pub position: Vec3,
    pub background: Color,
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl CameraRig {
    pub fn from_settings(settings: &SceneSettings) -> Self {
        Self {
            position: Vec3::from_array(settings.camera_position),
            background: settings.background,
            fov_deg: settings.fov_deg,
            near: settings.near,
            far: settings.far,
            min_distance: settings.min_distance,
            max_distance: settings.max_distance,
        }
    }

    /// Distance from the orbit-control target at the origin
    pub fn distance(&self) -> f32 {
        self.position.length()
    }
}

/// Node ids for everything the animation moves
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneHandles {
    pub space: NodeId,
    pub sun: NodeId,
    pub planets_group: NodeId,
    pub planets: Vec<NodeId>,
    pub moons: Vec<Vec<NodeId>>,
    pub belt: Option<NodeId>,
    pub extras: Vec<NodeId>,
    pub lights: Vec<NodeId>,
}

/// Tilt of the whole system around Z
pub const SPACE_TILT: f32 = PI / 12.0;

pub struct SceneBuilder;

impl SceneBuilder {
    /// Mirror a generated system into a scene graph
    pub fn build<G: SceneGraph>(system: &SolarSystem, graph: &mut G) -> SceneHandles {
        let key_light = graph.add_node(
            None,
            SceneNode {
                name: "key_light".to_string(),
                kind: NodeKind::DirectionalLight(DirectionalLight::default()),
                transform: Transform::at(KEY_LIGHT_POSITION),
            },
        );
        let ambient = graph.add_node(
            None,
            SceneNode {
                name: "ambient_light".to_string(),
                kind: NodeKind::AmbientLight {
                    color: palette::AMBIENT_LIGHT,
                    intensity: 4.0,
                },
                transform: Transform::IDENTITY,
            },
        );

        let space = graph.add_node(
            None,
            SceneNode::group(
                "space",
                Transform::oriented(Vec3::ZERO, Quat::from_rotation_z(SPACE_TILT)),
            ),
        );

        let sun = graph.add_node(
            Some(space),
            SceneNode::mesh(
                "sun",
                system.sun.geometry,
                system.sun.material,
                Transform::euler(Vec3::ZERO, system.sun.rotation),
            ),
        );

        let planets_group = graph.add_node(Some(space), SceneNode::group("planets", Transform::IDENTITY));

        let mut handles = SceneHandles {
            space,
            sun,
            planets_group,
            lights: vec![key_light, ambient],
            ..SceneHandles::default()
        };

        for planet in &system.planets {
            let (planet_id, moon_ids) = Self::add_planet(graph, planets_group, planet);
            handles.planets.push(planet_id);
            handles.moons.push(moon_ids);
        }

        if let Some(belt) = &system.belt {
            if let Some(&host) = handles.planets.get(belt.host) {
                let belt_id = graph.add_node(Some(host), SceneNode::group("asteroid_belt", Transform::IDENTITY));
                for (i, asteroid) in belt.asteroids.iter().enumerate() {
                    graph.add_node(Some(belt_id), SceneNode::body(format!("asteroid_{}", i), asteroid));
                }
                handles.belt = Some(belt_id);
            }
        }

        for extra in &system.extras {
            let id = Self::add_extra(graph, &handles, extra, handles.extras.len());
            handles.extras.push(id);
        }

        debug!("Built scene for '{}' with {} planets", system.name(), handles.planets.len());
        handles
    }

    fn add_planet<G: SceneGraph>(graph: &mut G, parent: NodeId, planet: &Planet) -> (NodeId, Vec<NodeId>) {
        let id = graph.add_node(Some(parent), SceneNode::body(format!("planet_{}", planet.index), &planet.body));

        let moons = planet
            .moons
            .iter()
            .enumerate()
            .map(|(k, moon)| {
                graph.add_node(Some(id), SceneNode::body(format!("planet_{}_moon_{}", planet.index, k), moon))
            })
            .collect();

        if let Some(ring) = &planet.ring {
            graph.add_node(
                Some(id),
                SceneNode {
                    name: format!("planet_{}_ring", planet.index),
                    kind: NodeKind::Ring {
                        inner_radius: ring.inner_radius,
                        outer_radius: ring.outer_radius,
                        color: ring.color,
                    },
                    transform: Transform::oriented(Vec3::ZERO, Quat::from_rotation_x(ring.tilt)),
                },
            );
        }

        for (k, landmass) in planet.landmasses.iter().enumerate() {
            graph.add_node(
                Some(id),
                SceneNode::mesh(
                    format!("planet_{}_land_{}", planet.index, k),
                    Geometry::disc(landmass.radius, landmass.radius * 0.2),
                    Material::phong(landmass.color),
                    Transform::oriented(landmass.position, landmass.orientation),
                ),
            );
        }

        for (k, tree) in planet.trees.iter().enumerate() {
            let group = graph.add_node(
                Some(id),
                SceneNode::group(
                    format!("planet_{}_tree_{}", planet.index, k),
                    Transform::oriented(tree.position, tree.orientation),
                ),
            );
            graph.add_node(
                Some(group),
                SceneNode::mesh(
                    "cone",
                    Geometry::cone(tree.scale, tree.scale * 2.0),
                    Material::phong(palette::GREEN),
                    Transform::at(Vec3::new(0.0, tree.scale, 0.0)),
                ),
            );
        }

        for (k, city) in planet.cities.iter().enumerate() {
            let group = graph.add_node(
                Some(id),
                SceneNode::group(
                    format!("planet_{}_city_{}", planet.index, k),
                    Transform::oriented(city.position, city.orientation),
                ),
            );
            for (b, building) in city.buildings.iter().enumerate() {
                graph.add_node(
                    Some(group),
                    SceneNode::mesh(
                        format!("building_{}", b),
                        Geometry::cuboid(building.width, building.height, building.depth),
                        Material::phong(building.color),
                        Transform::at(building.offset),
                    ),
                );
            }
        }

        (id, moons)
    }

    /// Attach a body spawned after generation directly under the space group
    pub fn add_extra<G: SceneGraph>(graph: &mut G, handles: &SceneHandles, body: &Body, index: usize) -> NodeId {
        graph.add_node(Some(handles.space), SceneNode::body(format!("extra_{}", index), body))
    }

    /// Push animated transforms back into the graph
    pub fn sync<G: SceneGraph>(system: &SolarSystem, handles: &SceneHandles, graph: &mut G) {
        graph.set_transform(handles.sun, Transform::euler(Vec3::ZERO, system.sun.rotation));

        for (planet, (&planet_id, moon_ids)) in system
            .planets
            .iter()
            .zip(handles.planets.iter().zip(handles.moons.iter()))
        {
            graph.set_transform(planet_id, Transform::euler(planet.body.position, planet.body.rotation));
            for (moon, &moon_id) in planet.moons.iter().zip(moon_ids) {
                graph.set_transform(moon_id, Transform::euler(moon.position, moon.rotation));
            }
        }
    }
}
