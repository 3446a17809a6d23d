/// Shape templates and the resize rule applied when a template is cloned
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Tetrahedron,
    Dodecahedron,
    Octahedron,
    Box,
    Cylinder,
    Cone,
}

/// A reusable shape template before it is sized
///
/// `detail` is the subdivision level for polyhedra and the segment count
/// for cylinders and cones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub kind: ShapeKind,
    pub detail: u32,
}

impl Shape {
    pub const fn new(kind: ShapeKind, detail: u32) -> Self {
        Self { kind, detail }
    }

    /// Size a clone of this template to the given radius
    ///
    /// Every dimension follows the radius; a cylinder stands twice as tall
    /// as it is wide and tapers to a point.
    pub fn sized(&self, radius: f32) -> Geometry {
        let height = if self.kind == ShapeKind::Cylinder {
            radius * 2.0
        } else {
            radius
        };

        Geometry {
            kind: self.kind,
            detail: self.detail,
            radius,
            radius_top: 0.0,
            radius_bottom: radius,
            height,
            width: radius,
            depth: radius,
        }
    }
}

/// Concrete geometry parameters for one body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub kind: ShapeKind,
    pub detail: u32,
    pub radius: f32,
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub width: f32,
    pub depth: f32,
}

impl Geometry {
    /// A cone standing on its base, as used for trees
    pub fn cone(radius: f32, height: f32) -> Self {
        Self {
            kind: ShapeKind::Cone,
            detail: 8,
            radius,
            radius_top: 0.0,
            radius_bottom: radius,
            height,
            width: radius,
            depth: radius,
        }
    }

    /// An axis-aligned box
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Self {
            kind: ShapeKind::Box,
            detail: 0,
            radius: width.max(height).max(depth) * 0.5,
            radius_top: 0.0,
            radius_bottom: 0.0,
            height,
            width,
            depth,
        }
    }

    /// A flat disc of the given radius, as used for landmasses
    pub fn disc(radius: f32, thickness: f32) -> Self {
        Self {
            kind: ShapeKind::Cylinder,
            detail: 12,
            radius,
            radius_top: radius,
            radius_bottom: radius,
            height: thickness,
            width: radius,
            depth: radius,
        }
    }
}

pub const TETRAHEDRON: Shape = Shape::new(ShapeKind::Tetrahedron, 2);
pub const DODECAHEDRON: Shape = Shape::new(ShapeKind::Dodecahedron, 0);
pub const OCTAHEDRON_COARSE: Shape = Shape::new(ShapeKind::Octahedron, 0);
pub const OCTAHEDRON: Shape = Shape::new(ShapeKind::Octahedron, 2);

/// Stars are always detailed octahedra
pub const STAR: Shape = OCTAHEDRON;

/// Weighted planet table; tetrahedra come up twice as often as octahedra
pub const PLANET_SHAPES: [Shape; 3] = [TETRAHEDRON, OCTAHEDRON, TETRAHEDRON];

pub const ASTEROID_SHAPES: [Shape; 3] = [DODECAHEDRON, OCTAHEDRON_COARSE, OCTAHEDRON];

pub const MOON_SHAPES: [Shape; 3] = [TETRAHEDRON, OCTAHEDRON_COARSE, DODECAHEDRON];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sized_cylinder_is_twice_as_tall() {
        let geometry = Shape::new(ShapeKind::Cylinder, 8).sized(10.0);
        assert_eq!(geometry.height, 20.0);
        assert_eq!(geometry.radius_bottom, 10.0);
        assert_eq!(geometry.radius_top, 0.0);
    }

    #[test]
    fn test_sized_polyhedron_follows_radius() {
        let geometry = TETRAHEDRON.sized(35.0);
        assert_eq!(geometry.kind, ShapeKind::Tetrahedron);
        assert_eq!(geometry.detail, 2);
        assert_eq!(geometry.radius, 35.0);
        assert_eq!(geometry.height, 35.0);
        assert_eq!(geometry.width, 35.0);
        assert_eq!(geometry.depth, 35.0);
    }

    #[test]
    fn test_planet_table_weighting() {
        let tetra = PLANET_SHAPES
            .iter()
            .filter(|s| s.kind == ShapeKind::Tetrahedron)
            .count();
        assert_eq!(tetra, 2);
        assert_eq!(PLANET_SHAPES.len(), 3);
    }
}
