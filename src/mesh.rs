use crate::shapes::{Geometry, ShapeKind};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Triangle soup for one body; every face owns its three vertices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<[u32; 3]>,
}

/// A point on a mesh surface with the outward normal there
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceAnchor {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Mesh {
    fn empty() -> Self {
        Self {
            vertices: vec![],
            faces: vec![],
        }
    }

    fn push_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&[a, b, c]);
        self.faces.push([base, base + 1, base + 2]);
    }

    /// Build the triangle mesh for sized geometry
    pub fn from_geometry(geometry: &Geometry) -> Self {
        match geometry.kind {
            ShapeKind::Tetrahedron => {
                polyhedron(&TETRA_VERTICES, &TETRA_FACES, geometry.radius, geometry.detail)
            }
            ShapeKind::Octahedron => {
                polyhedron(&OCTA_VERTICES, &OCTA_FACES, geometry.radius, geometry.detail)
            }
            ShapeKind::Dodecahedron => dodecahedron(geometry.radius, geometry.detail),
            ShapeKind::Box => cuboid(geometry.width, geometry.height, geometry.depth),
            ShapeKind::Cylinder | ShapeKind::Cone => cylinder(
                geometry.radius_top,
                geometry.radius_bottom,
                geometry.height,
                geometry.detail.max(3),
            ),
        }
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Outward unit normal of a face
    ///
    /// Winding is not trusted; the normal is flipped to point away from the
    /// mesh origin.
    pub fn face_normal(&self, face: usize) -> Option<Vec3> {
        let [a, b, c] = self.face_points(face)?;
        let centroid = (a + b + c) / 3.0;
        let normal = (b - a).cross(c - a).normalize_or_zero();

        if normal == Vec3::ZERO {
            let fallback = centroid.normalize_or_zero();
            return Some(if fallback == Vec3::ZERO { Vec3::Y } else { fallback });
        }

        if normal.dot(centroid) < 0.0 {
            Some(-normal)
        } else {
            Some(normal)
        }
    }

    /// First vertex of a face together with the face's outward normal
    pub fn face_anchor(&self, face: usize) -> Option<SurfaceAnchor> {
        let [a, _, _] = self.face_points(face)?;
        let normal = self.face_normal(face)?;
        Some(SurfaceAnchor { point: a, normal })
    }

    fn face_points(&self, face: usize) -> Option<[Vec3; 3]> {
        let [a, b, c] = *self.faces.get(face)?;
        Some([
            *self.vertices.get(a as usize)?,
            *self.vertices.get(b as usize)?,
            *self.vertices.get(c as usize)?,
        ])
    }
}

const TETRA_VERTICES: [[f32; 3]; 4] = [
    [1.0, 1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, 1.0, -1.0],
    [1.0, -1.0, -1.0],
];
const TETRA_FACES: [[usize; 3]; 4] = [[2, 1, 0], [0, 3, 2], [1, 3, 2], [0, 1, 3]];

const OCTA_VERTICES: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
];
const OCTA_FACES: [[usize; 3]; 8] = [
    [0, 2, 4],
    [0, 4, 3],
    [0, 3, 5],
    [0, 5, 2],
    [1, 2, 5],
    [1, 5, 3],
    [1, 3, 4],
    [1, 4, 2],
];

const DODECA_FACES: [[usize; 3]; 36] = [
    [3, 11, 7], [3, 7, 15], [3, 15, 13],
    [7, 19, 17], [7, 17, 6], [7, 6, 15],
    [17, 4, 8], [17, 8, 10], [17, 10, 6],
    [8, 0, 16], [8, 16, 2], [8, 2, 10],
    [0, 12, 1], [0, 1, 18], [0, 18, 16],
    [6, 10, 2], [6, 2, 13], [6, 13, 15],
    [2, 16, 18], [2, 18, 3], [2, 3, 13],
    [18, 1, 9], [18, 9, 11], [18, 11, 3],
    [4, 14, 12], [4, 12, 0], [4, 0, 8],
    [11, 9, 5], [11, 5, 19], [11, 19, 7],
    [19, 5, 14], [19, 14, 4], [19, 4, 17],
    [1, 12, 14], [1, 14, 5], [1, 5, 9],
];

fn dodecahedron(radius: f32, detail: u32) -> Mesh {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let r = 1.0 / t;
    let vertices: [[f32; 3]; 20] = [
        [-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0],
        [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0],
        [0.0, -r, -t], [0.0, -r, t], [0.0, r, -t], [0.0, r, t],
        [-r, -t, 0.0], [-r, t, 0.0], [r, -t, 0.0], [r, t, 0.0],
        [-t, 0.0, -r], [t, 0.0, -r], [-t, 0.0, r], [t, 0.0, r],
    ];
    polyhedron(&vertices, &DODECA_FACES, radius, detail)
}

/// Subdivide each base triangle `detail` times and push every vertex onto
/// the sphere of the given radius
fn polyhedron(base: &[[f32; 3]], faces: &[[usize; 3]], radius: f32, detail: u32) -> Mesh {
    let mut mesh = Mesh::empty();
    let cols = detail as usize + 1;

    for face in faces {
        let a = Vec3::from_array(base[face[0]]);
        let b = Vec3::from_array(base[face[1]]);
        let c = Vec3::from_array(base[face[2]]);

        // rows[i][j]: i walks from the a-b edge toward c
        let mut rows: Vec<Vec<Vec3>> = Vec::with_capacity(cols + 1);
        for i in 0..=cols {
            let t = i as f32 / cols as f32;
            let aj = a.lerp(c, t);
            let bj = b.lerp(c, t);
            let span = cols - i;
            let row = (0..=span)
                .map(|j| {
                    if span == 0 {
                        aj
                    } else {
                        aj.lerp(bj, j as f32 / span as f32)
                    }
                })
                .collect();
            rows.push(row);
        }

        for i in 0..cols {
            for j in 0..(2 * (cols - i) - 1) {
                let k = j / 2;
                let (p, q, r) = if j % 2 == 0 {
                    (rows[i][k + 1], rows[i + 1][k], rows[i][k])
                } else {
                    (rows[i][k + 1], rows[i + 1][k + 1], rows[i + 1][k])
                };
                mesh.push_triangle(
                    p.normalize() * radius,
                    q.normalize() * radius,
                    r.normalize() * radius,
                );
            }
        }
    }

    mesh
}

fn cuboid(width: f32, height: f32, depth: f32) -> Mesh {
    let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);
    let corner = |i: usize| {
        Vec3::new(
            if i & 1 == 0 { -hx } else { hx },
            if i & 2 == 0 { -hy } else { hy },
            if i & 4 == 0 { -hz } else { hz },
        )
    };

    // Each side as a quad of corner indices
    const SIDES: [[usize; 4]; 6] = [
        [1, 3, 7, 5],
        [0, 4, 6, 2],
        [2, 6, 7, 3],
        [0, 1, 5, 4],
        [4, 5, 7, 6],
        [0, 2, 3, 1],
    ];

    let mut mesh = Mesh::empty();
    for [a, b, c, d] in SIDES {
        mesh.push_triangle(corner(a), corner(b), corner(c));
        mesh.push_triangle(corner(a), corner(c), corner(d));
    }
    mesh
}

fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Mesh {
    let half = height * 0.5;
    let ring = |radius: f32, y: f32, i: u32| {
        let theta = i as f32 / segments as f32 * TAU;
        Vec3::new(theta.sin() * radius, y, theta.cos() * radius)
    };

    let mut mesh = Mesh::empty();
    let top_center = Vec3::new(0.0, half, 0.0);
    let bottom_center = Vec3::new(0.0, -half, 0.0);

    for i in 0..segments {
        let b0 = ring(radius_bottom, -half, i);
        let b1 = ring(radius_bottom, -half, i + 1);
        let t0 = ring(radius_top, half, i);
        let t1 = ring(radius_top, half, i + 1);

        if radius_top > 0.0 {
            mesh.push_triangle(b0, b1, t1);
            mesh.push_triangle(b0, t1, t0);
            mesh.push_triangle(top_center, t0, t1);
        } else {
            mesh.push_triangle(b0, b1, top_center);
        }

        if radius_bottom > 0.0 {
            mesh.push_triangle(bottom_center, b1, b0);
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Shape, DODECAHEDRON, OCTAHEDRON, OCTAHEDRON_COARSE, TETRAHEDRON};

    #[test]
    fn test_polyhedron_face_counts() {
        assert_eq!(Mesh::from_geometry(&Shape::new(ShapeKind::Tetrahedron, 0).sized(1.0)).face_count(), 4);
        assert_eq!(Mesh::from_geometry(&TETRAHEDRON.sized(1.0)).face_count(), 36);
        assert_eq!(Mesh::from_geometry(&OCTAHEDRON_COARSE.sized(1.0)).face_count(), 8);
        assert_eq!(Mesh::from_geometry(&OCTAHEDRON.sized(1.0)).face_count(), 72);
        assert_eq!(Mesh::from_geometry(&DODECAHEDRON.sized(1.0)).face_count(), 36);
    }

    #[test]
    fn test_polyhedron_vertices_on_sphere() {
        let mesh = Mesh::from_geometry(&TETRAHEDRON.sized(25.0));
        for vertex in &mesh.vertices {
            assert!((vertex.length() - 25.0).abs() < 1e-3, "vertex off sphere: {:?}", vertex);
        }
    }

    #[test]
    fn test_face_normals_point_outward() {
        for geometry in [
            TETRAHEDRON.sized(10.0),
            OCTAHEDRON.sized(10.0),
            DODECAHEDRON.sized(10.0),
            Geometry::cuboid(2.0, 3.0, 4.0),
            Geometry::cone(5.0, 10.0),
        ] {
            let mesh = Mesh::from_geometry(&geometry);
            for face in 0..mesh.face_count() {
                let normal = mesh.face_normal(face).unwrap();
                let [a, b, c] = mesh.face_points(face).unwrap();
                let centroid = (a + b + c) / 3.0;
                assert!((normal.length() - 1.0).abs() < 1e-4);
                assert!(normal.dot(centroid) >= 0.0, "{:?} face {} points inward", geometry.kind, face);
            }
        }
    }

    #[test]
    fn test_cone_and_box_counts() {
        assert_eq!(Mesh::from_geometry(&Geometry::cuboid(1.0, 1.0, 1.0)).face_count(), 12);
        // side + bottom cap per segment
        assert_eq!(Mesh::from_geometry(&Geometry::cone(5.0, 10.0)).face_count(), 16);
        // side quad + both caps per segment
        assert_eq!(Mesh::from_geometry(&Geometry::disc(5.0, 1.0)).face_count(), 48);
    }

    #[test]
    fn test_face_anchor_uses_first_vertex() {
        let mesh = Mesh::from_geometry(&OCTAHEDRON_COARSE.sized(10.0));
        let anchor = mesh.face_anchor(0).unwrap();
        assert_eq!(anchor.point, mesh.vertices[mesh.faces[0][0] as usize]);
        assert!(mesh.face_anchor(999).is_none());
    }
}
