/// Named colors and material slots shared by every generated body
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 24-bit RGB color stored as `0xRRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const fn hex(value: u32) -> Self {
        Self(value & 0x00ff_ffff)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

pub const SUN: Color = Color::hex(0xffd45e);
pub const GREEN: Color = Color::hex(0x8fc999);
pub const BLUE: Color = Color::hex(0x5fc4d0);
pub const ORANGE: Color = Color::hex(0xee5624);
pub const YELLOW: Color = Color::hex(0xfaff70);
pub const SAND: Color = Color::hex(0xd9c38c);
pub const STONE: Color = Color::hex(0xa7a9ac);
pub const ICE: Color = Color::hex(0xdff4f7);

pub const BACKGROUND: Color = Color::hex(0x2a3340);
pub const AMBIENT_LIGHT: Color = Color::hex(0x663344);
pub const SUN_EMISSIVE: Color = Color::hex(0x270000);
pub const WHITE: Color = Color::hex(0xffffff);

/// Surface shading model of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Material {
    /// Flat-shaded phong, used for planets, moons and asteroids
    Phong { color: Color },
    /// Rough emissive standard material, used for stars and spawned bodies
    Standard {
        color: Color,
        emissive: Color,
        roughness: f32,
    },
}

impl Material {
    pub fn phong(color: Color) -> Self {
        Material::Phong { color }
    }

    pub fn star(color: Color) -> Self {
        Material::Standard {
            color,
            emissive: SUN_EMISSIVE,
            roughness: 0.9,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Material::Phong { color } => *color,
            Material::Standard { color, .. } => *color,
        }
    }
}

/// The four material slots bodies are drawn from; blue appears twice
pub const BODY_MATERIALS: [Color; 4] = [GREEN, BLUE, ORANGE, BLUE];

/// Colors a ring may take
pub const RING_COLORS: [Color; 4] = [SAND, STONE, ICE, YELLOW];

/// Colors used for city buildings
pub const BUILDING_COLORS: [Color; 3] = [STONE, WHITE, ORANGE];
