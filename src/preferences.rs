/// Form answers and the parameter table that turns them into a system
use crate::data::{SunKind, SystemProperties, DEFAULT_SYSTEM_NAME};
use crate::palette;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// "How do you feel right now?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Personality {
    YoungAndExuberant = 1,
    FeistyAndEnergetic = 2,
    HopefulAndGettingFeetWet = 3,
    WiseAndWellTravelled = 4,
    DistrustfulOfComputers = 5,
}

impl Personality {
    pub const ALL: [Personality; 5] = [
        Personality::YoungAndExuberant,
        Personality::FeistyAndEnergetic,
        Personality::HopefulAndGettingFeetWet,
        Personality::WiseAndWellTravelled,
        Personality::DistrustfulOfComputers,
    ];

    pub fn from_menu_value(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|p| *p as u8 == value)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Personality::YoungAndExuberant => "Young and exuberant",
            Personality::FeistyAndEnergetic => "Feisty and energetic",
            Personality::HopefulAndGettingFeetWet => "Hopeful and finally getting my feet wet.",
            Personality::WiseAndWellTravelled => "Wise and well-travelled.",
            Personality::DistrustfulOfComputers => "I don't trust you, giant computer.",
        }
    }

    fn apply(&self, props: &mut SystemProperties) {
        let (kind, planets, moons, rings, asteroids) = match self {
            Personality::YoungAndExuberant => (SunKind::YellowDwarf, 5, 3, 0.35, 200),
            Personality::FeistyAndEnergetic => (SunKind::RedGiant, 4, 1, 0.2, 450),
            Personality::HopefulAndGettingFeetWet => (SunKind::WhiteDwarf, 2, 1, 0.1, 120),
            Personality::WiseAndWellTravelled => (SunKind::BlueGiant, 7, 2, 0.5, 300),
            Personality::DistrustfulOfComputers => (SunKind::Pulsar, 3, 0, 0.0, 600),
        };

        props.sun_kind = kind;
        props.sun_color = kind.color();
        props.sun_size *= kind.size_factor();
        props.planet_count = planets;
        props.moon_count = moons;
        props.ring_chance = rings;
        props.asteroid_count = asteroids;

        match self {
            Personality::FeistyAndEnergetic => {
                props.asteroid_max_radius = 4.0;
            }
            Personality::DistrustfulOfComputers => {
                props.asteroid_min_radius = 2.0;
                props.asteroid_max_radius = 5.0;
            }
            _ => {}
        }
    }
}

/// "What is your favorite animal?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum FavoriteAnimal {
    Dog = 1,
    Tiger = 2,
    Panda = 3,
    Owl = 4,
    Giraffe = 5,
    Narwhal = 6,
}

impl FavoriteAnimal {
    pub const ALL: [FavoriteAnimal; 6] = [
        FavoriteAnimal::Dog,
        FavoriteAnimal::Tiger,
        FavoriteAnimal::Panda,
        FavoriteAnimal::Owl,
        FavoriteAnimal::Giraffe,
        FavoriteAnimal::Narwhal,
    ];

    pub fn from_menu_value(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|a| *a as u8 == value)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FavoriteAnimal::Dog => "Dog",
            FavoriteAnimal::Tiger => "Tiger",
            FavoriteAnimal::Panda => "Panda",
            FavoriteAnimal::Owl => "Owl",
            FavoriteAnimal::Giraffe => "Giraffe",
            FavoriteAnimal::Narwhal => "Narwhal",
        }
    }

    fn apply(&self, props: &mut SystemProperties) {
        match self {
            FavoriteAnimal::Dog => {
                props.landmass_count = 4;
                props.cities_per_planet = 3;
            }
            FavoriteAnimal::Tiger => {
                props.sun_color = palette::ORANGE;
                props.planet_min_radius = 25.0;
                props.planet_max_radius = 55.0;
                props.trees_per_planet = 4;
            }
            FavoriteAnimal::Panda => {
                props.landmass_count = 3;
                props.trees_per_planet = 8;
                props.cities_per_planet = 0;
            }
            FavoriteAnimal::Owl => {
                props.moon_count += 2;
                props.ring_chance = (props.ring_chance + 0.2).min(1.0);
            }
            FavoriteAnimal::Giraffe => {
                props.planet_min_radius = 35.0;
                props.planet_max_radius = 60.0;
                props.trees_per_planet = 5;
            }
            FavoriteAnimal::Narwhal => {
                props.landmass_count = 1;
                props.trees_per_planet = 1;
                props.cities_per_planet = 0;
                props.ring_chance = (props.ring_chance + 0.1).min(1.0);
            }
        }
    }
}

/// Everything the "Create Your Own System" form collects
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Preferences {
    pub name: String,
    pub personality: Personality,
    pub animal: FavoriteAnimal,
}

impl Preferences {
    pub fn new(name: impl Into<String>, personality: Personality, animal: FavoriteAnimal) -> Self {
        Self {
            name: name.into(),
            personality,
            animal,
        }
    }

    /// System name, falling back to the default when the field was left blank
    pub fn system_name(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            DEFAULT_SYSTEM_NAME
        } else {
            trimmed
        }
    }

    /// Look up generation parameters for these answers
    pub fn to_properties(&self) -> SystemProperties {
        let mut props = SystemProperties::custom();
        props.name = self.system_name().to_string();
        self.personality.apply(&mut props);
        self.animal.apply(&mut props);
        props
    }

    /// Stable seed derived from the answers (FNV-1a)
    pub fn seed(&self) -> u64 {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;

        self.system_name()
            .bytes()
            .chain([0, self.personality as u8, self.animal as u8])
            .fold(OFFSET, |hash, byte| (hash ^ byte as u64).wrapping_mul(PRIME))
    }
}
