use thiserror::Error;
use uuid::Uuid;

/// Rejected generation parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertiesError {
    #[error("{what} bounds are inverted: min {min} > max {max}")]
    InvertedBounds { what: &'static str, min: f32, max: f32 },
    #[error("{what} must be positive, got {value}")]
    NonPositive { what: &'static str, value: f32 },
    #[error("ring chance must be within 0..=1, got {0}")]
    RingChance(f32),
    #[error("asteroid belt host {host} does not exist ({planet_count} planets)")]
    BeltHost { host: usize, planet_count: usize },
}

/// Failures saving or loading system records
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("MessagePack encode error: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),
    #[error("MessagePack decode error: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),
    #[error("Unknown record format: {0}")]
    UnknownFormat(String),
    #[error("Unsupported record version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("Record not found: {0}")]
    NotFound(Uuid),
}

/// Viewer requests that refer to things that are not there
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionError {
    #[error("No planet at index {index} ({count} planets)")]
    NoSuchPlanet { index: usize, count: usize },
    #[error("No system has been generated yet")]
    NoSystem,
}
