use crate::archive::RecordFormat;
use crate::data::SystemProperties;
use crate::palette::{self, Color};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub archive: ArchiveSettings,
    #[serde(default)]
    pub scene: SceneSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Fixed seed for the starter system; random when absent
    pub default_seed: Option<u64>,
    /// Properties of the system shown at startup
    pub starter: SystemProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveSettings {
    pub dir: String,
    pub format: RecordFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    pub background: Color,
    pub camera_position: [f32; 3],
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
    /// Write logs to this file instead of stderr
    pub file: Option<String>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            default_seed: None,
            starter: SystemProperties::starter(),
        }
    }
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            dir: "./systems".to_string(),
            format: RecordFormat::Json,
        }
    }
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            background: palette::BACKGROUND,
            camera_position: [0.0, 100.0, 400.0],
            fov_deg: 75.0,
            near: 1.0,
            far: 20000.0,
            min_distance: 90.0,
            max_distance: 1200.0,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl GeneratorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: GeneratorConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is missing or broken
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }

        Self::load(path).unwrap_or_else(|e| {
            eprintln!("Failed to load config {}: {}, using defaults", path.display(), e);
            Self::default()
        })
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.scene.min_distance, 90.0);
        assert_eq!(config.scene.max_distance, 1200.0);
        assert_eq!(config.generator.starter.planet_count, 9);
        assert_eq!(config.archive.format, RecordFormat::Json);
        assert_eq!(config.scene.background, palette::BACKGROUND);
    }

    #[test]
    fn test_config_serialization() {
        let config = GeneratorConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("planet_count"));
        assert!(toml_str.contains("min_distance"));

        let back: GeneratorConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.generator.starter, config.generator.starter);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: GeneratorConfig = toml::from_str(
            r#"
[logging]
level = "debug"
json = true
"#,
        )
        .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert_eq!(config.archive.dir, "./systems");
    }

    #[test]
    fn test_partial_sections_merge_over_defaults() {
        let config: GeneratorConfig = toml::from_str(
            r#"
[generator]
default_seed = 7

[generator.starter]
planet_count = 4

[archive]
dir = "/tmp/systems"

[scene]
background = 0x101010

[logging]
level = "debug"
"#,
        )
        .unwrap();

        assert_eq!(config.generator.default_seed, Some(7));
        assert_eq!(config.generator.starter.planet_count, 4);
        assert_eq!(config.generator.starter.sun_size, 140.0);
        assert_eq!(config.archive.dir, "/tmp/systems");
        assert_eq!(config.archive.format, RecordFormat::Json);
        assert_eq!(config.scene.background, Color::hex(0x101010));
        assert_eq!(config.scene.fov_deg, 75.0);
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_seed_only_file_keeps_other_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solarsmith.toml");
        std::fs::write(&path, "[generator]\ndefault_seed = 7\n\n[logging]\nlevel = \"debug\"\n").unwrap();

        let config = GeneratorConfig::load_or_default(&path);
        assert_eq!(config.generator.default_seed, Some(7));
        assert_eq!(config.generator.starter, SystemProperties::starter());
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solarsmith.toml");

        let mut config = GeneratorConfig::default();
        config.generator.default_seed = Some(77);
        config.save(&path).unwrap();

        let loaded = GeneratorConfig::load(&path).unwrap();
        assert_eq!(loaded.generator.default_seed, Some(77));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = GeneratorConfig::load_or_default("/definitely/not/here.toml");
        assert_eq!(config.logging.level, "info");
    }
}
