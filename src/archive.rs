//! Saving and reloading generated systems
//!
//! A [`SystemRecord`] wraps a system with an id, a format version and the
//! answers that produced it. Records are written as JSON, YAML or
//! MessagePack. [`SystemStore`] is the seam to the record sync service;
//! [`DirectoryStore`] and [`MemoryStore`] are the local implementations.

use crate::data::{SolarSystem, SystemId};
use crate::error::ArchiveError;
use crate::preferences::Preferences;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Current record layout version
pub const RECORD_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemRecord {
    pub id: SystemId,
    pub version: u32,
    pub saved_at: u64, // Unix timestamp
    #[serde(default)]
    pub preferences: Option<Preferences>,
    pub system: SolarSystem,
}

impl SystemRecord {
    pub fn new(system: SolarSystem, preferences: Option<Preferences>) -> Self {
        let saved_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            id: system.id,
            version: RECORD_VERSION,
            saved_at,
            preferences,
            system,
        }
    }

    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            id: self.id,
            name: self.system.name().to_string(),
            planet_count: self.system.planets.len(),
            seed: self.system.seed,
            saved_at: self.saved_at,
        }
    }
}

/// Listing entry for a stored record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: SystemId,
    pub name: String,
    pub planet_count: usize,
    pub seed: u64,
    pub saved_at: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordFormat {
    Json,
    Yaml,
    #[serde(rename = "msgpack")]
    MsgPack,
}

impl RecordFormat {
    pub const ALL: [RecordFormat; 3] = [RecordFormat::Json, RecordFormat::Yaml, RecordFormat::MsgPack];

    pub fn extension(&self) -> &'static str {
        match self {
            RecordFormat::Json => "json",
            RecordFormat::Yaml => "yaml",
            RecordFormat::MsgPack => "msgpack",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(RecordFormat::Json),
            "yaml" | "yml" => Some(RecordFormat::Yaml),
            "msgpack" | "mpk" => Some(RecordFormat::MsgPack),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ArchiveError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(ext).ok_or_else(|| ArchiveError::UnknownFormat(path.display().to_string()))
    }

    pub fn encode(&self, record: &SystemRecord) -> Result<Vec<u8>, ArchiveError> {
        let bytes = match self {
            RecordFormat::Json => serde_json::to_vec_pretty(record)?,
            RecordFormat::Yaml => serde_yaml::to_string(record)?.into_bytes(),
            RecordFormat::MsgPack => rmp_serde::to_vec_named(record)?,
        };
        Ok(bytes)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<SystemRecord, ArchiveError> {
        let record: SystemRecord = match self {
            RecordFormat::Json => serde_json::from_slice(bytes)?,
            RecordFormat::Yaml => serde_yaml::from_slice(bytes)?,
            RecordFormat::MsgPack => rmp_serde::from_slice(bytes)?,
        };
        check_version(record)
    }
}

impl std::str::FromStr for RecordFormat {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| ArchiveError::UnknownFormat(s.to_string()))
    }
}

fn check_version(record: SystemRecord) -> Result<SystemRecord, ArchiveError> {
    if record.version != RECORD_VERSION {
        return Err(ArchiveError::UnsupportedVersion {
            found: record.version,
            expected: RECORD_VERSION,
        });
    }
    Ok(record)
}

/// Guess the format from content: `{` is JSON, other text is YAML, anything
/// else is MessagePack
pub fn sniff_format(bytes: &[u8]) -> RecordFormat {
    match std::str::from_utf8(bytes) {
        Ok(text) if text.trim_start().starts_with('{') => RecordFormat::Json,
        Ok(_) => RecordFormat::Yaml,
        Err(_) => RecordFormat::MsgPack,
    }
}

/// Decode a record of unknown format
pub fn decode_any(bytes: &[u8]) -> Result<SystemRecord, ArchiveError> {
    sniff_format(bytes).decode(bytes)
}

/// Write one record to a file, format chosen by extension
pub async fn export_to_file(record: &SystemRecord, path: &Path) -> Result<(), ArchiveError> {
    let format = RecordFormat::from_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, format.encode(record)?).await?;
    info!("Exported '{}' to {}", record.system.name(), path.display());
    Ok(())
}

/// Read one record from a file; unknown extensions fall back to sniffing
pub async fn import_from_file(path: &Path) -> Result<SystemRecord, ArchiveError> {
    let bytes = fs::read(path).await?;
    let record = match RecordFormat::from_path(path) {
        Ok(format) => format.decode(&bytes)?,
        Err(_) => decode_any(&bytes)?,
    };
    info!("Imported '{}' from {}", record.system.name(), path.display());
    Ok(record)
}

/// Where saved systems live
#[allow(async_fn_in_trait)]
pub trait SystemStore {
    /// Insert or replace a record
    async fn put(&self, record: &SystemRecord) -> Result<(), ArchiveError>;
    async fn get(&self, id: SystemId) -> Result<SystemRecord, ArchiveError>;
    /// Summaries sorted by save time, oldest first
    async fn list(&self) -> Result<Vec<RecordSummary>, ArchiveError>;
    async fn remove(&self, id: SystemId) -> Result<(), ArchiveError>;
}

/// One file per record, named `<id>.<ext>`
pub struct DirectoryStore {
    dir: PathBuf,
    format: RecordFormat,
}

impl DirectoryStore {
    pub fn new(dir: impl Into<PathBuf>, format: RecordFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: SystemId, format: RecordFormat) -> PathBuf {
        self.dir.join(format!("{}.{}", id, format.extension()))
    }

    /// Find an existing file for this id, preferring the store's own format
    async fn locate(&self, id: SystemId) -> Option<(PathBuf, RecordFormat)> {
        let preferred = std::iter::once(self.format).chain(RecordFormat::ALL.into_iter().filter(|f| *f != self.format));
        for format in preferred {
            let path = self.path_for(id, format);
            if fs::try_exists(&path).await.unwrap_or(false) {
                return Some((path, format));
            }
        }
        None
    }
}

impl SystemStore for DirectoryStore {
    async fn put(&self, record: &SystemRecord) -> Result<(), ArchiveError> {
        fs::create_dir_all(&self.dir).await?;

        // Drop copies in other formats so a record has exactly one file
        for format in RecordFormat::ALL.into_iter().filter(|f| *f != self.format) {
            let stale = self.path_for(record.id, format);
            if fs::try_exists(&stale).await.unwrap_or(false) {
                fs::remove_file(&stale).await?;
            }
        }

        let path = self.path_for(record.id, self.format);
        fs::write(&path, self.format.encode(record)?).await?;
        info!("Saved system '{}' to {:?}", record.system.name(), path);
        Ok(())
    }

    async fn get(&self, id: SystemId) -> Result<SystemRecord, ArchiveError> {
        let (path, format) = self.locate(id).await.ok_or(ArchiveError::NotFound(id))?;
        let bytes = fs::read(&path).await?;
        format.decode(&bytes)
    }

    async fn list(&self) -> Result<Vec<RecordSummary>, ArchiveError> {
        if !fs::try_exists(&self.dir).await.unwrap_or(false) {
            debug!("Archive directory {:?} does not exist yet", self.dir);
            return Ok(Vec::new());
        }

        let mut summaries = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let format = match RecordFormat::from_path(&path) {
                Ok(format) => format,
                Err(_) => continue,
            };

            match fs::read(&path).await.map_err(ArchiveError::from).and_then(|b| format.decode(&b)) {
                Ok(record) => summaries.push(record.summary()),
                Err(e) => warn!("Skipping unreadable record {:?}: {}", path, e),
            }
        }

        summaries.sort_by_key(|s| (s.saved_at, s.id));
        Ok(summaries)
    }

    async fn remove(&self, id: SystemId) -> Result<(), ArchiveError> {
        let (path, _) = self.locate(id).await.ok_or(ArchiveError::NotFound(id))?;
        fs::remove_file(&path).await?;
        info!("Removed record {}", id);
        Ok(())
    }
}

/// Records kept in memory, shared between clones
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<SystemId, SystemRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

impl SystemStore for MemoryStore {
    async fn put(&self, record: &SystemRecord) -> Result<(), ArchiveError> {
        self.records.write().await.insert(record.id, record.clone());
        Ok(())
    }

    async fn get(&self, id: SystemId) -> Result<SystemRecord, ArchiveError> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ArchiveError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<RecordSummary>, ArchiveError> {
        let mut summaries: Vec<RecordSummary> = self.records.read().await.values().map(SystemRecord::summary).collect();
        summaries.sort_by_key(|s| (s.saved_at, s.id));
        Ok(summaries)
    }

    async fn remove(&self, id: SystemId) -> Result<(), ArchiveError> {
        self.records
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(ArchiveError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SystemProperties;
    use crate::generator::generate_system;
    use crate::preferences::{FavoriteAnimal, Personality};

    fn sample_record() -> SystemRecord {
        let prefs = Preferences::new("Ray", Personality::WiseAndWellTravelled, FavoriteAnimal::Dog);
        let system = generate_system(&prefs.to_properties(), prefs.seed()).unwrap();
        SystemRecord::new(system, Some(prefs))
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(RecordFormat::from_path(Path::new("a/b.json")).unwrap(), RecordFormat::Json);
        assert_eq!(RecordFormat::from_path(Path::new("b.YML")).unwrap(), RecordFormat::Yaml);
        assert_eq!(RecordFormat::from_path(Path::new("b.msgpack")).unwrap(), RecordFormat::MsgPack);
        assert!(RecordFormat::from_path(Path::new("b.txt")).is_err());
        assert_eq!("yaml".parse::<RecordFormat>().unwrap(), RecordFormat::Yaml);
    }

    #[test]
    fn test_each_format_reloads_the_same_system() {
        let record = sample_record();
        for format in RecordFormat::ALL {
            let bytes = format.encode(&record).unwrap();
            assert_eq!(sniff_format(&bytes), format);
            let back = format.decode(&bytes).unwrap();
            assert_eq!(back, record, "{:?} did not reload faithfully", format);
        }
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let mut record = sample_record();
        record.version = 99;
        let bytes = RecordFormat::Json.encode(&record).unwrap();

        match RecordFormat::Json.decode(&bytes) {
            Err(ArchiveError::UnsupportedVersion { found: 99, expected: 1 }) => {}
            other => panic!("expected version error, got {:?}", other),
        }
    }

    #[test]
    fn test_extras_default_when_missing() {
        let record = SystemRecord::new(generate_system(&SystemProperties::custom(), 3).unwrap(), None);
        let mut value = serde_json::to_value(&record).unwrap();
        value["system"].as_object_mut().unwrap().remove("extras");

        let back: SystemRecord = serde_json::from_value(value).unwrap();
        assert!(back.system.extras.is_empty());
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();
        let record = sample_record();

        store.put(&record).await.unwrap();
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(record.id).await.unwrap(), record);
        assert_eq!(store.list().await.unwrap()[0].name, "Ray");

        store.remove(record.id).await.unwrap();
        assert!(matches!(store.get(record.id).await, Err(ArchiveError::NotFound(_))));
        assert!(store.remove(record.id).await.is_err());
    }
}
