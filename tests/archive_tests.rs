use solarsmith::archive::{self, DirectoryStore, RecordFormat, SystemRecord, SystemStore};
use solarsmith::data::SystemProperties;
use solarsmith::error::ArchiveError;
use solarsmith::generator::generate_system;
use solarsmith::preferences::{FavoriteAnimal, Personality, Preferences};

fn record_with_seed(seed: u64) -> SystemRecord {
    let prefs = Preferences::new("Archive", Personality::HopefulAndGettingFeetWet, FavoriteAnimal::Narwhal);
    let system = generate_system(&prefs.to_properties(), seed).unwrap();
    SystemRecord::new(system, Some(prefs))
}

#[tokio::test]
async fn test_directory_store_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirectoryStore::new(dir.path().join("systems"), RecordFormat::Json);

    assert!(store.list().await.unwrap().is_empty());

    let first = record_with_seed(1);
    let second = record_with_seed(2);
    store.put(&first).await.unwrap();
    store.put(&second).await.unwrap();

    assert!(dir.path().join("systems").join(format!("{}.json", first.id)).exists());
    assert_eq!(store.get(first.id).await.unwrap(), first);

    let listed = store.list().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|s| s.name == "Archive"));

    store.remove(first.id).await.unwrap();
    assert!(matches!(store.get(first.id).await, Err(ArchiveError::NotFound(_))));
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_store_reads_records_written_in_other_formats() {
    let dir = tempfile::tempdir().unwrap();
    let record = record_with_seed(3);

    DirectoryStore::new(dir.path(), RecordFormat::MsgPack).put(&record).await.unwrap();

    let json_store = DirectoryStore::new(dir.path(), RecordFormat::Json);
    assert_eq!(json_store.get(record.id).await.unwrap(), record);

    // Saving again converts the file to the store's own format
    json_store.put(&record).await.unwrap();
    assert!(dir.path().join(format!("{}.json", record.id)).exists());
    assert!(!dir.path().join(format!("{}.msgpack", record.id)).exists());
    assert_eq!(json_store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_skips_broken_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirectoryStore::new(dir.path(), RecordFormat::Yaml);
    store.put(&record_with_seed(4)).await.unwrap();

    std::fs::write(dir.path().join("garbage.json"), "{ not json").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_export_and_import_files() {
    let dir = tempfile::tempdir().unwrap();
    let record = record_with_seed(5);

    for name in ["system.json", "nested/system.yml", "system.msgpack"] {
        let path = dir.path().join(name);
        archive::export_to_file(&record, &path).await.unwrap();
        assert_eq!(archive::import_from_file(&path).await.unwrap(), record);
    }
}

#[tokio::test]
async fn test_import_sniffs_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let record = SystemRecord::new(generate_system(&SystemProperties::custom(), 6).unwrap(), None);

    let path = dir.path().join("system.save");
    std::fs::write(&path, RecordFormat::Yaml.encode(&record).unwrap()).unwrap();
    assert_eq!(archive::import_from_file(&path).await.unwrap(), record);

    assert!(matches!(
        archive::export_to_file(&record, &path).await,
        Err(ArchiveError::UnknownFormat(_))
    ));
}
