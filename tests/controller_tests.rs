use solarsmith::archive::{MemoryStore, SystemStore};
use solarsmith::config::GeneratorConfig;
use solarsmith::controller::SystemController;
use solarsmith::preferences::{FavoriteAnimal, Personality, Preferences};
use solarsmith::scene::{SceneBuilder, SceneGraph, SceneTree};

#[tokio::test]
async fn test_form_to_saved_system_and_back() {
    let store = MemoryStore::new();
    let prefs = Preferences::new("Ray", Personality::FeistyAndEnergetic, FavoriteAnimal::Tiger);

    let mut controller = SystemController::new(&GeneratorConfig::default());
    controller.regenerate(&prefs).unwrap();
    controller.tick(30).unwrap();
    controller.click_sun().unwrap();
    let record = controller.snapshot().unwrap();
    store.put(&record).await.unwrap();

    let mut restored = SystemController::new(&GeneratorConfig::default());
    restored.restore(store.get(record.id).await.unwrap());

    assert_eq!(restored.system(), controller.system());
    assert_eq!(restored.preferences(), Some(&prefs));
    assert_eq!(restored.properties(), controller.properties());
}

#[test]
fn test_scene_follows_controller_animation() {
    let mut config = GeneratorConfig::default();
    config.generator.default_seed = Some(12);
    let mut controller = SystemController::new(&config);
    controller.init().unwrap();

    let mut tree = SceneTree::new();
    let handles = controller.build_scene(&mut tree).unwrap();
    let before = tree.node(handles.planets[0]).unwrap().transform;

    controller.tick(10).unwrap();
    let system = controller.system().unwrap();
    SceneBuilder::sync(system, &handles, &mut tree);

    let after = tree.node(handles.planets[0]).unwrap().transform;
    assert_ne!(before.position, after.position);
    assert_eq!(after.position, system.planets[0].body.position);
}

#[test]
fn test_focus_then_resume() {
    let mut config = GeneratorConfig::default();
    config.generator.default_seed = Some(4);
    let mut controller = SystemController::new(&config);
    controller.init().unwrap();

    let camera = controller.focus_planet(2).unwrap();
    assert_eq!(controller.viewer().camera().position, camera);
    assert_eq!(controller.tick(10), Ok(0));

    controller.resume();
    assert_eq!(controller.tick(10), Ok(10));
    assert!(controller.focus_planet(42).is_err());
}
