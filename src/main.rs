use clap::{Parser, Subcommand};
use solarsmith::{
    archive::{self, DirectoryStore, SystemRecord, SystemStore},
    config::{GeneratorConfig, LoggingSettings},
    controller::SystemController,
    preferences::{FavoriteAnimal, Personality, Preferences},
    scene::{CameraRig, SceneTree},
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(author, version, about = "Procedural solar system generator", long_about = None)]
struct Args {
    /// Path to solarsmith.toml configuration file
    #[arg(short, long, default_value = "./solarsmith.toml", global = true)]
    config: String,

    /// Override log level (trace|debug|info|warn|error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a system and save it
    Generate {
        /// System name; giving any answer switches from the starter system to the form
        #[arg(short, long)]
        name: Option<String>,

        /// Personality menu value (1-5)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
        personality: Option<u8>,

        /// Favorite animal menu value (1-6)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=6))]
        animal: Option<u8>,

        /// Override the seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Write to this file (.json, .yaml or .msgpack) instead of the archive
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a saved system (file path or archive id)
    Show { target: String },

    /// List systems in the archive
    List,

    /// Delete a system from the archive
    Remove { id: Uuid },

    /// Run the orbit animation on a saved system
    Simulate {
        target: String,

        #[arg(short, long, default_value = "600")]
        ticks: u64,

        /// Write the advanced system back where it came from
        #[arg(long)]
        save: bool,
    },

    /// Dump the scene graph of a saved system as JSON
    Scene {
        target: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the current configuration (defaults if none) to the config path
    InitConfig {
        #[arg(long)]
        force: bool,
    },
}

/// Install the global subscriber. Keep the returned guard alive so file
/// output gets flushed.
fn init_logging(level: &str, settings: &LoggingSettings) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let (writer, guard) = match &settings.file {
        Some(file) => {
            let path = Path::new(file);
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let name = path.file_name().map(|n| n.to_os_string()).unwrap_or_else(|| "solarsmith.log".into());
            let (non_blocking, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer);
    if settings.json {
        builder.json().init();
    } else {
        builder.init();
    }
    guard
}

/// What `scene` writes out for an external viewer
#[derive(Serialize)]
struct SceneDump<'a> {
    camera: &'a CameraRig,
    scene: &'a SceneTree,
}

/// A target is either a file on disk or the id of an archived record
async fn load_target(store: &DirectoryStore, target: &str) -> Result<(SystemRecord, Option<PathBuf>), Box<dyn std::error::Error>> {
    let path = PathBuf::from(target);
    if path.is_file() {
        let record = archive::import_from_file(&path).await?;
        return Ok((record, Some(path)));
    }

    let id: Uuid = target
        .parse()
        .map_err(|_| format!("'{}' is neither a file nor a system id", target))?;
    Ok((store.get(id).await?, None))
}

fn print_record(record: &SystemRecord) {
    let system = &record.system;
    println!("{} ({})", system.name(), record.id);
    println!("  seed:       {}", system.seed);
    println!("  sun:        {:?} size {:.1} {}", system.sun.kind, system.sun.geometry.radius, system.sun.material.color());
    if let Some(prefs) = &record.preferences {
        println!("  answers:    {} / {}", prefs.personality.label(), prefs.animal.label());
    }
    println!(
        "  contents:   {} planets, {} moons, {} asteroids, {} landmasses, {} trees, {} cities",
        system.planets.len(),
        system.moon_count(),
        system.asteroid_count(),
        system.landmass_count(),
        system.tree_count(),
        system.city_count()
    );
    for planet in &system.planets {
        println!(
            "  planet {:>2}:  r {:>5.1} at {:>6.1} ({:>7.1}, {:>6.1}, {:>7.1}) {} moons{}",
            planet.index,
            planet.body.radius(),
            planet.body.orbit.distance,
            planet.body.position.x,
            planet.body.position.y,
            planet.body.position.z,
            planet.moons.len(),
            if planet.ring.is_some() { ", ringed" } else { "" }
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = GeneratorConfig::load_or_default(&args.config);

    let log_level = args.log_level.clone().unwrap_or_else(|| config.logging.level.clone());
    let _guard = init_logging(&log_level, &config.logging);

    info!("Configuration loaded from: {}", args.config);

    let store = DirectoryStore::new(&config.archive.dir, config.archive.format);

    match args.command {
        Command::Generate {
            name,
            personality,
            animal,
            seed,
            output,
        } => {
            let mut run_config = config.clone();
            if seed.is_some() {
                run_config.generator.default_seed = seed;
            }
            let mut controller = SystemController::new(&run_config);

            if name.is_none() && personality.is_none() && animal.is_none() {
                controller.init()?;
            } else {
                let personality = Personality::from_menu_value(personality.unwrap_or(1))
                    .ok_or("unknown personality")?;
                let animal = FavoriteAnimal::from_menu_value(animal.unwrap_or(1)).ok_or("unknown animal")?;
                let prefs = Preferences::new(name.unwrap_or_default(), personality, animal);
                match seed {
                    Some(seed) => controller.regenerate_with_seed(&prefs, seed)?,
                    None => controller.regenerate(&prefs)?,
                };
            }

            let record = controller.snapshot()?;
            match output {
                Some(path) => archive::export_to_file(&record, &path).await?,
                None => store.put(&record).await?,
            }
            print_record(&record);
        }

        Command::Show { target } => {
            let (record, _) = load_target(&store, &target).await?;
            print_record(&record);
        }

        Command::List => {
            let summaries = store.list().await?;
            if summaries.is_empty() {
                println!("No systems saved in {}", store.dir().display());
            }
            for summary in summaries {
                println!(
                    "{}  {:<24} {:>2} planets  seed {}",
                    summary.id, summary.name, summary.planet_count, summary.seed
                );
            }
        }

        Command::Remove { id } => {
            store.remove(id).await?;
            println!("Removed {}", id);
        }

        Command::Simulate { target, ticks, save } => {
            let (record, path) = load_target(&store, &target).await?;
            let mut controller = SystemController::new(&config);
            controller.restore(record);

            let ran = controller.tick(ticks)?;
            info!("Simulated {} frames", ran);

            let advanced = controller.snapshot()?;
            if save {
                match path {
                    Some(path) => archive::export_to_file(&advanced, &path).await?,
                    None => store.put(&advanced).await?,
                }
            }
            print_record(&advanced);
        }

        Command::Scene { target, output } => {
            let (record, _) = load_target(&store, &target).await?;
            let mut controller = SystemController::new(&config);
            controller.restore(record);

            let mut tree = SceneTree::new();
            let handles = controller.build_scene(&mut tree)?;
            info!("Scene has {} nodes, {} planets", tree.len(), handles.planets.len());

            let dump = SceneDump {
                camera: controller.viewer().camera(),
                scene: &tree,
            };
            let json = serde_json::to_string_pretty(&dump)?;
            match output {
                Some(path) => tokio::fs::write(&path, json).await?,
                None => println!("{}", json),
            }
        }

        Command::InitConfig { force } => {
            if Path::new(&args.config).exists() && !force {
                warn!("{} already exists, pass --force to overwrite", args.config);
                return Ok(());
            }
            config.save(&args.config)?;
            println!("Wrote {}", args.config);
        }
    }

    Ok(())
}
