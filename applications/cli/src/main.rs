/// Tonearm - headless driver for the playback core
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tonearm_audio::EqPreset;
use tonearm_cli::{
    catalog_file::load_catalog, config::AppConfig, script::parse_script, simulator::Simulation,
    theme_store::FileThemeStore,
};
use tonearm_core::ThemeStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Script used by `simulate` when none is given
const DEMO_SCRIPT: &str = "\
play
advance 5
enqueue 2
next
preset Bass Boost
advance 3
shuffle
next
volume 0.6
advance 2
";

#[derive(Parser)]
#[command(name = "tonearm")]
#[command(about = "Headless Tonearm music player", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./tonearm.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted session against a simulated media element
    Simulate {
        /// Catalog TOML file
        #[arg(short, long)]
        catalog: Option<PathBuf>,
        /// Script file, one command per line
        #[arg(short, long)]
        script: Option<PathBuf>,
        /// Fixed shuffle seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List equalizer presets and their band gains
    Presets,
    /// Search the catalog by title or artist
    Search {
        /// Case-insensitive query
        query: String,
        /// Catalog TOML file
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },
    /// Print or change the persisted theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Switch between light and dark
    Toggle,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tonearm=info,tonearm_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Simulate {
            catalog,
            script,
            seed,
        } => simulate(&config, catalog.as_deref(), script.as_deref(), seed)?,
        Commands::Presets => list_presets(),
        Commands::Search { query, catalog } => search(&config, catalog.as_deref(), &query)?,
        Commands::Theme { action } => theme(&config, action)?,
    }

    Ok(())
}

fn simulate(
    config: &AppConfig,
    catalog: Option<&Path>,
    script: Option<&Path>,
    seed: Option<u64>,
) -> Result<()> {
    let catalog = load_catalog(catalog.unwrap_or(config.catalog_path.as_path()))?;
    let source = match script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?,
        None => DEMO_SCRIPT.to_string(),
    };
    let commands = parse_script(&source)?;

    let theme_store = FileThemeStore::new(&config.theme_path);
    let mut simulation = Simulation::new(catalog, config.player.clone(), Box::new(theme_store))?;
    if let Some(seed) = seed {
        simulation = simulation.with_shuffle_seed(seed);
    }
    tracing::info!(commands = commands.len(), "Starting simulation");

    print_events(&mut simulation)?;
    let mut failures = 0;
    for command in &commands {
        if let Err(err) = simulation.apply(command) {
            tracing::warn!(?command, "Command failed: {err:#}");
            failures += 1;
        }
        print_events(&mut simulation)?;
    }

    println!("{}", serde_json::to_string_pretty(&simulation.summary())?);
    if failures > 0 {
        tracing::warn!(failures, "Some script commands failed");
    }
    Ok(())
}

fn print_events(simulation: &mut Simulation) -> Result<()> {
    for event in simulation.take_events() {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}

fn list_presets() {
    for preset in EqPreset::ALL {
        let gains: Vec<String> = preset.gains().iter().map(|g| format!("{g:+.0}")).collect();
        println!("{:<12} {}", preset.name(), gains.join(" "));
    }
}

fn search(config: &AppConfig, catalog: Option<&Path>, query: &str) -> Result<()> {
    let catalog = load_catalog(catalog.unwrap_or(config.catalog_path.as_path()))?;
    let matches = catalog.search(query);
    if matches.is_empty() {
        println!("No tracks match '{query}'");
        return Ok(());
    }
    for (index, track) in matches {
        println!(
            "{index:>3}  {} - {}  {}",
            track.title, track.artist, track.duration_label
        );
    }
    Ok(())
}

fn theme(config: &AppConfig, action: Option<ThemeAction>) -> Result<()> {
    let mut store = FileThemeStore::new(&config.theme_path);
    let current = store.load()?.unwrap_or_default();
    match action {
        None => println!("{current}"),
        Some(ThemeAction::Toggle) => {
            let theme = current.toggled();
            store.save(theme)?;
            tracing::info!(%theme, path = %store.path().display(), "Theme toggled");
            println!("{theme}");
        }
    }
    Ok(())
}
