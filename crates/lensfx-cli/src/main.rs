mod simulate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use lensfx_core::{classify, LensConfig, PixelLayout};

#[derive(Parser)]
#[command(
    name = "lensfx",
    version,
    about = "LensFX: camera frame normalization and effect-player driver",
    long_about = "Inspect how pixel layouts are handed to the rendering engine and\nrun scripted effect-player sessions against a simulated engine."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a pixel layout is classified (name like nv12_bt709_video or raw code)
    Classify {
        #[arg()]
        layout: String,
    },

    /// Print every known pixel layout with its classification
    Layouts,

    /// Print the effective configuration as TOML
    Config {
        /// Path to a lensfx.toml file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Run a scripted session against the simulated engine
    Simulate(simulate::SimulateArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Classify { layout } => cmd_classify(&layout),
        Commands::Layouts => cmd_layouts(),
        Commands::Config { file } => cmd_config(file),
        Commands::Simulate(args) => simulate::run(args),
    }
}

fn cmd_classify(layout: &str) -> Result<()> {
    let layout: PixelLayout = layout
        .parse()
        .with_context(|| format!("cannot parse pixel layout '{}'", layout))?;
    let classification = classify::classify(layout);
    if !classification.known {
        tracing::warn!(
            "Layout code {} is unknown; frames in this layout are dropped",
            classification.raw
        );
    }
    println!("{}", serde_json::to_string_pretty(&classification)?);
    Ok(())
}

fn cmd_layouts() -> Result<()> {
    let all: Vec<_> = PixelLayout::KNOWN
        .iter()
        .map(|l| classify::classify(*l))
        .collect();
    println!("{}", serde_json::to_string_pretty(&all)?);
    Ok(())
}

pub(crate) fn load_config(file: Option<PathBuf>) -> Result<LensConfig> {
    match file {
        Some(path) => LensConfig::load_from_file(&path)
            .with_context(|| format!("failed to load config: {}", path.display())),
        None => Ok(LensConfig::default()),
    }
}

fn cmd_config(file: Option<PathBuf>) -> Result<()> {
    let config = load_config(file)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}
