//! GameBar CLI - manage overlay presets and live settings.

mod commands;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::common::Context;

#[derive(Parser)]
#[command(name = "gamebar")]
#[command(author, version, about = "GameBar overlay preset manager", long_about = None)]
struct Cli {
    /// Settings store file [default: store_path from config.toml, then the
    /// platform config directory]
    #[arg(long, global = true, env = "GAMEBAR_STORE")]
    store: Option<PathBuf>,

    /// Configuration file [default: <config dir>/gamebar/config.toml]
    #[arg(long, global = true, env = "GAMEBAR_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save, load and manage presets
    Presets(commands::presets::PresetsArgs),

    /// Inspect and edit the live overlay settings
    Settings(commands::settings::SettingsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = Context::open(cli.store.as_deref(), cli.config.as_deref())?;
    tracing::debug!(store = %ctx.store.path().display(), "using settings store");

    match cli.command {
        Commands::Presets(args) => commands::presets::run(&ctx, args),
        Commands::Settings(args) => commands::settings::run(&ctx, args),
    }
}

/// Log to stderr so command output on stdout stays clean.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
