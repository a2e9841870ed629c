//! Preset management commands.
//!
//! Provides commands to list, show, save, load, and manage overlay presets.

use clap::{Args, Subcommand};
use gamebar_presets::paths::EXPORT_EXTENSION;
use gamebar_presets::{
    PresetEvent, PresetEvents, export_file_name, resolve_export_path, tracked_key,
};
use std::path::PathBuf;
use std::sync::Arc;

use super::common::{Context, print_settings};

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List saved presets, newest first
    List,

    /// Show details of a preset
    Show {
        /// Preset id
        id: String,
    },

    /// Save the current settings as a new preset
    Save {
        /// Name for the new preset
        name: String,
    },

    /// Apply a preset to the live settings
    Load {
        /// Preset id
        id: String,

        /// Print the resulting settings
        #[arg(long)]
        show: bool,
    },

    /// Delete a preset
    Delete {
        /// Preset id
        id: String,
    },

    /// Change the name of a preset
    Rename {
        /// Preset id
        id: String,

        /// New name
        name: String,
    },

    /// Write a preset to a JSON file
    Export {
        /// Preset id
        id: String,

        /// Destination file or directory [default: export_dir from
        /// config.toml, then the current directory]
        destination: Option<PathBuf>,
    },

    /// Add a preset from a JSON file
    Import {
        /// Preset file
        file: PathBuf,
    },

    /// Clear every tracked setting back to the overlay defaults
    Reset {
        /// Required; the reset cannot be undone
        #[arg(long)]
        force: bool,
    },
}

pub fn run(ctx: &Context, args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List => list_presets(ctx),
        PresetsCommand::Show { id } => show_preset(ctx, &id),
        PresetsCommand::Save { name } => save_preset(ctx, &name),
        PresetsCommand::Load { id, show } => load_preset(ctx, &id, show),
        PresetsCommand::Delete { id } => delete_preset(ctx, &id),
        PresetsCommand::Rename { id, name } => rename_preset(ctx, &id, &name),
        PresetsCommand::Export { id, destination } => export_preset(ctx, &id, destination),
        PresetsCommand::Import { file } => import_preset(ctx, &file),
        PresetsCommand::Reset { force } => reset_settings(ctx, force),
    }
}

fn list_presets(ctx: &Context) -> anyhow::Result<()> {
    let presets = ctx.manager().list();

    println!("Presets:");
    println!("========");
    if presets.is_empty() {
        println!("  (none)");
        println!();
        println!("  Create a preset with: gamebar presets save <name>\n");
        return Ok(());
    }

    println!("  {:<36}  {:<20}  {:<19}  {:>8}", "ID", "NAME", "CREATED", "SETTINGS");
    for preset in presets {
        println!(
            "  {:<36}  {:<20}  {:<19}  {:>8}",
            preset.id,
            preset.name,
            preset.created_date,
            preset.len()
        );
    }
    println!();

    Ok(())
}

fn show_preset(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let preset = ctx.manager().get(id)?;

    println!("Preset: {}", preset.name);
    println!("{}", "=".repeat(8 + preset.name.len()));
    println!();
    println!("ID:      {}", preset.id);
    println!("Created: {}", preset.created_date);
    println!();

    println!("Settings ({}):", preset.len());
    for (key, value) in preset.iter() {
        let short = tracked_key(key).map_or(key, |k| k.short_name());
        println!("  {short:<28} {value}");
    }

    Ok(())
}

fn save_preset(ctx: &Context, name: &str) -> anyhow::Result<()> {
    let preset = ctx.manager().save(name)?;

    println!(
        "Saved preset '{}' ({}) with {} settings",
        preset.name,
        preset.id,
        preset.len()
    );
    Ok(())
}

fn load_preset(ctx: &Context, id: &str, show: bool) -> anyhow::Result<()> {
    let events = PresetEvents::new();
    if show {
        let store = Arc::clone(&ctx.store);
        events.register(move |event| match event {
            PresetEvent::Loaded { id } => {
                println!("Settings after loading {id}:");
                print_settings(&store);
            }
        });
    }

    ctx.manager().load(id)?;
    println!("Loaded preset {id}");

    events.broadcast(&PresetEvent::Loaded { id: id.to_string() });
    Ok(())
}

fn delete_preset(ctx: &Context, id: &str) -> anyhow::Result<()> {
    ctx.manager().delete(id)?;
    println!("Deleted preset {id}");
    Ok(())
}

fn rename_preset(ctx: &Context, id: &str, name: &str) -> anyhow::Result<()> {
    let preset = ctx.manager().rename(id, name)?;
    println!("Renamed preset {} to '{}'", preset.id, preset.name);
    Ok(())
}

fn export_preset(ctx: &Context, id: &str, destination: Option<PathBuf>) -> anyhow::Result<()> {
    let manager = ctx.manager();
    // The payload is copied verbatim, so it only needs to decode when the
    // file name comes from the preset name.
    let path = resolve_export_path(destination.as_deref(), &ctx.config.export_dir(), || {
        manager.get(id).map_or_else(
            |_| format!("{id}.{EXPORT_EXTENSION}"),
            |preset| export_file_name(&preset),
        )
    });

    manager.export(id, &path)?;
    println!("Exported preset {id} to {}", path.display());
    Ok(())
}

fn import_preset(ctx: &Context, file: &std::path::Path) -> anyhow::Result<()> {
    let preset = ctx.manager().import(file)?;
    println!(
        "Imported preset '{}' as {} ({} settings)",
        preset.name,
        preset.id,
        preset.len()
    );
    Ok(())
}

fn reset_settings(ctx: &Context, force: bool) -> anyhow::Result<()> {
    if !force {
        anyhow::bail!("Use --force to confirm resetting every tracked setting to its default.");
    }

    ctx.manager().reset_to_defaults()?;
    println!("Reset all tracked settings to defaults. Presets were kept.");
    Ok(())
}
