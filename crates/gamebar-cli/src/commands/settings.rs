//! Live settings commands.

use clap::{Args, Subcommand};
use gamebar_presets::{Edit, KeyValueStore, TRACKED_KEYS, TRACKED_KEYS_VERSION};

use super::common::{Context, lookup_key, parse_setting, print_settings};

#[derive(Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    command: SettingsCommand,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Show the current value of every tracked setting
    Show,

    /// Set a tracked setting
    Set {
        /// Setting name, with or without the game_bar_ prefix
        key: String,

        /// New value, parsed according to the setting's kind
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Remove a tracked setting so the overlay default applies
    Unset {
        /// Setting name, with or without the game_bar_ prefix
        key: String,
    },

    /// List tracked settings and their kinds
    Keys,
}

pub fn run(ctx: &Context, args: SettingsArgs) -> anyhow::Result<()> {
    match args.command {
        SettingsCommand::Show => {
            println!("Settings ({}):", ctx.store.path().display());
            print_settings(&ctx.store);
            Ok(())
        }
        SettingsCommand::Set { key, value } => set_setting(ctx, &key, &value),
        SettingsCommand::Unset { key } => unset_setting(ctx, &key),
        SettingsCommand::Keys => {
            list_keys();
            Ok(())
        }
    }
}

fn set_setting(ctx: &Context, name: &str, text: &str) -> anyhow::Result<()> {
    let key = lookup_key(name)?;
    let value = parse_setting(key, text)?;

    ctx.store.commit(Edit::new().put(key.name, value.clone()))?;
    println!("{} = {}", key.short_name(), value);
    Ok(())
}

fn unset_setting(ctx: &Context, name: &str) -> anyhow::Result<()> {
    let key = lookup_key(name)?;

    ctx.store.commit(Edit::new().remove(key.name))?;
    println!("{} = (default)", key.short_name());
    Ok(())
}

fn list_keys() {
    println!("Tracked settings (version {TRACKED_KEYS_VERSION}):");
    println!();
    println!("  {:<28} {:<6} {}", "NAME", "KIND", "STORE KEY");
    for key in TRACKED_KEYS {
        println!("  {:<28} {:<6} {}", key.short_name(), key.kind, key.name);
    }
}
