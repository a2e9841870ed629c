//! Preset demo: capture, list, export, import and restore overlay settings.
//!
//! Run with: cargo run -p gamebar-presets --example preset_demo

use std::sync::Arc;

use gamebar_presets::{
    ApplySettings, Edit, KeyValueStore, MemoryStore, PresetEvent, PresetEvents, PresetManager,
    SettingValue, TRACKED_KEYS, resolve_key,
};

/// Stand-in overlay that just prints what it is asked to do.
struct PrintingOverlay;

impl ApplySettings for PrintingOverlay {
    fn apply_preferences(&self) {
        println!("  [overlay] re-reading preferences");
    }

    fn is_showing(&self) -> bool {
        true
    }

    fn hide(&self) {
        println!("  [overlay] hide");
    }

    fn show(&self) {
        println!("  [overlay] show");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // --- Tracked keys ---
    println!("=== Tracked Keys ({}) ===\n", TRACKED_KEYS.len());
    for key in TRACKED_KEYS.iter().take(5) {
        println!("  {:<36} {}", key.name, key.kind);
    }
    println!("  ...");

    let key = resolve_key("fps-enable").ok_or("fps-enable should resolve")?;
    println!("\n'fps-enable' resolves to {}", key.name);

    // --- Live settings ---
    let store = Arc::new(MemoryStore::new());
    store.commit(
        Edit::new()
            .put("game_bar_fps_enable", true)
            .put("game_bar_text_size", 14)
            .put("game_bar_position", "top_left"),
    )?;

    let manager = PresetManager::new(Arc::clone(&store)).with_notifier(Arc::new(PrintingOverlay));

    // --- Save ---
    println!("\n=== Save ===\n");
    let bench = manager.save("Benchmark")?;
    println!("Saved '{}' as {} ({} settings)", bench.name, bench.id, bench.len());

    store.commit(Edit::new().put("game_bar_text_size", 20))?;
    let big = manager.save("Big text")?;
    println!("Saved '{}' as {}", big.name, big.id);

    // --- List ---
    println!("\n=== Presets ===\n");
    for preset in manager.list() {
        println!("  {:<12} {}  {}", preset.name, preset.created_date, preset.id);
    }

    // --- Export / import ---
    println!("\n=== Export / Import ===\n");
    let dir = std::env::temp_dir().join("gamebar-preset-demo");
    std::fs::create_dir_all(&dir)?;
    let file = dir.join("benchmark.json");
    manager.export(&bench.id, &file)?;
    println!("Exported to {}", file.display());
    println!("{}", std::fs::read_to_string(&file)?);

    let copy = manager.import(&file)?;
    println!("Imported as {} (new id)", copy.id);

    // --- Load with a listener ---
    println!("\n=== Load ===\n");
    let events = PresetEvents::new();
    events.register(|event| match event {
        PresetEvent::Loaded { id } => println!("  [settings screen] refresh after {id}"),
    });

    manager.load(&bench.id)?;
    events.broadcast(&PresetEvent::Loaded {
        id: bench.id.clone(),
    });
    println!(
        "text_size is now {}",
        store
            .get("game_bar_text_size")?
            .unwrap_or(SettingValue::Int(0))
    );

    // --- Reset ---
    println!("\n=== Reset ===\n");
    manager.reset_to_defaults()?;
    println!("Presets kept: {}", manager.list().len());

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
