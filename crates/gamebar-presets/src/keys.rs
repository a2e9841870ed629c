//! The tracked-key table.
//!
//! Only keys listed here are captured into presets, restored from presets, or
//! cleared by a factory reset. Each key is declared once together with the
//! kind of value the overlay stores under it; that declaration is what preset
//! decoding and CLI input parsing consult, never the runtime type of whatever
//! happens to be in the store.

use crate::value::ValueKind;

/// Prefix shared by every overlay preference key.
pub const KEY_PREFIX: &str = "game_bar_";

/// Version of the tracked-key table. Bump when keys are added or retyped.
pub const TRACKED_KEYS_VERSION: u32 = 2;

/// A configuration key eligible for capture and restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedKey {
    /// Full store key, including [`KEY_PREFIX`].
    pub name: &'static str,
    /// Declared value kind.
    pub kind: ValueKind,
}

impl TrackedKey {
    const fn new(name: &'static str, kind: ValueKind) -> Self {
        Self { name, kind }
    }

    /// Key name without [`KEY_PREFIX`].
    pub fn short_name(&self) -> &'static str {
        self.name.strip_prefix(KEY_PREFIX).unwrap_or(self.name)
    }
}

use ValueKind as K;

/// Every tracked key, grouped the way the settings screen groups them.
pub static TRACKED_KEYS: &[TrackedKey] = &[
    // Overlay features
    TrackedKey::new("game_bar_fps_enable", K::Bool),
    TrackedKey::new("game_bar_fps_display_mode", K::String),
    TrackedKey::new("game_bar_frame_time_enable", K::Bool),
    TrackedKey::new("game_bar_temp_enable", K::Bool),
    TrackedKey::new("game_bar_cpu_usage_enable", K::Bool),
    TrackedKey::new("game_bar_cpu_clock_enable", K::Bool),
    TrackedKey::new("game_bar_cpu_temp_enable", K::Bool),
    TrackedKey::new("game_bar_ram_enable", K::Bool),
    TrackedKey::new("game_bar_ram_speed_enable", K::Bool),
    TrackedKey::new("game_bar_ram_temp_enable", K::Bool),
    TrackedKey::new("game_bar_gpu_usage_enable", K::Bool),
    TrackedKey::new("game_bar_gpu_clock_enable", K::Bool),
    TrackedKey::new("game_bar_gpu_temp_enable", K::Bool),
    // FPS measurement
    TrackedKey::new("game_bar_fps_method", K::String),
    // Customization
    TrackedKey::new("game_bar_text_size", K::Int),
    TrackedKey::new("game_bar_background_alpha", K::Int),
    TrackedKey::new("game_bar_background_color", K::String),
    TrackedKey::new("game_bar_corner_radius", K::Int),
    TrackedKey::new("game_bar_padding", K::Int),
    TrackedKey::new("game_bar_item_spacing", K::Int),
    TrackedKey::new("game_bar_update_interval", K::String),
    TrackedKey::new("game_bar_title_color", K::String),
    TrackedKey::new("game_bar_value_color", K::String),
    TrackedKey::new("game_bar_text_color", K::String),
    TrackedKey::new("game_bar_font_path", K::String),
    TrackedKey::new("game_bar_position", K::String),
    TrackedKey::new("game_bar_format", K::String),
    // Split config
    TrackedKey::new("game_bar_split_mode", K::String),
    // Gesture controls
    TrackedKey::new("game_bar_single_tap_enable", K::Bool),
    TrackedKey::new("game_bar_single_tap_function", K::String),
    TrackedKey::new("game_bar_doubletap_enable", K::Bool),
    TrackedKey::new("game_bar_doubletap_function", K::String),
    TrackedKey::new("game_bar_longpress_enable", K::Bool),
    TrackedKey::new("game_bar_longpress_function", K::String),
    TrackedKey::new("game_bar_longpress_timeout", K::String),
    // Per-app
    TrackedKey::new("game_bar_auto_enable", K::Bool),
];

/// Look up a tracked key by its full store name.
pub fn tracked_key(name: &str) -> Option<&'static TrackedKey> {
    TRACKED_KEYS.iter().find(|k| k.name == name)
}

/// Look up a tracked key by full name or by its short name (no prefix).
///
/// Dashes are accepted in place of underscores, so `fps-enable`,
/// `fps_enable` and `game_bar_fps_enable` all resolve to the same key.
pub fn resolve_key(name: &str) -> Option<&'static TrackedKey> {
    let normalized = name.trim().replace('-', "_");
    tracked_key(&normalized).or_else(|| {
        TRACKED_KEYS
            .iter()
            .find(|k| k.short_name() == normalized)
    })
}

/// Whether `name` is a tracked key.
pub fn is_tracked(name: &str) -> bool {
    tracked_key(name).is_some()
}
