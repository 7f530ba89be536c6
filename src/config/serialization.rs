//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;
use crate::palette::{PartialPalette, Slot};

/// TOML basic string with escapes
fn quote(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

/// Bare key when possible, quoted otherwise
fn key(name: &str) -> String {
    let bare = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        name.to_string()
    } else {
        quote(name)
    }
}

impl Config {
    /// Serialize custom palettes to `[palettes.X]` sections
    pub(super) fn palettes_to_toml(&self) -> String {
        let overrides: Vec<(&String, &PartialPalette)> = self
            .palettes
            .iter()
            .filter(|(_, partial)| !partial.is_empty())
            .collect();

        if overrides.is_empty() {
            // Show example comments when no overrides configured
            return r##"
# Custom palettes: override any slot of any phase in the selected style pack.
# Phases: midnight, deep_night, pre_dawn, dawn, sunrise, morning, midday,
#         afternoon, golden_hour, sunset, dusk, evening, night
# Slots:  editor_background, editor_foreground, sidebar, activity_bar,
#         status_bar, title_bar, tab_active, tab_inactive, accent,
#         accent_foreground, terminal, border
#
# [palettes.midday]
# editor_background = "#fdf6e3"
# accent = "#268bd2"
"##
            .to_string();
        }

        let mut output = String::from("\n");
        // BTreeMap: already sorted for deterministic output
        for (phase, partial) in overrides {
            output.push_str(&format!("[palettes.{}]\n", key(phase)));
            for slot in Slot::ALL {
                if let Some(hex) = partial.get(slot) {
                    output.push_str(&format!("{} = {}\n", slot.key(), quote(hex)));
                }
            }
            output.push('\n');
        }
        output
    }

    /// Serialize the full configuration
    pub fn to_toml(&self) -> String {
        let settings_path = match &self.settings_path {
            Some(path) => format!("settings_path = {}", quote(&path.to_string_lossy())),
            None => "# settings_path = \"/path/to/Code/User/settings.json\"".to_string(),
        };

        format!(
            r#"# suntint configuration

# Set after the first location lookup; set to false to look up again
location_initialized = {location_initialized}

# VS Code user settings file to write colors into (default: platform location)
{settings_path}

# IP geolocation endpoint used on first run and by `suntint locate`
geolocation_url = {geolocation_url}

# Solar theme (SUNTINT_* env vars override these)
[solar]
enabled = {enabled}
latitude = {latitude:?}
longitude = {longitude:?}
update_interval_secs = {interval}
show_notifications = {notifications}
intensity = {intensity}  # 0-100, 50 = palettes as designed
style_pack = "{style_pack}"  # vivid, muted, slate

# Live preview from the settings UI
[preview]
cooldown_ms = {cooldown_ms}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = {log_level}
# File logging (in addition to stderr)
file_enabled = {log_file_enabled}
file_dir = {log_file_dir}
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = {log_file_prefix}
{palettes}"#,
            location_initialized = self.location_initialized,
            settings_path = settings_path,
            geolocation_url = quote(&self.geolocation_url),
            enabled = self.solar.enabled,
            latitude = self.solar.latitude,
            longitude = self.solar.longitude,
            interval = self.solar.update_interval_secs,
            notifications = self.solar.show_notifications,
            intensity = self.solar.intensity,
            style_pack = self.solar.style_pack.as_str(),
            cooldown_ms = self.preview.cooldown_ms,
            log_level = quote(&self.logging.level),
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = quote(&self.logging.file_dir.to_string_lossy()),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = quote(&self.logging.file_prefix),
            palettes = self.palettes_to_toml(),
        )
    }
}
