//! Configuration for the solar theme daemon
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/suntint/config.toml)
//! 3. Built-in defaults (lowest priority)
//!
//! The daemon re-reads the file on every tick, so a broken edit must never
//! take it down: load errors are reported and the last good config is kept
//! (see `FileConfigStore`).

use crate::geo::DEFAULT_GEOLOCATION_URL;
use crate::palette::PaletteOverrides;
use crate::sink::VsCodeSettingsSink;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod observability;
mod serialization;
mod solar;
mod store;


// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (maintain public API)
// ─────────────────────────────────────────────────────────────────────────────

pub use observability::{FileLogging, LogRotation, LoggingConfig};
pub use solar::{FilePreviewConfig, FileSolarConfig, PreviewConfig, SolarConfig};
pub use store::{ConfigStore, EnvLookup, FileConfigStore};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Overrides the config file location
pub const CONFIG_PATH_ENV: &str = "SUNTINT_CONFIG";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Set once the first-run location lookup has been attempted
    pub location_initialized: bool,
    /// Explicit VS Code settings.json; `None` means the platform default
    pub settings_path: Option<PathBuf>,
    /// IP geolocation endpoint
    pub geolocation_url: String,
    pub solar: SolarConfig,
    pub preview: PreviewConfig,
    pub logging: LoggingConfig,
    /// `[palettes.<phase>]` overrides layered over the style pack
    pub palettes: PaletteOverrides,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            location_initialized: false,
            settings_path: None,
            geolocation_url: DEFAULT_GEOLOCATION_URL.to_string(),
            solar: SolarConfig::default(),
            preview: PreviewConfig::default(),
            logging: LoggingConfig::default(),
            palettes: PaletteOverrides::new(),
        }
    }
}

impl Config {
    /// Settings file colors are written to
    pub fn settings_path(&self) -> Option<PathBuf> {
        self.settings_path
            .clone()
            .or_else(VsCodeSettingsSink::default_path)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub location_initialized: Option<bool>,
    pub settings_path: Option<String>,
    pub geolocation_url: Option<String>,

    /// Optional [solar] section
    pub solar: Option<FileSolarConfig>,

    /// Optional [preview] section
    pub preview: Option<FilePreviewConfig>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,

    /// Optional [palettes.X] sections
    #[serde(default)]
    pub palettes: PaletteOverrides,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: $SUNTINT_CONFIG or ~/.config/suntint/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(path));
        }
        dirs::home_dir().map(|p| p.join(".config").join("suntint").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        // Don't overwrite existing config
        if path.exists() {
            return;
        }

        // Use Config::default().to_toml() as single source of truth
        if let Err(e) = Self::default().save_to(&path) {
            tracing::debug!("Could not create default config: {:#}", e);
        }
    }

    /// Parse the config file; a missing file is an empty config
    fn load_file_config(path: &Path) -> Result<FileConfig> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    /// Load configuration from `path` (if any), layered under `env`
    pub fn load(path: Option<&Path>, env: EnvLookup) -> Result<Self> {
        let file = match path {
            Some(path) => Self::load_file_config(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::layer(file, env))
    }

    /// Load configuration: env vars -> file -> defaults.
    ///
    /// A broken config file is reported on stderr and defaults are used.
    pub fn from_env() -> Self {
        let path = Self::config_path();
        match Self::load(path.as_deref(), store::process_env) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Using defaults                              ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  {:#}\n", e);
                eprintln!("  Tip: Check for:\n");
                eprintln!("    - Missing quotes around string values");
                eprintln!("    - Invalid boolean values (use true/false)");
                eprintln!("    - Typos in section names\n");
                eprintln!("  Run `suntint config --reset` to start over.\n");
                Self::layer(FileConfig::default(), store::process_env)
            }
        }
    }

    /// Apply env overrides and defaults to a parsed file
    pub(crate) fn layer(file: FileConfig, env: EnvLookup) -> Self {
        let defaults = Self::default();
        let mut solar = SolarConfig::from_file(file.solar);

        // Solar overrides: env > file > default
        if let Some(enabled) = env("SUNTINT_ENABLED").and_then(|v| parse_bool(&v)) {
            solar.enabled = enabled;
        }
        if let Some(latitude) = env("SUNTINT_LATITUDE").and_then(|v| v.trim().parse().ok()) {
            solar.latitude = latitude;
        }
        if let Some(longitude) = env("SUNTINT_LONGITUDE").and_then(|v| v.trim().parse().ok()) {
            solar.longitude = longitude;
        }
        if let Some(interval) = env("SUNTINT_INTERVAL").and_then(|v| v.trim().parse().ok()) {
            solar.update_interval_secs = interval;
        }
        let solar = solar.clamped();

        // Settings path: env > file > platform default (resolved lazily)
        let settings_path = env("SUNTINT_SETTINGS_PATH")
            .or(file.settings_path)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Self {
            location_initialized: file
                .location_initialized
                .unwrap_or(defaults.location_initialized),
            settings_path,
            geolocation_url: file.geolocation_url.unwrap_or(defaults.geolocation_url),
            solar,
            preview: PreviewConfig::from_file(file.preview),
            logging: LoggingConfig::from_file(file.logging),
            palettes: file.palettes,
        }
    }

    /// Write the canonical TOML to `path` (temp file then rename)
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let temp = path.with_extension("toml.tmp");
        std::fs::write(&temp, self.to_toml())
            .with_context(|| format!("Failed to write {}", temp.display()))?;
        std::fs::rename(&temp, path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }
}

/// `1/true/yes/on` and `0/false/no/off`, case-insensitive
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
