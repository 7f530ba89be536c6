//! Solar theme and preview configuration
//!
//! Values are clamped into range on load. A config file is hand-edited, so
//! an out-of-range latitude is corrected with a warning rather than rejected.

use crate::color::Intensity;
use crate::palette::StylePack;
use crate::preview::DEFAULT_COOLDOWN;
use serde::Deserialize;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Solar Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Smallest allowed update interval
pub const MIN_INTERVAL_SECS: u64 = 1;

/// Largest allowed update interval (one day)
pub const MAX_INTERVAL_SECS: u64 = 86_400;

/// Solar theme settings, read fresh on every tick
#[derive(Debug, Clone, PartialEq)]
pub struct SolarConfig {
    /// Master switch; when off the status indicator is hidden and nothing is written
    pub enabled: bool,
    /// Degrees, -90..=90
    pub latitude: f64,
    /// Degrees, -180..=180
    pub longitude: f64,
    /// Seconds between scheduler ticks
    pub update_interval_secs: u64,
    /// Notify on forced updates and phase changes
    pub show_notifications: bool,
    /// Saturation, 0..=100 with 50 neutral
    pub intensity: u8,
    pub style_pack: StylePack,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            // San Francisco until auto-detect or the user says otherwise
            latitude: 37.7749,
            longitude: -122.4194,
            update_interval_secs: 60,
            show_notifications: true,
            intensity: Intensity::NEUTRAL.percent(),
            style_pack: StylePack::default(),
        }
    }
}

impl SolarConfig {
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(
            self.update_interval_secs
                .clamp(MIN_INTERVAL_SECS, MAX_INTERVAL_SECS),
        )
    }

    pub fn intensity(&self) -> Intensity {
        Intensity::new(self.intensity)
    }

    /// Clamp everything into its valid range, warning about each correction
    pub fn clamped(mut self) -> Self {
        self.latitude = clamp_degrees("latitude", self.latitude, 90.0, 0.0);
        self.longitude = clamp_degrees("longitude", self.longitude, 180.0, 0.0);

        if self.update_interval_secs < MIN_INTERVAL_SECS {
            tracing::warn!(
                "update_interval_secs {} too small, using {}",
                self.update_interval_secs,
                MIN_INTERVAL_SECS
            );
            self.update_interval_secs = MIN_INTERVAL_SECS;
        }
        if self.update_interval_secs > MAX_INTERVAL_SECS {
            tracing::warn!(
                "update_interval_secs {} too large, using {}",
                self.update_interval_secs,
                MAX_INTERVAL_SECS
            );
            self.update_interval_secs = MAX_INTERVAL_SECS;
        }
        if self.intensity > 100 {
            tracing::warn!("intensity {} above 100, using 100", self.intensity);
            self.intensity = 100;
        }
        self
    }
}

fn clamp_degrees(name: &str, value: f64, limit: f64, fallback: f64) -> f64 {
    if !value.is_finite() {
        tracing::warn!("{} is not a number, using {}", name, fallback);
        return fallback;
    }
    let clamped = value.clamp(-limit, limit);
    if clamped != value {
        tracing::warn!("{} {} out of range, using {}", name, value, clamped);
    }
    clamped
}

/// Solar settings as loaded from file
#[derive(Debug, Deserialize, Default)]
pub struct FileSolarConfig {
    pub enabled: Option<bool>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub update_interval_secs: Option<u64>,
    pub show_notifications: Option<bool>,
    pub intensity: Option<i64>,
    pub style_pack: Option<String>,
}

impl SolarConfig {
    /// Create from file config with defaults. Not range-checked yet.
    pub fn from_file(file: Option<FileSolarConfig>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        let style_pack = match file.style_pack {
            Some(name) => StylePack::from_name(&name).unwrap_or_else(|| {
                tracing::warn!(
                    "Unknown style_pack '{}', using '{}'",
                    name,
                    defaults.style_pack.as_str()
                );
                defaults.style_pack
            }),
            None => defaults.style_pack,
        };

        Self {
            enabled: file.enabled.unwrap_or(defaults.enabled),
            latitude: file.latitude.unwrap_or(defaults.latitude),
            longitude: file.longitude.unwrap_or(defaults.longitude),
            update_interval_secs: file
                .update_interval_secs
                .unwrap_or(defaults.update_interval_secs),
            show_notifications: file
                .show_notifications
                .unwrap_or(defaults.show_notifications),
            // Saturated here; Config::layer clamps and reports
            intensity: file
                .intensity
                .map(|i| i.clamp(0, 255) as u8)
                .unwrap_or(defaults.intensity),
            style_pack,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Preview Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Preview settings
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewConfig {
    /// How long after the last preview request the scheduler takes over again
    pub cooldown_ms: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: DEFAULT_COOLDOWN.as_millis() as u64,
        }
    }
}

impl PreviewConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

/// Preview settings as loaded from file
#[derive(Debug, Deserialize, Default)]
pub struct FilePreviewConfig {
    pub cooldown_ms: Option<u64>,
}

impl PreviewConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FilePreviewConfig>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            cooldown_ms: file.cooldown_ms.unwrap_or(defaults.cooldown_ms),
        }
    }
}
