//! Palette table: named phase palettes, selectable style packs, user overrides
//!
//! Architecture:
//! - `ColorPalette`: one color per UI slot, every slot always present
//! - `PaletteTable`: one palette per `Phase`, loaded from a bundled style pack
//! - `PaletteOverrides`: partial user palettes layered over the table
//! - `Timeline`: breakpoints mapping solar time to phases (see timeline.rs)

mod bundled;
mod timeline;

pub use timeline::{Timeline, NOMINAL_SUNRISE, NOMINAL_SUNSET};

use crate::color::{hex_to_rgb, Intensity, Rgb};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────────────────────
// Slots
// ─────────────────────────────────────────────────────────────────────────────

/// A colorable region of the editor UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    EditorBackground,
    EditorForeground,
    Sidebar,
    ActivityBar,
    StatusBar,
    TitleBar,
    TabActive,
    TabInactive,
    Accent,
    AccentForeground,
    Terminal,
    Border,
}

impl Slot {
    pub const ALL: [Slot; 12] = [
        Slot::EditorBackground,
        Slot::EditorForeground,
        Slot::Sidebar,
        Slot::ActivityBar,
        Slot::StatusBar,
        Slot::TitleBar,
        Slot::TabActive,
        Slot::TabInactive,
        Slot::Accent,
        Slot::AccentForeground,
        Slot::Terminal,
        Slot::Border,
    ];

    /// Key used in style pack and config TOML
    pub fn key(self) -> &'static str {
        match self {
            Self::EditorBackground => "editor_background",
            Self::EditorForeground => "editor_foreground",
            Self::Sidebar => "sidebar",
            Self::ActivityBar => "activity_bar",
            Self::StatusBar => "status_bar",
            Self::TitleBar => "title_bar",
            Self::TabActive => "tab_active",
            Self::TabInactive => "tab_inactive",
            Self::Accent => "accent",
            Self::AccentForeground => "accent_foreground",
            Self::Terminal => "terminal",
            Self::Border => "border",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Phases
// ─────────────────────────────────────────────────────────────────────────────

/// A named segment of the day with its own base palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Midnight,
    DeepNight,
    PreDawn,
    Dawn,
    Sunrise,
    Morning,
    Midday,
    Afternoon,
    GoldenHour,
    Sunset,
    Dusk,
    Evening,
    Night,
}

impl Phase {
    pub const COUNT: usize = 13;

    pub const ALL: [Phase; Phase::COUNT] = [
        Phase::Midnight,
        Phase::DeepNight,
        Phase::PreDawn,
        Phase::Dawn,
        Phase::Sunrise,
        Phase::Morning,
        Phase::Midday,
        Phase::Afternoon,
        Phase::GoldenHour,
        Phase::Sunset,
        Phase::Dusk,
        Phase::Evening,
        Phase::Night,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Midnight => "midnight",
            Self::DeepNight => "deep_night",
            Self::PreDawn => "pre_dawn",
            Self::Dawn => "dawn",
            Self::Sunrise => "sunrise",
            Self::Morning => "morning",
            Self::Midday => "midday",
            Self::Afternoon => "afternoon",
            Self::GoldenHour => "golden_hour",
            Self::Sunset => "sunset",
            Self::Dusk => "dusk",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }

    /// Parse a palette name; accepts `golden_hour`, `golden-hour` and `goldenHour`.
    pub fn parse(name: &str) -> Option<Self> {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && *c != ' ')
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|phase| phase.as_str().replace('_', "") == normalized)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Palettes
// ─────────────────────────────────────────────────────────────────────────────

/// One color per UI slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorPalette {
    pub editor_background: Rgb,
    pub editor_foreground: Rgb,
    pub sidebar: Rgb,
    pub activity_bar: Rgb,
    pub status_bar: Rgb,
    pub title_bar: Rgb,
    pub tab_active: Rgb,
    pub tab_inactive: Rgb,
    pub accent: Rgb,
    pub accent_foreground: Rgb,
    pub terminal: Rgb,
    pub border: Rgb,
}

impl ColorPalette {
    /// Build a palette by asking for each slot in turn
    pub fn from_fn(mut color: impl FnMut(Slot) -> Rgb) -> Self {
        Self {
            editor_background: color(Slot::EditorBackground),
            editor_foreground: color(Slot::EditorForeground),
            sidebar: color(Slot::Sidebar),
            activity_bar: color(Slot::ActivityBar),
            status_bar: color(Slot::StatusBar),
            title_bar: color(Slot::TitleBar),
            tab_active: color(Slot::TabActive),
            tab_inactive: color(Slot::TabInactive),
            accent: color(Slot::Accent),
            accent_foreground: color(Slot::AccentForeground),
            terminal: color(Slot::Terminal),
            border: color(Slot::Border),
        }
    }

    pub fn get(&self, slot: Slot) -> Rgb {
        match slot {
            Slot::EditorBackground => self.editor_background,
            Slot::EditorForeground => self.editor_foreground,
            Slot::Sidebar => self.sidebar,
            Slot::ActivityBar => self.activity_bar,
            Slot::StatusBar => self.status_bar,
            Slot::TitleBar => self.title_bar,
            Slot::TabActive => self.tab_active,
            Slot::TabInactive => self.tab_inactive,
            Slot::Accent => self.accent,
            Slot::AccentForeground => self.accent_foreground,
            Slot::Terminal => self.terminal,
            Slot::Border => self.border,
        }
    }

    pub fn set(&mut self, slot: Slot, color: Rgb) {
        let target = match slot {
            Slot::EditorBackground => &mut self.editor_background,
            Slot::EditorForeground => &mut self.editor_foreground,
            Slot::Sidebar => &mut self.sidebar,
            Slot::ActivityBar => &mut self.activity_bar,
            Slot::StatusBar => &mut self.status_bar,
            Slot::TitleBar => &mut self.title_bar,
            Slot::TabActive => &mut self.tab_active,
            Slot::TabInactive => &mut self.tab_inactive,
            Slot::Accent => &mut self.accent,
            Slot::AccentForeground => &mut self.accent_foreground,
            Slot::Terminal => &mut self.terminal,
            Slot::Border => &mut self.border,
        };
        *target = color;
    }

    /// Every slot paired with its color, in `Slot::ALL` order
    pub fn iter(&self) -> impl Iterator<Item = (Slot, Rgb)> + '_ {
        Slot::ALL.into_iter().map(move |slot| (slot, self.get(slot)))
    }

    /// Saturation-adjust every slot
    pub fn with_intensity(&self, intensity: Intensity) -> Self {
        Self::from_fn(|slot| intensity.apply(self.get(slot)))
    }
}

/// A palette as written in TOML: every slot optional.
///
/// Style packs must fill every slot; user overrides may fill any subset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PartialPalette {
    pub editor_background: Option<String>,
    pub editor_foreground: Option<String>,
    pub sidebar: Option<String>,
    pub activity_bar: Option<String>,
    pub status_bar: Option<String>,
    pub title_bar: Option<String>,
    pub tab_active: Option<String>,
    pub tab_inactive: Option<String>,
    pub accent: Option<String>,
    pub accent_foreground: Option<String>,
    pub terminal: Option<String>,
    pub border: Option<String>,
}

impl PartialPalette {
    pub fn get(&self, slot: Slot) -> Option<&str> {
        let value = match slot {
            Slot::EditorBackground => &self.editor_background,
            Slot::EditorForeground => &self.editor_foreground,
            Slot::Sidebar => &self.sidebar,
            Slot::ActivityBar => &self.activity_bar,
            Slot::StatusBar => &self.status_bar,
            Slot::TitleBar => &self.title_bar,
            Slot::TabActive => &self.tab_active,
            Slot::TabInactive => &self.tab_inactive,
            Slot::Accent => &self.accent,
            Slot::AccentForeground => &self.accent_foreground,
            Slot::Terminal => &self.terminal,
            Slot::Border => &self.border,
        };
        value.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        Slot::ALL.into_iter().all(|slot| self.get(slot).is_none())
    }
}

/// User palette overrides keyed by phase name (`[palettes.<phase>]` in config)
pub type PaletteOverrides = BTreeMap<String, PartialPalette>;

// ─────────────────────────────────────────────────────────────────────────────
// Style packs
// ─────────────────────────────────────────────────────────────────────────────

/// Bundled palette sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StylePack {
    /// Warm dawns and sunsets, cool nights
    #[default]
    Vivid,
    /// Earthy, low saturation
    Muted,
    /// High-contrast slate
    Slate,
}

impl StylePack {
    pub const ALL: [StylePack; 3] = [StylePack::Vivid, StylePack::Muted, StylePack::Slate];

    /// Parse pack name from config
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "vivid" => Some(Self::Vivid),
            "muted" => Some(Self::Muted),
            "slate" => Some(Self::Slate),
            _ => None,
        }
    }

    /// Convert to string for TOML serialization
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vivid => "vivid",
            Self::Muted => "muted",
            Self::Slate => "slate",
        }
    }

    fn source(self) -> &'static str {
        match self {
            Self::Vivid => bundled::VIVID,
            Self::Muted => bundled::MUTED,
            Self::Slate => bundled::SLATE,
        }
    }
}

/// Root structure of a style pack TOML document
#[derive(Debug, Deserialize)]
struct PackFile {
    meta: PackMeta,
    palettes: HashMap<String, PartialPalette>,
}

#[derive(Debug, Deserialize)]
struct PackMeta {
    name: String,
    #[allow(dead_code)] // For future schema evolution
    version: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Palette table
// ─────────────────────────────────────────────────────────────────────────────

/// One complete palette for every phase
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteTable {
    name: String,
    palettes: [ColorPalette; Phase::COUNT],
}

impl PaletteTable {
    /// Parse a style pack document. Every phase and every slot must be present
    /// and well-formed.
    pub fn from_toml(source: &str) -> anyhow::Result<Self> {
        let pack: PackFile = toml::from_str(source)?;

        let mut palettes = Vec::with_capacity(Phase::COUNT);
        for phase in Phase::ALL {
            let partial = pack
                .palettes
                .get(phase.as_str())
                .ok_or_else(|| anyhow::anyhow!("missing palette for phase '{}'", phase))?;

            let mut palette = ColorPalette::from_fn(|_| Rgb::BLACK);
            for slot in Slot::ALL {
                let hex = partial.get(slot).ok_or_else(|| {
                    anyhow::anyhow!("palette '{}' is missing slot '{}'", phase, slot.key())
                })?;
                let color = Rgb::parse(hex).map_err(|e| {
                    anyhow::anyhow!("palette '{}' slot '{}': {}", phase, slot.key(), e)
                })?;
                palette.set(slot, color);
            }
            palettes.push(palette);
        }

        let palettes = palettes
            .try_into()
            .map_err(|_| anyhow::anyhow!("palette count mismatch"))?;

        Ok(Self {
            name: pack.meta.name,
            palettes,
        })
    }

    /// The parsed bundled table for `pack` (parsed once, then cloned)
    pub fn bundled(pack: StylePack) -> Self {
        static TABLES: OnceLock<Vec<PaletteTable>> = OnceLock::new();

        let tables = TABLES.get_or_init(|| {
            StylePack::ALL
                .into_iter()
                .map(|pack| {
                    // Bundled packs are compile-time data covered by tests
                    PaletteTable::from_toml(pack.source()).unwrap_or_else(|e| {
                        panic!("bundled style pack '{}' is invalid: {}", pack.as_str(), e)
                    })
                })
                .collect()
        });

        tables[pack as usize].clone()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, phase: Phase) -> &ColorPalette {
        &self.palettes[phase.index()]
    }

    /// Layer partial user palettes over this table.
    ///
    /// Unknown phase names are skipped with a warning; malformed colors fall
    /// back to black like every other color parse.
    pub fn with_overrides(mut self, overrides: &PaletteOverrides) -> Self {
        for (name, partial) in overrides {
            let Some(phase) = Phase::parse(name) else {
                tracing::warn!("Ignoring custom palette for unknown phase '{}'", name);
                continue;
            };
            let palette = &mut self.palettes[phase.index()];
            for slot in Slot::ALL {
                if let Some(hex) = partial.get(slot) {
                    if Rgb::parse(hex).is_err() {
                        tracing::warn!(
                            "Custom palette '{}' slot '{}' has malformed color {:?}",
                            name,
                            slot.key(),
                            hex
                        );
                    }
                    palette.set(slot, hex_to_rgb(hex));
                }
            }
        }
        self
    }
}
