//! Palette resolution: solar time → interpolated palette → editor color keys
//!
//! Interpolation uses the timeline breakpoints. The display phase
//! (`phase_name`) uses its own coarser thresholds and never feeds colors.

use crate::color::{lerp_rgb, Intensity};
use crate::palette::{ColorPalette, PaletteTable, Slot, Timeline};
use std::collections::BTreeMap;

/// Editor color key → `#rrggbb`, the payload handed to a style sink
pub type ColorMap = BTreeMap<String, String>;

/// Blend the two palettes bracketing `solar`.
///
/// Every slot is interpolated, so the result is always a complete palette.
pub fn resolve(solar: f64, timeline: &Timeline, table: &PaletteTable) -> ColorPalette {
    let (prev, next) = timeline.bracket(solar);

    let span = next.time - prev.time;
    let t = if span > 0.0 {
        ((solar - prev.time) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let from = table.get(prev.phase);
    let to = table.get(next.phase);
    ColorPalette::from_fn(|slot| lerp_rgb(from.get(slot), to.get(slot), t))
}

/// Resolve and apply intensity in one step
pub fn resolve_with_intensity(
    solar: f64,
    timeline: &Timeline,
    table: &PaletteTable,
    intensity: Intensity,
) -> ColorPalette {
    resolve(solar, timeline, table).with_intensity(intensity)
}

// ─────────────────────────────────────────────────────────────────────────────
// Display phase
// ─────────────────────────────────────────────────────────────────────────────

/// Upper bounds (exclusive) for each display phase, in solar hours
const DISPLAY_PHASES: [(f64, &str); 10] = [
    (5.0, "Night"),
    (6.5, "Dawn"),
    (8.0, "Sunrise"),
    (11.0, "Morning"),
    (13.0, "Midday"),
    (17.0, "Afternoon"),
    (18.0, "Golden Hour"),
    (19.0, "Sunset"),
    (20.5, "Dusk"),
    (22.0, "Evening"),
];

/// Human-readable phase for status display
pub fn phase_name(solar: f64) -> &'static str {
    DISPLAY_PHASES
        .iter()
        .find(|(until, _)| solar < *until)
        .map(|(_, name)| *name)
        .unwrap_or("Night")
}

/// Glyph for a display phase; unknown names get a generic moon
pub fn phase_emoji(name: &str) -> &'static str {
    match name {
        "Night" => "🌙",
        "Dawn" => "🌄",
        "Sunrise" => "🌅",
        "Morning" => "🌤",
        "Midday" => "☀",
        "Afternoon" => "⛅",
        "Golden Hour" => "🌇",
        "Sunset" => "🌆",
        "Dusk" => "🌒",
        "Evening" => "🌃",
        _ => "🌗",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Editor color keys
// ─────────────────────────────────────────────────────────────────────────────

/// Editor color keys driven by each slot
pub fn style_keys(slot: Slot) -> &'static [&'static str] {
    match slot {
        Slot::EditorBackground => &["editor.background", "editorGutter.background"],
        Slot::EditorForeground => &["editor.foreground"],
        Slot::Sidebar => &["sideBar.background"],
        Slot::ActivityBar => &["activityBar.background"],
        Slot::StatusBar => &["statusBar.background"],
        Slot::TitleBar => &["titleBar.activeBackground", "titleBar.inactiveBackground"],
        Slot::TabActive => &["tab.activeBackground"],
        Slot::TabInactive => &[
            "tab.inactiveBackground",
            "editorGroupHeader.tabsBackground",
        ],
        Slot::Accent => &[
            "focusBorder",
            "button.background",
            "activityBarBadge.background",
            "progressBar.background",
        ],
        Slot::AccentForeground => &[
            "button.foreground",
            "activityBarBadge.foreground",
            "statusBar.foreground",
        ],
        Slot::Terminal => &["terminal.background", "panel.background"],
        Slot::Border => &[
            "panel.border",
            "sideBar.border",
            "editorGroup.border",
            "tab.border",
        ],
    }
}

/// Every key this program may write (used to clean up on reset)
pub fn owned_style_keys() -> impl Iterator<Item = &'static str> {
    Slot::ALL
        .into_iter()
        .flat_map(|slot| style_keys(slot).iter().copied())
}

/// Expand a palette into editor color keys
pub fn to_color_map(palette: &ColorPalette) -> ColorMap {
    let mut map = ColorMap::new();
    for (slot, color) in palette.iter() {
        insert_slot(&mut map, slot, &color.to_hex());
    }
    map
}

/// Write one slot's color under all of its keys
pub fn insert_slot(map: &mut ColorMap, slot: Slot, hex: &str) {
    for key in style_keys(slot) {
        map.insert((*key).to_string(), hex.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::palette::{Phase, StylePack};
    use std::collections::HashSet;

    fn table() -> PaletteTable {
        PaletteTable::bundled(StylePack::Vivid)
    }

    #[test]
    fn test_midday_is_unblended() {
        let table = table();
        let palette = resolve(12.0, &Timeline::standard(), &table);
        assert_eq!(&palette, table.get(Phase::Midday));
    }

    #[test]
    fn test_breakpoint_resolves_to_its_phase() {
        let table = table();
        let timeline = Timeline::standard();
        assert_eq!(&resolve(0.0, &timeline, &table), table.get(Phase::Midnight));
        assert_eq!(&resolve(6.5, &timeline, &table), table.get(Phase::Sunrise));
        assert_eq!(&resolve(18.0, &timeline, &table), table.get(Phase::Sunset));
    }

    #[test]
    fn test_halfway_blends_evenly() {
        let table = table();
        // 20:00 evening → 22:00 night
        let palette = resolve(21.0, &Timeline::standard(), &table);
        let expected = lerp_rgb(
            table.get(Phase::Evening).editor_background,
            table.get(Phase::Night).editor_background,
            0.5,
        );
        assert_eq!(palette.editor_background, expected);
    }

    #[test]
    fn test_end_of_day_meets_midnight() {
        let table = table();
        let timeline = Timeline::standard();
        assert_eq!(&resolve(24.0, &timeline, &table), table.get(Phase::Midnight));
        let almost = resolve(23.999_999, &timeline, &table);
        let midnight = table.get(Phase::Midnight);
        let close = |a: Rgb, b: Rgb| {
            (i16::from(a.r) - i16::from(b.r)).abs() <= 1
                && (i16::from(a.g) - i16::from(b.g)).abs() <= 1
                && (i16::from(a.b) - i16::from(b.b)).abs() <= 1
        };
        assert!(close(almost.editor_background, midnight.editor_background));
    }

    #[test]
    fn test_color_map_has_every_key_for_every_time() {
        let table = table();
        let timeline = Timeline::standard();
        let expected: HashSet<&str> = owned_style_keys().collect();
        let reference = to_color_map(table.get(Phase::Dawn));
        assert_eq!(reference.len(), expected.len());

        for quarter in 0..96 {
            let solar = f64::from(quarter) / 4.0;
            let map = to_color_map(&resolve(solar, &timeline, &table));
            let keys: HashSet<&str> = map.keys().map(String::as_str).collect();
            assert_eq!(keys, expected, "solar {}", solar);
            assert!(map.values().all(|v| v.len() == 7 && v.starts_with('#')));
        }
    }

    #[test]
    fn test_style_keys_are_unique_across_slots() {
        let all: Vec<&str> = owned_style_keys().collect();
        let unique: HashSet<&str> = all.iter().copied().collect();
        assert_eq!(all.len(), unique.len());
    }

    #[test]
    fn test_phase_names_follow_thresholds() {
        assert_eq!(phase_name(0.0), "Night");
        assert_eq!(phase_name(5.0), "Dawn");
        assert_eq!(phase_name(7.0), "Sunrise");
        assert_eq!(phase_name(12.0), "Midday");
        assert_eq!(phase_name(17.5), "Golden Hour");
        assert_eq!(phase_name(20.0), "Dusk");
        assert_eq!(phase_name(23.0), "Night");
    }

    #[test]
    fn test_phase_emoji_lookup() {
        assert_eq!(phase_emoji("Midday"), "☀");
        assert_eq!(phase_emoji("Night"), "🌙");
        assert_eq!(phase_emoji("teatime"), "🌗");
        for (_, name) in DISPLAY_PHASES {
            assert_ne!(phase_emoji(name), "🌗", "{} has no glyph", name);
        }
    }

    #[test]
    fn test_intensity_is_applied_after_blend() {
        let table = table();
        let timeline = Timeline::standard();
        let neutral = resolve_with_intensity(12.0, &timeline, &table, Intensity::NEUTRAL);
        assert_eq!(neutral, resolve(12.0, &timeline, &table));

        let grey = resolve_with_intensity(12.0, &timeline, &table, Intensity::new(0));
        assert_eq!(grey.accent.r, grey.accent.g);
        assert_eq!(grey.accent.g, grey.accent.b);
    }
}
