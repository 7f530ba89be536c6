//! Preview coordinator
//!
//! A settings surface sends preview requests (a phase plus a bg/fg/accent
//! triple) while the user scrubs through colors. Each request suspends the
//! scheduler and re-arms a cooldown; when the cooldown runs out without a new
//! request the scheduler resumes. Previews always write, regardless of what
//! the scheduler last applied.

use crate::color::{hex_to_rgb, Rgb};
use crate::palette::{PaletteTable, Phase, Slot};
use crate::resolver::{insert_slot, to_color_map, ColorMap};
use crate::scheduler::UpdateScheduler;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(3000);

/// Colors as they arrive from the host; any of them may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewColors {
    #[serde(default)]
    pub bg: Option<String>,
    #[serde(default)]
    pub fg: Option<String>,
    #[serde(default)]
    pub accent: Option<String>,
}

/// A raw preview request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewRequest {
    /// Phase whose palette fills the slots the triple doesn't cover
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub colors: PreviewColors,
}

/// Why a preview request was ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewRejection {
    Missing(&'static str),
}

impl fmt::Display for PreviewRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(field) => write!(f, "preview is missing '{}'", field),
        }
    }
}

impl std::error::Error for PreviewRejection {}

/// A complete, parsed preview. Equality is structural, which is what the
/// in-flight duplicate check compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidPreview {
    pub phase: Option<Phase>,
    pub bg: Rgb,
    pub fg: Rgb,
    pub accent: Rgb,
}

impl ValidPreview {
    /// Check that the triple is fully populated.
    ///
    /// Malformed hex falls back to black like any other color parse; an
    /// unknown phase name previews the triple on its own.
    pub fn from_request(request: &PreviewRequest) -> Result<Self, PreviewRejection> {
        fn field<'a>(
            value: &'a Option<String>,
            name: &'static str,
        ) -> Result<&'a str, PreviewRejection> {
            match value.as_deref().map(str::trim) {
                Some(v) if !v.is_empty() => Ok(v),
                _ => Err(PreviewRejection::Missing(name)),
            }
        }

        let bg = field(&request.colors.bg, "bg")?;
        let fg = field(&request.colors.fg, "fg")?;
        let accent = field(&request.colors.accent, "accent")?;

        let phase = request.phase.as_deref().and_then(|name| {
            let phase = Phase::parse(name);
            if phase.is_none() {
                tracing::debug!("Unknown preview phase '{}'", name);
            }
            phase
        });

        Ok(Self {
            phase,
            bg: hex_to_rgb(bg),
            fg: hex_to_rgb(fg),
            accent: hex_to_rgb(accent),
        })
    }

    /// Editor colors for this preview. With a known phase the whole phase
    /// palette is written and the triple replaces its background, foreground
    /// and accent; without one only the triple's keys are written.
    pub fn to_color_map(&self, table: &PaletteTable) -> ColorMap {
        match self.phase {
            Some(phase) => {
                let mut palette = *table.get(phase);
                palette.set(Slot::EditorBackground, self.bg);
                palette.set(Slot::EditorForeground, self.fg);
                palette.set(Slot::Accent, self.accent);
                to_color_map(&palette)
            }
            None => {
                let mut map = ColorMap::new();
                insert_slot(&mut map, Slot::EditorBackground, &self.bg.to_hex());
                insert_slot(&mut map, Slot::EditorForeground, &self.fg.to_hex());
                insert_slot(&mut map, Slot::Accent, &self.accent.to_hex());
                map
            }
        }
    }
}

/// Outcome of `PreviewCoordinator::begin`
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewDecision {
    Rejected(PreviewRejection),
    /// Identical to the preview being written right now
    Duplicate,
    Apply(ValidPreview),
}

// ─────────────────────────────────────────────────────────────────────────────
// Coordinator
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct PreviewCoordinator {
    cooldown: Duration,
    /// When the scheduler gets the colors back; `None` when not previewing
    deadline: Option<Instant>,
    in_flight: Option<ValidPreview>,
}

impl Default for PreviewCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl PreviewCoordinator {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            deadline: None,
            in_flight: None,
        }
    }

    pub fn set_cooldown(&mut self, cooldown: Duration) {
        self.cooldown = cooldown;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Handle a preview request: suspend the scheduler and re-arm the cooldown.
    ///
    /// Rejected requests change nothing. Duplicates of the in-flight preview
    /// still count as activity and push the cooldown out.
    pub fn begin(
        &mut self,
        request: &PreviewRequest,
        now: Instant,
        scheduler: &mut UpdateScheduler,
    ) -> PreviewDecision {
        let preview = match ValidPreview::from_request(request) {
            Ok(preview) => preview,
            Err(rejection) => {
                tracing::debug!("Ignoring preview: {}", rejection);
                return PreviewDecision::Rejected(rejection);
            }
        };

        scheduler.suspend();
        self.deadline = Some(now + self.cooldown);

        if self.in_flight == Some(preview) {
            return PreviewDecision::Duplicate;
        }
        self.in_flight = Some(preview);
        PreviewDecision::Apply(preview)
    }

    /// True if `request` is structurally the preview currently being written
    pub fn is_in_flight(&self, request: &PreviewRequest) -> bool {
        match (&self.in_flight, ValidPreview::from_request(request)) {
            (Some(current), Ok(preview)) => *current == preview,
            _ => false,
        }
    }

    /// Push the cooldown out without writing anything
    pub fn rearm(&mut self, now: Instant) {
        if self.deadline.is_some() {
            self.deadline = Some(now + self.cooldown);
        }
    }

    /// The write for the current preview finished (either way)
    pub fn finish(&mut self) {
        self.in_flight = None;
    }

    /// Resume the scheduler if the cooldown has run out. Returns true when
    /// the preview ended on this call.
    pub fn expire(&mut self, now: Instant, scheduler: &mut UpdateScheduler) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                scheduler.resume();
                true
            }
            _ => false,
        }
    }

    /// Drop any preview state and hand the colors back immediately
    pub fn cancel(&mut self, scheduler: &mut UpdateScheduler) {
        if self.deadline.take().is_some() {
            scheduler.resume();
        }
        self.in_flight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::StylePack;
    use crate::scheduler::SchedulerState;

    fn request(phase: Option<&str>, bg: &str) -> PreviewRequest {
        PreviewRequest {
            phase: phase.map(str::to_string),
            colors: PreviewColors {
                bg: Some(bg.to_string()),
                fg: Some("#e0e0e0".to_string()),
                accent: Some("#ff8800".to_string()),
            },
        }
    }

    #[test]
    fn test_incomplete_triple_is_rejected() {
        let mut coordinator = PreviewCoordinator::default();
        let mut scheduler = UpdateScheduler::new();

        let mut missing_fg = request(None, "#101010");
        missing_fg.colors.fg = None;
        assert_eq!(
            coordinator.begin(&missing_fg, Instant::now(), &mut scheduler),
            PreviewDecision::Rejected(PreviewRejection::Missing("fg"))
        );

        let mut blank_accent = request(None, "#101010");
        blank_accent.colors.accent = Some("  ".to_string());
        assert!(matches!(
            coordinator.begin(&blank_accent, Instant::now(), &mut scheduler),
            PreviewDecision::Rejected(PreviewRejection::Missing("accent"))
        ));

        // Nothing changed
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(coordinator.deadline(), None);
    }

    #[test]
    fn test_requests_within_cooldown_keep_scheduler_suspended() {
        let cooldown = Duration::from_millis(1000);
        let mut coordinator = PreviewCoordinator::new(cooldown);
        let mut scheduler = UpdateScheduler::new();
        let t0 = Instant::now();

        assert!(matches!(
            coordinator.begin(&request(Some("dawn"), "#101010"), t0, &mut scheduler),
            PreviewDecision::Apply(_)
        ));
        coordinator.finish();
        assert_eq!(scheduler.state(), SchedulerState::Suspended);

        // Second request halfway through the cooldown
        let t1 = t0 + cooldown / 2;
        assert!(!coordinator.expire(t1, &mut scheduler));
        coordinator.begin(&request(Some("dawn"), "#202020"), t1, &mut scheduler);
        coordinator.finish();

        // Past the first deadline, before the second: still suspended
        let between = t0 + cooldown + Duration::from_millis(100);
        assert!(!coordinator.expire(between, &mut scheduler));
        assert_eq!(scheduler.state(), SchedulerState::Suspended);

        // Second deadline
        assert!(coordinator.expire(t1 + cooldown, &mut scheduler));
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(coordinator.deadline(), None);
    }

    #[test]
    fn test_expiry_clears_error_count() {
        let mut coordinator = PreviewCoordinator::new(Duration::from_millis(10));
        let mut scheduler = UpdateScheduler::new();
        scheduler.record_failure();
        scheduler.record_failure();

        let t0 = Instant::now();
        coordinator.begin(&request(None, "#101010"), t0, &mut scheduler);
        assert!(coordinator.expire(t0 + Duration::from_millis(10), &mut scheduler));
        assert_eq!(scheduler.consecutive_errors(), 0);
    }

    #[test]
    fn test_identical_preview_in_flight_is_dropped() {
        let mut coordinator = PreviewCoordinator::default();
        let mut scheduler = UpdateScheduler::new();
        let now = Instant::now();
        let req = request(Some("dusk"), "#101010");

        assert!(matches!(
            coordinator.begin(&req, now, &mut scheduler),
            PreviewDecision::Apply(_)
        ));
        assert!(coordinator.is_in_flight(&req));
        assert!(!coordinator.is_in_flight(&request(Some("dusk"), "#101011")));
        assert_eq!(
            coordinator.begin(&req, now, &mut scheduler),
            PreviewDecision::Duplicate
        );

        // Once written, the same request applies again
        coordinator.finish();
        assert!(!coordinator.is_in_flight(&req));
        assert!(matches!(
            coordinator.begin(&req, now, &mut scheduler),
            PreviewDecision::Apply(_)
        ));
    }

    #[test]
    fn test_phase_preview_writes_full_palette() {
        let table = PaletteTable::bundled(StylePack::Vivid);
        let req = request(Some("Golden-Hour"), "#123456");
        let preview = ValidPreview::from_request(&req).expect("valid preview");
        assert_eq!(preview.phase, Some(Phase::GoldenHour));

        let map = preview.to_color_map(&table);
        assert_eq!(
            map.len(),
            to_color_map(table.get(Phase::GoldenHour)).len()
        );
        assert_eq!(map.get("editor.background").map(String::as_str), Some("#123456"));
        assert_eq!(map.get("focusBorder").map(String::as_str), Some("#ff8800"));
        assert_eq!(
            map.get("sideBar.background"),
            Some(&table.get(Phase::GoldenHour).sidebar.to_hex())
        );
    }

    #[test]
    fn test_phaseless_preview_writes_triple_only() {
        let table = PaletteTable::bundled(StylePack::Vivid);
        let preview = ValidPreview::from_request(&request(Some("teatime"), "#123456"))
            .expect("valid preview");
        assert_eq!(preview.phase, None);

        let map = preview.to_color_map(&table);
        assert!(map.contains_key("editor.background"));
        assert!(map.contains_key("editor.foreground"));
        assert!(map.contains_key("button.background"));
        assert!(!map.contains_key("sideBar.background"));
    }

    #[test]
    fn test_malformed_hex_falls_back_to_black() {
        let preview = ValidPreview::from_request(&request(None, "not-a-color"))
            .expect("populated triple is valid");
        assert_eq!(preview.bg, Rgb::BLACK);
    }

    #[test]
    fn test_cancel_resumes_immediately() {
        let mut coordinator = PreviewCoordinator::default();
        let mut scheduler = UpdateScheduler::new();
        coordinator.begin(&request(None, "#101010"), Instant::now(), &mut scheduler);
        coordinator.cancel(&mut scheduler);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(coordinator.deadline(), None);
    }

    #[test]
    fn test_request_json_shape() {
        let json = r##"{"phase":"dawn","colors":{"bg":"#101010","fg":"#eeeeee"}}"##;
        let parsed: PreviewRequest = serde_json::from_str(json).expect("parse");
        assert_eq!(parsed.colors.accent, None);
        assert!(ValidPreview::from_request(&parsed).is_err());
    }
}
