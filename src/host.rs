//! Host surface: the editor-side shim that drives the daemon
//!
//! The host writes one JSON command per line to our stdin and reads one JSON
//! event per line from our stdout. Logs never go to stdout.
//!
//! ```text
//! → {"command":"force_update"}
//! → {"command":"apply_preview","phase":"dawn","colors":{"bg":"#1b1d2b","fg":"#e6e0d8","accent":"#f29e74"}}
//! ← {"event":"status","glyph":"🌅","tooltip":"Sunrise · sunrise 06:41 · sunset 19:12"}
//! ← {"event":"notification","message":"🌅 Sunrise: editor colors updated"}
//! ```

use crate::preview::PreviewRequest;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Commands the host can send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum HostCommand {
    ForceUpdate,
    ShowSunTimes,
    ToggleEnabled,
    ResetColors,
    OpenSettings,
    ConfigChanged,
    ApplyPreview(PreviewRequest),
    Shutdown,
}

/// Events for the host to act on
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    /// Show or refresh the status indicator
    Status { glyph: String, tooltip: String },
    /// Withdraw the status indicator
    StatusHidden,
    Notification { message: String },
    Warning { message: String },
    SunTimes(SunTimesReport),
    /// Open the config file in the editor
    OpenSettings { path: PathBuf },
}

/// Answer to `show_sun_times`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunTimesReport {
    pub latitude: f64,
    pub longitude: f64,
    /// `HH:MM`, absent during polar day or night
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub local_time: String,
    pub solar_time: String,
    pub phase: String,
    pub glyph: String,
}

impl SunTimesReport {
    /// Plain-text rendering used by notifications and the CLI
    pub fn summary(&self) -> String {
        let sun = match (&self.sunrise, &self.sunset) {
            (Some(rise), Some(set)) => format!("Sunrise {} · Sunset {}", rise, set),
            _ => "No sunrise/sunset today".to_string(),
        };
        format!(
            "{} {} · {} · solar time {} (local {})",
            self.glyph, self.phase, sun, self.solar_time, self.local_time
        )
    }
}

/// Where engine events go
pub trait HostSurface: Send {
    fn emit(&mut self, event: HostEvent);
}

// ─────────────────────────────────────────────────────────────────────────────
// Surfaces
// ─────────────────────────────────────────────────────────────────────────────

/// JSON lines on stdout, for a host process
#[derive(Debug, Default)]
pub struct JsonLinesSurface;

impl HostSurface for JsonLinesSurface {
    fn emit(&mut self, event: HostEvent) {
        let line = match serde_json::to_string(&event) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Failed to encode host event: {}", e);
                return;
            }
        };
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", line).and_then(|_| stdout.flush()) {
            tracing::warn!("Failed to write host event: {}", e);
        }
    }
}

/// Human-readable lines on stdout, for one-shot CLI commands
#[derive(Debug, Default)]
pub struct ConsoleSurface;

impl HostSurface for ConsoleSurface {
    fn emit(&mut self, event: HostEvent) {
        match event {
            HostEvent::Status { glyph, tooltip } => println!("{} {}", glyph, tooltip),
            HostEvent::StatusHidden => println!("Solar theme is disabled"),
            HostEvent::Notification { message } => println!("{}", message),
            HostEvent::Warning { message } => eprintln!("warning: {}", message),
            HostEvent::SunTimes(report) => println!("{}", report.summary()),
            HostEvent::OpenSettings { path } => println!("{}", path.display()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Command input
// ─────────────────────────────────────────────────────────────────────────────

/// Parse one protocol line. Blank lines are `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<HostCommand>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

/// Forward commands from `input` into the engine channel.
///
/// Malformed lines are logged and skipped. End of input is treated as a
/// shutdown request: the host went away.
pub fn forward_commands(input: impl BufRead, tx: &mpsc::Sender<HostCommand>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Host input error: {}", e);
                break;
            }
        };
        match parse_command(&line) {
            Ok(Some(command)) => {
                tracing::trace!("Host command: {:?}", command);
                if tx.blocking_send(command).is_err() {
                    return; // engine gone
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Ignoring malformed host command {:?}: {}", line, e),
        }
    }

    tracing::info!("Host input closed, shutting down");
    let _ = tx.blocking_send(HostCommand::Shutdown);
}

/// Read stdin on its own thread. A plain thread rather than the runtime's
/// blocking pool: runtime shutdown would otherwise wait on a pending read.
pub fn spawn_stdin_reader(
    tx: mpsc::Sender<HostCommand>,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("host-input".to_string())
        .spawn(move || forward_commands(std::io::stdin().lock(), &tx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_simple_commands() {
        assert_eq!(
            parse_command(r#"{"command":"force_update"}"#).ok().flatten(),
            Some(HostCommand::ForceUpdate)
        );
        assert_eq!(
            parse_command(r#"  {"command":"show_sun_times"}  "#).ok().flatten(),
            Some(HostCommand::ShowSunTimes)
        );
        assert_eq!(
            parse_command(r#"{"command":"shutdown"}"#).ok().flatten(),
            Some(HostCommand::Shutdown)
        );
        assert!(matches!(parse_command("   "), Ok(None)));
    }

    #[test]
    fn test_parses_preview_command() {
        let line = r##"{"command":"apply_preview","phase":"dusk","colors":{"bg":"#101010","fg":"#f0f0f0","accent":"#ff0000"}}"##;
        let Ok(Some(HostCommand::ApplyPreview(request))) = parse_command(line) else {
            panic!("expected preview command");
        };
        assert_eq!(request.phase.as_deref(), Some("dusk"));
        assert_eq!(request.colors.accent.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_preview_without_colors_still_parses() {
        // Validation happens in the preview coordinator, not here
        let parsed = parse_command(r#"{"command":"apply_preview"}"#);
        assert!(matches!(parsed, Ok(Some(HostCommand::ApplyPreview(_)))));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_command("not json").is_err());
        assert!(parse_command(r#"{"command":"explode"}"#).is_err());
        assert!(parse_command(r#"{"cmd":"force_update"}"#).is_err());
    }

    #[test]
    fn test_forward_skips_garbage_and_ends_with_shutdown() {
        let input = std::io::Cursor::new(
            "{\"command\":\"force_update\"}\n\nnonsense\n{\"command\":\"toggle_enabled\"}\n",
        );
        let (tx, mut rx) = mpsc::channel(8);
        forward_commands(input, &tx);
        drop(tx);

        let mut received = Vec::new();
        while let Ok(command) = rx.try_recv() {
            received.push(command);
        }
        assert_eq!(
            received,
            vec![
                HostCommand::ForceUpdate,
                HostCommand::ToggleEnabled,
                HostCommand::Shutdown
            ]
        );
    }

    #[test]
    fn test_event_wire_format() {
        let json = serde_json::to_value(HostEvent::Status {
            glyph: "☀".to_string(),
            tooltip: "Midday".to_string(),
        })
        .expect("encode");
        assert_eq!(json["event"], "status");
        assert_eq!(json["glyph"], "☀");

        let json = serde_json::to_value(HostEvent::StatusHidden).expect("encode");
        assert_eq!(json, serde_json::json!({"event": "status_hidden"}));

        let report = SunTimesReport {
            latitude: 1.0,
            longitude: 2.0,
            sunrise: None,
            sunset: None,
            local_time: "12:00".to_string(),
            solar_time: "12:00".to_string(),
            phase: "Midday".to_string(),
            glyph: "☀".to_string(),
        };
        let json = serde_json::to_value(HostEvent::SunTimes(report)).expect("encode");
        assert_eq!(json["event"], "sun_times");
        assert_eq!(json["phase"], "Midday");
        assert!(json["sunrise"].is_null());
    }

    #[test]
    fn test_summary_mentions_polar_days() {
        let mut report = SunTimesReport {
            latitude: 78.2,
            longitude: 15.6,
            sunrise: None,
            sunset: None,
            local_time: "01:00".to_string(),
            solar_time: "01:00".to_string(),
            phase: "Night".to_string(),
            glyph: "🌙".to_string(),
        };
        assert!(report.summary().contains("No sunrise/sunset"));
        report.sunrise = Some("06:10".to_string());
        report.sunset = Some("18:20".to_string());
        assert!(report.summary().contains("Sunrise 06:10 · Sunset 18:20"));
    }
}
