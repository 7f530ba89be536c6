//! Engine: the long-lived coordinator
//!
//! Owns the scheduler, the preview coordinator and every adapter, and runs
//! the single event loop:
//!
//! ```text
//!   update ticker ──┐
//!   preview cooldown┤
//!   config poll ────┼──▶ select! ──▶ compute (sync) ──▶ write (blocking pool, timeout)
//!   host commands ──┘                                        │
//!                                   commands arriving ◀──────┘ deferred / deduped
//! ```
//!
//! Colors are always computed to completion before a write starts. Only one
//! write is in flight at a time; commands that arrive meanwhile are queued,
//! except a preview identical to the one being written, which is dropped.

use crate::config::{Config, ConfigStore};
use crate::geo::{self, GeoLocation, GeoLocator};
use crate::host::{HostCommand, HostEvent, HostSurface, SunTimesReport};
use crate::palette::{PaletteTable, Timeline};
use crate::preview::{PreviewCoordinator, PreviewDecision, PreviewRequest};
use crate::resolver::{
    owned_style_keys, phase_emoji, phase_name, resolve_with_intensity, to_color_map, ColorMap,
};
use crate::scheduler::{Computed, TickDecision, TickRequest, UpdateScheduler};
use crate::sink::StyleSink;
use crate::solar::{format_hours, SolarReading, SunTimesProvider};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Upper bound for one style write
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// How often the config file is checked for outside edits
pub const CONFIG_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Source of "now", swappable for tests
pub type Clock = Box<dyn Fn() -> DateTime<Local> + Send>;

/// Collaborators the engine drives
pub struct EngineParts {
    pub store: Box<dyn ConfigStore>,
    pub sink: Arc<dyn StyleSink>,
    pub surface: Box<dyn HostSurface>,
    pub sun: Box<dyn SunTimesProvider>,
    pub clock: Clock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Disabled,
    Suspended,
    Unchanged,
    Applied,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewOutcome {
    Rejected,
    /// Identical preview already being written
    Dropped,
    Applied,
    Failed,
}

/// Monotonic now on tokio's clock (follows a paused test clock)
fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}

async fn sleep_until(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending::<()>().await,
    }
}

fn palette_table(config: &Config) -> PaletteTable {
    PaletteTable::bundled(config.solar.style_pack).with_overrides(&config.palettes)
}

async fn recv(commands: &mut Option<mpsc::Receiver<HostCommand>>) -> Option<HostCommand> {
    match commands {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

pub struct Engine {
    store: Box<dyn ConfigStore>,
    sink: Arc<dyn StyleSink>,
    surface: Box<dyn HostSurface>,
    sun: Box<dyn SunTimesProvider>,
    clock: Clock,
    timeline: Timeline,
    /// Configuration as of the last read
    config: Config,
    /// Style pack with the config's overrides, rebuilt when either changes
    table: PaletteTable,
    scheduler: UpdateScheduler,
    preview: PreviewCoordinator,
    commands: Option<mpsc::Receiver<HostCommand>>,
    /// Commands that arrived while a write was in flight
    deferred: VecDeque<HostCommand>,
    /// Last status event sent, to skip identical repeats
    status: Option<HostEvent>,
    running: bool,
}

impl Engine {
    pub fn new(parts: EngineParts) -> Self {
        let EngineParts {
            mut store,
            sink,
            surface,
            sun,
            clock,
        } = parts;
        let config = store.load();
        let preview = PreviewCoordinator::new(config.preview.cooldown());
        let table = palette_table(&config);

        Self {
            store,
            sink,
            surface,
            sun,
            clock,
            timeline: Timeline::standard(),
            config,
            table,
            scheduler: UpdateScheduler::new(),
            preview,
            commands: None,
            deferred: VecDeque::new(),
            status: None,
            running: false,
        }
    }

    /// Receive host commands from `commands` (needed by `run`)
    pub fn with_commands(mut self, commands: mpsc::Receiver<HostCommand>) -> Self {
        self.commands = Some(commands);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Start the update timer; the first tick fires right away
    pub fn start(&mut self) {
        let config = self.store.load();
        self.set_config(config);
        self.preview.set_cooldown(self.config.preview.cooldown());
        // Whatever the editor shows now was not written by this process
        self.scheduler.invalidate_snapshot();
        self.scheduler.start(self.config.solar.update_interval());
        self.running = true;

        tracing::info!(
            "Engine started: every {}s, pack '{}', at ({:.4}, {:.4}){}",
            self.config.solar.update_interval_secs,
            self.table.name(),
            self.config.solar.latitude,
            self.config.solar.longitude,
            if self.config.solar.enabled {
                ""
            } else {
                " (disabled)"
            }
        );
    }

    /// Stop the timer and drop any preview or queued work
    pub fn stop(&mut self) {
        self.scheduler.stop();
        self.preview.cancel(&mut self.scheduler);
        self.deferred.clear();
        self.running = false;
        tracing::info!("Engine stopped");
    }

    /// Event loop. Returns after a shutdown command or when the command
    /// channel closes.
    pub async fn run(&mut self) -> Result<()> {
        self.start();

        let mut config_poll = tokio::time::interval(CONFIG_POLL_INTERVAL);
        config_poll.set_missed_tick_behavior(MissedTickBehavior::Skip);
        config_poll.tick().await; // immediate first tick

        loop {
            if let Some(command) = self.deferred.pop_front() {
                if self.handle(command).await.is_break() {
                    break;
                }
                continue;
            }

            let deadline = self.preview.deadline();
            tokio::select! {
                _ = self.scheduler.next_tick() => {
                    self.update(false).await;
                }
                _ = sleep_until(deadline) => {
                    self.expire_preview().await;
                }
                _ = config_poll.tick() => {
                    if self.store.changed() {
                        tracing::info!("Config file changed");
                        self.reload_config().await;
                    }
                }
                command = recv(&mut self.commands) => match command {
                    Some(command) => {
                        if self.handle(command).await.is_break() {
                            break;
                        }
                    }
                    None => {
                        tracing::info!("Command channel closed");
                        break;
                    }
                },
            }
        }

        self.stop();
        Ok(())
    }

    async fn handle(&mut self, command: HostCommand) -> ControlFlow<()> {
        tracing::debug!("Handling {:?}", command);
        match command {
            HostCommand::ForceUpdate => {
                self.update(true).await;
            }
            HostCommand::ShowSunTimes => {
                self.show_sun_times();
            }
            HostCommand::ToggleEnabled => {
                // Failure already reported to the host
                let _ = self.toggle_enabled().await;
            }
            HostCommand::ResetColors => {
                let _ = self.reset_colors().await;
            }
            HostCommand::OpenSettings => self.open_settings(),
            HostCommand::ConfigChanged => {
                self.reload_config().await;
            }
            HostCommand::ApplyPreview(request) => {
                self.apply_preview(request).await;
            }
            HostCommand::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scheduled updates
    // ─────────────────────────────────────────────────────────────────────────

    /// Adopt a freshly read config
    fn set_config(&mut self, config: Config) {
        if config.solar.style_pack != self.config.solar.style_pack
            || config.palettes != self.config.palettes
        {
            self.table = palette_table(&config);
        }
        self.config = config;
    }

    fn reading(&self) -> SolarReading {
        SolarReading::at(
            (self.clock)(),
            self.config.solar.latitude,
            self.config.solar.longitude,
            self.sun.as_ref(),
        )
    }

    /// One scheduler tick. `force` bypasses both the preview suspension and
    /// the unchanged-colors check.
    pub async fn update(&mut self, force: bool) -> UpdateOutcome {
        let config = self.store.load();
        self.set_config(config);
        self.sync_interval();

        let solar = self.config.solar.clone();
        let reading = if solar.enabled {
            let reading = self.reading();
            self.show_status(&reading);
            Some(reading)
        } else {
            self.hide_status();
            None
        };

        let table = &self.table;
        let timeline = &self.timeline;
        let request = TickRequest {
            enabled: solar.enabled,
            force,
        };
        let decision = self.scheduler.tick(request, || {
            let solar_time = reading.map(|r| r.solar).unwrap_or_default();
            let palette = resolve_with_intensity(solar_time, timeline, table, solar.intensity());
            Computed {
                colors: to_color_map(&palette),
                phase: phase_name(solar_time),
            }
        });

        let pending = match decision {
            TickDecision::Disabled => return UpdateOutcome::Disabled,
            TickDecision::Suspended => {
                tracing::trace!("Tick skipped, preview active");
                return UpdateOutcome::Suspended;
            }
            TickDecision::Unchanged => {
                tracing::trace!("Tick skipped, colors unchanged");
                return UpdateOutcome::Unchanged;
            }
            TickDecision::Apply(pending) => pending,
        };

        match self.write(pending.colors.clone()).await {
            Ok(()) => {
                tracing::debug!(
                    "Applied {} colors for {}{}",
                    pending.colors.len(),
                    pending.phase,
                    if pending.force { " (forced)" } else { "" }
                );
                if self
                    .scheduler
                    .record_success(&pending, solar.show_notifications)
                {
                    let glyph = phase_emoji(pending.phase);
                    let message = if pending.force {
                        format!("{} {}: editor colors updated", glyph, pending.phase)
                    } else {
                        format!("{} {} has begun", glyph, pending.phase)
                    };
                    self.surface.emit(HostEvent::Notification { message });
                }
                UpdateOutcome::Applied
            }
            Err(e) => {
                let report = self.scheduler.record_failure();
                if report.log {
                    tracing::error!(
                        "Failed to apply colors ({} in a row): {:#}",
                        report.consecutive,
                        e
                    );
                } else {
                    tracing::debug!(
                        "Failed to apply colors ({} in a row): {:#}",
                        report.consecutive,
                        e
                    );
                }
                if report.warn {
                    self.surface.emit(HostEvent::Warning {
                        message: format!(
                            "Solar theme could not update editor colors ({} failures in a row): {:#}",
                            report.consecutive, e
                        ),
                    });
                }
                UpdateOutcome::Failed
            }
        }
    }

    /// Rebuild the timer if the configured interval moved
    fn sync_interval(&mut self) {
        if !self.running {
            return;
        }
        let interval = self.config.solar.update_interval();
        if self.scheduler.period() != Some(interval) {
            tracing::debug!("Update interval now {}s", interval.as_secs());
            self.scheduler.rebuild(interval);
        }
    }

    /// Re-read config, rebuild the timer and recompute
    pub async fn reload_config(&mut self) -> UpdateOutcome {
        let config = self.store.load();
        self.set_config(config);
        self.preview.set_cooldown(self.config.preview.cooldown());
        if self.running {
            self.scheduler.rebuild(self.config.solar.update_interval());
        }
        tracing::info!(
            "Config reloaded: {} every {}s",
            if self.config.solar.enabled {
                "enabled"
            } else {
                "disabled"
            },
            self.config.solar.update_interval_secs
        );
        self.update(false).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Previews
    // ─────────────────────────────────────────────────────────────────────────

    /// Write a preview right away and hold off scheduled updates
    pub async fn apply_preview(&mut self, request: PreviewRequest) -> PreviewOutcome {
        let preview = match self.preview.begin(&request, now(), &mut self.scheduler) {
            PreviewDecision::Rejected(_) => return PreviewOutcome::Rejected,
            PreviewDecision::Duplicate => return PreviewOutcome::Dropped,
            PreviewDecision::Apply(preview) => preview,
        };

        let colors = preview.to_color_map(&self.table);
        // The editor will no longer show what the scheduler last applied
        self.scheduler.invalidate_snapshot();

        let result = self.write(colors).await;
        self.preview.finish();
        match result {
            Ok(()) => PreviewOutcome::Applied,
            Err(e) => {
                tracing::warn!("Preview write failed: {:#}", e);
                PreviewOutcome::Failed
            }
        }
    }

    /// End the preview if its cooldown ran out, then restore solar colors
    pub async fn expire_preview(&mut self) {
        if self.preview.expire(now(), &mut self.scheduler) {
            tracing::debug!("Preview ended, restoring solar colors");
            self.update(false).await;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────

    async fn write(&mut self, colors: ColorMap) -> Result<()> {
        let sink = Arc::clone(&self.sink);
        self.run_blocking(move || sink.apply(&colors)).await
    }

    /// Run a sink call on the blocking pool, bounded by `WRITE_TIMEOUT`.
    /// Host commands keep flowing meanwhile (see `defer`).
    async fn run_blocking<F>(&mut self, op: F) -> Result<()>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        let task = async move {
            match tokio::time::timeout(WRITE_TIMEOUT, tokio::task::spawn_blocking(op)).await {
                Ok(Ok(result)) => result,
                Ok(Err(e)) => Err(anyhow!("style write task failed: {}", e)),
                Err(_) => Err(anyhow!(
                    "style write timed out after {}s",
                    WRITE_TIMEOUT.as_secs()
                )),
            }
        };
        tokio::pin!(task);

        loop {
            let Some(commands) = self.commands.as_mut() else {
                return task.await;
            };
            tokio::select! {
                result = &mut task => return result,
                command = commands.recv() => match command {
                    Some(command) => self.defer(command),
                    None => {
                        // Closed input means shutdown, same as in `run`
                        self.commands = None;
                        self.deferred.push_back(HostCommand::Shutdown);
                    }
                },
            }
        }
    }

    /// Queue a command that arrived mid-write
    fn defer(&mut self, command: HostCommand) {
        if let HostCommand::ApplyPreview(request) = &command {
            if self.preview.is_in_flight(request) {
                tracing::debug!("Dropping preview identical to the one being written");
                self.preview.rearm(now());
                return;
            }
        }
        tracing::trace!("Deferring {:?} until the current write finishes", command);
        self.deferred.push_back(command);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Report today's sunrise/sunset and where we are on the timeline
    pub fn show_sun_times(&mut self) -> SunTimesReport {
        let config = self.store.load();
        self.set_config(config);
        let reading = self.reading();
        let phase = phase_name(reading.solar);

        let report = SunTimesReport {
            latitude: self.config.solar.latitude,
            longitude: self.config.solar.longitude,
            sunrise: reading
                .sun_times
                .map(|t| t.sunrise.format("%H:%M").to_string()),
            sunset: reading
                .sun_times
                .map(|t| t.sunset.format("%H:%M").to_string()),
            local_time: reading.now.format("%H:%M").to_string(),
            solar_time: format_hours(reading.solar),
            phase: phase.to_string(),
            glyph: phase_emoji(phase).to_string(),
        };
        self.surface.emit(HostEvent::SunTimes(report.clone()));
        report
    }

    /// Flip `solar.enabled` in the persisted config. Returns the new state.
    pub async fn toggle_enabled(&mut self) -> Result<bool> {
        let mut config = self.store.load();
        config.solar.enabled = !config.solar.enabled;
        if let Err(e) = self.store.save(&config) {
            self.warn(format!("Could not save config: {:#}", e));
            return Err(e);
        }

        let enabled = config.solar.enabled;
        self.surface.emit(HostEvent::Notification {
            message: if enabled {
                "Solar theme enabled".to_string()
            } else {
                "Solar theme disabled".to_string()
            },
        });
        if enabled {
            self.scheduler.invalidate_snapshot();
        }
        self.reload_config().await;
        Ok(enabled)
    }

    /// Remove every color this program writes and turn the theme off, so the
    /// next tick doesn't put them straight back
    pub async fn reset_colors(&mut self) -> Result<()> {
        self.preview.cancel(&mut self.scheduler);

        let mut config = self.store.load();
        if config.solar.enabled {
            config.solar.enabled = false;
            if let Err(e) = self.store.save(&config) {
                tracing::warn!("Could not disable solar theme: {:#}", e);
            }
        }
        self.set_config(config);
        self.hide_status();

        let keys: Vec<&'static str> = owned_style_keys().collect();
        let sink = Arc::clone(&self.sink);
        let result = self.run_blocking(move || sink.reset(&keys)).await;
        self.scheduler.invalidate_snapshot();

        match result {
            Ok(()) => {
                tracing::info!("Editor colors reset");
                self.surface.emit(HostEvent::Notification {
                    message: "Editor colors reset, solar theme disabled".to_string(),
                });
                Ok(())
            }
            Err(e) => {
                self.warn(format!("Could not reset editor colors: {:#}", e));
                Err(e)
            }
        }
    }

    /// Ask the host to open the config file
    pub fn open_settings(&mut self) {
        let path: Option<PathBuf> = self
            .store
            .path()
            .map(PathBuf::from)
            .or_else(Config::config_path);
        match path {
            Some(path) => self.surface.emit(HostEvent::OpenSettings { path }),
            None => self.warn("No config file location available".to_string()),
        }
    }

    /// First-run location detection. Skipped once the location has been
    /// initialized unless `force` is set.
    pub async fn locate(&mut self, locator: &GeoLocator, force: bool) -> Option<GeoLocation> {
        if self.store.load().location_initialized && !force {
            return None;
        }
        let found = locator.lookup().await;
        self.record_location(found)
    }

    /// Persist a lookup result (or the fact that one was attempted)
    pub fn record_location(&mut self, found: Option<GeoLocation>) -> Option<GeoLocation> {
        let mut config = self.store.load();
        let moved = geo::record_detection(&mut config, found.as_ref());
        if let Err(e) = self.store.save(&config) {
            tracing::warn!("Could not save location: {:#}", e);
        }
        self.set_config(config);

        match &found {
            Some(location) if moved => self.surface.emit(HostEvent::Notification {
                message: format!("Location set to {}", location),
            }),
            Some(_) => {}
            None => tracing::info!(
                "No location detected, using ({:.4}, {:.4})",
                self.config.solar.latitude,
                self.config.solar.longitude
            ),
        }
        found
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Host output
    // ─────────────────────────────────────────────────────────────────────────

    fn show_status(&mut self, reading: &SolarReading) {
        let phase = phase_name(reading.solar);
        let sun = match &reading.sun_times {
            Some(t) => format!(
                "sunrise {} · sunset {}",
                t.sunrise.format("%H:%M"),
                t.sunset.format("%H:%M")
            ),
            None => "no sunrise/sunset today".to_string(),
        };
        self.emit_status(HostEvent::Status {
            glyph: phase_emoji(phase).to_string(),
            tooltip: format!(
                "Solar theme: {} at {} · {}",
                phase,
                reading.now.format("%H:%M"),
                sun
            ),
        });
    }

    fn hide_status(&mut self) {
        self.emit_status(HostEvent::StatusHidden);
    }

    fn emit_status(&mut self, event: HostEvent) {
        if self.status.as_ref() == Some(&event) {
            return;
        }
        self.status = Some(event.clone());
        self.surface.emit(event);
    }

    fn warn(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.surface.emit(HostEvent::Warning { message });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::PreviewColors;
    use crate::scheduler::SchedulerState;
    use crate::solar::SunTimes;
    use chrono::{NaiveDate, TimeZone};
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    // ── Mocks ────────────────────────────────────────────────────────────────

    #[derive(Default)]
    struct RecordingSink {
        applied: Mutex<Vec<ColorMap>>,
        resets: Mutex<Vec<Vec<String>>>,
        fail: AtomicBool,
        delay_ms: AtomicUsize,
    }

    impl RecordingSink {
        fn applies(&self) -> usize {
            self.applied.lock().unwrap().len()
        }
    }

    impl StyleSink for RecordingSink {
        fn apply(&self, colors: &ColorMap) -> Result<()> {
            let delay = self.delay_ms.load(Ordering::SeqCst);
            if delay > 0 {
                std::thread::sleep(Duration::from_millis(delay as u64));
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(anyhow!("settings store busy"));
            }
            self.applied.lock().unwrap().push(colors.clone());
            Ok(())
        }

        fn reset(&self, keys: &[&str]) -> Result<()> {
            self.resets
                .lock()
                .unwrap()
                .push(keys.iter().map(|k| k.to_string()).collect());
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct EventLog(Arc<Mutex<Vec<HostEvent>>>);

    impl EventLog {
        fn count(&self, pred: impl Fn(&HostEvent) -> bool) -> usize {
            self.0.lock().unwrap().iter().filter(|e| pred(e)).count()
        }
        fn notifications(&self) -> usize {
            self.count(|e| matches!(e, HostEvent::Notification { .. }))
        }
        fn warnings(&self) -> usize {
            self.count(|e| matches!(e, HostEvent::Warning { .. }))
        }
    }

    impl HostSurface for EventLog {
        fn emit(&mut self, event: HostEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    #[derive(Clone)]
    struct MemoryStore {
        config: Arc<Mutex<Config>>,
        saves: Arc<AtomicUsize>,
    }

    impl MemoryStore {
        fn new(config: Config) -> Self {
            Self {
                config: Arc::new(Mutex::new(config)),
                saves: Arc::new(AtomicUsize::new(0)),
            }
        }
        fn edit(&self, f: impl FnOnce(&mut Config)) {
            f(&mut self.config.lock().unwrap());
        }
        fn get(&self) -> Config {
            self.config.lock().unwrap().clone()
        }
    }

    impl ConfigStore for MemoryStore {
        fn load(&mut self) -> Config {
            self.get()
        }
        fn save(&mut self, config: &Config) -> Result<()> {
            *self.config.lock().unwrap() = config.clone();
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        fn changed(&mut self) -> bool {
            false
        }
        fn path(&self) -> Option<&Path> {
            Some(Path::new("/tmp/suntint-test/config.toml"))
        }
    }

    /// 06:30 sunrise, 18:00 sunset every day
    struct NominalSun;

    impl SunTimesProvider for NominalSun {
        fn sun_times(&self, date: NaiveDate, _lat: f64, _lon: f64) -> Option<SunTimes> {
            let at = |h, m| date.and_hms_opt(h, m, 0)?.and_local_timezone(Local).earliest();
            Some(SunTimes {
                sunrise: at(6, 30)?,
                sunset: at(18, 0)?,
            })
        }
    }

    fn noon() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 6, 21, 12, 0, 0)
            .earliest()
            .unwrap_or_else(Local::now)
    }

    struct Harness {
        engine: Engine,
        sink: Arc<RecordingSink>,
        events: EventLog,
        store: MemoryStore,
    }

    fn harness(config: Config) -> Harness {
        let sink = Arc::new(RecordingSink::default());
        let events = EventLog::default();
        let store = MemoryStore::new(config);
        let engine = Engine::new(EngineParts {
            store: Box::new(store.clone()),
            sink: sink.clone(),
            surface: Box::new(events.clone()),
            sun: Box::new(NominalSun),
            clock: Box::new(noon),
        });
        Harness {
            engine,
            sink,
            events,
            store,
        }
    }

    fn preview_request(bg: &str) -> PreviewRequest {
        PreviewRequest {
            phase: Some("dusk".to_string()),
            colors: PreviewColors {
                bg: Some(bg.to_string()),
                fg: Some("#f0f0f0".to_string()),
                accent: Some("#ff8800".to_string()),
            },
        }
    }

    // ── Scheduled updates ────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_unchanged_colors_are_written_once() {
        let mut h = harness(Config::default());
        assert_eq!(h.engine.update(false).await, UpdateOutcome::Applied);
        assert_eq!(h.engine.update(false).await, UpdateOutcome::Unchanged);
        assert_eq!(h.engine.update(false).await, UpdateOutcome::Unchanged);
        assert_eq!(h.sink.applies(), 1);
    }

    #[tokio::test]
    async fn test_noon_resolves_to_midday_palette() {
        let mut h = harness(Config::default());
        h.engine.update(false).await;
        let applied = h.sink.applied.lock().unwrap()[0].clone();
        let table = PaletteTable::bundled(Default::default());
        let midday = to_color_map(table.get(crate::palette::Phase::Midday));
        assert_eq!(applied, midday);
    }

    #[tokio::test]
    async fn test_force_always_writes_and_notifies_when_enabled() {
        let mut h = harness(Config::default());
        h.engine.update(false).await;
        let before = h.events.notifications();

        assert_eq!(h.engine.update(true).await, UpdateOutcome::Applied);
        assert_eq!(h.engine.update(true).await, UpdateOutcome::Applied);
        assert_eq!(h.sink.applies(), 3);
        assert_eq!(h.events.notifications(), before + 2);
    }

    #[tokio::test]
    async fn test_force_without_notifications_is_silent() {
        let mut config = Config::default();
        config.solar.show_notifications = false;
        let mut h = harness(config);

        h.engine.update(true).await;
        h.engine.update(true).await;
        assert_eq!(h.sink.applies(), 2);
        assert_eq!(h.events.notifications(), 0);
    }

    #[tokio::test]
    async fn test_five_failures_warn_once() {
        let mut h = harness(Config::default());
        h.sink.fail.store(true, Ordering::SeqCst);

        for _ in 0..5 {
            assert_eq!(h.engine.update(false).await, UpdateOutcome::Failed);
        }
        assert_eq!(h.events.warnings(), 1);

        assert_eq!(h.engine.update(false).await, UpdateOutcome::Failed);
        assert_eq!(h.events.warnings(), 1);

        // Recovery resets the count
        h.sink.fail.store(false, Ordering::SeqCst);
        assert_eq!(h.engine.update(false).await, UpdateOutcome::Applied);
        assert_eq!(h.engine.scheduler.consecutive_errors(), 0);
    }

    #[tokio::test]
    async fn test_disabled_hides_status_and_writes_nothing() {
        let mut config = Config::default();
        config.solar.enabled = false;
        let mut h = harness(config);

        assert_eq!(h.engine.update(true).await, UpdateOutcome::Disabled);
        assert_eq!(h.engine.update(false).await, UpdateOutcome::Disabled);
        assert_eq!(h.sink.applies(), 0);
        // Hidden once, not on every tick
        assert_eq!(h.events.count(|e| *e == HostEvent::StatusHidden), 1);
    }

    #[tokio::test]
    async fn test_status_shows_phase_glyph() {
        let mut h = harness(Config::default());
        h.engine.update(false).await;
        h.engine.update(false).await;
        let statuses: Vec<HostEvent> = h
            .events
            .0
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, HostEvent::Status { .. }))
            .cloned()
            .collect();
        assert_eq!(statuses.len(), 1);
        let HostEvent::Status { glyph, tooltip } = &statuses[0] else {
            unreachable!()
        };
        assert_eq!(glyph, "☀");
        assert!(tooltip.contains("Midday"));
        assert!(tooltip.contains("sunrise 06:30"));
    }

    // ── Previews ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_preview_suspends_scheduled_updates() {
        let mut h = harness(Config::default());
        h.engine.update(false).await;

        let outcome = h.engine.apply_preview(preview_request("#123456")).await;
        assert_eq!(outcome, PreviewOutcome::Applied);
        assert_eq!(h.engine.scheduler.state(), SchedulerState::Suspended);
        assert_eq!(h.sink.applies(), 2);

        assert_eq!(h.engine.update(false).await, UpdateOutcome::Suspended);
        assert_eq!(h.sink.applies(), 2);

        // Forced update still goes through
        assert_eq!(h.engine.update(true).await, UpdateOutcome::Applied);
    }

    #[tokio::test]
    async fn test_incomplete_preview_is_ignored() {
        let mut h = harness(Config::default());
        let mut request = preview_request("#123456");
        request.colors.bg = None;

        assert_eq!(
            h.engine.apply_preview(request).await,
            PreviewOutcome::Rejected
        );
        assert_eq!(h.sink.applies(), 0);
        assert_eq!(h.engine.scheduler.state(), SchedulerState::Idle);
    }

    #[tokio::test]
    async fn test_preview_expiry_restores_solar_colors() {
        let mut config = Config::default();
        config.preview.cooldown_ms = 20;
        let mut h = harness(config);
        h.engine.update(false).await;
        let solar_colors = h.sink.applied.lock().unwrap()[0].clone();

        h.engine.apply_preview(preview_request("#123456")).await;
        h.engine.expire_preview().await;
        assert_eq!(h.engine.scheduler.state(), SchedulerState::Suspended);

        tokio::time::sleep(Duration::from_millis(30)).await;
        h.engine.expire_preview().await;
        assert_eq!(h.engine.scheduler.state(), SchedulerState::Idle);

        let applied = h.sink.applied.lock().unwrap();
        assert_eq!(applied.len(), 3);
        assert_eq!(applied[2], solar_colors);
    }

    #[tokio::test]
    async fn test_duplicate_preview_during_write_is_dropped() {
        let (tx, rx) = mpsc::channel(16);
        let mut h = harness(Config::default());
        h.engine = h.engine.with_commands(rx);
        h.sink.delay_ms.store(100, Ordering::SeqCst);

        let request = preview_request("#123456");
        tx.send(HostCommand::ApplyPreview(request.clone()))
            .await
            .unwrap();
        tx.send(HostCommand::ForceUpdate).await.unwrap();

        let outcome = h.engine.apply_preview(request).await;
        assert_eq!(outcome, PreviewOutcome::Applied);
        assert_eq!(h.sink.applies(), 1);

        // The duplicate vanished; the force update waits its turn
        assert_eq!(
            h.engine.deferred.iter().collect::<Vec<_>>(),
            vec![&HostCommand::ForceUpdate]
        );
    }

    #[tokio::test]
    async fn test_different_preview_during_write_is_deferred() {
        let (tx, rx) = mpsc::channel(16);
        let mut h = harness(Config::default());
        h.engine = h.engine.with_commands(rx);
        h.sink.delay_ms.store(100, Ordering::SeqCst);

        let other = preview_request("#654321");
        tx.send(HostCommand::ApplyPreview(other.clone()))
            .await
            .unwrap();

        h.engine.apply_preview(preview_request("#123456")).await;
        assert_eq!(
            h.engine.deferred.pop_front(),
            Some(HostCommand::ApplyPreview(other))
        );
    }

    // ── Commands ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_toggle_persists_and_hides() {
        let mut h = harness(Config::default());
        h.engine.update(false).await;

        assert!(!h.engine.toggle_enabled().await.unwrap());
        assert!(!h.store.get().solar.enabled);
        assert!(h.events.count(|e| *e == HostEvent::StatusHidden) >= 1);

        assert!(h.engine.toggle_enabled().await.unwrap());
        assert!(h.store.get().solar.enabled);
        // Re-enabling writes again even though colors match
        assert_eq!(h.sink.applies(), 2);
    }

    #[tokio::test]
    async fn test_reset_removes_owned_keys_and_disables() {
        let mut h = harness(Config::default());
        h.engine.update(false).await;

        h.engine.reset_colors().await.unwrap();
        let resets = h.sink.resets.lock().unwrap().clone();
        assert_eq!(resets.len(), 1);
        assert!(resets[0].iter().any(|k| k == "editor.background"));
        assert!(!h.store.get().solar.enabled);
        assert_eq!(h.engine.update(false).await, UpdateOutcome::Disabled);
    }

    #[tokio::test]
    async fn test_sun_times_report() {
        let mut h = harness(Config::default());
        let report = h.engine.show_sun_times();
        assert_eq!(report.sunrise.as_deref(), Some("06:30"));
        assert_eq!(report.sunset.as_deref(), Some("18:00"));
        assert_eq!(report.phase, "Midday");
        assert_eq!(h.events.count(|e| matches!(e, HostEvent::SunTimes(_))), 1);
    }

    #[tokio::test]
    async fn test_record_location_sets_flag() {
        let mut h = harness(Config::default());
        h.engine.record_location(None);
        assert!(h.store.get().location_initialized);

        h.engine.record_location(Some(GeoLocation {
            latitude: 48.8566,
            longitude: 2.3522,
            city: Some("Paris".to_string()),
        }));
        let saved = h.store.get();
        assert_eq!(saved.solar.latitude, 48.8566);
        assert_eq!(h.store.saves.load(Ordering::SeqCst), 2);
        assert_eq!(h.events.notifications(), 1);
    }

    #[tokio::test]
    async fn test_locate_skipped_once_initialized() {
        let mut config = Config::default();
        config.location_initialized = true;
        let mut h = harness(config);
        // Unroutable: would fail if it were actually called
        let locator = GeoLocator::new("http://127.0.0.1:9/").unwrap();
        assert_eq!(h.engine.locate(&locator, false).await, None);
        assert_eq!(h.store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_open_settings_points_at_config() {
        let mut h = harness(Config::default());
        h.engine.open_settings();
        assert_eq!(
            h.events.count(|e| matches!(
                e,
                HostEvent::OpenSettings { path } if path.ends_with("config.toml")
            )),
            1
        );
    }

    #[tokio::test]
    async fn test_config_change_rebuilds_timer() {
        let mut h = harness(Config::default());
        h.engine.start();
        assert_eq!(h.engine.scheduler.period(), Some(Duration::from_secs(60)));

        h.store.edit(|c| c.solar.update_interval_secs = 5);
        h.engine.handle(HostCommand::ConfigChanged).await;
        assert_eq!(h.engine.scheduler.period(), Some(Duration::from_secs(5)));

        h.engine.stop();
        assert_eq!(h.engine.scheduler.period(), None);
        assert!(!h.engine.running);
    }

    #[tokio::test]
    async fn test_config_change_recomputes_right_away() {
        use crate::palette::{Phase, StylePack};

        let mut h = harness(Config::default());
        assert_eq!(h.engine.update(false).await, UpdateOutcome::Applied);

        // Nothing that affects colors moved
        h.engine.handle(HostCommand::ConfigChanged).await;
        assert_eq!(h.sink.applies(), 1);
        assert_eq!(h.engine.reload_config().await, UpdateOutcome::Unchanged);

        h.store.edit(|c| c.solar.style_pack = StylePack::Slate);
        h.engine.handle(HostCommand::ConfigChanged).await;
        assert_eq!(h.sink.applies(), 2);

        let applied = h.sink.applied.lock().unwrap()[1].clone();
        let slate = PaletteTable::bundled(StylePack::Slate);
        assert_eq!(applied, to_color_map(slate.get(Phase::Midday)));
    }

    #[tokio::test]
    async fn test_run_until_shutdown() {
        let (tx, rx) = mpsc::channel(16);
        let mut h = harness(Config::default());
        h.engine = h.engine.with_commands(rx);

        tx.send(HostCommand::ForceUpdate).await.unwrap();
        tx.send(HostCommand::ShowSunTimes).await.unwrap();
        tx.send(HostCommand::Shutdown).await.unwrap();

        tokio::time::timeout(Duration::from_secs(5), h.engine.run())
            .await
            .expect("engine should stop on shutdown")
            .unwrap();

        assert!(h.sink.applies() >= 1);
        assert_eq!(h.events.count(|e| matches!(e, HostEvent::SunTimes(_))), 1);
        assert!(!h.engine.running);
    }

    #[tokio::test]
    async fn test_run_stops_when_channel_closes() {
        let (tx, rx) = mpsc::channel(1);
        let mut h = harness(Config::default());
        h.engine = h.engine.with_commands(rx);
        drop(tx);

        tokio::time::timeout(Duration::from_secs(5), h.engine.run())
            .await
            .expect("engine should stop when input closes")
            .unwrap();
    }
}
