//! Update scheduler
//!
//! Decides, once per tick, whether the resolved colors need to be written.
//! The state machine is pure: the engine feeds it ticks and apply results and
//! performs whatever side effect it asks for. The repeating timer that drives
//! it lives here too (`Ticker`), so the engine owns one object per concern.
//!
//! States:
//! - **Idle**: ticks compute and (maybe) apply
//! - **Suspended**: a preview owns the editor colors; unforced ticks are no-ops

use crate::resolver::ColorMap;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Consecutive failures logged at error level before going quiet
pub const ERROR_LOG_LIMIT: u32 = 3;

/// Consecutive failure count that raises the one user-visible warning
pub const ERROR_WARN_THRESHOLD: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Suspended,
}

/// What the engine knows when a tick fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickRequest {
    pub enabled: bool,
    pub force: bool,
}

/// Output of the palette computation for one tick
#[derive(Debug, Clone, PartialEq)]
pub struct Computed {
    pub colors: ColorMap,
    /// Display phase at the time of computation
    pub phase: &'static str,
}

/// An apply the engine should perform
#[derive(Debug, Clone, PartialEq)]
pub struct PendingApply {
    pub colors: ColorMap,
    pub hash: String,
    pub phase: &'static str,
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickDecision {
    /// Theme disabled: withdraw the status indicator, write nothing
    Disabled,
    /// A preview is active and the tick was not forced
    Suspended,
    /// Colors match the last successful apply
    Unchanged,
    Apply(PendingApply),
}

/// How loudly to report a failed apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureReport {
    pub consecutive: u32,
    /// Log at error level (otherwise debug)
    pub log: bool,
    /// Show the one-time warning to the user
    pub warn: bool,
}

/// Stable content hash of a color map (keys are sorted by `BTreeMap`)
pub fn content_hash(colors: &ColorMap) -> String {
    let mut hasher = Sha256::new();
    for (key, value) in colors {
        hasher.update(key.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

// ─────────────────────────────────────────────────────────────────────────────
// State machine
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct UpdateScheduler {
    state: SchedulerState,
    /// Hash of the last successfully applied color map
    snapshot: Option<String>,
    consecutive_errors: u32,
    /// Display phase of the last successful apply
    last_phase: Option<&'static str>,
    ticker: Ticker,
}

impl Default for UpdateScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Idle,
            snapshot: None,
            consecutive_errors: 0,
            last_phase: None,
            ticker: Ticker::default(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    #[cfg(test)]
    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }

    /// Preview took over the editor colors
    pub fn suspend(&mut self) {
        if self.state != SchedulerState::Suspended {
            tracing::debug!("Scheduler suspended for preview");
        }
        self.state = SchedulerState::Suspended;
    }

    /// Preview ended; the next tick starts with a clean error count
    pub fn resume(&mut self) {
        if self.state != SchedulerState::Idle {
            tracing::debug!("Scheduler resumed");
        }
        self.state = SchedulerState::Idle;
        self.consecutive_errors = 0;
    }

    /// Forget what was applied so the next tick writes unconditionally
    pub fn invalidate_snapshot(&mut self) {
        self.snapshot = None;
    }

    /// Run one tick. `compute` is only called when colors are actually needed.
    pub fn tick(
        &mut self,
        request: TickRequest,
        compute: impl FnOnce() -> Computed,
    ) -> TickDecision {
        if !request.enabled {
            return TickDecision::Disabled;
        }
        if self.state == SchedulerState::Suspended && !request.force {
            return TickDecision::Suspended;
        }

        let Computed { colors, phase } = compute();
        let hash = content_hash(&colors);

        if !request.force && self.snapshot.as_deref() == Some(hash.as_str()) {
            return TickDecision::Unchanged;
        }

        TickDecision::Apply(PendingApply {
            colors,
            hash,
            phase,
            force: request.force,
        })
    }

    /// Record a successful apply. Returns whether the user should be notified.
    pub fn record_success(&mut self, applied: &PendingApply, show_notifications: bool) -> bool {
        self.snapshot = Some(applied.hash.clone());
        self.consecutive_errors = 0;

        let phase_changed = self.last_phase != Some(applied.phase);
        self.last_phase = Some(applied.phase);

        show_notifications && (applied.force || phase_changed)
    }

    /// Record a failed apply. The snapshot is left alone so the next tick retries.
    pub fn record_failure(&mut self) -> FailureReport {
        self.consecutive_errors = self.consecutive_errors.saturating_add(1);
        let consecutive = self.consecutive_errors;
        FailureReport {
            consecutive,
            log: consecutive <= ERROR_LOG_LIMIT,
            warn: consecutive == ERROR_WARN_THRESHOLD,
        }
    }

    // ── Timer ────────────────────────────────────────────────────────────────

    /// Start ticking; the first tick fires immediately
    pub fn start(&mut self, period: Duration) {
        self.ticker.start(period, Instant::now());
    }

    /// Replace the timer with one using `period`; the first tick is a full
    /// period away (the caller recomputes right after a rebuild)
    pub fn rebuild(&mut self, period: Duration) {
        let now = Instant::now();
        let first = now.checked_add(period).unwrap_or_else(|| far_future(now));
        self.ticker.start(period, first);
    }

    pub fn stop(&mut self) {
        self.ticker.stop();
    }

    pub fn period(&self) -> Option<Duration> {
        self.ticker.period()
    }

    /// Wait for the next tick; never resolves while stopped
    pub async fn next_tick(&mut self) {
        self.ticker.tick().await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ticker
// ─────────────────────────────────────────────────────────────────────────────

/// Roughly thirty years out, for periods too long to add to an instant
fn far_future(now: Instant) -> Instant {
    now + Duration::from_secs(86_400 * 365 * 30)
}

/// Repeating timer with explicit start/stop
#[derive(Debug, Default)]
pub struct Ticker {
    interval: Option<Interval>,
}

impl Ticker {
    fn start(&mut self, period: Duration, first: Instant) {
        let mut interval = tokio::time::interval_at(first, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    fn stop(&mut self) {
        self.interval = None;
    }

    fn period(&self) -> Option<Duration> {
        self.interval.as_ref().map(Interval::period)
    }

    async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
