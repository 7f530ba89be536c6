//! Phase timeline: ordered (hour, phase) breakpoints on the 0–24 solar scale

use super::Phase;
use std::fmt;
use std::sync::OnceLock;

/// Nominal sunrise the timeline is drawn around (06:30)
pub const NOMINAL_SUNRISE: f64 = 6.5;

/// Nominal sunset the timeline is drawn around (18:00)
pub const NOMINAL_SUNSET: f64 = 18.0;

/// One timeline breakpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseBreakpoint {
    /// Hours on the solar scale, 0..=24
    pub time: f64,
    pub phase: Phase,
}

impl PhaseBreakpoint {
    pub const fn new(time: f64, phase: Phase) -> Self {
        Self { time, phase }
    }
}

/// Midday is held flat from 11:00 to 13:00
const STANDARD_BREAKPOINTS: [PhaseBreakpoint; 15] = [
    PhaseBreakpoint::new(0.0, Phase::Midnight),
    PhaseBreakpoint::new(3.0, Phase::DeepNight),
    PhaseBreakpoint::new(5.0, Phase::PreDawn),
    PhaseBreakpoint::new(6.0, Phase::Dawn),
    PhaseBreakpoint::new(NOMINAL_SUNRISE, Phase::Sunrise),
    PhaseBreakpoint::new(8.0, Phase::Morning),
    PhaseBreakpoint::new(11.0, Phase::Midday),
    PhaseBreakpoint::new(13.0, Phase::Midday),
    PhaseBreakpoint::new(15.5, Phase::Afternoon),
    PhaseBreakpoint::new(17.0, Phase::GoldenHour),
    PhaseBreakpoint::new(NOMINAL_SUNSET, Phase::Sunset),
    PhaseBreakpoint::new(18.75, Phase::Dusk),
    PhaseBreakpoint::new(20.0, Phase::Evening),
    PhaseBreakpoint::new(22.0, Phase::Night),
    PhaseBreakpoint::new(24.0, Phase::Midnight),
];

/// Why a breakpoint list is not a valid timeline
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineError {
    TooShort(usize),
    StartNotMidnight(f64),
    EndNotMidnight(f64),
    Decreasing { index: usize, time: f64 },
    Discontinuous { start: Phase, end: Phase },
}

impl fmt::Display for TimelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort(len) => write!(f, "timeline needs at least 2 breakpoints, got {}", len),
            Self::StartNotMidnight(t) => write!(f, "timeline must start at 0, starts at {}", t),
            Self::EndNotMidnight(t) => write!(f, "timeline must end at 24, ends at {}", t),
            Self::Decreasing { index, time } => {
                write!(f, "breakpoint {} at {} goes back in time", index, time)
            }
            Self::Discontinuous { start, end } => write!(
                f,
                "palette at 0 ({}) must match palette at 24 ({})",
                start, end
            ),
        }
    }
}

impl std::error::Error for TimelineError {}

/// Validated, ordered breakpoint sequence.
///
/// Invariants: times are non-decreasing, the first breakpoint is at 0, the
/// last at 24, and both ends use the same phase so midnight is continuous.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    breakpoints: Vec<PhaseBreakpoint>,
}

impl Timeline {
    pub fn new(breakpoints: Vec<PhaseBreakpoint>) -> Result<Self, TimelineError> {
        let (Some(first), Some(last)) = (breakpoints.first(), breakpoints.last()) else {
            return Err(TimelineError::TooShort(0));
        };
        if breakpoints.len() < 2 {
            return Err(TimelineError::TooShort(breakpoints.len()));
        }
        if first.time != 0.0 {
            return Err(TimelineError::StartNotMidnight(first.time));
        }
        if last.time != 24.0 {
            return Err(TimelineError::EndNotMidnight(last.time));
        }
        if first.phase != last.phase {
            return Err(TimelineError::Discontinuous {
                start: first.phase,
                end: last.phase,
            });
        }
        for (index, pair) in breakpoints.windows(2).enumerate() {
            // NaN fails this comparison too
            if !(pair[0].time <= pair[1].time) {
                return Err(TimelineError::Decreasing {
                    index: index + 1,
                    time: pair[1].time,
                });
            }
        }

        Ok(Self { breakpoints })
    }

    /// The day as drawn around a 06:30 sunrise and 18:00 sunset (validated
    /// once, then cloned)
    pub fn standard() -> Self {
        static STANDARD: OnceLock<Timeline> = OnceLock::new();

        STANDARD
            .get_or_init(|| {
                // Compile-time data covered by tests
                Timeline::new(STANDARD_BREAKPOINTS.to_vec())
                    .unwrap_or_else(|e| panic!("standard timeline is invalid: {}", e))
            })
            .clone()
    }

    /// First adjacent pair with `prev.time <= solar < next.time`, else the
    /// last pair (covers exactly 24 and out-of-range input).
    pub fn bracket(&self, solar: f64) -> (PhaseBreakpoint, PhaseBreakpoint) {
        let pairs = self.breakpoints.windows(2);
        let found = pairs
            .clone()
            .find(|pair| pair[0].time <= solar && solar < pair[1].time);

        // Construction guarantees at least one pair
        let pair = found.or_else(|| pairs.last()).unwrap_or(&self.breakpoints[..]);
        (pair[0], pair[pair.len() - 1])
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::standard()
    }
}
