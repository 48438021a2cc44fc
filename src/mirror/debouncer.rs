//! Regeneration gate.
//!
//! ```text
//! Idle ──event──▶ Pending ──deadline──▶ Regenerating ──done──▶ Cooldown ──delay──▶ Idle
//!                  │  ▲
//!                  └──┘ event: deadline pushed back
//! ```
//!
//! Events seen while `Regenerating` or `Cooldown` do not arm anything.
//! All transitions take the current instant as a parameter, so the gate is a
//! pure value with no timers of its own.

use std::time::{Duration, Instant};

pub const DEBOUNCE_MS: u64 = 300;
pub const COOLDOWN_MS: u64 = 1000;

/// Sleep used when nothing is scheduled.
const IDLE_SLEEP: Duration = Duration::from_secs(86400);

/// Debounce and cooldown windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncTiming {
    /// Quiet period required after the last qualifying event.
    pub debounce: Duration,
    /// Period after a regeneration during which events do not re-arm.
    pub cooldown: Duration,
}

impl Default for SyncTiming {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEBOUNCE_MS),
            cooldown: Duration::from_millis(COOLDOWN_MS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenState {
    Idle,
    Pending { deadline: Instant },
    Regenerating,
    Cooldown { until: Instant },
}

impl RegenState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending { .. } => "pending",
            Self::Regenerating => "regenerating",
            Self::Cooldown { .. } => "cooldown",
        }
    }
}

pub(super) struct Debouncer {
    state: RegenState,
    timing: SyncTiming,
}

impl Debouncer {
    pub(super) fn new(timing: SyncTiming) -> Self {
        Self {
            state: RegenState::Idle,
            timing,
        }
    }

    pub(super) fn state(&self) -> RegenState {
        self.state
    }

    /// Arm (or re-arm) the debounce timer. Returns `false` when gated.
    pub(super) fn arm(&mut self, now: Instant) -> bool {
        match self.state {
            RegenState::Idle | RegenState::Pending { .. } => {
                self.state = RegenState::Pending {
                    deadline: now + self.timing.debounce,
                };
                true
            }
            RegenState::Regenerating | RegenState::Cooldown { .. } => false,
        }
    }

    /// Advance time. Returns `true` exactly when a regeneration must start;
    /// the gate is then `Regenerating` until [`Debouncer::finish`].
    pub(super) fn take_if_ready(&mut self, now: Instant) -> bool {
        match self.state {
            RegenState::Pending { deadline } if now >= deadline => {
                self.state = RegenState::Regenerating;
                true
            }
            RegenState::Cooldown { until } if now >= until => {
                self.state = RegenState::Idle;
                false
            }
            _ => false,
        }
    }

    /// Regeneration completed at `now`; start the cooldown.
    pub(super) fn finish(&mut self, now: Instant) {
        if self.state == RegenState::Regenerating {
            self.state = RegenState::Cooldown {
                until: now + self.timing.cooldown,
            };
        }
    }

    /// Precise sleep duration until the next transition.
    pub(super) fn sleep_duration(&self, now: Instant) -> Duration {
        let wake = match self.state {
            RegenState::Pending { deadline } => deadline,
            RegenState::Cooldown { until } => until,
            RegenState::Idle | RegenState::Regenerating => return IDLE_SLEEP,
        };
        wake.saturating_duration_since(now)
            .max(Duration::from_millis(1))
    }
}
