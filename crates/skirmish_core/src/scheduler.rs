//! Fixed-interval timers that gate the slower subsystems.
//!
//! Each timer remembers the phase of the clock within its interval
//! (`now % interval`). The timer fires when the new phase is smaller than
//! the previous one, i.e. when the clock rolled over an interval boundary
//! since the last call. This is deliberately not a delta accumulator: a call
//! that lands on exactly the same phase, or that skips a whole interval,
//! does not fire.

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

/// One wraparound-detecting interval timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntervalTimer {
    interval: u64,
    phase: u64,
}

impl IntervalTimer {
    /// Create a timer primed at clock value `now`.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    #[must_use]
    pub fn new(interval: u64, now: u64) -> Self {
        assert!(interval > 0, "IntervalTimer interval must be positive");
        Self {
            interval,
            phase: now % interval,
        }
    }

    /// Interval length.
    #[must_use]
    pub const fn interval(&self) -> u64 {
        self.interval
    }

    /// Feed the current clock value; returns true if the interval elapsed.
    pub fn advance(&mut self, now: u64) -> bool {
        let phase = now % self.interval;
        let fired = self.phase > phase;
        self.phase = phase;
        fired
    }
}

/// Which subsystems are due this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TimerFires {
    /// Mining yields are collected.
    pub mine: bool,
    /// Structures attempt production.
    pub spawn: bool,
    /// Units take one path step.
    pub movement: bool,
    /// AI policies are consulted.
    pub ai: bool,
}

impl TimerFires {
    /// Every subsystem due at once. Handy for tests.
    pub const ALL: Self = Self {
        mine: true,
        spawn: true,
        movement: true,
        ai: true,
    };

    /// Nothing due.
    pub const NONE: Self = Self {
        mine: false,
        spawn: false,
        movement: false,
        ai: false,
    };

    /// True if any timer fired.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.mine || self.spawn || self.movement || self.ai
    }
}

/// The four subsystem timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scheduler {
    mine: IntervalTimer,
    spawn: IntervalTimer,
    movement: IntervalTimer,
    ai: IntervalTimer,
}

impl Scheduler {
    /// Build timers from the configured intervals, primed at `now`.
    #[must_use]
    pub fn new(config: &SimConfig, now: u64) -> Self {
        Self {
            mine: IntervalTimer::new(config.mine_interval_ms, now),
            spawn: IntervalTimer::new(config.spawn_interval_ms, now),
            movement: IntervalTimer::new(config.move_interval_ms, now),
            ai: IntervalTimer::new(config.ai_interval_ms, now),
        }
    }

    /// Feed the host clock and report which timers fired.
    pub fn advance(&mut self, now: u64) -> TimerFires {
        TimerFires {
            mine: self.mine.advance(now),
            spawn: self.spawn.advance(now),
            movement: self.movement.advance(now),
            ai: self.ai.advance(now),
        }
    }
}
