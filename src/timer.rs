//! Pomodoro-style focus timer.
//!
//! The timer alternates between a work phase and a break phase. It is
//! driven by elapsed wall time fed through [`ProductivityTimer::advance`],
//! which counts down in whole seconds while the timer is active.

use std::fmt;
use std::time::Duration;

use crate::constants::{DEFAULT_BREAK_MINUTES, DEFAULT_WORK_MINUTES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    Work,
    Break,
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerMode::Work => write!(f, "Focus"),
            TimerMode::Break => write!(f, "Break"),
        }
    }
}

/// A phase boundary crossed during [`ProductivityTimer::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// A work phase ran out; `minutes` is its configured length.
    WorkComplete { minutes: u32 },
    BreakComplete,
}

#[derive(Debug, Clone)]
pub struct ProductivityTimer {
    work_minutes: u32,
    break_minutes: u32,
    mode: TimerMode,
    remaining_secs: u32,
    active: bool,
    sessions: u32,
    carry: Duration,
}

impl Default for ProductivityTimer {
    fn default() -> Self {
        Self::new(DEFAULT_WORK_MINUTES, DEFAULT_BREAK_MINUTES)
    }
}

impl ProductivityTimer {
    pub fn new(work_minutes: u32, break_minutes: u32) -> Self {
        let work_minutes = work_minutes.max(1);
        let break_minutes = break_minutes.max(1);
        Self {
            work_minutes,
            break_minutes,
            mode: TimerMode::Work,
            remaining_secs: work_minutes * 60,
            active: false,
            sessions: 0,
            carry: Duration::ZERO,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Completed work phases since the timer was created.
    pub fn sessions(&self) -> u32 {
        self.sessions
    }

    pub fn work_minutes(&self) -> u32 {
        self.work_minutes
    }

    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    fn full_secs(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Work => self.work_minutes * 60,
            TimerMode::Break => self.break_minutes * 60,
        }
    }

    /// Start or pause without touching the remaining time.
    pub fn toggle(&mut self) {
        self.active = !self.active;
        self.carry = Duration::ZERO;
        tracing::debug!(active = self.active, mode = %self.mode, "timer toggled");
    }

    /// Refill the current phase and pause.
    pub fn reset(&mut self) {
        self.remaining_secs = self.full_secs(self.mode);
        self.active = false;
        self.carry = Duration::ZERO;
    }

    /// Change phase lengths. A paused timer picks up the new length of its
    /// current phase immediately; a running one on the next phase.
    pub fn set_durations(&mut self, work_minutes: u32, break_minutes: u32) {
        self.work_minutes = work_minutes.max(1);
        self.break_minutes = break_minutes.max(1);
        if !self.active {
            self.remaining_secs = self.full_secs(self.mode);
        }
    }

    /// Count down one second. Returns the phase change if this tick
    /// finished the current phase.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.active {
            return None;
        }
        if self.remaining_secs > 1 {
            self.remaining_secs -= 1;
            return None;
        }
        let event = match self.mode {
            TimerMode::Work => {
                self.sessions += 1;
                self.mode = TimerMode::Break;
                TimerEvent::WorkComplete {
                    minutes: self.work_minutes,
                }
            }
            TimerMode::Break => {
                self.mode = TimerMode::Work;
                TimerEvent::BreakComplete
            }
        };
        self.remaining_secs = self.full_secs(self.mode);
        tracing::info!(?event, sessions = self.sessions, "timer phase finished");
        Some(event)
    }

    /// Feed elapsed wall time; sub-second remainders carry over.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TimerEvent> {
        if !self.active {
            return Vec::new();
        }
        self.carry += elapsed;
        let whole = self.carry.as_secs();
        self.carry -= Duration::from_secs(whole);
        (0..whole).filter_map(|_| self.tick()).collect()
    }

    /// Percentage of the current phase already elapsed.
    pub fn progress(&self) -> f64 {
        let full = f64::from(self.full_secs(self.mode));
        (full - f64::from(self.remaining_secs)) / full * 100.0
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_keeps_remaining_time() {
        let mut t = ProductivityTimer::default();
        t.toggle();
        t.advance(Duration::from_secs(10));
        t.toggle();
        assert!(!t.is_active());
        assert_eq!(t.remaining_secs(), 25 * 60 - 10);
        t.advance(Duration::from_secs(30));
        assert_eq!(t.remaining_secs(), 25 * 60 - 10);
    }

    #[test]
    fn reset_refills_and_pauses() {
        let mut t = ProductivityTimer::default();
        t.toggle();
        t.advance(Duration::from_secs(75));
        t.reset();
        assert!(!t.is_active());
        assert_eq!(t.remaining_secs(), 25 * 60);
        assert_eq!(t.display(), "25:00");
    }

    #[test]
    fn sub_second_elapsed_carries() {
        let mut t = ProductivityTimer::default();
        t.toggle();
        for _ in 0..4 {
            t.advance(Duration::from_millis(250));
        }
        assert_eq!(t.remaining_secs(), 25 * 60 - 1);
    }

    #[test]
    fn break_completion_returns_to_work() {
        let mut t = ProductivityTimer::new(1, 1);
        t.toggle();
        let events = t.advance(Duration::from_secs(120));
        assert_eq!(
            events,
            vec![
                TimerEvent::WorkComplete { minutes: 1 },
                TimerEvent::BreakComplete
            ]
        );
        assert_eq!(t.mode(), TimerMode::Work);
        assert_eq!(t.remaining_secs(), 60);
        assert!(t.is_active());
    }

    #[test]
    fn set_durations_applies_while_paused() {
        let mut t = ProductivityTimer::default();
        t.set_durations(50, 10);
        assert_eq!(t.remaining_secs(), 50 * 60);
        t.toggle();
        t.set_durations(30, 10);
        assert_eq!(t.remaining_secs(), 50 * 60);
    }

    #[test]
    fn progress_tracks_elapsed_share() {
        let mut t = ProductivityTimer::new(10, 5);
        assert_eq!(t.progress(), 0.0);
        t.toggle();
        t.advance(Duration::from_secs(300));
        assert!((t.progress() - 50.0).abs() < f64::EPSILON);
    }
}
