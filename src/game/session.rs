//! Game Session
//!
//! NotStarted -> Running -> Over -> (restart) -> Running.
//! Owns the tick-driven elapsed clock and the best-time record.

use std::fmt;
use serde::{Serialize, Deserialize};
use tracing::info;

/// Session phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for the first input
    #[default]
    NotStarted,
    /// Active gameplay, clock running
    Running,
    /// Player died; waiting for restart
    Over,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::NotStarted => "NotStarted",
            SessionPhase::Running => "Running",
            SessionPhase::Over => "Over",
        };
        f.write_str(name)
    }
}

/// Session errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Requested transition is not an edge of the state machine.
    #[error("invalid session transition {from} -> {to}")]
    InvalidTransition {
        /// Phase the session was in.
        from: SessionPhase,
        /// Phase that was requested.
        to: SessionPhase,
    },
}

/// Result of a Running -> Over transition.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    /// Final elapsed time of the run
    pub elapsed_seconds: f64,
    /// Best time after committing this run
    pub best_seconds: f64,
    /// This run set a new best
    pub new_best: bool,
}

/// Session state machine and clock.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSession {
    phase: SessionPhase,
    seconds_per_tick: f64,
    elapsed_ticks: u64,
    best_seconds: f64,
    runs_completed: u32,
}

impl GameSession {
    /// Create a session that has not started yet.
    pub fn new(seconds_per_tick: f64) -> Self {
        Self {
            phase: SessionPhase::NotStarted,
            seconds_per_tick,
            elapsed_ticks: 0,
            best_seconds: 0.0,
            runs_completed: 0,
        }
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Check if a run is in progress.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Check if the last run ended and no restart happened yet.
    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::Over
    }

    /// Elapsed time of the current (or just finished) run.
    #[inline]
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_ticks as f64 * self.seconds_per_tick
    }

    /// Ticks counted in the current run.
    #[inline]
    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    /// Best run time so far. Never decreases.
    #[inline]
    pub fn best_seconds(&self) -> f64 {
        self.best_seconds
    }

    /// Runs that reached game over.
    #[inline]
    pub fn runs_completed(&self) -> u32 {
        self.runs_completed
    }

    /// NotStarted -> Running. Starts the clock from zero.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.transition(SessionPhase::NotStarted, SessionPhase::Running)?;
        self.elapsed_ticks = 0;
        info!("session started");
        Ok(())
    }

    /// Advance the clock by one tick. No effect unless running.
    pub fn advance_clock(&mut self) -> f64 {
        if self.is_running() {
            self.elapsed_ticks += 1;
        }
        self.elapsed_seconds()
    }

    /// Running -> Over. Stops the clock and commits the best time.
    pub fn finish(&mut self) -> Result<SessionOutcome, SessionError> {
        self.transition(SessionPhase::Running, SessionPhase::Over)?;

        let elapsed = self.elapsed_seconds();
        let new_best = elapsed > self.best_seconds;
        if new_best {
            self.best_seconds = elapsed;
        }
        self.runs_completed += 1;

        info!(elapsed_seconds = elapsed, best_seconds = self.best_seconds, new_best, "session over");

        Ok(SessionOutcome {
            elapsed_seconds: elapsed,
            best_seconds: self.best_seconds,
            new_best,
        })
    }

    /// Over -> Running. Restarts the clock; the best time is kept.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.transition(SessionPhase::Over, SessionPhase::Running)?;
        self.elapsed_ticks = 0;
        info!(best_seconds = self.best_seconds, "session restarted");
        Ok(())
    }

    fn transition(&mut self, from: SessionPhase, to: SessionPhase) -> Result<(), SessionError> {
        if self.phase != from {
            return Err(SessionError::InvalidTransition { from: self.phase, to });
        }
        self.phase = to;
        Ok(())
    }
}
