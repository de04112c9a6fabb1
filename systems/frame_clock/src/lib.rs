#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame pacing system that converts caller timestamps into tick commands.
//!
//! The simulation never reads a clock. Whatever drives frames hands the
//! clock a timestamp once per display frame; the clock remembers the
//! previous one and emits `Command::Tick` with the elapsed delta. Frames
//! whose timestamp is unusable are discarded without touching that memory.

use std::time::Duration;

use starfall_core::{Command, Event};
use thiserror::Error;

/// Reasons a frame is discarded instead of producing a tick.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum FrameError {
    /// The timestamp was NaN or infinite.
    #[error("frame timestamp {timestamp} is not finite")]
    NonFiniteTimestamp {
        /// Timestamp that was rejected.
        timestamp: f64,
    },
    /// The timestamp precedes the previous tick.
    #[error("frame timestamp {timestamp} precedes the previous tick at {previous}")]
    NegativeDelta {
        /// Timestamp that was rejected.
        timestamp: f64,
        /// Timestamp of the previous tick.
        previous: f64,
    },
    /// The delta between two accepted timestamps cannot be represented.
    #[error("frame delta from {previous} to {timestamp} is out of range")]
    DeltaOutOfRange {
        /// Timestamp that was rejected.
        timestamp: f64,
        /// Timestamp of the previous tick.
        previous: f64,
    },
    /// The session ended, so no further ticks are requested.
    #[error("frame clock stopped after the session ended")]
    Stopped,
}

/// Tracks the timestamp of the previous tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    last_tick_time: Option<f64>,
    stopped: bool,
}

impl FrameClock {
    /// Creates a clock that has not observed any frame yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp of the previous tick, in seconds, if any frame was accepted.
    #[must_use]
    pub fn last_tick_time(&self) -> Option<f64> {
        self.last_tick_time
    }

    /// Reports whether the clock stopped requesting ticks.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Stops the clock; every later frame is rejected.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Observes a frame timestamp measured in seconds.
    ///
    /// The first accepted timestamp only primes the clock. Every later one
    /// yields a tick covering the time since the previous accepted frame.
    pub fn advance(&mut self, timestamp: f64) -> Result<Option<Command>, FrameError> {
        if self.stopped {
            return Err(FrameError::Stopped);
        }

        if !timestamp.is_finite() {
            return Err(FrameError::NonFiniteTimestamp { timestamp });
        }

        let Some(previous) = self.last_tick_time else {
            self.last_tick_time = Some(timestamp);
            return Ok(None);
        };

        if timestamp < previous {
            return Err(FrameError::NegativeDelta {
                timestamp,
                previous,
            });
        }

        let dt = Duration::try_from_secs_f64(timestamp - previous).map_err(|_| {
            FrameError::DeltaOutOfRange {
                timestamp,
                previous,
            }
        })?;
        self.last_tick_time = Some(timestamp);
        Ok(Some(Command::Tick { dt }))
    }

    /// Stops the clock once the world announces a terminal outcome.
    pub fn handle(&mut self, events: &[Event]) {
        if events
            .iter()
            .any(|event| matches!(event, Event::OutcomeDecided { .. }))
        {
            self.stop();
        }
    }
}
