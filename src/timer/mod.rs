//! Pausable, cancellable countdowns advanced by a shared clock.
mod bank;
mod countdown;

pub use bank::{TimerBank, TimerEvent, TimerId};
pub use countdown::{Countdown, CountdownState};

/// Cadence the host is expected to call `tick` at.
pub const TICK_MS: u64 = 100;
