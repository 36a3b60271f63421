use serde::Serialize;

use crate::timer::Countdown;

/// The inter-hand gauge as the table draws it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaugeView {
    pub remaining_ms: u64,
    pub percent: f64,
    pub seconds: u64,
    pub held: bool,
}

impl GaugeView {
    pub(crate) fn of(countdown: &Countdown) -> Self {
        GaugeView {
            remaining_ms: countdown.remaining_ms(),
            percent: countdown.percent_remaining(),
            seconds: countdown.seconds_remaining(),
            held: countdown.is_paused(),
        }
    }
}

/// The local player's action clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClockView {
    pub remaining_ms: u64,
    pub percent: f64,
    pub seconds: u64,
}

impl ClockView {
    pub(crate) fn of(countdown: &Countdown) -> Self {
        ClockView {
            remaining_ms: countdown.remaining_ms(),
            percent: countdown.percent_remaining(),
            seconds: countdown.seconds_remaining(),
        }
    }
}
