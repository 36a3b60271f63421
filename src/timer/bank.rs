use std::fmt;

use serde::Serialize;
use tracing::trace;

use super::Countdown;

/// Every countdown the table client runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerId {
    /// Holds the old board on screen after a street change.
    StreetTransition,
    /// Keeps the action controls locked through a street transition.
    ControlsUnlock,
    /// Delay before opponents' cards flip or results appear.
    RevealDelay,
    /// Gap between the results appearing and the gauge starting.
    GaugeLead,
    /// The inter-hand gauge players can hold.
    InterHandGauge,
    /// Per turn limit for the local player.
    ActionClock,
}

impl TimerId {
    /// Completion order within a single tick.
    pub const ALL: [TimerId; 6] = [
        TimerId::StreetTransition,
        TimerId::ControlsUnlock,
        TimerId::RevealDelay,
        TimerId::GaugeLead,
        TimerId::InterHandGauge,
        TimerId::ActionClock,
    ];

    fn index(self) -> usize {
        match self {
            TimerId::StreetTransition => 0,
            TimerId::ControlsUnlock => 1,
            TimerId::RevealDelay => 2,
            TimerId::GaugeLead => 3,
            TimerId::InterHandGauge => 4,
            TimerId::ActionClock => 5,
        }
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimerId::StreetTransition => "street_transition",
            TimerId::ControlsUnlock => "controls_unlock",
            TimerId::RevealDelay => "reveal_delay",
            TimerId::GaugeLead => "gauge_lead",
            TimerId::InterHandGauge => "inter_hand_gauge",
            TimerId::ActionClock => "action_clock",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Completed(TimerId),
}

/// The named countdowns of one table, all driven by one clock.
#[derive(Debug, Clone, Default)]
pub struct TimerBank {
    timers: [Countdown; 6],
}

impl TimerBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: TimerId) -> &Countdown {
        &self.timers[id.index()]
    }

    fn get_mut(&mut self, id: TimerId) -> &mut Countdown {
        &mut self.timers[id.index()]
    }

    pub fn start(&mut self, id: TimerId, now_ms: u64, duration_ms: u64) {
        trace!(timer = %id, duration_ms, "Starting timer");
        self.get_mut(id).start(now_ms, duration_ms);
    }

    pub fn pause(&mut self, id: TimerId, now_ms: u64) {
        self.get_mut(id).pause(now_ms);
    }

    pub fn resume(&mut self, id: TimerId, now_ms: u64) {
        self.get_mut(id).resume(now_ms);
    }

    pub fn skip(&mut self, id: TimerId, now_ms: u64) {
        self.get_mut(id).skip(now_ms);
    }

    pub fn cancel(&mut self, id: TimerId) {
        self.get_mut(id).cancel();
    }

    /// Cancel every timer, whatever phase started it.
    pub fn cancel_all(&mut self) {
        for timer in self.timers.iter_mut() {
            timer.cancel();
        }
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.get(id).is_active()
    }

    pub fn any_active(&self) -> bool {
        self.timers.iter().any(Countdown::is_active)
    }

    /// Advance every timer to `now_ms` and report the ones that ran out, in
    /// `TimerId::ALL` order.
    pub fn advance(&mut self, now_ms: u64) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        for id in TimerId::ALL {
            if self.get_mut(id).advance(now_ms) {
                trace!(timer = %id, now_ms, "Timer completed");
                events.push(TimerEvent::Completed(id));
            }
        }
        events
    }
}
