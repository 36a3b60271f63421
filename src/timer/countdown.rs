use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownState {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
    Cancelled,
}

/// A single pausable countdown driven by explicit timestamps.
///
/// Time only passes through `advance`, `pause` and `skip`. Paused time is
/// never charged: every call while paused and every `resume` re-anchors the
/// last tick to the moment of the call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Countdown {
    state: CountdownState,
    duration_ms: u64,
    remaining_ms: u64,
    last_tick_ms: u64,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)start from `duration_ms`, whatever the current state.
    pub fn start(&mut self, now_ms: u64, duration_ms: u64) {
        self.state = CountdownState::Running;
        self.duration_ms = duration_ms;
        self.remaining_ms = duration_ms;
        self.last_tick_ms = now_ms;
    }

    pub fn pause(&mut self, now_ms: u64) {
        if self.state == CountdownState::Running {
            self.charge(now_ms);
            self.state = CountdownState::Paused;
        }
    }

    pub fn resume(&mut self, now_ms: u64) {
        if self.state == CountdownState::Paused {
            self.last_tick_ms = now_ms;
            self.state = CountdownState::Running;
        }
    }

    /// Drop the remaining time to zero and let it run out on the next
    /// `advance`. A paused countdown is resumed.
    pub fn skip(&mut self, now_ms: u64) {
        if self.is_active() {
            self.remaining_ms = 0;
            self.last_tick_ms = now_ms;
            self.state = CountdownState::Running;
        }
    }

    /// Safe on a countdown that never started or already finished.
    pub fn cancel(&mut self) {
        if self.is_active() {
            self.state = CountdownState::Cancelled;
        }
    }

    /// Move time forward. Returns `true` exactly once, on the call where the
    /// countdown runs out.
    pub fn advance(&mut self, now_ms: u64) -> bool {
        match self.state {
            CountdownState::Running => {
                self.charge(now_ms);
                if self.remaining_ms == 0 {
                    self.state = CountdownState::Completed;
                    true
                } else {
                    false
                }
            }
            CountdownState::Paused => {
                self.last_tick_ms = now_ms;
                false
            }
            _ => false,
        }
    }

    fn charge(&mut self, now_ms: u64) {
        let elapsed = now_ms.saturating_sub(self.last_tick_ms);
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
        self.last_tick_ms = now_ms;
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, CountdownState::Running | CountdownState::Paused)
    }

    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == CountdownState::Paused
    }

    pub fn remaining_ms(&self) -> u64 {
        match self.state {
            CountdownState::Running | CountdownState::Paused => self.remaining_ms,
            _ => 0,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Remaining share of the full duration, 0 to 100.
    pub fn percent_remaining(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        (self.remaining_ms() as f64 / self.duration_ms as f64 * 100.0).clamp(0.0, 100.0)
    }

    /// Whole seconds left, rounded up.
    pub fn seconds_remaining(&self) -> u64 {
        self.remaining_ms().div_ceil(1000)
    }
}
