use std::fmt;

use serde::Serialize;

/// Steps between a hand ending and the next one being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStage {
    /// Cards are face up but results stay hidden for the reveal delay.
    Revealing,
    /// Results are shown; the gauge starts when the lead runs out.
    Results,
    /// The inter-hand gauge is counting down (or held).
    Gauge,
    /// The gauge ran out and readiness was signalled. Waiting on the engine.
    Awaiting,
}

/// Where the reconciler is in its narrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case", tag = "phase", content = "stage")]
pub enum Phase {
    /// Nothing shown yet.
    #[default]
    Idle,
    Live,
    /// The old board is held on screen after a street change.
    StreetTransitioning,
    SettlementWaiting(SettlementStage),
}

impl Phase {
    pub fn is_gauge_running(&self) -> bool {
        *self == Phase::SettlementWaiting(SettlementStage::Gauge)
    }

    /// Results overlays are allowed from the results stage on.
    pub fn shows_results(&self) -> bool {
        matches!(
            self,
            Phase::SettlementWaiting(
                SettlementStage::Results | SettlementStage::Gauge | SettlementStage::Awaiting
            )
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "Idle"),
            Phase::Live => write!(f, "Live"),
            Phase::StreetTransitioning => write!(f, "Street Transitioning"),
            Phase::SettlementWaiting(stage) => write!(f, "Settlement Waiting ({stage:?})"),
        }
    }
}
