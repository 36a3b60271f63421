use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::command::PlayerAction;
use crate::table::Street;

/// Identifies one decision point of the local player. Two triggers that see
/// the same key are looking at the same turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TurnKey {
    pub hand_number: u64,
    pub street: Street,
    pub to_call: u64,
    pub current_bet: u64,
}

/// Acts on the local player's behalf.
///
/// Two triggers share one per-turn guard: the user's "all fold" toggle and
/// an expired action clock. Whichever fires first acts; the other sees the
/// same `TurnKey` and does nothing.
#[derive(Debug, Clone, Default)]
pub struct AutoPilot {
    all_fold: bool,
    /// Set by action clock expiry, cleared when the turn ends.
    forced: bool,
    /// Hand and street on which the toggle last checked.
    checked_on: Option<(u64, Street)>,
    last_acted: Option<TurnKey>,
}

impl AutoPilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all_fold(&self) -> bool {
        self.all_fold
    }

    pub fn set_all_fold(&mut self, enabled: bool) {
        self.all_fold = enabled;
        if !enabled {
            self.checked_on = None;
        }
    }

    pub fn is_forced(&self) -> bool {
        self.forced
    }

    pub fn force(&mut self) {
        self.forced = true;
    }

    pub fn turn_ended(&mut self) {
        self.forced = false;
    }

    /// A toggle that only checked switches itself off once the street moves
    /// on; a fold ends the player's hand anyway.
    pub fn observe_street(&mut self, hand_number: u64, street: Street) {
        if let Some(checked) = self.checked_on {
            if checked != (hand_number, street) {
                self.all_fold = false;
                self.checked_on = None;
            }
        }
    }

    /// Decide the automatic action for this turn, at most once per key.
    pub fn decide(&mut self, key: TurnKey) -> Option<PlayerAction> {
        if !(self.all_fold || self.forced) {
            return None;
        }
        if self.last_acted == Some(key) {
            return None;
        }
        self.last_acted = Some(key);
        if key.to_call == 0 {
            if self.all_fold {
                self.checked_on = Some((key.hand_number, key.street));
            }
            Some(PlayerAction::Check)
        } else {
            Some(PlayerAction::Fold)
        }
    }
}

/// A 1..=max roll refreshed each time the local player's turn begins.
#[derive(Debug, Clone)]
pub struct TurnRoll {
    rng: StdRng,
    max: u32,
    value: Option<u32>,
    was_turn: bool,
}

impl TurnRoll {
    pub fn new(max: u32) -> Self {
        Self::with_rng(StdRng::from_os_rng(), max)
    }

    pub fn seeded(seed: u64, max: u32) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), max)
    }

    fn with_rng(rng: StdRng, max: u32) -> Self {
        TurnRoll {
            rng,
            max: max.max(1),
            value: None,
            was_turn: false,
        }
    }

    fn roll(&mut self) -> u32 {
        self.rng.random_range(1..=self.max)
    }

    /// Feed the current turn state. Rolls on the rising edge, and once up
    /// front so there is always a value to show.
    pub fn observe(&mut self, is_turn: bool) {
        let rising = is_turn && !self.was_turn;
        self.was_turn = is_turn;
        if rising || self.value.is_none() {
            self.value = Some(self.roll());
        }
    }

    pub fn value(&self) -> Option<u32> {
        self.value
    }
}
