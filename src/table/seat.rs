use serde::{Deserialize, Serialize};

use super::ActionKind;
use crate::core::{Card, HoleCard};

/// One seat at the table as the engine reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub seat_index: usize,
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub stack: u64,
    /// Stack before any forced bets of the current hand.
    #[serde(default)]
    pub hand_start_stack: Option<u64>,
    #[serde(default)]
    pub position: Option<String>,
    /// Filled in client side for the displayed street; the engine's own value
    /// is discarded when a new hand is adopted.
    #[serde(default)]
    pub last_action: Option<ActionKind>,
    #[serde(default)]
    pub last_action_amount: Option<u64>,
    #[serde(default)]
    pub hole_cards: Option<Vec<HoleCard>>,
    #[serde(default = "default_connected")]
    pub is_connected: bool,
    #[serde(default)]
    pub is_ready: bool,
    #[serde(default)]
    pub is_folded: bool,
    #[serde(default)]
    pub is_all_in: bool,
    #[serde(default)]
    pub street_commit: u64,
    #[serde(default)]
    pub raise_blocked: bool,
}

fn default_connected() -> bool {
    true
}

impl Seat {
    pub fn empty(seat_index: usize) -> Self {
        Seat {
            seat_index,
            player_id: None,
            name: None,
            stack: 0,
            hand_start_stack: None,
            position: None,
            last_action: None,
            last_action_amount: None,
            hole_cards: None,
            is_connected: true,
            is_ready: false,
            is_folded: false,
            is_all_in: false,
            street_commit: 0,
            raise_blocked: false,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.player_id.is_some()
    }

    /// Occupied and still contesting the pot.
    pub fn is_live(&self) -> bool {
        self.is_occupied() && !self.is_folded
    }

    pub fn is_player(&self, player_id: &str) -> bool {
        self.player_id.as_deref() == Some(player_id)
    }

    /// Dealt into the current hand (two hole card slots, masked or not).
    pub fn has_hole_cards(&self) -> bool {
        self.hole_cards.as_ref().is_some_and(|h| h.len() >= 2)
    }

    /// The hole cards that are actually known.
    pub fn known_hole_cards(&self) -> Vec<Card> {
        self.hole_cards
            .iter()
            .flatten()
            .filter_map(HoleCard::card)
            .collect()
    }

    pub fn clear_last_action(&mut self) {
        self.last_action = None;
        self.last_action_amount = None;
    }
}
