use serde::{Deserialize, Serialize};

use super::{ActionKind, ActionRecord, Seat, Street};
use crate::core::Card;

/// Full authoritative table state pushed by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub table_id: String,
    pub small_blind: u64,
    pub big_blind: u64,
    pub max_players: usize,
    #[serde(default)]
    pub dealer_seat: usize,
    pub street: Street,
    #[serde(default)]
    pub pot: u64,
    /// Main pot first, then side pots, without the open street's bets.
    #[serde(default)]
    pub pot_breakdown_excl_current_street: Vec<u64>,
    #[serde(default)]
    pub current_bet: u64,
    #[serde(default)]
    pub min_raise: u64,
    #[serde(default)]
    pub board: Vec<Card>,
    #[serde(default)]
    pub seats: Vec<Seat>,
    #[serde(default)]
    pub action_history: Vec<ActionRecord>,
    #[serde(default)]
    pub current_turn_seat: Option<usize>,
    #[serde(default)]
    pub hand_number: u64,
    #[serde(default)]
    pub save_earnings: Option<bool>,
}

impl TableSnapshot {
    pub fn seat(&self, seat_index: usize) -> Option<&Seat> {
        self.seats.iter().find(|s| s.seat_index == seat_index)
    }

    pub fn seat_of(&self, player_id: &str) -> Option<&Seat> {
        self.seats.iter().find(|s| s.is_player(player_id))
    }

    pub fn occupied_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_occupied()).count()
    }

    pub fn live_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_live()).count()
    }

    pub fn street_commit_total(&self) -> u64 {
        self.seats.iter().map(|s| s.street_commit).sum()
    }

    pub fn has_action(&self, kind: &ActionKind) -> bool {
        self.action_history.iter().any(|a| &a.action == kind)
    }

    /// A showdown record exists for this hand.
    pub fn has_showdown(&self) -> bool {
        self.has_action(&ActionKind::Showdown)
    }

    pub fn has_payout(&self) -> bool {
        self.has_action(&ActionKind::Payout)
    }

    pub fn reveal_count(&self) -> usize {
        self.action_history
            .iter()
            .filter(|a| a.action == ActionKind::HandReveal)
            .count()
    }

    /// Players that voluntarily showed their cards this hand.
    pub fn revealed_player_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for record in &self.action_history {
            if record.action != ActionKind::HandReveal {
                continue;
            }
            if let Some(id) = record.actor_id.as_deref() {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    /// The board is being dealt out with nobody left to act: a betting
    /// street, no current turn, at least two live players and at least one of
    /// them all-in.
    pub fn is_auto_runout(&self) -> bool {
        self.street.is_betting()
            && self.current_turn_seat.is_none()
            && self.seats.iter().any(|s| s.is_live() && s.is_all_in)
            && self.live_count() >= 2
    }

    /// A new hand can be dealt from here.
    pub fn can_start_hand(&self) -> bool {
        self.street == Street::Waiting && self.occupied_count() >= 2
    }

    /// Whether the seat to act belongs to `player_id`.
    pub fn is_turn_of(&self, player_id: &str) -> bool {
        match (self.current_turn_seat, self.seat_of(player_id)) {
            (Some(turn), Some(seat)) => seat.seat_index == turn,
            _ => false,
        }
    }
}
