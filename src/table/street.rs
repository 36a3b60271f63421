use std::fmt;

use serde::{Deserialize, Serialize};

/// Betting round or table phase, as named by the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    #[default]
    Waiting,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    Settlement,
}

impl Street {
    /// One of the four streets where players bet.
    pub fn is_betting(&self) -> bool {
        matches!(
            self,
            Street::Preflop | Street::Flop | Street::Turn | Street::River
        )
    }

    /// Streets that begin by dealing board cards.
    pub fn deals_cards(&self) -> bool {
        matches!(self, Street::Flop | Street::Turn | Street::River)
    }

    /// Post betting phases of a hand.
    pub fn is_hand_over(&self) -> bool {
        matches!(self, Street::Showdown | Street::Settlement)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Street::Waiting => "waiting",
            Street::Preflop => "preflop",
            Street::Flop => "flop",
            Street::Turn => "turn",
            Street::River => "river",
            Street::Showdown => "showdown",
            Street::Settlement => "settlement",
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
