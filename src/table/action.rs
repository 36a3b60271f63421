use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Street;

/// Every kind of entry the engine writes into the action log.
///
/// The wire format is a free string (`"all-in"`, `"post_sb"`,
/// `"street_flop"` ...). Parsing is case insensitive and treats `_` and `-`
/// the same; anything not recognised is kept verbatim in `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
    PostSmallBlind,
    PostBigBlind,
    Showdown,
    Payout,
    HandReveal,
    /// Marks the start of a new street; the engine writes one per deal.
    StreetMarker(Street),
    HandStart,
    HandEnd,
    Join,
    Leave,
    AutoCashout,
    AutoTopup,
    ManualTopup,
    Refund,
    Unknown(String),
}

impl ActionKind {
    pub fn parse(raw: &str) -> ActionKind {
        let norm = raw.trim().to_ascii_lowercase().replace('_', "-");
        match norm.as_str() {
            "fold" => ActionKind::Fold,
            "check" => ActionKind::Check,
            "call" => ActionKind::Call,
            "bet" => ActionKind::Bet,
            "raise" => ActionKind::Raise,
            "all-in" | "allin" => ActionKind::AllIn,
            "post-sb" => ActionKind::PostSmallBlind,
            "post-bb" => ActionKind::PostBigBlind,
            "showdown" => ActionKind::Showdown,
            "payout" => ActionKind::Payout,
            "hand-reveal" => ActionKind::HandReveal,
            "street-preflop" => ActionKind::StreetMarker(Street::Preflop),
            "street-flop" => ActionKind::StreetMarker(Street::Flop),
            "street-turn" => ActionKind::StreetMarker(Street::Turn),
            "street-river" => ActionKind::StreetMarker(Street::River),
            "hand-start" => ActionKind::HandStart,
            "hand-end" => ActionKind::HandEnd,
            "join" => ActionKind::Join,
            "leave" => ActionKind::Leave,
            "auto-cashout" => ActionKind::AutoCashout,
            "auto-topup" => ActionKind::AutoTopup,
            "manual-topup" => ActionKind::ManualTopup,
            "refund" => ActionKind::Refund,
            _ => ActionKind::Unknown(raw.to_string()),
        }
    }

    /// The engine's spelling of this kind.
    pub fn wire_name(&self) -> String {
        match self {
            ActionKind::Fold => "fold".into(),
            ActionKind::Check => "check".into(),
            ActionKind::Call => "call".into(),
            ActionKind::Bet => "bet".into(),
            ActionKind::Raise => "raise".into(),
            ActionKind::AllIn => "all-in".into(),
            ActionKind::PostSmallBlind => "post_sb".into(),
            ActionKind::PostBigBlind => "post_bb".into(),
            ActionKind::Showdown => "showdown".into(),
            ActionKind::Payout => "payout".into(),
            ActionKind::HandReveal => "hand_reveal".into(),
            ActionKind::StreetMarker(street) => format!("street_{street}"),
            ActionKind::HandStart => "hand_start".into(),
            ActionKind::HandEnd => "hand_end".into(),
            ActionKind::Join => "join".into(),
            ActionKind::Leave => "leave".into(),
            ActionKind::AutoCashout => "auto_cashout".into(),
            ActionKind::AutoTopup => "auto_topup".into(),
            ActionKind::ManualTopup => "manual_topup".into(),
            ActionKind::Refund => "refund".into(),
            ActionKind::Unknown(raw) => raw.clone(),
        }
    }

    /// Voluntary or forced betting decisions that get a seat badge.
    pub fn is_player_action(&self) -> bool {
        matches!(
            self,
            ActionKind::Fold
                | ActionKind::Check
                | ActionKind::Call
                | ActionKind::Bet
                | ActionKind::Raise
                | ActionKind::AllIn
                | ActionKind::PostSmallBlind
                | ActionKind::PostBigBlind
        )
    }

    /// Short label for a seat badge or the history panel.
    pub fn label(&self) -> &str {
        match self {
            ActionKind::Fold => "Fold",
            ActionKind::Check => "Check",
            ActionKind::Call => "Call",
            ActionKind::Bet => "Bet",
            ActionKind::Raise => "Raise",
            ActionKind::AllIn => "All-in",
            ActionKind::PostSmallBlind => "SB",
            ActionKind::PostBigBlind => "BB",
            ActionKind::Showdown => "Showdown",
            ActionKind::Payout => "Payout",
            ActionKind::HandReveal => "Reveal",
            ActionKind::StreetMarker(Street::Flop) => "Flop",
            ActionKind::StreetMarker(Street::Turn) => "Turn",
            ActionKind::StreetMarker(Street::River) => "River",
            ActionKind::StreetMarker(_) => "Street",
            ActionKind::HandStart => "Hand start",
            ActionKind::HandEnd => "Hand end",
            ActionKind::Join => "Join",
            ActionKind::Leave => "Leave",
            ActionKind::AutoCashout => "Cash out",
            ActionKind::AutoTopup => "Top up",
            ActionKind::ManualTopup => "Top up",
            ActionKind::Refund => "Refund",
            ActionKind::Unknown(raw) => raw.as_str(),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.wire_name())
    }
}

impl Serialize for ActionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.wire_name())
    }
}

impl<'de> Deserialize<'de> for ActionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ActionKind::parse(&raw))
    }
}

/// One entry of the append-only action log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    #[serde(default)]
    pub actor_id: Option<String>,
    #[serde(default)]
    pub actor_name: Option<String>,
    pub action: ActionKind,
    #[serde(default)]
    pub amount: Option<u64>,
    pub street: Street,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ActionRecord {
    pub fn new(action: ActionKind, street: Street) -> Self {
        ActionRecord {
            actor_id: None,
            actor_name: None,
            action,
            amount: None,
            street,
            detail: None,
        }
    }

    pub fn by(mut self, actor_id: &str) -> Self {
        self.actor_id = Some(actor_id.to_string());
        self.actor_name = Some(actor_id.to_string());
        self
    }

    pub fn amount(mut self, amount: u64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn detail(mut self, detail: &str) -> Self {
        self.detail = Some(detail.to_string());
        self
    }

    pub fn is_actor(&self, player_id: &str) -> bool {
        self.actor_id.as_deref() == Some(player_id)
    }
}
