use serde::{Deserialize, Serialize};

/// The betting decisions a player can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerAction {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    #[serde(rename = "all-in")]
    AllIn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPayload {
    pub player_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinTablePayload {
    pub player_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPayload {
    pub player_id: String,
    pub action: PlayerAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveSeatPayload {
    pub player_id: String,
    pub name: String,
    pub seat_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartHandPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_stats: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveStatsPayload {
    pub save_stats: bool,
}

/// Every message the client sends to the engine, encoded as
/// `{"type": "...", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Command {
    JoinTable(JoinTablePayload),
    Action(ActionPayload),
    ReserveSeat(ReserveSeatPayload),
    StartHand(StartHandPayload),
    RevealHand(PlayerPayload),
    LeaveAfterHand(PlayerPayload),
    CancelLeaveAfterHand(PlayerPayload),
    LeaveNow(PlayerPayload),
    LeaveTable(PlayerPayload),
    ResetTable,
    SetSaveStats(SaveStatsPayload),
    NextHandGaugeComplete(PlayerPayload),
    Heartbeat(PlayerPayload),
    RequestManualTopup(PlayerPayload),
}

impl Command {
    pub fn join_table(player_id: &str, name: &str) -> Self {
        Command::JoinTable(JoinTablePayload {
            player_id: player_id.to_string(),
            name: name.to_string(),
        })
    }

    pub fn action(player_id: &str, action: PlayerAction, amount: Option<u64>) -> Self {
        Command::Action(ActionPayload {
            player_id: player_id.to_string(),
            action,
            amount,
        })
    }

    pub fn reserve_seat(player_id: &str, name: &str, seat_index: usize) -> Self {
        Command::ReserveSeat(ReserveSeatPayload {
            player_id: player_id.to_string(),
            name: name.to_string(),
            seat_index,
        })
    }

    pub fn start_hand(save_stats: Option<bool>) -> Self {
        Command::StartHand(StartHandPayload { save_stats })
    }

    pub fn set_save_stats(save_stats: bool) -> Self {
        Command::SetSaveStats(SaveStatsPayload { save_stats })
    }

    fn player(player_id: &str) -> PlayerPayload {
        PlayerPayload {
            player_id: player_id.to_string(),
        }
    }

    pub fn reveal_hand(player_id: &str) -> Self {
        Command::RevealHand(Self::player(player_id))
    }

    pub fn leave_after_hand(player_id: &str, leave: bool) -> Self {
        if leave {
            Command::LeaveAfterHand(Self::player(player_id))
        } else {
            Command::CancelLeaveAfterHand(Self::player(player_id))
        }
    }

    pub fn leave_now(player_id: &str) -> Self {
        Command::LeaveNow(Self::player(player_id))
    }

    pub fn leave_table(player_id: &str) -> Self {
        Command::LeaveTable(Self::player(player_id))
    }

    pub fn next_hand_gauge_complete(player_id: &str) -> Self {
        Command::NextHandGaugeComplete(Self::player(player_id))
    }

    pub fn heartbeat(player_id: &str) -> Self {
        Command::Heartbeat(Self::player(player_id))
    }

    pub fn request_manual_topup(player_id: &str) -> Self {
        Command::RequestManualTopup(Self::player(player_id))
    }

    /// The wire `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::JoinTable(_) => "joinTable",
            Command::Action(_) => "action",
            Command::ReserveSeat(_) => "reserveSeat",
            Command::StartHand(_) => "startHand",
            Command::RevealHand(_) => "revealHand",
            Command::LeaveAfterHand(_) => "leaveAfterHand",
            Command::CancelLeaveAfterHand(_) => "cancelLeaveAfterHand",
            Command::LeaveNow(_) => "leaveNow",
            Command::LeaveTable(_) => "leaveTable",
            Command::ResetTable => "resetTable",
            Command::SetSaveStats(_) => "setSaveStats",
            Command::NextHandGaugeComplete(_) => "nextHandGaugeComplete",
            Command::Heartbeat(_) => "heartbeat",
            Command::RequestManualTopup(_) => "requestManualTopup",
        }
    }
}
