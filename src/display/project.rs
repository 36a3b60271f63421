use crate::table::{ActionKind, ActionRecord, Seat, Street, TableSnapshot};

/// Seats of `snapshot` with `last_action` resolved for `target_street`.
///
/// Each occupied seat shows the most recent log entry it made on that
/// street. During an automatic run-out a seat with nothing on the street
/// keeps showing the all-in it made earlier in the hand.
pub fn project(snapshot: &TableSnapshot, target_street: Street) -> Vec<Seat> {
    let runout = snapshot.is_auto_runout();
    snapshot
        .seats
        .iter()
        .map(|seat| {
            let mut seat = seat.clone();
            seat.clear_last_action();
            let Some(player_id) = seat.player_id.clone() else {
                return seat;
            };

            if let Some(record) = latest_on_street(&snapshot.action_history, &player_id, target_street)
            {
                seat.last_action = Some(record.action.clone());
                seat.last_action_amount = record.amount;
            } else if runout {
                if let Some(all_in) = latest_all_in(&snapshot.action_history, &player_id) {
                    seat.last_action = Some(ActionKind::AllIn);
                    seat.last_action_amount = all_in.amount.filter(|a| *a > 0);
                }
            }
            seat
        })
        .collect()
}

fn latest_on_street<'a>(
    log: &'a [ActionRecord],
    player_id: &str,
    street: Street,
) -> Option<&'a ActionRecord> {
    log.iter()
        .rev()
        .find(|r| r.street == street && r.is_actor(player_id))
}

fn latest_all_in<'a>(log: &'a [ActionRecord], player_id: &str) -> Option<&'a ActionRecord> {
    log.iter()
        .rev()
        .find(|r| r.action == ActionKind::AllIn && r.is_actor(player_id))
}

/// The street whose actions stay on the seats once a hand reaches showdown
/// or settlement: the river when the board was dealt out, otherwise the
/// street of the latest log entry made before the hand ended.
pub fn last_action_street(snapshot: &TableSnapshot) -> Street {
    if snapshot.board.len() >= 5 {
        return Street::River;
    }
    snapshot
        .action_history
        .iter()
        .rev()
        .map(|r| r.street)
        .find(|s| !s.is_hand_over())
        .unwrap_or(Street::River)
}

/// `pot` minus what is still sitting in front of the players, never below
/// zero.
pub fn pot_excluding_current_street(snapshot: &TableSnapshot) -> u64 {
    snapshot.pot.saturating_sub(snapshot.street_commit_total())
}

/// Main pot then side pots. Falls back to a single pot when the engine does
/// not send a breakdown.
pub fn pot_breakdown(snapshot: &TableSnapshot) -> Vec<u64> {
    if snapshot.pot_breakdown_excl_current_street.is_empty() {
        vec![pot_excluding_current_street(snapshot)]
    } else {
        snapshot.pot_breakdown_excl_current_street.clone()
    }
}
