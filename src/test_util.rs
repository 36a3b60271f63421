use crate::table::{ActionKind, ActionRecord, Street, TableSnapshot, TableSnapshotBuilder, TableUpdate};

pub const HERO: &str = "hero";
pub const VILLAIN: &str = "villain";

pub fn board_for(street: Street) -> &'static str {
    match street {
        Street::Waiting | Street::Preflop => "",
        Street::Flop => "2♠ 7♦ 9♣",
        Street::Turn => "2♠ 7♦ 9♣ K♥",
        Street::River | Street::Showdown | Street::Settlement => "2♠ 7♦ 9♣ K♥ 3♦",
    }
}

/// Heads up between `HERO` (seat 0) and `VILLAIN` (seat 1) with the board
/// dealt up to `street` and street markers in the log.
pub fn heads_up(hand_number: u64, street: Street) -> TableSnapshotBuilder {
    let mut log = vec![
        ActionRecord::new(ActionKind::PostSmallBlind, Street::Preflop)
            .by(HERO)
            .amount(5),
        ActionRecord::new(ActionKind::PostBigBlind, Street::Preflop)
            .by(VILLAIN)
            .amount(10),
    ];
    for marker in [Street::Flop, Street::Turn, Street::River] {
        if street == Street::Waiting || marker > street {
            break;
        }
        log.push(ActionRecord::new(ActionKind::StreetMarker(marker), marker));
    }
    if street == Street::Waiting {
        log.clear();
    }
    let mut builder = TableSnapshotBuilder::new()
        .players(&[HERO, VILLAIN])
        .street(street)
        .board(board_for(street))
        .hand_number(hand_number)
        .hole_cards(0, "A♠ A♥")
        .actions(log);
    if street != Street::Waiting {
        builder = builder.hole_cards(1, "?? ??");
    }
    builder
}

pub fn snapshot(hand_number: u64, street: Street) -> TableSnapshot {
    heads_up(hand_number, street).build().unwrap()
}

pub fn hero_turn(hand_number: u64, street: Street) -> TableSnapshot {
    heads_up(hand_number, street)
        .current_turn_seat(Some(0))
        .build()
        .unwrap()
}

/// Settlement after the river, with a showdown won by hero or an
/// uncontested pot when `showdown` is false.
pub fn settlement(hand_number: u64, showdown: bool) -> TableSnapshot {
    let mut snapshot = snapshot(hand_number, Street::Settlement);
    if showdown {
        snapshot
            .action_history
            .push(ActionRecord::new(ActionKind::Showdown, Street::Showdown));
    } else {
        snapshot
            .action_history
            .push(ActionRecord::new(ActionKind::Fold, Street::River).by(VILLAIN));
        snapshot.seats[1].is_folded = true;
    }
    snapshot.action_history.push(
        ActionRecord::new(ActionKind::Payout, Street::Settlement)
            .by(HERO)
            .amount(20),
    );
    snapshot
}

pub fn with_reveal(mut snapshot: TableSnapshot, player_id: &str) -> TableSnapshot {
    snapshot
        .action_history
        .push(ActionRecord::new(ActionKind::HandReveal, snapshot.street).by(player_id));
    snapshot
}

pub fn update(snapshot: TableSnapshot) -> TableUpdate {
    TableUpdate::Snapshot(Box::new(snapshot))
}
