use serde::Serialize;

use super::{last_action_street, pot_breakdown, pot_excluding_current_street, project};
use crate::table::{Street, TableSnapshot};

/// Blinds captured when the inter-hand countdown begins, so badge text does
/// not jump if the engine changes stakes for the next hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Blinds {
    pub small_blind: u64,
    pub big_blind: u64,
}

impl Blinds {
    pub fn of(snapshot: &TableSnapshot) -> Self {
        Blinds {
            small_blind: snapshot.small_blind,
            big_blind: snapshot.big_blind,
        }
    }
}

/// What the table should look like right now. Rebuilt from a snapshot on
/// every emission and never mutated after it is handed out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayState {
    /// The snapshot being shown, with seat badges resolved for
    /// `badge_street`.
    pub table: TableSnapshot,
    pub badge_street: Street,
    pub pot_excluding_current_street: u64,
    pub pot_breakdown: Vec<u64>,
    pub frozen_blinds: Option<Blinds>,
}

impl DisplayState {
    /// Derive the display for `next`.
    ///
    /// Once a hand that was already on screen reaches showdown or settlement
    /// the badges keep showing its last betting street instead of going
    /// blank.
    pub fn build(next: &TableSnapshot, prev: Option<&DisplayState>) -> DisplayState {
        let same_hand = prev.is_some_and(|p| p.table.hand_number == next.hand_number);
        let badge_street = if same_hand && next.street.is_hand_over() {
            last_action_street(next)
        } else {
            next.street
        };
        Self::on_street(next.clone(), badge_street)
    }

    /// The street change hold: the previous board, pot and commits stay up
    /// while the new action log and turn marker are already shown.
    pub fn staged(prev: &DisplayState, next: &TableSnapshot) -> DisplayState {
        let mut table = prev.table.clone();
        table.action_history = next.action_history.clone();
        table.current_turn_seat = next.current_turn_seat;
        let street = prev.table.street;
        let mut staged = Self::on_street(table, street);
        staged.frozen_blinds = prev.frozen_blinds;
        staged
    }

    /// First frame of a new hand: nothing carries over from the last one,
    /// so every seat badge starts blank.
    pub fn new_hand(next: &TableSnapshot) -> DisplayState {
        let mut state = Self::on_street(next.clone(), next.street);
        state.table.seats.iter_mut().for_each(|s| s.clear_last_action());
        state
    }

    fn on_street(mut table: TableSnapshot, badge_street: Street) -> DisplayState {
        table.seats = project(&table, badge_street);
        DisplayState {
            pot_excluding_current_street: pot_excluding_current_street(&table),
            pot_breakdown: pot_breakdown(&table),
            badge_street,
            table,
            frozen_blinds: None,
        }
    }

    pub fn with_frozen_blinds(mut self, blinds: Option<Blinds>) -> Self {
        self.frozen_blinds = blinds;
        self
    }

    /// Blinds to print: the frozen pair while the countdown runs.
    pub fn blinds(&self) -> Blinds {
        self.frozen_blinds.unwrap_or_else(|| Blinds::of(&self.table))
    }

    pub fn hand_number(&self) -> u64 {
        self.table.hand_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{ActionKind, ActionRecord, Street, TableSnapshotBuilder};

    fn river_snapshot(street: Street) -> TableSnapshot {
        TableSnapshotBuilder::new()
            .players(&["a", "b"])
            .street(street)
            .board("2♠ 7♦ 9♣ K♥ 3♦")
            .hand_number(7)
            .actions(vec![
                ActionRecord::new(ActionKind::Bet, Street::River).by("a").amount(50),
                ActionRecord::new(ActionKind::Call, Street::River).by("b").amount(50),
                ActionRecord::new(ActionKind::Showdown, Street::Showdown),
            ])
            .build()
            .unwrap()
    }

    #[test]
    fn test_showdown_keeps_river_badges() {
        let river = DisplayState::build(&river_snapshot(Street::River), None);
        let showdown = DisplayState::build(&river_snapshot(Street::Showdown), Some(&river));
        assert_eq!(Street::River, showdown.badge_street);
        assert_eq!(Some(ActionKind::Bet), showdown.table.seats[0].last_action);
    }

    #[test]
    fn test_first_showdown_uses_own_street() {
        let showdown = DisplayState::build(&river_snapshot(Street::Showdown), None);
        assert_eq!(Street::Showdown, showdown.badge_street);
        assert_eq!(None, showdown.table.seats[0].last_action);
    }

    #[test]
    fn test_staged_keeps_old_board() {
        let flop = TableSnapshotBuilder::new()
            .players(&["a", "b"])
            .street(Street::Flop)
            .board("2♠ 7♦ 9♣")
            .action(ActionRecord::new(ActionKind::Bet, Street::Flop).by("a").amount(20))
            .current_turn_seat(Some(1))
            .build()
            .unwrap();
        let turn = TableSnapshotBuilder::new()
            .players(&["a", "b"])
            .street(Street::Turn)
            .board("2♠ 7♦ 9♣ K♥")
            .actions(vec![
                ActionRecord::new(ActionKind::Bet, Street::Flop).by("a").amount(20),
                ActionRecord::new(ActionKind::Call, Street::Flop).by("b").amount(20),
            ])
            .current_turn_seat(Some(0))
            .build()
            .unwrap();

        let shown = DisplayState::build(&flop, None);
        let staged = DisplayState::staged(&shown, &turn);
        assert_eq!(3, staged.table.board.len());
        assert_eq!(Street::Flop, staged.table.street);
        assert_eq!(Some(0), staged.table.current_turn_seat);
        assert_eq!(Some(ActionKind::Call), staged.table.seats[1].last_action);
    }

    #[test]
    fn test_frozen_blinds() {
        let snapshot = river_snapshot(Street::Settlement);
        let state = DisplayState::build(&snapshot, None).with_frozen_blinds(Some(Blinds {
            small_blind: 1,
            big_blind: 2,
        }));
        assert_eq!(2, state.blinds().big_blind);
        let plain = DisplayState::build(&snapshot, None);
        assert_eq!(10, plain.blinds().big_blind);
    }
}
