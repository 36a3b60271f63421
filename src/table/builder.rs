use thiserror::Error;

use super::{ActionRecord, Seat, Street, TableSnapshot};
use crate::core::{parse_cards, Card, CardParseError, HoleCard};

/// Largest table the client lays out.
pub const MAX_SEATS: usize = 10;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotBuilderError {
    #[error("big_blind must be positive")]
    InvalidBigBlind,

    #[error("max_players must be between 2 and {max}, got {actual}", max = MAX_SEATS)]
    InvalidMaxPlayers { actual: usize },

    #[error("{players} players do not fit at a table of {max_players}")]
    TooManyPlayers { players: usize, max_players: usize },

    #[error("dealer_seat {dealer_seat} must be less than max_players {max_players}")]
    InvalidDealerSeat {
        dealer_seat: usize,
        max_players: usize,
    },

    #[error("current_turn_seat {0} is not an occupied seat")]
    InvalidTurnSeat(usize),

    #[error("board must have 0, 3, 4, or 5 cards, got {0}")]
    InvalidBoardSize(usize),

    #[error("street_commit length {commit_len} must equal max_players {max_players}")]
    CommitLengthMismatch {
        commit_len: usize,
        max_players: usize,
    },

    #[error("duplicate card found: {0}")]
    DuplicateCard(Card),

    #[error("could not parse cards: {0}")]
    Cards(#[from] CardParseError),
}

/// Builder for `TableSnapshot` values with validation. Everything has a
/// default, so the smallest useful snapshot is a list of players.
///
/// # Example
///
/// ```
/// use rs_poker_table::table::{Street, TableSnapshotBuilder};
///
/// let snapshot = TableSnapshotBuilder::new()
///     .players(&["alice", "bob"])
///     .street(Street::Preflop)
///     .current_turn_seat(Some(0))
///     .build()
///     .unwrap();
///
/// assert_eq!(snapshot.seats.len(), 6);
/// assert_eq!(snapshot.small_blind, 5); // defaults to big_blind / 2
/// ```
#[derive(Default, Clone)]
pub struct TableSnapshotBuilder {
    table_id: Option<String>,
    big_blind: Option<u64>,
    small_blind: Option<u64>, // Default: big_blind / 2
    max_players: Option<usize>,
    dealer_seat: Option<usize>,
    street: Option<Street>,
    pot: Option<u64>,
    pot_breakdown: Vec<u64>,
    current_bet: Option<u64>,
    min_raise: Option<u64>, // Default: big_blind
    board: Option<String>,
    players: Vec<String>,
    stack: Option<u64>,
    street_commit: Option<Vec<u64>>,
    folded: Vec<usize>,
    all_in: Vec<usize>,
    hole_cards: Vec<(usize, String)>,
    actions: Vec<ActionRecord>,
    current_turn_seat: Option<usize>,
    hand_number: Option<u64>,
    save_earnings: Option<bool>,
}

impl TableSnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table_id(mut self, id: &str) -> Self {
        self.table_id = Some(id.to_string());
        self
    }

    /// Defaults to 10.
    pub fn big_blind(mut self, bb: u64) -> Self {
        self.big_blind = Some(bb);
        self
    }

    pub fn small_blind(mut self, sb: u64) -> Self {
        self.small_blind = Some(sb);
        self
    }

    /// Defaults to 6.
    pub fn max_players(mut self, n: usize) -> Self {
        self.max_players = Some(n);
        self
    }

    pub fn dealer_seat(mut self, seat: usize) -> Self {
        self.dealer_seat = Some(seat);
        self
    }

    pub fn street(mut self, street: Street) -> Self {
        self.street = Some(street);
        self
    }

    pub fn pot(mut self, pot: u64) -> Self {
        self.pot = Some(pot);
        self
    }

    pub fn pot_breakdown(mut self, pots: Vec<u64>) -> Self {
        self.pot_breakdown = pots;
        self
    }

    pub fn current_bet(mut self, bet: u64) -> Self {
        self.current_bet = Some(bet);
        self
    }

    pub fn min_raise(mut self, min_raise: u64) -> Self {
        self.min_raise = Some(min_raise);
        self
    }

    /// Board cards in any format `parse_cards` accepts, e.g. `"A♠ K♦ 2♣"`.
    pub fn board(mut self, board: &str) -> Self {
        self.board = Some(board.to_string());
        self
    }

    /// Seat players in order starting at seat 0. Ids double as names.
    pub fn players(mut self, ids: &[&str]) -> Self {
        self.players = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Stack for every seated player. Defaults to 1000.
    pub fn stack(mut self, stack: u64) -> Self {
        self.stack = Some(stack);
        self
    }

    /// Per seat commits for the open street, one entry per seat.
    pub fn street_commit(mut self, commits: Vec<u64>) -> Self {
        self.street_commit = Some(commits);
        self
    }

    pub fn folded(mut self, seat: usize) -> Self {
        self.folded.push(seat);
        self
    }

    pub fn all_in(mut self, seat: usize) -> Self {
        self.all_in.push(seat);
        self
    }

    /// Hole cards for a seat. Use `??` for a masked card.
    pub fn hole_cards(mut self, seat: usize, cards: &str) -> Self {
        self.hole_cards.push((seat, cards.to_string()));
        self
    }

    pub fn action(mut self, record: ActionRecord) -> Self {
        self.actions.push(record);
        self
    }

    pub fn actions(mut self, records: Vec<ActionRecord>) -> Self {
        self.actions.extend(records);
        self
    }

    pub fn current_turn_seat(mut self, seat: Option<usize>) -> Self {
        self.current_turn_seat = seat;
        self
    }

    /// Defaults to 1.
    pub fn hand_number(mut self, hand: u64) -> Self {
        self.hand_number = Some(hand);
        self
    }

    pub fn save_earnings(mut self, save: bool) -> Self {
        self.save_earnings = Some(save);
        self
    }

    pub fn build(self) -> Result<TableSnapshot, SnapshotBuilderError> {
        let big_blind = self.big_blind.unwrap_or(10);
        if big_blind == 0 {
            return Err(SnapshotBuilderError::InvalidBigBlind);
        }
        let small_blind = self.small_blind.unwrap_or(big_blind / 2);

        let max_players = self.max_players.unwrap_or(6);
        if !(2..=MAX_SEATS).contains(&max_players) {
            return Err(SnapshotBuilderError::InvalidMaxPlayers {
                actual: max_players,
            });
        }
        if self.players.len() > max_players {
            return Err(SnapshotBuilderError::TooManyPlayers {
                players: self.players.len(),
                max_players,
            });
        }
        let dealer_seat = self.dealer_seat.unwrap_or(0);
        if dealer_seat >= max_players {
            return Err(SnapshotBuilderError::InvalidDealerSeat {
                dealer_seat,
                max_players,
            });
        }

        let board = match self.board {
            Some(b) => parse_cards(&b)?,
            None => vec![],
        };
        if !matches!(board.len(), 0 | 3 | 4 | 5) {
            return Err(SnapshotBuilderError::InvalidBoardSize(board.len()));
        }

        let commits = self.street_commit.unwrap_or_else(|| vec![0; max_players]);
        if commits.len() != max_players {
            return Err(SnapshotBuilderError::CommitLengthMismatch {
                commit_len: commits.len(),
                max_players,
            });
        }

        let stack = self.stack.unwrap_or(1000);
        let mut seats: Vec<Seat> = (0..max_players).map(Seat::empty).collect();
        for (idx, id) in self.players.iter().enumerate() {
            let seat = &mut seats[idx];
            seat.player_id = Some(id.clone());
            seat.name = Some(id.clone());
            seat.stack = stack;
            seat.hand_start_stack = Some(stack);
            seat.is_ready = true;
        }
        for (seat, commit) in seats.iter_mut().zip(commits) {
            seat.street_commit = commit;
        }
        for idx in self.folded {
            if let Some(seat) = seats.get_mut(idx) {
                seat.is_folded = true;
            }
        }
        for idx in self.all_in {
            if let Some(seat) = seats.get_mut(idx) {
                seat.is_all_in = true;
                seat.stack = 0;
            }
        }

        let mut seen: Vec<Card> = board.clone();
        for (idx, cards) in self.hole_cards {
            let hole: Vec<HoleCard> = cards
                .split_whitespace()
                .map(|t| {
                    t.parse::<Card>()
                        .map(HoleCard::Known)
                        .unwrap_or(HoleCard::Hidden)
                })
                .collect();
            for card in hole.iter().filter_map(HoleCard::card) {
                if seen.contains(&card) {
                    return Err(SnapshotBuilderError::DuplicateCard(card));
                }
                seen.push(card);
            }
            if let Some(seat) = seats.get_mut(idx) {
                seat.hole_cards = Some(hole);
            }
        }
        for (i, card) in board.iter().enumerate() {
            if board[i + 1..].contains(card) {
                return Err(SnapshotBuilderError::DuplicateCard(*card));
            }
        }

        if let Some(turn) = self.current_turn_seat {
            if !seats.get(turn).is_some_and(Seat::is_occupied) {
                return Err(SnapshotBuilderError::InvalidTurnSeat(turn));
            }
        }

        let street_total: u64 = seats.iter().map(|s| s.street_commit).sum();
        Ok(TableSnapshot {
            table_id: self.table_id.unwrap_or_else(|| "table-1".to_string()),
            small_blind,
            big_blind,
            max_players,
            dealer_seat,
            street: self.street.unwrap_or_default(),
            pot: self.pot.unwrap_or(street_total),
            pot_breakdown_excl_current_street: self.pot_breakdown,
            current_bet: self.current_bet.unwrap_or(0),
            min_raise: self.min_raise.unwrap_or(big_blind),
            board,
            seats,
            action_history: self.actions,
            current_turn_seat: self.current_turn_seat,
            hand_number: self.hand_number.unwrap_or(1),
            save_earnings: self.save_earnings,
        })
    }
}
