//! Derived, client only views of a table snapshot.
mod history;
mod project;
mod results;
mod state;

pub use history::{history_entries, HistoryEntry};
pub use project::{last_action_street, pot_breakdown, pot_excluding_current_street, project};
pub use results::{
    fold_visible_street, hand_contributions, payout_totals, pot_winners, seat_results,
    HandResults, SeatResult,
};
pub use state::{Blinds, DisplayState};
