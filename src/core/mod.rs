//! Cards, five card hand evaluation, and hand labels.
mod card;
pub use self::card::*;

mod card_iter;
pub use self::card_iter::*;

mod rank;
pub use self::rank::*;

mod label;
pub use self::label::*;
