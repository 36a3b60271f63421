use std::fmt;

use thiserror::Error;

use super::{Card, CardIter};

/// The category of a five card poker hand, weakest first so that the derived
/// `Ord` matches poker strength.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandCategory {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandCategory::HighCard => write!(f, "High Card"),
            HandCategory::OnePair => write!(f, "One Pair"),
            HandCategory::TwoPair => write!(f, "Two Pair"),
            HandCategory::ThreeOfAKind => write!(f, "Three of a Kind"),
            HandCategory::Straight => write!(f, "Straight"),
            HandCategory::Flush => write!(f, "Flush"),
            HandCategory::FullHouse => write!(f, "Full House"),
            HandCategory::FourOfAKind => write!(f, "Four of a Kind"),
            HandCategory::StraightFlush => write!(f, "Straight Flush"),
        }
    }
}

/// Strength of a five card hand.
///
/// `values` holds the tiebreak strengths (two = 2, ace = 14) in the order
/// they are compared:
///
/// - straight and straight flush: `[high]`, where the wheel is `[5]`
/// - four of a kind: `[quads, kicker]`
/// - full house: `[trips, pair]`
/// - flush and high card: all five values, descending
/// - three of a kind: `[trips, kicker, kicker]`
/// - two pair: `[high pair, low pair, kicker]`
/// - one pair: `[pair, kicker, kicker, kicker]`
///
/// The derived ordering compares category first and then the values
/// lexicographically, which is exactly poker ordering.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, serde::Serialize)]
pub struct HandRank {
    pub category: HandCategory,
    pub values: Vec<u8>,
}

impl HandRank {
    /// The leading tiebreak value, i.e. the rank that names the hand.
    pub fn primary(&self) -> Option<u8> {
        self.values.first().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankError {
    #[error("at least 5 cards are needed to rank a hand, got {0}")]
    NotEnoughCards(usize),
    #[error("at most 7 cards can be ranked, got {0}")]
    TooManyCards(usize),
    #[error("duplicate card found: {0}")]
    DuplicateCard(Card),
}

/// Ace, five, four, three, two.
const WHEEL: [u8; 5] = [14, 5, 4, 3, 2];

/// Returns the high card of a straight given five distinct strengths sorted
/// descending.
fn straight_high(distinct_desc: &[u8]) -> Option<u8> {
    if distinct_desc.len() != 5 {
        return None;
    }
    if distinct_desc[0] - distinct_desc[4] == 4 {
        Some(distinct_desc[0])
    } else if distinct_desc == WHEEL {
        Some(5)
    } else {
        None
    }
}

/// Rank exactly five distinct cards.
pub fn rank_five(cards: &[Card]) -> Result<HandRank, RankError> {
    if cards.len() < 5 {
        return Err(RankError::NotEnoughCards(cards.len()));
    }
    if cards.len() > 5 {
        return Err(RankError::TooManyCards(cards.len()));
    }
    check_distinct(cards)?;
    Ok(score_five(cards))
}

fn check_distinct(cards: &[Card]) -> Result<(), RankError> {
    let mut seen: u64 = 0;
    for c in cards {
        let bit = 1u64 << (c.value as u64 * 4 + c.suit as u64);
        if seen & bit != 0 {
            return Err(RankError::DuplicateCard(*c));
        }
        seen |= bit;
    }
    Ok(())
}

/// `cards` must be five distinct cards.
fn score_five(cards: &[Card]) -> HandRank {
    let mut counts = [0u8; 15];
    for c in cards {
        counts[c.value.strength() as usize] += 1;
    }

    // (count, strength) groups, biggest group first then highest value.
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .rev()
        .filter(|&v| counts[v as usize] > 0)
        .map(|v| (counts[v as usize], v))
        .collect();
    groups.sort_by(|a, b| b.cmp(a));

    let is_flush = cards.windows(2).all(|w| w[0].suit == w[1].suit);
    let distinct: Vec<u8> = groups.iter().map(|&(_, v)| v).collect();
    let straight = if groups.len() == 5 {
        let mut desc = distinct.clone();
        desc.sort_unstable_by(|a, b| b.cmp(a));
        straight_high(&desc)
    } else {
        None
    };

    let (category, values) = match (straight, is_flush, groups[0].0) {
        (Some(high), true, _) => (HandCategory::StraightFlush, vec![high]),
        (_, _, 4) => (HandCategory::FourOfAKind, distinct),
        (_, _, 3) if groups.len() == 2 => (HandCategory::FullHouse, distinct),
        (_, true, _) => (HandCategory::Flush, distinct),
        (Some(high), false, _) => (HandCategory::Straight, vec![high]),
        (_, _, 3) => (HandCategory::ThreeOfAKind, distinct),
        (_, _, 2) if groups[1].0 == 2 => (HandCategory::TwoPair, distinct),
        (_, _, 2) => (HandCategory::OnePair, distinct),
        _ => (HandCategory::HighCard, distinct),
    };
    HandRank { category, values }
}

/// Find the strongest five card hand among 5 to 7 cards by trying every five
/// card combination.
pub fn best_hand(cards: &[Card]) -> Result<HandRank, RankError> {
    if cards.len() < 5 {
        return Err(RankError::NotEnoughCards(cards.len()));
    }
    if cards.len() > 7 {
        return Err(RankError::TooManyCards(cards.len()));
    }
    check_distinct(cards)?;

    CardIter::new(cards, 5)
        .map(|combo| score_five(&combo))
        .max()
        .ok_or(RankError::NotEnoughCards(cards.len()))
}

/// Anything that can hand over its cards can be ranked.
pub trait Rankable {
    fn cards(&self) -> impl Iterator<Item = Card>;

    /// Rank the best five card hand available.
    fn rank(&self) -> Result<HandRank, RankError> {
        let cards: Vec<Card> = self.cards().collect();
        best_hand(&cards)
    }
}

impl Rankable for Vec<Card> {
    fn cards(&self) -> impl Iterator<Item = Card> {
        self.iter().copied()
    }
}

impl Rankable for [Card] {
    fn cards(&self) -> impl Iterator<Item = Card> {
        self.iter().copied()
    }
}

impl Rankable for &[Card] {
    fn cards(&self) -> impl Iterator<Item = Card> {
        self.iter().copied()
    }
}
