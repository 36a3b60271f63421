use serde::{Deserialize, Serialize};

use super::{best_hand, Card, HandCategory, Value};

/// Language used for hand labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    Japanese,
    English,
}

fn value_text(strength: u8) -> String {
    match strength {
        14 => "A".to_string(),
        13 => "K".to_string(),
        12 => "Q".to_string(),
        11 => "J".to_string(),
        10 => "T".to_string(),
        n => n.to_string(),
    }
}

/// Human readable label for the best hand made from `hole` and `board`.
///
/// Returns `None` while fewer than five cards are known, or when the cards
/// cannot be ranked (duplicates, more than seven cards). A high card hand is
/// named after the highest hole card rather than the highest board card.
pub fn hand_label(hole: &[Card], board: &[Card], locale: Locale) -> Option<String> {
    if hole.len() + board.len() < 5 {
        return None;
    }
    let cards: Vec<Card> = hole.iter().chain(board.iter()).copied().collect();
    let rank = best_hand(&cards).ok()?;
    let primary = rank.primary().map(value_text).unwrap_or_default();

    let label = match (rank.category, locale) {
        (HandCategory::StraightFlush, Locale::Japanese) if rank.primary() == Some(14) => {
            "ロイヤルフラッシュ".to_string()
        }
        (HandCategory::StraightFlush, Locale::English) if rank.primary() == Some(14) => {
            "Royal Flush".to_string()
        }
        (HandCategory::StraightFlush, Locale::Japanese) => "ストレートフラッシュ".to_string(),
        (HandCategory::FourOfAKind, Locale::Japanese) => format!("{primary}のフォーカード"),
        (HandCategory::FullHouse, Locale::Japanese) => "フルハウス".to_string(),
        (HandCategory::Flush, Locale::Japanese) => "フラッシュ".to_string(),
        (HandCategory::Straight, Locale::Japanese) => "ストレート".to_string(),
        (HandCategory::ThreeOfAKind, Locale::Japanese) => format!("{primary}のスリーカード"),
        (HandCategory::TwoPair, Locale::Japanese) => format!("{primary}のツーペア"),
        (HandCategory::OnePair, Locale::Japanese) => format!("{primary}のワンペア"),
        (HandCategory::HighCard, Locale::Japanese) => format!("{}ハイ", high_hole(hole, &primary)),
        (HandCategory::FourOfAKind, Locale::English) => format!("Four of a Kind, {primary}"),
        (HandCategory::ThreeOfAKind, Locale::English) => format!("Three of a Kind, {primary}"),
        (HandCategory::TwoPair, Locale::English) => format!("Two Pair, {primary} high"),
        (HandCategory::OnePair, Locale::English) => format!("Pair of {primary}"),
        (HandCategory::HighCard, Locale::English) => {
            format!("{} High", high_hole(hole, &primary))
        }
        (category, Locale::English) => category.to_string(),
    };
    Some(label)
}

fn high_hole(hole: &[Card], fallback: &str) -> String {
    hole.iter()
        .map(|c| c.value)
        .max()
        .map(|v: Value| value_text(v.strength()))
        .unwrap_or_else(|| fallback.to_string())
}
