use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Card rank. The discriminant is the zero based position used for bit sets,
/// so `Value::Two as u8 == 0` and `Value::Ace as u8 == 12`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum Value {
    Two = 0,
    Three = 1,
    Four = 2,
    Five = 3,
    Six = 4,
    Seven = 5,
    Eight = 6,
    Nine = 7,
    Ten = 8,
    Jack = 9,
    Queen = 10,
    King = 11,
    Ace = 12,
}

const VALUES: [Value; 13] = [
    Value::Two,
    Value::Three,
    Value::Four,
    Value::Five,
    Value::Six,
    Value::Seven,
    Value::Eight,
    Value::Nine,
    Value::Ten,
    Value::Jack,
    Value::Queen,
    Value::King,
    Value::Ace,
];

impl Value {
    /// All values from two up to ace.
    pub const fn values() -> [Value; 13] {
        VALUES
    }

    /// Build a value from its bit set position (0 = two, 12 = ace).
    pub fn from_index(idx: u8) -> Option<Value> {
        VALUES.get(idx as usize).copied()
    }

    /// The numeric strength used by tiebreak values: two is 2, ace is 14.
    pub fn strength(&self) -> u8 {
        *self as u8 + 2
    }

    /// Parse the rank part of a card string. Accepts `A K Q J T` (any case),
    /// the digits `2` through `9`, and `10`.
    pub fn from_token(token: &str) -> Option<Value> {
        match token {
            "10" => Some(Value::Ten),
            _ => {
                let mut chars = token.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                Value::from_char(c)
            }
        }
    }

    pub fn from_char(c: char) -> Option<Value> {
        match c.to_ascii_uppercase() {
            'A' => Some(Value::Ace),
            'K' => Some(Value::King),
            'Q' => Some(Value::Queen),
            'J' => Some(Value::Jack),
            'T' => Some(Value::Ten),
            '9' => Some(Value::Nine),
            '8' => Some(Value::Eight),
            '7' => Some(Value::Seven),
            '6' => Some(Value::Six),
            '5' => Some(Value::Five),
            '4' => Some(Value::Four),
            '3' => Some(Value::Three),
            '2' => Some(Value::Two),
            _ => None,
        }
    }

    /// Single character form used in hand labels (`T` for ten).
    pub fn to_char(&self) -> char {
        match self {
            Value::Ace => 'A',
            Value::King => 'K',
            Value::Queen => 'Q',
            Value::Jack => 'J',
            Value::Ten => 'T',
            Value::Nine => '9',
            Value::Eight => '8',
            Value::Seven => '7',
            Value::Six => '6',
            Value::Five => '5',
            Value::Four => '4',
            Value::Three => '3',
            Value::Two => '2',
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum Suit {
    Spade = 0,
    Club = 1,
    Heart = 2,
    Diamond = 3,
}

impl Suit {
    pub fn from_char(c: char) -> Option<Suit> {
        match c {
            '♠' | 's' | 'S' => Some(Suit::Spade),
            '♣' | 'c' | 'C' => Some(Suit::Club),
            '♥' | 'h' | 'H' => Some(Suit::Heart),
            '♦' | 'd' | 'D' => Some(Suit::Diamond),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Suit::Spade => '♠',
            Suit::Club => '♣',
            Suit::Heart => '♥',
            Suit::Diamond => '♦',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardParseError {
    #[error("card string is empty")]
    Empty,
    #[error("unknown card value in {0:?}")]
    UnknownValue(String),
    #[error("unknown suit in {0:?}")]
    UnknownSuit(String),
}

/// A single playing card as the table engine sends it, e.g. `"A♠"` or `"10♥"`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Card {
    pub value: Value,
    pub suit: Suit,
}

impl Card {
    pub fn new(value: Value, suit: Suit) -> Self {
        Card { value, suit }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The engine spells ten as "10".
        if self.value == Value::Ten {
            write!(f, "10{}", self.suit.symbol())
        } else {
            write!(f, "{}{}", self.value.to_char(), self.suit.symbol())
        }
    }
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let suit_char = s.chars().last().ok_or(CardParseError::Empty)?;
        let suit =
            Suit::from_char(suit_char).ok_or_else(|| CardParseError::UnknownSuit(s.to_string()))?;
        let value_part = &s[..s.len() - suit_char.len_utf8()];
        let value = Value::from_token(value_part)
            .ok_or_else(|| CardParseError::UnknownValue(s.to_string()))?;
        Ok(Card { value, suit })
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A hole card slot. Opponents' cards may arrive masked, in which case the
/// slot is `Hidden` rather than a parse failure.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum HoleCard {
    Known(Card),
    Hidden,
}

impl HoleCard {
    pub fn card(&self) -> Option<Card> {
        match self {
            HoleCard::Known(c) => Some(*c),
            HoleCard::Hidden => None,
        }
    }
}

impl From<Card> for HoleCard {
    fn from(card: Card) -> Self {
        HoleCard::Known(card)
    }
}

impl Serialize for HoleCard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            HoleCard::Known(c) => c.serialize(serializer),
            HoleCard::Hidden => serializer.serialize_str("??"),
        }
    }
}

impl<'de> Deserialize<'de> for HoleCard {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse::<Card>()
            .map(HoleCard::Known)
            .unwrap_or(HoleCard::Hidden))
    }
}

/// Parse a whitespace or comma separated list of cards.
pub fn parse_cards(s: &str) -> Result<Vec<Card>, CardParseError> {
    s.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_engine_format() {
        let c: Card = "A♠".parse().unwrap();
        assert_eq!(Card::new(Value::Ace, Suit::Spade), c);

        let ten: Card = "10♥".parse().unwrap();
        assert_eq!(Card::new(Value::Ten, Suit::Heart), ten);
    }

    #[test]
    fn test_parse_ascii_format() {
        assert_eq!(
            Card::new(Value::Ten, Suit::Diamond),
            "Td".parse::<Card>().unwrap()
        );
        assert_eq!(
            Card::new(Value::Seven, Suit::Club),
            "7c".parse::<Card>().unwrap()
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Err(CardParseError::Empty), "".parse::<Card>());
        assert!(matches!(
            "1♠".parse::<Card>(),
            Err(CardParseError::UnknownValue(_))
        ));
        assert!(matches!(
            "Ax".parse::<Card>(),
            Err(CardParseError::UnknownSuit(_))
        ));
    }

    #[test]
    fn test_display_matches_engine() {
        assert_eq!("10♦", Card::new(Value::Ten, Suit::Diamond).to_string());
        assert_eq!("K♣", Card::new(Value::King, Suit::Club).to_string());
    }

    #[test]
    fn test_hidden_hole_card() {
        let cards: Vec<HoleCard> = serde_json::from_str(r#"["A♠", "??"]"#).unwrap();
        assert_eq!(
            vec![
                HoleCard::Known(Card::new(Value::Ace, Suit::Spade)),
                HoleCard::Hidden
            ],
            cards
        );
    }

    #[test]
    fn test_board_rejects_garbage() {
        let board: Result<Vec<Card>, _> = serde_json::from_str(r#"["A♠", "zz"]"#);
        assert!(board.is_err());
    }

    #[test]
    fn test_parse_cards_list() {
        let cards = parse_cards("A♠ K♠, Q♠").unwrap();
        assert_eq!(3, cards.len());
        assert_eq!(Value::Queen, cards[2].value);
    }

    #[test]
    fn test_strength() {
        assert_eq!(14, Value::Ace.strength());
        assert_eq!(2, Value::Two.strength());
        assert_eq!(Some(Value::Ace), Value::from_index(12));
        assert_eq!(None, Value::from_index(13));
    }
}
