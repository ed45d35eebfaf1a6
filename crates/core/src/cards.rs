use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Sum a combo has to reach.
pub const TARGET_SUM: u32 = 11;
pub const MIN_VALUE: u8 = 1;
pub const MAX_VALUE: u8 = 10;

const LABELS: [&str; 10] = ["A", "2", "3", "4", "5", "6", "7", "8", "9", "10"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    #[error("card value {0} outside 1..=10")]
    OutOfRange(u8),
    #[error("unknown card label {0:?}")]
    UnknownLabel(String),
}

/// A suitless card worth 1 (ace) through 10.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "u8", into = "u8")]
pub struct Card {
    value: u8,
}

impl Card {
    pub const ACE: Card = Card { value: 1 };

    pub fn new(value: u8) -> Result<Self, CardError> {
        if (MIN_VALUE..=MAX_VALUE).contains(&value) {
            Ok(Self { value })
        } else {
            Err(CardError::OutOfRange(value))
        }
    }

    pub fn value(self) -> u8 {
        self.value
    }

    /// The value that pairs with this card to make 11.
    pub fn complement(self) -> Card {
        Card {
            value: TARGET_SUM as u8 - self.value,
        }
    }

    pub fn label(self) -> &'static str {
        LABELS[(self.value - MIN_VALUE) as usize]
    }

    pub fn all() -> impl Iterator<Item = Card> {
        (MIN_VALUE..=MAX_VALUE).map(|value| Card { value })
    }
}

impl TryFrom<u8> for Card {
    type Error = CardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Card::new(value)
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> Self {
        card.value
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Card {
    type Err = CardError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("a") {
            return Ok(Card::ACE);
        }
        let value: u8 = trimmed
            .parse()
            .map_err(|_| CardError::UnknownLabel(trimmed.to_string()))?;
        Card::new(value)
    }
}

/// Builds cards from raw values, e.g. for scripted deals.
pub fn cards(values: &[u8]) -> Result<Vec<Card>, CardError> {
    values.iter().map(|value| Card::new(*value)).collect()
}

pub fn sum_values(cards: impl IntoIterator<Item = Card>) -> u32 {
    cards.into_iter().map(|card| card.value as u32).sum()
}
