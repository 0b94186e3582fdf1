//! Deck engine: the standard 52-card deck, an unbiased shuffle, and the two-hand deal.
//!
//! Cards travel over the wire as short strings, rank first then suit letter
//! (`"10H"`, `"QS"`, `"2C"`).

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::config::lobby::{HAND_SIZE, SEATS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    fn letter(self) -> char {
        match self {
            Suit::Spades => 'S',
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
            Suit::Clubs => 'C',
        }
    }

    fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'S' => Some(Suit::Spades),
            'H' => Some(Suit::Hearts),
            'D' => Some(Suit::Diamonds),
            'C' => Some(Suit::Clubs),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    fn label(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        let label = label.to_ascii_uppercase();
        Rank::ALL.into_iter().find(|r| r.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.letter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid card: {0:?}")]
pub struct CardParseError(String);

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let suit = chars
            .next_back()
            .and_then(Suit::from_letter)
            .ok_or_else(|| CardParseError(s.to_string()))?;
        let rank = Rank::from_label(chars.as_str()).ok_or_else(|| CardParseError(s.to_string()))?;
        Ok(Card { rank, suit })
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

impl TryFrom<String> for Card {
    type Error = CardParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A player's private cards, in deal order.
pub type Hand = Vec<Card>;

/// The 52 cards in canonical order: suit by suit, ranks ascending.
pub fn build_deck() -> Vec<Card> {
    Suit::ALL
        .iter()
        .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card { rank, suit }))
        .collect()
}

/// Fisher-Yates shuffle: walk from the last index down, swapping each slot with
/// a uniformly chosen index in `[0, i]`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Result of dealing a fresh deck to both seats.
#[derive(Debug, Clone)]
pub struct Deal {
    /// Hand for each seat, indexed by seat.
    pub hands: [Hand; SEATS],
    /// Undealt cards. Owned by nobody and discarded with the deal.
    pub stock: Vec<Card>,
}

/// Shuffle a fresh deck and deal `HAND_SIZE` cards to each seat.
pub fn deal_two_hands<R: Rng + ?Sized>(rng: &mut R) -> Deal {
    let mut deck = build_deck();
    shuffle(&mut deck, rng);

    let stock = deck.split_off(HAND_SIZE * SEATS);
    let second = deck.split_off(HAND_SIZE);
    Deal {
        hands: [deck, second],
        stock,
    }
}
