//! Cards, suits, and the fixed deck ordering.
//!
//! The deck position of a card (`Card::index`) is stable and is used directly
//! as the card-play action id by the RL environment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CARD_COUNT;

/// Number of non-joker cards per suit
pub const CARDS_PER_SUIT: usize = 13;

/// Card suits (order fixed for deck indexing)
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CardSuit {
    Clubs = 0,
    Spades = 1,
    Diamonds = 2,
    Hearts = 3,
    Joker = 4,
}

impl CardSuit {
    pub fn is_red(self) -> bool {
        matches!(self, CardSuit::Diamonds | CardSuit::Hearts)
    }

    pub fn name(self) -> &'static str {
        match self {
            CardSuit::Clubs => "Clubs",
            CardSuit::Spades => "Spades",
            CardSuit::Diamonds => "Diamonds",
            CardSuit::Hearts => "Hearts",
            CardSuit::Joker => "Joker",
        }
    }
}

/// A suit that can be named as trump
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SelectableSuit {
    Clubs = 0,
    Spades = 1,
    Diamonds = 2,
    Hearts = 3,
}

pub const ALL_SELECTABLE_SUITS: [SelectableSuit; 4] = [
    SelectableSuit::Clubs,
    SelectableSuit::Spades,
    SelectableSuit::Diamonds,
    SelectableSuit::Hearts,
];

impl SelectableSuit {
    /// Convert from u8 index to SelectableSuit
    pub fn from_index(idx: u8) -> Option<SelectableSuit> {
        ALL_SELECTABLE_SUITS.get(idx as usize).copied()
    }

    pub fn as_card_suit(self) -> CardSuit {
        match self {
            SelectableSuit::Clubs => CardSuit::Clubs,
            SelectableSuit::Spades => CardSuit::Spades,
            SelectableSuit::Diamonds => CardSuit::Diamonds,
            SelectableSuit::Hearts => CardSuit::Hearts,
        }
    }

    pub fn is_red(self) -> bool {
        self.as_card_suit().is_red()
    }
}

impl fmt::Display for SelectableSuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_card_suit().name())
    }
}

/// Card numbers, lowest face value first
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardNumber {
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
    Joker = 13,
}

const SUIT_NUMBERS: [CardNumber; CARDS_PER_SUIT] = [
    CardNumber::Two,
    CardNumber::Three,
    CardNumber::Four,
    CardNumber::Five,
    CardNumber::Six,
    CardNumber::Seven,
    CardNumber::Eight,
    CardNumber::Nine,
    CardNumber::Ten,
    CardNumber::Jack,
    CardNumber::Queen,
    CardNumber::King,
    CardNumber::Ace,
];

const DECK_SUITS: [CardSuit; 4] = [
    CardSuit::Clubs,
    CardSuit::Spades,
    CardSuit::Diamonds,
    CardSuit::Hearts,
];

impl CardNumber {
    pub fn name(self) -> &'static str {
        match self {
            CardNumber::Two => "2",
            CardNumber::Three => "3",
            CardNumber::Four => "4",
            CardNumber::Five => "5",
            CardNumber::Six => "6",
            CardNumber::Seven => "7",
            CardNumber::Eight => "8",
            CardNumber::Nine => "9",
            CardNumber::Ten => "10",
            CardNumber::Jack => "J",
            CardNumber::Queen => "Q",
            CardNumber::King => "K",
            CardNumber::Ace => "A",
            CardNumber::Joker => "Joker",
        }
    }
}

/// A single playing card
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub number: CardNumber,
    pub suit: CardSuit,
}

impl Card {
    pub const JOKER: Card = Card {
        number: CardNumber::Joker,
        suit: CardSuit::Joker,
    };

    pub const fn new(number: CardNumber, suit: CardSuit) -> Self {
        Card { number, suit }
    }

    /// Card at a fixed deck position, or None if `idx >= CARD_COUNT`
    pub fn from_index(idx: usize) -> Option<Card> {
        if idx >= CARD_COUNT {
            return None;
        }
        Some(card_at(idx))
    }

    /// Fixed deck position: suit * 13 + number, Joker last
    pub fn index(self) -> usize {
        match self.suit {
            CardSuit::Joker => CARD_COUNT - 1,
            suit => suit as usize * CARDS_PER_SUIT + self.number as usize,
        }
    }

    /// The Joker and the Ace of Hearts are trump whatever suit is named
    pub fn always_trump(self) -> bool {
        self.suit == CardSuit::Joker
            || (self.suit == CardSuit::Hearts && self.number == CardNumber::Ace)
    }

    pub fn is_trump(self, trump: SelectableSuit) -> bool {
        self.always_trump() || self.suit == trump.as_card_suit()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.suit {
            CardSuit::Joker => f.write_str("Joker"),
            suit => write!(f, "{} of {}", self.number.name(), suit.name()),
        }
    }
}

/// Card at a deck position; positions past the suits map to the Joker
fn card_at(idx: usize) -> Card {
    if idx >= DECK_SUITS.len() * CARDS_PER_SUIT {
        return Card::JOKER;
    }
    Card::new(
        SUIT_NUMBERS[idx % CARDS_PER_SUIT],
        DECK_SUITS[idx / CARDS_PER_SUIT],
    )
}

/// The full deck in fixed index order
pub fn deck() -> [Card; CARD_COUNT] {
    std::array::from_fn(card_at)
}

// =============================================================================
// Card ranking
// =============================================================================

/// Strength of a trump card (higher wins), or None if the card is not trump.
///
/// Order: 5, J, Joker, A of Hearts, A, K, Q, then red 10..6,4..2 or
/// black 2..4,6..10.
pub fn trump_strength(card: Card, trump: SelectableSuit) -> Option<u8> {
    if !card.is_trump(trump) {
        return None;
    }

    let strength = match card.number {
        CardNumber::Joker => 18,
        CardNumber::Ace if card.suit == CardSuit::Hearts => 17,
        CardNumber::Five => 20,
        CardNumber::Jack => 19,
        CardNumber::Ace => 16,
        CardNumber::King => 15,
        CardNumber::Queen => 14,
        n if trump.is_red() => match n {
            CardNumber::Ten => 13,
            CardNumber::Nine => 12,
            CardNumber::Eight => 11,
            CardNumber::Seven => 10,
            CardNumber::Six => 9,
            CardNumber::Four => 8,
            CardNumber::Three => 7,
            _ => 6,
        },
        n => match n {
            CardNumber::Two => 13,
            CardNumber::Three => 12,
            CardNumber::Four => 11,
            CardNumber::Six => 10,
            CardNumber::Seven => 9,
            CardNumber::Eight => 8,
            CardNumber::Nine => 7,
            _ => 6,
        },
    };

    Some(strength)
}

/// Strength of a non-trump card within its own suit (higher wins).
///
/// Red suits: K, Q, J, 10..2, A. Black suits: K, Q, J, A, 2..10.
pub fn off_suit_strength(card: Card) -> u8 {
    match card.number {
        CardNumber::King => 13,
        CardNumber::Queen => 12,
        CardNumber::Jack => 11,
        CardNumber::Joker => 0,
        CardNumber::Ace => {
            if card.suit.is_red() {
                0
            } else {
                10
            }
        }
        n => {
            let face = n as u8; // Two=0 .. Ten=8
            if card.suit.is_red() {
                face + 1
            } else {
                9 - face
            }
        }
    }
}
