//! Hundred and Ten Game Engine
//!
//! A state engine for the four-player trick-taking card game Hundred and Ten.
//! A `Game` owns the seats, the cumulative scores and the history of rounds;
//! every mutation goes through `Game::act`, which validates the action
//! against the active round and returns a `GameError` instead of ignoring it.

mod card;
mod error;
mod game;
mod round;

pub use card::*;
pub use error::GameError;
pub use game::Game;
pub use round::{Round, Trick};

use serde::{Deserialize, Serialize};

// =============================================================================
// Basic types and constants
// =============================================================================

/// Seat identifier: 0..NUM_PLAYERS-1, also the join order
pub type SeatId = u8;

pub const NUM_PLAYERS: usize = 4;
pub const HAND_SIZE: usize = 5;
pub const CARD_COUNT: usize = 53;
pub const TRICKS_PER_ROUND: usize = HAND_SIZE;

/// Points for each trick won, and again for holding the round's best trump
pub const TRICK_VALUE: i32 = 5;

/// Maximum points a single seat can take in one round
pub const MAX_TRICK_SCORE: i32 = TRICK_VALUE * (TRICKS_PER_ROUND as i32 + 1);

/// First seat to reach this score wins the game
pub const WINNING_SCORE: i32 = 110;

/// Seat to the left of `seat`
pub fn next_seat(seat: SeatId) -> SeatId {
    ((seat as usize + 1) % NUM_PLAYERS) as SeatId
}

/// Bid amounts (value is the number of points committed)
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BidAmount {
    Pass = 0,
    Fifteen = 15,
    Twenty = 20,
    TwentyFive = 25,
    Thirty = 30,
    ShootTheMoon = 60,
}

pub const ALL_BIDS: [BidAmount; 6] = [
    BidAmount::Pass,
    BidAmount::Fifteen,
    BidAmount::Twenty,
    BidAmount::TwentyFive,
    BidAmount::Thirty,
    BidAmount::ShootTheMoon,
];

/// Largest bid (used to normalize bid observations)
pub const MAX_BID: i32 = BidAmount::ShootTheMoon as i32;

impl BidAmount {
    pub fn value(self) -> i32 {
        self as i32
    }
}

// =============================================================================
// Status
// =============================================================================

/// Status of a single round
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum RoundStatus {
    Bidding,
    TrumpSelection,
    Discard,
    Tricks,
    Completed,
    CompletedNoBidders,
}

/// Status of the game as a whole
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Seats are still joining
    Waiting,
    Bidding,
    TrumpSelection,
    Discard,
    Tricks,
    Won,
}

// =============================================================================
// Actions
// =============================================================================

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub seat: SeatId,
    pub amount: BidAmount,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Play {
    pub seat: SeatId,
    pub card: Card,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Discard {
    pub seat: SeatId,
    pub cards: Vec<Card>,
}

/// The single mutation accepted by `Game::act`
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Bid(Bid),
    SelectTrump { seat: SeatId, suit: SelectableSuit },
    Discard(Discard),
    Play(Play),
}

impl Action {
    /// Seat performing the action
    pub fn seat(&self) -> SeatId {
        match self {
            Action::Bid(bid) => bid.seat,
            Action::SelectTrump { seat, .. } => *seat,
            Action::Discard(discard) => discard.seat,
            Action::Play(play) => play.seat,
        }
    }
}
