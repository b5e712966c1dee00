//! Engine error type

use thiserror::Error;

use crate::{BidAmount, Card, RoundStatus, SeatId};

/// Reasons the engine refuses a lifecycle call or an action
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum GameError {
    #[error("seat {0} does not exist")]
    InvalidSeat(SeatId),

    #[error("seat {0} has already joined")]
    SeatTaken(SeatId),

    #[error("game needs {needed} players, only {joined} joined")]
    NotEnoughPlayers { needed: usize, joined: usize },

    #[error("game has already started")]
    AlreadyStarted,

    #[error("game has not started")]
    NotStarted,

    #[error("game is over")]
    GameOver,

    #[error("action not allowed while status is {0:?}")]
    WrongPhase(RoundStatus),

    #[error("it is not seat {0}'s turn")]
    NotPlayersTurn(SeatId),

    #[error("bid {0:?} is not available")]
    BidNotAvailable(BidAmount),

    #[error("{0} is not in hand")]
    CardNotInHand(Card),

    #[error("{0} listed more than once")]
    DuplicateCard(Card),

    #[error("trump was led and {0} is not trump")]
    MustPlayTrump(Card),
}
