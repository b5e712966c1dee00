//! Action encoding: EnvAction ↔ ActionId
//!
//! Fixed global action space of size 64. Ids 0..53 play the card at that deck
//! position; the static actions follow contiguously in a fixed order. Trained
//! policies depend on these ids, so the order must never change.

use hundredandten_engine::{BidAmount, Card, SelectableSuit, CARD_COUNT};

use super::ActionId;

/// Number of non-card actions
pub const STATIC_ACTION_COUNT: usize = 11;

/// Total size of the discrete action space
pub const ACTION_SPACE_SIZE: usize = CARD_COUNT + STATIC_ACTION_COUNT;

/// Non-card actions, numbered immediately above the card ids
#[repr(u16)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum StaticAction {
    Pass = CARD_COUNT as u16,
    Fifteen,
    Twenty,
    TwentyFive,
    Thirty,
    ShootTheMoon,
    SelectClubs,
    SelectSpades,
    SelectDiamonds,
    SelectHearts,
    Discard,
}

pub const ALL_STATIC_ACTIONS: [StaticAction; STATIC_ACTION_COUNT] = [
    StaticAction::Pass,
    StaticAction::Fifteen,
    StaticAction::Twenty,
    StaticAction::TwentyFive,
    StaticAction::Thirty,
    StaticAction::ShootTheMoon,
    StaticAction::SelectClubs,
    StaticAction::SelectSpades,
    StaticAction::SelectDiamonds,
    StaticAction::SelectHearts,
    StaticAction::Discard,
];

impl StaticAction {
    pub fn id(self) -> ActionId {
        self as ActionId
    }

    pub fn from_id(id: ActionId) -> Option<StaticAction> {
        let offset = (id as usize).checked_sub(CARD_COUNT)?;
        ALL_STATIC_ACTIONS.get(offset).copied()
    }
}

/// A decoded action, tagged by the kind of game command it issues
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EnvAction {
    Play(Card),
    Bid(BidAmount),
    SelectTrump(SelectableSuit),
    /// Throw away every card that is not trump
    Discard,
}

/// The phase-bound group an action belongs to
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ActionFamily {
    Play,
    Bid,
    SelectTrump,
    Discard,
}

impl EnvAction {
    pub fn family(&self) -> ActionFamily {
        match self {
            EnvAction::Play(_) => ActionFamily::Play,
            EnvAction::Bid(_) => ActionFamily::Bid,
            EnvAction::SelectTrump(_) => ActionFamily::SelectTrump,
            EnvAction::Discard => ActionFamily::Discard,
        }
    }
}

/// Encodes/decodes between EnvActions and discrete ActionIds
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ActionEncoder;

impl ActionEncoder {
    /// Returns the size of the discrete action space
    pub const fn action_space_size() -> usize {
        ACTION_SPACE_SIZE
    }

    /// Encode an EnvAction into its ActionId
    pub fn encode(action: &EnvAction) -> ActionId {
        let id = match *action {
            EnvAction::Play(card) => card.index() as ActionId,
            EnvAction::Bid(amount) => match amount {
                BidAmount::Pass => StaticAction::Pass.id(),
                BidAmount::Fifteen => StaticAction::Fifteen.id(),
                BidAmount::Twenty => StaticAction::Twenty.id(),
                BidAmount::TwentyFive => StaticAction::TwentyFive.id(),
                BidAmount::Thirty => StaticAction::Thirty.id(),
                BidAmount::ShootTheMoon => StaticAction::ShootTheMoon.id(),
            },
            EnvAction::SelectTrump(suit) => match suit {
                SelectableSuit::Clubs => StaticAction::SelectClubs.id(),
                SelectableSuit::Spades => StaticAction::SelectSpades.id(),
                SelectableSuit::Diamonds => StaticAction::SelectDiamonds.id(),
                SelectableSuit::Hearts => StaticAction::SelectHearts.id(),
            },
            EnvAction::Discard => StaticAction::Discard.id(),
        };

        debug_assert!(
            (id as usize) < ACTION_SPACE_SIZE,
            "ActionId {id} out of range"
        );

        id
    }

    /// Decode an ActionId, or None if `id >= ACTION_SPACE_SIZE`.
    ///
    /// Every in-range id decodes; whether it is legal right now is decided
    /// by the legal action mask.
    pub fn try_decode(id: ActionId) -> Option<EnvAction> {
        if let Some(card) = Card::from_index(id as usize) {
            return Some(EnvAction::Play(card));
        }

        let action = match StaticAction::from_id(id)? {
            StaticAction::Pass => EnvAction::Bid(BidAmount::Pass),
            StaticAction::Fifteen => EnvAction::Bid(BidAmount::Fifteen),
            StaticAction::Twenty => EnvAction::Bid(BidAmount::Twenty),
            StaticAction::TwentyFive => EnvAction::Bid(BidAmount::TwentyFive),
            StaticAction::Thirty => EnvAction::Bid(BidAmount::Thirty),
            StaticAction::ShootTheMoon => EnvAction::Bid(BidAmount::ShootTheMoon),
            StaticAction::SelectClubs => EnvAction::SelectTrump(SelectableSuit::Clubs),
            StaticAction::SelectSpades => EnvAction::SelectTrump(SelectableSuit::Spades),
            StaticAction::SelectDiamonds => EnvAction::SelectTrump(SelectableSuit::Diamonds),
            StaticAction::SelectHearts => EnvAction::SelectTrump(SelectableSuit::Hearts),
            StaticAction::Discard => EnvAction::Discard,
        };
        Some(action)
    }

    /// Decode an ActionId back into an EnvAction.
    ///
    /// Panics if id >= ACTION_SPACE_SIZE.
    pub fn decode(id: ActionId) -> EnvAction {
        match Self::try_decode(id) {
            Some(action) => action,
            None => panic!("ActionId {id} >= ACTION_SPACE_SIZE {ACTION_SPACE_SIZE}"),
        }
    }
}
