//! Observation encoding from a single seat's point of view
//!
//! Layout (indices into the vector):
//!   0..53    one value per deck position (see `CardVisibility`)
//!   53       active bid / 60
//!   54       active bidder relative to the observer / 4, or -1
//!   55..59   round points per seat / 30, observer first
//!   59..63   game scores per seat / 110, observer first
//!   63       trump suit / 4, or -1
//!   64..128  legal action mask as 0/1 (optional)

use hundredandten_engine::{
    Card, Game, GameStatus, Round, SelectableSuit, CARD_COUNT, MAX_BID, MAX_TRICK_SCORE,
    NUM_PLAYERS, WINNING_SCORE,
};
use serde::{Deserialize, Serialize};

use crate::{LegalMask, Observation, PlayerIdx, ACTION_SPACE_SIZE};

pub const CARD_OFFSET: usize = 0;
pub const BID_OFFSET: usize = CARD_OFFSET + CARD_COUNT;
pub const BIDDER_OFFSET: usize = BID_OFFSET + 1;
pub const ROUND_SCORE_OFFSET: usize = BIDDER_OFFSET + 1;
pub const GAME_SCORE_OFFSET: usize = ROUND_SCORE_OFFSET + NUM_PLAYERS;
pub const TRUMP_OFFSET: usize = GAME_SCORE_OFFSET + NUM_PLAYERS;

/// Length of the state part of the observation
pub const STATE_SIZE: usize = TRUMP_OFFSET + 1;

/// State plus appended legal mask
pub const STATE_WITH_MASK_SIZE: usize = STATE_SIZE + ACTION_SPACE_SIZE;

/// Written into the bidder and trump slots when there is none.
/// Lies outside the range of real values in both directions.
pub const ABSENT: f32 = -1.0;

/// What the observer knows about one card
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CardVisibility {
    Unknown,
    /// In the trick currently being played
    InTrick,
    InHand,
    /// Played in an earlier, completed trick
    Played,
    /// Discarded by the observer this round
    Discarded,
}

const ALL_VISIBILITIES: [CardVisibility; 5] = [
    CardVisibility::Unknown,
    CardVisibility::InTrick,
    CardVisibility::InHand,
    CardVisibility::Played,
    CardVisibility::Discarded,
];

impl CardVisibility {
    pub fn value(self) -> f32 {
        match self {
            CardVisibility::InTrick => 1.0,
            CardVisibility::InHand => 0.5,
            CardVisibility::Unknown => 0.0,
            CardVisibility::Played => -0.5,
            CardVisibility::Discarded => -1.0,
        }
    }
}

/// Numeric range of every observation element
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueRange {
    /// Values in [-1, 1]
    #[default]
    Signed,

    /// Values in [0, 1]; state values are mapped with (x + 1) / 2
    Unit,
}

impl ValueRange {
    pub fn bounds(self) -> (f32, f32) {
        match self {
            ValueRange::Signed => (-1.0, 1.0),
            ValueRange::Unit => (0.0, 1.0),
        }
    }

    /// Map a signed state value into this range
    pub fn map(self, x: f32) -> f32 {
        let x = x.clamp(-1.0, 1.0);
        match self {
            ValueRange::Signed => x,
            ValueRange::Unit => (x + 1.0) / 2.0,
        }
    }

    /// Inverse of `map`
    pub fn unmap(self, y: f32) -> f32 {
        match self {
            ValueRange::Signed => y,
            ValueRange::Unit => y * 2.0 - 1.0,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub range: ValueRange,

    /// Append the legal mask (as 0/1) after the state values
    pub append_legal_mask: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            range: ValueRange::Signed,
            append_legal_mask: true,
        }
    }
}

/// Trait for converting game state into observation vectors
pub trait FeatureExtractor: Clone {
    /// Length of every observation this extractor produces
    fn obs_size(&self) -> usize;

    /// Encode the game from `player`'s perspective
    fn encode(&self, game: &Game, player: PlayerIdx, mask: &LegalMask) -> Observation;

    /// Element range of the produced observations
    fn range(&self) -> ValueRange;
}

/// The observation layout described at the top of this module
#[derive(Clone, Debug, Default)]
pub struct BasicFeatureExtractor {
    config: FeatureConfig,
}

impl BasicFeatureExtractor {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }
}

impl FeatureExtractor for BasicFeatureExtractor {
    fn obs_size(&self) -> usize {
        if self.config.append_legal_mask {
            STATE_WITH_MASK_SIZE
        } else {
            STATE_SIZE
        }
    }

    fn range(&self) -> ValueRange {
        self.config.range
    }

    fn encode(&self, game: &Game, player: PlayerIdx, mask: &LegalMask) -> Observation {
        let range = self.config.range;
        let mut state = [0.0f32; STATE_SIZE];

        if let Some(round) = game.active_round() {
            // After the game is won the card segment stays at Unknown
            if game.status() != GameStatus::Won {
                for (slot, vis) in state[CARD_OFFSET..BID_OFFSET]
                    .iter_mut()
                    .zip(card_visibility(round, player))
                {
                    *slot = vis.value();
                }
            }

            state[BID_OFFSET] =
                round.active_bid().map_or(0, |bid| bid.value()) as f32 / MAX_BID as f32;
            state[BIDDER_OFFSET] = match round.active_bidder() {
                Some(bidder) => relative_seat(bidder, player) as f32 / NUM_PLAYERS as f32,
                None => ABSENT,
            };

            let points = round.scores();
            let scores = game.scores();
            for offset in 0..NUM_PLAYERS {
                let seat = rotate(player, offset);
                state[ROUND_SCORE_OFFSET + offset] = points[seat] as f32 / MAX_TRICK_SCORE as f32;
                state[GAME_SCORE_OFFSET + offset] = scores[seat] as f32 / WINNING_SCORE as f32;
            }

            state[TRUMP_OFFSET] = round
                .trump()
                .map_or(ABSENT, |suit| suit as u8 as f32 / NUM_PLAYERS as f32);
        } else {
            state[BIDDER_OFFSET] = ABSENT;
            state[TRUMP_OFFSET] = ABSENT;
        }

        let mut features: Vec<f32> = state.iter().map(|&x| range.map(x)).collect();
        if self.config.append_legal_mask {
            features.extend(mask.as_slice().iter().map(|&legal| if legal { 1.0 } else { 0.0 }));
        }

        debug_assert_eq!(features.len(), self.obs_size());
        Observation::from_slice(&features, &[features.len() as i32])
    }
}

/// Helper to create a zero observation of a given size
pub fn create_zero_observation(size: usize) -> Observation {
    Observation::zeros(&[size as i32])
}

/// Seat `offset` places to the left of `player`
fn rotate(player: PlayerIdx, offset: usize) -> usize {
    (player as usize + offset) % NUM_PLAYERS
}

/// How many places to the left of `player` the given seat sits
fn relative_seat(seat: PlayerIdx, player: PlayerIdx) -> usize {
    (seat as usize + NUM_PLAYERS - player as usize) % NUM_PLAYERS
}

/// Per deck position, what `player` can see.
///
/// Later sources overwrite earlier ones: played, then in-trick, then hand, then discards.
pub fn card_visibility(round: &Round, player: PlayerIdx) -> [CardVisibility; CARD_COUNT] {
    let mut vis = [CardVisibility::Unknown; CARD_COUNT];

    for trick in round.tricks() {
        for play in &trick.plays {
            vis[play.card.index()] = CardVisibility::Played;
        }
    }
    if let Some(trick) = round.active_trick().filter(|t| !t.is_complete()) {
        for play in &trick.plays {
            vis[play.card.index()] = CardVisibility::InTrick;
        }
    }
    for card in round.hand(player) {
        vis[card.index()] = CardVisibility::InHand;
    }
    for card in round.discards_of(player) {
        vis[card.index()] = CardVisibility::Discarded;
    }

    vis
}

/// Recover card states from an observation's card segment
pub fn decode_card_visibility(obs: &[f32], range: ValueRange) -> [CardVisibility; CARD_COUNT] {
    let mut vis = [CardVisibility::Unknown; CARD_COUNT];
    for (slot, &y) in vis.iter_mut().zip(&obs[CARD_OFFSET..BID_OFFSET]) {
        let x = range.unmap(y);
        *slot = ALL_VISIBILITIES
            .into_iter()
            .min_by(|a, b| (a.value() - x).abs().total_cmp(&(b.value() - x).abs()))
            .unwrap_or(CardVisibility::Unknown);
    }
    vis
}

/// Cards the observer holds, read back from an observation
pub fn decode_hand(obs: &[f32], range: ValueRange) -> Vec<Card> {
    decode_card_visibility(obs, range)
        .into_iter()
        .enumerate()
        .filter(|(_, vis)| *vis == CardVisibility::InHand)
        .filter_map(|(idx, _)| Card::from_index(idx))
        .collect()
}

/// Trump suit read back from an observation, or None before trump is named
pub fn decode_trump(obs: &[f32], range: ValueRange) -> Option<SelectableSuit> {
    let x = range.unmap(obs[TRUMP_OFFSET]);
    if x < 0.0 {
        return None;
    }
    SelectableSuit::from_index((x * NUM_PLAYERS as f32).round() as u8)
}
