//! Core RL types for the Hundred and Ten environment

use hundredandten_engine::{Game, GameError, GameStatus, SeatId, NUM_PLAYERS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::LegalityConfig;

/// Discrete action identifier (0..ACTION_SPACE_SIZE-1)
pub type ActionId = u16;

/// Reward value (float)
pub type Reward = f32;

/// Index of a seat at the table (0..NUM_PLAYERS-1)
pub type PlayerIdx = SeatId;

/// Dense f32 array with an explicit shape
#[derive(Clone, Debug, PartialEq)]
pub struct SimpleArray {
    data: Vec<f32>,
    shape: Vec<i32>,
}

impl SimpleArray {
    /// Create a new array from a slice with the given shape
    pub fn from_slice(data: &[f32], shape: &[i32]) -> Self {
        let expected_len: i32 = shape.iter().product();
        assert_eq!(
            data.len(),
            expected_len as usize,
            "Data length {} doesn't match shape {:?}",
            data.len(),
            shape
        );
        Self {
            data: data.to_vec(),
            shape: shape.to_vec(),
        }
    }

    /// Create a zero-filled array with the given shape
    pub fn zeros(shape: &[i32]) -> Self {
        let len: i32 = shape.iter().product();
        Self {
            data: vec![0.0; len as usize],
            shape: shape.to_vec(),
        }
    }

    pub fn shape(&self) -> &[i32] {
        &self.shape
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }
}

/// Observation as array of dtype f32 and shape [obs_size]
pub type Observation = SimpleArray;

/// Reward schemes supported by the environment
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardScheme {
    /// reward[player] = cumulative game score of that seat after every step,
    /// plus `winner_bonus` for the winner at the terminal step.
    #[default]
    GameScore,

    /// Dense incremental reward:
    /// reward[player] = score_after[player] - score_before[player],
    /// plus `winner_bonus` for the winner at the terminal step.
    DenseScoreDelta,

    /// Terminal-only reward:
    /// rewards are 0 until game over; at game over:
    /// reward[player] = final_score[player] - mean(final_scores).
    TerminalOnly,
}

/// How the Discard action chooses the cards to throw away
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardPolicy {
    /// Keep the trump suit plus the always-trump cards (Joker, Ace of Hearts)
    #[default]
    KeepTrump,

    /// Keep only cards of the named trump suit
    KeepTrumpSuit,
}

/// Environment configuration parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Rule variants used when computing legal actions
    pub legality: LegalityConfig,

    /// Reward computation strategy
    pub reward_scheme: RewardScheme,

    /// Added to the winner's reward component on the terminal step
    pub winner_bonus: Reward,

    /// Which cards the Discard action throws away
    pub discard_policy: DiscardPolicy,

    /// If true, EnvStep.state contains a full Game clone for debugging
    pub include_full_state_in_step: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            legality: LegalityConfig::default(),
            reward_scheme: RewardScheme::default(),
            winner_bonus: 60.0,
            discard_policy: DiscardPolicy::default(),
            include_full_state_in_step: false,
        }
    }
}

/// Lifecycle of one episode
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EpisodeStatus {
    NotStarted,
    InProgress,
    Terminal,
}

/// Error types for Environment::reset() and Environment::step()
#[derive(Debug, Error)]
pub enum StepError {
    /// step() called before reset() or after the episode has terminated
    #[error("episode is not running")]
    EpisodeDone,

    /// The engine refused to seat players or start the game
    #[error("failed to start a new game: {0}")]
    Reset(#[source] GameError),

    /// The engine rejected an action the legality mask approved.
    /// The mask and the engine disagree; the episode cannot continue.
    #[error("engine rejected legal action {action}: {source}")]
    EngineDivergence {
        action: ActionId,
        #[source]
        source: GameError,
    },
}

/// Shape of the observation and size of the action space
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SpaceDescriptor {
    pub observation_shape: [usize; 1],
    pub action_count: usize,
}

/// Extra information about a transition
#[derive(Clone, Debug, PartialEq)]
pub struct StepInfo {
    /// Engine status after the transition
    pub status: GameStatus,

    /// Seat that chose the action (None for reset())
    pub acting_player: Option<PlayerIdx>,

    /// True if the episode ended because the action was out of range or illegal
    pub illegal_action: bool,

    /// Winner, once the game is won
    pub winner: Option<PlayerIdx>,
}

/// The result of either reset() or step() in an environment
pub struct EnvStep<O, R> {
    /// Observation from the perspective of `current_player`
    pub observation: O,

    /// Reward per seat for the most recent transition.
    /// For reset(), this is all zeros.
    pub rewards: [R; NUM_PLAYERS],

    /// True if the episode has terminated
    pub done: bool,

    /// Seat whose turn it is *after* this step
    pub current_player: PlayerIdx,

    /// Mask over the discrete action space for `current_player`
    /// (all false once the episode is done).
    pub legal_action_mask: crate::LegalMask,

    /// The last action taken, if any.
    /// For reset(), this is None.
    pub last_action: Option<ActionId>,

    pub info: StepInfo,

    /// Optional full Game for debugging.
    /// Populated only if EnvConfig.include_full_state_in_step is true.
    pub state: Option<Game>,
}

/// Transition struct for storing experience in replay buffer
#[derive(Clone)]
pub struct Transition {
    /// Which seat made this transition
    pub player: PlayerIdx,

    /// Observation before the action
    pub observation_before: Observation,

    /// The action taken
    pub action_id: ActionId,

    /// Reward received
    pub reward: Reward,

    /// Observation after the action (from the next acting seat's perspective)
    pub observation_after: Observation,

    /// Whether the episode ended after this action
    pub done: bool,
}

/// Outcome of a complete episode
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeSummary {
    pub steps: u32,
    pub rewards: [Reward; NUM_PLAYERS],
    pub scores: [i32; NUM_PLAYERS],
    pub winner: Option<PlayerIdx>,
    pub illegal_action: bool,
}
