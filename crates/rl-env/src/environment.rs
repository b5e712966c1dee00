//! RL Environment trait and HundredAndTenEnv implementation

use hundredandten_engine::{
    Action, Bid, Card, Discard, Game, GameError, GameStatus, Play, SeatId, NUM_PLAYERS,
};
use rand::Rng;
use tracing::{debug, error, trace, warn};

use crate::render::EnvView;
use crate::reward::{illegal_action_rewards, transition_rewards};
use crate::{
    legal_action_mask, ActionEncoder, ActionId, Agent, AgentInput, DiscardPolicy, EnvAction,
    EnvConfig, EnvStep, EpisodeStatus, EpisodeSummary, FeatureExtractor, LegalMask, Observation,
    PlayerIdx, Reward, SpaceDescriptor, StepError, StepInfo, Transition, ACTION_SPACE_SIZE,
};

/// Generic environment interface for RL
pub trait Environment {
    /// Type used to represent observations
    type ObservationType;

    /// Type used to represent actions
    type ActionType;

    /// Type used to represent rewards
    type RewardType;

    /// Reset the environment to a fresh episode (new game).
    ///
    /// Returns the first EnvStep, representing the initial state prior
    /// to any actions.
    fn reset(
        &mut self,
        rng: &mut impl Rng,
    ) -> Result<EnvStep<Self::ObservationType, Self::RewardType>, StepError>;

    /// Apply an action for the current player, advance the environment
    /// by one step, and return the resulting EnvStep.
    fn step(
        &mut self,
        action: Self::ActionType,
        rng: &mut impl Rng,
    ) -> Result<EnvStep<Self::ObservationType, Self::RewardType>, StepError>;

    /// Observation shape and action count; constant for the environment's lifetime
    fn spaces(&self) -> SpaceDescriptor;

    /// Legal actions for the current player (all false unless an episode is running)
    fn legal_action_mask(&self) -> LegalMask;

    /// Human-readable description of the current state
    fn render(&self) -> String;
}

/// Hundred and Ten RL Environment
pub struct HundredAndTenEnv<F: FeatureExtractor> {
    /// Underlying engine state
    pub game: Game,

    /// Environment configuration
    pub config: EnvConfig,

    /// Feature extractor for building observations
    pub features: F,

    /// Seat whose turn it is; 0 when the engine reports nobody
    pub current_player: PlayerIdx,

    /// Last action applied (ActionId), if any
    pub last_action: Option<ActionId>,

    status: EpisodeStatus,
}

impl<F: FeatureExtractor> HundredAndTenEnv<F> {
    /// Create a new environment with the given configuration and feature extractor.
    ///
    /// The environment is not initialized until reset() is called.
    pub fn new(config: EnvConfig, features: F) -> Self {
        Self {
            game: Game::new(),
            config,
            features,
            current_player: 0,
            last_action: None,
            status: EpisodeStatus::NotStarted,
        }
    }

    pub fn status(&self) -> EpisodeStatus {
        self.status
    }

    /// Build the legal action mask for the current state
    pub fn build_legal_action_mask(&self) -> LegalMask {
        if self.status != EpisodeStatus::InProgress {
            return LegalMask::empty();
        }
        legal_action_mask(&self.game, self.current_player, &self.config.legality)
    }

    fn sync_current_player(&mut self) {
        self.current_player = self.game.active_player().unwrap_or(0);
    }

    /// Translate a decoded action into an engine command for `seat`
    fn to_engine_action(&self, seat: SeatId, action: EnvAction) -> Result<Action, GameError> {
        let action = match action {
            EnvAction::Play(card) => Action::Play(Play { seat, card }),
            EnvAction::Bid(amount) => Action::Bid(Bid { seat, amount }),
            EnvAction::SelectTrump(suit) => Action::SelectTrump { seat, suit },
            EnvAction::Discard => {
                let round = self.game.active_round().ok_or(GameError::NotStarted)?;
                let trump = round.trump().ok_or(GameError::WrongPhase(round.status()))?;
                let keep = |card: &Card| match self.config.discard_policy {
                    DiscardPolicy::KeepTrump => card.is_trump(trump),
                    DiscardPolicy::KeepTrumpSuit => card.suit == trump.as_card_suit(),
                };
                let cards = round
                    .hand(seat)
                    .iter()
                    .copied()
                    .filter(|card| !keep(card))
                    .collect();
                Action::Discard(Discard { seat, cards })
            }
        };
        Ok(action)
    }

    /// The mask and the engine disagree; the episode cannot continue
    fn diverge(&mut self, player: PlayerIdx, action_id: ActionId, source: GameError) -> StepError {
        error!(
            player,
            action_id,
            %source,
            "engine rejected an action the mask allowed"
        );
        self.status = EpisodeStatus::Terminal;
        StepError::EngineDivergence {
            action: action_id,
            source,
        }
    }

    fn build_step(
        &self,
        rewards: [Reward; NUM_PLAYERS],
        acting_player: Option<PlayerIdx>,
        illegal_action: bool,
    ) -> EnvStep<Observation, Reward> {
        let legal_action_mask = self.build_legal_action_mask();
        let observation = self
            .features
            .encode(&self.game, self.current_player, &legal_action_mask);

        let state = if self.config.include_full_state_in_step {
            Some(self.game.clone())
        } else {
            None
        };

        EnvStep {
            observation,
            rewards,
            done: self.status == EpisodeStatus::Terminal,
            current_player: self.current_player,
            legal_action_mask,
            last_action: self.last_action,
            info: StepInfo {
                status: self.game.status(),
                acting_player,
                illegal_action,
                winner: self.game.winner(),
            },
            state,
        }
    }
}

impl<F: FeatureExtractor> Environment for HundredAndTenEnv<F> {
    type ObservationType = Observation;
    type ActionType = ActionId;
    type RewardType = Reward;

    fn reset(&mut self, rng: &mut impl Rng) -> Result<EnvStep<Observation, Reward>, StepError> {
        let mut game = Game::new();
        for seat in 0..NUM_PLAYERS as SeatId {
            game.join(seat).map_err(StepError::Reset)?;
        }
        game.start_game(rng).map_err(StepError::Reset)?;

        self.game = game;
        self.last_action = None;
        self.status = EpisodeStatus::InProgress;
        self.sync_current_player();

        debug!(current_player = self.current_player, "new game");
        Ok(self.build_step([0.0; NUM_PLAYERS], None, false))
    }

    fn step(
        &mut self,
        action_id: ActionId,
        rng: &mut impl Rng,
    ) -> Result<EnvStep<Observation, Reward>, StepError> {
        if self.status != EpisodeStatus::InProgress {
            return Err(StepError::EpisodeDone);
        }

        let acting = self.current_player;

        // Out-of-range ids are never legal
        if !self.build_legal_action_mask().is_legal(action_id) {
            warn!(
                player = acting,
                action_id,
                in_range = (action_id as usize) < ACTION_SPACE_SIZE,
                "illegal action, ending episode"
            );
            self.status = EpisodeStatus::Terminal;
            self.last_action = Some(action_id);
            return Ok(self.build_step(illegal_action_rewards(acting), Some(acting), true));
        }

        let engine_action = match self.to_engine_action(acting, ActionEncoder::decode(action_id)) {
            Ok(action) => action,
            Err(source) => return Err(self.diverge(acting, action_id, source)),
        };

        let scores_before = self.game.scores();
        if let Err(source) = self.game.act(engine_action, rng) {
            return Err(self.diverge(acting, action_id, source));
        }

        self.last_action = Some(action_id);
        self.sync_current_player();
        trace!(
            player = acting,
            action_id,
            next_player = self.current_player,
            status = ?self.game.status(),
            "step"
        );
        if self.game.status() == GameStatus::Won {
            self.status = EpisodeStatus::Terminal;
            debug!(winner = ?self.game.winner(), scores = ?self.game.scores(), "game won");
        }

        let rewards = transition_rewards(&self.config, &self.game, &scores_before);
        Ok(self.build_step(rewards, Some(acting), false))
    }

    fn spaces(&self) -> SpaceDescriptor {
        SpaceDescriptor {
            observation_shape: [self.features.obs_size()],
            action_count: ACTION_SPACE_SIZE,
        }
    }

    fn legal_action_mask(&self) -> LegalMask {
        self.build_legal_action_mask()
    }

    fn render(&self) -> String {
        let mask = self.build_legal_action_mask();
        EnvView {
            game: &self.game,
            current_player: self.current_player,
            status: self.status,
            legal_action_mask: &mask,
        }
        .to_string()
    }
}

/// Play one episode to the end with one agent per seat.
///
/// Every transition is appended to `replay_buffer`, keyed by the seat that acted.
pub fn run_episode<F: FeatureExtractor, A: Agent>(
    env: &mut HundredAndTenEnv<F>,
    agents: &mut [A; NUM_PLAYERS],
    rng: &mut impl Rng,
    replay_buffer: &mut Vec<Transition>,
) -> Result<EpisodeSummary, StepError> {
    let mut step = env.reset(rng)?;
    let mut steps = 0u32;

    while !step.done {
        let player = step.current_player;

        let agent_input = AgentInput {
            observation: &step.observation,
            legal_action_mask: step.legal_action_mask.as_slice(),
            current_player: player,
        };
        let action_id = agents[player as usize].select_action(&agent_input, rng);

        let next_step = env.step(action_id, rng)?;
        steps += 1;

        replay_buffer.push(Transition {
            player,
            observation_before: step.observation.clone(),
            action_id,
            reward: next_step.rewards[player as usize],
            observation_after: next_step.observation.clone(),
            done: next_step.done,
        });

        step = next_step;
    }

    Ok(EpisodeSummary {
        steps,
        rewards: step.rewards,
        scores: env.game.scores(),
        winner: env.game.winner(),
        illegal_action: step.info.illegal_action,
    })
}

/// Run a self-play episode with the same agent in every seat
pub fn self_play_episode<F: FeatureExtractor, A: Agent + Clone>(
    env: &mut HundredAndTenEnv<F>,
    agent: &A,
    rng: &mut impl Rng,
    replay_buffer: &mut Vec<Transition>,
) -> Result<EpisodeSummary, StepError> {
    let mut agents: [A; NUM_PLAYERS] = std::array::from_fn(|_| agent.clone());
    run_episode(env, &mut agents, rng, replay_buffer)
}
