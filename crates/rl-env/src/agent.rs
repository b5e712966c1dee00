//! Agent API for action selection

use hundredandten_engine::{
    off_suit_strength, trump_strength, BidAmount, Card, SelectableSuit, ALL_SELECTABLE_SUITS,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    decode_hand, decode_trump, ActionEncoder, ActionId, EnvAction, Observation, PlayerIdx,
    ValueRange, ACTION_SPACE_SIZE,
};

/// Inputs provided to an agent when selecting an action
pub struct AgentInput<'a> {
    /// Observation vector for the player whose turn it is
    pub observation: &'a Observation,

    /// Mask over action IDs:
    /// legal_action_mask[id] == true if the action is legal
    pub legal_action_mask: &'a [bool],

    /// Index of the player whose turn it is
    pub current_player: PlayerIdx,
}

impl AgentInput<'_> {
    fn legal_ids(&self) -> Vec<ActionId> {
        self.legal_action_mask
            .iter()
            .enumerate()
            .filter(|(_, &legal)| legal)
            .map(|(id, _)| id as ActionId)
            .collect()
    }
}

/// Trait for anything that can choose actions in the environment:
/// random policy, heuristic policy, or human input.
pub trait Agent {
    /// Choose an action given an observation and legal-action mask.
    ///
    /// Should return an ActionId for which legal_action_mask[id as usize] == true
    /// whenever one exists. With an empty mask any id ends the episode as illegal.
    fn select_action(&mut self, input: &AgentInput, rng: &mut impl Rng) -> ActionId;
}

/// Random agent that uniformly samples from legal actions
#[derive(Clone, Debug, Default)]
pub struct RandomAgent;

impl RandomAgent {
    pub fn new() -> Self {
        Self
    }
}

impl Agent for RandomAgent {
    fn select_action(&mut self, input: &AgentInput, rng: &mut impl Rng) -> ActionId {
        let legal_ids = input.legal_ids();

        if legal_ids.is_empty() {
            // Nothing is legal; any choice forfeits
            return rng.random_range(0..ACTION_SPACE_SIZE as ActionId);
        }

        let idx = rng.random_range(0..legal_ids.len() as u32) as usize;
        legal_ids[idx]
    }
}

/// Heuristic agent that reads its hand and trump back out of the observation.
///
/// Bids by the size of its longest trump holding, names that suit, and in tricks
/// leads with strong trump while dumping its weakest card otherwise.
#[derive(Clone, Debug, Default)]
pub struct RulesAgent {
    range: ValueRange,
}

impl RulesAgent {
    pub fn new(range: ValueRange) -> Self {
        Self { range }
    }

    fn choose(&self, input: &AgentInput, legal: &[ActionId]) -> Option<ActionId> {
        let obs = input.observation.as_slice();
        let hand = decode_hand(obs, self.range);
        let actions: Vec<EnvAction> = legal.iter().map(|&id| ActionEncoder::decode(id)).collect();

        let first = actions.first()?;
        let action = match first {
            EnvAction::Discard => EnvAction::Discard,
            EnvAction::SelectTrump(_) => EnvAction::SelectTrump(best_suit(&hand).0),
            EnvAction::Bid(_) => {
                let target = bid_target(best_suit(&hand).1);
                let bids = actions.iter().filter_map(|action| match action {
                    EnvAction::Bid(amount) => Some(*amount),
                    _ => None,
                });
                let amount = bids
                    .filter(|&amount| amount != BidAmount::Pass && amount <= target)
                    .min()
                    .unwrap_or(BidAmount::Pass);
                EnvAction::Bid(amount)
            }
            EnvAction::Play(_) => {
                let cards: Vec<Card> = actions
                    .iter()
                    .filter_map(|action| match action {
                        EnvAction::Play(card) => Some(*card),
                        _ => None,
                    })
                    .collect();
                EnvAction::Play(choose_card(&cards, decode_trump(obs, self.range))?)
            }
        };

        let id = ActionEncoder::encode(&action);
        legal.contains(&id).then_some(id)
    }
}

impl Agent for RulesAgent {
    fn select_action(&mut self, input: &AgentInput, rng: &mut impl Rng) -> ActionId {
        let legal = input.legal_ids();
        match self.choose(input, &legal) {
            Some(id) => id,
            None => RandomAgent.select_action(input, rng),
        }
    }
}

/// Suit with the most trump cards in `hand`, and that count.
///
/// Ties go to the suit with the stronger trump.
fn best_suit(hand: &[Card]) -> (SelectableSuit, usize) {
    let mut best = (SelectableSuit::Hearts, 0usize, 0u32);
    for suit in ALL_SELECTABLE_SUITS {
        let strengths: Vec<u32> = hand
            .iter()
            .filter_map(|&card| trump_strength(card, suit))
            .map(u32::from)
            .collect();
        let count = strengths.len();
        let total: u32 = strengths.iter().sum();
        if (count, total) > (best.1, best.2) {
            best = (suit, count, total);
        }
    }
    (best.0, best.1)
}

fn bid_target(trump_count: usize) -> BidAmount {
    match trump_count {
        0..=2 => BidAmount::Pass,
        3 => BidAmount::Fifteen,
        4 => BidAmount::Twenty,
        _ => BidAmount::TwentyFive,
    }
}

/// Strongest trump if it is an ace or better, else the weakest card
fn choose_card(cards: &[Card], trump: Option<SelectableSuit>) -> Option<Card> {
    let Some(trump) = trump else {
        return cards.first().copied();
    };

    let strongest_trump = cards
        .iter()
        .filter_map(|&card| trump_strength(card, trump).map(|s| (s, card)))
        .max_by_key(|(strength, _)| *strength);
    if let Some((strength, card)) = strongest_trump {
        if strength >= 16 {
            return Some(card);
        }
    }

    let weakest_off = cards
        .iter()
        .filter(|card| !card.is_trump(trump))
        .min_by_key(|card| off_suit_strength(**card))
        .copied();
    weakest_off.or(strongest_trump.map(|(_, card)| card))
}

/// Which policy sits in a seat
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    #[default]
    Random,
    Rules,
}

/// A seat's agent, chosen at runtime
#[derive(Clone, Debug)]
pub enum SeatAgent {
    Random(RandomAgent),
    Rules(RulesAgent),
}

impl SeatAgent {
    pub fn new(kind: AgentKind, range: ValueRange) -> Self {
        match kind {
            AgentKind::Random => SeatAgent::Random(RandomAgent::new()),
            AgentKind::Rules => SeatAgent::Rules(RulesAgent::new(range)),
        }
    }
}

impl Agent for SeatAgent {
    fn select_action(&mut self, input: &AgentInput, rng: &mut impl Rng) -> ActionId {
        match self {
            SeatAgent::Random(agent) => agent.select_action(input, rng),
            SeatAgent::Rules(agent) => agent.select_action(input, rng),
        }
    }
}
