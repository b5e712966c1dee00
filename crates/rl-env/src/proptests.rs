//! Property tests over randomly played games

use hundredandten_engine::{SeatId, NUM_PLAYERS};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{
    legal_action_mask, ActionEncoder, ActionId, Agent, AgentInput, BasicFeatureExtractor, BidRule,
    EnvConfig, Environment, FeatureConfig, FeatureExtractor, HundredAndTenEnv, LegalityConfig,
    RandomAgent, ValueRange, ACTION_SPACE_SIZE,
};

fn value_range() -> impl Strategy<Value = ValueRange> {
    prop_oneof![Just(ValueRange::Signed), Just(ValueRange::Unit)]
}

fn bid_rule() -> impl Strategy<Value = BidRule> {
    prop_oneof![Just(BidRule::Available), Just(BidRule::Adjacent)]
}

fn env_for(range: ValueRange, bid_rule: BidRule) -> HundredAndTenEnv<BasicFeatureExtractor> {
    let config = EnvConfig {
        legality: LegalityConfig {
            bid_rule,
            ..LegalityConfig::default()
        },
        ..EnvConfig::default()
    };
    let features = BasicFeatureExtractor::new(FeatureConfig {
        range,
        append_legal_mask: true,
    });
    HundredAndTenEnv::new(config, features)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Every in-range id decodes and encodes back to itself
    #[test]
    fn prop_codec_round_trip(id in 0..ACTION_SPACE_SIZE as ActionId) {
        let action = ActionEncoder::decode(id);
        prop_assert_eq!(ActionEncoder::encode(&action), id);
    }

    /// Ids at or past the end never decode
    #[test]
    fn prop_out_of_range_rejected(id in ACTION_SPACE_SIZE as ActionId..=ActionId::MAX) {
        prop_assert!(ActionEncoder::try_decode(id).is_none());
    }

    /// Along random play: one active family, mask only for the acting seat,
    /// observations of fixed length within bounds, and legal actions always accepted
    #[test]
    fn prop_random_play_invariants(
        seed in any::<u64>(),
        steps in 1usize..300,
        range in value_range(),
        bid_rule in bid_rule(),
    ) {
        let mut env = env_for(range, bid_rule);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut agent = RandomAgent;
        let (lo, hi) = range.bounds();
        let obs_size = env.features.obs_size();

        let mut step = env.reset(&mut rng).unwrap();
        for _ in 0..steps {
            prop_assert_eq!(step.observation.as_slice().len(), obs_size);
            prop_assert!(step.observation.as_slice().iter().all(|&v| v >= lo && v <= hi));

            if step.done {
                prop_assert!(!step.legal_action_mask.any());
                break;
            }

            let mask = step.legal_action_mask;
            prop_assert!(mask.any());
            prop_assert_eq!(mask.families().len(), 1);
            prop_assert_eq!(mask, env.legal_action_mask());

            for seat in 0..NUM_PLAYERS as SeatId {
                let other = legal_action_mask(&env.game, seat, &env.config.legality);
                prop_assert_eq!(other.any(), seat == step.current_player);
            }

            let input = AgentInput {
                observation: &step.observation,
                legal_action_mask: mask.as_slice(),
                current_player: step.current_player,
            };
            let action = agent.select_action(&input, &mut rng);
            let next = env.step(action, &mut rng);
            prop_assert!(next.is_ok(), "legal action {} was rejected", action);
            step = next.unwrap();
            prop_assert!(!step.info.illegal_action);
        }
    }

    /// Any id outside the mask ends the episode with the zero-sum penalty
    #[test]
    fn prop_illegal_action_penalty(
        seed in any::<u64>(),
        warmup in 0usize..60,
        pick in any::<u16>(),
    ) {
        let mut env = env_for(ValueRange::Signed, BidRule::Available);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut agent = RandomAgent;

        let mut step = env.reset(&mut rng).unwrap();
        for _ in 0..warmup {
            let input = AgentInput {
                observation: &step.observation,
                legal_action_mask: step.legal_action_mask.as_slice(),
                current_player: step.current_player,
            };
            let action = agent.select_action(&input, &mut rng);
            step = env.step(action, &mut rng).unwrap();
            if step.done {
                return Ok(());
            }
        }

        let illegal: Vec<ActionId> = (0..=ACTION_SPACE_SIZE as ActionId)
            .filter(|&id| !step.legal_action_mask.is_legal(id))
            .collect();
        let action = illegal[pick as usize % illegal.len()];
        let offender = step.current_player as usize;

        let end = env.step(action, &mut rng).unwrap();
        prop_assert!(end.done);
        prop_assert!(end.info.illegal_action);
        prop_assert_eq!(end.rewards[offender], -1.0);
        prop_assert!(end.rewards.iter().sum::<f32>().abs() < 1e-5);
        prop_assert!(env.step(action, &mut rng).is_err());
    }
}
