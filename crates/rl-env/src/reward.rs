//! Per-seat rewards for a transition.

use hundredandten_engine::{Game, NUM_PLAYERS};

use crate::{EnvConfig, PlayerIdx, Reward, RewardScheme};

/// Rewards after an out-of-range or illegal action.
///
/// The offender gets -1; every other seat gets 1/(n-1), so the vector sums to zero.
pub fn illegal_action_rewards(offender: PlayerIdx) -> [Reward; NUM_PLAYERS] {
    let share = 1.0 / (NUM_PLAYERS as Reward - 1.0);
    std::array::from_fn(|seat| if seat == offender as usize { -1.0 } else { share })
}

/// Rewards after a legal action, given the game scores from before it
pub fn transition_rewards(
    config: &EnvConfig,
    game: &Game,
    scores_before: &[i32; NUM_PLAYERS],
) -> [Reward; NUM_PLAYERS] {
    let scores = game.scores();
    let winner = game.winner();

    let mut rewards: [Reward; NUM_PLAYERS] = match config.reward_scheme {
        RewardScheme::GameScore => scores.map(|s| s as Reward),
        RewardScheme::DenseScoreDelta => {
            std::array::from_fn(|seat| (scores[seat] - scores_before[seat]) as Reward)
        }
        RewardScheme::TerminalOnly => {
            if winner.is_none() {
                return [0.0; NUM_PLAYERS];
            }
            let mean = scores.iter().sum::<i32>() as Reward / NUM_PLAYERS as Reward;
            return scores.map(|s| s as Reward - mean);
        }
    };

    if let Some(winner) = winner {
        rewards[winner as usize] += config.winner_bonus;
    }
    rewards
}

#[cfg(test)]
mod tests {
    use super::*;
    use hundredandten_engine::SeatId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn started_game() -> Game {
        let mut rng = StdRng::seed_from_u64(0);
        let mut game = Game::new();
        for seat in 0..NUM_PLAYERS as SeatId {
            game.join(seat).unwrap();
        }
        game.start_game(&mut rng).unwrap();
        game
    }

    #[test]
    fn test_illegal_action_rewards() {
        let rewards = illegal_action_rewards(2);
        assert_eq!(rewards[2], -1.0);
        for seat in [0, 1, 3] {
            assert!((rewards[seat] - 1.0 / 3.0).abs() < 1e-6);
        }
        assert!(rewards.iter().sum::<f32>().abs() < 1e-6);
    }

    #[test]
    fn test_game_score_scheme_mirrors_scores() {
        let game = started_game();
        let config = EnvConfig::default();
        let rewards = transition_rewards(&config, &game, &[0; NUM_PLAYERS]);
        assert_eq!(rewards, [0.0; NUM_PLAYERS]);
    }

    #[test]
    fn test_dense_delta_zero_without_change() {
        let game = started_game();
        let config = EnvConfig {
            reward_scheme: RewardScheme::DenseScoreDelta,
            ..EnvConfig::default()
        };
        let rewards = transition_rewards(&config, &game, &[0; NUM_PLAYERS]);
        assert_eq!(rewards, [0.0; NUM_PLAYERS]);
    }

    #[test]
    fn test_terminal_only_zero_before_win() {
        let game = started_game();
        let config = EnvConfig {
            reward_scheme: RewardScheme::TerminalOnly,
            ..EnvConfig::default()
        };
        assert_eq!(
            transition_rewards(&config, &game, &[0; NUM_PLAYERS]),
            [0.0; NUM_PLAYERS]
        );
    }
}
