//! Batch simulation: many independent episodes across threads
//!
//! Each episode owns its environment, agents and rng (seeded from the base seed
//! plus the episode index), so results do not depend on scheduling.

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use hundredandten_engine::NUM_PLAYERS;
use hundredandten_rl_env::{
    run_episode, AgentKind, BasicFeatureExtractor, EnvConfig, EpisodeSummary, FeatureConfig,
    HundredAndTenEnv, SeatAgent, StepError,
};

/// Everything needed to reproduce a batch of episodes
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub episodes: usize,
    pub seed: u64,
    pub agents: [AgentKind; NUM_PLAYERS],
    pub env: EnvConfig,
    pub features: FeatureConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            episodes: 100,
            seed: 42,
            agents: [AgentKind::Rules, AgentKind::Random, AgentKind::Rules, AgentKind::Random],
            env: EnvConfig::default(),
            features: FeatureConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }
}

/// Aggregated results of a batch
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BatchStats {
    pub episodes: usize,
    pub wins: [usize; NUM_PLAYERS],
    pub illegal_endings: usize,
    pub mean_steps: f64,
    pub mean_scores: [f64; NUM_PLAYERS],
}

impl BatchStats {
    pub fn from_summaries(summaries: &[EpisodeSummary]) -> Self {
        let mut stats = BatchStats {
            episodes: summaries.len(),
            ..BatchStats::default()
        };
        if summaries.is_empty() {
            return stats;
        }

        let n = summaries.len() as f64;
        for summary in summaries {
            if let Some(winner) = summary.winner {
                stats.wins[winner as usize] += 1;
            }
            if summary.illegal_action {
                stats.illegal_endings += 1;
            }
            stats.mean_steps += summary.steps as f64 / n;
            for (mean, score) in stats.mean_scores.iter_mut().zip(summary.scores) {
                *mean += score as f64 / n;
            }
        }
        stats
    }
}

/// Play one episode with the configured agents
pub fn play_episode(config: &SimConfig, index: usize) -> Result<EpisodeSummary, StepError> {
    let features = BasicFeatureExtractor::new(config.features);
    let mut env = HundredAndTenEnv::new(config.env.clone(), features);
    let mut agents: [SeatAgent; NUM_PLAYERS] =
        std::array::from_fn(|seat| SeatAgent::new(config.agents[seat], config.features.range));
    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(index as u64));
    let mut replay = Vec::new();

    let summary = run_episode(&mut env, &mut agents, &mut rng, &mut replay)?;
    debug!(
        episode = index,
        steps = summary.steps,
        winner = ?summary.winner,
        "episode finished"
    );
    Ok(summary)
}

/// Play every episode of the batch in parallel, in episode order
pub fn run_batch(config: &SimConfig) -> Result<Vec<EpisodeSummary>, StepError> {
    info!(
        episodes = config.episodes,
        seed = config.seed,
        threads = rayon::current_num_threads(),
        "running batch"
    );
    (0..config.episodes)
        .into_par_iter()
        .map(|index| play_episode(config, index))
        .collect()
}
