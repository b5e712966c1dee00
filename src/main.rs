//! Batch simulator CLI for Hundred and Ten
//!
//! Plays many seeded episodes in parallel with the chosen agents and prints
//! per-seat results.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hundredandten::NUM_PLAYERS;
use hundredandten::rl_env::{AgentKind, BidRule, RewardScheme, TrickRule, ValueRange};
use hundredandten::sim::{run_batch, BatchStats, SimConfig};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum AgentArg {
    Random,
    Rules,
}

impl From<AgentArg> for AgentKind {
    fn from(arg: AgentArg) -> Self {
        match arg {
            AgentArg::Random => AgentKind::Random,
            AgentArg::Rules => AgentKind::Rules,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum TrickRuleArg {
    Relaxed,
    Strict,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum BidRuleArg {
    Available,
    Adjacent,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RewardArg {
    GameScore,
    DenseScoreDelta,
    TerminalOnly,
}

/// Simulate Hundred and Ten games between scripted agents
#[derive(Parser, Debug)]
#[command(name = "hundredandten")]
#[command(about = "Run batches of Hundred and Ten games through the RL environment", long_about = None)]
struct Args {
    /// JSON file with a full simulation config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of episodes to play
    #[arg(long)]
    episodes: Option<usize>,

    /// Base random seed (episode i uses seed + i)
    #[arg(long)]
    seed: Option<u64>,

    /// Agent for each seat, in seat order (exactly four)
    #[arg(long, value_enum, value_delimiter = ',')]
    agents: Option<Vec<AgentArg>>,

    /// Trick-following rule once trump is led
    #[arg(long, value_enum)]
    trick_rule: Option<TrickRuleArg>,

    /// Bid legality rule
    #[arg(long, value_enum)]
    bid_rule: Option<BidRuleArg>,

    /// Reward scheme
    #[arg(long, value_enum)]
    reward: Option<RewardArg>,

    /// Encode observations in [0, 1] instead of [-1, 1]
    #[arg(long, default_value_t = false)]
    unit_range: bool,

    /// Print the config as JSON and exit
    #[arg(long, default_value_t = false)]
    print_config: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

impl Args {
    fn apply(&self, config: &mut SimConfig) {
        if let Some(episodes) = self.episodes {
            config.episodes = episodes;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(agents) = &self.agents {
            for (slot, &agent) in config.agents.iter_mut().zip(agents) {
                *slot = agent.into();
            }
        }
        if let Some(rule) = self.trick_rule {
            config.env.legality.trick_rule = match rule {
                TrickRuleArg::Relaxed => TrickRule::Relaxed,
                TrickRuleArg::Strict => TrickRule::Strict,
            };
        }
        if let Some(rule) = self.bid_rule {
            config.env.legality.bid_rule = match rule {
                BidRuleArg::Available => BidRule::Available,
                BidRuleArg::Adjacent => BidRule::Adjacent,
            };
        }
        if let Some(reward) = self.reward {
            config.env.reward_scheme = match reward {
                RewardArg::GameScore => RewardScheme::GameScore,
                RewardArg::DenseScoreDelta => RewardScheme::DenseScoreDelta,
                RewardArg::TerminalOnly => RewardScheme::TerminalOnly,
            };
        }
        if self.unit_range {
            config.features.range = ValueRange::Unit;
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(agents) = &args.agents {
        if agents.len() != NUM_PLAYERS {
            let got = agents.len();
            return Err(format!("--agents needs {NUM_PLAYERS} entries, got {got}").into());
        }
    }

    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    args.apply(&mut config);

    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    eprintln!("Simulation Configuration:");
    eprintln!("  Episodes: {}", config.episodes);
    eprintln!("  Seed: {}", config.seed);
    eprintln!("  Agents: {:?}", config.agents);
    eprintln!("  Legality: {:?}", config.env.legality);
    eprintln!("  Reward scheme: {:?}", config.env.reward_scheme);
    eprintln!("  Observation range: {:?}", config.features.range);
    eprintln!();

    let summaries = run_batch(&config)?;
    let stats = BatchStats::from_summaries(&summaries);
    info!(episodes = stats.episodes, "batch complete");

    println!("Episodes:        {}", stats.episodes);
    println!("Illegal endings: {}", stats.illegal_endings);
    println!("Mean steps:      {:.1}", stats.mean_steps);
    for (seat, agent) in config.agents.iter().enumerate() {
        println!(
            "  Seat {seat} ({agent:?}): {:>4} wins, mean score {:>7.1}",
            stats.wins[seat], stats.mean_scores[seat]
        );
    }

    Ok(())
}
