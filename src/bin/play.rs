//! Interactive CLI to play Hundred and Ten against three heuristic agents
//!
//! Usage: cargo run --bin play [--seat 0] [--seed 42]

use std::io::{self, Write};

use clap::Parser;
use rand::SeedableRng;

use hundredandten::display::{display_table, format_action, BOLD, DIM, RESET};
use hundredandten::rl_env::{
    ActionEncoder, ActionId, Agent, AgentInput, BasicFeatureExtractor, EnvConfig, EnvStep,
    Environment, FeatureConfig, HundredAndTenEnv, Observation, Reward, RulesAgent,
};
use hundredandten::{SeatId, NUM_PLAYERS};

/// Play Hundred and Ten against the rules agent
#[derive(Parser, Debug)]
#[command(name = "play")]
#[command(about = "Play Hundred and Ten against three rules-based opponents", long_about = None)]
struct Args {
    /// Your seat (0 deals the first round)
    #[arg(long, default_value_t = 1)]
    seat: SeatId,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Print the environment's plain-text render instead of the colored table
    #[arg(long, default_value_t = false)]
    plain: bool,
}

/// Prompt until a legal action is chosen; None means quit
fn get_human_action(step: &EnvStep<Observation, Reward>) -> Option<ActionId> {
    let actions = step.legal_action_mask.legal_ids();

    println!("{BOLD}Your legal moves:{RESET}");
    for (i, &id) in actions.iter().enumerate() {
        println!("  {}: {}", i, format_action(&ActionEncoder::decode(id)));
    }

    loop {
        print!("\n{BOLD}Enter move number:{RESET} ");
        if io::stdout().flush().is_err() {
            return None;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => return None,
            Err(_) => {
                println!("Error reading input, try again.");
                continue;
            }
            Ok(_) => {}
        }

        let input = input.trim();
        if input == "q" || input == "quit" {
            return None;
        }

        match input.parse::<usize>() {
            Ok(idx) if idx < actions.len() => return Some(actions[idx]),
            Ok(_) => println!("Invalid move number. Enter 0-{}", actions.len().saturating_sub(1)),
            Err(_) => println!("Please enter a number (or 'q' to quit)"),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    if args.seat as usize >= NUM_PLAYERS {
        return Err(format!("--seat must be below {NUM_PLAYERS}").into());
    }

    let features = BasicFeatureExtractor::new(FeatureConfig::default());
    let range = features.config().range;
    let mut env = HundredAndTenEnv::new(EnvConfig::default(), features);
    let mut agent = RulesAgent::new(range);
    let mut rng = rand::rngs::StdRng::seed_from_u64(args.seed);

    println!("\n{BOLD}Welcome to Hundred and Ten!{RESET}");
    println!("You are Player {}. Type 'q' to quit at any time.\n", args.seat);

    let mut step = env.reset(&mut rng)?;
    while !step.done {
        if args.plain {
            println!("{}", env.render());
        } else {
            display_table(&env.game, args.seat);
        }

        let action_id = if step.current_player == args.seat {
            match get_human_action(&step) {
                Some(id) => id,
                None => {
                    println!("Goodbye!");
                    return Ok(());
                }
            }
        } else {
            let input = AgentInput {
                observation: &step.observation,
                legal_action_mask: step.legal_action_mask.as_slice(),
                current_player: step.current_player,
            };
            let id = agent.select_action(&input, &mut rng);
            println!(
                "{DIM}Player {} plays: {}{RESET}",
                step.current_player,
                format_action(&ActionEncoder::decode(id))
            );
            id
        };

        step = env.step(action_id, &mut rng)?;
    }

    let scores = env.game.scores();
    println!("\n{BOLD}═══════════════════════════════════════{RESET}");
    println!("{BOLD}                GAME OVER{RESET}");
    println!("{BOLD}═══════════════════════════════════════{RESET}");
    for seat in 0..NUM_PLAYERS {
        let who = if seat == args.seat as usize { " (you)" } else { "" };
        println!("Player {seat}{who}: {}", scores[seat]);
    }

    match env.game.winner() {
        Some(winner) if winner == args.seat => println!("\n{BOLD}You win!{RESET}"),
        Some(winner) => println!("\n{DIM}Player {winner} wins. Better luck next time!{RESET}"),
        None => println!("\n{DIM}The game ended without a winner.{RESET}"),
    }

    Ok(())
}
