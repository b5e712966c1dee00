//! Shared display utilities for rendering Hundred and Ten in the terminal
//!
//! Provides colorized, human-readable output for hands, tricks, and actions.

use hundredandten_engine::{Card, CardSuit, Game, GameStatus, SeatId, NUM_PLAYERS};
use hundredandten_rl_env::EnvAction;

// ANSI color codes for suits
pub const RED: &str = "\x1b[91m";
pub const BLACK: &str = "\x1b[90m";
pub const YELLOW: &str = "\x1b[93m";
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub fn suit_code(suit: CardSuit) -> &'static str {
    match suit {
        CardSuit::Diamonds | CardSuit::Hearts => RED,
        CardSuit::Clubs | CardSuit::Spades => BLACK,
        CardSuit::Joker => YELLOW,
    }
}

pub fn suit_char(suit: CardSuit) -> char {
    match suit {
        CardSuit::Clubs => '♣',
        CardSuit::Spades => '♠',
        CardSuit::Diamonds => '♦',
        CardSuit::Hearts => '♥',
        CardSuit::Joker => '★',
    }
}

/// Short colored form, e.g. "5♥"
pub fn display_card(card: Card) -> String {
    match card.suit {
        CardSuit::Joker => format!("{}JK{}", suit_code(card.suit), RESET),
        suit => format!(
            "{}{}{}{}",
            suit_code(suit),
            card.number.name(),
            suit_char(suit),
            RESET
        ),
    }
}

/// Format an action for display
pub fn format_action(action: &EnvAction) -> String {
    match action {
        EnvAction::Play(card) => format!("Play {}", display_card(*card)),
        EnvAction::Bid(amount) if amount.value() == 0 => "Pass".to_string(),
        EnvAction::Bid(amount) => format!("Bid {}", amount.value()),
        EnvAction::SelectTrump(suit) => {
            let suit = suit.as_card_suit();
            format!("Trump {}{}{}", suit_code(suit), suit.name(), RESET)
        }
        EnvAction::Discard => "Discard non-trump".to_string(),
    }
}

/// Display the table from one seat's point of view
pub fn display_table(game: &Game, viewer: SeatId) {
    let Some(round) = game.active_round() else {
        println!("{DIM}(no round dealt){RESET}");
        return;
    };

    println!("\n{BOLD}══════════════════════════════════════════════{RESET}");
    println!(
        "{BOLD}  Round {}{RESET}   |   {:?}   |   Dealer: Player {}",
        game.rounds().len(),
        game.status(),
        round.dealer()
    );
    println!("{BOLD}══════════════════════════════════════════════{RESET}");

    match (round.active_bid(), round.active_bidder()) {
        (Some(bid), Some(bidder)) => println!("Bid: {} by Player {}", bid.value(), bidder),
        _ => println!("Bid: {DIM}none{RESET}"),
    }
    if let Some(trump) = round.trump() {
        println!("Trump: {}", format_action(&EnvAction::SelectTrump(trump)));
    }

    if game.status() == GameStatus::Tricks {
        if let Some(trick) = round.active_trick() {
            print!("Trick {}: ", round.tricks().len());
            if trick.plays.is_empty() {
                print!("{DIM}(empty){RESET}");
            }
            for play in &trick.plays {
                print!("P{} {}  ", play.seat, display_card(play.card));
            }
            println!();
        }
    }

    let points = round.scores();
    let scores = game.scores();
    for seat in 0..NUM_PLAYERS as SeatId {
        let marker = if Some(seat) == game.active_player() { "▶" } else { " " };
        let line = format!(
            "{marker} Player {seat}: {:>4} game, {:>2} round",
            scores[seat as usize], points[seat as usize]
        );
        if seat == viewer {
            println!("{BOLD}{line}{RESET}");
        } else {
            println!("{DIM}{line}{RESET}");
        }
    }

    let hand: Vec<String> = round.hand(viewer).iter().map(|&c| display_card(c)).collect();
    println!("\nYour hand: {}", hand.join(" "));
}
