//! Plain-text view of the environment state

use std::fmt;

use hundredandten_engine::{Game, GameStatus};

use crate::{ActionEncoder, EnvAction, EpisodeStatus, LegalMask, PlayerIdx};

/// Borrowed snapshot rendered through `Display`
pub struct EnvView<'a> {
    pub game: &'a Game,
    pub current_player: PlayerIdx,
    pub status: EpisodeStatus,
    pub legal_action_mask: &'a LegalMask,
}

/// Short label for an action in legal-action listings
pub fn describe_action(action: &EnvAction) -> String {
    match action {
        EnvAction::Play(card) => card.to_string(),
        EnvAction::Bid(amount) => format!("Bid {amount:?}"),
        EnvAction::SelectTrump(suit) => format!("Trump {suit}"),
        EnvAction::Discard => "Discard non-trump".to_string(),
    }
}

impl fmt::Display for EnvView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.game.status();
        writeln!(f, "------- {status:?} -------")?;

        let Some(round) = self.game.active_round() else {
            return writeln!(f, "Game has not started");
        };

        if status == GameStatus::Won {
            if let Some(winner) = self.game.winner() {
                writeln!(f, "Player {winner} won")?;
            }
            return writeln!(f, "Final scores: {:?}", self.game.scores());
        }

        writeln!(f, "It is Player {}'s turn", self.current_player)?;
        match (round.active_bid(), round.active_bidder()) {
            (Some(bid), Some(bidder)) => writeln!(f, "Bid: {} by Player {bidder}", bid.value())?,
            _ => writeln!(f, "Bid: none")?,
        }
        if let Some(trump) = round.trump() {
            writeln!(f, "Trump: {trump}")?;
        }

        if status == GameStatus::Tricks {
            if let Some(trick) = round.active_trick() {
                let plays: Vec<String> = trick
                    .plays
                    .iter()
                    .map(|play| format!("P{}: {}", play.seat, play.card))
                    .collect();
                writeln!(f, "Trick {}: [{}]", round.tricks().len(), plays.join(", "))?;
                writeln!(f, "Bleeding: {}", trick.bleeding())?;
            }
        }

        let hand: Vec<String> = round
            .hand(self.current_player)
            .iter()
            .map(|card| format!("{card} (#{})", card.index()))
            .collect();
        writeln!(f, "Player {}'s hand: {}", self.current_player, hand.join(", "))?;
        writeln!(f, "Round points: {:?}", round.scores())?;
        writeln!(f, "Game scores: {:?}", self.game.scores())?;

        if self.status == EpisodeStatus::InProgress {
            let legal: Vec<String> = self
                .legal_action_mask
                .legal_ids()
                .into_iter()
                .map(|id| format!("{id}={}", describe_action(&ActionEncoder::decode(id))))
                .collect();
            writeln!(f, "Legal actions: {}", legal.join(", "))?;
        } else {
            writeln!(f, "Episode over")?;
        }
        Ok(())
    }
}
