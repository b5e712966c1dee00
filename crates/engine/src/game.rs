//! Game lifecycle: seating, rounds, cumulative scores and the winner.

use rand::Rng;

use crate::{
    next_seat, Action, BidAmount, GameError, GameStatus, Round, RoundStatus, SeatId,
    MAX_TRICK_SCORE, NUM_PLAYERS, WINNING_SCORE,
};

/// A full game of Hundred and Ten
#[derive(Clone, Debug, Default)]
pub struct Game {
    players: Vec<SeatId>,
    rounds: Vec<Round>,
    scores: [i32; NUM_PLAYERS],
    winner: Option<SeatId>,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a started game (all seats joined) whose current round is `round`
    pub fn from_round(round: Round, scores: [i32; NUM_PLAYERS]) -> Self {
        Game {
            players: (0..NUM_PLAYERS as SeatId).collect(),
            rounds: vec![round],
            scores,
            winner: None,
        }
    }

    /// Seat a player
    pub fn join(&mut self, seat: SeatId) -> Result<(), GameError> {
        if !self.rounds.is_empty() {
            return Err(GameError::AlreadyStarted);
        }
        if seat as usize >= NUM_PLAYERS {
            return Err(GameError::InvalidSeat(seat));
        }
        if self.players.contains(&seat) {
            return Err(GameError::SeatTaken(seat));
        }
        self.players.push(seat);
        Ok(())
    }

    pub fn players(&self) -> &[SeatId] {
        &self.players
    }

    /// Deal the first round; seat 0 deals
    pub fn start_game(&mut self, rng: &mut impl Rng) -> Result<(), GameError> {
        if !self.rounds.is_empty() {
            return Err(GameError::AlreadyStarted);
        }
        if self.players.len() != NUM_PLAYERS {
            return Err(GameError::NotEnoughPlayers {
                needed: NUM_PLAYERS,
                joined: self.players.len(),
            });
        }
        self.rounds.push(Round::deal(0, rng));
        Ok(())
    }

    pub fn status(&self) -> GameStatus {
        if self.winner.is_some() {
            return GameStatus::Won;
        }
        match self.active_round().map(Round::status) {
            None => GameStatus::Waiting,
            Some(RoundStatus::Bidding) => GameStatus::Bidding,
            Some(RoundStatus::TrumpSelection) => GameStatus::TrumpSelection,
            Some(RoundStatus::Discard) => GameStatus::Discard,
            Some(RoundStatus::Tricks) => GameStatus::Tricks,
            // Between rounds; `act` always deals the next round immediately
            Some(RoundStatus::Completed | RoundStatus::CompletedNoBidders) => GameStatus::Waiting,
        }
    }

    /// The round being played (the final round once the game is won)
    pub fn active_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Seat expected to act, or None if the game is not running
    pub fn active_player(&self) -> Option<SeatId> {
        if self.winner.is_some() {
            return None;
        }
        self.active_round().map(Round::active_player)
    }

    /// Cumulative game scores per seat
    pub fn scores(&self) -> [i32; NUM_PLAYERS] {
        self.scores
    }

    pub fn winner(&self) -> Option<SeatId> {
        self.winner
    }

    /// Apply one action for the seat whose turn it is
    pub fn act(&mut self, action: Action, rng: &mut impl Rng) -> Result<(), GameError> {
        if self.winner.is_some() {
            return Err(GameError::GameOver);
        }
        let round = self.rounds.last_mut().ok_or(GameError::NotStarted)?;
        round.apply(&action)?;

        match round.status() {
            RoundStatus::Completed => {
                let dealer = round.dealer();
                let bidder = round.active_bidder();
                let deltas = round_deltas(round);
                for (score, delta) in self.scores.iter_mut().zip(deltas) {
                    *score += delta;
                }

                self.winner = find_winner(&self.scores, bidder, dealer);
                if self.winner.is_none() {
                    self.rounds.push(Round::deal(next_seat(dealer), rng));
                }
            }
            RoundStatus::CompletedNoBidders => {
                let dealer = round.dealer();
                self.rounds.push(Round::deal(next_seat(dealer), rng));
            }
            _ => {}
        }

        Ok(())
    }
}

/// Score change per seat at the end of a completed round
fn round_deltas(round: &Round) -> [i32; NUM_PLAYERS] {
    let points = round.scores();
    let bid = round.active_bid();
    let bidder = round.active_bidder();

    std::array::from_fn(|seat| {
        let scored = points[seat];
        match (bid, bidder) {
            (Some(bid), Some(bidder)) if bidder as usize == seat => {
                if bid == BidAmount::ShootTheMoon {
                    if scored == MAX_TRICK_SCORE {
                        bid.value()
                    } else {
                        -bid.value()
                    }
                } else if scored >= bid.value() {
                    scored
                } else {
                    -bid.value()
                }
            }
            _ => scored,
        }
    })
}

/// Winner once a seat reaches WINNING_SCORE: the bidder first, then the highest score,
/// ties broken in play order from the dealer's left
fn find_winner(
    scores: &[i32; NUM_PLAYERS],
    bidder: Option<SeatId>,
    dealer: SeatId,
) -> Option<SeatId> {
    if let Some(bidder) = bidder {
        if scores[bidder as usize] >= WINNING_SCORE {
            return Some(bidder);
        }
    }

    let mut best: Option<SeatId> = None;
    let mut seat = next_seat(dealer);
    for _ in 0..NUM_PLAYERS {
        let score = scores[seat as usize];
        if score >= WINNING_SCORE && best.map_or(true, |b| score > scores[b as usize]) {
            best = Some(seat);
        }
        seat = next_seat(seat);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bid, Discard, Play};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seated_game() -> Game {
        let mut game = Game::new();
        for seat in 0..NUM_PLAYERS as SeatId {
            game.join(seat).unwrap();
        }
        game
    }

    /// A simple deterministic policy producing a valid action for the active seat
    fn scripted_action(game: &Game) -> Action {
        let round = game.active_round().unwrap();
        let seat = round.active_player();
        match round.status() {
            RoundStatus::Bidding => {
                let amount = if round.active_bid().is_none() {
                    BidAmount::Fifteen
                } else {
                    BidAmount::Pass
                };
                Action::Bid(Bid { seat, amount })
            }
            RoundStatus::TrumpSelection => Action::SelectTrump {
                seat,
                suit: crate::SelectableSuit::Hearts,
            },
            RoundStatus::Discard => {
                let trump = round.trump().unwrap();
                let cards = round
                    .hand(seat)
                    .iter()
                    .copied()
                    .filter(|c| !c.is_trump(trump))
                    .collect();
                Action::Discard(Discard { seat, cards })
            }
            RoundStatus::Tricks => {
                let trick = round.active_trick().unwrap();
                let hand = round.hand(seat);
                let must_trump = trick.bleeding() && hand.iter().any(|c| c.is_trump(trick.trump));
                let card = *hand
                    .iter()
                    .find(|c| !must_trump || c.is_trump(trick.trump))
                    .unwrap();
                Action::Play(Play { seat, card })
            }
            status => panic!("no action in {status:?}"),
        }
    }

    #[test]
    fn test_join_validation() {
        let mut game = Game::new();
        game.join(0).unwrap();
        assert_eq!(game.join(0), Err(GameError::SeatTaken(0)));
        assert_eq!(game.join(4), Err(GameError::InvalidSeat(4)));
        assert_eq!(game.status(), GameStatus::Waiting);
    }

    #[test]
    fn test_start_requires_four_players() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut game = Game::new();
        game.join(0).unwrap();
        game.join(1).unwrap();

        assert_eq!(
            game.start_game(&mut rng),
            Err(GameError::NotEnoughPlayers {
                needed: 4,
                joined: 2
            })
        );
    }

    #[test]
    fn test_start_game_enters_bidding() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut game = seated_game();
        game.start_game(&mut rng).unwrap();

        assert_eq!(game.status(), GameStatus::Bidding);
        assert_eq!(game.active_player(), Some(1));
        assert_eq!(game.scores(), [0; NUM_PLAYERS]);
        assert_eq!(game.start_game(&mut rng), Err(GameError::AlreadyStarted));
        assert_eq!(game.join(3), Err(GameError::AlreadyStarted));
    }

    #[test]
    fn test_act_before_start() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut game = seated_game();
        let action = Action::Bid(Bid {
            seat: 1,
            amount: BidAmount::Pass,
        });
        assert_eq!(game.act(action, &mut rng), Err(GameError::NotStarted));
    }

    #[test]
    fn test_wrong_phase_rejected() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut game = seated_game();
        game.start_game(&mut rng).unwrap();

        let card = game.active_round().unwrap().hand(1)[0];
        assert_eq!(
            game.act(Action::Play(Play { seat: 1, card }), &mut rng),
            Err(GameError::WrongPhase(RoundStatus::Bidding))
        );
    }

    #[test]
    fn test_all_pass_redeals_with_next_dealer() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut game = seated_game();
        game.start_game(&mut rng).unwrap();

        for seat in [1, 2, 3, 0] {
            game.act(
                Action::Bid(Bid {
                    seat,
                    amount: BidAmount::Pass,
                }),
                &mut rng,
            )
            .unwrap();
        }

        assert_eq!(game.rounds().len(), 2);
        assert_eq!(game.active_round().unwrap().dealer(), 1);
        assert_eq!(game.active_player(), Some(2));
        assert_eq!(game.scores(), [0; NUM_PLAYERS]);
    }

    #[test]
    fn test_find_winner_prefers_bidder() {
        let scores = [115, 120, 40, 0];
        assert_eq!(find_winner(&scores, Some(0), 3), Some(0));
        assert_eq!(find_winner(&scores, Some(2), 3), Some(1));
        assert_eq!(find_winner(&[100, 0, 0, 0], Some(0), 3), None);
    }

    #[test]
    fn test_find_winner_tie_uses_play_order() {
        let scores = [110, 0, 110, 0];
        // Dealer 1: order 2, 3, 0, 1
        assert_eq!(find_winner(&scores, None, 1), Some(2));
        // Dealer 3: order 0, 1, 2, 3
        assert_eq!(find_winner(&scores, None, 3), Some(0));
    }

    #[test]
    fn test_full_game_reaches_winner() {
        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut game = seated_game();
            game.start_game(&mut rng).unwrap();

            let mut steps = 0;
            while game.status() != GameStatus::Won {
                let action = scripted_action(&game);
                game.act(action, &mut rng).unwrap();
                steps += 1;
                assert!(steps < 20_000, "game did not finish");
            }

            let winner = game.winner().unwrap();
            assert!(game.scores()[winner as usize] >= WINNING_SCORE);
            assert_eq!(game.active_player(), None);
            let late = Action::Bid(Bid {
                seat: 0,
                amount: BidAmount::Pass,
            });
            assert_eq!(game.act(late, &mut rng), Err(GameError::GameOver));
        }
    }

    #[test]
    fn test_round_scoring_is_applied() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut game = seated_game();
        game.start_game(&mut rng).unwrap();

        while game.rounds().len() == 1 {
            let action = scripted_action(&game);
            game.act(action, &mut rng).unwrap();
        }

        let first = &game.rounds()[0];
        assert_eq!(game.scores(), round_deltas(first));
        let bidder = first.active_bidder().unwrap() as usize;
        let points = first.scores()[bidder];
        if points >= 15 {
            assert_eq!(game.scores()[bidder], points);
        } else {
            assert_eq!(game.scores()[bidder], -15);
        }
    }
}
