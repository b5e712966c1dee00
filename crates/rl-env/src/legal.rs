//! Legal action mask over the fixed action space.

use hundredandten_engine::{BidAmount, Game, GameStatus, Round, ALL_SELECTABLE_SUITS};
use serde::{Deserialize, Serialize};

use crate::{ActionEncoder, ActionFamily, ActionId, EnvAction, PlayerIdx, ACTION_SPACE_SIZE};

/// Which cards may follow a trick whose first card is trump
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrickRule {
    /// A player holding trump must play trump; a player without trump may play anything
    #[default]
    Relaxed,

    /// Only trump may follow; a player without trump has no legal card
    Strict,
}

/// Which bids are offered during bidding
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidRule {
    /// Everything the engine accepts
    #[default]
    Available,

    /// A tier above 15 needs the tier directly below it to be the active bid
    Adjacent,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegalityConfig {
    pub trick_rule: TrickRule,
    pub bid_rule: BidRule,
}

/// One flag per action id; true means the action is legal for the acting seat
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LegalMask([bool; ACTION_SPACE_SIZE]);

impl Default for LegalMask {
    fn default() -> Self {
        Self::empty()
    }
}

impl LegalMask {
    pub const fn empty() -> Self {
        LegalMask([false; ACTION_SPACE_SIZE])
    }

    /// False for ids outside the action space
    pub fn is_legal(&self, id: ActionId) -> bool {
        self.0.get(id as usize).copied().unwrap_or(false)
    }

    fn allow(&mut self, action: EnvAction) {
        self.0[ActionEncoder::encode(&action) as usize] = true;
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    pub fn legal_ids(&self) -> Vec<ActionId> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, &legal)| legal)
            .map(|(id, _)| id as ActionId)
            .collect()
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&legal| legal).count()
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|&legal| legal)
    }

    /// Families with at least one legal id
    pub fn families(&self) -> Vec<ActionFamily> {
        let mut families: Vec<ActionFamily> = Vec::new();
        for id in self.legal_ids() {
            let family = ActionEncoder::decode(id).family();
            if !families.contains(&family) {
                families.push(family);
            }
        }
        families
    }
}

/// Legal actions for `player` in the current game state.
///
/// All false unless `player` is the engine's active seat. Exactly one action
/// family is ever enabled, chosen by the game phase.
pub fn legal_action_mask(game: &Game, player: PlayerIdx, config: &LegalityConfig) -> LegalMask {
    let mut mask = LegalMask::empty();

    if game.active_player() != Some(player) {
        return mask;
    }
    let Some(round) = game.active_round() else {
        return mask;
    };

    match game.status() {
        GameStatus::Tricks => allow_cards(round, player, config.trick_rule, &mut mask),
        GameStatus::Bidding => allow_bids(round, player, config.bid_rule, &mut mask),
        GameStatus::TrumpSelection => {
            for suit in ALL_SELECTABLE_SUITS {
                mask.allow(EnvAction::SelectTrump(suit));
            }
        }
        GameStatus::Discard => mask.allow(EnvAction::Discard),
        GameStatus::Waiting | GameStatus::Won => {}
    }

    mask
}

fn allow_cards(round: &Round, player: PlayerIdx, rule: TrickRule, mask: &mut LegalMask) {
    let Some(trick) = round.active_trick() else {
        return;
    };
    let trump = trick.trump;
    let hand = round.hand(player);
    let bleeding = trick.bleeding();
    let holds_trump = hand.iter().any(|card| card.is_trump(trump));

    for &card in hand {
        let legal = !bleeding
            || card.is_trump(trump)
            || (rule == TrickRule::Relaxed && !holds_trump);
        if legal {
            mask.allow(EnvAction::Play(card));
        }
    }
}

fn allow_bids(round: &Round, player: PlayerIdx, rule: BidRule, mask: &mut LegalMask) {
    let active = round.active_bid();
    for amount in round.available_bids(player) {
        let legal = match rule {
            BidRule::Available => true,
            BidRule::Adjacent => tier_below(amount).map_or(true, |below| active == Some(below)),
        };
        if legal {
            mask.allow(EnvAction::Bid(amount));
        }
    }
}

/// The bid that must be active before `amount` can be offered under the adjacent rule
fn tier_below(amount: BidAmount) -> Option<BidAmount> {
    match amount {
        BidAmount::Pass | BidAmount::Fifteen => None,
        BidAmount::Twenty => Some(BidAmount::Fifteen),
        BidAmount::TwentyFive => Some(BidAmount::Twenty),
        BidAmount::Thirty => Some(BidAmount::TwentyFive),
        BidAmount::ShootTheMoon => Some(BidAmount::Thirty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticAction;
    use hundredandten_engine::{
        Action, Bid, Card, CardNumber, CardSuit, Discard, Play, Round, SeatId, NUM_PLAYERS,
    };
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn card(number: CardNumber, suit: CardSuit) -> Card {
        Card::new(number, suit)
    }

    fn started_game(seed: u64) -> Game {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = Game::new();
        for seat in 0..NUM_PLAYERS as SeatId {
            game.join(seat).unwrap();
        }
        game.start_game(&mut rng).unwrap();
        game
    }

    fn bid(game: &mut Game, seat: SeatId, amount: BidAmount) {
        let mut rng = StdRng::seed_from_u64(0);
        game.act(Action::Bid(Bid { seat, amount }), &mut rng).unwrap();
    }

    /// Seat 1 bids 15 and names Hearts; everyone else passes
    fn game_in_trump_selection(hands: [Vec<Card>; NUM_PLAYERS], pile: Vec<Card>) -> Game {
        let mut game = Game::from_round(Round::with_hands(0, hands, pile), [0; NUM_PLAYERS]);
        bid(&mut game, 1, BidAmount::Fifteen);
        bid(&mut game, 2, BidAmount::Pass);
        bid(&mut game, 3, BidAmount::Pass);
        bid(&mut game, 0, BidAmount::Pass);
        game
    }

    /// Hands where seat 1 leads Hearts and seat 2 holds one trump
    fn tricks_game() -> Game {
        use CardNumber::*;
        use CardSuit::*;
        let hands = [
            [Two, Three, Four, Six, Seven].map(|n| card(n, Clubs)).to_vec(),
            [King, Queen, Jack, Ten, Nine].map(|n| card(n, Hearts)).to_vec(),
            vec![
                card(Two, Hearts),
                card(Two, Spades),
                card(Three, Spades),
                card(Four, Spades),
                card(Six, Spades),
            ],
            [Two, Three, Four, Six, Seven].map(|n| card(n, Diamonds)).to_vec(),
        ];
        let mut game = game_in_trump_selection(hands, Vec::new());
        let mut rng = StdRng::seed_from_u64(0);
        game.act(
            Action::SelectTrump {
                seat: 1,
                suit: hundredandten_engine::SelectableSuit::Hearts,
            },
            &mut rng,
        )
        .unwrap();
        for seat in [1, 2, 3, 0] {
            game.act(
                Action::Discard(Discard {
                    seat,
                    cards: Vec::new(),
                }),
                &mut rng,
            )
            .unwrap();
        }
        game
    }

    fn phases_enabled(mask: &LegalMask) -> usize {
        mask.families().len()
    }

    #[test]
    fn test_initial_bidding_mask() {
        let game = started_game(7);
        let seat = game.active_player().unwrap();
        let mask = legal_action_mask(&game, seat, &LegalityConfig::default());

        let expected: Vec<ActionId> =
            (StaticAction::Pass.id()..=StaticAction::ShootTheMoon.id()).collect();
        assert_eq!(mask.legal_ids(), expected);
        assert_eq!(phases_enabled(&mask), 1);
    }

    #[test]
    fn test_non_active_player_gets_empty_mask() {
        let game = started_game(7);
        let active = game.active_player().unwrap();
        for seat in 0..NUM_PLAYERS as SeatId {
            let mask = legal_action_mask(&game, seat, &LegalityConfig::default());
            assert_eq!(mask.any(), seat == active);
        }
    }

    #[test]
    fn test_bid_must_exceed_active() {
        let mut game = started_game(7);
        bid(&mut game, 1, BidAmount::Twenty);
        let mask = legal_action_mask(&game, 2, &LegalityConfig::default());

        assert!(mask.is_legal(StaticAction::Pass.id()));
        assert!(!mask.is_legal(StaticAction::Fifteen.id()));
        assert!(!mask.is_legal(StaticAction::Twenty.id()));
        assert!(mask.is_legal(StaticAction::TwentyFive.id()));
        assert!(mask.is_legal(StaticAction::ShootTheMoon.id()));
    }

    #[test]
    fn test_dealer_may_match() {
        let mut game = started_game(7);
        bid(&mut game, 1, BidAmount::Twenty);
        bid(&mut game, 2, BidAmount::Pass);
        bid(&mut game, 3, BidAmount::Pass);
        let mask = legal_action_mask(&game, 0, &LegalityConfig::default());

        assert!(mask.is_legal(StaticAction::Twenty.id()));
        assert!(!mask.is_legal(StaticAction::Fifteen.id()));
    }

    #[test]
    fn test_adjacent_bid_rule() {
        let config = LegalityConfig {
            bid_rule: BidRule::Adjacent,
            ..LegalityConfig::default()
        };
        let mut game = started_game(7);

        let opening = legal_action_mask(&game, 1, &config);
        assert_eq!(
            opening.legal_ids(),
            vec![StaticAction::Pass.id(), StaticAction::Fifteen.id()]
        );

        bid(&mut game, 1, BidAmount::Fifteen);
        let next = legal_action_mask(&game, 2, &config);
        assert_eq!(
            next.legal_ids(),
            vec![StaticAction::Pass.id(), StaticAction::Twenty.id()]
        );
    }

    #[test]
    fn test_trump_selection_mask() {
        use rand::seq::SliceRandom;

        let mut rng = StdRng::seed_from_u64(3);
        let mut pile: Vec<Card> = hundredandten_engine::deck().to_vec();
        pile.shuffle(&mut rng);
        let hands: [Vec<Card>; NUM_PLAYERS] =
            std::array::from_fn(|_| pile.split_off(pile.len() - 5));
        let game = game_in_trump_selection(hands, pile);

        let mask = legal_action_mask(&game, 1, &LegalityConfig::default());
        assert_eq!(
            mask.legal_ids(),
            vec![
                StaticAction::SelectClubs.id(),
                StaticAction::SelectSpades.id(),
                StaticAction::SelectDiamonds.id(),
                StaticAction::SelectHearts.id(),
            ]
        );
        assert!(!legal_action_mask(&game, 0, &LegalityConfig::default()).any());
    }

    #[test]
    fn test_discard_mask_is_single_action() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut game = started_game(9);
        bid(&mut game, 1, BidAmount::Fifteen);
        for seat in [2, 3, 0] {
            bid(&mut game, seat, BidAmount::Pass);
        }
        game.act(
            Action::SelectTrump {
                seat: 1,
                suit: hundredandten_engine::SelectableSuit::Clubs,
            },
            &mut rng,
        )
        .unwrap();
        assert_eq!(game.status(), GameStatus::Discard);

        let seat = game.active_player().unwrap();
        let mask = legal_action_mask(&game, seat, &LegalityConfig::default());
        assert_eq!(mask.legal_ids(), vec![StaticAction::Discard.id()]);
    }

    #[test]
    fn test_free_lead_allows_whole_hand() {
        let game = tricks_game();
        let mask = legal_action_mask(&game, 1, &LegalityConfig::default());
        assert_eq!(mask.count(), 5);
        for &c in game.active_round().unwrap().hand(1) {
            assert!(mask.is_legal(c.index() as ActionId));
        }
        assert!(!mask.is_legal(StaticAction::Pass.id()));
    }

    #[test]
    fn test_bleeding_forces_trump_holder() {
        let mut game = tricks_game();
        let mut rng = StdRng::seed_from_u64(0);
        let led = card(CardNumber::King, CardSuit::Hearts);
        game.act(Action::Play(Play { seat: 1, card: led }), &mut rng).unwrap();

        let mask = legal_action_mask(&game, 2, &LegalityConfig::default());
        assert_eq!(
            mask.legal_ids(),
            vec![card(CardNumber::Two, CardSuit::Hearts).index() as ActionId]
        );
    }

    #[test]
    fn test_bleeding_without_trump() {
        let mut game = tricks_game();
        let mut rng = StdRng::seed_from_u64(0);
        game.act(
            Action::Play(Play {
                seat: 1,
                card: card(CardNumber::King, CardSuit::Hearts),
            }),
            &mut rng,
        )
        .unwrap();
        game.act(
            Action::Play(Play {
                seat: 2,
                card: card(CardNumber::Two, CardSuit::Hearts),
            }),
            &mut rng,
        )
        .unwrap();

        // Seat 3 holds no trump
        let relaxed = legal_action_mask(&game, 3, &LegalityConfig::default());
        assert_eq!(relaxed.count(), 5);

        let strict = LegalityConfig {
            trick_rule: TrickRule::Strict,
            ..LegalityConfig::default()
        };
        assert!(!legal_action_mask(&game, 3, &strict).any());
    }

    #[test]
    fn test_out_of_range_is_never_legal() {
        let game = started_game(1);
        let mask = legal_action_mask(&game, 1, &LegalityConfig::default());
        assert!(!mask.is_legal(ACTION_SPACE_SIZE as ActionId));
        assert!(!mask.is_legal(ActionId::MAX));
    }

    #[test]
    fn test_waiting_game_has_no_legal_actions() {
        let game = Game::new();
        assert!(!legal_action_mask(&game, 0, &LegalityConfig::default()).any());
    }
}
