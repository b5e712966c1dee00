//! A single round: deal, bidding, trump selection, discard and five tricks.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::{
    deck, next_seat, off_suit_strength, trump_strength, Action, Bid, BidAmount, Card, Discard,
    GameError, Play, RoundStatus, SeatId, SelectableSuit, ALL_BIDS, HAND_SIZE, NUM_PLAYERS,
    TRICKS_PER_ROUND, TRICK_VALUE,
};

// =============================================================================
// Tricks
// =============================================================================

/// One trick: up to one play per seat, in play order
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Trick {
    pub plays: Vec<Play>,
    pub trump: SelectableSuit,
}

impl Trick {
    pub fn new(trump: SelectableSuit) -> Self {
        Trick {
            plays: Vec::with_capacity(NUM_PLAYERS),
            trump,
        }
    }

    /// A trick bleeds when trump was led; holders of trump must then follow with trump
    pub fn bleeding(&self) -> bool {
        self.plays
            .first()
            .is_some_and(|play| play.card.is_trump(self.trump))
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == NUM_PLAYERS
    }

    /// The currently winning play: best trump if any was played, else best of the led suit
    pub fn winning_play(&self) -> Option<Play> {
        let led = self.plays.first()?;

        let best_trump = self
            .plays
            .iter()
            .filter_map(|play| trump_strength(play.card, self.trump).map(|s| (s, *play)))
            .max_by_key(|(strength, _)| *strength);

        if let Some((_, play)) = best_trump {
            return Some(play);
        }

        self.plays
            .iter()
            .filter(|play| play.card.suit == led.card.suit)
            .max_by_key(|play| off_suit_strength(play.card))
            .copied()
    }
}

// =============================================================================
// Round state
// =============================================================================

/// Complete state of one round
#[derive(Clone, Debug)]
pub struct Round {
    dealer: SeatId,
    hands: [Vec<Card>; NUM_PLAYERS],
    draw_pile: Vec<Card>,
    bids: Vec<Bid>,
    passed: [bool; NUM_PLAYERS],
    trump: Option<SelectableSuit>,
    discards: Vec<Discard>,
    tricks: Vec<Trick>,
    status: RoundStatus,
    active_player: SeatId,
}

impl Round {
    /// Shuffle a fresh deck and deal HAND_SIZE cards to every seat
    pub fn deal(dealer: SeatId, rng: &mut impl Rng) -> Self {
        let mut cards = deck().to_vec();
        cards.shuffle(rng);

        let mut hands: [Vec<Card>; NUM_PLAYERS] = std::array::from_fn(|_| Vec::new());
        let mut seat = next_seat(dealer);
        for _ in 0..HAND_SIZE * NUM_PLAYERS {
            if let Some(card) = cards.pop() {
                hands[seat as usize].push(card);
            }
            seat = next_seat(seat);
        }

        Self::with_hands(dealer, hands, cards)
    }

    /// Start a round in the bidding phase from explicit hands and draw pile.
    ///
    /// The last card of `draw_pile` is drawn first.
    pub fn with_hands(
        dealer: SeatId,
        hands: [Vec<Card>; NUM_PLAYERS],
        draw_pile: Vec<Card>,
    ) -> Self {
        assert!((dealer as usize) < NUM_PLAYERS, "Invalid dealer seat");

        Round {
            dealer,
            hands,
            draw_pile,
            bids: Vec::new(),
            passed: [false; NUM_PLAYERS],
            trump: None,
            discards: Vec::new(),
            tricks: Vec::new(),
            status: RoundStatus::Bidding,
            active_player: next_seat(dealer),
        }
    }

    pub fn dealer(&self) -> SeatId {
        self.dealer
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    /// Seat expected to act next
    pub fn active_player(&self) -> SeatId {
        self.active_player
    }

    pub fn hand(&self, seat: SeatId) -> &[Card] {
        &self.hands[seat as usize]
    }

    pub fn draw_pile_len(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn bids(&self) -> &[Bid] {
        &self.bids
    }

    pub fn has_passed(&self, seat: SeatId) -> bool {
        self.passed[seat as usize]
    }

    pub fn trump(&self) -> Option<SelectableSuit> {
        self.trump
    }

    pub fn discards(&self) -> &[Discard] {
        &self.discards
    }

    /// Cards discarded by one seat this round (empty before it has discarded)
    pub fn discards_of(&self, seat: SeatId) -> &[Card] {
        self.discards
            .iter()
            .find(|discard| discard.seat == seat)
            .map(|discard| discard.cards.as_slice())
            .unwrap_or(&[])
    }

    /// All tricks of the round, the last one being the trick in progress
    pub fn tricks(&self) -> &[Trick] {
        &self.tricks
    }

    pub fn active_trick(&self) -> Option<&Trick> {
        self.tricks.last()
    }

    /// Highest bid and the seat holding it.
    ///
    /// A later bid of equal amount (the dealer taking the bid) replaces the earlier one.
    fn highest_bid(&self) -> Option<Bid> {
        self.bids
            .iter()
            .filter(|bid| bid.amount != BidAmount::Pass)
            .fold(None, |best: Option<Bid>, bid| match best {
                Some(b) if b.amount > bid.amount => Some(b),
                _ => Some(*bid),
            })
    }

    pub fn active_bid(&self) -> Option<BidAmount> {
        self.highest_bid().map(|bid| bid.amount)
    }

    pub fn active_bidder(&self) -> Option<SeatId> {
        self.highest_bid().map(|bid| bid.seat)
    }

    /// Bids the given seat may make right now (empty unless it is their turn to bid)
    pub fn available_bids(&self, seat: SeatId) -> Vec<BidAmount> {
        if self.status != RoundStatus::Bidding
            || seat != self.active_player
            || self.passed[seat as usize]
        {
            return Vec::new();
        }

        let active = self.active_bid();
        let is_dealer = seat == self.dealer;

        ALL_BIDS
            .into_iter()
            .filter(|&amount| match (amount, active) {
                (BidAmount::Pass, _) => true,
                (_, None) => true,
                (amount, Some(active)) if is_dealer => amount >= active,
                (amount, Some(active)) => amount > active,
            })
            .collect()
    }

    /// Per-seat points so far: 5 per completed trick won, plus 5 for the round's best trump
    pub fn scores(&self) -> [i32; NUM_PLAYERS] {
        let mut scores = [0i32; NUM_PLAYERS];
        let mut best_trump: Option<(u8, SeatId)> = None;

        for trick in self.tricks.iter().filter(|t| t.is_complete()) {
            let Some(winner) = trick.winning_play() else {
                continue;
            };
            scores[winner.seat as usize] += TRICK_VALUE;

            for play in &trick.plays {
                if let Some(strength) = trump_strength(play.card, trick.trump) {
                    if best_trump.map_or(true, |(best, _)| strength > best) {
                        best_trump = Some((strength, winner.seat));
                    }
                }
            }
        }

        if let Some((_, seat)) = best_trump {
            scores[seat as usize] += TRICK_VALUE;
        }

        scores
    }

    pub fn is_completed(&self) -> bool {
        matches!(
            self.status,
            RoundStatus::Completed | RoundStatus::CompletedNoBidders
        )
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Validate and apply one action
    pub(crate) fn apply(&mut self, action: &Action) -> Result<(), GameError> {
        let seat = action.seat();
        if seat as usize >= NUM_PLAYERS {
            return Err(GameError::InvalidSeat(seat));
        }
        if self.is_completed() {
            return Err(GameError::WrongPhase(self.status));
        }
        if seat != self.active_player {
            return Err(GameError::NotPlayersTurn(seat));
        }

        match (self.status, action) {
            (RoundStatus::Bidding, Action::Bid(bid)) => self.apply_bid(*bid),
            (RoundStatus::TrumpSelection, Action::SelectTrump { suit, .. }) => {
                self.trump = Some(*suit);
                self.status = RoundStatus::Discard;
                self.active_player = next_seat(self.dealer);
                Ok(())
            }
            (RoundStatus::Discard, Action::Discard(discard)) => self.apply_discard(discard),
            (RoundStatus::Tricks, Action::Play(play)) => self.apply_play(*play),
            (status, _) => Err(GameError::WrongPhase(status)),
        }
    }

    fn apply_bid(&mut self, bid: Bid) -> Result<(), GameError> {
        if !self.available_bids(bid.seat).contains(&bid.amount) {
            return Err(GameError::BidNotAvailable(bid.amount));
        }

        self.bids.push(bid);
        if bid.amount == BidAmount::Pass {
            self.passed[bid.seat as usize] = true;
        }

        let remaining = self.passed.iter().filter(|&&passed| !passed).count();
        if remaining == 0 {
            self.status = RoundStatus::CompletedNoBidders;
            return Ok(());
        }

        if remaining == 1 {
            if let Some(bidder) = self.active_bidder().filter(|&b| !self.passed[b as usize]) {
                self.status = RoundStatus::TrumpSelection;
                self.active_player = bidder;
                return Ok(());
            }
        }

        let mut seat = next_seat(bid.seat);
        while self.passed[seat as usize] {
            seat = next_seat(seat);
        }
        self.active_player = seat;
        Ok(())
    }

    fn apply_discard(&mut self, discard: &Discard) -> Result<(), GameError> {
        let seat = discard.seat as usize;

        for (i, card) in discard.cards.iter().enumerate() {
            if !self.hands[seat].contains(card) {
                return Err(GameError::CardNotInHand(*card));
            }
            if discard.cards[..i].contains(card) {
                return Err(GameError::DuplicateCard(*card));
            }
        }

        self.hands[seat].retain(|card| !discard.cards.contains(card));
        while self.hands[seat].len() < HAND_SIZE {
            match self.draw_pile.pop() {
                Some(card) => self.hands[seat].push(card),
                None => break,
            }
        }
        self.discards.push(discard.clone());

        if self.discards.len() < NUM_PLAYERS {
            self.active_player = next_seat(discard.seat);
            return Ok(());
        }

        // Everyone has discarded: the bidder leads the first trick
        let (Some(trump), Some(bidder)) = (self.trump, self.active_bidder()) else {
            return Err(GameError::WrongPhase(self.status));
        };
        self.status = RoundStatus::Tricks;
        self.tricks.push(Trick::new(trump));
        self.active_player = bidder;
        Ok(())
    }

    fn apply_play(&mut self, play: Play) -> Result<(), GameError> {
        let seat = play.seat as usize;
        if !self.hands[seat].contains(&play.card) {
            return Err(GameError::CardNotInHand(play.card));
        }

        let Some(trick) = self.tricks.last_mut() else {
            return Err(GameError::WrongPhase(self.status));
        };

        let trump = trick.trump;
        let holds_trump = self.hands[seat].iter().any(|card| card.is_trump(trump));
        if trick.bleeding() && holds_trump && !play.card.is_trump(trump) {
            return Err(GameError::MustPlayTrump(play.card));
        }

        self.hands[seat].retain(|card| *card != play.card);
        trick.plays.push(play);

        if !trick.is_complete() {
            self.active_player = next_seat(play.seat);
            return Ok(());
        }

        let Some(winner) = trick.winning_play() else {
            return Err(GameError::WrongPhase(self.status));
        };

        if self.tricks.len() == TRICKS_PER_ROUND {
            self.status = RoundStatus::Completed;
        } else {
            self.tricks.push(Trick::new(trump));
        }
        self.active_player = winner.seat;
        Ok(())
    }
}
