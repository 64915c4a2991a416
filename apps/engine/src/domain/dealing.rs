//! Dealer selection, the initial deal, and the second deal after discarding.

use std::collections::BTreeMap;

use rand::Rng;

use crate::domain::cards::Card;
use crate::domain::deck::Deck;
use crate::domain::engine::Fold;
use crate::domain::events::GameEvent;
use crate::domain::state::{Phase, Position, POSITIONS};

/// Simulate a uniform cut to seat the first dealer, then run the first deal.
pub(crate) fn select_dealer<R: Rng + ?Sized>(fold: &mut Fold, rng: &mut R) {
    let dealer = POSITIONS[rng.random_range(0..POSITIONS.len())];
    let ordered = Deck::ordered();
    let cut_card = ordered.cards()[rng.random_range(0..ordered.len())];
    fold.emit(GameEvent::DealerSelected {
        position: dealer,
        cut_card,
    });
    deal_hand(fold, rng);
}

/// Shuffle a fresh deck and deal the opening hands clockwise from the seat
/// left of the dealer. Also drives the `Scoring → Dealing` rollover: the
/// `CardsDealt` fold resets per-hand state and rotates the dealer.
pub(crate) fn deal_hand<R: Rng + ?Sized>(fold: &mut Fold, rng: &mut R) {
    let dealer = match fold.state.phase {
        Phase::Scoring => fold.state.dealer.map(|d| d.next()),
        _ => fold.state.dealer,
    }
    .unwrap_or(Position::North);

    let count = usize::from(fold.state.config.initial_deal_count);
    let mut rest = Deck::shuffled(rng);
    let mut hands: BTreeMap<Position, Vec<Card>> = BTreeMap::new();
    let mut seat = dealer.next();
    for _ in 0..POSITIONS.len() {
        let (mut cards, remainder) = rest.deal_batch(count);
        cards.sort();
        hands.insert(seat, cards);
        rest = remainder;
        seat = seat.next();
    }
    fold.emit(GameEvent::CardsDealt { hands });
}

/// After trump is declared: kill every non-dealer non-trump, then refill the
/// non-dealer seats to the final hand size and establish the dealer's pool.
pub(crate) fn run_discard_and_second_deal(fold: &mut Fold) {
    let Some(dealer) = fold.state.dealer else {
        return;
    };
    let Some(trump) = fold.state.trump else {
        return;
    };

    let mut seat = dealer.next();
    for _ in 0..3 {
        let mut killed: Vec<Card> = fold
            .state
            .player(seat)
            .hand
            .iter()
            .copied()
            .filter(|c| !c.is_trump(trump))
            .collect();
        killed.sort();
        fold.emit(GameEvent::CardsDiscarded {
            position: seat,
            cards: killed,
        });
        seat = seat.next();
    }

    // A seat holding more than `final_hand_size` trumps keeps them all and
    // receives nothing here.
    let target = usize::from(fold.state.config.final_hand_size);
    let mut stock = Deck::from_cards(fold.state.deck.clone());
    let mut hands: BTreeMap<Position, Vec<Card>> = BTreeMap::new();
    let mut seat = dealer.next();
    for _ in 0..3 {
        let have = fold.state.player(seat).hand.len();
        let need = target.saturating_sub(have);
        let (cards, remainder) = stock.deal_batch(need);
        stock = remainder;
        hands.insert(seat, cards);
        seat = seat.next();
    }
    fold.emit(GameEvent::SecondDealComplete { hands });
}
