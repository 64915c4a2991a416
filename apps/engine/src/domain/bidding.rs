//! Bidding round: strictly increasing bids, passes, the dealer's forced
//! minimum, and trump declaration by the bid winner.

use crate::domain::engine::Fold;
use crate::domain::errors::RuleError;
use crate::domain::events::GameEvent;
use crate::domain::state::{BidValue, GameState, Position};
use crate::domain::cards::Suit;

/// Lowest amount the next bid must reach: one above the standing high bid,
/// floored at the configured minimum.
pub fn bid_floor(state: &GameState) -> u8 {
    match state.highest_bid {
        Some(high) => high.amount.saturating_add(1).max(state.config.min_bid),
        None => state.config.min_bid,
    }
}

/// Amounts the acting seat may bid right now (possibly empty when the high
/// bid already sits at the maximum).
pub fn legal_bid_amounts(state: &GameState) -> impl Iterator<Item = u8> + '_ {
    bid_floor(state)..=state.config.max_bid
}

/// True iff `seat` is the dealer and the other three seats have all passed;
/// the dealer must then take the hand at (at least) the minimum bid.
pub fn dealer_is_forced(state: &GameState, seat: Position) -> bool {
    state.dealer == Some(seat)
        && state.bids.len() == 3
        && state.bids.iter().all(|b| b.value == BidValue::Pass)
}

fn check_turn(state: &GameState, seat: Position) -> Result<(), RuleError> {
    if state.turn != Some(seat) {
        return Err(RuleError::NotYourTurn {
            expected: state.turn,
            got: seat,
        });
    }
    Ok(())
}

pub(crate) fn apply_bid(fold: &mut Fold, seat: Position, amount: u8) -> Result<(), RuleError> {
    check_turn(&fold.state, seat)?;
    if amount > fold.state.config.max_bid {
        return Err(RuleError::invalid_bid(
            amount,
            format!("above maximum {}", fold.state.config.max_bid),
        ));
    }
    let floor = bid_floor(&fold.state);
    if amount < floor {
        return Err(RuleError::invalid_bid(
            amount,
            format!("must be at least {floor}"),
        ));
    }
    fold.emit(GameEvent::BidMade {
        position: seat,
        amount,
    });
    finish_if_settled(fold);
    Ok(())
}

pub(crate) fn apply_pass(fold: &mut Fold, seat: Position) -> Result<(), RuleError> {
    check_turn(&fold.state, seat)?;
    if dealer_is_forced(&fold.state, seat) {
        // Three passes leave the dealer holding the hand: the pass is applied
        // as the minimum bid instead of an error.
        let amount = fold.state.config.min_bid;
        fold.emit(GameEvent::BidMade {
            position: seat,
            amount,
        });
    } else {
        fold.emit(GameEvent::PlayerPassed { position: seat });
    }
    finish_if_settled(fold);
    Ok(())
}

/// Close the round once all four seats have acted: the standing high bid
/// wins (strict monotonicity makes it unique).
fn finish_if_settled(fold: &mut Fold) {
    if fold.state.bids.len() < 4 {
        return;
    }
    if let Some(high) = fold.state.highest_bid {
        fold.emit(GameEvent::BiddingComplete {
            position: high.position,
            amount: high.amount,
        });
    }
}

pub(crate) fn apply_declare(fold: &mut Fold, seat: Position, suit: Suit) -> Result<(), RuleError> {
    match fold.state.highest_bid {
        Some(high) if high.position == seat => {
            fold.emit(GameEvent::TrumpDeclared { suit });
            Ok(())
        }
        _ => Err(RuleError::BidderRequired),
    }
}
