//! Trick play: trump-only plays, going cold, and trick resolution with the
//! turn ring skipping eliminated seats.

use crate::domain::cards::Card;
use crate::domain::engine::Fold;
use crate::domain::errors::RuleError;
use crate::domain::events::GameEvent;
use crate::domain::state::{GameState, Phase, Position};

/// The dealer's rob: keep exactly `final_hand_size` cards out of hand ∪ stock.
pub(crate) fn apply_rob(fold: &mut Fold, seat: Position, cards: Vec<Card>) -> Result<(), RuleError> {
    if fold.state.dealer != Some(seat) {
        return Err(RuleError::NotYourTurn {
            expected: fold.state.dealer,
            got: seat,
        });
    }
    let expected = usize::from(fold.state.config.final_hand_size);
    if cards.len() != expected {
        return Err(RuleError::HandSizeViolation {
            expected,
            got: cards.len(),
        });
    }
    let mut deduped = cards.clone();
    deduped.sort();
    deduped.dedup();
    if deduped.len() != cards.len() {
        return Err(RuleError::invalid_card("duplicate card in selection"));
    }
    for card in &cards {
        let in_pool =
            fold.state.player(seat).hand.contains(card) || fold.state.deck.contains(card);
        if !in_pool {
            return Err(RuleError::invalid_card(format!(
                "{card} is not in the dealer's pool"
            )));
        }
    }

    let received = fold.state.deck.clone();
    fold.emit(GameEvent::DealerRobbedPack {
        position: seat,
        received,
        kept: deduped,
    });
    settle(fold)?;
    Ok(())
}

pub(crate) fn apply_play(fold: &mut Fold, seat: Position, card: Card) -> Result<(), RuleError> {
    let state = &fold.state;
    if state.turn != Some(seat) || state.player(seat).eliminated {
        return Err(RuleError::NotYourTurn {
            expected: state.turn,
            got: seat,
        });
    }
    if !state.player(seat).hand.contains(&card) {
        return Err(RuleError::invalid_card(format!("{card} is not in hand")));
    }
    let Some(trump) = state.trump else {
        return Err(RuleError::WrongPhase { phase: state.phase });
    };
    if !card.is_trump(trump) {
        return Err(RuleError::invalid_card(format!(
            "{card} is not a trump card"
        )));
    }

    fold.emit(GameEvent::CardPlayed {
        position: seat,
        card,
    });

    // A seat that just spent its last trump goes cold immediately if play
    // continues elsewhere.
    if !fold.state.player(seat).has_trump(trump) && others_hold_trump(&fold.state, seat) {
        emit_cold(fold, seat);
    }

    settle(fold)
}

fn others_hold_trump(state: &GameState, seat: Position) -> bool {
    let Some(trump) = state.trump else {
        return false;
    };
    state
        .active_positions()
        .any(|p| p != seat && state.player(p).has_trump(trump))
}

fn emit_cold(fold: &mut Fold, seat: Position) {
    let Some(trump) = fold.state.trump else {
        return;
    };
    let mut revealed: Vec<Card> = fold
        .state
        .player(seat)
        .hand
        .iter()
        .copied()
        .filter(|c| !c.is_trump(trump))
        .collect();
    revealed.sort();
    fold.emit(GameEvent::PlayerWentCold {
        position: seat,
        revealed,
    });
}

/// Drive the table to a stable point: cold trumpless seats the cursor reaches
/// and resolve the trick once no active seat still owes it a trump. Leaves
/// the state either awaiting a play, or in `Scoring` when the hand is dry.
pub(crate) fn settle(fold: &mut Fold) -> Result<(), RuleError> {
    loop {
        if fold.state.phase != Phase::Playing {
            return Ok(());
        }
        let Some(trump) = fold.state.trump else {
            return Ok(());
        };
        let Some(trick) = fold.state.current_trick.clone() else {
            return Ok(());
        };

        // Resolve once nobody still owed a play holds a trump.
        let pending_with_trump = fold
            .state
            .active_positions()
            .any(|p| !trick.has_play(p) && fold.state.player(p).has_trump(trump));
        if !pending_with_trump && !trick.plays.is_empty() {
            let winner = trick.resolve_winner(trump)?;
            let points = trick.points(trump);
            fold.emit(GameEvent::TrickWon {
                position: winner,
                points,
            });
            continue;
        }

        // Cold the cursor seat if it cannot contribute while others can.
        if let Some(turn) = fold.state.turn {
            if !trick.has_play(turn)
                && !fold.state.player(turn).has_trump(trump)
                && others_hold_trump(&fold.state, turn)
            {
                emit_cold(fold, turn);
                continue;
            }
        }

        return Ok(());
    }
}
