//! The rules engine: legal-action enumeration and action application.
//!
//! `apply_action` validates a submission, decides anything random with the
//! injected generator, and expresses every effect as events folded through
//! [`crate::domain::events::apply_event`]. Auto-advanced phases (dealing,
//! discarding, the second deal, scoring, hand rollover) run inside the same
//! call, so one action may traverse several phases and emit many events.

use rand::Rng;

use crate::domain::actions::Action;
use crate::domain::bidding;
use crate::domain::cards::{Card, SUITS};
use crate::domain::dealing;
use crate::domain::errors::RuleError;
use crate::domain::events::{apply_event, GameEvent};
use crate::domain::playing;
use crate::domain::scoring;
use crate::domain::state::{GameState, Phase, Position, Team};

/// Accumulator for one `apply_action` call: the evolving state plus the
/// events emitted so far. Emission folds immediately so later decisions see
/// the effects of earlier ones.
pub(crate) struct Fold {
    pub state: GameState,
    pub events: Vec<GameEvent>,
}

impl Fold {
    fn new(state: GameState) -> Fold {
        Fold {
            state,
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.state = apply_event(&self.state, &event);
        self.events.push(event);
    }
}

/// Apply `action` for `seat`, returning the new state and the events the
/// action produced. On error the input state is untouched; validation always
/// precedes the first emission.
pub fn apply_action<R: Rng + ?Sized>(
    state: &GameState,
    seat: Position,
    action: Action,
    rng: &mut R,
) -> Result<(GameState, Vec<GameEvent>), RuleError> {
    if state.phase == Phase::Complete {
        return Err(RuleError::WrongPhase { phase: state.phase });
    }

    let mut fold = Fold::new(state.clone());
    match action {
        Action::Resign => scoring::resign(&mut fold, seat),
        Action::ClaimRemaining | Action::Discard { .. } => {
            return Err(RuleError::IllegalAction);
        }
        Action::SelectDealer => {
            expect_phase(state, Phase::DealerSelection)?;
            dealing::select_dealer(&mut fold, rng);
        }
        Action::Bid { amount } => {
            expect_phase(state, Phase::Bidding)?;
            bidding::apply_bid(&mut fold, seat, amount)?;
        }
        Action::Pass => {
            expect_phase(state, Phase::Bidding)?;
            bidding::apply_pass(&mut fold, seat)?;
        }
        Action::DeclareTrump { suit } => {
            expect_phase(state, Phase::Declaring)?;
            bidding::apply_declare(&mut fold, seat, suit)?;
            dealing::run_discard_and_second_deal(&mut fold);
        }
        Action::SelectHand { cards } => {
            expect_phase(state, Phase::SecondDeal)?;
            playing::apply_rob(&mut fold, seat, cards)?;
        }
        Action::PlayCard { card } => {
            expect_phase(state, Phase::Playing)?;
            playing::apply_play(&mut fold, seat, card)?;
        }
    }

    if hand_is_settled(&fold.state) {
        scoring::finish_hand(&mut fold, rng);
    }

    Ok((fold.state, fold.events))
}

fn expect_phase(state: &GameState, phase: Phase) -> Result<(), RuleError> {
    if state.phase != phase {
        return Err(RuleError::WrongPhase { phase: state.phase });
    }
    Ok(())
}

/// The hand is over once play cannot continue: either trick resolution
/// already parked the state in `Scoring`, or nobody holds a trump and no
/// play is pending resolution.
fn hand_is_settled(state: &GameState) -> bool {
    match state.phase {
        Phase::Scoring => true,
        Phase::Playing => {
            !state.any_active_trumps()
                && state
                    .current_trick
                    .as_ref()
                    .map_or(true, |t| t.plays.is_empty())
        }
        _ => false,
    }
}

/// Enumerate every action `seat` may submit right now. Non-acting seats get
/// an empty list except in seat-agnostic phases.
pub fn legal_actions(state: &GameState, seat: Position) -> Vec<Action> {
    let mut actions = match state.phase {
        Phase::DealerSelection => vec![Action::SelectDealer],
        Phase::Bidding if state.turn == Some(seat) => {
            let mut list: Vec<Action> = bidding::legal_bid_amounts(state)
                .map(|amount| Action::Bid { amount })
                .collect();
            if !bidding::dealer_is_forced(state, seat) {
                list.push(Action::Pass);
            }
            list
        }
        Phase::Declaring if state.highest_bid.map(|h| h.position) == Some(seat) => SUITS
            .into_iter()
            .map(|suit| Action::DeclareTrump { suit })
            .collect(),
        Phase::SecondDeal if state.dealer == Some(seat) => {
            vec![Action::SelectHand {
                cards: suggested_keep(state),
            }]
        }
        Phase::Playing if state.turn == Some(seat) && !state.player(seat).eliminated => {
            match state.trump {
                Some(trump) => {
                    let mut trumps: Vec<Card> = state
                        .player(seat)
                        .hand
                        .iter()
                        .copied()
                        .filter(|c| c.is_trump(trump))
                        .collect();
                    trumps.sort();
                    trumps
                        .into_iter()
                        .map(|card| Action::PlayCard { card })
                        .collect()
                }
                None => Vec::new(),
            }
        }
        _ => Vec::new(),
    };

    if !actions.is_empty() {
        actions.push(Action::Resign);
    }
    actions
}

/// Canonical rob suggestion: best six cards of the dealer's pool, point
/// trumps first, then trump strength, then high non-trumps.
pub fn suggested_keep(state: &GameState) -> Vec<Card> {
    let (Some(dealer), Some(trump)) = (state.dealer, state.trump) else {
        return Vec::new();
    };
    let mut pool: Vec<Card> = state.player(dealer).hand.clone();
    pool.extend_from_slice(&state.deck);
    pool.sort_by_key(|c| {
        std::cmp::Reverse((
            c.is_trump(trump),
            c.point_value(trump),
            c.trump_strength(trump).unwrap_or(0),
            c.rank.value(),
            c.suit.index() as u8,
        ))
    });
    pool.truncate(usize::from(state.config.final_hand_size));
    pool.sort();
    pool
}

pub fn game_over(state: &GameState) -> bool {
    state.phase == Phase::Complete
}

pub fn winner(state: &GameState) -> Result<Team, RuleError> {
    state.winner.ok_or(RuleError::GameNotOver)
}
