//! View projections: what each seat, a spectator, or an operator may see.
//!
//! Pure functions over the state; hidden information (other hands, the
//! stock, the buried discard, the raw log) is masked per viewer.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::cards::{Card, Suit};
use crate::domain::events::GameEvent;
use crate::domain::state::{
    BidRecord, GameState, HighBid, Phase, Position, RedealRecord, Team, TeamScores, POSITIONS,
};
use crate::domain::trick::Trick;

/// One seat as a viewer sees it; `cards` is `None` when the hand is masked,
/// `count` is always truthful.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeatView {
    pub position: Position,
    pub team: Team,
    pub cards: Option<Vec<Card>>,
    pub count: usize,
    pub eliminated: bool,
    pub revealed: Vec<Card>,
    pub tricks_won: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameView {
    pub viewer: Option<Position>,
    pub phase: Phase,
    pub hand_no: u8,
    pub dealer: Option<Position>,
    pub turn: Option<Position>,
    pub seats: BTreeMap<Position, SeatView>,
    /// `None` unless the viewer is entitled to the stock (the dealer during
    /// the second deal, or the full view).
    pub deck: Option<Vec<Card>>,
    pub bids: Vec<BidRecord>,
    pub highest_bid: Option<HighBid>,
    pub bidding_team: Option<Team>,
    pub trump: Option<Suit>,
    pub tricks: Vec<Trick>,
    pub current_trick: Option<Trick>,
    pub trick_no: u8,
    pub hand_points: TeamScores,
    pub scores: TeamScores,
    pub winner: Option<Team>,
    pub killed_cards: BTreeMap<Position, Vec<Card>>,
    pub redeal: Option<RedealRecord>,
    /// Full view only.
    pub discarded: Option<Vec<Card>>,
    /// Full view only.
    pub events: Option<Vec<GameEvent>>,
}

fn seat_view(state: &GameState, position: Position, unmasked: bool) -> SeatView {
    let player = state.player(position);
    SeatView {
        position,
        team: player.team,
        cards: unmasked.then(|| player.hand.clone()),
        count: player.hand.len(),
        eliminated: player.eliminated,
        revealed: player.revealed.clone(),
        tricks_won: player.tricks_won,
    }
}

fn base_view(state: &GameState, viewer: Option<Position>, deck: Option<Vec<Card>>) -> GameView {
    GameView {
        viewer,
        phase: state.phase,
        hand_no: state.hand_no,
        dealer: state.dealer,
        turn: state.turn,
        seats: POSITIONS
            .into_iter()
            .map(|p| (p, seat_view(state, p, viewer == Some(p))))
            .collect(),
        deck,
        bids: state.bids.clone(),
        highest_bid: state.highest_bid,
        bidding_team: state.bidding_team,
        trump: state.trump,
        tricks: state.tricks.clone(),
        current_trick: state.current_trick.clone(),
        trick_no: state.trick_no,
        hand_points: state.hand_points,
        scores: state.scores,
        winner: state.winner,
        killed_cards: state.killed_cards.clone(),
        redeal: state.redeal.clone(),
        discarded: None,
        events: None,
    }
}

/// Projection for one seat: own hand unmasked, everyone else reduced to a
/// count. The stock is visible only to the dealer while robbing.
pub fn view_for(state: &GameState, seat: Position) -> GameView {
    let deck = (state.phase == Phase::SecondDeal && state.dealer == Some(seat))
        .then(|| state.deck.clone());
    base_view(state, Some(seat), deck)
}

/// Projection with every hand masked and no stock.
pub fn view_for_spectator(state: &GameState) -> GameView {
    base_view(state, None, None)
}

/// Unmasked projection for administrative tooling (cache and config aside).
pub fn view_full(state: &GameState) -> GameView {
    let mut view = base_view(state, None, Some(state.deck.clone()));
    for (position, seat) in view.seats.iter_mut() {
        seat.cards = Some(state.player(*position).hand.clone());
    }
    view.discarded = Some(state.discarded.clone());
    view.events = Some(state.events.clone());
    view
}
