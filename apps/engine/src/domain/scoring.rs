//! Hand scoring, game-over resolution, and the rollover into the next hand.

use rand::Rng;

use crate::domain::dealing;
use crate::domain::engine::Fold;
use crate::domain::events::GameEvent;
use crate::domain::state::{Position, Team};

/// Score the finished hand, then either crown a winner or deal the next hand.
///
/// The bidding team keeps its hand points when it made the bid and is set
/// back by the bid amount otherwise; the defending team always keeps its
/// points. If both teams cross the winning score in the same hand the
/// bidding team is preferred iff it made its bid.
pub(crate) fn finish_hand<R: Rng + ?Sized>(fold: &mut Fold, rng: &mut R) {
    let Some(high) = fold.state.highest_bid else {
        return;
    };
    let bidders = high.position.team();
    let defenders = bidders.opponent();
    let bid = i16::from(high.amount);
    let bidder_points = fold.state.hand_points.get(bidders);
    let defender_points = fold.state.hand_points.get(defenders);
    let made = bidder_points >= bid;

    let bidder_delta = if made { bidder_points } else { -bid };
    fold.emit(GameEvent::HandScored {
        team: bidders,
        points: bidder_delta,
    });
    fold.emit(GameEvent::HandScored {
        team: defenders,
        points: defender_points,
    });

    let target = fold.state.config.winning_score;
    let scores = fold.state.scores;
    let champion = match (scores.get(bidders) >= target, scores.get(defenders) >= target) {
        (true, false) => Some(bidders),
        (false, true) => Some(defenders),
        (true, true) => Some(if made { bidders } else { defenders }),
        (false, false) => None,
    };

    match champion {
        Some(team) => {
            fold.emit(GameEvent::GameWon {
                team,
                final_score: fold.state.scores.get(team),
            });
        }
        None => dealing::deal_hand(fold, rng),
    }
}

/// Concede the game: the opposing team wins at its current score.
pub(crate) fn resign(fold: &mut Fold, seat: Position) {
    let team: Team = seat.team().opponent();
    fold.emit(GameEvent::GameWon {
        team,
        final_score: fold.state.scores.get(team),
    });
}
