#![cfg(test)]
//! Wire shape of every event variant: tagged JSON that round-trips.

use std::collections::BTreeMap;

use crate::domain::cards::{parse_cards, Suit};
use crate::domain::events::GameEvent;
use crate::domain::state::{Position, Team};

fn all_variants() -> Vec<(GameEvent, &'static str)> {
    let cards = parse_cards(&["Ah", "5d", "2c"]);
    let mut hands = BTreeMap::new();
    hands.insert(Position::North, cards.clone());

    vec![
        (
            GameEvent::DealerSelected {
                position: Position::West,
                cut_card: cards[0],
            },
            "dealer_selected",
        ),
        (
            GameEvent::CardsDealt {
                hands: hands.clone(),
            },
            "cards_dealt",
        ),
        (
            GameEvent::BidMade {
                position: Position::North,
                amount: 9,
            },
            "bid_made",
        ),
        (
            GameEvent::PlayerPassed {
                position: Position::East,
            },
            "player_passed",
        ),
        (
            GameEvent::BiddingComplete {
                position: Position::North,
                amount: 9,
            },
            "bidding_complete",
        ),
        (GameEvent::TrumpDeclared { suit: Suit::Hearts }, "trump_declared"),
        (
            GameEvent::CardsDiscarded {
                position: Position::South,
                cards: cards.clone(),
            },
            "cards_discarded",
        ),
        (
            GameEvent::SecondDealComplete { hands },
            "second_deal_complete",
        ),
        (
            GameEvent::DealerRobbedPack {
                position: Position::West,
                received: cards.clone(),
                kept: cards.clone(),
            },
            "dealer_robbed_pack",
        ),
        (
            GameEvent::CardPlayed {
                position: Position::North,
                card: cards[0],
            },
            "card_played",
        ),
        (
            GameEvent::TrickWon {
                position: Position::North,
                points: 3,
            },
            "trick_won",
        ),
        (
            GameEvent::PlayerWentCold {
                position: Position::East,
                revealed: cards.clone(),
            },
            "player_went_cold",
        ),
        (
            GameEvent::HandScored {
                team: Team::NorthSouth,
                points: -7,
            },
            "hand_scored",
        ),
        (
            GameEvent::GameWon {
                team: Team::EastWest,
                final_score: 64,
            },
            "game_won",
        ),
    ]
}

#[test]
fn every_variant_is_tagged_and_round_trips() {
    for (event, tag) in all_variants() {
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], tag, "wrong tag for {event:?}");
        let back: GameEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}

#[test]
fn positions_teams_and_cards_use_short_tokens() {
    let json = serde_json::to_value(GameEvent::DealerSelected {
        position: Position::West,
        cut_card: parse_cards(&["Th"])[0],
    })
    .unwrap();
    assert_eq!(json["position"], "W");
    assert_eq!(json["cut_card"], "Th");

    let json = serde_json::to_value(GameEvent::HandScored {
        team: Team::NorthSouth,
        points: 14,
    })
    .unwrap();
    assert_eq!(json["team"], "NS");

    // Map keys are seat letters.
    let mut hands = BTreeMap::new();
    hands.insert(Position::South, parse_cards(&["5d"]));
    let json = serde_json::to_value(GameEvent::CardsDealt { hands }).unwrap();
    assert_eq!(json["hands"]["S"][0], "5d");
}
