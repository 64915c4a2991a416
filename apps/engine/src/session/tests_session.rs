#![cfg(test)]
//! Session runtime and directory: serialization, caching, signals, reset,
//! per-seed determinism, and registry lifecycle.

use std::collections::BTreeSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use uuid::Uuid;

use crate::domain::actions::Action;
use crate::domain::engine;
use crate::domain::state::{GameConfig, GameState, Phase, Position, POSITIONS};
use crate::domain::trick::Trick;
use crate::domain::cards::parse_cards;
use crate::domain::state::HighBid;
use crate::session::runtime::{SessionError, SessionHandle, SessionOptions};
use crate::session::registry::SessionRegistry;
use crate::session::signals::SessionSignal;

fn short_game_options(seed: u64) -> SessionOptions {
    SessionOptions {
        seed: Some(seed),
        initial_state: Some(GameState::with_config(GameConfig {
            winning_score: 20,
            ..GameConfig::default()
        })),
        ..SessionOptions::default()
    }
}

async fn acting_seat(session: &SessionHandle) -> Option<Position> {
    for seat in POSITIONS {
        if !session.legal_actions(seat).await.ok()?.is_empty() {
            return Some(seat);
        }
    }
    None
}

/// Drive a session to completion with seeded random choices, returning every
/// signal observed along the way.
async fn drive_to_completion(session: &SessionHandle, pick_seed: u64) -> Vec<SessionSignal> {
    let mut pick_rng = ChaCha20Rng::seed_from_u64(pick_seed);
    let mut rx = session.subscribe();
    let mut signals = Vec::new();

    for _ in 0..5000 {
        if session.game_over().await.unwrap() {
            break;
        }
        let seat = acting_seat(session).await.expect("a seat can act");
        let options: Vec<Action> = session
            .legal_actions(seat)
            .await
            .unwrap()
            .into_iter()
            .filter(|a| *a != Action::Resign)
            .collect();
        let action = options[pick_rng.random_range(0..options.len())].clone();
        session.apply_action(seat, action).await.expect("legal action applies");
        while let Ok(signal) = rx.try_recv() {
            signals.push(signal);
        }
    }
    while let Ok(signal) = rx.try_recv() {
        signals.push(signal);
    }
    signals
}

#[tokio::test]
async fn applies_actions_and_serves_snapshots() {
    let session = SessionHandle::start(SessionOptions {
        seed: Some(9),
        ..SessionOptions::default()
    });

    let applied = session
        .apply_action(Position::North, Action::SelectDealer)
        .await
        .unwrap();
    assert_eq!(applied.state.phase, Phase::Bidding);
    assert!(!applied.events.is_empty());

    let state = session.state().await.unwrap();
    assert_eq!(state, applied.state);
    assert!(!session.game_over().await.unwrap());
    assert_eq!(
        session.winner().await.unwrap_err(),
        SessionError::Rule(crate::domain::errors::RuleError::GameNotOver)
    );
    assert_eq!(session.history().await.unwrap(), state.events);
}

#[tokio::test]
async fn rejected_actions_leave_state_untouched() {
    let session = SessionHandle::start(SessionOptions {
        seed: Some(10),
        ..SessionOptions::default()
    });
    session
        .apply_action(Position::North, Action::SelectDealer)
        .await
        .unwrap();
    let before = session.state().await.unwrap();
    let opener = before.turn.unwrap();

    let err = session
        .apply_action(opener, Action::Bid { amount: 5 })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Rule(crate::domain::errors::RuleError::InvalidBid { .. })
    ));
    assert_eq!(session.state().await.unwrap(), before);
    assert!(!session.is_terminated());
}

#[tokio::test]
async fn legal_actions_are_cached_and_consistent() {
    let session = SessionHandle::start(SessionOptions {
        seed: Some(11),
        ..SessionOptions::default()
    });
    session
        .apply_action(Position::North, Action::SelectDealer)
        .await
        .unwrap();
    let state = session.state().await.unwrap();
    let opener = state.turn.unwrap();

    let first = session.legal_actions(opener).await.unwrap();
    let second = session.legal_actions(opener).await.unwrap();
    assert_eq!(first, second);
    // The cached list matches a fresh enumeration.
    assert_eq!(first, engine::legal_actions(&state, opener));

    let stats = session.cache_stats().await.unwrap();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.size, 1);
    assert!(stats.hit_rate > 0.49 && stats.hit_rate < 0.51);

    // Applying an action invalidates the cache.
    session
        .apply_action(opener, Action::Bid { amount: 6 })
        .await
        .unwrap();
    let stats = session.cache_stats().await.unwrap();
    assert_eq!(stats.size, 0);
}

#[tokio::test]
async fn concurrent_submissions_serialize() {
    let session = SessionHandle::start(SessionOptions {
        seed: Some(12),
        ..SessionOptions::default()
    });

    let (a, b) = tokio::join!(
        session.apply_action(Position::North, Action::SelectDealer),
        session.apply_action(Position::East, Action::SelectDealer),
    );
    // Exactly one of the two racing submissions lands in DealerSelection.
    assert!(a.is_ok() ^ b.is_ok(), "a={a:?} b={b:?}");
    assert_eq!(session.state().await.unwrap().phase, Phase::Bidding);
}

#[tokio::test]
async fn signals_cover_lifecycle_and_telemetry() {
    let session = SessionHandle::start(short_game_options(13));
    let signals = drive_to_completion(&session, 13).await;

    assert!(signals
        .iter()
        .any(|s| matches!(s, SessionSignal::StateUpdated { .. })));
    assert!(signals
        .iter()
        .any(|s| matches!(s, SessionSignal::SecondDealComplete { .. })));
    assert!(signals
        .iter()
        .any(|s| matches!(s, SessionSignal::DealerPoolEstablished { pool_size, .. } if *pool_size > 0)));
    assert!(signals
        .iter()
        .any(|s| matches!(s, SessionSignal::GameOver { .. })));

    // GameOver arrives last among the signals of its game.
    let last = signals.last().unwrap();
    assert!(matches!(last, SessionSignal::GameOver { .. }));

    let champion = session.winner().await.unwrap();
    let final_state = session.state().await.unwrap();
    assert_eq!(final_state.winner, Some(champion));
}

#[tokio::test]
async fn telemetry_can_be_disabled() {
    let mut opts = short_game_options(14);
    opts.telemetry = false;
    let session = SessionHandle::start(opts);
    let signals = drive_to_completion(&session, 14).await;

    assert!(signals
        .iter()
        .all(|s| !matches!(s, SessionSignal::SecondDealComplete { .. })));
    assert!(signals
        .iter()
        .all(|s| !matches!(s, SessionSignal::DealerPoolEstablished { .. })));
    assert!(signals
        .iter()
        .any(|s| matches!(s, SessionSignal::GameOver { .. })));
}

#[tokio::test]
async fn cold_seats_surface_as_telemetry() {
    // Crafted position: North's only trump play leaves it cold immediately.
    let mut state = GameState::new_game();
    state.phase = Phase::Playing;
    state.dealer = Some(Position::West);
    state.trump = Some(crate::domain::Suit::Hearts);
    state.highest_bid = Some(HighBid {
        position: Position::North,
        amount: 6,
    });
    state.bidding_team = Some(Position::North.team());
    state.trick_no = 1;
    state.turn = Some(Position::North);
    state.current_trick = Some(Trick::new(1, Position::North));
    state.player_mut(Position::North).hand = parse_cards(&["Ah", "4c"]);
    state.player_mut(Position::East).hand = parse_cards(&["Jh"]);

    let session = SessionHandle::start(SessionOptions {
        seed: Some(15),
        initial_state: Some(state),
        ..SessionOptions::default()
    });
    let mut rx = session.subscribe();
    session
        .apply_action(
            Position::North,
            Action::PlayCard {
                card: "Ah".parse().unwrap(),
            },
        )
        .await
        .unwrap();

    let mut saw_cold = false;
    while let Ok(signal) = rx.try_recv() {
        if matches!(
            signal,
            SessionSignal::PlayerWentCold {
                position: Position::North,
                ..
            }
        ) {
            saw_cold = true;
        }
    }
    assert!(saw_cold);
}

#[tokio::test]
async fn reset_restores_a_fresh_game() {
    let session = SessionHandle::start(SessionOptions {
        seed: Some(16),
        ..SessionOptions::default()
    });
    session
        .apply_action(Position::North, Action::SelectDealer)
        .await
        .unwrap();
    session.reset().await.unwrap();

    let state = session.state().await.unwrap();
    assert_eq!(state.phase, Phase::DealerSelection);
    assert!(state.events.is_empty());
    assert!(session.history().await.unwrap().is_empty());
}

#[tokio::test]
async fn equal_seeds_give_bit_identical_sessions() {
    let a = SessionHandle::start(short_game_options(77));
    let b = SessionHandle::start(short_game_options(77));

    let _ = drive_to_completion(&a, 99).await;
    let _ = drive_to_completion(&b, 99).await;

    let state_a = a.state().await.unwrap();
    let state_b = b.state().await.unwrap();
    assert_eq!(state_a, state_b);
    assert_eq!(a.history().await.unwrap(), b.history().await.unwrap());
    assert_eq!(state_a.phase, Phase::Complete);
}

#[tokio::test]
async fn registry_tracks_session_lifecycle() {
    let registry = SessionRegistry::new();
    assert_eq!(registry.count(), 0);

    let game_id = Uuid::new_v4();
    let handle = registry
        .spawn_session(SessionOptions {
            game_id: Some(game_id),
            seed: Some(17),
            ..SessionOptions::default()
        })
        .unwrap();
    assert_eq!(handle.game_id(), game_id);
    assert_eq!(registry.count(), 1);

    // Duplicate spawn for a live game is rejected.
    let err = registry
        .spawn_session(SessionOptions {
            game_id: Some(game_id),
            ..SessionOptions::default()
        })
        .unwrap_err();
    assert_eq!(err, SessionError::DuplicateGame { game_id });

    // Lookup returns a working handle to the same session.
    let looked_up = registry.lookup(game_id).unwrap();
    looked_up
        .apply_action(Position::North, Action::SelectDealer)
        .await
        .unwrap();
    assert_eq!(handle.state().await.unwrap().phase, Phase::Bidding);

    let ids: BTreeSet<Uuid> = registry.list().into_iter().map(|(id, _)| id).collect();
    assert!(ids.contains(&game_id));

    registry.terminate_session(game_id).await.unwrap();
    assert_eq!(registry.count(), 0);
    assert_eq!(
        registry.lookup(game_id).unwrap_err(),
        SessionError::NotFound { game_id }
    );
    assert_eq!(
        registry.terminate_session(game_id).await.unwrap_err(),
        SessionError::NotFound { game_id }
    );

    // Requests to the dead session fail once the worker has drained.
    let mut attempts = 0;
    while !handle.is_terminated() && attempts < 100 {
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        attempts += 1;
    }
    assert!(handle.is_terminated());
    assert!(matches!(
        handle.state().await.unwrap_err(),
        SessionError::Terminated { .. }
    ));
}

#[tokio::test]
async fn spawning_without_an_id_generates_one() {
    let registry = SessionRegistry::new();
    let a = registry.spawn_session(SessionOptions::default()).unwrap();
    let b = registry.spawn_session(SessionOptions::default()).unwrap();
    assert_ne!(a.game_id(), b.game_id());
    assert_eq!(registry.count(), 2);
}
