//! Game state aggregate: seats, teams, phases, bids and the whole-hand data
//! the rules engine folds events into.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::cards::{Card, Suit};
use crate::domain::errors::InvariantViolation;
use crate::domain::events::GameEvent;
use crate::domain::trick::Trick;

/// Seat positions, clockwise N → E → S → W.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "W")]
    West,
}

pub const POSITIONS: [Position; 4] = [
    Position::North,
    Position::East,
    Position::South,
    Position::West,
];

impl Position {
    pub fn index(self) -> usize {
        match self {
            Position::North => 0,
            Position::East => 1,
            Position::South => 2,
            Position::West => 3,
        }
    }

    pub fn from_index(idx: usize) -> Option<Position> {
        POSITIONS.get(idx).copied()
    }

    /// Next seat clockwise.
    pub fn next(self) -> Position {
        POSITIONS[(self.index() + 1) % 4]
    }

    pub fn partner(self) -> Position {
        self.next().next()
    }

    pub fn team(self) -> Team {
        match self {
            Position::North | Position::South => Team::NorthSouth,
            Position::East | Position::West => Team::EastWest,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Position::North => 'N',
            Position::East => 'E',
            Position::South => 'S',
            Position::West => 'W',
        }
    }

    pub fn from_char(ch: char) -> Option<Position> {
        match ch.to_ascii_uppercase() {
            'N' => Some(Position::North),
            'E' => Some(Position::East),
            'S' => Some(Position::South),
            'W' => Some(Position::West),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Team {
    #[serde(rename = "NS")]
    NorthSouth,
    #[serde(rename = "EW")]
    EastWest,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::NorthSouth => Team::EastWest,
            Team::EastWest => Team::NorthSouth,
        }
    }
}

/// Per-team signed tallies (hand points or cumulative scores).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamScores {
    pub ns: i16,
    pub ew: i16,
}

impl TeamScores {
    pub fn get(&self, team: Team) -> i16 {
        match team {
            Team::NorthSouth => self.ns,
            Team::EastWest => self.ew,
        }
    }

    pub fn get_mut(&mut self, team: Team) -> &mut i16 {
        match team {
            Team::NorthSouth => &mut self.ns,
            Team::EastWest => &mut self.ew,
        }
    }
}

/// Hand lifecycle. `Complete` is terminal for the whole game; a hand that
/// does not end the game loops from `Scoring` back to `Dealing`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    DealerSelection,
    Dealing,
    Bidding,
    Declaring,
    Discarding,
    SecondDeal,
    Playing,
    Scoring,
    Complete,
}

pub const PHASES: [Phase; 9] = [
    Phase::DealerSelection,
    Phase::Dealing,
    Phase::Bidding,
    Phase::Declaring,
    Phase::Discarding,
    Phase::SecondDeal,
    Phase::Playing,
    Phase::Scoring,
    Phase::Complete,
];

impl Phase {
    pub fn to_u8(self) -> u8 {
        match self {
            Phase::DealerSelection => 0,
            Phase::Dealing => 1,
            Phase::Bidding => 2,
            Phase::Declaring => 3,
            Phase::Discarding => 4,
            Phase::SecondDeal => 5,
            Phase::Playing => 6,
            Phase::Scoring => 7,
            Phase::Complete => 8,
        }
    }

    pub fn from_u8(value: u8) -> Option<Phase> {
        PHASES.get(value as usize).copied()
    }

    /// Two-letter notation code.
    pub fn code(self) -> &'static str {
        match self {
            Phase::DealerSelection => "ds",
            Phase::Dealing => "dl",
            Phase::Bidding => "bd",
            Phase::Declaring => "dc",
            Phase::Discarding => "di",
            Phase::SecondDeal => "sd",
            Phase::Playing => "pl",
            Phase::Scoring => "sc",
            Phase::Complete => "cp",
        }
    }

    pub fn from_code(code: &str) -> Option<Phase> {
        PHASES.iter().copied().find(|p| p.code() == code)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidValue {
    Pass,
    Amount(u8),
}

/// One bidding-round entry. `tick` is a logical timestamp (the event-log
/// length at submission) so replays stay bit-identical.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BidRecord {
    pub position: Position,
    pub value: BidValue,
    pub tick: u32,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HighBid {
    pub position: Position,
    pub amount: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub position: Position,
    pub team: Team,
    pub hand: Vec<Card>,
    pub eliminated: bool,
    /// Non-trumps fixed face-up when the seat went cold.
    pub revealed: Vec<Card>,
    pub tricks_won: u8,
}

impl Player {
    pub fn new(position: Position) -> Player {
        Player {
            position,
            team: position.team(),
            hand: Vec::new(),
            eliminated: false,
            revealed: Vec::new(),
            tricks_won: 0,
        }
    }

    pub fn has_trump(&self, trump: Suit) -> bool {
        self.hand.iter().any(|c| c.is_trump(trump))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub min_bid: u8,
    pub max_bid: u8,
    pub winning_score: i16,
    pub initial_deal_count: u8,
    pub final_hand_size: u8,
    pub allow_negative_scores: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            min_bid: 6,
            max_bid: 14,
            winning_score: 62,
            initial_deal_count: 9,
            final_hand_size: 6,
            allow_negative_scores: true,
        }
    }
}

/// Public record of the redeal (second deal + dealer pool) for the current
/// hand; feeds the notation `cr:`/`dp:` segments and the state fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedealRecord {
    /// Cards each non-dealer seat received in the second deal.
    pub received: BTreeMap<Position, u8>,
    /// Size of the dealer's rob pool (hand plus remaining stock).
    pub pool_size: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub phase: Phase,
    pub hand_no: u8,
    pub dealer: Option<Position>,
    pub turn: Option<Position>,
    /// Remaining stock, kept in canonical sorted order after the deal.
    pub deck: Vec<Card>,
    pub players: [Player; 4],
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
    /// Per-seat cards publicly discarded ("killed") during `Discarding`.
    pub killed_cards: BTreeMap<Position, Vec<Card>>,
    /// Face-down discards from the dealer's rob.
    pub discarded: Vec<Card>,
    pub redeal: Option<RedealRecord>,
    pub events: Vec<GameEvent>,
    pub config: GameConfig,
}

impl GameState {
    pub fn new_game() -> GameState {
        GameState::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> GameState {
        GameState {
            phase: Phase::DealerSelection,
            hand_no: 1,
            dealer: None,
            turn: None,
            deck: Vec::new(),
            players: [
                Player::new(Position::North),
                Player::new(Position::East),
                Player::new(Position::South),
                Player::new(Position::West),
            ],
            bids: Vec::new(),
            highest_bid: None,
            bidding_team: None,
            trump: None,
            tricks: Vec::new(),
            current_trick: None,
            trick_no: 0,
            hand_points: TeamScores::default(),
            scores: TeamScores::default(),
            winner: None,
            killed_cards: BTreeMap::new(),
            discarded: Vec::new(),
            redeal: None,
            events: Vec::new(),
            config,
        }
    }

    pub fn player(&self, position: Position) -> &Player {
        &self.players[position.index()]
    }

    pub fn player_mut(&mut self, position: Position) -> &mut Player {
        &mut self.players[position.index()]
    }

    pub fn with_phase(&self, phase: Phase) -> GameState {
        let mut next = self.clone();
        next.phase = phase;
        next
    }

    pub fn with_turn(&self, turn: Option<Position>) -> GameState {
        let mut next = self.clone();
        next.turn = turn;
        next
    }

    /// Seats still participating in the current hand.
    pub fn active_positions(&self) -> impl Iterator<Item = Position> + '_ {
        POSITIONS
            .into_iter()
            .filter(|p| !self.player(*p).eliminated)
    }

    /// Next non-eliminated seat clockwise after `from`.
    pub fn next_active(&self, from: Position) -> Option<Position> {
        let mut cursor = from.next();
        for _ in 0..4 {
            if !self.player(cursor).eliminated {
                return Some(cursor);
            }
            cursor = cursor.next();
        }
        None
    }

    /// True iff any non-eliminated seat still holds a trump card.
    pub fn any_active_trumps(&self) -> bool {
        match self.trump {
            Some(trump) => self
                .active_positions()
                .any(|p| self.player(p).has_trump(trump)),
            None => false,
        }
    }

    /// Structural audit of invariants I1–I8. Invariant breakage means the
    /// engine itself is wrong; the session treats it as fatal.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        // I2: partnership mapping.
        for p in POSITIONS {
            if self.player(p).team != p.team() {
                return Err(InvariantViolation::new(format!(
                    "player {p:?} has team {:?}",
                    self.player(p).team
                )));
            }
        }

        // I1: card conservation once a hand has been dealt.
        let mut all: Vec<Card> = Vec::with_capacity(52);
        all.extend_from_slice(&self.deck);
        for p in POSITIONS {
            all.extend_from_slice(&self.player(p).hand);
            all.extend_from_slice(&self.player(p).revealed);
        }
        for cards in self.killed_cards.values() {
            all.extend_from_slice(cards);
        }
        all.extend_from_slice(&self.discarded);
        for trick in &self.tricks {
            all.extend(trick.plays.iter().map(|(_, c)| *c));
        }
        if let Some(trick) = &self.current_trick {
            all.extend(trick.plays.iter().map(|(_, c)| *c));
        }
        if !all.is_empty() {
            if all.len() != 52 {
                return Err(InvariantViolation::new(format!(
                    "card partition holds {} cards",
                    all.len()
                )));
            }
            all.sort();
            if all.windows(2).any(|w| w[0] == w[1]) {
                return Err(InvariantViolation::new("duplicate card in partition"));
            }
        }

        // I3: highest bid is recorded, in range, and the strict maximum.
        if let Some(high) = self.highest_bid {
            let recorded = self.bids.iter().any(|b| {
                b.position == high.position && b.value == BidValue::Amount(high.amount)
            });
            if !recorded {
                return Err(InvariantViolation::new("highest bid missing from bids"));
            }
            if high.amount < self.config.min_bid || high.amount > self.config.max_bid {
                return Err(InvariantViolation::new(format!(
                    "highest bid {} out of range",
                    high.amount
                )));
            }
            for bid in &self.bids {
                if let BidValue::Amount(a) = bid.value {
                    if a > high.amount {
                        return Err(InvariantViolation::new("bid exceeds recorded highest"));
                    }
                }
            }
        }

        // I4: trump presence tracks the phase within a hand.
        let trump_expected = matches!(
            self.phase,
            Phase::Discarding | Phase::SecondDeal | Phase::Playing | Phase::Scoring
        );
        let trump_forbidden = matches!(
            self.phase,
            Phase::DealerSelection | Phase::Dealing | Phase::Bidding | Phase::Declaring
        );
        if trump_expected && self.trump.is_none() {
            return Err(InvariantViolation::new("trump unset after declaration"));
        }
        if trump_forbidden && self.trump.is_some() {
            return Err(InvariantViolation::new("trump set before declaration"));
        }

        // I5: hand points match the tricks on the table.
        if let Some(trump) = self.trump {
            let mut expect = TeamScores::default();
            for trick in &self.tricks {
                if let Some(winner) = trick.winner {
                    *expect.get_mut(winner.team()) += i16::from(trick.points);
                }
                if let Some(two_holder) = trick.two_of_trump_player(trump) {
                    *expect.get_mut(two_holder.team()) += 1;
                }
            }
            if expect != self.hand_points {
                return Err(InvariantViolation::new(format!(
                    "hand points {:?} do not match tricks {:?}",
                    self.hand_points, expect
                )));
            }
        }

        // I6: negative cumulative scores only when configured.
        if !self.config.allow_negative_scores && (self.scores.ns < 0 || self.scores.ew < 0) {
            return Err(InvariantViolation::new("negative score while disallowed"));
        }

        // I7: terminal phase and winner set together.
        if (self.phase == Phase::Complete) != self.winner.is_some() {
            return Err(InvariantViolation::new("complete/winner mismatch"));
        }

        // I8: cold seats hold no trumps and never sit in the turn cursor.
        if let Some(trump) = self.trump {
            for p in POSITIONS {
                let player = self.player(p);
                if player.eliminated && player.has_trump(trump) {
                    return Err(InvariantViolation::new(format!(
                        "eliminated seat {p:?} still holds trump"
                    )));
                }
            }
        }
        if let Some(turn) = self.turn {
            if self.player(turn).eliminated {
                return Err(InvariantViolation::new(format!(
                    "turn rests on eliminated seat {turn:?}"
                )));
            }
        }

        Ok(())
    }
}
