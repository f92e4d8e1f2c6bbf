//! Boundary between the rule engine and the presentation layer.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::action::{PlayOutcome, PlayerId};
use crate::card::{Card, Color};

/// Colours that fed the damage pool delivered in one hit.
pub type DamageTypes = BTreeSet<Color>;

/// Collaborator driven by the engine. Notifications are fire-and-forget and arrive in call
/// order; the two queries are polled once per `update`.
///
/// `is_in_turn` must turn true after either turn-begin notification and false again after
/// `on_turn_end`, otherwise the engine never advances past the acting seat.
#[allow(unused_variables)]
pub trait GameManager {
    fn is_scene_busy(&self) -> bool {
        false
    }

    fn is_in_turn(&self) -> bool;

    fn on_game_start(&mut self) {}

    fn on_round_start(&mut self) {}

    fn on_card_draw(&mut self, player: PlayerId, cards: &[Card], peek: bool) {}

    /// `player` is `None` for the opening card of a round.
    fn on_card_play(&mut self, player: Option<PlayerId>, card: Card, outcome: &PlayOutcome) {}

    fn on_turn_end(&mut self, player: PlayerId) {}

    fn on_hp_change(&mut self, player: PlayerId, damage_types: &DamageTypes) {}

    fn on_damage_change(&mut self) {}

    fn on_npc_turn_begin(&mut self, player: PlayerId) {}

    fn on_user_turn_begin(&mut self, player: PlayerId) {}

    fn process_round_over(&mut self) {}

    fn process_game_over(&mut self) {}
}

/// Recorded notification.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStart,
    RoundStart,
    CardDraw {
        player: PlayerId,
        cards: Vec<Card>,
        peek: bool,
    },
    CardPlay {
        player: Option<PlayerId>,
        card: Card,
        outcome: PlayOutcome,
    },
    TurnEnd(PlayerId),
    HpChange {
        player: PlayerId,
        damage_types: DamageTypes,
    },
    DamageChange,
    NpcTurnBegin(PlayerId),
    UserTurnBegin(PlayerId),
    RoundOver,
    GameOver,
}

/// Headless collaborator that records every notification.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
    in_turn: bool,
    busy: bool,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Drains the recorded events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Simulate a fade or modal overlay holding the engine.
    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    fn record(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

impl GameManager for EventLog {
    fn is_scene_busy(&self) -> bool {
        self.busy
    }

    fn is_in_turn(&self) -> bool {
        self.in_turn
    }

    fn on_game_start(&mut self) {
        self.record(GameEvent::GameStart);
    }

    fn on_round_start(&mut self) {
        self.in_turn = false;
        self.record(GameEvent::RoundStart);
    }

    fn on_card_draw(&mut self, player: PlayerId, cards: &[Card], peek: bool) {
        self.record(GameEvent::CardDraw {
            player,
            cards: cards.to_vec(),
            peek,
        });
    }

    fn on_card_play(&mut self, player: Option<PlayerId>, card: Card, outcome: &PlayOutcome) {
        self.record(GameEvent::CardPlay {
            player,
            card,
            outcome: outcome.clone(),
        });
    }

    fn on_turn_end(&mut self, player: PlayerId) {
        self.in_turn = false;
        self.record(GameEvent::TurnEnd(player));
    }

    fn on_hp_change(&mut self, player: PlayerId, damage_types: &DamageTypes) {
        self.record(GameEvent::HpChange {
            player,
            damage_types: damage_types.clone(),
        });
    }

    fn on_damage_change(&mut self) {
        self.record(GameEvent::DamageChange);
    }

    fn on_npc_turn_begin(&mut self, player: PlayerId) {
        self.in_turn = true;
        self.record(GameEvent::NpcTurnBegin(player));
    }

    fn on_user_turn_begin(&mut self, player: PlayerId) {
        self.in_turn = true;
        self.record(GameEvent::UserTurnBegin(player));
    }

    fn process_round_over(&mut self) {
        self.in_turn = false;
        self.record(GameEvent::RoundOver);
    }

    fn process_game_over(&mut self) {
        self.in_turn = false;
        self.record(GameEvent::GameOver);
    }
}
