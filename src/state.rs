use serde::{Deserialize, Serialize};

use crate::action::PlayerId;
use crate::card::{BASE_DECK_SIZE, Card, Color, FULL_DECK_SIZE, PLAYER_COUNT, Value};
use crate::error::GameError;
use crate::manager::DamageTypes;
use crate::policy::GameMode;

pub const DEFAULT_HAND_SIZE: usize = 7;
pub const DEFAULT_HP: u32 = 100;
pub const DEFAULT_SCORE_GOAL: u32 = 300;
pub const MAX_HAND_SIZE: usize = 20;

/// Global constants for a running game.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSettings {
    pub mode: GameMode,
    pub initial_hand: usize,
    pub initial_hp: u32,
    pub score_goal: u32,
    pub extra_cards: bool,
    /// Death-Match hoarding limit: one above the initial hand.
    pub max_hand_threshold: usize,
}

impl GameSettings {
    pub fn new(
        mode: GameMode,
        initial_hand: usize,
        initial_hp: u32,
        score_goal: u32,
        extra_cards: bool,
    ) -> Result<Self, GameError> {
        if !(1..=MAX_HAND_SIZE).contains(&initial_hand) {
            return Err(GameError::InvalidConfiguration(
                "initial hand must be between 1 and 20 cards",
            ));
        }
        if initial_hp == 0 {
            return Err(GameError::InvalidConfiguration("initial hp must be positive"));
        }
        if score_goal == 0 {
            return Err(GameError::InvalidConfiguration("score goal must be positive"));
        }
        Ok(Self {
            mode,
            initial_hand,
            initial_hp,
            score_goal,
            extra_cards,
            max_hand_threshold: initial_hand + 1,
        })
    }

    /// Size of the card universe for this configuration.
    pub fn total_cards(&self) -> usize {
        if self.extra_cards {
            FULL_DECK_SIZE
        } else {
            BASE_DECK_SIZE
        }
    }

    /// Cards that must be available for the deal plus the opening card.
    pub fn required_cards(&self) -> usize {
        self.initial_hand * PLAYER_COUNT + 1
    }
}

/// Status of the entire game.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Finished { winner: PlayerId },
}

/// Lifecycle phase of the engine.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TurnPhase {
    /// Built but not started.
    Idle,
    Playing,
    /// Round settled; the next `update` deals a new one.
    RoundOver,
    GameOver,
}

/// Public portion of a player's state that all opponents may observe.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerPublicState {
    pub id: PlayerId,
    pub name: String,
    pub hp: u32,
    pub score: u32,
    pub hand_size: usize,
    pub knocked_out: bool,
    pub ai: bool,
    pub uno: bool,
    pub damage_stack: u32,
    pub is_current: bool,
}

/// Game state snapshot tailored for bots and front ends.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameStateView {
    pub settings: GameSettings,
    pub phase: TurnPhase,
    pub status: GameStatus,
    pub round: u32,
    pub self_player: PlayerId,
    pub current_player: PlayerId,
    pub next_player: Option<PlayerId>,
    pub clockwise: bool,
    pub current_color: Color,
    pub current_value: Value,
    pub top_card: Option<Card>,
    pub penalty_card: Option<Card>,
    pub penalty_pool: usize,
    pub damage_pool: u32,
    pub damage_types: DamageTypes,
    pub draw_pile_count: usize,
    pub discard_pile_count: usize,
    pub players: Vec<PlayerPublicState>,
    pub hand: Vec<Card>,
}
