//! PUNO rule engine: a four-seat UNO variant with Traditional, Battle-Puno and Death-Match
//! modes, driven one tick at a time by a presentation layer.

pub mod action;
pub mod bot;
pub mod bots;
pub mod card;
pub mod deck;
pub mod error;
pub mod game;
pub mod manager;
pub mod player;
pub mod policy;
pub mod random;
pub mod schedule;
pub mod score;
pub mod session;
pub mod state;
pub mod visualize;

pub use crate::action::{Action, PlayChoice, PlayOutcome, PlayerId, ZeroChoice};
pub use crate::bot::Bot;
pub use crate::bots::registry::{create_bot_from_spec, label_for_spec};
pub use crate::bots::{FirstMatchBot, HumanBot, RandomBot};
pub use crate::card::{Card, Color, Value};
pub use crate::deck::{Deck, Recycle};
pub use crate::error::{GameError, InvalidAction};
pub use crate::game::{GameBuilder, GameConfig, HOST_SEAT, PunoGame};
pub use crate::manager::{DamageTypes, EventLog, GameEvent, GameManager};
pub use crate::player::Player;
pub use crate::policy::{GameMode, ModePolicy};
pub use crate::session::{RunSummary, answer_prompt, run_game};
pub use crate::state::{GameSettings, GameStateView, GameStatus, PlayerPublicState, TurnPhase};
pub use crate::visualize::{VisualOptions, describe_action, describe_outcome, render_state};
