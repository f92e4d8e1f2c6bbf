//! Per-mode rule table consulted at each decision point of the turn engine.

use serde::{Deserialize, Serialize};

use crate::deck::Recycle;

/// Rule set selected for a game.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Traditional,
    BattlePuno,
    DeathMatch,
}

/// How a finished round is scored.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Scoring {
    /// Each player adds their own remaining hand points; lower is better.
    HandPoints,
    /// Hand points come off hp, surviving hp is added to the score; higher is better.
    SurvivingHp,
}

/// When the game as a whole ends.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum GameEnd {
    AfterOneRound,
    ScoreGoal,
    HostKnockedOut,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ModePolicy {
    /// Numbered cards feed the damage pool and failed matches take damage.
    pub damage: bool,
    pub scoring: Scoring,
    pub game_end: GameEnd,
    pub recycle: Recycle,
    /// Draw cards may be stacked onto a pending penalty.
    pub chain_penalties: bool,
    /// Hands below the initial size are refilled at turn start.
    pub refill_hand: bool,
    /// Hoarding above the hand threshold causes escalating self-damage.
    pub overflow_damage: bool,
    /// A knocked-out host ends the round immediately.
    pub host_knockout_ends_round: bool,
}

impl GameMode {
    pub const fn policy(self) -> ModePolicy {
        match self {
            GameMode::Traditional => ModePolicy {
                damage: false,
                scoring: Scoring::HandPoints,
                game_end: GameEnd::AfterOneRound,
                recycle: Recycle::Reshuffle,
                chain_penalties: false,
                refill_hand: false,
                overflow_damage: false,
                host_knockout_ends_round: false,
            },
            GameMode::BattlePuno => ModePolicy {
                damage: true,
                scoring: Scoring::SurvivingHp,
                game_end: GameEnd::ScoreGoal,
                recycle: Recycle::Reshuffle,
                chain_penalties: false,
                refill_hand: false,
                overflow_damage: false,
                host_knockout_ends_round: false,
            },
            GameMode::DeathMatch => ModePolicy {
                damage: true,
                scoring: Scoring::SurvivingHp,
                game_end: GameEnd::HostKnockedOut,
                recycle: Recycle::Retain,
                chain_penalties: true,
                refill_hand: true,
                overflow_damage: true,
                host_knockout_ends_round: true,
            },
        }
    }
}

impl std::str::FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "traditional" => Ok(GameMode::Traditional),
            "battlepuno" | "battle" => Ok(GameMode::BattlePuno),
            "deathmatch" | "death" => Ok(GameMode::DeathMatch),
            other => Err(format!("unknown game mode: {other}")),
        }
    }
}
