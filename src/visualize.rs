use std::fmt::Write;

use crate::action::{Action, PlayChoice, PlayOutcome, ZeroChoice};
use crate::card::{Card, Color};
use crate::state::{GameStateView, GameStatus};

/// Customize state rendering for CLI visualization.
#[derive(Clone, Copy, Debug)]
pub struct VisualOptions {
    pub show_pools: bool,
    pub show_hp: bool,
}

impl Default for VisualOptions {
    fn default() -> Self {
        Self {
            show_pools: true,
            show_hp: true,
        }
    }
}

pub fn render_state(state: &GameStateView) -> String {
    render_state_with_options(state, VisualOptions::default())
}

pub fn render_state_with_options(state: &GameStateView, options: VisualOptions) -> String {
    let mut out = String::new();
    let status = match state.status {
        GameStatus::Ongoing => String::from("Ongoing"),
        GameStatus::Finished { winner } => format!("Finished (winner: seat {winner})"),
    };
    let _ = writeln!(
        out,
        "{:?} round {} - {status} - {:?}",
        state.settings.mode, state.round, state.phase
    );
    let top = state
        .top_card
        .map(format_card)
        .unwrap_or_else(|| String::from("--"));
    let _ = writeln!(
        out,
        "Top: {top}  |  Active: {} {:?}  |  Direction: {}",
        color_name(state.current_color),
        state.current_value,
        if state.clockwise { "clockwise" } else { "counter-clockwise" }
    );
    let _ = writeln!(
        out,
        "Draw pile: {}  |  Discard pile: {}",
        state.draw_pile_count, state.discard_pile_count
    );
    if let Some(penalty) = state.penalty_card {
        let _ = writeln!(
            out,
            "Pending penalty: {} (draw {})",
            format_card(penalty),
            state.penalty_pool
        );
    }
    if options.show_pools && state.damage_pool > 0 {
        let colors = state
            .damage_types
            .iter()
            .map(|color| color_name(*color))
            .collect::<Vec<_>>()
            .join("/");
        let _ = writeln!(out, "Damage pool: {} [{colors}]", state.damage_pool);
    }
    let _ = writeln!(out, "Players:");
    for player in &state.players {
        let label_you = if player.id == state.self_player { " (You)" } else { "" };
        let current_tag = if player.is_current { " <- current" } else { "" };
        let uno_tag = if player.uno { " UNO!" } else { "" };
        let out_tag = if player.knocked_out { " [out]" } else { "" };
        let hp = if options.show_hp {
            format!(" hp {}", player.hp)
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            "  {} {}{} - {} cards{hp} score {}{uno_tag}{out_tag}{current_tag}",
            player.id, player.name, label_you, player.hand_size, player.score
        );
    }
    if state.hand.is_empty() {
        let _ = writeln!(out, "Hand: (empty)");
    } else {
        let hand = state
            .hand
            .iter()
            .enumerate()
            .map(|(idx, card)| format!("{idx}:{}", format_card(*card)))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "Hand: {hand}");
    }
    out
}

pub fn describe_action(state: &GameStateView, action: &Action) -> String {
    match action {
        Action::Play { hand_index, choice } => {
            let card = state
                .hand
                .get(*hand_index)
                .map(|card| format_card(*card))
                .unwrap_or_else(|| String::from("--"));
            let suffix = match choice {
                PlayChoice::None => String::new(),
                PlayChoice::Color(color) => format!(" as {}", color_name(*color)),
                PlayChoice::Trade { color, target } => {
                    let name = state
                        .players
                        .get(*target)
                        .map(|player| player.name.as_str())
                        .unwrap_or("?");
                    format!(" as {}, trading with {name}", color_name(*color))
                }
                PlayChoice::Zero(ZeroChoice::Bank) => String::from(" (bank +10 damage)"),
                PlayChoice::Zero(ZeroChoice::Detonate) => String::from(" (clear damage)"),
            };
            format!("Play hand[{hand_index}] {card}{suffix}")
        }
        Action::Draw if state.damage_pool > 0 => {
            format!("Take {} damage and draw", state.damage_pool)
        }
        Action::Draw => String::from("Draw a card"),
        Action::AcceptPenalty => match state.penalty_card {
            Some(card) if card.penalty_draw() > 0 => {
                format!("Accept penalty (draw {})", state.penalty_pool)
            }
            _ => String::from("Accept skip"),
        },
    }
}

/// One-line narration of a play notification.
pub fn describe_outcome(card: Card, outcome: &PlayOutcome) -> String {
    let card = format_card(card);
    match outcome {
        PlayOutcome::Matched => card,
        PlayOutcome::Opening => format!("{card} opens the pile"),
        PlayOutcome::Zero(ZeroChoice::Bank) => format!("{card} banks damage"),
        PlayOutcome::Zero(ZeroChoice::Detonate) => format!("{card} clears the damage pool"),
        PlayOutcome::Reverse { countered: true } => format!("{card} reverses the penalty"),
        PlayOutcome::Reverse { countered: false } => format!("{card} reverses direction"),
        PlayOutcome::Countered => format!("{card} cancels the penalty"),
        PlayOutcome::Chained { pool } => format!("{card} stacks the penalty to {pool}"),
        PlayOutcome::Wild { color } => format!("{card} calls {}", color_name(*color)),
        PlayOutcome::Chaos { color, value } => {
            format!("{card} becomes {} {value:?}", color_name(*color))
        }
        PlayOutcome::Trade { color, target } => match target {
            Some(target) => format!("{card} trades hands with seat {target}, calls {}", color_name(*color)),
            None => format!("{card} finds nobody to trade with, calls {}", color_name(*color)),
        },
        PlayOutcome::DiscardAll { color, swept } => {
            format!("{card} sweeps {swept} cards, calls {}", color_name(*color))
        }
        PlayOutcome::HitAll { color } => format!("{card} hits everyone, calls {}", color_name(*color)),
        PlayOutcome::Swept => format!("{card} swept away"),
        PlayOutcome::HandEmptied => format!("{card} - out of cards!"),
    }
}

fn format_card(card: Card) -> String {
    card.to_string()
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::Red => "red",
        Color::Yellow => "yellow",
        Color::Green => "green",
        Color::Blue => "blue",
        Color::Wild => "wild",
    }
}
