//! Headless driver: ticks the engine and answers user prompts with a bot.

use crate::bot::Bot;
use crate::error::GameError;
use crate::game::PunoGame;
use crate::manager::GameManager;

/// Result of driving a game with [`run_game`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub decisions: u64,
    pub finished: bool,
}

/// Ask `bot` for the pending user decision, if any. Returns whether one was applied.
pub fn answer_prompt(
    game: &mut PunoGame,
    mgr: &mut dyn GameManager,
    bot: &mut dyn Bot,
) -> Result<bool, GameError> {
    let Some(seat) = game.awaiting_user() else {
        return Ok(false);
    };
    let view = game.state_view(seat)?;
    let legal = game.legal_actions(seat)?;
    let action = bot.select_action(&view, &legal);
    game.apply_action(seat, action, mgr)?;
    Ok(true)
}

/// Start `game` if needed and tick it until it finishes or `max_ticks` elapse.
pub fn run_game(
    game: &mut PunoGame,
    mgr: &mut dyn GameManager,
    host: &mut dyn Bot,
    max_ticks: u64,
) -> Result<RunSummary, GameError> {
    if game.round() == 0 {
        game.start(mgr);
    }
    let mut summary = RunSummary {
        ticks: 0,
        decisions: 0,
        finished: false,
    };
    while !game.is_finished() && summary.ticks < max_ticks {
        game.update(mgr);
        if answer_prompt(game, mgr, host)? {
            summary.decisions += 1;
        }
        summary.ticks += 1;
    }
    summary.finished = game.is_finished();
    Ok(summary)
}
