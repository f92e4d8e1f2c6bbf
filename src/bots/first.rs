use crate::action::Action;
use crate::bot::Bot;
use crate::state::GameStateView;

/// Plays the first legal card, keeping the first offered choice; otherwise draws or
/// accepts the penalty. Mirrors the built-in seat AI closely enough for benchmarks.
#[derive(Default)]
pub struct FirstMatchBot;

impl Bot for FirstMatchBot {
    fn select_action(&mut self, _state: &GameStateView, legal_actions: &[Action]) -> Action {
        legal_actions
            .iter()
            .find(|action| matches!(action, Action::Play { .. }))
            .or_else(|| legal_actions.first())
            .copied()
            .unwrap_or(Action::Draw)
    }
}
