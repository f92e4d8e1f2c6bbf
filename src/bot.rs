use crate::action::Action;
use crate::state::GameStateView;

/// Decision maker for a seat the engine is waiting on.
pub trait Bot {
    fn select_action(&mut self, state: &GameStateView, legal_actions: &[Action]) -> Action;
}
