use serde::{Deserialize, Serialize};

use crate::card::{Card, Color, Value};

/// Per-seat state. Knockout and the damage stack are owned by the game engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub(crate) name: String,
    pub(crate) hp: u32,
    pub(crate) score: u32,
    pub(crate) hand: Vec<Card>,
    pub(crate) knocked_out: bool,
    pub(crate) ai: bool,
    pub(crate) uno: bool,
    pub(crate) damage_stack: u32,
}

impl Player {
    pub fn new(name: impl Into<String>, hp: u32, ai: bool) -> Self {
        Self {
            name: name.into(),
            hp,
            score: 0,
            hand: Vec::new(),
            knocked_out: false,
            ai,
            uno: false,
            damage_stack: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn is_knocked_out(&self) -> bool {
        self.knocked_out
    }

    pub fn is_ai(&self) -> bool {
        self.ai
    }

    pub fn called_uno(&self) -> bool {
        self.uno
    }

    pub fn damage_stack(&self) -> u32 {
        self.damage_stack
    }

    /// True once the hand is empty.
    pub fn is_going_out(&self) -> bool {
        self.hand.is_empty()
    }

    /// Clears per-round state. Score carries over between rounds.
    pub(crate) fn reset(&mut self, hp: u32) {
        self.hp = hp;
        self.hand.clear();
        self.knocked_out = false;
        self.uno = false;
        self.damage_stack = 0;
    }

    pub fn deal(&mut self, cards: &[Card]) {
        self.hand.extend_from_slice(cards);
        if self.hand.len() > 1 {
            self.uno = false;
        }
    }

    /// Removes the card at `index`; callers guarantee the index is valid.
    pub fn discard(&mut self, index: usize) -> Card {
        self.hand.remove(index)
    }

    /// Removes every card of `color`, returning them in hand order.
    pub fn discard_all_by_color(&mut self, color: Color) -> Vec<Card> {
        let (swept, kept): (Vec<Card>, Vec<Card>) =
            self.hand.iter().partition(|card| card.color == color);
        self.hand = kept;
        swept
    }

    /// Index of the first card playable on `color`/`value`.
    pub fn matching(&self, color: Color, value: Value) -> Option<usize> {
        self.hand.iter().position(|card| card.matches(color, value))
    }

    /// Index of a same-colour skip or reverse that cancels a pending penalty.
    pub fn receive_penalty(&self, color: Color) -> Option<usize> {
        self.hand.iter().position(|card| {
            card.color == color && matches!(card.value, Value::Skip | Value::Reverse)
        })
    }

    pub fn find_all_cards_by_color(&self, color: Color) -> Vec<usize> {
        self.hand
            .iter()
            .enumerate()
            .filter(|(_, card)| card.color == color)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn cards_point_sum(&self) -> u32 {
        self.hand.iter().map(Card::points).sum()
    }

    pub(crate) fn uno(&mut self) {
        self.uno = true;
        tracing::info!(player = %self.name, "uno");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand() -> Vec<Card> {
        vec![
            Card::new(Color::Red, Value::Three),
            Card::new(Color::Blue, Value::Skip),
            Card::new(Color::Red, Value::Reverse),
            Card::new(Color::Wild, Value::WildDrawFour),
        ]
    }

    #[test]
    fn matching_returns_first_playable() {
        let mut player = Player::new("p", 10, true);
        player.deal(&hand());
        assert_eq!(player.matching(Color::Red, Value::Nine), Some(0));
        assert_eq!(player.matching(Color::Green, Value::Skip), Some(1));
        assert_eq!(player.matching(Color::Green, Value::One), Some(3));
    }

    #[test]
    fn penalty_avoidance_needs_same_colour() {
        let mut player = Player::new("p", 10, true);
        player.deal(&hand());
        assert_eq!(player.receive_penalty(Color::Red), Some(2));
        assert_eq!(player.receive_penalty(Color::Blue), Some(1));
        assert_eq!(player.receive_penalty(Color::Green), None);
    }

    #[test]
    fn point_sum_and_colour_queries() {
        let mut player = Player::new("p", 10, true);
        player.deal(&hand());
        assert_eq!(player.cards_point_sum(), 3 + 20 + 20 + 50);
        assert_eq!(player.find_all_cards_by_color(Color::Red), vec![0, 2]);
        let swept = player.discard_all_by_color(Color::Red);
        assert_eq!(swept.len(), 2);
        assert_eq!(player.hand().len(), 2);
    }

    #[test]
    fn uno_flag_clears_when_hand_grows() {
        let mut player = Player::new("p", 10, true);
        player.deal(&hand()[..1]);
        player.uno();
        assert!(player.called_uno());
        player.deal(&hand()[1..2]);
        assert!(!player.called_uno());
    }
}
