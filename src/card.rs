use std::fmt;

use serde::{Deserialize, Serialize};

/// Card colour. `Wild` only ever appears on cards, never as the active colour.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Yellow,
    Green,
    Blue,
    Wild,
}

/// The four colours a wild card can resolve to.
pub const PLAYABLE_COLORS: [Color; 4] = [Color::Red, Color::Yellow, Color::Green, Color::Blue];

impl Color {
    /// Index into [`PLAYABLE_COLORS`]; `None` for `Wild`.
    pub fn index(self) -> Option<u8> {
        PLAYABLE_COLORS
            .iter()
            .position(|color| *color == self)
            .map(|idx| idx as u8)
    }

    pub fn from_index(index: u8) -> Option<Color> {
        PLAYABLE_COLORS.get(index as usize).copied()
    }
}

/// Card face value. Ordering follows declaration order and is what dealer selection compares.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Value {
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Skip,
    Reverse,
    DrawTwo,
    WildDrawFour,
    WildChaos,
    Trade,
    DiscardAll,
    WildHitAll,
}

pub const NUMBERED_VALUES: [Value; 10] = [
    Value::Zero,
    Value::One,
    Value::Two,
    Value::Three,
    Value::Four,
    Value::Five,
    Value::Six,
    Value::Seven,
    Value::Eight,
    Value::Nine,
];

impl Value {
    /// Face value for `Zero..=Nine`.
    pub fn face(self) -> Option<u8> {
        NUMBERED_VALUES
            .iter()
            .position(|value| *value == self)
            .map(|idx| idx as u8)
    }

    pub fn from_face(face: u8) -> Option<Value> {
        NUMBERED_VALUES.get(face as usize).copied()
    }
}

/// Number of seats at the table.
pub const PLAYER_COUNT: usize = 4;
pub const BASE_DECK_SIZE: usize = 104;
pub const FULL_DECK_SIZE: usize = 108;
pub const ACTION_POINTS: u32 = 20;
pub const WILD_POINTS: u32 = 50;

/// Immutable playing card.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub color: Color,
    pub value: Value,
}

impl Card {
    pub const fn new(color: Color, value: Value) -> Self {
        Self { color, value }
    }

    #[inline]
    pub fn is_numbered(&self) -> bool {
        self.value.face().is_some()
    }

    #[inline]
    pub fn is_wild(&self) -> bool {
        self.color == Color::Wild
    }

    /// Skip, draw two and wild draw four obligate the next player.
    #[inline]
    pub fn is_penalty(&self) -> bool {
        matches!(self.value, Value::Skip | Value::DrawTwo | Value::WildDrawFour)
    }

    /// Cards added to the penalty pool when this card is played.
    #[inline]
    pub fn penalty_draw(&self) -> usize {
        match self.value {
            Value::DrawTwo => 2,
            Value::WildDrawFour => 4,
            _ => 0,
        }
    }

    /// Plain matching rule: same colour, same value, or any wild card.
    #[inline]
    pub fn matches(&self, color: Color, value: Value) -> bool {
        self.is_wild() || self.color == color || self.value == value
    }

    /// Hand value used by round scoring.
    pub fn points(&self) -> u32 {
        match self.value.face() {
            Some(face) => face as u32,
            None if self.is_wild() => WILD_POINTS,
            None => ACTION_POINTS,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = match self.color {
            Color::Red => "R",
            Color::Yellow => "Y",
            Color::Green => "G",
            Color::Blue => "B",
            Color::Wild => "W",
        };
        match self.value.face() {
            Some(face) => write!(f, "{color}{face}"),
            None => {
                let label = match self.value {
                    Value::Skip => "Skip",
                    Value::Reverse => "Rev",
                    Value::DrawTwo => "+2",
                    Value::WildDrawFour => "+4",
                    Value::WildChaos => "Chaos",
                    Value::Trade => "Trade",
                    Value::DiscardAll => "DiscardAll",
                    Value::WildHitAll => "HitAll",
                    _ => "?",
                };
                write!(f, "{color}:{label}")
            }
        }
    }
}

/// Builds the full card set in deterministic order (unshuffled).
pub fn full_deck(extra_cards: bool) -> Vec<Card> {
    let mut deck = Vec::with_capacity(FULL_DECK_SIZE);
    for color in PLAYABLE_COLORS {
        deck.push(Card::new(color, Value::Zero));
        for value in &NUMBERED_VALUES[1..] {
            deck.push(Card::new(color, *value));
            deck.push(Card::new(color, *value));
        }
        for value in [Value::Skip, Value::Reverse, Value::DrawTwo] {
            deck.push(Card::new(color, value));
            deck.push(Card::new(color, value));
        }
    }
    deck.extend(std::iter::repeat(Card::new(Color::Wild, Value::WildDrawFour)).take(4));
    if extra_cards {
        for value in [
            Value::WildChaos,
            Value::Trade,
            Value::DiscardAll,
            Value::WildHitAll,
        ] {
            deck.push(Card::new(Color::Wild, value));
        }
    }
    deck
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_sizes() {
        assert_eq!(full_deck(true).len(), FULL_DECK_SIZE);
        assert_eq!(full_deck(false).len(), BASE_DECK_SIZE);
    }

    #[test]
    fn derived_classification() {
        let red_five = Card::new(Color::Red, Value::Five);
        assert!(red_five.is_numbered());
        assert!(!red_five.is_penalty());
        assert_eq!(red_five.points(), 5);

        let skip = Card::new(Color::Blue, Value::Skip);
        assert!(!skip.is_numbered());
        assert!(skip.is_penalty());
        assert_eq!(skip.penalty_draw(), 0);
        assert_eq!(skip.points(), ACTION_POINTS);

        let draw_four = Card::new(Color::Wild, Value::WildDrawFour);
        assert!(draw_four.is_penalty());
        assert_eq!(draw_four.penalty_draw(), 4);
        assert_eq!(draw_four.points(), WILD_POINTS);
    }

    #[test]
    fn matching_rule() {
        let card = Card::new(Color::Green, Value::Seven);
        assert!(card.matches(Color::Green, Value::Two));
        assert!(card.matches(Color::Red, Value::Seven));
        assert!(!card.matches(Color::Red, Value::Two));
        assert!(Card::new(Color::Wild, Value::Trade).matches(Color::Red, Value::Two));
    }

    #[test]
    fn face_round_trip_covers_numbers_only() {
        assert_eq!(Value::from_face(9), Some(Value::Nine));
        assert_eq!(Value::from_face(10), None);
        assert_eq!(Value::Skip.face(), None);
        assert_eq!(Color::Wild.index(), None);
        assert_eq!(Color::from_index(3), Some(Color::Blue));
    }
}
