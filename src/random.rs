use rand::Rng;

use crate::card::{Color, Value};

/// Uniform pick in `low..=high`, rejecting `filter`.
///
/// Callers must leave at least one admissible value in the range.
pub fn pick_excluding<R: Rng + ?Sized>(rng: &mut R, low: u8, high: u8, filter: Option<u8>) -> u8 {
    debug_assert!(low <= high);
    debug_assert!(filter.is_none() || low < high);
    loop {
        let value = rng.gen_range(low..=high);
        if Some(value) != filter {
            return value;
        }
    }
}

/// Random playable colour different from `current`.
pub fn pick_color<R: Rng + ?Sized>(rng: &mut R, current: Color) -> Color {
    let index = pick_excluding(rng, 0, 3, current.index());
    Color::from_index(index).unwrap_or(Color::Red)
}

/// Random numbered value for a chaos card.
pub fn pick_face<R: Rng + ?Sized>(rng: &mut R) -> Value {
    Value::from_face(pick_excluding(rng, 0, 9, None)).unwrap_or(Value::Zero)
}
