use serde::{Deserialize, Serialize};

use crate::card::{Color, Value};

/// Zero-based seat index.
pub type PlayerId = usize;

/// What a zero card does to the shared damage pool.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ZeroChoice {
    /// Add ten to the pool.
    Bank,
    /// Empty the pool.
    Detonate,
}

/// Decision attached to a play. Which variant is required depends on the card.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PlayChoice {
    /// Coloured non-zero cards, and zeros in Traditional mode.
    None,
    /// Next colour for a wild card (the chaos value is always drawn at random).
    Color(Color),
    /// Next colour plus the seat to swap hands with.
    Trade { color: Color, target: PlayerId },
    /// Zero card outside Traditional mode.
    Zero(ZeroChoice),
}

/// Action available to the acting seat.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Play a card from the hand.
    Play { hand_index: usize, choice: PlayChoice },
    /// No legal card: take the damage pool (outside Traditional) and draw one card.
    Draw,
    /// Resolve the pending penalty card.
    AcceptPenalty,
}

/// Resolved effect of a play, reported with every card-play notification.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PlayOutcome {
    /// Ordinary play with no extra payload.
    Matched,
    /// First card turned over at the start of a round.
    Opening,
    Zero(ZeroChoice),
    /// `countered` is set when the reverse cancelled a pending penalty.
    Reverse { countered: bool },
    /// A skip that cancelled a pending penalty.
    Countered,
    /// A draw card stacked onto a pending penalty.
    Chained { pool: usize },
    Wild { color: Color },
    Chaos { color: Color, value: Value },
    /// `target` is `None` when nobody was available to trade with.
    Trade { color: Color, target: Option<PlayerId> },
    DiscardAll { color: Color, swept: usize },
    HitAll { color: Color },
    /// Card removed by a discard-all sweep; notified after a stagger.
    Swept,
    /// The play emptied the hand.
    HandEmptied,
}
