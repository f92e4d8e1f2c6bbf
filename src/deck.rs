use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::card::{Card, full_deck};

/// What happens to the discard pile when the draw pile runs dry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Recycle {
    /// Shuffle everything but the active card back into the draw pile.
    Reshuffle,
    /// Discarded cards never return; an empty draw pile means the universe is exhausted.
    Retain,
}

/// Draw pile plus discard pile. The last element of each vector is its top card.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
    discard: Vec<Card>,
}

impl Deck {
    /// Fresh shuffled card set.
    pub fn new<R: Rng + ?Sized>(extra_cards: bool, rng: &mut R) -> Self {
        let mut cards = full_deck(extra_cards);
        cards.shuffle(rng);
        Self::from_cards(cards)
    }

    /// Deck in the given order; cards are drawn from the end.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self {
            cards,
            discard: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard
    }

    /// The active card on the discard pile.
    pub fn top(&self) -> Option<Card> {
        self.discard.last().copied()
    }

    pub fn push_discard(&mut self, card: Card) {
        self.discard.push(card);
    }

    /// Slips `card` just under the top of the discard pile.
    pub fn bury_discard(&mut self, card: Card) {
        let at = self.discard.len().saturating_sub(1);
        self.discard.insert(at, card);
    }

    /// Peeks `n` cards for dealer selection; pair with [`Deck::putback`].
    pub fn draw_numbered(&mut self, n: usize) -> Vec<Card> {
        let take = n.min(self.cards.len());
        let mut drawn = self.cards.split_off(self.cards.len() - take);
        drawn.reverse();
        drawn
    }

    /// Returns peeked cards underneath the draw pile, preserving their order.
    pub fn putback(&mut self, cards: Vec<Card>) {
        let mut rebuilt = cards;
        rebuilt.reverse();
        rebuilt.append(&mut self.cards);
        self.cards = rebuilt;
    }

    /// Draws up to `n` non-wild cards, searching from the top.
    pub fn draw_colored(&mut self, n: usize) -> Vec<Card> {
        let mut drawn = Vec::with_capacity(n);
        while drawn.len() < n {
            let Some(pos) = self.cards.iter().rposition(|card| !card.is_wild()) else {
                break;
            };
            drawn.push(self.cards.remove(pos));
        }
        drawn
    }

    /// Draws `n` cards, recycling the discard pile per `recycle` when the draw pile is short.
    ///
    /// A result shorter than `n` means every remaining card is held by a player or retained
    /// on the discard pile.
    pub fn draw<R: Rng + ?Sized>(&mut self, n: usize, recycle: Recycle, rng: &mut R) -> Vec<Card> {
        let mut drawn = Vec::with_capacity(n);
        while drawn.len() < n {
            match self.cards.pop() {
                Some(card) => drawn.push(card),
                None => {
                    if !self.refill(recycle, rng) {
                        break;
                    }
                }
            }
        }
        drawn
    }

    fn refill<R: Rng + ?Sized>(&mut self, recycle: Recycle, rng: &mut R) -> bool {
        if recycle == Recycle::Retain || self.discard.len() <= 1 {
            return false;
        }
        let top = self.discard.pop();
        let mut recycled = std::mem::take(&mut self.discard);
        recycled.shuffle(rng);
        debug!(cards = recycled.len(), "reshuffling discard pile");
        self.cards.append(&mut recycled);
        self.discard.extend(top);
        true
    }
}
