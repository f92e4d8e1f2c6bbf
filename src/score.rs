//! Round settlement and standings.
//!
//! Traditional: every player adds the point value of the cards left in their own hand, so
//! the lowest total leads. Battle-Puno and Death-Match: hand points come off hp (floored at
//! zero) and whatever hp survives is added to the score, so the highest total leads.

use crate::action::PlayerId;
use crate::player::Player;
use crate::policy::Scoring;

/// Apply end-of-round scoring to every seat.
pub fn settle_round(scoring: Scoring, players: &mut [Player]) {
    for player in players.iter_mut() {
        let points = player.cards_point_sum();
        match scoring {
            Scoring::HandPoints => player.score += points,
            Scoring::SurvivingHp => {
                player.hp = player.hp.saturating_sub(points);
                player.score += player.hp;
            }
        }
    }
}

/// Seats ordered best first; ties keep seat order.
pub fn standings(scoring: Scoring, players: &[Player]) -> Vec<PlayerId> {
    let mut order: Vec<PlayerId> = (0..players.len()).collect();
    match scoring {
        Scoring::HandPoints => order.sort_by_key(|&id| players[id].score),
        Scoring::SurvivingHp => order.sort_by_key(|&id| std::cmp::Reverse(players[id].score)),
    }
    order
}
