//! Static position evaluation for search drivers.
//!
//! Scores are from White's perspective. The heavy lifting is done by the
//! incrementally maintained quad/Euler feature: a color whose stones fall
//! into fewer pieces is closer to winning. Exact group sizes are
//! deliberately not read here, since they need a mutable walk; search
//! drivers wanting them call `Position::seed_group_size` on their own clone.

use board_game_traits::{Color, EvalPosition, Position as PositionTrait};

use crate::position::{Position, Square};

const EULER_WEIGHT: f32 = 0.6;
const CENTER_WEIGHT: f32 = 0.08;
const STONE_WEIGHT: f32 = 0.02;

pub(crate) fn static_eval<const S: usize>(position: &Position<S>) -> f32 {
    let mut eval = 0.0;
    for color in [Color::White, Color::Black] {
        let sign = match color {
            Color::White => 1.0,
            Color::Black => -1.0,
        };
        let player = position.player(color);
        // One connected, hole-free group has Euler number 1
        eval -= sign * EULER_WEIGHT * (player.euler() as f32 - 1.0);
        for &square in player.stones() {
            eval += sign * CENTER_WEIGHT * centrality::<S>(square);
        }
        eval += sign * STONE_WEIGHT * player.stone_count() as f32;
    }
    eval
}

/// 1.0 at the board center, 0.0 on the edge ring.
fn centrality<const S: usize>(square: Square<S>) -> f32 {
    let half = (S as f32 - 1.0) / 2.0;
    let dx = (square.file() as f32 - half).abs();
    let dy = (square.rank() as f32 - half).abs();
    (half - dx.max(dy)) / half
}

impl<const S: usize> EvalPosition for Position<S> {
    fn static_eval(&self) -> f32 {
        debug_assert!(self.game_result().is_none());
        static_eval(self)
    }
}
