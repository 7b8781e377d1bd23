//! Incremental Euler-number accounting over 2x2 neighbourhood patterns.
//!
//! Each color keeps running counts of the 2x2 blocks that contain 1, 2, 3 or
//! 4 of its stones, with blocks holding exactly two diagonally opposite
//! stones counted separately. The Euler number `(q1 - q3 - 2*qd) / 4`
//! approximates (connected components - holes) of the stone pattern and is
//! maintained in O(1) per stone change by reclassifying only the four blocks
//! incident to the changed cell.

use crate::position::utils::{AbstractBoard, Cell, Square};
use board_game_traits::Color;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuadCounts {
    q1: i32,
    q2: i32,
    q3: i32,
    q4: i32,
    qd: i32,
}

impl QuadCounts {
    /// Euler number of the current pattern.
    ///
    /// The numerator is divisible by 4 for every reachable pattern; a
    /// remainder means the incremental accounting has gone wrong.
    pub fn euler(&self) -> i32 {
        let numerator = self.q1 - self.q3 - 2 * self.qd;
        debug_assert_eq!(
            numerator.rem_euclid(4),
            0,
            "quad accounting out of balance: {:?}",
            self
        );
        numerator / 4
    }

    /// Reclassify the four blocks around `(x, y)` for one stone of `color`
    /// appearing (`adding`) or disappearing at that cell.
    ///
    /// `occupied` must answer for the three non-center cells of each block,
    /// with off-board coordinates reading as unoccupied. The changed cell
    /// itself is never queried.
    pub(crate) fn toggle<F>(&mut self, occupied: F, x: i16, y: i16, adding: bool)
    where
        F: Fn(i16, i16) -> bool,
    {
        let delta = if adding { 1 } else { -1 };
        for (qx, qy) in [(x - 1, y - 1), (x, y - 1), (x - 1, y), (x, y)] {
            let horizontal = occupied(2 * qx + 1 - x, y);
            let vertical = occupied(x, 2 * qy + 1 - y);
            let diagonal = occupied(2 * qx + 1 - x, 2 * qy + 1 - y);

            match horizontal as u8 + vertical as u8 + diagonal as u8 {
                0 => self.q1 += delta,
                1 => {
                    self.q1 -= delta;
                    if diagonal {
                        self.qd += delta;
                    } else {
                        self.q2 += delta;
                    }
                }
                2 => {
                    if horizontal && vertical {
                        self.qd -= delta;
                    } else {
                        self.q2 -= delta;
                    }
                    self.q3 += delta;
                }
                3 => {
                    self.q3 -= delta;
                    self.q4 += delta;
                }
                _ => unreachable!(),
            }
        }
    }

    /// Classify every 2x2 block of the board from scratch. Only used to
    /// cross-check the incremental counts.
    pub fn from_scratch<const S: usize>(cells: &AbstractBoard<Cell, S>, color: Color) -> Self {
        let occupied = |x: i16, y: i16| {
            (0..S as i16).contains(&x)
                && (0..S as i16).contains(&y)
                && cells[Square::from_file_rank(x as u8, y as u8)].is_stone_of(color)
        };

        let mut counts = QuadCounts::default();
        for qy in -1..S as i16 {
            for qx in -1..S as i16 {
                let a = occupied(qx, qy);
                let b = occupied(qx + 1, qy);
                let c = occupied(qx, qy + 1);
                let d = occupied(qx + 1, qy + 1);
                match a as u8 + b as u8 + c as u8 + d as u8 {
                    0 => (),
                    1 => counts.q1 += 1,
                    2 => {
                        if (a && d) || (b && c) {
                            counts.qd += 1;
                        } else {
                            counts.q2 += 1;
                        }
                    }
                    3 => counts.q3 += 1,
                    4 => counts.q4 += 1,
                    _ => unreachable!(),
                }
            }
        }
        counts
    }
}
