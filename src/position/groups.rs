//! Exact connectivity tests over 8-neighbour adjacency.
//!
//! The walk marks visited cells with a monotonically increasing epoch stamp,
//! so no per-call clearing is needed, and swaps every discovered stone into
//! the counted prefix of its color's stone list. The walk has covered one
//! whole group exactly when the cursor catches up with the counted prefix.

use board_game_traits::Color;

use crate::position::Position;

impl<const S: usize> Position<S> {
    /// Number of stones 8-connected to the first stone of `color`'s list.
    ///
    /// Also the group-size primitive used by evaluation: after the call, the
    /// stones of the seed group occupy the front of the color's stone list.
    pub fn seed_group_size(&mut self, color: Color) -> usize {
        let stones_total = self.players[color.disc()].stones.len();
        if stones_total == 0 {
            return 0;
        }
        self.sweep_epoch += 1;
        let epoch = self.sweep_epoch;
        let seed = self.players[color.disc()].stones[0];
        self.sweep[seed] = epoch;

        let mut counted = 1;
        let mut cursor = 0;
        while cursor < counted {
            let square = self.players[color.disc()].stones[cursor];
            for neighbor in square.neighbors() {
                if self.cells[neighbor].is_stone_of(color) && self.sweep[neighbor] != epoch {
                    self.sweep[neighbor] = epoch;
                    let index = self.list_index[neighbor] as usize;
                    // Unstamped stones always live past the counted prefix
                    debug_assert!(index >= counted);
                    let stones = &mut self.players[color.disc()].stones;
                    stones.swap(counted, index);
                    self.list_index[stones[index]] = index as u8;
                    self.list_index[stones[counted]] = counted as u8;
                    counted += 1;
                }
            }
            cursor += 1;
        }
        counted
    }

    /// Whether all of `color`'s stones form a single 8-connected group, the
    /// game-ending condition. A color with no stones counts as connected.
    pub fn exactly_one_group(&mut self, color: Color) -> bool {
        let stones_total = self.players[color.disc()].stones.len();
        stones_total == 0 || self.seed_group_size(color) == stones_total
    }
}
