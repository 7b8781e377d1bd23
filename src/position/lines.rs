//! The line cache: live stone counts and lazily rebuilt legal-move caches
//! for the four line families of the board.
//!
//! Every cell lies on exactly one line of each family. A line's stone count
//! is the travel distance for any move along it, so the counts are kept
//! exact at all times, while the per-line move caches are only rebuilt when
//! a scan finds them invalidated.

use arrayvec::ArrayVec;

use crate::position::mv::{slide_target, Move, MoveInfo};
use crate::position::utils::{AbstractBoard, Cell, Direction, Square};

/// The four ways of partitioning the board into lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineFamily {
    /// Horizontal lines, one per rank.
    Rank,
    /// Vertical lines, one per file.
    File,
    /// Diagonals of constant `file - rank`, travelled north-east/south-west.
    Rising,
    /// Diagonals of constant `file + rank`, travelled south-east/north-west.
    Falling,
}

impl LineFamily {
    pub const ALL: [LineFamily; 4] = [
        LineFamily::Rank,
        LineFamily::File,
        LineFamily::Rising,
        LineFamily::Falling,
    ];

    /// The family a direction travels along.
    pub fn of_direction(direction: Direction) -> LineFamily {
        let (dx, dy) = direction.deltas();
        if dy == 0 {
            LineFamily::Rank
        } else if dx == 0 {
            LineFamily::File
        } else if dx == dy {
            LineFamily::Rising
        } else {
            LineFamily::Falling
        }
    }

    /// Number of lines in this family on an SxS board.
    pub const fn num_lines<const S: usize>(self) -> usize {
        match self {
            LineFamily::Rank | LineFamily::File => S,
            LineFamily::Rising | LineFamily::Falling => 2 * S - 1,
        }
    }

    /// The two directions running along lines of this family.
    pub const fn directions(self) -> [Direction; 2] {
        match self {
            LineFamily::Rank => [Direction::East, Direction::West],
            LineFamily::File => [Direction::North, Direction::South],
            LineFamily::Rising => [Direction::NorthEast, Direction::SouthWest],
            LineFamily::Falling => [Direction::SouthEast, Direction::NorthWest],
        }
    }
}

/// Identity of a single line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LineId {
    pub family: LineFamily,
    pub index: u8,
}

impl LineId {
    /// The line of `family` through `square`.
    pub fn through<const S: usize>(family: LineFamily, square: Square<S>) -> LineId {
        let index = match family {
            LineFamily::Rank => square.rank(),
            LineFamily::File => square.file(),
            LineFamily::Rising => square.file() + (S as u8 - 1) - square.rank(),
            LineFamily::Falling => square.file() + square.rank(),
        };
        LineId { family, index }
    }

    /// The single-cell diagonals at the board corners. They can never hold a
    /// legal move, since any travel along them leaves the board.
    pub fn is_boundary_diagonal<const S: usize>(self) -> bool {
        match self.family {
            LineFamily::Rank | LineFamily::File => false,
            LineFamily::Rising | LineFamily::Falling => {
                self.index == 0 || self.index as usize == 2 * S - 2
            }
        }
    }

    /// All squares of this line, in file order.
    pub fn squares<const S: usize>(self) -> ArrayVec<Square<S>, 16> {
        let mut squares = ArrayVec::new();
        match self.family {
            LineFamily::Rank => {
                for file in 0..S as u8 {
                    squares.push(Square::from_file_rank(file, self.index));
                }
            }
            LineFamily::File => {
                for rank in 0..S as u8 {
                    squares.push(Square::from_file_rank(self.index, rank));
                }
            }
            LineFamily::Rising => {
                // file - rank = index - (S - 1)
                let diff = self.index as i16 - (S as i16 - 1);
                for file in 0..S as i16 {
                    let rank = file - diff;
                    if (0..S as i16).contains(&rank) {
                        squares.push(Square::from_file_rank(file as u8, rank as u8));
                    }
                }
            }
            LineFamily::Falling => {
                // file + rank = index
                for file in 0..S as i16 {
                    let rank = self.index as i16 - file;
                    if (0..S as i16).contains(&rank) {
                        squares.push(Square::from_file_rank(file as u8, rank as u8));
                    }
                }
            }
        }
        squares
    }
}

/// One line's live stone count and cached legal moves.
#[derive(Clone, Debug, Default)]
pub(crate) struct Line<const S: usize> {
    pub(crate) count: u8,
    valid: bool,
    moves: Vec<(Move<S>, MoveInfo)>,
}

/// The four line partitions of the board, with per-line and board-wide
/// cache validity flags.
#[derive(Clone, Debug)]
pub(crate) struct LineCache<const S: usize> {
    ranks: Box<[Line<S>]>,
    files: Box<[Line<S>]>,
    rising: Box<[Line<S>]>,
    falling: Box<[Line<S>]>,
    all_valid: bool,
}

impl<const S: usize> LineCache<S> {
    pub fn new() -> Self {
        let lines = |n: usize| (0..n).map(|_| Line::default()).collect();
        LineCache {
            ranks: lines(S),
            files: lines(S),
            rising: lines(2 * S - 1),
            falling: lines(2 * S - 1),
            all_valid: false,
        }
    }

    /// Zero all counts and drop all cached moves, keeping allocations.
    pub fn reset(&mut self) {
        for line in self.lines_mut() {
            line.count = 0;
            line.valid = false;
            line.moves.clear();
        }
        self.all_valid = false;
    }

    fn family(&self, family: LineFamily) -> &[Line<S>] {
        match family {
            LineFamily::Rank => &self.ranks,
            LineFamily::File => &self.files,
            LineFamily::Rising => &self.rising,
            LineFamily::Falling => &self.falling,
        }
    }

    fn family_mut(&mut self, family: LineFamily) -> &mut [Line<S>] {
        match family {
            LineFamily::Rank => &mut self.ranks,
            LineFamily::File => &mut self.files,
            LineFamily::Rising => &mut self.rising,
            LineFamily::Falling => &mut self.falling,
        }
    }

    fn lines_mut(&mut self) -> impl Iterator<Item = &mut Line<S>> {
        self.ranks
            .iter_mut()
            .chain(self.files.iter_mut())
            .chain(self.rising.iter_mut())
            .chain(self.falling.iter_mut())
    }

    /// Stone count of the line through `square` along `direction`.
    pub fn count(&self, square: Square<S>, direction: Direction) -> u8 {
        let family = LineFamily::of_direction(direction);
        let id = LineId::through::<S>(family, square);
        self.family(family)[id.index as usize].count
    }

    pub fn stone_added(&mut self, square: Square<S>) {
        self.touch(square, 1);
    }

    pub fn stone_removed(&mut self, square: Square<S>) {
        self.touch(square, -1);
    }

    /// Cell contents changed without a count change (a blocked square
    /// appearing or disappearing). Invalidates caches only.
    pub fn cell_changed(&mut self, square: Square<S>) {
        self.touch(square, 0);
    }

    fn touch(&mut self, square: Square<S>, count_delta: i8) {
        for family in LineFamily::ALL {
            let id = LineId::through::<S>(family, square);
            let line = &mut self.family_mut(family)[id.index as usize];
            line.count = (line.count as i8 + count_delta) as u8;
            line.valid = false;
        }
        self.all_valid = false;
    }

    /// Sum of stone counts over one family. Equal to the number of stones on
    /// the board for every family; checked by the test suite.
    pub fn family_total(&self, family: LineFamily) -> u32 {
        self.family(family)
            .iter()
            .map(|line| line.count as u32)
            .sum()
    }

    /// Rebuild every invalidated line's move cache from the grid.
    pub fn rebuild(&mut self, cells: &AbstractBoard<Cell, S>) {
        if self.all_valid {
            return;
        }
        for family in LineFamily::ALL {
            for index in 0..family.num_lines::<S>() {
                let id = LineId {
                    family,
                    index: index as u8,
                };
                let line = &mut self.family_mut(family)[index];
                if line.valid {
                    continue;
                }
                line.moves.clear();
                if !id.is_boundary_diagonal::<S>() && line.count > 0 {
                    let distance = line.count;
                    for square in id.squares::<S>() {
                        let color = match cells[square] {
                            Cell::Stone(color) => color,
                            _ => continue,
                        };
                        for direction in family.directions() {
                            if let Ok((_, capture)) =
                                slide_target(cells, square, direction, distance, color)
                            {
                                line.moves.push((
                                    Move::Slide {
                                        from: square,
                                        direction,
                                        distance,
                                    },
                                    MoveInfo { color, capture },
                                ));
                            }
                        }
                    }
                }
                line.valid = true;
            }
        }
        self.all_valid = true;
    }

    /// Feed every cached move to `visit`. Only meaningful after `rebuild`.
    pub fn visit_all<F>(&self, mut visit: F)
    where
        F: FnMut(LineId, Move<S>, MoveInfo),
    {
        debug_assert!(self.all_valid);
        for family in LineFamily::ALL {
            for (index, line) in self.family(family).iter().enumerate() {
                let id = LineId {
                    family,
                    index: index as u8,
                };
                for (mv, info) in &line.moves {
                    visit(id, *mv, *info);
                }
            }
        }
    }
}
