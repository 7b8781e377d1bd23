use std::ops::{Index, IndexMut};
use std::{array, fmt, mem};

use board_game_traits::Color;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::position::utils::Direction::*;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(remote = "Color"))]
pub enum ColorDef {
    White,
    Black,
}

/// The contents of a single board cell.
///
/// `Blocked` cells carry no stone and can never be entered or crossed. They
/// only appear in variants where a move scars the origin square.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Cell {
    #[default]
    Empty,
    Stone(#[cfg_attr(feature = "serde", serde(with = "ColorDef"))] Color),
    Blocked,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn is_stone(self) -> bool {
        matches!(self, Cell::Stone(_))
    }

    pub fn stone_color(self) -> Option<Color> {
        match self {
            Cell::Stone(color) => Some(color),
            _ => None,
        }
    }

    pub fn is_stone_of(self, color: Color) -> bool {
        self == Cell::Stone(color)
    }
}

/// A location on the board. Can be used to index a `Position`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square<const S: usize> {
    inner: u8,
}

impl<const S: usize> Square<S> {
    pub const fn from_u8(inner: u8) -> Self {
        assert!((inner as usize) < S * S);
        Square { inner }
    }

    pub const fn into_inner(self) -> u8 {
        self.inner
    }

    pub const fn from_file_rank(file: u8, rank: u8) -> Self {
        assert!(file < S as u8 && rank < S as u8);
        Square {
            inner: rank * S as u8 + file,
        }
    }

    /// Zero-based column, counted from the `A` file.
    pub const fn file(self) -> u8 {
        self.inner % S as u8
    }

    /// Zero-based row, counted from the bottom of the board.
    pub const fn rank(self) -> u8 {
        self.inner / S as u8
    }

    pub fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        let file = self.file() as i16 + dx as i16;
        let rank = self.rank() as i16 + dy as i16;
        if (0..S as i16).contains(&file) && (0..S as i16).contains(&rank) {
            Some(Square::from_file_rank(file as u8, rank as u8))
        } else {
            None
        }
    }

    pub fn go_direction(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.deltas();
        self.offset(dx, dy)
    }

    pub fn jump_direction(self, direction: Direction, len: u8) -> Option<Self> {
        let (dx, dy) = direction.deltas();
        let file = self.file() as i16 + dx as i16 * len as i16;
        let rank = self.rank() as i16 + dy as i16 * len as i16;
        if (0..S as i16).contains(&file) && (0..S as i16).contains(&rank) {
            Some(Square::from_file_rank(file as u8, rank as u8))
        } else {
            None
        }
    }

    /// All in-bounds 8-neighbours of this square.
    pub fn neighbors(self) -> impl Iterator<Item = Square<S>> {
        Direction::ALL
            .iter()
            .filter_map(move |direction| self.go_direction(*direction))
    }

    pub fn downcast_size<const N: usize>(self) -> Square<N> {
        if S == N {
            unsafe { mem::transmute(self) }
        } else {
            panic!("Tried to use {}s square as {}s square", S, N)
        }
    }

    pub fn parse_cell(input: &str) -> Result<Square<S>, pgn_traits::Error> {
        let mut chars = input.chars();
        let file_char = chars.next().ok_or_else(|| {
            pgn_traits::Error::new_parse_error(format!("Couldn't parse empty cell \"{}\"", input))
        })?;
        if !file_char.is_ascii_alphabetic() {
            return Err(pgn_traits::Error::new_parse_error(format!(
                "Couldn't parse cell \"{}\"",
                input
            )));
        }
        let file = (file_char.to_ascii_uppercase() as u8).wrapping_sub(b'A');
        let rank: u8 = chars.as_str().parse::<u8>().map_err(|_| {
            pgn_traits::Error::new_parse_error(format!("Couldn't parse cell \"{}\"", input))
        })?;
        if file >= S as u8 || rank == 0 || rank > S as u8 {
            Err(pgn_traits::Error::new_parse_error(format!(
                "Cell \"{}\" is outside the {}x{} board",
                input, S, S
            )))
        } else {
            Ok(Square::from_file_rank(file, rank - 1))
        }
    }
}

impl<const S: usize> fmt::Display for Square<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (self.file() + b'A') as char, self.rank() + 1)
    }
}

/// Iterates over all board squares in scan order.
pub fn squares_iterator<const S: usize>() -> impl Iterator<Item = Square<S>> {
    (0..(S * S) as u8).map(|i| Square { inner: i })
}

/// One of the eight line directions on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        North, NorthEast, East, SouthEast, South, SouthWest, West, NorthWest,
    ];

    /// `(dx, dy)` with `dy` positive towards higher ranks.
    pub const fn deltas(self) -> (i8, i8) {
        match self {
            North => (0, 1),
            NorthEast => (1, 1),
            East => (1, 0),
            SouthEast => (1, -1),
            South => (0, -1),
            SouthWest => (-1, -1),
            West => (-1, 0),
            NorthWest => (-1, 1),
        }
    }

    pub const fn reverse(self) -> Direction {
        match self {
            North => South,
            NorthEast => SouthWest,
            East => West,
            SouthEast => NorthWest,
            South => North,
            SouthWest => NorthEast,
            West => East,
            NorthWest => SouthEast,
        }
    }

    /// Deltas that are not unit steps along one of the eight lines give `None`.
    pub fn from_deltas(dx: i8, dy: i8) -> Option<Direction> {
        match (dx, dy) {
            (0, 1) => Some(North),
            (1, 1) => Some(NorthEast),
            (1, 0) => Some(East),
            (1, -1) => Some(SouthEast),
            (0, -1) => Some(South),
            (-1, -1) => Some(SouthWest),
            (-1, 0) => Some(West),
            (-1, 1) => Some(NorthWest),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AbstractBoard<T, const S: usize> {
    pub(crate) raw: [[T; S]; S],
}

impl<T: Copy, const S: usize> AbstractBoard<T, S> {
    pub fn new_from_fn<F>(mut f: F) -> Self
    where
        F: FnMut() -> T,
    {
        AbstractBoard {
            raw: array::from_fn(|_| array::from_fn(|_| f())),
        }
    }

    pub fn fill(&mut self, value: T) {
        for row in self.raw.iter_mut() {
            row.fill(value);
        }
    }
}

impl<T: Default + Copy, const S: usize> Default for AbstractBoard<T, S> {
    fn default() -> Self {
        AbstractBoard {
            raw: [[T::default(); S]; S],
        }
    }
}

impl<T, const S: usize> Index<Square<S>> for AbstractBoard<T, S> {
    type Output = T;

    fn index(&self, square: Square<S>) -> &Self::Output {
        &self.raw[square.rank() as usize][square.file() as usize]
    }
}

impl<T, const S: usize> IndexMut<Square<S>> for AbstractBoard<T, S> {
    fn index_mut(&mut self, square: Square<S>) -> &mut Self::Output {
        &mut self.raw[square.rank() as usize][square.file() as usize]
    }
}
