use std::fmt;

use board_game_traits::{Color, GameResult};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::position::utils::ColorDef;
use crate::position::utils::{AbstractBoard, Cell, Direction, Square};

/// A move for a position.
///
/// Spatial moves carry their travel distance explicitly; the distance must
/// equal the stone count of the line through the origin in the chosen
/// direction, which `Position::test_move` checks before application.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Move<const S: usize> {
    Slide {
        from: Square<S>,
        direction: Direction,
        distance: u8,
    },
    /// Remove one of the mover's own stones from the board.
    Vacate(Square<S>),
    Pass,
    Resign,
    Forfeit,
    TimeLoss,
    /// Begin the game with the given color to move.
    Start(#[cfg_attr(feature = "serde", serde(with = "ColorDef"))] Color),
    /// Toggle position-editing mode.
    Edit,
}

impl<const S: usize> Move<S> {
    /// Destination of a spatial move, ignoring board contents.
    pub fn destination(&self) -> Option<Square<S>> {
        match self {
            Move::Slide {
                from,
                direction,
                distance,
            } => from.jump_direction(*direction, *distance),
            _ => None,
        }
    }

    /// Build a slide from an origin/destination pair, deriving direction and
    /// distance geometrically. The pair must lie on one of the eight lines.
    pub fn slide_between(from: Square<S>, to: Square<S>) -> Result<Move<S>, MoveError> {
        let dx = to.file() as i16 - from.file() as i16;
        let dy = to.rank() as i16 - from.rank() as i16;
        if dx == 0 && dy == 0 {
            return Err(MoveError::BadDirection);
        }
        if dx != 0 && dy != 0 && dx.abs() != dy.abs() {
            return Err(MoveError::BadDirection);
        }
        let distance = dx.abs().max(dy.abs());
        let direction = Direction::from_deltas(dx.signum() as i8, dy.signum() as i8)
            .ok_or(MoveError::BadDirection)?;
        Ok(Move::Slide {
            from,
            direction,
            distance: distance as u8,
        })
    }

    /// Parse a bare move token: `D1-B3`, `D1:B3`, `D1-^^`, or one of the
    /// non-spatial verbs.
    pub fn from_token(input: &str) -> Result<Move<S>, pgn_traits::Error> {
        match input {
            "Pass" => return Ok(Move::Pass),
            "Resign" => return Ok(Move::Resign),
            "Forfeit" => return Ok(Move::Forfeit),
            "Timeout" => return Ok(Move::TimeLoss),
            "Edit" => return Ok(Move::Edit),
            "StartB" => return Ok(Move::Start(Color::Black)),
            "StartW" => return Ok(Move::Start(Color::White)),
            _ => (),
        }
        let separator = input
            .char_indices()
            .skip(1)
            .find(|(_, ch)| *ch == '-' || *ch == ':')
            .map(|(i, _)| i)
            .ok_or_else(|| {
                pgn_traits::Error::new_parse_error(format!("Couldn't parse move \"{}\"", input))
            })?;
        let from = Square::parse_cell(&input[..separator])?;
        let rest = &input[separator + 1..];
        if rest == "^^" {
            return Ok(Move::Vacate(from));
        }
        let to = Square::parse_cell(rest)?;
        Move::slide_between(from, to).map_err(|err| {
            pgn_traits::Error::new_parse_error(format!(
                "Couldn't parse move \"{}\": {}",
                input, err
            ))
        })
    }
}

/// Result of a successful `test_move`: the resolved mover and whether the
/// destination holds a defender.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MoveInfo {
    pub color: Color,
    pub capture: bool,
}

/// The counterpart of `Move`. When applied to a `Position`, it fully
/// reverses the accompanying `Move`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ReverseMove<const S: usize> {
    pub(crate) kind: ReverseKind<S>,
    pub(crate) prior_result: Option<GameResult>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum ReverseKind<const S: usize> {
    Slide {
        from: Square<S>,
        direction: Direction,
        distance: u8,
        captured: bool,
        scarred: bool,
        connect_bonus: bool,
    },
    Vacate(Square<S>),
    Pass,
    Flag,
    Start {
        prior_to_move: Color,
    },
    Edit,
}

/// Why a move was rejected. These are expected, recoverable outcomes of
/// `test_move`, reported as values and never as panics.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveError {
    BadCoordinates,
    BadDirection,
    WrongCount,
    OffBoard,
    FromEmpty,
    LandOnOwn,
    BlockedDestination,
    BlockedPath,
    SkipOverEnemy,
    WrongColor,
    PassNotAllowed,
    VacateNotAllowed,
    GameOver,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            MoveError::BadCoordinates => "coordinates outside the board",
            MoveError::BadDirection => "direction is not one of the eight line directions",
            MoveError::WrongCount => "travel distance does not match the line's stone count",
            MoveError::OffBoard => "destination is off the board",
            MoveError::FromEmpty => "no stone on the origin square",
            MoveError::LandOnOwn => "destination holds a stone of the moving color",
            MoveError::BlockedDestination => "destination square is blocked",
            MoveError::BlockedPath => "a blocked square lies on the path",
            MoveError::SkipOverEnemy => "an enemy stone lies on the path",
            MoveError::WrongColor => "it is the other color's turn",
            MoveError::PassNotAllowed => "passing is only allowed with no legal moves",
            MoveError::VacateNotAllowed => "this variant has no vacate move",
            MoveError::GameOver => "the game is already decided",
        };
        write!(f, "{}", description)
    }
}

impl std::error::Error for MoveError {}

/// Resolve the destination of a slide, checking bounds, the path and the
/// landing square. Returns the destination and whether it captures.
pub(crate) fn slide_target<const S: usize>(
    cells: &AbstractBoard<Cell, S>,
    from: Square<S>,
    direction: Direction,
    distance: u8,
    mover: Color,
) -> Result<(Square<S>, bool), MoveError> {
    debug_assert!(distance > 0);
    let to = from
        .jump_direction(direction, distance)
        .ok_or(MoveError::OffBoard)?;
    for step in 1..distance {
        // Intermediate squares are on the board whenever the destination is
        let square = from.jump_direction(direction, step).unwrap();
        match cells[square] {
            Cell::Stone(color) if color != mover => return Err(MoveError::SkipOverEnemy),
            Cell::Blocked => return Err(MoveError::BlockedPath),
            _ => (),
        }
    }
    match cells[to] {
        Cell::Empty => Ok((to, false)),
        Cell::Stone(color) if color == mover => Err(MoveError::LandOnOwn),
        Cell::Stone(_) => Ok((to, true)),
        Cell::Blocked => Err(MoveError::BlockedDestination),
    }
}
