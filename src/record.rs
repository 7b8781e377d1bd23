//! Game-record move text: parsing, formatting and replay.
//!
//! A record entry is a whitespace-separated token sequence: an optional
//! leading sequence number, a verb, the 0-based player index (player 0 is
//! Black, who moves first), and verb-specific fields. Spatial moves encode
//! as `<from>-<to>`, or `<from>:<to>` when capturing; the vacate move as
//! `<cell>-^^`. Cells are a column letter ('A'-based) followed by a 1-based
//! row number.

use std::fmt::Write;

use board_game_traits::{Color, Position as PositionTrait};
use log::debug;

use crate::position::{Move, Position, Square};

/// A move verb as it appears in a game record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verb<const S: usize> {
    Start,
    Select(Option<Square<S>>),
    Slide {
        from: Square<S>,
        to: Square<S>,
        capture: bool,
    },
    Vacate(Square<S>),
    Pass,
    Resign,
    Forfeit,
    Edit,
}

/// One parsed line of a game record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordEntry<const S: usize> {
    pub number: Option<u32>,
    pub player: u8,
    pub verb: Verb<S>,
}

/// Player 0 is Black, who moves first.
pub fn color_of_player(player: u8) -> Color {
    if player == 0 {
        Color::Black
    } else {
        Color::White
    }
}

pub fn player_of_color(color: Color) -> u8 {
    match color {
        Color::Black => 0,
        Color::White => 1,
    }
}

impl<const S: usize> Verb<S> {
    /// The engine move this verb maps to. `Select` is a pure UI verb with
    /// no engine counterpart.
    pub fn to_engine_move(self, player: u8) -> Option<Move<S>> {
        match self {
            Verb::Start => Some(Move::Start(color_of_player(player))),
            Verb::Select(_) => None,
            Verb::Slide { from, to, .. } => Some(
                Move::slide_between(from, to)
                    .expect("record slides are validated when parsed"),
            ),
            Verb::Vacate(square) => Some(Move::Vacate(square)),
            Verb::Pass => Some(Move::Pass),
            Verb::Resign => Some(Move::Resign),
            Verb::Forfeit => Some(Move::Forfeit),
            Verb::Edit => Some(Move::Edit),
        }
    }
}

pub fn parse_entry<const S: usize>(input: &str) -> Result<RecordEntry<S>, pgn_traits::Error> {
    let mut words = input.split_whitespace().peekable();

    let number = match words.peek() {
        Some(word) if word.chars().all(|ch| ch.is_ascii_digit()) => {
            let number = word.parse::<u32>().map_err(|err| {
                pgn_traits::Error::new_parse_error(format!(
                    "Bad sequence number \"{}\": {}",
                    word, err
                ))
            })?;
            words.next();
            Some(number)
        }
        _ => None,
    };

    let verb_token = words.next().ok_or_else(|| {
        pgn_traits::Error::new_parse_error(format!("Record entry \"{}\" has no verb", input))
    })?;

    let player_token = words.next().ok_or_else(|| {
        pgn_traits::Error::new_parse_error(format!(
            "Record entry \"{}\" has no player index",
            input
        ))
    })?;
    let player = match player_token {
        "0" => 0,
        "1" => 1,
        _ => {
            return Err(pgn_traits::Error::new_parse_error(format!(
                "Bad player index \"{}\" in \"{}\"",
                player_token, input
            )));
        }
    };

    let verb = match verb_token {
        "Start" => Verb::Start,
        "Pass" => Verb::Pass,
        "Resign" => Verb::Resign,
        "Forfeit" => Verb::Forfeit,
        "Edit" => Verb::Edit,
        "Select" => {
            let field = words.next().ok_or_else(|| {
                pgn_traits::Error::new_parse_error(format!(
                    "Select entry \"{}\" has no cell",
                    input
                ))
            })?;
            if field == "null" {
                Verb::Select(None)
            } else {
                Verb::Select(Some(Square::parse_cell(field)?))
            }
        }
        token => parse_spatial_verb(token)?,
    };

    if let Some(extra) = words.next() {
        return Err(pgn_traits::Error::new_parse_error(format!(
            "Unexpected \"{}\" at the end of record entry \"{}\"",
            extra, input
        )));
    }

    Ok(RecordEntry {
        number,
        player,
        verb,
    })
}

fn parse_spatial_verb<const S: usize>(token: &str) -> Result<Verb<S>, pgn_traits::Error> {
    let separator = token
        .char_indices()
        .skip(1)
        .find(|(_, ch)| *ch == '-' || *ch == ':')
        .map(|(index, ch)| (index, ch))
        .ok_or_else(|| {
            pgn_traits::Error::new_parse_error(format!("Unrecognized move verb \"{}\"", token))
        })?;
    let from = Square::parse_cell(&token[..separator.0])?;
    let rest = &token[separator.0 + 1..];
    if rest == "^^" {
        return Ok(Verb::Vacate(from));
    }
    let to = Square::parse_cell(rest)?;
    // Reject pairs that are not on a common line before they reach the engine
    Move::<S>::slide_between(from, to).map_err(|err| {
        pgn_traits::Error::new_parse_error(format!("Bad move verb \"{}\": {}", token, err))
    })?;
    Ok(Verb::Slide {
        from,
        to,
        capture: separator.1 == ':',
    })
}

pub fn format_entry<const S: usize>(entry: &RecordEntry<S>) -> String {
    let mut output = String::new();
    if let Some(number) = entry.number {
        write!(output, "{} ", number).unwrap();
    }
    match entry.verb {
        Verb::Start => write!(output, "Start {}", entry.player).unwrap(),
        Verb::Select(None) => write!(output, "Select {} null", entry.player).unwrap(),
        Verb::Select(Some(square)) => {
            write!(output, "Select {} {}", entry.player, square).unwrap()
        }
        Verb::Slide { from, to, capture } => write!(
            output,
            "{}{}{} {}",
            from,
            if capture { ':' } else { '-' },
            to,
            entry.player
        )
        .unwrap(),
        Verb::Vacate(square) => write!(output, "{}-^^ {}", square, entry.player).unwrap(),
        Verb::Pass => write!(output, "Pass {}", entry.player).unwrap(),
        Verb::Resign => write!(output, "Resign {}", entry.player).unwrap(),
        Verb::Forfeit => write!(output, "Forfeit {}", entry.player).unwrap(),
        Verb::Edit => write!(output, "Edit {}", entry.player).unwrap(),
    }
    output
}

/// Replay a sequence of record entries onto `position`. Every move is
/// validated before application; the first illegal or out-of-turn entry
/// aborts the replay with an error.
pub fn replay<const S: usize>(
    position: &mut Position<S>,
    entries: impl IntoIterator<Item = RecordEntry<S>>,
) -> Result<(), pgn_traits::Error> {
    for entry in entries {
        let Some(mv) = entry.verb.to_engine_move(entry.player) else {
            continue;
        };
        if matches!(mv, Move::Slide { .. } | Move::Vacate(_) | Move::Pass)
            && color_of_player(entry.player) != position.side_to_move()
        {
            return Err(pgn_traits::Error::new_parse_error(format!(
                "Entry \"{}\" is out of turn",
                format_entry(&entry)
            )));
        }
        position.test_move(&mv).map_err(|err| {
            pgn_traits::Error::new_parse_error(format!(
                "Illegal entry \"{}\": {}",
                format_entry(&entry),
                err
            ))
        })?;
        position.do_move(mv);
        debug!(
            "replayed {} (move number {})",
            format_entry(&entry),
            position.move_number()
        );
    }
    Ok(())
}
