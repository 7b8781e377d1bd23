//! The move engine: reversible move execution over the grid, line cache,
//! stone lists, quad accumulators and position hash.

use std::collections::HashMap;
use std::fmt;

use board_game_traits::GameResult::{BlackWin, Draw, WhiteWin};
use board_game_traits::{Color, GameResult, Position as PositionTrait};
use lazy_static::lazy_static;
use rand::{Rng, SeedableRng};

use crate::variant::{Setup, VariantRules, WinCondition};

pub mod groups;
pub mod lines;
pub(crate) mod mv;
pub mod quads;
pub mod utils;

pub use lines::{LineFamily, LineId};
pub use mv::{Move, MoveError, MoveInfo, ReverseMove};
pub use quads::QuadCounts;
pub use utils::{squares_iterator, AbstractBoard, Cell, Direction, Square};

use lines::LineCache;
use mv::{slide_target, ReverseKind};

/// Fixed seed for the position-key sequence. Every conforming build derives
/// the same keys, so digests are comparable across processes.
const ZOBRIST_SEED: [u8; 32] = [
    0x4c, 0x69, 0x6e, 0x65, 0x73, 0x20, 0x6f, 0x66, 0x20, 0x41, 0x63, 0x74, 0x69, 0x6f, 0x6e, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// Points awarded in the point-race variant.
const CAPTURE_POINTS: i32 = 1;
const CONNECT_POINTS: i32 = 5;

lazy_static! {
    static ref ZOBRIST_KEYS_6S: Box<ZobristKeys<6>> = ZobristKeys::new();
    static ref ZOBRIST_KEYS_7S: Box<ZobristKeys<7>> = ZobristKeys::new();
    static ref ZOBRIST_KEYS_8S: Box<ZobristKeys<8>> = ZobristKeys::new();
    static ref ZOBRIST_KEYS_9S: Box<ZobristKeys<9>> = ZobristKeys::new();
    static ref ZOBRIST_KEYS_10S: Box<ZobristKeys<10>> = ZobristKeys::new();
}

pub(crate) struct ZobristKeys<const S: usize> {
    stones: AbstractBoard<[u64; 2], S>,
    to_move: [u64; 2],
}

impl<const S: usize> ZobristKeys<S> {
    fn new() -> Box<Self> {
        let mut rng = rand::rngs::StdRng::from_seed(ZOBRIST_SEED);
        Box::new(ZobristKeys {
            stones: AbstractBoard::new_from_fn(|| [rng.gen(), rng.gen()]),
            to_move: [rng.gen(), rng.gen()],
        })
    }
}

pub(crate) fn zobrist_stone<const S: usize>(square: Square<S>, color: Color) -> u64 {
    match S {
        6 => ZOBRIST_KEYS_6S.stones[square.downcast_size()][color.disc()],
        7 => ZOBRIST_KEYS_7S.stones[square.downcast_size()][color.disc()],
        8 => ZOBRIST_KEYS_8S.stones[square.downcast_size()][color.disc()],
        9 => ZOBRIST_KEYS_9S.stones[square.downcast_size()][color.disc()],
        10 => ZOBRIST_KEYS_10S.stones[square.downcast_size()][color.disc()],
        _ => panic!("No zobrist keys for size {}. Size not supported.", S),
    }
}

pub(crate) fn zobrist_to_move<const S: usize>(color: Color) -> u64 {
    match S {
        6 => ZOBRIST_KEYS_6S.to_move[color.disc()],
        7 => ZOBRIST_KEYS_7S.to_move[color.disc()],
        8 => ZOBRIST_KEYS_8S.to_move[color.disc()],
        9 => ZOBRIST_KEYS_9S.to_move[color.disc()],
        10 => ZOBRIST_KEYS_10S.to_move[color.disc()],
        _ => panic!("No zobrist keys for size {}. Size not supported.", S),
    }
}

pub(crate) fn win_for(color: Color) -> GameResult {
    match color {
        Color::White => WhiteWin,
        Color::Black => BlackWin,
    }
}

/// Per-color game state: the stone list, duplicate-position counter and
/// point-race total, plus the color's quad accumulator.
#[derive(Clone, Debug)]
pub struct PlayerState<const S: usize> {
    color: Color,
    stones: Vec<Square<S>>,
    repetitions: u32,
    points: i32,
    quads: QuadCounts,
}

impl<const S: usize> PlayerState<S> {
    fn new(color: Color) -> Self {
        PlayerState {
            color,
            stones: vec![],
            repetitions: 0,
            points: 0,
            quads: QuadCounts::default(),
        }
    }

    fn reset(&mut self) {
        self.stones.clear();
        self.repetitions = 0;
        self.points = 0;
        self.quads = QuadCounts::default();
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// The color's occupied squares. Order is unspecified; the connectivity
    /// walk reorders the list as it counts.
    pub fn stones(&self) -> &[Square<S>] {
        &self.stones
    }

    pub fn stone_count(&self) -> usize {
        self.stones.len()
    }

    /// How many of this player's moves have recreated an earlier position.
    pub fn repetitions(&self) -> u32 {
        self.repetitions
    }

    pub fn points(&self) -> i32 {
        self.points
    }

    /// Euler number of this color's stone pattern, maintained incrementally.
    pub fn euler(&self) -> i32 {
        self.quads.euler()
    }

    pub(crate) fn quads(&self) -> QuadCounts {
        self.quads
    }
}

/// Complete game state for one board.
#[derive(Clone)]
pub struct Position<const S: usize> {
    cells: AbstractBoard<Cell, S>,
    sweep: AbstractBoard<u32, S>,
    pub(crate) sweep_epoch: u32,
    pub(crate) list_index: AbstractBoard<u8, S>,
    lines: LineCache<S>,
    pub(crate) players: [PlayerState<S>; 2],
    rules: VariantRules,
    to_move: Color,
    half_moves_played: usize,
    editing: bool,
    hash: u64,
    repetitions: HashMap<u64, u32>,
    result: Option<GameResult>,
}

impl<const S: usize> Position<S> {
    fn new_empty(rules: VariantRules) -> Self {
        Position {
            cells: Default::default(),
            sweep: Default::default(),
            sweep_epoch: 0,
            list_index: Default::default(),
            lines: LineCache::new(),
            players: [
                PlayerState::new(Color::White),
                PlayerState::new(Color::Black),
            ],
            rules,
            to_move: Color::Black,
            half_moves_played: 0,
            editing: false,
            hash: zobrist_to_move::<S>(Color::Black),
            repetitions: HashMap::new(),
            result: None,
        }
    }

    pub fn from_setup(setup: &Setup) -> Result<Self, pgn_traits::Error> {
        let mut position = Self::new_empty(setup.rules());
        position.reset(setup)?;
        Ok(position)
    }

    /// Rebuild the position in place for a new game, reusing allocations.
    pub fn reset(&mut self, setup: &Setup) -> Result<(), pgn_traits::Error> {
        // Randomized layouts occasionally start with a color already
        // connected; retry with a derived seed until the game is playable.
        for attempt in 0..64 {
            self.clear(setup.rules());
            for (square, color) in setup.initial_stones::<S>(attempt)? {
                if !self.cells[square].is_empty() {
                    return Err(pgn_traits::Error::new_parse_error(format!(
                        "Setup places two stones on {}",
                        square
                    )));
                }
                self.add_stone(square, color);
            }
            if !self.exactly_one_group(Color::White) && !self.exactly_one_group(Color::Black) {
                *self.repetitions.entry(self.hash).or_insert(0) += 1;
                return Ok(());
            }
        }
        Err(pgn_traits::Error::new_parse_error(format!(
            "Couldn't find a playable layout for setup \"{}\"",
            setup
        )))
    }

    fn clear(&mut self, rules: VariantRules) {
        self.cells.fill(Cell::Empty);
        self.sweep.fill(0);
        self.sweep_epoch = 0;
        self.list_index.fill(0);
        self.lines.reset();
        for player in self.players.iter_mut() {
            player.reset();
        }
        self.rules = rules;
        self.to_move = Color::Black;
        self.half_moves_played = 0;
        self.editing = false;
        self.hash = zobrist_to_move::<S>(Color::Black);
        self.repetitions.clear();
        self.result = None;
    }

    pub const fn size(&self) -> usize {
        S
    }

    pub fn cell(&self, square: Square<S>) -> Cell {
        self.cells[square]
    }

    pub(crate) fn cells(&self) -> &AbstractBoard<Cell, S> {
        &self.cells
    }

    pub fn rules(&self) -> &VariantRules {
        &self.rules
    }

    pub fn player(&self, color: Color) -> &PlayerState<S> {
        &self.players[color.disc()]
    }

    /// Number of moves/plies played in the game.
    pub fn half_moves_played(&self) -> usize {
        self.half_moves_played
    }

    /// 1-based number of the next game-record entry.
    pub fn move_number(&self) -> usize {
        self.half_moves_played + 1
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// How often the current position has occurred in this game.
    pub fn occurrences(&self) -> u32 {
        self.occurrences_of(self.hash)
    }

    /// How often the position with the given hash has occurred in this game.
    pub fn occurrences_of(&self, hash: u64) -> u32 {
        self.repetitions.get(&hash).copied().unwrap_or(0)
    }

    /// Stone count of the line through `square` along `direction`: the
    /// travel distance of any move from `square` in that direction.
    pub fn line_count(&self, square: Square<S>, direction: Direction) -> u8 {
        self.lines.count(square, direction)
    }

    /// Same as `line_count`, for raw deltas. Deltas that do not lie on one
    /// of the eight lines are reported as a direction error.
    pub fn line_stone_count(&self, square: Square<S>, dx: i8, dy: i8) -> Result<u8, MoveError> {
        let direction = Direction::from_deltas(dx, dy).ok_or(MoveError::BadDirection)?;
        Ok(self.lines.count(square, direction))
    }

    pub(crate) fn family_total(&self, family: LineFamily) -> u32 {
        self.lines.family_total(family)
    }

    /// Layout digest: XOR of the per-cell color keys over occupied cells.
    /// Identical stone layouts give identical digests regardless of the move
    /// history that led there.
    pub fn digest(&self) -> u64 {
        let mut digest = 0;
        for square in squares_iterator::<S>() {
            if let Cell::Stone(color) = self.cells[square] {
                digest ^= zobrist_stone::<S>(square, color);
            }
        }
        digest
    }

    pub(crate) fn hash_from_scratch(&self) -> u64 {
        self.digest() ^ zobrist_to_move::<S>(self.to_move)
    }

    fn set_to_move(&mut self, color: Color) {
        self.hash ^= zobrist_to_move::<S>(self.to_move);
        self.to_move = color;
        self.hash ^= zobrist_to_move::<S>(self.to_move);
    }

    fn add_stone(&mut self, square: Square<S>, color: Color) {
        debug_assert!(self.cells[square].is_empty());
        let x = square.file() as i16;
        let y = square.rank() as i16;
        let cells = &self.cells;
        self.players[color.disc()].quads.toggle(
            |cx, cy| {
                (0..S as i16).contains(&cx)
                    && (0..S as i16).contains(&cy)
                    && cells[Square::from_file_rank(cx as u8, cy as u8)].is_stone_of(color)
            },
            x,
            y,
            true,
        );
        self.cells[square] = Cell::Stone(color);
        self.lines.stone_added(square);
        let stones = &mut self.players[color.disc()].stones;
        self.list_index[square] = stones.len() as u8;
        stones.push(square);
        self.hash ^= zobrist_stone::<S>(square, color);
    }

    fn remove_stone(&mut self, square: Square<S>) -> Color {
        let color = match self.cells[square] {
            Cell::Stone(color) => color,
            cell => unreachable!("Tried to remove a stone from {} holding {:?}", square, cell),
        };
        self.cells[square] = Cell::Empty;
        let x = square.file() as i16;
        let y = square.rank() as i16;
        let cells = &self.cells;
        self.players[color.disc()].quads.toggle(
            |cx, cy| {
                (0..S as i16).contains(&cx)
                    && (0..S as i16).contains(&cy)
                    && cells[Square::from_file_rank(cx as u8, cy as u8)].is_stone_of(color)
            },
            x,
            y,
            false,
        );
        self.lines.stone_removed(square);
        let index = self.list_index[square] as usize;
        let stones = &mut self.players[color.disc()].stones;
        let last = stones.len() - 1;
        stones.swap(index, last);
        stones.pop();
        if index < stones.len() {
            let moved = stones[index];
            self.list_index[moved] = index as u8;
        }
        self.hash ^= zobrist_stone::<S>(square, color);
        color
    }

    /// Drive a full-board legal-move scan, feeding every legal move of both
    /// colors to `consumer`. Lines whose caches are still valid are replayed
    /// without recomputation.
    pub fn scan_for_moves(&mut self, consumer: &mut dyn crate::move_visitor::MoveConsumer<S>) {
        self.lines.rebuild(&self.cells);
        self.lines
            .visit_all(|line, mv, info| consumer.on_move(line, mv, info));
    }

    /// Whether `color` has any legal spatial move.
    pub fn has_any_slide(&self, color: Color) -> bool {
        self.players[color.disc()].stones.iter().any(|&from| {
            Direction::ALL.iter().any(|&direction| {
                let distance = self.lines.count(from, direction);
                distance > 0
                    && slide_target(&self.cells, from, direction, distance, color).is_ok()
            })
        })
    }

    /// Validate a move without touching the board. Returns the resolved
    /// mover and capture flag, or the first failing reason.
    pub fn test_move(&self, mv: &Move<S>) -> Result<MoveInfo, MoveError> {
        if self.result.is_some() && !matches!(mv, Move::Start(_) | Move::Edit) {
            return Err(MoveError::GameOver);
        }
        match *mv {
            Move::Slide {
                from,
                direction,
                distance,
            } => {
                let color = match self.cells[from] {
                    Cell::Stone(color) => color,
                    _ => return Err(MoveError::FromEmpty),
                };
                if color != self.to_move {
                    return Err(MoveError::WrongColor);
                }
                if distance == 0 || distance != self.lines.count(from, direction) {
                    return Err(MoveError::WrongCount);
                }
                let (_, capture) = slide_target(&self.cells, from, direction, distance, color)?;
                Ok(MoveInfo { color, capture })
            }
            Move::Vacate(square) => {
                if !self.rules.vacate {
                    return Err(MoveError::VacateNotAllowed);
                }
                match self.cells[square] {
                    Cell::Stone(color) if color == self.to_move => Ok(MoveInfo {
                        color,
                        capture: false,
                    }),
                    Cell::Stone(_) => Err(MoveError::WrongColor),
                    _ => Err(MoveError::FromEmpty),
                }
            }
            Move::Pass => {
                if self.has_any_slide(self.to_move) {
                    Err(MoveError::PassNotAllowed)
                } else {
                    Ok(MoveInfo {
                        color: self.to_move,
                        capture: false,
                    })
                }
            }
            Move::Resign | Move::Forfeit | Move::TimeLoss | Move::Edit => Ok(MoveInfo {
                color: self.to_move,
                capture: false,
            }),
            Move::Start(color) => Ok(MoveInfo {
                color,
                capture: false,
            }),
        }
    }

    /// Resolve an origin/destination pair into a slide and validate it.
    pub fn resolve_slide(
        &self,
        from: Square<S>,
        to: Square<S>,
    ) -> Result<(Move<S>, MoveInfo), MoveError> {
        let mv = Move::slide_between(from, to)?;
        let info = self.test_move(&mv)?;
        Ok((mv, info))
    }

    fn compute_result(&mut self, mover: Color, occurrences: u32) -> Option<GameResult> {
        let defender = !mover;
        if self.players[defender.disc()].stones.is_empty() {
            return Some(win_for(mover));
        }
        if self.players[mover.disc()].stones.is_empty() {
            return Some(win_for(defender));
        }
        match self.rules.win {
            WinCondition::LastGroupStanding => {
                // On simultaneous connection, the moving player wins
                if self.exactly_one_group(mover) {
                    return Some(win_for(mover));
                }
                if self.exactly_one_group(defender) {
                    return Some(win_for(defender));
                }
            }
            WinCondition::PointRace { target, move_limit } => {
                let white = self.players[Color::White.disc()].points;
                let black = self.players[Color::Black.disc()].points;
                if white >= target
                    || black >= target
                    || self.half_moves_played >= move_limit
                {
                    return Some(match white.cmp(&black) {
                        std::cmp::Ordering::Greater => WhiteWin,
                        std::cmp::Ordering::Less => BlackWin,
                        std::cmp::Ordering::Equal => Draw,
                    });
                }
            }
        }
        if occurrences >= 3 {
            return Some(Draw);
        }
        None
    }

    /// Undo the turn flip, ply count and repetition entry of the last
    /// turn-consuming move. Must run before the board itself is restored.
    fn retreat_turn(&mut self) {
        let mover = !self.to_move;
        let occurrences = *self
            .repetitions
            .get(&self.hash)
            .expect("repetition entry missing for unapplied move");
        if occurrences >= 2 {
            self.players[mover.disc()].repetitions -= 1;
        }
        if occurrences == 1 {
            self.repetitions.remove(&self.hash);
        } else {
            *self.repetitions.get_mut(&self.hash).unwrap() -= 1;
        }
        self.set_to_move(mover);
        self.half_moves_played -= 1;
    }
}

impl<const S: usize> PositionTrait for Position<S> {
    type Move = Move<S>;
    type ReverseMove = ReverseMove<S>;
    type Settings = ();

    fn start_position() -> Self {
        Self::from_setup(&Setup::default()).expect("standard layout is always playable")
    }

    fn start_position_with_settings(_settings: &Self::Settings) -> Self {
        Self::start_position()
    }

    fn side_to_move(&self) -> Color {
        self.to_move
    }

    /// Adds all legal moves to the provided vector. Slides for the side to
    /// move, vacate moves where the variant has them, and a lone pass when
    /// the mover is completely blocked in.
    fn generate_moves<E: Extend<Self::Move>>(&self, moves: &mut E) {
        if self.result.is_some() {
            return;
        }
        let color = self.to_move;
        let mut generated: Vec<Self::Move> = Vec::new();
        for &from in &self.players[color.disc()].stones {
            for &direction in &Direction::ALL {
                let distance = self.lines.count(from, direction);
                if distance > 0
                    && slide_target(&self.cells, from, direction, distance, color).is_ok()
                {
                    generated.push(Move::Slide {
                        from,
                        direction,
                        distance,
                    });
                }
            }
        }
        if self.rules.vacate {
            for &square in &self.players[color.disc()].stones {
                generated.push(Move::Vacate(square));
            }
        }
        if generated.is_empty() {
            generated.push(Move::Pass);
        }
        moves.extend(generated);
    }

    fn do_move(&mut self, mv: Self::Move) -> Self::ReverseMove {
        debug_assert!(
            self.test_move(&mv).is_ok(),
            "Tried to play illegal move {:?} ({:?}) on position\n{:?}",
            mv,
            self.test_move(&mv),
            self
        );
        let prior_result = self.result;
        let us = self.to_move;
        let point_race = matches!(self.rules.win, WinCondition::PointRace { .. });

        let (kind, advances_turn) = match mv {
            Move::Slide {
                from,
                direction,
                distance,
            } => {
                let (to, capture) = slide_target(&self.cells, from, direction, distance, us)
                    .expect("slide was validated before application");
                if capture {
                    self.remove_stone(to);
                    if point_race {
                        self.players[us.disc()].points += CAPTURE_POINTS;
                    }
                }
                self.remove_stone(from);
                let scarred = self.rules.scars;
                if scarred {
                    self.cells[from] = Cell::Blocked;
                    self.lines.cell_changed(from);
                }
                self.add_stone(to, us);
                let connect_bonus = point_race && self.exactly_one_group(us);
                if connect_bonus {
                    self.players[us.disc()].points += CONNECT_POINTS;
                }
                (
                    ReverseKind::Slide {
                        from,
                        direction,
                        distance,
                        captured: capture,
                        scarred,
                        connect_bonus,
                    },
                    true,
                )
            }
            Move::Vacate(square) => {
                self.remove_stone(square);
                (ReverseKind::Vacate(square), true)
            }
            Move::Pass => (ReverseKind::Pass, true),
            Move::Resign | Move::Forfeit | Move::TimeLoss => {
                self.result = Some(win_for(!us));
                (ReverseKind::Flag, false)
            }
            Move::Start(color) => {
                let prior_to_move = self.to_move;
                self.set_to_move(color);
                (ReverseKind::Start { prior_to_move }, false)
            }
            Move::Edit => {
                self.editing = !self.editing;
                (ReverseKind::Edit, false)
            }
        };

        if advances_turn {
            self.half_moves_played += 1;
            self.set_to_move(!us);
            let entry = self.repetitions.entry(self.hash).or_insert(0);
            *entry += 1;
            let occurrences = *entry;
            if occurrences >= 2 {
                self.players[us.disc()].repetitions += 1;
            }
            self.result = self.compute_result(us, occurrences);
        }

        debug_assert_eq!(self.hash, self.hash_from_scratch());

        ReverseMove { kind, prior_result }
    }

    fn reverse_move(&mut self, reverse_move: Self::ReverseMove) {
        match reverse_move.kind {
            ReverseKind::Slide {
                from,
                direction,
                distance,
                captured,
                scarred,
                connect_bonus,
            } => {
                self.retreat_turn();
                let us = self.to_move;
                let to = from
                    .jump_direction(direction, distance)
                    .expect("reverse of an applied slide stays on the board");
                if connect_bonus {
                    self.players[us.disc()].points -= CONNECT_POINTS;
                }
                self.remove_stone(to);
                if scarred {
                    self.cells[from] = Cell::Empty;
                    self.lines.cell_changed(from);
                }
                self.add_stone(from, us);
                if captured {
                    if matches!(self.rules.win, WinCondition::PointRace { .. }) {
                        self.players[us.disc()].points -= CAPTURE_POINTS;
                    }
                    self.add_stone(to, !us);
                }
            }
            ReverseKind::Vacate(square) => {
                self.retreat_turn();
                let us = self.to_move;
                self.add_stone(square, us);
            }
            ReverseKind::Pass => {
                self.retreat_turn();
            }
            ReverseKind::Flag => (),
            ReverseKind::Start { prior_to_move } => {
                self.set_to_move(prior_to_move);
            }
            ReverseKind::Edit => {
                self.editing = !self.editing;
            }
        }
        self.result = reverse_move.prior_result;

        debug_assert_eq!(self.hash, self.hash_from_scratch());
    }

    fn game_result(&self) -> Option<GameResult> {
        self.result
    }
}

impl<const S: usize> PartialEq for Position<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
            && self.to_move == other.to_move
            && self.half_moves_played == other.half_moves_played
            && self.result == other.result
    }
}

impl<const S: usize> Eq for Position<S> {}

impl<const S: usize> fmt::Debug for Position<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for row_number in 0..S {
            let rank = (S - 1 - row_number) as u8;
            for file in 0..S as u8 {
                match self.cells[Square::from_file_rank(file, rank)] {
                    Cell::Empty => write!(f, "[.]")?,
                    Cell::Stone(Color::Black) => write!(f, "[X]")?,
                    Cell::Stone(Color::White) => write!(f, "[O]")?,
                    Cell::Blocked => write!(f, "[#]")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "Stones: {} black, {} white.",
            self.players[Color::Black.disc()].stone_count(),
            self.players[Color::White.disc()].stone_count()
        )?;
        if matches!(self.rules.win, WinCondition::PointRace { .. }) {
            writeln!(
                f,
                "Points: {} black, {} white.",
                self.players[Color::Black.disc()].points(),
                self.players[Color::White.disc()].points()
            )?;
        }
        writeln!(f, "{:?} to move. Hash: {}", self.to_move, self.hash)?;
        Ok(())
    }
}

impl<const S: usize> pgn_traits::PgnPosition for Position<S> {
    const REQUIRED_TAGS: &'static [(&'static str, &'static str)] = &[
        ("Player1", "?"),
        ("Player2", "?"),
        ("Date", "????.??.??"),
        ("Size", "8"),
        ("Result", "*"),
    ];

    const POSSIBLE_GAME_RESULTS: &'static [(&'static str, Option<GameResult>)] = &[
        ("*", None),
        ("1-0", Some(GameResult::WhiteWin)),
        ("R-0", Some(GameResult::WhiteWin)),
        ("F-0", Some(GameResult::WhiteWin)),
        ("0-1", Some(GameResult::BlackWin)),
        ("0-R", Some(GameResult::BlackWin)),
        ("0-F", Some(GameResult::BlackWin)),
        ("1/2-1/2", Some(GameResult::Draw)),
    ];

    const POSSIBLE_MOVE_ANNOTATIONS: &'static [&'static str] = &["''", "'", "*", "!", "?"];

    const START_POSITION_TAG_NAME: Option<&'static str> = None;

    fn from_fen_with_settings(
        fen: &str,
        _settings: &Self::Settings,
    ) -> Result<Self, pgn_traits::Error> {
        Self::from_fen(fen)
    }

    fn from_fen(fen: &str) -> Result<Self, pgn_traits::Error> {
        let fen_words: Vec<&str> = fen.split_whitespace().collect();
        if fen_words.len() != 3 {
            return Err(pgn_traits::Error::new_parse_error(format!(
                "Couldn't parse position string \"{}\": expected board, side to move and move number",
                fen
            )));
        }

        let fen_rows: Vec<&str> = fen_words[0].split('/').collect();
        if fen_rows.len() != S {
            return Err(pgn_traits::Error::new_parse_error(format!(
                "Couldn't parse position string \"{}\": had {} rows instead of {}",
                fen,
                fen_rows.len(),
                S
            )));
        }

        let mut position = Self::new_empty(Setup::default().rules());
        // Rows are listed from the top rank down. Runs of empty cells are
        // written as (possibly multi-digit) numbers.
        for (row_number, row) in fen_rows.iter().enumerate() {
            let rank = (S - 1 - row_number) as u8;
            let mut file = 0u16;
            let mut empty_run = 0u16;
            for ch in row.chars() {
                if let Some(digit) = ch.to_digit(10) {
                    empty_run = empty_run * 10 + digit as u16;
                    continue;
                }
                file += empty_run;
                empty_run = 0;
                if file >= S as u16 {
                    return Err(pgn_traits::Error::new_parse_error(format!(
                        "Row \"{}\" is too long for a size {} board",
                        row, S
                    )));
                }
                let square = Square::from_file_rank(file as u8, rank);
                match ch {
                    'X' => position.add_stone(square, Color::Black),
                    'O' => position.add_stone(square, Color::White),
                    '#' => {
                        position.cells[square] = Cell::Blocked;
                        position.lines.cell_changed(square);
                    }
                    ch => {
                        return Err(pgn_traits::Error::new_parse_error(format!(
                            "Unexpected '{}' in row \"{}\"",
                            ch, row
                        )));
                    }
                }
                file += 1;
            }
            file += empty_run;
            if file != S as u16 {
                return Err(pgn_traits::Error::new_parse_error(format!(
                    "Row \"{}\" describes {} files instead of {}",
                    row, file, S
                )));
            }
        }

        match fen_words[1] {
            "1" => position.set_to_move(Color::Black),
            "2" => position.set_to_move(Color::White),
            word => {
                return Err(pgn_traits::Error::new_parse_error(format!(
                    "Got bad side to move \"{}\"",
                    word
                )));
            }
        }

        match fen_words[2].parse::<usize>() {
            Ok(number) if number > 0 => position.half_moves_played = number - 1,
            _ => {
                return Err(pgn_traits::Error::new_parse_error(format!(
                    "Got bad move number \"{}\"",
                    fen_words[2]
                )));
            }
        }

        *position.repetitions.entry(position.hash).or_insert(0) += 1;
        let presumed_mover = !position.to_move;
        position.result = position.compute_result(presumed_mover, 1);
        Ok(position)
    }

    fn to_fen(&self) -> String {
        use std::fmt::Write;
        let mut fen = String::new();
        for row_number in 0..S {
            let rank = (S - 1 - row_number) as u8;
            let mut empty_run = 0;
            for file in 0..S as u8 {
                match self.cells[Square::from_file_rank(file, rank)] {
                    Cell::Empty => empty_run += 1,
                    cell => {
                        if empty_run > 0 {
                            write!(fen, "{}", empty_run).unwrap();
                            empty_run = 0;
                        }
                        match cell {
                            Cell::Stone(Color::Black) => fen.push('X'),
                            Cell::Stone(Color::White) => fen.push('O'),
                            Cell::Blocked => fen.push('#'),
                            Cell::Empty => unreachable!(),
                        }
                    }
                }
            }
            if empty_run > 0 {
                write!(fen, "{}", empty_run).unwrap();
            }
            if row_number + 1 < S {
                fen.push('/');
            }
        }
        write!(
            fen,
            " {} {}",
            match self.to_move {
                Color::Black => "1",
                Color::White => "2",
            },
            self.move_number()
        )
        .unwrap();
        fen
    }

    fn move_from_san(&self, input: &str) -> Result<Self::Move, pgn_traits::Error> {
        Move::from_token(input)
    }

    fn move_to_san(&self, mv: &Self::Move) -> String {
        match *mv {
            Move::Slide { from, .. } => {
                let to = mv
                    .destination()
                    .expect("slide moves always have a destination");
                let mover = self.cells[from].stone_color().unwrap_or(self.to_move);
                let separator = if self.cells[to].is_stone_of(!mover) {
                    ':'
                } else {
                    '-'
                };
                format!("{}{}{}", from, separator, to)
            }
            Move::Vacate(square) => format!("{}-^^", square),
            Move::Pass => "Pass".to_string(),
            Move::Resign => "Resign".to_string(),
            Move::Forfeit => "Forfeit".to_string(),
            Move::TimeLoss => "Timeout".to_string(),
            Move::Start(Color::Black) => "StartB".to_string(),
            Move::Start(Color::White) => "StartW".to_string(),
            Move::Edit => "Edit".to_string(),
        }
    }

    fn move_from_lan(&self, input: &str) -> Result<Self::Move, pgn_traits::Error> {
        self.move_from_san(input)
    }

    fn move_to_lan(&self, mv: &Self::Move) -> String {
        self.move_to_san(mv)
    }
}
