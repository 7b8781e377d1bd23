//! Legal-move consumers for the full-board scan.
//!
//! `Position::scan_for_moves` hands every legal move it finds to a
//! `MoveConsumer`. The three standard consumers cover the common callers:
//! showing one stone's options, building a full move list, and counting
//! immediately winning replies without building a list at all.

use arrayvec::ArrayVec;
use board_game_traits::{Color, Position as PositionTrait};

use crate::position::{
    win_for, Direction, LineId, Move, MoveInfo, Position, Square,
};

/// Receives every legal move discovered during a full-board scan.
pub trait MoveConsumer<const S: usize> {
    fn on_move(&mut self, line: LineId, mv: Move<S>, info: MoveInfo);
}

/// Collects the legal moves of a single origin square.
pub struct OriginCollector<const S: usize> {
    origin: Square<S>,
    moves: Vec<(Move<S>, MoveInfo)>,
}

impl<const S: usize> OriginCollector<S> {
    pub fn new(origin: Square<S>) -> Self {
        OriginCollector {
            origin,
            moves: vec![],
        }
    }

    pub fn into_moves(self) -> Vec<(Move<S>, MoveInfo)> {
        self.moves
    }
}

impl<const S: usize> MoveConsumer<S> for OriginCollector<S> {
    fn on_move(&mut self, _line: LineId, mv: Move<S>, info: MoveInfo) {
        if let Move::Slide { from, .. } = mv {
            if from == self.origin {
                self.moves.push((mv, info));
            }
        }
    }
}

/// Collects every legal move, optionally restricted to one color.
pub struct MoveCollector<const S: usize> {
    color: Option<Color>,
    moves: Vec<(Move<S>, MoveInfo)>,
}

impl<const S: usize> MoveCollector<S> {
    pub fn new() -> Self {
        MoveCollector {
            color: None,
            moves: vec![],
        }
    }

    pub fn for_color(color: Color) -> Self {
        MoveCollector {
            color: Some(color),
            moves: vec![],
        }
    }

    pub fn moves(&self) -> &[(Move<S>, MoveInfo)] {
        &self.moves
    }

    pub fn into_moves(self) -> Vec<(Move<S>, MoveInfo)> {
        self.moves
    }
}

impl<const S: usize> Default for MoveCollector<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const S: usize> MoveConsumer<S> for MoveCollector<S> {
    fn on_move(&mut self, _line: LineId, mv: Move<S>, info: MoveInfo) {
        if self.color.is_none() || self.color == Some(info.color) {
            self.moves.push((mv, info));
        }
    }
}

/// A counting-only consumer with exclusive-lock discipline.
///
/// `begin` hands out an owned guard and panics if one is already
/// outstanding; the guard releases the counter when dropped. Double-locking
/// is a programming error, not a recoverable condition.
#[derive(Debug, Default)]
pub struct WinningReplyCount {
    locked: bool,
    count: u32,
}

impl WinningReplyCount {
    pub const fn new() -> Self {
        WinningReplyCount {
            locked: false,
            count: 0,
        }
    }

    pub fn begin(&mut self) -> ReplyCountGuard<'_> {
        assert!(
            !self.locked,
            "the winning-reply counter is already locked by another caller"
        );
        self.locked = true;
        self.count = 0;
        ReplyCountGuard { counter: self }
    }

    /// Result of the most recent completed count.
    pub fn count(&self) -> u32 {
        assert!(!self.locked, "the winning-reply counter is still locked");
        self.count
    }
}

pub struct ReplyCountGuard<'a> {
    counter: &'a mut WinningReplyCount,
}

impl ReplyCountGuard<'_> {
    pub fn count_one(&mut self) {
        self.counter.count += 1;
    }

    pub fn total(&self) -> u32 {
        self.counter.count
    }
}

impl Drop for ReplyCountGuard<'_> {
    fn drop(&mut self) {
        self.counter.locked = false;
    }
}

impl<const S: usize> MoveConsumer<S> for ReplyCountGuard<'_> {
    fn on_move(&mut self, _line: LineId, _mv: Move<S>, _info: MoveInfo) {
        self.count_one();
    }
}

impl<const S: usize> Position<S> {
    /// Legal moves originating on `origin`, for showing a player their
    /// options.
    pub fn legal_moves_from(&mut self, origin: Square<S>) -> Vec<(Move<S>, MoveInfo)> {
        let mut collector = OriginCollector::new(origin);
        self.scan_for_moves(&mut collector);
        collector.into_moves()
    }

    /// How many of `color`'s moves from the current position would
    /// immediately end the game in their favor. `color` must be the side to
    /// move; callers probing a candidate move apply it first and unapply
    /// afterwards.
    pub fn count_winning_replies(
        &mut self,
        counter: &mut WinningReplyCount,
        color: Color,
    ) -> u32 {
        debug_assert_eq!(color, self.side_to_move());
        let mut guard = counter.begin();
        if self.game_result().is_some() {
            return guard.total();
        }
        let stones: ArrayVec<Square<S>, 128> =
            self.player(color).stones().iter().copied().collect();
        for from in stones {
            for &direction in &Direction::ALL {
                let distance = self.line_count(from, direction);
                if distance == 0 {
                    continue;
                }
                let mv = Move::Slide {
                    from,
                    direction,
                    distance,
                };
                if self.test_move(&mv).is_err() {
                    continue;
                }
                let reverse_move = self.do_move(mv);
                let winning = self.game_result() == Some(win_for(color));
                self.reverse_move(reverse_move);
                if winning {
                    guard.count_one();
                }
            }
        }
        guard.total()
    }
}
