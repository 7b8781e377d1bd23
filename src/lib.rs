//! A rules engine for the Lines of Action family of board games.
//!
//! The engine keeps legal moves in an incrementally invalidated cache keyed
//! by board lines, answers the single-group win condition with an
//! epoch-stamped flood fill, and maintains a quad-count Euler number and a
//! Zobrist-style position hash across arbitrarily long make/unmake
//! sequences. Search drivers clone a `Position` and drive it through
//! `do_move`/`reverse_move`/`static_eval`.

pub mod move_visitor;
pub mod position;
pub mod record;
mod tests;
mod value_eval;
pub mod variant;
