#[cfg(test)]
mod move_gen_tests;
#[cfg(test)]
mod notation_tests;
#[cfg(test)]
mod variant_tests;

#[cfg(test)]
use board_game_traits::{Color, Position as PositionTrait};
#[cfg(test)]
use pgn_traits::PgnPosition;

#[cfg(test)]
use crate::position::{squares_iterator, LineFamily, Position, QuadCounts};

/// Check every incrementally maintained structure against a from-scratch
/// recomputation.
#[cfg(test)]
fn assert_invariants<const S: usize>(position: &Position<S>) {
    let stones_on_board = squares_iterator::<S>()
        .filter(|&square| position.cell(square).is_stone())
        .count() as u32;
    for family in LineFamily::ALL {
        assert_eq!(
            position.family_total(family),
            stones_on_board,
            "{:?} counts disagree with the board\n{:?}",
            family,
            position
        );
    }
    assert_eq!(
        position.hash(),
        position.hash_from_scratch(),
        "incremental hash drifted\n{:?}",
        position
    );
    for color in [Color::White, Color::Black] {
        assert_eq!(
            position.player(color).quads(),
            QuadCounts::from_scratch(position.cells(), color),
            "{:?} quad counts drifted\n{:?}",
            color,
            position
        );
        let stones_of_color = squares_iterator::<S>()
            .filter(|&square| position.cell(square).is_stone_of(color))
            .count();
        assert_eq!(position.player(color).stone_count(), stones_of_color);
    }
}

#[cfg(test)]
fn do_moves_and_check_validity<const S: usize>(position: &mut Position<S>, move_strings: &[&str]) {
    let mut moves = vec![];
    for mv_san in move_strings.iter() {
        let mv = position.move_from_san(mv_san).unwrap();
        position.generate_moves(&mut moves);
        assert!(
            moves.contains(&mv),
            "Move {} was not among legal moves: {:?}\n{:?}",
            position.move_to_san(&mv),
            moves,
            position
        );
        position.do_move(mv);
        moves.clear();
    }
}
