use std::collections::HashSet;

use board_game_traits::{Color, Position as PositionTrait};
use pgn_traits::PgnPosition;
use rand::seq::SliceRandom;

use crate::move_visitor::MoveCollector;
use crate::position::{
    squares_iterator, Direction, Move, MoveError, Position, Square,
};
use crate::variant::Setup;

/// Every (origin, destination) pair that `test_move` accepts for `color`,
/// found by trying all pairs of squares. `color` must be the side to move.
fn brute_force_slides<const S: usize>(
    position: &Position<S>,
    color: Color,
) -> HashSet<(Square<S>, Square<S>)> {
    assert_eq!(position.side_to_move(), color);
    let mut slides = HashSet::new();
    for from in squares_iterator::<S>() {
        for to in squares_iterator::<S>() {
            if from == to {
                continue;
            }
            if let Ok(mv) = Move::slide_between(from, to) {
                if position.test_move(&mv).is_ok() {
                    slides.insert((from, to));
                }
            }
        }
    }
    slides
}

fn scanned_slides<const S: usize>(
    position: &mut Position<S>,
    color: Color,
) -> HashSet<(Square<S>, Square<S>)> {
    let mut collector = MoveCollector::for_color(color);
    position.scan_for_moves(&mut collector);
    collector
        .into_moves()
        .into_iter()
        .map(|(mv, _)| match mv {
            Move::Slide { from, .. } => (from, mv.destination().unwrap()),
            _ => panic!("scan produced a non-spatial move"),
        })
        .collect()
}

#[test]
fn scan_agrees_with_brute_force_test() {
    let mut rng = rand::thread_rng();
    let mut position = <Position<8>>::start_position();
    let mut moves = vec![];

    for _ in 0..60 {
        if position.game_result().is_some() {
            break;
        }
        let side_to_move = position.side_to_move();
        for color in [Color::Black, Color::White] {
            position.do_move(Move::Start(color));
            let expected = brute_force_slides(&position, color);
            let scanned = scanned_slides(&mut position, color);
            assert_eq!(
                scanned, expected,
                "scan and brute force disagree for {:?} on\n{:?}",
                color, position
            );
        }
        position.do_move(Move::Start(side_to_move));

        moves.clear();
        position.generate_moves(&mut moves);
        let mv = *moves.choose(&mut rng).unwrap();
        position.do_move(mv);
    }
}

#[test]
fn generate_moves_matches_scan_test() {
    let mut position = <Position<8>>::start_position();
    let color = position.side_to_move();

    let mut generated = vec![];
    position.generate_moves(&mut generated);
    let generated: HashSet<Move<8>> = generated.into_iter().collect();

    let mut collector = MoveCollector::for_color(color);
    position.scan_for_moves(&mut collector);
    let scanned: HashSet<Move<8>> = collector.into_moves().into_iter().map(|(mv, _)| mv).collect();

    assert_eq!(generated, scanned);
}

#[test]
fn scan_cache_is_stable_across_make_unmake_test() {
    let mut position = <Position<8>>::start_position();
    let before = scanned_slides(&mut position, Color::Black);

    let mv = position.move_from_san("B1-B3").unwrap();
    let reverse_move = position.do_move(mv);
    position.reverse_move(reverse_move);

    let after = scanned_slides(&mut position, Color::Black);
    assert_eq!(before, after);
}

#[test]
fn move_rejection_test() {
    let position = <Position<8>>::start_position();

    // Travel length must equal the line's stone count
    assert_eq!(
        position.test_move(&Move::Slide {
            from: Square::from_file_rank(1, 0), // B1
            direction: Direction::North,
            distance: 1,
        }),
        Err(MoveError::WrongCount)
    );
    // C1 moving east by the row count of 6 leaves the board
    assert_eq!(
        position.test_move(&Move::Slide {
            from: Square::from_file_rank(2, 0), // C1
            direction: Direction::East,
            distance: 6,
        }),
        Err(MoveError::OffBoard)
    );
    // Empty origin
    assert_eq!(
        position.test_move(&Move::Slide {
            from: Square::from_file_rank(3, 3), // D4
            direction: Direction::North,
            distance: 1,
        }),
        Err(MoveError::FromEmpty)
    );
    // White stone while Black is to move
    assert_eq!(
        position.test_move(&Move::Slide {
            from: Square::from_file_rank(0, 1), // A2
            direction: Direction::East,
            distance: 2,
        }),
        Err(MoveError::WrongColor)
    );
    // B1 to C3 is not on any line
    assert_eq!(
        Move::<8>::slide_between(Square::from_file_rank(1, 0), Square::from_file_rank(2, 2)),
        Err(MoveError::BadDirection)
    );
    assert_eq!(
        position.line_stone_count(Square::from_file_rank(1, 0), 1, 2),
        Err(MoveError::BadDirection)
    );
}

#[test]
fn land_on_own_and_skip_over_enemy_test() {
    let setup = Setup::custom(vec![
        (3, 1, Color::Black), // D2
        (3, 3, Color::Black), // D4
        (0, 7, Color::Black), // A8
        (4, 1, Color::White), // E2
        (6, 1, Color::White), // G2
    ]);
    let position = <Position<8>>::from_setup(&setup).unwrap();

    // Column D holds two stones; D2 north by 2 lands on its own stone
    assert_eq!(
        position.test_move(&Move::Slide {
            from: Square::from_file_rank(3, 1),
            direction: Direction::North,
            distance: 2,
        }),
        Err(MoveError::LandOnOwn)
    );
    // Rank 2 holds three stones; D2 east by 3 would jump the white E2
    assert_eq!(
        position.test_move(&Move::Slide {
            from: Square::from_file_rank(3, 1),
            direction: Direction::East,
            distance: 3,
        }),
        Err(MoveError::SkipOverEnemy)
    );
}

#[test]
fn boundary_diagonals_hold_no_moves_test() {
    let setup = Setup::custom(vec![
        (0, 0, Color::Black), // A1, alone on both corner diagonals
        (4, 6, Color::Black), // E7
        (2, 3, Color::White), // C4
        (6, 5, Color::White), // G6
    ]);
    let mut position = <Position<8>>::from_setup(&setup).unwrap();

    let moves = position.legal_moves_from(Square::from_file_rank(0, 0));
    for (mv, _) in &moves {
        if let Move::Slide { direction, .. } = mv {
            assert!(
                !matches!(direction, Direction::SouthEast | Direction::NorthWest),
                "A1 found a move along its single-cell diagonal: {:?}",
                mv
            );
        }
    }
}

#[test]
fn pass_when_blocked_in_test() {
    let setup = Setup::custom(vec![
        (0, 0, Color::Black), // A1
        (7, 7, Color::Black), // H8
        (0, 1, Color::White), // A2
        (1, 0, Color::White), // B1
        (1, 1, Color::White), // B2
        (6, 7, Color::White), // G8
        (7, 6, Color::White), // H7
        (6, 6, Color::White), // G7
    ]);
    let mut position = <Position<8>>::from_setup(&setup).unwrap();
    assert_eq!(position.side_to_move(), Color::Black);
    assert!(!position.has_any_slide(Color::Black));

    let mut moves = vec![];
    position.generate_moves(&mut moves);
    assert_eq!(moves, vec![Move::Pass]);

    assert_eq!(
        position.test_move(&Move::Pass).map(|info| info.color),
        Ok(Color::Black)
    );
    position.do_move(Move::Pass);
    assert_eq!(position.side_to_move(), Color::White);
    assert!(position.has_any_slide(Color::White));

    // With moves available, passing is rejected
    assert_eq!(
        position.test_move(&Move::Pass),
        Err(MoveError::PassNotAllowed)
    );
}

#[test]
fn legal_moves_from_origin_test() {
    let mut position = <Position<8>>::start_position();
    let origin = Square::from_file_rank(1, 0); // B1
    let moves = position.legal_moves_from(origin);
    let destinations: HashSet<Square<8>> = moves
        .iter()
        .map(|(mv, _)| mv.destination().unwrap())
        .collect();
    let expected: HashSet<Square<8>> = [
        Square::from_file_rank(7, 0), // H1, east over own stones
        Square::from_file_rank(1, 2), // B3
        Square::from_file_rank(2, 1), // C2
    ]
    .into_iter()
    .collect();
    assert_eq!(destinations, expected);
}
