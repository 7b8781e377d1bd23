use board_game_traits::{Color, Position as PositionTrait};
use pgn_traits::PgnPosition;

use crate::position::{Cell, Direction, Move, MoveError, Position, Square};
use crate::tests::{assert_invariants, do_moves_and_check_validity};
use crate::variant::{Setup, Variant, WinCondition};

#[test]
fn setup_string_parse_test() {
    let setup: Setup = "LOA".parse().unwrap();
    assert_eq!(setup.variant, Variant::Standard);
    assert_eq!(setup.size(), 8);

    let setup: Setup = "Scrambled 42".parse().unwrap();
    assert_eq!(setup.variant, Variant::Scrambled);
    assert_eq!(setup.seed, Some(42));

    let setup: Setup = "Random 7 3".parse().unwrap();
    assert_eq!(setup.variant, Variant::Random);
    assert_eq!(setup.seed, Some(7));
    assert_eq!(setup.revision, Some(3));

    let setup: Setup = "LOAP".parse().unwrap();
    assert_eq!(setup.variant, Variant::PointRace);
    assert_eq!(setup.size(), 7);
    assert!(matches!(
        setup.rules().win,
        WinCondition::PointRace { .. }
    ));

    assert!("Quantum".parse::<Setup>().is_err());
    assert!("Scrambled notanumber".parse::<Setup>().is_err());
    assert!("LOA 1 2 3".parse::<Setup>().is_err());
    assert!("".parse::<Setup>().is_err());
}

#[test]
fn setup_string_display_roundtrip_test() {
    for text in ["LOA", "Scrambled 42", "Random 7 3", "LOAP"] {
        let setup: Setup = text.parse().unwrap();
        assert_eq!(setup.to_string(), text);
    }
}

#[test]
fn seeded_layouts_are_reproducible_test() {
    for variant in [Variant::Scrambled, Variant::Parachute, Variant::Random] {
        let first =
            <Position<8>>::from_setup(&Setup::with_seed(variant.clone(), 42)).unwrap();
        let second =
            <Position<8>>::from_setup(&Setup::with_seed(variant.clone(), 42)).unwrap();
        assert_eq!(first.digest(), second.digest(), "{:?}", variant);
        assert_invariants(&first);

        // Other seeds produce other layouts
        let digests: Vec<u64> = (1..9)
            .map(|seed| {
                <Position<8>>::from_setup(&Setup::with_seed(variant.clone(), seed))
                    .unwrap()
                    .digest()
            })
            .collect();
        assert!(
            digests.iter().any(|&digest| digest != first.digest()),
            "{:?} layouts ignore the seed",
            variant
        );
    }
}

#[test]
fn scrambled_keeps_the_census_test() {
    let position =
        <Position<8>>::from_setup(&Setup::with_seed(Variant::Scrambled, 11)).unwrap();
    assert_eq!(position.player(Color::Black).stone_count(), 12);
    assert_eq!(position.player(Color::White).stone_count(), 12);
    // Stones stay on the edge ring
    for &square in position
        .player(Color::Black)
        .stones()
        .iter()
        .chain(position.player(Color::White).stones())
    {
        assert!(
            square.file() == 0
                || square.file() == 7
                || square.rank() == 0
                || square.rank() == 7
        );
    }
}

#[test]
fn parachute_drops_inside_test() {
    let position =
        <Position<8>>::from_setup(&Setup::with_seed(Variant::Parachute, 5)).unwrap();
    assert_eq!(position.player(Color::Black).stone_count(), 12);
    for color in [Color::Black, Color::White] {
        for &square in position.player(color).stones() {
            assert!(square.file() > 0 && square.file() < 7);
            assert!(square.rank() > 0 && square.rank() < 7);
        }
    }
    assert_invariants(&position);
}

#[test]
fn scorched_move_scars_the_origin_test() {
    let setup: Setup = "Scorched".parse().unwrap();
    let mut position = <Position<8>>::from_setup(&setup).unwrap();
    assert!(position.rules().scars);

    let mv = position.move_from_san("B1-B3").unwrap();
    let reverse_move = position.do_move(mv);
    assert_eq!(position.cell(Square::from_file_rank(1, 0)), Cell::Blocked);
    // The scar carries no stone, so the scan ignores it but paths do not
    assert_invariants(&position);

    position.reverse_move(reverse_move);
    assert_eq!(position.cell(Square::from_file_rank(1, 0)), Cell::Empty);
    assert_invariants(&position);
}

#[test]
fn scars_block_paths_and_destinations_test() {
    let setup: Setup = "Scorched".parse().unwrap();
    let mut position = <Position<8>>::from_setup(&setup).unwrap();
    // Scar B1 and D1, ending with Black to move again
    do_moves_and_check_validity(&mut position, &["B1-B3", "A2-C2", "D1-D3", "C2-A2"]);
    assert_invariants(&position);

    // Rank 1 now holds C1, E1, F1 and G1. E1 west by 4 crosses the D1 scar.
    assert_eq!(
        position.test_move(&Move::Slide {
            from: Square::from_file_rank(4, 0), // E1
            direction: Direction::West,
            distance: 4,
        }),
        Err(MoveError::BlockedPath)
    );
    // B3 south by the file count of 2 lands on the B1 scar
    assert_eq!(
        position.test_move(&Move::Slide {
            from: Square::from_file_rank(1, 2), // B3
            direction: Direction::South,
            distance: 2,
        }),
        Err(MoveError::BlockedDestination)
    );
}

#[test]
fn point_race_capture_scores_test() {
    let setup: Setup = "LOAP".parse().unwrap();
    let mut position = <Position<7>>::from_setup(&setup).unwrap();
    assert!(position.rules().vacate);

    // C1 north-west by 2 captures A3
    let mv = position.move_from_san("C1:A3").unwrap();
    let info = position.test_move(&mv).unwrap();
    assert!(info.capture);
    let reverse_move = position.do_move(mv);
    assert_eq!(position.player(Color::Black).points(), 1);
    assert_eq!(position.player(Color::White).points(), 0);
    assert_invariants(&position);

    position.reverse_move(reverse_move);
    assert_eq!(position.player(Color::Black).points(), 0);
    assert_invariants(&position);
}

#[test]
fn vacate_move_test() {
    let setup: Setup = "LOAP".parse().unwrap();
    let mut position = <Position<7>>::from_setup(&setup).unwrap();

    let square = Square::from_file_rank(1, 0); // B1
    let mv = Move::Vacate(square);
    assert!(position.test_move(&mv).is_ok());
    let reverse_move = position.do_move(mv);
    assert_eq!(position.cell(square), Cell::Empty);
    assert_eq!(position.player(Color::Black).stone_count(), 9);
    assert_invariants(&position);

    position.reverse_move(reverse_move);
    assert_eq!(position.cell(square), Cell::Stone(Color::Black));
    assert_invariants(&position);

    // Vacate is variant-gated
    let standard = <Position<8>>::start_position();
    assert_eq!(
        standard.test_move(&Move::Vacate(Square::from_file_rank(1, 0))),
        Err(MoveError::VacateNotAllowed)
    );
}
