use board_game_traits::{Color, Position as PositionTrait};
use pgn_traits::PgnPosition;

use crate::position::{Direction, Move, Position, Square};
use crate::record::{self, RecordEntry, Verb};
use crate::tests::do_moves_and_check_validity;
use crate::variant::Setup;

#[test]
fn cell_text_roundtrip_test() {
    for square in crate::position::squares_iterator::<8>() {
        let text = square.to_string();
        assert_eq!(Square::parse_cell(&text).unwrap(), square);
    }
    assert_eq!(
        Square::<8>::parse_cell("A1").unwrap(),
        Square::from_file_rank(0, 0)
    );
    assert_eq!(
        Square::<8>::parse_cell("H8").unwrap(),
        Square::from_file_rank(7, 7)
    );
    assert!(Square::<8>::parse_cell("I1").is_err());
    assert!(Square::<8>::parse_cell("A9").is_err());
    assert!(Square::<8>::parse_cell("A0").is_err());
    assert!(Square::<8>::parse_cell("11").is_err());
}

#[test]
fn move_token_roundtrip_test() {
    let position = <Position<8>>::start_position();
    let mv = Move::<8>::Slide {
        from: Square::from_file_rank(1, 0),
        direction: Direction::North,
        distance: 2,
    };
    assert_eq!(position.move_to_san(&mv), "B1-B3");
    assert_eq!(position.move_from_san("B1-B3").unwrap(), mv);
    // Both separators parse to the same slide
    assert_eq!(position.move_from_san("B1:B3").unwrap(), mv);

    assert_eq!(
        position.move_from_san("D1-^^").unwrap(),
        Move::Vacate(Square::from_file_rank(3, 0))
    );
    assert_eq!(position.move_from_san("Pass").unwrap(), Move::Pass);
    assert_eq!(position.move_from_san("Resign").unwrap(), Move::Resign);
    assert!(position.move_from_san("Castle").is_err());
    assert!(position.move_from_san("B1-C3").is_err());
}

#[test]
fn capture_uses_colon_test() {
    let setup = Setup::custom(vec![
        (3, 1, Color::Black), // D2
        (5, 1, Color::Black), // F2
        (3, 3, Color::White), // D4
        (5, 6, Color::White), // F7
        (0, 7, Color::White), // A8
    ]);
    let position = <Position<8>>::from_setup(&setup).unwrap();
    let mv = Move::<8>::Slide {
        from: Square::from_file_rank(3, 1),
        direction: Direction::North,
        distance: 2,
    };
    assert_eq!(position.move_to_san(&mv), "D2:D4");
}

#[test]
fn record_entry_roundtrip_test() {
    let entries: Vec<(&str, RecordEntry<8>)> = vec![
        (
            "1 Start 0",
            RecordEntry {
                number: Some(1),
                player: 0,
                verb: Verb::Start,
            },
        ),
        (
            "2 B1-B3 0",
            RecordEntry {
                number: Some(2),
                player: 0,
                verb: Verb::Slide {
                    from: Square::from_file_rank(1, 0),
                    to: Square::from_file_rank(1, 2),
                    capture: false,
                },
            },
        ),
        (
            "Select 1 C2",
            RecordEntry {
                number: None,
                player: 1,
                verb: Verb::Select(Some(Square::from_file_rank(2, 1))),
            },
        ),
        (
            "Select 1 null",
            RecordEntry {
                number: None,
                player: 1,
                verb: Verb::Select(None),
            },
        ),
        (
            "7 D1-^^ 0",
            RecordEntry {
                number: Some(7),
                player: 0,
                verb: Verb::Vacate(Square::from_file_rank(3, 0)),
            },
        ),
        (
            "Pass 1",
            RecordEntry {
                number: None,
                player: 1,
                verb: Verb::Pass,
            },
        ),
        (
            "Resign 0",
            RecordEntry {
                number: None,
                player: 0,
                verb: Verb::Resign,
            },
        ),
    ];
    for (text, expected) in entries {
        let parsed: RecordEntry<8> = record::parse_entry(text).unwrap();
        assert_eq!(parsed, expected, "parsing \"{}\"", text);
        assert_eq!(
            record::parse_entry::<8>(&record::format_entry(&parsed)).unwrap(),
            parsed
        );
    }
}

#[test]
fn record_rejects_bad_entries_test() {
    assert!(record::parse_entry::<8>("Levitate 0").is_err());
    assert!(record::parse_entry::<8>("B1-B3 2").is_err());
    assert!(record::parse_entry::<8>("B1-C3 0").is_err());
    assert!(record::parse_entry::<8>("B1-B3 0 extra").is_err());
    assert!(record::parse_entry::<8>("").is_err());
}

#[test]
fn record_replay_test() {
    let mut position = <Position<8>>::start_position();
    let entries: Vec<RecordEntry<8>> = ["1 Start 0", "2 B1-B3 0", "Select 1 A2", "3 A2-C2 1"]
        .iter()
        .map(|line| record::parse_entry(line).unwrap())
        .collect();
    record::replay(&mut position, entries).unwrap();
    assert_eq!(position.move_number(), 3);
    assert_eq!(position.side_to_move(), Color::Black);
}

#[test]
fn record_replay_rejects_out_of_turn_test() {
    let mut position = <Position<8>>::start_position();
    let entries: Vec<RecordEntry<8>> = vec![record::parse_entry("A2-C2 1").unwrap()];
    assert!(record::replay(&mut position, entries).is_err());
}

#[test]
fn fen_roundtrip_test() {
    let mut position = <Position<8>>::start_position();
    do_moves_and_check_validity(&mut position, &["B1-B3", "A2-C2"]);

    let fen = position.to_fen();
    let restored = <Position<8>>::from_fen(&fen).unwrap();
    assert_eq!(restored, position);
    assert_eq!(restored.digest(), position.digest());
    assert_eq!(restored.to_fen(), fen);
}

#[test]
fn digest_is_history_independent_test() {
    // The same layout reached through different stone orders
    let forward = Setup::custom(vec![
        (3, 3, Color::Black),
        (5, 5, Color::Black),
        (0, 0, Color::White),
        (6, 2, Color::White),
    ]);
    let backward = Setup::custom(vec![
        (6, 2, Color::White),
        (5, 5, Color::Black),
        (0, 0, Color::White),
        (3, 3, Color::Black),
    ]);
    let first = <Position<8>>::from_setup(&forward).unwrap();
    let second = <Position<8>>::from_setup(&backward).unwrap();
    assert_eq!(first.digest(), second.digest());

    // A move cycle that restores the layout restores the digest
    let mut position = <Position<8>>::start_position();
    let initial_digest = position.digest();
    do_moves_and_check_validity(&mut position, &["B1-B3", "A2-C2", "B3-B1", "C2-A2"]);
    assert_eq!(position.digest(), initial_digest);
}
