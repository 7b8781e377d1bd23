use std::io;
use std::io::Write;

use board_game_traits::{Color, EvalPosition, GameResult, Position as PositionTrait};
use pgn_traits::PgnPosition;
use rand::seq::SliceRandom;

use lineae::move_visitor::WinningReplyCount;
use lineae::position::{Move, Position};

fn main() {
    println!("play: Play against the greedy robot");
    println!("selfplay: Watch two greedy robots play");
    println!("random: Watch a random game");
    println!("perft: Count move-tree nodes from the opening");

    let mut input = String::new();
    io::stdin().read_line(&mut input).unwrap();
    match input.trim() {
        "play" => play_human(<Position<8>>::start_position()),
        "selfplay" => selfplay(<Position<8>>::start_position()),
        "random" => random_game(<Position<8>>::start_position()),
        "perft" => {
            let mut position = <Position<8>>::start_position();
            for depth in 0..5 {
                println!("perft({}) = {}", depth, perft(&mut position, depth));
            }
        }
        s => println!("Unknown option \"{}\"", s),
    }
}

fn win_for(color: Color) -> GameResult {
    match color {
        Color::White => GameResult::WhiteWin,
        Color::Black => GameResult::BlackWin,
    }
}

/// One-ply greedy choice: prefer immediate wins, otherwise maximize the
/// static eval minus a penalty for each winning reply handed to the
/// opponent.
fn robot_move<const S: usize>(
    position: &mut Position<S>,
    counter: &mut WinningReplyCount,
) -> Option<Move<S>> {
    let us = position.side_to_move();
    let mut moves = vec![];
    position.generate_moves(&mut moves);

    let mut best: Option<(Move<S>, f32)> = None;
    for mv in moves {
        let reverse_move = position.do_move(mv);
        let score = match position.game_result() {
            Some(result) if result == win_for(us) => f32::INFINITY,
            Some(GameResult::Draw) => 0.0,
            Some(_) => f32::NEG_INFINITY,
            None => {
                let eval = match us {
                    Color::White => position.static_eval(),
                    Color::Black => -position.static_eval(),
                };
                let replies = position.count_winning_replies(counter, !us);
                eval - 2.0 * replies as f32
            }
        };
        position.reverse_move(reverse_move);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((mv, score));
        }
    }
    best.map(|(mv, _)| mv)
}

fn selfplay<const S: usize>(mut position: Position<S>) {
    let mut counter = WinningReplyCount::new();
    while position.game_result().is_none() {
        let mv = robot_move(&mut position, &mut counter).expect("no legal moves");
        print!("{} ", position.move_to_san(&mv));
        io::stdout().flush().unwrap();
        position.do_move(mv);
    }
    println!("\n{:?}\nResult: {:?}", position, position.game_result().unwrap());
}

fn random_game<const S: usize>(mut position: Position<S>) {
    let mut rng = rand::thread_rng();
    let mut moves = vec![];
    while position.game_result().is_none() {
        moves.clear();
        position.generate_moves(&mut moves);
        let mv = *moves.choose(&mut rng).expect("no legal moves");
        print!("{} ", position.move_to_san(&mv));
        position.do_move(mv);
    }
    println!("\n{:?}\nResult: {:?}", position, position.game_result().unwrap());
}

/// Play a game against the robot through stdin.
fn play_human<const S: usize>(mut position: Position<S>) {
    let mut counter = WinningReplyCount::new();
    loop {
        match position.game_result() {
            None => {
                println!("{:?}", position);
                if position.side_to_move() == Color::Black {
                    print!("Your move (e.g. B1-B3): ");
                    io::stdout().flush().unwrap();
                    let mut input = String::new();
                    io::stdin().read_line(&mut input).unwrap();
                    let mv = match position.move_from_san(input.trim()) {
                        Ok(mv) => mv,
                        Err(err) => {
                            println!("{}", err);
                            continue;
                        }
                    };
                    match position.test_move(&mv) {
                        Ok(_) => {
                            position.do_move(mv);
                        }
                        Err(reason) => println!("Illegal move: {}", reason),
                    }
                } else {
                    let mv =
                        robot_move(&mut position, &mut counter).expect("no legal moves");
                    println!("Robot plays {}", position.move_to_san(&mv));
                    position.do_move(mv);
                }
            }
            Some(result) => {
                println!("{:?}\nResult: {:?}", position, result);
                break;
            }
        }
    }
}

fn perft<const S: usize>(position: &mut Position<S>, depth: u16) -> u64 {
    if depth == 0 || position.game_result().is_some() {
        1
    } else {
        let mut moves = vec![];
        position.generate_moves(&mut moves);
        moves
            .into_iter()
            .map(|mv| {
                let reverse_move = position.do_move(mv);
                let nodes = perft(position, depth - 1);
                position.reverse_move(reverse_move);
                nodes
            })
            .sum()
    }
}
