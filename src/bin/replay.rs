//! Replay a game record against a fresh position and report the outcome.
//!
//! Record files hold one entry per line in the move-text encoding; blank
//! lines and lines starting with `#` are skipped. The variant comes from a
//! setup string, so randomized layouts replay identically given their seed.

use std::fs;
use std::io::{self, Read};

use board_game_traits::Position as PositionTrait;
use clap::{Arg, ArgAction, Command};
use log::{debug, info};

use lineae::position::Position;
use lineae::record::{self, RecordEntry};
use lineae::variant::Setup;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("replay")
        .about("Replay a Lines of Action game record")
        .arg(
            Arg::new("file")
                .long("file")
                .short('f')
                .env("REPLAY_FILE")
                .help("Record file to replay. Reads stdin when omitted.")
                .num_args(1),
        )
        .arg(
            Arg::new("setup")
                .long("setup")
                .short('s')
                .env("REPLAY_SETUP")
                .help("Setup string: <variantName> [<randomSeed>] [<revisionNumber>]")
                .num_args(1)
                .default_value("LOA"),
        )
        .arg(
            Arg::new("logfile")
                .long("logfile")
                .short('l')
                .help("Log debug output to this file")
                .num_args(1),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log every replayed entry to stderr")
                .action(ArgAction::SetTrue)
                .num_args(0),
        )
        .get_matches();

    let log_dispatcher = fern::Dispatch::new().format(|out, message, record| {
        out.finish(format_args!(
            "{}[{}][{}] {}",
            chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
            record.target(),
            record.level(),
            message
        ))
    });
    let stderr_level = if matches.get_flag("verbose") {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    if let Some(log_file) = matches.get_one::<String>("logfile") {
        log_dispatcher
            .chain(
                fern::Dispatch::new()
                    .level(log::LevelFilter::Debug)
                    .chain(fern::log_file(log_file)?),
            )
            .chain(fern::Dispatch::new().level(stderr_level).chain(io::stderr()))
            .apply()
            .unwrap();
    } else {
        log_dispatcher
            .level(stderr_level)
            .chain(io::stderr())
            .apply()
            .unwrap();
    }

    let input = match matches.get_one::<String>("file") {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let setup: Setup = matches.get_one::<String>("setup").unwrap().parse()?;
    info!("replaying with setup \"{}\"", setup);

    match setup.size() {
        7 => run_replay::<7>(&setup, &input),
        8 => run_replay::<8>(&setup, &input),
        size => Err(format!("Unsupported board size {}", size).into()),
    }
}

fn run_replay<const S: usize>(
    setup: &Setup,
    input: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut position = <Position<S>>::from_setup(setup)?;
    let entries = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(record::parse_entry)
        .collect::<Result<Vec<RecordEntry<S>>, _>>()?;
    debug!("parsed {} record entries", entries.len());

    record::replay(&mut position, entries)?;

    println!("{:?}", position);
    println!("Digest: {:016x}", position.digest());
    match position.game_result() {
        Some(result) => println!("Result: {:?}", result),
        None => println!("Game in progress, move number {}", position.move_number()),
    }
    Ok(())
}
