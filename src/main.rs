//! Hot Potato headless runner
//!
//! Plays a replay file (or an idle demo from a clock seed) and prints one CSV
//! row per tick. Set `RUST_LOG=debug` to see state transitions and cues.

use std::process::ExitCode;

use hot_potato::LogCueSink;
use hot_potato::clock_seed;
use hot_potato::replay::{Replay, TraceRow};

/// Ten seconds of play at the fixed step
const DEMO_TICKS: usize = 600;

fn main() -> ExitCode {
    env_logger::init();

    let replay = match std::env::args().nth(1) {
        Some(path) => match Replay::load(&path) {
            Ok(replay) => replay,
            Err(e) => {
                eprintln!("hot-potato: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => {
            let seed = clock_seed();
            log::info!("No replay given, running idle demo with seed {}", seed);
            Replay::idle(seed, DEMO_TICKS)
        }
    };

    let mut sink = LogCueSink::new();
    let rows = replay.run(&mut sink);

    println!("{}", TraceRow::CSV_HEADER);
    for row in &rows {
        println!("{}", row.to_csv());
    }

    if let Some(last) = rows.last() {
        log::info!("Finished after {} ticks, score {}", last.tick, last.score);
    }
    ExitCode::SUCCESS
}
