use std::io;

use anyhow::Result;

pub mod console;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // PAIRS_CHESS_SEED makes random seating reproducible.
    let seed = std::env::var("PAIRS_CHESS_SEED")
        .ok()
        .and_then(|s| s.parse().ok());

    let mut console = console::Console::new(seed);
    let stdin = io::stdin();
    console.run(stdin.lock(), &mut io::stdout())
}
