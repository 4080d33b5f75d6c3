//! A line-oriented console for driving a game from stdin.
//!
//! Squares are written `x,y` with the origin at the top-left corner. Players are numeric ids.

use anyhow::{Context, Result, anyhow, bail};
use engine::config::Config;
use engine::constants::{ALL_SEATS, Seat};
use engine::fen::Fen;
use engine::game::{Game, PlayerId};
use engine::square::{checked_idx, to_xy};
use log::{debug, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::{BufRead, Write};

const HELP: &str = "\
commands:
  new [config-json]          create a game; player 1 is the creator
  join <player> <seat>       seats: top_white top_black bottom_white bottom_black
  start [fen]                start from the standard layout or a given board
  show                       print the board
  fen                        print the encoded board
  targets <x,y>              legal destinations for a piece
  move <player> <x,y> <x,y>  submit a move for this turn
  pending                    list submitted moves
  resolve                    resolve the turn and print its step trace
  quit";

pub struct Console {
    game: Option<Game>,
    rng: StdRng,
}

impl Console {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { game: None, rng }
    }

    /// Reads commands until `quit` or end of input. Command errors are reported and the loop
    /// carries on; only I/O failures end it early.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "--- Pairs Chess ---")?;
        writeln!(out, "Type 'help' for commands.")?;

        for line in input.lines() {
            let line = line.context("reading command")?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            debug!("received: {line}");
            if line == "quit" || line == "exit" {
                break;
            }
            match self.execute(line) {
                Ok(reply) => writeln!(out, "{reply}")?,
                Err(err) if is_rejection(&err) => {
                    debug!("{line}: rejected: {err:#}");
                    writeln!(out, "rejected: {err:#}")?;
                }
                Err(err) => {
                    warn!("{line}: {err:#}");
                    writeln!(out, "error: {err:#}")?;
                }
            }
        }
        Ok(())
    }

    pub fn execute(&mut self, line: &str) -> Result<String> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = parts.split_first() else {
            return Ok(String::new());
        };

        match command {
            "help" => Ok(HELP.to_string()),
            "new" => {
                let config = if args.is_empty() {
                    Config::default()
                } else {
                    serde_json::from_str(&args.join(" ")).context("parsing config")?
                };
                let game = Game::new(config, PlayerId(1), &mut self.rng)?;
                let seats = game.seats_of(PlayerId(1));
                self.game = Some(game);
                Ok(format!("player 1 sits at {}", seat_names(&seats)))
            }
            "join" => {
                let [player, seat] = args else {
                    bail!("usage: join <player> <seat>");
                };
                let player = parse_player(player)?;
                let seat = parse_seat(seat)?;
                let game = self.game_mut()?;
                game.join(player, seat)?;
                Ok(format!(
                    "player {} sits at {}",
                    player.0,
                    seat_names(&game.seats_of(player))
                ))
            }
            "start" => {
                let game = self.game_mut()?;
                match args {
                    [] => game.start()?,
                    [fen] => game.start_with(Fen::from_fen(fen)?)?,
                    _ => bail!("usage: start [fen]"),
                }
                Ok(format!("turn {}", game.turn()))
            }
            "show" => {
                let game = self.game()?;
                let fen = game.fen().ok_or(engine::Error::NotStarted)?;
                let color = game
                    .current_color()
                    .map(|c| format!("{c:?}"))
                    .unwrap_or_default();
                Ok(format!("{fen}\nturn {} ({color} to move)", game.turn()))
            }
            "fen" => {
                let fen = self.game()?.fen().ok_or(engine::Error::NotStarted)?;
                Ok(fen.to_fen())
            }
            "targets" => {
                let [square] = args else {
                    bail!("usage: targets <x,y>");
                };
                let game = self.game()?;
                let src = parse_square(square, game.config().board_size)?;
                let size = game.config().board_size;
                let targets: Vec<String> = game
                    .legal_targets(src)
                    .into_iter()
                    .map(|sq| square_name(sq, size))
                    .collect();
                Ok(targets.join(" "))
            }
            "move" => {
                let [player, src, dest] = args else {
                    bail!("usage: move <player> <x,y> <x,y>");
                };
                let player = parse_player(player)?;
                let game = self.game_mut()?;
                let size = game.config().board_size;
                let src = parse_square(src, size)?;
                let dest = parse_square(dest, size)?;
                match game.submit_move(player, src, dest)? {
                    Some(old) => Ok(format!(
                        "replaced {} -> {}",
                        square_name(old.src(), size),
                        square_name(old.dest(), size)
                    )),
                    None => Ok("ok".to_string()),
                }
            }
            "pending" => {
                let game = self.game()?;
                let size = game.config().board_size;
                let lines: Vec<String> = game
                    .pending()
                    .iter()
                    .map(|p| {
                        format!(
                            "player {}: {} -> {}",
                            p.player.0,
                            square_name(p.mv.src(), size),
                            square_name(p.mv.dest(), size)
                        )
                    })
                    .collect();
                Ok(lines.join("\n"))
            }
            "resolve" => {
                let resolution = self.game_mut()?.resolve_turn()?;
                let trace = serde_json::to_string(&resolution.trace)?;
                Ok(format!(
                    "{}\nturn {}\n{trace}",
                    resolution.fen.to_fen(),
                    resolution.turn
                ))
            }
            other => Err(anyhow!("unknown command '{other}'")),
        }
    }

    fn game(&self) -> Result<&Game> {
        self.game.as_ref().context("no game; use 'new' first")
    }

    fn game_mut(&mut self) -> Result<&mut Game> {
        self.game.as_mut().context("no game; use 'new' first")
    }
}

/// A bad move from a player, as opposed to a usage or engine error.
fn is_rejection(err: &anyhow::Error) -> bool {
    err.downcast_ref::<engine::Error>()
        .is_some_and(engine::Error::is_rejection)
}

fn parse_player(s: &str) -> Result<PlayerId> {
    s.parse()
        .map(PlayerId)
        .with_context(|| format!("bad player id '{s}'"))
}

fn parse_seat(s: &str) -> Result<Seat> {
    ALL_SEATS
        .into_iter()
        .find(|seat| seat.name() == s)
        .ok_or_else(|| anyhow!("unknown seat '{s}'"))
}

fn parse_square(s: &str, size: usize) -> Result<usize> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("squares are written x,y, got '{s}'"))?;
    let x: isize = x.trim().parse().with_context(|| format!("bad square '{s}'"))?;
    let y: isize = y.trim().parse().with_context(|| format!("bad square '{s}'"))?;
    checked_idx(x, y, size).ok_or_else(|| anyhow!("square '{s}' is off the board"))
}

fn square_name(sq: usize, size: usize) -> String {
    let (x, y) = to_xy(sq, size);
    format!("{x},{y}")
}

fn seat_names(seats: &[Seat]) -> String {
    seats.iter().map(|s| s.name()).collect::<Vec<_>>().join(", ")
}
