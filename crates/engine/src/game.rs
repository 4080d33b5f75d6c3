//! A game: seats, turn counter, current board and the moves pending for this turn.

use crate::config::Config;
use crate::constants::{ALL_SEATS, Color, Seat, Team, initial_layout};
use crate::error::{Error, Result};
use crate::fen::Fen;
use crate::legality::{self, Mover, Variant};
use crate::pending::PendingMoves;
use crate::r#move::Move;
use crate::resolve::{Resolution, Resolver};
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

/// Color that moves on `turn`: none before the game starts, then White on odd turns and
/// Black on even ones.
pub fn active_color(turn: u32) -> Option<Color> {
    match turn {
        0 => None,
        t if t % 2 == 1 => Some(Color::White),
        _ => Some(Color::Black),
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    config: Config,
    variant: Variant,
    seats: [Option<PlayerId>; 4],
    turn: u32,
    fen: Option<Fen>,
    pending: PendingMoves,
}

impl Game {
    /// Creates an unstarted game and seats its creator on the Top team.
    ///
    /// With two players the creator controls both Top colors; with four they take the Top
    /// seat of the color chosen by `config.play_as`.
    pub fn new<R: Rng + ?Sized>(config: Config, creator: PlayerId, rng: &mut R) -> Result<Self> {
        let variant = config.validate()?;
        let mut seats = [None; 4];
        match variant {
            Variant::TwoPlayer => {
                seats[Seat::TopWhite.idx()] = Some(creator);
                seats[Seat::TopBlack.idx()] = Some(creator);
            }
            Variant::FourPlayer => {
                let color = config.play_as.pick(rng);
                seats[Seat::new(Team::Top, color).idx()] = Some(creator);
            }
        }
        debug!("new {:?} game on a {}x{} board", variant, config.board_size, config.board_size);
        Ok(Self {
            config,
            variant,
            seats,
            turn: 0,
            fen: None,
            pending: PendingMoves::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn current_color(&self) -> Option<Color> {
        active_color(self.turn)
    }

    pub fn fen(&self) -> Option<&Fen> {
        self.fen.as_ref()
    }

    pub fn pending(&self) -> &PendingMoves {
        &self.pending
    }

    pub fn seat(&self, seat: Seat) -> Option<PlayerId> {
        self.seats[seat.idx()]
    }

    pub fn seats_of(&self, player: PlayerId) -> Vec<Seat> {
        ALL_SEATS
            .into_iter()
            .filter(|s| self.seat(*s) == Some(player))
            .collect()
    }

    pub fn team_of(&self, player: PlayerId) -> Option<Team> {
        self.seats_of(player).first().map(|s| s.team())
    }

    pub fn colors_of(&self, player: PlayerId) -> Vec<Color> {
        let mut colors: Vec<Color> = self.seats_of(player).iter().map(|s| s.color()).collect();
        colors.sort();
        colors.dedup();
        colors
    }

    /// Distinct players seated on `team`.
    pub fn players(&self, team: Team) -> Vec<PlayerId> {
        let mut players: Vec<PlayerId> = ALL_SEATS
            .into_iter()
            .filter(|s| s.team() == team)
            .filter_map(|s| self.seat(s))
            .collect();
        players.dedup();
        players
    }

    /// Seats `player`. In a two-player game this claims both seats of the seat's team.
    pub fn join(&mut self, player: PlayerId, seat: Seat) -> Result<()> {
        if self.turn > 0 {
            return Err(Error::AlreadyStarted);
        }
        if self.team_of(player).is_some_and(|t| t != seat.team()) {
            return Err(Error::OppositeTeams);
        }

        let claimed: Vec<Seat> = match self.variant {
            Variant::TwoPlayer => ALL_SEATS
                .into_iter()
                .filter(|s| s.team() == seat.team())
                .collect(),
            Variant::FourPlayer => vec![seat],
        };
        if let Some(taken) = claimed
            .iter()
            .find(|s| self.seat(**s).is_some_and(|p| p != player))
        {
            return Err(Error::SeatTaken(*taken));
        }

        for s in claimed {
            self.seats[s.idx()] = Some(player);
        }
        Ok(())
    }

    /// Starts from the standard layout for the board size.
    pub fn start(&mut self) -> Result<()> {
        let layout = initial_layout(self.config.board_size)
            .ok_or(Error::UnsupportedBoardSize(self.config.board_size))?;
        self.start_with(Fen::from_fen(layout)?)
    }

    /// Starts from a given position. Every seat must be filled.
    pub fn start_with(&mut self, fen: Fen) -> Result<()> {
        if self.turn > 0 {
            return Err(Error::AlreadyStarted);
        }
        if fen.size() != self.config.board_size {
            return Err(Error::UnsupportedBoardSize(fen.size()));
        }
        let missing: Vec<&str> = ALL_SEATS
            .into_iter()
            .filter(|s| self.seat(*s).is_none())
            .map(Seat::name)
            .collect();
        if !missing.is_empty() {
            return Err(Error::NotEnoughPlayers {
                missing: missing.join(", "),
            });
        }

        self.fen = Some(fen);
        self.turn = 1;
        self.pending.clear();
        info!("game started");
        Ok(())
    }

    /// Legal destinations for the piece on `src`, for move hints.
    pub fn legal_targets(&self, src: usize) -> Vec<usize> {
        self.fen
            .as_ref()
            .map(|fen| legality::legal_targets(fen, src))
            .unwrap_or_default()
    }

    /// Validates and records a move for this turn, returning the move it replaced.
    pub fn submit_move(&mut self, player: PlayerId, src: usize, dest: usize) -> Result<Option<Move>> {
        let (Some(fen), Some(active)) = (self.fen.as_ref(), self.current_color()) else {
            return Err(Error::NotStarted);
        };
        let team = self.team_of(player).ok_or(Error::NotPlaying)?;
        let colors = self.colors_of(player);
        let color = if colors.contains(&active) {
            active
        } else {
            colors.first().copied().unwrap_or(active)
        };

        legality::validate(fen, src, dest, Mover { team, color }, active, self.variant)?;
        let replaced = self.pending.submit(player, Move::try_from((src, dest))?);
        debug!("turn {}: {:?} submits {}->{}", self.turn, player, src, dest);
        Ok(replaced)
    }

    /// Resolves the pending moves and advances the turn.
    ///
    /// On error the board, turn and pending moves are left as they were.
    pub fn resolve_turn(&mut self) -> Result<Resolution> {
        let fen = self.fen.as_ref().ok_or(Error::NotStarted)?;
        let resolution = Resolver::new(fen, self.turn)?.resolve(&self.pending.moves())?;

        self.fen = Some(resolution.fen.clone());
        self.turn = resolution.turn;
        self.pending.clear();
        Ok(resolution)
    }
}
