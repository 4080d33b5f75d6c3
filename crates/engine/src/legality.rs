//! Checks a proposed move before it is accepted as pending.

use crate::constants::{Color, Piece, Team};
use crate::error::{Error, Result};
use crate::fen::Fen;
use crate::move_gen;
use crate::square::to_xy;
use serde::{Deserialize, Serialize};

/// How seats map to players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// One player per team controls both colors of that team.
    TwoPlayer,
    /// One player per seat; each moves only pieces of their own color.
    FourPlayer,
}

impl Variant {
    pub fn from_player_count(count: u8) -> Result<Variant> {
        match count {
            2 => Ok(Variant::TwoPlayer),
            4 => Ok(Variant::FourPlayer),
            n => Err(Error::UnsupportedPlayerCount(n)),
        }
    }

    /// Whether a player is limited to pieces of their own color.
    pub fn enforces_color(self) -> bool {
        matches!(self, Variant::FourPlayer)
    }
}

/// Who is trying to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mover {
    pub team: Team,
    /// The mover's color. Ignored by variants that do not enforce color.
    pub color: Color,
}

/// Validates moving the piece on `src` to `dest` and returns that piece.
///
/// Checks run in order: a piece is present, it belongs to the mover's team, it has the
/// mover's color (four-player games only), its color is active this turn, and `dest` is one
/// of its targets.
pub fn validate(
    fen: &Fen,
    src: usize,
    dest: usize,
    mover: Mover,
    active_color: Color,
    variant: Variant,
) -> Result<Piece> {
    let size = fen.size();
    let Some(piece) = fen.get_piece(src) else {
        let (x, y) = to_xy(src, size);
        return Err(Error::NoPieceAtSource { x, y });
    };

    if piece.team != mover.team {
        return Err(Error::WrongTeam);
    }
    if variant.enforces_color() && piece.color != mover.color {
        return Err(Error::WrongColor);
    }
    if piece.color != active_color {
        return Err(Error::NotYourTurn);
    }
    if !move_gen::is_legal_target(piece.kind, src, dest, size) {
        return Err(Error::IllegalTarget { kind: piece.kind });
    }

    Ok(piece)
}

/// Targets for whatever stands on `src`; empty for an empty square.
pub fn legal_targets(fen: &Fen, src: usize) -> Vec<usize> {
    match fen.get_piece(src) {
        Some(piece) => move_gen::legal_targets(piece.kind, src, fen.size()),
        None => Vec::new(),
    }
}
