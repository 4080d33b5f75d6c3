//! Errors raised by the rules engine.

use crate::constants::{PieceKind, Seat};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while validating or resolving moves.
///
/// The first five variants are move rejections and are meant to be shown to the
/// submitting player. `InvariantViolation` aborts a resolution without touching the board.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("no piece at ({x}, {y})")]
    NoPieceAtSource { x: usize, y: usize },

    #[error("not the player's team")]
    WrongTeam,

    #[error("not the player's color")]
    WrongColor,

    #[error("not the player's turn")]
    NotYourTurn,

    #[error("not a valid target square for a {kind:?}")]
    IllegalTarget { kind: PieceKind },

    #[error("games are played by 2 or 4 players, not {0}")]
    UnsupportedPlayerCount(u8),

    #[error("invariant violated during resolution: {0}")]
    InvariantViolation(String),

    #[error("unsupported board size {0}")]
    UnsupportedBoardSize(usize),

    #[error("unsupported turn duration {0}s")]
    UnsupportedTurnDuration(u32),

    #[error("square {square} is off a {size}x{size} board")]
    SquareOutOfRange { square: usize, size: usize },

    #[error("{missing} need to be set")]
    NotEnoughPlayers { missing: String },

    #[error("seat {0:?} is already taken")]
    SeatTaken(Seat),

    #[error("player cannot sit on both teams")]
    OppositeTeams,

    #[error("player is not playing in this game")]
    NotPlaying,

    #[error("game has not started")]
    NotStarted,

    #[error("game has already started")]
    AlreadyStarted,
}

impl Error {
    /// True for the rejections a player can cause by submitting a bad move.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::NoPieceAtSource { .. }
                | Error::WrongTeam
                | Error::WrongColor
                | Error::NotYourTurn
                | Error::IllegalTarget { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_are_move_errors_only() {
        assert!(Error::WrongTeam.is_rejection());
        assert!(Error::IllegalTarget { kind: PieceKind::Rook }.is_rejection());
        assert!(Error::NoPieceAtSource { x: 0, y: 0 }.is_rejection());
        assert!(!Error::InvariantViolation("three pieces".into()).is_rejection());
        assert!(!Error::NotStarted.is_rejection());
    }
}
