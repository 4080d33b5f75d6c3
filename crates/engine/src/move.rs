//! Defines the representation of a move in the engine.

use crate::constants::{MAX_BOARD_SIZE, PieceKind};
use crate::error::{Error, Result};
use crate::square::{on_board, to_idx, to_xy};
use serde::{Deserialize, Serialize};

/// A source/destination pair.
///
/// Encoded as a 16-bit integer:
/// - Bits 0-7:  src (0-224)
/// - Bits 8-15: dest (0-224)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "MoveRepr", from = "MoveRepr")]
pub struct Move(u16);

#[derive(Serialize, Deserialize)]
struct MoveRepr {
    src: u8,
    dest: u8,
}

impl From<Move> for MoveRepr {
    fn from(mv: Move) -> Self {
        MoveRepr {
            src: mv.0 as u8,
            dest: (mv.0 >> 8) as u8,
        }
    }
}

impl From<MoveRepr> for Move {
    fn from(repr: MoveRepr) -> Self {
        Move(repr.src as u16 | ((repr.dest as u16) << 8))
    }
}

impl TryFrom<(usize, usize)> for Move {
    type Error = Error;

    /// Fails for any square past the largest supported board.
    fn try_from((src, dest): (usize, usize)) -> Result<Self> {
        let limit = MAX_BOARD_SIZE * MAX_BOARD_SIZE;
        for square in [src, dest] {
            if square >= limit {
                return Err(Error::SquareOutOfRange {
                    square,
                    size: MAX_BOARD_SIZE,
                });
            }
        }
        Ok(Move::new(src as u8, dest as u8))
    }
}

impl Move {
    pub const fn new(src: u8, dest: u8) -> Self {
        Move(src as u16 | ((dest as u16) << 8))
    }

    pub fn src(&self) -> usize {
        (self.0 & 0xFF) as usize
    }

    pub fn dest(&self) -> usize {
        (self.0 >> 8) as usize
    }

    /// Squares the piece occupies at each of the `size` steps of a turn.
    ///
    /// Knights and kings jump: they sit on `dest` from the first step. Sliders advance one
    /// square per step along their line. Both are padded with `dest` up to `size` steps.
    pub fn trajectory(&self, kind: PieceKind, size: usize) -> Result<Vec<usize>> {
        let (src, dest) = (self.src(), self.dest());
        if !on_board(src, size) || !on_board(dest, size) {
            return Err(Error::InvariantViolation(format!(
                "move {}->{} leaves a {size}x{size} board",
                src, dest
            )));
        }

        let mut steps = if kind.is_slider() {
            self.linear_steps(size)?
        } else {
            vec![dest]
        };

        if steps.len() > size {
            return Err(Error::InvariantViolation(format!(
                "move {}->{} takes {} steps",
                src,
                dest,
                steps.len()
            )));
        }
        steps.resize(size, dest);
        Ok(steps)
    }

    fn linear_steps(&self, size: usize) -> Result<Vec<usize>> {
        let (sx, sy) = to_xy(self.src(), size);
        let (dx, dy) = to_xy(self.dest(), size);
        let (dx, dy) = (dx as isize - sx as isize, dy as isize - sy as isize);

        if dx != 0 && dy != 0 && dx.abs() != dy.abs() {
            return Err(Error::InvariantViolation(format!(
                "move {}->{} is not along a line",
                self.src(),
                self.dest()
            )));
        }

        let (step_x, step_y) = (dx.signum(), dy.signum());
        let distance = dx.abs().max(dy.abs());
        let mut steps = Vec::with_capacity(distance as usize);
        for i in 1..=distance {
            let x = (sx as isize + step_x * i) as usize;
            let y = (sy as isize + step_y * i) as usize;
            steps.push(to_idx(x, y, size));
        }
        if steps.is_empty() {
            steps.push(self.dest());
        }
        Ok(steps)
    }
}
