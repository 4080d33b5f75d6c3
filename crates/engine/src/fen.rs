//! The compact board encoding used for storage and on the wire.
//!
//! A board is `size` rows joined with `/`, top row first. Inside a row a hex digit `1`-`f`
//! stands for that many empty squares and any other character is one occupied square.

use crate::constants::{MAX_BOARD_SIZE, Piece};
use crate::error::{Error, Result};
use crate::square::{on_board, to_idx, to_xy};
use std::fmt;
use std::str::FromStr;

/// Sparse board occupancy, kept in its encoded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    size: usize,
    rows: Vec<String>,
}

impl Fen {
    /// An empty board: every row is the single digit for `size`.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 || size > MAX_BOARD_SIZE {
            return Err(Error::UnsupportedBoardSize(size));
        }
        Ok(Self {
            size,
            rows: vec![format!("{:x}", size); size],
        })
    }

    /// Parses an encoded board. The row count fixes the size; rows are kept verbatim.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let rows: Vec<String> = fen.split('/').map(str::to_owned).collect();
        let size = rows.len();
        if size > MAX_BOARD_SIZE {
            return Err(Error::UnsupportedBoardSize(size));
        }
        Ok(Self { size, rows })
    }

    pub fn to_fen(&self) -> String {
        self.rows.join("/")
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn get_piece(&self, square: usize) -> Option<Piece> {
        if !on_board(square, self.size) {
            return None;
        }
        let (x, y) = to_xy(square, self.size);
        self.piece_at(x, y)
    }

    pub fn piece_at(&self, x: usize, y: usize) -> Option<Piece> {
        let row = self.rows.get(y)?;
        let symbol = (*self.row_to_slots(row).get(x)?)?;
        Piece::from_fen_char(symbol)
    }

    pub fn set_piece(&mut self, square: usize, piece: Piece) -> Result<()> {
        self.change_square(square, Some(piece.to_fen_char()))
    }

    pub fn clear_piece(&mut self, square: usize) -> Result<()> {
        self.change_square(square, None)
    }

    /// Row-major symbols, one slot per square.
    pub fn to_squares(&self) -> Vec<Vec<Option<char>>> {
        self.rows.iter().map(|row| self.row_to_slots(row)).collect()
    }

    /// Every recognised piece with its square, in square order.
    pub fn pieces(&self) -> Vec<(usize, Piece)> {
        let mut out = Vec::new();
        for (y, row) in self.rows.iter().enumerate() {
            for (x, slot) in self.row_to_slots(row).into_iter().enumerate() {
                if let Some(piece) = slot.and_then(Piece::from_fen_char) {
                    out.push((to_idx(x, y, self.size), piece));
                }
            }
        }
        out
    }

    fn change_square(&mut self, square: usize, value: Option<char>) -> Result<()> {
        if !on_board(square, self.size) {
            return Err(Error::SquareOutOfRange {
                square,
                size: self.size,
            });
        }
        let (col, row) = to_xy(square, self.size);
        let width = row_width(&self.rows[row]);
        if width > self.size {
            return Err(Error::InvariantViolation(format!(
                "row {row} spans {width} squares on a {0}x{0} board",
                self.size
            )));
        }
        let mut slots = self.row_to_slots(&self.rows[row]);
        slots[col] = value;
        self.rows[row] = slots_to_row(&slots);
        Ok(())
    }

    fn row_to_slots(&self, row: &str) -> Vec<Option<char>> {
        let mut slots = vec![None; self.size];
        let mut current = 0;
        for ch in row.chars() {
            match ch.to_digit(16) {
                Some(n) if n > 0 => current += n as usize,
                _ => {
                    if let Some(slot) = slots.get_mut(current) {
                        *slot = Some(ch);
                    }
                    current += 1;
                }
            }
        }
        slots
    }
}

/// Squares a stored row covers once its runs are expanded.
fn row_width(row: &str) -> usize {
    row.chars()
        .map(|ch| match ch.to_digit(16) {
            Some(n) if n > 0 => n as usize,
            _ => 1,
        })
        .sum()
}

fn slots_to_row(slots: &[Option<char>]) -> String {
    let mut row = String::with_capacity(slots.len());
    let mut empty_count = 0;
    for slot in slots {
        match slot {
            None => empty_count += 1,
            Some(ch) => {
                if empty_count > 0 {
                    row.push_str(&format!("{:x}", empty_count));
                    empty_count = 0;
                }
                row.push(*ch);
            }
        }
    }
    if empty_count > 0 {
        row.push_str(&format!("{:x}", empty_count));
    }
    row
}

impl FromStr for Fen {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Fen::from_fen(s)
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let border = "-".repeat(self.size * 2 + 1);
        writeln!(f, "   +{}+", border)?;
        for (y, slots) in self.to_squares().iter().enumerate() {
            write!(f, "{:>2} | ", y)?;
            for slot in slots {
                write!(f, "{} ", slot.unwrap_or('.'))?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "   +{}+", border)
    }
}
