//! Square index <-> (x, y) conversion for a square board.
//!
//! Squares are numbered row-major from the top-left corner: `x` is the column and `y` the
//! row. Both functions panic on a zero `size`.

#[inline]
pub const fn to_xy(idx: usize, size: usize) -> (usize, usize) {
    (idx % size, idx / size)
}

#[inline]
pub const fn to_idx(x: usize, y: usize, size: usize) -> usize {
    y * size + x
}

/// Signed variant used while walking rays; `None` when the square is off the board.
#[inline]
pub const fn checked_idx(x: isize, y: isize, size: usize) -> Option<usize> {
    let n = size as isize;
    if x >= 0 && x < n && y >= 0 && y < n {
        Some(to_idx(x as usize, y as usize, size))
    } else {
        None
    }
}

#[inline]
pub const fn on_board(idx: usize, size: usize) -> bool {
    idx < size * size
}
