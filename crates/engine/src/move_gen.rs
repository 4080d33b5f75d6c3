//! Legal-target generation, with per-size target tables computed once.
//!
//! Targets ignore what stands on the board: sliders run to the edge through any piece and
//! destinations may be occupied. Collisions are settled when the turn is resolved.

use crate::constants::{MAX_BOARD_SIZE, PieceKind};
use crate::square::{checked_idx, on_board, to_xy};
use once_cell::sync::Lazy;

pub const ROOK_DIRS: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
pub const BISHOP_DIRS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

pub const KNIGHT_DELTAS: [(isize, isize); 8] = [
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
];

pub const KING_DELTAS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
];

/// Target lists for every square of one board size.
pub struct TargetTables {
    pub knight: Vec<Vec<usize>>,
    pub king: Vec<Vec<usize>>,
    pub rook: Vec<Vec<usize>>,
    pub bishop: Vec<Vec<usize>>,
}

impl TargetTables {
    fn new(size: usize) -> Self {
        let squares = size * size;
        let mut tables = TargetTables {
            knight: Vec::with_capacity(squares),
            king: Vec::with_capacity(squares),
            rook: Vec::with_capacity(squares),
            bishop: Vec::with_capacity(squares),
        };

        for sq in 0..squares {
            let (x, y) = to_xy(sq, size);
            let (x, y) = (x as isize, y as isize);

            tables.knight.push(
                KNIGHT_DELTAS
                    .iter()
                    .filter_map(|&(dx, dy)| checked_idx(x + dx, y + dy, size))
                    .collect(),
            );
            tables.king.push(
                KING_DELTAS
                    .iter()
                    .filter_map(|&(dx, dy)| checked_idx(x + dx, y + dy, size))
                    .collect(),
            );
            tables.rook.push(rays(x, y, &ROOK_DIRS, size));
            tables.bishop.push(rays(x, y, &BISHOP_DIRS, size));
        }

        tables
    }
}

fn rays(x: isize, y: isize, dirs: &[(isize, isize)], size: usize) -> Vec<usize> {
    let mut targets = Vec::new();
    for &(dx, dy) in dirs {
        let (mut tx, mut ty) = (x + dx, y + dy);
        while let Some(sq) = checked_idx(tx, ty, size) {
            targets.push(sq);
            tx += dx;
            ty += dy;
        }
    }
    targets
}

/// Indexed by board size; the entry for size 0 is empty.
pub static TARGET_TABLES: Lazy<Vec<TargetTables>> =
    Lazy::new(|| (0..=MAX_BOARD_SIZE).map(TargetTables::new).collect());

/// Every on-board square a `kind` standing on `src` may move to.
///
/// Empty when the size is unsupported or `src` is off the board.
pub fn legal_targets(kind: PieceKind, src: usize, size: usize) -> Vec<usize> {
    let Some(tables) = TARGET_TABLES.get(size) else {
        return Vec::new();
    };
    if !on_board(src, size) {
        return Vec::new();
    }
    match kind {
        PieceKind::Knight => tables.knight[src].clone(),
        PieceKind::King => tables.king[src].clone(),
        PieceKind::Rook => tables.rook[src].clone(),
        PieceKind::Bishop => tables.bishop[src].clone(),
        PieceKind::Queen => {
            let mut targets = tables.rook[src].clone();
            targets.extend_from_slice(&tables.bishop[src]);
            targets
        }
    }
}

pub fn is_legal_target(kind: PieceKind, src: usize, dest: usize, size: usize) -> bool {
    let Some(tables) = TARGET_TABLES.get(size) else {
        return false;
    };
    if !on_board(src, size) {
        return false;
    }
    match kind {
        PieceKind::Knight => tables.knight[src].contains(&dest),
        PieceKind::King => tables.king[src].contains(&dest),
        PieceKind::Rook => tables.rook[src].contains(&dest),
        PieceKind::Bishop => tables.bishop[src].contains(&dest),
        PieceKind::Queen => tables.rook[src].contains(&dest) || tables.bishop[src].contains(&dest),
    }
}
