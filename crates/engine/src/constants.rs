//! Piece identities, the board symbol alphabet and fixed game parameters.

use serde::{Deserialize, Serialize};

/// Visual side of the mirrored board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Top,
    Bottom,
}

/// Decides which turns a piece moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    White,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceKind {
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

pub const ALL_TEAMS: [Team; 2] = [Team::Top, Team::Bottom];
pub const ALL_COLORS: [Color; 2] = [Color::White, Color::Black];
pub const ALL_KINDS: [PieceKind; 5] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

pub const VALID_BOARD_SIZES: [usize; 3] = [8, 10, 12];
pub const VALID_TURN_DURATIONS: [u32; 3] = [5, 10, 15];

/// Longest empty run a single hex digit can encode, which also caps the board size.
pub const MAX_BOARD_SIZE: usize = 15;

impl PieceKind {
    /// True for pieces that travel square by square during a turn.
    pub fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    /// Lowercase symbol used by the Top team.
    fn top_char(self) -> char {
        match self {
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'i',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    /// Lowercase symbol used by the Bottom team.
    fn bottom_char(self) -> char {
        match self {
            PieceKind::Knight => 'm',
            PieceKind::Bishop => 'j',
            PieceKind::Rook => 's',
            PieceKind::Queen => 'u',
            PieceKind::King => 'l',
        }
    }
}

/// A piece on the board. Team and color never change after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub team: Team,
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(team: Team, color: Color, kind: PieceKind) -> Self {
        Self { team, color, kind }
    }

    /// Two pieces are enemies only when they differ in both team and color.
    pub fn is_enemy_of(&self, other: &Piece) -> bool {
        self.team != other.team && self.color != other.color
    }

    pub fn to_fen_char(self) -> char {
        let c = match self.team {
            Team::Top => self.kind.top_char(),
            Team::Bottom => self.kind.bottom_char(),
        };
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_fen_char(c: char) -> Option<Piece> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let lower = c.to_ascii_lowercase();
        let (team, kind) = match lower {
            'n' => (Team::Top, PieceKind::Knight),
            'i' => (Team::Top, PieceKind::Bishop),
            'r' => (Team::Top, PieceKind::Rook),
            'q' => (Team::Top, PieceKind::Queen),
            'k' => (Team::Top, PieceKind::King),
            'm' => (Team::Bottom, PieceKind::Knight),
            'j' => (Team::Bottom, PieceKind::Bishop),
            's' => (Team::Bottom, PieceKind::Rook),
            'u' => (Team::Bottom, PieceKind::Queen),
            'l' => (Team::Bottom, PieceKind::King),
            _ => return None,
        };
        Some(Piece { team, color, kind })
    }
}

/// One of the four player positions in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    TopWhite,
    TopBlack,
    BottomWhite,
    BottomBlack,
}

pub const ALL_SEATS: [Seat; 4] = [
    Seat::TopWhite,
    Seat::BottomWhite,
    Seat::TopBlack,
    Seat::BottomBlack,
];

impl Seat {
    pub fn new(team: Team, color: Color) -> Seat {
        match (team, color) {
            (Team::Top, Color::White) => Seat::TopWhite,
            (Team::Top, Color::Black) => Seat::TopBlack,
            (Team::Bottom, Color::White) => Seat::BottomWhite,
            (Team::Bottom, Color::Black) => Seat::BottomBlack,
        }
    }

    pub fn team(self) -> Team {
        match self {
            Seat::TopWhite | Seat::TopBlack => Team::Top,
            Seat::BottomWhite | Seat::BottomBlack => Team::Bottom,
        }
    }

    pub fn color(self) -> Color {
        match self {
            Seat::TopWhite | Seat::BottomWhite => Color::White,
            Seat::TopBlack | Seat::BottomBlack => Color::Black,
        }
    }

    /// Index into a game's seat array.
    pub fn idx(self) -> usize {
        match self {
            Seat::TopWhite => 0,
            Seat::TopBlack => 1,
            Seat::BottomWhite => 2,
            Seat::BottomBlack => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Seat::TopWhite => "top_white",
            Seat::TopBlack => "top_black",
            Seat::BottomWhite => "bottom_white",
            Seat::BottomBlack => "bottom_black",
        }
    }
}

/// Starting position for a supported board size.
pub fn initial_layout(size: usize) -> Option<&'static str> {
    match size {
        8 => Some("KRN2nrk/IIN2nii/NNN2nnn/8/8/MMM2mmm/JJM2mjj/LSM2msl"),
        10 => Some("KQRN2nrqk/IRNN2nnri/INN4nni/NN6nn/a/a/MM6mm/JMM4mmj/JSMM2mmsj/LUSM2msul"),
        12 => Some(
            "KQIRN2nriqk/IIRNN2nnrii/IINN4nnii/INN6nni/NN8nn/c/c/MM8mm/JMM6mmj/JJMM4mmjj/JJSMM2mmsjj/LUJSM2msjul",
        ),
        _ => None,
    }
}
