//! Core value types shared by the rule engine, the executor, and the
//! motion planner: sides, piece kinds, board addresses.
//!
//! The original firmware this core is modeled on represented pieces as
//! pointers into a small pool of singleton `struct piece` values, with a
//! shared `NULL_PIECE` sentinel for empty squares. That aliasing is
//! unnecessary in a language with real value types, so here a piece is
//! just a small `Copy` enum stored directly in the board array.

pub mod board;
pub mod executor;
pub mod rules;
pub mod state;

use strum::{EnumIs, FromRepr, VariantArray};

/// A player side. Unlike the teacher's `ChessColor`, this board has no
/// symmetric bit-shifting tricks to support, so there is no need to
/// encode a sign; it exists purely as an index and a turn token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIs, VariantArray)]
pub enum Side {
    White,
    Black,
}

impl Side {
    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Array index for per-side state (`[white, black]` convention
    /// throughout this crate).
    #[inline]
    pub fn ix(self) -> usize {
        self as usize
    }

    /// The play-area rank (0-based) a side's pawns start on.
    #[inline]
    pub fn pawn_start_rank(self) -> u8 {
        match self {
            Self::White => 1,
            Self::Black => 6,
        }
    }

    /// The play-area rank (0-based) a side's pawns promote on.
    #[inline]
    pub fn promotion_rank(self) -> u8 {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    /// +1 for white moving up the ranks, -1 for black moving down.
    #[inline]
    pub fn forward(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    /// The home rank (0-based) a side's king and rooks start on.
    #[inline]
    pub fn home_rank(self) -> u8 {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }
}

/// The kind of man occupying a square, or `None` for empty.
///
/// `Piece::None` is the dedicated empty-square sentinel called for by
/// the board model; carrying it as a variant (rather than wrapping
/// everything in `Option<Piece>`) keeps a single `[Piece; 100]` array
/// as the entire board representation, mirroring the original's
/// `NULL_PIECE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Piece {
    #[default]
    None,
    Occupied(PieceKind, Side),
}

impl Piece {
    #[inline]
    pub fn is_none(self) -> bool {
        matches!(self, Piece::None)
    }

    #[inline]
    pub fn kind(self) -> Option<PieceKind> {
        match self {
            Piece::None => None,
            Piece::Occupied(kind, _) => Some(kind),
        }
    }

    #[inline]
    pub fn side(self) -> Option<Side> {
        match self {
            Piece::None => None,
            Piece::Occupied(_, side) => Some(side),
        }
    }

    #[inline]
    pub fn is_side(self, side: Side) -> bool {
        self.side() == Some(side)
    }

    /// Display letter: uppercase for white, lowercase for black, matching
    /// the original's `print_piece` (ASCII-case flip by colour).
    pub fn letter(self) -> char {
        let Piece::Occupied(kind, side) = self else {
            return '_';
        };
        let upper = kind.letter();
        if side == Side::White {
            upper
        } else {
            upper.to_ascii_lowercase()
        }
    }
}

/// The six chessman kinds. `VariantArray` backs the Rule Engine's
/// per-kind movegen dispatch and the Utterance Parser's piece keyword
/// table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, VariantArray, FromRepr)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    /// Canonical uppercase display/notation letter.
    pub fn letter(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    /// Lowercase canonical-move-notation letter (§6: `piece` ∈
    /// `{p,n,b,r,q,k}`).
    pub fn canonical_letter(self) -> char {
        self.letter().to_ascii_lowercase()
    }

    pub fn from_canonical_letter(c: char) -> Option<Self> {
        match c {
            'p' => Some(Self::Pawn),
            'n' => Some(Self::Knight),
            'b' => Some(Self::Bishop),
            'r' => Some(Self::Rook),
            'q' => Some(Self::Queen),
            'k' => Some(Self::King),
            _ => None,
        }
    }
}

/// A promotion target: one of the four officer kinds a pawn may become.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Promotion {
    Knight,
    Bishop,
    Rook,
    Queen,
}

impl Promotion {
    pub fn kind(self) -> PieceKind {
        match self {
            Self::Knight => PieceKind::Knight,
            Self::Bishop => PieceKind::Bishop,
            Self::Rook => PieceKind::Rook,
            Self::Queen => PieceKind::Queen,
        }
    }

    pub fn letter(self) -> char {
        self.kind().canonical_letter()
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'n' => Some(Self::Knight),
            'b' => Some(Self::Bishop),
            'r' => Some(Self::Rook),
            'q' => Some(Self::Queen),
            _ => None,
        }
    }
}

impl Default for Promotion {
    /// §4.D: "the chosen promotion kind (queen by default ...)".
    fn default() -> Self {
        Self::Queen
    }
}

/// Which side of the board a castle happens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

/// A 10×10 board address. Play area is `[1, 9)` in both coordinates;
/// the remaining 36 cells are perimeter, used to hold captured pieces
/// (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub rank: u8,
    pub file: u8,
}

impl Square {
    pub const SIZE: u8 = 10;
    pub const PLAY_START: u8 = 1;
    pub const PLAY_END: u8 = 9;

    #[inline]
    pub fn new(rank: u8, file: u8) -> Self {
        debug_assert!(rank < Self::SIZE && file < Self::SIZE);
        Self { rank, file }
    }

    /// Build a play-area square from 0-based rank/file in `[0, 8)`,
    /// i.e. the coordinates used throughout the Rule Engine.
    #[inline]
    pub fn from_play(rank0: u8, file0: u8) -> Self {
        Self::new(rank0 + Self::PLAY_START, file0 + Self::PLAY_START)
    }

    #[inline]
    pub fn is_play_area(self) -> bool {
        (Self::PLAY_START..Self::PLAY_END).contains(&self.rank)
            && (Self::PLAY_START..Self::PLAY_END).contains(&self.file)
    }

    #[inline]
    pub fn is_perimeter(self) -> bool {
        !self.is_play_area()
    }

    /// 0-based play-area rank, valid only when `is_play_area()`.
    #[inline]
    pub fn play_rank(self) -> u8 {
        self.rank - Self::PLAY_START
    }

    /// 0-based play-area file, valid only when `is_play_area()`.
    #[inline]
    pub fn play_file(self) -> u8 {
        self.file - Self::PLAY_START
    }

    #[inline]
    pub fn ix(self) -> usize {
        self.rank as usize * Self::SIZE as usize + self.file as usize
    }

    #[inline]
    pub fn from_ix(ix: usize) -> Self {
        Self::new((ix / Self::SIZE as usize) as u8, (ix % Self::SIZE as usize) as u8)
    }

    /// Offset by a signed delta, returning `None` if the result would
    /// fall off the 10×10 grid.
    #[inline]
    pub fn offset(self, d_rank: i16, d_file: i16) -> Option<Self> {
        let rank = self.rank as i16 + d_rank;
        let file = self.file as i16 + d_file;
        if (0..Self::SIZE as i16).contains(&rank) && (0..Self::SIZE as i16).contains(&file) {
            Some(Self::new(rank as u8, file as u8))
        } else {
            None
        }
    }

    /// The four orthogonal neighbours that remain on the grid, in a
    /// fixed `[north, south, west, east]` order. Several algorithms in
    /// the Motion Planner rely on this order being deterministic (§9:
    /// "an implementer should pick a deterministic order and declare
    /// it").
    pub fn neighbours4(self) -> impl Iterator<Item = Square> {
        [(-1, 0), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .filter_map(move |(dr, df)| self.offset(dr, df))
    }
}

impl std::fmt::Display for Square {
    /// Algebraic form (`e4`) for play-area squares; a bracketed raw
    /// coordinate for perimeter squares, which have no algebraic name.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_play_area() {
            let file = (b'a' + self.play_file()) as char;
            write!(f, "{file}{}", self.play_rank() + 1)
        } else {
            write!(f, "[{},{}]", self.rank, self.file)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_round_trips_through_index() {
        for ix in 0..100 {
            assert_eq!(Square::from_ix(ix).ix(), ix);
        }
    }

    #[test]
    fn play_area_excludes_perimeter() {
        assert!(Square::from_play(0, 0).is_play_area());
        assert!(Square::new(0, 0).is_perimeter());
        assert!(Square::new(9, 9).is_perimeter());
        assert_eq!(
            (0..100)
                .map(Square::from_ix)
                .filter(|s| s.is_play_area())
                .count(),
            64
        );
    }

    #[test]
    fn algebraic_display() {
        assert_eq!(Square::from_play(0, 0).to_string(), "a1");
        assert_eq!(Square::from_play(7, 7).to_string(), "h8");
        assert_eq!(Square::from_play(3, 4).to_string(), "e4");
    }
}
