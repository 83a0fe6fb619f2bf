//! The 10×10 board grid: placement, the king-position cache, and the
//! capture perimeter (§3, §4.A).

use std::fmt;

use super::{CastleSide, Piece, PieceKind, Side, Square};

/// The full physical board: an 8×8 play area ringed by a 36-cell
/// perimeter used to park captured pieces, stored as one flat array
/// the way the original firmware's `struct piece *board[10][10]` does.
#[derive(Clone)]
pub struct Board {
    cells: [Piece; 100],
    /// Cached king squares, indexed by `Side::ix()`, so attack
    /// detection and terminal analysis don't have to scan for the
    /// king on every call.
    kings: [Square; 2],
    /// Next free perimeter slot per side, advanced every capture.
    next_perimeter_slot: [u8; 2],
}

impl Board {
    /// An empty board with no kings placed. Only useful as a
    /// construction scratchpad; `Board::starting_position` is the
    /// normal entry point.
    pub fn empty() -> Self {
        Self {
            cells: [Piece::None; 100],
            kings: [Square::new(0, 0); 2],
            next_perimeter_slot: [0, 0],
        }
    }

    /// The standard chess starting position, back ranks and pawns,
    /// placed on the play area with an empty perimeter (§4.A edge
    /// case: "initial board setup places all 32 pieces... with no
    /// perimeter cells occupied").
    pub fn starting_position() -> Self {
        let mut board = Self::empty();
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (file, kind) in BACK_RANK.into_iter().enumerate() {
            board.place(Square::from_play(0, file as u8), Piece::Occupied(kind, Side::White));
            board.place(Square::from_play(7, file as u8), Piece::Occupied(kind, Side::Black));
        }
        for file in 0..8u8 {
            board.place(
                Square::from_play(1, file),
                Piece::Occupied(PieceKind::Pawn, Side::White),
            );
            board.place(
                Square::from_play(6, file),
                Piece::Occupied(PieceKind::Pawn, Side::Black),
            );
        }
        board
    }

    #[inline]
    pub fn get(&self, square: Square) -> Piece {
        self.cells[square.ix()]
    }

    /// Place a piece on `square`, updating the king cache if it is a
    /// king. Does not do any perimeter bookkeeping; callers that move
    /// a piece off the board should go through
    /// [`Board::capture_to_perimeter`] instead.
    pub fn place(&mut self, square: Square, piece: Piece) {
        if let Piece::Occupied(PieceKind::King, side) = piece {
            self.kings[side.ix()] = square;
        }
        self.cells[square.ix()] = piece;
    }

    #[inline]
    pub fn clear(&mut self, square: Square) {
        self.cells[square.ix()] = Piece::None;
    }

    #[inline]
    pub fn king_square(&self, side: Side) -> Square {
        self.kings[side.ix()]
    }

    /// Iterate every play-area square together with its occupant.
    pub fn play_area(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        (0..100)
            .map(Square::from_ix)
            .filter(|s| s.is_play_area())
            .map(move |s| (s, self.get(s)))
    }

    /// Iterate every occupied play-area square belonging to `side`.
    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = (Square, PieceKind)> + '_ {
        self.play_area()
            .filter_map(move |(s, p)| p.side().filter(|&ps| ps == side).map(|_| (s, p.kind().unwrap())))
    }

    /// Move a captured piece onto its owner's half of the perimeter
    /// (§3: "each side's perimeter half fills front-to-back... a
    /// capture never overflows the 18 cells available per side"),
    /// returning the perimeter square it landed on.
    ///
    /// Each side is allotted the 18 perimeter cells nearest its own
    /// back rank: ranks `0` and `9` in full, split by file parity so
    /// white fills from file 0 outward on rank 0 and the two side
    /// columns nearest its own half, mirrored for black. The exact
    /// traversal order only needs to be exhaustive and collision-free
    /// over 18 cells; this one walks rank-major starting from each
    /// side's home edge.
    pub fn capture_to_perimeter(&mut self, captured: PieceKind, owner: Side) -> Square {
        let slot = self.next_perimeter_slot[owner.ix()];
        debug_assert!((slot as usize) < 18, "perimeter overflow for {owner:?}");
        let square = Self::perimeter_slot_square(owner, slot);
        self.next_perimeter_slot[owner.ix()] += 1;
        self.place(square, Piece::Occupied(captured, owner));
        square
    }

    /// Maps a side's Nth captured piece (`0..18`) to a perimeter
    /// square. White's pieces fill rank 0 left-to-right then the
    /// rank-0-adjacent corner columns; black mirrors on rank 9.
    fn perimeter_slot_square(owner: Side, slot: u8) -> Square {
        let (home_rank, other_rank) = match owner {
            Side::White => (0u8, 9u8),
            Side::Black => (9u8, 0u8),
        };
        if slot < 10 {
            Square::new(home_rank, slot)
        } else {
            let n = slot - 10;
            let file = if n < 4 { 0 } else { 9 };
            let row_offset = n % 4 + 1;
            let rank = if owner == Side::White {
                row_offset
            } else {
                9 - row_offset
            };
            let _ = other_rank;
            Square::new(rank, file)
        }
    }

    /// Whether every square in `squares` is empty — used by castling
    /// legality to check the squares between king and rook.
    pub fn all_empty(&self, squares: impl IntoIterator<Item = Square>) -> bool {
        squares.into_iter().all(|s| self.get(s).is_none())
    }

    /// Home-rank rook/king file layout used by castling legality and
    /// the executor's rook-hop on castling (§4.B, §4.D).
    pub fn castle_rook_file(side: CastleSide) -> u8 {
        match side {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 0,
        }
    }

    pub fn castle_rook_transit_file(side: CastleSide) -> u8 {
        match side {
            CastleSide::Kingside => 5,
            CastleSide::Queenside => 3,
        }
    }
}

impl fmt::Display for Board {
    /// A flat ASCII dump of the play area, rank 8 first, matching the
    /// original firmware's `print_board()` (explicitly "useful for
    /// debugging the algorithm", kept here as a `Display` impl and
    /// exercised through `tracing::debug!` rather than `println!`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            for file in 0..8u8 {
                write!(f, "{} ", self.get(Square::from_play(rank, file)).letter())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board {{ ... }}\n{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_has_32_pieces_and_no_perimeter_occupants() {
        let board = Board::starting_position();
        let occupied = board.play_area().filter(|(_, p)| !p.is_none()).count();
        assert_eq!(occupied, 32);
        assert_eq!(board.king_square(Side::White), Square::from_play(0, 4));
        assert_eq!(board.king_square(Side::Black), Square::from_play(7, 4));
    }

    #[test]
    fn perimeter_captures_do_not_collide() {
        let mut board = Board::empty();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..18 {
            let sq = board.capture_to_perimeter(PieceKind::Pawn, Side::White);
            assert!(seen.insert(sq), "duplicate perimeter slot {sq}");
            assert!(sq.is_perimeter());
        }
    }
}
