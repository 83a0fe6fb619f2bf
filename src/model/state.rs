//! Castling rights, en-passant memory, the 50-move counter, and the
//! bundle that ties them together with a [`Board`] (§3).

use super::board::Board;
use super::{CastleSide, Side, Square};

/// Whether each side still has the right to castle on each wing. Once
/// a king or rook moves (or a rook is captured on its home square),
/// the corresponding flag is cleared and never set again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingRights {
    kingside: [bool; 2],
    queenside: [bool; 2],
}

impl CastlingRights {
    pub fn new() -> Self {
        Self {
            kingside: [true, true],
            queenside: [true, true],
        }
    }

    pub fn has(&self, side: Side, wing: CastleSide) -> bool {
        match wing {
            CastleSide::Kingside => self.kingside[side.ix()],
            CastleSide::Queenside => self.queenside[side.ix()],
        }
    }

    pub fn revoke(&mut self, side: Side, wing: CastleSide) {
        match wing {
            CastleSide::Kingside => self.kingside[side.ix()] = false,
            CastleSide::Queenside => self.queenside[side.ix()] = false,
        }
    }

    pub fn revoke_both(&mut self, side: Side) {
        self.revoke(side, CastleSide::Kingside);
        self.revoke(side, CastleSide::Queenside);
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::new()
    }
}

/// The square a pawn may be captured on via en passant this ply, if
/// any, and the square the capturing pawn actually lands on. Cleared
/// at the start of every turn unless the move just made was itself a
/// two-square pawn advance (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnPassantState {
    target: Option<Square>,
}

impl EnPassantState {
    pub fn none() -> Self {
        Self { target: None }
    }

    pub fn set(&mut self, target: Square) {
        self.target = Some(target);
    }

    pub fn clear(&mut self) {
        self.target = None;
    }

    pub fn target(&self) -> Option<Square> {
        self.target
    }
}

/// Counts plies since the last capture or pawn move, for the 50-move
/// rule (§4.H, original's `movesTillDraw`, counting down from a
/// configurable limit rather than up — this crate counts up to make
/// the "reset on irreversible move" rule read more naturally, and
/// compares against the configured limit at the controller level).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StaleCounter {
    plies: u16,
}

impl StaleCounter {
    pub fn new() -> Self {
        Self { plies: 0 }
    }

    pub fn plies(&self) -> u16 {
        self.plies
    }

    pub fn advance(&mut self, was_irreversible: bool) {
        if was_irreversible {
            self.plies = 0;
        } else {
            self.plies += 1;
        }
    }

    pub fn reached(&self, limit: u16) -> bool {
        self.plies >= limit
    }
}

/// Everything the Rule Engine and Move Executor need to know about
/// the position besides the board itself: whose turn it is, castling
/// rights, en-passant memory, and the stale-move counter.
#[derive(Clone)]
pub struct GameState {
    pub board: Board,
    pub to_move: Side,
    pub castling: CastlingRights,
    pub en_passant: EnPassantState,
    pub stale: StaleCounter,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            board: Board::starting_position(),
            to_move: Side::White,
            castling: CastlingRights::new(),
            en_passant: EnPassantState::none(),
            stale: StaleCounter::new(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn castling_rights_start_all_true_and_can_be_revoked() {
        let mut rights = CastlingRights::new();
        assert!(rights.has(Side::White, CastleSide::Kingside));
        rights.revoke(Side::White, CastleSide::Kingside);
        assert!(!rights.has(Side::White, CastleSide::Kingside));
        assert!(rights.has(Side::White, CastleSide::Queenside));
    }

    #[test]
    fn stale_counter_resets_on_irreversible_move() {
        let mut counter = StaleCounter::new();
        counter.advance(false);
        counter.advance(false);
        assert_eq!(counter.plies(), 2);
        counter.advance(true);
        assert_eq!(counter.plies(), 0);
    }
}
