//! Pseudo-legal movement, attack detection, castling legality, full
//! legality, and terminal analysis (§4.B).

use thiserror::Error;

use crate::notation::{MoveToken, RegularMove};

use super::board::Board;
use super::state::GameState;
use super::{CastleSide, Piece, PieceKind, Side, Square};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("no piece of the requested kind can reach that square")]
    NoMatchingSource,
    #[error("more than one piece of the requested kind can reach that square; disambiguate")]
    AmbiguousSource,
    #[error("castling is not currently legal on that wing")]
    CastleNotLegal,
    #[error("that square holds no piece belonging to the side to move")]
    EmptySource,
    #[error("destination occupied by a piece of the same side")]
    DestinationOccupied,
}

/// A pseudo-legal move resolved to concrete squares, carrying the
/// bookkeeping the Move Executor needs: whether it is an en-passant
/// capture (and of what square), and whether it is a double pawn
/// advance (for setting the next en-passant target).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMove {
    pub src: Square,
    pub dst: Square,
    pub kind: PieceKind,
    pub en_passant_capture: Option<Square>,
    pub is_double_pawn_advance: bool,
}

/// Outcome of terminal analysis on the side about to move (§4.B).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
}

/// Every pseudo-legal destination (ignoring self-check) for the piece
/// on `src`, together with en-passant/double-advance bookkeeping.
/// Returns an empty vector if `src` is empty.
pub fn pseudo_legal_moves(state: &GameState, src: Square) -> Vec<ResolvedMove> {
    let Piece::Occupied(kind, side) = state.board.get(src) else {
        return Vec::new();
    };
    match kind {
        PieceKind::Pawn => pawn_moves(state, src, side),
        PieceKind::Knight => stepper_moves(&state.board, src, side, kind, &KNIGHT_DELTAS),
        PieceKind::King => stepper_moves(&state.board, src, side, kind, &KING_DELTAS),
        PieceKind::Bishop => slider_moves(&state.board, src, side, kind, &DIAGONAL_DIRS),
        PieceKind::Rook => slider_moves(&state.board, src, side, kind, &ORTHOGONAL_DIRS),
        PieceKind::Queen => {
            let mut moves = slider_moves(&state.board, src, side, kind, &DIAGONAL_DIRS);
            moves.extend(slider_moves(&state.board, src, side, kind, &ORTHOGONAL_DIRS));
            moves
        }
    }
}

const KNIGHT_DELTAS: [(i16, i16); 8] = [
    (1, 2), (2, 1), (-1, 2), (-2, 1),
    (1, -2), (2, -1), (-1, -2), (-2, -1),
];
const KING_DELTAS: [(i16, i16); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1), (0, 1),
    (1, -1), (1, 0), (1, 1),
];
const DIAGONAL_DIRS: [(i16, i16); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONAL_DIRS: [(i16, i16); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

fn stepper_moves(
    board: &Board,
    src: Square,
    side: Side,
    kind: PieceKind,
    deltas: &[(i16, i16)],
) -> Vec<ResolvedMove> {
    deltas
        .iter()
        .filter_map(|&(dr, df)| src.offset(dr, df))
        .filter(|&dst| dst.is_play_area() && !board.get(dst).is_side(side))
        .map(|dst| simple_move(src, dst, kind))
        .collect()
}

fn slider_moves(
    board: &Board,
    src: Square,
    side: Side,
    kind: PieceKind,
    dirs: &[(i16, i16)],
) -> Vec<ResolvedMove> {
    let mut out = Vec::new();
    for &(dr, df) in dirs {
        let mut cur = src;
        loop {
            let Some(next) = cur.offset(dr, df) else { break };
            if !next.is_play_area() {
                break;
            }
            let occupant = board.get(next);
            if occupant.is_side(side) {
                break;
            }
            out.push(simple_move(src, next, kind));
            if !occupant.is_none() {
                break;
            }
            cur = next;
        }
    }
    out
}

fn simple_move(src: Square, dst: Square, kind: PieceKind) -> ResolvedMove {
    ResolvedMove {
        src,
        dst,
        kind,
        en_passant_capture: None,
        is_double_pawn_advance: false,
    }
}

fn pawn_moves(state: &GameState, src: Square, side: Side) -> Vec<ResolvedMove> {
    let board = &state.board;
    let mut out = Vec::new();
    let fwd = side.forward() as i16;

    if let Some(one) = src.offset(fwd, 0) {
        if one.is_play_area() && board.get(one).is_none() {
            out.push(simple_move(src, one, PieceKind::Pawn));
            if src.is_play_area() && src.play_rank() == side.pawn_start_rank() {
                if let Some(two) = src.offset(fwd * 2, 0) {
                    if board.get(two).is_none() {
                        out.push(ResolvedMove {
                            src,
                            dst: two,
                            kind: PieceKind::Pawn,
                            en_passant_capture: None,
                            is_double_pawn_advance: true,
                        });
                    }
                }
            }
        }
    }

    for &df in &[-1i16, 1] {
        let Some(dst) = src.offset(fwd, df) else { continue };
        if !dst.is_play_area() {
            continue;
        }
        let occupant = board.get(dst);
        if occupant.is_side(side.opponent()) {
            out.push(simple_move(src, dst, PieceKind::Pawn));
            continue;
        }
        if occupant.is_none() && is_en_passant_capture(state, src, dst, side) {
            let victim = Square::from_play(src.play_rank(), dst.play_file());
            out.push(ResolvedMove {
                src,
                dst,
                kind: PieceKind::Pawn,
                en_passant_capture: Some(victim),
                is_double_pawn_advance: false,
            });
        }
    }

    out
}

fn is_en_passant_capture(state: &GameState, src: Square, dst: Square, side: Side) -> bool {
    let Some(ep_target) = state.en_passant.target() else {
        return false;
    };
    if ep_target.play_file() != dst.play_file() {
        return false;
    }
    let victim = Square::from_play(src.play_rank(), dst.play_file());
    matches!(state.board.get(victim), Piece::Occupied(PieceKind::Pawn, s) if s == side.opponent())
}

/// §4.B: "A square S is attacked by colour C iff any enemy piece has a
/// pseudo-legal move to S" — implemented literally, including a
/// pawn's forward-move pseudo-legality onto an empty square. This
/// mirrors the source firmware's `tile_attacked`, which reuses its
/// general move-legality check rather than a capture-only variant.
pub fn is_attacked(state: &GameState, target: Square, by: Side) -> bool {
    state
        .board
        .pieces_of(by)
        .any(|(src, _)| pseudo_legal_moves(state, src).iter().any(|m| m.dst == target))
}

fn squares_between_castle(side: Side, wing: CastleSide) -> Vec<Square> {
    let rank = side.home_rank();
    match wing {
        CastleSide::Kingside => vec![Square::from_play(rank, 5), Square::from_play(rank, 6)],
        CastleSide::Queenside => vec![
            Square::from_play(rank, 1),
            Square::from_play(rank, 2),
            Square::from_play(rank, 3),
        ],
    }
}

/// Whether `side` may currently castle on `wing` (§4.B).
pub fn castle_legal(state: &GameState, side: Side, wing: CastleSide) -> bool {
    if !state.castling.has(side, wing) {
        return false;
    }
    let rank = side.home_rank();
    let between = squares_between_castle(side, wing);
    if !state.board.all_empty(between) {
        return false;
    }
    let king_from = Square::from_play(rank, 4);
    let transit_file = Board::castle_rook_transit_file(wing);
    let king_to_file = match wing {
        CastleSide::Kingside => 6,
        CastleSide::Queenside => 2,
    };
    let transit = Square::from_play(rank, transit_file);
    let king_to = Square::from_play(rank, king_to_file);
    let opponent = side.opponent();
    ![king_from, transit, king_to]
        .into_iter()
        .any(|sq| is_attacked(state, sq, opponent))
}

/// Whether applying `mv` to a *copy* of `state` would leave the mover's
/// own king attacked. Used by full-legality checks and terminal
/// analysis; never mutates the caller's state.
pub fn leaves_self_in_check(state: &GameState, mv: ResolvedMove, side: Side) -> bool {
    let mut board = state.board.clone();
    board.clear(mv.src);
    if let Some(victim) = mv.en_passant_capture {
        board.clear(victim);
    }
    board.place(mv.dst, Piece::Occupied(mv.kind, side));
    let king_square = if mv.kind == PieceKind::King {
        mv.dst
    } else {
        board.king_square(side)
    };
    let mut probe = state.clone();
    probe.board = board;
    is_attacked(&probe, king_square, side.opponent())
}

/// Every fully legal move available to `side`: pseudo-legal candidates
/// filtered by the self-check simulation above.
pub fn legal_moves(state: &GameState, side: Side) -> Vec<ResolvedMove> {
    state
        .board
        .pieces_of(side)
        .flat_map(|(src, _)| pseudo_legal_moves(state, src))
        .filter(|&mv| !leaves_self_in_check(state, mv, side))
        .collect()
}

/// §4.B: stops at the first legal move found rather than enumerating
/// all of them, since terminal analysis only needs existence.
pub fn has_any_legal_move(state: &GameState, side: Side) -> bool {
    state.board.pieces_of(side).any(|(src, _)| {
        pseudo_legal_moves(state, src)
            .into_iter()
            .any(|mv| !leaves_self_in_check(state, mv, side))
    })
}

/// §4.B terminal analysis: examine the side about to move (i.e. the
/// opponent of whoever just moved).
pub fn terminal_analysis(state: &GameState, side_to_examine: Side) -> Terminal {
    let in_check = is_attacked(
        state,
        state.board.king_square(side_to_examine),
        side_to_examine.opponent(),
    );
    let has_move = has_any_legal_move(state, side_to_examine);
    match (in_check, has_move) {
        (true, false) => Terminal::Checkmate,
        (false, false) => Terminal::Stalemate,
        (true, true) => Terminal::Check,
        (false, true) => Terminal::Ongoing,
    }
}

/// Resolve a parsed [`MoveToken`] against the current position,
/// filling in `$` wildcards by trying every candidate source that
/// matches the stated piece kind and reaches the destination legally
/// (§4.H: "resolving `$` wildcards by trying all 8 values").
pub fn resolve_token(state: &GameState, token: &MoveToken, side: Side) -> Result<ResolvedMoveOrCastle, RuleError> {
    match token {
        MoveToken::Castle(wing) => {
            if castle_legal(state, side, *wing) {
                Ok(ResolvedMoveOrCastle::Castle(*wing))
            } else {
                Err(RuleError::CastleNotLegal)
            }
        }
        MoveToken::Regular(regular) => resolve_regular(state, regular, side).map(ResolvedMoveOrCastle::Regular),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedMoveOrCastle {
    Regular(ResolvedMove),
    Castle(CastleSide),
}

fn resolve_regular(state: &GameState, regular: &RegularMove, side: Side) -> Result<ResolvedMove, RuleError> {
    let dst = Square::from_play(regular.dst_rank, regular.dst_file);
    if state.board.get(dst).is_side(side) {
        return Err(RuleError::DestinationOccupied);
    }

    let candidate_squares: Vec<Square> = match (regular.src_file, regular.src_rank) {
        (Some(f), Some(r)) => vec![Square::from_play(r, f)],
        (Some(f), None) => (0..8).map(|r| Square::from_play(r, f)).collect(),
        (None, Some(r)) => (0..8).map(|f| Square::from_play(r, f)).collect(),
        (None, None) => (0..8)
            .flat_map(|r| (0..8).map(move |f| Square::from_play(r, f)))
            .collect(),
    };

    let mut found: Option<ResolvedMove> = None;
    for src in candidate_squares {
        let Piece::Occupied(kind, piece_side) = state.board.get(src) else {
            continue;
        };
        if kind != regular.kind || piece_side != side {
            continue;
        }
        let Some(mv) = pseudo_legal_moves(state, src).into_iter().find(|m| m.dst == dst) else {
            continue;
        };
        if leaves_self_in_check(state, mv, side) {
            continue;
        }
        if found.is_some() {
            return Err(RuleError::AmbiguousSource);
        }
        found = Some(mv);
    }
    found.ok_or(RuleError::NoMatchingSource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::{MoveToken, RegularMove};

    #[test]
    fn pawn_has_double_advance_from_start() {
        let state = GameState::new();
        let src = Square::from_play(1, 4);
        let moves = pseudo_legal_moves(&state, src);
        assert!(moves.iter().any(|m| m.dst == Square::from_play(2, 4)));
        assert!(moves
            .iter()
            .any(|m| m.dst == Square::from_play(3, 4) && m.is_double_pawn_advance));
    }

    #[test]
    fn knight_opening_move_is_pseudo_legal_and_legal() {
        let state = GameState::new();
        let token = MoveToken::Regular(RegularMove {
            kind: PieceKind::Knight,
            src_file: None,
            src_rank: None,
            dst_file: 5,
            dst_rank: 2,
        });
        let resolved = resolve_token(&state, &token, Side::White).unwrap();
        assert!(matches!(resolved, ResolvedMoveOrCastle::Regular(_)));
    }

    #[test]
    fn starting_position_has_no_checks() {
        let state = GameState::new();
        assert_eq!(terminal_analysis(&state, Side::White), Terminal::Ongoing);
    }

    #[test]
    fn kingside_castle_blocked_by_bishop_at_start() {
        let state = GameState::new();
        assert!(!castle_legal(&state, Side::White, CastleSide::Kingside));
    }
}
