//! The Move Executor (§4.D): applies a resolved move to authoritative
//! state, handling captures, en passant, promotion, castling, the
//! stale-move counter, and self-check rollback.

use crate::commands::CommandQueue;
use crate::config::AutoboardConfig;
use crate::error::PlannerError;
use crate::motion::planner::MotionPlanner;

use super::board::Board;
use super::rules::{self, ResolvedMove, ResolvedMoveOrCastle};
use super::state::GameState;
use super::{CastleSide, Piece, PieceKind, Promotion, Side, Square};

/// Outcome of [`execute`]: either the move went through (possibly with
/// a promotion), or it was rolled back because it left the mover in
/// check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Applied { promoted: Option<Promotion> },
    RolledBackSelfCheck,
}

/// Apply `resolved` to `state`, emitting motion commands onto `queue`
/// via `planner` as a side effect. Mirrors §4.D step by step:
/// snapshot, tentative apply, self-check test, commit-or-rollback.
pub fn execute(
    state: &mut GameState,
    resolved: ResolvedMoveOrCastle,
    promotion_choice: Promotion,
    config: &AutoboardConfig,
    planner: &mut MotionPlanner,
    queue: &mut CommandQueue,
) -> Result<ExecutionOutcome, PlannerError> {
    match resolved {
        ResolvedMoveOrCastle::Castle(wing) => {
            execute_castle(state, wing, config, planner, queue)?;
            Ok(ExecutionOutcome::Applied { promoted: None })
        }
        ResolvedMoveOrCastle::Regular(mv) => execute_regular(state, mv, promotion_choice, config, planner, queue),
    }
}

fn execute_castle(
    state: &mut GameState,
    wing: CastleSide,
    config: &AutoboardConfig,
    planner: &mut MotionPlanner,
    queue: &mut CommandQueue,
) -> Result<(), PlannerError> {
    let side = state.to_move;
    let rank = side.home_rank();
    let king_from = Square::from_play(rank, 4);
    let rook_from = Square::from_play(rank, Board::castle_rook_file(wing));
    let (king_to_file, rook_to_file) = match wing {
        CastleSide::Kingside => (6, 5),
        CastleSide::Queenside => (2, 3),
    };
    let king_to = Square::from_play(rank, king_to_file);
    let rook_to = Square::from_play(rank, rook_to_file);

    let board_clone = state.board.clone();

    state.board.clear(rook_from);
    state.board.place(rook_to, Piece::Occupied(PieceKind::Rook, side));
    state.board.clear(king_from);
    state.board.place(king_to, Piece::Occupied(PieceKind::King, side));

    state.castling.revoke_both(side);
    state.en_passant.clear();
    state.stale.advance(false);

    // §4.D: "emit motion commands (rook first, along a straight empty
    // rank, then king with evacuation routing if needed)".
    planner.direct_transit(rook_from, rook_to, queue, config)?;
    planner.transit(&board_clone, king_from, king_to, queue, config)?;
    Ok(())
}

fn execute_regular(
    state: &mut GameState,
    mv: ResolvedMove,
    promotion_choice: Promotion,
    config: &AutoboardConfig,
    planner: &mut MotionPlanner,
    queue: &mut CommandQueue,
) -> Result<ExecutionOutcome, PlannerError> {
    let side = state.to_move;
    let board_clone = state.board.clone();

    let mut trial = state.board.clone();
    let regular_capture = trial.get(mv.dst);
    trial.clear(mv.src);
    if let Some(victim) = mv.en_passant_capture {
        trial.clear(victim);
    }
    trial.place(mv.dst, Piece::Occupied(mv.kind, side));

    let king_square = if mv.kind == PieceKind::King {
        mv.dst
    } else {
        trial.king_square(side)
    };
    let mut probe = state.clone();
    probe.board = trial;
    if rules::is_attacked(&probe, king_square, side.opponent()) {
        // §4.D: "undo all three slots, restore king cache, narrate
        // 'illegal — self-check'". Since `probe` was only a trial
        // clone, `state` itself was never mutated; there is nothing
        // to restore.
        return Ok(ExecutionOutcome::RolledBackSelfCheck);
    }

    state.board = probe.board;

    let mut promoted = None;
    if mv.en_passant_capture.is_some() {
        state.board.capture_to_perimeter(PieceKind::Pawn, side.opponent());
    } else if let Some(kind) = regular_capture.kind() {
        state.board.capture_to_perimeter(kind, side.opponent());
    }

    if mv.is_double_pawn_advance {
        state.en_passant.set(mv.dst);
    } else {
        state.en_passant.clear();
    }

    let promotion_rank = side.promotion_rank();
    if mv.kind == PieceKind::Pawn && mv.dst.play_rank() == promotion_rank {
        state.board.place(mv.dst, Piece::Occupied(promotion_choice.kind(), side));
        promoted = Some(promotion_choice);
    }

    update_castling_rights(state);

    let irreversible = mv.kind == PieceKind::Pawn || regular_capture.kind().is_some() || mv.en_passant_capture.is_some();
    state.stale.advance(irreversible);

    if mv.kind == PieceKind::Knight {
        planner.direct_transit(mv.src, mv.dst, queue, config)?;
    } else {
        planner.transit(&board_clone, mv.src, mv.dst, queue, config)?;
    }

    Ok(ExecutionOutcome::Applied { promoted })
}

/// §4.D: "Update castling-rights flags by checking whether the home
/// squares of kings and rooks still hold their original piece" —
/// rather than tracking a separate moved-flag on every mutation, this
/// recomputes the flags from board occupancy, which is equivalent and
/// self-correcting after any executor path (including castling).
fn update_castling_rights(state: &mut GameState) {
    for side in [Side::White, Side::Black] {
        let rank = side.home_rank();
        let king_home = Square::from_play(rank, 4);
        if !matches!(state.board.get(king_home), Piece::Occupied(PieceKind::King, s) if s == side) {
            state.castling.revoke_both(side);
        }
        let kingside_rook = Square::from_play(rank, Board::castle_rook_file(CastleSide::Kingside));
        if !matches!(state.board.get(kingside_rook), Piece::Occupied(PieceKind::Rook, s) if s == side) {
            state.castling.revoke(side, CastleSide::Kingside);
        }
        let queenside_rook = Square::from_play(rank, Board::castle_rook_file(CastleSide::Queenside));
        if !matches!(state.board.get(queenside_rook), Piece::Occupied(PieceKind::Rook, s) if s == side) {
            state.castling.revoke(side, CastleSide::Queenside);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::{MoveToken, RegularMove};

    fn step(state: &mut GameState, canonical: &str, config: &AutoboardConfig) -> ExecutionOutcome {
        let token = crate::notation::parse_canonical(canonical).expect("valid canonical move");
        let side = state.to_move;
        let resolved = rules::resolve_token(state, &token, side).expect("legal move");
        let mut planner = MotionPlanner::new();
        let mut queue = CommandQueue::new(config.command_queue_capacity);
        let outcome = execute(state, resolved, Promotion::default(), config, &mut planner, &mut queue).expect("planner succeeds");
        if let ExecutionOutcome::Applied { .. } = outcome {
            state.to_move = side.opponent();
        }
        outcome
    }

    #[test]
    fn en_passant_capture_removes_victim_and_clears_state() {
        let config = AutoboardConfig::default();
        let mut state = GameState::new();
        step(&mut state, "pe2e4", &config);
        step(&mut state, "pa7a6", &config);
        step(&mut state, "pe4e5", &config);
        step(&mut state, "pd7d5", &config);
        let outcome = step(&mut state, "pe5d6", &config);
        assert!(matches!(outcome, ExecutionOutcome::Applied { .. }));
        assert!(state.board.get(Square::from_play(4, 3)).is_none());
        assert_eq!(
            state.board.get(Square::from_play(5, 3)),
            Piece::Occupied(PieceKind::Pawn, Side::White)
        );
        assert_eq!(state.en_passant.target(), None);
    }

    #[test]
    fn promotion_defaults_to_queen() {
        let config = AutoboardConfig::default();
        let mut state = GameState::new();
        state.board = Board::empty();
        state.board.place(Square::from_play(6, 0), Piece::Occupied(PieceKind::Pawn, Side::White));
        state.board.place(Square::from_play(0, 4), Piece::Occupied(PieceKind::King, Side::White));
        state.board.place(Square::from_play(7, 4), Piece::Occupied(PieceKind::King, Side::Black));
        let outcome = step(&mut state, "pa7a8", &config);
        assert_eq!(
            outcome,
            ExecutionOutcome::Applied {
                promoted: Some(Promotion::Queen)
            }
        );
        assert_eq!(
            state.board.get(Square::from_play(7, 0)),
            Piece::Occupied(PieceKind::Queen, Side::White)
        );
    }

    #[test]
    fn self_check_move_is_rolled_back() {
        let config = AutoboardConfig::default();
        let mut state = GameState::new();
        state.board = Board::empty();
        state.board.place(Square::from_play(0, 4), Piece::Occupied(PieceKind::King, Side::White));
        state.board.place(Square::from_play(1, 4), Piece::Occupied(PieceKind::Bishop, Side::White));
        state.board.place(Square::from_play(7, 4), Piece::Occupied(PieceKind::Rook, Side::Black));
        let before = state.board.clone();
        let outcome = step(&mut state, "be2f3", &config);
        assert_eq!(outcome, ExecutionOutcome::RolledBackSelfCheck);
        assert_eq!(state.board.get(Square::from_play(1, 4)), before.get(Square::from_play(1, 4)));
        assert_eq!(state.board.get(Square::from_play(5, 5)), before.get(Square::from_play(5, 5)));
    }
}
