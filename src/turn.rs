//! The Turn Controller (§4.H): the single owned context tying
//! together game state, the command queue, the narration slot, and the
//! state machine that gates whether further moves are accepted.

use crate::commands::CommandQueue;
use crate::config::AutoboardConfig;
use crate::model::executor::{self, ExecutionOutcome};
use crate::model::rules::{self, RuleError, Terminal};
use crate::model::state::GameState;
use crate::model::{Promotion, Side};
use crate::motion::planner::MotionPlanner;
use crate::narration::NarrationChannel;
use crate::notation;

/// §4.H: {Idle-White-to-Move, Idle-Black-to-Move,
/// Terminated-Checkmate-White, Terminated-Checkmate-Black,
/// Terminated-Stalemate, Terminated-50-Move}. Terminated states accept
/// no further moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    IdleWhiteToMove,
    IdleBlackToMove,
    TerminatedCheckmate(Side),
    TerminatedStalemate,
    Terminated50Move,
}

impl TurnState {
    pub fn is_running(self) -> bool {
        matches!(self, TurnState::IdleWhiteToMove | TurnState::IdleBlackToMove)
    }
}

/// Everything the external driver needs: one owned context exposing
/// exactly the entry points named in §6 (`is_running`, `get_turn`,
/// `init_board`, `run_turn`, the Command Stream readers, and
/// `get_narration`).
pub struct TurnController {
    state: GameState,
    turn_state: TurnState,
    config: AutoboardConfig,
    planner: MotionPlanner,
    queue: CommandQueue,
    narration: NarrationChannel,
}

impl TurnController {
    pub fn new(config: AutoboardConfig) -> Self {
        Self::from_state(config, GameState::new())
    }

    /// Like [`TurnController::new`] but starting from an arbitrary
    /// position rather than the standard setup — used to drive the
    /// controller through hand-constructed end-to-end positions.
    pub fn from_state(config: AutoboardConfig, state: GameState) -> Self {
        let queue = CommandQueue::new(config.command_queue_capacity);
        let turn_state = match state.to_move {
            Side::White => TurnState::IdleWhiteToMove,
            Side::Black => TurnState::IdleBlackToMove,
        };
        Self {
            state,
            turn_state,
            config,
            planner: MotionPlanner::new(),
            queue,
            narration: NarrationChannel::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.turn_state.is_running()
    }

    pub fn get_turn(&self) -> Side {
        self.state.to_move
    }

    pub fn turn_state(&self) -> TurnState {
        self.turn_state
    }

    /// One-time setup: parks the gantry in a known corner (§C.3 in
    /// SPEC_FULL.md) and resets authoritative state to a fresh game.
    pub fn init_board(&mut self) {
        self.planner.park_at_corner(&mut self.queue, &self.config);
        self.state = GameState::new();
        self.turn_state = TurnState::IdleWhiteToMove;
    }

    pub fn has_commands(&self) -> bool {
        self.queue.has_commands()
    }

    pub fn get_command_kind(&self) -> Option<crate::motion::CommandKind> {
        self.queue.get_command_kind()
    }

    pub fn get_int_command(&mut self) -> Option<i32> {
        self.queue.get_int_command()
    }

    pub fn get_float_command_a(&mut self) -> Option<f32> {
        self.queue.get_float_command_a()
    }

    pub fn get_float_command_b(&mut self) -> Option<f32> {
        self.queue.get_float_command_b()
    }

    pub fn get_narration(&mut self) -> Option<String> {
        self.narration.get()
    }

    /// Per §4.H: parse -> validate canonical form -> validate against
    /// rules -> execute -> analyze -> narrate -> check 50-move rule ->
    /// swap side. Every rejection narrates and leaves the turn
    /// unconsumed; the side is only swapped after a successful,
    /// non-rolled-back move.
    pub fn run_turn(&mut self, utterance: &str) {
        if !self.turn_state.is_running() {
            return;
        }

        let parsed = notation::parser::parse_utterance(utterance);
        let Some(canonical) = parsed.canonical else {
            // Unparseable utterance: narrate nothing, turn not consumed.
            return;
        };

        let Some(token) = notation::parse_canonical(&canonical) else {
            self.narration.set("Invalid input");
            return;
        };

        let side = self.state.to_move;
        let resolved = match rules::resolve_token(&self.state, &token, side) {
            Ok(resolved) => resolved,
            Err(RuleError::CastleNotLegal) => {
                self.narration.set("Can't castle now");
                return;
            }
            Err(_) => {
                self.narration.set("Not a legal move");
                return;
            }
        };

        let promotion_choice = parsed.promotion.unwrap_or_default();
        let outcome = executor::execute(
            &mut self.state,
            resolved,
            promotion_choice,
            &self.config,
            &mut self.planner,
            &mut self.queue,
        );

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!("{err}");
                return;
            }
        };

        let promoted = match outcome {
            ExecutionOutcome::RolledBackSelfCheck => {
                self.narration.set(format!("Move rejected: {} will be under check", side_name(side)));
                return;
            }
            ExecutionOutcome::Applied { promoted } => promoted,
        };

        if let Some(promotion) = promoted {
            self.narration.set(format!("Promotion for {}, to {}", side_name(side), promotion_name(promotion)));
        }

        self.state.to_move = side.opponent();
        let to_examine = self.state.to_move;
        match rules::terminal_analysis(&self.state, to_examine) {
            Terminal::Checkmate => {
                self.turn_state = TurnState::TerminatedCheckmate(side);
                self.narration.set(format!("Checkmate, {} wins!", side_name(side)));
            }
            Terminal::Stalemate => {
                self.turn_state = TurnState::TerminatedStalemate;
                self.narration.set("Stalemate, draw!");
            }
            Terminal::Check | Terminal::Ongoing => {
                if self.state.stale.reached(self.config.stale_move_limit) {
                    self.turn_state = TurnState::Terminated50Move;
                    self.narration.set("Draw by 50-move rule");
                } else {
                    self.turn_state = match to_examine {
                        Side::White => TurnState::IdleWhiteToMove,
                        Side::Black => TurnState::IdleBlackToMove,
                    };
                }
            }
        }
    }
}

fn side_name(side: Side) -> &'static str {
    match side {
        Side::White => "white",
        Side::Black => "black",
    }
}

fn promotion_name(promotion: Promotion) -> &'static str {
    match promotion {
        Promotion::Knight => "knight",
        Promotion::Bishop => "bishop",
        Promotion::Rook => "rook",
        Promotion::Queen => "queen",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> TurnController {
        let mut controller = TurnController::new(AutoboardConfig::default());
        controller.init_board();
        controller
    }

    #[test]
    fn fools_mate_ends_the_game_in_checkmate() {
        let mut controller = controller();
        controller.run_turn("pawn falafel two falafel three");
        controller.run_turn("pawn eggplant seven eggplant five");
        controller.run_turn("pawn garlic two garlic for");
        controller.run_turn("queen donut eight hazelnut for");
        assert!(!controller.is_running());
        assert_eq!(controller.turn_state(), TurnState::TerminatedCheckmate(Side::Black));
    }

    #[test]
    fn invalid_canonical_form_narrates_and_does_not_consume_the_turn() {
        let mut controller = controller();
        let side_before = controller.get_turn();
        controller.run_turn("zzzzz this utterance contains none of the vocabulary");
        assert_eq!(controller.get_turn(), side_before);
        assert!(controller.get_narration().is_none());
    }

    #[test]
    fn self_check_move_is_rejected_and_narrated() {
        let mut controller = controller();
        controller.state = GameState {
            board: crate::model::board::Board::empty(),
            to_move: Side::White,
            ..GameState::new()
        };
        controller
            .state
            .board
            .place(crate::model::Square::from_play(0, 4), crate::model::Piece::Occupied(crate::model::PieceKind::King, Side::White));
        controller
            .state
            .board
            .place(crate::model::Square::from_play(1, 4), crate::model::Piece::Occupied(crate::model::PieceKind::Bishop, Side::White));
        controller
            .state
            .board
            .place(crate::model::Square::from_play(7, 4), crate::model::Piece::Occupied(crate::model::PieceKind::Rook, Side::Black));
        controller.run_turn("bishop eggplant too falafel three");
        assert_eq!(controller.get_turn(), Side::White);
        let narration = controller.get_narration().unwrap();
        assert!(narration.contains("under check"));
    }
}
