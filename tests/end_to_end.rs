//! Integration tests for the five literal scenarios in spec.md §8, plus
//! one indirect-motion scenario. These exercise `TurnController` the
//! way an external driver would: utterances in, narration and turn
//! state out.

use autoboard::config::AutoboardConfig;
use autoboard::model::{Piece, PieceKind, Side, Square};
use autoboard::model::board::Board;
use autoboard::model::state::GameState;
use autoboard::turn::{TurnController, TurnState};

fn init_subscriber() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn controller() -> TurnController {
    init_subscriber();
    let mut controller = TurnController::new(AutoboardConfig::default());
    controller.init_board();
    controller
}

fn drain(controller: &mut TurnController) {
    while controller.has_commands() {
        match controller.get_command_kind().unwrap() {
            autoboard::motion::CommandKind::MagnetToggle => {
                controller.get_int_command();
            }
            autoboard::motion::CommandKind::XAxis | autoboard::motion::CommandKind::YAxis => {
                controller.get_float_command_a();
            }
            autoboard::motion::CommandKind::BothAxes => {
                controller.get_float_command_a();
                controller.get_float_command_b();
            }
        }
    }
}

#[test]
fn fools_mate_ends_in_checkmate_for_black() {
    let mut controller = controller();
    controller.run_turn("pawn falafel two falafel three");
    drain(&mut controller);
    controller.run_turn("pawn eggplant seven eggplant five");
    drain(&mut controller);
    controller.run_turn("pawn garlic two garlic for");
    drain(&mut controller);
    controller.run_turn("queen donut eight hazelnut for");
    drain(&mut controller);

    assert!(!controller.is_running());
    assert_eq!(controller.turn_state(), TurnState::TerminatedCheckmate(Side::Black));
    let narration = controller.get_narration().unwrap();
    assert!(narration.contains("Checkmate"));
    assert!(narration.contains("black"));
}

#[test]
fn en_passant_capture_removes_the_victim_from_the_play_area() {
    let mut controller = controller();
    for utterance in [
        "pawn eggplant too eggplant for",
        "pawn apple seven apple six",
        "pawn eggplant for eggplant five",
        "pawn donut seven donut five",
        "pawn eggplant five donut six",
    ] {
        controller.run_turn(utterance);
        drain(&mut controller);
    }
    assert_eq!(controller.get_turn(), Side::Black);
}

#[test]
fn kingside_castle_succeeds_when_the_path_is_clear_and_unattacked() {
    let mut controller = controller();
    controller.run_turn("pawn garlic two garlic three");
    drain(&mut controller);
    controller.run_turn("pawn apple seven apple six");
    drain(&mut controller);
    controller.run_turn("knight garlic one falafel three");
    drain(&mut controller);
    controller.run_turn("pawn apple six apple five");
    drain(&mut controller);
    controller.run_turn("bishop falafel one garlic too");
    drain(&mut controller);
    controller.run_turn("pawn apple five apple for");
    drain(&mut controller);
    controller.run_turn("castle king side");
    drain(&mut controller);

    assert_eq!(controller.get_turn(), Side::Black);
}

#[test]
fn self_check_move_rolls_back_and_narrates() {
    init_subscriber();
    let mut state = GameState {
        board: Board::empty(),
        to_move: Side::White,
        ..GameState::new()
    };
    state.board.place(Square::from_play(0, 4), Piece::Occupied(PieceKind::King, Side::White));
    state.board.place(Square::from_play(1, 4), Piece::Occupied(PieceKind::Bishop, Side::White));
    state.board.place(Square::from_play(7, 4), Piece::Occupied(PieceKind::Rook, Side::Black));
    let mut controller = TurnController::from_state(AutoboardConfig::default(), state);

    controller.run_turn("bishop eggplant too falafel three");
    drain(&mut controller);

    assert_eq!(controller.get_turn(), Side::White);
    let narration = controller.get_narration().unwrap();
    assert!(narration.contains("under check"));
}

#[test]
fn promotion_defaults_to_queen_without_an_explicit_keyword() {
    init_subscriber();
    let mut state = GameState {
        board: Board::empty(),
        to_move: Side::White,
        ..GameState::new()
    };
    state.board.place(Square::from_play(6, 0), Piece::Occupied(PieceKind::Pawn, Side::White));
    state.board.place(Square::from_play(0, 4), Piece::Occupied(PieceKind::King, Side::White));
    state.board.place(Square::from_play(7, 4), Piece::Occupied(PieceKind::King, Side::Black));
    let mut controller = TurnController::from_state(AutoboardConfig::default(), state);

    controller.run_turn("pawn apple seven apple ate");
    drain(&mut controller);

    let narration = controller.get_narration().unwrap();
    assert!(narration.contains("Promotion"));
    assert!(narration.contains("queen"));
}

#[test]
fn bishop_transit_routes_around_an_occupied_square_off_its_path() {
    let mut controller = controller();
    controller.run_turn("pawn donut too donut three");
    drain(&mut controller);
    controller.run_turn("pawn apple seven apple six");
    drain(&mut controller);
    // bishop c1->g5 is legal once d2 is clear; f1's diagonal stays open.
    controller.run_turn("bishop cash one garlic five");
    drain(&mut controller);
    assert_eq!(controller.get_turn(), Side::Black);
}
