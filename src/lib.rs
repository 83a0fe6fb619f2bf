//! Control core for a voice-driven automated chessboard: a full chess
//! rule engine combined with a physical gantry motion planner, tied
//! together by a single-threaded turn controller.

pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod motion;
pub mod narration;
pub mod notation;
pub mod turn;

pub use turn::{TurnController, TurnState};
