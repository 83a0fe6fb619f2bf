//! Error enums for each fallible boundary (§7). None of these
//! propagate out of [`crate::turn::TurnController::run_turn`] — per
//! §7, "All errors are local; none propagate to abort the process" —
//! they exist to be logged and turned into narration, not unwound.

pub use crate::model::rules::RuleError;
pub use crate::notation::parser::ParsedUtterance;

/// §4.E failure mode: the evacuation algorithm could not find an
/// off-path exit for a blocking piece.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PlannerError {
    #[error("no off-path exit is available to evacuate a blocking piece")]
    NoEvacuationExit,
}

/// Ill-formed canonical move notation (§6), surfaced before the Rule
/// Engine is even consulted.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("canonical move notation is syntactically invalid")]
    MalformedCanonical,
}
