//! Tunable physical constants (§3, §4.E, original firmware's
//! `#define`/global `const` table), loadable from TOML via `serde` the
//! way the teacher's dependency table anticipates.
//!
//! `autoboard` itself never reads a config file off disk — that's an
//! embedder's job — but it exposes the type and a [`Default`] matching
//! the original firmware's literal constants so an embedding binary
//! can do `toml::from_str::<AutoboardConfig>(&contents)` and fall back
//! to sane defaults for anything unset.

use serde::Deserialize;

/// See module docs. `#[serde(default = ...)]` on every field means a
/// partial TOML file (overriding just one constant) deserializes
/// cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AutoboardConfig {
    /// How far past the logical destination the gantry travels to
    /// compensate for the electromagnet dragging a piece behind the
    /// true centre of travel. Original firmware: `MOTOR_OVERFLOW =
    /// 0.45f`, declared but — per the retrieved source — never wired
    /// into a call site; this crate is where it is actually applied,
    /// to every commanded motion (§C.2 in SPEC_FULL.md).
    pub motor_overflow: f32,

    /// Bound on the Command Stream (§4.F). Original: fixed
    /// `commandQueue[24]`.
    pub command_queue_capacity: usize,

    /// Plies without a capture or pawn move before the 50-move rule
    /// ends the game (§4.H). Original: `movesTillDraw` initialised to
    /// 100 and counted down; this crate counts up and compares against
    /// this limit.
    pub stale_move_limit: u16,

    /// §9: the source uses two different board-address-to-gantry
    /// conventions, with and without a +0.5 centre offset, and the
    /// spec leaves the choice open as long as it is consistent within
    /// a move. This crate defaults to the plainer integer convention
    /// (`0.0`); an embedder calibrated against the offset convention
    /// can set this to `0.5`.
    pub gantry_centre_offset: f32,
}

impl Default for AutoboardConfig {
    fn default() -> Self {
        Self {
            motor_overflow: 0.45,
            command_queue_capacity: 24,
            stale_move_limit: 100,
            gantry_centre_offset: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_original_firmware_constants() {
        let config = AutoboardConfig::default();
        assert_eq!(config.motor_overflow, 0.45);
        assert_eq!(config.command_queue_capacity, 24);
        assert_eq!(config.stale_move_limit, 100);
    }

    #[test]
    fn partial_toml_overrides_one_field() {
        let config: AutoboardConfig = toml::from_str("motor_overflow = 0.6").unwrap();
        assert_eq!(config.motor_overflow, 0.6);
        assert_eq!(config.command_queue_capacity, 24);
    }
}
