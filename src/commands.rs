//! The Command Stream (§4.F): a bounded, single-producer
//! single-consumer FIFO of motor/magnet commands, append-only from the
//! core, drain-only from the external driver.

use std::collections::VecDeque;

use crate::motion::{Command, CommandKind};

/// Bounded FIFO; pushes past capacity are silently dropped (§4.F:
/// "attempts to push when full are silently dropped"). `capacity` is
/// normally [`crate::config::AutoboardConfig::command_queue_capacity`]
/// (24, matching the original's fixed `commandQueue[24]`).
pub struct CommandQueue {
    capacity: usize,
    buf: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buf: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, command: Command) {
        if self.buf.len() >= self.capacity {
            tracing::warn!("command queue at capacity {}, dropping command", self.capacity);
            return;
        }
        self.buf.push_back(command);
    }

    /// External driver entry point `has_commands()`.
    pub fn has_commands(&self) -> bool {
        !self.buf.is_empty()
    }

    /// External driver entry point `get_command_kind()`: peeks, does
    /// not pop.
    pub fn get_command_kind(&self) -> Option<CommandKind> {
        self.buf.front().map(Command::kind)
    }

    /// External driver entry point `get_int_command()`: valid when the
    /// head is `MagnetToggle`; pops.
    pub fn get_int_command(&mut self) -> Option<i32> {
        self.buf.pop_front().map(|c| c.int_value())
    }

    /// External driver entry point `get_float_command_a()`. For
    /// `XAxis`/`YAxis` this pops the head (§6: "read a single float
    /// delta and pop"). For `BothAxes` this only peeks — the second
    /// float and the pop itself come from
    /// [`CommandQueue::get_float_command_b`], matching §6's "read two
    /// float deltas in order... and pop" as a single combined read.
    pub fn get_float_command_a(&mut self) -> Option<f32> {
        let (kind, value) = {
            let front = self.buf.front()?;
            (front.kind(), front.float_a())
        };
        if !matches!(kind, CommandKind::BothAxes) {
            self.buf.pop_front();
        }
        Some(value)
    }

    /// External driver entry point `get_float_command_b()`: only
    /// meaningful after `get_float_command_a` on a `BothAxes` head;
    /// pops.
    pub fn get_float_command_b(&mut self) -> Option<f32> {
        self.buf.pop_front().map(|c| c.float_b())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }
}
