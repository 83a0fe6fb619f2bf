//! The narration slot (§4.G): a single-latch holder for the most
//! recent human-facing message, overwritten every turn rather than
//! queued.

/// Holds the latest narration string, if any has been set since the
/// last read. Setting it always overwrites whatever was there before
/// — per §4.G, "single-latch, not a queue: the newest narration always
/// replaces the previous one, even if nothing has consumed it yet".
#[derive(Debug, Clone, Default)]
pub struct NarrationChannel {
    message: Option<String>,
}

impl NarrationChannel {
    pub fn new() -> Self {
        Self { message: None }
    }

    /// Latches `message`, also echoing it via `tracing::info!` — the
    /// original firmware's `print_tts_message` both latched the TTS
    /// string and printed it for a written record; structured logging
    /// stands in for that here.
    pub fn set(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");
        self.message = Some(message);
    }

    /// External driver entry point `get_narration()`: returns the
    /// latched message and clears it (§4.G: "`consume()` returns
    /// current value and clears"), so a driver that polls more often
    /// than the core narrates sees `None` rather than a stale repeat.
    pub fn get(&mut self) -> Option<String> {
        self.message.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_set_replaces_the_previous_message() {
        let mut channel = NarrationChannel::new();
        channel.set("white to move");
        channel.set("illegal move: self-check");
        assert_eq!(channel.get().as_deref(), Some("illegal move: self-check"));
    }

    #[test]
    fn reading_clears_the_latch() {
        let mut channel = NarrationChannel::new();
        channel.set("check");
        assert!(channel.get().is_some());
        assert_eq!(channel.get(), None);
    }

    #[test]
    fn starts_empty() {
        assert_eq!(NarrationChannel::new().get(), None);
    }
}
