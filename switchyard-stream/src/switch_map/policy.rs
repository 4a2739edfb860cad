// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// What a switching stream does with its live inner stream once the outer stream ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TerminalPolicy {
    /// End the output as soon as the outer ends.
    ///
    /// The live inner stream is destroyed first, values it has not delivered yet are lost.
    #[default]
    Immediate,
    /// Stop reading tokens but keep relaying the live inner stream until it completes.
    Drain,
}

/// Lifecycle phase of a switching stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchPhase {
    /// No inner stream is live, waiting for a token
    Idle,
    /// An inner stream is live
    Live,
    /// The outer ended and the last inner stream is being drained
    Draining,
    /// The output has ended naturally
    Ended,
    /// The output was destroyed
    Destroyed,
}

impl SwitchPhase {
    /// Returns `true` once the output can no longer yield items.
    pub const fn is_terminal(self) -> bool {
        matches!(self, SwitchPhase::Ended | SwitchPhase::Destroyed)
    }
}
