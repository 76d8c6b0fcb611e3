//! Streaming decode state for a channel stack.
//!
//! In decode mode the hidden state must survive between successive calls.
//! The caller owns one `DecodeState` cell per stream, passes it into each
//! evaluation, and receives the updated states back. Evaluating the same
//! `DecodeState` from multiple threads without external locking is not
//! supported.

use std::collections::HashMap;

use crate::scan::SsmState;

/// Per-channel hidden states plus stream position.
pub struct DecodeState {
    /// Number of samples processed so far (0 = fresh stream).
    pub seqlen_offset: usize,
    /// Per-channel states, keyed by channel index.
    states: HashMap<usize, SsmState>,
}

impl DecodeState {
    /// Fresh decode state (no channel state allocated yet).
    pub fn new() -> Self {
        Self {
            seqlen_offset: 0,
            states: HashMap::new(),
        }
    }

    /// Get or allocate the state for a channel.
    pub fn get_or_create(&mut self, channel: usize, state_dim: usize) -> &mut SsmState {
        self.states
            .entry(channel)
            .or_insert_with(|| SsmState::zeros(state_dim))
    }

    /// State for a channel, if one has been allocated.
    pub fn get(&self, channel: usize) -> Option<&SsmState> {
        self.states.get(&channel)
    }

    pub fn get_mut(&mut self, channel: usize) -> Option<&mut SsmState> {
        self.states.get_mut(&channel)
    }

    /// Zero every channel state and rewind the stream position.
    pub fn reset(&mut self) {
        self.seqlen_offset = 0;
        for state in self.states.values_mut() {
            state.reset();
        }
    }

    /// Advance the stream position by `n` samples.
    pub fn advance(&mut self, n: usize) {
        self.seqlen_offset += n;
    }
}

impl Default for DecodeState {
    fn default() -> Self {
        Self::new()
    }
}
