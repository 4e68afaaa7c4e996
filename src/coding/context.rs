//! Adaptive probability states for the binary arithmetic coder.
//!
//! Each context is a 64-state machine; the state index encodes the LPS
//! probability estimate and `mps` the current most probable symbol.

use serde::{Deserialize, Serialize};

/// State transition on coding the most probable symbol.
pub const TRANS_MPS: [u8; 64] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, //
    17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, //
    33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, 44, 45, 46, 47, 48, //
    49, 50, 51, 52, 53, 54, 55, 56, 57, 58, 59, 60, 61, 62, 62, 63,
];

/// State transition on coding the least probable symbol.
pub const TRANS_LPS: [u8; 64] = [
    0, 0, 1, 2, 2, 4, 4, 5, 6, 7, 8, 9, 9, 11, 11, 12, //
    13, 13, 15, 15, 16, 16, 18, 18, 19, 19, 21, 21, 22, 22, 23, 24, //
    24, 25, 26, 26, 27, 27, 28, 29, 29, 30, 30, 30, 31, 32, 32, 33, //
    33, 33, 34, 34, 35, 35, 35, 36, 36, 36, 37, 37, 37, 38, 38, 63,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextState {
    state: u8,
    mps: u8,
}

impl ContextState {
    pub fn new() -> Self {
        Self { state: 0, mps: 0 }
    }

    #[inline]
    pub fn state(&self) -> u8 {
        self.state
    }

    #[inline]
    pub fn mps(&self) -> u8 {
        self.mps
    }

    /// Adapts the state after coding bin value `bin` against this context.
    #[inline]
    pub fn update(&mut self, bin: u8) {
        if bin == self.mps {
            self.state = TRANS_MPS[self.state as usize];
        } else {
            if self.state == 0 {
                self.mps ^= 1;
            }
            self.state = TRANS_LPS[self.state as usize];
        }
    }
}

impl Default for ContextState {
    fn default() -> Self {
        Self::new()
    }
}

/// Context selection mode of a coded stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextSelection {
    /// No context; every bin is coded with probability one half.
    Bypass,
    /// One shared adaptive state for every bin of the stream.
    Adaptive,
    /// Two adaptive states: one for the first bin of each symbol, one for
    /// all continuation bins.
    BiAdaptive,
}

impl ContextSelection {
    pub fn context_count(&self) -> usize {
        match self {
            ContextSelection::Bypass => 0,
            ContextSelection::Adaptive => 1,
            ContextSelection::BiAdaptive => 2,
        }
    }

    pub fn context_index(&self, bin_idx: u32) -> usize {
        match self {
            ContextSelection::Bypass => 0,
            ContextSelection::Adaptive => 0,
            ContextSelection::BiAdaptive => usize::from(bin_idx != 0),
        }
    }
}
