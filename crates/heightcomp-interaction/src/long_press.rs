//! Long-press timer bookkeeping.
//!
//! The controller never sleeps; it hands the host a [`LongPressToken`] to
//! schedule and later receives the same token back. Every arm bumps a
//! generation counter, so a token from an earlier gesture can never fire into
//! a later one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle for one scheduled long-press callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LongPressToken(u64);

impl LongPressToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LongPressToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "long-press#{}", self.0)
    }
}

/// At most one armed long-press at a time
#[derive(Debug, Clone, Default)]
pub struct LongPressTimer {
    generation: u64,
    armed: Option<LongPressToken>,
}

impl LongPressTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a new timer, replacing any armed one
    pub fn arm(&mut self) -> LongPressToken {
        self.generation = self.generation.wrapping_add(1);
        let token = LongPressToken(self.generation);
        self.armed = Some(token);
        token
    }

    /// Disarm and return the token the host has to cancel, if any
    pub fn disarm(&mut self) -> Option<LongPressToken> {
        self.armed.take()
    }

    /// Consume a fired token; false when it is stale or was cancelled
    pub fn fire(&mut self, token: LongPressToken) -> bool {
        if self.armed == Some(token) {
            self.armed = None;
            true
        } else {
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}
