//! Input intents and a thread-safe latch for them
//!
//! Hosts that deliver input and ticks on the same thread can call the
//! `GameState` setters directly. Hosts with a separate input thread write into
//! a [`SharedInput`] and let the tick thread drain it; the tick side only ever
//! uses `try_lock`, so a busy input thread delays intents by a tick instead of
//! stalling the simulation.

use std::sync::{Arc, Mutex, TryLockError};

use super::state::GameState;

/// Intents gathered between two ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputLatch {
    pub moving_left: bool,
    pub moving_right: bool,
    /// `fire()` requests not yet applied
    pub fire_requests: u32,
}

impl InputLatch {
    pub fn set_moving_left(&mut self, moving: bool) {
        self.moving_left = moving;
        if moving {
            self.moving_right = false;
        }
    }

    pub fn set_moving_right(&mut self, moving: bool) {
        self.moving_right = moving;
        if moving {
            self.moving_left = false;
        }
    }

    pub fn fire(&mut self) {
        self.fire_requests = self.fire_requests.saturating_add(1);
    }
}

/// Cloneable handle to a latch shared between an input thread and the tick
/// thread
#[derive(Debug, Clone, Default)]
pub struct SharedInput {
    latch: Arc<Mutex<InputLatch>>,
}

impl SharedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_moving_left(&self, moving: bool) {
        self.with_latch(|latch| latch.set_moving_left(moving));
    }

    pub fn set_moving_right(&self, moving: bool) {
        self.with_latch(|latch| latch.set_moving_right(moving));
    }

    pub fn fire(&self) {
        self.with_latch(InputLatch::fire);
    }

    /// Take the pending intents without blocking
    ///
    /// Movement flags are level-triggered and stay latched; fire requests
    /// are consumed. Returns `None` if the input side holds the lock.
    pub fn try_take(&self) -> Option<InputLatch> {
        let mut latch = match self.latch.try_lock() {
            Ok(latch) => latch,
            Err(TryLockError::WouldBlock) => return None,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };
        let taken = *latch;
        latch.fire_requests = 0;
        Some(taken)
    }

    /// Input side: blocking is fine here, the writer is never the tick loop
    fn with_latch(&self, f: impl FnOnce(&mut InputLatch)) {
        let mut latch = self
            .latch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut latch);
    }
}

impl GameState {
    /// Apply latched intents: overwrite movement flags, then fire once per
    /// pending request
    pub fn apply_input(&mut self, input: &InputLatch) {
        self.set_moving_left(input.moving_left);
        self.set_moving_right(input.moving_right);
        for _ in 0..input.fire_requests {
            self.fire();
        }
    }
}
