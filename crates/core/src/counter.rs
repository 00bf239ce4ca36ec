//! Stitch counter: an auxiliary tally with undo history and an optional goal.

use serde::{Deserialize, Serialize};

/// Non-negative tally for counting repetitive stitches while following a
/// step. Reinitialized from `Step::stitch_count` when the active step
/// changes. Independent of navigation.
///
/// History is an append-only log of every value the count has held; `undo`
/// pops it, `reset` clears it back to a single initial entry. The optional
/// target is display-only and never bounds the count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StitchCounter {
    initial: u32,
    count: u32,
    target: Option<u32>,
    history: Vec<u32>,
}

impl StitchCounter {
    pub fn new(initial: u32) -> Self {
        Self { initial, count: initial, target: None, history: vec![initial] }
    }

    /// Counter for a step, seeded from its declared stitch count when present.
    pub fn for_step(stitch_count: Option<u32>) -> Self {
        Self::new(stitch_count.unwrap_or(0))
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn target(&self) -> Option<u32> {
        self.target
    }

    /// Stitches left to reach the target, floored at zero. `None` when no
    /// target is set.
    pub fn remaining(&self) -> Option<u32> {
        self.target.map(|t| t.saturating_sub(self.count))
    }

    pub fn increment(&mut self) {
        self.count += 1;
        self.history.push(self.count);
    }

    /// Decrements unless already at zero; a floored call leaves history
    /// untouched so it cannot be "undone" into a phantom entry.
    pub fn decrement(&mut self) {
        if self.count > 0 {
            self.count -= 1;
            self.history.push(self.count);
        }
    }

    /// Restores the value before the last increment/decrement. No-op once
    /// only the initial entry remains.
    pub fn undo(&mut self) {
        if self.history.len() > 1 {
            self.history.pop();
            self.count = *self.history.last().unwrap_or(&self.initial);
        }
    }

    pub fn reset(&mut self) {
        self.count = self.initial;
        self.history = vec![self.initial];
    }

    pub fn set_target(&mut self, target: Option<u32>) {
        self.target = target;
    }
}
