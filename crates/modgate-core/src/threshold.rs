//! Process-wide toxicity threshold with atomic read semantics.
//!
//! The threshold is read exactly once per gate decision so a concurrent
//! update cannot produce an inconsistent decision within one evaluation.
//! Updates take effect for subsequent decisions only.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
pub struct ThresholdStore {
    bits: AtomicU64,
}

impl ThresholdStore {
    pub fn new(initial: f64) -> Self {
        Self {
            bits: AtomicU64::new(initial.clamp(0.0, 1.0).to_bits()),
        }
    }

    /// Current threshold. One atomic load; callers must not re-read
    /// mid-decision.
    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Replace the threshold. Values outside [0, 1] are clamped.
    pub fn set(&self, value: f64) {
        self.bits
            .store(value.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }
}
