use serde::{Deserialize, Serialize};

/// Periodic tick counter
///
/// Fires when the counter is strictly greater than the period, then resets to
/// zero. Counting from zero, a timer with period `p` fires on its `p + 2`th
/// advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalTimer {
    pub value: u32,
    pub period: u32,
}

impl IntervalTimer {
    pub fn new(period: u32) -> Self {
        Self { value: 0, period }
    }

    /// Timer that starts part-way through its cycle
    pub fn starting_at(value: u32, period: u32) -> Self {
        Self { value, period }
    }

    /// Advance one tick; returns true if the timer fired
    pub fn advance(&mut self) -> bool {
        if self.value > self.period {
            self.value = 0;
            true
        } else {
            self.value += 1;
            false
        }
    }
}
