use std::cell::Cell;
use std::time::Duration;

use web_time::Instant;

/// Tunables shared by every widget built in one [`crate::Ui`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UiConfig {
    /// Second press on the same tree row within this window activates it.
    pub double_click_ms: u64,
    /// Wheel delta → scroll offset factor.
    pub wheel_multiplier: f32,
    pub scrollbar_thickness: f32,
    pub min_thumb: f32,
    /// Keyboard step for continuous widgets without their own step, as a
    /// fraction of the range.
    pub key_step: f32,
    pub tree_indent: f32,
    pub tree_row_padding: f32,
    pub tree_accent_width: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            double_click_ms: 400,
            wheel_multiplier: 1.0,
            scrollbar_thickness: 8.0,
            min_thumb: 16.0,
            key_step: 0.05,
            tree_indent: 16.0,
            tree_row_padding: 4.0,
            tree_accent_width: 3.0,
        }
    }
}

impl UiConfig {
    pub fn double_click(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }
}

pub trait Clock {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock tests drive by hand.
pub struct ManualClock {
    t: Cell<Instant>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            t: Cell::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.t.set(self.t.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.t.get()
    }
}
