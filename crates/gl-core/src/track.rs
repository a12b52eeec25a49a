//! Clamped numeric resources.
//!
//! Hit points, sanity, and magic points all behave the same way: a current
//! value that moves during play, bounded by a floor of zero and a maximum
//! that the rules recompute from attributes.

use serde::{Deserialize, Serialize};

/// A numeric resource clamped between 0 and `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Track {
    /// Current value.
    pub current: i32,
    /// Maximum value.
    pub max: i32,
}

impl Track {
    /// Create a track starting at its maximum.
    pub fn full(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Create a track with an explicit starting value, clamped into range.
    pub fn with_current(current: i32, max: i32) -> Self {
        Self {
            current: current.clamp(0, max.max(0)),
            max,
        }
    }

    /// Adjust by a delta, clamping to bounds. Returns the new value.
    pub fn adjust(&mut self, delta: i32) -> i32 {
        self.current = self.current.saturating_add(delta).clamp(0, self.max.max(0));
        self.current
    }

    /// Replace the maximum, pulling the current value down if it now exceeds it.
    pub fn set_max(&mut self, max: i32) {
        self.max = max;
        self.current = self.current.clamp(0, max.max(0));
    }

    /// Returns true if the track is at zero.
    pub fn is_empty(&self) -> bool {
        self.current <= 0
    }

}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.current, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_starts_at_max() {
        let t = Track::full(12);
        assert_eq!(t.current, 12);
        assert!(!t.is_empty());
    }

    #[test]
    fn adjust_clamps_both_ends() {
        let mut t = Track::full(10);
        assert_eq!(t.adjust(-25), 0);
        assert!(t.is_empty());
        assert_eq!(t.adjust(40), 10);
    }

    #[test]
    fn set_max_pulls_current_down() {
        let mut t = Track::full(14);
        t.set_max(11);
        assert_eq!(t.current, 11);
        t.set_max(20);
        assert_eq!(t.current, 11);
    }

    #[test]
    fn with_current_clamps() {
        assert_eq!(Track::with_current(80, 60).current, 60);
        assert_eq!(Track::with_current(-3, 60).current, 0);
    }

    #[test]
    fn display_and_huge_deltas() {
        let mut t = Track::full(10);
        t.adjust(-5);
        assert_eq!(t.to_string(), "5/10");
        assert_eq!(t.adjust(i32::MAX), 10);
        assert_eq!(t.adjust(i32::MIN), 0);
    }
}
