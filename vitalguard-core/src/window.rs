//! Fixed-Capacity Smoothing Window
//!
//! ## Overview
//!
//! A FIFO of the most recent raw samples with an arithmetic mean. Used for:
//! - Skin conductance smoothing (capacity 10)
//! - Heart rate display smoothing (capacity 5)
//! - BPM history on the display (capacity 20)
//!
//! ## Design Rationale
//!
//! Capacity is a const generic, so the storage is inline and the window never
//! allocates. Storage is a `heapless::Deque`: when full, the oldest sample is
//! popped from the front before the new one is pushed at the back.
//!
//! ```text
//! SmoothingWindow<4> after pushing 1, 2, 3, 4, 5:
//! front                 back
//!   ↓                     ↓
//! ┌─────┬─────┬─────┬─────┐
//! │  2  │  3  │  4  │  5  │   1 was evicted
//! └─────┴─────┴─────┴─────┘
//! ```
//!
//! While warming up (fewer than `N` samples) the mean covers only the samples
//! currently held.
//!
//! ## Usage Example
//!
//! ```rust
//! use vitalguard_core::window::SmoothingWindow;
//!
//! let mut window: SmoothingWindow<10> = SmoothingWindow::new();
//! window.push(10_000.0);
//! window.push(10_200.0);
//!
//! assert_eq!(window.average(), Some(10_100.0));
//! ```

use heapless::Deque;

/// Fixed-size FIFO of raw samples
///
/// ## Internal Invariants
///
/// - `len() <= N`
/// - Iteration yields samples oldest first
///
/// Not thread-safe. Each window belongs to exactly one pipeline.
#[derive(Debug, Clone)]
pub struct SmoothingWindow<const N: usize> {
    samples: Deque<f64, N>,
}

impl<const N: usize> SmoothingWindow<N> {
    /// Creates an empty window
    pub const fn new() -> Self {
        Self { samples: Deque::new() }
    }

    /// Appends a sample, evicting the oldest when full
    pub fn push(&mut self, value: f64) {
        if self.samples.is_full() {
            self.samples.pop_front();
        }
        // Cannot fail: a slot was freed above if the deque was full.
        let _ = self.samples.push_back(value);
    }

    /// Arithmetic mean of the held samples, `None` when empty
    pub fn average(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: f64 = self.samples.iter().sum();
        Some(sum / self.samples.len() as f64)
    }

    /// Samples oldest first
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    /// Number of held samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// `true` before the first push or after [`clear`](Self::clear)
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `true` once warm-up is over
    pub fn is_full(&self) -> bool {
        self.samples.is_full()
    }

    /// Drops every held sample
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl<const N: usize> Default for SmoothingWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_while_warming_up() {
        let mut window = SmoothingWindow::<10>::new();
        assert_eq!(window.average(), None);

        window.push(4.0);
        window.push(8.0);
        assert_eq!(window.len(), 2);
        assert_eq!(window.average(), Some(6.0));
    }

    #[test]
    fn evicts_oldest_first() {
        let mut window = SmoothingWindow::<3>::new();
        for v in [1.0, 2.0, 3.0, 4.0] {
            window.push(v);
        }

        assert_eq!(window.len(), 3);
        assert!(window.is_full());
        assert_eq!(window.iter().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert_eq!(window.average(), Some(3.0));
    }

    #[test]
    fn clear_restarts_warm_up() {
        let mut window = SmoothingWindow::<5>::new();
        for v in [70.0, 64.0, 81.0] {
            window.push(v);
        }

        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.average(), None);
        window.push(90.0);
        assert_eq!(window.average(), Some(90.0));
    }
}
