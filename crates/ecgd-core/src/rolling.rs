//! Fixed-capacity rolling windows for threshold statistics.
//!
//! The pickers keep short histories (the last 5 or 8 peak levels, RR
//! intervals, envelope values). A [`RollingWindow`] holds at most `N` values
//! and evicts the oldest on overflow, so memory stays bounded for any record
//! length.
//!
//! ```rust
//! use ecgd_core::rolling::RollingWindow;
//!
//! let mut rr: RollingWindow<3> = RollingWindow::new();
//! for v in [200.0, 210.0, 190.0, 220.0] {
//!     rr.push(v);
//! }
//! assert_eq!(rr.len(), 3);
//! assert_eq!(rr.oldest(), Some(210.0));
//! assert_eq!(rr.mean(), Some(620.0 / 3.0));
//! ```

/// Ring buffer of the most recent `N` values.
#[derive(Debug, Clone, Copy)]
pub struct RollingWindow<const N: usize> {
    values: [f64; N],
    /// Index of the oldest value
    head: usize,
    len: usize,
}

impl<const N: usize> Default for RollingWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RollingWindow<N> {
    /// Create an empty window.
    pub const fn new() -> Self {
        Self {
            values: [0.0; N],
            head: 0,
            len: 0,
        }
    }

    /// Maximum number of retained values.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of values currently held.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the window holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a value, evicting the oldest one when full.
    pub fn push(&mut self, value: f64) {
        if N == 0 {
            return;
        }
        if self.len < N {
            self.values[(self.head + self.len) % N] = value;
            self.len += 1;
        } else {
            self.values[self.head] = value;
            self.head = (self.head + 1) % N;
        }
    }

    /// Most recently pushed value.
    pub fn last(&self) -> Option<f64> {
        if self.len == 0 {
            None
        } else {
            Some(self.values[(self.head + self.len - 1) % N])
        }
    }

    /// Oldest retained value.
    pub fn oldest(&self) -> Option<f64> {
        if self.len == 0 {
            None
        } else {
            Some(self.values[self.head])
        }
    }

    /// Values from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len).map(move |k| self.values[(self.head + k) % N])
    }

    /// Arithmetic mean, summed from oldest to newest; `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        if self.len == 0 {
            None
        } else {
            Some(self.iter().sum::<f64>() / self.len as f64)
        }
    }

    /// Mean, or zero for an empty window.
    pub fn mean_or_zero(&self) -> f64 {
        self.mean().unwrap_or(0.0)
    }

    /// Drop every value.
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}
