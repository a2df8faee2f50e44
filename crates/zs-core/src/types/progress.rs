//! Scan progress counters.

use serde::{Deserialize, Serialize};

/// Progress of an in-flight or finished scan.
///
/// `total` is fixed once discovery completes; `processed` increments
/// monotonically, one archive at a time.
///
/// # Examples
///
/// ```
/// use zs_core::ScanProgress;
///
/// let mut progress = ScanProgress::new(4);
/// progress.advance();
/// assert_eq!(progress.processed, 1);
/// assert_eq!(progress.total, 4);
/// assert!((progress.percent() - 25.0).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Number of archives processed so far.
    pub processed: usize,
    /// Total number of archives discovered.
    pub total: usize,
}

impl ScanProgress {
    /// Creates a progress counter for `total` discovered archives.
    #[inline]
    #[must_use]
    pub const fn new(total: usize) -> Self {
        Self {
            processed: 0,
            total,
        }
    }

    /// Records one more processed archive.
    #[inline]
    pub fn advance(&mut self) {
        self.processed += 1;
    }

    /// Returns `true` once every discovered archive has been processed.
    #[inline]
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.processed >= self.total
    }

    /// Completion percentage in the range `0.0..=100.0`.
    ///
    /// Returns `100.0` for an empty scan (nothing to do counts as done).
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            (self.processed as f64 / self.total as f64) * 100.0
        }
    }
}
