//! Parse-progress logging.
//!
//! Each source file is parsed by a single thread, so the tracker is a plain
//! mutable counter that logs whenever the count crosses an interval boundary.

use log::info;

/// Logs progress at regular intervals while a single thread consumes records.
///
/// # Example
/// ```
/// use samconcord_lib::progress::ProgressLogger;
///
/// let mut progress = ProgressLogger::new("Parsed records", 100);
/// for _ in 0..250 {
///     progress.inc(); // logs at 100 and 200
/// }
/// progress.finish(); // logs "Parsed records 250 (done)"
/// ```
pub struct ProgressLogger {
    message: String,
    interval: u64,
    count: u64,
}

impl ProgressLogger {
    /// Creates a tracker that logs every `interval` records.
    #[must_use]
    pub fn new(message: impl Into<String>, interval: u64) -> Self {
        Self { message: message.into(), interval: interval.max(1), count: 0 }
    }

    /// Counts one record, logging if an interval boundary was reached.
    pub fn inc(&mut self) {
        self.count += 1;
        if self.count % self.interval == 0 {
            info!("{} {}", self.message, self.count);
        }
    }

    /// Logs the final count unless the last `inc` already did.
    pub fn finish(&self) {
        if self.count > 0 && self.count % self.interval != 0 {
            info!("{} {} (done)", self.message, self.count);
        }
    }

    /// The number of records seen so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }
}
