use std::sync::Arc;

/// ProgressReporter port for reporting progress and diagnostics
///
/// This is the diagnostics sink handed to parsers, query clients and use
/// cases. Nothing in the scan core writes to the console directly.
///
/// Implementations must be `Send + Sync`: both vulnerability clients run
/// concurrently and share one reporter.
pub trait ProgressReporter: Send + Sync {
    /// Reports an informational message
    fn report(&self, message: &str);

    /// Reports progress with a percentage
    ///
    /// # Arguments
    /// * `current` - Current progress value
    /// * `total` - Total expected value
    /// * `message` - Optional message to include
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports a warning, e.g. a skipped lockfile entry or a failed batch
    fn report_error(&self, message: &str);

    /// Reports completion of an operation
    fn report_completion(&self, message: &str);
}

impl<T: ProgressReporter + ?Sized> ProgressReporter for Arc<T> {
    fn report(&self, message: &str) {
        (**self).report(message)
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        (**self).report_progress(current, total, message)
    }

    fn report_error(&self, message: &str) {
        (**self).report_error(message)
    }

    fn report_completion(&self, message: &str) {
        (**self).report_completion(message)
    }
}
