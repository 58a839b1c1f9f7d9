// src/progress.rs

//! Reports how many repositories of a run have been processed.
#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

/// A trait for reporting harvest progress, abstracting over specific
/// implementations like `indicatif`.
///
/// Implementations are shared by every worker, so all methods take `&self`.
///
/// # Examples
///
/// ```
/// use repo_harvester::progress::ProgressReporter;
/// use std::sync::atomic::{AtomicU64, Ordering};
/// use std::sync::Mutex;
///
/// // A mock reporter that counts finished repositories.
/// #[derive(Default)]
/// struct Counter {
///     done: AtomicU64,
///     last_message: Mutex<String>,
/// }
/// impl ProgressReporter for Counter {
///     fn set_length(&self, _len: u64) {}
///     fn inc(&self, delta: u64) {
///         self.done.fetch_add(delta, Ordering::SeqCst);
///     }
///     fn set_message(&self, msg: String) {
///         *self.last_message.lock().unwrap() = msg;
///     }
///     fn finish_with_message(&self, msg: String) {
///         *self.last_message.lock().unwrap() = msg;
///     }
/// }
///
/// let reporter = Counter::default();
/// reporter.inc(1);
/// reporter.set_message("madler/zlib".to_string());
/// assert_eq!(reporter.done.load(Ordering::SeqCst), 1);
/// assert_eq!(*reporter.last_message.lock().unwrap(), "madler/zlib");
/// ```
pub trait ProgressReporter: Send + Sync {
    /// Sets the number of repositories in the run.
    fn set_length(&self, len: u64);
    /// Marks `delta` more repositories as processed.
    fn inc(&self, delta: u64);
    /// Sets a descriptive message, usually the repository just finished.
    fn set_message(&self, msg: String);
    /// Finishes the progress reporting with a final message.
    fn finish_with_message(&self, msg: String);
}

/// A `ProgressReporter` that does nothing.
///
/// Used in non-interactive environments (stderr is not a TTY) and in tests.
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    fn set_length(&self, _len: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish_with_message(&self, _msg: String) {}
}

/// An implementation of `ProgressReporter` using the `indicatif` crate.
#[cfg(feature = "progress")]
#[derive(Clone)]
pub struct IndicatifProgress {
    bar: ProgressBar,
}

#[cfg(feature = "progress")]
impl IndicatifProgress {
    /// Creates a new progress bar with a default style.
    pub fn new() -> Self {
        let pb = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} repositories {msg}",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        Self { bar: pb }
    }
}

#[cfg(feature = "progress")]
impl Default for IndicatifProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "progress")]
impl ProgressReporter for IndicatifProgress {
    fn set_length(&self, len: u64) {
        self.bar.set_length(len);
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish_with_message(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}
