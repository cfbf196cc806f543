//! Progress reporting for long-running imports.
//!
//! The importer reports at file granularity to an injected observer; the
//! core never renders progress itself.

/// Observer for file-granularity import progress.
///
/// All methods default to no-ops so implementations only override what they
/// display.
pub trait Progress {
    /// Called once before the first file, with the total file count
    fn begin(&mut self, _total: usize) {}

    /// Called after each file has been processed
    fn file_done(&mut self, _name: &str) {}

    /// Called once after the last file
    fn finish(&mut self) {}
}

/// Observer that ignores every event
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {}

/// Observer that logs a running count at info level
#[derive(Debug, Default)]
pub struct LogProgress {
    total: usize,
    done: usize,
}

impl Progress for LogProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn file_done(&mut self, name: &str) {
        self.done += 1;
        tracing::info!("processed {}/{}: {}", self.done, self.total, name);
    }

    fn finish(&mut self) {
        tracing::info!("{} files processed", self.done);
    }
}
