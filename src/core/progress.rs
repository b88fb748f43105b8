use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;

/// Receives download events, called inline from inside the download.
pub trait DownloadObserver: Send {
    fn on_progress(&mut self, chunk: &[u8], bytes_remaining: u64);
    fn on_complete(&mut self, path: &Path);
}

/// Byte counter for one download, rendered as a terminal progress bar.
pub struct ProgressTracker {
    bar: ProgressBar,
    total: Option<u64>,
    advanced: u64,
}

impl ProgressTracker {
    /// `total` is the declared stream size, when the stream has one.
    pub fn new(total: Option<u64>) -> Self {
        let (bar, template) = match total {
            Some(len) => (
                ProgressBar::new(len),
                "{msg}: {percent:>3}%|{wide_bar}| {bytes}/{total_bytes} [{elapsed}<{eta}, {bytes_per_sec}]",
            ),
            None => (
                ProgressBar::new_spinner(),
                "{msg}: {spinner} {bytes} [{elapsed}, {bytes_per_sec}]",
            ),
        };
        if let Ok(style) = ProgressStyle::with_template(template) {
            bar.set_style(style);
        }
        bar.set_message("Downloading");
        Self::with_bar(bar, total)
    }

    /// Tracker that draws nothing.
    pub fn hidden(total: Option<u64>) -> Self {
        Self::with_bar(ProgressBar::with_draw_target(total, ProgressDrawTarget::hidden()), total)
    }

    fn with_bar(bar: ProgressBar, total: Option<u64>) -> Self {
        Self {
            bar,
            total,
            advanced: 0,
        }
    }

    /// Advances by `len`, never past the declared total.
    pub fn advance(&mut self, len: u64) {
        let step = match self.total {
            Some(total) => len.min(total - self.advanced),
            None => len,
        };
        self.advanced += step;
        self.bar.inc(step);
    }

    pub fn advanced(&self) -> u64 {
        self.advanced
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn is_closed(&self) -> bool {
        self.bar.is_finished()
    }

    pub fn close(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish();
        }
    }
}

impl DownloadObserver for ProgressTracker {
    fn on_progress(&mut self, chunk: &[u8], _bytes_remaining: u64) {
        self.advance(chunk.len() as u64);
    }

    fn on_complete(&mut self, _path: &Path) {
        self.close();
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_is_clamped_to_total() {
        let mut tracker = ProgressTracker::hidden(Some(10));
        tracker.on_progress(&[0u8; 4], 6);
        assert_eq!(tracker.advanced(), 4);
        tracker.on_progress(&[0u8; 8], 0);
        assert_eq!(tracker.advanced(), 10);
        tracker.advance(5);
        assert_eq!(Some(tracker.advanced()), tracker.total());
    }

    #[test]
    fn completion_closes_tracker() {
        let mut tracker = ProgressTracker::hidden(Some(3));
        tracker.on_progress(b"abc", 0);
        assert!(!tracker.is_closed());
        tracker.on_complete(Path::new("downloads/clip.mp4"));
        assert!(tracker.is_closed());
        // Closing twice is harmless.
        tracker.close();
        assert!(tracker.is_closed());
    }

    #[test]
    fn zero_sized_stream_never_advances() {
        let mut tracker = ProgressTracker::hidden(Some(0));
        tracker.on_progress(b"data", 0);
        assert_eq!(tracker.advanced(), 0);
    }

    #[test]
    fn unknown_size_counts_every_byte() {
        let mut tracker = ProgressTracker::hidden(None);
        tracker.on_progress(&[0u8; 700], 0);
        tracker.on_progress(&[0u8; 300], 0);
        assert_eq!(tracker.advanced(), 1000);
    }
}
