//! Progress bar display for map extraction

use indicatif::{ProgressBar, ProgressStyle};

use crate::reconciler::ExtractProgress;

/// Progress display for decompressing a packaged map
pub struct ExtractProgressBar {
    pb: ProgressBar,
}

impl ExtractProgressBar {
    /// Create a progress display; a spinner is shown when the compressed
    /// size is unknown
    pub fn new(compressed_len: Option<u64>, resource: &str) -> Self {
        let pb = match compressed_len {
            Some(len) => {
                let pb = ProgressBar::new(len);
                if let Ok(style) = ProgressStyle::default_bar()
                    .template("[{bar:40.cyan/blue}] {percent:>3}% {bytes}/{total_bytes} {msg}")
                {
                    pb.set_style(style.progress_chars("#>-"));
                }
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {bytes} {msg}")
                {
                    pb.set_style(style);
                }
                pb
            }
        };
        pb.set_message(format!("Decompressing {resource}"));

        Self { pb }
    }

    /// Hidden display, for non-interactive output
    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
        }
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.pb.abandon();
    }
}

impl ExtractProgress for ExtractProgressBar {
    fn on_decompress(&self, consumed: u64, _total: Option<u64>) {
        self.pb.set_position(consumed);
    }

    fn on_finish(&self) {
        self.pb.finish_and_clear();
    }
}
