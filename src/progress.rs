//! Progress reporting utilities

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinners for the blocking stages of a check run
#[derive(Debug)]
pub struct ProgressReporter {
    pub load_pb: Option<ProgressBar>,
    pub scan_pb: Option<ProgressBar>,
    show_progress: bool,
}

impl ProgressReporter {
    /// Create progress reporter that shows spinners on the terminal
    pub fn new() -> Self {
        Self {
            load_pb: None,
            scan_pb: None,
            show_progress: true,
        }
    }

    /// Create minimal progress reporter (no progress bars)
    pub fn new_minimal() -> Self {
        Self {
            load_pb: None,
            scan_pb: None,
            show_progress: false,
        }
    }

    /// Start or update the table loading spinner
    pub fn update_load(&mut self, message: &str) {
        if !self.show_progress {
            return;
        }
        match &self.load_pb {
            Some(pb) => pb.set_message(message.to_string()),
            None => self.load_pb = Some(create_spinner(message)),
        }
    }

    pub fn finish_load(&mut self, message: &str) {
        if let Some(pb) = self.load_pb.take() {
            pb.finish_with_message(message.to_string());
        }
    }

    /// Start or update the file scanning spinner
    pub fn update_scan(&mut self, message: &str) {
        if !self.show_progress {
            return;
        }
        match &self.scan_pb {
            Some(pb) => pb.set_message(message.to_string()),
            None => self.scan_pb = Some(create_spinner(message)),
        }
    }

    pub fn finish_scan(&mut self, message: &str) {
        if let Some(pb) = self.scan_pb.take() {
            pb.finish_with_message(message.to_string());
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        // Ensure all progress bars are cleaned up silently
        if let Some(pb) = self.load_pb.take() {
            pb.finish_and_clear();
        }
        if let Some(pb) = self.scan_pb.take() {
            pb.finish_and_clear();
        }
    }
}

/// Create a spinner progress bar
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
