//! CLI-specific progress handling for butterfly-viz
//!
//! Provides the spinner shown while routes are fetched for a one-shot render.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Creates a spinner for CLI display
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb
}

/// Spinner manager for the render command
pub struct ProgressManager {
    pub pb: ProgressBar,
}

impl ProgressManager {
    /// Create and start a spinner
    pub fn new(message: &str) -> Self {
        let pb = create_spinner(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }

    /// Stop the spinner, leaving a final message
    pub fn finish(&self, message: &str) {
        self.pb.finish_with_message(message.to_string());
    }
}
