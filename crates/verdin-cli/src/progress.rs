#![allow(dead_code)]

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Create a progress bar for determinate progress
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg}\n[{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta}")
            .unwrap()
            .progress_chars("█▓▒░ "),
    );
    pb.set_message(message.to_string());
    pb
}

/// Create a multi-progress container for multiple progress bars
pub fn create_multi_progress() -> MultiProgress {
    MultiProgress::new()
}

/// Finish a progress bar with success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}

/// Finish a progress bar with error message
pub fn finish_error(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✗ {}", message));
}

/// Progress tracker for annotate runs
pub struct RunProgressBars {
    pub multi: MultiProgress,
    pub layers: ProgressBar,
    pub annotate: ProgressBar,
    pub export: ProgressBar,
}

impl RunProgressBars {
    pub fn new() -> Self {
        let multi = create_multi_progress();

        let layers = multi.add(create_spinner("Building layers..."));
        let annotate = multi.add(create_spinner("Waiting for layers..."));
        let export = multi.add(create_spinner("Waiting to export..."));

        Self { multi, layers, annotate, export }
    }

    pub fn update_layers(&self, message: &str) {
        self.layers.set_message(message.to_string());
    }

    pub fn finish_layers(&self, count: usize) {
        finish_success(&self.layers, &format!("Built {} layers", count));
    }

    pub fn start_annotate(&mut self, total: u64) {
        self.annotate.finish_and_clear();
        self.annotate = self
            .multi
            .insert_after(&self.layers, create_progress_bar(total, "Annotating records"));
    }

    pub fn update_annotate(&self, current: u64) {
        self.annotate.set_position(current);
    }

    pub fn finish_annotate(&self, total: usize) {
        finish_success(&self.annotate, &format!("Annotated {} records", total));
    }

    pub fn start_export(&self) {
        self.export.set_message("Exporting rows...");
    }

    pub fn finish_export(&self, rows: usize) {
        finish_success(&self.export, &format!("Exported {} rows", rows));
    }
}
