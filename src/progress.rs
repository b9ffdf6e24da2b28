//! Spinner shown by headless commands while waiting on the service.

use crate::output::{GREEN, RED, RESET, YELLOW};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

pub struct WaitSpinner {
    spinner: ProgressBar,
    label: String,
    start_time: Instant,
}

impl WaitSpinner {
    pub fn new(label: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_chars(SPINNER_CHARS)
            .template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(label.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));

        Self {
            spinner,
            label: label.to_string(),
            start_time: Instant::now(),
        }
    }

    fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    /// Clear the spinner line without printing a final message.
    pub fn clear(&self) {
        self.spinner.finish_and_clear();
    }

    pub fn finish_success(&self) {
        self.spinner.finish_and_clear();
        println!(
            "{GREEN}\u{2714} {} ({} ms){RESET}",
            self.label,
            self.elapsed_ms()
        );
    }

    pub fn finish_warning(&self) {
        self.spinner.finish_and_clear();
        println!("{YELLOW}! {}{RESET}", self.label);
    }

    pub fn finish_error(&self) {
        self.spinner.finish_and_clear();
        println!("{RED}\u{2718} {}{RESET}", self.label);
    }
}

impl Drop for WaitSpinner {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_lifecycle_smoke() {
        let spinner = WaitSpinner::new("Compiling main.mjava");
        spinner.finish_success();

        let spinner = WaitSpinner::new("Signing in");
        spinner.finish_error();

        // Dropped without finishing.
        let _spinner = WaitSpinner::new("Probing");
    }
}
