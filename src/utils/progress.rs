use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a search is loading.
pub struct LoadingIndicator {
    progress_bar: Option<ProgressBar>,
}

impl LoadingIndicator {
    pub fn start(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self {
            progress_bar: Some(pb),
        }
    }

    /// An indicator that draws nothing, for machine-readable output.
    pub fn hidden() -> Self {
        Self { progress_bar: None }
    }

    pub fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_and_clear();
        }
    }
}

impl Drop for LoadingIndicator {
    fn drop(&mut self) {
        self.finish();
    }
}
