use std::time::{Duration, Instant};
use indicatif::{ProgressBar, ProgressStyle};

pub struct ProgressReporter {
    bar: ProgressBar,
    start_time: Instant,
}

impl ProgressReporter {
    pub fn new_spinner(task_name: &str) -> Self {
        let bar = ProgressBar::new_spinner();

        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_message(format!("Starting {}", task_name));

        Self {
            bar,
            start_time: Instant::now(),
        }
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.bar.set_message(message.into());
    }

    pub fn finish_with_message(&self, message: &str) {
        let elapsed = self.start_time.elapsed();
        self.bar.finish_with_message(format!("{} ({})", message, format_duration(elapsed)));
    }
}

pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}
