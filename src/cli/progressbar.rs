use crate::{skp::ReservationResponse, upload::UploadObserver};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// "█▉▊▋▌▍▎▏  ·"
const PROGRES_CHARS: &str =
    "\u{2588}\u{2589}\u{258a}\u{258b}\u{258c}\u{258d}\u{258e}\u{258f}  \u{b7}";

const PROGRES_CHARS_SPINNER: &[&str] = &[
    "\u{2801}", "\u{2802}", "\u{2804}", "\u{2840}", "\u{2880}", "\u{2820}", "\u{2810}", "\u{2808}",
    "",
];

#[derive(Default, Debug)]
pub struct Bar {
    pub progress: Option<ProgressBar>,
}

impl Bar {
    fn with_template(len: u64, template: &str, quiet: bool) -> Self {
        if quiet {
            return Self::default();
        }

        let pb = ProgressBar::new(len);

        let style = match ProgressStyle::default_bar().template(template) {
            Ok(style) => style,
            Err(err) => {
                eprintln!("Error creating progress bar style: {err}");
                return Self { progress: None };
            }
        };

        pb.set_style(style.progress_chars(PROGRES_CHARS));

        Self { progress: Some(pb) }
    }

    /// Bytes of a single file download.
    #[must_use]
    pub fn new(file_size: u64, quiet: bool) -> Self {
        Self::with_template(
            file_size,
            "[{elapsed_precise}] {bar:50.green/blue} {bytes}/{total_bytes} ({bytes_per_sec} - {eta}) {msg}",
            quiet,
        )
    }

    /// Whole transfer upload, 0 to 100.
    #[must_use]
    pub fn new_percent(quiet: bool) -> Self {
        Self::with_template(
            100,
            "[{elapsed_precise}] {bar:50.cyan/blue} {pos:>3}% {msg}",
            quiet,
        )
    }

    /// Counting transfers, `copy`.
    #[must_use]
    pub fn new_count(total: u64, quiet: bool) -> Self {
        Self::with_template(
            total,
            "[{elapsed_precise}] {bar:50.green/blue} {pos}/{len} transfers",
            quiet,
        )
    }

    #[must_use]
    pub fn new_spinner(msg: &'static str, quiet: bool) -> Self {
        if quiet {
            return Self::default();
        }

        let pb = ProgressBar::new_spinner();

        pb.enable_steady_tick(Duration::from_millis(200));

        let style_result = ProgressStyle::default_spinner()
            .tick_strings(PROGRES_CHARS_SPINNER)
            .template("{msg} {spinner:.green}");

        let style = match style_result {
            Ok(s) => s,
            Err(err) => {
                eprintln!("Error creating spinner style: {err}");
                return Self { progress: None };
            }
        };

        pb.set_style(style);
        pb.set_message(msg);

        Self { progress: Some(pb) }
    }

    pub fn set_position(&self, pos: u64) {
        if let Some(pb) = self.progress.as_ref() {
            pb.set_position(pos);
        }
    }

    pub fn inc(&self, delta: u64) {
        if let Some(pb) = self.progress.as_ref() {
            pb.inc(delta);
        }
    }

    pub fn finish(&self) {
        if let Some(pb) = self.progress.as_ref() {
            pb.finish();
        }
    }

    pub fn finish_and_clear(&self) {
        if let Some(pb) = self.progress.as_ref() {
            pb.finish_and_clear();
        }
    }
}

impl UploadObserver for Bar {
    fn progress(&self, percent: u8) {
        self.set_position(u64::from(percent));
    }

    fn reservation_created(&self, reservation: &ReservationResponse) {
        if let Some(pb) = self.progress.as_ref() {
            pb.set_message(format!("{} file(s)", reservation.files.len()));
        }
    }

    fn reservation_confirm(&self) {
        if let Some(pb) = self.progress.as_ref() {
            pb.set_message("confirming");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet() {
        assert!(Bar::new(10, true).progress.is_none());
        assert!(Bar::new_percent(true).progress.is_none());
        assert!(Bar::new_count(3, true).progress.is_none());
        assert!(Bar::new_spinner("x", true).progress.is_none());
    }

    #[test]
    fn test_percent_observer() {
        let bar = Bar::new_percent(false);
        bar.progress(42);
        assert_eq!(bar.progress.as_ref().map(ProgressBar::position), Some(42));
        bar.reservation_confirm();
        bar.finish_and_clear();
    }
}
