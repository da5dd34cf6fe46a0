use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Progress sink of the synchronization core.
///
/// Both setters are monotone: a value lower than the retained one is ignored.
/// Every operation is safe to call with the same value repeatedly and `end`
/// is idempotent.
pub trait Watcher: Send {
    // replace the current short status line
    fn write_status(&mut self, text: &str);

    // raise the download percentage, returns the retained value
    fn set_download_percent(&mut self, pct: u64) -> u64;

    fn download_percent(&self) -> u64;

    // raise the applied percentage, returns the retained value
    fn set_applied_percent(&mut self, pct: u64) -> u64;

    fn applied_percent(&self) -> u64;

    // final flush / teardown
    fn end(&mut self);
}

// Non-interactive watcher, emits a log line whenever a percentage strictly
// increases
#[derive(Default)]
pub struct LogWatcher {
    download: u64,
    applied: u64,
    status: String,
    ended: bool,
}

impl Watcher for LogWatcher {
    fn write_status(&mut self, text: &str) {
        if self.status != text {
            self.status = text.to_string();
            info!("{}", text);
        }
    }

    fn set_download_percent(&mut self, pct: u64) -> u64 {
        if pct > self.download {
            self.download = pct.min(100);
            info!("Downloaded {}%", self.download);
        }
        self.download
    }

    fn download_percent(&self) -> u64 {
        self.download
    }

    fn set_applied_percent(&mut self, pct: u64) -> u64 {
        if pct > self.applied {
            self.applied = pct.min(100);
            info!("Applied {}%", self.applied);
        }
        self.applied
    }

    fn applied_percent(&self) -> u64 {
        self.applied
    }

    fn end(&mut self) {
        if !self.ended {
            self.ended = true;
            debug!("watcher closed");
        }
    }
}

// Interactive watcher drawing two progress bars and a status line on the
// terminal
pub struct TermWatcher {
    download: ProgressBar,
    applied: ProgressBar,
    status: ProgressBar,
    ended: bool,
}

impl TermWatcher {
    pub fn new() -> Self {
        let multi = MultiProgress::new();
        let style = ProgressStyle::with_template("{prefix:>10} [{bar:40}] {pos:>3}%")
            .expect("valid progress template")
            .progress_chars("=> ");
        let download = multi.add(
            ProgressBar::new(100)
                .with_style(style.clone())
                .with_prefix("Download"),
        );
        let applied = multi.add(
            ProgressBar::new(100)
                .with_style(style)
                .with_prefix("Apply"),
        );
        let status = multi.add(
            ProgressBar::no_length()
                .with_style(ProgressStyle::with_template("{msg}").expect("valid status template")),
        );
        TermWatcher {
            download,
            applied,
            status,
            ended: false,
        }
    }
}

impl Default for TermWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Watcher for TermWatcher {
    fn write_status(&mut self, text: &str) {
        self.status.set_message(text.to_string());
    }

    fn set_download_percent(&mut self, pct: u64) -> u64 {
        if pct > self.download.position() {
            self.download.set_position(pct.min(100));
        }
        self.download.position()
    }

    fn download_percent(&self) -> u64 {
        self.download.position()
    }

    fn set_applied_percent(&mut self, pct: u64) -> u64 {
        if pct > self.applied.position() {
            self.applied.set_position(pct.min(100));
        }
        self.applied.position()
    }

    fn applied_percent(&self) -> u64 {
        self.applied.position()
    }

    fn end(&mut self) {
        if !self.ended {
            self.ended = true;
            self.download.finish();
            self.applied.finish();
            self.status.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_watcher_is_monotone() {
        let mut watcher = LogWatcher::default();
        assert_eq!(watcher.set_download_percent(10), 10);
        assert_eq!(watcher.set_download_percent(5), 10);
        assert_eq!(watcher.set_download_percent(10), 10);
        assert_eq!(watcher.set_download_percent(42), 42);
        assert_eq!(watcher.download_percent(), 42);
        // the two percentages are independent
        assert_eq!(watcher.applied_percent(), 0);
    }

    #[test]
    fn test_log_watcher_caps_at_100() {
        let mut watcher = LogWatcher::default();
        assert_eq!(watcher.set_applied_percent(250), 100);
    }

    #[test]
    fn test_end_is_idempotent() {
        let mut watcher = LogWatcher::default();
        watcher.end();
        watcher.end();
        assert!(watcher.ended);
    }
}
