//! Console output: spinners while talking to the server, and the per-song lines.
//!
//! A recording console draws nothing and keeps every printed line instead,
//! so driver tests can check what a user would have seen.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

#[derive(Debug, Clone, Default)]
pub struct Console {
    /// Lines printed so far, when recording. Clones share it.
    recorded: Option<Rc<RefCell<Vec<String>>>>,
}

impl Console {
    pub fn terminal() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn recording() -> Self {
        Self {
            recorded: Some(Rc::default()),
        }
    }

    #[cfg(test)]
    pub fn recorded(&self) -> Vec<String> {
        self.recorded
            .as_ref()
            .map(|lines| lines.borrow().clone())
            .unwrap_or_default()
    }

    fn hidden(&self) -> bool {
        self.recorded.is_some()
    }

    /// Keep `text` when recording. Returns whether it was kept.
    fn record(&self, text: &str) -> bool {
        match &self.recorded {
            Some(lines) => {
                lines.borrow_mut().push(text.to_string());
                true
            }
            None => false,
        }
    }

    /// Spinner for work of unknown length (enumerating the server, counting files).
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if self.hidden() {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        } else {
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner} {wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
        }
        pb.set_message(msg.to_string());
        pb
    }

    /// Bar over the songs being rated.
    pub fn bar(&self, len: u64, prefix: &str) -> ProgressBar {
        let pb = ProgressBar::new(len).with_prefix(prefix.to_string());
        if self.hidden() {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        } else {
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{prefix} {wide_bar:.cyan/blue} [{pos}/{len}]")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );
        }
        pb
    }

    /// Print a line above `pb`, or straight to stdout when `pb` cannot draw.
    pub fn line(&self, pb: &ProgressBar, text: impl AsRef<str>) {
        if self.record(text.as_ref()) {
            return;
        }
        if pb.is_hidden() {
            println!("{}", text.as_ref());
        } else {
            pb.println(text);
        }
    }

    /// Print a line with no bar attached.
    pub fn say(&self, text: impl AsRef<str>) {
        if !self.record(text.as_ref()) {
            println!("{}", text.as_ref());
        }
    }
}

/// Zero-pad `n` to the width of `total`, so counters line up: `007/120`.
pub fn padded_count(n: usize, total: usize) -> String {
    let width = total.to_string().len();
    format!("{n:0width$}/{total}")
}
