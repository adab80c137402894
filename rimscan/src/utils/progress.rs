// SPDX-License-Identifier: MIT

use indicatif::{ProgressBar, ProgressStyle};
use rimstat::{WalkIssue, WalkObserver};
use std::{path::Path, time::Duration};

/// Spinner shown while walking. Hidden when `enabled` is false.
pub struct WalkProgress {
    pb: ProgressBar,
    issues: u64,
}

impl WalkProgress {
    pub fn new(enabled: bool) -> Self {
        let pb = if enabled {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} dirs {prefix} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        Self { pb, issues: 0 }
    }

    pub fn finish(self) {
        self.pb.finish_and_clear();
    }
}

impl WalkObserver for WalkProgress {
    fn on_dir(&mut self, path: &Path, _depth: u64) {
        self.pb.inc(1);
        // refreshing the message for every directory slows large walks down
        if self.pb.position() % 256 == 0 {
            self.pb.set_message(format!("{}", path.display()));
        }
    }

    fn on_issue(&mut self, _issue: &WalkIssue) {
        self.issues += 1;
        self.pb.set_prefix(format!("{} skipped", self.issues));
    }
}
