// SPDX-License-Identifier: MIT

//! Tree walker.
//!
//! Walks every root with an explicit worklist and folds each entry into a
//! [`RawStats`]. Depth bookkeeping: a root is processed at its starting depth
//! (0 by default) and its direct children are recorded at that depth, so the
//! children of a default root are depth 0 and the root itself is never
//! counted as a directory.
//!
//! Symlinks and special files are ignored and never followed. Zero-byte files
//! and files with an excluded extension are skipped entirely.
//!
//! A directory that cannot be listed is treated as empty: it still yields its
//! fan-out sample and the failure is recorded in [`WalkReport::issues`].

use core::fmt;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    bucket::size_bucket,
    config::ScanConfig,
    errors::{StatError, StatResult},
    stats::RawStats,
};

/// Top-level directories scanned when no root is given.
///
/// Pseudo filesystems (`/proc`, `/sys`, `/dev`), runtime and volatile trees
/// (`/run`, `/tmp`, `/var`), mount points (`/mnt`, `/media`) and the merged-usr
/// aliases (`/bin`, `/sbin`, `/lib*`) are left out.
pub const DEFAULT_ROOTS: &[&str] = &["/boot", "/etc", "/home", "/opt", "/root", "/srv", "/usr"];

/// A directory to scan and the depth its direct children are recorded at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Root {
    pub path: PathBuf,
    #[serde(default)]
    pub depth: u64,
}

impl Root {
    pub fn new(path: impl Into<PathBuf>, depth: u64) -> Self {
        Self {
            path: path.into(),
            depth,
        }
    }

    /// Parses `path` or `path:depth`.
    pub fn parse(spec: &str) -> StatResult<Self> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(StatError::Config {
                message: "empty root path".into(),
            });
        }
        if let Some((path, depth)) = spec.rsplit_once(':') {
            if let Ok(depth) = depth.parse::<u64>() {
                if path.is_empty() {
                    return Err(StatError::Config {
                        message: format!("root '{spec}' has a depth but no path"),
                    });
                }
                return Ok(Root::new(path, depth));
            }
        }
        Ok(Root::new(spec, 0))
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (depth {})", self.path.display(), self.depth)
    }
}

/// Where a walk starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Roots {
    /// [`DEFAULT_ROOTS`], each at depth 0.
    Defaults,
    /// Caller supplied roots.
    Custom(Vec<Root>),
}

impl Roots {
    pub fn resolve(&self) -> Vec<Root> {
        match self {
            Roots::Defaults => DEFAULT_ROOTS.iter().map(|p| Root::new(*p, 0)).collect(),
            Roots::Custom(roots) => roots.clone(),
        }
    }
}

/// What was being attempted when a walk issue occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueStage {
    ListDir,
    ReadEntry,
    Metadata,
}

impl IssueStage {
    pub fn msg(&self) -> &'static str {
        match self {
            IssueStage::ListDir => "cannot list directory",
            IssueStage::ReadEntry => "cannot read directory entry",
            IssueStage::Metadata => "cannot stat entry",
        }
    }
}

/// A portion of the tree the walk had to skip.
#[derive(Debug)]
pub struct WalkIssue {
    pub path: PathBuf,
    pub stage: IssueStage,
    pub error: io::Error,
}

impl fmt::Display for WalkIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}': {}",
            self.stage.msg(),
            self.path.display(),
            self.error
        )
    }
}

/// Hooks called while walking. All methods default to no-ops.
pub trait WalkObserver {
    fn on_dir(&mut self, _path: &Path, _depth: u64) {}
    fn on_issue(&mut self, _issue: &WalkIssue) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl WalkObserver for NoopObserver {}

/// Result of a walk: the raw record plus what was left out of it.
#[derive(Debug, Default)]
pub struct WalkReport {
    pub stats: RawStats,
    /// Directories or entries that could not be read.
    pub issues: Vec<WalkIssue>,
    /// Directories processed, roots included.
    pub dirs_processed: u64,
    /// Regular files skipped for being empty or having an excluded extension.
    pub excluded_files: u64,
    /// Symlinks and special files.
    pub ignored_entries: u64,
}

impl WalkReport {
    /// True when nothing had to be skipped because of an I/O error.
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }

    fn record<O: WalkObserver + ?Sized>(
        &mut self,
        observer: &mut O,
        path: &Path,
        stage: IssueStage,
        error: io::Error,
    ) {
        let issue = WalkIssue {
            path: path.to_path_buf(),
            stage,
            error,
        };
        log::warn!("{issue}, skipping");
        observer.on_issue(&issue);
        self.issues.push(issue);
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Fanout {
    subdirs: u64,
    files: u64,
}

/// Walks `roots` and returns the raw statistics.
pub fn walk(roots: &Roots, config: &ScanConfig) -> WalkReport {
    walk_with(roots, config, &mut NoopObserver)
}

/// Same as [`walk`], reporting progress to `observer`.
pub fn walk_with<O: WalkObserver + ?Sized>(
    roots: &Roots,
    config: &ScanConfig,
    observer: &mut O,
) -> WalkReport {
    let mut report = WalkReport::default();
    // popped from the back, so reverse to start with the first root
    let mut pending: Vec<(PathBuf, u64)> = roots
        .resolve()
        .into_iter()
        .rev()
        .map(|root| (root.path, root.depth))
        .collect();

    while let Some((dir, depth)) = pending.pop() {
        log::debug!("visiting {} at depth {depth}", dir.display());
        observer.on_dir(&dir, depth);

        let fanout = visit_dir(&dir, depth, config, &mut report, &mut pending, observer);

        report.stats.subdir_counts.incr(fanout.subdirs);
        report.stats.file_counts.incr(fanout.files);
        report.dirs_processed += 1;
    }

    log::info!(
        "walked {} directories: {} dirs below roots, {} files, {} bytes ({} excluded, {} ignored, {} issues)",
        report.dirs_processed,
        report.stats.total_dirs(),
        report.stats.total_files(),
        report.stats.total_bytes(),
        report.excluded_files,
        report.ignored_entries,
        report.issues.len(),
    );
    report
}

/// Classifies every direct child of `dir`. Subdirectories are queued, never
/// descended into here.
fn visit_dir<O: WalkObserver + ?Sized>(
    dir: &Path,
    depth: u64,
    config: &ScanConfig,
    report: &mut WalkReport,
    pending: &mut Vec<(PathBuf, u64)>,
    observer: &mut O,
) -> Fanout {
    let mut fanout = Fanout::default();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            report.record(observer, dir, IssueStage::ListDir, e);
            return fanout;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                report.record(observer, dir, IssueStage::ReadEntry, e);
                continue;
            }
        };
        let path = entry.path();

        // does not follow symlinks
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) => {
                report.record(observer, &path, IssueStage::Metadata, e);
                continue;
            }
        };

        if file_type.is_dir() {
            report.stats.dir_depths.incr(depth);
            pending.push((path, depth + 1));
            fanout.subdirs += 1;
        } else if file_type.is_file() {
            let size = match entry.metadata() {
                Ok(meta) => meta.len(),
                Err(e) => {
                    report.record(observer, &path, IssueStage::Metadata, e);
                    continue;
                }
            };
            if size == 0 || config.is_excluded(&path) {
                report.excluded_files += 1;
                continue;
            }

            fanout.files += 1;
            let bucket = size_bucket(size) as u64;
            let stats = &mut report.stats;
            stats.file_depths.incr(depth);
            stats.file_sizes.incr(bucket);
            stats.file_bytes.add(bucket, size);
            stats.byte_depths.add(depth, size);
        } else {
            report.ignored_entries += 1;
        }
    }

    fanout
}
