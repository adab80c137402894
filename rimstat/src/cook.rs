// SPDX-License-Identifier: MIT

//! Cooking: raw counts to fractions.
//!
//! | distribution    | cooked as                                          |
//! |-----------------|----------------------------------------------------|
//! | `dir_depths`    | fraction of directories below the roots            |
//! | `subdir_counts` | cumulative fraction of processed directories       |
//! | `file_counts`   | fraction of processed directories                  |
//! | `file_sizes`    | fraction of files                                  |
//! | `file_bytes`    | fraction of bytes                                  |
//! | `file_depths`   | fraction of files                                  |
//! | `byte_depths`   | `log2(bytes / files)` at each depth, from raw data |
//!
//! Fan-out histograms hold one sample per processed directory, roots
//! included, so they are divided by that sample count rather than by the
//! number of directories below the roots.

use crate::{
    dist::Distribution,
    stats::{CookedStats, DistKind, RawStats},
};

/// A cooked record and the distributions that had nothing to normalize.
#[derive(Debug, Clone, PartialEq)]
pub struct Cooked {
    pub stats: CookedStats,
    /// Distributions with a zero divisor, left empty in `stats`.
    pub degenerate: Vec<DistKind>,
}

impl Cooked {
    pub fn is_complete(&self) -> bool {
        self.degenerate.is_empty()
    }

    fn fill(&mut self, kind: DistKind, dist: Option<Distribution<f64>>) {
        match dist {
            Some(dist) => *self.stats.get_mut(kind) = dist,
            None => {
                log::warn!("{kind}: no data to normalize");
                self.degenerate.push(kind);
            }
        }
    }
}

/// Normalizes a raw record. Cooking is one-way, so the raw record is consumed.
pub fn cook(raw: RawStats) -> Cooked {
    let total_dirs = raw.total_dirs();
    let dir_samples = raw.dir_samples();
    let total_files = raw.total_files();
    let total_bytes = raw.total_bytes();

    let mut cooked = Cooked {
        stats: CookedStats::new(),
        degenerate: Vec::new(),
    };

    // needs the raw file_depths, so before anything else
    cooked.fill(DistKind::ByteDepths, byte_depth_bins(&raw));

    cooked.fill(DistKind::DirDepths, raw.dir_depths.normalized(total_dirs));
    cooked.fill(
        DistKind::SubdirCounts,
        raw.subdir_counts.cumulative().normalized(dir_samples),
    );
    cooked.fill(DistKind::FileCounts, raw.file_counts.normalized(dir_samples));
    cooked.fill(DistKind::FileSizes, raw.file_sizes.normalized(total_files));
    cooked.fill(DistKind::FileBytes, raw.file_bytes.normalized(total_bytes));
    cooked.fill(DistKind::FileDepths, raw.file_depths.normalized(total_files));

    cooked.degenerate.sort();
    cooked
}

/// Average file size per depth, as a log2 bin. Depths with no files or no
/// bytes are skipped.
fn byte_depth_bins(raw: &RawStats) -> Option<Distribution<f64>> {
    if raw.total_files() == 0 {
        return None;
    }
    let mut bins = Distribution::new();
    for (depth, files) in raw.file_depths.iter() {
        let bytes = raw.byte_depths.get(depth);
        if files == 0 || bytes == 0 {
            log::debug!("byte_depths: skipping depth {depth} ({files} files, {bytes} bytes)");
            continue;
        }
        bins.set(depth, (bytes as f64 / files as f64).log2());
    }
    Some(bins)
}
