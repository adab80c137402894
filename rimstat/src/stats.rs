// SPDX-License-Identifier: MIT

//! The statistics record.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::dist::{Distribution, StatValue};

/// Names the seven distributions of an [`FsStats`], in their fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DistKind {
    DirDepths,
    SubdirCounts,
    FileCounts,
    FileSizes,
    FileBytes,
    FileDepths,
    ByteDepths,
}

impl DistKind {
    pub const ALL: [DistKind; 7] = [
        DistKind::DirDepths,
        DistKind::SubdirCounts,
        DistKind::FileCounts,
        DistKind::FileSizes,
        DistKind::FileBytes,
        DistKind::FileDepths,
        DistKind::ByteDepths,
    ];

    /// Field name, also used as the TOML table and CSV file name.
    pub fn name(self) -> &'static str {
        match self {
            DistKind::DirDepths => "dir_depths",
            DistKind::SubdirCounts => "subdir_counts",
            DistKind::FileCounts => "file_counts",
            DistKind::FileSizes => "file_sizes",
            DistKind::FileBytes => "file_bytes",
            DistKind::FileDepths => "file_depths",
            DistKind::ByteDepths => "byte_depths",
        }
    }

    /// What the key of this distribution measures.
    pub fn key_label(self) -> &'static str {
        match self {
            DistKind::DirDepths | DistKind::FileDepths | DistKind::ByteDepths => "depth",
            DistKind::SubdirCounts => "subdirs",
            DistKind::FileCounts => "files",
            DistKind::FileSizes | DistKind::FileBytes => "log2 size",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl fmt::Display for DistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Seven distributions describing the shape of a tree.
///
/// `FsStats<u64>` ([`RawStats`]) is what a walk produces;
/// `FsStats<f64>` ([`CookedStats`]) is what cooking produces.
/// Field order is the on-disk order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FsStats<V> {
    /// depth -> directories at that depth (roots excluded)
    pub dir_depths: Distribution<V>,
    /// subdirectory count -> directories with exactly that many
    pub subdir_counts: Distribution<V>,
    /// file count -> directories with exactly that many
    pub file_counts: Distribution<V>,
    /// size bucket -> files
    pub file_sizes: Distribution<V>,
    /// size bucket -> bytes
    pub file_bytes: Distribution<V>,
    /// depth -> files
    pub file_depths: Distribution<V>,
    /// depth -> bytes
    pub byte_depths: Distribution<V>,
}

pub type RawStats = FsStats<u64>;
pub type CookedStats = FsStats<f64>;

impl<V: StatValue> FsStats<V> {
    pub fn new() -> Self {
        Self {
            dir_depths: Distribution::new(),
            subdir_counts: Distribution::new(),
            file_counts: Distribution::new(),
            file_sizes: Distribution::new(),
            file_bytes: Distribution::new(),
            file_depths: Distribution::new(),
            byte_depths: Distribution::new(),
        }
    }

    pub fn get(&self, kind: DistKind) -> &Distribution<V> {
        match kind {
            DistKind::DirDepths => &self.dir_depths,
            DistKind::SubdirCounts => &self.subdir_counts,
            DistKind::FileCounts => &self.file_counts,
            DistKind::FileSizes => &self.file_sizes,
            DistKind::FileBytes => &self.file_bytes,
            DistKind::FileDepths => &self.file_depths,
            DistKind::ByteDepths => &self.byte_depths,
        }
    }

    pub fn get_mut(&mut self, kind: DistKind) -> &mut Distribution<V> {
        match kind {
            DistKind::DirDepths => &mut self.dir_depths,
            DistKind::SubdirCounts => &mut self.subdir_counts,
            DistKind::FileCounts => &mut self.file_counts,
            DistKind::FileSizes => &mut self.file_sizes,
            DistKind::FileBytes => &mut self.file_bytes,
            DistKind::FileDepths => &mut self.file_depths,
            DistKind::ByteDepths => &mut self.byte_depths,
        }
    }

    /// Every distribution with its name, in the fixed order.
    pub fn distributions(&self) -> impl Iterator<Item = (DistKind, &Distribution<V>)> + '_ {
        DistKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    pub fn is_empty(&self) -> bool {
        self.distributions().all(|(_, d)| d.is_empty())
    }
}

impl RawStats {
    /// Directories found below the roots.
    pub fn total_dirs(&self) -> u64 {
        self.dir_depths.total()
    }

    /// Directories processed, roots included: one fan-out sample each.
    pub fn dir_samples(&self) -> u64 {
        self.subdir_counts.total()
    }

    pub fn total_files(&self) -> u64 {
        self.file_depths.total()
    }

    pub fn total_bytes(&self) -> u64 {
        self.byte_depths.total()
    }

    /// Folds another raw record into this one.
    pub fn merge(&mut self, other: &RawStats) {
        for kind in DistKind::ALL {
            let dst = self.get_mut(kind);
            for (k, v) in other.get(kind).iter() {
                dst.add(k, v);
            }
        }
    }
}

impl<V: StatValue> fmt::Display for FsStats<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "\n  ┌───────────────┬───────────┬─────────┬────────────┬──────────────────┐"
        )?;
        writeln!(
            f,
            "  | Distribution  | Key       | Entries | Key range  | Total            |"
        )?;
        writeln!(
            f,
            "  ├───────────────┼───────────┼─────────┼────────────┼──────────────────┤"
        )?;
        for (kind, dist) in self.distributions() {
            let range = match (dist.min_key(), dist.max_key()) {
                (Some(lo), Some(hi)) => format!("{lo}..={hi}"),
                _ => "-".into(),
            };
            writeln!(
                f,
                "  | {n:<13} | {k:<9} | {e:>7} | {r:>10} | {t:>16} |",
                n = kind.name(),
                k = kind.key_label(),
                e = dist.len(),
                r = range,
                t = dist.total().render(),
            )?;
        }
        writeln!(
            f,
            "  └───────────────┴───────────┴─────────┴────────────┴──────────────────┘"
        )
    }
}
