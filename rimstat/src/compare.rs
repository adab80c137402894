// SPDX-License-Identifier: MIT

//! Distance between two cooked records, e.g. a generated tree against the
//! real one it imitates.

use core::fmt;

use crate::stats::{CookedStats, DistKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistDelta {
    pub kind: DistKind,
    /// Largest `|a - b|` over the union of keys.
    pub max_abs_diff: f64,
    /// Key where `max_abs_diff` occurs, `None` when both sides are empty.
    pub at_key: Option<u64>,
    /// `0.5 * sum(|a - b|)`. Meaningless for the cumulative `subdir_counts`
    /// and the log2 `byte_depths`, reported anyway.
    pub total_variation: f64,
}

impl fmt::Display for DistDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<13} max |Δ| {:.4}",
            self.kind.name(),
            self.max_abs_diff
        )?;
        if let Some(key) = self.at_key {
            write!(f, " at {key}")?;
        }
        write!(f, ", tv {:.4}", self.total_variation)
    }
}

/// One delta per distribution, in the fixed order. Missing keys count as zero.
pub fn compare(a: &CookedStats, b: &CookedStats) -> Vec<DistDelta> {
    DistKind::ALL
        .into_iter()
        .map(|kind| {
            let (da, db) = (a.get(kind), b.get(kind));
            let mut keys: Vec<u64> = da.keys().chain(db.keys()).collect();
            keys.sort_unstable();
            keys.dedup();

            let mut delta = DistDelta {
                kind,
                max_abs_diff: 0.0,
                at_key: None,
                total_variation: 0.0,
            };
            for key in keys {
                let diff = (da.get(key) - db.get(key)).abs();
                delta.total_variation += diff;
                if delta.at_key.is_none() || diff > delta.max_abs_diff {
                    delta.max_abs_diff = diff;
                    delta.at_key = Some(key);
                }
            }
            delta.total_variation *= 0.5;
            delta
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::Distribution;

    #[test]
    fn test_identical_records() {
        let mut stats = CookedStats::new();
        stats.dir_depths = Distribution::from([(0, 0.5), (1, 0.5)]);
        let deltas = compare(&stats, &stats.clone());

        assert_eq!(deltas.len(), 7);
        assert!(deltas.iter().all(|d| d.max_abs_diff == 0.0 && d.total_variation == 0.0));
        assert_eq!(deltas[0].at_key, Some(0));
        assert_eq!(deltas[1].at_key, None, "both sides empty");
    }

    #[test]
    fn test_disjoint_keys() {
        let mut a = CookedStats::new();
        a.file_sizes = Distribution::from([(3, 1.0)]);
        let mut b = CookedStats::new();
        b.file_sizes = Distribution::from([(3, 0.25), (10, 0.75)]);

        let delta = compare(&a, &b)[DistKind::FileSizes as usize];
        assert_eq!(delta.kind, DistKind::FileSizes);
        assert_eq!(delta.max_abs_diff, 0.75);
        assert_eq!(delta.at_key, Some(3));
        assert_eq!(delta.total_variation, 0.75);
        println!("{delta}");
    }
}
