// SPDX-License-Identifier: MIT

//! Filesystem shape statistics.
//!
//! `rimstat` walks a directory tree and records how directories are spread by
//! depth and fan-out, how files are spread by size class and depth, and where
//! the bytes live. Raw counts can be cooked into fractions, persisted as TOML,
//! exported as CSV and compared against each other, which is how generated
//! trees are checked against real ones.
//!
//! ```no_run
//! use rimstat::{Roots, ScanConfig, cook, walk};
//!
//! let report = walk(&Roots::Defaults, &ScanConfig::default());
//! let cooked = cook(report.stats);
//! rimstat::store::save(&cooked.stats, "cooked.toml").unwrap();
//! ```

pub mod bucket;
pub mod compare;
pub mod config;
pub mod cook;
pub mod dist;
pub mod errors;
pub mod export;
pub mod stats;
pub mod store;
pub mod walker;

pub use bucket::*;
pub use compare::{DistDelta, compare};
pub use config::*;
pub use cook::{Cooked, cook};
pub use dist::*;
pub use errors::*;
pub use stats::*;
pub use walker::*;
