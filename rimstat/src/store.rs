// SPDX-License-Identifier: MIT

//! TOML persistence of statistics records.
//!
//! One table per distribution, in the fixed field order, keys written as
//! decimal strings:
//!
//! ```toml
//! # rimstat statistics (raw)
//! [dir_depths]
//! 0 = 2
//!
//! [subdir_counts]
//! 0 = 2
//! 2 = 1
//! # ... five more tables
//! ```
//!
//! Loading goes through the serde deserializer only. All seven tables must be
//! present; anything malformed is a [`StatError::Parse`].

use serde::{Serialize, de::DeserializeOwned};
use std::{fs, path::Path};

use crate::{
    cook::cook,
    dist::StatValue,
    errors::{StatError, StatResult},
    stats::{CookedStats, FsStats, RawStats},
};

/// A record loaded without knowing whether it was cooked.
#[derive(Debug, Clone, PartialEq)]
pub enum Stored {
    Raw(RawStats),
    Cooked(CookedStats),
}

impl Stored {
    pub fn kind(&self) -> &'static str {
        match self {
            Stored::Raw(_) => <u64 as StatValue>::KIND,
            Stored::Cooked(_) => <f64 as StatValue>::KIND,
        }
    }

    /// The cooked form, cooking raw records on the way.
    pub fn into_cooked(self) -> CookedStats {
        match self {
            Stored::Raw(raw) => cook(raw).stats,
            Stored::Cooked(cooked) => cooked,
        }
    }
}

pub fn to_toml_string<V: StatValue + Serialize>(stats: &FsStats<V>) -> StatResult<String> {
    let body = toml::to_string(stats).map_err(|e| StatError::Encode {
        message: e.to_string(),
    })?;
    Ok(format!("# rimstat statistics ({})\n{body}", V::KIND))
}

pub fn from_toml_str<V: StatValue + DeserializeOwned>(content: &str) -> StatResult<FsStats<V>> {
    parse(content, "<memory>")
}

/// Writes `stats` to `path`, replacing any existing file.
pub fn save<V: StatValue + Serialize>(stats: &FsStats<V>, path: impl AsRef<Path>) -> StatResult {
    let path = path.as_ref();
    let content = to_toml_string(stats)?;
    fs::write(path, content).map_err(|e| StatError::io(path, e))?;
    log::debug!("saved {} statistics to {}", V::KIND, path.display());
    Ok(())
}

pub fn load<V: StatValue + DeserializeOwned>(path: impl AsRef<Path>) -> StatResult<FsStats<V>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| StatError::io(path, e))?;
    parse(&content, &path.display().to_string())
}

/// Loads a record as raw if every value is an integer, as cooked otherwise.
/// An empty cooked record reads back as raw.
pub fn load_any(path: impl AsRef<Path>) -> StatResult<Stored> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| StatError::io(path, e))?;
    let origin = path.display().to_string();
    match parse::<u64>(&content, &origin) {
        Ok(raw) => Ok(Stored::Raw(raw)),
        Err(_) => parse::<f64>(&content, &origin).map(Stored::Cooked),
    }
}

fn parse<V: StatValue + DeserializeOwned>(content: &str, origin: &str) -> StatResult<FsStats<V>> {
    toml::from_str(content).map_err(|e| StatError::parse(origin, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::Distribution;

    fn sample() -> RawStats {
        RawStats {
            dir_depths: Distribution::from([(0, 2)]),
            subdir_counts: Distribution::from([(2, 1), (0, 2)]),
            file_counts: Distribution::from([(1, 2), (0, 1)]),
            file_sizes: Distribution::from([(10, 1), (3, 1)]),
            file_bytes: Distribution::from([(10, 1500), (3, 10)]),
            file_depths: Distribution::from([(0, 1), (1, 1)]),
            byte_depths: Distribution::from([(0, 1500), (1, 10)]),
        }
    }

    #[test]
    fn test_raw_round_trip_is_exact() {
        let stats = sample();
        let text = to_toml_string(&stats).expect("encode");
        let back: RawStats = from_toml_str(&text).expect("decode");
        assert_eq!(back, stats);
    }

    #[test]
    fn test_fields_written_in_fixed_order() {
        let text = to_toml_string(&sample()).unwrap();
        assert!(text.starts_with("# rimstat statistics (raw)"), "{text}");
        let positions: Vec<usize> = crate::stats::DistKind::ALL
            .iter()
            .map(|k| {
                text.find(&format!("[{}]", k.name()))
                    .unwrap_or_else(|| panic!("missing table {k}"))
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{text}");
    }

    #[test]
    fn test_empty_record_round_trips() {
        let text = to_toml_string(&RawStats::new()).unwrap();
        let back: RawStats = from_toml_str(&text).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn test_hand_authored_cooked() {
        let text = r#"
            [dir_depths]
            0 = 0.5
            1 = 0.5
            [subdir_counts]
            0 = 1
            [file_counts]
            [file_sizes]
            [file_bytes]
            [file_depths]
            [byte_depths]
            2 = 12.5
        "#;
        let cooked: CookedStats = from_toml_str(text).expect("integers are valid cooked values");
        assert_eq!(cooked.dir_depths.get(1), 0.5);
        assert_eq!(cooked.subdir_counts.get(0), 1.0);
        assert_eq!(cooked.byte_depths.get(2), 12.5);
    }

    #[test]
    fn test_load_any_detects_kind() {
        let tmp = tempfile::tempdir().unwrap();
        let raw_path = tmp.path().join("raw.toml");
        let cooked_path = tmp.path().join("cooked.toml");
        save(&sample(), &raw_path).unwrap();
        save(&cook(sample()).stats, &cooked_path).unwrap();

        let raw = load_any(&raw_path).unwrap();
        assert_eq!(raw, Stored::Raw(sample()));
        let cooked = load_any(&cooked_path).unwrap();
        assert_eq!(cooked.kind(), "cooked");
        assert_eq!(cooked.into_cooked().dir_depths.get(0), 1.0);

        std::fs::write(&raw_path, "garbage = [").unwrap();
        assert!(load_any(&raw_path).unwrap_err().is_parse());
    }

    #[test]
    fn test_malformed_is_parse_error() {
        let cases = [
            ("missing tables", "[dir_depths]\n0 = 1\n"),
            ("not toml", "dir_depths = {"),
            (
                "negative key",
                "[dir_depths]\n\"-1\" = 1\n[subdir_counts]\n[file_counts]\n[file_sizes]\n[file_bytes]\n[file_depths]\n[byte_depths]\n",
            ),
            (
                "float in raw record",
                "[dir_depths]\n0 = 0.5\n[subdir_counts]\n[file_counts]\n[file_sizes]\n[file_bytes]\n[file_depths]\n[byte_depths]\n",
            ),
            (
                "unknown table",
                "[dir_depths]\n[subdir_counts]\n[file_counts]\n[file_sizes]\n[file_bytes]\n[file_depths]\n[byte_depths]\n[extra]\n",
            ),
        ];
        for (name, text) in cases {
            let err = from_toml_str::<u64>(text).expect_err(name);
            assert!(err.is_parse(), "{name}: {err}");
        }
    }
}
