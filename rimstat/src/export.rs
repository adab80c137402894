// SPDX-License-Identifier: MIT

//! CSV export: one two-column `key,value` file per distribution.

use std::{
    fs,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{
    dist::{Distribution, StatValue},
    errors::{StatError, StatResult},
    stats::FsStats,
};

/// Writes `key,value` lines in ascending key order. Values are always written
/// as real numbers, raw counts included.
pub fn write_csv<V: StatValue, W: Write>(dist: &Distribution<V>, writer: &mut W) -> io::Result<()> {
    for (key, value) in dist.iter() {
        writeln!(writer, "{key},{:?}", value.as_f64())?;
    }
    Ok(())
}

/// Writes `<dir>/<distribution>.csv` for every distribution and returns the
/// files written. The directory is created if needed.
pub fn export_dir<V: StatValue>(stats: &FsStats<V>, dir: impl AsRef<Path>) -> StatResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| StatError::io(dir, e))?;

    let mut written = Vec::with_capacity(7);
    for (kind, dist) in stats.distributions() {
        let path = dir.join(format!("{}.csv", kind.name()));
        let file = fs::File::create(&path).map_err(|e| StatError::io(&path, e))?;
        let mut writer = BufWriter::new(file);
        write_csv(dist, &mut writer)
            .and_then(|_| writer.flush())
            .map_err(|e| StatError::io(&path, e))?;
        written.push(path);
    }
    Ok(written)
}
