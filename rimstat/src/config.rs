// SPDX-License-Identifier: MIT

//! Scan configuration.
//!
//! ```toml
//! exclude_extensions = ["iso", "qcow2"]
//!
//! [[roots]]
//! path = "/usr"
//!
//! [[roots]]
//! path = "data"   # relative to the config file
//! depth = 1
//! ```

use serde::Deserialize;
use std::{fs, path::Path};

use crate::{
    errors::{StatError, StatResult},
    walker::{Root, Roots},
};

pub const DEFAULT_EXCLUDED_EXTENSIONS: &[&str] = &["iso"];

fn default_excluded() -> Vec<String> {
    DEFAULT_EXCLUDED_EXTENSIONS
        .iter()
        .map(|e| e.to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    /// Extensions (without the dot, case-insensitive) whose files are left out
    /// of every distribution.
    #[serde(default = "default_excluded")]
    pub exclude_extensions: Vec<String>,
    /// Roots to scan when none are given on the command line.
    #[serde(default)]
    pub roots: Vec<Root>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude_extensions: default_excluded(),
            roots: Vec::new(),
        }
    }
}

impl ScanConfig {
    /// Loads a config file. Relative roots are resolved against its directory.
    pub fn from_file(path: &Path) -> StatResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| StatError::io(path, e))?;
        let mut config = Self::parse(&content, &path.display().to_string())?;

        let base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        for root in &mut config.roots {
            if root.path.is_relative() {
                root.path = base_dir.join(&root.path);
            }
        }
        log::debug!(
            "loaded config {}: {} roots, excluded {:?}",
            path.display(),
            config.roots.len(),
            config.exclude_extensions
        );
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> StatResult<Self> {
        Self::parse(content, "<config>")
    }

    fn parse(content: &str, origin: &str) -> StatResult<Self> {
        let mut config: ScanConfig =
            toml::from_str(content).map_err(|e| StatError::parse(origin, e))?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Adds an excluded extension (`.ISO` and `iso` are the same).
    pub fn exclude(mut self, extension: &str) -> Self {
        let ext = normalize_extension(extension);
        if !self.exclude_extensions.contains(&ext) {
            self.exclude_extensions.push(ext);
        }
        self
    }

    pub fn validate(&self) -> StatResult {
        if let Some(bad) = self
            .exclude_extensions
            .iter()
            .find(|e| e.is_empty() || e.contains(['/', '\\']))
        {
            return Err(StatError::Config {
                message: format!("invalid excluded extension '{bad}'"),
            });
        }
        if let Some(bad) = self.roots.iter().find(|r| r.path.as_os_str().is_empty()) {
            return Err(StatError::Config {
                message: format!("root with empty path (depth {})", bad.depth),
            });
        }
        Ok(())
    }

    /// Configured roots, or the curated defaults when there are none.
    pub fn roots(&self) -> Roots {
        if self.roots.is_empty() {
            Roots::Defaults
        } else {
            Roots::Custom(self.roots.clone())
        }
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.exclude_extensions
                    .iter()
                    .any(|x| x.eq_ignore_ascii_case(ext))
            })
    }

    fn normalize(&mut self) {
        for ext in &mut self.exclude_extensions {
            *ext = normalize_extension(ext);
        }
        let mut seen: Vec<String> = Vec::new();
        self.exclude_extensions.retain(|ext| {
            let fresh = !seen.contains(ext);
            if fresh {
                seen.push(ext.clone());
            }
            fresh
        });
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}
