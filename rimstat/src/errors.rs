// SPDX-License-Identifier: MIT

use core::fmt;
use std::{io, path::PathBuf};

pub type StatResult<T = ()> = Result<T, StatError>;

/// Errors reported by persistence, export and configuration.
///
/// The walker never returns one of these: listing failures are recorded in
/// its report instead.
#[derive(Debug)]
pub enum StatError {
    Io { path: PathBuf, source: io::Error },
    Parse { origin: String, message: String },
    Encode { message: String },
    Config { message: String },
}

impl StatError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StatError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(origin: impl Into<String>, message: impl fmt::Display) -> Self {
        StatError::Parse {
            origin: origin.into(),
            message: message.to_string(),
        }
    }

    pub fn msg(&self) -> &'static str {
        match self {
            StatError::Io { .. } => "IO error",
            StatError::Parse { .. } => "Parse error",
            StatError::Encode { .. } => "Encode error",
            StatError::Config { .. } => "Invalid config",
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, StatError::Parse { .. })
    }
}

impl fmt::Display for StatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatError::Io { path, source } => {
                write!(f, "{} on '{}': {source}", self.msg(), path.display())
            }
            StatError::Parse { origin, message } => {
                write!(f, "{} in {origin}: {}", self.msg(), message.trim_end())
            }
            StatError::Encode { message } | StatError::Config { message } => {
                write!(f, "{}: {message}", self.msg())
            }
        }
    }
}

impl std::error::Error for StatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StatError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
