use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error type for version parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("invalid version format, expected 'major.minor.revision'")]
    InvalidFormat,
    #[error("version parse error: {0}")]
    ParseError(String),
}

/// A `{major, minor, revision}` version triple.
///
/// Used for display and for one-directional compatibility checks: a host
/// refuses a module declaring a newer major version than the host supports,
/// while older majors remain loadable.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ModuleVersion {
    pub major: u32,
    pub minor: u32,
    pub revision: u32,
}

impl ModuleVersion {
    /// Creates a new version triple.
    pub const fn new(major: u32, minor: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            revision,
        }
    }

    /// Whether a host at `self` accepts a module declaring `module`.
    pub fn host_accepts(&self, module: &ModuleVersion) -> bool {
        module.major <= self.major
    }
}

impl FromStr for ModuleVersion {
    type Err = VersionError;

    /// Parses a version string like "1.2.3".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(VersionError::InvalidFormat);
        }

        let parse_part = |part: &str| -> Result<u32, VersionError> {
            part.parse::<u32>()
                .map_err(|e| VersionError::ParseError(e.to_string()))
        };

        Ok(Self::new(
            parse_part(parts[0])?,
            parse_part(parts[1])?,
            parse_part(parts[2])?,
        ))
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}
