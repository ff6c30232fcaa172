use std::fmt;
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A 128-bit globally-unique identifier, stored as four 32-bit words.
///
/// GUIDs are the sole stable identity for modules and plugins across
/// versions. The textual form, used for documentation cross-links between
/// plugin descriptions, is `{AAAAAAAA-BBBBBBBB-CCCCCCCC-DDDDDDDD}`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Guid(pub [u32; 4]);

impl Guid {
    /// Create a GUID from its four 32-bit words.
    pub const fn new(a: u32, b: u32, c: u32, d: u32) -> Self {
        Self([a, b, c, d])
    }

    /// The all-zero GUID, valid only as a placeholder.
    pub const fn nil() -> Self {
        Self([0; 4])
    }

    pub fn is_nil(&self) -> bool {
        self.0 == [0; 4]
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{:08X}-{:08X}-{:08X}-{:08X}}}",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Error type for GUID parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuidParseError {
    #[error("expected four '-'-separated groups, found {0}")]
    GroupCount(usize),
    #[error("group '{0}' is not a 32-bit hex value")]
    BadGroup(String),
}

impl FromStr for Guid {
    type Err = GuidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Braces are the canonical rendering but optional on input.
        let trimmed = s
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .unwrap_or(s);

        let groups: Vec<&str> = trimmed.split('-').collect();
        if groups.len() != 4 {
            return Err(GuidParseError::GroupCount(groups.len()));
        }

        let mut words = [0u32; 4];
        for (word, group) in words.iter_mut().zip(&groups) {
            if group.len() != 8 {
                return Err(GuidParseError::BadGroup(group.to_string()));
            }
            *word = u32::from_str_radix(group, 16)
                .map_err(|_| GuidParseError::BadGroup(group.to_string()))?;
        }
        Ok(Guid(words))
    }
}

// Serialized in the textual form so catalogues and settings files stay
// human-readable and stable across word-endianness concerns.
impl Serialize for Guid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Guid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}
