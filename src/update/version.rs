//! Release version parsing for registry tags

use std::fmt;
use std::str::FromStr;

use crate::error::UpdateCheckError;

/// `major.minor.patch` release version; missing components are zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self { major, minor, patch }
    }
}

impl FromStr for Version {
    type Err = UpdateCheckError;

    /// Accepts `1.2.3`, `v1.2` and `4`. Pre-release or build suffixes are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || UpdateCheckError::InvalidVersion(s.to_string());

        let trimmed = s.trim();
        let trimmed = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.is_empty() || parts.len() > 3 {
            return Err(invalid());
        }

        let mut numbers = [0u64; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            *slot = part.parse().map_err(|_| invalid())?;
        }

        Ok(Version::new(numbers[0], numbers[1], numbers[2]))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Highest release among a set of tag names; non-release tags are skipped
pub fn newest_release<'a, I>(tags: I) -> Option<Version>
where
    I: IntoIterator<Item = &'a str>,
{
    tags.into_iter().filter_map(|tag| tag.parse().ok()).max()
}
