//! Semantic versions for published templates

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Which version component a publish bumps.
///
/// The default publish flow uses [`VersionBump::Minor`]; the policy is kept
/// pluggable so callers can opt into major or patch releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

/// A `major.minor.patch` template version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Version carried by a draft that has never been published.
    pub const fn draft() -> Self {
        Self::new(0, 1, 0)
    }

    /// Version assigned to the first published template.
    pub const fn initial() -> Self {
        Self::new(1, 0, 0)
    }

    pub fn bump(self, bump: VersionBump) -> Self {
        match bump {
            VersionBump::Major => Self::new(self.major + 1, 0, 0),
            VersionBump::Minor => Self::new(self.major, self.minor + 1, 0),
            VersionBump::Patch => Self::new(self.major, self.minor, self.patch + 1),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::invalid_value(format!("invalid version: {s}"));

        let mut parts = s.split('.');
        let major = parts.next().ok_or_else(invalid)?;
        let minor = parts.next().ok_or_else(invalid)?;
        let patch = parts.next().ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Version {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
            patch: patch.parse().map_err(|_| invalid())?,
        })
    }
}

impl TryFrom<String> for Version {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Version> for String {
    fn from(version: Version) -> String {
        version.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_round_trip() {
        let version: Version = "2.14.3".parse().unwrap();
        assert_eq!(version, Version::new(2, 14, 3));
        assert_eq!(version.to_string(), "2.14.3");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("1.2".parse::<Version>().is_err());
        assert!("1.2.3.4".parse::<Version>().is_err());
        assert!("1.x.0".parse::<Version>().is_err());
        assert!("".parse::<Version>().is_err());
    }

    #[test]
    fn test_bump_rules() {
        let version = Version::new(1, 4, 2);
        assert_eq!(version.bump(VersionBump::Major), Version::new(2, 0, 0));
        assert_eq!(version.bump(VersionBump::Minor), Version::new(1, 5, 0));
        assert_eq!(version.bump(VersionBump::Patch), Version::new(1, 4, 3));
    }

    #[test]
    fn test_ordering() {
        let older: Version = "1.9.0".parse().unwrap();
        let newer: Version = "1.10.0".parse().unwrap();
        assert!(older < newer);
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Version::initial()).unwrap();
        assert_eq!(json, "\"1.0.0\"");
        let restored: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, Version::initial());
    }
}
