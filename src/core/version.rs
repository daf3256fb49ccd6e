//! Interpreter version handling.

use std::fmt;
use std::str::FromStr;

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A probed interpreter version: the (major, minor) pair of
/// `sys.version_info`. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
}

impl PythonVersion {
    /// Create a version from its components.
    pub fn new(major: u32, minor: u32) -> Self {
        PythonVersion { major, minor }
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Error parsing a version constraint or a probed component.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid python version `{value}`: expected `major[.minor]`")]
pub struct VersionParseError {
    pub value: String,
}

impl FromStr for PythonVersion {
    type Err = VersionParseError;

    /// Lenient parse: `"3"` means `3.0`, `"3.8"` means `3.8`. Anything
    /// else is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || VersionParseError {
            value: s.to_string(),
        };

        let mut parts = s.trim().split('.');
        let major = parts
            .next()
            .filter(|p| !p.is_empty())
            .and_then(|p| p.parse().ok())
            .ok_or_else(err)?;
        let minor = match parts.next() {
            Some(p) => p.parse().map_err(|_| err())?,
            None => 0,
        };
        if parts.next().is_some() {
            return Err(err());
        }

        Ok(PythonVersion::new(major, minor))
    }
}

impl<'de> Deserialize<'de> for PythonVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// What to do when the probed version is below the configured minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionPolicy {
    /// Report through the diagnostic channel and continue.
    #[default]
    Warn,
    /// Fail the init phase.
    Deny,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lenient() {
        assert_eq!("3".parse::<PythonVersion>(), Ok(PythonVersion::new(3, 0)));
        assert_eq!("3.8".parse::<PythonVersion>(), Ok(PythonVersion::new(3, 8)));
        assert_eq!(
            " 3.11 ".parse::<PythonVersion>(),
            Ok(PythonVersion::new(3, 11))
        );
        assert!("3.8.1".parse::<PythonVersion>().is_err());
        assert!("".parse::<PythonVersion>().is_err());
        assert!("py3".parse::<PythonVersion>().is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(PythonVersion::new(3, 8) < PythonVersion::new(3, 11));
        assert!(PythonVersion::new(2, 7) < PythonVersion::new(3, 0));
        assert!(PythonVersion::new(3, 8) >= PythonVersion::new(3, 8));
    }

    #[test]
    fn test_display() {
        assert_eq!(PythonVersion::new(3, 11).to_string(), "3.11");
    }
}
