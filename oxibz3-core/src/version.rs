//! Semantic versions of block codec implementations.

use crate::error::{Bz3Error, Result};
use std::fmt;
use std::str::FromStr;

/// A `major.minor.patch` version, ordered component-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
    /// Patch component.
    pub patch: u32,
}

impl Version {
    /// Create a version from its components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = Bz3Error;

    /// Parse `"1.3.2"`; missing trailing components are zero, so `"1.4"`
    /// is `1.4.0`.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = [0u32; 3];
        let mut count = 0;
        for piece in s.trim().split('.') {
            if count == parts.len() {
                return Err(Bz3Error::invalid_argument(format!(
                    "version has too many components: {s:?}"
                )));
            }
            parts[count] = piece.parse().map_err(|_| {
                Bz3Error::invalid_argument(format!("invalid version component {piece:?}"))
            })?;
            count += 1;
        }
        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let v: Version = "1.3.2".parse().unwrap();
        assert_eq!(v, Version::new(1, 3, 2));
        assert_eq!(v.to_string(), "1.3.2");

        let v: Version = "1.4".parse().unwrap();
        assert_eq!(v, Version::new(1, 4, 0));
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<Version>().is_err());
        assert!("1.x.0".parse::<Version>().is_err());
        assert!("1.2.3.4".parse::<Version>().is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(Version::new(1, 3, 1) < Version::new(1, 3, 2));
        assert!(Version::new(1, 10, 0) > Version::new(1, 9, 9));
        assert!(Version::new(2, 0, 0) > Version::new(1, 99, 99));
    }
}
