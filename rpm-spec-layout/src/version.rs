//! RPM version triples, and the check that decides whether the layout of
//! `struct rpmSpec_s` can be measured at all.
//!
//! This file is also compiled into the build script, so it must only use
//! `std`.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Value of a version component that was not supplied.  It is larger than
/// any real RPM release, so an unconfigured build never passes the gate.
pub const VERSION_SENTINEL: u32 = 9999;

/// An RPM version.  Ordering is lexicographic on `(major, minor, patch)`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RpmVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl RpmVersion {
    /// The version used when none was configured
    pub const UNKNOWN: RpmVersion =
        RpmVersion::new(VERSION_SENTINEL, VERSION_SENTINEL, VERSION_SENTINEL);

    /// First release in which `struct rpmSpec_s` and `struct Package_s` are
    /// no longer declared in the public headers
    pub const LEGACY_SPEC_LAYOUT_CEILING: RpmVersion = RpmVersion::new(4, 9, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Combine the build-time version settings.  `base` is a full
    /// `MAJOR[.MINOR[.PATCH]]` string whose missing trailing components are
    /// zero; each of `major`, `minor`, and `patch` overrides one component.
    /// Components given by neither are [`VERSION_SENTINEL`].
    pub fn configure(
        base: Option<&str>,
        major: Option<&str>,
        minor: Option<&str>,
        patch: Option<&str>,
    ) -> Result<Self, ParseVersionError> {
        fn component(value: Option<&str>, fallback: u32) -> Result<u32, ParseVersionError> {
            match value {
                Some(value) => Ok(value.trim().parse()?),
                None => Ok(fallback),
            }
        }
        let base = match base {
            Some(base) => base.parse()?,
            None => Self::UNKNOWN,
        };
        Ok(Self::new(
            component(major, base.major)?,
            component(minor, base.minor)?,
            component(patch, base.patch)?,
        ))
    }

    /// Returns `true` if this release still exposes the spec structures
    /// whose layout this crate measures.
    pub fn has_legacy_spec_layout(self) -> bool {
        self < Self::LEGACY_SPEC_LAYOUT_CEILING
    }
}

impl Default for RpmVersion {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl fmt::Display for RpmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Errors from parsing an [`RpmVersion`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseVersionError {
    /// The string was empty
    Empty,
    /// More than three dot-separated components
    TooManyComponents,
    /// A component was not a non-negative integer
    BadComponent(ParseIntError),
}

impl fmt::Display for ParseVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseVersionError::Empty => f.write_str("empty version string"),
            ParseVersionError::TooManyComponents => {
                f.write_str("expected at most MAJOR.MINOR.PATCH")
            }
            ParseVersionError::BadComponent(e) => write!(f, "bad version component: {}", e),
        }
    }
}

impl std::error::Error for ParseVersionError {}

impl From<ParseIntError> for ParseVersionError {
    fn from(e: ParseIntError) -> Self {
        ParseVersionError::BadComponent(e)
    }
}

impl FromStr for RpmVersion {
    type Err = ParseVersionError;

    /// Parses `MAJOR[.MINOR[.PATCH]]`.  Missing trailing components are zero,
    /// so `4.8` is `4.8.0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseVersionError::Empty);
        }
        let mut parts = [0u32; 3];
        for (i, component) in s.split('.').enumerate() {
            if i >= parts.len() {
                return Err(ParseVersionError::TooManyComponents);
            }
            parts[i] = component.parse()?;
        }
        Ok(RpmVersion::new(parts[0], parts[1], parts[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_is_strictly_below_4_9_0() {
        assert!(RpmVersion::new(4, 8, 1).has_legacy_spec_layout());
        assert!(RpmVersion::new(4, 8, 9999).has_legacy_spec_layout());
        assert!(RpmVersion::new(3, 0, 6).has_legacy_spec_layout());
        assert!(RpmVersion::new(0, 0, 0).has_legacy_spec_layout());
        assert!(!RpmVersion::new(4, 9, 0).has_legacy_spec_layout());
        assert!(!RpmVersion::new(4, 9, 1).has_legacy_spec_layout());
        assert!(!RpmVersion::new(4, 19, 1).has_legacy_spec_layout());
        assert!(!RpmVersion::new(5, 0, 0).has_legacy_spec_layout());
    }

    #[test]
    fn unknown_version_fails_gate() {
        assert!(!RpmVersion::UNKNOWN.has_legacy_spec_layout());
        assert_eq!(RpmVersion::default(), RpmVersion::UNKNOWN);
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(RpmVersion::new(4, 8, 99) < RpmVersion::new(4, 9, 0));
        assert!(RpmVersion::new(3, 99, 99) < RpmVersion::new(4, 0, 0));
        assert!(RpmVersion::new(4, 10, 0) > RpmVersion::new(4, 9, 99));
    }

    #[test]
    fn parse() {
        assert_eq!("4.8.1".parse(), Ok(RpmVersion::new(4, 8, 1)));
        assert_eq!("4.8".parse(), Ok(RpmVersion::new(4, 8, 0)));
        assert_eq!(" 5 ".parse(), Ok(RpmVersion::new(5, 0, 0)));
        assert_eq!("".parse::<RpmVersion>(), Err(ParseVersionError::Empty));
        assert_eq!(
            "4.8.1.2".parse::<RpmVersion>(),
            Err(ParseVersionError::TooManyComponents)
        );
        assert!(matches!(
            "4.x".parse::<RpmVersion>(),
            Err(ParseVersionError::BadComponent(_))
        ));
        assert!("4..1".parse::<RpmVersion>().is_err());
        assert!("-4.8".parse::<RpmVersion>().is_err());
    }

    #[test]
    fn configure_unset_is_unknown() {
        assert_eq!(
            RpmVersion::configure(None, None, None, None),
            Ok(RpmVersion::UNKNOWN)
        );
    }

    #[test]
    fn configure_components_alone() {
        let v = RpmVersion::configure(None, Some("3"), None, None).unwrap();
        assert_eq!(v, RpmVersion::new(3, VERSION_SENTINEL, VERSION_SENTINEL));
        assert!(v.has_legacy_spec_layout());
        assert_eq!(
            RpmVersion::configure(None, Some("4"), Some("8"), Some(" 1 ")),
            Ok(RpmVersion::new(4, 8, 1))
        );
        assert_eq!(
            RpmVersion::configure(None, Some("4"), Some("9"), None),
            Ok(RpmVersion::new(4, 9, VERSION_SENTINEL))
        );
        assert!(!RpmVersion::new(4, 9, VERSION_SENTINEL).has_legacy_spec_layout());
    }

    #[test]
    fn configure_components_override_base() {
        let v = RpmVersion::configure(Some("4.9"), None, Some("8"), None).unwrap();
        assert_eq!(v, RpmVersion::new(4, 8, 0));
        assert!(v.has_legacy_spec_layout());
        assert_eq!(
            RpmVersion::configure(Some("4.8.1"), Some("5"), None, Some("3")),
            Ok(RpmVersion::new(5, 8, 3))
        );
    }

    #[test]
    fn configure_base_trailing_components_are_zero() {
        assert_eq!(
            RpmVersion::configure(Some("4.8"), None, None, None),
            Ok(RpmVersion::new(4, 8, 0))
        );
        assert_eq!(
            RpmVersion::configure(Some("4"), None, None, None),
            Ok(RpmVersion::new(4, 0, 0))
        );
    }

    #[test]
    fn configure_rejects_malformed() {
        assert!(matches!(
            RpmVersion::configure(None, Some("four"), None, None),
            Err(ParseVersionError::BadComponent(_))
        ));
        assert!(RpmVersion::configure(None, None, None, Some("")).is_err());
        assert!(RpmVersion::configure(Some("4.8"), None, Some("-1"), None).is_err());
        assert_eq!(
            RpmVersion::configure(Some(""), None, None, None),
            Err(ParseVersionError::Empty)
        );
        assert_eq!(
            RpmVersion::configure(Some("4.8.1.1"), None, None, None),
            Err(ParseVersionError::TooManyComponents)
        );
    }

    #[test]
    fn display() {
        assert_eq!(RpmVersion::new(4, 8, 1).to_string(), "4.8.1");
    }
}
