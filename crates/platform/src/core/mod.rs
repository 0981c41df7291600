//! Operating-system family detection

/// Operating-system family the tool distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    MacOS,
    Linux,
    Other,
}

impl OsFamily {
    /// Family of the running host
    #[must_use]
    pub fn host() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOS
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }
}

impl std::fmt::Display for OsFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MacOS => write!(f, "macos"),
            Self::Linux => write!(f, "linux"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Reports which operating-system family is running.
///
/// The two predicates are not required to be mutually exclusive or
/// exhaustive; callers only branch on `is_macos`.
pub trait PlatformPredicate: Send + Sync {
    fn is_macos(&self) -> bool;

    fn is_linux(&self) -> bool;

    /// Family derived from the predicates
    fn family(&self) -> OsFamily {
        if self.is_macos() {
            OsFamily::MacOS
        } else if self.is_linux() {
            OsFamily::Linux
        } else {
            OsFamily::Other
        }
    }
}

/// Compile-time detection of the running host
#[derive(Debug, Clone, Copy, Default)]
pub struct HostPlatform;

impl PlatformPredicate for HostPlatform {
    fn is_macos(&self) -> bool {
        OsFamily::host() == OsFamily::MacOS
    }

    fn is_linux(&self) -> bool {
        OsFamily::host() == OsFamily::Linux
    }
}

/// A platform pinned to one family, for tests and cross-layout inspection
#[derive(Debug, Clone, Copy)]
pub struct FixedPlatform(pub OsFamily);

impl FixedPlatform {
    #[must_use]
    pub fn macos() -> Self {
        Self(OsFamily::MacOS)
    }

    #[must_use]
    pub fn linux() -> Self {
        Self(OsFamily::Linux)
    }
}

impl PlatformPredicate for FixedPlatform {
    fn is_macos(&self) -> bool {
        self.0 == OsFamily::MacOS
    }

    fn is_linux(&self) -> bool {
        self.0 == OsFamily::Linux
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_platform_family() {
        assert_eq!(FixedPlatform::macos().family(), OsFamily::MacOS);
        assert_eq!(FixedPlatform::linux().family(), OsFamily::Linux);
        assert!(!FixedPlatform(OsFamily::Other).is_macos());
        assert_eq!(FixedPlatform(OsFamily::Other).family(), OsFamily::Other);
    }

    #[test]
    fn test_host_platform_matches_target() {
        let host = HostPlatform;
        assert_eq!(host.is_macos(), cfg!(target_os = "macos"));
        assert_eq!(host.is_linux(), cfg!(target_os = "linux"));
    }
}
