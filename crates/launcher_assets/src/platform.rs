//! Platform identifiers.
//!
//! Every client bundle is keyed by a [`PlatformId`]. The integer values are part of
//! the wire contract with launchers and must never change.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of platforms a launcher can request a bundle for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlatformId {
    Java,
    WindowsXp,
    WindowsX86,
    WindowsX86_64,
    Macintosh,
    Linux,
    WindowsX86Compat,
    WindowsX86_64Compat,
    Android,
    Ios,
}

impl PlatformId {
    /// All platforms, ordered by wire value.
    pub const ALL: [PlatformId; 10] = [
        PlatformId::Java,
        PlatformId::WindowsXp,
        PlatformId::WindowsX86,
        PlatformId::WindowsX86_64,
        PlatformId::Macintosh,
        PlatformId::Linux,
        PlatformId::WindowsX86Compat,
        PlatformId::WindowsX86_64Compat,
        PlatformId::Android,
        PlatformId::Ios,
    ];

    /// Integer value used on the wire.
    pub const fn wire_value(self) -> i32 {
        match self {
            PlatformId::Java => -1,
            PlatformId::WindowsXp => 0,
            PlatformId::WindowsX86 => 1,
            PlatformId::WindowsX86_64 => 2,
            PlatformId::Macintosh => 3,
            PlatformId::Linux => 4,
            PlatformId::WindowsX86Compat => 5,
            PlatformId::WindowsX86_64Compat => 6,
            PlatformId::Android => 7,
            PlatformId::Ios => 8,
        }
    }

    /// Resolve a wire value. Returns `None` for anything outside the enumeration,
    /// leaving the accept/reject decision to the protocol boundary.
    pub fn from_wire(value: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.wire_value() == value)
    }

    pub const fn name(self) -> &'static str {
        match self {
            PlatformId::Java => "JAVA",
            PlatformId::WindowsXp => "WINDOWS_XP",
            PlatformId::WindowsX86 => "WINDOWS_X86",
            PlatformId::WindowsX86_64 => "WINDOWS_X86_64",
            PlatformId::Macintosh => "MACINTOSH",
            PlatformId::Linux => "LINUX",
            PlatformId::WindowsX86Compat => "WINDOWS_X86_COMPAT",
            PlatformId::WindowsX86_64Compat => "WINDOWS_X86_64_COMPAT",
            PlatformId::Android => "ANDROID",
            PlatformId::Ios => "IOS",
        }
    }
}

impl TryFrom<i32> for PlatformId {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_wire(value).ok_or(Error::UnknownPlatform(value))
    }
}

impl From<PlatformId> for i32 {
    fn from(id: PlatformId) -> Self {
        id.wire_value()
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse error for [`PlatformId::from_str`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform '{0}'")]
pub struct ParsePlatformError(pub String);

impl FromStr for PlatformId {
    type Err = ParsePlatformError;

    /// Accepts a platform name (`linux`, `WINDOWS_X86_64`) or its wire value (`4`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<i32>() {
            return Self::from_wire(value).ok_or_else(|| ParsePlatformError(s.to_string()));
        }

        let normalized = trimmed.to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|p| p.name() == normalized)
            .ok_or_else(|| ParsePlatformError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values_round_trip() {
        for id in PlatformId::ALL {
            assert_eq!(PlatformId::from_wire(id.wire_value()), Some(id));
        }
    }

    #[test]
    fn test_wire_values_are_fixed() {
        assert_eq!(PlatformId::Java.wire_value(), -1);
        assert_eq!(PlatformId::WindowsXp.wire_value(), 0);
        assert_eq!(PlatformId::Linux.wire_value(), 4);
        assert_eq!(PlatformId::WindowsX86_64Compat.wire_value(), 6);
        assert_eq!(PlatformId::Ios.wire_value(), 8);
    }

    #[test]
    fn test_unknown_wire_value() {
        assert_eq!(PlatformId::from_wire(9), None);
        assert_eq!(PlatformId::from_wire(-2), None);
        assert!(matches!(
            PlatformId::try_from(99999),
            Err(Error::UnknownPlatform(99999))
        ));
    }

    #[test]
    fn test_parse_names_and_numbers() {
        assert_eq!("linux".parse::<PlatformId>(), Ok(PlatformId::Linux));
        assert_eq!(
            "windows-x86_64-compat".parse::<PlatformId>(),
            Ok(PlatformId::WindowsX86_64Compat)
        );
        assert_eq!("-1".parse::<PlatformId>(), Ok(PlatformId::Java));
        assert!("amiga".parse::<PlatformId>().is_err());
        assert!("42".parse::<PlatformId>().is_err());
    }

    #[test]
    fn test_display_matches_serde_name() {
        for id in PlatformId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id));
        }
    }
}
