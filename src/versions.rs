//! Game version registry and nearest-match resolution
//!
//! Callers name versions as free-form strings ("1.20.4"); mapping data is
//! keyed by the versions this crate actually ships tables for. Resolution
//! picks the greatest supported version at or below the request, falling
//! back to the latest supported version for unparseable or prehistoric
//! requests.

use std::fmt;
use std::str::FromStr;

use crate::model::Edition;

/// A parsed `major.minor.patch` game version. Missing components default
/// to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl GameVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> GameVersion {
        GameVersion {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for GameVersion {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('.');
        let major = parts.next().ok_or(())?.parse().map_err(|_| ())?;
        let minor = match parts.next() {
            Some(p) => p.parse().map_err(|_| ())?,
            None => 0,
        };
        let patch = match parts.next() {
            Some(p) => p.parse().map_err(|_| ())?,
            None => 0,
        };
        Ok(GameVersion::new(major, minor, patch))
    }
}

/// Java versions with shipped mapping tables, ascending.
pub const JAVA_VERSIONS: &[GameVersion] = &[
    GameVersion::new(1, 18, 0),
    GameVersion::new(1, 18, 2),
    GameVersion::new(1, 19, 0),
    GameVersion::new(1, 19, 4),
    GameVersion::new(1, 20, 0),
    GameVersion::new(1, 20, 2),
    GameVersion::new(1, 20, 4),
    GameVersion::new(1, 20, 6),
    GameVersion::new(1, 21, 0),
    GameVersion::new(1, 21, 4),
    GameVersion::new(1, 21, 5),
    GameVersion::new(1, 21, 9),
    GameVersion::new(1, 21, 10),
];

/// Bedrock versions with shipped mapping tables, ascending.
pub const BEDROCK_VERSIONS: &[GameVersion] = &[
    GameVersion::new(1, 18, 0),
    GameVersion::new(1, 18, 30),
    GameVersion::new(1, 19, 0),
    GameVersion::new(1, 19, 70),
    GameVersion::new(1, 19, 80),
    GameVersion::new(1, 20, 0),
    GameVersion::new(1, 20, 70),
    GameVersion::new(1, 20, 80),
    GameVersion::new(1, 21, 0),
    GameVersion::new(1, 21, 40),
    GameVersion::new(1, 21, 90),
    GameVersion::new(1, 21, 120),
];

/// The pair built by [`crate::cache::prewarm`].
pub const DEFAULT_JAVA: GameVersion = GameVersion::new(1, 21, 10);
pub const DEFAULT_BEDROCK: GameVersion = GameVersion::new(1, 21, 120);

/// Supported versions for an edition, ascending.
pub fn supported(edition: Edition) -> &'static [GameVersion] {
    match edition {
        Edition::Java => JAVA_VERSIONS,
        Edition::Bedrock => BEDROCK_VERSIONS,
    }
}

/// Latest supported version for an edition.
pub fn latest(edition: Edition) -> GameVersion {
    *supported(edition)
        .last()
        .expect("version tables are non-empty")
}

/// Resolve a requested version string to a supported version.
///
/// Returns the greatest supported version less than or equal to the
/// request. Unparseable strings and requests below the oldest supported
/// version resolve to the latest supported version.
pub fn nearest(edition: Edition, requested: &str) -> GameVersion {
    let Ok(parsed) = requested.parse::<GameVersion>() else {
        return latest(edition);
    };
    supported(edition)
        .iter()
        .rev()
        .find(|v| **v <= parsed)
        .copied()
        .unwrap_or_else(|| latest(edition))
}
