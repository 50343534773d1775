// This file is part of ENSNode.
//
// ENSNode is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// ENSNode is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with ENSNode.
// If not, see https://www.gnu.org/licenses/.

//! Block timestamps.

use std::{
    fmt::{self, Debug, Display, Formatter},
    time::{SystemTime, UNIX_EPOCH},
};

use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};

/// Seconds since the epoch, as found in a block header.
///
/// Serializes as a plain number so it can be compared directly against the
/// block timestamps reported by indexers and nodes.
#[derive(Clone, Copy, Default, Eq, Ord, PartialEq, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a new timestamp from seconds since the epoch.
    pub const fn new(seconds_since_epoch: u64) -> Self {
        Self(seconds_since_epoch)
    }

    /// The current wall clock time.
    ///
    /// A system clock set before the epoch reads as the epoch.
    pub fn now() -> Self {
        Self(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default(),
        )
    }

    /// Seconds since the epoch.
    pub fn seconds_since_epoch(self) -> u64 {
        self.0
    }

    /// Seconds elapsed from `earlier` to `self`, zero if `earlier` is ahead.
    pub fn saturating_seconds_since(self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl From<u64> for Timestamp {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match i64::try_from(self.0)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
        {
            Some(datetime) => f.write_str(&datetime.to_rfc3339_opts(SecondsFormat::Secs, true)),
            // beyond chrono's range
            None => write!(f, "{}s", self.0),
        }
    }
}

impl Debug for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({} = {})", self.0, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now() {
        let expected = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        assert!(expected - Timestamp::now().seconds_since_epoch() < 2);
    }

    #[test]
    fn test_saturating_seconds_since() {
        let block = Timestamp::new(1755667451);
        assert_eq!(Timestamp::new(1755667460).saturating_seconds_since(block), 9);
        // clock skew: now behind the block
        assert_eq!(Timestamp::new(1755667440).saturating_seconds_since(block), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Timestamp::new(1755667451).to_string(), "2025-08-20T05:24:11Z");
        assert_eq!(Timestamp::new(u64::MAX).to_string(), format!("{}s", u64::MAX));
        assert_eq!(
            format!("{:?}", Timestamp::new(100)),
            "Timestamp(100 = 1970-01-01T00:01:40Z)"
        );
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&Timestamp::new(1755667451)).unwrap();
        assert_eq!(json, "1755667451");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Timestamp::new(1755667451));
    }
}
