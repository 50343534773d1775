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

//! Latest published indexing status.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use ensnode_types::{OverallIndexingStatus, Timestamp};

/// An overall status and when it was computed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Overall status
    pub status: OverallIndexingStatus,
    /// Time the status was computed at
    pub refreshed_at: Timestamp,
}

/// Shared handle to the latest indexing status.
///
/// Written by a single refresher, read by any number of requests. Reads never
/// block. Starts out unavailable until the first successful refresh.
#[derive(Clone, Debug, Default)]
pub struct IndexingStatusHandle {
    inner: Arc<ArcSwapOption<StatusSnapshot>>,
}

impl IndexingStatusHandle {
    /// Create a handle with no status
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle already holding a status
    pub fn with_status(status: OverallIndexingStatus, refreshed_at: Timestamp) -> Self {
        let handle = Self::new();
        handle.publish(status, refreshed_at);
        handle
    }

    /// Latest snapshot, `None` while unavailable
    pub fn snapshot(&self) -> Option<Arc<StatusSnapshot>> {
        self.inner.load_full()
    }

    /// True once a status was published
    pub fn is_available(&self) -> bool {
        self.inner.load().is_some()
    }

    /// Replace the published status
    pub fn publish(&self, status: OverallIndexingStatus, refreshed_at: Timestamp) {
        self.inner.store(Some(Arc::new(StatusSnapshot {
            status,
            refreshed_at,
        })));
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use ensnode_types::{BlockRef, ChainIndexingConfig, ChainIndexingStatus};

    use super::*;

    #[test]
    fn test_publish() {
        let handle = IndexingStatusHandle::new();
        assert!(!handle.is_available());
        assert!(handle.snapshot().is_none());

        let status = OverallIndexingStatus::Unstarted {
            chains: BTreeMap::from([(
                1,
                ChainIndexingStatus::Unstarted {
                    config: ChainIndexingConfig::Indefinite {
                        start_block: BlockRef::new(1, Timestamp::new(10)),
                    },
                },
            )]),
        };
        // clones share the published value
        let reader = handle.clone();
        handle.publish(status.clone(), Timestamp::new(100));
        let snapshot = reader.snapshot().unwrap();
        assert_eq!(snapshot.status, status);
        assert_eq!(snapshot.refreshed_at, Timestamp::new(100));
    }
}
