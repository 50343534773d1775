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

//! Acceleration gate.
//!
//! Decides per chain whether indexed data currently mirrors chain state
//! closely enough to answer resolution requests.

use std::sync::Arc;

use ensnode_index::IndexingConfig;
use ensnode_status::IndexingStatusHandle;
use ensnode_types::{IndexingStatusKind, OverallIndexingStatus, Timestamp};

/// Acceleration settings
#[derive(Clone, Copy, Debug)]
pub struct AccelerationSettings {
    /// Accelerate requests that ask for it
    pub enabled: bool,
    /// Largest overall realtime distance, in seconds, at which indexed data is trusted
    pub max_realtime_distance: u64,
}

impl Default for AccelerationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_realtime_distance: 60,
        }
    }
}

/// Acceleration gate over the latest published indexing status
#[derive(Clone, Debug)]
pub struct AccelerationGate {
    settings: AccelerationSettings,
    indexing: Arc<IndexingConfig>,
    status: IndexingStatusHandle,
}

impl AccelerationGate {
    /// Create a new gate
    pub fn new(
        settings: AccelerationSettings,
        indexing: Arc<IndexingConfig>,
        status: IndexingStatusHandle,
    ) -> Self {
        Self {
            settings,
            indexing,
            status,
        }
    }

    /// True if indexed node to resolver relations may be used for `chain_id`
    pub fn is_acceleration_available(&self, chain_id: u64) -> bool {
        self.is_acceleration_available_at(chain_id, Timestamp::now())
    }

    /// True if a chain's resolver records are fully and currently indexed
    pub fn are_records_indexed(&self, chain_id: u64) -> bool {
        self.indexing.is_records_indexed(chain_id) && self.is_acceleration_available(chain_id)
    }

    // a snapshot ages while the refresher is failing, its distance grows with it
    fn is_acceleration_available_at(&self, chain_id: u64, now: Timestamp) -> bool {
        if !self.settings.enabled || !self.indexing.is_indexed(chain_id) {
            return false;
        }
        let Some(snapshot) = self.status.snapshot() else {
            return false;
        };
        let staleness = now.saturating_seconds_since(snapshot.refreshed_at);
        is_status_acceleratable(
            &snapshot.status,
            chain_id,
            staleness,
            self.settings.max_realtime_distance,
        )
    }
}

// completed never accelerates, a bounded index is not a mirror of live state
fn is_status_acceleratable(
    status: &OverallIndexingStatus,
    chain_id: u64,
    staleness: u64,
    max_realtime_distance: u64,
) -> bool {
    let OverallIndexingStatus::Following {
        overall_approx_realtime_distance,
        ..
    } = status
    else {
        return false;
    };
    overall_approx_realtime_distance.saturating_add(staleness) <= max_realtime_distance
        && status
            .chain(chain_id)
            .is_some_and(|c| c.kind() == IndexingStatusKind::Following)
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use ensnode_index::ChainIndexingRange;
    use ensnode_types::{
        BlockRef, ChainIndexingStatus, DefiniteIndexingConfig, IndefiniteIndexingConfig,
    };

    use super::*;

    fn following(distance: u64) -> ChainIndexingStatus {
        ChainIndexingStatus::Following {
            config: IndefiniteIndexingConfig {
                start_block: BlockRef::new(1, Timestamp::new(10)),
            },
            latest_indexed_block: BlockRef::new(100, Timestamp::new(1000)),
            latest_known_block: BlockRef::new(100, Timestamp::new(1000)),
            approx_realtime_distance: distance,
        }
    }

    fn completed() -> ChainIndexingStatus {
        ChainIndexingStatus::Completed {
            config: DefiniteIndexingConfig {
                start_block: BlockRef::new(1, Timestamp::new(10)),
                end_block: BlockRef::new(100, Timestamp::new(1000)),
            },
            latest_indexed_block: BlockRef::new(100, Timestamp::new(1000)),
        }
    }

    fn indexing() -> Arc<IndexingConfig> {
        let range = ChainIndexingRange {
            start_block: 1,
            end_block: None,
        };
        Arc::new(IndexingConfig {
            chains: BTreeMap::from([(1, range), (10, range), (8453, range)]),
            records_indexed_chains: BTreeSet::from([1]),
        })
    }

    fn gate(status: Option<OverallIndexingStatus>, enabled: bool) -> AccelerationGate {
        let handle = match status {
            Some(status) => IndexingStatusHandle::with_status(status, Timestamp::now()),
            None => IndexingStatusHandle::new(),
        };
        AccelerationGate::new(
            AccelerationSettings {
                enabled,
                max_realtime_distance: 60,
            },
            indexing(),
            handle,
        )
    }

    fn following_status(distance: u64) -> OverallIndexingStatus {
        OverallIndexingStatus::Following {
            chains: BTreeMap::from([(1, following(distance)), (10, completed())]),
            omnichain_indexing_cursor: Timestamp::new(1000),
            overall_approx_realtime_distance: distance,
        }
    }

    #[test]
    fn test_following_chain_accelerates() {
        let gate = gate(Some(following_status(5)), true);
        assert!(gate.is_acceleration_available(1));
        assert!(gate.are_records_indexed(1));
        // completed chain
        assert!(!gate.is_acceleration_available(10));
        // indexed but missing from the status
        assert!(!gate.is_acceleration_available(8453));
        // not indexed
        assert!(!gate.is_acceleration_available(137));
    }

    #[test]
    fn test_records_indexed_requires_listing() {
        let mut status = following_status(5);
        if let OverallIndexingStatus::Following { chains, .. } = &mut status {
            chains.insert(8453, following(5));
        }
        let gate = gate(Some(status), true);
        assert!(gate.is_acceleration_available(8453));
        assert!(!gate.are_records_indexed(8453));
    }

    #[test]
    fn test_too_far_behind() {
        let gate = gate(Some(following_status(61)), true);
        assert!(!gate.is_acceleration_available(1));
    }

    #[test]
    fn test_unavailable_or_disabled() {
        assert!(!gate(None, true).is_acceleration_available(1));
        assert!(!gate(Some(following_status(5)), false).is_acceleration_available(1));
    }

    #[test]
    fn test_completed_never_accelerates() {
        let status = OverallIndexingStatus::Completed {
            chains: BTreeMap::from([(1, completed())]),
            omnichain_indexing_cursor: Timestamp::new(1000),
        };
        assert!(!gate(Some(status), true).is_acceleration_available(1));
    }

    #[test]
    fn test_stale_snapshot_stops_acceleration() {
        let status = following_status(2);
        let refreshed_at = Timestamp::new(1002);
        let gate = AccelerationGate::new(
            AccelerationSettings::default(),
            indexing(),
            IndexingStatusHandle::with_status(status, refreshed_at),
        );
        assert!(gate.is_acceleration_available_at(1, refreshed_at));
        assert!(gate.is_acceleration_available_at(1, Timestamp::new(1060)));
        assert!(!gate.is_acceleration_available_at(1, Timestamp::new(1061)));
        // refresher failing for a long time
        assert!(!gate.is_acceleration_available(1));
        assert!(!gate.are_records_indexed(1));
    }
}
