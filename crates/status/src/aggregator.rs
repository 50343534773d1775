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

//! Omnichain status aggregation and validation.

use std::collections::BTreeMap;

use ensnode_types::{
    BlockRef, ChainIndexingStatus, IndexingStatusKind, OverallIndexingStatus, Timestamp,
};

use crate::IndexingStatusError;

/// Combine per chain statuses into the overall status.
///
/// The overall status is the least advanced chain status. The omnichain
/// cursor is the minimum latest indexed timestamp, the overall realtime
/// distance the maximum chain distance.
pub fn overall_indexing_status(
    chains: BTreeMap<u64, ChainIndexingStatus>,
) -> Result<OverallIndexingStatus, IndexingStatusError> {
    let kind = chains
        .values()
        .map(ChainIndexingStatus::kind)
        .min()
        .ok_or(IndexingStatusError::NoChains)?;

    if kind == IndexingStatusKind::Unstarted {
        return Ok(OverallIndexingStatus::Unstarted { chains });
    }
    // past unstarted every chain has a latest indexed block
    let omnichain_indexing_cursor =
        omnichain_cursor(&chains).ok_or(IndexingStatusError::NoChains)?;

    Ok(match kind {
        IndexingStatusKind::Unstarted | IndexingStatusKind::Backfill => {
            OverallIndexingStatus::Backfill {
                chains,
                omnichain_indexing_cursor,
            }
        }
        IndexingStatusKind::Following => OverallIndexingStatus::Following {
            overall_approx_realtime_distance: max_realtime_distance(&chains),
            chains,
            omnichain_indexing_cursor,
        },
        IndexingStatusKind::Completed => OverallIndexingStatus::Completed {
            chains,
            omnichain_indexing_cursor,
        },
    })
}

/// Check an overall status against its chains.
///
/// Statuses built by [`overall_indexing_status`] always pass. Statuses read
/// from elsewhere (e.g. deserialized) may not.
pub fn validate_overall_status(status: &OverallIndexingStatus) -> Result<(), IndexingStatusError> {
    let overall = status.kind();
    let chains = status.chains();
    if chains.is_empty() {
        return Err(IndexingStatusError::NoChains);
    }

    for (chain_id, chain) in chains {
        validate_chain_status(*chain_id, chain)?;
        let allowed = match overall {
            IndexingStatusKind::Unstarted => true,
            IndexingStatusKind::Backfill => chain.kind() != IndexingStatusKind::Unstarted,
            IndexingStatusKind::Following => chain.kind() >= IndexingStatusKind::Following,
            IndexingStatusKind::Completed => chain.kind() == IndexingStatusKind::Completed,
        };
        if !allowed {
            return Err(IndexingStatusError::InconsistentChainStatus {
                overall,
                chain_id: *chain_id,
                chain: chain.kind(),
            });
        }
    }

    if !chains.values().any(|c| c.kind() == overall) {
        return Err(IndexingStatusError::MissingChainStatus(overall));
    }

    let expected = match overall {
        IndexingStatusKind::Unstarted => None,
        _ => omnichain_cursor(chains),
    };
    let cursor = status.omnichain_indexing_cursor();
    if cursor != expected {
        return Err(IndexingStatusError::CursorMismatch {
            cursor: cursor.map(Timestamp::seconds_since_epoch),
            expected: expected.map(Timestamp::seconds_since_epoch),
        });
    }

    if let Some(distance) = status.overall_approx_realtime_distance() {
        let expected = max_realtime_distance(chains);
        if distance != expected {
            return Err(IndexingStatusError::DistanceMismatch { distance, expected });
        }
    }
    Ok(())
}

/// Check the blocks of one chain status are ordered
pub fn validate_chain_status(
    chain_id: u64,
    status: &ChainIndexingStatus,
) -> Result<(), IndexingStatusError> {
    let config = status.config();
    let Some(indexed) = status.latest_indexed_block() else {
        return Ok(());
    };
    ensure_order(chain_id, config.start_block(), indexed)?;
    if let Some(end) = config.end_block() {
        ensure_order(chain_id, indexed, end)?;
    }
    match status {
        ChainIndexingStatus::Backfill {
            latest_synced_block,
            ..
        } => ensure_order(chain_id, indexed, *latest_synced_block),
        ChainIndexingStatus::Following {
            latest_known_block,
            ..
        } => ensure_order(chain_id, indexed, *latest_known_block),
        _ => Ok(()),
    }
}

fn ensure_order(
    chain_id: u64,
    earlier: BlockRef,
    later: BlockRef,
) -> Result<(), IndexingStatusError> {
    if earlier.number > later.number {
        return Err(IndexingStatusError::BlockOrder {
            chain_id,
            earlier,
            later,
        });
    }
    Ok(())
}

fn omnichain_cursor(chains: &BTreeMap<u64, ChainIndexingStatus>) -> Option<Timestamp> {
    chains
        .values()
        .filter_map(|c| c.latest_indexed_block())
        .map(|b| b.timestamp)
        .min()
}

fn max_realtime_distance(chains: &BTreeMap<u64, ChainIndexingStatus>) -> u64 {
    chains
        .values()
        .filter_map(ChainIndexingStatus::approx_realtime_distance)
        .max()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use ensnode_types::{ChainIndexingConfig, DefiniteIndexingConfig, IndefiniteIndexingConfig};

    use super::*;

    fn block(number: u64, timestamp: u64) -> BlockRef {
        BlockRef::new(number, Timestamp::new(timestamp))
    }

    fn unstarted() -> ChainIndexingStatus {
        ChainIndexingStatus::Unstarted {
            config: ChainIndexingConfig::Indefinite {
                start_block: block(10, 100),
            },
        }
    }

    fn backfill(indexed: u64) -> ChainIndexingStatus {
        ChainIndexingStatus::Backfill {
            config: ChainIndexingConfig::Indefinite {
                start_block: block(10, 100),
            },
            latest_indexed_block: block(indexed, indexed * 10),
            latest_synced_block: block(500, 5000),
            backfill_end_block: block(500, 5000),
        }
    }

    fn following(indexed: u64, distance: u64) -> ChainIndexingStatus {
        ChainIndexingStatus::Following {
            config: IndefiniteIndexingConfig {
                start_block: block(10, 100),
            },
            latest_indexed_block: block(indexed, indexed * 10),
            latest_known_block: block(indexed, indexed * 10),
            approx_realtime_distance: distance,
        }
    }

    fn completed(indexed: u64) -> ChainIndexingStatus {
        ChainIndexingStatus::Completed {
            config: DefiniteIndexingConfig {
                start_block: block(10, 100),
                end_block: block(indexed, indexed * 10),
            },
            latest_indexed_block: block(indexed, indexed * 10),
        }
    }

    #[test]
    fn test_all_completed() {
        let chains = BTreeMap::from([(1, completed(300)), (10, completed(200))]);
        let status = overall_indexing_status(chains.clone()).unwrap();
        assert_eq!(
            status,
            OverallIndexingStatus::Completed {
                chains,
                omnichain_indexing_cursor: Timestamp::new(2000),
            }
        );
        validate_overall_status(&status).unwrap();
    }

    #[test]
    fn test_one_unstarted_flips_overall() {
        let chains = BTreeMap::from([
            (1, completed(300)),
            (10, completed(200)),
            (8453, unstarted()),
        ]);
        let status = overall_indexing_status(chains).unwrap();
        assert_eq!(status.kind(), IndexingStatusKind::Unstarted);
        assert_eq!(status.omnichain_indexing_cursor(), None);
        validate_overall_status(&status).unwrap();
    }

    #[test]
    fn test_backfill_wins_over_following() {
        let chains = BTreeMap::from([(1, following(400, 3)), (10, backfill(50))]);
        let status = overall_indexing_status(chains).unwrap();
        assert_eq!(status.kind(), IndexingStatusKind::Backfill);
        assert_eq!(status.omnichain_indexing_cursor(), Some(Timestamp::new(500)));
        assert_eq!(status.overall_approx_realtime_distance(), None);
    }

    #[test]
    fn test_following_mixed_with_completed() {
        let chains = BTreeMap::from([
            (1, following(400, 3)),
            (10, following(450, 12)),
            (8453, completed(200)),
        ]);
        let status = overall_indexing_status(chains).unwrap();
        assert_eq!(status.kind(), IndexingStatusKind::Following);
        assert_eq!(status.omnichain_indexing_cursor(), Some(Timestamp::new(2000)));
        assert_eq!(status.overall_approx_realtime_distance(), Some(12));
        validate_overall_status(&status).unwrap();
    }

    #[test]
    fn test_no_chains() {
        assert_eq!(
            overall_indexing_status(BTreeMap::new()),
            Err(IndexingStatusError::NoChains)
        );
    }

    #[test]
    fn test_validate_rejects_unstarted_chain_in_completed() {
        let status = OverallIndexingStatus::Completed {
            chains: BTreeMap::from([(1, completed(300)), (10, unstarted())]),
            omnichain_indexing_cursor: Timestamp::new(3000),
        };
        assert_eq!(
            validate_overall_status(&status),
            Err(IndexingStatusError::InconsistentChainStatus {
                overall: IndexingStatusKind::Completed,
                chain_id: 10,
                chain: IndexingStatusKind::Unstarted,
            })
        );
    }

    #[test]
    fn test_validate_rejects_wrong_cursor_and_distance() {
        let status = OverallIndexingStatus::Following {
            chains: BTreeMap::from([(1, following(400, 3))]),
            omnichain_indexing_cursor: Timestamp::new(1),
            overall_approx_realtime_distance: 3,
        };
        assert!(matches!(
            validate_overall_status(&status),
            Err(IndexingStatusError::CursorMismatch { .. })
        ));

        let status = OverallIndexingStatus::Following {
            chains: BTreeMap::from([(1, following(400, 3))]),
            omnichain_indexing_cursor: Timestamp::new(4000),
            overall_approx_realtime_distance: 0,
        };
        assert_eq!(
            validate_overall_status(&status),
            Err(IndexingStatusError::DistanceMismatch {
                distance: 0,
                expected: 3
            })
        );
    }

    #[test]
    fn test_validate_chain_block_order() {
        let status = ChainIndexingStatus::Backfill {
            config: ChainIndexingConfig::Indefinite {
                start_block: block(10, 100),
            },
            latest_indexed_block: block(5, 50),
            latest_synced_block: block(500, 5000),
            backfill_end_block: block(500, 5000),
        };
        assert!(matches!(
            validate_chain_status(1, &status),
            Err(IndexingStatusError::BlockOrder { chain_id: 1, .. })
        ));
        validate_chain_status(1, &backfill(20)).unwrap();
    }
}
