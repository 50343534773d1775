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

//! Chain status classifier.
//!
//! Maps one chain's raw sync metadata to its [`ChainIndexingStatus`]. The
//! status is recomputed from scratch on every call, there is no transition
//! history.

use ensnode_types::{
    ChainIndexingStatus, ChainMetadata, DefiniteIndexingConfig, IndefiniteIndexingConfig,
    Timestamp,
};

use crate::IndexingStatusError;

/// Classify a chain's indexing progress at `now`.
///
/// * status block at the start block: `Unstarted`
/// * sync complete: `Completed`, requires a definite config
/// * sync realtime: `Following`, requires an indefinite config
/// * otherwise: `Backfill`
pub fn chain_indexing_status(
    metadata: &ChainMetadata,
    now: Timestamp,
) -> Result<ChainIndexingStatus, IndexingStatusError> {
    let chain_id = metadata.chain_id;
    let config = metadata.config;

    if metadata.status_block.number > metadata.sync_block.number {
        return Err(IndexingStatusError::StatusAfterSync {
            chain_id,
            status_block: metadata.status_block.number,
            sync_block: metadata.sync_block.number,
        });
    }

    if metadata.status_block.number == config.start_block().number {
        return Ok(ChainIndexingStatus::Unstarted { config });
    }

    if metadata.is_sync_complete {
        let config = DefiniteIndexingConfig::try_from(config)
            .map_err(|_| IndexingStatusError::CompletedWithoutEndBlock(chain_id))?;
        return Ok(ChainIndexingStatus::Completed {
            config,
            latest_indexed_block: metadata.status_block,
        });
    }

    if metadata.is_sync_realtime {
        let config = IndefiniteIndexingConfig::try_from(config)
            .map_err(|_| IndexingStatusError::FollowingWithEndBlock(chain_id))?;
        return Ok(ChainIndexingStatus::Following {
            config,
            latest_indexed_block: metadata.status_block,
            latest_known_block: metadata.sync_block,
            approx_realtime_distance: now.saturating_seconds_since(metadata.status_block.timestamp),
        });
    }

    Ok(ChainIndexingStatus::Backfill {
        config,
        latest_indexed_block: metadata.status_block,
        latest_synced_block: metadata.sync_block,
        backfill_end_block: metadata.backfill_end_block,
    })
}
