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

use ensnode_types::{BlockRef, IndexingStatusKind};

/// Indexing status invariant violations.
///
/// These indicate the indexing pipeline reported data inconsistent with its
/// own model and are never coerced into a valid status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexingStatusError {
    /// The indexing cursor is ahead of the latest synced block
    #[error("chain {chain_id}: status block {status_block} is after sync block {sync_block}")]
    StatusAfterSync {
        /// chain id
        chain_id: u64,
        /// status block number
        status_block: u64,
        /// sync block number
        sync_block: u64,
    },
    /// A chain reports completion without an end block
    #[error("chain {0}: completed requires a definite indexing config")]
    CompletedWithoutEndBlock(u64),
    /// A chain reports realtime sync with an end block
    #[error("chain {0}: following requires an indefinite indexing config")]
    FollowingWithEndBlock(u64),
    /// No chains to aggregate
    #[error("no chains are indexed")]
    NoChains,
    /// Overall status does not match its chains
    #[error("overall status {overall} is inconsistent with chain {chain_id} status {chain}")]
    InconsistentChainStatus {
        /// overall status
        overall: IndexingStatusKind,
        /// chain id
        chain_id: u64,
        /// chain status
        chain: IndexingStatusKind,
    },
    /// Overall status with no chain in that state
    #[error("overall status {0} has no chain in that state")]
    MissingChainStatus(IndexingStatusKind),
    /// Omnichain cursor is not the minimum latest indexed block timestamp
    #[error("omnichain indexing cursor {cursor:?} does not match chains, expected {expected:?}")]
    CursorMismatch {
        /// reported cursor
        cursor: Option<u64>,
        /// cursor derived from chains
        expected: Option<u64>,
    },
    /// Overall realtime distance is not the maximum chain distance
    #[error("overall realtime distance {distance} does not match chains, expected {expected}")]
    DistanceMismatch {
        /// reported distance
        distance: u64,
        /// distance derived from chains
        expected: u64,
    },
    /// A block reference is later than the block it must precede
    #[error("chain {chain_id}: block {earlier:?} is after {later:?}")]
    BlockOrder {
        /// chain id
        chain_id: u64,
        /// block that must come first
        earlier: BlockRef,
        /// block that must come last
        later: BlockRef,
    },
}
