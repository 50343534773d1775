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

//! Chain indexing status data model.
//!
//! Statuses are derived from [`ChainMetadata`] on every read and never
//! persisted. Each variant carries exactly the fields valid for its state, and
//! the configs carried by `Following` and `Completed` are typed so that the
//! bounded/unbounded invariant cannot be violated once constructed.

use std::collections::BTreeMap;

use parse_display::Display;
use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::Timestamp;

/// A block number and its timestamp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockRef {
    /// Block number
    pub number: u64,
    /// Block timestamp
    pub timestamp: Timestamp,
}

impl BlockRef {
    /// Create a new block reference
    pub const fn new(number: u64, timestamp: Timestamp) -> Self {
        Self { number, timestamp }
    }
}

/// Indexing config of a chain indexed without an end block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ChainIndexingConfig", into = "ChainIndexingConfig")]
pub struct IndefiniteIndexingConfig {
    /// First indexed block
    pub start_block: BlockRef,
}

/// Indexing config of a chain indexed up to a fixed end block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ChainIndexingConfig", into = "ChainIndexingConfig")]
pub struct DefiniteIndexingConfig {
    /// First indexed block
    pub start_block: BlockRef,
    /// Last indexed block
    pub end_block: BlockRef,
}

/// Indexing config of a chain, tagged by strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "strategy",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum ChainIndexingConfig {
    /// Indexing follows the chain head forever
    Indefinite {
        /// First indexed block
        start_block: BlockRef,
    },
    /// Indexing stops at `end_block`
    Definite {
        /// First indexed block
        start_block: BlockRef,
        /// Last indexed block
        end_block: BlockRef,
    },
}

impl ChainIndexingConfig {
    /// First indexed block
    pub fn start_block(&self) -> BlockRef {
        match self {
            Self::Indefinite { start_block } | Self::Definite { start_block, .. } => *start_block,
        }
    }

    /// Last indexed block, if bounded
    pub fn end_block(&self) -> Option<BlockRef> {
        match self {
            Self::Indefinite { .. } => None,
            Self::Definite { end_block, .. } => Some(*end_block),
        }
    }

    /// Strategy name, for error messages
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::Indefinite { .. } => "indefinite",
            Self::Definite { .. } => "definite",
        }
    }
}

impl From<IndefiniteIndexingConfig> for ChainIndexingConfig {
    fn from(config: IndefiniteIndexingConfig) -> Self {
        Self::Indefinite {
            start_block: config.start_block,
        }
    }
}

impl From<DefiniteIndexingConfig> for ChainIndexingConfig {
    fn from(config: DefiniteIndexingConfig) -> Self {
        Self::Definite {
            start_block: config.start_block,
            end_block: config.end_block,
        }
    }
}

/// A config did not have the strategy a status requires.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected a {expected} indexing config, found {found}")]
pub struct StrategyMismatch {
    /// Required strategy
    pub expected: &'static str,
    /// Actual strategy
    pub found: &'static str,
}

impl TryFrom<ChainIndexingConfig> for IndefiniteIndexingConfig {
    type Error = StrategyMismatch;

    fn try_from(config: ChainIndexingConfig) -> Result<Self, Self::Error> {
        match config {
            ChainIndexingConfig::Indefinite { start_block } => Ok(Self { start_block }),
            other => Err(StrategyMismatch {
                expected: "indefinite",
                found: other.strategy(),
            }),
        }
    }
}

impl TryFrom<ChainIndexingConfig> for DefiniteIndexingConfig {
    type Error = StrategyMismatch;

    fn try_from(config: ChainIndexingConfig) -> Result<Self, Self::Error> {
        match config {
            ChainIndexingConfig::Definite {
                start_block,
                end_block,
            } => Ok(Self {
                start_block,
                end_block,
            }),
            other => Err(StrategyMismatch {
                expected: "definite",
                found: other.strategy(),
            }),
        }
    }
}

/// Raw sync metadata of one chain, as reported by the indexing pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainMetadata {
    /// Chain id
    pub chain_id: u64,
    /// Indexing config
    pub config: ChainIndexingConfig,
    /// Indexing cursor
    pub status_block: BlockRef,
    /// Latest block known to the RPC cache
    pub sync_block: BlockRef,
    /// Target block of the backfill
    pub backfill_end_block: BlockRef,
    /// True once a definite config reached its end block
    pub is_sync_complete: bool,
    /// True once indexing caught up with the chain head
    pub is_sync_realtime: bool,
}

/// Discriminant shared by chain and overall statuses.
///
/// Ordered from least to most advanced.
#[derive(
    Clone, Copy, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash, EnumString, Serialize, Deserialize,
)]
#[display(style = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IndexingStatusKind {
    /// Indexing has not processed any block
    Unstarted,
    /// Indexing historical blocks
    Backfill,
    /// Indexing the chain head in near realtime
    Following,
    /// Indexing reached its end block
    Completed,
}

/// Indexing status of one chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ChainIndexingStatus {
    /// No block indexed yet
    Unstarted {
        /// Indexing config
        config: ChainIndexingConfig,
    },
    /// Indexing historical blocks
    Backfill {
        /// Indexing config
        config: ChainIndexingConfig,
        /// Latest indexed block
        latest_indexed_block: BlockRef,
        /// Latest block known to the RPC cache
        latest_synced_block: BlockRef,
        /// Target block of the backfill
        backfill_end_block: BlockRef,
    },
    /// Indexing the chain head
    Following {
        /// Indexing config
        config: IndefiniteIndexingConfig,
        /// Latest indexed block
        latest_indexed_block: BlockRef,
        /// Latest block known to the RPC cache
        latest_known_block: BlockRef,
        /// Seconds between now and the latest indexed block, never negative
        approx_realtime_distance: u64,
    },
    /// Indexing finished
    Completed {
        /// Indexing config
        config: DefiniteIndexingConfig,
        /// Latest indexed block
        latest_indexed_block: BlockRef,
    },
}

impl ChainIndexingStatus {
    /// Discriminant of this status
    pub fn kind(&self) -> IndexingStatusKind {
        match self {
            Self::Unstarted { .. } => IndexingStatusKind::Unstarted,
            Self::Backfill { .. } => IndexingStatusKind::Backfill,
            Self::Following { .. } => IndexingStatusKind::Following,
            Self::Completed { .. } => IndexingStatusKind::Completed,
        }
    }

    /// Indexing config, untyped
    pub fn config(&self) -> ChainIndexingConfig {
        match self {
            Self::Unstarted { config } | Self::Backfill { config, .. } => *config,
            Self::Following { config, .. } => (*config).into(),
            Self::Completed { config, .. } => (*config).into(),
        }
    }

    /// Latest indexed block, `None` when unstarted
    pub fn latest_indexed_block(&self) -> Option<BlockRef> {
        match self {
            Self::Unstarted { .. } => None,
            Self::Backfill {
                latest_indexed_block,
                ..
            }
            | Self::Following {
                latest_indexed_block,
                ..
            }
            | Self::Completed {
                latest_indexed_block,
                ..
            } => Some(*latest_indexed_block),
        }
    }

    /// Realtime distance, only defined when following
    pub fn approx_realtime_distance(&self) -> Option<u64> {
        match self {
            Self::Following {
                approx_realtime_distance,
                ..
            } => Some(*approx_realtime_distance),
            _ => None,
        }
    }
}

/// Aggregate indexing status across every indexed chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "overallStatus",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum OverallIndexingStatus {
    /// At least one chain is unstarted
    Unstarted {
        /// Per chain statuses
        chains: BTreeMap<u64, ChainIndexingStatus>,
    },
    /// At least one chain is backfilling and none is unstarted
    Backfill {
        /// Per chain statuses
        chains: BTreeMap<u64, ChainIndexingStatus>,
        /// Least advanced latest indexed timestamp
        omnichain_indexing_cursor: Timestamp,
    },
    /// Every chain is following or completed, at least one following
    Following {
        /// Per chain statuses
        chains: BTreeMap<u64, ChainIndexingStatus>,
        /// Least advanced latest indexed timestamp
        omnichain_indexing_cursor: Timestamp,
        /// Largest per chain realtime distance
        overall_approx_realtime_distance: u64,
    },
    /// Every chain is completed
    Completed {
        /// Per chain statuses
        chains: BTreeMap<u64, ChainIndexingStatus>,
        /// Least advanced latest indexed timestamp
        omnichain_indexing_cursor: Timestamp,
    },
}

impl OverallIndexingStatus {
    /// Discriminant of this status
    pub fn kind(&self) -> IndexingStatusKind {
        match self {
            Self::Unstarted { .. } => IndexingStatusKind::Unstarted,
            Self::Backfill { .. } => IndexingStatusKind::Backfill,
            Self::Following { .. } => IndexingStatusKind::Following,
            Self::Completed { .. } => IndexingStatusKind::Completed,
        }
    }

    /// Per chain statuses
    pub fn chains(&self) -> &BTreeMap<u64, ChainIndexingStatus> {
        match self {
            Self::Unstarted { chains }
            | Self::Backfill { chains, .. }
            | Self::Following { chains, .. }
            | Self::Completed { chains, .. } => chains,
        }
    }

    /// Status of a single chain
    pub fn chain(&self, chain_id: u64) -> Option<&ChainIndexingStatus> {
        self.chains().get(&chain_id)
    }

    /// Omnichain cursor, `None` when unstarted
    pub fn omnichain_indexing_cursor(&self) -> Option<Timestamp> {
        match self {
            Self::Unstarted { .. } => None,
            Self::Backfill {
                omnichain_indexing_cursor,
                ..
            }
            | Self::Following {
                omnichain_indexing_cursor,
                ..
            }
            | Self::Completed {
                omnichain_indexing_cursor,
                ..
            } => Some(*omnichain_indexing_cursor),
        }
    }

    /// Overall realtime distance, only defined when following
    pub fn overall_approx_realtime_distance(&self) -> Option<u64> {
        match self {
            Self::Following {
                overall_approx_realtime_distance,
                ..
            } => Some(*overall_approx_realtime_distance),
            _ => None,
        }
    }
}
