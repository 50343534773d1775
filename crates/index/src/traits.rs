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

use alloy_primitives::Address;
use ensnode_types::{ChainMetadata, IndexedResolverRecords, Node, NodeResolverRelation};
#[cfg(feature = "test-utils")]
use mockall::automock;

use crate::IndexResult;

/// Indexed node to resolver relations
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait::async_trait]
pub trait NodeResolverRelationStore: Send + Sync {
    /// Relations of `nodes` on a chain, in no particular order.
    ///
    /// Nodes without a resolver have no relation.
    async fn find_node_resolver_relations(
        &self,
        chain_id: u64,
        nodes: Vec<Node>,
    ) -> IndexResult<Vec<NodeResolverRelation>>;
}

/// Indexed resolver records
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait::async_trait]
pub trait IndexedRecordsStore: Send + Sync {
    /// Records a resolver holds for a node, `None` if it never stored any
    async fn get_indexed_resolver_records(
        &self,
        chain_id: u64,
        resolver: Address,
        node: Node,
    ) -> IndexResult<Option<IndexedResolverRecords>>;
}

/// Sync progress of the indexer
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait::async_trait]
pub trait ChainMetadataSource: Send + Sync {
    /// Chains the indexer indexes
    fn chain_ids(&self) -> Vec<u64>;

    /// Metadata of a single chain
    async fn get_chain_metadata(&self, chain_id: u64) -> IndexResult<ChainMetadata>;

    /// Metadata of every indexed chain, read together
    async fn get_all_chain_metadata(&self) -> IndexResult<Vec<ChainMetadata>>;
}
