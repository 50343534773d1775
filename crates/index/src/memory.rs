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

//! In-memory index store.

use std::collections::HashMap;

use alloy_primitives::Address;
use ensnode_types::{IndexedResolverRecords, Node, NodeResolverRelation};
use tokio::sync::RwLock;

use crate::{IndexResult, IndexedRecordsStore, NodeResolverRelationStore};

/// Index store held in memory.
///
/// Used for tests and for serving a fixed snapshot of indexed data.
#[derive(Debug, Default)]
pub struct InMemoryIndexStore {
    relations: RwLock<HashMap<(u64, Node), Address>>,
    records: RwLock<HashMap<(u64, Address, Node), IndexedResolverRecords>>,
}

impl InMemoryIndexStore {
    /// Set the resolver of a node, a zero address unsets it
    pub async fn set_resolver(&self, chain_id: u64, node: Node, resolver: Address) {
        let mut relations = self.relations.write().await;
        if resolver.is_zero() {
            relations.remove(&(chain_id, node));
        } else {
            relations.insert((chain_id, node), resolver);
        }
    }

    /// Replace the records a resolver holds for a node
    pub async fn set_records(
        &self,
        chain_id: u64,
        resolver: Address,
        node: Node,
        records: IndexedResolverRecords,
    ) {
        self.records
            .write()
            .await
            .insert((chain_id, resolver, node), records);
    }
}

#[async_trait::async_trait]
impl NodeResolverRelationStore for InMemoryIndexStore {
    async fn find_node_resolver_relations(
        &self,
        chain_id: u64,
        nodes: Vec<Node>,
    ) -> IndexResult<Vec<NodeResolverRelation>> {
        let relations = self.relations.read().await;
        Ok(nodes
            .into_iter()
            .filter_map(|node| {
                relations
                    .get(&(chain_id, node))
                    .map(|resolver| NodeResolverRelation {
                        node,
                        resolver: *resolver,
                    })
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl IndexedRecordsStore for InMemoryIndexStore {
    async fn get_indexed_resolver_records(
        &self,
        chain_id: u64,
        resolver: Address,
        node: Node,
    ) -> IndexResult<Option<IndexedResolverRecords>> {
        Ok(self
            .records
            .read()
            .await
            .get(&(chain_id, resolver, node))
            .cloned())
    }
}
