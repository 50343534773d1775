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

//! Resolver discovery.
//!
//! Finds the active resolver of a name per ENSIP-10: the resolver of the most
//! specific ancestor (the name included) that has one. The index path reads
//! materialized node to resolver relations. The RPC path asks the
//! UniversalResolver on the root chain, or walks the chain's registry elsewhere.

use std::{collections::HashMap, sync::Arc};

use alloy_primitives::Address;
use ensnode_index::NodeResolverRelationStore;
use ensnode_provider::{EnsProvider, ProviderError};
use ensnode_types::{
    name::{dns_encode, dns_offset_to_hierarchy_index, name_hierarchy_with_nodes},
    FindResolverResult, NamespaceSpec,
};
use futures::future::try_join_all;
use tracing::{debug, instrument};

use crate::{ResolutionError, ResolutionResult};

/// ENS providers by chain id
pub type ChainProviders = HashMap<u64, Arc<dyn EnsProvider>>;

/// Resolver discovery over the index and chain RPC
#[derive(Clone)]
pub struct ResolverDiscovery {
    namespace: Arc<NamespaceSpec>,
    providers: Arc<ChainProviders>,
    relations: Arc<dyn NodeResolverRelationStore>,
}

impl ResolverDiscovery {
    /// Create a new resolver discovery
    pub fn new(
        namespace: Arc<NamespaceSpec>,
        providers: Arc<ChainProviders>,
        relations: Arc<dyn NodeResolverRelationStore>,
    ) -> Self {
        Self {
            namespace,
            providers,
            relations,
        }
    }

    /// Find the active resolver of `name` on `chain_id`.
    ///
    /// The index is used only when acceleration is both requested and allowed.
    #[instrument(skip(self))]
    pub async fn find_resolver(
        &self,
        chain_id: u64,
        name: &str,
        accelerate: bool,
        acceleration_allowed: bool,
    ) -> ResolutionResult<FindResolverResult> {
        if accelerate && acceleration_allowed {
            self.find_resolver_indexed(chain_id, name).await
        } else if chain_id == self.namespace.root_chain_id {
            self.find_resolver_universal(name).await
        } else {
            self.find_resolver_registry(chain_id, name).await
        }
    }

    async fn find_resolver_indexed(
        &self,
        chain_id: u64,
        name: &str,
    ) -> ResolutionResult<FindResolverResult> {
        let hierarchy = name_hierarchy_with_nodes(name);
        let relations = self
            .relations
            .find_node_resolver_relations(chain_id, hierarchy.iter().map(|(_, n)| *n).collect())
            .await?;

        // the store returns relations in arbitrary order
        let mut by_node = HashMap::with_capacity(relations.len());
        for relation in relations {
            if relation.resolver.is_zero() {
                return Err(ResolutionError::InvariantViolation(format!(
                    "indexed relation for node {} on chain {chain_id} has a zero resolver",
                    relation.node
                )));
            }
            by_node.insert(relation.node, relation.resolver);
        }

        let found = hierarchy
            .iter()
            .enumerate()
            .find_map(|(i, (ancestor, node))| by_node.get(node).map(|r| (i, ancestor, *r)));
        debug!("indexed resolver for {name} on chain {chain_id}: {found:?}");
        Ok(found_result(found))
    }

    async fn find_resolver_universal(&self, name: &str) -> ResolutionResult<FindResolverResult> {
        let chain_id = self.namespace.root_chain_id;
        let provider = self.provider(chain_id)?;
        let encoded = dns_encode(name);
        let out = match provider
            .find_resolver(self.namespace.universal_resolver_address, encoded.clone())
            .await
        {
            Ok(out) => out,
            // the UniversalResolver reverts for names without a resolver
            Err(ProviderError::Revert(_)) => return Ok(FindResolverResult::NotFound),
            Err(e) => return Err(e.into()),
        };
        if out.resolver.is_zero() {
            return Ok(FindResolverResult::NotFound);
        }

        let offset = usize::try_from(out.offset).map_err(|_| {
            ResolutionError::InvariantViolation(format!(
                "findResolver offset {} for {name} is out of range",
                out.offset
            ))
        })?;
        let index = dns_offset_to_hierarchy_index(&encoded, offset).map_err(|e| {
            ResolutionError::InvariantViolation(format!("findResolver offset for {name}: {e}"))
        })?;
        let hierarchy = name_hierarchy_with_nodes(name);
        match hierarchy.get(index) {
            Some((ancestor, _)) => Ok(found_result(Some((index, ancestor, out.resolver)))),
            // matched on the root node, which is never part of a name's hierarchy
            None if index == hierarchy.len() => {
                debug!("findResolver matched {name} on the root node");
                Ok(FindResolverResult::NotFound)
            }
            None => Err(ResolutionError::InvariantViolation(format!(
                "findResolver offset {offset} for {name} is past the root"
            ))),
        }
    }

    async fn find_resolver_registry(
        &self,
        chain_id: u64,
        name: &str,
    ) -> ResolutionResult<FindResolverResult> {
        let registry = self
            .namespace
            .registry(chain_id)
            .ok_or(ResolutionError::UnsupportedChain(chain_id))?;
        let provider = self.provider(chain_id)?;
        let hierarchy = name_hierarchy_with_nodes(name);
        let resolvers = try_join_all(
            hierarchy
                .iter()
                .map(|(_, node)| provider.registry_resolver(registry, *node)),
        )
        .await?;

        let found = hierarchy
            .iter()
            .zip(resolvers)
            .enumerate()
            .find(|(_, (_, resolver))| !resolver.is_zero())
            .map(|(i, ((ancestor, _), resolver))| (i, ancestor, resolver));
        Ok(found_result(found))
    }

    fn provider(&self, chain_id: u64) -> ResolutionResult<&Arc<dyn EnsProvider>> {
        self.providers
            .get(&chain_id)
            .ok_or(ResolutionError::UnsupportedChain(chain_id))
    }
}

fn found_result(found: Option<(usize, &String, Address)>) -> FindResolverResult {
    match found {
        None => FindResolverResult::NotFound,
        Some((index, ancestor, resolver)) => FindResolverResult::Found {
            active_name: ancestor.clone(),
            active_resolver: resolver,
            requires_wildcard_support: index > 0,
        },
    }
}
