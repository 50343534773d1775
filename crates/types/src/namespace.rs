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

//! ENS namespace specification
//!
//! A namespace names the root chain, the contracts resolution is anchored on
//! and the resolvers whose behavior is known ahead of time.

use std::collections::{BTreeMap, BTreeSet};

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Registry deployment on a chain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegistrySpec {
    /// chain id
    pub chain_id: u64,
    /// registry address
    pub address: Address,
}

/// A resolver known to answer through an off-chain lookup (EIP-3668) that
/// serves data indexed from another chain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct OffchainLookupResolverSpec {
    /// chain the resolver is deployed on
    pub chain_id: u64,
    /// resolver address
    pub address: Address,
    /// chain whose records the gateway serves
    pub defers_to_chain_id: u64,
}

/// A resolver whose records live entirely in its own storage, and are therefore
/// fully materialized by indexing its events
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct StaticResolverSpec {
    /// chain the resolver is deployed on
    pub chain_id: u64,
    /// resolver address
    pub address: Address,
}

/// Namespace specification
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NamespaceSpec {
    /// name for logging purposes, e.g. "mainnet", no logic is performed on this
    pub name: String,
    /// chain the ENS root registry is deployed on
    pub root_chain_id: u64,
    /// UniversalResolver on the root chain
    pub universal_resolver_address: Address,
    /// Registries per chain, including the root chain
    pub registries: Vec<RegistrySpec>,
    /// Known deferring off-chain lookup resolvers
    pub offchain_lookup_resolvers: Vec<OffchainLookupResolverSpec>,
    /// Known static resolvers
    pub static_resolvers: Vec<StaticResolverSpec>,
}

impl Default for NamespaceSpec {
    fn default() -> Self {
        Self {
            name: "Unknown".to_string(),
            root_chain_id: 0,
            universal_resolver_address: Address::ZERO,
            registries: vec![],
            offchain_lookup_resolvers: vec![],
            static_resolvers: vec![],
        }
    }
}

/// Errors in a namespace specification
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamespaceError {
    /// The root chain id is zero
    #[error("root chain id must be non-zero")]
    MissingRootChain,
    /// The UniversalResolver address is zero
    #[error("universal resolver address must be set")]
    MissingUniversalResolver,
    /// A resolver defers to its own chain
    #[error("resolver {address} on chain {chain_id} defers to its own chain")]
    SelfDeferral {
        /// chain id
        chain_id: u64,
        /// resolver address
        address: Address,
    },
    /// Deferrals loop back to a chain
    #[error("offchain lookup deferrals form a cycle through chain {0}")]
    DeferralCycle(u64),
}

impl NamespaceSpec {
    /// Registry address on a chain
    pub fn registry(&self, chain_id: u64) -> Option<Address> {
        self.registries
            .iter()
            .find(|r| r.chain_id == chain_id)
            .map(|r| r.address)
    }

    /// Chain a resolver defers to, if it is a known deferring resolver
    pub fn deferral_target(&self, chain_id: u64, resolver: Address) -> Option<u64> {
        self.offchain_lookup_resolvers
            .iter()
            .find(|r| r.chain_id == chain_id && r.address == resolver)
            .map(|r| r.defers_to_chain_id)
    }

    /// True if the resolver is a known static resolver on the chain
    pub fn is_static_resolver(&self, chain_id: u64, resolver: Address) -> bool {
        self.static_resolvers
            .iter()
            .any(|r| r.chain_id == chain_id && r.address == resolver)
    }

    /// Every chain this namespace references
    pub fn chain_ids(&self) -> BTreeSet<u64> {
        std::iter::once(self.root_chain_id)
            .chain(self.registries.iter().map(|r| r.chain_id))
            .chain(
                self.offchain_lookup_resolvers
                    .iter()
                    .flat_map(|r| [r.chain_id, r.defers_to_chain_id]),
            )
            .chain(self.static_resolvers.iter().map(|r| r.chain_id))
            .collect()
    }

    /// Check the namespace is usable. Deferrals between chains must form a DAG.
    pub fn validate(&self) -> Result<(), NamespaceError> {
        if self.root_chain_id == 0 {
            return Err(NamespaceError::MissingRootChain);
        }
        if self.universal_resolver_address.is_zero() {
            return Err(NamespaceError::MissingUniversalResolver);
        }

        let mut edges: BTreeMap<u64, BTreeSet<u64>> = BTreeMap::new();
        for r in &self.offchain_lookup_resolvers {
            if r.chain_id == r.defers_to_chain_id {
                return Err(NamespaceError::SelfDeferral {
                    chain_id: r.chain_id,
                    address: r.address,
                });
            }
            edges
                .entry(r.chain_id)
                .or_default()
                .insert(r.defers_to_chain_id);
        }

        // depth first search, tracking the chains on the current path
        fn visit(
            chain: u64,
            edges: &BTreeMap<u64, BTreeSet<u64>>,
            on_path: &mut BTreeSet<u64>,
            done: &mut BTreeSet<u64>,
        ) -> Result<(), NamespaceError> {
            if done.contains(&chain) {
                return Ok(());
            }
            if !on_path.insert(chain) {
                return Err(NamespaceError::DeferralCycle(chain));
            }
            for next in edges.get(&chain).into_iter().flatten() {
                visit(*next, edges, on_path, done)?;
            }
            on_path.remove(&chain);
            done.insert(chain);
            Ok(())
        }

        let mut done = BTreeSet::new();
        for chain in edges.keys() {
            visit(*chain, &edges, &mut BTreeSet::new(), &mut done)?;
        }
        Ok(())
    }
}
