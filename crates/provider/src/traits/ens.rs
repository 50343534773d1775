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

//! Trait for the ENS contract calls resolution is built on.

use alloy_primitives::{Address, Bytes, FixedBytes, B256, U256};
#[cfg(feature = "test-utils")]
use mockall::automock;

use super::error::ProviderResult;

/// Output of `UniversalResolver.findResolver`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FindResolverOut {
    /// Resolver address, zero when none was found
    pub resolver: Address,
    /// Node of the queried name
    pub node: B256,
    /// Byte offset into the DNS encoded name of the ancestor the resolver was found on
    pub offset: U256,
}

/// ENS contract calls against a single chain
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait::async_trait]
pub trait EnsProvider: Send + Sync {
    /// Call `findResolver` on a UniversalResolver
    async fn find_resolver(
        &self,
        universal_resolver: Address,
        dns_encoded_name: Bytes,
    ) -> ProviderResult<FindResolverOut>;

    /// Resolver a registry has configured for a node, zero when unset
    async fn registry_resolver(&self, registry: Address, node: B256) -> ProviderResult<Address>;

    /// ERC-165 `supportsInterface`. A revert or malformed answer is `false`.
    async fn supports_interface(
        &self,
        contract: Address,
        interface_id: FixedBytes<4>,
    ) -> ProviderResult<bool>;

    /// Execute a resolver call, following EIP-3668 off-chain lookups.
    ///
    /// Returns `None` if the call reverted, including when off-chain lookups
    /// could not be completed.
    async fn resolver_call(&self, resolver: Address, data: Bytes) -> ProviderResult<Option<Bytes>>;
}
