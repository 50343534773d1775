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

//! Trait for interacting with chain data and contracts.

use alloy_primitives::{Address, Bytes};
use alloy_rpc_types_eth::BlockId;
use ensnode_types::BlockRef;
#[cfg(feature = "test-utils")]
use mockall::automock;

use super::error::ProviderResult;

/// A struct representing an EVM call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvmCall {
    /// The address to call
    pub to: Address,
    /// Call data
    pub data: Bytes,
}

impl EvmCall {
    /// Create a new call
    pub fn new(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            to,
            data: data.into(),
        }
    }
}

/// Trait for interacting with chain data and contracts.
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait::async_trait]
pub trait EvmProvider: Send + Sync {
    /// Get the chain id reported by the node
    async fn get_chain_id(&self) -> ProviderResult<u64>;

    /// Execute a read only call via eth_call
    async fn call(&self, call: EvmCall, block: Option<BlockId>) -> ProviderResult<Bytes>;

    /// Get the current block number
    async fn get_block_number(&self) -> ProviderResult<u64>;

    /// Get the number and timestamp of a block, `None` if the node does not have it
    async fn get_block_ref(&self, number: u64) -> ProviderResult<Option<BlockRef>>;
}
