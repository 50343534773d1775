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

use alloy_primitives::Bytes;
use alloy_provider::{network::TransactionBuilder, Provider as AlloyProvider};
use alloy_rpc_types_eth::{BlockId, BlockNumberOrTag, TransactionRequest};
use ensnode_types::{BlockRef, Timestamp};

use crate::{EvmCall, EvmProvider, ProviderResult};

/// Evm Provider implementation using [alloy-provider](https://github.com/alloy-rs/alloy-rs)
#[derive(Clone)]
pub struct AlloyEvmProvider<AP> {
    inner: AP,
}

impl<AP> AlloyEvmProvider<AP> {
    /// Create a new `AlloyEvmProvider`
    pub fn new(inner: AP) -> Self {
        Self { inner }
    }
}

impl<AP> From<AP> for AlloyEvmProvider<AP>
where
    AP: AlloyProvider,
{
    fn from(inner: AP) -> Self {
        Self::new(inner)
    }
}

#[async_trait::async_trait]
impl<AP> EvmProvider for AlloyEvmProvider<AP>
where
    AP: AlloyProvider,
{
    async fn get_chain_id(&self) -> ProviderResult<u64> {
        Ok(self.inner.get_chain_id().await?)
    }

    async fn call(&self, call: EvmCall, block: Option<BlockId>) -> ProviderResult<Bytes> {
        let tx = TransactionRequest::default()
            .with_to(call.to)
            .with_input(call.data);
        let mut call = self.inner.call(tx);
        if let Some(block) = block {
            call = call.block(block);
        }

        Ok(call.await?)
    }

    async fn get_block_number(&self) -> ProviderResult<u64> {
        Ok(self.inner.get_block_number().await?)
    }

    async fn get_block_ref(&self, number: u64) -> ProviderResult<Option<BlockRef>> {
        let block = self
            .inner
            .get_block_by_number(BlockNumberOrTag::Number(number))
            .await?;
        Ok(block.map(|b| BlockRef::new(b.header.number, Timestamp::new(b.header.timestamp))))
    }
}
