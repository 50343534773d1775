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

//! Trait for EIP-3668 off-chain gateways

use alloy_primitives::{Address, Bytes};
#[cfg(feature = "test-utils")]
use mockall::automock;

use super::error::ProviderResult;

/// Fetches the response to an `OffchainLookup` from its gateways.
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait::async_trait]
pub trait CcipGateway: Send + Sync {
    /// Query `urls` in order and return the first successful response.
    ///
    /// Returns `None` when every gateway failed.
    async fn fetch(
        &self,
        sender: Address,
        urls: Vec<String>,
        call_data: Bytes,
    ) -> ProviderResult<Option<Bytes>>;
}
